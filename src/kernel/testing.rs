use super::neighbor::{NeighborLists, PairSearch, shift_vectors};
use super::params::ParticleParams;
use super::pairwise::KernelInputs;
use super::table::{InteractionTable, TableFormat};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub(crate) const BOX: f32 = 2.0;
pub(crate) const CUTOFF: f32 = 0.9;

/// A jittered 4x4x4 lattice in a periodic box, with mixed charges and one
/// van der Waals-free particle type.
pub(crate) struct Fixture {
    pub positions: Vec<[f32; 3]>,
    pub shifts: Vec<[f32; 3]>,
    pub params: ParticleParams,
    pub lists: NeighborLists,
    pub table: InteractionTable,
}

impl Fixture {
    pub fn lattice(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut positions = Vec::new();
        let mut charges = Vec::new();
        let mut types = Vec::new();
        for x in 0..4 {
            for y in 0..4 {
                for z in 0..4 {
                    let site = [x, y, z].map(|k| 0.25 + 0.5 * k as f32 + rng.gen_range(-0.08..0.08));
                    positions.push(site);
                    let sign = if (x + y + z) % 2 == 0 { 1.0 } else { -1.0 };
                    charges.push(sign * rng.gen_range(0.2..0.6));
                    types.push(usize::from(positions.len() % 5 == 0));
                }
            }
        }
        let params =
            ParticleParams::geometric(charges, types, &[(2.6e-3, 2.6e-6), (0.0, 0.0)]).unwrap();
        let lists = PairSearch::new(CUTOFF, Some(BOX))
            .run(&positions, &params, None)
            .unwrap();
        let table = InteractionTable::tabulate(TableFormat::CoulombVdw, 500.0, CUTOFF as f64).unwrap();
        Self {
            positions,
            shifts: shift_vectors(Some(BOX)),
            params,
            lists,
            table,
        }
    }

    pub fn inputs(&self) -> KernelInputs<'_> {
        KernelInputs {
            positions: &self.positions,
            shift_vectors: &self.shifts,
            params: &self.params,
        }
    }
}
