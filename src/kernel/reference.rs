//! Straightforward double-precision evaluation of a neighbor list.
//!
//! Every listed pair is computed on its own with `f64` arithmetic and the
//! same table coefficients as the batched kernel, which makes this the
//! yardstick for the lane-batched path.

use super::error::KernelError;
use super::neighbor::NeighborList;
use super::output::KernelOutput;
use super::pairwise::{KernelInputs, PairwiseKernel};
use super::params::{ElecKind, VdwKind};
use super::table::{InteractionTable, Slot};

#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceOutput {
    pub forces: Vec<[f64; 3]>,
    pub shift_forces: Vec<[f64; 3]>,
    pub elec: Vec<f64>,
    pub vdw: Vec<f64>,
}

impl ReferenceOutput {
    pub fn total_elec(&self) -> f64 {
        self.elec.iter().sum()
    }

    pub fn total_vdw(&self) -> f64 {
        self.vdw.iter().sum()
    }

    /// Largest per-component deviation of a kernel output from this
    /// reference, relative to the largest reference force component.
    pub fn max_force_deviation(&self, out: &KernelOutput) -> f64 {
        let scale = self
            .forces
            .iter()
            .flatten()
            .fold(0.0_f64, |m, &f| m.max(f.abs()));
        if scale == 0.0 {
            return 0.0;
        }
        self.forces
            .iter()
            .zip(&out.forces)
            .flat_map(|(want, got)| (0..3).map(move |d| (got[d] as f64 - want[d]).abs()))
            .fold(0.0_f64, f64::max)
            / scale
    }
}

/// Evaluates `list` pair by pair with the kinds, prefactor and table of `kernel`.
///
/// Energies are always computed, whatever the kernel's energy mode.
pub fn evaluate(
    kernel: &PairwiseKernel<'_>,
    list: &NeighborList,
    inputs: &KernelInputs<'_>,
) -> Result<ReferenceOutput, KernelError> {
    let n_groups = list.gid.iter().max().map_or(1, |&g| g + 1);
    let probe = KernelOutput::new(inputs.params.len(), inputs.shift_vectors.len(), n_groups);
    kernel.check(list, inputs, &probe)?;

    let params = inputs.params;
    let kinds = kernel.kinds();
    let epsfac = kernel.epsfac() as f64;
    let mut out = ReferenceOutput {
        forces: vec![[0.0; 3]; params.len()],
        shift_forces: vec![[0.0; 3]; inputs.shift_vectors.len()],
        elec: vec![0.0; n_groups],
        vdw: vec![0.0; n_groups],
    };

    for n in 0..list.len() {
        let i = list.iinr[n];
        let s = list.shift[n];
        let xi: [f64; 3] = std::array::from_fn(|d| inputs.positions[i][d] as f64 + inputs.shift_vectors[s][d] as f64);
        let ti = params.vdw_type(i);

        for j in list.block(n).iter().filter_map(|&j| usize::try_from(j).ok()) {
            let dx: [f64; 3] = std::array::from_fn(|d| xi[d] - inputs.positions[j][d] as f64);
            let rsq = dx[0] * dx[0] + dx[1] * dx[1] + dx[2] * dx[2];
            let r = rsq.sqrt();
            let rinv = 1.0 / r;
            let rinvsq = rinv * rinv;

            let qq = epsfac * params.charge(i) as f64 * params.charge(j) as f64;
            let (velec, felec) = match kinds.elec {
                ElecKind::None => (0.0, 0.0),
                ElecKind::Coulomb => (qq * rinv, qq * rinv * rinvsq),
                ElecKind::ReactionField { k_rf, c_rf } => {
                    let (k_rf, c_rf) = (k_rf as f64, c_rf as f64);
                    (
                        qq * (rinv + k_rf * rsq - c_rf),
                        qq * (rinv * rinvsq - 2.0 * k_rf),
                    )
                }
                ElecKind::CubicSplineTable => {
                    let table = required(kernel.table())?;
                    let (vv, ff) = spline(table, Slot::Coulomb, r)?;
                    (qq * vv, -qq * ff * table.scale() as f64 * rinv)
                }
            };

            let (c6, c12) = params.pair(ti, params.vdw_type(j));
            let (c6, c12) = (c6 as f64, c12 as f64);
            let (vvdw, fvdw) = match kinds.vdw {
                VdwKind::None => (0.0, 0.0),
                VdwKind::LennardJones => {
                    let rinvsix = rinvsq * rinvsq * rinvsq;
                    let (v6, v12) = (c6 * rinvsix, c12 * rinvsix * rinvsix);
                    (v12 - v6, (12.0 * v12 - 6.0 * v6) * rinvsq)
                }
                VdwKind::CubicSplineTable => {
                    let table = required(kernel.table())?;
                    let (vv6, ff6) = spline(table, Slot::Dispersion, r)?;
                    let (vv12, ff12) = spline(table, Slot::Repulsion, r)?;
                    (
                        c6 * vv6 + c12 * vv12,
                        -(c6 * ff6 + c12 * ff12) * table.scale() as f64 * rinv,
                    )
                }
            };

            let fscal = felec + fvdw;
            for d in 0..3 {
                let t = fscal * dx[d];
                out.forces[i][d] += t;
                out.forces[j][d] -= t;
                out.shift_forces[s][d] += t;
            }
            out.elec[list.gid[n]] += velec;
            out.vdw[list.gid[n]] += vvdw;
        }
    }
    Ok(out)
}

fn required(table: Option<&InteractionTable>) -> Result<&InteractionTable, KernelError> {
    table.ok_or(KernelError::TableMismatch {
        interaction: "reference",
        required: "any",
        found: None,
    })
}

fn spline(table: &InteractionTable, slot: Slot, r: f64) -> Result<(f64, f64), KernelError> {
    table.interpolate(slot, r).ok_or_else(|| {
        KernelError::MalformedTable(format!(
            "distance {r} lies beyond the {} knots of the table",
            table.n_knots()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::neighbor::shift_vectors;
    use crate::kernel::params::{EnergyMode, InteractionKinds, ONE_4PI_EPS0, ParticleParams};

    #[test]
    fn single_pair_matches_closed_form() {
        let params = ParticleParams::geometric(vec![1.0, 1.0], vec![0, 0], &[(1e-3, 1e-6)]).unwrap();
        let positions = [[0.0, 0.0, 0.0], [0.5, 0.0, 0.0]];
        let shifts = shift_vectors(None);
        let inputs = KernelInputs {
            positions: &positions,
            shift_vectors: &shifts,
            params: &params,
        };
        let mut list = NeighborList::new();
        list.push(0, 0, 0, &[1]);
        let kinds = InteractionKinds::new(ElecKind::Coulomb, VdwKind::LennardJones, EnergyMode::Force);
        let kernel = PairwiseKernel::new(kinds, None).unwrap();

        let out = evaluate(&kernel, &list, &inputs).unwrap();
        let r = positions[1][0] as f64;
        let (c6, c12) = params.pair(0, 0);
        let lj = c12 as f64 / r.powi(12) - c6 as f64 / r.powi(6);
        let coulomb = ONE_4PI_EPS0 as f64 / r;
        assert!((out.total_elec() - coulomb).abs() < 1e-9 * coulomb);
        assert!((out.total_vdw() - lj).abs() < 1e-9 * lj.abs());
        assert_eq!(out.forces[0][0], -out.forces[1][0]);
        assert!(out.forces[0][0] < 0.0, "like charges repel");
        assert_eq!(out.shift_forces[0], out.forces[0]);
    }

    #[test]
    fn deviation_of_identical_output_is_zero() {
        let reference = ReferenceOutput {
            forces: vec![[1.0, -2.0, 0.5], [-1.0, 2.0, -0.5]],
            shift_forces: vec![[0.0; 3]],
            elec: vec![0.0],
            vdw: vec![0.0],
        };
        let mut out = KernelOutput::new(2, 1, 1);
        out.forces = vec![[1.0, -2.0, 0.5], [-1.0, 2.0, -0.5]];
        assert_eq!(reference.max_force_deviation(&out), 0.0);
        out.forces[1][1] = 2.2;
        assert!((reference.max_force_deviation(&out) - 0.1).abs() < 1e-6);
    }
}
