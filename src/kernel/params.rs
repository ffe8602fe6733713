//! Interaction kinds, per-particle parameters, and flop accounting.

use super::error::KernelError;

/// `1 / (4 pi eps0)` in kJ mol^-1 nm e^-2.
pub const ONE_4PI_EPS0: f32 = 138.935458;

/// Electrostatic interaction evaluated by the kernel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ElecKind {
    /// No electrostatics.
    None,
    /// Plain Coulomb, `qq / r`.
    #[default]
    Coulomb,
    /// Reaction field, `qq (1/r + k_rf r^2 - c_rf)`.
    ReactionField { k_rf: f32, c_rf: f32 },
    /// Coulomb from the cubic-spline table.
    CubicSplineTable,
}

/// Van der Waals interaction evaluated by the kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VdwKind {
    /// No van der Waals.
    None,
    /// Analytic Lennard-Jones, `c12/r^12 - c6/r^6`.
    LennardJones,
    /// Dispersion and repulsion from the cubic-spline table.
    #[default]
    CubicSplineTable,
}

/// Whether potential energies are accumulated alongside forces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnergyMode {
    /// Forces only.
    Force,
    /// Forces and per-group potential energies.
    #[default]
    PotentialAndForce,
}

impl EnergyMode {
    #[inline]
    pub fn energies(self) -> bool {
        matches!(self, EnergyMode::PotentialAndForce)
    }
}

const BASE_INNER_FLOPS: [u64; 2] = [25, 26];
const OUTER_FLOPS: [u64; 2] = [7, 9];

impl ElecKind {
    pub fn is_none(self) -> bool {
        matches!(self, ElecKind::None)
    }

    pub fn uses_table(self) -> bool {
        matches!(self, ElecKind::CubicSplineTable)
    }

    fn flops(self) -> [u64; 2] {
        match self {
            ElecKind::None => [0, 0],
            ElecKind::Coulomb => [3, 4],
            ElecKind::ReactionField { .. } => [6, 9],
            ElecKind::CubicSplineTable => [16, 19],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ElecKind::None => "none",
            ElecKind::Coulomb => "Coulomb",
            ElecKind::ReactionField { .. } => "reaction field",
            ElecKind::CubicSplineTable => "tabulated Coulomb",
        }
    }
}

impl VdwKind {
    pub fn is_none(self) -> bool {
        matches!(self, VdwKind::None)
    }

    pub fn uses_table(self) -> bool {
        matches!(self, VdwKind::CubicSplineTable)
    }

    fn flops(self) -> [u64; 2] {
        match self {
            VdwKind::None => [0, 0],
            VdwKind::LennardJones => [9, 13],
            VdwKind::CubicSplineTable => [27, 34],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            VdwKind::None => "none",
            VdwKind::LennardJones => "Lennard-Jones",
            VdwKind::CubicSplineTable => "tabulated LJ",
        }
    }
}

/// The interaction-kind tags selecting one kernel flavour.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InteractionKinds {
    pub elec: ElecKind,
    pub vdw: VdwKind,
    pub mode: EnergyMode,
}

impl InteractionKinds {
    pub fn new(elec: ElecKind, vdw: VdwKind, mode: EnergyMode) -> Self {
        Self { elec, vdw, mode }
    }

    fn mode_index(&self) -> usize {
        usize::from(self.mode.energies())
    }

    /// Flops charged per inner-loop iteration, padding lanes included.
    pub fn inner_flops(&self) -> u64 {
        let m = self.mode_index();
        BASE_INNER_FLOPS[m] + self.elec.flops()[m] + self.vdw.flops()[m]
    }

    /// Flops charged per outer list.
    pub fn outer_flops(&self) -> u64 {
        OUTER_FLOPS[self.mode_index()]
    }

    /// The same kinds with van der Waals switched off, for Coulomb-only lists.
    pub fn without_vdw(self) -> Self {
        Self {
            vdw: VdwKind::None,
            ..self
        }
    }
}

/// Per-particle charges and van der Waals types plus the type-pair table.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleParams {
    charges: Vec<f32>,
    types: Vec<usize>,
    n_types: usize,
    /// `(c6, c12)` per type pair, row-major, two values per entry.
    nbfp: Vec<f32>,
    groups: Vec<usize>,
}

impl ParticleParams {
    /// # Errors
    ///
    /// Returns [`KernelError::LengthMismatch`] if the array lengths disagree and
    /// [`KernelError::TypeOutOfRange`] for a type index `>= n_types`.
    pub fn new(
        charges: Vec<f32>,
        types: Vec<usize>,
        n_types: usize,
        nbfp: Vec<f32>,
    ) -> Result<Self, KernelError> {
        if types.len() != charges.len() {
            return Err(KernelError::length("types", charges.len(), types.len()));
        }
        if nbfp.len() != 2 * n_types * n_types {
            return Err(KernelError::length(
                "nbfp",
                2 * n_types * n_types,
                nbfp.len(),
            ));
        }
        if let Some((particle, &vdw_type)) = types.iter().enumerate().find(|&(_, &t)| t >= n_types) {
            return Err(KernelError::TypeOutOfRange {
                particle,
                vdw_type,
                n_types,
            });
        }
        let groups = vec![0; charges.len()];
        Ok(Self {
            charges,
            types,
            n_types,
            nbfp,
            groups,
        })
    }

    /// Builds the type-pair table from per-type `(c6, c12)` with geometric
    /// combination.
    pub fn geometric(
        charges: Vec<f32>,
        types: Vec<usize>,
        per_type: &[(f32, f32)],
    ) -> Result<Self, KernelError> {
        let n_types = per_type.len();
        let mut nbfp = Vec::with_capacity(2 * n_types * n_types);
        for &(c6_a, c12_a) in per_type {
            for &(c6_b, c12_b) in per_type {
                nbfp.push((c6_a * c6_b).sqrt());
                nbfp.push((c12_a * c12_b).sqrt());
            }
        }
        Self::new(charges, types, n_types, nbfp)
    }

    /// Assigns an energy group to every particle.
    pub fn with_groups(mut self, groups: Vec<usize>) -> Result<Self, KernelError> {
        if groups.len() != self.charges.len() {
            return Err(KernelError::length("groups", self.charges.len(), groups.len()));
        }
        self.groups = groups;
        Ok(self)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.charges.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.charges.is_empty()
    }

    #[inline]
    pub fn charge(&self, particle: usize) -> f32 {
        self.charges[particle]
    }

    #[inline]
    pub fn vdw_type(&self, particle: usize) -> usize {
        self.types[particle]
    }

    #[inline]
    pub fn group(&self, particle: usize) -> usize {
        self.groups[particle]
    }

    pub fn n_types(&self) -> usize {
        self.n_types
    }

    /// Number of energy groups referenced by the particles.
    pub fn n_groups(&self) -> usize {
        self.groups.iter().max().map_or(1, |&g| g + 1)
    }

    /// `(c6, c12)` for a type pair.
    #[inline(always)]
    pub fn pair(&self, ti: usize, tj: usize) -> (f32, f32) {
        let k = 2 * (ti * self.n_types + tj);
        (self.nbfp[k], self.nbfp[k + 1])
    }

    /// Whether the particle's type interacts through van der Waals with any type.
    pub fn has_vdw(&self, particle: usize) -> bool {
        let t = self.types[particle];
        (0..self.n_types).any(|u| {
            let (c6, c12) = self.pair(t, u);
            c6 != 0.0 || c12 != 0.0
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coulomb_with_tabulated_vdw_flop_counts() {
        let force = InteractionKinds::new(ElecKind::Coulomb, VdwKind::CubicSplineTable, EnergyMode::Force);
        assert_eq!(force.inner_flops(), 55);
        assert_eq!(force.outer_flops(), 7);

        let energy = InteractionKinds {
            mode: EnergyMode::PotentialAndForce,
            ..force
        };
        assert_eq!(energy.inner_flops(), 64);
        assert_eq!(energy.outer_flops(), 9);
    }

    #[test]
    fn coulomb_only_flops_drop_vdw_cost() {
        let kinds = InteractionKinds::default().without_vdw();
        assert_eq!(kinds.vdw, VdwKind::None);
        assert_eq!(kinds.inner_flops(), 26 + 4);
    }

    #[test]
    fn geometric_combination() {
        let params =
            ParticleParams::geometric(vec![0.0, 0.0], vec![0, 1], &[(4.0, 9.0), (1.0, 1.0)]).unwrap();
        assert_eq!(params.pair(0, 0), (4.0, 9.0));
        assert_eq!(params.pair(0, 1), (2.0, 3.0));
        assert_eq!(params.pair(1, 0), params.pair(0, 1));
        assert!(params.has_vdw(1));
    }

    #[test]
    fn vdw_free_type_is_detected() {
        let params =
            ParticleParams::geometric(vec![0.4, -0.4], vec![0, 1], &[(1e-3, 1e-6), (0.0, 0.0)]).unwrap();
        assert!(params.has_vdw(0));
        assert!(!params.has_vdw(1));
    }

    #[test]
    fn rejects_inconsistent_arrays() {
        assert!(matches!(
            ParticleParams::new(vec![0.0; 3], vec![0; 2], 1, vec![0.0; 2]),
            Err(KernelError::LengthMismatch { what: "types", .. })
        ));
        assert!(matches!(
            ParticleParams::new(vec![0.0; 2], vec![0; 2], 1, vec![0.0; 3]),
            Err(KernelError::LengthMismatch { what: "nbfp", .. })
        ));
        assert!(matches!(
            ParticleParams::new(vec![0.0; 2], vec![0, 2], 2, vec![0.0; 8]),
            Err(KernelError::TypeOutOfRange {
                particle: 1,
                vdw_type: 2,
                n_types: 2
            })
        ));
    }

    #[test]
    fn energy_groups() {
        let params = ParticleParams::geometric(vec![0.0; 3], vec![0; 3], &[(1.0, 1.0)])
            .unwrap()
            .with_groups(vec![0, 2, 1])
            .unwrap();
        assert_eq!(params.n_groups(), 3);
        assert_eq!(params.group(1), 2);
    }
}
