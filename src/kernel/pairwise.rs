//! The lane-batched non-bonded kernel.
//!
//! One generic kernel covers every combination of [`ElecKind`], [`VdwKind`]
//! and [`EnergyMode`]. Inner particles are processed [`LANES`] at a time.
//! Every chunk, including a short tail, goes through the same masked path:
//! padding lanes gather particle 0, their distance is zeroed before any
//! table lookup, and their force and energy contributions are cleared with a
//! bitwise mask instead of being skipped.

use super::error::KernelError;
use super::neighbor::{LANES, NeighborList, PADDING};
use super::output::KernelOutput;
use super::params::{ElecKind, InteractionKinds, ONE_4PI_EPS0, ParticleParams, VdwKind};
use super::rsqrt::invsqrt;
use super::table::{InteractionTable, Slot};
use rayon::prelude::*;
use std::ops::Range;
use wide::f32x4;

/// Read-only per-step data shared by all kernel calls.
#[derive(Debug, Clone, Copy)]
pub struct KernelInputs<'a> {
    pub positions: &'a [[f32; 3]],
    pub shift_vectors: &'a [[f32; 3]],
    pub params: &'a ParticleParams,
}

#[derive(Debug, Clone, Copy, Default)]
struct TableSlots {
    elec: usize,
    disp: usize,
    rep: usize,
}

/// A configured kernel.
///
/// Construction checks that the interaction kinds and the table agree.
/// Each evaluation checks list indices against the inputs; once those pass,
/// the only remaining precondition is that every pair distance falls inside
/// the table, which is asserted per lane.
#[derive(Debug, Clone, Copy)]
pub struct PairwiseKernel<'t> {
    kinds: InteractionKinds,
    epsfac: f32,
    table: Option<&'t InteractionTable>,
    slots: TableSlots,
}

struct Knots {
    index: [usize; LANES],
    eps: f32x4,
}

impl<'t> PairwiseKernel<'t> {
    /// # Errors
    ///
    /// Returns [`KernelError::NoInteraction`] if both kinds are `None`, and
    /// [`KernelError::TableMismatch`] if a tabulated kind has no table or the
    /// table lacks the functions it needs.
    pub fn new(kinds: InteractionKinds, table: Option<&'t InteractionTable>) -> Result<Self, KernelError> {
        if kinds.elec.is_none() && kinds.vdw.is_none() {
            return Err(KernelError::NoInteraction);
        }
        let mut slots = TableSlots::default();
        if kinds.elec.uses_table() {
            slots.elec = slot_offset(table, Slot::Coulomb, "electrostatic", "Coulomb")?;
        }
        if kinds.vdw.uses_table() {
            slots.disp = slot_offset(table, Slot::Dispersion, "van der Waals", "dispersion/repulsion")?;
            slots.rep = slot_offset(table, Slot::Repulsion, "van der Waals", "dispersion/repulsion")?;
        }
        Ok(Self {
            kinds,
            epsfac: ONE_4PI_EPS0,
            table,
            slots,
        })
    }

    /// Overrides the electrostatic prefactor, e.g. to fold in a dielectric.
    pub fn with_epsfac(mut self, epsfac: f32) -> Self {
        self.epsfac = epsfac;
        self
    }

    pub fn kinds(&self) -> InteractionKinds {
        self.kinds
    }

    pub fn epsfac(&self) -> f32 {
        self.epsfac
    }

    pub fn table(&self) -> Option<&'t InteractionTable> {
        self.table
    }

    /// Checks that the list, inputs and output all describe the same system.
    pub(crate) fn check(
        &self,
        list: &NeighborList,
        inputs: &KernelInputs<'_>,
        out: &KernelOutput,
    ) -> Result<(), KernelError> {
        let n = inputs.params.len();
        if inputs.positions.len() != n {
            return Err(KernelError::length("positions", n, inputs.positions.len()));
        }
        out.check(n, inputs.shift_vectors.len())?;
        list.validate(n, inputs.shift_vectors.len(), out.n_groups())
    }

    /// Evaluates every outer list, accumulating into `out`.
    pub fn evaluate(
        &self,
        list: &NeighborList,
        inputs: &KernelInputs<'_>,
        out: &mut KernelOutput,
    ) -> Result<(), KernelError> {
        self.check(list, inputs, out)?;
        self.evaluate_range(list, 0..list.len(), inputs, out);
        Ok(())
    }

    /// Like [`evaluate`](Self::evaluate), splitting the outer lists into
    /// contiguous chunks on the rayon pool.
    ///
    /// Each chunk accumulates into a private output; the partial outputs are
    /// added in chunk order, so results are reproducible for a given thread
    /// count and differ from the serial pass only in summation order.
    pub fn evaluate_parallel(
        &self,
        list: &NeighborList,
        inputs: &KernelInputs<'_>,
        out: &mut KernelOutput,
    ) -> Result<(), KernelError> {
        self.check(list, inputs, out)?;
        if list.is_empty() {
            return Ok(());
        }
        let n_chunks = (rayon::current_num_threads() * 4).min(list.len());
        let chunk_len = list.len().div_ceil(n_chunks);
        let starts: Vec<usize> = (0..list.len()).step_by(chunk_len).collect();

        let template = out.zeroed_like();
        let partials: Vec<KernelOutput> = starts
            .into_par_iter()
            .map(|start| {
                let mut local = template.clone();
                let end = (start + chunk_len).min(list.len());
                self.evaluate_range(list, start..end, inputs, &mut local);
                local
            })
            .collect();

        for partial in &partials {
            out.accumulate(partial);
        }
        Ok(())
    }

    fn evaluate_range(
        &self,
        list: &NeighborList,
        range: Range<usize>,
        inputs: &KernelInputs<'_>,
        out: &mut KernelOutput,
    ) {
        let params = inputs.params;
        let energies = self.kinds.mode.energies();
        let table = self
            .table
            .filter(|_| self.kinds.elec.uses_table() || self.kinds.vdw.uses_table());
        let mut inner = 0u64;

        for n in range.clone() {
            let i = list.iinr[n];
            let s = list.shift[n];
            let xi = inputs.positions[i];
            let sv = inputs.shift_vectors[s];
            let ix = f32x4::splat(xi[0] + sv[0]);
            let iy = f32x4::splat(xi[1] + sv[1]);
            let iz = f32x4::splat(xi[2] + sv[2]);
            let iq = f32x4::splat(self.epsfac * params.charge(i));
            let ti = params.vdw_type(i);

            let mut fix = f32x4::ZERO;
            let mut fiy = f32x4::ZERO;
            let mut fiz = f32x4::ZERO;
            let mut velec_sum = f32x4::ZERO;
            let mut vvdw_sum = f32x4::ZERO;

            let block = list.block(n);
            inner += block.len() as u64;

            for chunk in block.chunks(LANES) {
                let mut jnr = [None; LANES];
                let mut jx = [0.0; LANES];
                let mut jy = [0.0; LANES];
                let mut jz = [0.0; LANES];
                let mut jq = [0.0; LANES];
                let mut c6 = [0.0; LANES];
                let mut c12 = [0.0; LANES];
                let mut valid = [0.0; LANES];

                for lane in 0..LANES {
                    let entry = chunk.get(lane).copied().unwrap_or(PADDING);
                    let j = usize::try_from(entry).ok();
                    let g = j.unwrap_or(0);
                    let xj = inputs.positions[g];
                    jnr[lane] = j;
                    jx[lane] = xj[0];
                    jy[lane] = xj[1];
                    jz[lane] = xj[2];
                    jq[lane] = params.charge(g);
                    (c6[lane], c12[lane]) = params.pair(ti, params.vdw_type(g));
                    if j.is_some() {
                        valid[lane] = f32::from_bits(u32::MAX);
                    }
                }
                let mask = f32x4::from(valid);

                let dx = ix - f32x4::from(jx);
                let dy = iy - f32x4::from(jy);
                let dz = iz - f32x4::from(jz);
                let rsq = dx * dx + dy * dy + dz * dz;
                let rinv = invsqrt(rsq) & mask;
                let rinvsq = rinv * rinv;
                let r = (rsq * rinv) & mask;

                let knots = table.map(|t| locate(t, r));
                let qq = iq * f32x4::from(jq);
                let (velec, felec) = self.elec(qq, rsq, rinv, rinvsq, knots.as_ref());
                let (vvdw, fvdw) = self.vdw(
                    f32x4::from(c6),
                    f32x4::from(c12),
                    rinv,
                    rinvsq,
                    knots.as_ref(),
                );
                let fscal = (felec + fvdw) & mask;

                if energies {
                    velec_sum += velec & mask;
                    vvdw_sum += vvdw & mask;
                }

                let tx = fscal * dx;
                let ty = fscal * dy;
                let tz = fscal * dz;
                fix += tx;
                fiy += ty;
                fiz += tz;

                let (tx, ty, tz) = (tx.to_array(), ty.to_array(), tz.to_array());
                let mut scratch = [0.0; 3];
                for lane in 0..LANES {
                    let fj = match jnr[lane] {
                        Some(j) => &mut out.forces[j],
                        None => &mut scratch,
                    };
                    fj[0] -= tx[lane];
                    fj[1] -= ty[lane];
                    fj[2] -= tz[lane];
                }
            }

            let fi = [hsum(fix), hsum(fiy), hsum(fiz)];
            for d in 0..3 {
                out.forces[i][d] += fi[d];
                out.shift_forces[s][d] += fi[d];
            }
            if energies {
                let gid = list.gid[n];
                out.elec[gid] += hsum(velec_sum);
                out.vdw[gid] += hsum(vvdw_sum);
            }
        }

        out.flops += inner * self.kinds.inner_flops() + range.len() as u64 * self.kinds.outer_flops();
    }

    /// Electrostatic energy and scalar force over r.
    #[inline(always)]
    fn elec(
        &self,
        qq: f32x4,
        rsq: f32x4,
        rinv: f32x4,
        rinvsq: f32x4,
        knots: Option<&Knots>,
    ) -> (f32x4, f32x4) {
        match (self.kinds.elec, self.table.zip(knots)) {
            (ElecKind::Coulomb, _) => {
                let velec = qq * rinv;
                (velec, velec * rinvsq)
            }
            (ElecKind::ReactionField { k_rf, c_rf }, _) => {
                let krf = f32x4::splat(k_rf);
                let velec = qq * (rinv + krf * rsq - f32x4::splat(c_rf));
                let felec = qq * (rinv * rinvsq - f32x4::splat(2.0) * krf);
                (velec, felec)
            }
            (ElecKind::CubicSplineTable, Some((table, at))) => {
                let (vv, ff) = interpolate(table, at, self.slots.elec);
                let scale = f32x4::splat(table.scale());
                (qq * vv, -(qq * ff * scale * rinv))
            }
            _ => (f32x4::ZERO, f32x4::ZERO),
        }
    }

    /// Van der Waals energy and scalar force over r.
    #[inline(always)]
    fn vdw(
        &self,
        c6: f32x4,
        c12: f32x4,
        rinv: f32x4,
        rinvsq: f32x4,
        knots: Option<&Knots>,
    ) -> (f32x4, f32x4) {
        match (self.kinds.vdw, self.table.zip(knots)) {
            (VdwKind::LennardJones, _) => {
                let rinvsix = rinvsq * rinvsq * rinvsq;
                let vvdw6 = c6 * rinvsix;
                let vvdw12 = c12 * rinvsix * rinvsix;
                let fvdw = (f32x4::splat(12.0) * vvdw12 - f32x4::splat(6.0) * vvdw6) * rinvsq;
                (vvdw12 - vvdw6, fvdw)
            }
            (VdwKind::CubicSplineTable, Some((table, at))) => {
                let (vv6, ff6) = interpolate(table, at, self.slots.disp);
                let (vv12, ff12) = interpolate(table, at, self.slots.rep);
                let scale = f32x4::splat(table.scale());
                let vvdw = c6 * vv6 + c12 * vv12;
                let fvdw = -((c6 * ff6 + c12 * ff12) * scale * rinv);
                (vvdw, fvdw)
            }
            _ => (f32x4::ZERO, f32x4::ZERO),
        }
    }
}

fn slot_offset(
    table: Option<&InteractionTable>,
    slot: Slot,
    interaction: &'static str,
    required: &'static str,
) -> Result<usize, KernelError> {
    table
        .and_then(|t| t.format().offset(slot))
        .ok_or(KernelError::TableMismatch {
            interaction,
            required,
            found: table.map(InteractionTable::format),
        })
}

/// Knot indices and fractional offsets for four distances.
#[inline(always)]
fn locate(table: &InteractionTable, r: f32x4) -> Knots {
    let rt = (r * f32x4::splat(table.scale())).to_array();
    let mut index = [0; LANES];
    let mut eps = [0.0; LANES];
    for lane in 0..LANES {
        (index[lane], eps[lane]) = table.locate(rt[lane]);
    }
    Knots {
        index,
        eps: f32x4::from(eps),
    }
}

/// Gathers one slot's coefficients and evaluates `(V, dV/deps)`.
#[inline(always)]
fn interpolate(table: &InteractionTable, at: &Knots, offset: usize) -> (f32x4, f32x4) {
    let mut c = [[0.0; LANES]; 4];
    for lane in 0..LANES {
        let k = table.coefficients(at.index[lane], offset);
        for m in 0..4 {
            c[m][lane] = k[m];
        }
    }
    let [y, f, g, h] = c.map(f32x4::from);
    let eps = at.eps;
    let fp = f + eps * (g + eps * h);
    let vv = y + eps * fp;
    let ff = fp + eps * (g + f32x4::splat(2.0) * eps * h);
    (vv, ff)
}

#[inline(always)]
fn hsum(v: f32x4) -> f32 {
    let a = v.to_array();
    (a[0] + a[1]) + (a[2] + a[3])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::neighbor::shift_vectors;
    use crate::kernel::params::EnergyMode;
    use crate::kernel::reference;
    use crate::kernel::table::TableFormat;
    use crate::kernel::testing::Fixture;

    fn kinds(elec: ElecKind, vdw: VdwKind) -> InteractionKinds {
        InteractionKinds::new(elec, vdw, EnergyMode::PotentialAndForce)
    }

    fn reaction_field() -> ElecKind {
        let rc = crate::kernel::testing::CUTOFF;
        let k_rf = 1.0 / (2.0 * rc * rc * rc);
        ElecKind::ReactionField {
            k_rf,
            c_rf: 1.0 / rc + k_rf * rc * rc,
        }
    }

    /// Runs both partitions of the fixture: vdW lists with `kinds`, the
    /// Coulomb-only lists with van der Waals switched off.
    fn run(fx: &Fixture, kinds: InteractionKinds, parallel: bool) -> KernelOutput {
        let inputs = fx.inputs();
        let mut out = KernelOutput::new(fx.positions.len(), fx.shifts.len(), 1);
        let vdw = PairwiseKernel::new(kinds, Some(&fx.table)).unwrap();
        let coulomb = (!kinds.elec.is_none())
            .then(|| PairwiseKernel::new(kinds.without_vdw(), Some(&fx.table)).unwrap());
        let mut passes = vec![(vdw, &fx.lists.vdw)];
        passes.extend(coulomb.map(|k| (k, &fx.lists.coulomb)));
        for (kernel, list) in passes {
            if parallel {
                kernel.evaluate_parallel(list, &inputs, &mut out).unwrap();
            } else {
                kernel.evaluate(list, &inputs, &mut out).unwrap();
            }
        }
        out
    }

    fn max_abs(forces: &[[f32; 3]]) -> f32 {
        forces.iter().flatten().fold(0.0_f32, |m, &f| m.max(f.abs()))
    }

    #[test]
    fn two_particle_forces_are_exactly_opposite() {
        let params = ParticleParams::geometric(vec![0.5, -0.4], vec![0, 0], &[(2.6e-3, 2.6e-6)]).unwrap();
        let positions = [[0.0, 0.0, 0.0], [0.31, 0.12, -0.05]];
        let shifts = shift_vectors(None);
        let inputs = KernelInputs {
            positions: &positions,
            shift_vectors: &shifts,
            params: &params,
        };
        let mut list = NeighborList::new();
        list.push(0, 0, 0, &[1]);

        let kernel = PairwiseKernel::new(kinds(ElecKind::Coulomb, VdwKind::LennardJones), None).unwrap();
        let mut out = KernelOutput::new(2, 1, 1);
        kernel.evaluate(&list, &inputs, &mut out).unwrap();

        assert_eq!(out.forces[0], out.forces[1].map(|f| -f));
        assert_eq!(out.shift_forces[0], out.forces[0]);
        assert!(out.forces[0][0] > 0.0, "opposite charges attract");
        assert!(out.elec[0] < 0.0);
    }

    #[test]
    fn net_internal_force_vanishes() {
        let fx = Fixture::lattice(7);
        for k in [
            kinds(ElecKind::Coulomb, VdwKind::CubicSplineTable),
            kinds(reaction_field(), VdwKind::LennardJones),
            kinds(ElecKind::CubicSplineTable, VdwKind::CubicSplineTable),
        ] {
            let out = run(&fx, k, false);
            let abs_sum: f64 = out.forces.iter().flatten().map(|f| f.abs() as f64).sum();
            for component in out.net_force() {
                assert!(component.abs() < 1e-5 * abs_sum, "{k:?}: net force {component}");
            }
        }
    }

    #[test]
    fn padding_is_bit_identical_to_absence() {
        let fx = Fixture::lattice(11);
        let inputs = fx.inputs();
        let kernel =
            PairwiseKernel::new(kinds(ElecKind::Coulomb, VdwKind::CubicSplineTable), Some(&fx.table)).unwrap();

        let mut bare = NeighborList::new();
        let mut padded = NeighborList::new();
        for n in 0..fx.lists.vdw.len() {
            let real: Vec<i32> = fx.lists.vdw.block(n).iter().copied().filter(|&j| j >= 0).collect();
            let (i, s, g) = (fx.lists.vdw.iinr[n], fx.lists.vdw.shift[n], fx.lists.vdw.gid[n]);
            bare.push_block(i, s, g, &real);
            let mut extended = real.clone();
            extended.resize(real.len().div_ceil(LANES) * LANES + LANES, PADDING);
            padded.push_block(i, s, g, &extended);
        }

        let mut a = KernelOutput::new(fx.positions.len(), fx.shifts.len(), 1);
        let mut b = a.clone();
        kernel.evaluate(&bare, &inputs, &mut a).unwrap();
        kernel.evaluate(&padded, &inputs, &mut b).unwrap();
        assert_eq!(a.forces, b.forces);
        assert_eq!(a.shift_forces, b.shift_forces);
        assert_eq!(a.elec, b.elec);
        assert_eq!(a.vdw, b.vdw);
    }

    #[test]
    fn force_only_mode_gives_identical_forces() {
        let fx = Fixture::lattice(3);
        for (elec, vdw) in [
            (ElecKind::Coulomb, VdwKind::CubicSplineTable),
            (reaction_field(), VdwKind::LennardJones),
            (ElecKind::CubicSplineTable, VdwKind::CubicSplineTable),
        ] {
            let energy = run(&fx, InteractionKinds::new(elec, vdw, EnergyMode::PotentialAndForce), false);
            let force = run(&fx, InteractionKinds::new(elec, vdw, EnergyMode::Force), false);
            assert_eq!(energy.forces, force.forces);
            assert_eq!(energy.shift_forces, force.shift_forces);
            assert_eq!(force.total_elec(), 0.0);
            assert_eq!(force.total_vdw(), 0.0);
            assert!(energy.total_vdw() != 0.0);
        }
    }

    #[test]
    fn agrees_with_scalar_reference() {
        let fx = Fixture::lattice(5);
        let inputs = fx.inputs();
        for (elec, vdw) in [
            (ElecKind::Coulomb, VdwKind::CubicSplineTable),
            (ElecKind::Coulomb, VdwKind::LennardJones),
            (reaction_field(), VdwKind::CubicSplineTable),
            (ElecKind::CubicSplineTable, VdwKind::CubicSplineTable),
            (ElecKind::None, VdwKind::LennardJones),
        ] {
            let kernel = PairwiseKernel::new(kinds(elec, vdw), Some(&fx.table)).unwrap();
            let mut out = KernelOutput::new(fx.positions.len(), fx.shifts.len(), 1);
            kernel.evaluate(&fx.lists.vdw, &inputs, &mut out).unwrap();
            let expected = reference::evaluate(&kernel, &fx.lists.vdw, &inputs).unwrap();

            let force_scale = expected
                .forces
                .iter()
                .flatten()
                .fold(0.0_f64, |m, &f| m.max(f.abs()));
            for (got, want) in out.forces.iter().zip(&expected.forces) {
                for d in 0..3 {
                    assert!(
                        (got[d] as f64 - want[d]).abs() <= 1e-4 * force_scale,
                        "{elec:?}/{vdw:?}: {got:?} vs {want:?}"
                    );
                }
            }
            let elec_ref = expected.elec[0];
            let vdw_ref = expected.vdw[0];
            assert!((out.total_elec() - elec_ref).abs() <= 1e-4 * elec_ref.abs().max(100.0));
            assert!((out.total_vdw() - vdw_ref).abs() <= 1e-4 * vdw_ref.abs().max(1.0));
        }
    }

    #[test]
    fn tabulated_lj_tracks_analytic_lj() {
        let fx = Fixture::lattice(13);
        let analytic = run(&fx, kinds(ElecKind::None, VdwKind::LennardJones), false);
        let tabulated = run(&fx, kinds(ElecKind::None, VdwKind::CubicSplineTable), false);
        let scale = max_abs(&analytic.forces);
        for (a, t) in analytic.forces.iter().zip(&tabulated.forces) {
            for d in 0..3 {
                assert!((a[d] - t[d]).abs() <= 1e-4 * scale);
            }
        }
        let v = analytic.total_vdw();
        assert!((v - tabulated.total_vdw()).abs() <= 1e-4 * v.abs());
    }

    #[test]
    fn parallel_matches_serial() {
        let fx = Fixture::lattice(17);
        let k = kinds(ElecKind::Coulomb, VdwKind::CubicSplineTable);
        let serial = run(&fx, k, false);
        let parallel = run(&fx, k, true);
        assert_eq!(serial.flops, parallel.flops);
        let scale = max_abs(&serial.forces);
        for (a, b) in serial.forces.iter().zip(&parallel.forces) {
            for d in 0..3 {
                assert!((a[d] - b[d]).abs() <= 1e-5 * scale);
            }
        }
        let e = serial.total_elec();
        assert!((e - parallel.total_elec()).abs() <= 1e-5 * e.abs().max(100.0));
    }

    #[test]
    fn flop_counts_include_padding() {
        let fx = Fixture::lattice(1);
        let inputs = fx.inputs();
        let wide_table = InteractionTable::tabulate(TableFormat::CoulombVdw, 500.0, 4.0).unwrap();
        let mut list = NeighborList::new();
        list.push(0, 13, 0, &[1, 2, 3]);
        list.push(1, 13, 0, &[2, 3, 4, 5, 6]);

        for (mode, inner, outer) in [(EnergyMode::Force, 55, 7), (EnergyMode::PotentialAndForce, 64, 9)] {
            let k = InteractionKinds::new(ElecKind::Coulomb, VdwKind::CubicSplineTable, mode);
            let kernel = PairwiseKernel::new(k, Some(&wide_table)).unwrap();
            let mut out = KernelOutput::new(fx.positions.len(), fx.shifts.len(), 1);
            kernel.evaluate(&list, &inputs, &mut out).unwrap();
            assert_eq!(out.flops, 12 * inner + 2 * outer);
        }
    }

    #[test]
    fn energies_land_in_group_bins() {
        let params = ParticleParams::geometric(vec![0.5, -0.5, 0.5], vec![0, 0, 0], &[(2.6e-3, 2.6e-6)])
            .unwrap()
            .with_groups(vec![0, 0, 1])
            .unwrap();
        let positions = [[0.0, 0.0, 0.0], [0.4, 0.0, 0.0], [0.0, 0.4, 0.0]];
        let shifts = shift_vectors(None);
        let inputs = KernelInputs {
            positions: &positions,
            shift_vectors: &shifts,
            params: &params,
        };
        let mut list = NeighborList::new();
        list.push(0, 0, 0, &[1]);
        list.push(2, 0, 1, &[0]);

        let kernel = PairwiseKernel::new(kinds(ElecKind::Coulomb, VdwKind::None), None).unwrap();
        let mut out = KernelOutput::new(3, 1, 2);
        kernel.evaluate(&list, &inputs, &mut out).unwrap();
        assert!(out.elec[0] < 0.0);
        assert!(out.elec[1] > 0.0);
        assert_eq!(out.vdw, vec![0.0, 0.0]);
        let expected = ONE_4PI_EPS0 * 0.25 / 0.4;
        assert!((out.elec[1] - expected).abs() < 1e-4 * expected);
    }

    #[test]
    fn setup_errors() {
        let vdw_table = InteractionTable::tabulate(TableFormat::Vdw, 500.0, 1.0).unwrap();
        assert_eq!(
            PairwiseKernel::new(kinds(ElecKind::None, VdwKind::None), None).unwrap_err(),
            KernelError::NoInteraction
        );
        assert!(matches!(
            PairwiseKernel::new(kinds(ElecKind::CubicSplineTable, VdwKind::None), Some(&vdw_table)),
            Err(KernelError::TableMismatch {
                found: Some(TableFormat::Vdw),
                ..
            })
        ));
        assert!(matches!(
            PairwiseKernel::new(kinds(ElecKind::Coulomb, VdwKind::CubicSplineTable), None),
            Err(KernelError::TableMismatch { found: None, .. })
        ));
        assert!(PairwiseKernel::new(kinds(ElecKind::Coulomb, VdwKind::CubicSplineTable), Some(&vdw_table)).is_ok());
    }

    #[test]
    fn evaluation_rejects_mismatched_output() {
        let fx = Fixture::lattice(2);
        let kernel = PairwiseKernel::new(kinds(ElecKind::Coulomb, VdwKind::LennardJones), None).unwrap();
        let mut out = KernelOutput::new(fx.positions.len() - 1, fx.shifts.len(), 1);
        assert!(matches!(
            kernel.evaluate(&fx.lists.vdw, &fx.inputs(), &mut out),
            Err(KernelError::LengthMismatch { what: "forces", .. })
        ));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn short_table_panics() {
        let fx = Fixture::lattice(4);
        let short = InteractionTable::tabulate(TableFormat::Vdw, 500.0, 0.3).unwrap();
        let kernel = PairwiseKernel::new(kinds(ElecKind::Coulomb, VdwKind::CubicSplineTable), Some(&short)).unwrap();
        let mut out = KernelOutput::new(fx.positions.len(), fx.shifts.len(), 1);
        let _ = kernel.evaluate(&fx.lists.vdw, &fx.inputs(), &mut out);
    }
}
