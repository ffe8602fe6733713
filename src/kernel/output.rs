use super::error::KernelError;

/// Accumulators written by one or more kernel passes.
///
/// Nothing is cleared between passes; call [`KernelOutput::clear`] when a
/// fresh step begins.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelOutput {
    pub forces: Vec<[f32; 3]>,
    /// Total force on outer particles per shift vector, for the virial.
    pub shift_forces: Vec<[f32; 3]>,
    /// Electrostatic energy per energy group.
    pub elec: Vec<f32>,
    /// Van der Waals energy per energy group.
    pub vdw: Vec<f32>,
    pub flops: u64,
}

impl KernelOutput {
    pub fn new(n_particles: usize, n_shifts: usize, n_groups: usize) -> Self {
        Self {
            forces: vec![[0.0; 3]; n_particles],
            shift_forces: vec![[0.0; 3]; n_shifts],
            elec: vec![0.0; n_groups],
            vdw: vec![0.0; n_groups],
            flops: 0,
        }
    }

    /// An empty output with the same dimensions.
    pub fn zeroed_like(&self) -> Self {
        Self::new(self.forces.len(), self.shift_forces.len(), self.elec.len())
    }

    pub fn clear(&mut self) {
        self.forces.fill([0.0; 3]);
        self.shift_forces.fill([0.0; 3]);
        self.elec.fill(0.0);
        self.vdw.fill(0.0);
        self.flops = 0;
    }

    #[inline]
    pub fn n_groups(&self) -> usize {
        self.elec.len()
    }

    pub(crate) fn check(&self, n_particles: usize, n_shifts: usize) -> Result<(), KernelError> {
        if self.forces.len() != n_particles {
            return Err(KernelError::length("forces", n_particles, self.forces.len()));
        }
        if self.shift_forces.len() != n_shifts {
            return Err(KernelError::length("shift forces", n_shifts, self.shift_forces.len()));
        }
        if self.vdw.len() != self.elec.len() {
            return Err(KernelError::length("vdW energy groups", self.elec.len(), self.vdw.len()));
        }
        Ok(())
    }

    /// Adds another output of the same dimensions into this one.
    pub fn accumulate(&mut self, other: &KernelOutput) {
        add_vectors(&mut self.forces, &other.forces);
        add_vectors(&mut self.shift_forces, &other.shift_forces);
        for (a, b) in self.elec.iter_mut().zip(&other.elec) {
            *a += b;
        }
        for (a, b) in self.vdw.iter_mut().zip(&other.vdw) {
            *a += b;
        }
        self.flops += other.flops;
    }

    pub fn total_elec(&self) -> f64 {
        self.elec.iter().map(|&e| e as f64).sum()
    }

    pub fn total_vdw(&self) -> f64 {
        self.vdw.iter().map(|&e| e as f64).sum()
    }

    /// Sum of all particle forces; zero up to rounding after a complete pass.
    pub fn net_force(&self) -> [f64; 3] {
        let mut net = [0.0; 3];
        for f in &self.forces {
            for d in 0..3 {
                net[d] += f[d] as f64;
            }
        }
        net
    }

    /// Shift contribution to the virial, `-1/2 sum_s shift_s (x) fshift_s`.
    pub fn shift_virial(&self, shift_vectors: &[[f32; 3]]) -> [[f64; 3]; 3] {
        let mut virial = [[0.0; 3]; 3];
        for (s, f) in shift_vectors.iter().zip(&self.shift_forces) {
            for a in 0..3 {
                for b in 0..3 {
                    virial[a][b] -= 0.5 * s[a] as f64 * f[b] as f64;
                }
            }
        }
        virial
    }
}

fn add_vectors(into: &mut [[f32; 3]], from: &[[f32; 3]]) {
    for (a, b) in into.iter_mut().zip(from) {
        a[0] += b[0];
        a[1] += b[1];
        a[2] += b[2];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulate_and_clear() {
        let mut a = KernelOutput::new(2, 1, 2);
        let mut b = a.zeroed_like();
        b.forces[1] = [1.0, -2.0, 0.5];
        b.elec[1] = 3.0;
        b.flops = 10;
        a.accumulate(&b);
        a.accumulate(&b);
        assert_eq!(a.forces[1], [2.0, -4.0, 1.0]);
        assert_eq!(a.total_elec(), 6.0);
        assert_eq!(a.flops, 20);

        a.clear();
        assert_eq!(a, KernelOutput::new(2, 1, 2));
    }

    #[test]
    fn virial_from_shift_forces() {
        let mut out = KernelOutput::new(0, 2, 1);
        out.shift_forces[1] = [2.0, 0.0, 0.0];
        let virial = out.shift_virial(&[[0.0; 3], [3.0, 0.0, 1.0]]);
        assert_eq!(virial[0][0], -3.0);
        assert_eq!(virial[2][0], -1.0);
        assert_eq!(virial[0][1], 0.0);
    }

    #[test]
    fn dimension_checks() {
        let out = KernelOutput::new(3, 1, 1);
        assert!(out.check(3, 1).is_ok());
        assert!(matches!(
            out.check(4, 1),
            Err(KernelError::LengthMismatch { what: "forces", .. })
        ));
    }
}
