//! Cubic-spline interaction tables.
//!
//! A table samples one or more radial functions on a uniform grid with
//! spacing `1 / scale`. Every knot stores four coefficients `(Y, F, G, H)`
//! per function so that within the interval starting at knot `n`
//!
//! ```text
//! V(eps)  = Y + eps * (F + eps * (G + eps * H))
//! FF(eps) = F + 2 * G * eps + 3 * H * eps^2        (= dV/deps)
//! ```
//!
//! with `eps = r * scale - n`. The functions of one knot are stored next to
//! each other, so dispersion and repulsion are reached from the same base
//! index by adding 0 or 4.

use super::error::KernelError;

/// Radial function stored in a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// `1 / r`
    Coulomb,
    /// `-1 / r^6`
    Dispersion,
    /// `1 / r^12`
    Repulsion,
}

impl Slot {
    /// The tabulated function and its derivative at `r`.
    pub fn evaluate(self, r: f64) -> (f64, f64) {
        match self {
            Slot::Coulomb => (1.0 / r, -1.0 / (r * r)),
            Slot::Dispersion => (-r.powi(-6), 6.0 * r.powi(-7)),
            Slot::Repulsion => (r.powi(-12), -12.0 * r.powi(-13)),
        }
    }
}

/// Which functions a table holds, and at which offset within a knot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// Coulomb only; stride 4.
    Coulomb,
    /// Dispersion at 0, repulsion at 4; stride 8.
    Vdw,
    /// Coulomb at 0, dispersion at 4, repulsion at 8; stride 12.
    CoulombVdw,
}

impl TableFormat {
    pub const fn stride(self) -> usize {
        match self {
            TableFormat::Coulomb => 4,
            TableFormat::Vdw => 8,
            TableFormat::CoulombVdw => 12,
        }
    }

    pub const fn offset(self, slot: Slot) -> Option<usize> {
        match (self, slot) {
            (TableFormat::Coulomb, Slot::Coulomb) => Some(0),
            (TableFormat::Vdw, Slot::Dispersion) => Some(0),
            (TableFormat::Vdw, Slot::Repulsion) => Some(4),
            (TableFormat::CoulombVdw, Slot::Coulomb) => Some(0),
            (TableFormat::CoulombVdw, Slot::Dispersion) => Some(4),
            (TableFormat::CoulombVdw, Slot::Repulsion) => Some(8),
            _ => None,
        }
    }

    pub const fn slots(self) -> &'static [Slot] {
        match self {
            TableFormat::Coulomb => &[Slot::Coulomb],
            TableFormat::Vdw => &[Slot::Dispersion, Slot::Repulsion],
            TableFormat::CoulombVdw => &[Slot::Coulomb, Slot::Dispersion, Slot::Repulsion],
        }
    }

    pub const fn has_coulomb(self) -> bool {
        self.offset(Slot::Coulomb).is_some()
    }

    pub const fn has_vdw(self) -> bool {
        self.offset(Slot::Dispersion).is_some()
    }
}

/// Knots closer than this are left at zero; the tabulated functions are
/// singular at the origin and never sampled there by a sane cutoff scheme.
pub const TABLE_MIN_DISTANCE: f64 = 0.04;

#[derive(Debug, Clone, PartialEq)]
pub struct InteractionTable {
    data: Vec<f32>,
    scale: f32,
    format: TableFormat,
    n_knots: usize,
}

impl InteractionTable {
    /// Wraps precomputed table data.
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::MalformedTable`] if `scale` is not a positive
    /// finite number, if the data length is not a multiple of the knot
    /// stride, or if fewer than two knots are present.
    pub fn from_raw(data: Vec<f32>, scale: f32, format: TableFormat) -> Result<Self, KernelError> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(KernelError::MalformedTable(format!("invalid scale {scale}")));
        }
        let stride = format.stride();
        if data.len() % stride != 0 {
            return Err(KernelError::MalformedTable(format!(
                "{} values is not a multiple of the knot stride {}",
                data.len(),
                stride
            )));
        }
        let n_knots = data.len() / stride;
        if n_knots < 2 {
            return Err(KernelError::MalformedTable(format!(
                "{n_knots} knots, at least 2 are required"
            )));
        }
        Ok(Self {
            data,
            scale,
            format,
            n_knots,
        })
    }

    /// Tabulates the standard functions of `format` up to `r_max`.
    ///
    /// One extra knot beyond `r_max` is stored so that any distance up to
    /// and including `r_max` has a complete interval.
    pub fn tabulate(format: TableFormat, scale: f64, r_max: f64) -> Result<Self, KernelError> {
        if !(scale.is_finite() && scale > 0.0 && r_max.is_finite() && r_max > 0.0) {
            return Err(KernelError::MalformedTable(format!(
                "cannot tabulate with scale {scale} up to {r_max}"
            )));
        }
        let n_knots = (r_max * scale).floor() as usize + 2;
        Self::tabulate_with(format, scale, n_knots, |slot, r| slot.evaluate(r))
    }

    /// Tabulates arbitrary functions given as `(V(r), dV/dr(r))` per slot.
    pub fn tabulate_with(
        format: TableFormat,
        scale: f64,
        n_knots: usize,
        f: impl Fn(Slot, f64) -> (f64, f64),
    ) -> Result<Self, KernelError> {
        let stride = format.stride();
        let h = 1.0 / scale;
        let mut data = vec![0.0_f32; n_knots * stride];

        for n in 0..n_knots {
            let r0 = n as f64 * h;
            if n == 0 || r0 < TABLE_MIN_DISTANCE {
                continue;
            }
            let r1 = r0 + h;
            for &slot in format.slots() {
                let (v0, d0) = f(slot, r0);
                let (v1, d1) = f(slot, r1);
                let dv = v1 - v0;
                let coefficients = [
                    v0,
                    h * d0,
                    3.0 * dv - h * (2.0 * d0 + d1),
                    -2.0 * dv + h * (d0 + d1),
                ];
                let base = n * stride + format.offset(slot).unwrap_or(0);
                for (k, c) in coefficients.into_iter().enumerate() {
                    data[base + k] = c as f32;
                }
            }
        }

        Self::from_raw(data, scale as f32, format)
    }

    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    #[inline]
    pub fn format(&self) -> TableFormat {
        self.format
    }

    #[inline]
    pub fn n_knots(&self) -> usize {
        self.n_knots
    }

    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Largest distance with a complete interval.
    pub fn max_distance(&self) -> f32 {
        (self.n_knots - 1) as f32 / self.scale
    }

    /// Splits `r * scale` into a knot index and fractional offset.
    ///
    /// # Panics
    ///
    /// Panics if the knot lies outside the table, which means the table was
    /// built for a shorter cutoff than the neighbor list uses.
    #[inline(always)]
    pub fn locate(&self, rt: f32) -> (usize, f32) {
        let n = rt as usize;
        assert!(
            n < self.n_knots,
            "table index {} out of range: table has {} knots (r = {}, scale = {}); \
             the table is too short for the interaction cutoff",
            n,
            self.n_knots,
            rt / self.scale,
            self.scale
        );
        (n, rt - n as f32)
    }

    /// The four spline coefficients of `slot` at knot `n`.
    #[inline(always)]
    pub fn coefficients(&self, n: usize, offset: usize) -> [f32; 4] {
        let base = n * self.format.stride() + offset;
        [
            self.data[base],
            self.data[base + 1],
            self.data[base + 2],
            self.data[base + 3],
        ]
    }

    /// Interpolated value and `dV/deps` of `slot` at distance `r`, in double precision.
    pub fn interpolate(&self, slot: Slot, r: f64) -> Option<(f64, f64)> {
        let offset = self.format.offset(slot)?;
        let rt = r * self.scale as f64;
        let n = rt.floor() as usize;
        if n >= self.n_knots {
            return None;
        }
        let eps = rt - n as f64;
        let [y, f, g, h] = self.coefficients(n, offset).map(f64::from);
        let value = y + eps * (f + eps * (g + eps * h));
        let derivative = f + eps * (2.0 * g + 3.0 * eps * h);
        Some((value, derivative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_layout() {
        assert_eq!(TableFormat::Vdw.offset(Slot::Dispersion), Some(0));
        assert_eq!(TableFormat::Vdw.offset(Slot::Repulsion), Some(4));
        assert_eq!(TableFormat::Vdw.offset(Slot::Coulomb), None);
        assert_eq!(TableFormat::CoulombVdw.offset(Slot::Repulsion), Some(8));
        assert_eq!(TableFormat::CoulombVdw.stride(), 12);
        assert!(TableFormat::Coulomb.has_coulomb());
        assert!(!TableFormat::Coulomb.has_vdw());
    }

    #[test]
    fn knot_values_are_exact() {
        let table = InteractionTable::tabulate(TableFormat::Vdw, 512.0, 1.2).unwrap();
        for n in [30, 100, 255, 512, 600] {
            let r = n as f64 / 512.0;
            for slot in [Slot::Dispersion, Slot::Repulsion] {
                let offset = TableFormat::Vdw.offset(slot).unwrap();
                let y = table.coefficients(n, offset)[0] as f64;
                let (value, _) = table.interpolate(slot, r).unwrap();
                assert_eq!(value, y);
                assert_eq!(y, slot.evaluate(r).0 as f32 as f64);
            }
        }
    }

    #[test]
    fn interpolation_matches_analytic_functions() {
        let table = InteractionTable::tabulate(TableFormat::CoulombVdw, 500.0, 1.5).unwrap();
        let scale = table.scale() as f64;
        let mut r = 0.25;
        while r < 1.5 {
            for slot in [Slot::Coulomb, Slot::Dispersion, Slot::Repulsion] {
                let (v, dv) = slot.evaluate(r);
                let (tv, tff) = table.interpolate(slot, r).unwrap();
                assert!(((tv - v) / v).abs() < 1e-5, "{slot:?} value at {r}");
                assert!(((tff * scale - dv) / dv).abs() < 1e-4, "{slot:?} derivative at {r}");
            }
            r += 0.0137;
        }
    }

    #[test]
    fn short_distances_are_zeroed() {
        let table = InteractionTable::tabulate(TableFormat::Coulomb, 500.0, 1.0).unwrap();
        assert_eq!(table.coefficients(0, 0), [0.0; 4]);
        assert_eq!(table.coefficients(10, 0), [0.0; 4]);
        assert_ne!(table.coefficients(25, 0), [0.0; 4]);
    }

    #[test]
    fn table_covers_requested_range() {
        let table = InteractionTable::tabulate(TableFormat::Vdw, 500.0, 1.0).unwrap();
        assert_eq!(table.n_knots(), 502);
        assert!(table.max_distance() >= 1.0);
        let (n, eps) = table.locate(1.0 * table.scale());
        assert_eq!(n, 500);
        assert_eq!(eps, 0.0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn locate_past_the_end_panics() {
        let table = InteractionTable::tabulate(TableFormat::Vdw, 100.0, 1.0).unwrap();
        table.locate(2.0 * table.scale());
    }

    #[test]
    fn rejects_malformed_data() {
        assert!(matches!(
            InteractionTable::from_raw(vec![0.0; 10], 500.0, TableFormat::Vdw),
            Err(KernelError::MalformedTable(_))
        ));
        assert!(matches!(
            InteractionTable::from_raw(vec![0.0; 16], 0.0, TableFormat::Vdw),
            Err(KernelError::MalformedTable(_))
        ));
        assert!(matches!(
            InteractionTable::from_raw(vec![0.0; 8], 500.0, TableFormat::Vdw),
            Err(KernelError::MalformedTable(_))
        ));
        assert!(InteractionTable::from_raw(vec![0.0; 16], 500.0, TableFormat::Vdw).is_ok());
    }
}
