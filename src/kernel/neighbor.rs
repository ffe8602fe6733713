//! Neighbor lists in outer/inner form, plus a brute-force search.
//!
//! A [`NeighborList`] stores, for every outer list `n`, the outer particle
//! `iinr[n]`, its periodic shift `shift[n]`, its energy group `gid[n]`, and
//! the inner particles `jjnr[jindex[n]..jindex[n + 1]]`. Inner blocks may be
//! padded with negative sentinels; the kernel masks those lanes.
//!
//! The search in this module is quadratic and meant for tests and small
//! systems. Production lists come from a spatial search upstream.

use super::error::KernelError;
use super::params::ParticleParams;
use crate::model::topology::Exclusions;
use std::collections::BTreeMap;

/// Number of inner particles processed together by the kernel.
pub const LANES: usize = 4;

/// Inner-list entry marking a padding lane.
pub const PADDING: i32 = -1;

/// Index of the zero vector in [`shift_vectors`] for a periodic box.
pub const CENTRAL_SHIFT: usize = 13;

/// Shift vectors for a cubic periodic box, or the single zero vector.
///
/// Periodic boxes get 27 vectors with index `9 (kz + 1) + 3 (ky + 1) + (kx + 1)`
/// for image offsets `k` in `-1..=1`.
pub fn shift_vectors(box_length: Option<f32>) -> Vec<[f32; 3]> {
    let Some(l) = box_length else {
        return vec![[0.0; 3]];
    };
    let mut shifts = Vec::with_capacity(27);
    for kz in -1..=1 {
        for ky in -1..=1 {
            for kx in -1..=1 {
                shifts.push([kx as f32 * l, ky as f32 * l, kz as f32 * l]);
            }
        }
    }
    shifts
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborList {
    pub iinr: Vec<usize>,
    pub jindex: Vec<usize>,
    pub jjnr: Vec<i32>,
    pub shift: Vec<usize>,
    pub gid: Vec<usize>,
}

impl Default for NeighborList {
    fn default() -> Self {
        Self::new()
    }
}

impl NeighborList {
    pub fn new() -> Self {
        Self {
            iinr: Vec::new(),
            jindex: vec![0],
            jjnr: Vec::new(),
            shift: Vec::new(),
            gid: Vec::new(),
        }
    }

    /// Appends an outer list, padding the inner block to a multiple of [`LANES`].
    pub fn push(&mut self, i: usize, shift: usize, gid: usize, js: &[usize]) {
        let padded = js.len().div_ceil(LANES) * LANES;
        let mut block: Vec<i32> = js.iter().map(|&j| j as i32).collect();
        block.resize(padded, PADDING);
        self.push_block(i, shift, gid, &block);
    }

    /// Appends an outer list with the inner block exactly as given.
    pub fn push_block(&mut self, i: usize, shift: usize, gid: usize, block: &[i32]) {
        self.iinr.push(i);
        self.shift.push(shift);
        self.gid.push(gid);
        self.jjnr.extend_from_slice(block);
        self.jindex.push(self.jjnr.len());
    }

    /// Number of outer lists.
    #[inline]
    pub fn len(&self) -> usize {
        self.iinr.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.iinr.is_empty()
    }

    #[inline]
    pub fn block(&self, n: usize) -> &[i32] {
        &self.jjnr[self.jindex[n]..self.jindex[n + 1]]
    }

    /// Number of real (non-padding) pairs.
    pub fn pair_count(&self) -> usize {
        self.jjnr.iter().filter(|&&j| j >= 0).count()
    }

    /// Number of inner-loop iterations, padding included.
    pub fn inner_iterations(&self) -> usize {
        self.jjnr.len()
    }

    /// Checks structure and index ranges against the data the kernel will read.
    pub fn validate(&self, n_particles: usize, n_shifts: usize, n_groups: usize) -> Result<(), KernelError> {
        let n = self.iinr.len();
        if self.jindex.len() != n + 1 {
            return Err(KernelError::length("jindex", n + 1, self.jindex.len()));
        }
        if self.shift.len() != n {
            return Err(KernelError::length("shift", n, self.shift.len()));
        }
        if self.gid.len() != n {
            return Err(KernelError::length("gid", n, self.gid.len()));
        }
        if self.jindex[0] != 0 {
            return Err(KernelError::MalformedList(format!(
                "jindex starts at {}, expected 0",
                self.jindex[0]
            )));
        }
        if let Some(w) = self.jindex.windows(2).position(|w| w[1] < w[0]) {
            return Err(KernelError::MalformedList(format!(
                "jindex decreases at list {w}"
            )));
        }
        if self.jindex[n] != self.jjnr.len() {
            return Err(KernelError::MalformedList(format!(
                "jindex ends at {}, but jjnr has {} entries",
                self.jindex[n],
                self.jjnr.len()
            )));
        }

        for list in 0..n {
            let out_of_range = |particle: usize| KernelError::ParticleOutOfRange {
                list,
                particle,
                n_particles,
            };
            if self.iinr[list] >= n_particles {
                return Err(out_of_range(self.iinr[list]));
            }
            if let Some(&j) = self.block(list).iter().find(|&&j| j >= 0 && j as usize >= n_particles) {
                return Err(out_of_range(j as usize));
            }
            if self.shift[list] >= n_shifts {
                return Err(KernelError::ShiftOutOfRange {
                    list,
                    shift: self.shift[list],
                    n_shifts,
                });
            }
            if self.gid[list] >= n_groups {
                return Err(KernelError::GroupOutOfRange {
                    list,
                    group: self.gid[list],
                    n_groups,
                });
            }
        }
        Ok(())
    }
}

/// Lists produced by the search, partitioned by interaction membership.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NeighborLists {
    /// Pairs where both particles carry van der Waals parameters.
    pub vdw: NeighborList,
    /// Pairs that only interact electrostatically.
    pub coulomb: NeighborList,
}

impl NeighborLists {
    pub fn pair_count(&self) -> usize {
        self.vdw.pair_count() + self.coulomb.pair_count()
    }
}

/// Brute-force pair search within a cutoff, optionally in a cubic periodic box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairSearch {
    pub cutoff: f32,
    pub box_length: Option<f32>,
}

impl PairSearch {
    pub fn new(cutoff: f32, box_length: Option<f32>) -> Self {
        Self { cutoff, box_length }
    }

    /// Finds every pair `i < j` closer than the cutoff, skipping excluded
    /// pairs. Each pair appears once, under the outer particle `i` and the
    /// shift that brings the image of `i` closest to `j`.
    pub fn run(
        &self,
        positions: &[[f32; 3]],
        params: &ParticleParams,
        exclusions: Option<&Exclusions>,
    ) -> Result<NeighborLists, KernelError> {
        if positions.len() != params.len() {
            return Err(KernelError::length("positions", params.len(), positions.len()));
        }
        let cutoff_valid = self.cutoff.is_finite()
            && self.cutoff > 0.0
            && self.box_length.is_none_or(|l| self.cutoff < 0.5 * l);
        if !cutoff_valid {
            return Err(KernelError::InvalidCutoff {
                cutoff: self.cutoff,
                box_length: self.box_length,
            });
        }
        if let Some(l) = self.box_length {
            if let Some(particle) = positions
                .iter()
                .position(|x| x.iter().any(|&c| !(0.0..l).contains(&c)))
            {
                return Err(KernelError::OutsideBox {
                    particle,
                    box_length: l,
                });
            }
        }

        let rc2 = self.cutoff * self.cutoff;
        let mut lists = NeighborLists::default();
        for i in 0..positions.len() {
            let mut by_shift: BTreeMap<usize, (Vec<usize>, Vec<usize>)> = BTreeMap::new();
            for j in i + 1..positions.len() {
                if exclusions.is_some_and(|e| e.contains(i, j)) {
                    continue;
                }
                let (shift, d) = self.image(positions[i], positions[j]);
                if d[0] * d[0] + d[1] * d[1] + d[2] * d[2] >= rc2 {
                    continue;
                }
                let (vdw, coulomb) = by_shift.entry(shift).or_default();
                if params.has_vdw(i) && params.has_vdw(j) {
                    vdw.push(j);
                } else {
                    coulomb.push(j);
                }
            }
            for (shift, (vdw, coulomb)) in by_shift {
                if !vdw.is_empty() {
                    lists.vdw.push(i, shift, params.group(i), &vdw);
                }
                if !coulomb.is_empty() {
                    lists.coulomb.push(i, shift, params.group(i), &coulomb);
                }
            }
        }
        log::debug!(
            "pair search: {} vdW pairs in {} lists, {} Coulomb-only pairs in {} lists",
            lists.vdw.pair_count(),
            lists.vdw.len(),
            lists.coulomb.pair_count(),
            lists.coulomb.len()
        );
        Ok(lists)
    }

    /// Shift index and displacement `x_i + shift - x_j` of the closest image.
    fn image(&self, xi: [f32; 3], xj: [f32; 3]) -> (usize, [f32; 3]) {
        let Some(l) = self.box_length else {
            return (0, [xi[0] - xj[0], xi[1] - xj[1], xi[2] - xj[2]]);
        };
        let mut index = 0;
        let mut d = [0.0; 3];
        for (axis, stride) in [(0, 1), (1, 3), (2, 9)] {
            let raw = xi[axis] - xj[axis];
            let k = if raw > 0.5 * l {
                -1
            } else if raw < -0.5 * l {
                1
            } else {
                0
            };
            d[axis] = raw + k as f32 * l;
            index += (k + 1) as usize * stride;
        }
        (index, d)
    }
}
