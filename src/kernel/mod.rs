//! Non-bonded pair kernel.
//!
//! The kernel consumes a [`NeighborList`] in outer/inner form, per-particle
//! charges and van der Waals types ([`ParticleParams`]), and optionally a
//! cubic-spline [`InteractionTable`]. It accumulates forces, per-shift force
//! corrections, per-group energies, and a flop count into a
//! [`KernelOutput`].
//!
//! # Example
//!
//! ```
//! use md_forge::kernel::{
//!     ElecKind, EnergyMode, InteractionKinds, InteractionTable, KernelInputs, KernelOutput,
//!     PairSearch, PairwiseKernel, ParticleParams, TableFormat, VdwKind, shift_vectors,
//! };
//!
//! let positions = [[0.5, 0.5, 0.5], [0.8, 0.5, 0.5], [0.5, 0.9, 0.5]];
//! let params = ParticleParams::geometric(
//!     vec![0.4, -0.4, 0.2],
//!     vec![0, 0, 0],
//!     &[(2.6e-3, 2.6e-6)],
//! )?;
//! let lists = PairSearch::new(0.9, Some(2.0)).run(&positions, &params, None)?;
//! let table = InteractionTable::tabulate(TableFormat::Vdw, 500.0, 0.9)?;
//!
//! let kinds = InteractionKinds::new(ElecKind::Coulomb, VdwKind::CubicSplineTable, EnergyMode::PotentialAndForce);
//! let kernel = PairwiseKernel::new(kinds, Some(&table))?;
//! let shifts = shift_vectors(Some(2.0));
//! let inputs = KernelInputs { positions: &positions, shift_vectors: &shifts, params: &params };
//! let mut out = KernelOutput::new(positions.len(), shifts.len(), 1);
//! kernel.evaluate(&lists.vdw, &inputs, &mut out)?;
//!
//! assert!(out.net_force().iter().all(|f| f.abs() < 1e-3));
//! # Ok::<(), md_forge::kernel::KernelError>(())
//! ```

mod error;
mod neighbor;
mod output;
mod pairwise;
mod params;
pub mod reference;
mod rsqrt;
mod table;

#[cfg(test)]
mod testing;

pub use error::KernelError;
pub use neighbor::{CENTRAL_SHIFT, LANES, NeighborList, NeighborLists, PADDING, PairSearch, shift_vectors};
pub use output::KernelOutput;
pub use pairwise::{KernelInputs, PairwiseKernel};
pub use params::{ElecKind, EnergyMode, InteractionKinds, ONE_4PI_EPS0, ParticleParams, VdwKind};
pub use rsqrt::{INVSQRT_MAX_REL_ERROR, invsqrt, invsqrt_scalar};
pub use table::{InteractionTable, Slot, TABLE_MIN_DISTANCE, TableFormat};
