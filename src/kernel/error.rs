use super::table::TableFormat;
use thiserror::Error;

/// Setup errors detected before a kernel touches any data.
///
/// These indicate a configuration bug in the caller, not a transient
/// condition; nothing is retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KernelError {
    /// Neither an electrostatic nor a van der Waals interaction was requested.
    #[error("kernel has no interaction to compute")]
    NoInteraction,

    /// An input array has the wrong length.
    #[error("{what} has {found} entries, expected {expected}")]
    LengthMismatch {
        /// Name of the array.
        what: &'static str,
        /// Required length.
        expected: usize,
        /// Actual length.
        found: usize,
    },

    /// A particle references a van der Waals type beyond the parameter table.
    #[error("particle {particle} has van der Waals type {vdw_type}, but only {n_types} types are defined")]
    TypeOutOfRange {
        /// Particle index.
        particle: usize,
        /// Type index stored on the particle.
        vdw_type: usize,
        /// Number of defined types.
        n_types: usize,
    },

    /// The requested interaction needs a table that was not supplied or has
    /// the wrong layout.
    #[error("{interaction} interactions need a table with {required} data, found {found:?}")]
    TableMismatch {
        /// Interaction that requires the table.
        interaction: &'static str,
        /// Required table content.
        required: &'static str,
        /// Layout that was supplied, if any.
        found: Option<TableFormat>,
    },

    /// Table data is unusable.
    #[error("malformed interaction table: {0}")]
    MalformedTable(String),

    /// Neighbor list structure is inconsistent.
    #[error("malformed neighbor list: {0}")]
    MalformedList(String),

    /// A neighbor list references a particle that does not exist.
    #[error("neighbor list {list} references particle {particle}, but only {n_particles} exist")]
    ParticleOutOfRange {
        /// Outer list index.
        list: usize,
        /// Referenced particle.
        particle: usize,
        /// Number of particles.
        n_particles: usize,
    },

    /// A neighbor list references a shift vector that does not exist.
    #[error("neighbor list {list} uses shift {shift}, but only {n_shifts} shift vectors exist")]
    ShiftOutOfRange {
        /// Outer list index.
        list: usize,
        /// Referenced shift index.
        shift: usize,
        /// Number of shift vectors.
        n_shifts: usize,
    },

    /// A neighbor list references an energy group bin that does not exist.
    #[error("neighbor list {list} uses energy group {group}, but only {n_groups} groups exist")]
    GroupOutOfRange {
        /// Outer list index.
        list: usize,
        /// Referenced group.
        group: usize,
        /// Number of energy groups.
        n_groups: usize,
    },

    /// The search cutoff is not usable for the requested box.
    #[error("cutoff {cutoff} is invalid{}", describe_box(.box_length))]
    InvalidCutoff {
        /// Requested cutoff.
        cutoff: f32,
        /// Periodic box edge, if any.
        box_length: Option<f32>,
    },

    /// A particle lies outside the periodic box.
    #[error("particle {particle} lies outside the periodic box of length {box_length}")]
    OutsideBox {
        /// Particle index.
        particle: usize,
        /// Periodic box edge.
        box_length: f32,
    },
}

fn describe_box(box_length: &Option<f32>) -> String {
    box_length
        .map(|l| format!(" for a periodic box of length {l}"))
        .unwrap_or_default()
}

impl KernelError {
    pub(crate) fn length(what: &'static str, expected: usize, found: usize) -> Self {
        Self::LengthMismatch {
            what,
            expected,
            found,
        }
    }
}
