//! Configuration for bonded-term generation.

use super::error::Error;
use super::templates::TemplateDefaults;

/// Per-call settings for [`generate`](super::generate).
///
/// # Examples
///
/// ```
/// use md_forge::GeneratorConfig;
///
/// // Strict defaults: three-bond exclusions, unresolved template atoms are errors
/// let strict = GeneratorConfig::default();
/// assert_eq!(strict.exclusion_hops, 3);
///
/// // Permissive run for a polarizable model
/// let drude = GeneratorConfig {
///     allow_missing: true,
///     polarizable: true,
///     ..Default::default()
/// };
/// assert!(drude.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Bond-hop radius of default exclusions (1 to 3).
    pub exclusion_hops: usize,

    /// Keep every generated dihedral instead of one per central bond.
    pub keep_all_generated_dihedrals: bool,

    /// Drop generated dihedrals whose central bond also carries an improper.
    pub remove_dihedral_if_with_improper: bool,

    /// Emit 1-4 pairs between two hydrogens.
    pub generate_hh14_pairs: bool,

    /// Skip template entries whose atom names cannot be resolved instead of
    /// failing.
    ///
    /// Applies to impropers and exclusions; unconsumed angle and dihedral
    /// templates and polarization records are always resolved permissively.
    pub allow_missing: bool,

    /// Enable Drude / lone-pair handling: Thole screening, polarization
    /// records, auxiliary 1-4 pairs, and exclusion propagation.
    pub polarizable: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::from_defaults(&TemplateDefaults::default())
    }
}

impl GeneratorConfig {
    /// Starts from the force-field defaults stored with a template database.
    pub fn from_defaults(defaults: &TemplateDefaults) -> Self {
        Self {
            exclusion_hops: defaults.exclusion_hops,
            keep_all_generated_dihedrals: defaults.keep_all_generated_dihedrals,
            remove_dihedral_if_with_improper: defaults.remove_dihedral_if_with_improper,
            generate_hh14_pairs: defaults.generate_hh14_pairs,
            allow_missing: false,
            polarizable: false,
        }
    }

    /// Checks that the exclusion radius is supported.
    pub fn validate(&self) -> Result<(), Error> {
        if !(1..=3).contains(&self.exclusion_hops) {
            return Err(Error::InvalidExclusionHops(self.exclusion_hops));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = GeneratorConfig::default();
        assert_eq!(config.exclusion_hops, 3);
        assert!(!config.keep_all_generated_dihedrals);
        assert!(config.remove_dihedral_if_with_improper);
        assert!(config.generate_hh14_pairs);
        assert!(!config.allow_missing);
        assert!(!config.polarizable);
    }

    #[test]
    fn exclusion_hops_are_bounded() {
        for hops in [0, 4] {
            let config = GeneratorConfig {
                exclusion_hops: hops,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(Error::InvalidExclusionHops(h)) if h == hops
            ));
        }
    }
}
