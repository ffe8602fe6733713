#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParticleKind {
    #[default]
    Atom,
    Drude,
    LonePair,
}

impl ParticleKind {
    /// Infers the particle kind from an atom name: `D*` is a Drude
    /// particle, `L*` a lone pair, anything else a real atom.
    pub fn from_name(name: &str) -> Self {
        match name.chars().next() {
            Some('D') => Self::Drude,
            Some('L') => Self::LonePair,
            _ => Self::Atom,
        }
    }

    #[inline]
    pub fn is_auxiliary(self) -> bool {
        !matches!(self, Self::Atom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Polarizability {
    pub alpha: f64,
    pub thole: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub name: String,
    pub residue: usize,
    pub kind: ParticleKind,
    pub polarizability: Option<Polarizability>,
}

impl Atom {
    pub fn new(name: impl Into<String>, residue: usize) -> Self {
        let name = name.into();
        let kind = ParticleKind::from_name(&name);
        Self {
            name,
            residue,
            kind,
            polarizability: None,
        }
    }

    pub fn with_kind(mut self, kind: ParticleKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_polarizability(mut self, alpha: f64, thole: f64) -> Self {
        self.polarizability = Some(Polarizability { alpha, thole });
        self
    }

    #[inline]
    pub fn is_real(&self) -> bool {
        !self.kind.is_auxiliary()
    }

    /// Hydrogen by naming convention: `H*`, or a digit-prefixed `1HB`-style name.
    pub fn is_hydrogen(&self) -> bool {
        let mut chars = self.name.chars();
        match chars.next() {
            Some(c) if c.to_ascii_uppercase() == 'H' => true,
            Some(c) if c.is_ascii_digit() => {
                matches!(chars.next(), Some(n) if n.to_ascii_uppercase() == 'H')
            }
            _ => false,
        }
    }

    /// Returns the polarizability only when it is physically active.
    pub fn active_polarizability(&self) -> Option<Polarizability> {
        self.polarizability.filter(|p| p.alpha != 0.0)
    }
}
