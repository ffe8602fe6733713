use crate::io::{Format, error::Error};
use crate::model::{
    atom::{Atom, ParticleKind},
    system::{Bond, Residue, System},
};
use serde::Deserialize;
use std::io::{BufRead, Read};

/// Reads a molecule from TOML.
///
/// ```toml
/// bonds = [[0, 1], [0, 2]]
///
/// [[residues]]
/// name = "SWM"
/// number = 1
/// atoms = [
///     { name = "OW", alpha = 0.00097825, thole = 1.3 },
///     { name = "DOW" },
///     { name = "LP1", kind = "lone_pair" },
/// ]
/// ```
///
/// Atoms are numbered in file order across residues; bonds use those 0-based
/// numbers. An atom's kind defaults to the one implied by its name.
pub fn read<R: BufRead>(mut reader: R) -> Result<System, Error> {
    let mut source = String::new();
    reader.read_to_string(&mut source)?;
    let file: MoleculeFile =
        toml::from_str(&source).map_err(|e| Error::toml(Format::Molecule, &source, &e))?;
    build_system(file)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MoleculeFile {
    #[serde(default)]
    bonds: Vec<[usize; 2]>,
    #[serde(default)]
    residues: Vec<ResidueRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ResidueRecord {
    name: String,
    number: i32,
    #[serde(default)]
    atoms: Vec<AtomRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AtomRecord {
    name: String,
    kind: Option<KindRecord>,
    alpha: Option<f64>,
    #[serde(default = "default_thole")]
    thole: f64,
}

fn default_thole() -> f64 {
    1.3
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
enum KindRecord {
    Atom,
    Drude,
    LonePair,
}

impl From<KindRecord> for ParticleKind {
    fn from(kind: KindRecord) -> Self {
        match kind {
            KindRecord::Atom => ParticleKind::Atom,
            KindRecord::Drude => ParticleKind::Drude,
            KindRecord::LonePair => ParticleKind::LonePair,
        }
    }
}

fn build_system(file: MoleculeFile) -> Result<System, Error> {
    let mut system = System::new();
    for record in file.residues {
        let residue = system.push_residue(Residue::new(record.name, record.number));
        for atom in record.atoms {
            let mut built = Atom::new(atom.name, residue);
            if let Some(kind) = atom.kind {
                built = built.with_kind(kind.into());
            }
            if let Some(alpha) = atom.alpha {
                built = built.with_polarizability(alpha, atom.thole);
            }
            system.atoms.push(built);
        }
    }

    let n = system.atom_count();
    for [i, j] in file.bonds {
        if i >= n || j >= n {
            return Err(Error::Conversion(format!(
                "bond {i}-{j} references an atom beyond the {n} atoms defined"
            )));
        }
        system.bonds.push(Bond::new(i, j));
    }
    Ok(system)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WATER: &str = r#"
bonds = [[0, 1], [0, 2], [0, 3], [0, 4]]

[[residues]]
name = "SWM"
number = 1
atoms = [
    { name = "OW", alpha = 0.00097825, thole = 1.3 },
    { name = "HW1" },
    { name = "HW2" },
    { name = "DOW" },
    { name = "MW", kind = "lone_pair" },
]
"#;

    #[test]
    fn reads_polarizable_water() {
        let system = read(WATER.as_bytes()).unwrap();
        assert_eq!(system.atom_count(), 5);
        assert_eq!(system.residue_count(), 1);
        assert_eq!(system.bond_count(), 4);
        assert_eq!(system.residues[0].name, "SWM");

        let ow = &system.atoms[0];
        assert_eq!(ow.kind, ParticleKind::Atom);
        assert_eq!(ow.polarizability.map(|p| p.thole), Some(1.3));
        assert_eq!(system.atoms[3].kind, ParticleKind::Drude);
        assert_eq!(system.atoms[4].kind, ParticleKind::LonePair);
        assert!(system.atoms[1].polarizability.is_none());
    }

    #[test]
    fn atoms_are_numbered_across_residues() {
        let text = r#"
bonds = [[1, 2]]

[[residues]]
name = "ACE"
number = 1
atoms = [{ name = "CH3" }, { name = "C" }]

[[residues]]
name = "NME"
number = 2
atoms = [{ name = "N" }, { name = "CH3" }]
"#;
        let system = read(text.as_bytes()).unwrap();
        assert_eq!(system.atoms[2].residue, 1);
        assert_eq!(system.residue_atoms(1), 2..4);
        assert_eq!(system.bonds[0], Bond::new(1, 2));
    }

    #[test]
    fn dangling_bond_is_rejected() {
        let text = "bonds = [[0, 5]]\n[[residues]]\nname = \"X\"\nnumber = 1\natoms = [{ name = \"C\" }]\n";
        assert!(matches!(read(text.as_bytes()), Err(Error::Conversion(_))));
    }

    #[test]
    fn syntax_errors_report_a_line() {
        let text = "[[residues]]\nname = \"X\"\nnumber = \"one\"\n";
        match read(text.as_bytes()) {
            Err(Error::Parse { format, line, .. }) => {
                assert_eq!(format, Format::Molecule);
                assert!(line >= 1, "line {line}");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let text = "[[residues]]\nname = \"X\"\nnumber = 1\natoms = [{ name = \"C\", kind = \"ghost\" }]\n";
        assert!(matches!(read(text.as_bytes()), Err(Error::Parse { .. })));
    }
}
