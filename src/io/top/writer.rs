use crate::io::error::Error;
use crate::model::system::System;
use crate::model::term::BondedTerm;
use crate::model::topology::GeneratedTopology;
use std::io::Write;

/// Function type written in the `funct` column of each section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionTypes {
    pub pair: u8,
    pub angle: u8,
    pub dihedral: u8,
    pub improper: u8,
    pub thole: u8,
    pub polarization: u8,
    pub aniso_polarization: u8,
    pub virtual_site: u8,
}

impl Default for FunctionTypes {
    fn default() -> Self {
        Self {
            pair: 1,
            angle: 5,
            dihedral: 9,
            improper: 2,
            thole: 1,
            polarization: 1,
            aniso_polarization: 1,
            virtual_site: 1,
        }
    }
}

/// Writes the generated terms as topology sections.
///
/// Atom numbers are 1-based. A term's template string, if any, follows the
/// function type. Exclusions are listed once per pair, on the lower atom.
/// Polarization sections are only written when non-empty.
pub fn write<W: Write>(
    mut writer: W,
    system: &System,
    topology: &GeneratedTopology,
    functions: &FunctionTypes,
) -> Result<(), Error> {
    let n = system.atom_count();
    if topology.exclusions.atom_count() != n {
        return Err(Error::Conversion(format!(
            "topology covers {} atoms, system has {}",
            topology.exclusions.atom_count(),
            n
        )));
    }

    writeln!(
        writer,
        "; {} atoms in {} residues, nrexcl = {}",
        n,
        system.residue_count(),
        topology.exclusion_hops
    )?;

    section(&mut writer, "pairs", functions.pair, &topology.pairs)?;
    section(&mut writer, "angles", functions.angle, &topology.angles)?;
    section(&mut writer, "dihedrals", functions.dihedral, &topology.dihedrals)?;
    section(&mut writer, "dihedrals", functions.improper, &topology.impropers)?;

    writeln!(writer, "\n[ exclusions ]")?;
    writeln!(writer, ";  ai    aj ...")?;
    for (atom, excluded) in topology.exclusions.iter() {
        let upper: Vec<String> = excluded
            .iter()
            .filter(|&&other| other > atom)
            .map(|other| format!("{:5}", other + 1))
            .collect();
        if !upper.is_empty() {
            writeln!(writer, "{:5} {}", atom + 1, upper.join(" "))?;
        }
    }

    optional_section(&mut writer, "thole_polarization", functions.thole, &topology.thole)?;
    optional_section(&mut writer, "polarization", functions.polarization, &topology.polarization)?;
    optional_section(
        &mut writer,
        "anisotropic_polarization",
        functions.aniso_polarization,
        &topology.aniso_polarization,
    )?;
    optional_section(&mut writer, "virtual_sites3", functions.virtual_site, &topology.virtual_sites)?;
    Ok(())
}

fn optional_section<W: Write, const N: usize>(
    writer: &mut W,
    name: &str,
    funct: u8,
    terms: &[BondedTerm<N>],
) -> Result<(), Error> {
    if terms.is_empty() {
        return Ok(());
    }
    section(writer, name, funct, terms)
}

fn section<W: Write, const N: usize>(
    writer: &mut W,
    name: &str,
    funct: u8,
    terms: &[BondedTerm<N>],
) -> Result<(), Error> {
    const LABELS: [&str; 5] = ["ai", "aj", "ak", "al", "am"];

    writeln!(writer, "\n[ {} ]", name)?;
    let header: Vec<String> = LABELS.iter().take(N).map(|l| format!("{:>4}", l)).collect();
    writeln!(writer, "; {} funct  params", header.join("  "))?;
    for term in terms {
        let atoms: Vec<String> = term.atoms.iter().map(|a| format!("{:5}", a + 1)).collect();
        let mut line = format!("{} {:5}", atoms.join(" "), funct);
        if let Some(source) = term.source.as_deref().filter(|s| !s.is_empty()) {
            line.push_str("    ");
            line.push_str(source);
        }
        writeln!(writer, "{}", line)?;
    }
    Ok(())
}
