use std::collections::BTreeMap;
use std::io::{self, Write};

use md_forge::{GeneratedTopology, ParticleKind, System, TermOrigin};

use crate::util::text::truncate;

const INDENT: &str = "      ";

const BOX_INNER_WIDTH: usize = 62;
const SAFE_TABLE_WIDTH: usize = BOX_INNER_WIDTH - INDENT.len();

pub fn print_molecule_info(system: &System) {
    let mut out = io::stderr().lock();

    let mut kinds: BTreeMap<&str, usize> = BTreeMap::new();
    for atom in &system.atoms {
        let label = match atom.kind {
            ParticleKind::Atom => "Atoms",
            ParticleKind::Drude => "Drude particles",
            ParticleKind::LonePair => "Lone pairs",
        };
        *kinds.entry(label).or_insert(0) += 1;
    }
    let polarizable = system
        .atoms
        .iter()
        .filter(|a| a.polarizability.is_some())
        .count();

    let mut rows = vec![
        ("Residues", system.residue_count().to_string()),
        ("Bonds", system.bond_count().to_string()),
    ];
    rows.extend(kinds.into_iter().map(|(k, n)| (k, n.to_string())));
    if polarizable > 0 {
        rows.push(("Polarizable", polarizable.to_string()));
    }

    print_kv_table(&mut out, "Molecule Summary", &rows);
}

pub fn print_term_counts(topology: &GeneratedTopology) {
    let mut out = io::stderr().lock();

    let rows = [
        count_row("Angles", topology.angles.iter().map(|t| t.origin)),
        count_row("Dihedrals", topology.dihedrals.iter().map(|t| t.origin)),
        count_row("Impropers", topology.impropers.iter().map(|t| t.origin)),
        count_row("1-4 Pairs", topology.pairs.iter().map(|t| t.origin)),
        count_row("Thole", topology.thole.iter().map(|t| t.origin)),
        (
            "Exclusions".to_string(),
            (topology.exclusions.len() / 2).to_string(),
            format!("nrexcl {}", topology.exclusion_hops),
        ),
    ];

    let _ = writeln!(out, "{}┌─ Generated Terms ─┐", INDENT);
    let _ = writeln!(out, "{}┌─────────────────────┬────────┬──────────────┐", INDENT);
    let _ = writeln!(out, "{}│ Category            │  Count │ Template     │", INDENT);
    let _ = writeln!(out, "{}├─────────────────────┼────────┼──────────────┤", INDENT);
    for (cat, count, detail) in &rows {
        let _ = writeln!(
            out,
            "{}│ {:<19} │ {:>6} │ {:<12} │",
            INDENT,
            cat,
            count,
            truncate(detail, 12)
        );
    }
    let _ = writeln!(out, "{}└─────────────────────┴────────┴──────────────┘", INDENT);
}

fn count_row(label: &str, origins: impl Iterator<Item = TermOrigin>) -> (String, String, String) {
    let (mut total, mut templated) = (0usize, 0usize);
    for origin in origins {
        total += 1;
        if origin == TermOrigin::Template {
            templated += 1;
        }
    }
    (
        label.to_string(),
        total.to_string(),
        format!("{} of {}", templated, total),
    )
}

pub fn print_kernel_report(title: &str, rows: &[(&str, String)]) {
    let mut out = io::stderr().lock();
    print_kv_table(&mut out, title, rows);
}

fn print_kv_table(out: &mut impl Write, title: &str, rows: &[(&str, String)]) {
    let key_w = 16usize;
    let sep_overhead = 6;
    let val_w = SAFE_TABLE_WIDTH.saturating_sub(key_w + sep_overhead);
    let k_line = "─".repeat(key_w + 2);
    let v_line = "─".repeat(val_w + 2);

    let _ = writeln!(
        out,
        "{}┌─ {} ─┐",
        INDENT,
        truncate(title, SAFE_TABLE_WIDTH - 6)
    );
    let _ = writeln!(out, "{}┌{}┬{}┐", INDENT, k_line, v_line);
    let _ = writeln!(
        out,
        "{}│ {:<key_w$} │ {:>val_w$} │",
        INDENT,
        "Metric",
        "Value",
    );
    let _ = writeln!(out, "{}├{}┼{}┤", INDENT, k_line, v_line);
    for (key, val) in rows {
        let _ = writeln!(
            out,
            "{}│ {:<key_w$} │ {:>val_w$} │",
            INDENT,
            truncate(key, key_w),
            truncate(val, val_w),
        );
    }
    let _ = writeln!(out, "{}└{}┴{}┘", INDENT, k_line, v_line);
}
