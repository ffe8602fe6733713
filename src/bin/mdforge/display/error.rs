use std::io::{self, Write};

use anyhow::Error;

use crate::util::text::wrap;

const INNER_WIDTH: usize = 62;

pub fn print_error(err: &Error) {
    let mut out = io::stderr().lock();

    let _ = writeln!(out);
    border(&mut out, '╔', '═', '╗');
    row(&mut out, 2, "✗ Error");
    border(&mut out, '╟', '─', '╢');
    wrapped_rows(&mut out, 2, &err.to_string());

    for cause in err.chain().skip(1) {
        border(&mut out, '╟', '─', '╢');
        row(&mut out, 2, "Caused by:");
        wrapped_rows(&mut out, 4, &cause.to_string());
    }

    if let Some(hints) = HintCollector::collect(err) {
        border(&mut out, '╟', '─', '╢');
        row(&mut out, 2, "Hints:");
        for hint in hints {
            let width = INNER_WIDTH - 9;
            for (i, line) in wrap(&hint, width).iter().enumerate() {
                let bullet = if i == 0 { "• " } else { "  " };
                row(&mut out, 4, &format!("{bullet}{line}"));
            }
        }
    }

    border(&mut out, '╚', '═', '╝');
    let _ = writeln!(out);
}

fn border(out: &mut impl Write, left: char, fill: char, right: char) {
    let line: String = std::iter::repeat_n(fill, INNER_WIDTH).collect();
    let _ = writeln!(out, "   {left}{line}{right}");
}

fn row(out: &mut impl Write, indent: usize, text: &str) {
    let width = INNER_WIDTH - indent - 1;
    let _ = writeln!(out, "   ║{:indent$}{:<width$} ║", "", text);
}

fn wrapped_rows(out: &mut impl Write, indent: usize, text: &str) {
    for line in wrap(text, INNER_WIDTH - indent - 1) {
        row(out, indent, &line);
    }
}

struct HintCollector {
    hints: Vec<String>,
    has_typed_hints: bool,
}

impl HintCollector {
    fn collect(err: &Error) -> Option<Vec<String>> {
        let mut collector = Self {
            hints: Vec::new(),
            has_typed_hints: false,
        };

        collector.collect_io_hints(err);
        collector.collect_forge_hints(err);
        collector.collect_kernel_hints(err);

        if !collector.has_typed_hints {
            collector.collect_fallback_hints(err);
        }

        (!collector.hints.is_empty()).then_some(collector.hints)
    }

    fn add(&mut self, hint: impl Into<String>) {
        self.hints.push(hint.into());
    }

    fn collect_io_hints(&mut self, err: &Error) {
        use md_forge::io::error::Error as IoError;

        let Some(io_err) = err.downcast_ref::<IoError>() else {
            return;
        };
        self.has_typed_hints = true;

        match io_err {
            IoError::Io { source } => self.collect_std_io_hints(source),

            IoError::Parse { format, line, .. } => {
                self.add(format!("The {} parser stopped near line {}", format, line));
                self.add("Inspect the file around that line for malformed entries");
                self.add("Top-level `bonds` must come before the first [[residues]] table");
                self.add("Atom kinds are one of: atom, drude, lone_pair");
            }

            IoError::Conversion(msg) => {
                self.add("The molecule could not be assembled from the file");
                if msg.contains("bond") {
                    self.add("Bond indices are 0-based and count atoms across all residues");
                }
            }
        }
    }

    fn collect_std_io_hints(&mut self, source: &std::io::Error) {
        use std::io::ErrorKind;

        match source.kind() {
            ErrorKind::NotFound => {
                self.add("File or directory not found");
                self.add("Check the path spelling and ensure the file exists");
            }
            ErrorKind::PermissionDenied => {
                self.add("Permission denied accessing the file");
                self.add("Check file permissions with `ls -la`");
            }
            ErrorKind::InvalidData => {
                self.add("File is not valid UTF-8 text");
            }
            ErrorKind::BrokenPipe => {
                self.add("Output consumer terminated early");
                self.add("This may occur when piping to commands like `head`");
            }
            _ => {
                self.add("I/O operation failed");
                self.add("Check file path, permissions, and disk space");
            }
        }
    }

    fn collect_forge_hints(&mut self, err: &Error) {
        use md_forge::ForgeError;

        let Some(forge_err) = err.downcast_ref::<ForgeError>() else {
            return;
        };
        self.has_typed_hints = true;

        match forge_err {
            ForgeError::TemplateParse(_) => {
                self.add("The template database has invalid TOML or unknown keys");
                self.add("Templates live under [residues.NAME] with angles, dihedrals, impropers, exclusions");
            }

            ForgeError::InvalidTemplate { residue, .. } => {
                self.add(format!("Check the atom counts of entries in [residues.{}]", residue));
                self.add("Angles take 3 atoms, dihedrals and impropers 4, exclusions 2 or more");
            }

            ForgeError::EmptySystem => {
                self.add("The molecule file defines no atoms");
            }

            ForgeError::InvalidBond { .. } => {
                self.add("Bonds must join two distinct atoms that exist");
            }

            ForgeError::InvalidResidue { .. } => {
                self.add("Atoms must be listed residue by residue, in residue order");
            }

            ForgeError::InvalidExclusionHops(_) => {
                self.add("Use --nrexcl 1, 2 or 3");
            }

            ForgeError::UnresolvedAtom { atom_name, .. } => {
                if atom_name.starts_with(['-', '+']) {
                    self.add("Names prefixed with -/+ refer to the previous/next residue");
                    self.add("Chain ends have no neighbor residue to resolve them in");
                }
                self.add("Pass --allow-missing to skip entries with unknown atoms");
            }

            ForgeError::MissingDrude { .. } => {
                self.add("Every atom with a polarizability needs a bonded Drude particle");
                self.add("Drude particles are named D* or marked kind = \"drude\"");
            }

            ForgeError::TooManyParameters { max, .. } => {
                self.add(format!(
                    "Numeric parameter strings may hold at most {} values",
                    max
                ));
                self.add("Use a macro name for longer parameter sets");
            }

            ForgeError::Inconsistency(_) => {
                self.add("This indicates a bug; please report it with the input files");
            }
        }
    }

    fn collect_kernel_hints(&mut self, err: &Error) {
        use md_forge::kernel::KernelError;

        let Some(kernel_err) = err.downcast_ref::<KernelError>() else {
            return;
        };
        self.has_typed_hints = true;

        match kernel_err {
            KernelError::NoInteraction => {
                self.add("Choose at least one of --elec and --vdw other than none");
            }
            KernelError::InvalidCutoff { .. } => {
                self.add("The cutoff must be positive and below half the box edge");
                self.add("Increase --sites or --spacing, or lower --cutoff");
            }
            KernelError::MalformedTable(_) | KernelError::TableMismatch { .. } => {
                self.add("Check --table-scale; it must be a positive number of points per nm");
            }
            KernelError::OutsideBox { .. } => {
                self.add("Lattice sites must lie inside the periodic box");
            }
            _ => {
                self.add("Kernel inputs are inconsistent; this indicates a bug");
            }
        }
    }

    fn collect_fallback_hints(&mut self, err: &Error) {
        let msg = error_chain_text(err);

        if msg.contains("terminal") || msg.contains("stdin") {
            self.add("Provide a molecule via -i/--input or pipe it to stdin");
        } else if msg.contains("no such file") || msg.contains("not found") {
            self.add("Check that the file path is correct");
        } else if msg.contains("permission denied") {
            self.add("Ensure you have the required access rights");
        }
    }
}

fn error_chain_text(err: &Error) -> String {
    err.chain()
        .map(|cause| cause.to_string())
        .collect::<Vec<_>>()
        .join("\n")
        .to_lowercase()
}
