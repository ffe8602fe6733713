use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, IsTerminal, Write};
use std::path::Path;

use anyhow::{Context, Result};

/// Returns `true` if stderr is a terminal (interactive).
pub fn stderr_is_tty() -> bool {
    io::stderr().is_terminal()
}

/// Returns `true` if stdin is a terminal (interactive).
pub fn stdin_is_tty() -> bool {
    io::stdin().is_terminal()
}

/// Opens the molecule input, falling back to stdin.
pub fn open_input(path: Option<&Path>) -> Result<Box<dyn BufRead>> {
    let Some(p) = path else {
        return Ok(Box::new(io::stdin().lock()));
    };
    let file =
        File::open(p).with_context(|| format!("Failed to open molecule file: {}", p.display()))?;
    Ok(Box::new(BufReader::new(file)))
}

/// Reads a whole text file, such as a template database.
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("Failed to read template file: {}", path.display()))
}

/// Creates the topology output, falling back to stdout.
pub fn create_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    let Some(p) = path else {
        return Ok(Box::new(BufWriter::new(io::stdout().lock())));
    };
    let file = File::create(p)
        .with_context(|| format!("Failed to create topology file: {}", p.display()))?;
    Ok(Box::new(BufWriter::new(file)))
}
