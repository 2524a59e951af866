use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use kopi_hir::CompilationUnit;

/// Decode a JSON array of compilation units (the serde shape of [`CompilationUnit`]).
pub fn units_from_json(text: &str) -> Result<Vec<CompilationUnit>> {
    serde_json::from_str(text).context("failed to decode compilation units")
}

pub fn units_to_json(units: &[CompilationUnit]) -> Result<String> {
    serde_json::to_string_pretty(units).context("failed to encode compilation units")
}

/// Read a JSON fixture file from disk.
pub fn load_units(path: &Path) -> Result<Vec<CompilationUnit>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    units_from_json(&text).with_context(|| format!("invalid fixture {}", path.display()))
}
