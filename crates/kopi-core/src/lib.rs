//! Core shared types for Kopi.
//!
//! This crate is intentionally small: source locations, interned-ish names and
//! the structured diagnostic type every resolution phase reports through.

use std::fmt;

use serde::{Deserialize, Serialize};

mod diagnostics;

pub use diagnostics::{sort_diagnostics, Diagnostic, DiagnosticKind, Severity};

/// Cheap-to-clone identifier text (class, field, method and local names).
pub type Name = smol_str::SmolStr;

/// Identity of one input file as assigned by the parser collaborator.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FileId(u32);

impl FileId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        FileId(raw)
    }

    #[must_use]
    pub const fn to_raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileId({})", self.0)
    }
}

/// A byte-span into a source file.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Span({}..{})", self.start, self.end)
    }
}

/// A span tagged with the file it belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceLoc {
    pub file: FileId,
    pub span: Span,
}

impl SourceLoc {
    #[inline]
    pub const fn new(file: FileId, span: Span) -> Self {
        Self { file, span }
    }
}

impl fmt::Display for SourceLoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "file#{}@{}..{}",
            self.file.0, self.span.start, self.span.end
        )
    }
}

/// Split a dotted qualified name into `(package, simple_name)`.
///
/// `"java.lang.Object"` becomes `(Some("java.lang"), "Object")`, `"Value"` becomes `(None, "Value")`.
#[must_use]
pub fn split_qualified(name: &str) -> (Option<&str>, &str) {
    match name.rfind('.') {
        Some(idx) => (Some(&name[..idx]), &name[idx + 1..]),
        None => (None, name),
    }
}
