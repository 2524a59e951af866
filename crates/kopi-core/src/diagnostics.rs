use std::fmt;

use serde::{Deserialize, Serialize};

use crate::SourceLoc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    /// The offending class or method cannot be resolved further.
    Error,
    /// Resolution continues unaffected.
    Warning,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DiagnosticKind {
    DuplicateDefinition,
    UnresolvedType,
    InheritanceCycle,
    NoApplicableMethod,
    AmbiguousOverload,
    UndeclaredCheckedException,
    CircularStaticInitialization,
    UnresolvedMember,
    MissingImplementation,
    UnimplementedInterfaceMethod,
    AbstractInstantiation,
    UnreachableCatchClause,
    NonStaticReference,
    IncompatibleTypes,
}

impl DiagnosticKind {
    #[must_use]
    pub const fn severity(self) -> Severity {
        match self {
            DiagnosticKind::CircularStaticInitialization
            | DiagnosticKind::UnimplementedInterfaceMethod
            | DiagnosticKind::UnreachableCatchClause => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Stable machine-readable code, e.g. for golden files and CLI output.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            DiagnosticKind::DuplicateDefinition => "KOPI_DUPLICATE_DEFINITION",
            DiagnosticKind::UnresolvedType => "KOPI_UNRESOLVED_TYPE",
            DiagnosticKind::InheritanceCycle => "KOPI_INHERITANCE_CYCLE",
            DiagnosticKind::NoApplicableMethod => "KOPI_NO_APPLICABLE_METHOD",
            DiagnosticKind::AmbiguousOverload => "KOPI_AMBIGUOUS_OVERLOAD",
            DiagnosticKind::UndeclaredCheckedException => "KOPI_UNDECLARED_CHECKED_EXCEPTION",
            DiagnosticKind::CircularStaticInitialization => "KOPI_CIRCULAR_STATIC_INIT",
            DiagnosticKind::UnresolvedMember => "KOPI_UNRESOLVED_MEMBER",
            DiagnosticKind::MissingImplementation => "KOPI_MISSING_IMPLEMENTATION",
            DiagnosticKind::UnimplementedInterfaceMethod => "KOPI_UNIMPLEMENTED_INTERFACE_METHOD",
            DiagnosticKind::AbstractInstantiation => "KOPI_ABSTRACT_INSTANTIATION",
            DiagnosticKind::UnreachableCatchClause => "KOPI_UNREACHABLE_CATCH",
            DiagnosticKind::NonStaticReference => "KOPI_NON_STATIC_REFERENCE",
            DiagnosticKind::IncompatibleTypes => "KOPI_INCOMPATIBLE_TYPES",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A structured resolution diagnostic.
///
/// `symbols` names the offending symbol(s): the missing type, every member of a cycle, every tied
/// overload candidate, and so on. Producers keep it sorted when the order carries no meaning.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub symbols: Vec<String>,
    pub message: String,
    pub location: Option<SourceLoc>,
}

impl Diagnostic {
    pub fn new(
        kind: DiagnosticKind,
        symbols: Vec<String>,
        message: impl Into<String>,
        location: Option<SourceLoc>,
    ) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            symbols,
            message: message.into(),
            location,
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(loc) => write!(f, "{} [{}] {}", self.kind, loc, self.message),
            None => write!(f, "{} {}", self.kind, self.message),
        }
    }
}

/// Sort diagnostics into the canonical reporting order: by location, then kind, then symbols.
///
/// Diagnostics without a location sort first.
pub fn sort_diagnostics(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by(|a, b| {
        a.location
            .cmp(&b.location)
            .then_with(|| a.kind.cmp(&b.kind))
            .then_with(|| a.symbols.cmp(&b.symbols))
            .then_with(|| a.message.cmp(&b.message))
    });
}
