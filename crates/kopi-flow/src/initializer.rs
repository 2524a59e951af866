use kopi_core::{Diagnostic, DiagnosticKind, SourceLoc};
use kopi_types::{is_subclass, ClassGraph, ClassId, MethodId};

use crate::table::ThrowSiteTyping;

fn declares(graph: &ClassGraph, method: MethodId, exception: ClassId) -> bool {
    graph
        .method(method)
        .throws
        .iter()
        .any(|&throws| is_subclass(graph, exception, throws))
}

/// Validate the checked exceptions that the field initializers of `class` can raise.
///
/// A static initializer has no `throws` clause, so nothing checked may escape it. An instance
/// initializer runs inside every constructor that does not delegate to `this(...)`; the exception
/// must be declared by all of the class's constructors.
pub fn analyze_initializers(
    graph: &ClassGraph,
    class: ClassId,
    typing: &dyn ThrowSiteTyping,
) -> Vec<Diagnostic> {
    let entry = graph.class(class);
    let file = graph.file_of(class);
    let ctors = graph.catalog(class).constructors();
    let mut diagnostics = Vec::new();

    for &field in &entry.fields {
        let field = graph.field(field);
        let Some(root) = field.initializer else {
            continue;
        };
        for call in entry.initializers.call_sites_in(root) {
            let Some(callee) = typing.callee(call) else {
                continue;
            };
            for &exception in &graph.method(callee).throws {
                if graph.is_unchecked(exception) {
                    continue;
                }
                if !field.is_static && ctors.iter().all(|&ctor| declares(graph, ctor, exception)) {
                    continue;
                }

                let exception_name = graph.class(exception).name.to_string();
                let field_name = format!("{}.{}", entry.name, field.name);
                let message = if field.is_static {
                    format!(
                        "unreported exception `{exception_name}` in static initializer of `{field_name}`"
                    )
                } else {
                    format!(
                        "unreported exception `{exception_name}` in initializer of `{field_name}` must be declared by every constructor"
                    )
                };
                let span = entry.initializers.expr(call).span;
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::UndeclaredCheckedException,
                    vec![exception_name, field_name],
                    message,
                    file.map(|file| SourceLoc::new(file, span)),
                ));
            }
        }
    }

    if !diagnostics.is_empty() {
        tracing::debug!(
            target: "kopi.flow",
            class = %entry.name,
            count = diagnostics.len(),
            "checked exceptions escape field initializers"
        );
    }
    diagnostics
}
