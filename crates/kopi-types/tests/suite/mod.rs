mod catalog;
mod overload;

use kopi_hir::CompilationUnit;
use kopi_types::{build_class_graph, ClassGraph, ClassId, GraphBuild, GraphOptions, MethodId};

pub(crate) fn build(units: Vec<CompilationUnit>) -> GraphBuild {
    build_class_graph(units, &GraphOptions::default())
}

/// Build and assert that the input produced no diagnostics.
pub(crate) fn build_clean(units: Vec<CompilationUnit>) -> ClassGraph {
    let GraphBuild { graph, diagnostics } = build(units);
    assert!(diagnostics.is_empty(), "unexpected diagnostics: {diagnostics:#?}");
    graph
}

pub(crate) fn class(graph: &ClassGraph, name: &str) -> ClassId {
    graph
        .lookup_class(name)
        .unwrap_or_else(|| panic!("class `{name}` should exist"))
}

/// Find a method by its display form, e.g. `DispatchTest.test(DispatchClass1)`.
pub(crate) fn method(graph: &ClassGraph, display: &str) -> MethodId {
    graph
        .methods()
        .map(|m| m.id)
        .find(|id| graph.display_method(*id) == display)
        .unwrap_or_else(|| panic!("method `{display}` should exist"))
}
