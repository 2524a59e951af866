mod exception_table;

use kopi_hir::{Body, ExprId, ExprKind, Receiver, TypeExpr};
use kopi_types::{build_class_graph, ClassGraph, ClassId, GraphOptions, MethodId};

/// Minimal typing good enough for the fixtures: `throw new T(..)`, `throw local`, and unqualified
/// calls resolved by name.
pub(crate) struct StructuralTyping<'a> {
    pub graph: &'a ClassGraph,
    pub owner: ClassId,
    pub body: &'a Body,
}

impl StructuralTyping<'_> {
    fn class_of(&self, ty: &TypeExpr) -> Option<ClassId> {
        self.graph.resolve_type_in(self.owner, ty)?.as_class()
    }
}

impl kopi_flow::ThrowSiteTyping for StructuralTyping<'_> {
    fn thrown_class(&self, expr: ExprId) -> Option<ClassId> {
        match &self.body.expr(expr).kind {
            ExprKind::New { class, .. } => self.class_of(class),
            ExprKind::Local(local) => self.class_of(&self.body.local(*local).ty),
            _ => None,
        }
    }

    fn callee(&self, expr: ExprId) -> Option<MethodId> {
        match &self.body.expr(expr).kind {
            ExprKind::Call {
                receiver: Receiver::Implicit,
                name,
                ..
            } => self.graph.catalog(self.owner).candidates(name).first().copied(),
            ExprKind::New { class, args } => {
                let class = self.class_of(class)?;
                self.graph
                    .catalog(class)
                    .constructors()
                    .iter()
                    .copied()
                    .find(|c| self.graph.method(*c).params.len() == args.len())
            }
            _ => None,
        }
    }

    fn catch_class(&self, ty: &TypeExpr) -> Option<ClassId> {
        self.class_of(ty)
    }
}

pub(crate) fn graph(units: Vec<kopi_hir::CompilationUnit>) -> ClassGraph {
    let build = build_class_graph(units, &GraphOptions::default());
    assert!(build.diagnostics.is_empty(), "{:#?}", build.diagnostics);
    build.graph
}

pub(crate) fn method(graph: &ClassGraph, display: &str) -> MethodId {
    graph
        .methods()
        .map(|m| m.id)
        .find(|id| graph.display_method(*id) == display)
        .unwrap_or_else(|| panic!("method `{display}` should exist"))
}

pub(crate) fn analyze(
    graph: &ClassGraph,
    display: &str,
    options: &kopi_flow::FlowOptions,
) -> (MethodId, kopi_flow::MethodFlow) {
    let id = method(graph, display);
    let entry = graph.method(id);
    let body = entry.body.as_ref().expect("fixture method has a body");
    let typing = StructuralTyping {
        graph,
        owner: entry.owner,
        body,
    };
    (id, kopi_flow::analyze_method(graph, id, &typing, options))
}
