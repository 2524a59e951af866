use std::collections::HashSet;

use kopi_hir::{ConstructorCallKind, ExprId};
use kopi_types::{ClassGraph, ClassId, FieldId, MethodId};

/// Evaluate `expr` (in the owning class's initializer arena) and store it into `field`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InitStep {
    pub field: FieldId,
    pub expr: ExprId,
}

fn field_steps(graph: &ClassGraph, class: ClassId, want_static: bool) -> Vec<InitStep> {
    graph
        .class(class)
        .fields
        .iter()
        .filter_map(|&field| {
            let entry = graph.field(field);
            if entry.is_static != want_static {
                return None;
            }
            entry.initializer.map(|expr| InitStep { field, expr })
        })
        .collect()
}

/// Static field initializers of `class`, declaration order. Run once, on first use.
///
/// Fields without an initializer keep their zero value and produce no step.
#[must_use]
pub fn static_init_plan(graph: &ClassGraph, class: ClassId) -> Vec<InitStep> {
    field_steps(graph, class, true)
}

/// Instance field initializers declared by `class` itself, declaration order.
#[must_use]
pub fn instance_init_plan(graph: &ClassGraph, class: ClassId) -> Vec<InitStep> {
    field_steps(graph, class, false)
}

/// Where a constructor hands control first: the explicit `this(...)`/`super(...)` call, or the
/// implicit `super()`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Chained {
    pub kind: ConstructorCallKind,
    pub target: MethodId,
}

/// Constructor chaining as resolved by the body resolver.
pub trait ConstructorLinks {
    /// `None` for constructors of a root class or when the chained call failed to resolve.
    fn chained(&self, ctor: MethodId) -> Option<Chained>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstantiationStep {
    /// Arguments of the chained call are evaluated in this constructor's frame.
    EnterConstructor(MethodId),
    FieldInit { class: ClassId, step: InitStep },
    /// The constructor's own statements after the chained call.
    ConstructorBody(MethodId),
}

/// Flatten `new C(..)` through `ctor` into the order things happen.
///
/// Superclass constructors (and their field initializers) run before the subclass's field
/// initializers, which run before the subclass constructor body. A constructor delegating through
/// `this(...)` runs no field initializers of its own; the constructor it delegates to does.
#[must_use]
pub fn instantiation_plan(
    graph: &ClassGraph,
    ctor: MethodId,
    links: &dyn ConstructorLinks,
) -> Vec<InstantiationStep> {
    let mut out = Vec::new();
    let mut active = HashSet::new();
    expand(graph, ctor, links, &mut active, &mut out);
    out
}

fn expand(
    graph: &ClassGraph,
    ctor: MethodId,
    links: &dyn ConstructorLinks,
    active: &mut HashSet<MethodId>,
    out: &mut Vec<InstantiationStep>,
) {
    // Recursive `this(...)` chains are rejected by javac; cut them instead of looping.
    if !active.insert(ctor) {
        tracing::warn!(
            target: "kopi.init",
            ctor = %graph.display_method(ctor),
            "recursive constructor invocation"
        );
        return;
    }

    out.push(InstantiationStep::EnterConstructor(ctor));
    let owner = graph.method(ctor).owner;
    let chained = links.chained(ctor);
    if let Some(chained) = chained {
        expand(graph, chained.target, links, active, out);
    }
    if !matches!(
        chained,
        Some(Chained {
            kind: ConstructorCallKind::This,
            ..
        })
    ) {
        out.extend(
            instance_init_plan(graph, owner)
                .into_iter()
                .map(|step| InstantiationStep::FieldInit { class: owner, step }),
        );
    }
    out.push(InstantiationStep::ConstructorBody(ctor));

    active.remove(&ctor);
}
