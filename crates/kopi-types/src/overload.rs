//! Compile-time overload selection.
//!
//! Selection works only on static (declared) argument types. The chosen declaration is then
//! handed to [`ClassGraph::dispatch`] at run time, which never re-ranks overloads.

use crate::{is_assignable, ClassGraph, ClassId, MethodId, Type};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallKind {
    /// `Type.m(...)` or an unqualified call from a static context: there is no receiver object.
    Static,
    Instance,
    Constructor,
}

/// A call site reduced to what overload resolution looks at.
#[derive(Clone, Copy, Debug)]
pub struct MethodCall<'a> {
    /// Static type of the receiver (or the class named by `Type.m(...)` / `new Type(...)`).
    pub receiver: ClassId,
    pub name: &'a str,
    pub args: &'a [Type],
    pub kind: CallKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MethodResolution {
    Found(MethodId),
    /// No applicable candidate; `candidates` lists everything that was considered.
    NotFound { candidates: Vec<MethodId> },
    /// Several maximally specific candidates, ordered by their display string.
    Ambiguous(Vec<MethodId>),
    /// A static call whose most specific candidate is an instance method.
    NotStatic(MethodId),
}

fn is_applicable(graph: &ClassGraph, method: MethodId, args: &[Type]) -> bool {
    let params = &graph.method(method).params;
    params.len() == args.len()
        && args
            .iter()
            .zip(params)
            .all(|(arg, param)| is_assignable(graph, arg, param))
}

/// `a` is at least as specific as `b`: every parameter of `a` is assignable to the matching
/// parameter of `b`.
#[must_use]
pub fn is_more_specific(graph: &ClassGraph, a: MethodId, b: MethodId) -> bool {
    let a = &graph.method(a).params;
    let b = &graph.method(b).params;
    a.len() == b.len() && a.iter().zip(b).all(|(a, b)| is_assignable(graph, a, b))
}

/// Pick the unique most specific method out of an applicable set.
///
/// Every pair is compared, so the outcome doesn't depend on the order of `applicable`.
#[must_use]
pub fn most_specific(graph: &ClassGraph, applicable: &[MethodId]) -> MethodResolution {
    let strictly_more_specific =
        |a: MethodId, b: MethodId| is_more_specific(graph, a, b) && !is_more_specific(graph, b, a);

    let winners: Vec<MethodId> = applicable
        .iter()
        .copied()
        .filter(|&m| {
            applicable
                .iter()
                .all(|&other| other == m || strictly_more_specific(m, other))
        })
        .collect();
    if let [winner] = winners.as_slice() {
        return MethodResolution::Found(*winner);
    }

    // No single winner: report every candidate that nothing else beats.
    let mut maximal: Vec<MethodId> = applicable
        .iter()
        .copied()
        .filter(|&m| {
            !applicable
                .iter()
                .any(|&other| other != m && strictly_more_specific(other, m))
        })
        .collect();
    maximal.sort_by_cached_key(|m| graph.display_method(*m));
    maximal.dedup();
    MethodResolution::Ambiguous(maximal)
}

fn select(graph: &ClassGraph, candidates: Vec<MethodId>, args: &[Type]) -> MethodResolution {
    let applicable: Vec<MethodId> = candidates
        .iter()
        .copied()
        .filter(|m| is_applicable(graph, *m, args))
        .collect();
    if applicable.is_empty() {
        return MethodResolution::NotFound { candidates };
    }
    most_specific(graph, &applicable)
}

/// Resolve a method invocation against the methods visible on the receiver's static type.
#[must_use]
pub fn resolve_method_call(graph: &ClassGraph, call: &MethodCall<'_>) -> MethodResolution {
    if call.kind == CallKind::Constructor {
        return resolve_constructor_call(graph, call.receiver, call.args);
    }

    // Static calls rank instance methods too; an instance winner is reported, never skipped.
    let candidates = graph.catalog(call.receiver).candidates(call.name);
    let resolution = match select(graph, candidates, call.args) {
        MethodResolution::Found(method)
            if call.kind == CallKind::Static && !graph.method(method).is_static =>
        {
            MethodResolution::NotStatic(method)
        }
        other => other,
    };
    tracing::trace!(
        target: "kopi.types.overload",
        receiver = %graph.class(call.receiver).name,
        name = call.name,
        resolution = ?resolution,
        "resolved method call"
    );
    resolution
}

/// Resolve `new C(args)` (or `this(...)`/`super(...)`) against `C`'s own constructors.
///
/// Constructors are never inherited.
#[must_use]
pub fn resolve_constructor_call(graph: &ClassGraph, class: ClassId, args: &[Type]) -> MethodResolution {
    let candidates = graph.catalog(class).constructors().to_vec();
    select(graph, candidates, args)
}
