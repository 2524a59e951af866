use kopi_hir::PrimitiveType;

use crate::{ClassGraph, ClassId, Type};

/// Reflexive, transitive subclass/subinterface relation. Every interface is a subtype of `Object`.
#[must_use]
pub fn is_subclass(graph: &ClassGraph, sub: ClassId, sup: ClassId) -> bool {
    graph.ancestors(sub).contains(&sup)
}

/// Primitive widening conversions (JLS 5.1.2), plus identity.
#[must_use]
pub fn primitive_widens(from: PrimitiveType, to: PrimitiveType) -> bool {
    use PrimitiveType::*;

    if from == to {
        return true;
    }
    matches!(
        (from, to),
        (Byte, Short | Int | Long | Float | Double)
            | (Short, Int | Long | Float | Double)
            | (Char, Int | Long | Float | Double)
            | (Int, Long | Float | Double)
            | (Long, Float | Double)
            | (Float, Double)
    )
}

/// Method-invocation conversion without boxing: identity, primitive widening, reference widening.
///
/// `Unknown` is assignable in both directions so that one unresolved type doesn't cascade into
/// spurious overload failures.
#[must_use]
pub fn is_assignable(graph: &ClassGraph, from: &Type, to: &Type) -> bool {
    match (from, to) {
        (Type::Unknown, _) | (_, Type::Unknown) => true,
        (Type::Primitive(from), Type::Primitive(to)) => primitive_widens(*from, *to),
        (Type::Null, Type::Class(_)) => true,
        (Type::Class(from), Type::Class(to)) => is_subclass(graph, *from, *to),
        (Type::Void, Type::Void) => true,
        _ => false,
    }
}
