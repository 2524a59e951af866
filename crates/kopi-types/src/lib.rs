//! Class graph, signature catalog and overload resolution.
//!
//! The pipeline mirrors how the importer consumes parsed input:
//!
//! ```text
//! CompilationUnit* ──build_class_graph──▶ ClassGraph ──▶ ClassCatalog (per class)
//!                                              │
//!                                              └──▶ resolve_method_call / resolve_constructor_call
//! ```
//!
//! Storage is arena-style: classes, fields and methods live in flat vectors inside
//! [`ClassGraph`] and refer to each other through the `ClassId`/`FieldId`/`MethodId` indices, so
//! the graph stays free of structural back-references even though the subtype relation forms a
//! DAG.

use std::fmt;

use serde::{Deserialize, Serialize};

pub use kopi_hir::PrimitiveType;

mod catalog;
mod graph;
mod jdk;
mod overload;
mod subtyping;

pub use catalog::{ClassCatalog, Signature};
pub use graph::{
    build_class_graph, ClassEntry, ClassGraph, FieldEntry, GraphBuild, GraphOptions, MethodEntry,
    WellKnownTypes,
};
pub use jdk::bootstrap_units;
pub use overload::{
    is_more_specific, most_specific, resolve_constructor_call, resolve_method_call, CallKind,
    MethodCall, MethodResolution,
};
pub use subtyping::{is_assignable, is_subclass, primitive_widens};

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClassId(u32);

impl ClassId {
    pub(crate) fn new(idx: usize) -> Self {
        ClassId(idx as u32)
    }

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        ClassId(raw)
    }

    #[must_use]
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassId({})", self.0)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FieldId(u32);

impl FieldId {
    pub(crate) fn new(idx: usize) -> Self {
        FieldId(idx as u32)
    }

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        FieldId(raw)
    }

    #[must_use]
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldId({})", self.0)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MethodId(u32);

impl MethodId {
    pub(crate) fn new(idx: usize) -> Self {
        MethodId(idx as u32)
    }

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        MethodId(raw)
    }

    #[must_use]
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MethodId({})", self.0)
    }
}

/// A resolved type reference.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Type {
    Primitive(PrimitiveType),
    Class(ClassId),
    /// Type of the `null` literal; assignable to every class or interface type.
    Null,
    Void,
    /// Error recovery placeholder for references that failed to resolve.
    Unknown,
}

impl Type {
    pub const fn int() -> Self {
        Type::Primitive(PrimitiveType::Int)
    }

    pub const fn float() -> Self {
        Type::Primitive(PrimitiveType::Float)
    }

    pub const fn boolean() -> Self {
        Type::Primitive(PrimitiveType::Boolean)
    }

    pub const fn class(id: ClassId) -> Self {
        Type::Class(id)
    }

    #[must_use]
    pub fn is_reference(&self) -> bool {
        matches!(self, Type::Class(_) | Type::Null)
    }

    #[must_use]
    pub fn as_class(&self) -> Option<ClassId> {
        match self {
            Type::Class(id) => Some(*id),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_primitive(&self) -> Option<PrimitiveType> {
        match self {
            Type::Primitive(p) => Some(*p),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_unknown(&self) -> bool {
        matches!(self, Type::Unknown)
    }
}
