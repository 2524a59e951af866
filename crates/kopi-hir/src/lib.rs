//! Declaration shapes handed over by the parser collaborator.
//!
//! These are deliberately syntax-free: a [`CompilationUnit`] lists class and interface
//! declarations whose type references are still unresolved names ([`TypeExpr`]). Method bodies and
//! field initializers are arena-backed [`Body`] trees.

use std::fmt;

use kopi_core::{FileId, Name, Span};
use serde::{Deserialize, Serialize};

pub mod body;
mod builder;
mod walk;

pub use body::{
    BinaryOp, Body, CatchClause, ConstructorCallKind, Expr, ExprId, ExprKind, Literal, Local,
    LocalId, LocalKind, Receiver, Stmt, StmtId, StmtKind, UnaryOp,
};
pub use builder::BodyBuilder;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveType {
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Short => "short",
            PrimitiveType::Char => "char",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
        }
    }

    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "boolean" => PrimitiveType::Boolean,
            "byte" => PrimitiveType::Byte,
            "short" => PrimitiveType::Short,
            "char" => PrimitiveType::Char,
            "int" => PrimitiveType::Int,
            "long" => PrimitiveType::Long,
            "float" => PrimitiveType::Float,
            "double" => PrimitiveType::Double,
            _ => return None,
        })
    }

    #[must_use]
    pub fn is_numeric(self) -> bool {
        !matches!(self, PrimitiveType::Boolean)
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// An unresolved type reference as written in source.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeExpr {
    Primitive(PrimitiveType),
    /// Simple (`Value`) or qualified (`java.lang.Exception`) class/interface name.
    Named(Name),
    Void,
}

impl TypeExpr {
    pub fn named(name: &str) -> Self {
        TypeExpr::Named(Name::new(name))
    }

    pub fn int() -> Self {
        TypeExpr::Primitive(PrimitiveType::Int)
    }

    pub fn float() -> Self {
        TypeExpr::Primitive(PrimitiveType::Float)
    }

    pub fn boolean() -> Self {
        TypeExpr::Primitive(PrimitiveType::Boolean)
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Primitive(p) => write!(f, "{p}"),
            TypeExpr::Named(name) => f.write_str(name),
            TypeExpr::Void => f.write_str("void"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
    Class,
    Interface,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Package,
    Private,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodKind {
    Method,
    Constructor,
}

/// One source file's worth of declarations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompilationUnit {
    pub file: FileId,
    #[serde(default)]
    pub package: Option<Name>,
    /// Single-type imports (`import a.b.C;`), fully qualified.
    #[serde(default)]
    pub imports: Vec<Name>,
    pub classes: Vec<ClassDecl>,
}

impl CompilationUnit {
    pub fn new(file: FileId, classes: Vec<ClassDecl>) -> Self {
        Self {
            file,
            package: None,
            imports: Vec::new(),
            classes,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassDecl {
    /// Simple name; the qualified name is derived from the unit's package.
    pub name: Name,
    pub kind: ClassKind,
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default)]
    pub super_class: Option<TypeExpr>,
    /// For interfaces these are the extended interfaces.
    #[serde(default)]
    pub interfaces: Vec<TypeExpr>,
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
    #[serde(default)]
    pub methods: Vec<MethodDecl>,
    /// Arena holding every field initializer expression of this class.
    #[serde(default = "empty_body")]
    pub initializers: Body,
    #[serde(default)]
    pub span: Span,
}

fn empty_body() -> Body {
    BodyBuilder::new().finish(Vec::new())
}

impl ClassDecl {
    fn with_kind(name: &str, kind: ClassKind) -> Self {
        Self {
            name: Name::new(name),
            kind,
            is_abstract: kind == ClassKind::Interface,
            super_class: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            initializers: empty_body(),
            span: Span::default(),
        }
    }

    pub fn class(name: &str) -> Self {
        Self::with_kind(name, ClassKind::Class)
    }

    pub fn interface(name: &str) -> Self {
        Self::with_kind(name, ClassKind::Interface)
    }

    #[must_use]
    pub fn abstract_(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    #[must_use]
    pub fn extends(mut self, name: &str) -> Self {
        self.super_class = Some(TypeExpr::named(name));
        self
    }

    #[must_use]
    pub fn implements(mut self, name: &str) -> Self {
        self.interfaces.push(TypeExpr::named(name));
        self
    }

    #[must_use]
    pub fn field(mut self, field: FieldDecl) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn method(mut self, method: MethodDecl) -> Self {
        self.methods.push(method);
        self
    }

    /// Install the arena that the fields' `initializer` expressions point into.
    #[must_use]
    pub fn initializers(mut self, body: Body) -> Self {
        self.initializers = body;
        self
    }

    #[must_use]
    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: Name,
    pub ty: TypeExpr,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub is_static: bool,
    /// Expression in the owning class's [`ClassDecl::initializers`] arena.
    #[serde(default)]
    pub initializer: Option<ExprId>,
    #[serde(default)]
    pub span: Span,
}

impl FieldDecl {
    pub fn new(name: &str, ty: TypeExpr) -> Self {
        Self {
            name: Name::new(name),
            ty,
            visibility: Visibility::Public,
            is_static: false,
            initializer: None,
            span: Span::default(),
        }
    }

    #[must_use]
    pub fn static_(mut self) -> Self {
        self.is_static = true;
        self
    }

    #[must_use]
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    #[must_use]
    pub fn initializer(mut self, expr: ExprId) -> Self {
        self.initializer = Some(expr);
        self
    }

    #[must_use]
    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamDecl {
    pub name: Name,
    pub ty: TypeExpr,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MethodDecl {
    /// Constructors carry the simple name of their class.
    pub name: Name,
    pub kind: MethodKind,
    pub params: Vec<ParamDecl>,
    /// `None` for constructors, `Some(TypeExpr::Void)` for `void` methods.
    pub return_ty: Option<TypeExpr>,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default)]
    pub throws: Vec<TypeExpr>,
    #[serde(default)]
    pub body: Option<Body>,
    #[serde(default)]
    pub span: Span,
}

impl MethodDecl {
    pub fn method(name: &str, return_ty: TypeExpr) -> Self {
        Self {
            name: Name::new(name),
            kind: MethodKind::Method,
            params: Vec::new(),
            return_ty: Some(return_ty),
            visibility: Visibility::Public,
            is_static: false,
            is_abstract: false,
            throws: Vec::new(),
            body: None,
            span: Span::default(),
        }
    }

    pub fn constructor(class_name: &str) -> Self {
        Self {
            kind: MethodKind::Constructor,
            return_ty: None,
            ..Self::method(class_name, TypeExpr::Void)
        }
    }

    #[must_use]
    pub fn static_(mut self) -> Self {
        self.is_static = true;
        self
    }

    #[must_use]
    pub fn abstract_(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    #[must_use]
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    #[must_use]
    pub fn throws(mut self, name: &str) -> Self {
        self.throws.push(TypeExpr::named(name));
        self
    }

    /// Declare parameters for a body-less (abstract or interface) method.
    #[must_use]
    pub fn params(mut self, params: Vec<(&str, TypeExpr)>) -> Self {
        self.params = params
            .into_iter()
            .map(|(name, ty)| ParamDecl {
                name: Name::new(name),
                ty,
            })
            .collect();
        self
    }

    /// Attach a body; the formal parameter list is taken from the body's parameter locals.
    #[must_use]
    pub fn body(mut self, body: Body) -> Self {
        self.params = body
            .params()
            .iter()
            .map(|&local| {
                let local = body.local(local);
                ParamDecl {
                    name: local.name.clone(),
                    ty: local.ty.clone(),
                }
            })
            .collect();
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    #[must_use]
    pub fn is_constructor(&self) -> bool {
        self.kind == MethodKind::Constructor
    }
}
