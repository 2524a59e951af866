//! Per-body typing: static expression types, call-site targets and field references.

use kopi_core::{Diagnostic, DiagnosticKind, FileId, SourceLoc, Span};
use kopi_hir::{
    BinaryOp, Body, ConstructorCallKind, ExprId, ExprKind, Literal, LocalKind, PrimitiveType,
    Receiver, StmtId, StmtKind, TypeExpr, UnaryOp,
};
use kopi_init::Chained;
use kopi_types::{
    resolve_constructor_call, resolve_method_call, CallKind, ClassGraph, ClassId, FieldId,
    MethodCall, MethodId, MethodResolution, Type,
};
use serde::{Deserialize, Serialize};

/// How a resolved call selects the body that runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DispatchKind {
    /// Through the runtime class's override table.
    Virtual,
    /// Exactly the selected method: `super.m()`, private methods, constructors.
    Special,
    Static,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallTarget {
    pub method: MethodId,
    pub dispatch: DispatchKind,
}

/// Typing results of one body, indexed by expression id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BodyTypes {
    expr_types: Vec<Type>,
    calls: Vec<Option<CallTarget>>,
    fields: Vec<Option<FieldId>>,
    local_types: Vec<Type>,
    chained: Option<(StmtId, Chained)>,
}

impl BodyTypes {
    fn new(body: &Body) -> Self {
        let exprs = body.expr_ids().count();
        Self {
            expr_types: vec![Type::Unknown; exprs],
            calls: vec![None; exprs],
            fields: vec![None; exprs],
            local_types: Vec::with_capacity(body.locals().len()),
            chained: None,
        }
    }

    /// `Unknown` for expressions that failed to type or were never visited.
    #[must_use]
    pub fn expr_type(&self, expr: ExprId) -> &Type {
        self.expr_types.get(expr.idx()).unwrap_or(&Type::Unknown)
    }

    /// Target of a call or instance-creation expression.
    #[must_use]
    pub fn call(&self, expr: ExprId) -> Option<CallTarget> {
        self.calls.get(expr.idx()).copied().flatten()
    }

    /// Field read or written by a field-access expression.
    #[must_use]
    pub fn field(&self, expr: ExprId) -> Option<FieldId> {
        self.fields.get(expr.idx()).copied().flatten()
    }

    #[must_use]
    pub fn local_type(&self, local: kopi_hir::LocalId) -> &Type {
        self.local_types.get(local.idx()).unwrap_or(&Type::Unknown)
    }

    /// Declared types of every local (parameters included), indexed by `LocalId`.
    #[must_use]
    pub fn local_types(&self) -> &[Type] {
        &self.local_types
    }

    /// The explicit `this(...)`/`super(...)` statement and what it resolved to.
    #[must_use]
    pub fn explicit_chain(&self) -> Option<(StmtId, Chained)> {
        self.chained
    }
}

/// Where a body comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BodyOwner {
    Method(MethodId),
    /// The class's field initializer arena.
    Initializers(ClassId),
}

pub(crate) struct BodyChecker<'a> {
    graph: &'a ClassGraph,
    body: &'a Body,
    owner: ClassId,
    file: Option<FileId>,
    is_static: bool,
    types: BodyTypes,
    diagnostics: &'a mut Vec<Diagnostic>,
}

impl<'a> BodyChecker<'a> {
    pub(crate) fn new(
        graph: &'a ClassGraph,
        owner: ClassId,
        body: &'a Body,
        diagnostics: &'a mut Vec<Diagnostic>,
    ) -> Self {
        let mut checker = Self {
            graph,
            body,
            owner,
            file: graph.file_of(owner),
            is_static: false,
            types: BodyTypes::new(body),
            diagnostics,
        };
        checker.resolve_locals();
        checker
    }

    pub(crate) fn finish(self) -> BodyTypes {
        self.types
    }

    /// Type a method or constructor body from its root statement.
    pub(crate) fn check_method(&mut self, method: MethodId) {
        self.is_static = self.graph.method(method).is_static;
        self.check_stmt(self.body.root());
    }

    /// Type one field initializer expression.
    pub(crate) fn check_initializer(&mut self, field: FieldId) {
        let entry = self.graph.field(field);
        let Some(expr) = entry.initializer else {
            return;
        };
        self.is_static = entry.is_static;
        let ty = self.infer_expr(expr);
        if kopi_types::is_assignable(self.graph, &ty, &entry.ty) {
            return;
        }
        let field_name = format!("{}.{}", self.owner_name(), entry.name);
        let found = self.graph.display_type(&ty);
        let expected = self.graph.display_type(&entry.ty);
        self.diagnostics.push(Diagnostic::new(
            DiagnosticKind::IncompatibleTypes,
            vec![field_name.clone(), found.clone()],
            format!("initializer of `{field_name}` has type `{found}`, expected `{expected}`"),
            self.location(self.body.expr(expr).span),
        ));
    }

    fn location(&self, span: Span) -> Option<SourceLoc> {
        self.file.map(|file| SourceLoc::new(file, span))
    }

    fn owner_name(&self) -> String {
        self.graph.class(self.owner).name.to_string()
    }

    fn resolve_type(&mut self, ty: &TypeExpr, span: Span) -> Type {
        match self.graph.resolve_type_in(self.owner, ty) {
            Some(ty) => ty,
            None => {
                self.diagnostics.push(Diagnostic::new(
                    DiagnosticKind::UnresolvedType,
                    vec![ty.to_string(), self.owner_name()],
                    format!("cannot find type `{ty}` referenced from `{}`", self.owner_name()),
                    self.location(span),
                ));
                Type::Unknown
            }
        }
    }

    fn resolve_locals(&mut self) {
        let body = self.body;
        for local in body.locals() {
            // Parameter types were already checked as part of the signature.
            let ty = if local.kind == LocalKind::Param {
                self.graph
                    .resolve_type_in(self.owner, &local.ty)
                    .unwrap_or(Type::Unknown)
            } else {
                self.resolve_type(&local.ty, local.span)
            };
            self.types.local_types.push(ty);
        }
    }

    fn check_stmt(&mut self, stmt: StmtId) {
        let body = self.body;
        let kind = &body.stmt(stmt).kind;

        if let StmtKind::ConstructorCall { kind, args } = kind {
            self.check_constructor_call(stmt, *kind, args);
        } else {
            for expr in kind.exprs() {
                self.infer_expr(expr);
            }
        }
        for child in kind.children() {
            self.check_stmt(child);
        }
    }

    fn check_constructor_call(&mut self, stmt: StmtId, kind: ConstructorCallKind, args: &[ExprId]) {
        let arg_types: Vec<Type> = args.iter().map(|arg| self.infer_expr(*arg)).collect();
        let target_class = match kind {
            ConstructorCallKind::This => Some(self.owner),
            ConstructorCallKind::Super => self.graph.class(self.owner).super_class,
        };
        let Some(class) = target_class else {
            return;
        };
        if arg_types.iter().any(Type::is_unknown) {
            return;
        }

        let span = self.body.stmt(stmt).span;
        let resolution = resolve_constructor_call(self.graph, class, &arg_types);
        if let Some(target) = self.accept(resolution, class, "<init>", &arg_types, span) {
            self.types.chained = Some((stmt, Chained { kind, target }));
        }
    }

    fn infer_expr(&mut self, expr: ExprId) -> Type {
        let body = self.body;
        let node = body.expr(expr);
        let ty = match &node.kind {
            ExprKind::Literal(lit) => self.literal_type(lit),
            ExprKind::Local(local) => self.types.local_type(*local).clone(),
            ExprKind::This => Type::Class(self.owner),
            ExprKind::Field { receiver, name } => self.infer_field(expr, receiver, name, node.span),
            ExprKind::Call {
                receiver,
                name,
                args,
            } => self.infer_call(expr, receiver, name, args, node.span),
            ExprKind::New { class, args } => self.infer_new(expr, class, args, node.span),
            ExprKind::Unary { op, expr: operand } => {
                let operand = self.infer_expr(*operand);
                match op {
                    UnaryOp::Not => Type::boolean(),
                    UnaryOp::Neg => match operand.as_primitive() {
                        Some(p) if p.is_numeric() => Type::Primitive(unary_promotion(p)),
                        _ => Type::Unknown,
                    },
                }
            }
            ExprKind::Binary { op, lhs, rhs } => {
                let lhs = self.infer_expr(*lhs);
                let rhs = self.infer_expr(*rhs);
                self.binary_type(*op, &lhs, &rhs)
            }
        };
        self.types.expr_types[expr.idx()] = ty.clone();
        ty
    }

    fn literal_type(&self, lit: &Literal) -> Type {
        match lit {
            Literal::Int(_) => Type::int(),
            Literal::Long(_) => Type::Primitive(PrimitiveType::Long),
            Literal::Float(_) => Type::float(),
            Literal::Double(_) => Type::Primitive(PrimitiveType::Double),
            Literal::Bool(_) => Type::boolean(),
            Literal::Char(_) => Type::Primitive(PrimitiveType::Char),
            Literal::Str(_) => self
                .graph
                .well_known()
                .string
                .map_or(Type::Unknown, Type::Class),
            Literal::Null => Type::Null,
        }
    }

    fn binary_type(&self, op: BinaryOp, lhs: &Type, rhs: &Type) -> Type {
        if op.is_comparison() || op.is_logical() {
            return Type::boolean();
        }
        if let (BinaryOp::Add, Some(string)) = (op, self.graph.well_known().string) {
            if lhs.as_class() == Some(string) || rhs.as_class() == Some(string) {
                return Type::Class(string);
            }
        }
        match (lhs.as_primitive(), rhs.as_primitive()) {
            (Some(a), Some(b)) if a.is_numeric() && b.is_numeric() => {
                Type::Primitive(binary_promotion(a, b))
            }
            _ => Type::Unknown,
        }
    }

    /// The class a receiver denotes, or `None` after reporting (or when the receiver's type is
    /// already unknown).
    fn receiver_class(&mut self, receiver: &Receiver, name: &str, span: Span) -> Option<ClassId> {
        match receiver {
            Receiver::Implicit => Some(self.owner),
            Receiver::Super => self.graph.class(self.owner).super_class,
            Receiver::Type(ty) => self.resolve_type(ty, span).as_class(),
            Receiver::Expr(expr) => match self.infer_expr(*expr) {
                Type::Class(class) => Some(class),
                Type::Unknown => None,
                other => {
                    let ty = self.graph.display_type(&other);
                    self.diagnostics.push(Diagnostic::new(
                        DiagnosticKind::UnresolvedMember,
                        vec![name.to_string(), ty.clone()],
                        format!("`{ty}` has no member `{name}`"),
                        self.location(span),
                    ));
                    None
                }
            },
        }
    }

    fn infer_field(&mut self, expr: ExprId, receiver: &Receiver, name: &str, span: Span) -> Type {
        let Some(class) = self.receiver_class(receiver, name, span) else {
            return Type::Unknown;
        };
        match self.graph.lookup_field(class, name) {
            Some(field) => {
                self.types.fields[expr.idx()] = Some(field);
                self.graph.field(field).ty.clone()
            }
            None => {
                let class_name = self.graph.class(class).name.to_string();
                self.diagnostics.push(Diagnostic::new(
                    DiagnosticKind::UnresolvedMember,
                    vec![name.to_string(), class_name.clone()],
                    format!("cannot find field `{name}` in `{class_name}`"),
                    self.location(span),
                ));
                Type::Unknown
            }
        }
    }

    fn infer_call(
        &mut self,
        expr: ExprId,
        receiver: &Receiver,
        name: &str,
        args: &[ExprId],
        span: Span,
    ) -> Type {
        let class = self.receiver_class(receiver, name, span);
        let arg_types: Vec<Type> = args.iter().map(|arg| self.infer_expr(*arg)).collect();
        let Some(class) = class else {
            return Type::Unknown;
        };
        // One unknown argument would turn into a misleading overload failure.
        if arg_types.iter().any(Type::is_unknown) {
            return Type::Unknown;
        }

        let kind = match receiver {
            Receiver::Type(_) => CallKind::Static,
            Receiver::Implicit if self.is_static => CallKind::Static,
            _ => CallKind::Instance,
        };
        let resolution = resolve_method_call(
            self.graph,
            &MethodCall {
                receiver: class,
                name,
                args: &arg_types,
                kind,
            },
        );
        let Some(method) = self.accept(resolution, class, name, &arg_types, span) else {
            return Type::Unknown;
        };

        let entry = self.graph.method(method);
        let dispatch = if entry.is_static {
            DispatchKind::Static
        } else if matches!(receiver, Receiver::Super) || !entry.is_virtual() {
            DispatchKind::Special
        } else {
            DispatchKind::Virtual
        };
        self.types.calls[expr.idx()] = Some(CallTarget { method, dispatch });
        entry.return_ty.clone().unwrap_or(Type::Void)
    }

    fn infer_new(&mut self, expr: ExprId, class: &TypeExpr, args: &[ExprId], span: Span) -> Type {
        let ty = self.resolve_type(class, span);
        let arg_types: Vec<Type> = args.iter().map(|arg| self.infer_expr(*arg)).collect();
        let Some(class) = ty.as_class() else {
            return Type::Unknown;
        };

        let entry = self.graph.class(class);
        if entry.is_interface() || entry.is_abstract {
            self.diagnostics.push(Diagnostic::new(
                DiagnosticKind::AbstractInstantiation,
                vec![entry.name.to_string()],
                format!("`{}` is abstract; cannot be instantiated", entry.name),
                self.location(span),
            ));
            return ty;
        }
        if arg_types.iter().any(Type::is_unknown) {
            return ty;
        }

        let resolution = resolve_constructor_call(self.graph, class, &arg_types);
        if let Some(ctor) = self.accept(resolution, class, "<init>", &arg_types, span) {
            self.types.calls[expr.idx()] = Some(CallTarget {
                method: ctor,
                dispatch: DispatchKind::Special,
            });
        }
        ty
    }

    /// Report a failed resolution; `name` is `<init>` for constructors.
    fn accept(
        &mut self,
        resolution: MethodResolution,
        class: ClassId,
        name: &str,
        args: &[Type],
        span: Span,
    ) -> Option<MethodId> {
        let graph = self.graph;
        let class_entry = graph.class(class);
        let shown_name = if name == "<init>" {
            class_entry.simple_name.as_str()
        } else {
            name
        };
        let call = format!(
            "{}.{}({})",
            class_entry.name,
            shown_name,
            args.iter()
                .map(|a| graph.display_type(a))
                .collect::<Vec<_>>()
                .join(", ")
        );

        match resolution {
            MethodResolution::Found(method) => Some(method),
            MethodResolution::NotFound { candidates } if candidates.is_empty() => {
                self.diagnostics.push(Diagnostic::new(
                    DiagnosticKind::UnresolvedMember,
                    vec![shown_name.to_string(), class_entry.name.to_string()],
                    format!("cannot find method `{shown_name}` in `{}`", class_entry.name),
                    self.location(span),
                ));
                None
            }
            MethodResolution::NotFound { candidates } => {
                let considered: Vec<String> =
                    candidates.iter().map(|m| graph.display_method(*m)).collect();
                self.diagnostics.push(Diagnostic::new(
                    DiagnosticKind::NoApplicableMethod,
                    vec![call.clone()],
                    format!(
                        "no applicable method for `{call}`; candidates: {}",
                        considered.join("; ")
                    ),
                    self.location(span),
                ));
                None
            }
            MethodResolution::Ambiguous(tied) => {
                let symbols: Vec<String> = tied.iter().map(|m| graph.display_method(*m)).collect();
                tracing::debug!(
                    target: "kopi.resolve",
                    call = %call,
                    candidates = ?symbols,
                    "ambiguous overload"
                );
                self.diagnostics.push(Diagnostic::new(
                    DiagnosticKind::AmbiguousOverload,
                    symbols.clone(),
                    format!("call `{call}` is ambiguous: {}", symbols.join(" vs ")),
                    self.location(span),
                ));
                None
            }
            MethodResolution::NotStatic(method) => {
                let shown = graph.display_method(method);
                self.diagnostics.push(Diagnostic::new(
                    DiagnosticKind::NonStaticReference,
                    vec![shown.clone()],
                    format!("call `{call}` selects instance method `{shown}` from a static context"),
                    self.location(span),
                ));
                None
            }
        }
    }
}

fn unary_promotion(p: PrimitiveType) -> PrimitiveType {
    match p {
        PrimitiveType::Byte | PrimitiveType::Short | PrimitiveType::Char => PrimitiveType::Int,
        other => other,
    }
}

/// JLS 5.6.2 binary numeric promotion.
pub(crate) fn binary_promotion(a: PrimitiveType, b: PrimitiveType) -> PrimitiveType {
    use PrimitiveType::*;

    if a == Double || b == Double {
        Double
    } else if a == Float || b == Float {
        Float
    } else if a == Long || b == Long {
        Long
    } else {
        Int
    }
}
