use std::fmt;

use kopi_core::{Name, Span};
use serde::{Deserialize, Serialize};

use crate::TypeExpr;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExprId(u32);

impl ExprId {
    pub(crate) fn from_raw(raw: u32) -> Self {
        ExprId(raw)
    }

    #[must_use]
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExprId({})", self.0)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StmtId(u32);

impl StmtId {
    pub(crate) fn from_raw(raw: u32) -> Self {
        StmtId(raw)
    }

    #[must_use]
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for StmtId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StmtId({})", self.0)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LocalId(u32);

impl LocalId {
    pub(crate) fn from_raw(raw: u32) -> Self {
        LocalId(raw)
    }

    #[must_use]
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for LocalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LocalId({})", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Arena<T> {
    data: Vec<T>,
}

impl<T> Arena<T> {
    pub fn alloc(&mut self, value: T) -> u32 {
        let idx = self.data.len() as u32;
        self.data.push(value);
        idx
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = (u32, &T)> {
        self.data.iter().enumerate().map(|(i, v)| (i as u32, v))
    }

    fn get(&self, idx: usize) -> Option<&T> {
        self.data.get(idx)
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Arena { data: Vec::new() }
    }
}

impl<T> std::ops::Index<ExprId> for Arena<T> {
    type Output = T;

    fn index(&self, index: ExprId) -> &Self::Output {
        &self.data[index.idx()]
    }
}

impl<T> std::ops::Index<StmtId> for Arena<T> {
    type Output = T;

    fn index(&self, index: StmtId) -> &Self::Output {
        &self.data[index.idx()]
    }
}

impl<T> std::ops::Index<LocalId> for Arena<T> {
    type Output = T;

    fn index(&self, index: LocalId) -> &Self::Output {
        &self.data[index.idx()]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Bool(bool),
    Char(char),
    Str(String),
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl BinaryOp {
    #[must_use]
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge
        )
    }

    #[must_use]
    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }
}

/// What a member access or call is qualified with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Receiver {
    /// Unqualified: `foo()` / `foo`, resolved against the enclosing class.
    Implicit,
    /// `expr.foo()` / `expr.foo`.
    Expr(ExprId),
    /// `super.foo()` / `super.foo`.
    Super,
    /// `Type.foo()` / `Type.foo` (static access).
    Type(TypeExpr),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprKind {
    Literal(Literal),
    Local(LocalId),
    This,
    Field {
        receiver: Receiver,
        name: Name,
    },
    Call {
        receiver: Receiver,
        name: Name,
        args: Vec<ExprId>,
    },
    New {
        class: TypeExpr,
        args: Vec<ExprId>,
    },
    Unary {
        op: UnaryOp,
        expr: ExprId,
    },
    Binary {
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstructorCallKind {
    This,
    Super,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatchClause {
    pub param: LocalId,
    pub ty: TypeExpr,
    pub body: StmtId,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StmtKind {
    Block(Vec<StmtId>),
    Let {
        local: LocalId,
        initializer: Option<ExprId>,
    },
    /// `target = value`, or `target op= value` when `op` is set.
    ///
    /// `target` is always an [`ExprKind::Local`] or [`ExprKind::Field`] expression.
    Assign {
        target: ExprId,
        op: Option<BinaryOp>,
        value: ExprId,
    },
    Expr(ExprId),
    If {
        condition: ExprId,
        then_branch: StmtId,
        else_branch: Option<StmtId>,
    },
    While {
        condition: ExprId,
        body: StmtId,
    },
    Return(Option<ExprId>),
    Throw(ExprId),
    Try {
        body: StmtId,
        catches: Vec<CatchClause>,
        finally: Option<StmtId>,
    },
    /// Explicit `this(...)` / `super(...)` as the first statement of a constructor.
    ConstructorCall {
        kind: ConstructorCallKind,
        args: Vec<ExprId>,
    },
    Nop,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocalKind {
    Param,
    Local,
    CatchParam,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Local {
    pub name: Name,
    pub ty: TypeExpr,
    pub kind: LocalKind,
    pub span: Span,
}

/// Arena-backed statement tree of one method body (or one class's field initializers).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub(crate) exprs: Arena<Expr>,
    pub(crate) stmts: Arena<Stmt>,
    pub(crate) locals: Arena<Local>,
    pub(crate) params: Vec<LocalId>,
    pub(crate) root: StmtId,
}

impl Body {
    #[must_use]
    pub fn root(&self) -> StmtId {
        self.root
    }

    #[must_use]
    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id]
    }

    #[must_use]
    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id]
    }

    #[must_use]
    pub fn local(&self, id: LocalId) -> &Local {
        &self.locals[id]
    }

    #[must_use]
    pub fn try_expr(&self, id: ExprId) -> Option<&Expr> {
        self.exprs.get(id.idx())
    }

    #[must_use]
    pub fn locals(&self) -> &[Local] {
        &self.locals.data
    }

    #[must_use]
    pub fn params(&self) -> &[LocalId] {
        &self.params
    }

    pub fn expr_ids(&self) -> impl Iterator<Item = ExprId> + '_ {
        self.exprs.iter().map(|(idx, _)| ExprId::from_raw(idx))
    }

    pub fn stmt_ids(&self) -> impl Iterator<Item = StmtId> + '_ {
        self.stmts.iter().map(|(idx, _)| StmtId::from_raw(idx))
    }

    /// The explicit `this(...)`/`super(...)` call, if the root block starts with one.
    #[must_use]
    pub fn leading_constructor_call(&self) -> Option<(StmtId, ConstructorCallKind, &[ExprId])> {
        let first = match &self.stmt(self.root).kind {
            StmtKind::Block(stmts) => *stmts.first()?,
            _ => self.root,
        };
        match &self.stmt(first).kind {
            StmtKind::ConstructorCall { kind, args } => Some((first, *kind, args.as_slice())),
            _ => None,
        }
    }
}
