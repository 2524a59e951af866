use kopi_core::{Name, Span};

use crate::body::{
    Arena, BinaryOp, Body, CatchClause, ConstructorCallKind, Expr, ExprId, ExprKind, Literal,
    Local, LocalId, LocalKind, Receiver, Stmt, StmtId, StmtKind, UnaryOp,
};
use crate::TypeExpr;

/// Incremental constructor for [`Body`] values.
///
/// The parser collaborator (and the test fixtures) allocate expressions and statements bottom-up;
/// [`BodyBuilder::finish`] wraps the top-level statements into the root block.
#[derive(Debug, Default)]
pub struct BodyBuilder {
    exprs: Arena<Expr>,
    stmts: Arena<Stmt>,
    locals: Arena<Local>,
    params: Vec<LocalId>,
}

impl BodyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc_local(&mut self, name: &str, ty: TypeExpr, kind: LocalKind) -> LocalId {
        LocalId::from_raw(self.locals.alloc(Local {
            name: Name::new(name),
            ty,
            kind,
            span: Span::default(),
        }))
    }

    /// Declare the next formal parameter.
    pub fn param(&mut self, name: &str, ty: TypeExpr) -> LocalId {
        let id = self.alloc_local(name, ty, LocalKind::Param);
        self.params.push(id);
        id
    }

    pub fn local(&mut self, name: &str, ty: TypeExpr) -> LocalId {
        self.alloc_local(name, ty, LocalKind::Local)
    }

    pub fn catch_param(&mut self, name: &str, ty: TypeExpr) -> LocalId {
        self.alloc_local(name, ty, LocalKind::CatchParam)
    }

    // === expressions ===

    pub fn expr_at(&mut self, kind: ExprKind, span: Span) -> ExprId {
        ExprId::from_raw(self.exprs.alloc(Expr { kind, span }))
    }

    pub fn expr(&mut self, kind: ExprKind) -> ExprId {
        self.expr_at(kind, Span::default())
    }

    pub fn literal(&mut self, lit: Literal) -> ExprId {
        self.expr(ExprKind::Literal(lit))
    }

    pub fn int(&mut self, value: i32) -> ExprId {
        self.literal(Literal::Int(value))
    }

    pub fn float(&mut self, value: f32) -> ExprId {
        self.literal(Literal::Float(value))
    }

    pub fn boolean(&mut self, value: bool) -> ExprId {
        self.literal(Literal::Bool(value))
    }

    pub fn string(&mut self, value: &str) -> ExprId {
        self.literal(Literal::Str(value.to_string()))
    }

    pub fn null(&mut self) -> ExprId {
        self.literal(Literal::Null)
    }

    pub fn read(&mut self, local: LocalId) -> ExprId {
        self.expr(ExprKind::Local(local))
    }

    pub fn this(&mut self) -> ExprId {
        self.expr(ExprKind::This)
    }

    pub fn field(&mut self, receiver: Receiver, name: &str) -> ExprId {
        self.expr(ExprKind::Field {
            receiver,
            name: Name::new(name),
        })
    }

    /// `this.name`
    pub fn this_field(&mut self, name: &str) -> ExprId {
        let this = self.this();
        self.field(Receiver::Expr(this), name)
    }

    /// `Type.name`
    pub fn static_field(&mut self, class: &str, name: &str) -> ExprId {
        self.field(Receiver::Type(TypeExpr::named(class)), name)
    }

    pub fn call(&mut self, receiver: Receiver, name: &str, args: Vec<ExprId>) -> ExprId {
        self.expr(ExprKind::Call {
            receiver,
            name: Name::new(name),
            args,
        })
    }

    /// `Type.name(args)`
    pub fn static_call(&mut self, class: &str, name: &str, args: Vec<ExprId>) -> ExprId {
        self.call(Receiver::Type(TypeExpr::named(class)), name, args)
    }

    pub fn new_object(&mut self, class: &str, args: Vec<ExprId>) -> ExprId {
        self.expr(ExprKind::New {
            class: TypeExpr::named(class),
            args,
        })
    }

    pub fn unary(&mut self, op: UnaryOp, expr: ExprId) -> ExprId {
        self.expr(ExprKind::Unary { op, expr })
    }

    pub fn binary(&mut self, op: BinaryOp, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.expr(ExprKind::Binary { op, lhs, rhs })
    }

    // === statements ===

    pub fn stmt_at(&mut self, kind: StmtKind, span: Span) -> StmtId {
        StmtId::from_raw(self.stmts.alloc(Stmt { kind, span }))
    }

    pub fn stmt(&mut self, kind: StmtKind) -> StmtId {
        self.stmt_at(kind, Span::default())
    }

    pub fn block(&mut self, stmts: Vec<StmtId>) -> StmtId {
        self.stmt(StmtKind::Block(stmts))
    }

    pub fn let_(&mut self, local: LocalId, initializer: Option<ExprId>) -> StmtId {
        self.stmt(StmtKind::Let { local, initializer })
    }

    pub fn assign(&mut self, target: ExprId, value: ExprId) -> StmtId {
        self.stmt(StmtKind::Assign {
            target,
            op: None,
            value,
        })
    }

    pub fn compound_assign(&mut self, target: ExprId, op: BinaryOp, value: ExprId) -> StmtId {
        self.stmt(StmtKind::Assign {
            target,
            op: Some(op),
            value,
        })
    }

    pub fn expr_stmt(&mut self, expr: ExprId) -> StmtId {
        self.stmt(StmtKind::Expr(expr))
    }

    pub fn if_(
        &mut self,
        condition: ExprId,
        then_branch: StmtId,
        else_branch: Option<StmtId>,
    ) -> StmtId {
        self.stmt(StmtKind::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    pub fn while_(&mut self, condition: ExprId, body: StmtId) -> StmtId {
        self.stmt(StmtKind::While { condition, body })
    }

    pub fn ret(&mut self, value: Option<ExprId>) -> StmtId {
        self.stmt(StmtKind::Return(value))
    }

    pub fn throw(&mut self, exception: ExprId) -> StmtId {
        self.stmt(StmtKind::Throw(exception))
    }

    pub fn catch_clause(&mut self, param: LocalId, body: StmtId) -> CatchClause {
        let ty = self.locals[param].ty.clone();
        CatchClause {
            param,
            ty,
            body,
            span: Span::default(),
        }
    }

    pub fn try_(
        &mut self,
        body: StmtId,
        catches: Vec<CatchClause>,
        finally: Option<StmtId>,
    ) -> StmtId {
        self.stmt(StmtKind::Try {
            body,
            catches,
            finally,
        })
    }

    pub fn super_call(&mut self, args: Vec<ExprId>) -> StmtId {
        self.stmt(StmtKind::ConstructorCall {
            kind: ConstructorCallKind::Super,
            args,
        })
    }

    pub fn this_call(&mut self, args: Vec<ExprId>) -> StmtId {
        self.stmt(StmtKind::ConstructorCall {
            kind: ConstructorCallKind::This,
            args,
        })
    }

    /// Seal the body; `stmts` become the root block.
    pub fn finish(mut self, stmts: Vec<StmtId>) -> Body {
        let root = self.block(stmts);
        Body {
            exprs: self.exprs,
            stmts: self.stmts,
            locals: self.locals,
            params: self.params,
            root,
        }
    }
}
