//! Traversal helpers for call-site and throw-site extraction.

use crate::body::{Body, ExprId, ExprKind, Receiver, StmtId, StmtKind};

impl ExprKind {
    /// Direct sub-expressions in Java evaluation order (receiver first, then arguments).
    #[must_use]
    pub fn children(&self) -> Vec<ExprId> {
        match self {
            ExprKind::Literal(_) | ExprKind::Local(_) | ExprKind::This => Vec::new(),
            ExprKind::Field { receiver, .. } => receiver_expr(receiver).into_iter().collect(),
            ExprKind::Call { receiver, args, .. } => {
                let mut out: Vec<ExprId> = receiver_expr(receiver).into_iter().collect();
                out.extend(args.iter().copied());
                out
            }
            ExprKind::New { args, .. } => args.clone(),
            ExprKind::Unary { expr, .. } => vec![*expr],
            ExprKind::Binary { lhs, rhs, .. } => vec![*lhs, *rhs],
        }
    }
}

fn receiver_expr(receiver: &Receiver) -> Option<ExprId> {
    match receiver {
        Receiver::Expr(expr) => Some(*expr),
        Receiver::Implicit | Receiver::Super | Receiver::Type(_) => None,
    }
}

impl StmtKind {
    /// Expressions evaluated directly by this statement (not by nested statements).
    #[must_use]
    pub fn exprs(&self) -> Vec<ExprId> {
        match self {
            StmtKind::Let { initializer, .. } => initializer.iter().copied().collect(),
            StmtKind::Assign { target, value, .. } => vec![*target, *value],
            StmtKind::Expr(expr) | StmtKind::Throw(expr) => vec![*expr],
            StmtKind::If { condition, .. } | StmtKind::While { condition, .. } => vec![*condition],
            StmtKind::Return(value) => value.iter().copied().collect(),
            StmtKind::ConstructorCall { args, .. } => args.clone(),
            StmtKind::Block(_) | StmtKind::Try { .. } | StmtKind::Nop => Vec::new(),
        }
    }

    /// Nested statements in source order.
    #[must_use]
    pub fn children(&self) -> Vec<StmtId> {
        match self {
            StmtKind::Block(stmts) => stmts.clone(),
            StmtKind::If {
                then_branch,
                else_branch,
                ..
            } => {
                let mut out = vec![*then_branch];
                out.extend(else_branch.iter().copied());
                out
            }
            StmtKind::While { body, .. } => vec![*body],
            StmtKind::Try {
                body,
                catches,
                finally,
            } => {
                let mut out = vec![*body];
                out.extend(catches.iter().map(|c| c.body));
                out.extend(finally.iter().copied());
                out
            }
            _ => Vec::new(),
        }
    }
}

impl Body {
    /// Visit `root` and all of its sub-expressions in post-order (operands before the operation).
    pub fn walk_expr(&self, root: ExprId, f: &mut dyn FnMut(ExprId)) {
        for child in self.expr(root).kind.children() {
            self.walk_expr(child, f);
        }
        f(root);
    }

    /// Visit every expression evaluated directly by `stmt`, excluding nested statements.
    pub fn walk_stmt_exprs(&self, stmt: StmtId, f: &mut dyn FnMut(ExprId)) {
        for expr in self.stmt(stmt).kind.exprs() {
            self.walk_expr(expr, f);
        }
    }

    /// Call and instance-creation expressions under `root`, in evaluation order.
    #[must_use]
    pub fn call_sites_in(&self, root: ExprId) -> Vec<ExprId> {
        let mut out = Vec::new();
        self.walk_expr(root, &mut |expr| {
            if matches!(
                self.expr(expr).kind,
                ExprKind::Call { .. } | ExprKind::New { .. }
            ) {
                out.push(expr);
            }
        });
        out
    }

    /// Every call and instance-creation expression reachable from the root statement.
    #[must_use]
    pub fn call_sites(&self) -> Vec<ExprId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root()];
        // Depth-first in source order: push children reversed.
        while let Some(stmt) = stack.pop() {
            for expr in self.stmt(stmt).kind.exprs() {
                out.extend(self.call_sites_in(expr));
            }
            let mut children = self.stmt(stmt).kind.children();
            children.reverse();
            stack.extend(children);
        }
        out
    }

    /// Every `throw` statement reachable from the root statement, in source order.
    #[must_use]
    pub fn throw_sites(&self) -> Vec<StmtId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root()];
        while let Some(stmt) = stack.pop() {
            if matches!(self.stmt(stmt).kind, StmtKind::Throw(_)) {
                out.push(stmt);
            }
            let mut children = self.stmt(stmt).kind.children();
            children.reverse();
            stack.extend(children);
        }
        out
    }
}
