use std::collections::BTreeMap;

use kopi_core::{Diagnostic, DiagnosticKind, FileId, SourceLoc, Span};
use kopi_hir::{Body, ExprId, LocalId, StmtId, StmtKind, TypeExpr};
use kopi_types::{is_subclass, ClassGraph, ClassId, MethodId};

/// What the flow analysis needs to know about a body's expressions.
///
/// Implemented by the body resolver; kept as a trait so this crate doesn't depend on it.
pub trait ThrowSiteTyping {
    /// Static class of the operand of a `throw` statement.
    fn thrown_class(&self, expr: ExprId) -> Option<ClassId>;
    /// The method or constructor a call/instance-creation expression resolved to.
    fn callee(&self, expr: ExprId) -> Option<MethodId>;
    /// Resolve a catch clause's declared type.
    fn catch_class(&self, ty: &TypeExpr) -> Option<ClassId>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlowOptions {
    pub report_unreachable_catch: bool,
}

impl Default for FlowOptions {
    fn default() -> Self {
        Self {
            report_unreachable_catch: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ThrowSite {
    Throw(StmtId),
    /// A call whose callee declares the exception in its `throws` clause.
    Call(ExprId),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatchHandler {
    /// `None` when the declared type failed to resolve; such a clause never matches.
    pub catch_type: Option<ClassId>,
    pub param: LocalId,
    pub body: StmtId,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TryRegion {
    pub stmt: StmtId,
    /// Declaration order.
    pub handlers: Vec<CatchHandler>,
    pub finally: Option<StmtId>,
    /// Each statically possible throwable of the protected block and the clause that handles it
    /// (`None`: propagates outward).
    pub outcomes: BTreeMap<ClassId, Option<usize>>,
}

impl TryRegion {
    /// First clause, in declaration order, whose type is `thrown` or a supertype of it.
    #[must_use]
    pub fn select(&self, graph: &ClassGraph, thrown: ClassId) -> Option<usize> {
        let catch_types: Vec<Option<ClassId>> =
            self.handlers.iter().map(|h| h.catch_type).collect();
        select_catch(graph, &catch_types, thrown)
    }
}

/// First-match catch selection over clause types in declaration order.
#[must_use]
pub fn select_catch(
    graph: &ClassGraph,
    catch_types: &[Option<ClassId>],
    thrown: ClassId,
) -> Option<usize> {
    catch_types
        .iter()
        .position(|ty| ty.is_some_and(|ty| is_subclass(graph, thrown, ty)))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disposition {
    Caught { try_stmt: StmtId, clause: usize },
    /// Leaves the method.
    Escapes,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Propagation {
    pub site: ThrowSite,
    pub exception: ClassId,
    pub disposition: Disposition,
    /// `finally` blocks run on the way out, innermost first. The catching statement's own
    /// `finally` runs after its handler and is not listed.
    pub finally: Vec<StmtId>,
}

/// Per-method catch/finally resolution table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExceptionTable {
    regions: Vec<TryRegion>,
    propagations: Vec<Propagation>,
}

impl ExceptionTable {
    /// Try regions in source order (outer before inner).
    #[must_use]
    pub fn regions(&self) -> &[TryRegion] {
        &self.regions
    }

    #[must_use]
    pub fn region(&self, stmt: StmtId) -> Option<&TryRegion> {
        self.regions.iter().find(|r| r.stmt == stmt)
    }

    /// One record per (site, exception type), in source order.
    #[must_use]
    pub fn propagations(&self) -> &[Propagation] {
        &self.propagations
    }

    /// Every exception type that may leave the method, sorted.
    #[must_use]
    pub fn escaping(&self) -> Vec<ClassId> {
        let mut out: Vec<ClassId> = self
            .propagations
            .iter()
            .filter(|p| p.disposition == Disposition::Escapes)
            .map(|p| p.exception)
            .collect();
        out.sort();
        out.dedup();
        out
    }
}

#[derive(Clone, Debug, Default)]
pub struct MethodFlow {
    pub table: ExceptionTable,
    pub diagnostics: Vec<Diagnostic>,
}

struct Walker<'a> {
    graph: &'a ClassGraph,
    body: &'a Body,
    typing: &'a dyn ThrowSiteTyping,
    options: &'a FlowOptions,
    method: MethodId,
    file: Option<FileId>,
    table: ExceptionTable,
    diagnostics: Vec<Diagnostic>,
    /// Try statements enclosing the current statement, outermost first.
    enclosing: Vec<Enclosing>,
}

#[derive(Clone, Copy)]
struct Enclosing {
    /// Index into `table.regions`.
    region: usize,
    /// `false` inside a catch clause: only the `finally` still applies.
    catches: bool,
}

/// Build the exception table of `method` and validate its checked exceptions.
pub fn analyze_method(
    graph: &ClassGraph,
    method: MethodId,
    typing: &dyn ThrowSiteTyping,
    options: &FlowOptions,
) -> MethodFlow {
    let entry = graph.method(method);
    let Some(body) = entry.body.as_ref() else {
        return MethodFlow::default();
    };

    let mut walker = Walker {
        graph,
        body,
        typing,
        options,
        method,
        file: graph.file_of(entry.owner),
        table: ExceptionTable::default(),
        diagnostics: Vec::new(),
        enclosing: Vec::new(),
    };
    walker.walk_stmt(body.root());

    tracing::trace!(
        target: "kopi.flow",
        method = %graph.display_method(method),
        regions = walker.table.regions.len(),
        sites = walker.table.propagations.len(),
        "built exception table"
    );
    MethodFlow {
        table: walker.table,
        diagnostics: walker.diagnostics,
    }
}

impl Walker<'_> {
    fn location(&self, span: Span) -> Option<SourceLoc> {
        self.file.map(|file| SourceLoc::new(file, span))
    }

    fn walk_stmt(&mut self, stmt: StmtId) {
        let body = self.body;
        let kind = &body.stmt(stmt).kind;

        if let StmtKind::Try {
            body: protected,
            catches,
            finally,
        } = kind
        {
            let handlers: Vec<CatchHandler> = catches
                .iter()
                .map(|clause| CatchHandler {
                    catch_type: self.typing.catch_class(&clause.ty),
                    param: clause.param,
                    body: clause.body,
                    span: clause.span,
                })
                .collect();
            if self.options.report_unreachable_catch {
                self.check_reachability(&handlers);
            }

            let idx = self.table.regions.len();
            self.table.regions.push(TryRegion {
                stmt,
                handlers,
                finally: *finally,
                outcomes: BTreeMap::new(),
            });

            self.enclosing.push(Enclosing {
                region: idx,
                catches: true,
            });
            self.walk_stmt(*protected);
            self.enclosing.pop();

            // Handlers are only protected by the enclosing regions, but still leave through this
            // statement's `finally`.
            self.enclosing.push(Enclosing {
                region: idx,
                catches: false,
            });
            for clause in catches {
                self.walk_stmt(clause.body);
            }
            self.enclosing.pop();
            if let Some(finally) = finally {
                self.walk_stmt(*finally);
            }
            return;
        }

        for expr in kind.exprs() {
            for call in body.call_sites_in(expr) {
                self.call_site(call);
            }
        }
        if let StmtKind::Throw(expr) = kind {
            if let Some(class) = self.typing.thrown_class(*expr) {
                self.propagate(ThrowSite::Throw(stmt), class, body.stmt(stmt).span);
            }
        }
        for child in kind.children() {
            self.walk_stmt(child);
        }
    }

    fn call_site(&mut self, expr: ExprId) {
        let Some(callee) = self.typing.callee(expr) else {
            return;
        };
        let span = self.body.expr(expr).span;
        for &exception in &self.graph.method(callee).throws {
            self.propagate(ThrowSite::Call(expr), exception, span);
        }
    }

    fn propagate(&mut self, site: ThrowSite, exception: ClassId, span: Span) {
        let mut finally = Vec::new();
        for &Enclosing { region: idx, catches } in self.enclosing.iter().rev() {
            let region = &mut self.table.regions[idx];
            if catches {
                match region.select(self.graph, exception) {
                    Some(clause) => {
                        region.outcomes.insert(exception, Some(clause));
                        let try_stmt = region.stmt;
                        self.table.propagations.push(Propagation {
                            site,
                            exception,
                            disposition: Disposition::Caught { try_stmt, clause },
                            finally,
                        });
                        return;
                    }
                    None => {
                        region.outcomes.entry(exception).or_insert(None);
                    }
                }
            }
            finally.extend(region.finally);
        }

        self.table.propagations.push(Propagation {
            site,
            exception,
            disposition: Disposition::Escapes,
            finally,
        });

        let graph = self.graph;
        let declared = &graph.method(self.method).throws;
        let covered = graph.is_unchecked(exception)
            || declared
                .iter()
                .any(|&throws| is_subclass(graph, exception, throws));
        if !covered {
            let exception_name = graph.class(exception).name.to_string();
            let method_name = graph.display_method(self.method);
            self.diagnostics.push(Diagnostic::new(
                DiagnosticKind::UndeclaredCheckedException,
                vec![exception_name.clone(), method_name.clone()],
                format!(
                    "unreported exception `{exception_name}` must be caught or declared to be thrown by `{method_name}`"
                ),
                self.location(span),
            ));
        }
    }

    fn check_reachability(&mut self, handlers: &[CatchHandler]) {
        for (later_idx, later) in handlers.iter().enumerate() {
            let Some(later_ty) = later.catch_type else {
                continue;
            };
            let shadowing = handlers[..later_idx]
                .iter()
                .filter_map(|h| h.catch_type)
                .find(|&earlier| is_subclass(self.graph, later_ty, earlier));
            if let Some(earlier) = shadowing {
                let later_name = self.graph.class(later_ty).name.to_string();
                let earlier_name = self.graph.class(earlier).name.to_string();
                self.diagnostics.push(Diagnostic::new(
                    DiagnosticKind::UnreachableCatchClause,
                    vec![later_name.clone(), earlier_name.clone()],
                    format!("catch clause for `{later_name}` is unreachable: `{earlier_name}` is caught first"),
                    self.location(later.span),
                ));
            }
        }
    }
}
