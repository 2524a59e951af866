use std::collections::BTreeSet;

use kopi_core::{sort_diagnostics, Diagnostic, DiagnosticKind};
use kopi_flow::{
    analyze_initializers, analyze_method, ExceptionTable, FlowOptions, ThrowSiteTyping,
};
use kopi_hir::{Body, CompilationUnit, ConstructorCallKind, ExprId, ExprKind, TypeExpr};
use kopi_init::{
    instance_init_plan, instantiation_plan, static_init_order, Chained, ConstructorLinks,
    InstantiationStep, StaticInitOrder, StaticTriggers, Trigger,
};
use kopi_types::{
    build_class_graph, resolve_constructor_call, ClassGraph, ClassId, GraphBuild, GraphOptions,
    MethodId, MethodResolution,
};

use crate::body::{BodyChecker, BodyOwner, BodyTypes, CallTarget};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    pub graph: GraphOptions,
    pub flow: FlowOptions,
}

/// Everything the output collaborator consumes: the graph, per-body typing (with one selected
/// target per call site), constructor chaining, and per-method exception tables.
#[derive(Clone, Debug)]
pub struct ResolvedProgram {
    graph: ClassGraph,
    /// Indexed by `MethodId`; empty for body-less methods.
    methods: Vec<BodyTypes>,
    /// Indexed by `ClassId`.
    initializers: Vec<BodyTypes>,
    chains: Vec<Option<Chained>>,
    exceptions: Vec<ExceptionTable>,
    diagnostics: Vec<Diagnostic>,
}

/// Resolve a whole input set, collecting every diagnostic instead of stopping at the first.
///
/// The result depends only on the set of declarations, never on the order of `units`.
pub fn resolve_program(units: Vec<CompilationUnit>, options: &ResolveOptions) -> ResolvedProgram {
    let GraphBuild {
        graph,
        mut diagnostics,
    } = build_class_graph(units, &options.graph);

    let initializers: Vec<BodyTypes> = graph
        .classes()
        .map(|class| {
            let mut checker =
                BodyChecker::new(&graph, class.id, &class.initializers, &mut diagnostics);
            for &field in &class.fields {
                checker.check_initializer(field);
            }
            checker.finish()
        })
        .collect();

    let methods: Vec<BodyTypes> = graph
        .methods()
        .map(|method| match &method.body {
            Some(body) => {
                let mut checker = BodyChecker::new(&graph, method.owner, body, &mut diagnostics);
                checker.check_method(method.id);
                checker.finish()
            }
            None => BodyTypes::default(),
        })
        .collect();

    let chains: Vec<Option<Chained>> = graph
        .methods()
        .map(|method| {
            if !method.is_constructor() {
                return None;
            }
            let types = &methods[method.id.idx()];
            if let Some((_, chained)) = types.explicit_chain() {
                return Some(chained);
            }
            // An explicit call that failed to resolve has already been reported.
            let explicit = method
                .body
                .as_ref()
                .and_then(Body::leading_constructor_call)
                .is_some();
            if explicit {
                return None;
            }
            implicit_super(&graph, method.id, &mut diagnostics)
        })
        .collect();

    let exceptions: Vec<ExceptionTable> = graph
        .methods()
        .map(|method| {
            let typing = FlowTyping {
                graph: &graph,
                owner: method.owner,
                types: &methods[method.id.idx()],
            };
            let flow = analyze_method(&graph, method.id, &typing, &options.flow);
            diagnostics.extend(flow.diagnostics);
            flow.table
        })
        .collect();

    for class in graph.classes() {
        let typing = FlowTyping {
            graph: &graph,
            owner: class.id,
            types: &initializers[class.id.idx()],
        };
        diagnostics.extend(analyze_initializers(&graph, class.id, &typing));
    }

    let mut program = ResolvedProgram {
        graph,
        methods,
        initializers,
        chains,
        exceptions,
        diagnostics: Vec::new(),
    };

    // Every cycle shows up from each of its members; keep one report per member set.
    let mut cycles = BTreeSet::new();
    for &class in program.graph.load_order() {
        if program.graph.file_of(class).is_none() {
            continue;
        }
        for diagnostic in program.static_init_order(class).diagnostics {
            if cycles.insert(diagnostic.symbols.clone()) {
                diagnostics.push(diagnostic);
            }
        }
    }

    sort_diagnostics(&mut diagnostics);
    tracing::debug!(
        target: "kopi.resolve",
        classes = program.graph.len(),
        diagnostics = diagnostics.len(),
        "resolved program"
    );
    program.diagnostics = diagnostics;
    program
}

/// `super()` inserted into a constructor without an explicit chained call.
fn implicit_super(
    graph: &ClassGraph,
    ctor: MethodId,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<Chained> {
    let entry = graph.method(ctor);
    let sup = graph.class(entry.owner).super_class?;
    let target = match resolve_constructor_call(graph, sup, &[]) {
        MethodResolution::Found(target) => target,
        _ => {
            let sup = graph.class(sup);
            let call = format!("{}.{}()", sup.name, sup.simple_name);
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::NoApplicableMethod,
                vec![call.clone()],
                format!(
                    "implicit `super()` in `{}` needs `{call}`",
                    graph.display_method(ctor)
                ),
                entry.location,
            ));
            return None;
        }
    };
    Some(Chained {
        kind: ConstructorCallKind::Super,
        target,
    })
}

struct FlowTyping<'a> {
    graph: &'a ClassGraph,
    owner: ClassId,
    types: &'a BodyTypes,
}

impl ThrowSiteTyping for FlowTyping<'_> {
    fn thrown_class(&self, expr: ExprId) -> Option<ClassId> {
        self.types.expr_type(expr).as_class()
    }

    fn callee(&self, expr: ExprId) -> Option<MethodId> {
        self.types.call(expr).map(|target| target.method)
    }

    fn catch_class(&self, ty: &TypeExpr) -> Option<ClassId> {
        self.graph.resolve_type_in(self.owner, ty)?.as_class()
    }
}

impl ResolvedProgram {
    #[must_use]
    pub fn graph(&self) -> &ClassGraph {
        &self.graph
    }

    /// Every diagnostic of the input set, in canonical order.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    #[must_use]
    pub fn body(&self, owner: BodyOwner) -> Option<&Body> {
        match owner {
            BodyOwner::Method(method) => self.graph.method(method).body.as_ref(),
            BodyOwner::Initializers(class) => Some(&self.graph.class(class).initializers),
        }
    }

    #[must_use]
    pub fn body_types(&self, owner: BodyOwner) -> &BodyTypes {
        match owner {
            BodyOwner::Method(method) => &self.methods[method.idx()],
            BodyOwner::Initializers(class) => &self.initializers[class.idx()],
        }
    }

    /// The single method or constructor a call site resolved to.
    #[must_use]
    pub fn call_target(&self, owner: BodyOwner, expr: ExprId) -> Option<CallTarget> {
        self.body_types(owner).call(expr)
    }

    #[must_use]
    pub fn exception_table(&self, method: MethodId) -> &ExceptionTable {
        &self.exceptions[method.idx()]
    }

    #[must_use]
    pub fn static_init_order(&self, entry: ClassId) -> StaticInitOrder {
        static_init_order(&self.graph, entry, self)
    }

    #[must_use]
    pub fn instantiation_plan(&self, ctor: MethodId) -> Vec<InstantiationStep> {
        instantiation_plan(&self.graph, ctor, self)
    }

    fn expr_triggers(&self, body: &Body, types: &BodyTypes, root: ExprId, out: &mut Vec<Trigger>) {
        body.walk_expr(root, &mut |expr| match body.expr(expr).kind {
            ExprKind::Field { .. } => {
                if let Some(field) = types.field(expr) {
                    let field = self.graph.field(field);
                    if field.is_static {
                        out.push(Trigger::Class(field.owner));
                    }
                }
            }
            ExprKind::Call { .. } | ExprKind::New { .. } => {
                if let Some(target) = types.call(expr) {
                    out.push(Trigger::Invoke(target.method));
                }
            }
            _ => {}
        });
    }
}

impl ConstructorLinks for ResolvedProgram {
    fn chained(&self, ctor: MethodId) -> Option<Chained> {
        self.chains.get(ctor.idx()).copied().flatten()
    }
}

impl StaticTriggers for ResolvedProgram {
    fn initializer_triggers(&self, class: ClassId, expr: ExprId) -> Vec<Trigger> {
        let mut out = Vec::new();
        self.expr_triggers(
            &self.graph.class(class).initializers,
            &self.initializers[class.idx()],
            expr,
            &mut out,
        );
        out
    }

    fn method_triggers(&self, method: MethodId) -> Vec<Trigger> {
        let entry = self.graph.method(method);
        let mut out = Vec::new();

        if entry.is_constructor() {
            let chained = self.chained(method);
            if let Some(chained) = chained {
                out.push(Trigger::Invoke(chained.target));
            }
            let delegates = chained.is_some_and(|c| c.kind == ConstructorCallKind::This);
            if !delegates {
                for step in instance_init_plan(&self.graph, entry.owner) {
                    out.extend(self.initializer_triggers(entry.owner, step.expr));
                }
            }
        }

        if let Some(body) = &entry.body {
            let types = &self.methods[method.idx()];
            let mut stack = vec![body.root()];
            while let Some(stmt) = stack.pop() {
                let kind = &body.stmt(stmt).kind;
                for expr in kind.exprs() {
                    self.expr_triggers(body, types, expr, &mut out);
                }
                let mut children = kind.children();
                children.reverse();
                stack.extend(children);
            }
        }
        out
    }
}
