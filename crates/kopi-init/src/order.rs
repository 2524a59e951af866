use std::collections::{BTreeSet, HashSet};

use kopi_core::{Diagnostic, DiagnosticKind};
use kopi_hir::ExprId;
use kopi_types::{ClassGraph, ClassId, MethodId};

use crate::plan::static_init_plan;
use crate::state::{InitState, InitTracker};

/// An event inside an expression or method body that can start class initialization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// Static field access or instance creation.
    Class(ClassId),
    /// A call; static methods and constructors also trigger their owner first.
    Invoke(MethodId),
}

/// Static-use information extracted by the body resolver.
pub trait StaticTriggers {
    /// Triggers of one field initializer expression of `class`, in evaluation order.
    fn initializer_triggers(&self, class: ClassId, expr: ExprId) -> Vec<Trigger>;
    /// Triggers anywhere in a method or constructor body, in source order.
    fn method_triggers(&self, method: MethodId) -> Vec<Trigger>;
}

#[derive(Clone, Debug, Default)]
pub struct StaticInitOrder {
    /// Classes in the order their static initialization starts.
    pub order: Vec<ClassId>,
    pub diagnostics: Vec<Diagnostic>,
}

struct Simulation<'a> {
    graph: &'a ClassGraph,
    triggers: &'a dyn StaticTriggers,
    tracker: InitTracker,
    /// Classes whose initializers are currently running, innermost last.
    running: Vec<ClassId>,
    /// Method bodies already walked, keyed by the initializers running at the time. The same
    /// helper reached under a different stack can close a different cycle.
    explored: HashSet<(MethodId, Vec<ClassId>)>,
    reported: BTreeSet<Vec<String>>,
    diagnostics: Vec<Diagnostic>,
}

/// Simulate first-use initialization starting at `entry`.
///
/// Each class's superclass is initialized first, then its static initializers run in declaration
/// order, and every class they touch (transitively through called methods) is initialized on the
/// spot. A trigger that reaches a class whose initializer is still running, other than the class
/// currently initializing itself, is a `CircularStaticInitialization`.
pub fn static_init_order(
    graph: &ClassGraph,
    entry: ClassId,
    triggers: &dyn StaticTriggers,
) -> StaticInitOrder {
    let mut sim = Simulation {
        graph,
        triggers,
        tracker: InitTracker::new(),
        running: Vec::new(),
        explored: HashSet::new(),
        reported: BTreeSet::new(),
        diagnostics: Vec::new(),
    };
    sim.trigger(entry);

    StaticInitOrder {
        order: sim.tracker.started().to_vec(),
        diagnostics: sim.diagnostics,
    }
}

impl Simulation<'_> {
    fn trigger(&mut self, class: ClassId) {
        match self.tracker.state(class) {
            InitState::Initialized => return,
            InitState::InProgress => {
                self.circular(class);
                return;
            }
            InitState::Uninitialized => {}
        }

        self.tracker.begin(class);
        tracing::trace!(
            target: "kopi.init",
            class = %self.graph.class(class).name,
            "static initialization triggered"
        );
        if let Some(sup) = self.graph.class(class).super_class {
            self.trigger(sup);
        }

        self.running.push(class);
        for step in static_init_plan(self.graph, class) {
            for trigger in self.triggers.initializer_triggers(class, step.expr) {
                self.apply(trigger);
            }
        }
        self.running.pop();

        self.tracker.finish(class);
    }

    fn apply(&mut self, trigger: Trigger) {
        match trigger {
            Trigger::Class(class) => self.trigger(class),
            Trigger::Invoke(method) => {
                let entry = self.graph.method(method);
                if entry.is_static || entry.is_constructor() {
                    self.trigger(entry.owner);
                }
                if self.explored.insert((method, self.running.clone())) {
                    for trigger in self.triggers.method_triggers(method) {
                        self.apply(trigger);
                    }
                }
            }
        }
    }

    fn circular(&mut self, class: ClassId) {
        // Reading one's own statics during initialization is fine.
        if self.running.last() == Some(&class) {
            return;
        }
        // Still waiting on its superclass chain; not yet running its own initializers.
        let Some(start) = self.running.iter().position(|c| *c == class) else {
            return;
        };

        let mut members: Vec<String> = self.running[start..]
            .iter()
            .map(|c| self.graph.class(*c).name.to_string())
            .collect();
        members.sort();
        members.dedup();
        if !self.reported.insert(members.clone()) {
            return;
        }

        let current = self.running.last().copied().unwrap_or(class);
        tracing::debug!(
            target: "kopi.init",
            cycle = ?members,
            "circular static initialization"
        );
        self.diagnostics.push(Diagnostic::new(
            DiagnosticKind::CircularStaticInitialization,
            members.clone(),
            format!(
                "static initialization of `{}` re-enters `{}` before it completes",
                self.graph.class(current).name,
                self.graph.class(class).name
            ),
            self.graph.class(current).location,
        ));
    }
}
