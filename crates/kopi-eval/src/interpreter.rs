use std::collections::HashMap;

use kopi_flow::Completion;
use kopi_hir::{
    BinaryOp, Body, ExprId, ExprKind, Literal, LocalId, Receiver, StmtId, StmtKind, UnaryOp,
};
use kopi_init::{static_init_plan, InitState, InitTracker, InstantiationStep};
use kopi_resolve::{BodyOwner, BodyTypes, CallTarget, DispatchKind, ResolvedProgram};
use kopi_types::{resolve_constructor_call, ClassId, FieldId, MethodId, MethodResolution, Type};

use crate::error::EvalError;
use crate::heap::{Heap, ObjectRef};
use crate::value::{arithmetic, compare, display_float, ArithmeticFault, Value};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalOptions {
    /// Nested method and constructor invocations allowed before evaluation gives up.
    pub max_call_depth: usize,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            max_call_depth: 512,
        }
    }
}

/// How evaluation leaves an expression or statement early.
enum Unwind {
    /// A Java exception in flight.
    Throw(ObjectRef),
    Fatal(EvalError),
}

impl From<EvalError> for Unwind {
    fn from(err: EvalError) -> Self {
        Unwind::Fatal(err)
    }
}

type Eval<T> = Result<T, Unwind>;

/// Statement outcome. Exceptions travel as `Err(Unwind::Throw)` and only become
/// `Completion::Throw` while a `try` statement decides what to do with them.
type Outcome = Completion<Value, ObjectRef>;

fn caught(result: Eval<Outcome>) -> Eval<Outcome> {
    match result {
        Err(Unwind::Throw(exception)) => Ok(Completion::Throw(exception)),
        other => other,
    }
}

#[derive(Clone, Copy, Debug)]
enum Place {
    Local(LocalId),
    Static(FieldId),
    Instance(ObjectRef, FieldId),
}

/// Activation of one body.
struct Frame<'p> {
    owner: BodyOwner,
    body: &'p Body,
    types: &'p BodyTypes,
    this: Option<ObjectRef>,
    locals: Vec<Value>,
}

impl<'p> Frame<'p> {
    /// `None` for body-less methods (abstract methods, implicit constructors).
    fn new(
        program: &'p ResolvedProgram,
        owner: BodyOwner,
        this: Option<ObjectRef>,
    ) -> Option<Self> {
        let body = program.body(owner)?;
        let types = program.body_types(owner);
        Some(Self {
            owner,
            body,
            types,
            this,
            locals: types.local_types().iter().map(Value::zero).collect(),
        })
    }

    fn bind(&mut self, args: Vec<Value>) {
        for (&param, arg) in self.body.params().iter().zip(args) {
            let ty = self.types.local_type(param);
            if let Some(slot) = self.locals.get_mut(param.idx()) {
                *slot = arg.coerce(ty);
            }
        }
    }
}

/// Tree-walking evaluator over a [`ResolvedProgram`].
///
/// Calls go to the targets selected during resolution; virtual calls are then dispatched on the
/// receiver's runtime class. Classes are statically initialized on first active use, once.
pub struct Interpreter<'p> {
    program: &'p ResolvedProgram,
    options: EvalOptions,
    heap: Heap,
    statics: HashMap<FieldId, Value>,
    init: InitTracker,
    depth: usize,
}

impl<'p> Interpreter<'p> {
    #[must_use]
    pub fn new(program: &'p ResolvedProgram) -> Self {
        Self::with_options(program, EvalOptions::default())
    }

    #[must_use]
    pub fn with_options(program: &'p ResolvedProgram, options: EvalOptions) -> Self {
        Self {
            program,
            options,
            heap: Heap::default(),
            statics: HashMap::new(),
            init: InitTracker::new(),
            depth: 0,
        }
    }

    #[must_use]
    pub fn program(&self) -> &'p ResolvedProgram {
        self.program
    }

    #[must_use]
    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    /// Classes whose static initialization has started, in the order it started.
    #[must_use]
    pub fn initialized_classes(&self) -> &[ClassId] {
        self.init.started()
    }

    #[must_use]
    pub fn init_state(&self, class: ClassId) -> InitState {
        self.init.state(class)
    }

    /// `new C(args)` through constructor `ctor`.
    pub fn instantiate(&mut self, ctor: MethodId, args: Vec<Value>) -> Result<Value, EvalError> {
        let result = self.new_object(ctor, args).map(Value::Object);
        self.settle(result)
    }

    /// Invoke `method` the way a call site selecting it would.
    ///
    /// Static methods initialize their class first. Instance methods need a receiver and are
    /// dispatched on its runtime class unless they are private.
    pub fn invoke(
        &mut self,
        method: MethodId,
        receiver: Option<Value>,
        args: Vec<Value>,
    ) -> Result<Value, EvalError> {
        let result = self.invoke_method(method, receiver, args);
        self.settle(result)
    }

    /// Read a static field, initializing its class if needed.
    pub fn static_field(&mut self, field: FieldId) -> Result<Value, EvalError> {
        let owner = self.program.graph().field(field).owner;
        let result = self.ensure_initialized(owner);
        self.settle(result)?;
        Ok(self.load_static(field))
    }

    /// Read an instance field slot of `object`.
    pub fn field(&self, object: Value, field: FieldId) -> Result<Value, EvalError> {
        let graph = self.program.graph();
        let object = expect_object(object)?;
        self.heap
            .get(object, field)
            .ok_or_else(|| EvalError::UnknownField {
                class: graph.class(object.class).name.to_string(),
                name: graph.field(field).name.to_string(),
            })
    }

    /// Read the field `name` as seen from the runtime class of `object`.
    pub fn field_named(&self, object: Value, name: &str) -> Result<Value, EvalError> {
        let graph = self.program.graph();
        let object = expect_object(object)?;
        let field = graph
            .lookup_field(object.class, name)
            .ok_or_else(|| EvalError::UnknownField {
                class: graph.class(object.class).name.to_string(),
                name: name.to_string(),
            })?;
        self.field(Value::Object(object), field)
    }

    pub fn new_string(&mut self, text: &str) -> Result<Value, EvalError> {
        let result = self.alloc_string(text.to_string());
        self.settle(result)
    }

    /// Contents of a `java.lang.String` value.
    #[must_use]
    pub fn string(&self, value: Value) -> Option<&str> {
        self.heap.text(value.as_object()?)
    }

    #[must_use]
    pub fn runtime_class(&self, value: Value) -> Option<ClassId> {
        value.as_object().map(|object| object.class)
    }

    /// The `detailMessage` of a throwable.
    #[must_use]
    pub fn exception_message(&self, exception: ObjectRef) -> Option<&str> {
        let field = self
            .program
            .graph()
            .lookup_field(exception.class, "detailMessage")?;
        self.string(self.heap.get(exception, field)?)
    }

    fn settle<T>(&self, result: Eval<T>) -> Result<T, EvalError> {
        match result {
            Ok(value) => Ok(value),
            Err(Unwind::Fatal(err)) => Err(err),
            Err(Unwind::Throw(exception)) => {
                let class = self.program.graph().class(exception.class).name.to_string();
                tracing::debug!(target: "kopi.eval", exception = %class, "uncaught exception");
                Err(EvalError::Uncaught {
                    class,
                    message: self.exception_message(exception).map(str::to_string),
                    exception,
                })
            }
        }
    }

    fn invoke_method(
        &mut self,
        method: MethodId,
        receiver: Option<Value>,
        args: Vec<Value>,
    ) -> Eval<Value> {
        let program = self.program;
        let graph = program.graph();
        let entry = graph.method(method);

        if entry.is_constructor() {
            return self.new_object(method, args).map(Value::Object);
        }
        if entry.is_static {
            self.ensure_initialized(entry.owner)?;
            return self.call(method, None, args);
        }

        let receiver = receiver.ok_or_else(|| EvalError::MissingReceiver {
            method: graph.display_method(method),
        })?;
        let this = self.non_null(receiver)?;
        let target = if entry.is_virtual() {
            graph.dispatch(this.class, method)
        } else {
            method
        };
        self.call(target, Some(this), args)
    }

    // === Classes and objects ===

    /// Run the static initializers of `class` (superclasses first) unless that has already
    /// started. A class whose initialization is in progress is treated as initialized.
    fn ensure_initialized(&mut self, class: ClassId) -> Eval<()> {
        if !self.init.begin(class) {
            return Ok(());
        }
        let program = self.program;
        let graph = program.graph();
        tracing::debug!(
            target: "kopi.eval",
            class = %graph.class(class).name,
            "static initialization"
        );

        let result = self.run_static_initializers(class);
        self.init.finish(class);
        result
    }

    fn run_static_initializers(&mut self, class: ClassId) -> Eval<()> {
        let program = self.program;
        let graph = program.graph();
        if let Some(sup) = graph.class(class).super_class {
            self.ensure_initialized(sup)?;
        }

        let Some(mut frame) = Frame::new(program, BodyOwner::Initializers(class), None) else {
            return Ok(());
        };
        for step in static_init_plan(graph, class) {
            let value = self.eval(&mut frame, step.expr)?;
            self.store(&mut frame, Place::Static(step.field), value);
        }
        Ok(())
    }

    fn alloc(&mut self, class: ClassId) -> ObjectRef {
        let graph = self.program.graph();
        let fields = graph
            .instance_layout(class)
            .into_iter()
            .map(|field| (field, Value::zero(&graph.field(field).ty)));
        self.heap.alloc(class, fields)
    }

    fn alloc_string(&mut self, text: String) -> Eval<Value> {
        let class = self
            .program
            .graph()
            .well_known()
            .string
            .ok_or(EvalError::MissingRuntimeClass("java.lang.String"))?;
        Ok(Value::Object(self.heap.alloc_string(class, text)))
    }

    fn new_object(&mut self, ctor: MethodId, args: Vec<Value>) -> Eval<ObjectRef> {
        let class = self.program.graph().method(ctor).owner;
        self.ensure_initialized(class)?;
        let object = self.alloc(class);

        let depth = self.depth;
        let result = self.construct(ctor, object, args);
        self.depth = depth;
        result.map(|()| object)
    }

    /// Walk the instantiation plan of `ctor`, keeping one frame per entered constructor so each
    /// chained call's arguments are evaluated in its caller's parameter scope.
    fn construct(&mut self, ctor: MethodId, object: ObjectRef, args: Vec<Value>) -> Eval<()> {
        let program = self.program;
        let mut frames: Vec<Option<Frame<'p>>> = Vec::new();
        let mut pending = Some(args);

        for step in program.instantiation_plan(ctor) {
            match step {
                InstantiationStep::EnterConstructor(current) => {
                    let args = match pending.take() {
                        Some(args) => args,
                        None => self.chained_args(frames.last_mut().and_then(Option::as_mut))?,
                    };
                    self.enter()?;
                    let mut frame = Frame::new(program, BodyOwner::Method(current), Some(object));
                    if let Some(frame) = &mut frame {
                        frame.bind(args);
                    }
                    frames.push(frame);
                }
                InstantiationStep::FieldInit { class, step } => {
                    let owner = BodyOwner::Initializers(class);
                    let Some(mut frame) = Frame::new(program, owner, Some(object)) else {
                        continue;
                    };
                    let value = self.eval(&mut frame, step.expr)?;
                    self.store(&mut frame, Place::Instance(object, step.field), value);
                }
                InstantiationStep::ConstructorBody(_) => {
                    if let Some(mut frame) = frames.pop().flatten() {
                        let root = frame.body.root();
                        self.exec(&mut frame, root)?;
                    }
                    self.depth -= 1;
                }
            }
        }
        Ok(())
    }

    fn chained_args(&mut self, caller: Option<&mut Frame<'p>>) -> Eval<Vec<Value>> {
        let Some(caller) = caller else {
            return Ok(Vec::new());
        };
        match caller.body.leading_constructor_call() {
            Some((_, _, args)) => self.eval_args(caller, args),
            None => Ok(Vec::new()),
        }
    }

    // === Invocation ===

    fn enter(&mut self) -> Eval<()> {
        if self.depth >= self.options.max_call_depth {
            return Err(EvalError::StackOverflow {
                limit: self.options.max_call_depth,
            }
            .into());
        }
        self.depth += 1;
        Ok(())
    }

    fn call(&mut self, method: MethodId, this: Option<ObjectRef>, args: Vec<Value>) -> Eval<Value> {
        let program = self.program;
        let graph = program.graph();
        let entry = graph.method(method);
        let Some(mut frame) = Frame::new(program, BodyOwner::Method(method), this) else {
            return Err(EvalError::MissingBody {
                method: graph.display_method(method),
            }
            .into());
        };
        frame.bind(args);

        self.enter()?;
        tracing::trace!(
            target: "kopi.eval",
            method = %graph.display_method(method),
            depth = self.depth,
            "call"
        );
        let root = frame.body.root();
        let outcome = self.exec(&mut frame, root);
        self.depth -= 1;

        match outcome? {
            Completion::Return(value) => Ok(match &entry.return_ty {
                Some(ty) => value.coerce(ty),
                None => value,
            }),
            Completion::Normal => Ok(Value::Void),
            Completion::Throw(exception) => Err(Unwind::Throw(exception)),
        }
    }

    fn target(&self, frame: &Frame<'p>, expr: ExprId) -> Eval<CallTarget> {
        frame
            .types
            .call(expr)
            .ok_or_else(|| self.unresolved(frame.owner).into())
    }

    fn owner_name(&self, owner: BodyOwner) -> String {
        let graph = self.program.graph();
        match owner {
            BodyOwner::Method(method) => graph.display_method(method),
            BodyOwner::Initializers(class) => graph.class(class).name.to_string(),
        }
    }

    fn unresolved(&self, owner: BodyOwner) -> EvalError {
        EvalError::Unresolved {
            owner: self.owner_name(owner),
        }
    }

    fn this_object(&self, frame: &Frame<'p>) -> Eval<ObjectRef> {
        frame.this.ok_or_else(|| {
            EvalError::MissingReceiver {
                method: self.owner_name(frame.owner),
            }
            .into()
        })
    }

    fn eval_args(&mut self, frame: &mut Frame<'p>, args: &[ExprId]) -> Eval<Vec<Value>> {
        let mut values = Vec::with_capacity(args.len());
        for &arg in args {
            values.push(self.eval(frame, arg)?);
        }
        Ok(values)
    }

    fn eval_call(
        &mut self,
        frame: &mut Frame<'p>,
        expr: ExprId,
        receiver: &Receiver,
        args: &[ExprId],
    ) -> Eval<Value> {
        let target = self.target(frame, expr)?;
        let graph = self.program.graph();

        if target.dispatch == DispatchKind::Static {
            if let Receiver::Expr(inner) = receiver {
                self.eval(frame, *inner)?;
            }
            let args = self.eval_args(frame, args)?;
            self.ensure_initialized(graph.method(target.method).owner)?;
            return self.call(target.method, None, args);
        }

        let receiver = match receiver {
            Receiver::Expr(inner) => self.eval(frame, *inner)?,
            Receiver::Implicit | Receiver::Super | Receiver::Type(_) => {
                Value::Object(self.this_object(frame)?)
            }
        };
        let args = self.eval_args(frame, args)?;
        let this = self.non_null(receiver)?;
        let method = match target.dispatch {
            DispatchKind::Virtual => graph.dispatch(this.class, target.method),
            DispatchKind::Special | DispatchKind::Static => target.method,
        };
        self.call(method, Some(this), args)
    }

    // === Exceptions raised by the runtime ===

    fn non_null(&mut self, value: Value) -> Eval<ObjectRef> {
        match value {
            Value::Object(object) => Ok(object),
            Value::Null => {
                let class = self.program.graph().well_known().null_pointer_exception;
                Err(self.runtime_exception(class, "java.lang.NullPointerException", None))
            }
            other => Err(mismatch("an object reference", other).into()),
        }
    }

    fn runtime_exception(
        &mut self,
        class: Option<ClassId>,
        name: &'static str,
        message: Option<&str>,
    ) -> Unwind {
        let Some(class) = class else {
            return EvalError::MissingRuntimeClass(name).into();
        };
        match self.throwable(class, message) {
            Ok(exception) => Unwind::Throw(exception),
            Err(unwind) => unwind,
        }
    }

    fn throwable(&mut self, class: ClassId, message: Option<&str>) -> Eval<ObjectRef> {
        let program = self.program;
        let graph = program.graph();
        let (params, args) = match message {
            Some(message) => {
                let text = self.alloc_string(message.to_string())?;
                let string = graph
                    .well_known()
                    .string
                    .ok_or(EvalError::MissingRuntimeClass("java.lang.String"))?;
                (vec![Type::Class(string)], vec![text])
            }
            None => (Vec::new(), Vec::new()),
        };

        match resolve_constructor_call(graph, class, &params) {
            MethodResolution::Found(ctor) => self.new_object(ctor, args),
            _ => {
                self.ensure_initialized(class)?;
                Ok(self.alloc(class))
            }
        }
    }

    // === Statements ===

    fn exec(&mut self, frame: &mut Frame<'p>, stmt: StmtId) -> Eval<Outcome> {
        let body = frame.body;
        match &body.stmt(stmt).kind {
            StmtKind::Block(stmts) => {
                for &child in stmts {
                    let outcome = self.exec(frame, child)?;
                    if outcome.is_abrupt() {
                        return Ok(outcome);
                    }
                }
                Ok(Completion::Normal)
            }
            StmtKind::Let { local, initializer } => {
                let value = match initializer {
                    Some(init) => self.eval(frame, *init)?,
                    None => Value::zero(frame.types.local_type(*local)),
                };
                self.store(frame, Place::Local(*local), value);
                Ok(Completion::Normal)
            }
            StmtKind::Assign { target, op, value } => {
                let place = self.place(frame, *target)?;
                let value = match op {
                    None => self.eval(frame, *value)?,
                    Some(op) => {
                        let current = self.load(frame, place);
                        let rhs = self.eval(frame, *value)?;
                        self.binary(*op, current, rhs)?
                    }
                };
                self.store(frame, place, value);
                Ok(Completion::Normal)
            }
            StmtKind::Expr(expr) => {
                self.eval(frame, *expr)?;
                Ok(Completion::Normal)
            }
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let condition = self.eval(frame, *condition)?;
                if expect_bool(condition)? {
                    self.exec(frame, *then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.exec(frame, *else_branch)
                } else {
                    Ok(Completion::Normal)
                }
            }
            StmtKind::While {
                condition,
                body: loop_body,
            } => loop {
                let value = self.eval(frame, *condition)?;
                if !expect_bool(value)? {
                    break Ok(Completion::Normal);
                }
                let outcome = self.exec(frame, *loop_body)?;
                if outcome.is_abrupt() {
                    break Ok(outcome);
                }
            },
            StmtKind::Return(value) => {
                let value = match value {
                    Some(expr) => self.eval(frame, *expr)?,
                    None => Value::Void,
                };
                Ok(Completion::Return(value))
            }
            StmtKind::Throw(expr) => {
                let value = self.eval(frame, *expr)?;
                let exception = self.non_null(value)?;
                Err(Unwind::Throw(exception))
            }
            StmtKind::Try {
                body: try_body,
                finally,
                ..
            } => self.exec_try(frame, stmt, *try_body, *finally),
            // Chained constructor calls run as part of the instantiation plan.
            StmtKind::ConstructorCall { .. } | StmtKind::Nop => Ok(Completion::Normal),
        }
    }

    fn exec_try(
        &mut self,
        frame: &mut Frame<'p>,
        stmt: StmtId,
        try_body: StmtId,
        finally: Option<StmtId>,
    ) -> Eval<Outcome> {
        let mut outcome = caught(self.exec(frame, try_body))?;

        if let Completion::Throw(exception) = outcome {
            if let Some((param, handler)) = self.handler(frame.owner, stmt, exception.class) {
                self.store(frame, Place::Local(param), Value::Object(exception));
                outcome = caught(self.exec(frame, handler))?;
            }
        }
        if let Some(finally) = finally {
            let after = caught(self.exec(frame, finally))?;
            outcome = outcome.then_finally(after);
        }

        match outcome {
            Completion::Throw(exception) => Err(Unwind::Throw(exception)),
            other => Ok(other),
        }
    }

    /// Catch parameter and handler block of the clause that catches `thrown`.
    fn handler(
        &self,
        owner: BodyOwner,
        stmt: StmtId,
        thrown: ClassId,
    ) -> Option<(LocalId, StmtId)> {
        let BodyOwner::Method(method) = owner else {
            return None;
        };
        let region = self.program.exception_table(method).region(stmt)?;
        let idx = region.select(self.program.graph(), thrown)?;
        let handler = region.handlers.get(idx)?;
        Some((handler.param, handler.body))
    }

    // === Variables ===

    fn place(&mut self, frame: &mut Frame<'p>, target: ExprId) -> Eval<Place> {
        let body = frame.body;
        match &body.expr(target).kind {
            ExprKind::Local(local) => Ok(Place::Local(*local)),
            ExprKind::Field { receiver, .. } => self.field_place(frame, target, receiver),
            _ => Err(EvalError::InvalidAssignment {
                owner: self.owner_name(frame.owner),
            }
            .into()),
        }
    }

    fn field_place(
        &mut self,
        frame: &mut Frame<'p>,
        expr: ExprId,
        receiver: &Receiver,
    ) -> Eval<Place> {
        let graph = self.program.graph();
        let field = frame
            .types
            .field(expr)
            .ok_or_else(|| Unwind::from(self.unresolved(frame.owner)))?;
        let entry = graph.field(field);

        if entry.is_static {
            if let Receiver::Expr(inner) = receiver {
                self.eval(frame, *inner)?;
            }
            self.ensure_initialized(entry.owner)?;
            return Ok(Place::Static(field));
        }

        let object = match receiver {
            Receiver::Expr(inner) => self.eval(frame, *inner)?,
            Receiver::Implicit | Receiver::Super | Receiver::Type(_) => {
                Value::Object(self.this_object(frame)?)
            }
        };
        let object = self.non_null(object)?;
        Ok(Place::Instance(object, field))
    }

    fn load(&self, frame: &Frame<'p>, place: Place) -> Value {
        match place {
            Place::Local(local) => frame
                .locals
                .get(local.idx())
                .copied()
                .unwrap_or(Value::Null),
            Place::Static(field) => self.load_static(field),
            Place::Instance(object, field) => self.heap.get(object, field).unwrap_or(Value::Null),
        }
    }

    fn load_static(&self, field: FieldId) -> Value {
        self.statics
            .get(&field)
            .copied()
            .unwrap_or_else(|| Value::zero(&self.program.graph().field(field).ty))
    }

    fn store(&mut self, frame: &mut Frame<'p>, place: Place, value: Value) {
        let graph = self.program.graph();
        match place {
            Place::Local(local) => {
                let value = value.coerce(frame.types.local_type(local));
                if let Some(slot) = frame.locals.get_mut(local.idx()) {
                    *slot = value;
                }
            }
            Place::Static(field) => {
                self.statics
                    .insert(field, value.coerce(&graph.field(field).ty));
            }
            Place::Instance(object, field) => {
                self.heap
                    .set(object, field, value.coerce(&graph.field(field).ty));
            }
        }
    }

    // === Expressions ===

    fn eval(&mut self, frame: &mut Frame<'p>, expr: ExprId) -> Eval<Value> {
        let body = frame.body;
        match &body.expr(expr).kind {
            ExprKind::Literal(literal) => self.literal(literal),
            ExprKind::Local(local) => Ok(self.load(frame, Place::Local(*local))),
            ExprKind::This => self.this_object(frame).map(Value::Object),
            ExprKind::Field { receiver, .. } => {
                let place = self.field_place(frame, expr, receiver)?;
                Ok(self.load(frame, place))
            }
            ExprKind::Call { receiver, args, .. } => self.eval_call(frame, expr, receiver, args),
            ExprKind::New { args, .. } => {
                let target = self.target(frame, expr)?;
                let args = self.eval_args(frame, args)?;
                self.new_object(target.method, args).map(Value::Object)
            }
            ExprKind::Unary { op, expr: operand } => {
                let value = self.eval(frame, *operand)?;
                match op {
                    UnaryOp::Neg => value
                        .numeric()
                        .map(|num| num.negate())
                        .ok_or_else(|| mismatch("a numeric value", value).into()),
                    UnaryOp::Not => Ok(Value::Boolean(!expect_bool(value)?)),
                }
            }
            ExprKind::Binary { op, lhs, rhs } if op.is_logical() => {
                let left = expect_bool(self.eval(frame, *lhs)?)?;
                let short_circuits = match op {
                    BinaryOp::And => !left,
                    _ => left,
                };
                if short_circuits {
                    return Ok(Value::Boolean(left));
                }
                let right = expect_bool(self.eval(frame, *rhs)?)?;
                Ok(Value::Boolean(right))
            }
            ExprKind::Binary { op, lhs, rhs } => {
                let left = self.eval(frame, *lhs)?;
                let right = self.eval(frame, *rhs)?;
                self.binary(*op, left, right)
            }
        }
    }

    fn literal(&mut self, literal: &Literal) -> Eval<Value> {
        Ok(match literal {
            Literal::Int(value) => Value::Int(*value),
            Literal::Long(value) => Value::Long(*value),
            Literal::Float(value) => Value::Float(*value),
            Literal::Double(value) => Value::Double(*value),
            Literal::Bool(value) => Value::Boolean(*value),
            Literal::Char(value) => Value::Char(u32::from(*value) as u16),
            Literal::Str(text) => return self.alloc_string(text.clone()),
            Literal::Null => Value::Null,
        })
    }

    fn binary(&mut self, op: BinaryOp, left: Value, right: Value) -> Eval<Value> {
        if op == BinaryOp::Add && (self.is_string(left) || self.is_string(right)) {
            let text = format!("{}{}", self.stringify(left), self.stringify(right));
            return self.alloc_string(text);
        }

        match (left.numeric(), right.numeric()) {
            (Some(lhs), Some(rhs)) if op.is_comparison() => {
                Ok(Value::Boolean(compare(op, lhs, rhs)))
            }
            (Some(lhs), Some(rhs)) => match arithmetic(op, lhs, rhs) {
                Ok(value) => Ok(value),
                Err(ArithmeticFault::DivideByZero) => {
                    let class = self.program.graph().well_known().arithmetic_exception;
                    Err(self.runtime_exception(
                        class,
                        "java.lang.ArithmeticException",
                        Some("/ by zero"),
                    ))
                }
                Err(ArithmeticFault::Unsupported) => {
                    Err(mismatch("an arithmetic operator", left).into())
                }
            },
            // Booleans and references compare by value and identity.
            _ if matches!(op, BinaryOp::Eq | BinaryOp::Ne) => {
                Ok(Value::Boolean((left == right) == (op == BinaryOp::Eq)))
            }
            _ => Err(mismatch("numeric operands", left).into()),
        }
    }

    fn is_string(&self, value: Value) -> bool {
        value
            .as_object()
            .is_some_and(|object| Some(object.class) == self.program.graph().well_known().string)
    }

    /// String conversion used by `+` on strings.
    fn stringify(&self, value: Value) -> String {
        match value {
            Value::Null => "null".to_string(),
            Value::Void => String::new(),
            Value::Boolean(value) => value.to_string(),
            Value::Byte(value) => value.to_string(),
            Value::Short(value) => value.to_string(),
            Value::Char(value) => char::from_u32(value.into())
                .unwrap_or(char::REPLACEMENT_CHARACTER)
                .to_string(),
            Value::Int(value) => value.to_string(),
            Value::Long(value) => value.to_string(),
            Value::Float(value) => display_float(value),
            Value::Double(value) => display_float(value),
            Value::Object(object) => match self.heap.text(object) {
                Some(text) => text.to_string(),
                None => format!(
                    "{}@{:x}",
                    self.program.graph().class(object.class).name,
                    object.id.idx()
                ),
            },
        }
    }
}

fn mismatch(expected: &'static str, found: Value) -> EvalError {
    EvalError::TypeMismatch {
        expected,
        found: format!("{found:?}"),
    }
}

fn expect_bool(value: Value) -> Result<bool, Unwind> {
    value
        .as_bool()
        .ok_or_else(|| mismatch("a boolean", value).into())
}

fn expect_object(value: Value) -> Result<ObjectRef, EvalError> {
    value
        .as_object()
        .ok_or_else(|| mismatch("an object reference", value))
}
