use kopi_core::{FileId, Span};
use kopi_hir::{
    BinaryOp, BodyBuilder, ClassDecl, CompilationUnit, FieldDecl, MethodDecl, Receiver, TypeExpr,
    UnaryOp, Visibility,
};

/// File ids used by the fixture corpus.
pub mod files {
    use kopi_core::FileId;

    pub const DISPATCH_TEST: FileId = FileId::from_raw(1);
    pub const EXCEPTION_TEST: FileId = FileId::from_raw(2);
    pub const FIELD_TEST: FileId = FileId::from_raw(3);
    pub const STATIC_TEST: FileId = FileId::from_raw(4);
    pub const VALUE: FileId = FileId::from_raw(5);
    pub const VALUE_SUBCLASS: FileId = FileId::from_raw(6);
    pub const VALUE_DRIVER: FileId = FileId::from_raw(7);
    pub const SHADOWING: FileId = FileId::from_raw(8);
    pub const CIRCULAR_STATICS: FileId = FileId::from_raw(9);
    pub const LEAKY_EXCEPTIONS: FileId = FileId::from_raw(10);
}

/// Spans are synthetic but distinct, so diagnostics sort by declaration position.
fn span(line: usize) -> Span {
    Span::new(line * 100, line * 100 + 10)
}

fn unit(file: FileId, classes: Vec<ClassDecl>) -> CompilationUnit {
    CompilationUnit::new(file, classes)
}

/// `this.<field> = <param>;` as a whole constructor/setter body.
fn store_param(name: &str, field: &str, ty: TypeExpr) -> (BodyBuilder, kopi_hir::StmtId) {
    let mut b = BodyBuilder::new();
    let param = b.param(name, ty);
    let target = b.this_field(field);
    let value = b.read(param);
    let stmt = b.assign(target, value);
    (b, stmt)
}

// === DispatchTest ===

/// Declaration order of the two `DispatchTest.test` overloads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverloadOrder {
    /// `test(DispatchInterface)` first, as in the source fixture.
    InterfaceFirst,
    ClassFirst,
}

pub fn dispatch_test() -> CompilationUnit {
    dispatch_test_with(OverloadOrder::InterfaceFirst)
}

pub fn dispatch_test_with(order: OverloadOrder) -> CompilationUnit {
    let ctor = |a: Option<TypeExpr>, b_param: Option<TypeExpr>, line| {
        let mut b = BodyBuilder::new();
        let a_value = match a {
            Some(ty) => {
                let p = b.param("a", ty);
                b.read(p)
            }
            None => b.int(1),
        };
        let b_value = match b_param {
            Some(ty) => {
                let p = b.param("b", ty);
                b.read(p)
            }
            None => b.int(2),
        };
        let a_target = b.this_field("a");
        let set_a = b.assign(a_target, a_value);
        let b_target = b.this_field("b");
        let set_b = b.assign(b_target, b_value);
        MethodDecl::constructor("DispatchTest")
            .body(b.finish(vec![set_a, set_b]))
            .at(span(line))
    };

    let set_int = {
        let (b, stmt) = store_param("a", "a", TypeExpr::int());
        MethodDecl::method("set", TypeExpr::Void)
            .body(b.finish(vec![stmt]))
            .at(span(10))
    };
    let set_float = {
        let (b, stmt) = store_param("b", "b", TypeExpr::float());
        MethodDecl::method("set", TypeExpr::Void)
            .body(b.finish(vec![stmt]))
            .at(span(11))
    };

    let test_interface = |line| {
        let mut b = BodyBuilder::new();
        let obj = b.param("obj", TypeExpr::named("DispatchInterface"));
        let recv = b.read(obj);
        let call = b.call(Receiver::Expr(recv), "test", vec![]);
        let ret = b.ret(Some(call));
        MethodDecl::method("test", TypeExpr::int())
            .body(b.finish(vec![ret]))
            .at(span(line))
    };
    let test_class = |line| {
        let mut b = BodyBuilder::new();
        let obj = b.param("obj", TypeExpr::named("DispatchClass1"));
        let recv = b.read(obj);
        let call = b.call(Receiver::Expr(recv), "test", vec![]);
        let ten = b.int(10);
        let sum = b.binary(BinaryOp::Add, call, ten);
        let ret = b.ret(Some(sum));
        MethodDecl::method("test", TypeExpr::int())
            .body(b.finish(vec![ret]))
            .at(span(line))
    };
    let test_test = {
        let mut b = BodyBuilder::new();
        let obj = b.param("obj", TypeExpr::named("DispatchInterface"));
        let arg = b.read(obj);
        let call = b.call(Receiver::Implicit, "test", vec![arg]);
        let ret = b.ret(Some(call));
        MethodDecl::method("testTest", TypeExpr::int())
            .body(b.finish(vec![ret]))
            .at(span(14))
    };

    let overloads = match order {
        OverloadOrder::InterfaceFirst => vec![test_interface(12), test_class(13)],
        OverloadOrder::ClassFirst => vec![test_class(12), test_interface(13)],
    };

    let mut dispatch_test = ClassDecl::class("DispatchTest")
        .field(FieldDecl::new("a", TypeExpr::int()))
        .field(FieldDecl::new("b", TypeExpr::float()))
        .method(ctor(None, None, 2))
        .method(ctor(Some(TypeExpr::int()), None, 3))
        .method(ctor(None, Some(TypeExpr::float()), 4))
        .method(ctor(Some(TypeExpr::int()), Some(TypeExpr::float()), 5))
        .method(set_int)
        .method(set_float);
    for overload in overloads {
        dispatch_test = dispatch_test.method(overload);
    }
    let dispatch_test = dispatch_test.method(test_test).at(span(1));

    let interface = ClassDecl::interface("DispatchInterface")
        .method(
            MethodDecl::method("test", TypeExpr::int())
                .abstract_()
                .at(span(21)),
        )
        .at(span(20));

    let implementor = |name: &str, value: i32, line| {
        let mut b = BodyBuilder::new();
        let lit = b.int(value);
        let ret = b.ret(Some(lit));
        ClassDecl::class(name)
            .implements("DispatchInterface")
            .method(
                MethodDecl::method("test", TypeExpr::int())
                    .body(b.finish(vec![ret]))
                    .at(span(line + 1)),
            )
            .at(span(line))
    };

    unit(
        files::DISPATCH_TEST,
        vec![
            dispatch_test,
            interface,
            implementor("DispatchClass1", 1, 30),
            implementor("DispatchClass2", 2, 40),
        ],
    )
}

// === ExceptionTest ===

pub fn exception_test() -> CompilationUnit {
    // int testCatch() { try { throw new MyException(); } catch (MyException exc) { return 1; } }
    let test_catch = {
        let mut b = BodyBuilder::new();
        let exc = b.new_object("MyException", vec![]);
        let throw = b.throw(exc);
        let body = b.block(vec![throw]);
        let param = b.catch_param("exc", TypeExpr::named("MyException"));
        let one = b.int(1);
        let ret = b.ret(Some(one));
        let handler = b.block(vec![ret]);
        let clause = b.catch_clause(param, handler);
        let try_stmt = b.try_(body, vec![clause], None);
        MethodDecl::method("testCatch", TypeExpr::int())
            .body(b.finish(vec![try_stmt]))
            .at(span(2))
    };

    // int testFinally(int x) {
    //     try {
    //         if (x == 0) { throw new MyException(); } else if (x == 1) { throw new MyOtherException(); }
    //     } catch (MyException exc) { x = 3; } catch (MyOtherException exc) { x = 2; } finally { x = 1; }
    //     return x;
    // }
    let test_finally = {
        let mut b = BodyBuilder::new();
        let x = b.param("x", TypeExpr::int());

        let x_read = b.read(x);
        let one = b.int(1);
        let is_one = b.binary(BinaryOp::Eq, x_read, one);
        let other = b.new_object("MyOtherException", vec![]);
        let throw_other = b.throw(other);
        let throw_other = b.block(vec![throw_other]);
        let else_if = b.if_(is_one, throw_other, None);

        let x_read = b.read(x);
        let zero = b.int(0);
        let is_zero = b.binary(BinaryOp::Eq, x_read, zero);
        let mine = b.new_object("MyException", vec![]);
        let throw_mine = b.throw(mine);
        let throw_mine = b.block(vec![throw_mine]);
        let if_stmt = b.if_(is_zero, throw_mine, Some(else_if));
        let body = b.block(vec![if_stmt]);

        let set_x = |b: &mut BodyBuilder, value| {
            let target = b.read(x);
            let value = b.int(value);
            let assign = b.assign(target, value);
            b.block(vec![assign])
        };

        let first = b.catch_param("exc", TypeExpr::named("MyException"));
        let first_body = set_x(&mut b, 3);
        let first = b.catch_clause(first, first_body);
        let second = b.catch_param("exc", TypeExpr::named("MyOtherException"));
        let second_body = set_x(&mut b, 2);
        let second = b.catch_clause(second, second_body);
        let finally = set_x(&mut b, 1);

        let try_stmt = b.try_(body, vec![first, second], Some(finally));
        let x_read = b.read(x);
        let ret = b.ret(Some(x_read));
        MethodDecl::method("testFinally", TypeExpr::int())
            .body(b.finish(vec![try_stmt, ret]))
            .at(span(3))
    };

    // int testFinallyNoCatch(int x) throws MyException {
    //     try { if (x == 0) { x = 3; throw new MyException(); } }
    //     finally { x += 10; this.observed = x; }
    //     return x;
    // }
    let test_finally_no_catch = {
        let mut b = BodyBuilder::new();
        let x = b.param("x", TypeExpr::int());

        let x_read = b.read(x);
        let zero = b.int(0);
        let is_zero = b.binary(BinaryOp::Eq, x_read, zero);
        let target = b.read(x);
        let three = b.int(3);
        let set_three = b.assign(target, three);
        let exc = b.new_object("MyException", vec![]);
        let throw = b.throw(exc);
        let then = b.block(vec![set_three, throw]);
        let if_stmt = b.if_(is_zero, then, None);
        let body = b.block(vec![if_stmt]);

        let target = b.read(x);
        let ten = b.int(10);
        let bump = b.compound_assign(target, BinaryOp::Add, ten);
        let observed = b.this_field("observed");
        let x_read = b.read(x);
        let record = b.assign(observed, x_read);
        let finally = b.block(vec![bump, record]);

        let try_stmt = b.try_(body, vec![], Some(finally));
        let x_read = b.read(x);
        let ret = b.ret(Some(x_read));
        MethodDecl::method("testFinallyNoCatch", TypeExpr::int())
            .throws("MyException")
            .body(b.finish(vec![try_stmt, ret]))
            .at(span(4))
    };

    // int testUnchecked(int x) { if (x == 0) { throw new IllegalArgumentException("zero"); } return 100 / x; }
    let test_unchecked = {
        let mut b = BodyBuilder::new();
        let x = b.param("x", TypeExpr::int());
        let x_read = b.read(x);
        let zero = b.int(0);
        let is_zero = b.binary(BinaryOp::Eq, x_read, zero);
        let message = b.string("zero");
        let exc = b.new_object("IllegalArgumentException", vec![message]);
        let throw = b.throw(exc);
        let then = b.block(vec![throw]);
        let if_stmt = b.if_(is_zero, then, None);
        let hundred = b.int(100);
        let x_read = b.read(x);
        let quotient = b.binary(BinaryOp::Div, hundred, x_read);
        let ret = b.ret(Some(quotient));
        MethodDecl::method("testUnchecked", TypeExpr::int())
            .body(b.finish(vec![if_stmt, ret]))
            .at(span(5))
    };

    let exception_test = ClassDecl::class("ExceptionTest")
        .field(FieldDecl::new("observed", TypeExpr::int()).at(span(1)))
        .method(test_catch)
        .method(test_finally)
        .method(test_finally_no_catch)
        .method(test_unchecked)
        .at(span(1));

    unit(
        files::EXCEPTION_TEST,
        vec![
            exception_test,
            ClassDecl::class("MyException")
                .extends("java.lang.Exception")
                .at(span(20)),
            ClassDecl::class("MyOtherException")
                .extends("java.lang.Exception")
                .at(span(30)),
        ],
    )
}

/// Checked exceptions escaping undeclared; needs the [`exception_test`] unit for its types.
pub fn undeclared_checked_exception() -> CompilationUnit {
    let mut b = BodyBuilder::new();
    let exc = b.new_object("MyException", vec![]);
    let throw = b.throw(exc);
    let leaky = MethodDecl::method("leak", TypeExpr::Void)
        .body(b.finish(vec![throw]))
        .at(span(51));

    let mut b = BodyBuilder::new();
    let call = b.call(Receiver::Implicit, "declared", vec![]);
    let stmt = b.expr_stmt(call);
    let caller = MethodDecl::method("callsDeclared", TypeExpr::Void)
        .body(b.finish(vec![stmt]))
        .at(span(52));

    let mut b = BodyBuilder::new();
    let exc = b.new_object("MyOtherException", vec![]);
    let throw = b.throw(exc);
    let declared = MethodDecl::method("declared", TypeExpr::Void)
        .throws("MyOtherException")
        .body(b.finish(vec![throw]))
        .at(span(53));

    unit(
        files::LEAKY_EXCEPTIONS,
        vec![ClassDecl::class("LeakyExceptions")
            .method(leaky)
            .method(caller)
            .method(declared)
            .at(span(50))],
    )
}

// === FieldTest ===

/// Declaration order of `FieldTest.b` relative to `FieldTest.e`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldOrder {
    /// `b` then `e`, as in the source fixture.
    BFirst,
    EFirst,
}

pub fn field_test() -> CompilationUnit {
    field_test_with(FieldOrder::BFirst)
}

pub fn field_test_with(order: FieldOrder) -> CompilationUnit {
    let mut init = BodyBuilder::new();
    let b_value = init.int(123);
    let d_value = init.null();
    let e_arg = init.int(456);
    let e_value = init.new_object("FieldTestClass", vec![e_arg]);
    let b_read = init.field(Receiver::Implicit, "b");
    let e_read = init.field(Receiver::Implicit, "e");
    let e_a = init.field(Receiver::Expr(e_read), "a");
    let sum = init.binary(BinaryOp::Add, b_read, e_a);
    let f_value = init.new_object("FieldTestClass", vec![sum]);
    let h_arg = init.int(789);
    let h_value = init.new_object("FieldTestClass", vec![h_arg]);
    let initializers = init.finish(vec![]);

    let b_field = FieldDecl::new("b", TypeExpr::int())
        .visibility(Visibility::Protected)
        .initializer(b_value);
    let e_field = FieldDecl::new("e", TypeExpr::named("FieldTestClass")).initializer(e_value);

    let mut fields = vec![FieldDecl::new("a", TypeExpr::int()).visibility(Visibility::Private)];
    match order {
        FieldOrder::BFirst => fields.push(b_field.clone()),
        FieldOrder::EFirst => fields.push(e_field.clone()),
    }
    fields.push(
        FieldDecl::new("c", TypeExpr::named("FieldTestClass")).visibility(Visibility::Protected),
    );
    fields.push(
        FieldDecl::new("d", TypeExpr::named("FieldTestClass"))
            .visibility(Visibility::Protected)
            .initializer(d_value),
    );
    match order {
        FieldOrder::BFirst => fields.push(e_field),
        FieldOrder::EFirst => fields.push(b_field),
    }
    fields.push(FieldDecl::new("f", TypeExpr::named("FieldTestClass")).initializer(f_value));
    fields.push(FieldDecl::new("g", TypeExpr::named("FieldTestClass")).static_());
    fields.push(
        FieldDecl::new("h", TypeExpr::named("FieldTestClass"))
            .static_()
            .initializer(h_value),
    );

    let mut field_test = ClassDecl::class("FieldTest").initializers(initializers);
    for (line, field) in fields.into_iter().enumerate() {
        field_test = field_test.field(field.at(span(line + 2)));
    }

    let (b, stmt) = store_param("a", "a", TypeExpr::int());
    let field_test_class = ClassDecl::class("FieldTestClass")
        .field(FieldDecl::new("a", TypeExpr::int()))
        .method(
            MethodDecl::constructor("FieldTestClass")
                .body(b.finish(vec![stmt]))
                .at(span(21)),
        )
        .at(span(20));

    unit(
        files::FIELD_TEST,
        vec![field_test.at(span(1)), field_test_class],
    )
}

// === StaticTest ===

pub fn static_test() -> CompilationUnit {
    let mut init = BodyBuilder::new();
    let member = init.static_call("StaticTestClass", "newInstance", vec![]);
    let arg = init.int(123);
    let member2 = init.static_call("StaticTestClass", "newInstance", vec![arg]);
    let member3 = init.static_call("StaticTestClass", "getNumber", vec![]);
    let static_test = ClassDecl::class("StaticTest")
        .initializers(init.finish(vec![]))
        .field(
            FieldDecl::new("staticMember", TypeExpr::named("StaticTestClass"))
                .static_()
                .initializer(member)
                .at(span(2)),
        )
        .field(
            FieldDecl::new("staticMember2", TypeExpr::named("StaticTestClass"))
                .static_()
                .initializer(member2)
                .at(span(3)),
        )
        .field(
            FieldDecl::new("staticMember3", TypeExpr::int())
                .static_()
                .initializer(member3)
                .at(span(4)),
        )
        .at(span(1));

    // StaticTestClass.loads counts how often its static initializer ran.
    let mut init = BodyBuilder::new();
    let next = init.static_call("StaticCounter", "next", vec![]);
    let loads_init = init.finish(vec![]);

    let no_arg = {
        let mut b = BodyBuilder::new();
        let target = b.field(Receiver::Implicit, "x");
        let value = b.int(321);
        let assign = b.assign(target, value);
        MethodDecl::constructor("StaticTestClass")
            .body(b.finish(vec![assign]))
            .at(span(22))
    };
    let with_x = {
        let (b, stmt) = store_param("x", "x", TypeExpr::int());
        MethodDecl::constructor("StaticTestClass")
            .body(b.finish(vec![stmt]))
            .at(span(23))
    };
    let new_instance = {
        let mut b = BodyBuilder::new();
        let obj = b.new_object("StaticTestClass", vec![]);
        let ret = b.ret(Some(obj));
        MethodDecl::method("newInstance", TypeExpr::named("StaticTestClass"))
            .static_()
            .body(b.finish(vec![ret]))
            .at(span(24))
    };
    let new_instance_x = {
        let mut b = BodyBuilder::new();
        let x = b.param("x", TypeExpr::int());
        let arg = b.read(x);
        let obj = b.new_object("StaticTestClass", vec![arg]);
        let ret = b.ret(Some(obj));
        MethodDecl::method("newInstance", TypeExpr::named("StaticTestClass"))
            .static_()
            .body(b.finish(vec![ret]))
            .at(span(25))
    };
    let get_number = {
        let mut b = BodyBuilder::new();
        let value = b.int(456);
        let ret = b.ret(Some(value));
        MethodDecl::method("getNumber", TypeExpr::int())
            .static_()
            .body(b.finish(vec![ret]))
            .at(span(26))
    };
    let static_test_class = ClassDecl::class("StaticTestClass")
        .initializers(loads_init)
        .field(FieldDecl::new("x", TypeExpr::int()).at(span(21)))
        .field(
            FieldDecl::new("loads", TypeExpr::int())
                .static_()
                .initializer(next)
                .at(span(21)),
        )
        .method(no_arg)
        .method(with_x)
        .method(new_instance)
        .method(new_instance_x)
        .method(get_number)
        .at(span(20));

    // static int next() { count += 1; return count; }
    let counter_next = {
        let mut b = BodyBuilder::new();
        let target = b.field(Receiver::Implicit, "count");
        let one = b.int(1);
        let bump = b.compound_assign(target, BinaryOp::Add, one);
        let value = b.field(Receiver::Implicit, "count");
        let ret = b.ret(Some(value));
        MethodDecl::method("next", TypeExpr::int())
            .static_()
            .body(b.finish(vec![bump, ret]))
            .at(span(31))
    };
    let counter = ClassDecl::class("StaticCounter")
        .field(FieldDecl::new("count", TypeExpr::int()).static_().at(span(31)))
        .method(counter_next)
        .at(span(30));

    unit(
        files::STATIC_TEST,
        vec![static_test, static_test_class, counter],
    )
}

/// `A.x = B.y + 1; B.y = A.x + 1;`: each static initializer reads the other class.
pub fn circular_statics() -> CompilationUnit {
    let class = |name: &str, field: &str, other: &str, other_field: &str, line| {
        let mut init = BodyBuilder::new();
        let read = init.static_field(other, other_field);
        let one = init.int(1);
        let sum = init.binary(BinaryOp::Add, read, one);
        ClassDecl::class(name)
            .initializers(init.finish(vec![]))
            .field(
                FieldDecl::new(field, TypeExpr::int())
                    .static_()
                    .initializer(sum)
                    .at(span(line + 1)),
            )
            .at(span(line))
    };

    unit(
        files::CIRCULAR_STATICS,
        vec![class("A", "x", "B", "y", 1), class("B", "y", "A", "x", 10)],
    )
}

// === Value / ValueSubclass ===

pub fn value() -> CompilationUnit {
    let ctor = {
        let (b, stmt) = store_param("value", "value", TypeExpr::int());
        MethodDecl::constructor("Value")
            .body(b.finish(vec![stmt]))
            .at(span(3))
    };
    let get_value = {
        let mut b = BodyBuilder::new();
        let value = b.this_field("value");
        let ret = b.ret(Some(value));
        MethodDecl::method("getValue", TypeExpr::int())
            .body(b.finish(vec![ret]))
            .at(span(4))
    };
    let set_value = {
        let (b, stmt) = store_param("value", "value", TypeExpr::int());
        MethodDecl::method("setValue", TypeExpr::Void)
            .body(b.finish(vec![stmt]))
            .at(span(5))
    };
    let is_positive = {
        let mut b = BodyBuilder::new();
        let value = b.this_field("value");
        let zero = b.int(0);
        let cmp = b.binary(BinaryOp::Gt, value, zero);
        let ret = b.ret(Some(cmp));
        MethodDecl::method("isPositive", TypeExpr::boolean())
            .body(b.finish(vec![ret]))
            .at(span(6))
    };
    // if (value < this.value) return -1; else if (value == this.value) return 0; else return 1;
    let compare = {
        let mut b = BodyBuilder::new();
        let param = b.param("value", TypeExpr::int());
        let ret_const = |b: &mut BodyBuilder, value: i32| {
            let lit = b.int(value);
            let ret = b.ret(Some(lit));
            b.block(vec![ret])
        };

        let lhs = b.read(param);
        let rhs = b.this_field("value");
        let is_eq = b.binary(BinaryOp::Eq, lhs, rhs);
        let ret_zero = ret_const(&mut b, 0);
        let ret_one = ret_const(&mut b, 1);
        let inner = b.if_(is_eq, ret_zero, Some(ret_one));

        let lhs = b.read(param);
        let rhs = b.this_field("value");
        let is_lt = b.binary(BinaryOp::Lt, lhs, rhs);
        let minus_one = b.int(1);
        let minus_one = b.unary(UnaryOp::Neg, minus_one);
        let ret_minus = b.ret(Some(minus_one));
        let ret_minus = b.block(vec![ret_minus]);
        let outer = b.if_(is_lt, ret_minus, Some(inner));
        MethodDecl::method("compare", TypeExpr::int())
            .body(b.finish(vec![outer]))
            .at(span(7))
    };
    let add = {
        let mut b = BodyBuilder::new();
        let param = b.param("value", TypeExpr::int());
        let own = b.this_field("value");
        let arg = b.read(param);
        let sum = b.binary(BinaryOp::Add, own, arg);
        let ret = b.ret(Some(sum));
        MethodDecl::method("add", TypeExpr::int())
            .body(b.finish(vec![ret]))
            .at(span(8))
    };

    unit(
        files::VALUE,
        vec![ClassDecl::class("Value")
            .field(
                FieldDecl::new("value", TypeExpr::int())
                    .visibility(Visibility::Private)
                    .at(span(2)),
            )
            .method(ctor)
            .method(get_value)
            .method(set_value)
            .method(is_positive)
            .method(compare)
            .method(add)
            .at(span(1))],
    )
}

pub fn value_subclass() -> CompilationUnit {
    // ValueSubclass(int x) { super(x); Value tmp = new Value(42); }
    let ctor = {
        let mut b = BodyBuilder::new();
        let x = b.param("x", TypeExpr::int());
        let arg = b.read(x);
        let sup = b.super_call(vec![arg]);
        let tmp = b.local("tmp", TypeExpr::named("Value"));
        let forty_two = b.int(42);
        let obj = b.new_object("Value", vec![forty_two]);
        let let_tmp = b.let_(tmp, Some(obj));
        MethodDecl::constructor("ValueSubclass")
            .body(b.finish(vec![sup, let_tmp]))
            .at(span(2))
    };
    // void setValue(int x) { this.value = -x; }
    let set_value = {
        let mut b = BodyBuilder::new();
        let x = b.param("x", TypeExpr::int());
        let target = b.this_field("value");
        let read = b.read(x);
        let neg = b.unary(UnaryOp::Neg, read);
        let assign = b.assign(target, neg);
        MethodDecl::method("setValue", TypeExpr::Void)
            .body(b.finish(vec![assign]))
            .at(span(3))
    };
    // int add(int x) { return super.add(-x); }
    let add = {
        let mut b = BodyBuilder::new();
        let x = b.param("x", TypeExpr::int());
        let read = b.read(x);
        let neg = b.unary(UnaryOp::Neg, read);
        let call = b.call(Receiver::Super, "add", vec![neg]);
        let ret = b.ret(Some(call));
        MethodDecl::method("add", TypeExpr::int())
            .body(b.finish(vec![ret]))
            .at(span(4))
    };
    // void setValueObject(Value v) { this.value = v.getValue(); }
    let set_value_object = {
        let mut b = BodyBuilder::new();
        let v = b.param("v", TypeExpr::named("Value"));
        let target = b.this_field("value");
        let recv = b.read(v);
        let call = b.call(Receiver::Expr(recv), "getValue", vec![]);
        let assign = b.assign(target, call);
        MethodDecl::method("setValueObject", TypeExpr::Void)
            .body(b.finish(vec![assign]))
            .at(span(5))
    };

    unit(
        files::VALUE_SUBCLASS,
        vec![ClassDecl::class("ValueSubclass")
            .extends("Value")
            .method(ctor)
            .method(set_value)
            .method(add)
            .method(set_value_object)
            .at(span(1))],
    )
}

/// Static helpers that call `Value` methods through a `Value`-typed parameter.
pub fn value_driver() -> CompilationUnit {
    // static int setThroughBase(Value v, int x) { v.setValue(x); return v.getValue(); }
    let set_through_base = {
        let mut b = BodyBuilder::new();
        let v = b.param("v", TypeExpr::named("Value"));
        let x = b.param("x", TypeExpr::int());
        let recv = b.read(v);
        let arg = b.read(x);
        let call = b.call(Receiver::Expr(recv), "setValue", vec![arg]);
        let stmt = b.expr_stmt(call);
        let recv = b.read(v);
        let get = b.call(Receiver::Expr(recv), "getValue", vec![]);
        let ret = b.ret(Some(get));
        MethodDecl::method("setThroughBase", TypeExpr::int())
            .static_()
            .body(b.finish(vec![stmt, ret]))
            .at(span(2))
    };
    // static int addThroughBase(Value v, int x) { return v.add(x); }
    let add_through_base = {
        let mut b = BodyBuilder::new();
        let v = b.param("v", TypeExpr::named("Value"));
        let x = b.param("x", TypeExpr::int());
        let recv = b.read(v);
        let arg = b.read(x);
        let call = b.call(Receiver::Expr(recv), "add", vec![arg]);
        let ret = b.ret(Some(call));
        MethodDecl::method("addThroughBase", TypeExpr::int())
            .static_()
            .body(b.finish(vec![ret]))
            .at(span(3))
    };

    unit(
        files::VALUE_DRIVER,
        vec![ClassDecl::class("ValueDriver")
            .method(set_through_base)
            .method(add_through_base)
            .at(span(1))],
    )
}

/// `ShadowSub.value` shadows `ShadowBase.value`; each class reads its own slot.
pub fn shadowing() -> CompilationUnit {
    let class = |name: &str, initial: i32, getter: &str, line| {
        let mut init = BodyBuilder::new();
        let value = init.int(initial);
        let mut b = BodyBuilder::new();
        let read = b.field(Receiver::Implicit, "value");
        let ret = b.ret(Some(read));
        ClassDecl::class(name)
            .initializers(init.finish(vec![]))
            .field(
                FieldDecl::new("value", TypeExpr::int())
                    .initializer(value)
                    .at(span(line + 1)),
            )
            .method(
                MethodDecl::method(getter, TypeExpr::int())
                    .body(b.finish(vec![ret]))
                    .at(span(line + 2)),
            )
            .at(span(line))
    };

    unit(
        files::SHADOWING,
        vec![
            class("ShadowBase", 1, "baseValue", 1),
            class("ShadowSub", 2, "subValue", 10).extends("ShadowBase"),
        ],
    )
}

/// Every well-formed fixture of the corpus, one unit per source file.
pub fn corpus() -> Vec<CompilationUnit> {
    vec![
        dispatch_test(),
        exception_test(),
        field_test(),
        static_test(),
        value(),
        value_subclass(),
        value_driver(),
    ]
}
