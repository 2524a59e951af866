use kopi_core::FileId;
use kopi_eval::{EvalError, EvalOptions, Interpreter, Value};
use kopi_hir::{
    BinaryOp, BodyBuilder, ClassDecl, CompilationUnit, MethodDecl, Receiver, TypeExpr,
};
use kopi_test_utils::{exception_test, value};
use pretty_assertions::assert_eq;

use super::{call, call_static, method, new, program};

#[test]
fn caught_exceptions_are_replaced_by_finally() {
    let program = program(vec![exception_test()]);
    let mut interp = Interpreter::new(&program);
    let test = new(&mut interp, "ExceptionTest.ExceptionTest()", vec![]);

    assert_eq!(call(&mut interp, test, "ExceptionTest.testCatch()", vec![]), Value::Int(1));
    for x in [0, 1, 2] {
        assert_eq!(
            call(&mut interp, test, "ExceptionTest.testFinally(int)", vec![Value::Int(x)]),
            Value::Int(1),
            "x = {x}"
        );
    }
}

#[test]
fn finally_runs_before_an_exception_escapes() {
    let program = program(vec![exception_test()]);
    let mut interp = Interpreter::new(&program);
    let test = new(&mut interp, "ExceptionTest.ExceptionTest()", vec![]);
    let no_catch = method(&program, "ExceptionTest.testFinallyNoCatch(int)");

    let err = interp
        .invoke(no_catch, Some(test), vec![Value::Int(0)])
        .unwrap_err();
    let EvalError::Uncaught { class, message, .. } = err else {
        panic!("expected an uncaught exception, got {err}");
    };
    assert_eq!(class, "MyException");
    assert_eq!(message, None);
    assert_eq!(interp.field_named(test, "observed").unwrap(), Value::Int(13));

    assert_eq!(
        interp.invoke(no_catch, Some(test), vec![Value::Int(4)]).unwrap(),
        Value::Int(14)
    );
    assert_eq!(interp.field_named(test, "observed").unwrap(), Value::Int(14));
}

#[test]
fn unchecked_exceptions_carry_their_message() {
    let program = program(vec![exception_test()]);
    let mut interp = Interpreter::new(&program);
    let test = new(&mut interp, "ExceptionTest.ExceptionTest()", vec![]);
    let unchecked = method(&program, "ExceptionTest.testUnchecked(int)");

    let err = interp
        .invoke(unchecked, Some(test), vec![Value::Int(0)])
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "uncaught exception `java.lang.IllegalArgumentException`: zero"
    );
    let EvalError::Uncaught { exception, .. } = err else {
        panic!("expected an uncaught exception");
    };
    let message = call(
        &mut interp,
        Value::Object(exception),
        "java.lang.Throwable.getMessage()",
        vec![],
    );
    assert_eq!(interp.string(message), Some("zero"));

    assert_eq!(
        interp.invoke(unchecked, Some(test), vec![Value::Int(4)]).unwrap(),
        Value::Int(25)
    );
}

/// Static methods exercising exceptions raised by the runtime and abrupt `finally` blocks.
fn faults() -> CompilationUnit {
    // static int divide(int x) { try { return 10 / x; } catch (ArithmeticException e) { return -1; } }
    let divide = {
        let mut b = BodyBuilder::new();
        let x = b.param("x", TypeExpr::int());
        let ten = b.int(10);
        let read = b.read(x);
        let quotient = b.binary(BinaryOp::Div, ten, read);
        let ret = b.ret(Some(quotient));
        let body = b.block(vec![ret]);
        let param = b.catch_param("e", TypeExpr::named("ArithmeticException"));
        let minus_one = b.int(-1);
        let ret = b.ret(Some(minus_one));
        let handler = b.block(vec![ret]);
        let clause = b.catch_clause(param, handler);
        let try_stmt = b.try_(body, vec![clause], None);
        MethodDecl::method("divide", TypeExpr::int())
            .static_()
            .body(b.finish(vec![try_stmt]))
    };
    // static int unwrap(Value v) { return v.getValue(); }
    let unwrap = {
        let mut b = BodyBuilder::new();
        let v = b.param("v", TypeExpr::named("Value"));
        let recv = b.read(v);
        let call = b.call(Receiver::Expr(recv), "getValue", vec![]);
        let ret = b.ret(Some(call));
        MethodDecl::method("unwrap", TypeExpr::int())
            .static_()
            .body(b.finish(vec![ret]))
    };
    // static int masked() { try { throw new IllegalArgumentException("lost"); } finally { return 7; } }
    let masked = {
        let mut b = BodyBuilder::new();
        let message = b.string("lost");
        let exc = b.new_object("IllegalArgumentException", vec![message]);
        let throw = b.throw(exc);
        let body = b.block(vec![throw]);
        let seven = b.int(7);
        let ret = b.ret(Some(seven));
        let finally = b.block(vec![ret]);
        let try_stmt = b.try_(body, vec![], Some(finally));
        MethodDecl::method("masked", TypeExpr::int())
            .static_()
            .body(b.finish(vec![try_stmt]))
    };
    // static int overridden() { try { return 1; } finally { return 2; } }
    let overridden = {
        let mut b = BodyBuilder::new();
        let one = b.int(1);
        let ret = b.ret(Some(one));
        let body = b.block(vec![ret]);
        let two = b.int(2);
        let ret = b.ret(Some(two));
        let finally = b.block(vec![ret]);
        let try_stmt = b.try_(body, vec![], Some(finally));
        MethodDecl::method("overridden", TypeExpr::int())
            .static_()
            .body(b.finish(vec![try_stmt]))
    };
    // static int spin(int n) { return spin(n + 1); }
    let spin = {
        let mut b = BodyBuilder::new();
        let n = b.param("n", TypeExpr::int());
        let read = b.read(n);
        let one = b.int(1);
        let next = b.binary(BinaryOp::Add, read, one);
        let call = b.call(Receiver::Implicit, "spin", vec![next]);
        let ret = b.ret(Some(call));
        MethodDecl::method("spin", TypeExpr::int())
            .static_()
            .body(b.finish(vec![ret]))
    };

    CompilationUnit::new(
        FileId::from_raw(82),
        vec![ClassDecl::class("Faults")
            .method(divide)
            .method(unwrap)
            .method(masked)
            .method(overridden)
            .method(spin)],
    )
}

#[test]
fn runtime_raises_java_exceptions() {
    let program = program(vec![value(), faults()]);
    let mut interp = Interpreter::new(&program);

    let divide = "Faults.divide(int)";
    assert_eq!(call_static(&mut interp, divide, vec![Value::Int(5)]), Value::Int(2));
    assert_eq!(call_static(&mut interp, divide, vec![Value::Int(0)]), Value::Int(-1));

    let unwrap = method(&program, "Faults.unwrap(Value)");
    let err = interp.invoke(unwrap, None, vec![Value::Null]).unwrap_err();
    assert!(
        matches!(&err, EvalError::Uncaught { class, .. } if class == "java.lang.NullPointerException"),
        "{err}"
    );
}

#[test]
fn abrupt_finally_supersedes_the_pending_outcome() {
    let program = program(vec![value(), faults()]);
    let mut interp = Interpreter::new(&program);

    assert_eq!(call_static(&mut interp, "Faults.masked()", vec![]), Value::Int(7));
    assert_eq!(call_static(&mut interp, "Faults.overridden()", vec![]), Value::Int(2));
}

#[test]
fn unbounded_recursion_stops_at_the_depth_limit() {
    let program = program(vec![value(), faults()]);
    let mut interp = Interpreter::with_options(&program, EvalOptions { max_call_depth: 16 });

    let spin = method(&program, "Faults.spin(int)");
    let err = interp.invoke(spin, None, vec![Value::Int(0)]).unwrap_err();
    assert!(matches!(err, EvalError::StackOverflow { limit: 16 }), "{err}");

    // The interpreter stays usable afterwards.
    assert_eq!(
        call_static(&mut interp, "Faults.divide(int)", vec![Value::Int(2)]),
        Value::Int(5)
    );
}
