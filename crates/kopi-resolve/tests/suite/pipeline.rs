use std::collections::BTreeMap;

use kopi_hir::ConstructorCallKind;
use kopi_init::{ConstructorLinks, InstantiationStep};
use kopi_resolve::ResolvedProgram;
use kopi_test_utils::{exception_test, static_test, value, value_subclass};
use kopi_types::ClassId;
use pretty_assertions::assert_eq;

use super::{method, resolve_clean};

fn names(program: &ResolvedProgram, classes: &[ClassId]) -> Vec<String> {
    classes
        .iter()
        .filter(|c| program.graph().file_of(**c).is_some())
        .map(|c| program.graph().class(*c).name.to_string())
        .collect()
}

#[test]
fn static_initialization_runs_each_class_once_in_first_use_order() {
    let program = resolve_clean(vec![static_test()]);
    let entry = program
        .graph()
        .lookup_class("StaticTest")
        .expect("StaticTest");

    let order = program.static_init_order(entry);
    assert!(order.diagnostics.is_empty());
    assert_eq!(
        names(&program, &order.order),
        vec!["StaticTest", "StaticTestClass", "StaticCounter"]
    );
}

#[test]
fn constructors_are_linked_to_their_chained_constructor() {
    let program = resolve_clean(vec![value(), value_subclass()]);
    let sub_ctor = method(&program, "ValueSubclass.ValueSubclass(int)");
    let value_ctor = method(&program, "Value.Value(int)");
    let object_ctor = method(&program, "java.lang.Object.Object()");

    let explicit = program.chained(sub_ctor).expect("super(x)");
    assert_eq!(explicit.kind, ConstructorCallKind::Super);
    assert_eq!(explicit.target, value_ctor);

    // No explicit call: implicit `super()`.
    assert_eq!(
        program.chained(value_ctor).map(|c| c.target),
        Some(object_ctor)
    );
    assert_eq!(program.chained(object_ctor), None);

    assert_eq!(
        program.instantiation_plan(sub_ctor),
        vec![
            InstantiationStep::EnterConstructor(sub_ctor),
            InstantiationStep::EnterConstructor(value_ctor),
            InstantiationStep::EnterConstructor(object_ctor),
            InstantiationStep::ConstructorBody(object_ctor),
            InstantiationStep::ConstructorBody(value_ctor),
            InstantiationStep::ConstructorBody(sub_ctor),
        ]
    );
}

#[test]
fn exception_tables_use_resolved_types() {
    let program = resolve_clean(vec![exception_test()]);
    let graph = program.graph();
    let test_finally = method(&program, "ExceptionTest.testFinally(int)");

    let table = program.exception_table(test_finally);
    let [region] = table.regions() else {
        panic!("one try region");
    };
    let mine = graph.lookup_class("MyException").expect("MyException");
    let other = graph
        .lookup_class("MyOtherException")
        .expect("MyOtherException");
    assert_eq!(
        region.outcomes,
        BTreeMap::from([(mine, Some(0)), (other, Some(1))])
    );

    let no_catch = method(&program, "ExceptionTest.testFinallyNoCatch(int)");
    assert_eq!(program.exception_table(no_catch).escaping(), vec![mine]);

    let test_catch = method(&program, "ExceptionTest.testCatch()");
    assert!(program.exception_table(test_catch).escaping().is_empty());
}
