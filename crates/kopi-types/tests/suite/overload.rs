use kopi_core::FileId;
use kopi_hir::{BodyBuilder, ClassDecl, CompilationUnit, MethodDecl, PrimitiveType, TypeExpr};
use kopi_test_utils::{dispatch_test, dispatch_test_with, static_test, OverloadOrder};
use kopi_types::{
    is_more_specific, resolve_constructor_call, resolve_method_call, CallKind, ClassGraph,
    MethodCall, MethodResolution, Type,
};
use pretty_assertions::assert_eq;

use super::{build_clean, class, method};

fn call(graph: &ClassGraph, receiver: &str, name: &str, args: &[Type]) -> MethodResolution {
    resolve_method_call(
        graph,
        &MethodCall {
            receiver: class(graph, receiver),
            name,
            args,
            kind: CallKind::Instance,
        },
    )
}

fn class_type(graph: &ClassGraph, name: &str) -> Type {
    Type::Class(class(graph, name))
}

#[test]
fn most_specific_overload_wins_regardless_of_declaration_order() {
    for order in [OverloadOrder::InterfaceFirst, OverloadOrder::ClassFirst] {
        let graph = build_clean(vec![dispatch_test_with(order)]);
        let arg = class_type(&graph, "DispatchClass1");

        assert_eq!(
            call(&graph, "DispatchTest", "test", &[arg]),
            MethodResolution::Found(method(&graph, "DispatchTest.test(DispatchClass1)")),
            "{order:?}"
        );
    }
}

#[test]
fn interface_overload_is_chosen_when_class_overload_does_not_apply() {
    let graph = build_clean(vec![dispatch_test()]);

    let class2 = class_type(&graph, "DispatchClass2");
    assert_eq!(
        call(&graph, "DispatchTest", "test", &[class2]),
        MethodResolution::Found(method(&graph, "DispatchTest.test(DispatchInterface)"))
    );

    let iface = class_type(&graph, "DispatchInterface");
    assert_eq!(
        call(&graph, "DispatchTest", "test", &[iface]),
        MethodResolution::Found(method(&graph, "DispatchTest.test(DispatchInterface)"))
    );
}

#[test]
fn primitive_arguments_pick_the_closest_widening() {
    let graph = build_clean(vec![dispatch_test()]);

    assert_eq!(
        call(&graph, "DispatchTest", "set", &[Type::int()]),
        MethodResolution::Found(method(&graph, "DispatchTest.set(int)"))
    );
    assert_eq!(
        call(&graph, "DispatchTest", "set", &[Type::float()]),
        MethodResolution::Found(method(&graph, "DispatchTest.set(float)"))
    );
    // long widens to float but not to int.
    assert_eq!(
        call(
            &graph,
            "DispatchTest",
            "set",
            &[Type::Primitive(PrimitiveType::Long)]
        ),
        MethodResolution::Found(method(&graph, "DispatchTest.set(float)"))
    );
    assert_eq!(
        call(
            &graph,
            "DispatchTest",
            "set",
            &[Type::Primitive(PrimitiveType::Char)]
        ),
        MethodResolution::Found(method(&graph, "DispatchTest.set(int)"))
    );
}

#[test]
fn no_applicable_method_lists_the_candidates() {
    let graph = build_clean(vec![dispatch_test()]);
    let string = Type::Class(graph.well_known().string.expect("bootstrap String"));

    let MethodResolution::NotFound { mut candidates } =
        call(&graph, "DispatchTest", "test", &[string])
    else {
        panic!("a String argument must not match any `test` overload");
    };
    candidates.sort();
    let mut expected = vec![
        method(&graph, "DispatchTest.test(DispatchInterface)"),
        method(&graph, "DispatchTest.test(DispatchClass1)"),
    ];
    expected.sort();
    assert_eq!(candidates, expected);

    assert_eq!(
        call(&graph, "DispatchTest", "test", &[Type::int(), Type::int()]),
        MethodResolution::NotFound {
            candidates: graph.catalog(class(&graph, "DispatchTest")).candidates("test"),
        }
    );
}

#[test]
fn ambiguous_calls_report_tied_candidates_in_display_order() {
    let with_params = |params: Vec<(&str, TypeExpr)>| {
        let mut b = BodyBuilder::new();
        for (name, ty) in params {
            b.param(name, ty);
        }
        MethodDecl::method("m", TypeExpr::Void).body(b.finish(vec![]))
    };
    let graph = build_clean(vec![CompilationUnit::new(
        FileId::from_raw(1),
        vec![ClassDecl::class("Amb")
            .method(with_params(vec![("a", TypeExpr::int()), ("b", TypeExpr::float())]))
            .method(with_params(vec![("a", TypeExpr::float()), ("b", TypeExpr::int())]))],
    )]);

    assert_eq!(
        call(&graph, "Amb", "m", &[Type::int(), Type::int()]),
        MethodResolution::Ambiguous(vec![
            method(&graph, "Amb.m(float, int)"),
            method(&graph, "Amb.m(int, float)"),
        ])
    );
    // An exact match breaks the tie.
    assert_eq!(
        call(&graph, "Amb", "m", &[Type::int(), Type::float()]),
        MethodResolution::Found(method(&graph, "Amb.m(int, float)"))
    );
}

#[test]
fn null_argument_prefers_the_most_specific_reference_overload() {
    let graph = build_clean(vec![dispatch_test()]);
    assert_eq!(
        call(&graph, "DispatchTest", "test", &[Type::Null]),
        MethodResolution::Found(method(&graph, "DispatchTest.test(DispatchClass1)"))
    );
}

#[test]
fn constructor_resolution_uses_only_the_class_own_constructors() {
    let graph = build_clean(vec![dispatch_test()]);
    let dispatch = class(&graph, "DispatchTest");

    let cases: [(&[Type], &str); 4] = [
        (&[], "DispatchTest.DispatchTest()"),
        (&[Type::int()], "DispatchTest.DispatchTest(int)"),
        (&[Type::float()], "DispatchTest.DispatchTest(float)"),
        (
            &[Type::int(), Type::int()],
            "DispatchTest.DispatchTest(int, float)",
        ),
    ];
    for (args, expected) in cases {
        assert_eq!(
            resolve_constructor_call(&graph, dispatch, args),
            MethodResolution::Found(method(&graph, expected)),
            "{expected}"
        );
    }
}

#[test]
fn static_calls_rank_instance_methods_too() {
    let graph = build_clean(vec![static_test(), dispatch_test()]);
    let static_call = |receiver: &str, name: &str, args: &[Type]| {
        resolve_method_call(
            &graph,
            &MethodCall {
                receiver: class(&graph, receiver),
                name,
                args,
                kind: CallKind::Static,
            },
        )
    };

    assert_eq!(
        static_call("StaticTestClass", "newInstance", &[Type::int()]),
        MethodResolution::Found(method(&graph, "StaticTestClass.newInstance(int)"))
    );
    assert_eq!(
        static_call("DispatchTest", "set", &[Type::int()]),
        MethodResolution::NotStatic(method(&graph, "DispatchTest.set(int)"))
    );
}

#[test]
fn more_specific_instance_method_shadows_static_overload_in_static_call() {
    // class C { static void m(Object o) {} void m(String s) {} }
    let with_param = |ty: &str| {
        let mut b = BodyBuilder::new();
        b.param("o", TypeExpr::named(ty));
        MethodDecl::method("m", TypeExpr::Void).body(b.finish(vec![]))
    };
    let graph = build_clean(vec![CompilationUnit::new(
        FileId::from_raw(1),
        vec![ClassDecl::class("C")
            .method(with_param("Object").static_())
            .method(with_param("String"))],
    )]);
    let string = Type::Class(graph.well_known().string.expect("bootstrap String"));
    let object = Type::Class(graph.well_known().object.expect("bootstrap Object"));

    let static_call = |args: &[Type]| {
        resolve_method_call(
            &graph,
            &MethodCall {
                receiver: class(&graph, "C"),
                name: "m",
                args,
                kind: CallKind::Static,
            },
        )
    };
    assert_eq!(
        static_call(&[string]),
        MethodResolution::NotStatic(method(&graph, "C.m(java.lang.String)"))
    );
    assert_eq!(
        static_call(&[object]),
        MethodResolution::Found(method(&graph, "C.m(java.lang.Object)"))
    );
}

#[test]
fn specificity_is_a_parameterwise_assignability_check() {
    let graph = build_clean(vec![dispatch_test()]);
    let by_class = method(&graph, "DispatchTest.test(DispatchClass1)");
    let by_iface = method(&graph, "DispatchTest.test(DispatchInterface)");

    assert!(is_more_specific(&graph, by_class, by_iface));
    assert!(!is_more_specific(&graph, by_iface, by_class));
}
