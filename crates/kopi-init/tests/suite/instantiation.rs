use kopi_core::FileId;
use kopi_hir::{BodyBuilder, ClassDecl, CompilationUnit, FieldDecl, MethodDecl, TypeExpr};
use kopi_init::{instance_init_plan, instantiation_plan, static_init_plan, InstantiationStep};
use kopi_test_utils::{field_test_with, shadowing, value, value_subclass, FieldOrder};
use kopi_types::ClassGraph;
use pretty_assertions::assert_eq;

use super::{class, graph, method, Structural};

fn field_names(graph: &ClassGraph, steps: &[kopi_init::InitStep]) -> Vec<String> {
    steps
        .iter()
        .map(|s| graph.field(s.field).name.to_string())
        .collect()
}

#[test]
fn field_initializers_follow_declaration_order() {
    for (order, expected) in [
        (FieldOrder::BFirst, vec!["b", "d", "e", "f"]),
        (FieldOrder::EFirst, vec!["e", "d", "b", "f"]),
    ] {
        let graph = graph(vec![field_test_with(order)]);
        let field_test = class(&graph, "FieldTest");

        assert_eq!(
            field_names(&graph, &instance_init_plan(&graph, field_test)),
            expected,
            "{order:?}"
        );
        // `g` has no initializer and keeps its zero value.
        assert_eq!(
            field_names(&graph, &static_init_plan(&graph, field_test)),
            vec!["h"]
        );
    }
}

#[test]
fn superclass_construction_precedes_subclass_field_initializers() {
    let graph = graph(vec![shadowing()]);
    let links = Structural { graph: &graph };
    let base = class(&graph, "ShadowBase");
    let sub = class(&graph, "ShadowSub");

    let sub_ctor = method(&graph, "ShadowSub.ShadowSub()");
    let base_ctor = method(&graph, "ShadowBase.ShadowBase()");
    let object_ctor = method(&graph, "java.lang.Object.Object()");
    let base_value = instance_init_plan(&graph, base)[0];
    let sub_value = instance_init_plan(&graph, sub)[0];
    assert_ne!(base_value.field, sub_value.field);

    assert_eq!(
        instantiation_plan(&graph, sub_ctor, &links),
        vec![
            InstantiationStep::EnterConstructor(sub_ctor),
            InstantiationStep::EnterConstructor(base_ctor),
            InstantiationStep::EnterConstructor(object_ctor),
            InstantiationStep::ConstructorBody(object_ctor),
            InstantiationStep::FieldInit {
                class: base,
                step: base_value
            },
            InstantiationStep::ConstructorBody(base_ctor),
            InstantiationStep::FieldInit {
                class: sub,
                step: sub_value
            },
            InstantiationStep::ConstructorBody(sub_ctor),
        ]
    );
}

#[test]
fn explicit_super_call_selects_the_chained_constructor() {
    let graph = graph(vec![value(), value_subclass()]);
    let links = Structural { graph: &graph };
    let sub_ctor = method(&graph, "ValueSubclass.ValueSubclass(int)");
    let value_ctor = method(&graph, "Value.Value(int)");
    let object_ctor = method(&graph, "java.lang.Object.Object()");

    assert_eq!(
        instantiation_plan(&graph, sub_ctor, &links),
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
fn delegating_constructor_runs_field_initializers_once() {
    // class Delegating { int n = 7; Delegating() { this(1); } Delegating(int x) { } }
    let mut init = BodyBuilder::new();
    let seven = init.int(7);
    let initializers = init.finish(vec![]);

    let mut b = BodyBuilder::new();
    let one = b.int(1);
    let delegate = b.this_call(vec![one]);
    let no_arg = MethodDecl::constructor("Delegating").body(b.finish(vec![delegate]));

    let mut b = BodyBuilder::new();
    b.param("x", TypeExpr::int());
    let with_x = MethodDecl::constructor("Delegating").body(b.finish(vec![]));

    let graph = graph(vec![CompilationUnit::new(
        FileId::from_raw(60),
        vec![ClassDecl::class("Delegating")
            .initializers(initializers)
            .field(FieldDecl::new("n", TypeExpr::int()).initializer(seven))
            .method(no_arg)
            .method(with_x)],
    )]);
    let links = Structural { graph: &graph };
    let delegating = class(&graph, "Delegating");
    let no_arg = method(&graph, "Delegating.Delegating()");
    let with_x = method(&graph, "Delegating.Delegating(int)");
    let object_ctor = method(&graph, "java.lang.Object.Object()");
    let n = instance_init_plan(&graph, delegating)[0];

    assert_eq!(
        instantiation_plan(&graph, no_arg, &links),
        vec![
            InstantiationStep::EnterConstructor(no_arg),
            InstantiationStep::EnterConstructor(with_x),
            InstantiationStep::EnterConstructor(object_ctor),
            InstantiationStep::ConstructorBody(object_ctor),
            InstantiationStep::FieldInit {
                class: delegating,
                step: n
            },
            InstantiationStep::ConstructorBody(with_x),
            InstantiationStep::ConstructorBody(no_arg),
        ]
    );
}

#[test]
fn recursive_this_chain_is_cut() {
    let mut b = BodyBuilder::new();
    let loop_back = b.this_call(vec![]);
    let ctor = MethodDecl::constructor("Loop").body(b.finish(vec![loop_back]));
    let graph = graph(vec![CompilationUnit::new(
        FileId::from_raw(61),
        vec![ClassDecl::class("Loop").method(ctor)],
    )]);
    let ctor = method(&graph, "Loop.Loop()");

    assert_eq!(
        instantiation_plan(&graph, ctor, &Structural { graph: &graph }),
        vec![
            InstantiationStep::EnterConstructor(ctor),
            InstantiationStep::ConstructorBody(ctor),
        ]
    );
}
