use kopi_core::{DiagnosticKind, FileId, Severity};
use kopi_hir::{BodyBuilder, ClassDecl, CompilationUnit, MethodDecl, TypeExpr, Visibility};
use kopi_test_utils::{dispatch_test, value, value_driver, value_subclass};
use kopi_types::{GraphBuild, Signature, Type};
use pretty_assertions::assert_eq;

use super::{build, build_clean, class, method};

fn unit(classes: Vec<ClassDecl>) -> CompilationUnit {
    CompilationUnit::new(FileId::from_raw(1), classes)
}

fn returning(name: &str, ty: TypeExpr) -> MethodDecl {
    let mut b = BodyBuilder::new();
    let zero = b.int(0);
    let ret = b.ret(Some(zero));
    MethodDecl::method(name, ty).body(b.finish(vec![ret]))
}

#[test]
fn override_table_maps_signatures_to_most_derived_declaration() {
    let graph = build_clean(vec![value(), value_subclass()]);
    let sub = class(&graph, "ValueSubclass");
    let catalog = graph.catalog(sub);

    let set_value = Signature {
        name: "setValue".into(),
        params: vec![Type::int()],
    };
    assert_eq!(
        catalog.implementation(&set_value),
        Some(method(&graph, "ValueSubclass.setValue(int)"))
    );

    let get_value = Signature {
        name: "getValue".into(),
        params: vec![],
    };
    assert_eq!(
        catalog.implementation(&get_value),
        Some(method(&graph, "Value.getValue()"))
    );

    assert_eq!(
        catalog.declared("setValue"),
        &[method(&graph, "ValueSubclass.setValue(int)")]
    );
    assert!(catalog.declared("getValue").is_empty());
}

#[test]
fn dispatch_is_a_single_lookup_in_the_runtime_class() {
    let graph = build_clean(vec![value(), value_subclass()]);
    let base_set = method(&graph, "Value.setValue(int)");
    let sub_set = method(&graph, "ValueSubclass.setValue(int)");

    assert_eq!(graph.dispatch(class(&graph, "ValueSubclass"), base_set), sub_set);
    assert_eq!(graph.dispatch(class(&graph, "Value"), base_set), base_set);

    let base_get = method(&graph, "Value.getValue()");
    assert_eq!(graph.dispatch(class(&graph, "ValueSubclass"), base_get), base_get);
}

#[test]
fn interface_methods_dispatch_to_implementations() {
    let graph = build_clean(vec![dispatch_test()]);
    let abstract_test = method(&graph, "DispatchInterface.test()");

    assert!(graph.method(abstract_test).is_abstract);
    assert_eq!(
        graph.dispatch(class(&graph, "DispatchClass1"), abstract_test),
        method(&graph, "DispatchClass1.test()")
    );
    assert_eq!(
        graph.dispatch(class(&graph, "DispatchClass2"), abstract_test),
        method(&graph, "DispatchClass2.test()")
    );
}

#[test]
fn constructors_are_not_inherited_and_defaults_are_synthesized() {
    let graph = build_clean(vec![value(), value_subclass(), value_driver()]);

    let sub = graph.catalog(class(&graph, "ValueSubclass"));
    assert_eq!(
        sub.constructors(),
        &[method(&graph, "ValueSubclass.ValueSubclass(int)")]
    );
    assert!(sub.candidates("Value").is_empty());

    let driver = graph.catalog(class(&graph, "ValueDriver"));
    let [implicit] = driver.constructors() else {
        panic!("expected exactly one constructor");
    };
    let implicit = graph.method(*implicit);
    assert!(implicit.is_implicit);
    assert!(implicit.params.is_empty());

    let value_ctors = graph.catalog(class(&graph, "Value")).constructors();
    assert!(value_ctors.iter().all(|c| !graph.method(*c).is_implicit));
}

#[test]
fn duplicate_signature_reports_return_type_conflict() {
    let GraphBuild { graph, diagnostics } = build(vec![unit(vec![ClassDecl::class("Dup")
        .method(returning("m", TypeExpr::int()))
        .method(returning("m", TypeExpr::float()))])]);

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::DuplicateDefinition);
    assert_eq!(diagnostics[0].symbols, vec!["Dup.m()"]);
    assert!(
        diagnostics[0].message.contains("different return type"),
        "{}",
        diagnostics[0].message
    );

    // The first declaration stays callable.
    let dup = graph.catalog(class(&graph, "Dup"));
    let [only] = dup.declared("m") else {
        panic!("expected the first `m` to survive");
    };
    assert_eq!(graph.method(*only).return_ty, Some(Type::int()));
}

#[test]
fn concrete_class_must_implement_interface_methods() {
    let GraphBuild { diagnostics, .. } = build(vec![unit(vec![
        ClassDecl::interface("Shape")
            .method(MethodDecl::method("area", TypeExpr::int()).abstract_()),
        ClassDecl::class("Blob").implements("Shape"),
    ])]);

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::MissingImplementation);
    assert_eq!(diagnostics[0].symbols, vec!["Blob", "Shape.area()"]);
}

#[test]
fn abstract_class_may_defer_interface_methods_to_subclasses() {
    let GraphBuild { graph, diagnostics } = build(vec![unit(vec![
        ClassDecl::interface("Shape")
            .method(MethodDecl::method("area", TypeExpr::int()).abstract_()),
        ClassDecl::class("AbstractShape").abstract_().implements("Shape"),
        ClassDecl::class("Square")
            .extends("AbstractShape")
            .method(returning("area", TypeExpr::int())),
    ])]);

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::UnimplementedInterfaceMethod);
    assert_eq!(diagnostics[0].severity, Severity::Warning);
    assert_eq!(diagnostics[0].symbols, vec!["AbstractShape", "Shape.area()"]);

    let area = method(&graph, "Shape.area()");
    assert_eq!(
        graph.dispatch(class(&graph, "Square"), area),
        method(&graph, "Square.area()")
    );
}

#[test]
fn private_methods_are_not_visible_in_subclasses() {
    let graph = build_clean(vec![unit(vec![
        ClassDecl::class("Base")
            .method(returning("secret", TypeExpr::int()).visibility(Visibility::Private))
            .method(returning("open", TypeExpr::int())),
        ClassDecl::class("Derived").extends("Base"),
    ])]);

    let base = graph.catalog(class(&graph, "Base"));
    assert_eq!(base.candidates("secret").len(), 1);

    let derived = graph.catalog(class(&graph, "Derived"));
    assert!(derived.candidates("secret").is_empty());
    assert_eq!(derived.candidates("open"), vec![method(&graph, "Base.open()")]);
}

#[test]
fn methods_with_unresolved_signatures_are_left_out_of_the_catalog() {
    let mut b = BodyBuilder::new();
    b.param("x", TypeExpr::named("Nowhere"));
    let broken = MethodDecl::method("use", TypeExpr::Void).body(b.finish(vec![]));

    let GraphBuild { graph, diagnostics } =
        build(vec![unit(vec![ClassDecl::class("Client").method(broken)])]);

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::UnresolvedType);
    assert!(graph.catalog(class(&graph, "Client")).candidates("use").is_empty());
}
