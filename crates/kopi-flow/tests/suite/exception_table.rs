use std::collections::BTreeMap;

use kopi_core::{DiagnosticKind, FileId};
use kopi_flow::{Disposition, FlowOptions, ThrowSite};
use kopi_hir::{BodyBuilder, ClassDecl, CompilationUnit, MethodDecl, StmtKind, TypeExpr};
use kopi_test_utils::{exception_test, files, undeclared_checked_exception};
use pretty_assertions::assert_eq;

use super::{analyze, graph};

#[test]
fn catch_clauses_are_matched_in_declaration_order() {
    let graph = graph(vec![exception_test()]);
    let (_, flow) = analyze(&graph, "ExceptionTest.testFinally(int)", &FlowOptions::default());

    assert!(flow.diagnostics.is_empty(), "{:#?}", flow.diagnostics);
    let [region] = flow.table.regions() else {
        panic!("testFinally has exactly one try region");
    };
    assert!(region.finally.is_some());

    let mine = graph.lookup_class("MyException").expect("MyException");
    let other = graph.lookup_class("MyOtherException").expect("MyOtherException");
    assert_eq!(
        region.outcomes,
        BTreeMap::from([(mine, Some(0)), (other, Some(1))])
    );

    // The same rule at run time.
    assert_eq!(region.select(&graph, other), Some(1));
    assert_eq!(region.select(&graph, mine), Some(0));
    let npe = graph.well_known().null_pointer_exception.expect("NPE");
    assert_eq!(region.select(&graph, npe), None);

    assert!(flow.table.escaping().is_empty());
}

#[test]
fn first_match_wins_over_a_more_specific_later_clause() {
    let mut b = BodyBuilder::new();
    let exc = b.new_object("MyException", vec![]);
    let throw = b.throw(exc);
    let protected = b.block(vec![throw]);
    let broad = b.catch_param("any", TypeExpr::named("Exception"));
    let broad_body = b.block(vec![]);
    let broad = b.catch_clause(broad, broad_body);
    let narrow = b.catch_param("mine", TypeExpr::named("MyException"));
    let narrow_body = b.block(vec![]);
    let narrow = b.catch_clause(narrow, narrow_body);
    let try_stmt = b.try_(protected, vec![broad, narrow], None);
    let swallow = MethodDecl::method("swallow", TypeExpr::Void).body(b.finish(vec![try_stmt]));

    let graph = graph(vec![
        exception_test(),
        CompilationUnit::new(
            FileId::from_raw(40),
            vec![ClassDecl::class("Broad").method(swallow)],
        ),
    ]);

    let (_, flow) = analyze(&graph, "Broad.swallow()", &FlowOptions::default());
    let mine = graph.lookup_class("MyException").expect("MyException");
    assert_eq!(flow.table.regions()[0].select(&graph, mine), Some(0));

    assert_eq!(flow.diagnostics.len(), 1);
    assert_eq!(flow.diagnostics[0].kind, DiagnosticKind::UnreachableCatchClause);
    assert_eq!(
        flow.diagnostics[0].symbols,
        vec!["MyException", "java.lang.Exception"]
    );

    let quiet = FlowOptions {
        report_unreachable_catch: false,
    };
    let (_, flow) = analyze(&graph, "Broad.swallow()", &quiet);
    assert!(flow.diagnostics.is_empty());
}

#[test]
fn exception_without_catch_escapes_through_finally() {
    let graph = graph(vec![exception_test()]);
    let (_, flow) = analyze(
        &graph,
        "ExceptionTest.testFinallyNoCatch(int)",
        &FlowOptions::default(),
    );

    // Declared in `throws`, so no diagnostic.
    assert!(flow.diagnostics.is_empty(), "{:#?}", flow.diagnostics);

    let mine = graph.lookup_class("MyException").expect("MyException");
    let [region] = flow.table.regions() else {
        panic!("one try region");
    };
    assert!(region.handlers.is_empty());
    assert!(region.finally.is_some());
    assert_eq!(region.outcomes, BTreeMap::from([(mine, None)]));
    assert_eq!(flow.table.escaping(), vec![mine]);

    let [propagation] = flow.table.propagations() else {
        panic!("one throw site");
    };
    assert_eq!(propagation.disposition, Disposition::Escapes);
    assert_eq!(propagation.finally, region.finally.into_iter().collect::<Vec<_>>());
}

#[test]
fn unchecked_exceptions_need_no_declaration() {
    let graph = graph(vec![exception_test()]);
    let (_, flow) = analyze(
        &graph,
        "ExceptionTest.testUnchecked(int)",
        &FlowOptions::default(),
    );

    assert!(flow.diagnostics.is_empty());
    let iae = graph
        .lookup_class("java.lang.IllegalArgumentException")
        .expect("bootstrap IllegalArgumentException");
    assert_eq!(flow.table.escaping(), vec![iae]);
}

#[test]
fn undeclared_checked_exceptions_are_reported_at_the_site() {
    let graph = graph(vec![exception_test(), undeclared_checked_exception()]);
    let options = FlowOptions::default();

    let (_, leak) = analyze(&graph, "LeakyExceptions.leak()", &options);
    assert_eq!(leak.diagnostics.len(), 1);
    assert_eq!(leak.diagnostics[0].kind, DiagnosticKind::UndeclaredCheckedException);
    assert_eq!(
        leak.diagnostics[0].symbols,
        vec!["MyException", "LeakyExceptions.leak()"]
    );
    assert_eq!(
        leak.diagnostics[0].location.map(|l| l.file),
        Some(files::LEAKY_EXCEPTIONS)
    );

    let (_, caller) = analyze(&graph, "LeakyExceptions.callsDeclared()", &options);
    assert_eq!(caller.diagnostics.len(), 1);
    assert_eq!(
        caller.diagnostics[0].symbols,
        vec!["MyOtherException", "LeakyExceptions.callsDeclared()"]
    );
    assert!(matches!(
        caller.table.propagations()[0].site,
        ThrowSite::Call(_)
    ));

    let (_, declared) = analyze(&graph, "LeakyExceptions.declared()", &options);
    assert!(declared.diagnostics.is_empty());
}

#[test]
fn rethrow_from_catch_is_matched_against_enclosing_regions() {
    // try { try { throw new MyException(); } catch (MyException e) { throw e; } }
    // catch (Exception outer) { }
    let mut b = BodyBuilder::new();
    let exc = b.new_object("MyException", vec![]);
    let first_throw = b.throw(exc);
    let inner_body = b.block(vec![first_throw]);
    let e = b.catch_param("e", TypeExpr::named("MyException"));
    let rethrown = b.read(e);
    let rethrow = b.throw(rethrown);
    let inner_handler = b.block(vec![rethrow]);
    let inner_clause = b.catch_clause(e, inner_handler);
    let inner_try = b.try_(inner_body, vec![inner_clause], None);
    let outer_body = b.block(vec![inner_try]);
    let outer = b.catch_param("outer", TypeExpr::named("Exception"));
    let outer_handler = b.block(vec![]);
    let outer_clause = b.catch_clause(outer, outer_handler);
    let outer_try = b.try_(outer_body, vec![outer_clause], None);
    let nested = MethodDecl::method("nested", TypeExpr::Void).body(b.finish(vec![outer_try]));

    let graph = graph(vec![
        exception_test(),
        CompilationUnit::new(
            FileId::from_raw(41),
            vec![ClassDecl::class("Nested").method(nested)],
        ),
    ]);
    let (id, flow) = analyze(&graph, "Nested.nested()", &FlowOptions::default());
    assert!(flow.diagnostics.is_empty(), "{:#?}", flow.diagnostics);

    let mine = graph.lookup_class("MyException").expect("MyException");
    let props = flow.table.propagations();
    assert_eq!(props.len(), 2);
    assert_eq!(props[0].site, ThrowSite::Throw(first_throw));
    assert_eq!(
        props[0].disposition,
        Disposition::Caught {
            try_stmt: inner_try,
            clause: 0
        }
    );
    assert_eq!(props[1].site, ThrowSite::Throw(rethrow));
    assert_eq!(props[1].exception, mine);
    assert_eq!(
        props[1].disposition,
        Disposition::Caught {
            try_stmt: outer_try,
            clause: 0
        }
    );

    let body = graph.method(id).body.as_ref().expect("body");
    assert!(matches!(body.stmt(rethrow).kind, StmtKind::Throw(_)));
    assert_eq!(flow.table.regions().len(), 2);
    assert_eq!(flow.table.regions()[0].stmt, outer_try);
}

#[test]
fn bodies_without_try_or_throw_have_empty_tables() {
    let graph = graph(vec![kopi_test_utils::dispatch_test()]);
    let (_, flow) = analyze(
        &graph,
        "DispatchTest.testTest(DispatchInterface)",
        &FlowOptions::default(),
    );
    assert!(flow.table.regions().is_empty());
    assert!(flow.table.propagations().is_empty());
    assert!(flow.diagnostics.is_empty());
}

#[test]
fn propagations_list_the_finally_blocks_they_unwind() {
    // try {
    //     try { throw new MyException(); } catch (MyException e) { throw e; } finally { A }
    // } catch (Exception outer) { } finally { B }
    let mut b = BodyBuilder::new();
    let exc = b.new_object("MyException", vec![]);
    let first_throw = b.throw(exc);
    let inner_body = b.block(vec![first_throw]);
    let e = b.catch_param("e", TypeExpr::named("MyException"));
    let rethrown = b.read(e);
    let rethrow = b.throw(rethrown);
    let inner_handler = b.block(vec![rethrow]);
    let inner_clause = b.catch_clause(e, inner_handler);
    let inner_finally = b.block(vec![]);
    let inner_try = b.try_(inner_body, vec![inner_clause], Some(inner_finally));
    let outer_body = b.block(vec![inner_try]);
    let outer = b.catch_param("outer", TypeExpr::named("Exception"));
    let outer_handler = b.block(vec![]);
    let outer_clause = b.catch_clause(outer, outer_handler);
    let outer_finally = b.block(vec![]);
    let outer_try = b.try_(outer_body, vec![outer_clause], Some(outer_finally));
    let unwind = MethodDecl::method("unwind", TypeExpr::Void).body(b.finish(vec![outer_try]));

    let graph = graph(vec![
        exception_test(),
        CompilationUnit::new(
            FileId::from_raw(42),
            vec![ClassDecl::class("Unwind").method(unwind)],
        ),
    ]);
    let (_, flow) = analyze(&graph, "Unwind.unwind()", &FlowOptions::default());
    assert!(flow.diagnostics.is_empty(), "{:#?}", flow.diagnostics);

    let props = flow.table.propagations();
    assert_eq!(props.len(), 2);
    // Caught right where it is thrown: the inner `finally` runs after the handler.
    assert_eq!(props[0].site, ThrowSite::Throw(first_throw));
    assert!(props[0].finally.is_empty());
    // The rethrow leaves the inner handler through the inner `finally` only.
    assert_eq!(props[1].site, ThrowSite::Throw(rethrow));
    assert_eq!(
        props[1].disposition,
        Disposition::Caught {
            try_stmt: outer_try,
            clause: 0
        }
    );
    assert_eq!(props[1].finally, vec![inner_finally]);
}

#[test]
fn exception_thrown_by_a_handler_escapes_through_that_try_finally() {
    // try { } catch (MyException e) { throw new MyOtherException(); } finally { }
    let mut b = BodyBuilder::new();
    let protected = b.block(vec![]);
    let e = b.catch_param("e", TypeExpr::named("MyException"));
    let other = b.new_object("MyOtherException", vec![]);
    let throw = b.throw(other);
    let handler = b.block(vec![throw]);
    let clause = b.catch_clause(e, handler);
    let finally = b.block(vec![]);
    let try_stmt = b.try_(protected, vec![clause], Some(finally));
    let translate = MethodDecl::method("translate", TypeExpr::Void)
        .throws("MyOtherException")
        .body(b.finish(vec![try_stmt]));

    let graph = graph(vec![
        exception_test(),
        CompilationUnit::new(
            FileId::from_raw(43),
            vec![ClassDecl::class("Translate").method(translate)],
        ),
    ]);
    let (_, flow) = analyze(&graph, "Translate.translate()", &FlowOptions::default());
    assert!(flow.diagnostics.is_empty(), "{:#?}", flow.diagnostics);

    let other = graph.lookup_class("MyOtherException").expect("MyOtherException");
    let [propagation] = flow.table.propagations() else {
        panic!("one throw site");
    };
    assert_eq!(propagation.exception, other);
    assert_eq!(propagation.disposition, Disposition::Escapes);
    assert_eq!(propagation.finally, vec![finally]);
    // The handler's own statement never catches what its clauses throw.
    assert!(!flow.table.regions()[0].outcomes.contains_key(&other));
}
