mod exceptions;

use kopi_eval::{Interpreter, Value};
use kopi_hir::CompilationUnit;
use kopi_resolve::{resolve_program, ResolveOptions, ResolvedProgram};
use kopi_types::{ClassId, FieldId, MethodId};

/// Resolve `units`, which may carry warnings but no errors.
pub(crate) fn program(units: Vec<CompilationUnit>) -> ResolvedProgram {
    kopi_test_utils::init_test_logging();
    let program = resolve_program(units, &ResolveOptions::default());
    assert!(
        !program.has_errors(),
        "unexpected errors: {:#?}",
        program.diagnostics()
    );
    program
}

pub(crate) fn method(program: &ResolvedProgram, display: &str) -> MethodId {
    let graph = program.graph();
    graph
        .methods()
        .map(|m| m.id)
        .find(|id| graph.display_method(*id) == display)
        .unwrap_or_else(|| panic!("method `{display}` should exist"))
}

pub(crate) fn class(program: &ResolvedProgram, name: &str) -> ClassId {
    program
        .graph()
        .lookup_class(name)
        .unwrap_or_else(|| panic!("class `{name}` should exist"))
}

pub(crate) fn field(program: &ResolvedProgram, class_name: &str, name: &str) -> FieldId {
    program
        .graph()
        .lookup_field(class(program, class_name), name)
        .unwrap_or_else(|| panic!("field `{class_name}.{name}` should exist"))
}

/// `new C(args)` through the constructor displayed as `ctor`.
pub(crate) fn new(interp: &mut Interpreter<'_>, ctor: &str, args: Vec<Value>) -> Value {
    let ctor = method(interp.program(), ctor);
    interp
        .instantiate(ctor, args)
        .unwrap_or_else(|err| panic!("instantiation failed: {err}"))
}

/// Call a static method and expect a normal result.
pub(crate) fn call_static(interp: &mut Interpreter<'_>, display: &str, args: Vec<Value>) -> Value {
    let id = method(interp.program(), display);
    interp
        .invoke(id, None, args)
        .unwrap_or_else(|err| panic!("`{display}` failed: {err}"))
}

/// Call an instance method on `receiver` and expect a normal result.
pub(crate) fn call(
    interp: &mut Interpreter<'_>,
    receiver: Value,
    display: &str,
    args: Vec<Value>,
) -> Value {
    let id = method(interp.program(), display);
    interp
        .invoke(id, Some(receiver), args)
        .unwrap_or_else(|err| panic!("`{display}` failed: {err}"))
}

/// User classes (bootstrap JDK classes filtered out) by name.
pub(crate) fn user_classes(program: &ResolvedProgram, classes: &[ClassId]) -> Vec<String> {
    let graph = program.graph();
    classes
        .iter()
        .filter(|c| graph.file_of(**c).is_some())
        .map(|c| graph.class(*c).name.to_string())
        .collect()
}
