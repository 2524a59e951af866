//! The minimal `java.lang` surface every importer run can rely on.

use kopi_core::{FileId, Name};
use kopi_hir::{
    BodyBuilder, ClassDecl, CompilationUnit, FieldDecl, MethodDecl, TypeExpr, Visibility,
};

/// File id reserved for bootstrap declarations; never reported in diagnostics.
pub(crate) const BOOTSTRAP_FILE: FileId = FileId::from_raw(u32::MAX);

/// `(simple name, superclass)` of each bootstrap throwable beyond `Throwable` itself.
const THROWABLES: &[(&str, &str)] = &[
    ("Exception", "Throwable"),
    ("RuntimeException", "Exception"),
    ("Error", "Throwable"),
    ("NullPointerException", "RuntimeException"),
    ("ArithmeticException", "RuntimeException"),
    ("IllegalArgumentException", "RuntimeException"),
];

/// The bootstrap `java.lang` compilation unit.
///
/// User input declaring a class with the same qualified name replaces the bootstrap entry.
#[must_use]
pub fn bootstrap_units() -> Vec<CompilationUnit> {
    let mut classes = vec![
        ClassDecl::class("Object"),
        ClassDecl::class("String"),
        throwable(),
    ];
    classes.extend(
        THROWABLES
            .iter()
            .map(|(name, super_name)| forwarding_throwable(name, super_name)),
    );

    vec![CompilationUnit {
        file: BOOTSTRAP_FILE,
        package: Some(Name::new("java.lang")),
        imports: Vec::new(),
        classes,
    }]
}

fn throwable() -> ClassDecl {
    let no_arg = MethodDecl::constructor("Throwable").body(BodyBuilder::new().finish(vec![]));

    let with_message = {
        let mut b = BodyBuilder::new();
        let message = b.param("message", TypeExpr::named("String"));
        let target = b.this_field("detailMessage");
        let value = b.read(message);
        let assign = b.assign(target, value);
        MethodDecl::constructor("Throwable").body(b.finish(vec![assign]))
    };

    let get_message = {
        let mut b = BodyBuilder::new();
        let value = b.this_field("detailMessage");
        let ret = b.ret(Some(value));
        MethodDecl::method("getMessage", TypeExpr::named("String")).body(b.finish(vec![ret]))
    };

    ClassDecl::class("Throwable")
        .field(
            FieldDecl::new("detailMessage", TypeExpr::named("String"))
                .visibility(Visibility::Private),
        )
        .method(no_arg)
        .method(with_message)
        .method(get_message)
}

/// A throwable whose constructors just forward to `super(...)`.
fn forwarding_throwable(name: &str, super_name: &str) -> ClassDecl {
    let no_arg = {
        let mut b = BodyBuilder::new();
        let sup = b.super_call(vec![]);
        MethodDecl::constructor(name).body(b.finish(vec![sup]))
    };
    let with_message = {
        let mut b = BodyBuilder::new();
        let message = b.param("message", TypeExpr::named("String"));
        let arg = b.read(message);
        let sup = b.super_call(vec![arg]);
        MethodDecl::constructor(name).body(b.finish(vec![sup]))
    };

    ClassDecl::class(name)
        .extends(super_name)
        .method(no_arg)
        .method(with_message)
}
