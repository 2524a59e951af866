use kopi_config::KopiConfig;
use kopi_core::DiagnosticKind;
use kopi_resolve::resolve_program;
use kopi_test_utils::{exception_test, undeclared_checked_exception};
use pretty_assertions::assert_eq;

#[test]
fn defaults_match_the_pipeline_defaults() {
    let config = KopiConfig::default();
    assert_eq!(config.graph_options(), kopi_types::GraphOptions::default());
    assert_eq!(config.flow_options(), kopi_flow::FlowOptions::default());
    assert_eq!(config.resolve_options(), kopi_resolve::ResolveOptions::default());
    assert_eq!(config.eval_options(), kopi_eval::EvalOptions::default());
}

#[test]
fn sections_map_onto_option_structs() {
    let config = KopiConfig::load_from_str(
        r#"
[resolution]
bootstrap_jdk = false
report_unreachable_catch = false

[eval]
max_call_depth = 8
"#,
    )
    .unwrap();

    let options = config.resolve_options();
    assert!(!options.graph.bootstrap_jdk);
    assert!(!options.flow.report_unreachable_catch);
    assert_eq!(options.graph.unchecked_roots, config.resolution.unchecked_roots);
    assert_eq!(config.eval_options().max_call_depth, 8);
}

#[test]
fn configured_unchecked_roots_change_checked_exception_diagnostics() {
    let undeclared = |config: &KopiConfig| {
        let program = resolve_program(
            vec![exception_test(), undeclared_checked_exception()],
            &config.resolve_options(),
        );
        program
            .diagnostics()
            .iter()
            .filter(|d| d.kind == DiagnosticKind::UndeclaredCheckedException)
            .count()
    };

    assert_eq!(undeclared(&KopiConfig::default()), 2);

    let config = KopiConfig::load_from_str(
        r#"
[resolution]
unchecked_roots = ["java.lang.RuntimeException", "java.lang.Error", "MyException", "MyOtherException"]
"#,
    )
    .unwrap();
    assert_eq!(undeclared(&config), 0);
}
