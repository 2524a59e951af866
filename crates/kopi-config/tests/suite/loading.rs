use std::io::Write;

use kopi_config::{ConfigError, KopiConfig};
use pretty_assertions::assert_eq;
use tempfile::{tempdir, NamedTempFile};

#[test]
fn empty_input_yields_defaults() {
    let config = KopiConfig::load_from_str("").unwrap();
    assert_eq!(config, KopiConfig::default());
    assert!(config.resolution.bootstrap_jdk);
    assert!(config.resolution.report_unreachable_catch);
    assert_eq!(
        config.resolution.unchecked_roots,
        vec!["java.lang.RuntimeException", "java.lang.Error"]
    );
    assert_eq!(config.eval.max_call_depth, 512);
    assert_eq!(config.logging.level, "info");
    assert!(!config.logging.json);
    assert!(config.logging.stderr);
}

#[test]
fn partial_tables_keep_remaining_defaults() {
    let config = KopiConfig::load_from_str(
        r#"
[resolution]
unchecked_roots = ["app.AppError"]

[eval]
max_call_depth = 64

[logging]
level = "kopi.types=trace"
json = true
"#,
    )
    .unwrap();

    assert_eq!(config.resolution.unchecked_roots, vec!["app.AppError"]);
    assert!(config.resolution.bootstrap_jdk);
    assert_eq!(config.eval.max_call_depth, 64);
    assert_eq!(config.logging.level, "kopi.types=trace");
    assert!(config.logging.json);
    assert!(config.logging.stderr);
}

#[test]
fn unknown_keys_are_rejected() {
    let err = KopiConfig::load_from_str("[resolution]\nbootstrap = false\n").unwrap_err();
    let ConfigError::Toml(message) = err else {
        panic!("expected a parse error, got {err:?}");
    };
    assert!(message.contains("unknown field"), "{message}");

    let err = KopiConfig::load_from_str("[codegen]\nenabled = true\n").unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)), "{err:?}");
}

#[test]
fn mistyped_values_are_rejected() {
    let err = KopiConfig::load_from_str("[eval]\nmax_call_depth = \"deep\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)), "{err:?}");
}

#[test]
fn semantic_validation_runs_after_parsing() {
    let err = KopiConfig::load_from_str("[eval]\nmax_call_depth = 0\n").unwrap_err();
    assert!(
        matches!(err, ConfigError::Invalid { key: "eval.max_call_depth", .. }),
        "{err:?}"
    );

    let err =
        KopiConfig::load_from_str("[resolution]\nunchecked_roots = [\" \"]\n").unwrap_err();
    assert!(
        matches!(err, ConfigError::Invalid { key: "resolution.unchecked_roots", .. }),
        "{err:?}"
    );
    assert_eq!(
        err.to_string(),
        "invalid value for `resolution.unchecked_roots`: expected a qualified class name, found \" \""
    );
}

#[test]
fn loads_from_a_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[logging]\nlevel = \"debug\"\nstderr = false").unwrap();

    let config = KopiConfig::load_from_path(file.path()).unwrap();
    assert_eq!(config.logging.level, "debug");
    assert!(!config.logging.stderr);
    assert_eq!(config.resolution, KopiConfig::default().resolution);
}

#[test]
fn missing_file_reports_its_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("kopi.toml");

    let err = KopiConfig::load_from_path(&path).unwrap_err();
    let ConfigError::Io { path: reported, .. } = &err else {
        panic!("expected an io error, got {err:?}");
    };
    assert_eq!(reported, &path.display().to_string());
    assert!(err.to_string().starts_with("failed to read config file"));
}
