//! Configuration for the kopi pipeline (`kopi.toml`).
//!
//! The core crates take plain option structs; this crate owns the TOML surface and converts it into
//! [`GraphOptions`], [`FlowOptions`], [`ResolveOptions`] and [`EvalOptions`]. It also installs the
//! global `tracing` subscriber for binaries and tools built on the pipeline.

mod logging;
mod schema;

use std::path::{Path, PathBuf};

use kopi_eval::EvalOptions;
use kopi_flow::FlowOptions;
use kopi_resolve::ResolveOptions;
use kopi_types::GraphOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use logging::init_tracing;
pub use schema::json_schema;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct KopiConfig {
    pub resolution: ResolutionConfig,
    pub eval: EvalConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ResolutionConfig {
    /// Inject the minimal `java.lang` classes that the input does not declare itself.
    #[serde(default = "ResolutionConfig::default_bootstrap_jdk")]
    pub bootstrap_jdk: bool,

    /// Qualified names of the throwable classes whose subtypes are unchecked.
    #[serde(default = "ResolutionConfig::default_unchecked_roots")]
    pub unchecked_roots: Vec<String>,

    /// Report catch clauses shadowed by an earlier clause of the same `try`.
    #[serde(default = "ResolutionConfig::default_report_unreachable_catch")]
    pub report_unreachable_catch: bool,
}

impl ResolutionConfig {
    fn default_bootstrap_jdk() -> bool {
        GraphOptions::default().bootstrap_jdk
    }

    fn default_unchecked_roots() -> Vec<String> {
        GraphOptions::default().unchecked_roots
    }

    fn default_report_unreachable_catch() -> bool {
        FlowOptions::default().report_unreachable_catch
    }
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            bootstrap_jdk: Self::default_bootstrap_jdk(),
            unchecked_roots: Self::default_unchecked_roots(),
            report_unreachable_catch: Self::default_report_unreachable_catch(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct EvalConfig {
    /// Nested invocations allowed before the evaluator reports a stack overflow.
    #[serde(default = "EvalConfig::default_max_call_depth")]
    #[schemars(range(min = 1))]
    pub max_call_depth: usize,
}

impl EvalConfig {
    fn default_max_call_depth() -> usize {
        EvalOptions::default().max_call_depth
    }
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            max_call_depth: Self::default_max_call_depth(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// A simple level (`info`, `debug`, ...) or a full `EnvFilter` directive string.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// Emit logs in JSON format.
    #[serde(default)]
    pub json: bool,

    #[serde(default = "LoggingConfig::default_stderr")]
    pub stderr: bool,

    /// Append logs to the given file. Logging to the other sinks continues if it cannot be opened.
    #[serde(default)]
    #[schemars(with = "Option<String>")]
    pub file: Option<PathBuf>,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_owned()
    }

    fn default_stderr() -> bool {
        true
    }

    pub(crate) fn normalize_level_directives(input: &str) -> String {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Self::default_level();
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "trace" => "trace".to_owned(),
            "debug" => "debug".to_owned(),
            "info" => "info".to_owned(),
            "warn" | "warning" => "warn".to_owned(),
            "error" => "error".to_owned(),
            // Anything else is an `EnvFilter` directive string.
            _ => trimmed.to_owned(),
        }
    }

    fn config_env_filter(&self) -> tracing_subscriber::EnvFilter {
        let directives = Self::normalize_level_directives(&self.level);
        tracing_subscriber::EnvFilter::try_new(directives).unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::default()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
        })
    }

    /// The effective filter: the configured level, refined by `RUST_LOG` when it is set.
    ///
    /// Directives that fail to parse fall back to the next source instead of disabling logging.
    pub fn env_filter(&self) -> tracing_subscriber::EnvFilter {
        let env_directives = std::env::var("RUST_LOG")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        let config_directives = Self::normalize_level_directives(&self.level);

        match env_directives {
            Some(env_directives) => {
                let combined = format!("{config_directives},{env_directives}");
                tracing_subscriber::EnvFilter::try_new(combined)
                    .or_else(|_| tracing_subscriber::EnvFilter::try_new(env_directives))
                    .unwrap_or_else(|_| self.config_env_filter())
            }
            None => self.config_env_filter(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
            stderr: Self::default_stderr(),
            file: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
    #[error("invalid value for `{key}`: {message}")]
    Invalid { key: &'static str, message: String },
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        // The `Display` form embeds a snippet of the input; the message alone is enough.
        ConfigError::Toml(err.message().to_owned())
    }
}

impl KopiConfig {
    /// Load a config file from TOML.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::load_from_str(&text)?;
        tracing::debug!(target: "kopi.config", path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Load a config from a TOML string. Missing tables and keys take their defaults.
    pub fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        let config: KopiConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Semantic checks that the TOML types alone cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.eval.max_call_depth == 0 {
            return Err(ConfigError::Invalid {
                key: "eval.max_call_depth",
                message: "must be at least 1".to_owned(),
            });
        }
        if let Some(root) = self
            .resolution
            .unchecked_roots
            .iter()
            .find(|root| root.trim().is_empty())
        {
            return Err(ConfigError::Invalid {
                key: "resolution.unchecked_roots",
                message: format!("expected a qualified class name, found {root:?}"),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn graph_options(&self) -> GraphOptions {
        GraphOptions {
            bootstrap_jdk: self.resolution.bootstrap_jdk,
            unchecked_roots: self.resolution.unchecked_roots.clone(),
        }
    }

    #[must_use]
    pub fn flow_options(&self) -> FlowOptions {
        FlowOptions {
            report_unreachable_catch: self.resolution.report_unreachable_catch,
        }
    }

    #[must_use]
    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            graph: self.graph_options(),
            flow: self.flow_options(),
        }
    }

    #[must_use]
    pub fn eval_options(&self) -> EvalOptions {
        EvalOptions {
            max_call_depth: self.eval.max_call_depth,
        }
    }
}
