use thiserror::Error;

use crate::heap::ObjectRef;

/// Why an evaluation stopped without producing a value.
#[derive(Debug, Error)]
pub enum EvalError {
    /// A Java exception propagated out of the invoked method.
    #[error("uncaught exception `{class}`{}", detail(.message))]
    Uncaught {
        class: String,
        message: Option<String>,
        exception: ObjectRef,
    },

    #[error("`{owner}` references a call or field that did not resolve")]
    Unresolved { owner: String },

    #[error("`{method}` has no body")]
    MissingBody { method: String },

    #[error("`{method}` needs a receiver object")]
    MissingReceiver { method: String },

    #[error("call depth exceeded the limit of {limit}")]
    StackOverflow { limit: usize },

    #[error("expected {expected}, found {found}")]
    TypeMismatch { expected: &'static str, found: String },

    #[error("class `{class}` has no field `{name}`")]
    UnknownField { class: String, name: String },

    #[error("`{owner}` assigns to something that is not a variable")]
    InvalidAssignment { owner: String },

    /// The runtime needs a JDK class that is not part of the class graph.
    #[error("runtime class `{0}` is not loaded")]
    MissingRuntimeClass(&'static str),
}

fn detail(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|message| format!(": {message}"))
        .unwrap_or_default()
}
