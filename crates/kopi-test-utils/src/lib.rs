//! Utilities shared by Kopi tests.
//!
//! The fixture corpus (`DispatchTest`, `ExceptionTest`, `FieldTest`, `StaticTest`, `Value`,
//! `ValueSubclass`) is expressed directly as [`kopi_hir::CompilationUnit`] values so that tests
//! don't depend on a Java front-end. Each fixture lives in its own file id; see [`files`].

mod fixtures;
mod json;

pub use fixtures::*;
pub use json::{load_units, units_from_json, units_to_json};

use std::sync::Once;

/// Every ordering of `items`, starting with the identity ordering.
///
/// Intended for ingestion-order tests over a handful of compilation units.
#[must_use]
pub fn permutations<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
    if items.len() <= 1 {
        return vec![items.to_vec()];
    }

    let mut out = Vec::new();
    for (idx, head) in items.iter().enumerate() {
        let mut rest = items.to_vec();
        rest.remove(idx);
        for mut tail in permutations(&rest) {
            tail.insert(0, head.clone());
            out.push(tail);
        }
    }
    out
}

/// Install a test-friendly `tracing` subscriber once per process (honours `RUST_LOG`).
pub fn init_test_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
