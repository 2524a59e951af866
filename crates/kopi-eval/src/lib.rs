//! Reference evaluator for resolved programs.
//!
//! The evaluator executes the decisions made by `kopi-resolve` instead of re-deriving them: each
//! call runs the target selected at its call site (dispatched on the receiver's runtime class for
//! virtual calls), objects are built by walking the instantiation plan from `kopi-init`, and
//! `try`/`catch` uses the exception tables from `kopi-flow`. It exists so that the semantic
//! decisions of the pipeline can be checked by running the fixture programs.

mod error;
mod heap;
mod interpreter;
mod value;

pub use error::EvalError;
pub use heap::{Heap, ObjectId, ObjectRef};
pub use interpreter::{EvalOptions, Interpreter};
pub use value::Value;
