//! Body resolution and the whole-program pipeline.
//!
//! [`resolve_program`] runs every stage over an input set:
//!
//! 1. build the class graph and signature catalogs (`kopi-types`),
//! 2. type every method body and field initializer, selecting one target per call site,
//! 3. link constructors to the constructor they chain to (explicit or implicit `super()`),
//! 4. build per-method exception tables and validate checked exceptions (`kopi-flow`),
//! 5. simulate static initialization from every class to detect circular triggering
//!    (`kopi-init`).
//!
//! Diagnostics from every stage are returned together, sorted.

mod body;
mod program;

pub use body::{BodyOwner, BodyTypes, CallTarget, DispatchKind};
pub use program::{resolve_program, ResolveOptions, ResolvedProgram};
