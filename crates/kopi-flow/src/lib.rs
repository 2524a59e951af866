//! Exception flow through `try`/`catch`/`finally`.
//!
//! Two halves share one matching rule:
//!
//! - [`analyze_method`] walks a method body and builds its [`ExceptionTable`]: for every try
//!   region, which catch clause handles each statically possible throwable, plus a
//!   [`Propagation`] record per throw/call site. Checked exceptions that escape the method without
//!   being declared are reported as `UndeclaredCheckedException`. [`analyze_initializers`] applies
//!   the same check to field initializers, which have no `throws` clause of their own.
//! - [`TryRegion::select`] applies the same first-match rule to a runtime exception class, and
//!   [`Completion::then_finally`] folds a `finally` outcome over the pending one.
//!
//! Catch matching is strictly first-match in declaration order, never most-specific.

mod completion;
mod initializer;
mod table;

pub use completion::Completion;
pub use initializer::analyze_initializers;
pub use table::{
    analyze_method, select_catch, CatchHandler, Disposition, ExceptionTable, FlowOptions,
    MethodFlow, Propagation, ThrowSite, ThrowSiteTyping, TryRegion,
};
