//! Initializer scheduling.
//!
//! - [`static_init_plan`] / [`instance_init_plan`]: the field initializers of one class, in
//!   declaration order.
//! - [`instantiation_plan`]: the full sequence `new C(..)` runs through, with constructor chaining
//!   flattened.
//! - [`static_init_order`]: which classes get initialized, and in what order, starting from an
//!   entry class; reports circular triggering.
//! - [`InitTracker`]: the idempotent per-class state machine shared by the simulation and by
//!   runtime backends.

mod order;
mod plan;
mod state;

pub use order::{static_init_order, StaticInitOrder, StaticTriggers, Trigger};
pub use plan::{
    instance_init_plan, instantiation_plan, static_init_plan, Chained, ConstructorLinks, InitStep,
    InstantiationStep,
};
pub use state::{InitState, InitTracker};
