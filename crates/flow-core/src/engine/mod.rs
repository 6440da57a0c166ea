//! Engine module for FlowEngine implementation
//!
//! Provides the run loop, the caller-driven flow context and the run state.

pub mod core;
pub mod flow_ctx;
pub mod state;

pub use self::core::{FlowEngine, MissingTransitionPolicy};
pub use flow_ctx::FlowCtx;
pub use state::FlowState;
