//! Modelos de datos compartidos por los steps durante una ejecución.

pub mod context;

pub use context::ExecutionContext;
