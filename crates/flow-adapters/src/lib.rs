//! flow-adapters: steps concretos y flujos listos para el `FlowEngine`.
//!
//! El motor (`flow-core`) no conoce nada de estos tipos; sólo ve la
//! interfaz `Step`. Aquí viven:
//! - `steps`: validación/procesamiento de datos, reglas de préstamo y un
//!   contador para ciclos acotados por el propio contexto.
//! - `flows`: cableados prearmados (`data_pipeline`, `loan_approval`).
//! - `registry`: registro por defecto `kind -> factory` de esos steps.
//! - `document`: descripción JSON de un flujo compilable a `TransitionTable`.
pub mod document;
pub mod error;
pub mod flows;
pub mod registry;
pub mod steps;

pub use document::{CompiledFlow, FlowDocument, StepDecl, TransitionDecl};
pub use error::{DocumentError, DomainError};
pub use registry::builtin_registry;
