//! stepflow: aplicación sobre el motor `flow-core`.
//!
//! - `config`: configuración desde entorno (`.env` incluido).
//! - `errors`: error de aplicación que agrega los de cada crate.
//! - `logging`: subscriber de logging para el binario.
//! - `runner`: ejecución de los flujos prearmados y de documentos JSON.

pub mod config;
pub mod errors;
pub mod logging;
pub mod runner;

pub use config::AppConfig;
pub use errors::AppError;
pub use runner::{RunOptions, RunReport};
