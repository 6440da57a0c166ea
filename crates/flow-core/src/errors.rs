//! Errores del core.
//!
//! Los errores de configuración se detectan antes (o en el momento) de
//! ejecutar un step; `Execution` transporta sin modificar el error que
//! devolvió un step.

use thiserror::Error;

use crate::step::{OutcomeKey, StepHandle};

/// Error excepcional devuelto por `Step::execute`. El motor no lo envuelve
/// ni lo reinterpreta.
pub type StepError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum CoreEngineError {
    #[error("no start step configured")]
    MissingStartStep,
    #[error("unknown step handle {0}")]
    UnknownStep(StepHandle),
    #[error("no transition from step '{step}' for outcome '{outcome}'")]
    MissingTransition { step: String, outcome: OutcomeKey },
    #[error("unknown step kind '{0}'")]
    UnknownStepKind(String),
    #[error("step kind '{0}' already registered")]
    DuplicateStepKind(String),
    #[error("invalid params for step kind '{kind}': {source}")]
    InvalidParams {
        kind: String,
        #[source]
        source: StepError,
    },
    #[error("flow already completed")]
    FlowCompleted,
    #[error("flow has failed previously, no further steps are run")]
    FlowHasFailed,
    #[error(transparent)]
    Execution(StepError),
}

impl CoreEngineError {
    /// `true` para errores de cableado o registro (no producidos por un step).
    pub fn is_configuration(&self) -> bool {
        matches!(self,
                 Self::MissingStartStep
                 | Self::UnknownStep(_)
                 | Self::MissingTransition { .. }
                 | Self::UnknownStepKind(_)
                 | Self::DuplicateStepKind(_)
                 | Self::InvalidParams { .. })
    }

    /// Recupera el error original de un step, si es el caso.
    pub fn into_step_error(self) -> Option<StepError> {
        match self {
            Self::Execution(err) => Some(err),
            _ => None,
        }
    }

    /// Acceso tipado al error original de un step.
    pub fn step_error<T: std::error::Error + 'static>(&self) -> Option<&T> {
        match self {
            Self::Execution(err) => err.downcast_ref::<T>(),
            _ => None,
        }
    }
}
