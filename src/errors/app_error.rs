use flow_adapters::{DocumentError, DomainError};
use flow_core::CoreEngineError;
use thiserror::Error;

/// Errores de la aplicación (binario y `runner`).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Error del motor: {0}")]
    Core(#[from] CoreEngineError),
    #[error("Error en documento de flujo: {0}")]
    Document(#[from] DocumentError),
    #[error("Error de dominio: {0}")]
    Domain(#[from] DomainError),
    #[error("Error en IO: {0}")]
    Io(#[from] std::io::Error),
    #[error("Error de JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Error de configuración: {0}")]
    Config(String),
}

impl AppError {
    /// `true` si el fallo vino de un step y no del cableado o la entrada.
    pub fn is_step_failure(&self) -> bool {
        matches!(self, Self::Core(CoreEngineError::Execution(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_variant_format() {
        let err = AppError::Config("STEPFLOW_MAX_STEPS inválido".into());
        assert_eq!(err.to_string(), "Error de configuración: STEPFLOW_MAX_STEPS inválido");
    }

    #[test]
    fn test_core_variant_from() {
        let err: AppError = CoreEngineError::MissingStartStep.into();
        assert_eq!(err.to_string(), "Error del motor: no start step configured");
        assert!(!err.is_step_failure());

        let err: AppError = CoreEngineError::Execution("boom".into()).into();
        assert!(err.is_step_failure());
    }

    #[test]
    fn test_domain_variant_from() {
        let err: AppError = DomainError::NonPositiveAmount(0.0).into();
        assert_eq!(err.to_string(), "Error de dominio: loan amount must be positive, got 0");
    }
}
