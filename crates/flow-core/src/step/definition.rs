use std::fmt;

use serde::{Deserialize, Serialize};

use super::OutcomeKey;
use crate::errors::StepError;
use crate::model::ExecutionContext;

/// Identidad opaca de un step dentro de una `TransitionTable`.
///
/// La asigna `TransitionTable::register_step`; la tabla indexa transiciones
/// por handle, nunca por el valor del step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepHandle(usize);

impl StepHandle {
    /// Construye un handle a partir de su índice crudo. Útil para tests y
    /// para referencias colgantes deliberadas.
    pub const fn from_index(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for StepHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Trait que define un Step.
///
/// `execute` puede leer y mutar el contexto libremente; las mutaciones son
/// visibles para el llamador aunque el flujo aborte después. Las condiciones
/// de negocio (incluidos los fallos esperados) se expresan como un outcome;
/// `Err` queda reservado para condiciones excepcionales.
pub trait Step {
    /// Nombre legible (logs, trazas y `definition_hash`).
    fn name(&self) -> &str;

    /// Ejecuta el step y devuelve la clave que selecciona la transición.
    fn execute(&self, ctx: &mut ExecutionContext) -> Result<OutcomeKey, StepError>;
}
