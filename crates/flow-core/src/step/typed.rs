use super::{OutcomeKey, Step};
use crate::errors::StepError;
use crate::model::ExecutionContext;

/// Interfaz de alto nivel para steps cuyo espacio de outcomes se conoce de
/// antemano.
///
/// Implementadores devuelven un enum propio (normalmente declarado con
/// `outcome_enum!`), lo que da chequeo exhaustivo en el `match` del step; un
/// adaptador (abajo) lo convierte a la interfaz neutra `Step`.
pub trait TypedStep {
    /// Outcome cerrado del step.
    type Outcome: Into<OutcomeKey>;

    /// Identificador estable del step.
    fn id(&self) -> &'static str;

    /// Ejecución tipada.
    fn run_typed(&self, ctx: &mut ExecutionContext) -> Result<Self::Outcome, StepError>;
}

// -------------------------------------------------------------
// Adaptador: cualquier `TypedStep` implementa `Step` neutro.
// -------------------------------------------------------------
impl<T> Step for T where T: TypedStep
{
    fn name(&self) -> &str {
        <Self as TypedStep>::id(self)
    }

    fn execute(&self, ctx: &mut ExecutionContext) -> Result<OutcomeKey, StepError> {
        <Self as TypedStep>::run_typed(self, ctx).map(Into::into)
    }
}
