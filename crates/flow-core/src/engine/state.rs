use crate::step::StepHandle;
use crate::transition::Target;

/// Estado de una ejecución.
///
/// Las transiciones válidas son:
/// - `Running(a)` -> `Running(b)` (el lookup devolvió un step)
/// - `Running(a)` -> `Terminated` (el lookup devolvió `Terminal`)
///
/// `Terminated` es absorbente.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    /// El step indicado es el próximo a ejecutar.
    Running(StepHandle),
    /// El flujo terminó normalmente.
    Terminated,
}

impl FlowState {
    pub fn is_terminated(&self) -> bool {
        matches!(self, FlowState::Terminated)
    }

    pub fn current(&self) -> Option<StepHandle> {
        match self {
            FlowState::Running(h) => Some(*h),
            FlowState::Terminated => None,
        }
    }
}

impl From<Target> for FlowState {
    fn from(target: Target) -> Self {
        match target {
            Target::Step(h) => FlowState::Running(h),
            Target::Terminal => FlowState::Terminated,
        }
    }
}
