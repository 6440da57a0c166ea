//! Flow context implementation

use uuid::Uuid;

use crate::engine::{FlowEngine, FlowState};
use crate::errors::CoreEngineError;
use crate::event::EventStore;
use crate::model::ExecutionContext;

/// Contexto de ejecución para un flujo específico
///
/// Proporciona una API para avanzar un flujo paso a paso dentro de un
/// `FlowEngine`. Es la forma de acotar externamente una ejecución: el motor
/// nunca impone un límite de pasos por sí mismo.
pub struct FlowCtx<'e, 't, 'c, E: EventStore> {
    engine: &'e mut FlowEngine<'t, E>,
    context: &'c mut ExecutionContext,
    flow_id: Uuid,
    state: FlowState,
    ticks: u64,
    failed: bool,
}

impl<'e, 't, 'c, E: EventStore> FlowCtx<'e, 't, 'c, E> {
    pub(crate) fn new(engine: &'e mut FlowEngine<'t, E>,
                      context: &'c mut ExecutionContext,
                      flow_id: Uuid,
                      start: crate::step::StepHandle)
                      -> Self {
        Self { engine,
               context,
               flow_id,
               state: FlowState::Running(start),
               ticks: 0,
               failed: false }
    }

    pub fn flow_id(&self) -> Uuid {
        self.flow_id
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    /// Cantidad de steps que comenzaron a ejecutarse en este flujo.
    pub fn steps_executed(&self) -> u64 {
        self.ticks
    }

    /// Acceso de lectura al contexto a mitad de ejecución.
    pub fn context(&self) -> &ExecutionContext {
        &*self.context
    }

    /// Ejecuta el step actual y avanza al siguiente estado.
    ///
    /// Tras un error el flujo queda detenido: llamadas posteriores devuelven
    /// `FlowHasFailed`. Sobre un flujo terminado devuelve `FlowCompleted`.
    pub fn step(&mut self) -> Result<FlowState, CoreEngineError> {
        if self.failed {
            return Err(CoreEngineError::FlowHasFailed);
        }
        let current = match self.state {
            FlowState::Running(current) => current,
            FlowState::Terminated => return Err(CoreEngineError::FlowCompleted),
        };

        let tick = self.ticks;
        self.ticks += 1;
        match self.engine.tick(self.flow_id, tick, current, &mut *self.context) {
            Ok(next) => {
                self.state = next;
                if next.is_terminated() {
                    self.engine.complete(self.flow_id, self.ticks);
                }
                Ok(next)
            }
            Err(e) => {
                self.failed = true;
                Err(e)
            }
        }
    }

    /// Ejecuta hasta `n` pasos o hasta que el flujo termine.
    pub fn run_n(&mut self, n: u64) -> Result<FlowState, CoreEngineError> {
        for _ in 0..n {
            if self.state.is_terminated() {
                break;
            }
            self.step()?;
        }
        Ok(self.state)
    }

    /// Ejecuta pasos hasta que el flujo termine o ocurra un error.
    pub fn run_to_completion(&mut self) -> Result<(), CoreEngineError> {
        while !self.state.is_terminated() {
            self.step()?;
        }
        Ok(())
    }
}
