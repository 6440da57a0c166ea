//! Tipos de evento del flujo y estructura `FlowEvent`.
//!
//! Cada `run()` del `FlowEngine` emite eventos a un `EventStore`
//! append-only. Son la traza observable de la ejecución: qué steps corrieron,
//! con qué outcome y hacia dónde transicionó el flujo.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::step::{OutcomeKey, StepHandle};
use crate::transition::Target;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FlowEventKind {
    /// Primer evento de un `flow_id`: fija el hash del cableado y el step
    /// inicial.
    FlowInitialized { definition_hash: String, start_step: StepHandle },
    /// Un step comenzó su ejecución. No implica éxito.
    StepStarted { tick: u64, step: StepHandle, step_name: String },
    /// Un step devolvió un outcome y el motor resolvió el siguiente destino.
    StepFinished {
        tick: u64,
        step: StepHandle,
        step_name: String,
        outcome: OutcomeKey,
        next: Target,
    },
    /// El step devolvió un error excepcional. El flujo no continúa.
    StepFailed {
        tick: u64,
        step: StepHandle,
        step_name: String,
        error: String,
    },
    /// Outcome sin cableado bajo `MissingTransitionPolicy::Error`.
    TransitionMissing {
        tick: u64,
        step: StepHandle,
        step_name: String,
        outcome: OutcomeKey,
    },
    /// Evento de cierre: el lookup llegó a `Terminal`.
    FlowCompleted { steps_executed: u64 },
}

impl FlowEventKind {
    /// Código compacto de una letra, útil para comparar secuencias.
    pub fn code(&self) -> &'static str {
        match self {
            FlowEventKind::FlowInitialized { .. } => "I",
            FlowEventKind::StepStarted { .. } => "S",
            FlowEventKind::StepFinished { .. } => "F",
            FlowEventKind::StepFailed { .. } => "X",
            FlowEventKind::TransitionMissing { .. } => "M",
            FlowEventKind::FlowCompleted { .. } => "C",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowEvent {
    pub seq: u64, // asignado por el EventStore (orden append)
    pub flow_id: Uuid,
    pub kind: FlowEventKind,
    pub ts: DateTime<Utc>,
}
