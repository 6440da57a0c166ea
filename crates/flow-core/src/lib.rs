//! flow-core: motor de workflows por pasos con transiciones dinámicas.
//!
//! Un proceso se modela como un grafo dirigido de steps. Cada step devuelve
//! un `OutcomeKey` y la `TransitionTable` decide qué step corre después (o si
//! el flujo termina). El `FlowEngine` ejecuta ese ciclo de forma síncrona.
pub mod constants;
pub mod engine;
pub mod errors;
pub mod event;
pub mod model;
pub mod registry;
pub mod step;
pub mod transition;

pub use engine::{FlowCtx, FlowEngine, FlowState, MissingTransitionPolicy};
pub use errors::{CoreEngineError, StepError};
pub use event::{EventStore, FlowEvent, FlowEventKind, InMemoryEventStore, NoopEventStore};
pub use model::ExecutionContext;
pub use registry::StepRegistry;
pub use step::{OutcomeKey, Step, StepHandle, TypedStep, UnknownOutcome};
pub use transition::{Target, TransitionTable};
