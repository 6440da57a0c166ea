//! Core FlowEngine implementation

use log::{debug, error, info, warn};
use uuid::Uuid;

use crate::engine::{FlowCtx, FlowState};
use crate::errors::CoreEngineError;
use crate::event::{EventStore, FlowEvent, FlowEventKind, InMemoryEventStore, NoopEventStore};
use crate::model::ExecutionContext;
use crate::step::StepHandle;
use crate::transition::{Target, TransitionTable};

/// Qué hacer cuando un step devuelve un outcome sin cableado.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingTransitionPolicy {
    /// Igual que un cableado terminal explícito: el flujo termina en
    /// silencio y con éxito.
    #[default]
    Terminate,
    /// El flujo falla con `CoreEngineError::MissingTransition`.
    Error,
}

/// Motor de ejecución de workflows por pasos.
///
/// Toma prestada la `TransitionTable` (no la posee): una misma tabla puede
/// compartirse entre varios engines y reutilizarse entre ejecuciones, y el
/// borrow impide mutarla mientras un engine la referencia. Cada ejecución
/// registra su traza en el `EventStore` bajo un `flow_id` nuevo.
#[derive(Debug)]
pub struct FlowEngine<'t, E = InMemoryEventStore>
    where E: EventStore
{
    table: &'t TransitionTable,
    start_step: Option<StepHandle>,
    policy: MissingTransitionPolicy,
    event_store: E,
    last_flow_id: Option<Uuid>,
}

impl<'t> FlowEngine<'t, InMemoryEventStore> {
    /// Crea un engine con store de eventos en memoria.
    pub fn new(table: &'t TransitionTable) -> Self {
        Self::with_event_store(table, InMemoryEventStore::default())
    }
}

impl<'t> FlowEngine<'t, NoopEventStore> {
    /// Engine que no registra eventos: `trace` y `events_for` quedan vacíos.
    pub fn without_trace(table: &'t TransitionTable) -> Self {
        Self::with_event_store(table, NoopEventStore::default())
    }
}

impl<'t, E> FlowEngine<'t, E> where E: EventStore
{
    pub fn with_event_store(table: &'t TransitionTable, event_store: E) -> Self {
        Self { table,
               start_step: None,
               policy: MissingTransitionPolicy::default(),
               event_store,
               last_flow_id: None }
    }

    /// Fija el step inicial.
    pub fn set_start(&mut self, step: StepHandle) {
        self.start_step = Some(step);
    }

    pub fn with_start(mut self, step: StepHandle) -> Self {
        self.set_start(step);
        self
    }

    pub fn start_step(&self) -> Option<StepHandle> {
        self.start_step
    }

    pub fn set_missing_transition_policy(&mut self, policy: MissingTransitionPolicy) {
        self.policy = policy;
    }

    pub fn with_missing_transition_policy(mut self, policy: MissingTransitionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn missing_transition_policy(&self) -> MissingTransitionPolicy {
        self.policy
    }

    pub fn table(&self) -> &'t TransitionTable {
        self.table
    }

    pub fn event_store(&self) -> &E {
        &self.event_store
    }

    /// `flow_id` de la última ejecución iniciada (también si falló).
    pub fn last_flow_id(&self) -> Option<Uuid> {
        self.last_flow_id
    }

    /// Ejecuta el flujo completo y retorna el ID de la ejecución.
    ///
    /// Corre hasta que un lookup devuelve `Terminal`. Para grafos cíclicos sin
    /// salida no retorna nunca; acotar la ejecución es responsabilidad del
    /// llamador (ver `start` y `FlowCtx::run_n`).
    pub fn run(&mut self, ctx: &mut ExecutionContext) -> Result<Uuid, CoreEngineError> {
        let mut flow = self.start(ctx)?;
        flow.run_to_completion()?;
        Ok(flow.flow_id())
    }

    /// Inicia una ejecución sin correr ningún step todavía.
    ///
    /// Falla rápido si no hay step inicial o si su handle no está registrado
    /// en la tabla.
    pub fn start<'e, 'c>(&'e mut self,
                         ctx: &'c mut ExecutionContext)
                         -> Result<FlowCtx<'e, 't, 'c, E>, CoreEngineError> {
        let start = self.start_step.ok_or(CoreEngineError::MissingStartStep)?;
        if !self.table.contains_step(start) {
            return Err(CoreEngineError::UnknownStep(start));
        }

        let flow_id = Uuid::new_v4();
        self.last_flow_id = Some(flow_id);
        self.event_store
            .append_kind(flow_id,
                         FlowEventKind::FlowInitialized { definition_hash: self.table.definition_hash(),
                                                          start_step: start });
        debug!("flow {flow_id} initialized at step {start}");

        Ok(FlowCtx::new(self, ctx, flow_id, start))
    }

    /// Ejecuta un único tick: corre `current` y resuelve el siguiente estado.
    pub(crate) fn tick(&mut self,
                       flow_id: Uuid,
                       tick: u64,
                       current: StepHandle,
                       ctx: &mut ExecutionContext)
                       -> Result<FlowState, CoreEngineError> {
        let table = self.table;
        let step = table.step(current).ok_or(CoreEngineError::UnknownStep(current))?;
        let step_name = step.name().to_string();

        self.event_store.append_kind(flow_id,
                                     FlowEventKind::StepStarted { tick,
                                                                  step: current,
                                                                  step_name: step_name.clone() });

        let outcome = match step.execute(ctx) {
            Ok(outcome) => outcome,
            Err(err) => {
                error!("flow {flow_id}: step '{step_name}' ({current}) failed: {err}");
                self.event_store.append_kind(flow_id,
                                             FlowEventKind::StepFailed { tick,
                                                                         step: current,
                                                                         step_name,
                                                                         error: err.to_string() });
                return Err(CoreEngineError::Execution(err));
            }
        };

        let next = match (table.get(current, outcome.as_str()), self.policy) {
            (Some(target), _) => target,
            (None, MissingTransitionPolicy::Terminate) => Target::Terminal,
            (None, MissingTransitionPolicy::Error) => {
                warn!("flow {flow_id}: no transition from '{step_name}' for outcome '{outcome}'");
                self.event_store.append_kind(flow_id,
                                             FlowEventKind::TransitionMissing { tick,
                                                                                step: current,
                                                                                step_name: step_name.clone(),
                                                                                outcome: outcome.clone() });
                return Err(CoreEngineError::MissingTransition { step: step_name, outcome });
            }
        };

        debug!("flow {flow_id}: '{step_name}' -> '{outcome}' -> {next:?}");
        self.event_store.append_kind(flow_id,
                                     FlowEventKind::StepFinished { tick,
                                                                   step: current,
                                                                   step_name,
                                                                   outcome,
                                                                   next });
        Ok(FlowState::from(next))
    }

    pub(crate) fn complete(&mut self, flow_id: Uuid, steps_executed: u64) {
        info!("flow {flow_id} completed after {steps_executed} step(s)");
        self.event_store
            .append_kind(flow_id, FlowEventKind::FlowCompleted { steps_executed });
    }

    /// Lista eventos de una ejecución.
    pub fn events_for(&self, flow_id: Uuid) -> Vec<FlowEvent> {
        self.event_store.list(flow_id)
    }

    /// Extrae los eventos de una ejecución y los borra del store.
    pub fn take_events(&mut self, flow_id: Uuid) -> Vec<FlowEvent> {
        self.event_store.take(flow_id)
    }

    /// Descarta la historia de una ejecución terminada.
    pub fn clear_events(&mut self, flow_id: Uuid) {
        self.event_store.clear(flow_id);
    }

    /// Secuencia ordenada de steps que realmente comenzaron a ejecutarse
    /// (incluye un step que haya fallado).
    pub fn trace(&self, flow_id: Uuid) -> Vec<StepHandle> {
        self.events_for(flow_id)
            .into_iter()
            .filter_map(|e| match e.kind {
                FlowEventKind::StepStarted { step, .. } => Some(step),
                _ => None,
            })
            .collect()
    }

    /// Igual que `trace`, con los nombres de los steps.
    pub fn trace_names(&self, flow_id: Uuid) -> Vec<String> {
        self.events_for(flow_id)
            .into_iter()
            .filter_map(|e| match e.kind {
                FlowEventKind::StepStarted { step_name, .. } => Some(step_name),
                _ => None,
            })
            .collect()
    }

    /// Variante compacta de eventos de una ejecución.
    pub fn event_variants(&self, flow_id: Uuid) -> Vec<&'static str> {
        self.events_for(flow_id).iter().map(|e| e.kind.code()).collect()
    }
}
