//! `TransitionTable`: registro de steps y su cableado.
//!
//! Rol en el flujo:
//! - `register_step` guarda el step y emite su `StepHandle`.
//! - `add_transition` registra (o sobrescribe en silencio) el destino de un
//!   par (handle, outcome). No se valida que el destino exista: las
//!   referencias colgantes sólo fallan cuando se ejercitan en ejecución.
//! - `lookup` devuelve `Target::Terminal` tanto para un cableado terminal
//!   explícito como para un par nunca registrado. `get` permite
//!   distinguir ambos casos.
use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::constants::ENGINE_VERSION;
use crate::step::{OutcomeKey, Step, StepHandle};

/// Destino de una transición.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Target {
    Step(StepHandle),
    /// Centinela: no hay siguiente step.
    Terminal,
}

impl Target {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Target::Terminal)
    }

    pub fn step(&self) -> Option<StepHandle> {
        match self {
            Target::Step(h) => Some(*h),
            Target::Terminal => None,
        }
    }
}

impl From<StepHandle> for Target {
    fn from(handle: StepHandle) -> Self {
        Target::Step(handle)
    }
}

impl From<Option<StepHandle>> for Target {
    fn from(handle: Option<StepHandle>) -> Self {
        handle.map_or(Target::Terminal, Target::Step)
    }
}

#[derive(Default)]
pub struct TransitionTable {
    steps: Vec<Box<dyn Step>>,
    transitions: IndexMap<StepHandle, IndexMap<OutcomeKey, Target>>,
}

impl TransitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra un step y devuelve su handle.
    pub fn register_step<S: Step + 'static>(&mut self, step: S) -> StepHandle {
        self.register_boxed(Box::new(step))
    }

    pub fn register_boxed(&mut self, step: Box<dyn Step>) -> StepHandle {
        let handle = StepHandle::from_index(self.steps.len());
        self.steps.push(step);
        handle
    }

    /// Registra o sobrescribe la transición `(from, outcome) -> to`.
    pub fn add_transition(&mut self,
                          from: StepHandle,
                          outcome: impl Into<OutcomeKey>,
                          to: impl Into<Target>)
                          -> &mut Self {
        self.transitions
            .entry(from)
            .or_default()
            .insert(outcome.into(), to.into());
        self
    }

    /// Siguiente destino para `(from, outcome)`; `Terminal` si no hay
    /// cableado.
    pub fn lookup(&self, from: StepHandle, outcome: &str) -> Target {
        self.get(from, outcome).unwrap_or(Target::Terminal)
    }

    /// Como `lookup`, pero `None` cuando el par nunca se registró.
    pub fn get(&self, from: StepHandle, outcome: &str) -> Option<Target> {
        self.transitions.get(&from).and_then(|m| m.get(outcome)).copied()
    }

    /// Outcomes cableados para `from`, en orden de registro.
    pub fn outcomes(&self, from: StepHandle) -> impl Iterator<Item = (&OutcomeKey, Target)> {
        self.transitions
            .get(&from)
            .into_iter()
            .flat_map(|m| m.iter().map(|(k, t)| (k, *t)))
    }

    pub fn step(&self, handle: StepHandle) -> Option<&dyn Step> {
        self.steps.get(handle.index()).map(|s| s.as_ref())
    }

    pub fn step_name(&self, handle: StepHandle) -> Option<&str> {
        self.step(handle).map(|s| s.name())
    }

    pub fn contains_step(&self, handle: StepHandle) -> bool {
        handle.index() < self.steps.len()
    }

    pub fn handles(&self) -> impl Iterator<Item = StepHandle> {
        (0..self.steps.len()).map(StepHandle::from_index)
    }

    /// Cantidad de steps registrados.
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Cantidad de transiciones registradas.
    pub fn len(&self) -> usize {
        self.transitions.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty() && self.transitions.is_empty()
    }

    /// Hash estable del cableado: nombres de steps (por handle) y
    /// transiciones ordenadas por (handle, outcome). Independiente del orden
    /// de registro de las transiciones.
    pub fn definition_hash(&self) -> String {
        let names: Vec<&str> = self.steps.iter().map(|s| s.name()).collect();
        let sorted: BTreeMap<(usize, &str), Option<usize>> =
            self.transitions
                .iter()
                .flat_map(|(from, m)| {
                    m.iter()
                     .map(move |(k, t)| ((from.index(), k.as_str()), t.step().map(StepHandle::index)))
                })
                .collect();
        let wiring: Vec<Value> = sorted.into_iter()
                                       .map(|((from, outcome), to)| json!([from, outcome, to]))
                                       .collect();
        let canonical = json!({
            "engine_version": ENGINE_VERSION,
            "steps": names,
            "transitions": wiring,
        });
        blake3::hash(canonical.to_string().as_bytes()).to_hex().to_string()
    }
}

impl fmt::Debug for TransitionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let steps: Vec<&str> = self.steps.iter().map(|s| s.name()).collect();
        f.debug_struct("TransitionTable")
         .field("steps", &steps)
         .field("transitions", &self.transitions)
         .finish()
    }
}
