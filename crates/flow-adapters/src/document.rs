//! Descripción declarativa (JSON) de un flujo.
//!
//! ```json
//! {
//!   "start": "validate",
//!   "steps": [
//!     { "id": "validate", "kind": "validate_data" },
//!     { "id": "process",  "kind": "process_data" }
//!   ],
//!   "transitions": [
//!     { "from": "validate", "outcome": "success", "to": "process" },
//!     { "from": "process",  "outcome": "done",    "to": null }
//!   ]
//! }
//! ```
//!
//! `to: null` (o ausente) es el cableado terminal explícito. Cada `kind` se
//! resuelve contra un `StepRegistry`; el `id` del documento pasa a ser el
//! nombre del step en trazas y eventos.

use std::path::Path;

use flow_core::{ExecutionContext, FlowEngine, OutcomeKey, Step, StepError, StepHandle, StepRegistry, Target,
                TransitionTable};
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DocumentError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowDocument {
    pub start: String,
    pub steps: Vec<StepDecl>,
    #[serde(default)]
    pub transitions: Vec<TransitionDecl>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepDecl {
    pub id: String,
    pub kind: String,
    #[serde(default = "empty_params")]
    pub params: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionDecl {
    pub from: String,
    pub outcome: String,
    #[serde(default)]
    pub to: Option<String>,
}

fn empty_params() -> Value {
    Value::Object(serde_json::Map::new())
}

impl FlowDocument {
    pub fn from_json_str(raw: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Construye la tabla. Valida ids duplicados, el step inicial y las
    /// referencias de las transiciones antes de instanciar ningún step.
    pub fn compile(&self, registry: &StepRegistry) -> Result<CompiledFlow, DocumentError> {
        let mut declared: IndexMap<&str, &StepDecl> = IndexMap::with_capacity(self.steps.len());
        for decl in &self.steps {
            if declared.insert(decl.id.as_str(), decl).is_some() {
                return Err(DocumentError::DuplicateStep(decl.id.clone()));
            }
        }
        if !declared.contains_key(self.start.as_str()) {
            return Err(DocumentError::UnknownStart(self.start.clone()));
        }
        for t in &self.transitions {
            for id in std::iter::once(&t.from).chain(t.to.as_ref()) {
                if !declared.contains_key(id.as_str()) {
                    return Err(DocumentError::UnknownStep(id.clone()));
                }
            }
        }

        let mut table = TransitionTable::new();
        let mut handles = IndexMap::with_capacity(declared.len());
        for (id, decl) in declared {
            let inner = registry.create(&decl.kind, &decl.params)?;
            let handle = table.register_step(NamedStep { name: id.to_string(),
                                                         inner });
            handles.insert(id.to_string(), handle);
        }
        for t in &self.transitions {
            let from = handles[t.from.as_str()];
            let to = match &t.to {
                Some(id) => Target::Step(handles[id.as_str()]),
                None => Target::Terminal,
            };
            table.add_transition(from, t.outcome.clone(), to);
        }

        let start = handles[self.start.as_str()];
        debug!("document: compiled {} steps, {} transitions (hash {})",
               table.step_count(),
               table.len(),
               table.definition_hash());
        Ok(CompiledFlow { table,
                          start,
                          handles })
    }
}

/// Resultado de compilar un `FlowDocument`.
#[derive(Debug)]
pub struct CompiledFlow {
    pub table: TransitionTable,
    pub start: StepHandle,
    pub handles: IndexMap<String, StepHandle>,
}

impl CompiledFlow {
    pub fn handle(&self, id: &str) -> Option<StepHandle> {
        self.handles.get(id).copied()
    }

    /// Engine sobre la tabla compilada con el step inicial ya fijado.
    pub fn engine(&self) -> FlowEngine<'_> {
        FlowEngine::new(&self.table).with_start(self.start)
    }
}

/// Renombra un step construido por el registry con el id del documento.
struct NamedStep {
    name: String,
    inner: Box<dyn Step>,
}

impl Step for NamedStep {
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(&self, ctx: &mut ExecutionContext) -> Result<OutcomeKey, StepError> {
        self.inner.execute(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::builtin_registry;
    use serde_json::json;

    fn doc(value: Value) -> FlowDocument {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn params_and_target_default_when_omitted() {
        let d = doc(json!({
            "start": "a",
            "steps": [{ "id": "a", "kind": "process_data" }],
            "transitions": [{ "from": "a", "outcome": "done" }]
        }));
        assert_eq!(d.steps[0].params, json!({}));
        assert_eq!(d.transitions[0].to, None);
    }

    #[test]
    fn structural_errors_are_reported_before_building() {
        let registry = builtin_registry().unwrap();

        let dup = doc(json!({
            "start": "a",
            "steps": [{ "id": "a", "kind": "process_data" }, { "id": "a", "kind": "process_data" }]
        }));
        assert!(matches!(dup.compile(&registry), Err(DocumentError::DuplicateStep(id)) if id == "a"));

        let bad_start = doc(json!({ "start": "z", "steps": [{ "id": "a", "kind": "process_data" }] }));
        assert!(matches!(bad_start.compile(&registry), Err(DocumentError::UnknownStart(id)) if id == "z"));

        let bad_target = doc(json!({
            "start": "a",
            "steps": [{ "id": "a", "kind": "process_data" }],
            "transitions": [{ "from": "a", "outcome": "done", "to": "ghost" }]
        }));
        assert!(matches!(bad_target.compile(&registry), Err(DocumentError::UnknownStep(id)) if id == "ghost"));

        let bad_kind = doc(json!({ "start": "a", "steps": [{ "id": "a", "kind": "teleport" }] }));
        assert_eq!(bad_kind.compile(&registry).unwrap_err().to_string(),
                   "unknown step kind 'teleport'");
    }

    #[test]
    fn document_ids_become_step_names() {
        let registry = builtin_registry().unwrap();
        let compiled = doc(json!({
            "start": "check",
            "steps": [{ "id": "check", "kind": "validate_data" }, { "id": "work", "kind": "process_data" }],
            "transitions": [{ "from": "check", "outcome": "success", "to": "work" }]
        })).compile(&registry)
           .unwrap();

        let work = compiled.handle("work").unwrap();
        assert_eq!(compiled.table.step_name(work), Some("work"));
        assert_eq!(compiled.table.lookup(compiled.start, "success"), Target::Step(work));
        assert_eq!(compiled.handle("nope"), None);
    }
}
