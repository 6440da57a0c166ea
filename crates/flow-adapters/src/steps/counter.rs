use flow_core::{outcome_enum, ExecutionContext, StepError, TypedStep};

use crate::error::DomainError;

outcome_enum! {
    pub enum Repeat {
        Again => "again",
        Done => "done",
    }
}

/// Incrementa un entero del contexto en cada ejecución.
///
/// Devuelve `again` mientras no se alcance `limit`; sin `limit` nunca
/// devuelve `done`, de modo que cableado sobre sí mismo forma un ciclo sin
/// salida.
#[derive(Debug, Clone)]
pub struct CounterStep {
    key: String,
    limit: Option<i64>,
}

impl CounterStep {
    pub fn new(key: impl Into<String>, limit: Option<i64>) -> Self {
        Self { key: key.into(),
               limit }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl TypedStep for CounterStep {
    type Outcome = Repeat;

    fn id(&self) -> &'static str {
        "counter"
    }

    fn run_typed(&self, ctx: &mut ExecutionContext) -> Result<Repeat, StepError> {
        let current = match ctx.get(&self.key) {
            None => 0,
            Some(v) => v.as_i64().ok_or_else(|| DomainError::InvalidContextValue { key: self.key.clone(),
                                                                                  reason: format!("expected integer, got {v}") })?,
        };
        let next = current.checked_add(1)
                          .ok_or_else(|| DomainError::InvalidContextValue { key: self.key.clone(),
                                                                            reason: "counter overflow".to_string() })?;
        ctx.insert(self.key.clone(), next);
        Ok(match self.limit {
            Some(limit) if next >= limit => Repeat::Done,
            _ => Repeat::Again,
        })
    }
}
