use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use super::{FlowEvent, FlowEventKind};

/// Almacenamiento de eventos append-only.
pub trait EventStore {
    /// Agrega un evento a partir de su kind y devuelve el evento completo (con seq y ts).
    fn append_kind(&mut self, flow_id: Uuid, kind: FlowEventKind) -> FlowEvent;
    /// Lista eventos de un flujo (orden ascendente por seq).
    fn list(&self, flow_id: Uuid) -> Vec<FlowEvent>;
    /// Extrae y descarta los eventos de un flujo.
    fn take(&mut self, flow_id: Uuid) -> Vec<FlowEvent>;

    fn clear(&mut self, flow_id: Uuid) {
        let _ = self.take(flow_id);
    }
}

#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    inner: HashMap<Uuid, Vec<FlowEvent>>,
}

impl InMemoryEventStore {
    /// Cantidad de flujos con al menos un evento.
    pub fn flow_count(&self) -> usize {
        self.inner.len()
    }
}

impl EventStore for InMemoryEventStore {
    fn append_kind(&mut self, flow_id: Uuid, kind: FlowEventKind) -> FlowEvent {
        let events = self.inner.entry(flow_id).or_default();
        let ev = FlowEvent { seq: events.len() as u64,
                             flow_id,
                             kind,
                             ts: Utc::now() };
        events.push(ev.clone());
        ev
    }

    fn list(&self, flow_id: Uuid) -> Vec<FlowEvent> {
        self.inner.get(&flow_id).cloned().unwrap_or_default()
    }

    fn take(&mut self, flow_id: Uuid) -> Vec<FlowEvent> {
        self.inner.remove(&flow_id).unwrap_or_default()
    }
}

/// Store que no retiene nada: `append_kind` arma el evento y lo descarta.
///
/// Para ejecuciones largas (p. ej. ciclos acotados sólo por el llamador)
/// donde la traza no interesa; la memoria queda constante.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEventStore {
    appended: u64,
}

impl NoopEventStore {
    /// Total de eventos recibidos (y descartados).
    pub fn appended(&self) -> u64 {
        self.appended
    }
}

impl EventStore for NoopEventStore {
    fn append_kind(&mut self, flow_id: Uuid, kind: FlowEventKind) -> FlowEvent {
        let seq = self.appended;
        self.appended += 1;
        FlowEvent { seq,
                    flow_id,
                    kind,
                    ts: Utc::now() }
    }

    fn list(&self, _flow_id: Uuid) -> Vec<FlowEvent> {
        Vec::new()
    }

    fn take(&mut self, _flow_id: Uuid) -> Vec<FlowEvent> {
        Vec::new()
    }
}
