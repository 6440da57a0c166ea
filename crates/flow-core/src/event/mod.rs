//! Definiciones de eventos y trait EventStore.

mod store;
mod types;

pub use store::{EventStore, InMemoryEventStore, NoopEventStore};
pub use types::{FlowEvent, FlowEventKind};
