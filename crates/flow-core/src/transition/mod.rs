//! Tabla de transiciones: (step, outcome) -> siguiente step o terminal.

mod table;

pub use table::{Target, TransitionTable};
