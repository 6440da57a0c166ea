//! Definiciones relacionadas a Steps.
//!
//! Un Step es una unidad de trabajo que, ejecutada contra un
//! `ExecutionContext`, devuelve un `OutcomeKey`. Este módulo define:
//! - `Step`: interfaz neutral usada por el engine (object safe).
//! - `TypedStep`: interfaz de alto nivel con un enum de outcomes cerrado.
//! - `StepHandle`: identidad explícita asignada por la `TransitionTable`.
//! - `outcome_enum!` para declarar outcomes cerrados con fallback a string.

pub mod definition;
pub mod macros;
mod outcome;
pub mod typed;

pub use definition::{Step, StepHandle};
pub use outcome::{OutcomeKey, UnknownOutcome};
pub use typed::TypedStep;
