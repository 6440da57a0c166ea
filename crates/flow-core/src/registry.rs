//! Registro explícito `kind -> factory` de steps.
//!
//! Se puebla al inicio del proceso; no hay descubrimiento por introspección.
//! Cada factory recibe los parámetros (JSON) declarados para una instancia
//! concreta y construye el step.

use std::fmt;

use indexmap::IndexMap;
use log::debug;
use serde_json::Value;

use crate::errors::{CoreEngineError, StepError};
use crate::step::Step;

pub type StepFactory = Box<dyn Fn(&Value) -> Result<Box<dyn Step>, StepError>>;

#[derive(Default)]
pub struct StepRegistry {
    factories: IndexMap<String, StepFactory>,
}

impl StepRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra una factory. Un `kind` repetido es un error de configuración.
    pub fn register<F>(&mut self, kind: impl Into<String>, factory: F) -> Result<(), CoreEngineError>
        where F: Fn(&Value) -> Result<Box<dyn Step>, StepError> + 'static
    {
        let kind = kind.into();
        if self.factories.contains_key(&kind) {
            return Err(CoreEngineError::DuplicateStepKind(kind));
        }
        debug!("registry: step kind '{kind}' registered");
        self.factories.insert(kind, Box::new(factory));
        Ok(())
    }

    /// Registra un step sin parámetros construido con `Default`.
    pub fn register_default<S>(&mut self, kind: impl Into<String>) -> Result<(), CoreEngineError>
        where S: Step + Default + 'static
    {
        self.register(kind, |_params: &Value| Ok(Box::new(S::default()) as Box<dyn Step>))
    }

    /// Construye una instancia del `kind` con los parámetros dados.
    pub fn create(&self, kind: &str, params: &Value) -> Result<Box<dyn Step>, CoreEngineError> {
        let factory = self.factories
                          .get(kind)
                          .ok_or_else(|| CoreEngineError::UnknownStepKind(kind.to_string()))?;
        factory(params).map_err(|source| CoreEngineError::InvalidParams { kind: kind.to_string(),
                                                                          source })
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    /// Kinds registrados en orden de registro.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for StepRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepRegistry")
         .field("kinds", &self.factories.keys().collect::<Vec<_>>())
         .finish()
    }
}
