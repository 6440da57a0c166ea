//! Pipeline de datos mínimo: validar, procesar o manejar el fallo.
//!
//! `ValidateDataStep` decide la rama a partir de `data_valid` en el contexto;
//! los otros dos dejan una marca en el contexto y terminan con `done`.

use flow_core::{outcome_enum, ExecutionContext, StepError, TypedStep};
use log::info;

pub const DATA_VALID_KEY: &str = "data_valid";
pub const VALIDATED_KEY: &str = "validated";
pub const PROCESSED_KEY: &str = "processed";
pub const FAILURE_HANDLED_KEY: &str = "failure_handled";

outcome_enum! {
    pub enum Validation {
        Success => "success",
        Fail => "fail",
    }
}

outcome_enum! {
    /// Outcome único de los steps que siempre terminan igual.
    pub enum Completion {
        Done => "done",
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidateDataStep;

impl TypedStep for ValidateDataStep {
    type Outcome = Validation;

    fn id(&self) -> &'static str {
        "validate_data"
    }

    fn run_typed(&self, ctx: &mut ExecutionContext) -> Result<Validation, StepError> {
        let valid = ctx.get_bool(DATA_VALID_KEY).unwrap_or(false);
        info!("validate_data: validating data (valid={valid})");
        ctx.insert(VALIDATED_KEY, valid);
        Ok(if valid { Validation::Success } else { Validation::Fail })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessDataStep;

impl TypedStep for ProcessDataStep {
    type Outcome = Completion;

    fn id(&self) -> &'static str {
        "process_data"
    }

    fn run_typed(&self, ctx: &mut ExecutionContext) -> Result<Completion, StepError> {
        info!("process_data: processing data");
        ctx.insert(PROCESSED_KEY, true);
        Ok(Completion::Done)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HandleFailureStep;

impl TypedStep for HandleFailureStep {
    type Outcome = Completion;

    fn id(&self) -> &'static str {
        "handle_failure"
    }

    fn run_typed(&self, ctx: &mut ExecutionContext) -> Result<Completion, StepError> {
        info!("handle_failure: handling failure");
        ctx.insert(FAILURE_HANDLED_KEY, true);
        Ok(Completion::Done)
    }
}
