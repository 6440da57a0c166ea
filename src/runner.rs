//! Ejecución de flujos desde la aplicación: arma el engine según las
//! opciones, corre (con o sin tope de steps) y resume el resultado.

use std::path::Path;

use flow_adapters::flows::{data_pipeline, loan_approval, LoanPolicy};
use flow_adapters::steps::data::DATA_VALID_KEY;
use flow_adapters::steps::loan::APPLICANT_KEY;
use flow_adapters::steps::Applicant;
use flow_adapters::{builtin_registry, FlowDocument};
use flow_core::{ExecutionContext, FlowEngine, MissingTransitionPolicy, StepHandle, TransitionTable};
use log::{info, warn};
use serde::Serialize;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::errors::AppError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// `None` corre hasta terminar.
    pub max_steps: Option<u64>,
    pub strict: bool,
}

impl RunOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self { max_steps: config.max_steps,
               strict: config.strict_transitions }
    }

    pub fn policy(&self) -> MissingTransitionPolicy {
        if self.strict {
            MissingTransitionPolicy::Error
        } else {
            MissingTransitionPolicy::Terminate
        }
    }
}

/// Resumen serializable de una ejecución.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub flow_id: Uuid,
    /// `false` si el tope de steps cortó la ejecución antes de terminar.
    pub completed: bool,
    pub steps_executed: u64,
    pub trace: Vec<String>,
    pub context: ExecutionContext,
}

pub fn execute(table: &TransitionTable,
               start: StepHandle,
               mut context: ExecutionContext,
               options: &RunOptions)
               -> Result<RunReport, AppError> {
    let mut engine = FlowEngine::new(table).with_start(start)
                                           .with_missing_transition_policy(options.policy());
    let (flow_id, completed, steps_executed) = {
        let mut flow = engine.start(&mut context)?;
        match options.max_steps {
            Some(cap) => {
                flow.run_n(cap)?;
            }
            None => flow.run_to_completion()?,
        }
        (flow.flow_id(), flow.state().is_terminated(), flow.steps_executed())
    };
    if completed {
        info!("flow {flow_id} finished after {steps_executed} step(s)");
    } else {
        warn!("flow {flow_id} stopped at the step cap ({steps_executed} step(s)) without terminating");
    }
    Ok(RunReport { flow_id,
                   completed,
                   steps_executed,
                   trace: engine.trace_names(flow_id),
                   context })
}

/// Pipeline validar/procesar/manejar fallo con `data_valid` fijado.
pub fn run_demo(data_valid: bool, options: &RunOptions) -> Result<RunReport, AppError> {
    let mut table = TransitionTable::new();
    let pipeline = data_pipeline(&mut table);
    let mut context = ExecutionContext::new();
    context.insert(DATA_VALID_KEY, data_valid);
    execute(&table, pipeline.start(), context, options)
}

pub fn run_loan(applicant: &Applicant, policy: LoanPolicy, options: &RunOptions) -> Result<RunReport, AppError> {
    applicant.validate()?;
    let mut table = TransitionTable::new();
    let loan = loan_approval(&mut table, policy)?;
    let mut context = ExecutionContext::new();
    context.set(APPLICANT_KEY, applicant)?;
    execute(&table, loan.start(), context, options)
}

/// Compila y corre un documento JSON con el registro por defecto.
pub fn run_document(path: impl AsRef<Path>,
                    context: ExecutionContext,
                    options: &RunOptions)
                    -> Result<RunReport, AppError> {
    let document = FlowDocument::from_path(path)?;
    let registry = builtin_registry()?;
    let compiled = document.compile(&registry)?;
    execute(&compiled.table, compiled.start, context, options)
}

/// Contexto inicial a partir de un objeto JSON (`--context`).
pub fn parse_context(raw: Option<&str>) -> Result<ExecutionContext, AppError> {
    match raw {
        None => Ok(ExecutionContext::new()),
        Some(raw) => Ok(serde_json::from_str(raw)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flow_adapters::steps::data::{FAILURE_HANDLED_KEY, PROCESSED_KEY};

    #[test]
    fn demo_reproduces_both_branches() {
        let ok = run_demo(true, &RunOptions::default()).unwrap();
        assert!(ok.completed);
        assert_eq!(ok.trace, vec!["validate_data", "process_data"]);
        assert_eq!(ok.context.get_bool(PROCESSED_KEY), Some(true));

        let ko = run_demo(false, &RunOptions::default()).unwrap();
        assert_eq!(ko.trace, vec!["validate_data", "handle_failure"]);
        assert_eq!(ko.context.get_bool(FAILURE_HANDLED_KEY), Some(true));
        assert_eq!(ko.steps_executed, 2);
    }

    #[test]
    fn step_cap_stops_without_completing() {
        let capped = run_demo(true, &RunOptions { max_steps: Some(1),
                                                  strict: false }).unwrap();
        assert!(!capped.completed);
        assert_eq!(capped.trace, vec!["validate_data"]);
    }

    #[test]
    fn context_must_be_a_json_object() {
        assert!(parse_context(None).unwrap().is_empty());
        assert_eq!(parse_context(Some(r#"{"data_valid": true}"#)).unwrap().get_bool("data_valid"),
                   Some(true));
        assert!(matches!(parse_context(Some("[1, 2]")), Err(AppError::Json(_))));
    }

    #[test]
    fn invalid_applicant_is_rejected_before_running() {
        let applicant = Applicant { loan_amount: -5.0,
                                    credit_score: 700,
                                    suspicious_activity: false };
        let err = run_loan(&applicant, LoanPolicy::default(), &RunOptions::default()).unwrap_err();
        assert!(matches!(err, AppError::Domain(_)));
    }
}
