//! Cableados prearmados sobre una `TransitionTable` del llamador.
//!
//! Las funciones registran steps y transiciones en la tabla recibida y
//! devuelven los handles, de modo que el llamador puede crear después el
//! `FlowEngine` que la toma prestada.

use flow_core::{Target, TransitionTable};
use flow_core::StepHandle;

use crate::error::DomainError;
use crate::steps::{Completion, CreditScoreRule, DecisionStep, FraudCheckRule, HandleFailureStep, LoanAmountRule,
                   ProcessDataStep, RuleOutcome, RuleStep, ValidateDataStep, Validation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataPipeline {
    pub validate: StepHandle,
    pub process: StepHandle,
    pub handle_failure: StepHandle,
}

impl DataPipeline {
    pub fn start(&self) -> StepHandle {
        self.validate
    }
}

/// `validate --success--> process`, `validate --fail--> handle_failure`;
/// ambos terminan con `done`.
pub fn data_pipeline(table: &mut TransitionTable) -> DataPipeline {
    let validate = table.register_step(ValidateDataStep);
    let process = table.register_step(ProcessDataStep);
    let handle_failure = table.register_step(HandleFailureStep);

    table.add_transition(validate, Validation::Success, process)
         .add_transition(validate, Validation::Fail, handle_failure)
         .add_transition(process, Completion::Done, Target::Terminal)
         .add_transition(handle_failure, Completion::Done, Target::Terminal);

    DataPipeline { validate,
                   process,
                   handle_failure }
}

/// Parámetros de la política de préstamos.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoanPolicy {
    pub max_amount: f64,
    pub min_score: u32,
}

impl Default for LoanPolicy {
    fn default() -> Self {
        Self { max_amount: 50_000.0,
               min_score: 650 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoanApproval {
    pub amount: StepHandle,
    pub score: StepHandle,
    pub fraud: StepHandle,
    pub approve: StepHandle,
    pub reject: StepHandle,
}

impl LoanApproval {
    pub fn start(&self) -> StepHandle {
        self.amount
    }
}

/// Cadena `amount -> score -> fraud -> approve`; cualquier `rejected` salta
/// a `reject`. Las decisiones terminan con `done`.
pub fn loan_approval(table: &mut TransitionTable, policy: LoanPolicy) -> Result<LoanApproval, DomainError> {
    let amount = table.register_step(RuleStep::new(LoanAmountRule::new(policy.max_amount)?));
    let score = table.register_step(RuleStep::new(CreditScoreRule::new(policy.min_score)?));
    let fraud = table.register_step(RuleStep::new(FraudCheckRule));
    let approve = table.register_step(DecisionStep::new("approved"));
    let reject = table.register_step(DecisionStep::new("rejected"));

    table.add_transition(amount, RuleOutcome::Passed, score)
         .add_transition(score, RuleOutcome::Passed, fraud)
         .add_transition(fraud, RuleOutcome::Passed, approve);
    for rule in [amount, score, fraud] {
        table.add_transition(rule, RuleOutcome::Rejected, reject);
    }
    table.add_transition(approve, Completion::Done, Target::Terminal)
         .add_transition(reject, Completion::Done, Target::Terminal);

    Ok(LoanApproval { amount,
                      score,
                      fraud,
                      approve,
                      reject })
}
