//! Reglas de elegibilidad de préstamos expresadas como steps.
//!
//! Cada `Rule` valida sus parámetros al construirse. `RuleStep` lee el
//! `Applicant` del contexto (clave `applicant`) y devuelve `passed` o
//! `rejected`; en el segundo caso anota qué regla rechazó en `rejected_by`.
//! Un applicant ausente o inválido es una condición excepcional (`Err`).

use flow_core::{outcome_enum, ExecutionContext, OutcomeKey, Step, StepError, TypedStep};
use log::debug;
use serde::{Deserialize, Serialize};

use super::Completion;
use crate::error::DomainError;

pub const APPLICANT_KEY: &str = "applicant";
pub const REJECTED_BY_KEY: &str = "rejected_by";
pub const DECISION_KEY: &str = "decision";

const MAX_CREDIT_SCORE: u32 = 850;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Applicant {
    pub loan_amount: f64,
    pub credit_score: u32,
    pub suspicious_activity: bool,
}

impl Applicant {
    pub fn new(loan_amount: f64, credit_score: u32, suspicious_activity: bool) -> Result<Self, DomainError> {
        let applicant = Self { loan_amount,
                               credit_score,
                               suspicious_activity };
        applicant.validate()?;
        Ok(applicant)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if !(self.loan_amount.is_finite() && self.loan_amount > 0.0) {
            return Err(DomainError::NonPositiveAmount(self.loan_amount));
        }
        if self.credit_score > MAX_CREDIT_SCORE {
            return Err(DomainError::CreditScoreOutOfRange(self.credit_score));
        }
        Ok(())
    }

    /// Lee y valida el applicant guardado en el contexto.
    pub fn from_context(ctx: &ExecutionContext) -> Result<Self, DomainError> {
        let applicant: Self = ctx.get_as(APPLICANT_KEY)
                                 .map_err(|e| DomainError::InvalidContextValue { key: APPLICANT_KEY.to_string(),
                                                                                 reason: e.to_string() })?
                                 .ok_or_else(|| DomainError::MissingContextKey(APPLICANT_KEY.to_string()))?;
        applicant.validate()?;
        Ok(applicant)
    }
}

pub trait Rule {
    fn name(&self) -> &'static str;
    fn is_satisfied(&self, applicant: &Applicant) -> bool;

    /// Nombre de la regla concreta que rechaza al applicant, si alguna.
    fn failing_rule(&self, applicant: &Applicant) -> Option<&'static str> {
        (!self.is_satisfied(applicant)).then(|| self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoanAmountRule {
    max_amount: f64,
}

impl LoanAmountRule {
    pub fn new(max_amount: f64) -> Result<Self, DomainError> {
        if !(max_amount.is_finite() && max_amount > 0.0) {
            return Err(DomainError::NonPositiveMaxAmount(max_amount));
        }
        Ok(Self { max_amount })
    }
}

impl Rule for LoanAmountRule {
    fn name(&self) -> &'static str {
        "loan_amount_rule"
    }

    fn is_satisfied(&self, applicant: &Applicant) -> bool {
        applicant.loan_amount <= self.max_amount
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreditScoreRule {
    min_score: u32,
}

impl CreditScoreRule {
    pub fn new(min_score: u32) -> Result<Self, DomainError> {
        if min_score > MAX_CREDIT_SCORE {
            return Err(DomainError::MinScoreOutOfRange(min_score));
        }
        Ok(Self { min_score })
    }
}

impl Rule for CreditScoreRule {
    fn name(&self) -> &'static str {
        "credit_score_rule"
    }

    fn is_satisfied(&self, applicant: &Applicant) -> bool {
        applicant.credit_score >= self.min_score
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FraudCheckRule;

impl Rule for FraudCheckRule {
    fn name(&self) -> &'static str {
        "fraud_check_rule"
    }

    fn is_satisfied(&self, applicant: &Applicant) -> bool {
        !applicant.suspicious_activity
    }
}

/// Conjunción de reglas: se satisface sólo si todas lo hacen.
#[derive(Default)]
pub struct AllOf {
    rules: Vec<Box<dyn Rule>>,
}

impl AllOf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, rule: impl Rule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }
}

impl Rule for AllOf {
    fn name(&self) -> &'static str {
        "eligibility"
    }

    fn is_satisfied(&self, applicant: &Applicant) -> bool {
        self.rules.iter().all(|r| r.is_satisfied(applicant))
    }

    /// Primera regla interna que falla, en orden de `with`.
    fn failing_rule(&self, applicant: &Applicant) -> Option<&'static str> {
        self.rules.iter().find_map(|r| r.failing_rule(applicant))
    }
}

outcome_enum! {
    pub enum RuleOutcome {
        Passed => "passed",
        Rejected => "rejected",
    }
}

/// Adapta una `Rule` a step.
pub struct RuleStep<R> {
    rule: R,
}

impl<R: Rule> RuleStep<R> {
    pub fn new(rule: R) -> Self {
        Self { rule }
    }

    pub fn rule(&self) -> &R {
        &self.rule
    }
}

impl<R: Rule> TypedStep for RuleStep<R> {
    type Outcome = RuleOutcome;

    fn id(&self) -> &'static str {
        self.rule.name()
    }

    fn run_typed(&self, ctx: &mut ExecutionContext) -> Result<RuleOutcome, StepError> {
        let applicant = Applicant::from_context(ctx)?;
        match self.rule.failing_rule(&applicant) {
            None => {
                debug!("{}: passed", self.rule.name());
                Ok(RuleOutcome::Passed)
            }
            Some(failing) => {
                debug!("{}: rejected by {failing}", self.rule.name());
                ctx.insert(REJECTED_BY_KEY, failing);
                Ok(RuleOutcome::Rejected)
            }
        }
    }
}

/// Escribe la decisión final (`decision`) y termina con `done`.
#[derive(Debug, Clone)]
pub struct DecisionStep {
    name: String,
    decision: String,
}

impl DecisionStep {
    pub fn new(decision: impl Into<String>) -> Self {
        let decision = decision.into();
        Self { name: format!("decide_{decision}"),
               decision }
    }

    pub fn decision(&self) -> &str {
        &self.decision
    }
}

impl Step for DecisionStep {
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(&self, ctx: &mut ExecutionContext) -> Result<OutcomeKey, StepError> {
        ctx.insert(DECISION_KEY, self.decision.clone());
        Ok(Completion::Done.into())
    }
}
