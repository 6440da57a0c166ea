//! Registro por defecto de los steps de este crate.
//!
//! | kind                | params                                   |
//! |---------------------|------------------------------------------|
//! | `validate_data`     | -                                        |
//! | `process_data`      | -                                        |
//! | `handle_failure`    | -                                        |
//! | `loan_amount_rule`  | `{ "max_amount": f64 }`                  |
//! | `credit_score_rule` | `{ "min_score": u32 }`                   |
//! | `fraud_check_rule`  | -                                        |
//! | `eligibility`       | `{ "max_amount": f64, "min_score": u32 }`|
//! | `decision`          | `{ "value": string }`                    |
//! | `counter`           | `{ "key"?: string, "limit"?: i64 }`      |

use flow_core::{CoreEngineError, Step, StepError, StepRegistry};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::steps::{AllOf, CounterStep, CreditScoreRule, DecisionStep, FraudCheckRule, HandleFailureStep,
                   LoanAmountRule, ProcessDataStep, RuleStep, ValidateDataStep};

#[derive(Deserialize)]
struct LoanAmountParams {
    max_amount: f64,
}

#[derive(Deserialize)]
struct CreditScoreParams {
    min_score: u32,
}

#[derive(Deserialize)]
struct EligibilityParams {
    max_amount: f64,
    min_score: u32,
}

#[derive(Deserialize)]
struct DecisionParams {
    value: String,
}

#[derive(Deserialize)]
struct CounterParams {
    #[serde(default = "default_counter_key")]
    key: String,
    #[serde(default)]
    limit: Option<i64>,
}

fn default_counter_key() -> String {
    "count".to_string()
}

fn params<T: DeserializeOwned>(raw: &Value) -> Result<T, StepError> {
    Ok(T::deserialize(raw)?)
}

fn boxed(step: impl Step + 'static) -> Result<Box<dyn Step>, StepError> {
    Ok(Box::new(step))
}

pub fn builtin_registry() -> Result<StepRegistry, CoreEngineError> {
    let mut registry = StepRegistry::new();
    registry.register_default::<ValidateDataStep>("validate_data")?;
    registry.register_default::<ProcessDataStep>("process_data")?;
    registry.register_default::<HandleFailureStep>("handle_failure")?;
    registry.register("loan_amount_rule", |raw| {
                let p: LoanAmountParams = params(raw)?;
                boxed(RuleStep::new(LoanAmountRule::new(p.max_amount)?))
            })?;
    registry.register("credit_score_rule", |raw| {
                let p: CreditScoreParams = params(raw)?;
                boxed(RuleStep::new(CreditScoreRule::new(p.min_score)?))
            })?;
    registry.register("fraud_check_rule", |_raw| boxed(RuleStep::new(FraudCheckRule)))?;
    registry.register("eligibility", |raw| {
                let p: EligibilityParams = params(raw)?;
                let rule = AllOf::new().with(LoanAmountRule::new(p.max_amount)?)
                                       .with(CreditScoreRule::new(p.min_score)?)
                                       .with(FraudCheckRule);
                boxed(RuleStep::new(rule))
            })?;
    registry.register("decision", |raw| {
                let p: DecisionParams = params(raw)?;
                boxed(DecisionStep::new(p.value))
            })?;
    registry.register("counter", |raw| {
                let p: CounterParams = params(raw)?;
                boxed(CounterStep::new(p.key, p.limit))
            })?;
    Ok(registry)
}
