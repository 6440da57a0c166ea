//! Steps concretos.

pub mod counter;
pub mod data;
pub mod loan;

pub use counter::{CounterStep, Repeat};
pub use data::{Completion, HandleFailureStep, ProcessDataStep, ValidateDataStep, Validation};
pub use loan::{AllOf, Applicant, CreditScoreRule, DecisionStep, FraudCheckRule, LoanAmountRule, Rule, RuleOutcome,
               RuleStep};
