//! Retirement income projection: the year-by-year engine and the single-call summary

mod cashflows;
mod engine;
mod summary;

pub use cashflows::{ProjectionResult, YearlyProjectionRow};
pub use engine::{
    IncomeFrequency, OtherIncomeSource, ProjectionCola, ProjectionConfig, ProjectionEngine,
    ProjectionRequest, SocialSecurityStream,
};
pub use summary::{calculate_retirement, RetirementOutcome, RetirementRequest};
