//! Federal Retirement - income projection engine for FERS and CSRS employees
//!
//! This library provides:
//! - FERS, CSRS and CSRS Offset annuity formulas, the FERS supplement and survivor annuities
//! - Social Security, TSP, federal/state tax, COLA and health premium estimators
//! - A single-call retirement summary and a year-by-year income projection
//! - Monte Carlo simulation of withdrawal sustainability
//! - JSON scenario storage and parallel batch runs

pub mod assumptions;
pub mod cola;
pub mod error;
pub mod health;
pub mod monte_carlo;
pub mod pension;
pub mod projection;
pub mod scenario;
pub mod social_security;
pub mod tax;
pub mod tsp;

// Re-export commonly used types
pub use error::{EngineError, Result};
pub use pension::{calculate_pension, PensionOutcome, PensionRequest, RetirementSystem};
pub use projection::{
    calculate_retirement, ProjectionConfig, ProjectionEngine, ProjectionRequest, ProjectionResult,
    RetirementOutcome, RetirementRequest,
};
pub use scenario::{Scenario, ScenarioRunner, ScenarioStore};
