//! Federal annuity calculators
//!
//! - **FERS**: 1.0%/1.1% multiplier with the MRA+10 early reduction
//! - **CSRS / CSRS Offset**: tiered 1.5/1.75/2.0% formula capped at 80% of high-3
//! - **SRS**: FERS annuity supplement payable until 62
//! - **Survivor**: survivor annuity projection
//!
//! Survivor elections and part-time proration are shared through
//! [`policy::SystemPolicy`].

mod csrs;
mod fers;
pub mod policy;
pub mod srs;
pub mod survivor;

pub use csrs::calculate_csrs;
pub use fers::calculate_fers;
pub use policy::{ElectionTerms, SystemPolicy};
pub use srs::{calculate_srs, SrsOutcome, SrsRequest};
pub use survivor::{calculate_survivor_benefit, SurvivorOutcome, SurvivorRequest};

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};

/// Federal retirement system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RetirementSystem {
    #[default]
    #[serde(rename = "FERS")]
    Fers,
    #[serde(rename = "CSRS")]
    Csrs,
    #[serde(rename = "CSRS Offset", alias = "CSRS_OFFSET", alias = "CSRSOffset")]
    CsrsOffset,
    /// Any label that is not a recognized system
    #[serde(other)]
    Unknown,
}

/// Survivor annuity election at retirement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SurvivorElection {
    #[serde(rename = "partial")]
    Partial,
    #[serde(rename = "max", alias = "full")]
    Max,
    /// No election, and any label that is not recognized
    #[default]
    #[serde(rename = "none", other)]
    None,
}

/// Input to the FERS and CSRS annuity formulas
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PensionRequest {
    pub system: RetirementSystem,

    /// Highest average basic pay over 3 consecutive years
    pub high3_salary: f64,

    /// Creditable service in years (fractions allowed)
    pub years_of_service: f64,

    pub age_at_retirement: u32,

    /// Unused sick leave, credited at 1/12 year per month
    pub unused_sick_leave_months: u32,

    pub survivor_election: SurvivorElection,

    pub is_part_time: bool,

    /// Part-time proration factor, only used when `is_part_time`
    pub proration_factor: f64,

    /// CSRS Offset only: years of offset service
    pub years_of_offset_service: f64,

    /// CSRS Offset only: SS benefit at 62 including offset earnings
    pub ss_at_62_with_offset: f64,

    /// CSRS Offset only: SS benefit at 62 excluding offset earnings
    pub ss_at_62_without_offset: f64,
}

impl PensionRequest {
    /// Check the calling contract; the formulas assume it holds
    pub fn validate(&self) -> Result<()> {
        if !self.high3_salary.is_finite() || self.high3_salary < 0.0 {
            return Err(EngineError::validation(
                "high3Salary",
                "must be a non-negative amount",
            ));
        }
        if !self.years_of_service.is_finite() || self.years_of_service < 0.0 {
            return Err(EngineError::validation(
                "yearsOfService",
                "must be a non-negative number of years",
            ));
        }
        if self.is_part_time && !(self.proration_factor > 0.0 && self.proration_factor <= 1.0) {
            return Err(EngineError::validation(
                "prorationFactor",
                format!("must be in (0, 1] for part-time service, got {}", self.proration_factor),
            ));
        }
        Ok(())
    }
}

/// Annuity computed for one request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PensionOutcome {
    pub system: RetirementSystem,
    pub annual_pension: f64,
    pub monthly_pension: f64,
    pub early_reduction: f64,
    pub survivor_reduction: f64,
    pub offset_reduction: f64,
    pub sick_leave_service_credit_years: f64,
    /// Annuity after proration, before survivor and offset reductions
    pub prorated_pension: f64,
    pub proration_applied: bool,
    /// CSRS only: the 80% of high-3 maximum was binding
    pub capped_at_maximum: bool,
    /// Applied rules, in application order
    pub notes: Vec<String>,
}

impl PensionOutcome {
    /// Zero-pension outcome for a system the engine does not model
    pub fn unknown_system() -> Self {
        Self {
            system: RetirementSystem::Unknown,
            notes: vec!["Unknown retirement system.".to_string()],
            ..Default::default()
        }
    }

    pub fn notes_text(&self) -> String {
        self.notes.join("\n")
    }
}

/// Calculate the annuity for whichever system the request names
pub fn calculate_pension(request: &PensionRequest) -> PensionOutcome {
    match request.system {
        RetirementSystem::Fers => calculate_fers(request),
        RetirementSystem::Csrs | RetirementSystem::CsrsOffset => calculate_csrs(request),
        RetirementSystem::Unknown => {
            log::warn!("pension requested for an unknown retirement system");
            PensionOutcome::unknown_system()
        }
    }
}
