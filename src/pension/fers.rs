//! FERS basic annuity
//!
//! Rules applied in order: multiplier selection, MRA+10 early reduction,
//! part-time proration, survivor election.

use super::policy::{apply_proration, SystemPolicy};
use super::{PensionOutcome, PensionRequest, RetirementSystem};

/// Multiplier for 62+ with 20+ years of service
pub const ENHANCED_MULTIPLIER: f64 = 0.011;
pub const STANDARD_MULTIPLIER: f64 = 0.010;

/// Age at which the early reduction stops applying
pub const UNREDUCED_AGE: u32 = 62;

/// Early retirement reduction per year under 62 (not compounded)
pub const EARLY_REDUCTION_PER_YEAR: f64 = 0.05;

/// Select the FERS multiplier for an age/service combination
pub fn fers_multiplier(age_at_retirement: u32, years_of_service: f64) -> f64 {
    if age_at_retirement >= UNREDUCED_AGE && years_of_service >= 20.0 {
        ENHANCED_MULTIPLIER
    } else {
        STANDARD_MULTIPLIER
    }
}

/// Calculate the FERS annuity for a request
///
/// The early reduction has no floor: very low ages can drive the annuity
/// negative, so callers validate ages before calling.
pub fn calculate_fers(request: &PensionRequest) -> PensionOutcome {
    let policy = SystemPolicy::fers();
    let mut notes = Vec::new();

    let sick_leave_years = f64::from(request.unused_sick_leave_months) / 12.0;
    let service_years = request.years_of_service + sick_leave_years;

    let multiplier = fers_multiplier(request.age_at_retirement, request.years_of_service);
    let mut base = request.high3_salary * service_years * multiplier;
    log::debug!(
        "FERS base annuity {:.2} (service {:.2}y, multiplier {})",
        base,
        service_years,
        multiplier
    );

    let mut early_reduction = 0.0;
    if request.age_at_retirement < UNREDUCED_AGE {
        let years_under = f64::from(UNREDUCED_AGE - request.age_at_retirement);
        early_reduction = base * EARLY_REDUCTION_PER_YEAR * years_under;
        base -= early_reduction;
        if early_reduction > 0.0 {
            notes.push(format!(
                "Early retirement reduction applied: ${:.2}",
                early_reduction
            ));
        }
    }

    let (prorated, proration_note) =
        apply_proration(base, request.is_part_time, request.proration_factor);
    let proration_applied = proration_note.is_some();
    notes.extend(proration_note);

    let (annual, survivor_reduction, survivor_note) =
        policy.apply_survivor_election(request.survivor_election, prorated);
    notes.extend(survivor_note);

    PensionOutcome {
        system: RetirementSystem::Fers,
        annual_pension: annual,
        monthly_pension: annual / 12.0,
        early_reduction,
        survivor_reduction,
        offset_reduction: 0.0,
        sick_leave_service_credit_years: sick_leave_years,
        prorated_pension: prorated,
        proration_applied,
        capped_at_maximum: false,
        notes,
    }
}
