//! CSRS and CSRS Offset basic annuity

use super::policy::{apply_proration, SystemPolicy};
use super::{PensionOutcome, PensionRequest, RetirementSystem};

/// Tiered accrual: (years in tier, rate per year)
const ACCRUAL_TIERS: [(f64, f64); 3] = [(5.0, 0.015), (5.0, 0.0175), (f64::INFINITY, 0.02)];

/// Maximum annuity as a fraction of high-3
pub const MAX_HIGH3_FRACTION: f64 = 0.80;

/// Age from which the CSRS Offset reduction applies
pub const OFFSET_AGE: u32 = 62;

/// Offset service years divisor in the OPM offset formula
const OFFSET_DIVISOR: f64 = 40.0;

/// Combined accrual percentage for a service length under the tiered formula
pub fn csrs_accrual_fraction(service_years: f64) -> f64 {
    let mut remaining = service_years.max(0.0);
    let mut fraction = 0.0;
    for (tier_years, rate) in ACCRUAL_TIERS {
        let in_tier = remaining.min(tier_years);
        fraction += in_tier * rate;
        remaining -= in_tier;
        if remaining <= 0.0 {
            break;
        }
    }
    fraction
}

/// Calculate the CSRS (or CSRS Offset) annuity for a request
///
/// Order: tiered formula, 80% cap, proration, survivor election, offset
/// reduction for CSRS Offset retirees at 62 or older.
pub fn calculate_csrs(request: &PensionRequest) -> PensionOutcome {
    let is_offset = request.system == RetirementSystem::CsrsOffset;
    let policy = SystemPolicy::csrs(is_offset);
    let mut notes = Vec::new();

    let sick_leave_years = f64::from(request.unused_sick_leave_months) / 12.0;
    let service_years = request.years_of_service + sick_leave_years;

    let mut base = request.high3_salary * csrs_accrual_fraction(service_years);
    let max_pension = request.high3_salary * MAX_HIGH3_FRACTION;
    let capped_at_maximum = base > max_pension;
    if capped_at_maximum {
        base = max_pension;
        notes.push("80% High-3 maximum applied.".to_string());
    }
    log::debug!("{} base annuity {:.2} (service {:.2}y)", policy.label, base, service_years);

    let (prorated, proration_note) =
        apply_proration(base, request.is_part_time, request.proration_factor);
    let proration_applied = proration_note.is_some();
    notes.extend(proration_note);

    let (mut annual, survivor_reduction, survivor_note) =
        policy.apply_survivor_election(request.survivor_election, prorated);
    notes.extend(survivor_note);

    let mut offset_reduction = 0.0;
    if is_offset && request.age_at_retirement >= OFFSET_AGE {
        let earnings_difference = request.ss_at_62_with_offset - request.ss_at_62_without_offset;
        let service_share =
            request.ss_at_62_with_offset * (request.years_of_offset_service / OFFSET_DIVISOR);
        offset_reduction = earnings_difference.min(service_share).max(0.0);
        annual = (annual - offset_reduction).max(0.0);
        notes.push(format!("CSRS Offset reduction applied: ${:.2}", offset_reduction));
    }

    PensionOutcome {
        system: if is_offset {
            RetirementSystem::CsrsOffset
        } else {
            RetirementSystem::Csrs
        },
        annual_pension: annual,
        monthly_pension: annual / 12.0,
        early_reduction: 0.0,
        survivor_reduction,
        offset_reduction,
        sick_leave_service_credit_years: sick_leave_years,
        prorated_pension: prorated,
        proration_applied,
        capped_at_maximum,
        notes,
    }
}
