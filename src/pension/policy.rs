//! Per-system policy table shared by the FERS, CSRS and survivor calculators
//!
//! Survivor election terms and part-time proration are identical in shape
//! across systems; only the survivor share differs. Keeping them in one table
//! avoids parallel branching in each annuity formula.

use super::{RetirementSystem, SurvivorElection};

/// Retiree reduction and survivor share for one election
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElectionTerms {
    /// Fraction of the retiree's annuity held back to fund the survivor benefit
    pub retiree_reduction: f64,
    /// Fraction of the unreduced annuity paid to the survivor
    pub survivor_share: f64,
}

impl ElectionTerms {
    pub const NONE: ElectionTerms = ElectionTerms {
        retiree_reduction: 0.0,
        survivor_share: 0.0,
    };
}

/// Policy parameters for one retirement system
#[derive(Debug, Clone, Copy)]
pub struct SystemPolicy {
    pub system: RetirementSystem,
    pub label: &'static str,
    pub max: ElectionTerms,
    pub partial: ElectionTerms,
}

const FERS_POLICY: SystemPolicy = SystemPolicy {
    system: RetirementSystem::Fers,
    label: "FERS",
    max: ElectionTerms {
        retiree_reduction: 0.10,
        survivor_share: 0.50,
    },
    partial: ElectionTerms {
        retiree_reduction: 0.05,
        survivor_share: 0.25,
    },
};

const CSRS_POLICY: SystemPolicy = SystemPolicy {
    system: RetirementSystem::Csrs,
    label: "CSRS",
    max: ElectionTerms {
        retiree_reduction: 0.10,
        survivor_share: 0.55,
    },
    partial: ElectionTerms {
        retiree_reduction: 0.05,
        survivor_share: 0.50,
    },
};

const CSRS_OFFSET_POLICY: SystemPolicy = SystemPolicy {
    system: RetirementSystem::CsrsOffset,
    label: "CSRS Offset",
    ..CSRS_POLICY
};

impl SystemPolicy {
    pub fn fers() -> &'static SystemPolicy {
        &FERS_POLICY
    }

    pub fn csrs(is_offset: bool) -> &'static SystemPolicy {
        if is_offset {
            &CSRS_OFFSET_POLICY
        } else {
            &CSRS_POLICY
        }
    }

    /// Look up the policy for a system; `None` for an unrecognized system
    pub fn for_system(system: RetirementSystem) -> Option<&'static SystemPolicy> {
        match system {
            RetirementSystem::Fers => Some(&FERS_POLICY),
            RetirementSystem::Csrs => Some(&CSRS_POLICY),
            RetirementSystem::CsrsOffset => Some(&CSRS_OFFSET_POLICY),
            RetirementSystem::Unknown => None,
        }
    }

    pub fn election_terms(&self, election: SurvivorElection) -> ElectionTerms {
        match election {
            SurvivorElection::Max => self.max,
            SurvivorElection::Partial => self.partial,
            SurvivorElection::None => ElectionTerms::NONE,
        }
    }

    /// Apply the retiree-side survivor reduction once to `amount`
    ///
    /// Returns the reduced amount, the reduction and a note when one applied.
    pub fn apply_survivor_election(
        &self,
        election: SurvivorElection,
        amount: f64,
    ) -> (f64, f64, Option<String>) {
        let terms = self.election_terms(election);
        if terms.retiree_reduction == 0.0 {
            return (amount, 0.0, None);
        }

        let reduction = amount * terms.retiree_reduction;
        let note = match election {
            SurvivorElection::Max => format!(
                "Maximum survivor benefit elected ({:.0}% reduction).",
                terms.retiree_reduction * 100.0
            ),
            _ => format!(
                "Partial survivor benefit elected ({:.0}% reduction).",
                terms.retiree_reduction * 100.0
            ),
        };
        (amount - reduction, reduction, Some(note))
    }
}

/// Part-time proration; a no-op unless part-time with a factor in (0, 1)
///
/// Returns the prorated amount and the note when proration applied.
pub fn apply_proration(amount: f64, is_part_time: bool, factor: f64) -> (f64, Option<String>) {
    if is_part_time && factor > 0.0 && factor < 1.0 {
        (
            amount * factor,
            Some(format!("Part-time proration factor applied: {:.2}", factor)),
        )
    } else {
        (amount, None)
    }
}
