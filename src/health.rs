//! FEHB, Medicare and other health premium projection

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HealthRequest {
    /// Annual FEHB premium
    pub fehb_premium: f64,
    /// Annual Medicare Part B premium
    pub medicare_premium: f64,
    pub include_fehb: bool,
    pub include_medicare: bool,
    /// Annual premium growth
    pub cola_rate: f64,
    pub years_to_project: u32,
    pub other_health_premium: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthOutcome {
    /// Total premiums per projected year
    pub projected_premiums: Vec<f64>,
    pub total_premiums: f64,
    pub notes: Vec<String>,
}

impl HealthOutcome {
    pub fn first_year_premium(&self) -> f64 {
        self.projected_premiums.first().copied().unwrap_or(0.0)
    }
}

pub fn calculate_health_premiums(request: &HealthRequest) -> HealthOutcome {
    let growth = 1.0 + request.cola_rate;
    let mut fehb = request.fehb_premium;
    let mut medicare = request.medicare_premium;
    let mut other = request.other_health_premium;

    let mut premiums = Vec::with_capacity(request.years_to_project as usize);
    for _ in 0..request.years_to_project {
        let mut annual = 0.0;
        if request.include_fehb {
            annual += fehb;
        }
        if request.include_medicare {
            annual += medicare;
        }
        if other > 0.0 {
            annual += other;
        }
        premiums.push(annual);

        fehb *= growth;
        medicare *= growth;
        other *= growth;
    }

    let mut notes = vec![
        if request.include_fehb { "FEHB included." } else { "FEHB not included." }.to_string(),
        if request.include_medicare {
            "Medicare included."
        } else {
            "Medicare not included."
        }
        .to_string(),
    ];
    if request.cola_rate > 0.0 {
        notes.push(format!(
            "COLA/inflation rate applied: {:.2}%.",
            request.cola_rate * 100.0
        ));
    }

    HealthOutcome {
        total_premiums: premiums.iter().sum(),
        projected_premiums: premiums,
        notes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_premium_projection() {
        let request = HealthRequest {
            fehb_premium: 8_000.0,
            medicare_premium: 2_200.0,
            include_fehb: true,
            include_medicare: true,
            cola_rate: 0.05,
            years_to_project: 3,
            other_health_premium: 500.0,
        };
        let outcome = calculate_health_premiums(&request);
        assert_relative_eq!(outcome.first_year_premium(), 10_700.0);
        assert_relative_eq!(outcome.projected_premiums[2], 10_700.0 * 1.05 * 1.05, epsilon = 1e-9);
        assert_relative_eq!(
            outcome.total_premiums,
            10_700.0 * (1.0 + 1.05 + 1.1025),
            epsilon = 1e-9
        );
        assert_eq!(
            outcome.notes,
            vec!["FEHB included.", "Medicare included.", "COLA/inflation rate applied: 5.00%."]
        );
    }

    #[test]
    fn test_excluded_streams() {
        let request = HealthRequest {
            fehb_premium: 8_000.0,
            medicare_premium: 2_200.0,
            include_medicare: true,
            years_to_project: 2,
            ..Default::default()
        };
        let outcome = calculate_health_premiums(&request);
        assert_eq!(outcome.projected_premiums, vec![2_200.0, 2_200.0]);
        assert_eq!(outcome.notes[0], "FEHB not included.");
        assert_eq!(outcome.notes.len(), 2);
    }

    #[test]
    fn test_no_years() {
        let outcome = calculate_health_premiums(&HealthRequest::default());
        assert_eq!(outcome.first_year_premium(), 0.0);
        assert_eq!(outcome.total_premiums, 0.0);
    }
}
