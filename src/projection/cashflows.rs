//! Output structures for the year-by-year projection

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One projected year of retirement income
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyProjectionRow {
    pub age: u32,
    pub year: i32,

    // Income streams
    pub pension_income: f64,
    pub social_security: f64,
    pub tsp_withdrawal: f64,
    pub other_income: f64,
    pub total_gross_income: f64,

    // Taxes
    pub federal_tax: f64,
    pub state_tax: f64,
    pub total_taxes: f64,

    pub net_income: f64,

    /// TSP balance at the end of the year
    pub tsp_balance: f64,
}

/// Complete projection result
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    /// Empty when the engine runs without detailed output
    pub rows: Vec<YearlyProjectionRow>,
    pub years_projected: u32,
    pub total_gross_income: f64,
    pub total_net_income: f64,
    pub total_taxes: f64,
    pub max_tsp_balance: f64,
    pub final_tsp_balance: f64,
    pub notes: Vec<String>,
}

impl ProjectionResult {
    pub fn new(opening_tsp_balance: f64) -> Self {
        Self {
            max_tsp_balance: opening_tsp_balance,
            final_tsp_balance: opening_tsp_balance,
            ..Default::default()
        }
    }

    /// Fold a row into the totals, keeping it when `keep` is set
    pub fn add_row(&mut self, row: YearlyProjectionRow, keep: bool) {
        self.years_projected += 1;
        self.total_gross_income += row.total_gross_income;
        self.total_net_income += row.net_income;
        self.total_taxes += row.total_taxes;
        self.max_tsp_balance = self.max_tsp_balance.max(row.tsp_balance);
        self.final_tsp_balance = row.tsp_balance;
        if keep {
            self.rows.push(row);
        }
    }

    /// Average effective tax rate over the projection
    pub fn average_tax_rate(&self) -> f64 {
        if self.total_gross_income > 0.0 {
            self.total_taxes / self.total_gross_income
        } else {
            0.0
        }
    }

    /// Write the rows as CSV with a header line
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for row in &self.rows {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(age: u32, gross: f64, taxes: f64, tsp: f64) -> YearlyProjectionRow {
        YearlyProjectionRow {
            age,
            year: 2030 + age as i32 - 62,
            pension_income: gross,
            total_gross_income: gross,
            total_taxes: taxes,
            net_income: gross - taxes,
            tsp_balance: tsp,
            ..Default::default()
        }
    }

    #[test]
    fn test_totals() {
        let mut result = ProjectionResult::new(100_000.0);
        result.add_row(row(62, 50_000.0, 5_000.0, 120_000.0), true);
        result.add_row(row(63, 52_000.0, 5_500.0, 90_000.0), false);

        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.years_projected, 2);
        assert_eq!(result.total_gross_income, 102_000.0);
        assert_eq!(result.total_net_income, 91_500.0);
        assert_eq!(result.max_tsp_balance, 120_000.0);
        assert_eq!(result.final_tsp_balance, 90_000.0);
        assert!((result.average_tax_rate() - 10_500.0 / 102_000.0).abs() < 1e-12);
    }

    #[test]
    fn test_csv_export() {
        let mut result = ProjectionResult::new(0.0);
        result.add_row(row(62, 50_000.0, 5_000.0, 0.0), true);

        let mut buffer = Vec::new();
        result.write_csv(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("age,year,pensionIncome"));
        assert!(lines.next().unwrap().starts_with("62,2030,50000"));
    }
}
