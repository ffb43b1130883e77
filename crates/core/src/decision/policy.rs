use anyhow::ensure;
use serde::{Deserialize, Serialize};

pub const DEFAULT_REJECT_THRESHOLD: f64 = 0.45;
pub const DEFAULT_SAFE_LOAN_INCOME_MULTIPLIER: f64 = 2.5;

/// Lending policy knobs that sit outside the model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    /// Scores strictly above this are rejected.
    pub reject_threshold: f64,

    /// Largest loan suggested to a rejected applicant, as a multiple of annual income.
    pub safe_loan_income_multiplier: f64,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            reject_threshold: DEFAULT_REJECT_THRESHOLD,
            safe_loan_income_multiplier: DEFAULT_SAFE_LOAN_INCOME_MULTIPLIER,
        }
    }
}

impl Policy {
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            (0.0..=1.0).contains(&self.reject_threshold),
            "reject threshold must be between 0 and 1 (got {})",
            self.reject_threshold
        );
        ensure!(
            self.safe_loan_income_multiplier.is_finite() && self.safe_loan_income_multiplier > 0.0,
            "safe loan income multiplier must be positive (got {})",
            self.safe_loan_income_multiplier
        );
        Ok(())
    }

    pub fn safe_loan(&self, income: f64) -> f64 {
        income * self.safe_loan_income_multiplier
    }
}
