use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Gender {
    #[default]
    #[serde(alias = "male", alias = "MALE")]
    Male,
    #[serde(alias = "female", alias = "FEMALE")]
    Female,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => f.write_str("Male"),
            Gender::Female => f.write_str("Female"),
        }
    }
}

impl std::str::FromStr for Gender {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            other => anyhow::bail!("unknown gender: {other}"),
        }
    }
}

/// Applicant attributes as entered on the form, already range-checked by the surface.
///
/// `ext_source_2` and `ext_source_3` are the two third-party credit scores; the explainer
/// reasons about `ext_source_2` only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantInput {
    /// Not used by scoring.
    pub gender: Gender,
    pub age_years: u32,
    pub income: f64,
    pub credit_amount: f64,
    pub annuity: f64,
    pub bureau_loan_count: u32,
    pub ext_source_2: f64,
    pub ext_source_3: f64,
}
