use crate::domain::applicant::{ApplicantInput, Gender};
use anyhow::ensure;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

pub const AGE_RANGE: RangeInclusive<u32> = 20..=70;
pub const MIN_INCOME: f64 = 10_000.0;
pub const MIN_CREDIT_AMOUNT: f64 = 10_000.0;
pub const MIN_ANNUITY: f64 = 1_000.0;
pub const BUREAU_LOAN_COUNT_RANGE: RangeInclusive<u32> = 0..=20;
pub const EXT_SOURCE_RANGE: RangeInclusive<f64> = 0.0..=1.0;

/// Form fields as submitted. Anything left out takes the form's default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplicantForm {
    pub gender: Option<Gender>,
    pub age: Option<u32>,
    pub income: Option<f64>,
    pub loan_amount: Option<f64>,
    pub annuity: Option<f64>,
    pub bureau_count: Option<u32>,
    pub ext_source_2: Option<f64>,
    pub ext_source_3: Option<f64>,
}

impl ApplicantForm {
    pub const DEFAULT_AGE: u32 = 30;
    pub const DEFAULT_INCOME: f64 = 50_000.0;
    pub const DEFAULT_LOAN_AMOUNT: f64 = 250_000.0;
    pub const DEFAULT_ANNUITY: f64 = 15_000.0;
    pub const DEFAULT_BUREAU_COUNT: u32 = 2;
    pub const DEFAULT_EXT_SOURCE: f64 = 0.5;

    /// Applies defaults and enforces the ranges the form accepts.
    pub fn validate_and_into_input(self) -> anyhow::Result<ApplicantInput> {
        let age_years = self.age.unwrap_or(Self::DEFAULT_AGE);
        ensure!(
            AGE_RANGE.contains(&age_years),
            "age must be {}..={} (got {age_years})",
            AGE_RANGE.start(),
            AGE_RANGE.end()
        );

        let income = self.income.unwrap_or(Self::DEFAULT_INCOME);
        ensure!(
            income.is_finite() && income >= MIN_INCOME,
            "income must be at least {MIN_INCOME} (got {income})"
        );

        let credit_amount = self.loan_amount.unwrap_or(Self::DEFAULT_LOAN_AMOUNT);
        ensure!(
            credit_amount.is_finite() && credit_amount >= MIN_CREDIT_AMOUNT,
            "loan amount must be at least {MIN_CREDIT_AMOUNT} (got {credit_amount})"
        );

        let annuity = self.annuity.unwrap_or(Self::DEFAULT_ANNUITY);
        ensure!(
            annuity.is_finite() && annuity >= MIN_ANNUITY,
            "annuity must be at least {MIN_ANNUITY} (got {annuity})"
        );

        let bureau_loan_count = self.bureau_count.unwrap_or(Self::DEFAULT_BUREAU_COUNT);
        ensure!(
            BUREAU_LOAN_COUNT_RANGE.contains(&bureau_loan_count),
            "bureau loan count must be {}..={} (got {bureau_loan_count})",
            BUREAU_LOAN_COUNT_RANGE.start(),
            BUREAU_LOAN_COUNT_RANGE.end()
        );

        let ext_source_2 = self.ext_source_2.unwrap_or(Self::DEFAULT_EXT_SOURCE);
        ensure!(
            EXT_SOURCE_RANGE.contains(&ext_source_2),
            "ext_source_2 must be between 0 and 1 (got {ext_source_2})"
        );

        let ext_source_3 = self.ext_source_3.unwrap_or(Self::DEFAULT_EXT_SOURCE);
        ensure!(
            EXT_SOURCE_RANGE.contains(&ext_source_3),
            "ext_source_3 must be between 0 and 1 (got {ext_source_3})"
        );

        Ok(ApplicantInput {
            gender: self.gender.unwrap_or_default(),
            age_years,
            income,
            credit_amount,
            annuity,
            bureau_loan_count,
            ext_source_2,
            ext_source_3,
        })
    }
}
