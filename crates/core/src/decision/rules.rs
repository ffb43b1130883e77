//! Ordered rule tables behind the decision explanation.
//!
//! Findings are evaluated independently and every match is reported. Remediations are
//! evaluated in order and only the first match is used; the last entry always matches.

use crate::decision::policy::Policy;
use crate::features::{columns, FeatureRow};
use crate::format::format_money;
use serde::{Deserialize, Serialize};

pub const MIN_CREDIT_SCORE: f64 = 0.5;
pub const MAX_ACTIVE_LOANS: f64 = 5.0;
pub const MAX_DEBT_TO_INCOME: f64 = 3.0;

pub const HEALTHY_DEBT_TO_INCOME: f64 = 2.0;
pub const LOW_BURDEN_MAX_LOANS: f64 = 2.0;

pub const HIGH_INCOME: f64 = 100_000.0;
pub const RECOVERABLE_CREDIT_SCORE: f64 = 0.6;

/// Values the rules look at, read from an assembled row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Facts {
    pub income: f64,
    pub credit_amount: f64,
    pub ext_source_2: f64,
    pub bureau_loan_count: f64,
    pub debt_to_income: f64,
    pub safe_loan: f64,
}

impl Facts {
    /// Columns the schema lacks read as zero, same as the ghost row.
    pub fn from_row(row: &FeatureRow, policy: &Policy) -> Self {
        let read = |name: &str| row.get(name).unwrap_or(0.0);
        let income = read(columns::AMT_INCOME_TOTAL);
        let credit_amount = read(columns::AMT_CREDIT);

        Self {
            income,
            credit_amount,
            ext_source_2: read(columns::EXT_SOURCE_2),
            bureau_loan_count: read(columns::BUREAU_LOAN_COUNT),
            debt_to_income: debt_to_income(credit_amount, income),
            safe_loan: policy.safe_loan(income),
        }
    }
}

/// Requested credit over annual income, with the same `+ 1` guard as `CREDIT_TERM`.
pub fn debt_to_income(credit_amount: f64, income: f64) -> f64 {
    credit_amount / (income + 1.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    LowCreditScore,
    NoCreditHistory,
    TooManyActiveLoans,
    HighDebtToIncome,
    StrongCreditScore,
    HealthyDebtRatio,
    LowDebtBurden,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub kind: FindingKind,
    pub message: String,
}

pub struct FindingRule {
    pub kind: FindingKind,
    pub applies: fn(&Facts) -> bool,
    pub message: fn(&Facts) -> String,
}

impl FindingRule {
    pub fn evaluate(&self, facts: &Facts) -> Option<Finding> {
        (self.applies)(facts).then(|| Finding {
            kind: self.kind,
            message: (self.message)(facts),
        })
    }
}

pub static REJECT_FINDINGS: &[FindingRule] = &[
    FindingRule {
        kind: FindingKind::LowCreditScore,
        applies: |f| f.ext_source_2 < MIN_CREDIT_SCORE,
        message: |f| {
            format!(
                "Credit Score is too low ({:.2}). Banks usually require at least {MIN_CREDIT_SCORE}.",
                f.ext_source_2
            )
        },
    },
    FindingRule {
        kind: FindingKind::NoCreditHistory,
        applies: |f| f.bureau_loan_count == 0.0,
        message: |_| {
            "No Credit History: You have 0 past loans. Banks prefer customers with a track record."
                .to_string()
        },
    },
    FindingRule {
        kind: FindingKind::TooManyActiveLoans,
        applies: |f| f.bureau_loan_count > MAX_ACTIVE_LOANS,
        message: |f| {
            format!(
                "Too many active loans ({:.0}). This indicates high existing debt.",
                f.bureau_loan_count
            )
        },
    },
    FindingRule {
        kind: FindingKind::HighDebtToIncome,
        applies: |f| f.debt_to_income > MAX_DEBT_TO_INCOME,
        message: |f| {
            format!(
                "Loan amount is too high compared to income ({:.1}x your salary).",
                f.debt_to_income
            )
        },
    },
];

pub static APPROVE_FINDINGS: &[FindingRule] = &[
    FindingRule {
        kind: FindingKind::StrongCreditScore,
        applies: |f| f.ext_source_2 >= MIN_CREDIT_SCORE,
        message: |f| format!("Strong Credit Score ({:.2}).", f.ext_source_2),
    },
    FindingRule {
        kind: FindingKind::HealthyDebtRatio,
        applies: |f| f.debt_to_income < HEALTHY_DEBT_TO_INCOME,
        message: |_| "Healthy Debt Ratio: The loan is affordable for your income.".to_string(),
    },
    FindingRule {
        kind: FindingKind::LowDebtBurden,
        applies: |f| f.bureau_loan_count <= LOW_BURDEN_MAX_LOANS,
        message: |_| "Low Debt Burden: You don't have many other loans.".to_string(),
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemediationKind {
    ImproveScoreBeforeReapplying,
    ReduceLoanAmount,
    ImproveCreditHistory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Remediation {
    pub kind: RemediationKind,
    pub headline: String,
    pub steps: Vec<String>,
    pub suggested_loan_amount: Option<f64>,
}

pub struct RemediationRule {
    pub kind: RemediationKind,
    pub applies: fn(&Facts) -> bool,
    pub advice: fn(&Facts) -> Remediation,
}

impl RemediationRule {
    pub fn evaluate(&self, facts: &Facts) -> Option<Remediation> {
        (self.applies)(facts).then(|| (self.advice)(facts))
    }
}

pub static REMEDIATIONS: &[RemediationRule] = &[
    RemediationRule {
        kind: RemediationKind::ImproveScoreBeforeReapplying,
        applies: |f| f.income > HIGH_INCOME && f.ext_source_2 < RECOVERABLE_CREDIT_SCORE,
        advice: |_| Remediation {
            kind: RemediationKind::ImproveScoreBeforeReapplying,
            headline: "You have high income, but your Credit Score is hurting you.".to_string(),
            steps: vec![
                "The model relies 70% on Credit Score and only 10% on Income.".to_string(),
                "Solution: Wait 6 months to improve your score before applying.".to_string(),
            ],
            suggested_loan_amount: None,
        },
    },
    RemediationRule {
        kind: RemediationKind::ReduceLoanAmount,
        applies: |f| f.credit_amount > f.safe_loan,
        advice: |f| Remediation {
            kind: RemediationKind::ReduceLoanAmount,
            headline: format!(
                "To improve your chances, consider reducing the loan amount to {}.",
                format_money(f.safe_loan)
            ),
            steps: Vec::new(),
            suggested_loan_amount: Some(f.safe_loan),
        },
    },
    RemediationRule {
        kind: RemediationKind::ImproveCreditHistory,
        applies: |_| true,
        advice: |_| Remediation {
            kind: RemediationKind::ImproveCreditHistory,
            headline: "Your financial ratios look okay. The issue is likely your Credit History."
                .to_string(),
            steps: vec![format!(
                "Solution: Add a co-signer with a better Credit Score (Ext_Source_2 > {RECOVERABLE_CREDIT_SCORE})."
            )],
            suggested_loan_amount: None,
        },
    },
];

pub fn collect_findings(rules: &[FindingRule], facts: &Facts) -> Vec<Finding> {
    rules.iter().filter_map(|rule| rule.evaluate(facts)).collect()
}

pub fn select_remediation(facts: &Facts) -> Option<Remediation> {
    REMEDIATIONS.iter().find_map(|rule| rule.evaluate(facts))
}
