use crate::decision::policy::Policy;
use crate::decision::rules::{self, Facts, Finding, Remediation};
use crate::decision::verdict::{RiskLevel, Verdict};
use crate::features::FeatureRow;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub verdict: Verdict,
    pub risk_level: RiskLevel,
    pub probability: f64,
    pub debt_to_income: f64,
    pub findings: Vec<Finding>,
    /// Present only on rejection.
    pub remediation: Option<Remediation>,
}

#[derive(Debug, Clone, Default)]
pub struct Explainer {
    policy: Policy,
}

impl Explainer {
    pub fn new(policy: Policy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn explain(&self, row: &FeatureRow, score: f64) -> Explanation {
        let verdict = Verdict::from_score(score, &self.policy);
        let facts = Facts::from_row(row, &self.policy);

        let (findings, remediation) = match verdict {
            Verdict::Reject => (
                rules::collect_findings(rules::REJECT_FINDINGS, &facts),
                rules::select_remediation(&facts),
            ),
            Verdict::Approve => (rules::collect_findings(rules::APPROVE_FINDINGS, &facts), None),
        };

        Explanation {
            verdict,
            risk_level: verdict.risk_level(),
            probability: score,
            debt_to_income: facts.debt_to_income,
            findings,
            remediation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::rules::{FindingKind, RemediationKind};
    use crate::features::{columns, FeatureSchema};

    fn row(income: f64, credit: f64, ext_source_2: f64, bureau: f64) -> FeatureRow {
        let schema = FeatureSchema::new([
            columns::AMT_INCOME_TOTAL,
            columns::AMT_CREDIT,
            columns::EXT_SOURCE_2,
            columns::BUREAU_LOAN_COUNT,
        ])
        .unwrap();
        let mut row = schema.zeroed_row();
        row.set(columns::AMT_INCOME_TOTAL, income);
        row.set(columns::AMT_CREDIT, credit);
        row.set(columns::EXT_SOURCE_2, ext_source_2);
        row.set(columns::BUREAU_LOAN_COUNT, bureau);
        row
    }

    fn kinds(e: &Explanation) -> Vec<FindingKind> {
        e.findings.iter().map(|f| f.kind).collect()
    }

    #[test]
    fn rejected_applicant_gets_every_matching_reason() {
        let e = Explainer::default().explain(&row(50_000.0, 250_000.0, 0.3, 0.0), 0.8);
        assert_eq!(e.verdict, Verdict::Reject);
        assert_eq!(e.risk_level, RiskLevel::High);
        assert_eq!(
            kinds(&e),
            vec![
                FindingKind::LowCreditScore,
                FindingKind::NoCreditHistory,
                FindingKind::HighDebtToIncome,
            ]
        );
        assert!(e.findings[0].message.contains("(0.30)"));
        assert!(e.findings[2].message.contains("(5.0x"));
        assert!((e.debt_to_income - 250_000.0 / 50_001.0).abs() < 1e-12);

        let r = e.remediation.unwrap();
        assert_eq!(r.kind, RemediationKind::ReduceLoanAmount);
        assert_eq!(r.suggested_loan_amount, Some(125_000.0));
    }

    #[test]
    fn approved_applicant_gets_strengths_and_no_remediation() {
        let e = Explainer::default().explain(&row(120_000.0, 150_000.0, 0.7, 1.0), 0.2);
        assert_eq!(e.verdict, Verdict::Approve);
        assert_eq!(e.risk_level, RiskLevel::Low);
        assert_eq!(
            kinds(&e),
            vec![
                FindingKind::StrongCreditScore,
                FindingKind::HealthyDebtRatio,
                FindingKind::LowDebtBurden,
            ]
        );
        assert!(e.remediation.is_none());
    }

    #[test]
    fn score_at_threshold_is_approved() {
        let e = Explainer::default().explain(&row(50_000.0, 250_000.0, 0.3, 0.0), 0.45);
        assert_eq!(e.verdict, Verdict::Approve);
        assert!(e.remediation.is_none());
        assert!(kinds(&e).is_empty());
    }

    #[test]
    fn reject_always_carries_exactly_one_remediation() {
        let explainer = Explainer::default();
        let cases = [
            (150_000.0, 200_000.0, 0.4, 3.0),
            (50_000.0, 500_000.0, 0.9, 3.0),
            (80_000.0, 100_000.0, 0.7, 3.0),
        ];
        let expected = [
            RemediationKind::ImproveScoreBeforeReapplying,
            RemediationKind::ReduceLoanAmount,
            RemediationKind::ImproveCreditHistory,
        ];
        for ((income, credit, ext, bureau), kind) in cases.into_iter().zip(expected) {
            let e = explainer.explain(&row(income, credit, ext, bureau), 0.9);
            assert_eq!(e.remediation.map(|r| r.kind), Some(kind));
        }
    }

    #[test]
    fn safe_loan_multiplier_comes_from_policy() {
        let explainer = Explainer::new(Policy {
            safe_loan_income_multiplier: 4.0,
            ..Default::default()
        });
        // 250_000 is under 50_000 * 4, so no loan cap is suggested.
        let e = explainer.explain(&row(50_000.0, 250_000.0, 0.7, 3.0), 0.9);
        assert_eq!(
            e.remediation.map(|r| r.kind),
            Some(RemediationKind::ImproveCreditHistory)
        );
    }

    #[test]
    fn missing_columns_read_as_zero() {
        let schema = FeatureSchema::new([columns::AMT_CREDIT]).unwrap();
        let mut row = schema.zeroed_row();
        row.set(columns::AMT_CREDIT, 20_000.0);
        let e = Explainer::default().explain(&row, 0.9);
        assert_eq!(
            kinds(&e),
            vec![
                FindingKind::LowCreditScore,
                FindingKind::NoCreditHistory,
                FindingKind::HighDebtToIncome,
            ]
        );
    }
}
