use crate::decision::{Explainer, Explanation, Policy};
use crate::domain::applicant::ApplicantInput;
use crate::features::{self, FeatureRow};
use crate::scoring::Scorer;
use anyhow::{ensure, Context};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub analysis_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    pub input: ApplicantInput,
    #[serde(flatten)]
    pub explanation: Explanation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<FeatureRow>,
}

/// Runs one applicant through assembly, scoring and explanation.
///
/// Holds only the shared model and the policy; each call is independent.
#[derive(Clone)]
pub struct Analyzer {
    scorer: Arc<dyn Scorer>,
    explainer: Explainer,
}

impl Analyzer {
    pub fn new(scorer: Arc<dyn Scorer>, policy: Policy) -> Self {
        Self {
            scorer,
            explainer: Explainer::new(policy),
        }
    }

    pub fn scorer(&self) -> &dyn Scorer {
        self.scorer.as_ref()
    }

    pub fn policy(&self) -> &Policy {
        self.explainer.policy()
    }

    pub fn analyze(&self, input: &ApplicantInput) -> anyhow::Result<AnalysisReport> {
        let row = features::assemble(self.scorer.feature_names(), input);
        let score = self.scorer.predict(&row).context("model prediction failed")?;
        ensure!(
            score.is_finite() && (0.0..=1.0).contains(&score),
            "model returned a score outside [0, 1]: {score}"
        );

        let explanation = self.explainer.explain(&row, score);
        let report = AnalysisReport {
            analysis_id: Uuid::new_v4(),
            analyzed_at: Utc::now(),
            input: input.clone(),
            explanation,
            features: None,
        };

        tracing::info!(
            analysis_id = %report.analysis_id,
            probability = score,
            verdict = ?report.explanation.verdict,
            findings = report.explanation.findings.len(),
            "applicant analyzed"
        );
        Ok(report)
    }

    /// Same as [`Analyzer::analyze`], with the assembled row attached to the report.
    pub fn analyze_with_features(&self, input: &ApplicantInput) -> anyhow::Result<AnalysisReport> {
        let mut report = self.analyze(input)?;
        report.features = Some(features::assemble(self.scorer.feature_names(), input));
        Ok(report)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::decision::rules::RemediationKind;
    use crate::decision::Verdict;
    use crate::domain::applicant::Gender;
    use crate::features::{columns, FeatureSchema};
    use std::sync::Mutex;

    /// Returns a fixed score and remembers the rows it was asked about.
    pub(crate) struct FixedScorer {
        schema: FeatureSchema,
        score: f64,
        seen: Mutex<Vec<Vec<f64>>>,
    }

    impl FixedScorer {
        pub(crate) fn new(score: f64) -> Self {
            Self {
                schema: FeatureSchema::new([
                    "SK_ID_CURR",
                    columns::AMT_INCOME_TOTAL,
                    columns::AMT_CREDIT,
                    columns::AMT_ANNUITY,
                    columns::DAYS_BIRTH,
                    columns::EXT_SOURCE_2,
                    columns::EXT_SOURCE_3,
                    columns::BUREAU_LOAN_COUNT,
                    columns::CREDIT_TERM,
                ])
                .unwrap(),
                score,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl Scorer for FixedScorer {
        fn feature_names(&self) -> &FeatureSchema {
            &self.schema
        }

        fn predict(&self, row: &FeatureRow) -> anyhow::Result<f64> {
            self.seen.lock().unwrap().push(row.values().to_vec());
            Ok(self.score)
        }
    }

    pub(crate) fn applicant() -> ApplicantInput {
        ApplicantInput {
            gender: Gender::Female,
            age_years: 30,
            income: 50_000.0,
            credit_amount: 250_000.0,
            annuity: 15_000.0,
            bureau_loan_count: 0,
            ext_source_2: 0.3,
            ext_source_3: 0.5,
        }
    }

    #[test]
    fn scores_the_assembled_row() {
        let scorer = Arc::new(FixedScorer::new(0.7));
        let analyzer = Analyzer::new(scorer.clone(), Policy::default());
        let report = analyzer.analyze(&applicant()).unwrap();

        assert_eq!(report.explanation.verdict, Verdict::Reject);
        assert_eq!(
            report.explanation.remediation.map(|r| r.kind),
            Some(RemediationKind::ReduceLoanAmount)
        );

        let seen = scorer.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0][0], 0.0);
        assert_eq!(seen[0][4], -10_950.0);
        assert_eq!(seen[0][8], 250_000.0 / 15_001.0);
    }

    #[test]
    fn runs_are_independent() {
        let analyzer = Analyzer::new(Arc::new(FixedScorer::new(0.2)), Policy::default());
        let a = analyzer.analyze(&applicant()).unwrap();
        let b = analyzer.analyze(&applicant()).unwrap();
        assert_ne!(a.analysis_id, b.analysis_id);
        assert_eq!(a.explanation, b.explanation);
    }

    #[test]
    fn rejects_out_of_range_scores() {
        let analyzer = Analyzer::new(Arc::new(FixedScorer::new(1.2)), Policy::default());
        assert!(analyzer.analyze(&applicant()).is_err());

        let analyzer = Analyzer::new(Arc::new(FixedScorer::new(f64::NAN)), Policy::default());
        assert!(analyzer.analyze(&applicant()).is_err());
    }

    #[test]
    fn report_serializes_flat_explanation() {
        let analyzer = Analyzer::new(Arc::new(FixedScorer::new(0.2)), Policy::default());
        let report = analyzer.analyze_with_features(&applicant()).unwrap();
        let v = serde_json::to_value(&report).unwrap();
        assert_eq!(v["verdict"], "approve");
        assert_eq!(v["risk_level"], "Low");
        assert_eq!(v["features"]["DAYS_BIRTH"], -10950.0);
        assert!(v["remediation"].is_null());
    }
}
