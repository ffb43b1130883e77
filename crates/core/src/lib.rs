pub mod analysis;
pub mod decision;
pub mod domain;
pub mod features;
pub mod format;
pub mod render;
pub mod scoring;

pub mod config {
    use crate::decision::policy::Policy;
    use anyhow::Context;
    use std::path::PathBuf;

    const DEFAULT_MODEL_PATH: &str = "models/credit_risk_model.json";

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub model_path: PathBuf,
        pub sentry_dsn: Option<String>,
        pub reject_threshold: Option<f64>,
        pub safe_loan_income_multiplier: Option<f64>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                model_path: std::env::var("MODEL_PATH")
                    .ok()
                    .filter(|s| !s.trim().is_empty())
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH)),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
                reject_threshold: parse_env_f64("REJECT_THRESHOLD"),
                safe_loan_income_multiplier: parse_env_f64("SAFE_LOAN_INCOME_MULTIPLIER"),
            })
        }

        /// Default policy with any env overrides applied.
        pub fn policy(&self) -> anyhow::Result<Policy> {
            let mut policy = Policy::default();
            if let Some(v) = self.reject_threshold {
                policy.reject_threshold = v;
            }
            if let Some(v) = self.safe_loan_income_multiplier {
                policy.safe_loan_income_multiplier = v;
            }
            policy.validate().context("invalid decision policy override")?;
            Ok(policy)
        }
    }

    fn parse_env_f64(key: &str) -> Option<f64> {
        parse_f64_override(key, std::env::var(key).ok())
    }

    /// Unparseable values are ignored with a warning; the policy default stays in force.
    fn parse_f64_override(key: &str, raw: Option<String>) -> Option<f64> {
        let raw = raw?;
        match raw.trim().parse::<f64>() {
            Ok(v) => Some(v),
            Err(err) => {
                tracing::warn!(key, value = %raw, error = %err, "ignoring unparseable override");
                None
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn settings() -> Settings {
            Settings {
                model_path: PathBuf::from(DEFAULT_MODEL_PATH),
                sentry_dsn: None,
                reject_threshold: None,
                safe_loan_income_multiplier: None,
            }
        }

        #[test]
        fn policy_defaults_without_overrides() {
            let policy = settings().policy().unwrap();
            assert_eq!(policy, Policy::default());
        }

        #[test]
        fn policy_applies_overrides() {
            let s = Settings {
                reject_threshold: Some(0.3),
                safe_loan_income_multiplier: Some(4.0),
                ..settings()
            };
            let policy = s.policy().unwrap();
            assert_eq!(policy.reject_threshold, 0.3);
            assert_eq!(policy.safe_loan_income_multiplier, 4.0);
        }

        #[test]
        fn parses_overrides_and_ignores_garbage() {
            assert_eq!(
                parse_f64_override("REJECT_THRESHOLD", Some(" 0.3 ".into())),
                Some(0.3)
            );
            assert_eq!(parse_f64_override("REJECT_THRESHOLD", Some("0,3".into())), None);
            assert_eq!(parse_f64_override("REJECT_THRESHOLD", Some(String::new())), None);
            assert_eq!(parse_f64_override("REJECT_THRESHOLD", None), None);
        }

        #[test]
        fn policy_rejects_out_of_range_threshold() {
            let s = Settings {
                reject_threshold: Some(1.5),
                ..settings()
            };
            assert!(s.policy().is_err());
        }
    }
}
