use crate::decision::policy::Policy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Approve,
    Reject,
}

impl Verdict {
    pub fn from_score(score: f64, policy: &Policy) -> Self {
        if score > policy.reject_threshold {
            Verdict::Reject
        } else {
            Verdict::Approve
        }
    }

    pub fn risk_level(self) -> RiskLevel {
        match self {
            Verdict::Approve => RiskLevel::Low,
            Verdict::Reject => RiskLevel::High,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    High,
}
