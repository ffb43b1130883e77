pub mod explain;
pub mod policy;
pub mod rules;
pub mod verdict;

pub use explain::{Explainer, Explanation};
pub use policy::Policy;
pub use verdict::{RiskLevel, Verdict};
