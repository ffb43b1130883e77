use crate::features::{FeatureRow, FeatureSchema};

pub mod error;
pub mod tree;

pub use tree::TreeEnsembleModel;

/// A trained binary classifier the analysis can score rows with.
///
/// Implementations are loaded once and shared read-only, so `predict` takes `&self`.
pub trait Scorer: Send + Sync {
    /// Columns the model was trained on, in training order.
    fn feature_names(&self) -> &FeatureSchema;

    /// Probability of default for one row built from `feature_names()`.
    fn predict(&self, row: &FeatureRow) -> anyhow::Result<f64>;
}
