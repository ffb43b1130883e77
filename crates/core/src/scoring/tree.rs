//! Gradient-boosted tree ensembles read from LightGBM's JSON model dump
//! (`Booster.dump_model()`).
//!
//! Only numerical `<=` splits on single-output models are supported. The raw score is the
//! sum of one leaf per tree; binary objectives map it through `1 / (1 + exp(-k * raw))`.

use crate::features::{FeatureRow, FeatureSchema};
use crate::scoring::error::ModelArtifactError;
use crate::scoring::Scorer;
use anyhow::{bail, ensure, Context};
use serde::Deserialize;
use std::path::Path;

/// LightGBM treats anything this close to zero as zero for `missing_type: "Zero"`.
const ZERO_THRESHOLD: f64 = 1e-35;

#[derive(Debug, Deserialize)]
struct DumpedModel {
    #[serde(default = "default_num_class")]
    num_class: u32,
    #[serde(default)]
    objective: Option<String>,
    feature_names: Vec<String>,
    tree_info: Vec<DumpedTree>,
}

fn default_num_class() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
struct DumpedTree {
    tree_structure: TreeNode,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TreeNode {
    Split(SplitNode),
    Leaf(LeafNode),
}

#[derive(Debug, Deserialize)]
struct SplitNode {
    split_feature: usize,
    threshold: f64,
    #[serde(default = "default_decision_type")]
    decision_type: String,
    #[serde(default = "default_true")]
    default_left: bool,
    #[serde(default)]
    missing_type: MissingType,
    left_child: Box<TreeNode>,
    right_child: Box<TreeNode>,
}

fn default_decision_type() -> String {
    "<=".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct LeafNode {
    leaf_value: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
enum MissingType {
    #[default]
    None,
    Zero,
    NaN,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Link {
    Sigmoid(f64),
}

impl Link {
    fn parse(objective: Option<&str>) -> anyhow::Result<Self> {
        let objective = objective.unwrap_or("binary");
        let mut parts = objective.split_whitespace();
        let name = parts.next().unwrap_or_default();
        match name {
            "binary" => {
                let mut scale = 1.0;
                for part in parts {
                    if let Some(v) = part.strip_prefix("sigmoid:") {
                        scale = v
                            .parse::<f64>()
                            .with_context(|| format!("invalid sigmoid scale: {v}"))?;
                    }
                }
                ensure!(scale > 0.0, "sigmoid scale must be positive (got {scale})");
                Ok(Link::Sigmoid(scale))
            }
            "cross_entropy" | "xentropy" => Ok(Link::Sigmoid(1.0)),
            other => bail!("unsupported objective for a default classifier: {other}"),
        }
    }

    fn apply(self, raw: f64) -> f64 {
        match self {
            Link::Sigmoid(k) => 1.0 / (1.0 + (-k * raw).exp()),
        }
    }
}

#[derive(Debug)]
pub struct TreeEnsembleModel {
    schema: FeatureSchema,
    trees: Vec<TreeNode>,
    link: Link,
}

impl TreeEnsembleModel {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let artifact_error = |stage: &'static str, detail: String| ModelArtifactError {
            path: path.to_path_buf(),
            stage,
            detail,
        };

        let text =
            std::fs::read_to_string(path).map_err(|e| artifact_error("read", e.to_string()))?;
        let dump = serde_json::from_str::<DumpedModel>(&text)
            .map_err(|e| artifact_error("parse", e.to_string()))?;
        let model =
            Self::from_dump(dump).map_err(|e| artifact_error("validate", format!("{e:#}")))?;

        tracing::info!(
            path = %path.display(),
            trees = model.num_trees(),
            features = model.schema.len(),
            "model loaded"
        );
        Ok(model)
    }

    pub fn from_json_str(text: &str) -> anyhow::Result<Self> {
        let dump = serde_json::from_str::<DumpedModel>(text)
            .context("model JSON does not match the tree dump format")?;
        Self::from_dump(dump)
    }

    fn from_dump(dump: DumpedModel) -> anyhow::Result<Self> {
        ensure!(
            dump.num_class == 1,
            "only single-output models are supported (num_class={})",
            dump.num_class
        );
        ensure!(!dump.tree_info.is_empty(), "model has no trees");

        let schema = FeatureSchema::new(dump.feature_names)?;
        let link = Link::parse(dump.objective.as_deref())?;

        let mut trees = Vec::with_capacity(dump.tree_info.len());
        for (i, tree) in dump.tree_info.into_iter().enumerate() {
            validate_node(&tree.tree_structure, schema.len())
                .with_context(|| format!("invalid tree {i}"))?;
            trees.push(tree.tree_structure);
        }

        Ok(Self {
            schema,
            trees,
            link,
        })
    }

    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }

    fn raw_score(&self, values: &[f64]) -> f64 {
        self.trees.iter().map(|tree| leaf_value(tree, values)).sum()
    }
}

impl Scorer for TreeEnsembleModel {
    fn feature_names(&self) -> &FeatureSchema {
        &self.schema
    }

    fn predict(&self, row: &FeatureRow) -> anyhow::Result<f64> {
        ensure!(
            row.schema().same_as(&self.schema),
            "row was not built from this model's feature schema"
        );
        Ok(self.link.apply(self.raw_score(row.values())))
    }
}

fn validate_node(node: &TreeNode, num_features: usize) -> anyhow::Result<()> {
    let mut stack = vec![node];
    while let Some(node) = stack.pop() {
        match node {
            TreeNode::Leaf(leaf) => {
                ensure!(leaf.leaf_value.is_finite(), "leaf value must be finite");
            }
            TreeNode::Split(split) => {
                ensure!(
                    split.split_feature < num_features,
                    "split_feature {} out of range (features={num_features})",
                    split.split_feature
                );
                ensure!(
                    split.decision_type == "<=",
                    "unsupported decision_type {:?}",
                    split.decision_type
                );
                stack.push(&split.left_child);
                stack.push(&split.right_child);
            }
        }
    }
    Ok(())
}

fn leaf_value(root: &TreeNode, values: &[f64]) -> f64 {
    let mut node = root;
    loop {
        match node {
            TreeNode::Leaf(leaf) => return leaf.leaf_value,
            TreeNode::Split(split) => {
                node = if goes_left(split, values[split.split_feature]) {
                    split.left_child.as_ref()
                } else {
                    split.right_child.as_ref()
                };
            }
        }
    }
}

fn goes_left(split: &SplitNode, value: f64) -> bool {
    let value = if value.is_nan() && split.missing_type != MissingType::NaN {
        0.0
    } else {
        value
    };

    let is_missing = match split.missing_type {
        MissingType::None => false,
        MissingType::Zero => value > -ZERO_THRESHOLD && value <= ZERO_THRESHOLD,
        MissingType::NaN => value.is_nan(),
    };
    if is_missing {
        return split.default_left;
    }

    value <= split.threshold
}
