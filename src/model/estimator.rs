//! Estimator families that can live inside a model artifact
//!
//! Weights are stored as plain JSON arrays and scored on candle tensors.

use crate::errors::{RiskError, Result};
use candle_core::{Device, Tensor, D};
use serde::{Deserialize, Serialize};

/// Pluggable classifier backend
pub trait Estimator: Send + Sync {
    /// Class probabilities for one encoded row, in artifact class order
    fn predict_proba(&self, x: &[f64]) -> Result<Vec<f64>>;

    /// Backend type identifier
    fn kind(&self) -> &'static str;

    /// Check dimensions against the encoded width and class count
    fn validate(&self, width: usize, n_classes: usize) -> Result<()>;
}

/// Multinomial logistic regression: softmax over one linear score per class
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticModel {
    /// One row per class, one column per encoded feature
    pub coefficients: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
}

impl LogisticModel {
    /// Per-class scores `W x + b`, shape (n_classes,)
    fn logits(&self, x: &[f64], device: &Device) -> Result<Tensor> {
        let n_classes = self.coefficients.len();
        let weights = Tensor::from_vec(self.coefficients.concat(), (n_classes, x.len()), device)?;
        let bias = Tensor::from_slice(&self.intercepts, n_classes, device)?;
        let row = Tensor::from_slice(x, (x.len(), 1), device)?;
        Ok(weights.matmul(&row)?.squeeze(1)?.add(&bias)?)
    }
}

impl Estimator for LogisticModel {
    fn predict_proba(&self, x: &[f64]) -> Result<Vec<f64>> {
        let logits = self.logits(x, &Device::Cpu)?;
        let probs = candle_nn::ops::softmax(&logits, D::Minus1)?;
        Ok(probs.to_vec1::<f64>()?)
    }

    fn kind(&self) -> &'static str {
        "logistic"
    }

    fn validate(&self, width: usize, n_classes: usize) -> Result<()> {
        if self.coefficients.len() != n_classes {
            return Err(RiskError::ArtifactInvalid(format!(
                "logistic model has {} coefficient rows for {} classes",
                self.coefficients.len(),
                n_classes
            )));
        }
        if self.intercepts.len() != n_classes {
            return Err(RiskError::ArtifactInvalid(format!(
                "logistic model has {} intercepts for {} classes",
                self.intercepts.len(),
                n_classes
            )));
        }
        if let Some((i, row)) = self
            .coefficients
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != width)
        {
            return Err(RiskError::ArtifactInvalid(format!(
                "coefficient row {} has {} columns, encoded width is {}",
                i,
                row.len(),
                width
            )));
        }
        let all_finite = self
            .coefficients
            .iter()
            .flatten()
            .chain(&self.intercepts)
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(RiskError::ArtifactInvalid(
                "logistic model contains non-finite weights".to_string(),
            ));
        }
        Ok(())
    }
}

/// One node of a decision tree
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    /// `x[feature] <= threshold` goes left, otherwise right
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Per-class sample counts (or weights) reaching this leaf
    Leaf { value: Vec<f64> },
}

/// A decision tree; node 0 is the root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Raw class weights of the leaf `x` lands in
    fn leaf(&self, x: &[f64]) -> &[f64] {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if x[*feature] <= *threshold { *left } else { *right };
                }
                TreeNode::Leaf { value } => return value,
            }
        }
    }

    fn validate(&self, tree: usize, width: usize, n_classes: usize) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(RiskError::ArtifactInvalid(format!("tree {} has no nodes", tree)));
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= width {
                        return Err(RiskError::ArtifactInvalid(format!(
                            "tree {} node {} splits on feature {} (width {})",
                            tree, idx, feature, width
                        )));
                    }
                    if !threshold.is_finite() {
                        return Err(RiskError::ArtifactInvalid(format!(
                            "tree {} node {} has a non-finite threshold",
                            tree, idx
                        )));
                    }
                    // Children must come after their parent, which rules out cycles.
                    for child in [*left, *right] {
                        if child <= idx || child >= self.nodes.len() {
                            return Err(RiskError::ArtifactInvalid(format!(
                                "tree {} node {} has invalid child {}",
                                tree, idx, child
                            )));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if value.len() != n_classes {
                        return Err(RiskError::ArtifactInvalid(format!(
                            "tree {} leaf {} has {} values for {} classes",
                            tree,
                            idx,
                            value.len(),
                            n_classes
                        )));
                    }
                    let total: f64 = value.iter().sum();
                    if value.iter().any(|v| !v.is_finite() || *v < 0.0) || total <= 0.0 {
                        return Err(RiskError::ArtifactInvalid(format!(
                            "tree {} leaf {} has an unusable class distribution",
                            tree, idx
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Random forest: mean of the per-tree leaf class distributions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestModel {
    pub trees: Vec<DecisionTree>,
}

impl Estimator for ForestModel {
    fn predict_proba(&self, x: &[f64]) -> Result<Vec<f64>> {
        let n_classes = self.trees.first().map_or(0, |t| t.leaf(x).len());
        let leaves: Vec<f64> = self
            .trees
            .iter()
            .flat_map(|tree| tree.leaf(x).iter().copied())
            .collect();

        // (n_trees, n_classes): normalise each row, then average over trees
        let counts = Tensor::from_vec(leaves, (self.trees.len(), n_classes), &Device::Cpu)?;
        let dist = counts.broadcast_div(&counts.sum_keepdim(1)?)?;
        Ok(dist.mean(0)?.to_vec1::<f64>()?)
    }

    fn kind(&self) -> &'static str {
        "forest"
    }

    fn validate(&self, width: usize, n_classes: usize) -> Result<()> {
        if self.trees.is_empty() {
            return Err(RiskError::ArtifactInvalid("forest has no trees".to_string()));
        }
        self.trees
            .iter()
            .enumerate()
            .try_for_each(|(i, tree)| tree.validate(i, width, n_classes))
    }
}

/// Estimator stored in the artifact, tagged by `type`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EstimatorSpec {
    Logistic(LogisticModel),
    Forest(ForestModel),
}

impl Estimator for EstimatorSpec {
    fn predict_proba(&self, x: &[f64]) -> Result<Vec<f64>> {
        match self {
            EstimatorSpec::Logistic(m) => m.predict_proba(x),
            EstimatorSpec::Forest(m) => m.predict_proba(x),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            EstimatorSpec::Logistic(m) => m.kind(),
            EstimatorSpec::Forest(m) => m.kind(),
        }
    }

    fn validate(&self, width: usize, n_classes: usize) -> Result<()> {
        match self {
            EstimatorSpec::Logistic(m) => m.validate(width, n_classes),
            EstimatorSpec::Forest(m) => m.validate(width, n_classes),
        }
    }
}
