use serde::{Deserialize, Serialize};

use super::tree::Tree;

/// How tree outputs combine into one prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Estimator {
    /// Mean of all tree outputs.
    RandomForest { trees: Vec<Tree> },
    /// `init + learning_rate * sum(tree outputs)`.
    GradientBoosting {
        init: f64,
        learning_rate: f64,
        trees: Vec<Tree>,
    },
}

impl Estimator {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RandomForest { .. } => "random_forest",
            Self::GradientBoosting { .. } => "gradient_boosting",
        }
    }

    pub fn trees(&self) -> &[Tree] {
        match self {
            Self::RandomForest { trees } | Self::GradientBoosting { trees, .. } => trees,
        }
    }

    pub fn validate(&self, width: usize) -> Result<(), String> {
        if self.trees().is_empty() {
            return Err(format!("{} has no trees", self.kind()));
        }
        if let Self::GradientBoosting {
            init,
            learning_rate,
            ..
        } = self
        {
            if !init.is_finite() || !learning_rate.is_finite() {
                return Err("gradient boosting init and learning_rate must be finite".to_string());
            }
        }
        for (i, tree) in self.trees().iter().enumerate() {
            tree.validate(width).map_err(|e| format!("tree {}: {}", i, e))?;
        }
        Ok(())
    }

    /// Predict for one encoded row. The estimator must have been validated.
    pub fn evaluate(&self, x: &[f64]) -> f64 {
        match self {
            Self::RandomForest { trees } => {
                let total: f64 = trees.iter().map(|t| t.evaluate(x)).sum();
                total / trees.len() as f64
            }
            Self::GradientBoosting {
                init,
                learning_rate,
                trees,
            } => {
                let total: f64 = trees.iter().map(|t| t.evaluate(x)).sum();
                init + learning_rate * total
            }
        }
    }
}
