use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use tracing::info;

pub const FEATURE_COUNT: usize = 8;

/// Feature order expected by the model artifact.
pub type FeatureVector = [f64; FEATURE_COUNT];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Negative,
    Positive,
}

impl Outcome {
    /// Position of this class in the `predict_proba` output.
    pub fn index(self) -> usize {
        match self {
            Outcome::Negative => 0,
            Outcome::Positive => 1,
        }
    }
}

/// A fitted binary classifier, shared read-only across requests.
pub trait Classifier: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> Outcome;
    /// Class probabilities indexed by [`Outcome::index`].
    fn predict_proba(&self, features: &FeatureVector) -> [f64; 2];
}

/// On-disk form of the model artifact.
#[derive(Debug, Deserialize)]
struct Artifact {
    coefficients: Vec<f64>,
    intercept: f64,
}

#[derive(Debug, Clone)]
pub struct LogisticRegression {
    coefficients: FeatureVector,
    intercept: f64,
}

impl LogisticRegression {
    pub fn new(coefficients: FeatureVector, intercept: f64) -> anyhow::Result<Self> {
        anyhow::ensure!(
            coefficients.iter().all(|c| c.is_finite()) && intercept.is_finite(),
            "model parameters must be finite"
        );
        Ok(Self {
            coefficients,
            intercept,
        })
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read model artifact {}", path.display()))?;
        let model = Self::from_json(&raw)
            .with_context(|| format!("parse model artifact {}", path.display()))?;
        info!(path = %path.display(), "model artifact loaded");
        Ok(model)
    }

    fn from_json(raw: &str) -> anyhow::Result<Self> {
        let artifact: Artifact = serde_json::from_str(raw)?;
        let coefficients: FeatureVector = artifact.coefficients.try_into().map_err(|v: Vec<f64>| {
            anyhow::anyhow!("expected {FEATURE_COUNT} coefficients, found {}", v.len())
        })?;
        Self::new(coefficients, artifact.intercept)
    }

    fn decision(&self, features: &FeatureVector) -> f64 {
        self.coefficients
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept
    }
}

impl Classifier for LogisticRegression {
    fn predict(&self, features: &FeatureVector) -> Outcome {
        if self.decision(features) > 0.0 {
            Outcome::Positive
        } else {
            Outcome::Negative
        }
    }

    fn predict_proba(&self, features: &FeatureVector) -> [f64; 2] {
        let p = 1.0 / (1.0 + (-self.decision(features)).exp());
        [1.0 - p, p]
    }
}
