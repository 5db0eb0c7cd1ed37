use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{Dimension, MetricRecord};

/// Per-dimension triggers. Toxicity triggers at or above its threshold; the other three
/// trigger strictly below theirs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewriteThresholds {
    pub toxicity: f64,
    pub empathy: f64,
    pub politeness: f64,
    pub prosocial: f64,
}

impl Default for RewriteThresholds {
    fn default() -> Self {
        Self {
            toxicity: 0.50,
            empathy: 0.30,
            politeness: 0.40,
            prosocial: 0.40,
        }
    }
}

impl RewriteThresholds {
    pub fn for_dimension(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Toxicity => self.toxicity,
            Dimension::Empathy => self.empathy,
            Dimension::Politeness => self.politeness,
            Dimension::Prosocial => self.prosocial,
        }
    }

    fn explain(&self, dimension: Dimension, value: f64) -> Option<String> {
        let threshold = self.for_dimension(dimension);
        match dimension {
            Dimension::Toxicity if value >= threshold => Some(format!(
                "{dimension} too high ({value:.2} ≥ {threshold:.2})"
            )),
            Dimension::Toxicity => None,
            _ if value < threshold => Some(format!(
                "{dimension} too low ({value:.2} < {threshold:.2})"
            )),
            _ => None,
        }
    }
}

/// Whether a text should be rewritten and which dimensions fall short.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewriteDecision {
    pub should_rewrite: bool,
    pub dimensions: Vec<Dimension>,
    pub explanations: BTreeMap<Dimension, String>,
    pub thresholds: BTreeMap<Dimension, f64>,
}

/// Check every dimension independently, always in toxicity, empathy, politeness,
/// prosocial order.
pub fn evaluate(metrics: &MetricRecord, thresholds: &RewriteThresholds) -> RewriteDecision {
    let mut dimensions = Vec::new();
    let mut explanations = BTreeMap::new();

    for dimension in Dimension::ALL {
        if let Some(explanation) = thresholds.explain(dimension, dimension.value(metrics)) {
            dimensions.push(dimension);
            explanations.insert(dimension, explanation);
        }
    }

    RewriteDecision {
        should_rewrite: !dimensions.is_empty(),
        dimensions,
        explanations,
        thresholds: Dimension::ALL
            .into_iter()
            .map(|dimension| (dimension, thresholds.for_dimension(dimension)))
            .collect(),
    }
}
