//! Scoring-to-decision pipeline: raw collaborator scores are normalized into a
//! [`MetricRecord`], labelled, judged by the verdict table, and checked by the rewrite gate.

mod composite;
pub mod domain;
pub mod gate;
pub mod labels;
pub mod lexicon;
pub mod normalizer;
pub mod verdict;

#[cfg(test)]
pub(crate) mod tests;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

pub use composite::prosocial_score;
pub use domain::{clamp_score, Dimension, MetricRecord, ScoreBundle, Sentiment};
pub use gate::{RewriteDecision, RewriteThresholds};
pub use labels::{Level, ToneLabels, ToxicityLabel};
pub use lexicon::Lexicon;
pub use normalizer::{PositiveClass, RawSignals};
pub use verdict::{Verdict, VerdictLabel, VerdictReasons};

use crate::collaborators::{CollaboratorError, CollaboratorRegistry, LabelScore};

/// Tunables for one deployment of the analyzer.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub thresholds: RewriteThresholds,
    pub empathy_class: PositiveClass,
    pub politeness_class: PositiveClass,
    pub lexicon: Lexicon,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            thresholds: RewriteThresholds::default(),
            empathy_class: PositiveClass::new("empathetic", &["empathy"]),
            politeness_class: PositiveClass::new("polite", &["politeness"]),
            lexicon: Lexicon::standard(),
        }
    }
}

/// Failure of an analysis or rewrite call. Either aborts the call; no partial record is
/// ever returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ToneError {
    #[error("text is empty or whitespace-only")]
    InvalidInput,
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
}

/// Everything `analyze` reports about one text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToneAnalysis {
    pub metrics: MetricRecord,
    pub labels: ToneLabels,
    pub verdict: Verdict,
    pub rewrite: RewriteDecision,
}

impl ToneAnalysis {
    /// Derive labels, verdict and rewrite decision from an existing record.
    pub fn assess(metrics: MetricRecord, thresholds: &RewriteThresholds) -> Self {
        let labels = ToneLabels::from_metrics(&metrics);
        let verdict = verdict::judge(&metrics, &labels);
        let rewrite = gate::evaluate(&metrics, thresholds);
        Self {
            metrics,
            labels,
            verdict,
            rewrite,
        }
    }
}

/// Stateless analyzer over a shared collaborator registry.
#[derive(Debug, Clone)]
pub struct ToneAnalyzer {
    registry: Arc<CollaboratorRegistry>,
    config: AnalysisConfig,
}

impl ToneAnalyzer {
    pub fn new(registry: Arc<CollaboratorRegistry>, config: AnalysisConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &CollaboratorRegistry {
        &self.registry
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Score `text` into a fresh record. Blank input is rejected before any collaborator
    /// is touched.
    pub fn measure(&self, text: &str) -> Result<MetricRecord, ToneError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ToneError::InvalidInput);
        }

        let raw = RawSignals {
            toxicity: labelled("toxicity classifier", self.registry.toxicity()?.classify(text)?)?,
            empathy: labelled("empathy classifier", self.registry.empathy()?.classify(text)?)?,
            politeness: labelled(
                "politeness classifier",
                self.registry.politeness()?.classify(text)?,
            )?,
            emotions: self.registry.emotion()?.classify(text)?,
            sentiment: self.registry.sentiment()?.polarity(text)?,
            lexicon_counts: self.lexicon_counts(text),
        };

        Ok(normalizer::normalize(
            text,
            raw,
            &self.config.lexicon,
            &self.config.empathy_class,
            &self.config.politeness_class,
        ))
    }

    pub fn assess(&self, metrics: MetricRecord) -> ToneAnalysis {
        ToneAnalysis::assess(metrics, &self.config.thresholds)
    }

    pub fn analyze(&self, text: &str) -> Result<ToneAnalysis, ToneError> {
        let metrics = self.measure(text)?;
        Ok(self.assess(metrics))
    }

    pub fn decide(&self, metrics: &MetricRecord) -> RewriteDecision {
        gate::evaluate(metrics, &self.config.thresholds)
    }

    fn lexicon_counts(&self, text: &str) -> BTreeMap<String, u32> {
        let Some(counter) = self.registry.lexicon() else {
            return BTreeMap::new();
        };

        match counter.and_then(|counter| counter.category_counts(text)) {
            Ok(counts) => counts,
            Err(err) => {
                warn!(error = %err, "lexicon counts unavailable, continuing without them");
                BTreeMap::new()
            }
        }
    }
}

/// Required classifiers must report at least one label; an empty answer carries no score.
fn labelled(
    collaborator: &'static str,
    scores: Vec<LabelScore>,
) -> Result<Vec<LabelScore>, CollaboratorError> {
    if scores.is_empty() {
        return Err(CollaboratorError::malformed(collaborator, "no labels"));
    }
    Ok(scores)
}
