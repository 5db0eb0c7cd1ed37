use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Clamp a score into `[lo, hi]`, mapping NaN to `lo` and infinities to the nearest bound.
pub fn clamp_score(value: f64, lo: f64, hi: f64) -> f64 {
    if value.is_nan() {
        return lo;
    }
    value.clamp(lo, hi)
}

pub(crate) fn clamp_unit(value: f64) -> f64 {
    clamp_score(value, 0.0, 1.0)
}

/// Independently scored axis of tone.
///
/// The declaration order is the priority order used by the rewrite gate and is relied upon by
/// `Ord`, so ordered maps keyed by dimension iterate toxicity first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Toxicity,
    Empathy,
    Politeness,
    Prosocial,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::Toxicity,
        Dimension::Empathy,
        Dimension::Politeness,
        Dimension::Prosocial,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Dimension::Toxicity => "toxicity",
            Dimension::Empathy => "empathy",
            Dimension::Politeness => "politeness",
            Dimension::Prosocial => "prosocial",
        }
    }

    pub fn value(&self, metrics: &MetricRecord) -> f64 {
        match self {
            Dimension::Toxicity => metrics.toxicity,
            Dimension::Empathy => metrics.empathy,
            Dimension::Politeness => metrics.politeness,
            Dimension::Prosocial => metrics.prosocial,
        }
    }

    /// Signed improvement between two snapshots. Positive always means "better": toxicity
    /// improves by going down, every other dimension by going up.
    pub fn improvement(&self, previous: &MetricRecord, current: &MetricRecord) -> f64 {
        match self {
            Dimension::Toxicity => previous.toxicity - current.toxicity,
            _ => self.value(current) - self.value(previous),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Four-way lexicon sentiment, clamped per field.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Sentiment {
    pub pos: f64,
    pub neu: f64,
    pub neg: f64,
    pub compound: f64,
}

impl Sentiment {
    /// Compound polarity mapped from `[-1, 1]` onto `[0, 1]`.
    pub fn normalized(&self) -> f64 {
        (self.compound + 1.0) / 2.0
    }
}

/// Canonical snapshot of all scores for one analyzed text.
///
/// Records are produced fresh by the normalizer for every analysis and are never mutated
/// afterwards; the pipeline only ever hands them around by shared reference or clones them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub toxicity: f64,
    pub empathy: f64,
    pub politeness: f64,
    pub prosocial: f64,
    pub sentiment: Sentiment,
    pub emotion_distribution: BTreeMap<String, f64>,
    pub lexical_ratios: BTreeMap<String, f64>,
    #[serde(default)]
    pub lexicon_counts: BTreeMap<String, u32>,
}

impl MetricRecord {
    /// Emotions ordered by descending probability, ties broken by name.
    pub fn top_emotions(&self, limit: usize) -> Vec<(String, f64)> {
        let mut ranked: Vec<(String, f64)> = self
            .emotion_distribution
            .iter()
            .map(|(name, probability)| (name.clone(), *probability))
            .collect();
        // BTreeMap iteration is already name-ordered, so a stable sort keeps ties alphabetical.
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(limit);
        ranked
    }

    pub fn score_bundle(&self) -> ScoreBundle {
        ScoreBundle {
            toxicity: self.toxicity,
            empathy: self.empathy,
            politeness: self.politeness,
            prosocial: self.prosocial,
        }
    }
}

/// The four dimension scores, used as rewrite guidance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBundle {
    pub toxicity: f64,
    pub empathy: f64,
    pub politeness: f64,
    pub prosocial: f64,
}
