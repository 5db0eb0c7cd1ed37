use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::composite::prosocial_score;
use super::domain::{clamp_score, clamp_unit, MetricRecord, Sentiment};
use super::lexicon::Lexicon;
use crate::collaborators::{LabelScore, SentimentScores};

/// Aliases classifiers commonly use for their positive class.
const GENERIC_POSITIVE_ALIASES: [&str; 2] = ["positive", "label_1"];

/// Names the positive class of a binary tone classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositiveClass {
    pub name: String,
    pub aliases: Vec<String>,
}

impl PositiveClass {
    pub fn new(name: impl Into<String>, aliases: &[&str]) -> Self {
        Self {
            name: name.into(),
            aliases: aliases.iter().map(|alias| alias.to_string()).collect(),
        }
    }

    fn is_alias(&self, label: &str) -> bool {
        label.eq_ignore_ascii_case(&self.name)
            || self
                .aliases
                .iter()
                .any(|alias| label.eq_ignore_ascii_case(alias))
            || GENERIC_POSITIVE_ALIASES
                .iter()
                .any(|alias| label.eq_ignore_ascii_case(alias))
    }
}

/// Raw collaborator output for one text, prior to normalization.
#[derive(Debug, Clone, Default)]
pub struct RawSignals {
    pub toxicity: Vec<LabelScore>,
    pub empathy: Vec<LabelScore>,
    pub politeness: Vec<LabelScore>,
    pub emotions: Vec<LabelScore>,
    pub sentiment: SentimentScores,
    pub lexicon_counts: BTreeMap<String, u32>,
}

/// Average of the "toxic" sub-labels, or the strongest label when none mention toxicity.
pub fn toxicity_score(scores: &[LabelScore]) -> f64 {
    let toxic_like: Vec<f64> = scores
        .iter()
        .filter(|entry| entry.label.to_lowercase().contains("toxic"))
        .map(|entry| entry.score)
        .collect();

    let raw = if toxic_like.is_empty() {
        scores
            .iter()
            .map(|entry| entry.score)
            .fold(None, |best: Option<f64>, score| {
                Some(best.map_or(score, |current| current.max(score)))
            })
            .unwrap_or(0.0)
    } else {
        toxic_like.iter().sum::<f64>() / toxic_like.len() as f64
    };

    clamp_unit(raw)
}

/// Probability of the positive class, located by name.
///
/// When the classifier does not report the positive class by name, the predicted (highest
/// scoring) class decides: its probability is used directly if it is a recognized positive
/// alias, otherwise its complement.
pub fn positive_class_probability(scores: &[LabelScore], class: &PositiveClass) -> f64 {
    if let Some(entry) = scores
        .iter()
        .find(|entry| entry.label.eq_ignore_ascii_case(&class.name))
    {
        return clamp_unit(entry.score);
    }

    let predicted = scores
        .iter()
        .filter(|entry| !entry.score.is_nan())
        .max_by(|a, b| a.score.total_cmp(&b.score));

    match predicted {
        Some(entry) if class.is_alias(&entry.label) => clamp_unit(entry.score),
        Some(entry) => clamp_unit(1.0 - clamp_unit(entry.score)),
        None => 0.0,
    }
}

pub fn sentiment(scores: SentimentScores) -> Sentiment {
    Sentiment {
        pos: clamp_unit(scores.pos),
        neu: clamp_unit(scores.neu),
        neg: clamp_unit(scores.neg),
        compound: clamp_score(scores.compound, -1.0, 1.0),
    }
}

/// Lowercased emotion labels scaled so they sum to one. A zero total leaves every value at
/// zero rather than dividing by zero.
pub fn emotion_distribution(scores: &[LabelScore]) -> BTreeMap<String, f64> {
    let mut raw: BTreeMap<String, f64> = BTreeMap::new();
    for entry in scores {
        *raw.entry(entry.label.to_lowercase()).or_insert(0.0) +=
            clamp_score(entry.score, 0.0, f64::MAX);
    }

    let total: f64 = raw.values().sum();
    let denominator = if total > 0.0 { total } else { 1.0 };

    raw.into_iter()
        .map(|(label, score)| (label, clamp_unit(score / denominator)))
        .collect()
}

/// Build the canonical record for `text` from its raw collaborator signals.
pub fn normalize(
    text: &str,
    raw: RawSignals,
    lexicon: &Lexicon,
    empathy_class: &PositiveClass,
    politeness_class: &PositiveClass,
) -> MetricRecord {
    let toxicity = toxicity_score(&raw.toxicity);
    let empathy = positive_class_probability(&raw.empathy, empathy_class);
    let politeness = positive_class_probability(&raw.politeness, politeness_class);
    let sentiment = sentiment(raw.sentiment);
    let prosocial = prosocial_score(toxicity, empathy, politeness, &sentiment);

    MetricRecord {
        toxicity,
        empathy,
        politeness,
        prosocial,
        sentiment,
        emotion_distribution: emotion_distribution(&raw.emotions),
        lexical_ratios: lexicon.ratios(text),
        lexicon_counts: raw.lexicon_counts,
    }
}
