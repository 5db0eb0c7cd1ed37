use serde_json::{json, Value};

use super::super::domain::MetricRecord;
use super::super::labels::ToneLabels;
use super::{VerdictLabel, VerdictReasons};

const TOXICITY_CONCERNING: f64 = 0.7;
const TOXICITY_MODERATE: f64 = 0.4;
const TOXICITY_CLEAN: f64 = 0.2;
const EMPATHY_LOW: f64 = 0.3;
const POLITENESS_LOW: f64 = 0.4;
const STRONG: f64 = 0.7;
const PROSOCIAL_LOW: f64 = 0.3;
const TOP_EMOTIONS: usize = 3;

/// One row of the verdict table: the label it yields, when it fires, and the reason payload.
pub(crate) struct VerdictRule {
    pub(crate) label: VerdictLabel,
    pub(crate) applies: fn(&MetricRecord) -> bool,
    pub(crate) reasons: fn(&MetricRecord, &ToneLabels) -> VerdictReasons,
}

/// Evaluated top to bottom; the first rule that applies decides the verdict.
pub(crate) static VERDICT_RULES: [VerdictRule; 9] = [
    VerdictRule {
        label: VerdictLabel::ConcerningTone,
        applies: concerning_tone,
        reasons: concerning_tone_reasons,
    },
    VerdictRule {
        label: VerdictLabel::PotentiallyHarsh,
        applies: potentially_harsh,
        reasons: potentially_harsh_reasons,
    },
    VerdictRule {
        label: VerdictLabel::LacksEmpathy,
        applies: lacks_empathy,
        reasons: lacks_empathy_reasons,
    },
    VerdictRule {
        label: VerdictLabel::CouldBeMorePolite,
        applies: could_be_more_polite,
        reasons: could_be_more_polite_reasons,
    },
    VerdictRule {
        label: VerdictLabel::ExcellentCommunication,
        applies: excellent_communication,
        reasons: excellent_communication_reasons,
    },
    VerdictRule {
        label: VerdictLabel::HighlyEmpathetic,
        applies: highly_empathetic,
        reasons: highly_empathetic_reasons,
    },
    VerdictRule {
        label: VerdictLabel::VeryPolite,
        applies: very_polite,
        reasons: very_polite_reasons,
    },
    VerdictRule {
        label: VerdictLabel::ConstructiveProsocial,
        applies: constructive_prosocial,
        reasons: constructive_prosocial_reasons,
    },
    VerdictRule {
        label: VerdictLabel::NeedsMoreConstructiveness,
        applies: needs_more_constructiveness,
        reasons: needs_more_constructiveness_reasons,
    },
];

pub(crate) static FALLBACK_RULE: VerdictRule = VerdictRule {
    label: VerdictLabel::NeutralMixed,
    applies: always,
    reasons: neutral_mixed_reasons,
};

fn reasons(entries: Vec<(&str, Value)>) -> VerdictReasons {
    entries
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

fn concerning_tone(m: &MetricRecord) -> bool {
    m.toxicity >= TOXICITY_CONCERNING
}

fn concerning_tone_reasons(m: &MetricRecord, labels: &ToneLabels) -> VerdictReasons {
    let top_emotions: Vec<Value> = m
        .top_emotions(TOP_EMOTIONS)
        .into_iter()
        .map(|(emotion, probability)| json!({ "emotion": emotion, "probability": probability }))
        .collect();

    reasons(vec![
        ("toxicity", json!(m.toxicity)),
        ("toxicity_label", json!(labels.toxicity)),
        ("top_emotions", Value::Array(top_emotions)),
        (
            "note",
            json!("High hostility or derogatory signals; consider reframing before posting."),
        ),
    ])
}

fn potentially_harsh(m: &MetricRecord) -> bool {
    (TOXICITY_MODERATE..TOXICITY_CONCERNING).contains(&m.toxicity)
        && (m.empathy < EMPATHY_LOW || m.politeness < POLITENESS_LOW)
}

fn potentially_harsh_reasons(m: &MetricRecord, _labels: &ToneLabels) -> VerdictReasons {
    reasons(vec![
        ("toxicity", json!(m.toxicity)),
        ("empathy", json!(m.empathy)),
        ("politeness", json!(m.politeness)),
        (
            "note",
            json!("Moderate toxicity with little empathy or politeness; the tone may read as harsh."),
        ),
    ])
}

fn lacks_empathy(m: &MetricRecord) -> bool {
    m.empathy < EMPATHY_LOW && m.toxicity < TOXICITY_MODERATE
}

fn lacks_empathy_reasons(m: &MetricRecord, labels: &ToneLabels) -> VerdictReasons {
    reasons(vec![
        ("empathy", json!(m.empathy)),
        ("empathy_label", json!(labels.empathy)),
        ("toxicity", json!(m.toxicity)),
        (
            "note",
            json!("Little acknowledgement of the reader's perspective; consider showing understanding."),
        ),
    ])
}

fn could_be_more_polite(m: &MetricRecord) -> bool {
    m.politeness < POLITENESS_LOW && m.toxicity < TOXICITY_MODERATE
}

fn could_be_more_polite_reasons(m: &MetricRecord, labels: &ToneLabels) -> VerdictReasons {
    reasons(vec![
        ("politeness", json!(m.politeness)),
        ("politeness_label", json!(labels.politeness)),
        ("toxicity", json!(m.toxicity)),
        (
            "note",
            json!("Not hostile, but the phrasing could be more courteous."),
        ),
    ])
}

fn excellent_communication(m: &MetricRecord) -> bool {
    m.empathy >= STRONG && m.politeness >= STRONG && m.toxicity < TOXICITY_CLEAN
}

fn excellent_communication_reasons(m: &MetricRecord, _labels: &ToneLabels) -> VerdictReasons {
    reasons(vec![
        ("empathy", json!(m.empathy)),
        ("politeness", json!(m.politeness)),
        ("toxicity", json!(m.toxicity)),
        ("note", json!("Warm, courteous and free of hostility.")),
    ])
}

fn highly_empathetic(m: &MetricRecord) -> bool {
    m.empathy >= STRONG && m.toxicity < TOXICITY_MODERATE
}

fn highly_empathetic_reasons(m: &MetricRecord, labels: &ToneLabels) -> VerdictReasons {
    reasons(vec![
        ("empathy", json!(m.empathy)),
        ("empathy_label", json!(labels.empathy)),
        (
            "note",
            json!("Shows strong understanding of the reader's perspective."),
        ),
    ])
}

fn very_polite(m: &MetricRecord) -> bool {
    m.politeness >= STRONG && m.toxicity < TOXICITY_MODERATE
}

fn very_polite_reasons(m: &MetricRecord, labels: &ToneLabels) -> VerdictReasons {
    reasons(vec![
        ("politeness", json!(m.politeness)),
        ("politeness_label", json!(labels.politeness)),
        ("note", json!("Courteous phrasing with low hostility.")),
    ])
}

fn constructive_prosocial(m: &MetricRecord) -> bool {
    m.prosocial >= STRONG && m.toxicity < TOXICITY_MODERATE
}

fn constructive_prosocial_reasons(m: &MetricRecord, labels: &ToneLabels) -> VerdictReasons {
    reasons(vec![
        ("prosocial", json!(m.prosocial)),
        ("prosocial_label", json!(labels.prosocial)),
        (
            "note",
            json!("Low toxicity with a supportive or neutral overall tone."),
        ),
    ])
}

fn needs_more_constructiveness(m: &MetricRecord) -> bool {
    m.prosocial <= PROSOCIAL_LOW
}

fn needs_more_constructiveness_reasons(m: &MetricRecord, labels: &ToneLabels) -> VerdictReasons {
    reasons(vec![
        ("prosocial", json!(m.prosocial)),
        ("prosocial_label", json!(labels.prosocial)),
        (
            "note",
            json!("Limited prosocial impact; add context, soften the tone, or propose solutions."),
        ),
    ])
}

fn always(_m: &MetricRecord) -> bool {
    true
}

fn neutral_mixed_reasons(m: &MetricRecord, _labels: &ToneLabels) -> VerdictReasons {
    reasons(vec![
        ("toxicity", json!(m.toxicity)),
        ("empathy", json!(m.empathy)),
        ("politeness", json!(m.politeness)),
        ("prosocial", json!(m.prosocial)),
        ("sentiment_compound", json!(m.sentiment.compound)),
        (
            "note",
            json!("Balanced signals; likely acceptable but could be clearer or warmer."),
        ),
    ])
}
