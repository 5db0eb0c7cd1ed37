mod rules;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::domain::MetricRecord;
use super::labels::ToneLabels;
use rules::{FALLBACK_RULE, VERDICT_RULES};

/// Reason payload attached to a verdict. Keys are fixed per rule.
pub type VerdictReasons = BTreeMap<String, serde_json::Value>;

/// Top-level tone judgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerdictLabel {
    #[serde(rename = "concerning tone")]
    ConcerningTone,
    #[serde(rename = "potentially harsh")]
    PotentiallyHarsh,
    #[serde(rename = "lacks empathy")]
    LacksEmpathy,
    #[serde(rename = "could be more polite")]
    CouldBeMorePolite,
    #[serde(rename = "excellent communication")]
    ExcellentCommunication,
    #[serde(rename = "highly empathetic")]
    HighlyEmpathetic,
    #[serde(rename = "very polite")]
    VeryPolite,
    #[serde(rename = "constructive & prosocial")]
    ConstructiveProsocial,
    #[serde(rename = "needs more constructiveness")]
    NeedsMoreConstructiveness,
    #[serde(rename = "neutral / mixed")]
    NeutralMixed,
}

impl VerdictLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerdictLabel::ConcerningTone => "concerning tone",
            VerdictLabel::PotentiallyHarsh => "potentially harsh",
            VerdictLabel::LacksEmpathy => "lacks empathy",
            VerdictLabel::CouldBeMorePolite => "could be more polite",
            VerdictLabel::ExcellentCommunication => "excellent communication",
            VerdictLabel::HighlyEmpathetic => "highly empathetic",
            VerdictLabel::VeryPolite => "very polite",
            VerdictLabel::ConstructiveProsocial => "constructive & prosocial",
            VerdictLabel::NeedsMoreConstructiveness => "needs more constructiveness",
            VerdictLabel::NeutralMixed => "neutral / mixed",
        }
    }
}

impl fmt::Display for VerdictLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub label: VerdictLabel,
    pub reasons: VerdictReasons,
}

/// Pick the verdict for a record: the first matching rule wins, severe harm first,
/// positive signals next, the neutral fallback last.
pub fn judge(metrics: &MetricRecord, labels: &ToneLabels) -> Verdict {
    let rule = VERDICT_RULES
        .iter()
        .find(|rule| (rule.applies)(metrics))
        .unwrap_or(&FALLBACK_RULE);

    Verdict {
        label: rule.label,
        reasons: (rule.reasons)(metrics, labels),
    }
}

/// Rule labels in evaluation order, ending with the fallback.
pub fn rule_order() -> Vec<VerdictLabel> {
    VERDICT_RULES
        .iter()
        .chain(std::iter::once(&FALLBACK_RULE))
        .map(|rule| rule.label)
        .collect()
}
