use serde::{Deserialize, Serialize};

use super::domain::MetricRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToxicityLabel {
    Low,
    Medium,
    High,
    Severe,
}

impl ToxicityLabel {
    pub fn from_score(score: f64) -> Self {
        if score < 0.2 {
            Self::Low
        } else if score < 0.5 {
            Self::Medium
        } else if score < 0.8 {
            Self::High
        } else {
            Self::Severe
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ToxicityLabel::Low => "low",
            ToxicityLabel::Medium => "medium",
            ToxicityLabel::High => "high",
            ToxicityLabel::Severe => "severe",
        }
    }
}

/// Three-step label shared by empathy, politeness and prosocial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Low,
    Medium,
    High,
}

impl Level {
    fn from_breakpoints(score: f64, medium_from: f64, high_from: f64) -> Self {
        if score < medium_from {
            Self::Low
        } else if score < high_from {
            Self::Medium
        } else {
            Self::High
        }
    }

    pub fn empathy(score: f64) -> Self {
        Self::from_breakpoints(score, 0.3, 0.7)
    }

    pub fn politeness(score: f64) -> Self {
        Self::from_breakpoints(score, 0.4, 0.7)
    }

    pub fn prosocial(score: f64) -> Self {
        Self::from_breakpoints(score, 0.3, 0.7)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Low => "low",
            Level::Medium => "medium",
            Level::High => "high",
        }
    }
}

/// Categorical view of a metric record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToneLabels {
    pub toxicity: ToxicityLabel,
    pub empathy: Level,
    pub politeness: Level,
    pub prosocial: Level,
}

impl ToneLabels {
    pub fn from_metrics(metrics: &MetricRecord) -> Self {
        Self {
            toxicity: ToxicityLabel::from_score(metrics.toxicity),
            empathy: Level::empathy(metrics.empathy),
            politeness: Level::politeness(metrics.politeness),
            prosocial: Level::prosocial(metrics.prosocial),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toxicity_breakpoints_are_half_open() {
        assert_eq!(ToxicityLabel::from_score(0.0), ToxicityLabel::Low);
        assert_eq!(ToxicityLabel::from_score(0.19999), ToxicityLabel::Low);
        assert_eq!(ToxicityLabel::from_score(0.2), ToxicityLabel::Medium);
        assert_eq!(ToxicityLabel::from_score(0.49999), ToxicityLabel::Medium);
        assert_eq!(ToxicityLabel::from_score(0.5), ToxicityLabel::High);
        assert_eq!(ToxicityLabel::from_score(0.79999), ToxicityLabel::High);
        assert_eq!(ToxicityLabel::from_score(0.8), ToxicityLabel::Severe);
        assert_eq!(ToxicityLabel::from_score(1.0), ToxicityLabel::Severe);
    }

    #[test]
    fn level_breakpoints_are_half_open() {
        assert_eq!(Level::empathy(0.29999), Level::Low);
        assert_eq!(Level::empathy(0.3), Level::Medium);
        assert_eq!(Level::empathy(0.7), Level::High);

        assert_eq!(Level::politeness(0.39999), Level::Low);
        assert_eq!(Level::politeness(0.4), Level::Medium);
        assert_eq!(Level::politeness(0.69999), Level::Medium);
        assert_eq!(Level::politeness(0.7), Level::High);

        assert_eq!(Level::prosocial(0.3), Level::Medium);
        assert_eq!(Level::prosocial(1.0), Level::High);
    }

    #[test]
    fn labels_never_step_backwards_across_the_unit_range() {
        let mut previous = (ToxicityLabel::Low, Level::Low, Level::Low, Level::Low);
        for step in 0..=1000 {
            let score = step as f64 / 1000.0;
            let current = (
                ToxicityLabel::from_score(score),
                Level::empathy(score),
                Level::politeness(score),
                Level::prosocial(score),
            );
            assert!(current.0 >= previous.0, "toxicity regressed at {score}");
            assert!(current.1 >= previous.1, "empathy regressed at {score}");
            assert!(current.2 >= previous.2, "politeness regressed at {score}");
            assert!(current.3 >= previous.3, "prosocial regressed at {score}");
            previous = current;
        }
        assert_eq!(previous.0, ToxicityLabel::Severe);
        assert_eq!(previous.1, Level::High);
    }

    #[test]
    fn labels_serialize_lowercase() {
        let json = serde_json::to_string(&ToxicityLabel::Severe).expect("serialize");
        assert_eq!(json, "\"severe\"");
        assert_eq!(Level::Medium.as_str(), "medium");
    }
}
