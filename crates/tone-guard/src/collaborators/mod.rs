//! Contracts for the external scoring and rewriting services.
//!
//! Every trait requires `Send + Sync`: handles are created once by the
//! [`CollaboratorRegistry`] and shared across concurrent requests. An adapter around a
//! model that cannot be called concurrently is expected to serialize access internally.

pub mod http;
mod registry;

pub use registry::{CollaboratorRegistry, CollaboratorRegistryBuilder, CollaboratorSlot};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::rewrite::RewriteGuidance;

/// One `(label, score)` pair as returned by a sequence classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

impl LabelScore {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Raw polarity scores from the lexicon sentiment analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SentimentScores {
    #[serde(default)]
    pub pos: f64,
    #[serde(default)]
    pub neu: f64,
    #[serde(default)]
    pub neg: f64,
    #[serde(default)]
    pub compound: f64,
}

/// Text classifier returning every label it knows with its probability.
pub trait TextClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Result<Vec<LabelScore>, CollaboratorError>;
}

pub trait SentimentAnalyzer: Send + Sync {
    fn polarity(&self, text: &str) -> Result<SentimentScores, CollaboratorError>;
}

/// Best-effort word-category counter. Failures never abort an analysis.
pub trait LexiconCounter: Send + Sync {
    fn category_counts(&self, text: &str) -> Result<BTreeMap<String, u32>, CollaboratorError>;
}

/// LLM-backed rewriting service.
pub trait Rewriter: Send + Sync {
    fn rewrite(&self, text: &str, guidance: &RewriteGuidance) -> Result<String, CollaboratorError>;
}

/// Failure raised when a collaborator cannot be reached, loaded, or understood.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CollaboratorError {
    #[error("{collaborator} unavailable: {reason}")]
    Unavailable {
        collaborator: &'static str,
        reason: String,
    },
    #[error("{collaborator} returned an unusable response: {reason}")]
    MalformedResponse {
        collaborator: &'static str,
        reason: String,
    },
}

impl CollaboratorError {
    pub fn unavailable(collaborator: &'static str, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            collaborator,
            reason: reason.into(),
        }
    }

    pub fn malformed(collaborator: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            collaborator,
            reason: reason.into(),
        }
    }

    pub fn collaborator(&self) -> &'static str {
        match self {
            CollaboratorError::Unavailable { collaborator, .. }
            | CollaboratorError::MalformedResponse { collaborator, .. } => collaborator,
        }
    }
}
