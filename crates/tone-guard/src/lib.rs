pub mod analysis;
pub mod collaborators;
pub mod config;
pub mod error;
pub mod rewrite;
pub mod router;
pub mod service;
pub mod telemetry;

pub use analysis::{Dimension, MetricRecord, ToneAnalysis, ToneAnalyzer, ToneError};
pub use collaborators::{CollaboratorError, CollaboratorRegistry};
pub use rewrite::{RephraseOutcome, RewriteOutcome, RewriteSession, SessionStatus};
pub use router::tone_router;
pub use service::ToneService;
