use std::sync::Arc;

use tracing::{info, instrument};

use crate::analysis::{AnalysisConfig, Dimension, ToneAnalysis, ToneAnalyzer, ToneError};
use crate::collaborators::CollaboratorRegistry;
use crate::rewrite::{self, RephraseOutcome, RewriteOutcome, RewriteSession};

/// Entry point used by the HTTP router and the CLI. Calls block on collaborator I/O, so
/// async callers are expected to run them on a blocking thread.
#[derive(Debug, Clone)]
pub struct ToneService {
    analyzer: ToneAnalyzer,
}

impl ToneService {
    pub fn new(registry: Arc<CollaboratorRegistry>, config: AnalysisConfig) -> Self {
        Self {
            analyzer: ToneAnalyzer::new(registry, config),
        }
    }

    pub fn analyzer(&self) -> &ToneAnalyzer {
        &self.analyzer
    }

    #[instrument(skip_all, fields(chars = text.chars().count()))]
    pub fn analyze(&self, text: &str) -> Result<ToneAnalysis, ToneError> {
        let analysis = self.analyzer.analyze(text)?;
        info!(
            verdict = %analysis.verdict.label,
            should_rewrite = analysis.rewrite.should_rewrite,
            "analyzed text"
        );
        Ok(analysis)
    }

    #[instrument(skip_all, fields(chars = text.chars().count()))]
    pub fn run_rewrite_session(&self, text: &str) -> Result<RewriteOutcome, ToneError> {
        RewriteSession::new(&self.analyzer, text).run()
    }

    #[instrument(skip_all, fields(chars = text.chars().count(), goals = ?goals))]
    pub fn rephrase(&self, text: &str, goals: &[Dimension]) -> Result<RephraseOutcome, ToneError> {
        rewrite::rephrase(&self.analyzer, text, goals)
    }
}
