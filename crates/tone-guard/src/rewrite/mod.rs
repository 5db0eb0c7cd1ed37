//! Rewriting on top of the analyzer: the bounded [`RewriteSession`] loop and the
//! single-shot [`rephrase`] call.

mod guidance;
mod session;

#[cfg(test)]
mod tests;

pub use guidance::RewriteGuidance;
pub use session::{
    improvements, IterationState, RewriteOutcome, RewriteSession, SessionPhase, SessionStatus,
    Transition, EXHAUSTED_MESSAGE, IMPROVEMENT_FLOOR, MAX_ATTEMPTS,
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::{Dimension, MetricRecord, ToneAnalyzer, ToneError};
use crate::collaborators::CollaboratorError;

/// Result of a single targeted rewrite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RephraseOutcome {
    pub original_text: String,
    pub rephrased_text: String,
    pub goals: Vec<Dimension>,
    pub rewritten: bool,
    pub before: MetricRecord,
    pub after: MetricRecord,
}

/// Rewrite `text` once towards `goals`. With no goals the dimensions flagged by the rewrite
/// gate are used; if nothing is flagged either, the text comes back untouched and the
/// rewriter is never called.
pub fn rephrase(
    analyzer: &ToneAnalyzer,
    text: &str,
    goals: &[Dimension],
) -> Result<RephraseOutcome, ToneError> {
    let before = analyzer.measure(text)?;
    let mut goals = if goals.is_empty() {
        analyzer.decide(&before).dimensions
    } else {
        goals.to_vec()
    };
    goals.sort();
    goals.dedup();

    if goals.is_empty() {
        debug!("nothing to improve, returning text unchanged");
        return Ok(RephraseOutcome {
            original_text: text.to_string(),
            rephrased_text: text.to_string(),
            goals,
            rewritten: false,
            after: before.clone(),
            before,
        });
    }

    let guidance = RewriteGuidance::Goals {
        dimensions: goals.clone(),
    };
    let rewriter = analyzer.registry().rewriter()?;
    let rephrased = rewriter.rewrite(text.trim(), &guidance)?;
    if rephrased.trim().is_empty() {
        return Err(CollaboratorError::malformed("rewriter", "empty rewrite").into());
    }

    let after = analyzer.measure(&rephrased)?;
    debug!(?goals, "rephrased text");

    Ok(RephraseOutcome {
        original_text: text.to_string(),
        rephrased_text: rephrased,
        goals,
        rewritten: true,
        before,
        after,
    })
}
