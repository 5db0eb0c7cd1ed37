use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::guidance::RewriteGuidance;
use crate::analysis::{Dimension, MetricRecord, ToneAnalyzer, ToneError};
use crate::collaborators::CollaboratorError;

/// Rewrite attempts allowed per session.
pub const MAX_ATTEMPTS: u32 = 4;

/// Absolute gain a single dimension must exceed for a candidate to count as improved.
pub const IMPROVEMENT_FLOOR: f64 = 0.05;

/// Returned in place of rewritten text when every attempt failed to help.
pub const EXHAUSTED_MESSAGE: &str =
    "Sorry, we couldn't find a better way to phrase this message. Please try revising it yourself.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// The original already passed the rewrite gate.
    NoRewriteNeeded,
    /// A candidate passed the rewrite gate.
    Converged,
    /// A candidate improved at least one dimension past the floor.
    Improved,
    /// The attempt budget ran out.
    Exhausted,
}

impl SessionStatus {
    pub fn converged(&self) -> bool {
        !matches!(self, SessionStatus::Exhausted)
    }
}

/// Non-terminal states of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Evaluating,
    Rewriting,
    Rescoring,
}

/// Per-session loop bookkeeping. Never shared between sessions.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationState {
    pub iteration_number: u32,
    pub max_iterations: u32,
    pub previous: Option<MetricRecord>,
    pub improvement: Option<BTreeMap<Dimension, f64>>,
}

impl IterationState {
    fn new() -> Self {
        Self {
            iteration_number: 1,
            max_iterations: MAX_ATTEMPTS,
            previous: None,
            improvement: None,
        }
    }

    fn has_budget(&self) -> bool {
        self.iteration_number < self.max_iterations
    }
}

/// Per-dimension gain from `previous` to `current`; positive is better.
pub fn improvements(previous: &MetricRecord, current: &MetricRecord) -> BTreeMap<Dimension, f64> {
    Dimension::ALL
        .into_iter()
        .map(|dimension| (dimension, dimension.improvement(previous, current)))
        .collect()
}

/// What the caller gets back from a rewrite session. Exhaustion is a normal outcome:
/// `converged` is false, `final_text` carries the apology and `after_metrics` is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewriteOutcome {
    pub original_text: String,
    pub final_text: String,
    pub before_metrics: MetricRecord,
    pub after_metrics: Option<MetricRecord>,
    pub converged: bool,
    pub status: SessionStatus,
    pub attempts: u32,
    pub improvement: Option<BTreeMap<Dimension, f64>>,
}

enum State {
    Idle,
    Evaluating,
    Rewriting {
        before: MetricRecord,
    },
    Rescoring {
        before: MetricRecord,
        candidate: String,
    },
}

pub enum Transition<'a> {
    Continue(RewriteSession<'a>),
    Finished(RewriteOutcome),
}

/// Bounded rewrite/re-score loop for one text.
///
/// Each call to [`RewriteSession::step`] performs exactly one transition, so a caller can
/// stop between transitions simply by dropping the session. [`RewriteSession::run`] drives
/// it to a terminal status.
pub struct RewriteSession<'a> {
    analyzer: &'a ToneAnalyzer,
    original: String,
    text: String,
    state: State,
    iteration: IterationState,
}

impl<'a> RewriteSession<'a> {
    pub fn new(analyzer: &'a ToneAnalyzer, text: impl Into<String>) -> Self {
        let original = text.into();
        let text = original.trim().to_string();
        Self {
            analyzer,
            original,
            text,
            state: State::Idle,
            iteration: IterationState::new(),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        match self.state {
            State::Idle => SessionPhase::Idle,
            State::Evaluating => SessionPhase::Evaluating,
            State::Rewriting { .. } => SessionPhase::Rewriting,
            State::Rescoring { .. } => SessionPhase::Rescoring,
        }
    }

    pub fn iteration(&self) -> &IterationState {
        &self.iteration
    }

    pub fn run(self) -> Result<RewriteOutcome, ToneError> {
        let mut session = self;
        loop {
            match session.step()? {
                Transition::Continue(next) => session = next,
                Transition::Finished(outcome) => return Ok(outcome),
            }
        }
    }

    pub fn step(mut self) -> Result<Transition<'a>, ToneError> {
        match std::mem::replace(&mut self.state, State::Idle) {
            State::Idle => {
                self.state = State::Evaluating;
                Ok(Transition::Continue(self))
            }
            State::Evaluating => {
                let before = self.analyzer.measure(&self.original)?;
                if !self.analyzer.decide(&before).should_rewrite {
                    debug!("original text passes the rewrite gate");
                    let after = Some(before.clone());
                    let final_text = self.original.clone();
                    return Ok(Transition::Finished(self.finish(
                        SessionStatus::NoRewriteNeeded,
                        final_text,
                        before,
                        after,
                        0,
                    )));
                }

                self.iteration.previous = Some(before.clone());
                self.state = State::Rewriting { before };
                Ok(Transition::Continue(self))
            }
            State::Rewriting { before } => {
                let current = self.iteration.previous.as_ref().unwrap_or(&before);
                let guidance = RewriteGuidance::Scores(current.score_bundle());
                debug!(
                    attempt = self.iteration.iteration_number,
                    toxicity = current.toxicity,
                    "requesting rewrite"
                );

                let rewriter = self.analyzer.registry().rewriter()?;
                let candidate = rewriter.rewrite(&self.text, &guidance)?;
                if candidate.trim().is_empty() {
                    return Err(CollaboratorError::malformed("rewriter", "empty rewrite").into());
                }

                self.state = State::Rescoring { before, candidate };
                Ok(Transition::Continue(self))
            }
            State::Rescoring { before, candidate } => self.rescore(before, candidate),
        }
    }

    fn rescore(mut self, before: MetricRecord, candidate: String) -> Result<Transition<'a>, ToneError> {
        let current = self.analyzer.measure(&candidate)?;
        let previous = self
            .iteration
            .previous
            .take()
            .unwrap_or_else(|| before.clone());
        let improvement = improvements(&previous, &current);
        self.iteration.improvement = Some(improvement.clone());
        let attempts = self.iteration.iteration_number;

        debug!(attempt = attempts, ?improvement, "rescored candidate");

        if !self.analyzer.decide(&current).should_rewrite {
            return Ok(Transition::Finished(self.finish(
                SessionStatus::Converged,
                candidate,
                before,
                Some(current),
                attempts,
            )));
        }

        if improvement.values().any(|delta| *delta > IMPROVEMENT_FLOOR) {
            return Ok(Transition::Finished(self.finish(
                SessionStatus::Improved,
                candidate,
                before,
                Some(current),
                attempts,
            )));
        }

        if self.iteration.has_budget() {
            self.iteration.iteration_number += 1;
            self.iteration.previous = Some(current);
            self.text = candidate;
            self.state = State::Rewriting { before };
            return Ok(Transition::Continue(self));
        }

        Ok(Transition::Finished(self.finish(
            SessionStatus::Exhausted,
            EXHAUSTED_MESSAGE.to_string(),
            before,
            None,
            attempts,
        )))
    }

    fn finish(
        self,
        status: SessionStatus,
        final_text: String,
        before_metrics: MetricRecord,
        after_metrics: Option<MetricRecord>,
        attempts: u32,
    ) -> RewriteOutcome {
        info!(?status, attempts, "rewrite session finished");
        RewriteOutcome {
            original_text: self.original,
            final_text,
            before_metrics,
            after_metrics,
            converged: status.converged(),
            status,
            attempts,
            improvement: self.iteration.improvement,
        }
    }
}
