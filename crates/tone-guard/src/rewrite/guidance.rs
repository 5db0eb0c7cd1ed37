use serde::{Deserialize, Serialize};

use crate::analysis::{Dimension, ScoreBundle};

/// Context handed to the rewriter alongside the text.
///
/// Sessions always send the full score bundle of the text being rewritten; one-off
/// rephrase requests name the dimensions to work on instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RewriteGuidance {
    Goals { dimensions: Vec<Dimension> },
    Scores(ScoreBundle),
}
