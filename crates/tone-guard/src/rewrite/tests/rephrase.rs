use crate::analysis::tests::common::*;
use crate::analysis::Dimension;
use crate::rewrite::RewriteGuidance;

#[test]
fn explicit_goals_are_sent_in_dimension_order() {
    let harness = harness(ScoreBook::standard(), ScriptedRewriter::replying(&[FRIENDLY]));

    let outcome = harness
        .service
        .rephrase(
            BLUNT,
            &[Dimension::Politeness, Dimension::Toxicity, Dimension::Politeness],
        )
        .expect("rephrase succeeds");

    assert!(outcome.rewritten);
    assert_eq!(outcome.goals, vec![Dimension::Toxicity, Dimension::Politeness]);
    assert_eq!(outcome.rephrased_text, FRIENDLY);
    assert!((outcome.before.toxicity - 0.6).abs() < 1e-9);
    assert!((outcome.after.toxicity - 0.05).abs() < 1e-9);
    assert_eq!(
        harness.rewriter.guidance(),
        vec![RewriteGuidance::Goals {
            dimensions: vec![Dimension::Toxicity, Dimension::Politeness]
        }]
    );
}

#[test]
fn missing_goals_fall_back_to_flagged_dimensions() {
    let harness = harness(ScoreBook::standard(), ScriptedRewriter::replying(&[FRIENDLY]));

    let outcome = harness
        .service
        .rephrase(HOSTILE, &[])
        .expect("rephrase succeeds");

    assert_eq!(outcome.goals, Dimension::ALL.to_vec());
    assert_eq!(harness.rewriter.inputs(), vec![HOSTILE]);
}

#[test]
fn nothing_to_improve_returns_text_unchanged() {
    let harness = harness(ScoreBook::standard(), ScriptedRewriter::replying(&[FRIENDLY]));

    let outcome = harness.service.rephrase(WARM, &[]).expect("rephrase succeeds");

    assert!(!outcome.rewritten);
    assert!(outcome.goals.is_empty());
    assert_eq!(outcome.rephrased_text, WARM);
    assert_eq!(outcome.before, outcome.after);
    assert!(harness.rewriter.inputs().is_empty());
}
