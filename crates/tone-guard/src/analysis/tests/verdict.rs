use super::common::record;
use crate::analysis::verdict::{judge, rule_order};
use crate::analysis::{MetricRecord, ToneLabels, VerdictLabel};

fn verdict_for(metrics: &MetricRecord) -> VerdictLabel {
    judge(metrics, &ToneLabels::from_metrics(metrics)).label
}

#[test]
fn rules_are_evaluated_in_declared_order() {
    assert_eq!(
        rule_order(),
        vec![
            VerdictLabel::ConcerningTone,
            VerdictLabel::PotentiallyHarsh,
            VerdictLabel::LacksEmpathy,
            VerdictLabel::CouldBeMorePolite,
            VerdictLabel::ExcellentCommunication,
            VerdictLabel::HighlyEmpathetic,
            VerdictLabel::VeryPolite,
            VerdictLabel::ConstructiveProsocial,
            VerdictLabel::NeedsMoreConstructiveness,
            VerdictLabel::NeutralMixed,
        ]
    );
}

#[test]
fn severe_toxicity_outranks_positive_signals() {
    let metrics = record(0.75, 0.9, 0.9, 0.9);
    assert_eq!(verdict_for(&metrics), VerdictLabel::ConcerningTone);
}

#[test]
fn each_rule_fires_on_its_own_region() {
    let cases = [
        (record(0.5, 0.2, 0.8, 0.5), VerdictLabel::PotentiallyHarsh),
        (record(0.45, 0.6, 0.35, 0.5), VerdictLabel::PotentiallyHarsh),
        (record(0.1, 0.2, 0.9, 0.6), VerdictLabel::LacksEmpathy),
        (record(0.1, 0.5, 0.3, 0.5), VerdictLabel::CouldBeMorePolite),
        (record(0.1, 0.8, 0.75, 0.8), VerdictLabel::ExcellentCommunication),
        (record(0.3, 0.8, 0.5, 0.6), VerdictLabel::HighlyEmpathetic),
        (record(0.1, 0.5, 0.75, 0.6), VerdictLabel::VeryPolite),
        (record(0.1, 0.5, 0.5, 0.75), VerdictLabel::ConstructiveProsocial),
        (record(0.1, 0.5, 0.5, 0.25), VerdictLabel::NeedsMoreConstructiveness),
        (record(0.3, 0.5, 0.5, 0.5), VerdictLabel::NeutralMixed),
    ];

    for (metrics, expected) in cases {
        assert_eq!(verdict_for(&metrics), expected, "metrics: {metrics:?}");
    }
}

#[test]
fn region_edges_are_half_open() {
    let cases = [
        (record(0.7, 0.9, 0.9, 0.9), VerdictLabel::ConcerningTone),
        (record(0.4, 0.2, 0.8, 0.5), VerdictLabel::PotentiallyHarsh),
        (record(0.4, 0.3, 0.4, 0.5), VerdictLabel::NeutralMixed),
        (record(0.2, 0.8, 0.8, 0.8), VerdictLabel::HighlyEmpathetic),
        (record(0.1, 0.3, 0.4, 0.5), VerdictLabel::NeutralMixed),
        (record(0.1, 0.5, 0.5, 0.3), VerdictLabel::NeedsMoreConstructiveness),
        (record(0.1, 0.5, 0.5, 0.7), VerdictLabel::ConstructiveProsocial),
    ];

    for (metrics, expected) in cases {
        assert_eq!(verdict_for(&metrics), expected, "metrics: {metrics:?}");
    }
}

#[test]
fn moderate_toxicity_with_decent_tone_is_neutral() {
    let metrics = record(0.5, 0.5, 0.5, 0.5);
    assert_eq!(verdict_for(&metrics), VerdictLabel::NeutralMixed);
}

#[test]
fn reasons_use_stable_keys() {
    let concerning = record(0.9, 0.1, 0.1, 0.1);
    let verdict = judge(&concerning, &ToneLabels::from_metrics(&concerning));
    let keys: Vec<&str> = verdict.reasons.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["note", "top_emotions", "toxicity", "toxicity_label"]);
    assert_eq!(verdict.reasons["toxicity_label"], "severe");
    assert_eq!(verdict.reasons["top_emotions"][0]["emotion"], "anger");

    let neutral = record(0.3, 0.5, 0.5, 0.5);
    let verdict = judge(&neutral, &ToneLabels::from_metrics(&neutral));
    assert!(verdict.reasons.contains_key("sentiment_compound"));
    assert!(verdict.reasons.contains_key("prosocial"));
}

#[test]
fn verdict_labels_serialize_as_display_strings() {
    let json = serde_json::to_value(VerdictLabel::ConstructiveProsocial).expect("serialize");
    assert_eq!(json, "constructive & prosocial");
    assert_eq!(VerdictLabel::NeutralMixed.to_string(), "neutral / mixed");
}
