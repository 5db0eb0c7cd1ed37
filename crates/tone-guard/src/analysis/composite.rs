use super::domain::{clamp_unit, Sentiment};

const TOXICITY_WEIGHT: f64 = 0.3;
const EMPATHY_WEIGHT: f64 = 0.3;
const POLITENESS_WEIGHT: f64 = 0.3;
const SENTIMENT_WEIGHT: f64 = 0.1;

/// Composite "prosocial" score. Toxicity, empathy and politeness carry equal weight;
/// sentiment only nudges the result.
pub fn prosocial_score(toxicity: f64, empathy: f64, politeness: f64, sentiment: &Sentiment) -> f64 {
    let raw = TOXICITY_WEIGHT * (1.0 - toxicity)
        + EMPATHY_WEIGHT * empathy
        + POLITENESS_WEIGHT * politeness
        + SENTIMENT_WEIGHT * sentiment.normalized();
    clamp_unit(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compound(value: f64) -> Sentiment {
        Sentiment {
            compound: value,
            ..Sentiment::default()
        }
    }

    #[test]
    fn weights_match_the_documented_formula() {
        let score = prosocial_score(0.05, 0.8, 0.85, &compound(0.5));
        assert!((score - 0.855).abs() < 1e-9);
    }

    #[test]
    fn extremes_stay_in_range() {
        assert_eq!(prosocial_score(1.0, 0.0, 0.0, &compound(-1.0)), 0.0);
        assert!((prosocial_score(0.0, 1.0, 1.0, &compound(1.0)) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn monotonic_in_each_primary_dimension() {
        let steps: Vec<f64> = (0..=10).map(|step| step as f64 / 10.0).collect();
        let neutral = compound(0.0);

        for pair in steps.windows(2) {
            let (low, high) = (pair[0], pair[1]);
            assert!(
                prosocial_score(0.3, high, 0.5, &neutral) >= prosocial_score(0.3, low, 0.5, &neutral)
            );
            assert!(
                prosocial_score(0.3, 0.5, high, &neutral) >= prosocial_score(0.3, 0.5, low, &neutral)
            );
            assert!(
                prosocial_score(high, 0.5, 0.5, &neutral) <= prosocial_score(low, 0.5, 0.5, &neutral)
            );
        }
    }
}
