//! JSON-over-HTTP adapters for model-serving endpoints.
//!
//! The adapters use the blocking `reqwest` client so they fit the synchronous collaborator
//! traits; async callers are expected to run the pipeline on a blocking thread.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use super::{
    CollaboratorError, CollaboratorRegistry, LabelScore, LexiconCounter, Rewriter,
    SentimentAnalyzer, SentimentScores, TextClassifier,
};
use crate::config::CollaboratorEndpoints;
use crate::rewrite::RewriteGuidance;

fn build_client(name: &'static str, timeout: Duration) -> Result<Client, CollaboratorError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|err| CollaboratorError::unavailable(name, err.to_string()))
}

fn post_json<T: DeserializeOwned>(
    client: &Client,
    name: &'static str,
    endpoint: &str,
    body: serde_json::Value,
) -> Result<T, CollaboratorError> {
    let response = client
        .post(endpoint)
        .json(&body)
        .send()
        .and_then(|response| response.error_for_status())
        .map_err(|err| CollaboratorError::unavailable(name, err.to_string()))?;

    response
        .json::<T>()
        .map_err(|err| CollaboratorError::malformed(name, err.to_string()))
}

/// Classifier endpoints answer either with a flat label list or, like hosted inference
/// pipelines, with one list per input.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClassifierPayload {
    Flat(Vec<LabelScore>),
    Batched(Vec<Vec<LabelScore>>),
}

impl ClassifierPayload {
    fn into_scores(self) -> Vec<LabelScore> {
        match self {
            ClassifierPayload::Flat(scores) => scores,
            ClassifierPayload::Batched(mut batches) => {
                if batches.is_empty() {
                    Vec::new()
                } else {
                    batches.swap_remove(0)
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpClassifier {
    name: &'static str,
    endpoint: String,
    client: Client,
}

impl HttpClassifier {
    pub fn new(
        name: &'static str,
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, CollaboratorError> {
        Ok(Self {
            name,
            endpoint: endpoint.into(),
            client: build_client(name, timeout)?,
        })
    }
}

impl TextClassifier for HttpClassifier {
    fn classify(&self, text: &str) -> Result<Vec<LabelScore>, CollaboratorError> {
        let payload: ClassifierPayload = post_json(
            &self.client,
            self.name,
            &self.endpoint,
            json!({ "inputs": text }),
        )?;
        Ok(payload.into_scores())
    }
}

#[derive(Debug, Clone)]
pub struct HttpSentimentAnalyzer {
    endpoint: String,
    client: Client,
}

impl HttpSentimentAnalyzer {
    const NAME: &'static str = "sentiment analyzer";

    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, CollaboratorError> {
        Ok(Self {
            endpoint: endpoint.into(),
            client: build_client(Self::NAME, timeout)?,
        })
    }
}

impl SentimentAnalyzer for HttpSentimentAnalyzer {
    fn polarity(&self, text: &str) -> Result<SentimentScores, CollaboratorError> {
        post_json(
            &self.client,
            Self::NAME,
            &self.endpoint,
            json!({ "text": text }),
        )
    }
}

#[derive(Debug, Clone)]
pub struct HttpLexiconCounter {
    endpoint: String,
    client: Client,
}

impl HttpLexiconCounter {
    const NAME: &'static str = "lexicon counter";

    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, CollaboratorError> {
        Ok(Self {
            endpoint: endpoint.into(),
            client: build_client(Self::NAME, timeout)?,
        })
    }
}

impl LexiconCounter for HttpLexiconCounter {
    fn category_counts(&self, text: &str) -> Result<BTreeMap<String, u32>, CollaboratorError> {
        post_json(
            &self.client,
            Self::NAME,
            &self.endpoint,
            json!({ "text": text }),
        )
    }
}

#[derive(Debug, Deserialize)]
struct RewriteResponse {
    text: String,
}

#[derive(Debug, Clone)]
pub struct HttpRewriter {
    endpoint: String,
    client: Client,
}

impl HttpRewriter {
    const NAME: &'static str = "rewriter";

    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, CollaboratorError> {
        Ok(Self {
            endpoint: endpoint.into(),
            client: build_client(Self::NAME, timeout)?,
        })
    }
}

impl Rewriter for HttpRewriter {
    fn rewrite(&self, text: &str, guidance: &RewriteGuidance) -> Result<String, CollaboratorError> {
        let response: RewriteResponse = post_json(
            &self.client,
            Self::NAME,
            &self.endpoint,
            json!({ "text": text, "guidance": guidance }),
        )?;
        Ok(response.text)
    }
}

/// Wire every configured endpoint into a registry. Clients are built lazily on first use;
/// endpoints left unset resolve to "not configured" errors at call time.
pub fn registry_from_endpoints(endpoints: &CollaboratorEndpoints) -> CollaboratorRegistry {
    let timeout = endpoints.timeout;
    let mut builder = CollaboratorRegistry::builder();

    if let Some(url) = endpoints.toxicity.clone() {
        builder = builder.lazy_toxicity(move || {
            let classifier = HttpClassifier::new("toxicity classifier", url.clone(), timeout)?;
            Ok(Arc::new(classifier) as Arc<dyn TextClassifier>)
        });
    }
    if let Some(url) = endpoints.empathy.clone() {
        builder = builder.lazy_empathy(move || {
            let classifier = HttpClassifier::new("empathy classifier", url.clone(), timeout)?;
            Ok(Arc::new(classifier) as Arc<dyn TextClassifier>)
        });
    }
    if let Some(url) = endpoints.politeness.clone() {
        builder = builder.lazy_politeness(move || {
            let classifier = HttpClassifier::new("politeness classifier", url.clone(), timeout)?;
            Ok(Arc::new(classifier) as Arc<dyn TextClassifier>)
        });
    }
    if let Some(url) = endpoints.emotion.clone() {
        builder = builder.lazy_emotion(move || {
            let classifier = HttpClassifier::new("emotion classifier", url.clone(), timeout)?;
            Ok(Arc::new(classifier) as Arc<dyn TextClassifier>)
        });
    }
    if let Some(url) = endpoints.sentiment.clone() {
        builder = builder.lazy_sentiment(move || {
            let analyzer = HttpSentimentAnalyzer::new(url.clone(), timeout)?;
            Ok(Arc::new(analyzer) as Arc<dyn SentimentAnalyzer>)
        });
    }
    if let Some(url) = endpoints.lexicon.clone() {
        builder = builder.lazy_lexicon(move || {
            let counter = HttpLexiconCounter::new(url.clone(), timeout)?;
            Ok(Arc::new(counter) as Arc<dyn LexiconCounter>)
        });
    }
    if let Some(url) = endpoints.rewriter.clone() {
        builder = builder.lazy_rewriter(move || {
            let rewriter = HttpRewriter::new(url.clone(), timeout)?;
            Ok(Arc::new(rewriter) as Arc<dyn Rewriter>)
        });
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifier_payload_accepts_flat_and_batched_shapes() {
        let flat: ClassifierPayload =
            serde_json::from_str(r#"[{"label":"toxic","score":0.9}]"#).expect("flat");
        let batched: ClassifierPayload =
            serde_json::from_str(r#"[[{"label":"polite","score":0.7},{"label":"impolite","score":0.3}]]"#)
                .expect("batched");

        assert_eq!(flat.into_scores(), vec![LabelScore::new("toxic", 0.9)]);
        let scores = batched.into_scores();
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0].label, "polite");
    }

    #[test]
    fn unconfigured_endpoints_stay_unavailable() {
        let endpoints = CollaboratorEndpoints {
            toxicity: Some("http://127.0.0.1:9/toxicity".to_string()),
            ..CollaboratorEndpoints::default()
        };

        let registry = registry_from_endpoints(&endpoints);

        assert!(registry.sentiment().is_err());
        assert!(registry.lexicon().is_none());
    }
}
