use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::analysis::{AnalysisConfig, MetricRecord, Sentiment};
use crate::collaborators::{
    CollaboratorError, CollaboratorRegistry, CollaboratorRegistryBuilder, LabelScore,
    LexiconCounter, Rewriter, SentimentAnalyzer, SentimentScores, TextClassifier,
};
use crate::rewrite::RewriteGuidance;
use crate::service::ToneService;

pub(crate) const HOSTILE: &str = "You people are useless idiots.";
pub(crate) const WARM: &str = "Thanks so much, we really appreciate your help.";
pub(crate) const BLUNT: &str = "Just fix it already, this is garbage.";
pub(crate) const BLUNT_SOFTER: &str = "Just fix it already, this is not good.";
pub(crate) const FRIENDLY: &str = "Could you take another look at this? Thanks.";

/// Headline scores a scripted collaborator reports for one text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Signals {
    pub toxicity: f64,
    pub empathy: f64,
    pub politeness: f64,
    pub compound: f64,
}

pub(crate) fn signals(toxicity: f64, empathy: f64, politeness: f64, compound: f64) -> Signals {
    Signals {
        toxicity,
        empathy,
        politeness,
        compound,
    }
}

/// Text to signal lookup shared by every scripted collaborator. Counts lookups so tests can
/// assert that no collaborator was consulted.
#[derive(Debug, Default)]
pub(crate) struct ScoreBook {
    entries: BTreeMap<String, Signals>,
    lookups: AtomicUsize,
}

impl ScoreBook {
    pub(crate) fn with(mut self, text: &str, signals: Signals) -> Self {
        self.entries.insert(text.to_string(), signals);
        self
    }

    /// Book covering every fixture text.
    pub(crate) fn standard() -> Self {
        Self::default()
            .with(HOSTILE, signals(0.85, 0.1, 0.2, -0.8))
            .with(WARM, signals(0.05, 0.8, 0.85, 0.5))
            .with(BLUNT, signals(0.6, 0.2, 0.3, -0.5))
            .with(BLUNT_SOFTER, signals(0.58, 0.22, 0.31, -0.45))
            .with(FRIENDLY, signals(0.05, 0.6, 0.8, 0.4))
    }

    pub(crate) fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    fn lookup(&self, collaborator: &'static str, text: &str) -> Result<Signals, CollaboratorError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.entries
            .get(text)
            .copied()
            .ok_or_else(|| CollaboratorError::malformed(collaborator, format!("no scores for {text:?}")))
    }
}

#[derive(Debug, Clone, Copy)]
enum Channel {
    Toxicity,
    Empathy,
    Politeness,
    Emotion,
}

struct BookClassifier {
    book: Arc<ScoreBook>,
    channel: Channel,
}

impl TextClassifier for BookClassifier {
    fn classify(&self, text: &str) -> Result<Vec<LabelScore>, CollaboratorError> {
        let name = match self.channel {
            Channel::Toxicity => "toxicity classifier",
            Channel::Empathy => "empathy classifier",
            Channel::Politeness => "politeness classifier",
            Channel::Emotion => "emotion classifier",
        };
        let s = self.book.lookup(name, text)?;

        Ok(match self.channel {
            Channel::Toxicity => vec![LabelScore::new("toxic", s.toxicity)],
            Channel::Empathy => vec![
                LabelScore::new("empathetic", s.empathy),
                LabelScore::new("not_empathetic", 1.0 - s.empathy),
            ],
            Channel::Politeness => vec![
                LabelScore::new("polite", s.politeness),
                LabelScore::new("impolite", 1.0 - s.politeness),
            ],
            Channel::Emotion if s.toxicity >= 0.5 => vec![
                LabelScore::new("anger", 0.7),
                LabelScore::new("sadness", 0.2),
                LabelScore::new("joy", 0.1),
            ],
            Channel::Emotion => vec![
                LabelScore::new("joy", 0.6),
                LabelScore::new("neutral", 0.3),
                LabelScore::new("anger", 0.1),
            ],
        })
    }
}

struct BookSentiment {
    book: Arc<ScoreBook>,
}

impl SentimentAnalyzer for BookSentiment {
    fn polarity(&self, text: &str) -> Result<SentimentScores, CollaboratorError> {
        let s = self.book.lookup("sentiment analyzer", text)?;
        Ok(SentimentScores {
            pos: s.compound.max(0.0),
            neu: 1.0 - s.compound.abs(),
            neg: (-s.compound).max(0.0),
            compound: s.compound,
        })
    }
}

pub(crate) struct FixedLexicon(pub BTreeMap<String, u32>);

impl LexiconCounter for FixedLexicon {
    fn category_counts(&self, _text: &str) -> Result<BTreeMap<String, u32>, CollaboratorError> {
        Ok(self.0.clone())
    }
}

pub(crate) struct OfflineLexicon;

impl LexiconCounter for OfflineLexicon {
    fn category_counts(&self, _text: &str) -> Result<BTreeMap<String, u32>, CollaboratorError> {
        Err(CollaboratorError::unavailable("lexicon counter", "connection refused"))
    }
}

/// Rewriter that replays a fixed script and records every request it receives.
#[derive(Default)]
pub(crate) struct ScriptedRewriter {
    script: Mutex<VecDeque<Result<String, CollaboratorError>>>,
    requests: Mutex<Vec<(String, RewriteGuidance)>>,
}

impl ScriptedRewriter {
    pub(crate) fn replying(outputs: &[&str]) -> Arc<Self> {
        Self::scripted(outputs.iter().map(|output| Ok(output.to_string())))
    }

    pub(crate) fn scripted<I>(script: I) -> Arc<Self>
    where
        I: IntoIterator<Item = Result<String, CollaboratorError>>,
    {
        Arc::new(Self {
            script: Mutex::new(script.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn inputs(&self) -> Vec<String> {
        self.requests
            .lock()
            .expect("rewriter mutex poisoned")
            .iter()
            .map(|(text, _)| text.clone())
            .collect()
    }

    pub(crate) fn guidance(&self) -> Vec<RewriteGuidance> {
        self.requests
            .lock()
            .expect("rewriter mutex poisoned")
            .iter()
            .map(|(_, guidance)| guidance.clone())
            .collect()
    }
}

impl Rewriter for ScriptedRewriter {
    fn rewrite(&self, text: &str, guidance: &RewriteGuidance) -> Result<String, CollaboratorError> {
        self.requests
            .lock()
            .expect("rewriter mutex poisoned")
            .push((text.to_string(), guidance.clone()));
        self.script
            .lock()
            .expect("rewriter mutex poisoned")
            .pop_front()
            .unwrap_or_else(|| Err(CollaboratorError::unavailable("rewriter", "script exhausted")))
    }
}

pub(crate) struct Harness {
    pub service: ToneService,
    pub book: Arc<ScoreBook>,
    pub rewriter: Arc<ScriptedRewriter>,
}

pub(crate) fn harness(book: ScoreBook, rewriter: Arc<ScriptedRewriter>) -> Harness {
    harness_with(book, rewriter, |builder| builder)
}

pub(crate) fn harness_with<F>(book: ScoreBook, rewriter: Arc<ScriptedRewriter>, customize: F) -> Harness
where
    F: FnOnce(CollaboratorRegistryBuilder) -> CollaboratorRegistryBuilder,
{
    let book = Arc::new(book);
    let classifier = |channel| BookClassifier {
        book: book.clone(),
        channel,
    };

    let builder = CollaboratorRegistry::builder()
        .toxicity(classifier(Channel::Toxicity))
        .empathy(classifier(Channel::Empathy))
        .politeness(classifier(Channel::Politeness))
        .emotion(classifier(Channel::Emotion))
        .sentiment(BookSentiment { book: book.clone() })
        .rewriter(rewriter.clone());
    let registry = customize(builder).build();

    Harness {
        service: ToneService::new(Arc::new(registry), AnalysisConfig::default()),
        book,
        rewriter,
    }
}

/// Hand-built record for rule-table and gate tests that need exact scores.
pub(crate) fn record(toxicity: f64, empathy: f64, politeness: f64, prosocial: f64) -> MetricRecord {
    MetricRecord {
        toxicity,
        empathy,
        politeness,
        prosocial,
        sentiment: Sentiment::default(),
        emotion_distribution: BTreeMap::from([
            ("anger".to_string(), 0.5),
            ("joy".to_string(), 0.3),
            ("neutral".to_string(), 0.2),
        ]),
        lexical_ratios: BTreeMap::new(),
        lexicon_counts: BTreeMap::new(),
    }
}
