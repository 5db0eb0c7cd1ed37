use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::debug;

use super::{
    CollaboratorError, LabelScore, LexiconCounter, Rewriter, SentimentAnalyzer, SentimentScores,
    TextClassifier,
};
use crate::rewrite::RewriteGuidance;

type Initializer<T> = Box<dyn Fn() -> Result<Arc<T>, CollaboratorError> + Send + Sync>;

/// Shared handle to one collaborator, initialized at most once.
///
/// Model clients are expensive to construct, so a slot either starts out populated or
/// defers construction to the first caller. Concurrent first callers race on the cell and
/// exactly one initializer result is kept. A failed initialization is not cached; the next
/// caller tries again.
pub struct CollaboratorSlot<T: ?Sized> {
    name: &'static str,
    cell: OnceCell<Arc<T>>,
    init: Option<Initializer<T>>,
}

impl<T: ?Sized> CollaboratorSlot<T> {
    pub fn ready(name: &'static str, handle: Arc<T>) -> Self {
        Self {
            name,
            cell: OnceCell::with_value(handle),
            init: None,
        }
    }

    pub fn lazy<F>(name: &'static str, init: F) -> Self
    where
        F: Fn() -> Result<Arc<T>, CollaboratorError> + Send + Sync + 'static,
    {
        Self {
            name,
            cell: OnceCell::new(),
            init: Some(Box::new(init)),
        }
    }

    pub fn missing(name: &'static str) -> Self {
        Self {
            name,
            cell: OnceCell::new(),
            init: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_configured(&self) -> bool {
        self.cell.get().is_some() || self.init.is_some()
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }

    pub fn get(&self) -> Result<Arc<T>, CollaboratorError> {
        let handle = self.cell.get_or_try_init(|| match &self.init {
            Some(init) => {
                debug!(collaborator = self.name, "initializing collaborator");
                init()
            }
            None => Err(CollaboratorError::unavailable(self.name, "not configured")),
        })?;
        Ok(Arc::clone(handle))
    }
}

impl<T: ?Sized> fmt::Debug for CollaboratorSlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollaboratorSlot")
            .field("name", &self.name)
            .field("initialized", &self.is_initialized())
            .finish_non_exhaustive()
    }
}

const TOXICITY: &str = "toxicity classifier";
const EMPATHY: &str = "empathy classifier";
const POLITENESS: &str = "politeness classifier";
const EMOTION: &str = "emotion classifier";
const SENTIMENT: &str = "sentiment analyzer";
const LEXICON: &str = "lexicon counter";
const REWRITER: &str = "rewriter";

/// Process-wide set of collaborator handles, passed explicitly into the pipeline.
#[derive(Debug)]
pub struct CollaboratorRegistry {
    toxicity: CollaboratorSlot<dyn TextClassifier>,
    empathy: CollaboratorSlot<dyn TextClassifier>,
    politeness: CollaboratorSlot<dyn TextClassifier>,
    emotion: CollaboratorSlot<dyn TextClassifier>,
    sentiment: CollaboratorSlot<dyn SentimentAnalyzer>,
    lexicon: CollaboratorSlot<dyn LexiconCounter>,
    rewriter: CollaboratorSlot<dyn Rewriter>,
}

impl CollaboratorRegistry {
    pub fn builder() -> CollaboratorRegistryBuilder {
        CollaboratorRegistryBuilder::default()
    }

    pub fn toxicity(&self) -> Result<Arc<dyn TextClassifier>, CollaboratorError> {
        self.toxicity.get()
    }

    pub fn empathy(&self) -> Result<Arc<dyn TextClassifier>, CollaboratorError> {
        self.empathy.get()
    }

    pub fn politeness(&self) -> Result<Arc<dyn TextClassifier>, CollaboratorError> {
        self.politeness.get()
    }

    pub fn emotion(&self) -> Result<Arc<dyn TextClassifier>, CollaboratorError> {
        self.emotion.get()
    }

    pub fn sentiment(&self) -> Result<Arc<dyn SentimentAnalyzer>, CollaboratorError> {
        self.sentiment.get()
    }

    /// `None` when no lexicon counter was configured at all.
    pub fn lexicon(&self) -> Option<Result<Arc<dyn LexiconCounter>, CollaboratorError>> {
        if self.lexicon.is_configured() {
            Some(self.lexicon.get())
        } else {
            None
        }
    }

    pub fn rewriter(&self) -> Result<Arc<dyn Rewriter>, CollaboratorError> {
        self.rewriter.get()
    }
}

/// Builder accepting either ready handles or lazy initializers per collaborator.
/// Anything left unset resolves to an "unavailable" error when first requested.
#[derive(Default)]
pub struct CollaboratorRegistryBuilder {
    toxicity: Option<CollaboratorSlot<dyn TextClassifier>>,
    empathy: Option<CollaboratorSlot<dyn TextClassifier>>,
    politeness: Option<CollaboratorSlot<dyn TextClassifier>>,
    emotion: Option<CollaboratorSlot<dyn TextClassifier>>,
    sentiment: Option<CollaboratorSlot<dyn SentimentAnalyzer>>,
    lexicon: Option<CollaboratorSlot<dyn LexiconCounter>>,
    rewriter: Option<CollaboratorSlot<dyn Rewriter>>,
}

impl CollaboratorRegistryBuilder {
    pub fn toxicity<C: TextClassifier + 'static>(mut self, classifier: C) -> Self {
        self.toxicity = Some(CollaboratorSlot::ready(TOXICITY, Arc::new(classifier)));
        self
    }

    pub fn empathy<C: TextClassifier + 'static>(mut self, classifier: C) -> Self {
        self.empathy = Some(CollaboratorSlot::ready(EMPATHY, Arc::new(classifier)));
        self
    }

    pub fn politeness<C: TextClassifier + 'static>(mut self, classifier: C) -> Self {
        self.politeness = Some(CollaboratorSlot::ready(POLITENESS, Arc::new(classifier)));
        self
    }

    pub fn emotion<C: TextClassifier + 'static>(mut self, classifier: C) -> Self {
        self.emotion = Some(CollaboratorSlot::ready(EMOTION, Arc::new(classifier)));
        self
    }

    pub fn sentiment<S: SentimentAnalyzer + 'static>(mut self, analyzer: S) -> Self {
        self.sentiment = Some(CollaboratorSlot::ready(SENTIMENT, Arc::new(analyzer)));
        self
    }

    pub fn lexicon<L: LexiconCounter + 'static>(mut self, counter: L) -> Self {
        self.lexicon = Some(CollaboratorSlot::ready(LEXICON, Arc::new(counter)));
        self
    }

    pub fn rewriter<R: Rewriter + 'static>(mut self, rewriter: R) -> Self {
        self.rewriter = Some(CollaboratorSlot::ready(REWRITER, Arc::new(rewriter)));
        self
    }

    pub fn lazy_toxicity<F>(mut self, init: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn TextClassifier>, CollaboratorError> + Send + Sync + 'static,
    {
        self.toxicity = Some(CollaboratorSlot::lazy(TOXICITY, init));
        self
    }

    pub fn lazy_empathy<F>(mut self, init: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn TextClassifier>, CollaboratorError> + Send + Sync + 'static,
    {
        self.empathy = Some(CollaboratorSlot::lazy(EMPATHY, init));
        self
    }

    pub fn lazy_politeness<F>(mut self, init: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn TextClassifier>, CollaboratorError> + Send + Sync + 'static,
    {
        self.politeness = Some(CollaboratorSlot::lazy(POLITENESS, init));
        self
    }

    pub fn lazy_emotion<F>(mut self, init: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn TextClassifier>, CollaboratorError> + Send + Sync + 'static,
    {
        self.emotion = Some(CollaboratorSlot::lazy(EMOTION, init));
        self
    }

    pub fn lazy_sentiment<F>(mut self, init: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn SentimentAnalyzer>, CollaboratorError> + Send + Sync + 'static,
    {
        self.sentiment = Some(CollaboratorSlot::lazy(SENTIMENT, init));
        self
    }

    pub fn lazy_lexicon<F>(mut self, init: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn LexiconCounter>, CollaboratorError> + Send + Sync + 'static,
    {
        self.lexicon = Some(CollaboratorSlot::lazy(LEXICON, init));
        self
    }

    pub fn lazy_rewriter<F>(mut self, init: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn Rewriter>, CollaboratorError> + Send + Sync + 'static,
    {
        self.rewriter = Some(CollaboratorSlot::lazy(REWRITER, init));
        self
    }

    pub fn build(self) -> CollaboratorRegistry {
        CollaboratorRegistry {
            toxicity: self
                .toxicity
                .unwrap_or_else(|| CollaboratorSlot::missing(TOXICITY)),
            empathy: self
                .empathy
                .unwrap_or_else(|| CollaboratorSlot::missing(EMPATHY)),
            politeness: self
                .politeness
                .unwrap_or_else(|| CollaboratorSlot::missing(POLITENESS)),
            emotion: self
                .emotion
                .unwrap_or_else(|| CollaboratorSlot::missing(EMOTION)),
            sentiment: self
                .sentiment
                .unwrap_or_else(|| CollaboratorSlot::missing(SENTIMENT)),
            lexicon: self
                .lexicon
                .unwrap_or_else(|| CollaboratorSlot::missing(LEXICON)),
            rewriter: self
                .rewriter
                .unwrap_or_else(|| CollaboratorSlot::missing(REWRITER)),
        }
    }
}

impl<T: TextClassifier + ?Sized> TextClassifier for Arc<T> {
    fn classify(&self, text: &str) -> Result<Vec<LabelScore>, CollaboratorError> {
        (**self).classify(text)
    }
}

impl<T: SentimentAnalyzer + ?Sized> SentimentAnalyzer for Arc<T> {
    fn polarity(&self, text: &str) -> Result<SentimentScores, CollaboratorError> {
        (**self).polarity(text)
    }
}

impl<T: LexiconCounter + ?Sized> LexiconCounter for Arc<T> {
    fn category_counts(&self, text: &str) -> Result<BTreeMap<String, u32>, CollaboratorError> {
        (**self).category_counts(text)
    }
}

impl<T: Rewriter + ?Sized> Rewriter for Arc<T> {
    fn rewrite(&self, text: &str, guidance: &RewriteGuidance) -> Result<String, CollaboratorError> {
        (**self).rewrite(text, guidance)
    }
}
