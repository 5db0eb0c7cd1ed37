use std::collections::{BTreeMap, BTreeSet};

const SOCIAL: &[&str] = &[
    "we",
    "us",
    "our",
    "friend",
    "friends",
    "together",
    "team",
    "community",
    "talk",
    "share",
    "support",
];

const COGNITIVE: &[&str] = &[
    "think",
    "consider",
    "because",
    "why",
    "therefore",
    "however",
    "maybe",
    "perhaps",
    "understand",
    "know",
];

/// Word categories used for the lexical ratio signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexicon {
    categories: BTreeMap<String, BTreeSet<String>>,
}

impl Lexicon {
    /// Built-in `social` and `cognitive` vocabularies.
    pub fn standard() -> Self {
        Self {
            categories: BTreeMap::new(),
        }
        .with_category("social", SOCIAL.iter().copied())
        .with_category("cognitive", COGNITIVE.iter().copied())
    }

    /// Add (or extend) a category. Words are matched case-insensitively.
    pub fn with_category<I, S>(mut self, name: &str, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entry = self.categories.entry(name.to_string()).or_default();
        entry.extend(words.into_iter().map(|word| word.as_ref().to_lowercase()));
        self
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    /// Share of tokens matching each category. Empty text yields zero for every category.
    pub fn ratios(&self, text: &str) -> BTreeMap<String, f64> {
        let tokens = tokenize(text);
        let denominator = tokens.len().max(1) as f64;

        self.categories
            .iter()
            .map(|(name, vocabulary)| {
                let matches = tokens
                    .iter()
                    .filter(|token| vocabulary.contains(token.as_str()))
                    .count();
                (name.clone(), matches as f64 / denominator)
            })
            .collect()
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::standard()
    }
}

/// Lowercased runs of word characters (alphanumerics and underscore).
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}
