//! Sentiment, entity and summary extraction for free text.
//!
//! [`LocalAnalyzer`] is the keyword-counting engine used when no completion
//! backend is configured or the backend fails.

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const MAX_TEXT_CHARS: usize = 50_000;
const MAX_ENTITIES: usize = 10;
const SUMMARY_FALLBACK_CHARS: usize = 200;
const MIN_SENTENCE_CHARS: usize = 10;

const POSITIVE_WORDS: [&str; 20] = [
    "good",
    "great",
    "excellent",
    "amazing",
    "love",
    "best",
    "happy",
    "wonderful",
    "fantastic",
    "perfect",
    "awesome",
    "brilliant",
    "outstanding",
    "superb",
    "positive",
    "success",
    "win",
    "gain",
    "profit",
    "growth",
];

const NEGATIVE_WORDS: [&str; 20] = [
    "bad",
    "terrible",
    "awful",
    "hate",
    "worst",
    "sad",
    "horrible",
    "disgusting",
    "poor",
    "negative",
    "fail",
    "loss",
    "decline",
    "problem",
    "issue",
    "concern",
    "worry",
    "disappointed",
    "frustrated",
    "angry",
];

/// Text submitted for analysis, 1 to 50 000 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisText(String);

/// Rejected analysis input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("text must be between 1 and 50000 characters")]
pub struct InvalidAnalysisText;

impl AnalysisText {
    /// Validates the text length.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidAnalysisText`] for empty or oversized input.
    pub fn new(text: impl Into<String>) -> Result<Self, InvalidAnalysisText> {
        let raw = text.into();
        let length = raw.chars().count();
        if length == 0 || length > MAX_TEXT_CHARS {
            return Err(InvalidAnalysisText);
        }
        Ok(Self(raw))
    }

    /// Returns the text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns at most the first `count` characters.
    #[must_use]
    pub fn prefix(&self, count: usize) -> String {
        self.0.chars().take(count).collect()
    }
}

/// Overall tone of a text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    /// Mostly positive wording.
    Positive,
    /// Mostly negative wording.
    Negative,
    /// Neither dominates.
    #[default]
    Neutral,
    /// Both present without a clear winner.
    Mixed,
}

impl Sentiment {
    /// Parses a label, treating anything unknown as neutral.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "positive" => Self::Positive,
            "negative" => Self::Negative,
            "mixed" => Self::Mixed,
            _ => Self::Neutral,
        }
    }

    /// Weighs keyword counts. One side wins when it exceeds the other by half.
    #[must_use]
    pub fn from_counts(positive: u32, negative: u32) -> Self {
        let positive_scaled = u64::from(positive) * 2;
        let negative_scaled = u64::from(negative) * 2;
        if positive_scaled > u64::from(negative) * 3 {
            Self::Positive
        } else if negative_scaled > u64::from(positive) * 3 {
            Self::Negative
        } else if positive > 0 && negative > 0 {
            Self::Mixed
        } else {
            Self::Neutral
        }
    }
}

/// Named thing found in a text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Surface form.
    pub name: String,
    /// Coarse classification such as `PERSON` or `OTHER`.
    #[serde(rename = "type", default = "other_entity_type")]
    pub entity_type: String,
    /// Relevance between 0 and 1.
    #[serde(default)]
    pub relevance: f64,
}

fn other_entity_type() -> String {
    "OTHER".to_owned()
}

/// Which engine produced an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnalysisSource {
    /// Remote completion backend.
    Openai,
    /// Keyword engine, no backend configured.
    Local,
    /// Keyword engine after a backend failure.
    LocalFallback,
}

/// Result of analysing a text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextAnalysis {
    /// Engine used.
    pub source: AnalysisSource,
    /// Overall tone.
    pub sentiment: Sentiment,
    /// Extracted entities.
    pub entities: Vec<Entity>,
    /// One- or two-sentence summary.
    pub summary: String,
    /// Token accounting reported by the backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<serde_json::Value>,
}

/// Keyword-counting analyser.
#[derive(Debug, Clone)]
pub struct LocalAnalyzer {
    positive: Regex,
    negative: Regex,
    entity: Regex,
    sentence_break: Regex,
}

impl LocalAnalyzer {
    /// Compiles the keyword and entity patterns.
    ///
    /// # Errors
    ///
    /// Returns the regex compilation error; the patterns are fixed so this
    /// only fails if the regex engine rejects them.
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            positive: word_list_pattern(&POSITIVE_WORDS)?,
            negative: word_list_pattern(&NEGATIVE_WORDS)?,
            entity: Regex::new(r"\b[A-Z][a-z]+\s+[A-Z][a-z]+\b")?,
            sentence_break: Regex::new(r"[.!?]+")?,
        })
    }

    /// Analyses `text` without any remote call.
    #[must_use]
    pub fn analyze(&self, text: &AnalysisText, source: AnalysisSource) -> TextAnalysis {
        let lowered = text.as_str().to_lowercase();
        let positive = count_matches(&self.positive, &lowered);
        let negative = count_matches(&self.negative, &lowered);

        TextAnalysis {
            source,
            sentiment: Sentiment::from_counts(positive, negative),
            entities: self.entities(text.as_str()),
            summary: self.summary(text),
            usage: None,
        }
    }

    fn entities(&self, text: &str) -> Vec<Entity> {
        let mut seen: Vec<&str> = Vec::new();
        for found in self.entity.find_iter(text) {
            if !seen.contains(&found.as_str()) {
                seen.push(found.as_str());
            }
        }
        seen.into_iter()
            .take(MAX_ENTITIES)
            .zip(0_u32..)
            .map(|(name, rank)| Entity {
                name: name.to_owned(),
                entity_type: other_entity_type(),
                relevance: relevance_for_rank(rank),
            })
            .collect()
    }

    /// First two sentences longer than ten characters, with an ellipsis when
    /// more follow.
    fn summary(&self, text: &AnalysisText) -> String {
        let sentences: Vec<&str> = self
            .sentence_break
            .split(text.as_str())
            .filter(|sentence| sentence.trim().chars().count() > MIN_SENTENCE_CHARS)
            .collect();
        let joined = sentences
            .iter()
            .take(2)
            .copied()
            .collect::<Vec<_>>()
            .join(". ");
        let mut summary = joined.trim().to_owned();
        if sentences.len() > 2 {
            summary.push_str("...");
        }
        if summary.is_empty() {
            return text.prefix(SUMMARY_FALLBACK_CHARS);
        }
        summary
    }
}

/// Relevance decays by a tenth per rank, rounded to two decimals.
#[expect(clippy::float_arithmetic, reason = "hundredths to a unit fraction")]
fn relevance_for_rank(rank: u32) -> f64 {
    let hundredths = 100_u32.saturating_sub(rank.saturating_mul(10));
    f64::from(hundredths) / 100.0
}

fn word_list_pattern(words: &[&str]) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"\b(?:{})\b", words.join("|")))
}

fn count_matches(pattern: &Regex, text: &str) -> u32 {
    u32::try_from(pattern.find_iter(text).count()).unwrap_or(u32::MAX)
}
