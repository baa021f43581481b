//! Display name extraction from speech transcripts
//!
//! Strategies run in order and the first hit wins:
//! introduction phrases ("me chamo", "meu nome é", "sou", greetings),
//! then the first capitalized word, then the last word.

use std::sync::LazyLock;

use regex::Regex;

/// One name word: ASCII and Latin-1 letters
const WORD: &str = "[A-Za-zÀ-ÖØ-öø-ÿ]+";

/// Introduction phrases, in priority order. Matched against lowercased text.
static INTRO_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    let name = format!(r"({WORD}(?:\s+{WORD})?)");
    [
        format!(r"\bme\s+chamo\s+{name}"),
        format!(r"\bmeu\s+nome\s+[eéê]\s+{name}"),
        format!(r"\bsou\s+(?:[oa]\s+)?{name}"),
        format!(r"\b(?:olá|oi)[\s,]+(?:eu\s+)?(?:sou|me\s+chamo)?\s+{name}"),
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

/// Capitalized words that open a sentence without being a name
const STOPWORDS: [&str; 8] = ["eu", "olá", "oi", "me", "meu", "minha", "sou", "nome"];

/// Which strategy produced a name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Matched an introduction phrase (index into the phrase list)
    Phrase(usize),
    /// First eligible capitalized word
    Capitalized,
    /// Last word of the transcript
    LastWord,
}

/// A name pulled out of a transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub name: String,
    pub strategy: Strategy,
}

/// Extract a display name, or `None` when nothing plausible is found
#[must_use]
pub fn extract_name(transcript: &str) -> Option<String> {
    extract(transcript).map(|e| e.name)
}

/// Extract a display name along with the strategy that found it
#[must_use]
pub fn extract(transcript: &str) -> Option<Extraction> {
    if transcript.trim().is_empty() {
        return None;
    }

    let extraction = from_phrases(transcript)
        .or_else(|| from_capitalized(transcript))
        .or_else(|| from_last_word(transcript));

    match &extraction {
        Some(e) => tracing::debug!(name = %e.name, strategy = ?e.strategy, "extracted name"),
        None => tracing::debug!(transcript, "no name in transcript"),
    }

    extraction
}

fn from_phrases(transcript: &str) -> Option<Extraction> {
    let lower = transcript.to_lowercase();

    INTRO_PATTERNS.iter().enumerate().find_map(|(i, pattern)| {
        let captured = pattern.captures(&lower)?.get(1)?.as_str();
        let name = captured
            .split_whitespace()
            .map(capitalize_first)
            .collect::<Vec<_>>()
            .join(" ");

        Some(Extraction {
            name,
            strategy: Strategy::Phrase(i),
        })
    })
}

fn from_capitalized(transcript: &str) -> Option<Extraction> {
    transcript
        .split_whitespace()
        .find(|word| is_name_like(word))
        .map(|word| Extraction {
            name: word.to_string(),
            strategy: Strategy::Capitalized,
        })
}

/// Starts uppercase, longer than two letters, letters only, not a stopword
fn is_name_like(word: &str) -> bool {
    word.chars().next().is_some_and(char::is_uppercase)
        && word.chars().count() > 2
        && word.chars().all(char::is_alphabetic)
        && !STOPWORDS.contains(&word.to_lowercase().as_str())
}

fn from_last_word(transcript: &str) -> Option<Extraction> {
    let last = transcript
        .split_whitespace()
        .last()?
        .trim_matches(|c: char| c.is_ascii_punctuation());
    if last.chars().count() < 2 || !last.chars().any(char::is_alphabetic) {
        return None;
    }

    let mut chars = last.chars();
    let first = chars.next()?;
    let rest = chars.as_str().to_lowercase();
    let name = first.to_uppercase().chain(rest.chars()).collect();

    Some(Extraction {
        name,
        strategy: Strategy::LastWord,
    })
}

/// Uppercase the first letter, leave the rest untouched
fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}
