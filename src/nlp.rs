use anyhow::Result;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use stop_words::{get, LANGUAGE};
use unicode_normalization::UnicodeNormalization;

/// A word and how many times it occurred
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordCount {
    /// Lowercased word
    pub word: String,
    /// Occurrences across the input texts
    pub count: usize,
}

/// Text cleaning and word frequency extraction for comment text
pub struct NlpProcessor {
    url_regex: Regex,
    emoji_regex: Regex,
    special_chars_regex: Regex,
    extra_spaces_regex: Regex,
    stopwords: HashSet<String>,
}

impl NlpProcessor {
    /// Create a new processor with the English stop word list
    pub fn new() -> Result<Self> {
        // Initialize regular expressions for text cleaning
        let url_regex = Regex::new(r"https?://\S+|www\.\S+")
            .map_err(|e| anyhow::anyhow!("Failed to compile URL regex: {e}"))?;
        let emoji_regex = Regex::new(r"\p{Extended_Pictographic}")
            .map_err(|e| anyhow::anyhow!("Failed to compile emoji regex: {e}"))?;
        // Apostrophes stay so "don't" survives as one word
        let special_chars_regex = Regex::new(r"[^\w\s']")
            .map_err(|e| anyhow::anyhow!("Failed to compile special chars regex: {e}"))?;
        let extra_spaces_regex = Regex::new(r"\s+")
            .map_err(|e| anyhow::anyhow!("Failed to compile spaces regex: {e}"))?;

        let stopwords: HashSet<String> = get(LANGUAGE::English)
            .iter()
            .map(ToString::to_string)
            .collect();

        Ok(Self {
            url_regex,
            emoji_regex,
            special_chars_regex,
            extra_spaces_regex,
            stopwords,
        })
    }

    /// Clean the text by removing URLs, emojis, and normalizing whitespace
    #[must_use]
    pub fn clean_text(&self, text: &str) -> String {
        // Normalize Unicode characters
        let normalized = text.nfc().collect::<String>();

        let no_urls = self.url_regex.replace_all(&normalized, " ");
        let no_emojis = self.emoji_regex.replace_all(&no_urls, " ");
        let no_special = self.special_chars_regex.replace_all(&no_emojis, " ");
        let normalized_spaces = self.extra_spaces_regex.replace_all(&no_special, " ");

        normalized_spaces.trim().to_lowercase()
    }

    /// Split cleaned text into content words
    ///
    /// Stop words, bare apostrophes and single characters are dropped.
    #[must_use]
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.split_whitespace()
            .map(|s| s.trim_matches('\''))
            .filter(|s| s.chars().count() > 1 && !self.stopwords.contains(*s))
            .map(ToString::to_string)
            .collect()
    }

    /// Whether `word` is on the stop word list
    #[must_use]
    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(word)
    }

    /// Most frequent content words across `texts`, highest count first
    ///
    /// Ties are broken alphabetically so output is stable.
    #[must_use]
    pub fn word_frequencies<'a, I>(&self, texts: I, limit: usize) -> Vec<WordCount>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for text in texts {
            for token in self.tokenize(&self.clean_text(text)) {
                *counts.entry(token).or_insert(0) += 1;
            }
        }

        let mut words: Vec<WordCount> = counts
            .into_iter()
            .map(|(word, count)| WordCount { word, count })
            .collect();
        words.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)));
        words.truncate(limit);
        words
    }
}
