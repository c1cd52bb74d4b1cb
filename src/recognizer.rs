// WHY: Shortform disambiguation from explicit "<longform> (<shortform>)" defining patterns
// Also produces pattern-free text for training data where the label came from the pattern

use anyhow::Result;
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, info};

use crate::candidates::{get_candidate, FragmentExtractor, DEFAULT_WINDOW};
use crate::config::RecognizerConfig;
use crate::nlp::{Analyzer, Token};
use crate::trie::{GroundingMap, GroundingTrie, LongformIndex};

/// Upper bound on words removed from one fragment while stripping
pub const MAX_STRIPPED_WORDS: usize = 100;

/// Recognizes groundings for one shortform
///
/// All state is fixed at construction; `recognize` and
/// `strip_defining_patterns` are pure functions of their input text, so a
/// recognizer can be shared across threads behind an `Arc`.
#[derive(Debug)]
pub struct Recognizer<I = GroundingTrie> {
    shortform: String,
    exclude: HashSet<String>,
    index: I,
    analyzer: Analyzer,
    extractor: FragmentExtractor,
}

impl Recognizer<GroundingTrie> {
    /// Build a recognizer with the default window and no excluded tokens
    pub fn new(shortform: &str, grounding_map: &GroundingMap) -> Result<Self> {
        let analyzer = Analyzer::new()?;
        let trie = GroundingTrie::build(grounding_map, &analyzer);
        Self::with_index(shortform, trie, analyzer)
    }

    pub fn from_config(config: &RecognizerConfig) -> Result<Self> {
        config.validate()?;
        let recognizer = Self::new(&config.shortform, &config.grounding_map)?
            .with_window(config.window)
            .with_exclude(config.exclude.iter().cloned());
        Ok(recognizer)
    }
}

impl<I: LongformIndex> Recognizer<I> {
    /// Build a recognizer over an already constructed index
    ///
    /// `analyzer` must be the one the index keys were normalized with.
    pub fn with_index(shortform: &str, index: I, analyzer: Analyzer) -> Result<Self> {
        Ok(Self {
            shortform: shortform.to_string(),
            exclude: HashSet::new(),
            index,
            analyzer,
            extractor: FragmentExtractor::new(shortform, DEFAULT_WINDOW)?,
        })
    }

    /// Characters of context scanned backward from each defining pattern
    pub fn with_window(mut self, window: usize) -> Self {
        self.extractor.set_window(window);
        self
    }

    /// Tokens that end candidate extraction, compared case-insensitively
    pub fn with_exclude<T: AsRef<str>>(mut self, exclude: impl IntoIterator<Item = T>) -> Self {
        self.exclude = exclude
            .into_iter()
            .map(|t| t.as_ref().to_lowercase())
            .collect();
        self
    }

    pub fn shortform(&self) -> &str {
        &self.shortform
    }

    pub fn window(&self) -> usize {
        self.extractor.window()
    }

    pub fn index(&self) -> &I {
        &self.index
    }

    /// Every grounding whose longform appears in a defining pattern in `text`
    pub fn recognize(&self, text: &str) -> HashSet<String> {
        let mut groundings = HashSet::new();

        for fragment in self.extractor.fragments(text) {
            if fragment.text.is_empty() {
                continue;
            }
            let candidate = get_candidate(fragment.text, &self.analyzer, &self.exclude);
            let key = self.analyzer.reversed_stems(&candidate);
            if let Some(longform) = self.index.search(&key) {
                debug!(longform = %longform.text, "Recognized defining pattern for {}", self.shortform);
                groundings.insert(self.index.post_process(longform).to_string());
            }
        }

        groundings
    }

    /// A single grounding for `text`, if any defining pattern is recognized
    ///
    /// When the text defines the shortform with several different groundings
    /// this logs the fact and returns an arbitrary one of them. The choice
    /// follows `HashSet` iteration order and is not stable between runs.
    /// Use [`Recognizer::recognize`] to see every candidate.
    pub fn recognize_one(&self, text: &str) -> Option<String> {
        let groundings = self.recognize(text);
        if groundings.len() > 1 {
            let sorted: BTreeSet<&String> = groundings.iter().collect();
            info!(
                shortform = %self.shortform,
                groundings = ?sorted,
                "Defining pattern occurs multiple times with different groundings"
            );
        }
        groundings.into_iter().next()
    }

    /// Remove recognized defining patterns, leaving the bare shortform
    ///
    /// Recognized longforms are deleted from the text, every remaining
    /// `(shortform)` becomes the shortform itself and runs of whitespace are
    /// collapsed to single spaces. Fragments whose longform is not in the
    /// index keep their text.
    pub fn strip_defining_patterns(&self, text: &str) -> String {
        let mut stripped = String::with_capacity(text.len());
        let mut cursor = 0;

        for fragment in self.extractor.fragments(text) {
            let tokens = self.analyzer.tokenize(fragment.text);
            let key = self
                .analyzer
                .reversed_stems(tokens.iter().filter(|t| t.is_word()).map(|t| t.text));
            let Some(longform) = self.index.search(&key) else {
                continue;
            };

            let cut = longform_start(&tokens, longform.words).unwrap_or(fragment.text.len());
            stripped.push_str(&text[cursor..fragment.start + cut]);
            cursor = fragment.end();
        }
        stripped.push_str(&text[cursor..]);

        let padded = format!(" {} ", self.shortform);
        let replaced = self.extractor.collapse_patterns(&stripped, &padded);
        replaced.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

/// Byte offset of the first token of the trailing `words`-word span
///
/// Punctuation between the counted words is deleted with them, and so is
/// punctuation trailing the last word: the outer `(` of `receptor ((ER))` goes
/// and its `)` stays behind.
/// At most [`MAX_STRIPPED_WORDS`] words are counted.
fn longform_start(tokens: &[Token<'_>], words: usize) -> Option<usize> {
    let target = words.min(MAX_STRIPPED_WORDS);
    let mut counted = 0;
    let mut start = None;

    for token in tokens.iter().rev() {
        if counted >= target {
            break;
        }
        if token.is_word() {
            counted += 1;
        }
        start = Some(token.start);
    }

    start
}
