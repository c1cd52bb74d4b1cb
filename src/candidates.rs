// WHY: Locates the text that may hold a longform for each "(shortform)" occurrence
// Fragments keep their byte span so stripping can rewrite the source in place

use anyhow::Result;
use regex_automata::meta::Regex;
use std::collections::HashSet;
use tracing::debug;

use crate::abbreviations::AbbreviationChecker;
use crate::nlp::Analyzer;

/// Characters of context scanned backward from a defining pattern by default
pub const DEFAULT_WINDOW: usize = 100;

/// Text immediately preceding one `(shortform)` occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment<'a> {
    pub text: &'a str,
    /// 0-based byte offset of the fragment in the source text
    pub start: usize,
}

impl<'a> Fragment<'a> {
    /// Byte offset where the parenthesized shortform begins
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }
}

/// Finds defining-pattern candidates for one shortform
#[derive(Debug)]
pub struct FragmentExtractor {
    pattern: Regex,
    sentence_end: Regex,
    abbreviations: AbbreviationChecker,
    window: usize,
}

impl FragmentExtractor {
    /// Compile the `\(\s*<shortform>\s*\)` pattern for `shortform`
    pub fn new(shortform: &str, window: usize) -> Result<Self> {
        let pattern = format!(r"\(\s*{}\s*\)", regex_syntax::escape(shortform));
        debug!("Compiling defining pattern matcher: {}", pattern);

        Ok(Self {
            pattern: Regex::new(&pattern)?,
            // WHY: same terminator set the sentence splitter treats as hard boundaries
            sentence_end: Regex::new(r"[.!?]\s+")?,
            abbreviations: AbbreviationChecker::new(),
            window,
        })
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn set_window(&mut self, window: usize) {
        self.window = window;
    }

    /// Fragments preceding each `(shortform)` in `text`, in text order
    ///
    /// A fragment holds at most `window` characters, never crosses a sentence
    /// terminator and never reaches back into the previous defining pattern.
    /// Periods closing an abbreviation or initial ("E. coli") are not terminators.
    pub fn fragments<'a>(&self, text: &'a str) -> Vec<Fragment<'a>> {
        let mut fragments = Vec::new();
        let mut floor = 0;

        for mat in self.pattern.find_iter(text) {
            let end = mat.start();
            let bounded = window_start(text, end, self.window).max(floor);
            let start = self
                .sentence_end
                .find_iter(&text[bounded..end])
                .filter(|m| {
                    // terminator is one ASCII byte, keep it in the checked text
                    let preceding = &text[bounded..bounded + m.start() + 1];
                    !self.abbreviations.ends_with_abbreviation(preceding)
                })
                .last()
                .map_or(bounded, |m| bounded + m.end());

            fragments.push(Fragment {
                text: &text[start..end],
                start,
            });
            floor = mat.end();
        }

        fragments
    }

    /// Replace `(shortform)` occurrences until none remain
    ///
    /// Nested parentheses such as `((ER))` lose one layer per pass, so a single
    /// pass would leave a new `( ER )` match behind.
    pub fn collapse_patterns(&self, text: &str, replacement: &str) -> String {
        let mut result = self.replace_patterns(text, replacement);
        while self.pattern.is_match(&result) {
            result = self.replace_patterns(&result, replacement);
        }
        result
    }

    /// Replace every `(shortform)` occurrence in `text` with `replacement`
    pub fn replace_patterns(&self, text: &str, replacement: &str) -> String {
        let mut result = String::with_capacity(text.len());
        let mut last = 0;
        for mat in self.pattern.find_iter(text) {
            result.push_str(&text[last..mat.start()]);
            result.push_str(replacement);
            last = mat.end();
        }
        result.push_str(&text[last..]);
        result
    }
}

/// Byte offset `window` characters before `end`, clamped to the start of text
fn window_start(text: &str, end: usize, window: usize) -> usize {
    if window == 0 {
        return end;
    }
    text[..end]
        .char_indices()
        .rev()
        .nth(window - 1)
        .map_or(0, |(i, _)| i)
}

/// One-shot fragment extraction without keeping a compiled extractor around
pub fn get_candidate_fragments<'a>(
    text: &'a str,
    shortform: &str,
    window: usize,
) -> Result<Vec<Fragment<'a>>> {
    Ok(FragmentExtractor::new(shortform, window)?.fragments(text))
}

/// Lowercased word tokens at the end of `fragment`, cut at the last excluded token
///
/// `exclude` must hold lowercase entries. Punctuation may be excluded too; it
/// stops extraction but is never part of the returned candidate.
pub fn get_candidate(fragment: &str, analyzer: &Analyzer, exclude: &HashSet<String>) -> Vec<String> {
    let mut candidate = Vec::new();
    for token in analyzer.tokenize(fragment).iter().rev() {
        let lowered = token.text.to_lowercase();
        if exclude.contains(&lowered) {
            break;
        }
        if token.is_word() {
            candidate.push(lowered);
        }
    }
    candidate.reverse();
    candidate
}
