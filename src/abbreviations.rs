// WHY: Abbreviation periods must not end a candidate fragment
// Longforms like "E. coli" or "St. John's wort" contain a period followed by whitespace

use std::collections::HashSet;

/// Abbreviations whose trailing period does not end a sentence, lowercased
pub const ABBREVIATIONS: &[&str] = &[
    "dr.", "mr.", "mrs.", "ms.", "prof.", "sr.", "jr.", "st.",
    "vs.", "etc.", "al.", "fig.", "figs.", "approx.", "ca.", "cf.",
    "no.", "vol.", "sp.", "spp.", "subsp.", "var.", "inc.", "ltd.", "co.",
    "ft.", "lbs.", "oz.", "mi.", "km.", "deg.",
];

/// Efficient abbreviation lookup using HashSet for O(1) performance
pub struct AbbreviationChecker {
    abbreviations: HashSet<&'static str>,
}

impl AbbreviationChecker {
    /// Create new abbreviation checker with the default abbreviation set
    pub fn new() -> Self {
        Self {
            abbreviations: ABBREVIATIONS.iter().copied().collect(),
        }
    }

    /// Check if a word is a known abbreviation or a run of dotted initials
    /// WHY: single letters ("E.") and initialisms ("U.S.", "e.g.") are never listed exhaustively
    pub fn is_abbreviation(&self, word: &str) -> bool {
        let lowered = word.to_lowercase();
        if self.abbreviations.contains(lowered.as_str()) {
            return true;
        }
        let Some(body) = lowered.strip_suffix('.') else {
            return false;
        };
        !body.is_empty()
            && body.split('.').all(|part| {
                let mut chars = part.chars();
                matches!((chars.next(), chars.next()), (Some(c), None) if c.is_alphabetic())
            })
    }

    /// Check if text ends with an abbreviation whose period should not split sentences
    pub fn ends_with_abbreviation(&self, text: &str) -> bool {
        if let Some(last_word) = text.split_whitespace().last() {
            // Remove opening quotes and brackets to get clean word
            let clean_word = last_word.trim_start_matches(|c: char| {
                matches!(c, '"' | '\'' | '(' | '[' | '\u{201C}' | '\u{2018}')
            });
            self.is_abbreviation(clean_word)
        } else {
            false
        }
    }
}

impl Default for AbbreviationChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AbbreviationChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AbbreviationChecker")
            .field("abbreviations", &self.abbreviations.len())
            .finish()
    }
}
