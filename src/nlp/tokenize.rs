// WHY: Offset-preserving tokenizer shared by trie construction and pattern search
// Word runs come from a regex-automata meta regex, everything else is single-char punctuation

use anyhow::Result;
use regex_automata::meta::Regex;

/// A token borrowed from the source text together with the whitespace that follows it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// Token text, either a `\w+` run or one non-space, non-word character
    pub text: &'a str,
    /// Whitespace between this token and the next one (or end of text)
    pub whitespace: &'a str,
    /// 0-based byte offset of the token in the tokenized text
    pub start: usize,
    word: bool,
}

impl<'a> Token<'a> {
    /// True for `\w+` runs, false for punctuation and symbols
    pub fn is_word(&self) -> bool {
        self.word
    }

    /// Byte offset just past the token text
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }
}

/// Splits text into `(token, trailing whitespace)` pairs
#[derive(Debug)]
pub struct Tokenizer {
    word: Regex,
}

impl Tokenizer {
    pub fn new() -> Result<Self> {
        let word = Regex::new(r"\w+")?;
        Ok(Self { word })
    }

    /// Tokenize `text`, keeping byte offsets so callers can cut the source in place
    pub fn tokenize<'a>(&self, text: &'a str) -> Vec<Token<'a>> {
        let mut spans: Vec<(usize, usize, bool)> = Vec::new();
        let mut last = 0;

        for mat in self.word.find_iter(text) {
            push_symbols(text, last, mat.start(), &mut spans);
            spans.push((mat.start(), mat.end(), true));
            last = mat.end();
        }
        push_symbols(text, last, text.len(), &mut spans);

        let mut tokens = Vec::with_capacity(spans.len());
        for (i, &(start, end, word)) in spans.iter().enumerate() {
            let next = spans.get(i + 1).map_or(text.len(), |s| s.0);
            tokens.push(Token {
                text: &text[start..end],
                whitespace: &text[end..next],
                start,
                word,
            });
        }
        tokens
    }
}

/// Every non-whitespace char in a gap between word runs is its own token
fn push_symbols(text: &str, from: usize, to: usize, spans: &mut Vec<(usize, usize, bool)>) {
    for (offset, ch) in text[from..to].char_indices() {
        if !ch.is_whitespace() {
            let start = from + offset;
            spans.push((start, start + ch.len_utf8(), false));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts<'a>(tokens: &[Token<'a>]) -> Vec<&'a str> {
        tokens.iter().map(|t| t.text).collect()
    }

    #[test]
    fn test_tokenize_words_and_punctuation() {
        let tokenizer = Tokenizer::new().unwrap();
        let tokens = tokenizer.tokenize("tumor-necrosis factor, alpha");
        assert_eq!(texts(&tokens), vec!["tumor", "-", "necrosis", "factor", ",", "alpha"]);

        let words: Vec<bool> = tokens.iter().map(|t| t.is_word()).collect();
        assert_eq!(words, vec![true, false, true, true, false, true]);
    }

    #[test]
    fn test_tokenize_trailing_whitespace() {
        let tokenizer = Tokenizer::new().unwrap();
        let tokens = tokenizer.tokenize("  glucose  level\t(");
        assert_eq!(texts(&tokens), vec!["glucose", "level", "("]);
        assert_eq!(tokens[0].whitespace, "  ");
        assert_eq!(tokens[1].whitespace, "\t");
        assert_eq!(tokens[2].whitespace, "");
        assert_eq!(tokens[0].start, 2);
    }

    #[test]
    fn test_tokenize_offsets_reconstruct_text() {
        let tokenizer = Tokenizer::new().unwrap();
        let text = "The level of glucose-6-phosphate (G6P) rose.";
        let tokens = tokenizer.tokenize(text);

        let rebuilt: String = tokens.iter().map(|t| format!("{}{}", t.text, t.whitespace)).collect();
        assert_eq!(rebuilt, text);
        for token in &tokens {
            assert_eq!(&text[token.start..token.end()], token.text);
        }
    }

    #[test]
    fn test_tokenize_unicode() {
        let tokenizer = Tokenizer::new().unwrap();
        let tokens = tokenizer.tokenize("β-catenin ± Wnt");
        assert_eq!(texts(&tokens), vec!["β", "-", "catenin", "±", "Wnt"]);
        assert!(!tokens[3].is_word());
    }

    #[test]
    fn test_tokenize_empty() {
        let tokenizer = Tokenizer::new().unwrap();
        assert!(tokenizer.tokenize("").is_empty());
        assert!(tokenizer.tokenize(" \n ").is_empty());
    }
}
