// WHY: Single normalization path for longforms and candidate text
// Trie keys only match search keys when both sides are tokenized and stemmed the same way

use anyhow::Result;

pub mod stem;
pub mod tokenize;

pub use stem::EnglishStemmer;
pub use tokenize::{Token, Tokenizer};

/// Tokenizer and stemmer pair applied identically at build and search time
#[derive(Debug)]
pub struct Analyzer {
    tokenizer: Tokenizer,
    stemmer: EnglishStemmer,
}

impl Analyzer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            tokenizer: Tokenizer::new()?,
            stemmer: EnglishStemmer::new(),
        })
    }

    pub fn tokenize<'a>(&self, text: &'a str) -> Vec<Token<'a>> {
        self.tokenizer.tokenize(text)
    }

    pub fn stem(&self, token: &str) -> String {
        self.stemmer.stem(token)
    }

    /// Stem `tokens` and return them last-to-first, the order the trie is keyed on
    pub fn reversed_stems<I, S>(&self, tokens: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        I::IntoIter: DoubleEndedIterator,
        S: AsRef<str>,
    {
        tokens
            .into_iter()
            .rev()
            .map(|token| self.stem(token.as_ref()))
            .collect()
    }

    /// Reversed stems of the word tokens in `text`, punctuation dropped
    pub fn key_for(&self, text: &str) -> Vec<String> {
        let tokens = self.tokenize(text);
        self.reversed_stems(tokens.iter().filter(|t| t.is_word()).map(|t| t.text))
    }
}
