use rust_stemmers::{Algorithm, Stemmer};

/// Snowball English stemmer that lowercases before stemming
pub struct EnglishStemmer {
    stemmer: Stemmer,
}

impl EnglishStemmer {
    pub fn new() -> Self {
        Self {
            stemmer: Stemmer::create(Algorithm::English),
        }
    }

    pub fn stem(&self, token: &str) -> String {
        let lowered = token.to_lowercase();
        self.stemmer.stem(&lowered).into_owned()
    }
}

impl Default for EnglishStemmer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EnglishStemmer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnglishStemmer").finish_non_exhaustive()
    }
}
