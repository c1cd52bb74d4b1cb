// WHY: Reverse-keyed trie of grounded longforms
// Recognition walks backward from "(shortform)", so longform tokens are inserted last-to-first

use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

use crate::nlp::Analyzer;

/// Longform text mapped to its grounding identifier, e.g. `"HGNC:6871"`
/// WHY: sorted iteration makes collision precedence reproducible
pub type GroundingMap = BTreeMap<String, String>;

/// Terminal payload of the trie
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Longform {
    /// Longform as registered in the grounding map
    pub text: String,
    /// Grounding the longform resolves to
    pub grounding: String,
    /// Number of word tokens in the longform, equal to its trie depth
    pub words: usize,
}

/// Lookup of reversed, stemmed token sequences
///
/// Recognition and stripping are written against this trait so the search
/// structure and the mapping from a hit to its grounding are a contract of the
/// index, not of the recognizer.
pub trait LongformIndex {
    /// Find the registered longform matching a prefix of `reversed_stems`
    fn search(&self, reversed_stems: &[String]) -> Option<&Longform>;

    /// Map a search hit to the grounding reported to callers
    fn post_process<'a>(&'a self, longform: &'a Longform) -> &'a str;
}

#[derive(Debug, Default)]
struct TrieNode {
    children: HashMap<String, TrieNode>,
    terminal: Option<Longform>,
}

/// Immutable search trie built once from a [`GroundingMap`]
#[derive(Debug, Default)]
pub struct GroundingTrie {
    root: TrieNode,
    len: usize,
}

impl GroundingTrie {
    /// Build the trie from every `(longform, grounding)` pair in `grounding_map`
    ///
    /// Longforms that normalize to no tokens are skipped. When two longforms
    /// share a normalized key the first one in map order keeps it.
    pub fn build(grounding_map: &GroundingMap, analyzer: &Analyzer) -> Self {
        let mut trie = Self::default();

        for (longform, grounding) in grounding_map {
            let key = analyzer.key_for(longform);
            if key.is_empty() {
                debug!("Skipping longform with no word tokens: {:?}", longform);
                continue;
            }

            let mut current = &mut trie.root;
            for token in &key {
                current = current.children.entry(token.clone()).or_default();
            }

            if let Some(existing) = &current.terminal {
                if existing.grounding != *grounding {
                    warn!(
                        kept = %existing.text,
                        skipped = %longform,
                        "Longforms normalize to the same key with different groundings"
                    );
                }
                continue;
            }

            current.terminal = Some(Longform {
                text: longform.clone(),
                grounding: grounding.clone(),
                words: key.len(),
            });
            trie.len += 1;
        }

        debug!("Built grounding trie with {} longforms", trie.len);
        trie
    }

    /// Walk `reversed_stems` from the root and return the first terminal reached
    ///
    /// The walk stops at the shallowest terminal, so the shortest registered
    /// token-suffix before the shortform wins over longer ones that contain it.
    pub fn search<S: AsRef<str>>(&self, reversed_stems: &[S]) -> Option<&Longform> {
        let mut current = &self.root;
        for token in reversed_stems {
            let child = current.children.get(token.as_ref())?;
            if child.terminal.is_some() {
                return child.terminal.as_ref();
            }
            current = child;
        }
        None
    }

    /// Number of longforms reachable in the trie
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl LongformIndex for GroundingTrie {
    fn search(&self, reversed_stems: &[String]) -> Option<&Longform> {
        GroundingTrie::search(self, reversed_stems)
    }

    fn post_process<'a>(&'a self, longform: &'a Longform) -> &'a str {
        &longform.grounding
    }
}
