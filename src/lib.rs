pub mod abbreviations;
pub mod batch;
pub mod candidates;
pub mod config;
pub mod discovery;
pub mod nlp;
pub mod recognizer;
pub mod trie;

// Re-export main types for convenient access
pub use candidates::{get_candidate, get_candidate_fragments, Fragment, DEFAULT_WINDOW};
pub use config::RecognizerConfig;
pub use nlp::Analyzer;
pub use recognizer::Recognizer;
pub use trie::{GroundingMap, GroundingTrie, Longform, LongformIndex};

// Re-export batch processing types for the CLI and benchmarks
pub use batch::{process_documents, DocumentStats, Mode};
