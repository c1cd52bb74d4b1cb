// WHY: Document-level parallelism around the single-threaded recognizer
// The recognizer is immutable after construction, so one Arc is shared by every worker

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::fs;
use tracing::{info, warn};

use crate::recognizer::Recognizer;

/// File stem suffix of documents written by [`Mode::Strip`]
pub const STRIPPED_SUFFIX: &str = "_stripped";

/// What to do with each document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Report the groundings defined in the document
    Recognize,
    /// Write a copy of the document with defining patterns removed
    Strip,
}

/// Per-document processing statistics
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DocumentStats {
    /// Document path
    pub path: String,
    /// Number of characters processed
    pub chars_processed: u64,
    /// Groundings recognized, sorted (recognize mode)
    pub groundings: Vec<String>,
    /// Where the stripped document was written (strip mode)
    pub output_path: Option<String>,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
    /// Processing status (success, failed)
    pub status: String,
    /// Error message if processing failed
    pub error: Option<String>,
}

impl DocumentStats {
    fn failed(path: &Path, error: &anyhow::Error, started: Instant) -> Self {
        Self {
            path: path.display().to_string(),
            chars_processed: 0,
            groundings: Vec::new(),
            output_path: None,
            processing_time_ms: started.elapsed().as_millis() as u64,
            status: "failed".to_string(),
            error: Some(format!("{error:#}")),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Path the stripped copy of `source_path` is written to
pub fn stripped_output_path(source_path: &Path) -> PathBuf {
    let mut output = source_path.to_path_buf();
    let file_stem = output.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
        .to_string();
    let file_name = match source_path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{file_stem}{STRIPPED_SUFFIX}.{ext}"),
        None => format!("{file_stem}{STRIPPED_SUFFIX}"),
    };
    output.set_file_name(file_name);
    output
}

/// Process one document, turning I/O failures into failed stats
pub async fn process_document(recognizer: Arc<Recognizer>, path: PathBuf, mode: Mode) -> DocumentStats {
    let started = Instant::now();
    match try_process_document(recognizer, &path, mode, started).await {
        Ok(stats) => stats,
        Err(e) => {
            warn!("Failed to process {}: {:#}", path.display(), e);
            DocumentStats::failed(&path, &e, started)
        }
    }
}

async fn try_process_document(
    recognizer: Arc<Recognizer>,
    path: &Path,
    mode: Mode,
    started: Instant,
) -> Result<DocumentStats> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Cannot read document {}", path.display()))?;
    let chars_processed = content.chars().count() as u64;

    // WHY: recognition is CPU-bound and synchronous, keep it off the async workers
    let (groundings, stripped) = tokio::task::spawn_blocking(move || match mode {
        Mode::Recognize => {
            let mut groundings: Vec<String> = recognizer.recognize(&content).into_iter().collect();
            groundings.sort();
            (groundings, None)
        }
        Mode::Strip => (Vec::new(), Some(recognizer.strip_defining_patterns(&content))),
    })
    .await?;

    let output_path = match stripped {
        Some(text) => {
            let output = stripped_output_path(path);
            fs::write(&output, text)
                .await
                .with_context(|| format!("Cannot write {}", output.display()))?;
            Some(output.display().to_string())
        }
        None => None,
    };

    Ok(DocumentStats {
        path: path.display().to_string(),
        chars_processed,
        groundings,
        output_path,
        processing_time_ms: started.elapsed().as_millis() as u64,
        status: "success".to_string(),
        error: None,
    })
}

/// Process documents concurrently, at most one per CPU in flight
///
/// Results come back in input order. With `fail_fast` the first failed
/// document aborts the batch with its error.
pub async fn process_documents(
    recognizer: Arc<Recognizer>,
    paths: Vec<PathBuf>,
    mode: Mode,
    fail_fast: bool,
) -> Result<Vec<DocumentStats>> {
    let total = paths.len();
    info!("Processing {} documents in {:?} mode", total, mode);

    let mut results = stream::iter(paths)
        .map(|path| process_document(Arc::clone(&recognizer), path, mode))
        .buffered(num_cpus::get().max(1));

    let mut stats = Vec::with_capacity(total);
    while let Some(document) = results.next().await {
        if fail_fast && !document.is_success() {
            anyhow::bail!(
                "Processing failed for {}: {}",
                document.path,
                document.error.as_deref().unwrap_or("unknown error")
            );
        }
        stats.push(document);
    }

    let failed = stats.iter().filter(|s| !s.is_success()).count();
    info!("Processed {} documents: {} successful, {} failed", total, total - failed, failed);
    Ok(stats)
}

/// Write run statistics as pretty JSON
pub async fn write_stats(stats_path: &Path, stats: &[DocumentStats]) -> Result<()> {
    let content = serde_json::to_string_pretty(stats)?;
    fs::write(stats_path, content)
        .await
        .with_context(|| format!("Cannot write stats {}", stats_path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stripped_output_path() {
        let output = stripped_output_path(Path::new("/data/abstracts/pmid123.txt"));
        assert_eq!(output, PathBuf::from("/data/abstracts/pmid123_stripped.txt"));

        let output = stripped_output_path(Path::new("notes"));
        assert_eq!(output, PathBuf::from("notes_stripped"));
    }

    #[test]
    fn test_mode_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Mode::Strip).unwrap(), "\"strip\"");
    }
}
