use anyhow::Result;
use futures::stream::{Stream, StreamExt};
use glob::glob;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

use crate::batch::STRIPPED_SUFFIX;

/// Configuration for document discovery
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Whether to fail fast on first error or continue processing
    pub fail_fast: bool,
    /// File name pattern matched at any depth below the root
    pub pattern: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            fail_fast: false,
            pattern: "*.txt".to_string(),
        }
    }
}

/// Result of document discovery validation
#[derive(Debug, Clone)]
pub struct FileValidation {
    pub path: PathBuf,
    pub error: Option<String>,
}

/// Discovers documents matching `<root>/**/<pattern>` as an async stream
///
/// Outputs previously written by the strip command are never returned.
pub fn discover_files(
    root_dir: impl AsRef<Path>,
    config: DiscoveryConfig,
) -> impl Stream<Item = Result<FileValidation>> {
    let root_path = root_dir.as_ref().to_path_buf();

    futures::stream::unfold(
        DiscoveryState::new(root_path, config),
        |mut state| async move {
            state.next_file().await.map(|result| (result, state))
        }
    )
}

/// Internal state for document discovery iteration
struct DiscoveryState {
    root_dir: PathBuf,
    config: DiscoveryConfig,
    glob_iter: Option<glob::Paths>,
}

impl DiscoveryState {
    fn new(root_dir: PathBuf, config: DiscoveryConfig) -> Self {
        Self {
            root_dir,
            config,
            glob_iter: None,
        }
    }

    async fn next_file(&mut self) -> Option<Result<FileValidation>> {
        if self.glob_iter.is_none() {
            let pattern = format!("{}/**/{}", self.root_dir.display(), self.config.pattern);
            debug!("Starting document discovery with pattern: {}", pattern);

            match glob(&pattern) {
                Ok(paths) => {
                    self.glob_iter = Some(paths);
                    info!("Document discovery initialized for root: {}", self.root_dir.display());
                }
                Err(e) => {
                    return Some(Err(anyhow::anyhow!("Failed to create glob pattern: {}", e)));
                }
            }
        }

        let glob_iter = self.glob_iter.as_mut()?;
        loop {
            match glob_iter.next()? {
                Ok(path) => {
                    if is_stripped_output(&path) {
                        debug!("Skipping strip output: {}", path.display());
                        continue;
                    }
                    debug!("Found document: {}", path.display());
                    return Some(validate_file(path, self.config.fail_fast).await);
                }
                Err(e) => {
                    let error_msg = format!("Glob iteration error: {e}");
                    warn!("{}", error_msg);

                    if self.config.fail_fast {
                        return Some(Err(anyhow::anyhow!(error_msg)));
                    }
                }
            }
        }
    }
}

fn is_stripped_output(path: &Path) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|stem| stem.ends_with(STRIPPED_SUFFIX))
}

async fn validate_file(path: PathBuf, fail_fast: bool) -> Result<FileValidation> {
    match fs::metadata(&path).await {
        Ok(metadata) => {
            if !metadata.is_file() {
                let error = format!("Path is not a file: {}", path.display());
                warn!("{}", error);
                return Ok(FileValidation {
                    path,
                    error: Some(error),
                });
            }
        }
        Err(e) => {
            let error = format!("Cannot access file {}: {}", path.display(), e);
            warn!("{}", error);

            if fail_fast {
                return Err(anyhow::anyhow!(error));
            }
            return Ok(FileValidation {
                path,
                error: Some(error),
            });
        }
    }

    // UTF-8 validation happens when the document is read for processing
    Ok(FileValidation { path, error: None })
}

/// Collect all discovered documents into a Vec
pub async fn collect_discovered_files(
    root_dir: impl AsRef<Path>,
    config: DiscoveryConfig,
) -> Result<Vec<FileValidation>> {
    let mut files = Vec::new();
    let mut stream = Box::pin(discover_files(root_dir, config));

    while let Some(result) = stream.next().await {
        files.push(result?);
    }

    let valid_count = files.iter().filter(|f| f.error.is_none()).count();
    let invalid_count = files.len() - valid_count;

    if invalid_count > 0 {
        warn!("Found {} documents with validation issues", invalid_count);
    }

    info!("Document discovery summary: {} valid, {} invalid", valid_count, invalid_count);

    Ok(files)
}

/// Paths of all valid documents under `root_dir` matching `pattern`
pub async fn find_documents<P: AsRef<Path>>(root_dir: P, pattern: &str) -> Result<Vec<PathBuf>> {
    let config = DiscoveryConfig {
        pattern: pattern.to_string(),
        ..DiscoveryConfig::default()
    };
    let validations = collect_discovered_files(root_dir, config).await?;

    Ok(validations
        .into_iter()
        .filter(|v| v.error.is_none())
        .map(|v| v.path)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn create_test_file(dir: &Path, name: &str, content: &str) -> Result<PathBuf> {
        let file_path = dir.join(name);
        if let Some(parent) = file_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&file_path, content).await?;
        Ok(file_path)
    }

    #[tokio::test]
    async fn test_discover_files_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let files = collect_discovered_files(temp_dir.path(), DiscoveryConfig::default()).await.unwrap();
        assert_eq!(files.len(), 0);
    }

    #[tokio::test]
    async fn test_discover_files_matching_pattern() {
        let temp_dir = TempDir::new().unwrap();

        create_test_file(temp_dir.path(), "abstract.txt", "glucose (GLC)").await.unwrap();
        create_test_file(temp_dir.path(), "nested/body.txt", "More content").await.unwrap();
        create_test_file(temp_dir.path(), "notes.md", "Should not match").await.unwrap();

        let files = collect_discovered_files(temp_dir.path(), DiscoveryConfig::default()).await.unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| f.error.is_none()));

        let file_names: Vec<String> = files.iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert!(file_names.contains(&"abstract.txt".to_string()));
        assert!(file_names.contains(&"body.txt".to_string()));
    }

    #[tokio::test]
    async fn test_discover_skips_stripped_outputs() {
        let temp_dir = TempDir::new().unwrap();

        create_test_file(temp_dir.path(), "abstract.txt", "glucose (GLC)").await.unwrap();
        create_test_file(temp_dir.path(), &format!("abstract{STRIPPED_SUFFIX}.txt"), "GLC").await.unwrap();

        let files = find_documents(temp_dir.path(), "*.txt").await.unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("abstract.txt"));
    }

    #[tokio::test]
    async fn test_discover_custom_pattern() {
        let temp_dir = TempDir::new().unwrap();

        create_test_file(temp_dir.path(), "a.abstract", "one").await.unwrap();
        create_test_file(temp_dir.path(), "b.txt", "two").await.unwrap();

        let files = find_documents(temp_dir.path(), "*.abstract").await.unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("a.abstract"));
    }
}
