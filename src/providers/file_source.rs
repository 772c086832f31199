use crate::core::PageSource;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads a previously saved copy of the source page.
pub struct FilePageSource {
    path: PathBuf,
}

impl FilePageSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        FilePageSource {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl PageSource for FilePageSource {
    async fn fetch(&self) -> Result<String> {
        debug!("Reading source page from {}", self.path.display());
        tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read source page: {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_saved_page() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("banks.html");
        std::fs::write(&path, "<html></html>").unwrap();

        let markup = FilePageSource::new(&path).fetch().await.unwrap();
        assert_eq!(markup, "<html></html>");
    }

    #[tokio::test]
    async fn test_missing_page_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.html");

        let err = FilePageSource::new(&path).fetch().await.unwrap_err();
        assert!(err.to_string().contains("Failed to read source page"));
    }
}
