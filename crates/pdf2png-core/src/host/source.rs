//! Source file capability.

#[cfg(feature = "native")]
use std::path::{Path, PathBuf};

use crate::error::PdfError;

/// A named byte payload that can be read in full.
pub trait SourceFile {
    /// File name, including extension.
    fn name(&self) -> &str;

    /// Read the complete content.
    async fn read_bytes(&self) -> Result<Vec<u8>, PdfError>;
}

/// A file already held in memory.
#[derive(Debug, Clone)]
pub struct InMemoryFile {
    name: String,
    data: Vec<u8>,
}

impl InMemoryFile {
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl SourceFile for InMemoryFile {
    fn name(&self) -> &str {
        &self.name
    }

    async fn read_bytes(&self) -> Result<Vec<u8>, PdfError> {
        Ok(self.data.clone())
    }
}

/// A file on the local file system, read lazily.
#[cfg(feature = "native")]
#[derive(Debug, Clone)]
pub struct LocalFile {
    path: PathBuf,
    name: String,
}

#[cfg(feature = "native")]
impl LocalFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(feature = "native")]
impl SourceFile for LocalFile {
    fn name(&self) -> &str {
        &self.name
    }

    async fn read_bytes(&self) -> Result<Vec<u8>, PdfError> {
        tokio::fs::read(&self.path)
            .await
            .map_err(|e| PdfError::Read(format!("{}: {}", self.path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_file() {
        let file = InMemoryFile::new("a.pdf", b"%PDF".to_vec());
        assert_eq!(file.name(), "a.pdf");
        assert_eq!(file.len(), 4);
        assert_eq!(file.read_bytes().await.unwrap(), b"%PDF");
    }

    #[cfg(feature = "native")]
    #[tokio::test]
    async fn test_local_file_reads_and_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Report.PDF");
        std::fs::write(&path, b"%PDF-1.7").unwrap();

        let file = LocalFile::new(&path);
        assert_eq!(file.name(), "Report.PDF");
        assert_eq!(file.read_bytes().await.unwrap(), b"%PDF-1.7");
    }

    #[cfg(feature = "native")]
    #[tokio::test]
    async fn test_local_file_missing() {
        let file = LocalFile::new("/nonexistent/missing.pdf");
        assert!(matches!(file.read_bytes().await, Err(PdfError::Read(_))));
    }
}
