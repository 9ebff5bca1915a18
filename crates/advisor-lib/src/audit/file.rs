//! Local append-only JSON-lines audit log

use std::path::{Path, PathBuf};

use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use super::{async_trait, AuditEntry, AuditSink};
use crate::error::AuditError;

/// Appends one JSON document per line to a local file
pub struct FileAuditSink {
    path: PathBuf,
    name: String,
    // Serializes appends from this process
    write_lock: Mutex<()>,
}

impl FileAuditSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = format!("file:{}", path.display());
        Self {
            path,
            name,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> AuditError {
        AuditError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

#[async_trait]
impl AuditSink for FileAuditSink {
    async fn record(&self, entry: &AuditEntry) -> Result<(), AuditError> {
        let line = entry.to_json_line()?;
        let _guard = self.write_lock.lock().await;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| self.io_error(e))?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| self.io_error(e))?;

        file.write_all(line.as_bytes())
            .await
            .map_err(|e| self.io_error(e))?;
        file.flush().await.map_err(|e| self.io_error(e))?;

        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::tests::sample_entry;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_appends_one_line_per_entry() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("audit.jsonl");
        let sink = FileAuditSink::new(&path);

        sink.record(&sample_entry()).await.unwrap();
        sink.record(&sample_entry()).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        for line in lines {
            let entry: AuditEntry = serde_json::from_str(line).unwrap();
            assert_eq!(entry.requester.ticket_id.as_deref(), Some("INC-1"));
        }
    }

    #[tokio::test]
    async fn test_existing_content_preserved() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("audit.jsonl");
        std::fs::write(&path, "{\"legacy\":true}\n").unwrap();

        let sink = FileAuditSink::new(&path);
        sink.record(&sample_entry()).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("{\"legacy\":true}\n"));
        assert_eq!(content.lines().count(), 2);
    }

    #[tokio::test]
    async fn test_unwritable_path_is_an_error() {
        let dir = TempDir::new().unwrap();
        // A directory cannot be opened for appending
        let sink = FileAuditSink::new(dir.path());
        let err = sink.record(&sample_entry()).await.unwrap_err();
        assert!(matches!(err, AuditError::Io { .. }));
    }
}
