use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use time::OffsetDateTime;

#[async_trait]
pub trait FileStore: Send + Sync {
    /// Persists an uploaded payload and returns the stored path.
    async fn store(&self, original_name: &str, body: Bytes) -> anyhow::Result<String>;
    /// Deletes a previously stored file (compensating cleanup only).
    async fn remove(&self, stored_path: &str) -> anyhow::Result<()>;
}

/// Directory-backed store. Files are named `<unix-millis>-<sanitized-name>`
/// so concurrent uploads of the same filename don't collide and the original
/// name stays recognizable.
#[derive(Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

fn sanitize_filename(name: &str) -> String {
    // Keep only the final path component; clients control this string.
    let base = Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload");
    let sanitized: String = base
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    if sanitized.is_empty() {
        "upload".into()
    } else {
        sanitized
    }
}

#[async_trait]
impl FileStore for LocalStore {
    async fn store(&self, original_name: &str, body: Bytes) -> anyhow::Result<String> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("create upload dir {}", self.root.display()))?;

        let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
        let name = format!("{}-{}", millis, sanitize_filename(original_name));
        let path = self.root.join(name);

        tokio::fs::write(&path, &body)
            .await
            .with_context(|| format!("write upload {}", path.display()))?;

        Ok(path.to_string_lossy().into_owned())
    }

    async fn remove(&self, stored_path: &str) -> anyhow::Result<()> {
        tokio::fs::remove_file(stored_path)
            .await
            .with_context(|| format!("remove upload {}", stored_path))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> LocalStore {
        let dir = std::env::temp_dir().join(format!(
            "projecthub-store-test-{}",
            OffsetDateTime::now_utc().unix_timestamp_nanos()
        ));
        LocalStore::new(dir)
    }

    #[test]
    fn sanitize_replaces_whitespace() {
        assert_eq!(sanitize_filename("final report v2.pdf"), "final_report_v2.pdf");
        assert_eq!(sanitize_filename("tab\there.txt"), "tab_here.txt");
        assert_eq!(sanitize_filename("plain.txt"), "plain.txt");
    }

    #[test]
    fn sanitize_strips_path_components() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("dir/inner name.txt"), "inner_name.txt");
    }

    #[tokio::test]
    async fn store_writes_readable_file() {
        let store = temp_store();
        let path = store
            .store("my report.txt", Bytes::from_static(b"uploaded bytes"))
            .await
            .expect("store should succeed");

        assert!(path.contains("my_report.txt"));
        let contents = tokio::fs::read(&path).await.expect("stored file readable");
        assert_eq!(contents, b"uploaded bytes");
    }

    #[tokio::test]
    async fn remove_deletes_stored_file() {
        let store = temp_store();
        let path = store
            .store("orphan.bin", Bytes::from_static(b"x"))
            .await
            .expect("store should succeed");

        store.remove(&path).await.expect("remove should succeed");
        assert!(tokio::fs::metadata(&path).await.is_err());
    }
}
