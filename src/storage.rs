use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use uuid::Uuid;

/// URL path segment uploaded files are served under.
pub const PUBLIC_PREFIX: &str = "uploads";

#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Store one object and return its stable public reference
    /// (e.g. `uploads/7f9a….png`).
    async fn store(&self, original_name: &str, body: Bytes) -> anyhow::Result<String>;
}

/// Disk-backed storage; objects land in a flat directory that is served
/// statically by the router.
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub async fn new(root: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .with_context(|| format!("create upload dir {}", root.display()))?;
        Ok(Self { root })
    }
}

/// Extension carried over from the client's filename; `bin` when absent.
fn extension_of(original_name: &str) -> &str {
    Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("bin")
}

#[async_trait]
impl StorageClient for LocalStorage {
    async fn store(&self, original_name: &str, body: Bytes) -> anyhow::Result<String> {
        let file_name = format!("{}.{}", Uuid::new_v4(), extension_of(original_name));
        let path = self.root.join(&file_name);
        tokio::fs::write(&path, &body)
            .await
            .with_context(|| format!("write upload {}", path.display()))?;
        Ok(format!("{PUBLIC_PREFIX}/{file_name}"))
    }
}
