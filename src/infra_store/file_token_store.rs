use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredTokens {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
}

impl StoredTokens {
    fn slot(&mut self, key: TokenKey) -> &mut Option<String> {
        match key {
            TokenKey::Access => &mut self.access_token,
            TokenKey::Refresh => &mut self.refresh_token,
        }
    }
}

/// Token storage in a single JSON document on disk.
///
/// Writes go through a sibling temp file and a rename, so a reader never
/// sees half a pair.
pub struct FileTokenStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<StoredTokens, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(StoredTokens::default()),
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| StoreError::Corrupted(format!("{}: {}", self.path.display(), e))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(StoredTokens::default()),
            Err(e) => Err(StoreError::Io(e.to_string())),
        }
    }

    async fn write(&self, tokens: &StoredTokens) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| StoreError::Io(e.to_string()))?;
            }
        }
        let bytes = serde_json::to_vec_pretty(tokens)
            .map_err(|e| StoreError::Corrupted(e.to_string()))?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))
    }

    async fn update<F>(&self, apply: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut StoredTokens) + Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut tokens = self.read().await?;
        apply(&mut tokens);
        self.write(&tokens).await
    }
}

#[async_trait::async_trait]
impl TokenStore for FileTokenStore {
    async fn get(&self, key: TokenKey) -> Result<Option<String>, StoreError> {
        let mut tokens = self.read().await?;
        Ok(tokens.slot(key).take())
    }

    async fn set(&self, key: TokenKey, value: &str) -> Result<(), StoreError> {
        let value = value.to_string();
        self.update(move |tokens| *tokens.slot(key) = Some(value))
            .await
    }

    async fn clear(&self, key: TokenKey) -> Result<(), StoreError> {
        self.update(move |tokens| *tokens.slot(key) = None).await
    }

    async fn save_pair(&self, pair: &TokenPair) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let tokens = StoredTokens {
            access_token: Some(pair.access_token.0.clone()),
            refresh_token: Some(pair.refresh_token.0.clone()),
        };
        self.write(&tokens).await
    }

    async fn clear_all(&self) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("travelx-store-{}-{}", std::process::id(), name))
            .join("tokens.json")
    }

    #[tokio::test]
    async fn pair_survives_a_new_store_instance() {
        let path = scratch_path("reload");
        let store = FileTokenStore::new(&path);
        store
            .save_pair(&TokenPair::new("access-1", "refresh-1"))
            .await
            .unwrap();

        let reopened = FileTokenStore::new(&path);
        assert_eq!(
            reopened.get(TokenKey::Access).await.unwrap().as_deref(),
            Some("access-1")
        );
        assert_eq!(
            reopened.get(TokenKey::Refresh).await.unwrap().as_deref(),
            Some("refresh-1")
        );

        reopened.clear_all().await.unwrap();
        assert!(!path.exists());
        assert!(reopened.access_token().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn clearing_one_key_keeps_the_other() {
        let path = scratch_path("single");
        let store = FileTokenStore::new(&path);
        store.set(TokenKey::Access, "a").await.unwrap();
        store.set(TokenKey::Refresh, "r").await.unwrap();
        store.clear(TokenKey::Access).await.unwrap();

        assert!(store.get(TokenKey::Access).await.unwrap().is_none());
        assert_eq!(store.get(TokenKey::Refresh).await.unwrap().as_deref(), Some("r"));
        store.clear_all().await.unwrap();
    }

    #[tokio::test]
    async fn garbage_file_is_reported_as_corrupted() {
        let path = scratch_path("garbage");
        tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        tokio::fs::write(&path, b"not json").await.unwrap();

        let store = FileTokenStore::new(&path);
        let err = store.get(TokenKey::Access).await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupted(_)));
        store.clear_all().await.unwrap();
    }

    #[tokio::test]
    async fn missing_file_reads_as_empty() {
        let store = FileTokenStore::new(scratch_path("missing"));
        assert!(store.get(TokenKey::Access).await.unwrap().is_none());
        store.clear_all().await.unwrap();
    }
}
