use crate::application_port::*;
use crate::domain_port::*;
use dashmap::DashMap;

/// Process-lifetime token storage. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    entries: DashMap<TokenKey, String>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get(&self, key: TokenKey) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(&key).map(|entry| entry.value().clone()))
    }

    async fn set(&self, key: TokenKey, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key, value.to_string());
        Ok(())
    }

    async fn clear(&self, key: TokenKey) -> Result<(), StoreError> {
        self.entries.remove(&key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_model::TokenPair;

    #[tokio::test]
    async fn save_pair_then_clear_all() {
        let store = MemoryTokenStore::new();
        store
            .save_pair(&TokenPair::new("access-1", "refresh-1"))
            .await
            .unwrap();
        assert_eq!(
            store.get(TokenKey::Access).await.unwrap().as_deref(),
            Some("access-1")
        );
        assert_eq!(
            store.get(TokenKey::Refresh).await.unwrap().as_deref(),
            Some("refresh-1")
        );

        store.clear_all().await.unwrap();
        assert!(store.access_token().await.unwrap().is_none());
        assert!(store.refresh_token().await.unwrap().is_none());
    }
}
