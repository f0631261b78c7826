use crate::application_port::*;
use crate::domain_model::*;

/// Well-known keys the credential pair lives under.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum TokenKey {
    Access,
    Refresh,
}

impl TokenKey {
    pub const ALL: [TokenKey; 2] = [TokenKey::Access, TokenKey::Refresh];

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKey::Access => "access_token",
            TokenKey::Refresh => "refresh_token",
        }
    }
}

/// Durable key-value storage for the credential pair.
#[async_trait::async_trait]
pub trait TokenStore: Send + Sync {
    async fn get(&self, key: TokenKey) -> Result<Option<String>, StoreError>;
    async fn set(&self, key: TokenKey, value: &str) -> Result<(), StoreError>;
    async fn clear(&self, key: TokenKey) -> Result<(), StoreError>;

    async fn access_token(&self) -> Result<Option<AccessToken>, StoreError> {
        Ok(self.get(TokenKey::Access).await?.map(AccessToken))
    }

    async fn refresh_token(&self) -> Result<Option<RefreshToken>, StoreError> {
        Ok(self.get(TokenKey::Refresh).await?.map(RefreshToken))
    }

    /// Replace the stored pair. Implementations backed by a single document
    /// should override this to write both keys at once.
    async fn save_pair(&self, pair: &TokenPair) -> Result<(), StoreError> {
        self.set(TokenKey::Access, &pair.access_token.0).await?;
        self.set(TokenKey::Refresh, &pair.refresh_token.0).await
    }

    async fn clear_all(&self) -> Result<(), StoreError> {
        for key in TokenKey::ALL {
            self.clear(key).await?;
        }
        Ok(())
    }
}
