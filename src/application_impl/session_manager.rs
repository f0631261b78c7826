use super::ApiClient;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use crate::logger::*;
use std::sync::Arc;
use tokio::sync::watch;

/// Owns the persisted credential pair and the broadcast session state.
///
/// Built once at startup and handed to whatever needs identity. Concurrent
/// calls are not serialized; the last write to the token store wins.
pub struct SessionManager {
    api: Arc<ApiClient>,
    token_store: Arc<dyn TokenStore>,
    state: watch::Sender<SessionState>,
}

impl SessionManager {
    pub fn new(api: Arc<ApiClient>, token_store: Arc<dyn TokenStore>) -> Self {
        let (state, _) = watch::channel(SessionState::Unresolved);
        Self {
            api,
            token_store,
            state,
        }
    }

    pub fn api(&self) -> &Arc<ApiClient> {
        &self.api
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.state.borrow().identity().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    fn publish(&self, next: SessionState) {
        let previous = self.state.send_replace(next);
        let current = self.state.borrow();
        if previous != *current {
            match current.identity() {
                Some(identity) => info!(user_id = %identity.id, username = %identity.username, "session authenticated"),
                None => info!(state = ?*current, "session changed"),
            }
        }
    }

    /// Validate the stored access token and publish the resulting state.
    ///
    /// A failed lookup gets one refresh and one retried lookup, nothing more.
    /// API failures end in `Anonymous`; only token store failures are errors,
    /// and those also leave the session `Anonymous`.
    pub async fn resolve(&self) -> Result<SessionState, SessionError> {
        match self.resolve_stored().await {
            Ok(next) => {
                self.publish(next.clone());
                Ok(next)
            }
            Err(e) => {
                self.publish(SessionState::Anonymous);
                Err(e)
            }
        }
    }

    async fn resolve_stored(&self) -> Result<SessionState, SessionError> {
        if self.token_store.access_token().await?.is_none() {
            return Ok(SessionState::Anonymous);
        }
        match self.api.me().await {
            Ok(identity) => Ok(SessionState::Authenticated(identity)),
            Err(e) => {
                debug!(error = %e, "identity lookup failed");
                self.recover().await
            }
        }
    }

    async fn recover(&self) -> Result<SessionState, SessionError> {
        let Some(refresh_token) = self.token_store.refresh_token().await? else {
            info!("no refresh token stored, dropping credentials");
            self.token_store.clear_all().await?;
            return Ok(SessionState::Anonymous);
        };

        let retried = match self.api.refresh(&refresh_token).await {
            Ok(pair) => {
                self.token_store.save_pair(&pair).await?;
                self.api.me().await
            }
            Err(e) => Err(e),
        };

        match retried {
            Ok(identity) => Ok(SessionState::Authenticated(identity)),
            Err(e) => {
                warn!(error = %e, "session refresh failed, dropping credentials");
                self.token_store.clear_all().await?;
                Ok(SessionState::Anonymous)
            }
        }
    }

    async fn require_identity(&self) -> Result<Identity, SessionError> {
        match self.resolve().await? {
            SessionState::Authenticated(identity) => Ok(identity),
            _ => Err(SessionError::NotAuthenticated),
        }
    }

    /// Exchange credentials for a token pair, persist it, then resolve.
    pub async fn login(&self, username: &str, password: &str) -> Result<Identity, SessionError> {
        let input = LoginInput {
            username: username.to_string(),
            password: password.to_string(),
        };
        let pair = self.api.login(&input).await?;
        self.token_store.save_pair(&pair).await?;
        self.require_identity().await
    }

    pub async fn register(
        &self,
        username: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<Identity, SessionError> {
        let input = RegisterInput {
            username: username.to_string(),
            password: password.to_string(),
            confirm_password: confirm_password.to_string(),
        };
        let created = self.api.register(&input).await?;
        debug!(user_id = %created.id, "account created");
        self.login(username, password).await
    }

    /// Always ends `Anonymous`. The remote call is best effort.
    pub async fn logout(&self) -> Result<(), SessionError> {
        let token = self.token_store.access_token().await.unwrap_or_else(|e| {
            warn!(error = %e, "could not read access token for remote logout");
            None
        });
        if let Some(token) = token {
            if let Err(e) = self.api.logout(&token).await {
                warn!(error = %e, "remote logout failed, clearing local session anyway");
            }
        }

        let cleared = self.token_store.clear_all().await;
        self.publish(SessionState::Anonymous);
        cleared.map_err(SessionError::from)
    }

    /// Save a theme on the profile and re-resolve so the broadcast identity
    /// carries it.
    pub async fn update_theme(&self, theme: Theme) -> Result<Identity, SessionError> {
        self.api
            .update_profile(&ProfileUpdate { theme: Some(theme) })
            .await?;
        self.require_identity().await
    }

    pub async fn toggle_theme(&self) -> Result<Identity, SessionError> {
        let current = self.identity().ok_or(SessionError::NotAuthenticated)?;
        self.update_theme(current.theme.toggled()).await
    }
}
