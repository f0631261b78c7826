use crate::application_impl::*;
use crate::domain_port::*;
use crate::infra_http::*;
use crate::infra_store::*;
use crate::logger::*;
use crate::settings::Settings;
use std::sync::Arc;

/// Everything a front end needs, wired once at startup.
pub struct TravelClient {
    pub session: Arc<SessionManager>,
    pub bookings: BookingFlow,
    pub reviews: ReviewFlow,
}

impl TravelClient {
    pub fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let token_store: Arc<dyn TokenStore> = match settings.store.backend.as_str() {
            "memory" => Arc::new(MemoryTokenStore::new()),
            "file" => Arc::new(FileTokenStore::new(&settings.store.path)),
            other => return Err(anyhow::anyhow!("Unknown store backend: {}", other)),
        };
        let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::new()?);

        let client = Self::with_parts(&settings.api.base_url, transport, token_store);
        info!(base_url = client.session.api().base_url(), store = %settings.store.backend, "client ready");
        Ok(client)
    }

    pub fn with_parts(
        base_url: &str,
        transport: Arc<dyn HttpTransport>,
        token_store: Arc<dyn TokenStore>,
    ) -> Self {
        let api = Arc::new(ApiClient::new(base_url, transport, token_store.clone()));
        let session = Arc::new(SessionManager::new(api, token_store));
        Self {
            bookings: BookingFlow::new(session.clone()),
            reviews: ReviewFlow::new(session.clone()),
            session,
        }
    }

    pub fn api(&self) -> &ApiClient {
        self.session.api()
    }
}
