use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use crate::logger::*;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

pub const DEFAULT_BASE_URL: &str = "https://student2.softclub.tj";

const NO_CONTENT: u16 = 204;

/// Typed request layer over the remote booking API.
///
/// Holds no identity of its own: the bearer credential is read from the
/// token store on every call, so whatever the session last persisted is
/// what goes on the wire.
pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn HttpTransport>,
    token_store: Arc<dyn TokenStore>,
}

#[derive(Serialize)]
struct LogoutBody<'a> {
    token: &'a str,
}

#[derive(Serialize)]
struct RefreshBody<'a> {
    refresh_token: &'a str,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        transport: Arc<dyn HttpTransport>,
        token_store: Arc<dyn TokenStore>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            transport,
            token_store,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn bearer(&self) -> Option<AccessToken> {
        match self.token_store.access_token().await {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "could not read access token, sending request unauthenticated");
                None
            }
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<T, ApiError> {
        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
        if let Some(token) = self.bearer().await {
            headers.push(("Authorization".to_string(), format!("Bearer {}", token.0)));
        }
        let request = HttpRequest {
            method,
            url: format!("{}{}", self.base_url, path),
            headers,
            body,
        };

        debug!(%method, path, "api request");
        let response = self.transport.send(request).await.map_err(|e| {
            debug!(%method, path, error = %e, "api transport failure");
            ApiError::from(e)
        })?;

        if !response.is_success() {
            let message = extract_error_message(response.status, &response.body);
            debug!(%method, path, status = response.status, %message, "api request rejected");
            return Err(ApiError::Status {
                status: response.status,
                message,
            });
        }
        decode_body(response.status, &response.body)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(HttpMethod::Get, path, None).await
    }

    async fn send_json<B, T>(&self, method: HttpMethod, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let body = serde_json::to_vec(body).map_err(|e| ApiError::Encode(e.to_string()))?;
        self.execute(method, path, Some(body)).await
    }
}

/// Decode a successful body. "No content" decodes as JSON `null`, which is
/// what `()` and `Option<_>` results expect.
fn decode_body<T: DeserializeOwned>(status: u16, body: &[u8]) -> Result<T, ApiError> {
    let body: &[u8] = if status == NO_CONTENT || body.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        body
    };
    serde_json::from_slice(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Human-readable message for a failed response.
///
/// In order: a `detail` list of field errors joined with `", "`, then a
/// single `detail` or `message` value, then a generic status line.
pub fn extract_error_message(status: u16, body: &[u8]) -> String {
    let Ok(value) = serde_json::from_slice::<Value>(body) else {
        return format!("HTTP error! status: {status}");
    };

    if let Some(Value::Array(entries)) = value.get("detail") {
        if entries.is_empty() {
            return format!("Validation error: {status}");
        }
        return entries
            .iter()
            .map(entry_message)
            .collect::<Vec<_>>()
            .join(", ");
    }

    [value.get("detail"), value.get("message")]
        .into_iter()
        .flatten()
        .find_map(render_message)
        .unwrap_or_else(|| format!("HTTP error! status: {status}"))
}

fn entry_message(entry: &Value) -> String {
    match entry.get("msg").and_then(Value::as_str) {
        Some(msg) if !msg.is_empty() => msg.to_string(),
        _ => entry.to_string(),
    }
}

fn render_message(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// auth
impl ApiClient {
    pub async fn register(&self, input: &RegisterInput) -> Result<Identity, ApiError> {
        self.send_json(HttpMethod::Post, "/auth/register", input)
            .await
    }

    pub async fn login(&self, input: &LoginInput) -> Result<TokenPair, ApiError> {
        self.send_json(HttpMethod::Post, "/auth/login", input).await
    }

    pub async fn logout(&self, token: &AccessToken) -> Result<(), ApiError> {
        let body = LogoutBody { token: &token.0 };
        self.send_json(HttpMethod::Post, "/auth/logout", &body)
            .await
    }

    pub async fn refresh(&self, refresh_token: &RefreshToken) -> Result<TokenPair, ApiError> {
        let body = RefreshBody {
            refresh_token: &refresh_token.0,
        };
        self.send_json(HttpMethod::Post, "/auth/refresh", &body)
            .await
    }

    /// Identity lookup for the currently stored access token.
    pub async fn me(&self) -> Result<Identity, ApiError> {
        self.get("/auth/me").await
    }

    pub async fn profile(&self) -> Result<Identity, ApiError> {
        self.get("/auth/profile").await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<Identity, ApiError> {
        self.send_json(HttpMethod::Patch, "/auth/profile", update)
            .await
    }

    pub async fn roles(&self) -> Result<Vec<Role>, ApiError> {
        self.get("/auth/roles").await
    }
}

// destinations
impl ApiClient {
    pub async fn list_destinations(&self) -> Result<Vec<Destination>, ApiError> {
        self.get("/destinations/destinations").await
    }

    pub async fn get_destination(&self, id: &str) -> Result<Destination, ApiError> {
        self.get(&format!("/destinations/destinations/{id}")).await
    }

    pub async fn create_destination(
        &self,
        input: &DestinationCreate,
    ) -> Result<Destination, ApiError> {
        self.send_json(HttpMethod::Post, "/destinations/destinations", input)
            .await
    }

    pub async fn update_destination(
        &self,
        id: &str,
        input: &DestinationUpdate,
    ) -> Result<Destination, ApiError> {
        let path = format!("/destinations/destinations/{id}");
        self.send_json(HttpMethod::Put, &path, input).await
    }

    pub async fn delete_destination(&self, id: &str) -> Result<(), ApiError> {
        let path = format!("/destinations/destinations/{id}");
        self.execute(HttpMethod::Delete, &path, None).await
    }
}

// bookings
impl ApiClient {
    pub async fn list_bookings(&self) -> Result<Vec<Booking>, ApiError> {
        self.get("/bookings/bookings").await
    }

    pub async fn my_bookings(&self) -> Result<Vec<Booking>, ApiError> {
        self.get("/bookings/bookings/my").await
    }

    pub async fn create_booking(&self, input: &BookingCreate) -> Result<Booking, ApiError> {
        self.send_json(HttpMethod::Post, "/bookings/bookings", input)
            .await
    }

    pub async fn cancel_booking(&self, id: &str) -> Result<Booking, ApiError> {
        let path = format!("/bookings/bookings/{id}/cancel");
        self.execute(HttpMethod::Patch, &path, None).await
    }

    pub async fn update_booking_status(
        &self,
        id: &str,
        status: BookingStatus,
    ) -> Result<Booking, ApiError> {
        let path = format!("/bookings/bookings/{id}/status");
        self.send_json(HttpMethod::Patch, &path, &BookingStatusUpdate { status })
            .await
    }
}

// reviews
impl ApiClient {
    pub async fn destination_reviews(&self, destination_id: &str) -> Result<Vec<Review>, ApiError> {
        self.get(&format!("/reviews/destinations/{destination_id}/reviews"))
            .await
    }

    pub async fn create_review(&self, input: &ReviewCreate) -> Result<Review, ApiError> {
        self.send_json(HttpMethod::Post, "/reviews/reviews", input)
            .await
    }

    pub async fn update_review(&self, id: &str, input: &ReviewUpdate) -> Result<Review, ApiError> {
        let path = format!("/reviews/reviews/{id}");
        self.send_json(HttpMethod::Put, &path, input).await
    }

    pub async fn delete_review(&self, id: &str) -> Result<(), ApiError> {
        let path = format!("/reviews/reviews/{id}");
        self.execute(HttpMethod::Delete, &path, None).await
    }
}

// payments
impl ApiClient {
    pub async fn list_payments(&self) -> Result<Vec<Payment>, ApiError> {
        self.get("/payments/payments").await
    }

    pub async fn my_payments(&self) -> Result<Vec<Payment>, ApiError> {
        self.get("/payments/payments/my").await
    }

    pub async fn create_payment(&self, input: &PaymentCreate) -> Result<Payment, ApiError> {
        self.send_json(HttpMethod::Post, "/payments/payments", input)
            .await
    }
}
