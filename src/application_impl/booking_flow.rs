use super::SessionManager;
use crate::application_port::*;
use crate::domain_model::*;
use crate::logger::*;
use chrono::{Days, NaiveDate};
use std::sync::Arc;

pub const PRICE_PER_PERSON: u32 = 899;
pub const SERVICE_FEE_PERCENT: u32 = 10;
pub const PRICE_PER_PERSON_PER_DAY: u32 = 150;
pub const TRIP_LENGTH_DAYS: u64 = 5;
pub const MIN_TRAVELERS: u32 = 1;
pub const MAX_TRAVELERS: u32 = 20;
pub const DEFAULT_TRAVELERS: u32 = 2;

/// Client-side estimate. The server stays the pricing authority.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct PriceQuote {
    pub travelers: u32,
    pub subtotal: u32,
    pub service_fee: u32,
    pub total: u32,
}

impl PriceQuote {
    pub fn for_travelers(travelers: u32) -> Self {
        let travelers = travelers.clamp(MIN_TRAVELERS, MAX_TRAVELERS);
        let subtotal = PRICE_PER_PERSON * travelers;
        // rounds half up
        let service_fee = (subtotal * SERVICE_FEE_PERCENT + 50) / 100;
        Self {
            travelers,
            subtotal,
            service_fee,
            total: subtotal + service_fee,
        }
    }
}

/// Form state for a fixed-length trip starting on `travel_date`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BookingDraft {
    pub destination_id: String,
    pub travel_date: Option<NaiveDate>,
    pub travelers_count: u32,
}

impl BookingDraft {
    pub fn new(destination_id: impl Into<String>) -> Self {
        Self {
            destination_id: destination_id.into(),
            travel_date: None,
            travelers_count: DEFAULT_TRAVELERS,
        }
    }

    pub fn with_travel_date(mut self, date: NaiveDate) -> Self {
        self.travel_date = Some(date);
        self
    }

    pub fn with_travelers(mut self, travelers: u32) -> Self {
        self.travelers_count = travelers.clamp(MIN_TRAVELERS, MAX_TRAVELERS);
        self
    }

    pub fn adjust_travelers(&mut self, delta: i32) {
        let next = i64::from(self.travelers_count) + i64::from(delta);
        let clamped = next.clamp(i64::from(MIN_TRAVELERS), i64::from(MAX_TRAVELERS));
        self.travelers_count = u32::try_from(clamped).unwrap_or(MIN_TRAVELERS);
    }

    pub fn quote(&self) -> PriceQuote {
        PriceQuote::for_travelers(self.travelers_count)
    }

    pub fn to_request(&self) -> Result<BookingCreate, BookingError> {
        let start_date = self.travel_date.ok_or(BookingError::MissingTravelDate)?;
        if self.destination_id.trim().is_empty() {
            return Err(BookingError::InvalidDestination);
        }
        let end_date = start_date
            .checked_add_days(Days::new(TRIP_LENGTH_DAYS))
            .ok_or(BookingError::InvalidDateRange)?;
        let quote = self.quote();
        Ok(BookingCreate {
            destination_id: self.destination_id.clone(),
            start_date,
            end_date,
            travelers_count: quote.travelers,
            total_price: f64::from(quote.total),
        })
    }
}

/// Form state for an explicit date range, priced per person per day.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RangeDraft {
    pub destination_id: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub travelers_count: u32,
}

impl RangeDraft {
    pub fn new(destination_id: impl Into<String>) -> Self {
        Self {
            destination_id: destination_id.into(),
            start_date: None,
            end_date: None,
            travelers_count: MIN_TRAVELERS,
        }
    }

    /// Party size as sent to the server.
    pub fn travelers(&self) -> u32 {
        self.travelers_count.clamp(MIN_TRAVELERS, MAX_TRAVELERS)
    }

    /// Zero until both dates are set.
    pub fn estimated_total(&self) -> u64 {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => {
                let days = u64::try_from((end - start).num_days()).unwrap_or(0);
                days * u64::from(PRICE_PER_PERSON_PER_DAY) * u64::from(self.travelers())
            }
            _ => 0,
        }
    }

    pub fn to_request(&self) -> Result<BookingCreate, BookingError> {
        if self.destination_id.trim().is_empty() {
            return Err(BookingError::InvalidDestination);
        }
        let (Some(start_date), Some(end_date)) = (self.start_date, self.end_date) else {
            return Err(BookingError::MissingTravelDate);
        };
        if start_date >= end_date {
            return Err(BookingError::InvalidDateRange);
        }
        Ok(BookingCreate {
            destination_id: self.destination_id.clone(),
            start_date,
            end_date,
            travelers_count: self.travelers(),
            total_price: self.estimated_total() as f64,
        })
    }
}

#[derive(Debug, Clone)]
pub struct PaymentRequest {
    pub provider: String,
    pub currency: Option<String>,
}

#[derive(Debug, Clone)]
pub enum PaymentOutcome {
    Skipped,
    Paid(Payment),
    Failed(BookingError),
}

/// A created booking plus whatever happened to its payment. A failed
/// payment does not undo the booking.
#[derive(Debug, Clone)]
pub struct BookingOutcome {
    pub booking: Booking,
    pub payment: PaymentOutcome,
}

pub struct BookingFlow {
    session: Arc<SessionManager>,
}

impl BookingFlow {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self { session }
    }

    pub async fn book_draft(
        &self,
        draft: &BookingDraft,
        payment: Option<PaymentRequest>,
    ) -> Result<BookingOutcome, BookingError> {
        let request = draft.to_request()?;
        self.book(&request, payment).await
    }

    pub async fn book(
        &self,
        request: &BookingCreate,
        payment: Option<PaymentRequest>,
    ) -> Result<BookingOutcome, BookingError> {
        if !self.session.is_authenticated() {
            return Err(BookingError::NotAuthenticated);
        }

        let booking = self.session.api().create_booking(request).await?;
        info!(booking_id = %booking.id, total = booking.total_price, "booking created");

        let payment = match payment {
            None => PaymentOutcome::Skipped,
            Some(payment) => match self.pay(&booking, payment).await {
                Ok(paid) => PaymentOutcome::Paid(paid),
                Err(e) => {
                    warn!(booking_id = %booking.id, error = %e, "payment for booking failed");
                    PaymentOutcome::Failed(e)
                }
            },
        };
        Ok(BookingOutcome { booking, payment })
    }

    async fn pay(&self, booking: &Booking, payment: PaymentRequest) -> Result<Payment, BookingError> {
        let booking_id = booking
            .id
            .parse::<i64>()
            .map_err(|_| BookingError::UnpayableBooking(booking.id.clone()))?;
        let request = PaymentCreate {
            booking_id,
            amount: booking.total_price,
            currency: Some(
                payment
                    .currency
                    .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            ),
            provider: payment.provider,
        };
        Ok(self.session.api().create_payment(&request).await?)
    }

    pub async fn my_bookings(&self) -> Result<Vec<Booking>, BookingError> {
        Ok(self.session.api().my_bookings().await?)
    }

    pub async fn cancel(&self, booking_id: &str) -> Result<Booking, BookingError> {
        let booking = self.session.api().cancel_booking(booking_id).await?;
        info!(booking_id = %booking.id, status = %booking.status, "booking cancelled");
        Ok(booking)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application_impl::ApiClient;
    use crate::domain_port::*;
    use crate::infra_http::FakeTransport;
    use crate::infra_store::MemoryTokenStore;
    use serde_json::json;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn booking_json(id: &str, total: f64) -> serde_json::Value {
        json!({
            "id": id,
            "user_id": 7,
            "destination_id": "d1",
            "start_date": "2026-11-01",
            "end_date": "2026-11-06",
            "travelers_count": 2,
            "total_price": total,
            "status": "pending",
            "created_at": "2026-10-19T10:00:00Z"
        })
    }

    async fn signed_in() -> (BookingFlow, Arc<FakeTransport>) {
        let transport = Arc::new(FakeTransport::new());
        let store = Arc::new(MemoryTokenStore::new());
        store
            .save_pair(&TokenPair::new("good", "refresh"))
            .await
            .unwrap();
        transport.respond(
            HttpMethod::Get,
            "/auth/me",
            200,
            json!({"id": 7, "username": "mira", "theme": "default"}),
        );
        let api = Arc::new(ApiClient::new(
            "https://api.example.test",
            transport.clone(),
            store.clone(),
        ));
        let session = Arc::new(SessionManager::new(api, store));
        session.resolve().await.unwrap();
        (BookingFlow::new(session), transport)
    }

    #[test]
    fn quote_adds_rounded_service_fee() {
        let quote = PriceQuote::for_travelers(2);
        assert_eq!(quote.subtotal, 1798);
        assert_eq!(quote.service_fee, 180);
        assert_eq!(quote.total, 1978);

        let quote = PriceQuote::for_travelers(1);
        assert_eq!(quote.service_fee, 90);
        assert_eq!(quote.total, 989);
    }

    #[test]
    fn travelers_stay_within_bounds() {
        let mut draft = BookingDraft::new("d1");
        draft.adjust_travelers(-5);
        assert_eq!(draft.travelers_count, MIN_TRAVELERS);
        draft.adjust_travelers(100);
        assert_eq!(draft.travelers_count, MAX_TRAVELERS);
        assert_eq!(PriceQuote::for_travelers(0).travelers, MIN_TRAVELERS);
    }

    #[test]
    fn draft_request_spans_five_days() {
        let request = BookingDraft::new("d1")
            .with_travel_date(date("2026-12-29"))
            .to_request()
            .unwrap();
        assert_eq!(request.start_date, date("2026-12-29"));
        assert_eq!(request.end_date, date("2027-01-03"));
        assert_eq!(request.travelers_count, 2);
        assert_eq!(request.total_price, 1978.0);

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["start_date"], "2026-12-29");
        assert_eq!(body["end_date"], "2027-01-03");
    }

    #[test]
    fn draft_without_date_or_destination_is_rejected() {
        let err = BookingDraft::new("d1").to_request().unwrap_err();
        assert!(matches!(err, BookingError::MissingTravelDate));

        let err = BookingDraft::new(" ")
            .with_travel_date(date("2026-11-01"))
            .to_request()
            .unwrap_err();
        assert!(matches!(err, BookingError::InvalidDestination));
    }

    #[test]
    fn range_draft_prices_per_day_and_rejects_inverted_ranges() {
        let mut draft = RangeDraft::new("d1");
        assert_eq!(draft.estimated_total(), 0);
        draft.start_date = Some(date("2026-11-01"));
        draft.end_date = Some(date("2026-11-04"));
        draft.travelers_count = 2;
        assert_eq!(draft.estimated_total(), 900);
        assert_eq!(draft.to_request().unwrap().total_price, 900.0);

        draft.end_date = Some(date("2026-11-01"));
        assert!(matches!(
            draft.to_request().unwrap_err(),
            BookingError::InvalidDateRange
        ));
    }

    #[test]
    fn range_draft_total_matches_clamped_party_size() {
        let mut draft = RangeDraft::new("d1");
        draft.start_date = Some(date("2026-11-01"));
        draft.end_date = Some(date("2026-11-03"));
        draft.travelers_count = 50;

        let request = draft.to_request().unwrap();
        assert_eq!(request.travelers_count, MAX_TRAVELERS);
        assert_eq!(request.total_price, 6000.0);
        assert_eq!(draft.estimated_total(), 6000);

        draft.travelers_count = 0;
        assert_eq!(draft.to_request().unwrap().total_price, 300.0);
    }

    #[tokio::test]
    async fn anonymous_session_cannot_book() {
        let transport = Arc::new(FakeTransport::new());
        let store = Arc::new(MemoryTokenStore::new());
        let api = Arc::new(ApiClient::new("https://api.example.test", transport.clone(), store.clone()));
        let session = Arc::new(SessionManager::new(api, store));
        session.resolve().await.unwrap();

        let draft = BookingDraft::new("d1").with_travel_date(date("2026-11-01"));
        let err = BookingFlow::new(session)
            .book_draft(&draft, None)
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::NotAuthenticated));
        assert_eq!(transport.count(HttpMethod::Post, "/bookings/bookings"), 0);
    }

    #[tokio::test]
    async fn booking_then_payment() {
        let (flow, transport) = signed_in().await;
        transport.respond(HttpMethod::Post, "/bookings/bookings", 201, booking_json("42", 1978.0));
        transport.respond(
            HttpMethod::Post,
            "/payments/payments",
            201,
            json!({
                "id": "p1",
                "booking_id": 42,
                "amount": 1978.0,
                "currency": "USD",
                "provider": "stripe",
                "status": "pending",
                "created_at": "2026-10-19T10:00:01Z"
            }),
        );

        let draft = BookingDraft::new("d1").with_travel_date(date("2026-11-01"));
        let outcome = flow
            .book_draft(
                &draft,
                Some(PaymentRequest {
                    provider: "stripe".into(),
                    currency: None,
                }),
            )
            .await
            .unwrap();

        assert_eq!(outcome.booking.id, "42");
        assert!(matches!(outcome.payment, PaymentOutcome::Paid(ref p) if p.booking_id == 42));

        let sent = &transport.requests_to(HttpMethod::Post, "/payments/payments")[0];
        let body: serde_json::Value = serde_json::from_slice(sent.body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({"booking_id": 42, "amount": 1978.0, "currency": "USD", "provider": "stripe"})
        );
    }

    #[tokio::test]
    async fn failed_payment_keeps_the_booking() {
        let (flow, transport) = signed_in().await;
        transport.respond(HttpMethod::Post, "/bookings/bookings", 201, booking_json("43", 989.0));
        transport.respond(
            HttpMethod::Post,
            "/payments/payments",
            502,
            json!({"detail": "provider unavailable"}),
        );

        let request = BookingDraft::new("d1")
            .with_travel_date(date("2026-11-01"))
            .with_travelers(1)
            .to_request()
            .unwrap();
        let outcome = flow
            .book(
                &request,
                Some(PaymentRequest {
                    provider: "stripe".into(),
                    currency: Some("EUR".into()),
                }),
            )
            .await
            .unwrap();

        assert_eq!(outcome.booking.id, "43");
        match outcome.payment {
            PaymentOutcome::Failed(e) => assert_eq!(e.to_string(), "provider unavailable"),
            other => panic!("expected failed payment, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_numeric_booking_id_is_not_paid() {
        let (flow, transport) = signed_in().await;
        transport.respond(
            HttpMethod::Post,
            "/bookings/bookings",
            201,
            booking_json("0b6f-uuid", 1978.0),
        );

        let draft = BookingDraft::new("d1").with_travel_date(date("2026-11-01"));
        let outcome = flow
            .book_draft(
                &draft,
                Some(PaymentRequest {
                    provider: "stripe".into(),
                    currency: None,
                }),
            )
            .await
            .unwrap();
        assert!(matches!(
            outcome.payment,
            PaymentOutcome::Failed(BookingError::UnpayableBooking(_))
        ));
        assert_eq!(transport.count(HttpMethod::Post, "/payments/payments"), 0);
    }

    #[tokio::test]
    async fn rejected_booking_surfaces_server_message() {
        let (flow, transport) = signed_in().await;
        transport.respond(
            HttpMethod::Post,
            "/bookings/bookings",
            422,
            json!({"detail": [{"msg": "start_date must be in the future"}]}),
        );

        let draft = BookingDraft::new("d1").with_travel_date(date("2020-01-01"));
        let err = flow.book_draft(&draft, None).await.unwrap_err();
        assert_eq!(err.to_string(), "start_date must be in the future");
    }
}
