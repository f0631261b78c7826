use super::SessionManager;
use crate::application_port::*;
use crate::domain_model::*;
use crate::logger::*;
use std::sync::Arc;

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

pub fn has_confirmed_booking(bookings: &[Booking], destination_id: &str) -> bool {
    bookings.iter().any(|booking| {
        booking.destination_id == destination_id && booking.status == BookingStatus::Confirmed
    })
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ReviewDraft {
    pub destination_id: String,
    pub rating: u8,
    pub comment: String,
    /// Set when editing an existing review.
    pub editing: Option<String>,
}

impl ReviewDraft {
    pub fn new(destination_id: impl Into<String>) -> Self {
        Self {
            destination_id: destination_id.into(),
            rating: MAX_RATING,
            comment: String::new(),
            editing: None,
        }
    }

    pub fn for_review(review: &Review) -> Self {
        Self {
            destination_id: review.destination_id.clone(),
            rating: review.rating,
            comment: review.comment.clone().unwrap_or_default(),
            editing: Some(review.id.clone()),
        }
    }

    fn comment(&self) -> Option<String> {
        let trimmed = self.comment.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

pub struct ReviewFlow {
    session: Arc<SessionManager>,
}

impl ReviewFlow {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self { session }
    }

    pub async fn reviews(&self, destination_id: &str) -> Result<Vec<Review>, ReviewError> {
        Ok(self.session.api().destination_reviews(destination_id).await?)
    }

    /// Whether the current user may review the destination. Any failure to
    /// find out counts as "no".
    pub async fn eligibility(&self, destination_id: &str) -> bool {
        if !self.session.is_authenticated() {
            return false;
        }
        match self.session.api().my_bookings().await {
            Ok(bookings) => has_confirmed_booking(&bookings, destination_id),
            Err(e) => {
                debug!(error = %e, "could not load bookings for review eligibility");
                false
            }
        }
    }

    pub async fn submit(&self, draft: &ReviewDraft) -> Result<Review, ReviewError> {
        if !(MIN_RATING..=MAX_RATING).contains(&draft.rating) {
            return Err(ReviewError::InvalidRating(draft.rating));
        }
        let api = self.session.api();
        let saved = match &draft.editing {
            Some(review_id) => {
                let update = ReviewUpdate {
                    rating: draft.rating,
                    comment: draft.comment(),
                };
                api.update_review(review_id, &update).await
            }
            None => {
                let create = ReviewCreate {
                    destination_id: draft.destination_id.clone(),
                    rating: draft.rating,
                    comment: draft.comment(),
                };
                api.create_review(&create).await
            }
        };
        saved.map_err(ReviewError::from_api)
    }

    pub async fn delete(&self, review_id: &str) -> Result<(), ReviewError> {
        self.session
            .api()
            .delete_review(review_id)
            .await
            .map_err(ReviewError::from_api)
    }
}
