use super::ApiError;

pub const CONFIRMED_BOOKING_NOTICE: &str = "Only users with confirmed bookings can leave reviews.";

#[derive(Debug, Clone, thiserror::Error)]
pub enum ReviewError {
    #[error("Please select a rating between 1 and 5 stars.")]
    InvalidRating(u8),
    #[error("{}", CONFIRMED_BOOKING_NOTICE)]
    RequiresConfirmedBooking,
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl ReviewError {
    /// Maps an API failure, singling out permission refusals.
    pub fn from_api(error: ApiError) -> Self {
        if error.is_forbidden() {
            ReviewError::RequiresConfirmedBooking
        } else {
            ReviewError::Api(error)
        }
    }
}
