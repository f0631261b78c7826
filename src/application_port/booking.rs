use super::ApiError;

#[derive(Debug, Clone, thiserror::Error)]
pub enum BookingError {
    #[error("Please select a travel date")]
    MissingTravelDate,
    #[error("Invalid destination")]
    InvalidDestination,
    #[error("End date must be after start date.")]
    InvalidDateRange,
    #[error("Please log in to make a booking.")]
    NotAuthenticated,
    #[error("booking id {0} cannot be used for a payment")]
    UnpayableBooking(String),
    #[error(transparent)]
    Api(#[from] ApiError),
}
