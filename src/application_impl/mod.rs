mod api_client;
mod booking_flow;
mod destination_search;
mod review_flow;
mod session_manager;

pub use api_client::*;
pub use booking_flow::*;
pub use destination_search::*;
pub use review_flow::*;
pub use session_manager::*;
