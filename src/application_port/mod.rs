mod api;
mod booking;
mod review;
mod session;
mod store;

pub use api::*;
pub use booking::*;
pub use review::*;
pub use session::*;
pub use store::*;
