mod booking;
mod destination;
mod payment;
mod review;
mod timestamp;
mod token;
mod user;

pub use booking::*;
pub use destination::*;
pub use payment::*;
pub use review::*;
pub use token::*;
pub use user::*;
