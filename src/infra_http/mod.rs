mod reqwest_transport;
mod transport_fake;

pub use reqwest_transport::*;
pub use transport_fake::*;
