mod http_transport;
mod token_store;

pub use http_transport::*;
pub use token_store::*;
