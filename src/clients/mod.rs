pub mod http;
pub mod pool;

pub use http::{RquestTransport, Transport};
pub use pool::ClientPool;
