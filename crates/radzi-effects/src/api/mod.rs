//! Remote read API handlers.

mod http;

pub use http::HttpApiHandler;
