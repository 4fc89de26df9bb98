//! Layer 3: Production Effect Handlers
//!
//! Stateless or near-stateless implementations of the effect traits defined
//! in `radzi-core`. Each handler delegates to the OS or the network and
//! knows nothing about caching, preferences or routing.
//!
//! Deterministic, failure-injecting handlers live in `radzi-testkit`.

#![forbid(unsafe_code)]

pub mod api;
pub mod auth;
pub mod logging;
pub mod navigation;
pub mod storage;
pub mod time;

pub use api::HttpApiHandler;
pub use auth::{StoredTokenAuthHandler, AUTH_TOKEN_KEY};
pub use logging::init_tracing;
pub use navigation::ChannelNavigationHandler;
pub use storage::{FilesystemStorageHandler, MemoryStorageHandler};
pub use time::RealTimeHandler;
