//! Layer 8: Test Handlers
//!
//! Deterministic implementations of the `radzi-core` effect traits with
//! knobs for failure injection, latency and call counting. Production code
//! never depends on this crate.

#![forbid(unsafe_code)]

pub mod api;
pub mod auth;
pub mod navigation;
pub mod storage;
pub mod time;

pub use api::{ApiCallCounts, ScriptedApi};
pub use auth::ScriptedAuth;
pub use navigation::RecordingNavigator;
pub use storage::FaultyStorage;
pub use time::SimulatedTimeHandler;
