//! Layer 1: Effect Trait Definitions
//!
//! Pure trait definitions for every side effect the client core performs.
//! This module defines **what** effects can be performed; handlers in
//! `radzi-effects` (production) and `radzi-testkit` (tests) define **how**.
//!
//! # Effect Classification
//!
//! ## Infrastructure Effects (`radzi-effects`)
//! - **Storage**: device key-value store
//! - **Time**: monotonic clock and sleeping
//!
//! ## Application Effects
//! - **Api**: the remote read endpoints
//! - **Auth**: the opaque "is the user signed in" capability
//! - **Navigation**: route replacement, implemented by the frontend host

pub mod api;
pub mod auth;
pub mod navigation;
pub mod storage;
pub mod time;

pub use api::{ApiError, RadziApiEffects};
pub use auth::{AuthEffects, AuthError};
pub use navigation::NavigationEffects;
pub use storage::{StorageEffects, StorageError};
pub use time::{TimeEffects, TimeError};
