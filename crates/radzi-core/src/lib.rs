//! Radzi Core - Client Data Model and Effect Interfaces
//!
//! This crate holds the pieces of the Radzi client core that carry no
//! runtime: the domain records returned by the read API, the hierarchical
//! cache keys used by the query layer, the persisted preference values, and
//! the effect traits through which the application core reaches storage,
//! time, the network, authentication and navigation.
//!
//! # Layers
//!
//! - **Layer 1** (`radzi-core`): pure types and effect signatures
//! - **Layer 3** (`radzi-effects`): production handlers
//! - **Layer 5** (`radzi-app`): headless application core
//! - **Layer 8** (`radzi-testkit`): deterministic test handlers

#![forbid(unsafe_code)]

/// Configuration model and loading
pub mod config;
/// Effect trait definitions
pub mod effects;
/// Unified error type
pub mod errors;
/// Cache keys for the query layer
pub mod query;
/// Domain records and preference values
pub mod types;

pub use config::RadziConfig;
pub use errors::{ErrorCategory, RadziError};
pub use query::{CacheKey, KeyParam};
pub use types::{
    BoundingBox, Club, ClubId, ConfidenceLevel, FeedbackMode, FeedbackRecord, HeatmapMode,
    MapLayer, MapModeState, RoadSectionRating, RoadSectionScore, Route, ViewMode,
};
