//! Radzi App - Portable headless client core
//!
//! The data-synchronization layer of the Radzi mobile client, free of any
//! UI framework:
//!
//! - [`queries`]: process-wide query cache with staleness windows and
//!   request coalescing, plus the policies for each read endpoint
//! - [`preferences`]: map layer and map mode persisted to device storage
//! - [`workflows`]: the startup bootstrap and share-code deep links
//!
//! Side effects go through the traits in `radzi-core`; hosts inject
//! handlers via [`AppEffects`].

#![forbid(unsafe_code)]

pub mod core;
pub mod preferences;
pub mod queries;
pub mod workflows;

pub use crate::core::{AppCore, AppEffects};
pub use preferences::{MapLayerStore, MapModeStore};
pub use queries::{QueryCache, QueryEntry, QueryPolicies, QueryStatus};
pub use workflows::{Bootstrap, ResolutionStatus, ShareCodeScreen};

pub use radzi_core::{RadziConfig, RadziError};
