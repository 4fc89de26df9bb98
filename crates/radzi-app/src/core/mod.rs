//! # Core Application Module
//!
//! - [`AppCore`]: owns the query cache, the preference stores and the
//!   injected effect handlers
//! - [`AppEffects`]: the handler bundle a host provides

mod app;
mod effects;

pub use app::AppCore;
pub use effects::AppEffects;
