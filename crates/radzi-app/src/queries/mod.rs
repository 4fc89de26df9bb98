//! Query cache and the policies built on it.

pub mod cache;
pub mod policies;

pub use cache::{CacheStats, QueryCache, QueryEntry, QueryOptions, QueryStatus, QueryWatcher};
pub use policies::{
    club_share_code_key, community_sections_key, feedback_key, personal_sections_key,
    QueryPolicies, StalenessWindows,
};
