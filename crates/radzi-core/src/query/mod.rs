//! Cache keys for the query layer.

mod key;

pub use key::{CacheKey, KeyParam};
