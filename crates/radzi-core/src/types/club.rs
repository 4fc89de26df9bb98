//! Clubs reachable through share links.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Server identifier of a club.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClubId(pub u64);

impl fmt::Display for ClubId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A club as returned by the share-code lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Club {
    /// Internal identifier, used for the canonical route
    pub id: ClubId,
    /// Display name
    pub name: String,
    /// Opaque code used in deep links
    #[serde(default)]
    pub share_code: Option<String>,
}
