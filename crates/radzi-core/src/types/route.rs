//! Navigation destinations the client core can redirect to.

use std::fmt;

use super::ClubId;

/// A navigable destination.
///
/// Only the destinations reached by automatic redirects are modelled here;
/// the rest of the navigation tree belongs to the frontend.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    /// Main tabbed area for signed-in users
    Tabs,
    /// Welcome screen of the auth flow
    Welcome,
    /// Detail screen of one club
    Club(ClubId),
}

impl Route {
    /// Path understood by the frontend router.
    pub fn path(&self) -> String {
        match self {
            Self::Tabs => "/(tabs)".to_string(),
            Self::Welcome => "/(auth)/welcome".to_string(),
            Self::Club(id) => format!("/clubs/{id}"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_match_router_layout() {
        assert_eq!(Route::Tabs.path(), "/(tabs)");
        assert_eq!(Route::Welcome.path(), "/(auth)/welcome");
        assert_eq!(Route::Club(ClubId(42)).path(), "/clubs/42");
    }
}
