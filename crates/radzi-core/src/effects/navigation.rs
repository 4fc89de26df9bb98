//! Navigation capability, implemented by the frontend host.

use crate::types::Route;

/// Route replacement.
///
/// Replace (not push): back-navigation must not return to the screen that
/// issued the redirect.
pub trait NavigationEffects: Send + Sync {
    /// Replace the current route with `route`.
    fn replace(&self, route: &Route);
}
