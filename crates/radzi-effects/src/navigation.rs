//! Channel-backed navigation handler.
//!
//! The core never drives a navigation stack itself. Hosts receive the
//! requested replacements on a channel and apply them in their own router.

use radzi_core::effects::NavigationEffects;
use radzi_core::types::Route;
use tokio::sync::mpsc;

/// Forwards route replacements to the host over an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelNavigationHandler {
    tx: mpsc::UnboundedSender<Route>,
}

impl ChannelNavigationHandler {
    /// Create a handler and the receiving end the host listens on.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Route>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl NavigationEffects for ChannelNavigationHandler {
    fn replace(&self, route: &Route) {
        if self.tx.send(route.clone()).is_err() {
            tracing::warn!(route = %route, "navigation receiver dropped, redirect lost");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use radzi_core::types::ClubId;

    #[test]
    fn routes_arrive_in_order() {
        let (nav, mut rx) = ChannelNavigationHandler::channel();
        nav.replace(&Route::Welcome);
        nav.replace(&Route::Club(ClubId(7)));

        assert_eq!(rx.try_recv().unwrap(), Route::Welcome);
        assert_eq!(rx.try_recv().unwrap(), Route::Club(ClubId(7)));
        assert!(rx.try_recv().is_err());
    }
}
