//! Auth-gated startup redirect
//!
//! The splash screen waits for both the authentication check and a minimum
//! presentation delay, then replaces itself with the tabbed area or the
//! welcome screen. Total wait is the longer of the two.

use radzi_core::effects::{AuthEffects, NavigationEffects, TimeEffects};
use radzi_core::types::Route;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::lifetime::ScreenLifetime;

/// One mount of the splash screen.
pub struct Bootstrap {
    auth: Arc<dyn AuthEffects>,
    time: Arc<dyn TimeEffects>,
    navigation: Arc<dyn NavigationEffects>,
    min_delay_ms: u64,
    lifetime: ScreenLifetime,
    fired: AtomicBool,
}

impl std::fmt::Debug for Bootstrap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bootstrap")
            .field("min_delay_ms", &self.min_delay_ms)
            .field("mounted", &self.lifetime.is_mounted())
            .field("fired", &self.fired.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl Bootstrap {
    /// Mount the splash screen.
    pub fn new(
        auth: Arc<dyn AuthEffects>,
        time: Arc<dyn TimeEffects>,
        navigation: Arc<dyn NavigationEffects>,
        min_delay_ms: u64,
    ) -> Self {
        Self {
            auth,
            time,
            navigation,
            min_delay_ms,
            lifetime: ScreenLifetime::new(),
            fired: AtomicBool::new(false),
        }
    }

    /// Liveness handle; unmounting cancels the pending redirect.
    pub fn lifetime(&self) -> ScreenLifetime {
        self.lifetime.clone()
    }

    /// Wait, decide, redirect.
    ///
    /// Returns the route navigated to, or `None` when the screen was gone
    /// or the redirect had already fired.
    pub async fn run(&self) -> Option<Route> {
        let (authenticated, delay) = tokio::join!(
            self.auth.is_authenticated(),
            self.time.sleep_ms(self.min_delay_ms)
        );

        if let Err(err) = delay {
            tracing::warn!(error = %err, "splash delay timer failed");
        }
        let authenticated = authenticated.unwrap_or_else(|err| {
            tracing::warn!(error = %err, "auth check failed, treating as signed out");
            false
        });

        if !self.lifetime.is_mounted() {
            tracing::debug!("splash unmounted before bootstrap finished");
            return None;
        }
        if self.fired.swap(true, Ordering::SeqCst) {
            return None;
        }

        let route = if authenticated {
            Route::Tabs
        } else {
            Route::Welcome
        };
        tracing::info!(route = %route, authenticated, "bootstrap redirect");
        self.navigation.replace(&route);
        Some(route)
    }
}

impl Drop for Bootstrap {
    fn drop(&mut self) {
        self.lifetime.unmount();
    }
}
