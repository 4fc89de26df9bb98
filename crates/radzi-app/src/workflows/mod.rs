//! Routing decisions taken outside of user interaction.

pub mod bootstrap;
pub mod lifetime;
pub mod share_code;

pub use bootstrap::Bootstrap;
pub use lifetime::ScreenLifetime;
pub use share_code::{
    ResolutionStatus, ShareCodeResolution, ShareCodeScreen, NOT_FOUND_MESSAGE_KEY,
};
