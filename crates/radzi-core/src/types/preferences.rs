//! Persisted map preferences.
//!
//! Both values are tiny and closed: a base-map style, and the three-way map
//! mode tuple. Toggles are pure functions so the result never depends on
//! when the persisted value finished loading.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::RadziError;

/// Base map style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapLayer {
    /// Light vector style
    Light,
    /// Dark vector style
    Dark,
    /// Street detail
    Streets,
    /// Terrain and trails
    Outdoors,
    /// Aerial imagery
    Satellite,
}

impl MapLayer {
    /// All layers, in picker order.
    pub const ALL: [MapLayer; 5] = [
        MapLayer::Light,
        MapLayer::Dark,
        MapLayer::Streets,
        MapLayer::Outdoors,
        MapLayer::Satellite,
    ];

    /// Computed default for the current color scheme.
    pub fn default_for_theme(is_dark: bool) -> Self {
        if is_dark {
            Self::Dark
        } else {
            Self::Light
        }
    }

    /// Persisted name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::Streets => "streets",
            Self::Outdoors => "outdoors",
            Self::Satellite => "satellite",
        }
    }
}

impl fmt::Display for MapLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MapLayer {
    type Err = RadziError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|layer| layer.as_str() == s)
            .ok_or_else(|| RadziError::invalid(format!("unknown map layer: {s:?}")))
    }
}

/// What the map shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Feedback markers
    Feedback,
    /// Road-section heatmap
    Heatmap,
}

/// Whose ratings the heatmap shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeatmapMode {
    /// The current user's own ratings
    Personal,
    /// Aggregated scores from everyone
    Global,
}

impl HeatmapMode {
    /// The other variant.
    pub fn flipped(self) -> Self {
        match self {
            Self::Personal => Self::Global,
            Self::Global => Self::Personal,
        }
    }
}

/// Whose feedback the markers show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackMode {
    /// Community feedback
    Community,
    /// The current user's feedback
    Personal,
}

impl FeedbackMode {
    /// The other variant.
    pub fn flipped(self) -> Self {
        match self {
            Self::Community => Self::Personal,
            Self::Personal => Self::Community,
        }
    }
}

/// Map mode tuple persisted as one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapModeState {
    /// Active view
    pub view_mode: ViewMode,
    /// Heatmap source
    pub heatmap_mode: HeatmapMode,
    /// Feedback source
    pub feedback_mode: FeedbackMode,
}

impl Default for MapModeState {
    fn default() -> Self {
        Self {
            view_mode: ViewMode::Feedback,
            heatmap_mode: HeatmapMode::Personal,
            feedback_mode: FeedbackMode::Community,
        }
    }
}

impl MapModeState {
    /// Same state with the heatmap source flipped.
    #[must_use]
    pub fn with_heatmap_toggled(self) -> Self {
        Self {
            heatmap_mode: self.heatmap_mode.flipped(),
            ..self
        }
    }

    /// Same state with the feedback source flipped.
    #[must_use]
    pub fn with_feedback_toggled(self) -> Self {
        Self {
            feedback_mode: self.feedback_mode.flipped(),
            ..self
        }
    }

    /// Same state showing `view_mode`.
    #[must_use]
    pub fn with_view_mode(self, view_mode: ViewMode) -> Self {
        Self { view_mode, ..self }
    }
}
