//! Geographic bounding boxes.
//!
//! The read API filters by a rectangle given as
//! `min_lon,min_lat,max_lon,max_lat`. The text form doubles as the cache-key
//! component, so formatting must be canonical: floats use Rust's shortest
//! round-trip representation and no whitespace is emitted.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::errors::RadziError;

/// The full geographic extent the service supports.
///
/// Road-section queries always request this box instead of the visible
/// viewport and rely on the cache staleness window to bound refetches.
pub const SUPPORTED_EXTENT: BoundingBox = BoundingBox {
    min_lon: -10.0,
    min_lat: 35.0,
    max_lon: 20.0,
    max_lat: 65.0,
};

/// Rectangular geographic filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Western edge (degrees)
    pub min_lon: f64,
    /// Southern edge (degrees)
    pub min_lat: f64,
    /// Eastern edge (degrees)
    pub max_lon: f64,
    /// Northern edge (degrees)
    pub max_lat: f64,
}

impl BoundingBox {
    /// Create a validated bounding box.
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Result<Self, RadziError> {
        let bbox = Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        };
        bbox.validate()?;
        Ok(bbox)
    }

    /// Check coordinate ranges and edge ordering.
    pub fn validate(&self) -> Result<(), RadziError> {
        let coords = [self.min_lon, self.min_lat, self.max_lon, self.max_lat];
        if coords.iter().any(|c| !c.is_finite()) {
            return Err(RadziError::invalid("bounding box coordinates must be finite"));
        }
        if !(-180.0..=180.0).contains(&self.min_lon) || !(-180.0..=180.0).contains(&self.max_lon) {
            return Err(RadziError::invalid("longitude out of range [-180, 180]"));
        }
        if !(-90.0..=90.0).contains(&self.min_lat) || !(-90.0..=90.0).contains(&self.max_lat) {
            return Err(RadziError::invalid("latitude out of range [-90, 90]"));
        }
        if self.min_lon >= self.max_lon || self.min_lat >= self.max_lat {
            return Err(RadziError::invalid(format!(
                "bounding box edges out of order: {self}"
            )));
        }
        Ok(())
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.min_lon, self.min_lat, self.max_lon, self.max_lat
        )
    }
}

impl FromStr for BoundingBox {
    type Err = RadziError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(RadziError::invalid(format!(
                "bounding box needs 4 comma-separated values, got {}",
                parts.len()
            )));
        }
        let mut coords = [0.0f64; 4];
        for (slot, part) in coords.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| RadziError::invalid(format!("invalid coordinate: {part:?}")))?;
        }
        Self::new(coords[0], coords[1], coords[2], coords[3])
    }
}

impl Serialize for BoundingBox {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BoundingBox {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn supported_extent_renders_canonically() {
        assert_eq!(SUPPORTED_EXTENT.to_string(), "-10,35,20,65");
        assert!(SUPPORTED_EXTENT.validate().is_ok());
    }

    #[test]
    fn parse_tolerates_whitespace() {
        let bbox: BoundingBox = " 14.1, 49.0 ,24.2,54.9".parse().unwrap();
        assert_eq!(bbox.to_string(), "14.1,49,24.2,54.9");
    }

    #[test]
    fn parse_rejects_malformed_input() {
        assert!("1,2,3".parse::<BoundingBox>().is_err());
        assert!("a,2,3,4".parse::<BoundingBox>().is_err());
        assert!("20,35,-10,65".parse::<BoundingBox>().is_err());
        assert!("-10,35,20,95".parse::<BoundingBox>().is_err());
        assert!("NaN,35,20,65".parse::<BoundingBox>().is_err());
    }

    proptest! {
        #[test]
        fn text_form_parses_back(
            min_lon in -180.0f64..0.0,
            min_lat in -90.0f64..0.0,
            dx in 0.001f64..180.0,
            dy in 0.001f64..90.0,
        ) {
            let bbox = BoundingBox::new(min_lon, min_lat, min_lon + dx, min_lat + dy).unwrap();
            let parsed: BoundingBox = bbox.to_string().parse().unwrap();
            prop_assert_eq!(parsed, bbox);
        }
    }
}
