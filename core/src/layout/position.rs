use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Upper clamp for marker coordinates, in percent of the map surface.
pub const MAX_PERCENT: f32 = 95.0;

/// Percentage coordinate along one axis of the map surface.
///
/// Serializes as the storage form `"NN%"` used by the persisted layouts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Percent(f32);

impl Percent {
    pub fn new(value: f32) -> Self {
        Self(value)
    }

    /// Constrain to the draggable band `[0, 95]`.
    pub fn clamped(value: f32) -> Self {
        Self(value.clamp(0.0, MAX_PERCENT))
    }

    pub fn value(self) -> f32 {
        self.0
    }

    /// Pixel offset of this coordinate on a surface of `extent` pixels.
    pub fn to_pixels(self, extent: f32) -> f32 {
        self.0 / 100.0 * extent
    }

    /// Clamped percentage of `extent` covered by `pixels`.
    pub fn from_pixels(pixels: f32, extent: f32) -> Self {
        if extent <= 0.0 {
            return Self::clamped(0.0);
        }
        Self::clamped(pixels / extent * 100.0)
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl Serialize for Percent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Percent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.trim()
            .trim_end_matches('%')
            .parse::<f32>()
            .map(Percent)
            .map_err(|_| de::Error::custom(format!("invalid percentage: {raw}")))
    }
}

/// Marker coordinate on the map surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentPoint {
    pub top: Percent,
    pub left: Percent,
}

impl PercentPoint {
    pub fn new(top: f32, left: f32) -> Self {
        Self {
            top: Percent::new(top),
            left: Percent::new(left),
        }
    }
}

/// One persisted layout record, the storage shape `{id, top, left}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerPosition {
    pub id: String,
    #[serde(flatten)]
    pub point: PercentPoint,
}

impl MarkerPosition {
    pub fn new(id: impl Into<String>, top: f32, left: f32) -> Self {
        Self {
            id: id.into(),
            point: PercentPoint::new(top, left),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_stays_inside_band() {
        assert_eq!(Percent::clamped(-12.0).value(), 0.0);
        assert_eq!(Percent::clamped(120.0).value(), 95.0);
        assert_eq!(Percent::clamped(95.0).value(), 95.0);
        assert_eq!(Percent::clamped(42.5).value(), 42.5);
    }

    #[test]
    fn pixel_conversion_round_trips() {
        let percent = Percent::new(40.0);
        let pixels = percent.to_pixels(1200.0);
        assert_eq!(pixels, 480.0);
        assert_eq!(Percent::from_pixels(pixels, 1200.0).value(), 40.0);
    }

    #[test]
    fn serializes_as_percentage_string() {
        let record = MarkerPosition::new("3", 45.0, 5.0);
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"id":"3","top":"45%","left":"5%"}"#);
        let parsed: MarkerPosition = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn parses_fractional_percentages() {
        let percent: Percent = serde_json::from_str("\"12.5%\"").unwrap();
        assert_eq!(percent.value(), 12.5);
    }
}
