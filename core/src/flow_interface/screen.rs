use crate::prelude::FlowError;
use crate::routing::Direction;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Concourse level a corridor screen hangs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenTier {
    Lower,
    Upper,
}

/// Structured form of the feed's screen ids
/// (`Lower_Gate_{g}` and `Upper_Gate_{g}_{p}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenId {
    Lower { gate: u32 },
    Upper { gate: u32, panel: u32 },
}

impl ScreenId {
    pub fn tier(&self) -> ScreenTier {
        match self {
            ScreenId::Lower { .. } => ScreenTier::Lower,
            ScreenId::Upper { .. } => ScreenTier::Upper,
        }
    }

    pub fn gate(&self) -> u32 {
        match self {
            ScreenId::Lower { gate } | ScreenId::Upper { gate, .. } => *gate,
        }
    }

    /// Short badge label for upper screens (`P{gate}{panel}`); lower
    /// screens carry no badge and are never rendered.
    pub fn portal_label(&self) -> Option<String> {
        match self {
            ScreenId::Upper { gate, panel } => Some(format!("P{gate}{panel}")),
            ScreenId::Lower { .. } => None,
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScreenId::Lower { gate } => write!(f, "Lower_Gate_{gate}"),
            ScreenId::Upper { gate, panel } => write!(f, "Upper_Gate_{gate}_{panel}"),
        }
    }
}

impl FromStr for ScreenId {
    type Err = FlowError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let number = |part: &str| {
            part.parse::<u32>()
                .map_err(|_| FlowError::InvalidScreenId(raw.to_string()))
        };
        match raw.split('_').collect::<Vec<_>>().as_slice() {
            ["Lower", "Gate", gate] => Ok(ScreenId::Lower { gate: number(gate)? }),
            ["Upper", "Gate", gate, panel] => Ok(ScreenId::Upper {
                gate: number(gate)?,
                panel: number(panel)?,
            }),
            _ => Err(FlowError::InvalidScreenId(raw.to_string())),
        }
    }
}

impl Serialize for ScreenId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ScreenId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// One corridor-screen record from the live feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenReport {
    pub screen_id: ScreenId,
    pub assigned_gate: u32,
    pub recommended_gate: u32,
    pub people_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Feed-level metadata accompanying each refresh cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowMetadata {
    #[serde(default)]
    pub total_people: u32,
    #[serde(default)]
    pub max_capacity_per_gate: u32,
    #[serde(default)]
    pub num_gates: usize,
    #[serde(default)]
    pub latency_ms: u64,
}

/// Body of `GET /live-data`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LiveDataResponse {
    #[serde(default)]
    pub screens: Vec<ScreenReport>,
    #[serde(default)]
    pub metadata: FlowMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_ids_parse_both_tiers() {
        let upper: ScreenId = "Upper_Gate_1_2".parse().unwrap();
        assert_eq!(upper, ScreenId::Upper { gate: 1, panel: 2 });
        assert_eq!(upper.tier(), ScreenTier::Upper);

        let lower: ScreenId = "Lower_Gate_4".parse().unwrap();
        assert_eq!(lower, ScreenId::Lower { gate: 4 });
        assert_eq!(lower.portal_label(), None);
    }

    #[test]
    fn screen_ids_format_back_to_wire_form() {
        for raw in ["Upper_Gate_6_1", "Lower_Gate_2"] {
            let id: ScreenId = raw.parse().unwrap();
            assert_eq!(id.to_string(), raw);
        }
    }

    #[test]
    fn upper_screens_expose_portal_labels() {
        let id: ScreenId = "Upper_Gate_1_1".parse().unwrap();
        assert_eq!(id.portal_label().as_deref(), Some("P11"));
    }

    #[test]
    fn malformed_screen_ids_are_rejected() {
        for raw in ["Mid_Gate_1", "Upper_Gate_x_1", "Upper_Gate_1", "Gate_1"] {
            assert!(raw.parse::<ScreenId>().is_err(), "accepted {raw}");
        }
    }

    #[test]
    fn live_data_response_round_trips() {
        let json = r#"{
            "screens": [{
                "screen_id": "Upper_Gate_2_1",
                "assigned_gate": 2,
                "recommended_gate": 1,
                "people_count": 120,
                "direction": "left",
                "image_url": "http://127.0.0.1:8000/images/gate_2.jpg"
            }],
            "metadata": {
                "total_people": 120,
                "max_capacity_per_gate": 50,
                "num_gates": 6,
                "latency_ms": 12
            }
        }"#;
        let response: LiveDataResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.screens.len(), 1);
        assert_eq!(response.screens[0].direction, Some(Direction::Left));
        assert_eq!(response.metadata.num_gates, 6);

        let back = serde_json::to_string(&response).unwrap();
        assert!(back.contains("\"Upper_Gate_2_1\""));
    }
}
