use crate::flow_interface::screen::{FlowMetadata, LiveDataResponse, ScreenId, ScreenTier};
use crate::routing::Direction;
use serde::{Deserialize, Serialize};

/// Live analysis for one gateway marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewaySummary {
    pub id: u32,
    pub count: u32,
    pub status: Direction,
    pub recommended_gate: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Live analysis for one corridor-screen marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorridorSummary {
    pub id: ScreenId,
    pub target_gateway_id: u32,
    pub direction: Direction,
    pub people_count: u32,
}

/// Both overlay result sets plus feed metadata.
///
/// Built in one step from a feed response and replaced wholesale on every
/// refresh, so a consumer never observes gateway data from one cycle next
/// to corridor data from another.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowSnapshot {
    pub gateways: Vec<GatewaySummary>,
    pub corridors: Vec<CorridorSummary>,
    pub metadata: FlowMetadata,
}

impl FlowSnapshot {
    pub fn from_response(response: &LiveDataResponse) -> Self {
        let mut gateways: Vec<GatewaySummary> = Vec::new();
        for screen in &response.screens {
            if gateways.iter().any(|gateway| gateway.id == screen.assigned_gate) {
                continue;
            }
            gateways.push(GatewaySummary {
                id: screen.assigned_gate,
                count: screen.people_count,
                status: Direction::between(screen.assigned_gate, screen.recommended_gate),
                recommended_gate: screen.recommended_gate,
                image_url: screen.image_url.clone(),
            });
        }
        gateways.sort_by_key(|gateway| gateway.id);

        let corridors = response
            .screens
            .iter()
            .filter(|screen| screen.screen_id.tier() == ScreenTier::Upper)
            .map(|screen| CorridorSummary {
                id: screen.screen_id,
                target_gateway_id: screen.recommended_gate,
                direction: screen.direction.unwrap_or_else(|| {
                    Direction::between(screen.assigned_gate, screen.recommended_gate)
                }),
                people_count: screen.people_count,
            })
            .collect();

        Self {
            gateways,
            corridors,
            metadata: response.metadata.clone(),
        }
    }

    pub fn gateway(&self, id: u32) -> Option<&GatewaySummary> {
        self.gateways.iter().find(|gateway| gateway.id == id)
    }

    /// Lookup by the marker id string the layout store uses.
    pub fn corridor(&self, marker_id: &str) -> Option<&CorridorSummary> {
        self.corridors
            .iter()
            .find(|corridor| corridor.id.to_string() == marker_id)
    }

    pub fn is_empty(&self) -> bool {
        self.gateways.is_empty() && self.corridors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow_interface::screen::ScreenReport;

    fn report(
        screen_id: &str,
        assigned_gate: u32,
        recommended_gate: u32,
        people_count: u32,
        direction: Option<Direction>,
    ) -> ScreenReport {
        ScreenReport {
            screen_id: screen_id.parse().unwrap(),
            assigned_gate,
            recommended_gate,
            people_count,
            direction,
            image_url: None,
        }
    }

    #[test]
    fn maps_the_reference_response() {
        let response = LiveDataResponse {
            screens: vec![report("Upper_Gate_2_1", 2, 1, 120, None)],
            metadata: FlowMetadata::default(),
        };
        let snapshot = FlowSnapshot::from_response(&response);

        let gateway = snapshot.gateway(2).unwrap();
        assert_eq!(gateway.count, 120);
        assert_eq!(gateway.status, Direction::Left);

        let corridor = snapshot.corridor("Upper_Gate_2_1").unwrap();
        assert_eq!(corridor.target_gateway_id, 1);
        assert_eq!(corridor.direction, Direction::Left);
    }

    #[test]
    fn deduplicates_gateways_across_screens() {
        let response = LiveDataResponse {
            screens: vec![
                report("Lower_Gate_3", 3, 3, 20, Some(Direction::Straight)),
                report("Upper_Gate_3_1", 3, 3, 20, Some(Direction::Straight)),
                report("Upper_Gate_3_2", 3, 3, 20, Some(Direction::Straight)),
            ],
            metadata: FlowMetadata::default(),
        };
        let snapshot = FlowSnapshot::from_response(&response);
        assert_eq!(snapshot.gateways.len(), 1);
        assert_eq!(snapshot.corridors.len(), 2);
    }

    #[test]
    fn lower_screens_never_reach_the_overlay() {
        let response = LiveDataResponse {
            screens: vec![report("Lower_Gate_1", 1, 1, 5, None)],
            metadata: FlowMetadata::default(),
        };
        let snapshot = FlowSnapshot::from_response(&response);
        assert!(snapshot.corridors.is_empty());
        assert_eq!(snapshot.gateways.len(), 1);
    }

    #[test]
    fn feed_direction_wins_over_recomputation() {
        let response = LiveDataResponse {
            screens: vec![report("Upper_Gate_1_1", 1, 4, 80, Some(Direction::Left))],
            metadata: FlowMetadata::default(),
        };
        let snapshot = FlowSnapshot::from_response(&response);
        // between(1, 4) would say Right; the feed's ring-aware answer stands.
        assert_eq!(snapshot.corridors[0].direction, Direction::Left);
    }

    #[test]
    fn missing_direction_falls_back_to_icon_rule() {
        let response = LiveDataResponse {
            screens: vec![report("Upper_Gate_5_1", 5, 6, 10, None)],
            metadata: FlowMetadata::default(),
        };
        let snapshot = FlowSnapshot::from_response(&response);
        assert_eq!(snapshot.corridors[0].direction, Direction::Right);
    }
}
