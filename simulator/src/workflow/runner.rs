use crate::workflow::config::FeedConfig;
use crowdcore::flow_interface::{FlowMetadata, LiveDataResponse, ScreenId, ScreenReport};
use crowdcore::routing::recommend_gate;

#[derive(Clone)]
pub struct Runner {
    config: FeedConfig,
}

impl Runner {
    pub fn new(config: FeedConfig) -> Self {
        Self { config }
    }

    /// Route one window of per-gate counts into the wire payload: one lower
    /// screen plus two upper screens per gate, all carrying the same
    /// routing decision. The bridge stamps `latency_ms` before replying.
    pub fn execute(&self, counts: &[u32], images: &[String]) -> anyhow::Result<LiveDataResponse> {
        anyhow::ensure!(!counts.is_empty(), "no gate counts to route");
        let routing = self.config.to_routing_config();

        let mut screens = Vec::with_capacity(routing.num_gates * 3);
        for (index, count) in counts.iter().enumerate().take(routing.num_gates) {
            let gate_id = index as u32 + 1;
            let decision = recommend_gate(index, counts, &routing);
            let image_url = images.get(index).cloned();
            let report = |screen_id: ScreenId| ScreenReport {
                screen_id,
                assigned_gate: gate_id,
                recommended_gate: decision.recommended_gate,
                people_count: *count,
                direction: Some(decision.direction),
                image_url: image_url.clone(),
            };

            screens.push(report(ScreenId::Lower { gate: gate_id }));
            for panel in 1..=2 {
                screens.push(report(ScreenId::Upper {
                    gate: gate_id,
                    panel,
                }));
            }
        }

        let metadata = FlowMetadata {
            total_people: counts.iter().take(routing.num_gates).sum(),
            max_capacity_per_gate: routing.max_capacity,
            num_gates: routing.num_gates,
            latency_ms: 0,
        };

        Ok(LiveDataResponse { screens, metadata })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crowdcore::flow_interface::ScreenTier;
    use crowdcore::routing::Direction;

    #[test]
    fn runner_expands_three_screens_per_gate() {
        let runner = Runner::new(FeedConfig::from_args(6, 50, 15));
        let counts = [10, 20, 30, 40, 45, 5];
        let response = runner.execute(&counts, &[]).unwrap();
        assert_eq!(response.screens.len(), 18);
        let upper = response
            .screens
            .iter()
            .filter(|screen| screen.screen_id.tier() == ScreenTier::Upper)
            .count();
        assert_eq!(upper, 12);
        assert_eq!(response.metadata.total_people, 150);
    }

    #[test]
    fn quiet_gates_point_straight_at_themselves() {
        let runner = Runner::new(FeedConfig::from_args(6, 50, 15));
        let counts = [10; 6];
        let response = runner.execute(&counts, &[]).unwrap();
        for screen in &response.screens {
            assert_eq!(screen.recommended_gate, screen.assigned_gate);
            assert_eq!(screen.direction, Some(Direction::Straight));
        }
    }

    #[test]
    fn crowded_gate_is_redirected() {
        let runner = Runner::new(FeedConfig::from_args(6, 50, 15));
        let counts = [200, 5, 5, 5, 5, 5];
        let response = runner.execute(&counts, &[]).unwrap();
        let crowded = response
            .screens
            .iter()
            .find(|screen| screen.assigned_gate == 1)
            .unwrap();
        assert_ne!(crowded.recommended_gate, 1);
        assert_ne!(crowded.direction, Some(Direction::Straight));
    }

    #[test]
    fn image_urls_follow_gate_order() {
        let runner = Runner::new(FeedConfig::from_args(2, 50, 15));
        let images = vec!["a.jpg".to_string(), "b.jpg".to_string()];
        let response = runner.execute(&[1, 2], &images).unwrap();
        assert_eq!(response.screens[0].image_url.as_deref(), Some("a.jpg"));
        assert_eq!(response.screens[3].image_url.as_deref(), Some("b.jpg"));
    }

    #[test]
    fn empty_counts_are_rejected() {
        let runner = Runner::new(FeedConfig::from_args(6, 50, 15));
        assert!(runner.execute(&[], &[]).is_err());
    }
}
