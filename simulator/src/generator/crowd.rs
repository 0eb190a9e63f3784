use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Configuration for generating synthetic per-gate crowd counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrowdConfig {
    pub gates: usize,
    pub seed: u64,
    /// Ceiling for the base count at any gate.
    pub peak: u32,
    /// Per-cycle wobble applied on top of the base count, mirroring the
    /// detector noise of the live deployment.
    pub jitter: u32,
    /// Base URL the camera frames are served under.
    pub image_base: String,
    pub scenario: Option<String>,
    pub description: Option<String>,
}

impl Default for CrowdConfig {
    fn default() -> Self {
        Self {
            gates: 6,
            seed: 0,
            peak: 150,
            jitter: 3,
            image_base: "http://127.0.0.1:8000/images".into(),
            scenario: None,
            description: None,
        }
    }
}

impl CrowdConfig {
    fn normalized_gates(&self) -> usize {
        self.gates.max(1)
    }
}

/// Deterministic per-gate people counts for one refresh window.
pub fn gate_counts(config: &CrowdConfig, window: u64) -> Vec<u32> {
    let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(window));
    (0..config.normalized_gates())
        .map(|_| {
            let base = rng.gen_range(0..=config.peak) as i64;
            let jitter = config.jitter as i64;
            let wobble = rng.gen_range(-jitter..=jitter);
            (base + wobble).max(0) as u32
        })
        .collect()
}

/// Camera frame rotation: each gate shows one of the gate images for the
/// duration of a time window, so consecutive polls inside a window agree.
pub fn rotate_images(config: &CrowdConfig, window: u64) -> Vec<String> {
    let gates = config.normalized_gates();
    let base = config.image_base.trim_end_matches('/');
    (0..gates)
        .map(|index| {
            let mut rng = StdRng::seed_from_u64(
                config
                    .seed
                    .wrapping_add(window)
                    .wrapping_add(index as u64 + 1),
            );
            let pick = rng.gen_range(0..gates) + 1;
            format!("{base}/gate_{pick}.jpg")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_are_deterministic_per_seed_and_window() {
        let config = CrowdConfig::default();
        assert_eq!(gate_counts(&config, 7), gate_counts(&config, 7));
        assert_ne!(gate_counts(&config, 7), gate_counts(&config, 8));
    }

    #[test]
    fn counts_stay_within_the_configured_band() {
        let config = CrowdConfig {
            peak: 40,
            jitter: 5,
            ..Default::default()
        };
        for window in 0..50 {
            for count in gate_counts(&config, window) {
                assert!(count <= 45);
            }
        }
    }

    #[test]
    fn one_count_per_gate() {
        let config = CrowdConfig {
            gates: 4,
            ..Default::default()
        };
        assert_eq!(gate_counts(&config, 0).len(), 4);
        assert_eq!(gate_counts(&CrowdConfig { gates: 0, ..Default::default() }, 0).len(), 1);
    }

    #[test]
    fn rotation_picks_known_gate_images() {
        let config = CrowdConfig::default();
        let images = rotate_images(&config, 3);
        assert_eq!(images.len(), 6);
        for url in images {
            let name = url.rsplit('/').next().unwrap();
            assert!(name.starts_with("gate_") && name.ends_with(".jpg"), "{url}");
        }
        assert_eq!(rotate_images(&config, 3), rotate_images(&config, 3));
    }
}
