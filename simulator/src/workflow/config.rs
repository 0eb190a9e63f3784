use anyhow::Context;
use crowdcore::prelude::RoutingConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Feed-side knobs: gate count plus the routing constants.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FeedConfig {
    pub gates: usize,
    pub max_capacity: u32,
    pub penalty_factor: u32,
}

impl FeedConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading feed config {}", path_ref.display()))?;
        let config: FeedConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing feed config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(gates: usize, max_capacity: u32, penalty_factor: u32) -> Self {
        Self {
            gates,
            max_capacity,
            penalty_factor,
        }
    }

    pub fn to_routing_config(&self) -> RoutingConfig {
        RoutingConfig {
            num_gates: self.gates,
            max_capacity: self.max_capacity,
            penalty_factor: self.penalty_factor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_produces_routing_config() {
        let cfg = FeedConfig::from_args(6, 50, 15);
        assert_eq!(cfg.to_routing_config().max_capacity, 50);
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"gates: 4\nmax_capacity: 80\npenalty_factor: 10\n")
            .unwrap();
        let path = temp.into_temp_path();
        let cfg = FeedConfig::load(&path).unwrap();
        assert_eq!(cfg.gates, 4);
        assert_eq!(cfg.penalty_factor, 10);
    }
}
