use serde::{Deserialize, Serialize};

/// Raw per-gate counts accepted on the ingest route, standing in for the
/// camera detector of the live deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountsIngest {
    pub counts: Vec<u32>,
    #[serde(default)]
    pub images: Vec<String>,
}
