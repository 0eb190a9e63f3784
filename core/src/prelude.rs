use serde::{Deserialize, Serialize};

/// Shared configuration for the gate-routing rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    pub num_gates: usize,
    pub max_capacity: u32,
    pub penalty_factor: u32,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            num_gates: 6,
            max_capacity: 50,
            penalty_factor: 15,
        }
    }
}

/// Common error type for feed mapping, layout storage, and routing.
#[derive(thiserror::Error, Debug)]
pub enum FlowError {
    #[error("invalid screen id: {0}")]
    InvalidScreenId(String),
    #[error("invalid gate: {0}")]
    InvalidGate(String),
    #[error("malformed feed payload: {0}")]
    MalformedPayload(String),
    #[error("layout storage: {0}")]
    Storage(#[from] std::io::Error),
    #[error("layout encoding: {0}")]
    Encoding(#[from] serde_json::Error),
}

pub type FlowResult<T> = Result<T, FlowError>;
