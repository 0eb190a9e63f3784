pub mod screen;
pub mod snapshot;

pub use screen::{FlowMetadata, LiveDataResponse, ScreenId, ScreenReport, ScreenTier};
pub use snapshot::{CorridorSummary, FlowSnapshot, GatewaySummary};
