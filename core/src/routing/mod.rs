pub mod direction;
pub mod recommend;

pub use direction::Direction;
pub use recommend::{circular_distance, recommend_gate, GateDecision};
