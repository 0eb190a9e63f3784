pub mod drag;
pub mod position;
pub mod store;

pub use drag::DragTracker;
pub use position::{MarkerPosition, Percent, PercentPoint};
pub use store::{DisplayMode, MarkerKind, PositionStore};
