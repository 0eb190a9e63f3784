//! Core routing, layout, and feed model for the stadium crowd-flow platform.
//!
//! The modules mirror the crowd-control deployment: the wire shapes served
//! by the live feed, the gate-routing rules behind the corridor signage, and
//! the marker layout the dashboard renders and drags around.

pub mod flow_interface;
pub mod layout;
pub mod prelude;
pub mod routing;
pub mod telemetry;

pub use prelude::{FlowError, FlowResult, RoutingConfig};
