//! Domain model types for delivery routing.
//!
//! Orders with weights and time windows, the fleet they are loaded onto,
//! routes as ordered sequences of stops, and the solution that reports
//! both the routes and the orders left out.

mod fleet;
mod order;
mod route;
mod solution;

pub use fleet::FleetConfig;
pub use order::{Order, TimeWindow};
pub use route::{Route, Stop};
pub use solution::{RoutingSolution, UnroutedOrder, UnroutedReason, Violation, ViolationType};
