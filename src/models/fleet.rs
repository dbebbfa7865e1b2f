//! Fleet parameters shared by every route.

use serde::{Deserialize, Serialize};

use super::TimeWindow;
use crate::graph::NodeId;

/// Homogeneous fleet: every vehicle has the same capacity and depot.
///
/// The number of vehicles is not bounded; the route builder opens a new
/// route whenever the current one cannot take another order.
///
/// # Examples
///
/// ```
/// use u_roadnet::models::{FleetConfig, TimeWindow};
///
/// let fleet = FleetConfig::new(100.0, 1)
///     .unwrap()
///     .with_time_window(TimeWindow::new(8.0, 18.0).unwrap());
/// assert_eq!(fleet.capacity(), 100.0);
/// assert_eq!(fleet.depot(), 1);
/// assert_eq!(fleet.time_window().map(|tw| tw.ready()), Some(8.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFleetConfig")]
pub struct FleetConfig {
    capacity: f64,
    depot: NodeId,
    #[serde(default)]
    time_window: Option<TimeWindow>,
}

impl FleetConfig {
    /// Creates a fleet with the given capacity starting from `depot`.
    ///
    /// Returns `None` if `capacity` is negative or non-finite.
    /// Default: no global time window.
    pub fn new(capacity: f64, depot: NodeId) -> Option<Self> {
        if !capacity.is_finite() || capacity < 0.0 {
            return None;
        }
        Some(Self {
            capacity,
            depot,
            time_window: None,
        })
    }

    /// Sets the global service window orders must fit inside.
    pub fn with_time_window(mut self, tw: TimeWindow) -> Self {
        self.time_window = Some(tw);
        self
    }

    /// Maximum load per route.
    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Node every route starts and ends at.
    pub fn depot(&self) -> NodeId {
        self.depot
    }

    /// Global service window, if any.
    pub fn time_window(&self) -> Option<&TimeWindow> {
        self.time_window.as_ref()
    }
}

#[derive(Deserialize)]
struct RawFleetConfig {
    capacity: f64,
    depot: NodeId,
    #[serde(default)]
    time_window: Option<TimeWindow>,
}

impl TryFrom<RawFleetConfig> for FleetConfig {
    type Error = String;

    fn try_from(raw: RawFleetConfig) -> Result<Self, Self::Error> {
        let fleet = Self::new(raw.capacity, raw.depot)
            .ok_or_else(|| format!("invalid fleet capacity {}", raw.capacity))?;
        Ok(match raw.time_window {
            Some(tw) => fleet.with_time_window(tw),
            None => fleet,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fleet_new() {
        let f = FleetConfig::new(50.0, 3).expect("valid fleet");
        assert_eq!(f.capacity(), 50.0);
        assert_eq!(f.depot(), 3);
        assert!(f.time_window().is_none());
    }

    #[test]
    fn test_fleet_from_json() {
        let f: FleetConfig =
            serde_json::from_str(r#"{"capacity":50.0,"depot":0,"time_window":[9.0,11.0]}"#)
                .expect("valid json");
        assert_eq!(f.time_window().map(|tw| tw.due()), Some(11.0));
    }

    #[test]
    fn test_fleet_rejects_bad_capacity() {
        assert!(FleetConfig::new(f64::NAN, 0).is_none());
        assert!(FleetConfig::new(f64::INFINITY, 0).is_none());
        assert!(FleetConfig::new(-1.0, 0).is_none());
        assert!(FleetConfig::new(0.0, 0).is_some());
    }

    #[test]
    fn test_fleet_from_json_rejects_negative_capacity() {
        let parsed = serde_json::from_str::<FleetConfig>(r#"{"capacity":-5.0,"depot":0}"#);
        assert!(parsed.is_err());
    }
}
