//! Delivery orders and time windows.

use serde::{Deserialize, Serialize};

use crate::graph::NodeId;

/// A closed interval `[ready, due]` of allowed service times.
///
/// # Examples
///
/// ```
/// use u_roadnet::models::TimeWindow;
///
/// let shift = TimeWindow::new(8.0, 18.0).unwrap();
/// let slot = TimeWindow::new(9.0, 11.0).unwrap();
/// assert!(shift.contains(12.0));
/// assert!(shift.contains_window(&slot));
/// assert!(!slot.contains_window(&shift));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "(f64, f64)", into = "(f64, f64)")]
pub struct TimeWindow {
    ready: f64,
    due: f64,
}

impl TimeWindow {
    /// Creates a new time window.
    ///
    /// Returns `None` if `ready > due` or either value is non-finite.
    pub fn new(ready: f64, due: f64) -> Option<Self> {
        if !ready.is_finite() || !due.is_finite() || ready > due {
            return None;
        }
        Some(Self { ready, due })
    }

    /// Earliest allowed time.
    pub fn ready(&self) -> f64 {
        self.ready
    }

    /// Latest allowed time.
    pub fn due(&self) -> f64 {
        self.due
    }

    /// Returns `true` if `time` falls within this window.
    pub fn contains(&self, time: f64) -> bool {
        time >= self.ready && time <= self.due
    }

    /// Returns `true` if `other` lies entirely inside this window.
    pub fn contains_window(&self, other: &TimeWindow) -> bool {
        self.ready <= other.ready && other.due <= self.due
    }
}

impl TryFrom<(f64, f64)> for TimeWindow {
    type Error = String;

    fn try_from((ready, due): (f64, f64)) -> Result<Self, Self::Error> {
        Self::new(ready, due).ok_or_else(|| format!("invalid time window ({ready}, {due})"))
    }
}

impl From<TimeWindow> for (f64, f64) {
    fn from(tw: TimeWindow) -> Self {
        (tw.ready, tw.due)
    }
}

/// A delivery of `weight` units to a graph node.
///
/// # Examples
///
/// ```
/// use u_roadnet::models::{Order, TimeWindow};
///
/// let order = Order::new(7, 42, 25.0)
///     .with_time_window(TimeWindow::new(9.0, 10.0).unwrap());
/// assert_eq!(order.id(), 7);
/// assert_eq!(order.destination(), 42);
/// assert_eq!(order.weight(), 25.0);
/// assert!(order.time_window().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    id: u64,
    destination: NodeId,
    weight: f64,
    #[serde(default)]
    time_window: Option<TimeWindow>,
}

impl Order {
    /// Creates an order without a time window.
    pub fn new(id: u64, destination: NodeId, weight: f64) -> Self {
        Self {
            id,
            destination,
            weight,
            time_window: None,
        }
    }

    /// Sets the order's delivery window.
    pub fn with_time_window(mut self, tw: TimeWindow) -> Self {
        self.time_window = Some(tw);
        self
    }

    /// Order ID.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Node the order is delivered to.
    pub fn destination(&self) -> NodeId {
        self.destination
    }

    /// Load the order occupies in a vehicle.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Delivery window, if any.
    pub fn time_window(&self) -> Option<&TimeWindow> {
        self.time_window.as_ref()
    }
}
