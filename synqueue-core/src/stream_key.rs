// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::fmt;

/// Identifies one input stream: a trajectory together with the sensor that
/// feeds it.
///
/// `StreamKey` has a total, lexicographic order (`trajectory_id` first, then
/// `sensor_id`) so a [`BTreeMap`](std::collections::BTreeMap) keyed by it
/// gives the merger a deterministic scan order without needing an auxiliary
/// index.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StreamKey {
    pub trajectory_id: i64,
    pub sensor_id: String,
}

impl StreamKey {
    /// Creates a new key for the given trajectory and sensor.
    pub fn new(trajectory_id: i64, sensor_id: impl Into<String>) -> Self {
        Self {
            trajectory_id,
            sensor_id: sensor_id.into(),
        }
    }
}

impl fmt::Display for StreamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(trajectory={}, sensor={})", self.trajectory_id, self.sensor_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orders_by_trajectory_then_sensor() {
        let a = StreamKey::new(0, "lidar");
        let b = StreamKey::new(0, "odometry");
        let c = StreamKey::new(1, "imu");
        assert!(a < b);
        assert!(b < c);
        assert!(a < c);
    }

    #[test]
    fn equal_keys_compare_equal() {
        assert_eq!(StreamKey::new(3, "imu"), StreamKey::new(3, "imu"));
    }
}
