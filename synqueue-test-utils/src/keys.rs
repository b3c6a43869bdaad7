// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use synqueue_core::StreamKey;

/// Builders for the common sensor streams used across test scenarios.

#[must_use]
pub fn lidar(trajectory_id: i64) -> StreamKey {
    StreamKey::new(trajectory_id, "lidar")
}

#[must_use]
pub fn odometry(trajectory_id: i64) -> StreamKey {
    StreamKey::new(trajectory_id, "odometry")
}

#[must_use]
pub fn imu(trajectory_id: i64) -> StreamKey {
    StreamKey::new(trajectory_id, "imu")
}
