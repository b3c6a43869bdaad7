// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions)]
//! Ordered multi-queue merger: the synchronization core of a multi-sensor
//! ingest pipeline.
//!
//! [`OrderedMultiQueueMerger`] collates several independent,
//! monotonically time-stamped input streams (lidar, odometry, IMU, …) into
//! one globally time-ordered dispatch, invoking a per-stream sink callback
//! in non-decreasing timestamp order even though items may arrive out of
//! order across streams at the ingress boundary.
//!
//! See the [`OrderedMultiQueueMerger`] docs for the full dispatch algorithm.

mod config;
mod ordered_multi_queue;
mod stream_queue;

pub use config::MergerConfig;
pub use ordered_multi_queue::OrderedMultiQueueMerger;

pub use synqueue_core::{HasTimestamp, StreamKey};
