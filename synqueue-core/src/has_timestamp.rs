// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

/// A minimal trait for items that carry a monotonic, totally ordered
/// timestamp for merge ordering.
///
/// Unlike richer timestamp traits elsewhere, this one is read-only on
/// purpose: the merger never constructs new items, it only inspects the
/// timestamp of items it already owns and moves them, untouched, into a
/// sink once it is safe to do so.
///
/// # Examples
///
/// ```
/// use synqueue_core::HasTimestamp;
///
/// struct LidarScan {
///     points: usize,
///     stamp_ns: u64,
/// }
///
/// impl HasTimestamp for LidarScan {
///     type Timestamp = u64;
///
///     fn timestamp(&self) -> u64 {
///         self.stamp_ns
///     }
/// }
/// ```
pub trait HasTimestamp {
    /// The timestamp type. Must be totally ordered and cheap to copy.
    type Timestamp: Ord + Copy + std::fmt::Debug;

    /// Returns this item's timestamp.
    fn timestamp(&self) -> Self::Timestamp;
}
