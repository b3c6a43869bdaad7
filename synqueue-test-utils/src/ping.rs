// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::fmt::{self, Display};
use synqueue_core::HasTimestamp;

/// A minimal timestamped test payload: a sequence number and a `u64`
/// timestamp, standing in for a real sensor observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ping {
    pub seq: u64,
    pub timestamp: u64,
}

impl Ping {
    #[must_use]
    pub const fn new(seq: u64, timestamp: u64) -> Self {
        Self { seq, timestamp }
    }

    /// Shorthand for tests that only care about timestamp, not identity.
    #[must_use]
    pub const fn at(timestamp: u64) -> Self {
        Self::new(0, timestamp)
    }
}

impl HasTimestamp for Ping {
    type Timestamp = u64;

    fn timestamp(&self) -> u64 {
        self.timestamp
    }
}

impl Display for Ping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ping[seq={}, t={}]", self.seq, self.timestamp)
    }
}
