// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions)]
//! Core traits and types shared by the `synqueue` ordered multi-queue merger.
//!
//! This crate holds the pieces that are useful independently of the dispatch
//! engine itself: the [`StreamKey`] identifier, the [`HasTimestamp`] trait,
//! the error type, and the rate-limited logging helpers used to keep the
//! merger's diagnostics from flooding under sustained backlog.

pub mod error;
pub mod has_timestamp;
pub mod logging;
pub mod rate_limiter;
pub mod stream_key;

pub use error::{Result, SynqueueError};
pub use has_timestamp::HasTimestamp;
pub use rate_limiter::RateLimiter;
pub use stream_key::StreamKey;
