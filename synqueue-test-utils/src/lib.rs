// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions)]
//! Shared fixtures for testing `synqueue` crates: a timestamped payload
//! type, stream key builders, and a recording sink, so tests can assert
//! against real domain-shaped data instead of mocking the merger's own
//! collaborators.

pub mod keys;
pub mod ping;
pub mod recording_sink;

pub use ping::Ping;
pub use recording_sink::RecordingSink;
