// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error types for `synqueue` operations.
//!
//! The dispatch engine's own programmer-error conditions (double
//! registration, finishing an unknown stream, ordering violations, …) are
//! fatal by specification and are reported as panics rather than through
//! this type — see `OrderedMultiQueueMerger`'s module documentation. This
//! error type exists for the surrounding, genuinely recoverable surface:
//! configuration and any future fallible construction.

/// Root error type for `synqueue` operations that can fail without being a
/// programmer error.
#[derive(Debug, thiserror::Error)]
pub enum SynqueueError {
    /// A `MergerConfig` value was invalid (e.g. a zero rate-limit window).
    #[error("invalid merger configuration: {context}")]
    InvalidConfig {
        /// Description of what made the configuration invalid.
        context: String,
    },
}

impl SynqueueError {
    /// Creates an `InvalidConfig` error with the given context.
    pub fn invalid_config(context: impl Into<String>) -> Self {
        Self::InvalidConfig {
            context: context.into(),
        }
    }
}

/// Specialized `Result` type for `synqueue` operations.
pub type Result<T> = std::result::Result<T, SynqueueError>;
