// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::time::Duration;
use synqueue_core::{Result, SynqueueError};

/// Tunables for [`crate::OrderedMultiQueueMerger`].
///
/// `MergerConfig` only governs diagnostics, not dispatch semantics: the
/// decision logic in §4.2 of the merger's own documentation is fixed, but
/// how loudly it complains about a growing backlog is configurable.
#[derive(Debug, Clone)]
pub struct MergerConfig {
    /// A per-stream backlog depth above which a stalled dispatch logs a
    /// warning naming the blocking stream. Diagnostic only — crossing it
    /// never blocks or drops data.
    pub soft_backlog_cap: usize,
    /// Minimum interval between repeated diagnostic log lines of the same
    /// kind (unknown-key drops, backlog warnings).
    pub warning_rate_limit: Duration,
}

impl Default for MergerConfig {
    fn default() -> Self {
        Self {
            soft_backlog_cap: 500,
            warning_rate_limit: Duration::from_secs(5),
        }
    }
}

impl MergerConfig {
    /// Creates a config with the default soft cap and rate limit window.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the soft backlog cap.
    #[must_use]
    pub fn with_soft_backlog_cap(mut self, cap: usize) -> Self {
        self.soft_backlog_cap = cap;
        self
    }

    /// Overrides the diagnostic rate-limit window.
    #[must_use]
    pub fn with_warning_rate_limit(mut self, window: Duration) -> Self {
        self.warning_rate_limit = window;
        self
    }

    /// Validates this configuration, rejecting values that would make the
    /// diagnostic machinery meaningless (a zero rate-limit window defeats
    /// rate limiting; a zero backlog cap would warn on the very first item).
    pub fn validate(&self) -> Result<()> {
        if self.warning_rate_limit.is_zero() {
            return Err(SynqueueError::invalid_config(
                "warning_rate_limit must be non-zero",
            ));
        }
        if self.soft_backlog_cap == 0 {
            return Err(SynqueueError::invalid_config(
                "soft_backlog_cap must be non-zero",
            ));
        }
        Ok(())
    }
}
