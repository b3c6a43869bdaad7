// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::stream_queue::StreamQueue;
use crate::MergerConfig;
use std::collections::{BTreeMap, HashMap};
use std::time::Instant;
use synqueue_core::{HasTimestamp, RateLimiter, StreamKey};

/// Collates several independent, monotonically time-stamped streams into one
/// globally time-ordered dispatch.
///
/// Producers register a stream with [`add_stream`](Self::add_stream), push
/// items with [`add`](Self::add), and mark a stream as exhausted with
/// [`mark_stream_finished`](Self::mark_stream_finished) (or finish everything
/// at once with [`flush`](Self::flush)). Every one of those calls
/// synchronously drives the dispatch engine, which invokes each stream's sink
/// with items in non-decreasing global timestamp order for as long as it can
/// prove that is safe, then returns control to the caller.
///
/// # Startup synchronization
///
/// Streams are grouped by `trajectory_id`. The first time the engine touches
/// a trajectory with data available, it computes that trajectory's *common
/// start time*: the latest of the current head timestamps across all of its
/// streams. No item with a timestamp earlier than that is ever dispatched on
/// that trajectory — except the one item on each stream whose successor is
/// already past the common start time, which is dispatched anyway so that a
/// stream with no sample exactly at the common start still contributes a
/// bounding observation. This cache is computed once per trajectory and
/// never recomputed, even if streams for that trajectory register later.
///
/// # Fatal conditions
///
/// Registering an already-registered key, finishing an unknown or
/// already-finished stream, pushing an out-of-order timestamp, dropping the
/// merger with an unfinished stream, and re-entering the merger from inside
/// a sink callback are all programmer errors and panic immediately rather
/// than returning an error — there is no recovery path for any of them.
///
/// # Concurrency
///
/// The merger is not internally synchronized. All public methods must be
/// serialized by the caller; sinks run synchronously on the calling thread.
pub struct OrderedMultiQueueMerger<T: HasTimestamp> {
    streams: BTreeMap<StreamKey, StreamQueue<T>>,
    last_dispatched_time: Option<T::Timestamp>,
    blocker: Option<StreamKey>,
    common_start_times: HashMap<i64, T::Timestamp>,
    config: MergerConfig,
    unknown_key_warnings: RateLimiter,
    backlog_warnings: RateLimiter,
    ever_registered: bool,
    dispatching: bool,
}

impl<T: HasTimestamp> Default for OrderedMultiQueueMerger<T> {
    fn default() -> Self {
        Self::with_config(MergerConfig::default())
    }
}

impl<T: HasTimestamp> OrderedMultiQueueMerger<T> {
    /// Creates an empty merger with the default [`MergerConfig`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty merger with the given configuration, rejecting
    /// configurations that would make the diagnostic machinery meaningless.
    ///
    /// # Errors
    /// Returns [`synqueue_core::SynqueueError::InvalidConfig`] if `config`
    /// fails [`MergerConfig::validate`].
    pub fn try_with_config(config: MergerConfig) -> synqueue_core::Result<Self> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    /// Creates an empty merger with the given configuration.
    ///
    /// Prefer [`try_with_config`](Self::try_with_config) when `config` is
    /// not known in advance to be valid.
    #[must_use]
    pub fn with_config(config: MergerConfig) -> Self {
        Self {
            streams: BTreeMap::new(),
            last_dispatched_time: None,
            blocker: None,
            common_start_times: HashMap::new(),
            unknown_key_warnings: RateLimiter::new(config.warning_rate_limit),
            backlog_warnings: RateLimiter::new(config.warning_rate_limit),
            config,
            ever_registered: false,
            dispatching: false,
        }
    }

    /// Registers a new stream with its sink callback.
    ///
    /// # Panics
    /// Panics if `key` is already registered, or if called re-entrantly from
    /// inside a sink callback.
    pub fn add_stream(&mut self, key: StreamKey, sink: impl FnMut(T) + 'static) {
        self.deny_reentrancy("AddStream");
        assert!(
            !self.streams.contains_key(&key),
            "AddStream called with an already-registered key: {key}"
        );
        self.streams.insert(key, StreamQueue::new(Box::new(sink)));
        self.ever_registered = true;
    }

    /// Pushes an item onto `key`'s stream and drives dispatch.
    ///
    /// If `key` is not registered, the item is silently dropped and a
    /// rate-limited warning is logged; this is not a fatal condition.
    ///
    /// # Panics
    /// Panics if the pushed item's timestamp is smaller than the last item
    /// pushed on the same stream, or if called re-entrantly from inside a
    /// sink callback.
    pub fn add(&mut self, key: StreamKey, item: T) {
        self.deny_reentrancy("Add");
        match self.streams.get_mut(&key) {
            Some(queue) => queue.push(item),
            None => {
                if let Some(suppressed) = self.unknown_key_warnings.record(Instant::now()) {
                    synqueue_core::warn!(
                        "dropping item on unregistered stream {key} ({suppressed} similar drops suppressed)"
                    );
                }
                return;
            }
        }
        self.dispatch();
    }

    /// Marks `key`'s stream as finished (no further items will arrive) and
    /// drives dispatch.
    ///
    /// # Panics
    /// Panics if `key` is not registered, if it was already finished, or if
    /// called re-entrantly from inside a sink callback.
    pub fn mark_stream_finished(&mut self, key: &StreamKey) {
        self.deny_reentrancy("MarkStreamFinished");
        let queue = self
            .streams
            .get_mut(key)
            .unwrap_or_else(|| panic!("MarkStreamFinished called on unregistered key: {key}"));
        assert!(
            !queue.finished(),
            "MarkStreamFinished called twice for stream {key}"
        );
        queue.mark_finished();
        self.dispatch();
    }

    /// Marks every currently-unfinished stream as finished.
    ///
    /// # Panics
    /// Panics if called re-entrantly from inside a sink callback.
    pub fn flush(&mut self) {
        self.deny_reentrancy("Flush");
        let unfinished: Vec<StreamKey> = self
            .streams
            .iter()
            .filter(|(_, queue)| !queue.finished())
            .map(|(key, _)| key.clone())
            .collect();
        for key in unfinished {
            self.mark_stream_finished(&key);
        }
    }

    /// Returns the stream key that most recently prevented dispatch
    /// progress, or `None` if dispatch has never halted.
    ///
    /// # Panics
    /// Panics if no stream has ever been registered.
    #[must_use]
    pub fn get_blocker(&self) -> Option<&StreamKey> {
        assert!(
            self.ever_registered,
            "GetBlocker called before any stream was ever registered"
        );
        self.blocker.as_ref()
    }

    fn deny_reentrancy(&self, operation: &str) {
        assert!(
            !self.dispatching,
            "re-entrant call to {operation} from inside a sink callback is not allowed"
        );
    }

    /// Runs the dispatch loop to a fixed point: repeatedly emits the
    /// globally oldest deliverable item until no further progress can be
    /// proven safe.
    fn dispatch(&mut self) {
        self.dispatching = true;
        while self.step() {}
        self.dispatching = false;
    }

    /// One scan-and-decide iteration of §4.2. Returns `true` if the caller
    /// should keep looping.
    fn step(&mut self) -> bool {
        let keys: Vec<StreamKey> = self.streams.keys().cloned().collect();
        let mut candidate: Option<(StreamKey, T::Timestamp)> = None;

        for key in &keys {
            // Scoped so the borrow of `self.streams` ends before we might
            // need to mutate it (`remove`) below.
            let front = {
                let queue = self
                    .streams
                    .get(key)
                    .expect("stream present in its own scan snapshot");
                match queue.peek_front() {
                    None => None,
                    Some(item) => Some(item.timestamp()),
                }
            };

            let Some(timestamp) = front else {
                let erase = {
                    let queue = self
                        .streams
                        .get(key)
                        .expect("stream present in its own scan snapshot");
                    queue.finished() && queue.is_empty()
                };
                if erase {
                    self.streams.remove(key);
                    continue;
                }
                self.record_blocker(key.clone());
                return false;
            };

            if let Some(last) = self.last_dispatched_time {
                assert!(
                    timestamp >= last,
                    "stream {key} head timestamp {timestamp:?} precedes last dispatched timestamp {last:?}"
                );
            }
            if candidate.as_ref().map_or(true, |(_, t)| timestamp < *t) {
                candidate = Some((key.clone(), timestamp));
            }
        }

        let Some((candidate_key, timestamp)) = candidate else {
            assert!(
                self.streams.is_empty(),
                "scan found no candidate but streams remain registered"
            );
            return false;
        };

        let common_start = self.common_start_time(candidate_key.trajectory_id);

        if timestamp >= common_start {
            self.emit(&candidate_key, timestamp);
            return true;
        }

        let thin = self
            .streams
            .get(&candidate_key)
            .expect("candidate stream present after scan")
            .len()
            < 2;

        if thin {
            let finished = self
                .streams
                .get(&candidate_key)
                .expect("candidate stream present after scan")
                .finished();
            if !finished {
                self.record_blocker(candidate_key);
                return false;
            }
            self.emit(&candidate_key, timestamp);
            return true;
        }

        // Cold, deep queue: pop the stale head and peek behind it. If the
        // new head is already past the common start, the popped item is the
        // best available bounding sample for this stream and is dispatched
        // anyway; otherwise it predates the epoch and is dropped.
        let queue = self
            .streams
            .get_mut(&candidate_key)
            .expect("candidate stream present after scan");
        let popped = queue
            .pop_front()
            .expect("candidate stream has a front item by construction");
        let straddles = queue
            .peek_front()
            .is_some_and(|next| next.timestamp() > common_start);
        if straddles {
            self.last_dispatched_time = Some(timestamp);
            queue.dispatch(popped);
        }
        true
    }

    /// Pops and dispatches the front item of `key`'s stream, which must be
    /// the current candidate with timestamp `timestamp`.
    fn emit(&mut self, key: &StreamKey, timestamp: T::Timestamp) {
        let queue = self
            .streams
            .get_mut(key)
            .expect("candidate stream present when emitting");
        let item = queue
            .pop_front()
            .expect("candidate stream has a front item by construction");
        self.last_dispatched_time = Some(timestamp);
        queue.dispatch(item);
    }

    /// Resolves (and caches) the common start time for `trajectory_id`: the
    /// maximum head timestamp across all of its streams with data, at the
    /// moment of first resolution.
    fn common_start_time(&mut self, trajectory_id: i64) -> T::Timestamp {
        if let Some(&cached) = self.common_start_times.get(&trajectory_id) {
            return cached;
        }

        let resolved = self
            .streams
            .iter()
            .filter(|(key, _)| key.trajectory_id == trajectory_id)
            .filter_map(|(_, queue)| queue.peek_front().map(HasTimestamp::timestamp))
            .max()
            .expect("common_start_time invoked for a trajectory with no data on any stream");

        self.common_start_times.insert(trajectory_id, resolved);
        synqueue_core::info!(
            "trajectory {trajectory_id} common start time resolved to {resolved:?}"
        );
        resolved
    }

    fn record_blocker(&mut self, key: StreamKey) {
        let cap = self.config.soft_backlog_cap;
        let over_cap = self.streams.values().any(|queue| queue.len() > cap);
        self.blocker = Some(key.clone());

        if over_cap {
            if let Some(suppressed) = self.backlog_warnings.record(Instant::now()) {
                synqueue_core::warn!(
                    "dispatch stalled on stream {key}; backlog exceeds soft cap of {cap} items ({suppressed} similar warnings suppressed)"
                );
            }
        }
    }
}

impl<T: HasTimestamp> Drop for OrderedMultiQueueMerger<T> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            return;
        }
        for (key, queue) in &self.streams {
            assert!(
                queue.finished(),
                "OrderedMultiQueueMerger dropped with unfinished stream {key}"
            );
        }
    }
}
