// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::cell::RefCell;
use std::rc::Rc;
use synqueue_core::HasTimestamp;

/// A sink that records every item it receives, in delivery order, for
/// assertions in tests. Stands in for the real sinks a producer would bind
/// at stream registration.
pub struct RecordingSink<T> {
    items: Rc<RefCell<Vec<T>>>,
}

impl<T> Default for RecordingSink<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RecordingSink<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Returns a callback suitable for `add_stream` that appends every
    /// dispatched item to this sink's recording.
    pub fn sink(&self) -> impl FnMut(T) + 'static
    where
        T: 'static,
    {
        let items = self.items.clone();
        move |item: T| items.borrow_mut().push(item)
    }

    /// Number of items recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl<T: Clone> RecordingSink<T> {
    /// Snapshot of every item recorded so far, in delivery order.
    #[must_use]
    pub fn items(&self) -> Vec<T> {
        self.items.borrow().clone()
    }
}

impl<T: HasTimestamp + Clone> RecordingSink<T> {
    /// Snapshot of every recorded item's timestamp, in delivery order.
    #[must_use]
    pub fn timestamps(&self) -> Vec<T::Timestamp> {
        self.items.borrow().iter().map(HasTimestamp::timestamp).collect()
    }
}
