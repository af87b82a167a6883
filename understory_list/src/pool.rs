// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Free list of idle row views.

use alloc::vec::Vec;

/// Free list of interchangeable idle views.
///
/// Views are homogeneous and fully rebound before reuse, so the pool makes no
/// ordering promise: [`obtain`](Self::obtain) returns whichever idle view is
/// cheapest to hand out.
#[derive(Debug)]
pub struct ItemPool<T> {
    idle: Vec<T>,
}

impl<T> Default for ItemPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ItemPool<T> {
    /// Creates an empty pool.
    #[must_use]
    pub const fn new() -> Self {
        Self { idle: Vec::new() }
    }

    /// Takes an idle view out of the pool, or `None` if the pool is empty.
    pub fn obtain(&mut self) -> Option<T> {
        self.idle.pop()
    }

    /// Returns a view to the pool.
    ///
    /// The caller must already have unmounted it.
    pub fn release(&mut self, view: T) {
        self.idle.push(view);
    }

    /// Number of idle views.
    #[must_use]
    pub fn len(&self) -> usize {
        self.idle.len()
    }

    /// Returns `true` if no views are idle.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.idle.is_empty()
    }

    /// Iterates the idle views.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.idle.iter()
    }
}
