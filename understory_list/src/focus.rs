// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The focus seam between the list and the host's focus system.

use core::cell::Cell;

use crate::ViewId;

/// Host focus manager as seen by the list.
///
/// The list only needs to know which view currently holds input focus and to
/// drop focus when that view is recycled for a different row.
pub trait FocusManager {
    /// The view that currently holds input focus, if any.
    fn focused(&self) -> Option<ViewId>;

    /// Clears input focus.
    fn clear_focus(&self);
}

/// Minimal [`FocusManager`] that tracks a single focused view.
#[derive(Debug, Default)]
pub struct FocusTracker {
    focused: Cell<Option<ViewId>>,
}

impl FocusTracker {
    /// Creates a tracker with nothing focused.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves focus to `view`, or clears it with `None`.
    pub fn focus(&self, view: Option<ViewId>) {
        self.focused.set(view);
    }
}

impl FocusManager for FocusTracker {
    fn focused(&self) -> Option<ViewId> {
        self.focused.get()
    }

    fn clear_focus(&self) {
        self.focused.set(None);
    }
}
