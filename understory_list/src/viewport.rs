// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The scroll container the list publishes its rows into.

use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use kurbo::{Point, Rect, Size};

use crate::{ItemIndex, ViewId};

/// One positioned object published to the scroll container.
///
/// Rectangles are in content coordinates: `y = 0` is the top of the first row.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ListObject {
    /// A mounted row view bound to `index`.
    Row {
        /// The row's data index.
        index: ItemIndex,
        /// The recycled view showing it.
        view: ViewId,
        /// Where the view is placed.
        bounds: Rect,
    },
    /// A separator line between two rows.
    Separator {
        /// Where the line is drawn.
        bounds: Rect,
    },
}

impl ListObject {
    /// Bounds of this object in content coordinates.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        match self {
            Self::Row { bounds, .. } | Self::Separator { bounds } => *bounds,
        }
    }
}

/// Vertical scroll container hosting the list content.
///
/// The container owns the scroll offset as the user sees it; the list reads it
/// when resized and writes it when scrolling a row into view. Hosts forward
/// their own scroll notifications to `List::scrolled`.
pub trait ScrollContainer {
    /// Size of the visible area.
    fn size(&self) -> Size;

    /// Resizes the visible area.
    fn resize(&self, size: Size);

    /// Current scroll offset of the content.
    fn offset(&self) -> Point;

    /// Moves the content so that `offset` is at the top-left of the visible area.
    fn set_offset(&self, offset: Point);

    /// Replaces the content with `objects`, laid out over `content_size`.
    fn set_content(&self, objects: Vec<ListObject>, content_size: Size);
}

/// In-memory [`ScrollContainer`] that records what the list publishes.
#[derive(Debug, Default)]
pub struct ScrollViewport {
    size: Cell<Size>,
    offset: Cell<Point>,
    content_size: Cell<Size>,
    objects: RefCell<Vec<ListObject>>,
}

impl ScrollViewport {
    /// Creates an empty viewport with zero size.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Size of the published content.
    #[must_use]
    pub fn content_size(&self) -> Size {
        self.content_size.get()
    }

    /// Snapshot of the published objects, rows first, then separators.
    #[must_use]
    pub fn objects(&self) -> Vec<ListObject> {
        self.objects.borrow().clone()
    }

    /// Number of published separators.
    #[must_use]
    pub fn separator_count(&self) -> usize {
        self.objects
            .borrow()
            .iter()
            .filter(|o| matches!(o, ListObject::Separator { .. }))
            .count()
    }
}

impl ScrollContainer for ScrollViewport {
    fn size(&self) -> Size {
        self.size.get()
    }

    fn resize(&self, size: Size) {
        self.size.set(size);
    }

    fn offset(&self) -> Point {
        self.offset.get()
    }

    fn set_offset(&self, offset: Point) {
        self.offset.set(offset);
    }

    fn set_content(&self, objects: Vec<ListObject>, content_size: Size) {
        self.content_size.set(content_size);
        *self.objects.borrow_mut() = objects;
    }
}
