// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recyclable row views and the content they embed.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::fmt;
use core::sync::atomic::{AtomicU32, Ordering};

use kurbo::{Point, Rect, Size};

use crate::ItemIndex;
use crate::theme::{Color, Theme};

/// Caller-supplied content embedded in every row.
///
/// The list never inspects content beyond sizing it; populating it for a given
/// row is the job of the update callback.
pub trait ItemContent {
    /// Smallest size this content can be shown at.
    fn min_size(&self) -> Size;

    /// Called whenever the row hosting this content changes size.
    fn resize(&mut self, size: Size);
}

impl<T: ItemContent + ?Sized> ItemContent for Box<T> {
    fn min_size(&self) -> Size {
        (**self).min_size()
    }

    fn resize(&mut self, size: Size) {
        (**self).resize(size);
    }
}

/// Process-unique identifier of a row view.
///
/// Hosts use it to route focus and pointer events back to a view. Identifiers
/// are never reused, so a stale id simply stops matching anything.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(u32);

impl ViewId {
    fn next() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw value of the identifier.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

bitflags::bitflags! {
    /// Visual state of a row.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ItemState: u8 {
        /// Pointer is over the row, or the row holds focus.
        const HOVERED  = 0b0000_0001;
        /// Row shows the current selection.
        const SELECTED = 0b0000_0010;
    }
}

/// Keys a focused row reacts to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ItemKey {
    /// Activates the row.
    Space,
    /// Any other key; ignored by rows.
    Other,
}

/// Action run when a row is activated; selects the row's current index.
pub type Activation = Rc<dyn Fn()>;

/// A single recyclable row: background state plus embedded content.
///
/// A view is created once, from the list's create callback, and then rebound
/// to whatever index it is mounted at during each reconciliation pass.
pub struct ItemView<C> {
    id: ViewId,
    state: ItemState,
    content: C,
    bounds: Rect,
    bound: Option<ItemIndex>,
    on_activate: Option<Activation>,
}

impl<C: fmt::Debug> fmt::Debug for ItemView<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemView")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("content", &self.content)
            .field("bounds", &self.bounds)
            .field("bound", &self.bound)
            .field("activatable", &self.on_activate.is_some())
            .finish()
    }
}

impl<C: ItemContent> ItemView<C> {
    /// Wraps freshly created content in a new, unbound view.
    #[must_use]
    pub fn new(content: C) -> Self {
        Self {
            id: ViewId::next(),
            state: ItemState::empty(),
            content,
            bounds: Rect::ZERO,
            bound: None,
            on_activate: None,
        }
    }

    /// Smallest size of the row, which is that of its content.
    #[must_use]
    pub fn min_size(&self) -> Size {
        self.content.min_size()
    }

    /// Moves the row's top-left corner to `origin`.
    pub fn move_to(&mut self, origin: Point) {
        self.bounds = Rect::from_origin_size(origin, self.bounds.size());
    }

    /// Resizes the row and its content.
    pub fn resize(&mut self, size: Size) {
        if self.bounds.size() != size {
            self.bounds = Rect::from_origin_size(self.bounds.origin(), size);
        }
        self.content.resize(size);
    }
}

impl<C> ItemView<C> {
    /// Identifier of this view.
    #[must_use]
    pub const fn id(&self) -> ViewId {
        self.id
    }

    /// The embedded content.
    #[must_use]
    pub const fn content(&self) -> &C {
        &self.content
    }

    /// Mutable access to the embedded content.
    pub fn content_mut(&mut self) -> &mut C {
        &mut self.content
    }

    /// Index the view is currently bound to, `None` while idle in the pool.
    #[must_use]
    pub const fn bound_index(&self) -> Option<ItemIndex> {
        self.bound
    }

    /// Position and size in content coordinates.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Current visual state.
    #[must_use]
    pub const fn state(&self) -> ItemState {
        self.state
    }

    /// Returns `true` while hovered or focused.
    #[must_use]
    pub const fn is_hovered(&self) -> bool {
        self.state.contains(ItemState::HOVERED)
    }

    /// Returns `true` while showing the selection.
    #[must_use]
    pub const fn is_selected(&self) -> bool {
        self.state.contains(ItemState::SELECTED)
    }

    /// Pointer entered the row.
    pub fn mouse_in(&mut self) {
        self.state.insert(ItemState::HOVERED);
    }

    /// Pointer left the row.
    pub fn mouse_out(&mut self) {
        self.state.remove(ItemState::HOVERED);
    }

    /// The row gained input focus.
    pub fn focus_gained(&mut self) {
        self.state.insert(ItemState::HOVERED);
    }

    /// The row lost input focus.
    pub fn focus_lost(&mut self) {
        self.state.remove(ItemState::HOVERED);
    }

    /// Handles a tap.
    ///
    /// Marks the row selected and returns its activation, which the caller
    /// runs once it no longer borrows the view. Unbound rows ignore taps.
    #[must_use = "the returned activation performs the selection"]
    pub fn tapped(&mut self) -> Option<Activation> {
        let activation = self.on_activate.clone()?;
        self.state.insert(ItemState::SELECTED);
        Some(activation)
    }

    /// Handles a key press while the row is focused.
    ///
    /// Space marks the row selected and returns its activation, if bound.
    #[must_use = "the returned activation performs the selection"]
    pub fn typed_key(&mut self, key: ItemKey) -> Option<Activation> {
        match key {
            ItemKey::Space => {
                self.state.insert(ItemState::SELECTED);
                self.on_activate.clone()
            }
            ItemKey::Other => None,
        }
    }

    /// Background fill for the row: selection wins over hover.
    #[must_use]
    pub fn background(&self, theme: &dyn Theme) -> Option<Color> {
        if self.is_selected() {
            Some(theme.selection_color())
        } else if self.is_hovered() {
            Some(theme.hover_color())
        } else {
            None
        }
    }

    /// Rebinds the row to `index` for the current pass.
    pub(crate) fn bind(
        &mut self,
        index: ItemIndex,
        selected: bool,
        focused: bool,
        activation: Activation,
    ) {
        self.state.set(ItemState::SELECTED, selected);
        self.state.set(ItemState::HOVERED, focused);
        self.bound = Some(index);
        self.on_activate = Some(activation);
    }

    /// Detaches the row from its index before it goes back to the pool.
    pub(crate) fn unbind(&mut self) {
        self.bound = None;
        self.on_activate = None;
    }
}
