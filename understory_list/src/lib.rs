// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory List: a virtualized vertical list that recycles its row views.
//!
//! A [`List`] shows an arbitrarily long sequence of rows while only keeping
//! views alive for the rows that intersect the viewport. The caller supplies
//! three callbacks:
//!
//! - `length`: how many rows there are right now,
//! - `create_item`: build fresh row content when no idle view is available,
//! - `update_item`: populate a row's content for a given index.
//!
//! Every reconciliation pass asks [`understory_visible_rows`] which rows are
//! visible, keeps views that stay visible, moves views that scrolled out into
//! an [`ItemPool`], mounts pooled (or newly created) views for rows that
//! scrolled in, and publishes rows plus separators to a [`ScrollContainer`].
//! Rows are then rebound: selection and focus state are reapplied and
//! `update_item` runs, outside any internal borrow.
//!
//! The list also tracks a single selection with select/unselect hooks,
//! scrolls rows into view, and hands focus back to the host's
//! [`FocusManager`] when a focused view is recycled.
//!
//! Hosts plug in their own theme, focus manager, and scroll container through
//! [`ListEnv`]; [`DefaultTheme`], [`FocusTracker`], and [`ScrollViewport`] are
//! small in-memory defaults. Observable data sources can drive a list directly
//! through [`DataList`] and [`List::with_data`].
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use understory_list::{ItemContent, List};
//!
//! #[derive(Default)]
//! struct Label(String);
//!
//! impl ItemContent for Label {
//!     fn min_size(&self) -> Size {
//!         Size::new(80.0, 16.0)
//!     }
//!
//!     fn resize(&mut self, _size: Size) {}
//! }
//!
//! let list = List::new(|| 10_000, Label::default, |i, label: &mut Label| {
//!     label.0 = format!("Row {i}");
//! });
//! list.resize(Size::new(300.0, 60.0));
//! list.scrolled(Point::new(0.0, 40_000.0));
//! let warmed = list.stats().created;
//!
//! // Once the pool holds a viewport's worth of views, scrolling only recycles.
//! for y in [80_000.0, 120_000.0, 20.0] {
//!     list.scrolled(Point::new(0.0, y));
//! }
//! assert_eq!(list.stats().created, warmed);
//! assert!(list.with_item(list.visible_indices()[0], |row| row.content().0.starts_with("Row ")).unwrap());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod binding;
mod focus;
mod item;
mod layout;
mod list;
mod pool;
mod selection;
mod theme;
mod viewport;

/// Position of a row in the caller's data.
pub type ItemIndex = usize;

pub use binding::{BindingError, DataList, DataListener, DataVec, ListenerId};
pub use focus::{FocusManager, FocusTracker};
pub use item::{Activation, ItemContent, ItemKey, ItemState, ItemView, ViewId};
pub use layout::RecycleStats;
pub use list::{List, ListEnv};
pub use pool::ItemPool;
pub use selection::Selection;
pub use theme::{Color, DefaultTheme, Theme};
pub use viewport::{ListObject, ScrollContainer, ScrollViewport};
