// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Visible Rows: which rows of a vertical list are on screen.
//!
//! This crate answers one question for a vertically stacked list whose rows
//! are separated by a fixed gap: given a scroll offset and a viewport height,
//! which contiguous run of rows intersects the viewport, where does the first
//! of them start, and how tall is each?
//!
//! The core pieces are:
//!
//! - [`Scalar`]: a small abstraction over `f32`/`f64`.
//! - [`HeightOverrides`]: a sparse map of rows whose height differs from the
//!   list's template height.
//! - [`compute_visible_rows`]: the range computation itself, returning a
//!   [`VisibleRows`].
//! - [`RowModel`]: bundles the template height, gap, and overrides, and adds
//!   offset, content-extent, and "reveal this row" queries.
//!
//! Rows without overrides form a fixed-stride array and are resolved in
//! constant time. Once any override exists the rows are scanned linearly from
//! the top on every query. Override maps are expected to be small, and no
//! cumulative offsets are cached.
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_visible_rows::RowModel;
//!
//! // 20px rows separated by a 1px gap.
//! let mut model = RowModel::new(20.0_f64, 1.0);
//! let rows = model.visible_rows(100, 0.0, 50.0);
//! assert_eq!(rows.indices(), 0..3);
//!
//! // Make row 5 taller and bring it fully into view.
//! model.overrides_mut().set(5, 40.0);
//! let offset = model.reveal_offset(5, 0.0, 50.0);
//! assert_eq!(offset, 95.0);
//! let rows = model.visible_rows(100, offset, 50.0);
//! assert!(rows.indices().contains(&5));
//! ```
//!
//! This crate does not know about views, pooling, or selection; see
//! `understory_list` for a recycling list built on top of it.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod model;
mod overrides;
mod rows;
mod scalar;

pub use model::RowModel;
pub use overrides::HeightOverrides;
pub use rows::{VisibleRows, compute_visible_rows};
pub use scalar::Scalar;
