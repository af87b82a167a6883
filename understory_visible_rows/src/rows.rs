// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visible-row computation.

use core::ops::Range;

use smallvec::SmallVec;

use crate::{HeightOverrides, Scalar};

/// Inline capacity for visible row heights; spills to the heap beyond this.
const INLINE_ROWS: usize = 32;

/// Rows intersecting a viewport, as produced by [`compute_visible_rows`].
#[derive(Clone, Debug, PartialEq)]
pub struct VisibleRows<S: Scalar> {
    /// Index of the first visible row.
    pub start: usize,
    /// Offset of the first visible row's top edge from the top of the content.
    pub start_offset: S,
    /// Height of each visible row, in order, starting at [`start`](Self::start).
    ///
    /// Heights exclude the gap between rows.
    pub heights: SmallVec<[S; INLINE_ROWS]>,
}

impl<S: Scalar> VisibleRows<S> {
    /// Result used when nothing can be shown.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            start: 0,
            start_offset: S::zero(),
            heights: SmallVec::new(),
        }
    }

    /// Returns `true` if no rows are visible.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// Number of visible rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    /// One past the last visible row.
    #[must_use]
    pub fn end(&self) -> usize {
        self.start + self.heights.len()
    }

    /// The visible index range `start..end`.
    #[must_use]
    pub fn indices(&self) -> Range<usize> {
        self.start..self.end()
    }

    /// Iterates `(index, top, height)` for every visible row, given the gap between rows.
    pub fn placements(&self, gap: S) -> impl Iterator<Item = (usize, S, S)> + '_ {
        let mut top = self.start_offset;
        self.heights.iter().enumerate().map(move |(i, &height)| {
            let row_top = top;
            top = top + height + gap;
            (self.start + i, row_top, height)
        })
    }
}

/// Computes which rows of a vertical list intersect the viewport.
///
/// - `scroll_offset`: top of the viewport in content coordinates.
/// - `viewport_extent`: height of the viewport.
/// - `len`: number of rows.
/// - `template`: height used by rows without an override.
/// - `gap`: space between consecutive rows (the separator band).
/// - `overrides`: sparse explicit row heights.
///
/// When `overrides` is empty the rows form a fixed-stride array and the range
/// is found in constant time. Otherwise rows are scanned linearly from index
/// 0, which costs O(`len`) per call; no cumulative offsets are cached.
///
/// A non-positive viewport or an empty list yields [`VisibleRows::empty`].
pub fn compute_visible_rows<S: Scalar>(
    scroll_offset: S,
    viewport_extent: S,
    len: usize,
    template: S,
    gap: S,
    overrides: &HeightOverrides<S>,
) -> VisibleRows<S> {
    if len == 0 || viewport_extent <= S::zero() {
        return VisibleRows::empty();
    }
    let scroll_offset = scroll_offset.max(S::zero());
    if overrides.is_empty() {
        uniform_rows(scroll_offset, viewport_extent, len, template, gap)
    } else {
        sparse_rows(scroll_offset, viewport_extent, len, template, gap, overrides)
    }
}

fn uniform_rows<S: Scalar>(
    scroll_offset: S,
    viewport_extent: S,
    len: usize,
    height: S,
    gap: S,
) -> VisibleRows<S> {
    let stride = height + gap;
    if stride <= S::zero() {
        // Every row collapses onto the same point; show the first one.
        let mut heights = SmallVec::new();
        heights.push(height);
        return VisibleRows {
            start: 0,
            start_offset: S::zero(),
            heights,
        };
    }

    let last = isize::try_from(len - 1).unwrap_or(isize::MAX);
    let start = (scroll_offset / stride).floor_to_isize().clamp(0, last);
    #[allow(
        clippy::cast_sign_loss,
        reason = "`start` was clamped into `0..len` above"
    )]
    let start = start as usize;

    let end = ((scroll_offset + viewport_extent) / stride).ceil_to_isize();
    let end = usize::try_from(end).unwrap_or(0).min(len).max(start + 1);

    VisibleRows {
        start,
        start_offset: S::from_usize(start) * stride,
        heights: core::iter::repeat_n(height, end - start).collect(),
    }
}

fn sparse_rows<S: Scalar>(
    scroll_offset: S,
    viewport_extent: S,
    len: usize,
    template: S,
    gap: S,
    overrides: &HeightOverrides<S>,
) -> VisibleRows<S> {
    let viewport_end = scroll_offset + viewport_extent;
    let mut rows = VisibleRows::empty();
    let mut started = false;
    let mut row_top = S::zero();

    for index in 0..len {
        let height = overrides.height_or(index, template);
        if row_top >= viewport_end {
            break;
        }
        // A row is still "before" the viewport while its bottom plus the gap
        // ends at or above the scroll offset.
        if !started && row_top > scroll_offset - height - gap && row_top <= scroll_offset {
            started = true;
            rows.start = index;
            rows.start_offset = row_top;
        }
        if started {
            rows.heights.push(height);
        }
        row_top = row_top + height + gap;
    }
    if !started {
        // Scrolled past the end: keep the last row mounted, like the uniform path.
        let last = len - 1;
        let height = overrides.height_or(last, template);
        rows.start = last;
        rows.start_offset = (row_top - height - gap).max(S::zero());
        rows.heights.push(height);
    }
    rows
}
