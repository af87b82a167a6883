// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Row geometry for a vertical list with a template height and sparse overrides.

use crate::{HeightOverrides, Scalar, VisibleRows, compute_visible_rows};

/// Geometry of a vertical list: a template row height, the gap between rows,
/// and sparse per-row height overrides.
///
/// Row `i` starts at the sum of the heights of rows `0..i` plus one gap per
/// preceding row. With no overrides every query is constant time; with any
/// override, offset queries walk the rows before the target.
#[derive(Clone, Debug)]
pub struct RowModel<S: Scalar> {
    template: S,
    gap: S,
    overrides: HeightOverrides<S>,
}

impl<S: Scalar> RowModel<S> {
    /// Creates a model with the given template row height and inter-row gap.
    #[must_use]
    pub fn new(template: S, gap: S) -> Self {
        Self {
            template: clamp_extent(template),
            gap: clamp_extent(gap),
            overrides: HeightOverrides::new(),
        }
    }

    /// Height used by rows without an override.
    #[must_use]
    pub const fn template(&self) -> S {
        self.template
    }

    /// Sets the template row height.
    pub fn set_template(&mut self, template: S) {
        self.template = clamp_extent(template);
    }

    /// Space between consecutive rows.
    #[must_use]
    pub const fn gap(&self) -> S {
        self.gap
    }

    /// Sets the space between consecutive rows.
    pub fn set_gap(&mut self, gap: S) {
        self.gap = clamp_extent(gap);
    }

    /// Read-only access to the height overrides.
    #[must_use]
    pub fn overrides(&self) -> &HeightOverrides<S> {
        &self.overrides
    }

    /// Mutable access to the height overrides.
    pub fn overrides_mut(&mut self) -> &mut HeightOverrides<S> {
        &mut self.overrides
    }

    /// Height of row `index`, excluding the gap.
    #[must_use]
    pub fn extent_of(&self, index: usize) -> S {
        self.overrides.height_or(index, self.template)
    }

    /// Offset of the top edge of row `index` from the top of the content.
    #[must_use]
    pub fn offset_of(&self, index: usize) -> S {
        if self.overrides.is_empty() {
            return S::from_usize(index) * (self.template + self.gap);
        }
        (0..index).fold(S::zero(), |top, i| top + self.extent_of(i) + self.gap)
    }

    /// Total height of `len` rows including the gaps between them.
    #[must_use]
    pub fn content_extent(&self, len: usize) -> S {
        if len == 0 {
            return S::zero();
        }
        let gaps = self.gap * S::from_usize(len - 1);
        if self.overrides.is_empty() {
            return self.template * S::from_usize(len) + gaps;
        }
        (0..len).fold(gaps, |total, i| total + self.extent_of(i))
    }

    /// Rows of a `len`-row list intersecting the viewport.
    #[must_use]
    pub fn visible_rows(&self, len: usize, scroll_offset: S, viewport_extent: S) -> VisibleRows<S> {
        compute_visible_rows(
            scroll_offset,
            viewport_extent,
            len,
            self.template,
            self.gap,
            &self.overrides,
        )
    }

    /// Scroll offset that brings row `index` fully into view with the smallest
    /// change from `current`.
    ///
    /// If the row is above the viewport its top is aligned with the viewport
    /// top; if it extends below, its bottom is aligned with the viewport bottom;
    /// otherwise `current` is returned unchanged.
    #[must_use]
    pub fn reveal_offset(&self, index: usize, current: S, viewport_extent: S) -> S {
        let item_start = self.offset_of(index);
        let item_end = item_start + self.extent_of(index);
        if item_start < current {
            item_start
        } else if item_end > current + viewport_extent {
            (item_end - viewport_extent).max(S::zero())
        } else {
            current
        }
    }
}

fn clamp_extent<S: Scalar>(extent: S) -> S {
    debug_assert!(
        extent.is_finite(),
        "row extents must be finite; got {extent:?}"
    );
    if extent.is_sign_negative() {
        S::zero()
    } else {
        extent
    }
}

#[cfg(test)]
mod tests {
    use super::RowModel;

    #[test]
    fn uniform_offsets_and_extent() {
        let model = RowModel::new(20.0_f64, 1.0);
        assert_eq!(model.offset_of(0), 0.0);
        assert_eq!(model.offset_of(3), 63.0);
        assert_eq!(model.content_extent(0), 0.0);
        assert_eq!(model.content_extent(1), 20.0);
        assert_eq!(model.content_extent(100), 2099.0);
    }

    #[test]
    fn overrides_shift_later_rows() {
        let mut model = RowModel::new(20.0_f64, 1.0);
        model.overrides_mut().set(1, 40.0);
        assert_eq!(model.extent_of(1), 40.0);
        assert_eq!(model.offset_of(2), 62.0);
        assert_eq!(model.content_extent(3), 82.0);
    }

    #[test]
    fn reveal_moves_just_enough() {
        let mut model = RowModel::new(20.0_f64, 1.0);
        model.overrides_mut().set(5, 40.0);
        // Row 5 spans 105..145.
        assert_eq!(model.reveal_offset(5, 0.0, 50.0), 95.0);
        assert_eq!(model.reveal_offset(5, 200.0, 50.0), 105.0);
        assert_eq!(model.reveal_offset(5, 100.0, 50.0), 100.0);
        // Already fully visible: unchanged.
        assert_eq!(model.reveal_offset(0, 0.0, 50.0), 0.0);
    }

    #[test]
    fn negative_template_is_clamped() {
        let mut model = RowModel::new(-4.0_f32, 1.0);
        assert_eq!(model.template(), 0.0);
        model.set_template(12.0);
        assert_eq!(model.template(), 12.0);
    }
}
