// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sparse per-row height overrides.

use hashbrown::HashMap;

use crate::Scalar;

/// Sparse map from row index to an explicit row height.
///
/// Rows without an entry use the template height of the list. Overrides are
/// expected to be rare; any override at all switches visible-row computation
/// to a linear scan (see [`compute_visible_rows`](crate::compute_visible_rows)).
#[derive(Clone, Debug, Default)]
pub struct HeightOverrides<S: Scalar> {
    heights: HashMap<usize, S>,
}

impl<S: Scalar> HeightOverrides<S> {
    /// Creates an empty override map.
    #[must_use]
    pub fn new() -> Self {
        Self {
            heights: HashMap::new(),
        }
    }

    /// Sets the height of row `index`, returning `true` if the stored value changed.
    ///
    /// Finite negative heights are clamped to zero.
    pub fn set(&mut self, index: usize, height: S) -> bool {
        debug_assert!(
            height.is_finite(),
            "row heights must be finite; got {height:?}"
        );
        let height = if height.is_sign_negative() {
            S::zero()
        } else {
            height
        };
        match self.heights.insert(index, height) {
            Some(previous) => previous != height,
            None => true,
        }
    }

    /// Removes the override for row `index`, returning the previous height.
    pub fn remove(&mut self, index: usize) -> Option<S> {
        self.heights.remove(&index)
    }

    /// Returns the override for row `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<S> {
        self.heights.get(&index).copied()
    }

    /// Returns the height of row `index`, falling back to `template`.
    #[must_use]
    pub fn height_or(&self, index: usize, template: S) -> S {
        self.get(index).unwrap_or(template)
    }

    /// Removes every override.
    pub fn clear(&mut self) {
        self.heights.clear();
    }

    /// Number of rows with an explicit height.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    /// Returns `true` when every row uses the template height.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::HeightOverrides;

    #[test]
    fn set_reports_changes_only() {
        let mut overrides = HeightOverrides::<f32>::new();
        assert!(overrides.set(3, 40.0));
        assert!(!overrides.set(3, 40.0));
        assert!(overrides.set(3, 41.0));
        assert_eq!(overrides.get(3), Some(41.0));
        assert_eq!(overrides.height_or(4, 20.0), 20.0);
        assert_eq!(overrides.len(), 1);
    }

    #[test]
    fn negative_heights_are_clamped_to_zero() {
        let mut overrides = HeightOverrides::<f64>::new();
        overrides.set(0, -5.0);
        assert_eq!(overrides.get(0), Some(0.0));
        assert_eq!(overrides.remove(0), Some(0.0));
        assert!(overrides.is_empty());
    }
}
