// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-selection state.

use crate::ItemIndex;

/// Selection state of a list: nothing, or exactly one index.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Selection {
    /// No row is selected.
    #[default]
    Unselected,
    /// The row at this index is selected.
    Selected(ItemIndex),
}

impl Selection {
    /// The selected index, if any.
    #[must_use]
    pub const fn selected(self) -> Option<ItemIndex> {
        match self {
            Self::Unselected => None,
            Self::Selected(index) => Some(index),
        }
    }

    /// Returns `true` if `index` is the selected row.
    #[must_use]
    pub const fn contains(self, index: ItemIndex) -> bool {
        matches!(self, Self::Selected(selected) if selected == index)
    }

    /// Selects `index`, returning the previously selected index if it differs.
    pub fn select(&mut self, index: ItemIndex) -> Option<ItemIndex> {
        let previous = self.selected().filter(|&prev| prev != index);
        *self = Self::Selected(index);
        previous
    }

    /// Clears the selection if `index` is selected, returning whether it was.
    pub fn unselect(&mut self, index: ItemIndex) -> bool {
        if self.contains(index) {
            *self = Self::Unselected;
            true
        } else {
            false
        }
    }

    /// Clears the selection, returning the index that was selected.
    pub fn clear(&mut self) -> Option<ItemIndex> {
        let previous = self.selected();
        *self = Self::Unselected;
        previous
    }
}
