// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reconciliation of mounted row views against the visible row range.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::mem;
use core::ops::Range;

use hashbrown::HashMap;
use kurbo::{Point, Rect, Size};
use understory_visible_rows::VisibleRows;

use crate::item::{ItemContent, ItemView, ViewId};
use crate::pool::ItemPool;
use crate::viewport::ListObject;
use crate::ItemIndex;

/// A row view shared between the engine and the binding phase.
pub(crate) type SharedView<C> = Rc<RefCell<ItemView<C>>>;

/// Counters describing row view lifecycle.
///
/// Useful for asserting that scrolling recycles views instead of creating them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RecycleStats {
    /// Views currently mounted.
    pub in_use: usize,
    /// Views idle in the pool.
    pub in_pool: usize,
    /// Views created over the list's lifetime, excluding template measurements.
    pub created: usize,
    /// Times a view was taken from the pool instead of being created.
    pub reused: usize,
}

/// Per-pass inputs the engine does not own.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PlaceParams {
    /// Width every row is stretched to.
    pub(crate) width: f64,
    /// Space between consecutive rows.
    pub(crate) gap: f64,
    /// Thickness of the separator drawn in the gap.
    pub(crate) separator_thickness: f64,
    /// View holding input focus when the pass started.
    pub(crate) focused: Option<ViewId>,
}

/// A mounted view, with its identifier cached so lookups never borrow the row.
struct Mounted<C> {
    id: ViewId,
    view: SharedView<C>,
}

/// Outcome of one placement.
pub(crate) struct Placement<C> {
    /// Rows in index order, then separators.
    pub(crate) objects: Vec<ListObject>,
    /// Mounted views in index order, to be rebound by the caller.
    pub(crate) mounted: Vec<(ItemIndex, SharedView<C>)>,
    /// The focused view was recycled and focus must be cleared.
    pub(crate) clear_focus: bool,
}

/// Owns the pool and the mounted view set of a list.
pub(crate) struct LayoutEngine<C> {
    pool: ItemPool<SharedView<C>>,
    visible: HashMap<ItemIndex, Mounted<C>>,
    separators: Vec<Rect>,
    created: usize,
    reused: usize,
}

impl<C> core::fmt::Debug for LayoutEngine<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LayoutEngine")
            .field("pooled", &self.pool.len())
            .field("visible", &self.visible.len())
            .field("separators", &self.separators.len())
            .field("created", &self.created)
            .field("reused", &self.reused)
            .finish()
    }
}

impl<C: ItemContent> LayoutEngine<C> {
    pub(crate) fn new() -> Self {
        Self {
            pool: ItemPool::new(),
            visible: HashMap::new(),
            separators: Vec::new(),
            created: 0,
            reused: 0,
        }
    }

    /// Number of views that must be created before `indices` can be mounted.
    ///
    /// Views that leave the range are only pooled after the new rows are
    /// mounted, so they do not count towards what is available.
    pub(crate) fn shortfall(&self, indices: Range<ItemIndex>) -> usize {
        let missing = indices
            .filter(|index| !self.visible.contains_key(index))
            .count();
        missing.saturating_sub(self.pool.len())
    }

    /// Mounts a view for every row in `rows`, recycling views that left the range.
    ///
    /// Views in `fresh` are used only once the pool runs dry; leftovers are
    /// pooled. A row for which no view is available is skipped.
    pub(crate) fn place(
        &mut self,
        rows: &VisibleRows<f64>,
        fresh: Vec<ItemView<C>>,
        params: &PlaceParams,
    ) -> Placement<C> {
        let mut fresh = fresh.into_iter();
        let was_visible = mem::take(&mut self.visible);
        let mut visible = HashMap::with_capacity(rows.len());
        let mut mounted = Vec::with_capacity(rows.len());

        for (index, top, height) in rows.placements(params.gap) {
            let view = if let Some(mounted) = was_visible.get(&index) {
                Rc::clone(&mounted.view)
            } else if let Some(view) = self.pool.obtain() {
                self.reused += 1;
                view
            } else if let Some(view) = fresh.next() {
                self.created += 1;
                Rc::new(RefCell::new(view))
            } else {
                log::warn!("no view available for list row {index}; is the create callback set?");
                continue;
            };
            let id = {
                let mut row = view.borrow_mut();
                row.move_to(Point::new(0.0, top));
                row.resize(Size::new(params.width, height));
                row.id()
            };
            visible.insert(
                index,
                Mounted {
                    id,
                    view: Rc::clone(&view),
                },
            );
            mounted.push((index, view));
        }

        let mut clear_focus = false;
        for (index, Mounted { id, view }) in was_visible {
            if visible.contains_key(&index) {
                continue;
            }
            if params.focused == Some(id) {
                clear_focus = true;
            }
            view.borrow_mut().unbind();
            self.pool.release(view);
        }
        for view in fresh {
            self.created += 1;
            self.pool.release(Rc::new(RefCell::new(view)));
        }
        self.visible = visible;

        let mut objects = Vec::with_capacity(mounted.len() * 2);
        let mut row_tops = Vec::with_capacity(mounted.len());
        for (index, view) in &mounted {
            let row = view.borrow();
            row_tops.push(row.bounds().y0);
            objects.push(ListObject::Row {
                index: *index,
                view: row.id(),
                bounds: row.bounds(),
            });
        }
        self.update_separators(&row_tops, params);
        objects.extend(
            self.separators
                .iter()
                .map(|&bounds| ListObject::Separator { bounds }),
        );

        Placement {
            objects,
            mounted,
            clear_focus,
        }
    }

    /// One separator per pair of consecutive rows, centered in the gap above the lower row.
    fn update_separators(&mut self, row_tops: &[f64], params: &PlaceParams) {
        self.separators.clear();
        let lift = (params.gap + params.separator_thickness) / 2.0;
        for &top in row_tops.iter().skip(1) {
            let y = top - lift;
            self.separators.push(Rect::new(
                0.0,
                y,
                params.width,
                y + params.separator_thickness,
            ));
        }
    }
}

impl<C> LayoutEngine<C> {
    /// Mounted indices in ascending order.
    pub(crate) fn visible_indices(&self) -> Vec<ItemIndex> {
        let mut indices: Vec<_> = self.visible.keys().copied().collect();
        indices.sort_unstable();
        indices
    }

    /// The view mounted at `index`.
    pub(crate) fn view_at_index(&self, index: ItemIndex) -> Option<SharedView<C>> {
        self.visible
            .get(&index)
            .map(|mounted| Rc::clone(&mounted.view))
    }

    /// Identifier of the view mounted at `index`.
    pub(crate) fn id_at_index(&self, index: ItemIndex) -> Option<ViewId> {
        self.visible.get(&index).map(|mounted| mounted.id)
    }

    /// The mounted view with identifier `id`.
    pub(crate) fn view_by_id(&self, id: ViewId) -> Option<SharedView<C>> {
        self.visible
            .values()
            .find(|mounted| mounted.id == id)
            .map(|mounted| Rc::clone(&mounted.view))
    }

    /// The mounted view whose bounds contain `point`.
    pub(crate) fn view_at_point(&self, point: Point) -> Option<SharedView<C>> {
        self.visible
            .values()
            .find(|mounted| {
                mounted
                    .view
                    .try_borrow()
                    .is_ok_and(|row| row.bounds().contains(point))
            })
            .map(|mounted| Rc::clone(&mounted.view))
    }

    /// All mounted views, in no particular order.
    pub(crate) fn mounted_views(&self) -> impl Iterator<Item = &SharedView<C>> {
        self.visible.values().map(|mounted| &mounted.view)
    }

    /// Current separator rectangles.
    #[cfg(test)]
    pub(crate) fn separators(&self) -> &[Rect] {
        &self.separators
    }

    /// Identifiers of idle views.
    #[cfg(test)]
    pub(crate) fn pooled_ids(&self) -> Vec<ViewId> {
        self.pool.iter().map(|view| view.borrow().id()).collect()
    }

    pub(crate) fn stats(&self) -> RecycleStats {
        RecycleStats {
            in_use: self.visible.len(),
            in_pool: self.pool.len(),
            created: self.created,
            reused: self.reused,
        }
    }
}
