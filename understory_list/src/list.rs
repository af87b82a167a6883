// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The list widget: callbacks, selection, scrolling, and the render loop.

use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

use kurbo::{Point, Size};
use log::{debug, trace, warn};
use understory_visible_rows::RowModel;

use crate::focus::{FocusManager, FocusTracker};
use crate::item::{Activation, ItemContent, ItemKey, ItemView, ViewId};
use crate::layout::{LayoutEngine, PlaceParams, RecycleStats};
use crate::selection::Selection;
use crate::theme::{DefaultTheme, Theme};
use crate::viewport::{ScrollContainer, ScrollViewport};
use crate::ItemIndex;

/// Passes replayed for re-entrant render requests before giving up until the
/// next invalidation.
const MAX_COALESCED_PASSES: usize = 8;

type LengthFn = Rc<dyn Fn() -> usize>;
type CreateFn<C> = Rc<dyn Fn() -> C>;
type UpdateFn<C> = Rc<dyn Fn(ItemIndex, &mut C)>;
type NotifyFn = Rc<dyn Fn(ItemIndex)>;
pub(crate) type Unbind = Box<dyn FnOnce()>;

/// A selection hook waiting for the current pass to finish.
#[derive(Clone, Copy, Debug)]
enum Notice {
    Selected(ItemIndex),
    Unselected(ItemIndex),
}

/// Collaborators a list consumes from its host.
#[derive(Clone)]
pub struct ListEnv {
    /// Padding, separator thickness, and row colours.
    pub theme: Rc<dyn Theme>,
    /// Host focus manager.
    pub focus: Rc<dyn FocusManager>,
    /// Scroll container the rows are published into.
    pub viewport: Rc<dyn ScrollContainer>,
}

impl Default for ListEnv {
    fn default() -> Self {
        Self {
            theme: Rc::new(DefaultTheme::default()),
            focus: Rc::new(FocusTracker::new()),
            viewport: Rc::new(ScrollViewport::new()),
        }
    }
}

impl fmt::Debug for ListEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListEnv")
            .field("padding", &self.theme.padding())
            .field("separator_thickness", &self.theme.separator_thickness())
            .field("focused", &self.focus.focused())
            .field("viewport_size", &self.viewport.size())
            .finish_non_exhaustive()
    }
}

struct Callbacks<C> {
    length: Option<LengthFn>,
    create_item: Option<CreateFn<C>>,
    update_item: Option<UpdateFn<C>>,
    on_selected: Option<NotifyFn>,
    on_unselected: Option<NotifyFn>,
}

impl<C> Clone for Callbacks<C> {
    fn clone(&self) -> Self {
        Self {
            length: self.length.clone(),
            create_item: self.create_item.clone(),
            update_item: self.update_item.clone(),
            on_selected: self.on_selected.clone(),
            on_unselected: self.on_unselected.clone(),
        }
    }
}

impl<C> Default for Callbacks<C> {
    fn default() -> Self {
        Self {
            length: None,
            create_item: None,
            update_item: None,
            on_selected: None,
            on_unselected: None,
        }
    }
}

pub(crate) struct Inner<C> {
    env: ListEnv,
    callbacks: RefCell<Callbacks<C>>,
    selection: RefCell<Selection>,
    rows: RefCell<RowModel<f64>>,
    template: Cell<Size>,
    size: Cell<Size>,
    offset_y: Cell<f64>,
    engine: RefCell<LayoutEngine<C>>,
    rendering: Cell<bool>,
    rerun: Cell<bool>,
    notices: RefCell<VecDeque<Notice>>,
    data_binding: RefCell<Option<Unbind>>,
}

impl<C> Drop for Inner<C> {
    fn drop(&mut self) {
        if let Some(unbind) = self.data_binding.get_mut().take() {
            unbind();
        }
    }
}

/// A virtualized vertical list that recycles a small pool of row views.
///
/// The list never owns the data it shows. It asks `length` for the row count,
/// builds row content with `create_item` when the pool runs dry, and calls
/// `update_item` to populate a row's content for its current index.
///
/// `List` is a cheap handle: clones share the same widget. All methods take
/// `&self` so callbacks may call back into the list; render requests made while
/// a pass is running are replayed once it finishes.
///
/// ## Example
///
/// ```rust
/// use kurbo::Size;
/// use understory_list::{ItemContent, List};
///
/// #[derive(Default)]
/// struct Label {
///     text: String,
/// }
///
/// impl ItemContent for Label {
///     fn min_size(&self) -> Size {
///         Size::new(120.0, 20.0)
///     }
///
///     fn resize(&mut self, _size: Size) {}
/// }
///
/// let list = List::new(
///     || 1_000,
///     Label::default,
///     |index, label: &mut Label| label.text = format!("Item {index}"),
/// );
/// list.resize(Size::new(200.0, 100.0));
///
/// // Only the rows intersecting the 100px viewport are mounted.
/// assert_eq!(list.visible_indices(), [0, 1, 2, 3, 4]);
///
/// list.select(500);
/// assert_eq!(list.selected(), Some(500));
/// assert!(list.visible_indices().contains(&500));
/// ```
pub struct List<C> {
    pub(crate) inner: Rc<Inner<C>>,
}

impl<C> Clone for List<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<C> fmt::Debug for List<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("List")
            .field("selection", &*self.inner.selection.borrow())
            .field("size", &self.inner.size.get())
            .field("offset_y", &self.inner.offset_y.get())
            .field("template", &self.inner.template.get())
            .field("engine", &self.inner.engine)
            .finish_non_exhaustive()
    }
}

struct RenderGuard<'a>(&'a Cell<bool>);

impl Drop for RenderGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl<C: ItemContent + 'static> List<C> {
    /// Creates a list with default collaborators.
    pub fn new(
        length: impl Fn() -> usize + 'static,
        create_item: impl Fn() -> C + 'static,
        update_item: impl Fn(ItemIndex, &mut C) + 'static,
    ) -> Self {
        Self::with_env(ListEnv::default(), length, create_item, update_item)
    }

    /// Creates a list wired to the host's theme, focus manager, and scroll container.
    pub fn with_env(
        env: ListEnv,
        length: impl Fn() -> usize + 'static,
        create_item: impl Fn() -> C + 'static,
        update_item: impl Fn(ItemIndex, &mut C) + 'static,
    ) -> Self {
        let list = Self::empty(env);
        {
            let mut callbacks = list.inner.callbacks.borrow_mut();
            callbacks.length = Some(Rc::new(length));
            callbacks.create_item = Some(Rc::new(create_item));
            callbacks.update_item = Some(Rc::new(update_item));
        }
        list.measure_template();
        list
    }

    /// Creates a list with no callbacks; it behaves as empty until they are set.
    pub fn empty(env: ListEnv) -> Self {
        let rows = RowModel::new(0.0, env.theme.padding());
        Self {
            inner: Rc::new(Inner {
                env,
                callbacks: RefCell::new(Callbacks::default()),
                selection: RefCell::new(Selection::Unselected),
                rows: RefCell::new(rows),
                template: Cell::new(Size::ZERO),
                size: Cell::new(Size::ZERO),
                offset_y: Cell::new(0.0),
                engine: RefCell::new(LayoutEngine::new()),
                rendering: Cell::new(false),
                rerun: Cell::new(false),
                notices: RefCell::new(VecDeque::new()),
                data_binding: RefCell::new(None),
            }),
        }
    }

    /// Replaces the row-count callback.
    pub fn set_length(&self, length: impl Fn() -> usize + 'static) {
        self.inner.callbacks.borrow_mut().length = Some(Rc::new(length));
    }

    /// Replaces the callback that builds new row content.
    pub fn set_create_item(&self, create_item: impl Fn() -> C + 'static) {
        self.inner.callbacks.borrow_mut().create_item = Some(Rc::new(create_item));
    }

    /// Replaces the callback that populates row content for an index.
    pub fn set_update_item(&self, update_item: impl Fn(ItemIndex, &mut C) + 'static) {
        self.inner.callbacks.borrow_mut().update_item = Some(Rc::new(update_item));
    }

    /// Sets the hook fired after a row becomes selected.
    pub fn set_on_selected(&self, on_selected: impl Fn(ItemIndex) + 'static) {
        self.inner.callbacks.borrow_mut().on_selected = Some(Rc::new(on_selected));
    }

    /// Sets the hook fired after a row stops being selected.
    pub fn set_on_unselected(&self, on_unselected: impl Fn(ItemIndex) + 'static) {
        self.inner.callbacks.borrow_mut().on_unselected = Some(Rc::new(on_unselected));
    }

    /// The collaborators this list was created with.
    #[must_use]
    pub fn env(&self) -> &ListEnv {
        &self.inner.env
    }

    /// Number of rows reported by the length callback, or 0 if unset.
    #[must_use]
    pub fn length(&self) -> usize {
        let length = self.inner.callbacks.borrow().length.clone();
        length.map_or(0, |length| length())
    }

    /// Current size of the list.
    #[must_use]
    pub fn size(&self) -> Size {
        self.inner.size.get()
    }

    /// Smallest useful size: that of a single template row.
    #[must_use]
    pub fn min_size(&self) -> Size {
        self.inner.template.get()
    }

    /// Vertical scroll offset the last pass was computed for.
    #[must_use]
    pub fn scroll_offset(&self) -> f64 {
        self.inner.offset_y.get()
    }

    /// The selected index, if any.
    #[must_use]
    pub fn selected(&self) -> Option<ItemIndex> {
        self.inner.selection.borrow().selected()
    }

    /// The full selection state.
    #[must_use]
    pub fn selection(&self) -> Selection {
        *self.inner.selection.borrow()
    }

    /// Gives row `index` an explicit height, excluding the separator gap.
    ///
    /// Rows normally take the height of the template built from the create
    /// callback. The list re-renders only if the height actually changed.
    pub fn set_item_height(&self, index: ItemIndex, height: f64) {
        let changed = self
            .inner
            .rows
            .borrow_mut()
            .overrides_mut()
            .set(index, height);
        if changed {
            self.refresh();
        }
    }

    /// Resizes the list and its scroll container, then re-renders.
    pub fn resize(&self, size: Size) {
        self.inner.size.set(size);
        let viewport = &self.inner.env.viewport;
        viewport.resize(size);
        self.scrolled(viewport.offset());
        self.render();
    }

    /// Re-measures the template row and re-renders every mounted row.
    pub fn refresh(&self) {
        self.measure_template();
        self.inner.env.viewport.resize(self.inner.size.get());
        self.render();
    }

    /// Notifies the list that its scroll container moved to `offset`.
    ///
    /// Does nothing if the vertical offset is unchanged.
    pub fn scrolled(&self, offset: Point) {
        if self.inner.offset_y.get() == offset.y {
            return;
        }
        self.inner.offset_y.set(offset.y);
        self.render();
    }

    /// Selects row `index`, scrolling it into view.
    ///
    /// Ignored if `index` is already selected or out of range. Once the
    /// re-render has been applied, the previous selection's unselect hook
    /// fires, then the select hook for `index`. When called from inside a
    /// pass, the hooks wait for that pass to finish.
    pub fn select(&self, index: ItemIndex) {
        if self.selected() == Some(index) || index >= self.length() {
            return;
        }
        let previous = self.inner.selection.borrow_mut().select(index);
        {
            let mut notices = self.inner.notices.borrow_mut();
            if let Some(previous) = previous {
                notices.push_back(Notice::Unselected(previous));
            }
            notices.push_back(Notice::Selected(index));
        }
        self.scroll_to_row(index);
        self.refresh();
        self.flush_notices();
    }

    /// Clears the selection if it is `index`.
    pub fn unselect(&self, index: ItemIndex) {
        if !self.inner.selection.borrow_mut().unselect(index) {
            return;
        }
        self.notify_unselected(index);
    }

    /// Clears the selection, if any.
    pub fn unselect_all(&self) {
        let Some(previous) = self.inner.selection.borrow_mut().clear() else {
            return;
        };
        self.notify_unselected(previous);
    }

    fn notify_unselected(&self, index: ItemIndex) {
        self.inner
            .notices
            .borrow_mut()
            .push_back(Notice::Unselected(index));
        self.refresh();
        self.flush_notices();
    }

    /// Scrolls just enough to show row `index` in full. Out-of-range indices are ignored.
    pub fn scroll_to(&self, index: ItemIndex) {
        if index >= self.length() {
            return;
        }
        self.scroll_to_row(index);
        self.refresh();
    }

    /// Scrolls to the first row.
    pub fn scroll_to_top(&self) {
        self.scroll_to_row(0);
        self.refresh();
    }

    /// Scrolls to the last row.
    pub fn scroll_to_bottom(&self) {
        self.scroll_to_row(self.length().saturating_sub(1));
        self.refresh();
    }

    /// Taps the mounted row shown by `view`, returning whether it reacted.
    pub fn tap(&self, view: ViewId) -> bool {
        let Some(view) = self.inner.engine.borrow().view_by_id(view) else {
            return false;
        };
        let activation = match view.try_borrow_mut() {
            Ok(mut row) => row.tapped(),
            Err(_) => None,
        };
        run(activation)
    }

    /// Taps the mounted row under `point`, in content coordinates.
    pub fn tap_at(&self, point: Point) -> bool {
        let id = self
            .inner
            .engine
            .borrow()
            .view_at_point(point)
            .and_then(|view| view.try_borrow().ok().map(|row| row.id()));
        id.is_some_and(|id| self.tap(id))
    }

    /// Moves the pointer to `point` (or off the list with `None`), updating row hover.
    ///
    /// Returns the index of the hovered row.
    pub fn hover_at(&self, point: Option<Point>) -> Option<ItemIndex> {
        let engine = self.inner.engine.borrow();
        let mut hovered = None;
        for view in engine.mounted_views() {
            let Ok(mut row) = view.try_borrow_mut() else {
                continue;
            };
            if point.is_some_and(|point| row.bounds().contains(point)) {
                row.mouse_in();
                hovered = row.bound_index();
            } else {
                row.mouse_out();
            }
        }
        hovered
    }

    /// Delivers a key press to the focused row, if it belongs to this list.
    pub fn key_pressed(&self, key: ItemKey) -> bool {
        let Some(focused) = self.inner.env.focus.focused() else {
            return false;
        };
        let Some(view) = self.inner.engine.borrow().view_by_id(focused) else {
            return false;
        };
        let activation = match view.try_borrow_mut() {
            Ok(mut row) => row.typed_key(key),
            Err(_) => None,
        };
        run(activation)
    }

    /// Mounted row indices in ascending order.
    #[must_use]
    pub fn visible_indices(&self) -> Vec<ItemIndex> {
        self.inner.engine.borrow().visible_indices()
    }

    /// The view mounted at row `index`.
    #[must_use]
    pub fn view_at_index(&self, index: ItemIndex) -> Option<ViewId> {
        self.inner.engine.borrow().id_at_index(index)
    }

    /// Runs `f` on the view mounted at row `index`.
    ///
    /// Returns `None` if no view is mounted there, or if the row is being
    /// populated by the update callback right now. Renders requested by `f`
    /// run once it returns.
    pub fn with_item<R>(&self, index: ItemIndex, f: impl FnOnce(&ItemView<C>) -> R) -> Option<R> {
        let view = self.inner.engine.borrow().view_at_index(index)?;
        self.defer_renders(|| {
            let row = view.try_borrow().ok()?;
            Some(f(&row))
        })
    }

    /// View lifecycle counters.
    #[must_use]
    pub fn stats(&self) -> RecycleStats {
        self.inner.engine.borrow().stats()
    }

    /// Fires queued selection hooks, unless a pass is still running.
    fn flush_notices(&self) {
        if self.inner.rendering.get() {
            return;
        }
        loop {
            let notice = self.inner.notices.borrow_mut().pop_front();
            let Some(notice) = notice else {
                return;
            };
            let callbacks = self.inner.callbacks.borrow().clone();
            match notice {
                Notice::Selected(index) => {
                    if let Some(on_selected) = callbacks.on_selected {
                        on_selected(index);
                    }
                }
                Notice::Unselected(index) => {
                    if let Some(on_unselected) = callbacks.on_unselected {
                        on_unselected(index);
                    }
                }
            }
        }
    }

    /// Runs `f` with render requests held back, then replays them.
    fn defer_renders<R>(&self, f: impl FnOnce() -> R) -> R {
        if self.inner.rendering.replace(true) {
            // Inside a pass already; it replays the request itself.
            return f();
        }
        let result = {
            let _guard = RenderGuard(&self.inner.rendering);
            f()
        };
        if self.inner.rerun.replace(false) {
            self.render();
        }
        self.flush_notices();
        result
    }

    /// Installs the teardown for a data binding, running the previous one.
    pub(crate) fn replace_data_binding(&self, unbind: Unbind) {
        let previous = self.inner.data_binding.replace(Some(unbind));
        if let Some(previous) = previous {
            previous();
        }
    }

    fn measure_template(&self) {
        let create_item = self.inner.callbacks.borrow().create_item.clone();
        let Some(create_item) = create_item else {
            return;
        };
        let size = ItemView::new(create_item()).min_size();
        self.inner.template.set(size);
        self.inner.rows.borrow_mut().set_template(size.height);
    }

    fn scroll_to_row(&self, index: ItemIndex) {
        let viewport = &self.inner.env.viewport;
        let current = viewport.offset();
        let y = {
            let mut rows = self.inner.rows.borrow_mut();
            rows.set_gap(self.inner.env.theme.padding());
            rows.reveal_offset(index, current.y, viewport.size().height)
        };
        let offset = Point::new(current.x, y);
        viewport.set_offset(offset);
        self.scrolled(offset);
    }

    fn activation(&self, index: ItemIndex) -> Activation {
        let inner: Weak<Inner<C>> = Rc::downgrade(&self.inner);
        Rc::new(move || {
            if let Some(inner) = inner.upgrade() {
                Self { inner }.select(index);
            }
        })
    }

    /// Runs reconciliation passes until no re-entrant request is pending.
    fn render(&self) {
        if self.inner.rendering.replace(true) {
            trace!("list render requested during a pass; replaying afterwards");
            self.inner.rerun.set(true);
            return;
        }
        {
            let _guard = RenderGuard(&self.inner.rendering);
            let mut settled = false;
            for _ in 0..MAX_COALESCED_PASSES {
                self.inner.rerun.set(false);
                self.reconcile();
                if !self.inner.rerun.get() {
                    settled = true;
                    break;
                }
            }
            if !settled {
                self.inner.rerun.set(false);
                warn!(
                    "list kept requesting renders from its callbacks; waiting for the next invalidation"
                );
            }
        }
        self.flush_notices();
    }

    /// One reconciliation pass.
    ///
    /// Steps up to publishing run without calling user code while internal
    /// state is borrowed; rows are rebound and populated afterwards.
    fn reconcile(&self) {
        let inner = &*self.inner;
        let callbacks = inner.callbacks.borrow().clone();
        let len = callbacks.length.as_ref().map_or(0, |length| length());
        if callbacks.update_item.is_none() {
            warn!("list has no update callback; rows will show blank content");
        }

        let theme = &inner.env.theme;
        let viewport = &inner.env.viewport;
        let params = PlaceParams {
            width: inner.size.get().width,
            gap: theme.padding(),
            separator_thickness: theme.separator_thickness(),
            focused: inner.env.focus.focused(),
        };
        let (visible, content_height) = {
            let mut rows = inner.rows.borrow_mut();
            rows.set_gap(params.gap);
            (
                rows.visible_rows(len, inner.offset_y.get(), viewport.size().height),
                rows.content_extent(len),
            )
        };
        if visible.is_empty() && len > 0 {
            debug!("list has no measured extent yet; deferring layout");
            return;
        }

        let shortfall = inner.engine.borrow().shortfall(visible.indices());
        let fresh = match &callbacks.create_item {
            Some(create_item) => (0..shortfall)
                .map(|_| ItemView::new(create_item()))
                .collect(),
            None => Vec::new(),
        };

        let placement = inner.engine.borrow_mut().place(&visible, fresh, &params);
        if placement.clear_focus {
            inner.env.focus.clear_focus();
        }
        let content_size = Size::new(inner.template.get().width, content_height);
        viewport.set_content(placement.objects, content_size);

        let selection = *inner.selection.borrow();
        for (index, view) in placement.mounted {
            let activation = self.activation(index);
            let mut row = view.borrow_mut();
            let focused = params.focused == Some(row.id());
            row.bind(index, selection.contains(index), focused, activation);
            if let Some(update_item) = &callbacks.update_item {
                update_item(index, row.content_mut());
            }
        }
    }
}

fn run(activation: Option<Activation>) -> bool {
    match activation {
        Some(activation) => {
            activation();
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::string::String;
    use alloc::vec::Vec;
    use alloc::{format, vec};
    use core::cell::{Cell, RefCell};

    use kurbo::{Point, Rect, Size};

    use super::{List, ListEnv};
    use crate::focus::{FocusManager, FocusTracker};
    use crate::item::{ItemContent, ItemKey};
    use crate::theme::DefaultTheme;
    use crate::viewport::{ListObject, ScrollContainer, ScrollViewport};
    use crate::{ItemIndex, ViewId};

    #[derive(Debug, Default)]
    struct Label {
        text: String,
        size: Size,
    }

    impl ItemContent for Label {
        fn min_size(&self) -> Size {
            Size::new(100.0, 20.0)
        }

        fn resize(&mut self, size: Size) {
            self.size = size;
        }
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Event {
        Selected(ItemIndex),
        Unselected(ItemIndex),
    }

    struct Fixture {
        list: List<Label>,
        viewport: Rc<ScrollViewport>,
        focus: Rc<FocusTracker>,
        len: Rc<Cell<usize>>,
        updates: Rc<RefCell<Vec<ItemIndex>>>,
        events: Rc<RefCell<Vec<Event>>>,
    }

    fn test_env() -> (ListEnv, Rc<ScrollViewport>, Rc<FocusTracker>) {
        let viewport = Rc::new(ScrollViewport::new());
        let focus = Rc::new(FocusTracker::new());
        let env = ListEnv {
            theme: Rc::new(DefaultTheme {
                padding: 1.0,
                separator_thickness: 1.0,
                ..DefaultTheme::default()
            }),
            focus: focus.clone(),
            viewport: viewport.clone(),
        };
        (env, viewport, focus)
    }

    /// Rows are 20px tall with a 1px gap; the viewport is 200x50.
    fn fixture(len: usize) -> Fixture {
        let (env, viewport, focus) = test_env();
        let len = Rc::new(Cell::new(len));
        let updates = Rc::new(RefCell::new(Vec::new()));
        let events = Rc::new(RefCell::new(Vec::new()));

        let count = len.clone();
        let log = updates.clone();
        let list = List::with_env(
            env,
            move || count.get(),
            Label::default,
            move |index, label: &mut Label| {
                label.text = format!("item {index}");
                log.borrow_mut().push(index);
            },
        );
        let selected = events.clone();
        list.set_on_selected(move |index| selected.borrow_mut().push(Event::Selected(index)));
        let unselected = events.clone();
        list.set_on_unselected(move |index| {
            unselected.borrow_mut().push(Event::Unselected(index));
        });
        list.resize(Size::new(200.0, 50.0));

        Fixture {
            list,
            viewport,
            focus,
            len,
            updates,
            events,
        }
    }

    fn mounted_ids(list: &List<Label>) -> Vec<(ItemIndex, ViewId)> {
        list.visible_indices()
            .into_iter()
            .map(|index| (index, list.view_at_index(index).unwrap()))
            .collect()
    }

    #[test]
    fn mounts_rows_intersecting_the_viewport() {
        let f = fixture(100);
        assert_eq!(f.list.visible_indices(), [0, 1, 2]);
        assert_eq!(f.list.min_size(), Size::new(100.0, 20.0));
        assert_eq!(f.viewport.content_size(), Size::new(100.0, 2099.0));

        let rows: Vec<_> = f
            .viewport
            .objects()
            .into_iter()
            .filter_map(|object| match object {
                ListObject::Row { index, bounds, .. } => Some((index, bounds)),
                ListObject::Separator { .. } => None,
            })
            .collect();
        assert_eq!(
            rows,
            [
                (0, Rect::new(0.0, 0.0, 200.0, 20.0)),
                (1, Rect::new(0.0, 21.0, 200.0, 41.0)),
                (2, Rect::new(0.0, 42.0, 200.0, 62.0)),
            ]
        );
        f.list.with_item(2, |row| {
            assert_eq!(row.content().text, "item 2");
            assert_eq!(row.content().size, Size::new(200.0, 20.0));
        });
    }

    #[test]
    fn separators_sit_between_rows() {
        let f = fixture(100);
        assert_eq!(f.viewport.separator_count(), 2);
        let engine = f.list.inner.engine.borrow();
        assert_eq!(
            engine.separators(),
            [
                Rect::new(0.0, 20.0, 200.0, 21.0),
                Rect::new(0.0, 41.0, 200.0, 42.0),
            ]
        );
    }

    #[test]
    fn repeated_passes_do_not_churn_the_pool() {
        let f = fixture(100);
        let before = mounted_ids(&f.list);
        let stats = f.list.stats();
        f.list.refresh();
        f.list.refresh();
        assert_eq!(mounted_ids(&f.list), before);
        assert_eq!(f.list.stats(), stats);
    }

    #[test]
    fn scrolling_recycles_views_and_repopulates_them() {
        let f = fixture(100);
        assert_eq!(f.list.stats().created, 3);

        // One row down: row 3 needs a new view, row 0's view goes to the pool.
        f.list.scrolled(Point::new(0.0, 21.0));
        assert_eq!(f.list.visible_indices(), [1, 2, 3]);
        let stats = f.list.stats();
        assert_eq!((stats.created, stats.in_pool, stats.reused), (4, 1, 0));

        // Another row: row 4 reuses the pooled view.
        f.list.scrolled(Point::new(0.0, 42.0));
        assert_eq!(f.list.visible_indices(), [2, 3, 4]);
        let stats = f.list.stats();
        assert_eq!((stats.created, stats.in_pool, stats.reused), (4, 1, 1));

        // Jump away, then back: row 0 comes back populated with fresh content.
        f.list.scrolled(Point::new(0.0, 210.0));
        assert_eq!(f.list.visible_indices(), [10, 11, 12]);
        f.updates.borrow_mut().clear();
        f.list.scrolled(Point::new(0.0, 0.0));
        assert_eq!(f.list.visible_indices(), [0, 1, 2]);
        assert_eq!(*f.updates.borrow(), [0, 1, 2]);
        f.list.with_item(0, |row| {
            assert_eq!(row.content().text, "item 0");
            assert_eq!(row.bound_index(), Some(0));
        });
    }

    #[test]
    fn mounted_and_pooled_views_are_disjoint() {
        let f = fixture(100);
        for offset in [0.0, 30.0, 500.0, 61.0, 2000.0, 0.0] {
            f.list.scrolled(Point::new(0.0, offset));
            let mounted: Vec<_> = mounted_ids(&f.list).into_iter().map(|(_, id)| id).collect();
            let pooled = f.list.inner.engine.borrow().pooled_ids();
            assert!(mounted.iter().all(|id| !pooled.contains(id)));
            let stats = f.list.stats();
            assert_eq!(stats.in_use + stats.in_pool, stats.created);
        }
    }

    #[test]
    fn selecting_again_fires_unselect_then_select() {
        let f = fixture(100);
        f.list.select(1);
        f.list.select(2);
        assert_eq!(
            *f.events.borrow(),
            [Event::Selected(1), Event::Unselected(1), Event::Selected(2)]
        );
        assert_eq!(f.list.selected(), Some(2));
        assert_eq!(f.list.with_item(1, |row| row.is_selected()), Some(false));
        assert_eq!(f.list.with_item(2, |row| row.is_selected()), Some(true));

        // Selecting the current selection is a no-op.
        f.list.select(2);
        assert_eq!(f.events.borrow().len(), 3);
    }

    #[test]
    fn out_of_range_selection_is_ignored() {
        let f = fixture(10);
        let updates = f.updates.borrow().len();
        f.list.select(10);
        f.list.scroll_to(42);
        assert_eq!(f.list.selected(), None);
        assert!(f.events.borrow().is_empty());
        assert_eq!(f.updates.borrow().len(), updates);
        assert_eq!(f.list.scroll_offset(), 0.0);
    }

    #[test]
    fn unselect_all_without_selection_does_nothing() {
        let f = fixture(10);
        let updates = f.updates.borrow().len();
        f.list.unselect_all();
        f.list.unselect(3);
        assert!(f.events.borrow().is_empty());
        assert_eq!(f.updates.borrow().len(), updates);
    }

    #[test]
    fn unselect_clears_matching_selection() {
        let f = fixture(10);
        f.list.select(4);
        f.list.unselect(3);
        assert_eq!(f.list.selected(), Some(4));
        f.list.unselect(4);
        assert_eq!(f.list.selected(), None);
        f.list.select(1);
        f.list.unselect_all();
        assert_eq!(
            *f.events.borrow(),
            [
                Event::Selected(4),
                Event::Unselected(4),
                Event::Selected(1),
                Event::Unselected(1),
            ]
        );
    }

    #[test]
    fn select_scrolls_row_into_view() {
        let f = fixture(100);
        f.list.select(50);
        // Row 50 spans 1050..1070; aligning its bottom with the viewport gives 1020.
        assert_eq!(f.list.scroll_offset(), 1020.0);
        assert_eq!(f.viewport.offset(), Point::new(0.0, 1020.0));
        assert!(f.list.visible_indices().contains(&50));
    }

    #[test]
    fn scroll_to_reveals_overridden_row_in_full() {
        let f = fixture(100);
        f.list.set_item_height(5, 40.0);
        f.list.scroll_to(5);
        // Row 5 spans 105..145.
        assert_eq!(f.list.scroll_offset(), 95.0);
        assert_eq!(f.list.visible_indices(), [4, 5]);
        assert_eq!(
            f.list.with_item(5, |row| row.bounds()),
            Some(Rect::new(0.0, 105.0, 200.0, 145.0))
        );
        assert_eq!(f.list.selected(), None);
    }

    #[test]
    fn unchanged_item_height_does_not_render() {
        let f = fixture(100);
        f.list.set_item_height(1, 30.0);
        let updates = f.updates.borrow().len();
        f.list.set_item_height(1, 30.0);
        assert_eq!(f.updates.borrow().len(), updates);
        assert_eq!(f.viewport.content_size().height, 2109.0);
    }

    #[test]
    fn scroll_to_bottom_and_top() {
        let f = fixture(100);
        f.list.scroll_to_bottom();
        assert_eq!(f.list.scroll_offset(), 2049.0);
        assert_eq!(f.list.visible_indices(), [97, 98, 99]);

        f.list.scroll_to_top();
        assert_eq!(f.list.scroll_offset(), 0.0);
        assert_eq!(f.list.visible_indices(), [0, 1, 2]);
    }

    #[test]
    fn recycling_a_focused_view_clears_focus() {
        let f = fixture(100);
        f.focus.focus(f.list.view_at_index(0));
        f.list.scroll_to(50);
        assert!(!f.list.visible_indices().contains(&0));
        assert_eq!(f.focus.focused(), None);
    }

    #[test]
    fn focused_visible_row_stays_hovered() {
        let f = fixture(100);
        let focused = f.list.view_at_index(1);
        f.focus.focus(focused);
        f.list.refresh();
        assert_eq!(f.focus.focused(), focused);
        assert_eq!(f.list.with_item(1, |row| row.is_hovered()), Some(true));
        assert_eq!(f.list.with_item(0, |row| row.is_hovered()), Some(false));
    }

    #[test]
    fn collapsed_viewport_keeps_previous_mount() {
        let f = fixture(100);
        let before = mounted_ids(&f.list);
        f.list.resize(Size::new(200.0, 0.0));
        assert_eq!(mounted_ids(&f.list), before);

        let (env, _, _) = test_env();
        let list = List::with_env(env, || 5, Label::default, |_, _: &mut Label| {});
        list.resize(Size::ZERO);
        assert!(list.visible_indices().is_empty());
    }

    #[test]
    fn empty_list_publishes_nothing() {
        let f = fixture(0);
        assert!(f.list.visible_indices().is_empty());
        assert!(f.viewport.objects().is_empty());
        assert_eq!(f.viewport.content_size().height, 0.0);
        f.list.scroll_to_bottom();
        f.list.select(0);
        assert_eq!(f.list.selected(), None);
    }

    #[test]
    fn growing_the_data_shows_new_rows_on_refresh() {
        let f = fixture(1);
        assert_eq!(f.list.visible_indices(), [0]);
        f.len.set(3);
        f.list.refresh();
        assert_eq!(f.list.visible_indices(), [0, 1, 2]);
    }

    #[test]
    fn missing_callbacks_degrade_quietly() {
        let (env, viewport, _) = test_env();
        let list = List::<Label>::empty(env);
        list.resize(Size::new(200.0, 50.0));
        assert!(list.visible_indices().is_empty());
        assert_eq!(list.length(), 0);

        // Rows without content updates still mount.
        list.set_length(|| 10);
        list.set_create_item(Label::default);
        list.refresh();
        assert_eq!(list.visible_indices(), [0, 1, 2]);
        assert_eq!(list.with_item(0, |row| row.content().text.clone()), Some(String::new()));
        assert_eq!(viewport.separator_count(), 2);

        // Without a create callback no rows can be built.
        let (env, _, _) = test_env();
        let list = List::<Label>::empty(env);
        list.set_length(|| 10);
        list.resize(Size::new(200.0, 50.0));
        assert!(list.visible_indices().is_empty());
    }

    #[test]
    fn tapping_a_row_selects_it() {
        let f = fixture(100);
        assert!(f.list.tap_at(Point::new(10.0, 25.0)));
        assert_eq!(f.list.selected(), Some(1));
        assert_eq!(*f.events.borrow(), [Event::Selected(1)]);
        assert!(!f.list.tap_at(Point::new(10.0, 400.0)));
    }

    #[test]
    fn space_on_focused_row_selects_it() {
        let f = fixture(100);
        assert!(!f.list.key_pressed(ItemKey::Space));
        f.focus.focus(f.list.view_at_index(2));
        assert!(!f.list.key_pressed(ItemKey::Other));
        assert!(f.list.key_pressed(ItemKey::Space));
        assert_eq!(f.list.selected(), Some(2));
    }

    #[test]
    fn hover_follows_pointer() {
        let f = fixture(100);
        assert_eq!(f.list.hover_at(Some(Point::new(5.0, 45.0))), Some(2));
        assert_eq!(f.list.with_item(2, |row| row.is_hovered()), Some(true));
        assert_eq!(f.list.hover_at(None), None);
        assert_eq!(f.list.with_item(2, |row| row.is_hovered()), Some(false));
    }

    #[test]
    fn callbacks_may_reenter_the_list() {
        let (env, _, _) = test_env();
        let handle: Rc<RefCell<Option<List<Label>>>> = Rc::new(RefCell::new(None));
        let events = Rc::new(RefCell::new(Vec::new()));

        let reentry = handle.clone();
        let done = Rc::new(Cell::new(false));
        let list = List::with_env(env, || 10, Label::default, move |index, label: &mut Label| {
            label.text = format!("item {index}");
            if !done.replace(true) {
                let list = reentry.borrow().clone();
                if let Some(list) = list {
                    list.select(1);
                }
            }
        });
        let log = events.clone();
        list.set_on_selected(move |index| log.borrow_mut().push(index));
        *handle.borrow_mut() = Some(list.clone());

        list.resize(Size::new(200.0, 50.0));
        assert_eq!(list.selected(), Some(1));
        assert_eq!(*events.borrow(), vec![1]);
        assert_eq!(list.with_item(1, |row| row.is_selected()), Some(true));
        assert_eq!(list.visible_indices(), [0, 1, 2]);

        // Break the handle cycle.
        handle.borrow_mut().take();
    }

    #[test]
    fn reentrant_selection_hooks_see_the_rendered_row() {
        let (env, _, _) = test_env();
        let handle: Rc<RefCell<Option<List<Label>>>> = Rc::new(RefCell::new(None));
        let seen = Rc::new(RefCell::new(Vec::new()));

        let reentry = handle.clone();
        let done = Rc::new(Cell::new(false));
        let list = List::with_env(env, || 10, Label::default, move |_, _: &mut Label| {
            if !done.replace(true) {
                let list = reentry.borrow().clone();
                if let Some(list) = list {
                    list.select(1);
                }
            }
        });
        let inspect = handle.clone();
        let log = seen.clone();
        list.set_on_selected(move |index| {
            let list = inspect.borrow().clone();
            if let Some(list) = list {
                let selected = list.with_item(index, |row| row.is_selected());
                log.borrow_mut().push((index, selected));
            }
        });
        *handle.borrow_mut() = Some(list.clone());

        list.resize(Size::new(200.0, 50.0));
        assert_eq!(*seen.borrow(), [(1, Some(true))]);

        handle.borrow_mut().take();
    }

    #[test]
    fn rows_can_be_inspected_while_populating() {
        let (env, _, _) = test_env();
        let handle: Rc<RefCell<Option<List<Label>>>> = Rc::new(RefCell::new(None));
        let seen = Rc::new(RefCell::new(Vec::new()));

        let inspect = handle.clone();
        let log = seen.clone();
        let list = List::with_env(env, || 10, Label::default, move |index, _: &mut Label| {
            let list = inspect.borrow().clone();
            if let Some(list) = list {
                let id = list.view_at_index(index);
                // The row being populated is busy; its neighbours are not.
                let own = list.with_item(index, |row| row.id());
                let other = list.with_item((index + 1) % 3, |row| row.id());
                log.borrow_mut()
                    .push((id.is_some(), own.is_none(), other.is_some()));
            }
        });
        *handle.borrow_mut() = Some(list.clone());

        list.resize(Size::new(200.0, 50.0));
        assert_eq!(*seen.borrow(), [(true, true, true); 3]);

        handle.borrow_mut().take();
    }

    #[test]
    fn gap_comes_from_theme_padding() {
        let viewport = Rc::new(ScrollViewport::new());
        let env = ListEnv {
            theme: Rc::new(DefaultTheme {
                padding: 4.0,
                separator_thickness: 2.0,
                ..DefaultTheme::default()
            }),
            focus: Rc::new(FocusTracker::new()),
            viewport: viewport.clone(),
        };
        let list = List::with_env(env, || 100, Label::default, |_, _: &mut Label| {});
        list.resize(Size::new(200.0, 50.0));

        // Stride is 20 + 4; the 2px separator is centered in the 4px gap.
        assert_eq!(list.visible_indices(), [0, 1, 2]);
        assert_eq!(
            list.with_item(1, |row| row.bounds()),
            Some(Rect::new(0.0, 24.0, 200.0, 44.0))
        );
        assert_eq!(
            list.inner.engine.borrow().separators(),
            [
                Rect::new(0.0, 21.0, 200.0, 23.0),
                Rect::new(0.0, 45.0, 200.0, 47.0),
            ]
        );
        assert_eq!(viewport.content_size().height, 100.0 * 20.0 + 99.0 * 4.0);

        list.select(10);
        // Row 10 spans 240..260.
        assert_eq!(list.scroll_offset(), 210.0);
    }
}
