// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapting observable data lists to the list's callbacks.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

use log::error;

use crate::item::ItemContent;
use crate::list::{List, ListEnv};
use crate::ItemIndex;

/// Failure to read an item from a [`DataList`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BindingError {
    /// The index is past the end of the data.
    #[error("index {index} is out of bounds for a data list of length {len}")]
    OutOfBounds {
        /// Requested index.
        index: ItemIndex,
        /// Length of the data at the time of the lookup.
        len: usize,
    },
    /// The data source could not produce the item.
    #[error("item {index} is unavailable")]
    Unavailable {
        /// Requested index.
        index: ItemIndex,
    },
}

/// Change notification registered with a [`DataList`].
pub type DataListener = Rc<dyn Fn()>;

/// Handle to a registered [`DataListener`], used to remove it again.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Wraps a data-source specific identifier.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw value of the identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// An observable, indexable data source.
pub trait DataList {
    /// Item type handed to the update callback.
    type Item;

    /// Current number of items.
    fn len(&self) -> usize;

    /// Returns `true` if there are no items.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reads the item at `index`.
    fn get(&self, index: ItemIndex) -> Result<Self::Item, BindingError>;

    /// Registers `listener` to be called after every change.
    fn add_listener(&self, listener: DataListener) -> ListenerId;

    /// Unregisters a listener. Unknown ids are ignored.
    fn remove_listener(&self, id: ListenerId);
}

/// An in-memory [`DataList`] backed by a `Vec`.
///
/// Every mutation notifies the registered listeners once it is complete, so a
/// listener may read the data again.
pub struct DataVec<T> {
    items: RefCell<Vec<T>>,
    listeners: RefCell<Vec<(ListenerId, DataListener)>>,
    next_listener: Cell<u64>,
}

impl<T: fmt::Debug> fmt::Debug for DataVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataVec")
            .field("items", &self.items)
            .field("listeners", &self.listeners.borrow().len())
            .finish()
    }
}

impl<T> Default for DataVec<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T> DataVec<T> {
    /// Wraps `items`.
    #[must_use]
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: RefCell::new(items),
            listeners: RefCell::new(Vec::new()),
            next_listener: Cell::new(0),
        }
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Appends an item.
    pub fn push(&self, item: T) {
        self.items.borrow_mut().push(item);
        self.notify();
    }

    /// Replaces the item at `index`.
    pub fn set(&self, index: ItemIndex, item: T) -> Result<(), BindingError> {
        {
            let mut items = self.items.borrow_mut();
            let len = items.len();
            let slot = items
                .get_mut(index)
                .ok_or(BindingError::OutOfBounds { index, len })?;
            *slot = item;
        }
        self.notify();
        Ok(())
    }

    /// Removes and returns the item at `index`.
    pub fn remove(&self, index: ItemIndex) -> Result<T, BindingError> {
        let item = {
            let mut items = self.items.borrow_mut();
            let len = items.len();
            if index >= len {
                return Err(BindingError::OutOfBounds { index, len });
            }
            items.remove(index)
        };
        self.notify();
        Ok(item)
    }

    /// Removes every item.
    pub fn clear(&self) {
        self.items.borrow_mut().clear();
        self.notify();
    }

    fn notify(&self) {
        let listeners: Vec<_> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener();
        }
    }
}

impl<T: Clone> DataList for DataVec<T> {
    type Item = T;

    fn len(&self) -> usize {
        self.items.borrow().len()
    }

    fn get(&self, index: ItemIndex) -> Result<T, BindingError> {
        let items = self.items.borrow();
        items
            .get(index)
            .cloned()
            .ok_or(BindingError::OutOfBounds {
                index,
                len: items.len(),
            })
    }

    fn add_listener(&self, listener: DataListener) -> ListenerId {
        let id = ListenerId::new(self.next_listener.get());
        self.next_listener.set(id.get() + 1);
        self.listeners.borrow_mut().push((id, listener));
        id
    }

    fn remove_listener(&self, id: ListenerId) {
        self.listeners
            .borrow_mut()
            .retain(|(listener_id, _)| *listener_id != id);
    }
}

impl<C: ItemContent + 'static> List<C> {
    /// Creates a list showing `data`, refreshed whenever `data` changes.
    ///
    /// `update_item` receives each row's item; rows whose lookup fails are
    /// logged and left as they were.
    pub fn with_data<D>(
        data: Rc<D>,
        create_item: impl Fn() -> C + 'static,
        update_item: impl Fn(&D::Item, &mut C) + 'static,
    ) -> Self
    where
        D: DataList + 'static,
    {
        let list = Self::empty(ListEnv::default());
        list.set_create_item(create_item);
        list.bind_data(data, update_item);
        list
    }

    /// Rewires the length and update callbacks of this list to `data`.
    ///
    /// Any previous binding stops notifying this list. The listener is also
    /// removed when the list is dropped.
    pub fn bind_data<D>(&self, data: Rc<D>, update_item: impl Fn(&D::Item, &mut C) + 'static)
    where
        D: DataList + 'static,
    {
        let source = Rc::clone(&data);
        self.set_length(move || source.len());
        let source = Rc::clone(&data);
        self.set_update_item(move |index, content| match source.get(index) {
            Ok(item) => update_item(&item, content),
            Err(err) => error!("skipping list row {index}: {err}"),
        });

        let list = Rc::downgrade(&self.inner);
        let id = data.add_listener(Rc::new(move || {
            if let Some(inner) = list.upgrade() {
                Self { inner }.refresh();
            }
        }));
        self.replace_data_binding(Box::new(move || data.remove_listener(id)));
        self.refresh();
    }
}
