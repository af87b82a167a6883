// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A 10 000 row list driven through a scripted session.
//!
//! The list is resized, scrolled, given a tall row, and has rows selected by
//! index, by tap, and by the Space key. After each step the mounted rows and
//! the recycling counters are printed, so it is easy to see that only a
//! viewport's worth of views ever exists.
//!
//! Run:
//! - `RUST_LOG=trace cargo run -p understory_demos --example recycled_list`

use std::rc::Rc;

use kurbo::{Point, Size};
use understory_list::{
    DataVec, DefaultTheme, FocusManager, FocusTracker, ItemContent, ItemKey, List, ListEnv,
    ListObject, ScrollContainer, ScrollViewport,
};
use understory_visible_rows::RowModel;

/// Row content: a single line of text.
#[derive(Debug, Default)]
struct Label {
    text: String,
    width: f64,
}

impl ItemContent for Label {
    fn min_size(&self) -> Size {
        Size::new(160.0, 18.0)
    }

    fn resize(&mut self, size: Size) {
        self.width = size.width;
    }
}

fn dump(step: &str, list: &List<Label>, viewport: &ScrollViewport) {
    let stats = list.stats();
    println!(
        "{step}: offset {:.0}, rows {:?}, selected {:?}, views {} in use / {} pooled / {} created / {} reused",
        list.scroll_offset(),
        list.visible_indices(),
        list.selected(),
        stats.in_use,
        stats.in_pool,
        stats.created,
        stats.reused,
    );
    for object in viewport.objects() {
        if let ListObject::Row { index, view, bounds } = object {
            let (text, width) = list
                .with_item(index, |row| (row.content().text.clone(), row.content().width))
                .unwrap_or_default();
            println!(
                "    {view:?} at y {:>6.1}..{:<6.1} {width:.0}px wide: {text}",
                bounds.y0, bounds.y1
            );
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
        .format_timestamp_millis()
        .init();

    let viewport = Rc::new(ScrollViewport::new());
    let focus = Rc::new(FocusTracker::new());
    let env = ListEnv {
        theme: Rc::new(DefaultTheme::default()),
        focus: focus.clone(),
        viewport: viewport.clone(),
    };

    let list = List::with_env(
        env,
        || 10_000,
        Label::default,
        |index, label: &mut Label| label.text = format!("Row {index}"),
    );
    list.set_on_selected(|index| println!("  -> selected {index}"));
    list.set_on_unselected(|index| println!("  -> unselected {index}"));

    list.resize(Size::new(240.0, 100.0));
    dump("resized", &list, &viewport);

    // The host scrolled its container; forward the new offset.
    viewport.set_offset(Point::new(0.0, 1_000.0));
    list.scrolled(viewport.offset());
    dump("scrolled", &list, &viewport);

    list.set_item_height(42, 60.0);
    list.select(42);
    dump("select 42 (60px tall)", &list, &viewport);

    // Where would row 42 land with the same geometry, computed standalone?
    let mut model = RowModel::new(18.0_f64, 4.0);
    model.overrides_mut().set(42, 60.0);
    println!(
        "  row 42 starts at {:.0}, content is {:.0}px tall",
        model.offset_of(42),
        model.content_extent(10_000)
    );

    let y = viewport.offset().y + 5.0;
    if list.tap_at(Point::new(10.0, y)) {
        dump("tapped first visible row", &list, &viewport);
    }

    focus.focus(list.view_at_index(list.visible_indices()[1]));
    list.key_pressed(ItemKey::Space);
    dump("space on focused row", &list, &viewport);

    list.scroll_to_bottom();
    dump("scrolled to bottom", &list, &viewport);
    println!("  focus after recycling: {:?}", focus.focused());

    list.unselect_all();
    list.scroll_to_top();
    dump("back to top", &list, &viewport);

    // A list bound to observable data refreshes itself on every change.
    let names = Rc::new(DataVec::new(vec!["alpha", "beta"]));
    let bound = List::with_data(names.clone(), Label::default, |name: &&str, label: &mut Label| {
        label.text = (*name).to_owned();
    });
    bound.resize(Size::new(240.0, 100.0));
    names.push("gamma");
    println!(
        "data-bound list shows {:?}",
        bound
            .visible_indices()
            .into_iter()
            .filter_map(|index| bound.with_item(index, |row| row.content().text.clone()))
            .collect::<Vec<_>>()
    );
}
