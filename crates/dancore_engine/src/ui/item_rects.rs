//! Screen rectangles of interactive widgets, recorded in test builds
//!
//! Headless tests use these to aim mouse events at real widgets. Non-test
//! builds compile the recorders to nothing.

#[cfg(not(test))]
use imgui::Ui;

/// Record the rectangle of the last submitted item
#[cfg(not(test))]
#[inline]
pub(crate) fn record_item(_ui: &Ui, _scope: &'static str, _name: &'static str) {}

/// Record the rectangle of the current window
#[cfg(not(test))]
#[inline]
pub(crate) fn record_window(_ui: &Ui, _name: &'static str) {}

#[cfg(test)]
pub(crate) use recorded::{item_rect, record_item, record_window, window_rect, Rect};

#[cfg(test)]
mod recorded {
    use imgui::Ui;
    use std::cell::RefCell;
    use std::collections::HashMap;

    const WINDOW_SCOPE: &str = "window";

    /// Screen-space rectangle, `min` inclusive and `max` exclusive
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub(crate) struct Rect {
        pub min: [f32; 2],
        pub max: [f32; 2],
    }

    impl Rect {
        pub fn center(&self) -> [f32; 2] {
            [
                (self.min[0] + self.max[0]) * 0.5,
                (self.min[1] + self.max[1]) * 0.5,
            ]
        }
    }

    thread_local! {
        static RECTS: RefCell<HashMap<(&'static str, &'static str), Rect>> =
            RefCell::new(HashMap::new());
    }

    fn store(scope: &'static str, name: &'static str, rect: Rect) {
        RECTS.with(|rects| rects.borrow_mut().insert((scope, name), rect));
    }

    fn load(scope: &'static str, name: &'static str) -> Option<Rect> {
        RECTS.with(|rects| rects.borrow().get(&(scope, name)).copied())
    }

    pub(crate) fn record_item(ui: &Ui, scope: &'static str, name: &'static str) {
        store(
            scope,
            name,
            Rect {
                min: ui.item_rect_min(),
                max: ui.item_rect_max(),
            },
        );
    }

    pub(crate) fn record_window(ui: &Ui, name: &'static str) {
        let min = ui.window_pos();
        let size = ui.window_size();
        store(
            WINDOW_SCOPE,
            name,
            Rect {
                min,
                max: [min[0] + size[0], min[1] + size[1]],
            },
        );
    }

    /// Last recorded rectangle of an item on this thread
    pub(crate) fn item_rect(scope: &'static str, name: &'static str) -> Option<Rect> {
        load(scope, name)
    }

    /// Last recorded rectangle of a window on this thread
    pub(crate) fn window_rect(name: &'static str) -> Option<Rect> {
        load(WINDOW_SCOPE, name)
    }
}
