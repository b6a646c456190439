//! Platform boundary for the page controllers.
//!
//! Controllers never touch the browser directly. Everything they read or
//! write goes through the [`Host`] trait, which the browser binding implements
//! on top of `web-sys` and which [`crate::memory::MemoryHost`] implements for
//! tests with a virtual clock.
//!
//! ## Overview
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │  Host                                                         │
//! │  ├── query / query_all / query_within / element_by_id         │
//! │  ├── geometry: offset_top, offset_height, bounding_rect       │
//! │  ├── mutation: classes, inline style, text, create/remove     │
//! │  ├── viewport: scroll_y, viewport/document height, scroll_to  │
//! │  ├── time: now_ms, set_timeout, set_interval, clear_timer     │
//! │  └── notify: listen, observe_intersection, unobserve          │
//! └───────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque handle to an element owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub u32);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "el#{}", self.0)
    }
}

/// Opaque handle to a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(pub u64);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// Viewport-relative bounding box of an element.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// Where an event subscription is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTarget {
    Window,
    Element(ElementId),
}

/// Kind of platform event a controller can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Scroll,
    Load,
    Click,
    PointerEnter,
    PointerMove,
    PointerLeave,
    PageHide,
}

impl EventKind {
    /// DOM event type name used by the browser binding.
    pub fn dom_name(&self) -> &'static str {
        match self {
            EventKind::Scroll => "scroll",
            EventKind::Load => "load",
            EventKind::Click => "click",
            EventKind::PointerEnter => "mouseenter",
            EventKind::PointerMove => "mousemove",
            EventKind::PointerLeave => "mouseleave",
            EventKind::PageHide => "pagehide",
        }
    }
}

/// Options for viewport intersection observation.
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionOptions {
    /// Visible-area ratio that counts as intersecting
    pub threshold: f64,
    /// CSS margin applied to the root (e.g. "0px 0px -50px 0px")
    pub root_margin: String,
}

/// Everything the controllers need from the document and runtime.
///
/// All operations are best effort. Implementations must not panic when an
/// element has been detached; they report through return values instead.
pub trait Host {
    /// First element matching `selector` in document order.
    fn query(&mut self, selector: &str) -> Option<ElementId>;

    /// All elements matching `selector` in document order.
    fn query_all(&mut self, selector: &str) -> Vec<ElementId>;

    /// Descendants of `root` matching `selector` in document order.
    fn query_within(&mut self, root: ElementId, selector: &str) -> Vec<ElementId>;

    /// Element whose `id` attribute equals `id`.
    fn element_by_id(&mut self, id: &str) -> Option<ElementId>;

    fn attribute(&self, el: ElementId, name: &str) -> Option<String>;

    /// Distance from the top of the document in CSS pixels.
    fn offset_top(&self, el: ElementId) -> f64;

    fn offset_height(&self, el: ElementId) -> f64;

    fn bounding_rect(&self, el: ElementId) -> Rect;

    fn has_class(&self, el: ElementId, class: &str) -> bool;

    fn add_class(&mut self, el: ElementId, class: &str);

    fn remove_class(&mut self, el: ElementId, class: &str);

    /// Set an inline style property. An empty value removes the property.
    fn set_style(&mut self, el: ElementId, property: &str, value: &str);

    fn set_text(&mut self, el: ElementId, text: &str);

    /// Create an element and append it to `parent`.
    fn create_child(&mut self, parent: ElementId, tag: &str, class: &str) -> ElementId;

    /// Detach an element. Returns `false` if it was already detached.
    fn remove_element(&mut self, el: ElementId) -> bool;

    /// Append a `<style>` element with the given id and rules.
    fn insert_stylesheet(&mut self, id: &str, css: &str);

    fn scroll_y(&self) -> f64;

    fn viewport_height(&self) -> f64;

    fn document_height(&self) -> f64;

    /// Jump the window scroll position to `y`.
    fn scroll_to(&mut self, y: f64);

    /// Monotonic time in milliseconds.
    fn now_ms(&self) -> f64;

    /// Seed material for decorative randomness.
    fn entropy(&self) -> u64;

    fn set_timeout(&mut self, delay_ms: u32) -> TimerId;

    fn set_interval(&mut self, period_ms: u32) -> TimerId;

    /// Cancel a timer. Unknown or already fired timers are ignored.
    fn clear_timer(&mut self, id: TimerId);

    /// Subscribe to an event. `prevent_default` must be honored synchronously
    /// by the platform before the event is queued.
    fn listen(&mut self, target: EventTarget, kind: EventKind, prevent_default: bool);

    fn observe_intersection(&mut self, el: ElementId, options: &IntersectionOptions);

    fn unobserve(&mut self, el: ElementId);
}
