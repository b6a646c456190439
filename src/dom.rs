//! Browser implementation of [`Host`].
//!
//! Elements are handed to the core as small integer ids; the registry keeps
//! the live `web_sys::Element` handles. Timers, listeners and intersection
//! observers all report back by pushing a [`PageEvent`] into the page's
//! channel, so handlers never run re-entrantly.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use futures::channel::mpsc::UnboundedSender;
use gloo::events::{EventListener, EventListenerOptions};
use gloo::timers::callback::{Interval, Timeout};
use tracing::{trace, warn};
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, Event, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, MouseEvent, NodeList, PageTransitionEvent, Performance, Window,
};

use folio_core::host::{
    ElementId, EventKind, EventTarget, Host, IntersectionOptions, Rect, TimerId,
};
use folio_core::{FolioError, FolioResult, PageEvent};

use crate::registry::{Registry, Tagged};

pub type EventSender = UnboundedSender<PageEvent>;

/// Convert a JS exception into a host error.
pub fn js_error(value: JsValue) -> FolioError {
    let message = value
        .as_string()
        .or_else(|| value.dyn_ref::<js_sys::Error>().map(|e| String::from(e.message())))
        .unwrap_or_else(|| format!("{value:?}"));
    FolioError::Host(message)
}

// ============================================================================
// Element tagging
// ============================================================================

/// Property carrying the registry id on each registered element.
const TAG_KEY: &str = "__folioId";

impl Tagged for Element {
    fn tag(&self) -> Option<u32> {
        let value = js_sys::Reflect::get(self, &JsValue::from_str(TAG_KEY)).ok()?;
        value.as_f64().map(|id| id as u32)
    }

    fn set_tag(&self, id: u32) {
        if let Err(e) = js_sys::Reflect::set(self, &JsValue::from_str(TAG_KEY), &JsValue::from(id)) {
            warn!(id, error = %js_error(e), "element tag not set");
        }
    }
}

/// Never report a time earlier than the last one reported.
fn monotonic(last: &Cell<f64>, sample: f64) -> f64 {
    let now = sample.max(last.get());
    last.set(now);
    now
}

enum Timer {
    Once(Timeout),
    Every(Interval),
}

/// One observer per distinct option set.
struct Observer {
    observer: IntersectionObserver,
    // Held so the callback outlives the observer
    _callback: Closure<dyn FnMut(js_sys::Array)>,
}

pub struct WebHost {
    window: Window,
    document: Document,
    performance: Option<Performance>,
    last_now: Cell<f64>,
    registry: Rc<RefCell<Registry<Element>>>,
    timers: HashMap<TimerId, Timer>,
    next_timer: u64,
    listeners: Vec<EventListener>,
    observers: HashMap<(u64, String), Observer>,
    observed: HashMap<ElementId, (u64, String)>,
    events: EventSender,
}

impl WebHost {
    pub fn new(events: EventSender) -> FolioResult<Self> {
        let window = web_sys::window().ok_or_else(|| FolioError::Host("no window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| FolioError::Host("no document".into()))?;

        let performance = window.performance();
        if performance.is_none() {
            warn!("performance clock unavailable, falling back to wall clock");
        }

        Ok(Self {
            window,
            document,
            performance,
            last_now: Cell::new(0.0),
            registry: Rc::new(RefCell::new(Registry::default())),
            timers: HashMap::new(),
            next_timer: 1,
            listeners: Vec::new(),
            observers: HashMap::new(),
            observed: HashMap::new(),
            events,
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    fn element(&self, id: ElementId) -> Option<Element> {
        self.registry.borrow().get(id).cloned()
    }

    fn html(&self, id: ElementId) -> Option<HtmlElement> {
        self.element(id)?.dyn_into::<HtmlElement>().ok()
    }

    fn register(&mut self, element: Element) -> ElementId {
        self.registry.borrow_mut().id_for(element)
    }

    fn register_all(&mut self, result: Result<NodeList, JsValue>, selector: &str) -> Vec<ElementId> {
        let list = match result {
            Ok(list) => list,
            Err(e) => {
                warn!(selector, error = %js_error(e), "query failed");
                return Vec::new();
            }
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|element| self.register(element))
            .collect()
    }

    fn next_timer_id(&mut self) -> TimerId {
        let id = TimerId(self.next_timer);
        self.next_timer += 1;
        id
    }

    fn observer_for(&mut self, options: &IntersectionOptions) -> Option<&IntersectionObserver> {
        let key = (options.threshold.to_bits(), options.root_margin.clone());
        if !self.observers.contains_key(&key) {
            let observer = self.create_observer(options)?;
            self.observers.insert(key.clone(), observer);
        }
        self.observers.get(&key).map(|o| &o.observer)
    }

    fn create_observer(&self, options: &IntersectionOptions) -> Option<Observer> {
        let registry = Rc::clone(&self.registry);
        let events = self.events.clone();
        let callback = Closure::<dyn FnMut(js_sys::Array)>::new(move |entries: js_sys::Array| {
            for entry in entries.iter() {
                let entry: IntersectionObserverEntry = entry.unchecked_into();
                let Some(target) = registry.borrow().find(&entry.target()) else {
                    continue;
                };
                let _ = events.unbounded_send(PageEvent::Intersected {
                    target,
                    is_intersecting: entry.is_intersecting(),
                    ratio: entry.intersection_ratio(),
                });
            }
        });

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(options.threshold));
        init.set_root_margin(&options.root_margin);

        match IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init) {
            Ok(observer) => Some(Observer {
                observer,
                _callback: callback,
            }),
            Err(e) => {
                warn!(error = %js_error(e), "intersection observer unavailable");
                None
            }
        }
    }
}

/// Translate a DOM event into a page event.
fn page_event(target: EventTarget, kind: EventKind, event: &Event) -> Option<PageEvent> {
    let element = match target {
        EventTarget::Element(el) => Some(el),
        EventTarget::Window => None,
    };
    let page_event = match (kind, element) {
        (EventKind::Scroll, _) => PageEvent::Scrolled,
        (EventKind::Load, _) => PageEvent::Loaded,
        // Pages kept in the back/forward cache come back alive
        (EventKind::PageHide, _) => {
            let persisted = event
                .dyn_ref::<PageTransitionEvent>()
                .is_some_and(PageTransitionEvent::persisted);
            if persisted {
                return None;
            }
            PageEvent::Unloaded
        }
        (EventKind::Click, Some(el)) => PageEvent::Clicked(el),
        (EventKind::PointerEnter, Some(el)) => PageEvent::PointerEntered(el),
        (EventKind::PointerLeave, Some(el)) => PageEvent::PointerLeft(el),
        (EventKind::PointerMove, Some(el)) => {
            let mouse = event.dyn_ref::<MouseEvent>()?;
            PageEvent::PointerMoved {
                target: el,
                client_x: f64::from(mouse.client_x()),
                client_y: f64::from(mouse.client_y()),
            }
        }
        _ => return None,
    };
    Some(page_event)
}

impl Host for WebHost {
    fn query(&mut self, selector: &str) -> Option<ElementId> {
        match self.document.query_selector(selector) {
            Ok(found) => found.map(|element| self.register(element)),
            Err(e) => {
                warn!(selector, error = %js_error(e), "query failed");
                None
            }
        }
    }

    fn query_all(&mut self, selector: &str) -> Vec<ElementId> {
        let result = self.document.query_selector_all(selector);
        self.register_all(result, selector)
    }

    fn query_within(&mut self, root: ElementId, selector: &str) -> Vec<ElementId> {
        let Some(root) = self.element(root) else {
            return Vec::new();
        };
        let result = root.query_selector_all(selector);
        self.register_all(result, selector)
    }

    fn element_by_id(&mut self, id: &str) -> Option<ElementId> {
        let element = self.document.get_element_by_id(id)?;
        Some(self.register(element))
    }

    fn attribute(&self, el: ElementId, name: &str) -> Option<String> {
        self.element(el)?.get_attribute(name)
    }

    fn offset_top(&self, el: ElementId) -> f64 {
        self.html(el).map_or(0.0, |h| f64::from(h.offset_top()))
    }

    fn offset_height(&self, el: ElementId) -> f64 {
        self.html(el).map_or(0.0, |h| f64::from(h.offset_height()))
    }

    fn bounding_rect(&self, el: ElementId) -> Rect {
        self.element(el).map_or_else(Rect::default, |element| {
            let rect = element.get_bounding_client_rect();
            Rect::new(rect.left(), rect.top(), rect.width(), rect.height())
        })
    }

    fn has_class(&self, el: ElementId, class: &str) -> bool {
        self.element(el)
            .is_some_and(|element| element.class_list().contains(class))
    }

    fn add_class(&mut self, el: ElementId, class: &str) {
        if let Some(element) = self.element(el) {
            if let Err(e) = element.class_list().add_1(class) {
                warn!(%el, class, error = %js_error(e), "add class failed");
            }
        }
    }

    fn remove_class(&mut self, el: ElementId, class: &str) {
        if let Some(element) = self.element(el) {
            if let Err(e) = element.class_list().remove_1(class) {
                warn!(%el, class, error = %js_error(e), "remove class failed");
            }
        }
    }

    fn set_style(&mut self, el: ElementId, property: &str, value: &str) {
        let Some(html) = self.html(el) else {
            return;
        };
        let style = html.style();
        let result = if value.is_empty() {
            style.remove_property(property).map(|_| ())
        } else {
            style.set_property(property, value)
        };
        if let Err(e) = result {
            warn!(%el, property, error = %js_error(e), "set style failed");
        }
    }

    fn set_text(&mut self, el: ElementId, text: &str) {
        if let Some(element) = self.element(el) {
            element.set_text_content(Some(text));
        }
    }

    fn create_child(&mut self, parent: ElementId, tag: &str, class: &str) -> ElementId {
        let created = self.document.create_element(tag).and_then(|child| {
            child.set_class_name(class);
            if let Some(parent) = self.element(parent) {
                parent.append_child(&child)?;
            }
            Ok(child)
        });

        match created {
            Ok(child) => self.register(child),
            Err(e) => {
                warn!(tag, error = %js_error(e), "create element failed");
                self.registry.borrow_mut().reserve()
            }
        }
    }

    fn remove_element(&mut self, el: ElementId) -> bool {
        self.unobserve(el);
        let Some(element) = self.registry.borrow_mut().release(el) else {
            return false;
        };
        let attached = element.parent_node().is_some();
        if attached {
            element.remove();
        }
        attached
    }

    fn insert_stylesheet(&mut self, id: &str, css: &str) {
        let Some(head) = self.document.head() else {
            warn!(id, "document has no head, stylesheet skipped");
            return;
        };
        let inserted = self.document.create_element("style").and_then(|style| {
            style.set_id(id);
            style.set_text_content(Some(css));
            head.append_child(&style)
        });
        if let Err(e) = inserted {
            warn!(id, error = %js_error(e), "stylesheet insert failed");
        }
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn viewport_height(&self) -> f64 {
        self.window
            .inner_height()
            .ok()
            .and_then(|h| h.as_f64())
            .unwrap_or(0.0)
    }

    fn document_height(&self) -> f64 {
        self.document
            .document_element()
            .map_or(0.0, |root| f64::from(root.scroll_height()))
    }

    fn scroll_to(&mut self, y: f64) {
        self.window.scroll_to_with_x_and_y(0.0, y);
    }

    fn now_ms(&self) -> f64 {
        let sample = self
            .performance
            .as_ref()
            .map_or_else(js_sys::Date::now, Performance::now);
        monotonic(&self.last_now, sample)
    }

    fn entropy(&self) -> u64 {
        let word = || (js_sys::Math::random() * f64::from(u32::MAX)) as u64;
        (word() << 32) ^ word() ^ (js_sys::Date::now() as u64)
    }

    fn set_timeout(&mut self, delay_ms: u32) -> TimerId {
        let id = self.next_timer_id();
        let events = self.events.clone();
        let timeout = Timeout::new(delay_ms, move || {
            let _ = events.unbounded_send(PageEvent::TimerFired(id));
        });
        self.timers.insert(id, Timer::Once(timeout));
        id
    }

    fn set_interval(&mut self, period_ms: u32) -> TimerId {
        let id = self.next_timer_id();
        let events = self.events.clone();
        let interval = Interval::new(period_ms, move || {
            let _ = events.unbounded_send(PageEvent::TimerFired(id));
        });
        self.timers.insert(id, Timer::Every(interval));
        id
    }

    fn clear_timer(&mut self, id: TimerId) {
        match self.timers.remove(&id) {
            Some(Timer::Once(timeout)) => {
                let _ = timeout.cancel();
            }
            Some(Timer::Every(interval)) => {
                let _ = interval.cancel();
            }
            None => {}
        }
    }

    fn listen(&mut self, target: EventTarget, kind: EventKind, prevent_default: bool) {
        let events = self.events.clone();
        let options = if prevent_default {
            EventListenerOptions::enable_prevent_default()
        } else {
            EventListenerOptions::default()
        };
        let callback = move |event: &Event| {
            if prevent_default {
                event.prevent_default();
            }
            if let Some(page_event) = page_event(target, kind, event) {
                let _ = events.unbounded_send(page_event);
            }
        };

        let listener = match target {
            EventTarget::Window => {
                EventListener::new_with_options(&self.window, kind.dom_name(), options, callback)
            }
            EventTarget::Element(el) => {
                let Some(element) = self.element(el) else {
                    trace!(%el, ?kind, "listen on unknown element");
                    return;
                };
                EventListener::new_with_options(&element, kind.dom_name(), options, callback)
            }
        };
        self.listeners.push(listener);
    }

    fn observe_intersection(&mut self, el: ElementId, options: &IntersectionOptions) {
        let Some(element) = self.element(el) else {
            return;
        };
        let key = (options.threshold.to_bits(), options.root_margin.clone());
        if let Some(observer) = self.observer_for(options) {
            observer.observe(&element);
            self.observed.insert(el, key);
        }
    }

    fn unobserve(&mut self, el: ElementId) {
        let Some(key) = self.observed.remove(&el) else {
            return;
        };
        if let (Some(observer), Some(element)) = (self.observers.get(&key), self.element(el)) {
            observer.observer.unobserve(&element);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_never_steps_back() {
        let last = Cell::new(0.0);
        assert_eq!(monotonic(&last, 1000.0), 1000.0);
        // Wall clock adjusted backwards mid-animation
        assert_eq!(monotonic(&last, 400.0), 1000.0);
        assert_eq!(monotonic(&last, 1016.5), 1016.5);
        assert_eq!(last.get(), 1016.5);
    }
}
