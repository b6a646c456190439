//! In-memory document and virtual clock.
//!
//! [`MemoryHost`] implements [`Host`] without a browser: elements live in an
//! arena, styles and classes are plain maps, and timers fire only when the
//! test advances the clock. [`Page::advance`] drives a whole page forward in
//! time, delivering every due timer in order.
//!
//! ```ignore
//! let mut host = MemoryHost::new();
//! let typing = host.append(None, "span", "typing-text");
//! let mut page = Page::new(host, FolioConfig::default());
//! page.advance(1500.0);
//! assert_eq!(page.host().text(typing), "M");
//! ```

mod selector;

use std::collections::{BTreeMap, HashMap};

use tracing::warn;

use crate::host::{
    ElementId, EventKind, EventTarget, Host, IntersectionOptions, Rect, TimerId,
};
use crate::page::{Page, PageEvent};
use selector::{Matchable, SelectorList};

#[derive(Debug, Clone, Default)]
struct Node {
    tag: String,
    classes: Vec<String>,
    attrs: BTreeMap<String, String>,
    style: BTreeMap<String, String>,
    text: String,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    attached: bool,
    top: f64,
    height: f64,
    rect: Rect,
}

impl Matchable for Node {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    fn attr(&self, name: &str) -> Option<&str> {
        if name == "class" {
            return None;
        }
        self.attrs.get(name).map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingTimer {
    id: TimerId,
    due: f64,
    period: Option<f64>,
    seq: u64,
}

/// A registered event subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Listener {
    pub target: EventTarget,
    pub kind: EventKind,
    pub prevent_default: bool,
}

/// Browser-free [`Host`] used by tests and simulations.
#[derive(Debug)]
pub struct MemoryHost {
    nodes: Vec<Node>,
    roots: Vec<ElementId>,
    scroll_y: f64,
    viewport_height: f64,
    document_height: f64,
    scroll_history: Vec<f64>,
    now: f64,
    timers: Vec<PendingTimer>,
    next_timer: u64,
    next_seq: u64,
    listeners: Vec<Listener>,
    observed: HashMap<ElementId, IntersectionOptions>,
    entropy: u64,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHost {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            roots: Vec::new(),
            scroll_y: 0.0,
            viewport_height: 1000.0,
            document_height: 1000.0,
            scroll_history: Vec::new(),
            now: 0.0,
            timers: Vec::new(),
            next_timer: 1,
            next_seq: 0,
            listeners: Vec::new(),
            observed: HashMap::new(),
            entropy: 0x5eed_f011_0000_0001,
        }
    }

    // ========================================================================
    // Document building
    // ========================================================================

    /// Append a new element under `parent` (or at the document root).
    ///
    /// `classes` is a space-separated class list.
    pub fn append(&mut self, parent: Option<ElementId>, tag: &str, classes: &str) -> ElementId {
        let id = ElementId(self.nodes.len() as u32);
        let attached = parent.map_or(true, |p| self.node(p).attached);
        self.nodes.push(Node {
            tag: tag.to_string(),
            classes: classes.split_whitespace().map(String::from).collect(),
            parent,
            attached,
            ..Node::default()
        });
        match parent {
            Some(p) => self.node_mut(p).children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    pub fn set_attr(&mut self, el: ElementId, name: &str, value: &str) -> &mut Self {
        self.node_mut(el).attrs.insert(name.to_string(), value.to_string());
        self
    }

    /// Set document offset and height.
    pub fn set_geometry(&mut self, el: ElementId, top: f64, height: f64) -> &mut Self {
        let node = self.node_mut(el);
        node.top = top;
        node.height = height;
        self
    }

    pub fn set_rect(&mut self, el: ElementId, rect: Rect) -> &mut Self {
        self.node_mut(el).rect = rect;
        self
    }

    pub fn set_viewport(&mut self, viewport_height: f64, document_height: f64) -> &mut Self {
        self.viewport_height = viewport_height;
        self.document_height = document_height;
        self
    }

    /// Move the scroll position without recording a programmatic scroll.
    pub fn set_scroll_y(&mut self, y: f64) -> &mut Self {
        self.scroll_y = y;
        self
    }

    pub fn set_entropy(&mut self, entropy: u64) -> &mut Self {
        self.entropy = entropy;
        self
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    pub fn style(&self, el: ElementId, property: &str) -> Option<&str> {
        self.node(el).style.get(property).map(String::as_str)
    }

    pub fn text(&self, el: ElementId) -> &str {
        &self.node(el).text
    }

    pub fn tag(&self, el: ElementId) -> &str {
        &self.node(el).tag
    }

    pub fn is_attached(&self, el: ElementId) -> bool {
        self.node(el).attached
    }

    /// Attached children of `el` in order.
    pub fn children(&self, el: ElementId) -> Vec<ElementId> {
        self.node(el)
            .children
            .iter()
            .copied()
            .filter(|c| self.node(*c).attached)
            .collect()
    }

    /// Positions passed to [`Host::scroll_to`], oldest first.
    pub fn scroll_history(&self) -> &[f64] {
        &self.scroll_history
    }

    pub fn listeners(&self) -> &[Listener] {
        &self.listeners
    }

    pub fn listener(&self, target: EventTarget, kind: EventKind) -> Option<Listener> {
        self.listeners
            .iter()
            .copied()
            .find(|l| l.target == target && l.kind == kind)
    }

    pub fn is_observed(&self, el: ElementId) -> bool {
        self.observed.contains_key(&el)
    }

    pub fn observed_options(&self, el: ElementId) -> Option<&IntersectionOptions> {
        self.observed.get(&el)
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    // ========================================================================
    // Virtual clock
    // ========================================================================

    /// Pop the earliest timer due at or before `until`, moving the clock to
    /// its due time. Intervals are rescheduled.
    pub fn pop_due(&mut self, until: f64) -> Option<TimerId> {
        let (index, timer) = self
            .timers
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, t)| t.due <= until)
            .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)))?;

        self.now = self.now.max(timer.due);
        match timer.period {
            Some(period) => {
                let seq = self.bump_seq();
                self.timers[index].due += period;
                self.timers[index].seq = seq;
            }
            None => {
                self.timers.remove(index);
            }
        }
        Some(timer.id)
    }

    /// Move the clock forward without firing anything.
    pub fn set_now(&mut self, now: f64) {
        self.now = self.now.max(now);
    }

    fn bump_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    fn schedule(&mut self, delay_ms: u32, repeating: bool) -> TimerId {
        let id = TimerId(self.next_timer);
        self.next_timer += 1;
        let delay = f64::from(delay_ms);
        let seq = self.bump_seq();
        self.timers.push(PendingTimer {
            id,
            due: self.now + delay,
            // A zero period would never let the clock move forward
            period: repeating.then_some(delay.max(1.0)),
            seq,
        });
        id
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn node(&self, el: ElementId) -> &Node {
        &self.nodes[el.0 as usize]
    }

    fn node_mut(&mut self, el: ElementId) -> &mut Node {
        &mut self.nodes[el.0 as usize]
    }

    fn exists(&self, el: ElementId) -> bool {
        (el.0 as usize) < self.nodes.len()
    }

    /// Attached elements in document order.
    fn document_order(&self) -> Vec<ElementId> {
        let mut out = Vec::new();
        for root in &self.roots {
            self.walk(*root, &mut out);
        }
        out
    }

    fn walk(&self, el: ElementId, out: &mut Vec<ElementId>) {
        let node = self.node(el);
        if !node.attached {
            return;
        }
        out.push(el);
        for child in &node.children {
            self.walk(*child, out);
        }
    }

    fn select(&self, candidates: Vec<ElementId>, selector: &str) -> Vec<ElementId> {
        let Some(list) = SelectorList::parse(selector) else {
            warn!(selector, "unsupported selector");
            return Vec::new();
        };
        candidates
            .into_iter()
            .filter(|el| list.matches(self.node(*el)))
            .collect()
    }

    fn detach(&mut self, el: ElementId) {
        let node = self.node_mut(el);
        node.attached = false;
        let children = node.children.clone();
        for child in children {
            self.detach(child);
        }
    }
}

impl Host for MemoryHost {
    fn query(&mut self, selector: &str) -> Option<ElementId> {
        self.query_all(selector).into_iter().next()
    }

    fn query_all(&mut self, selector: &str) -> Vec<ElementId> {
        let all = self.document_order();
        self.select(all, selector)
    }

    fn query_within(&mut self, root: ElementId, selector: &str) -> Vec<ElementId> {
        if !self.exists(root) {
            return Vec::new();
        }
        let mut descendants = Vec::new();
        for child in self.node(root).children.clone() {
            self.walk(child, &mut descendants);
        }
        self.select(descendants, selector)
    }

    fn element_by_id(&mut self, id: &str) -> Option<ElementId> {
        self.document_order()
            .into_iter()
            .find(|el| self.node(*el).attrs.get("id").map(String::as_str) == Some(id))
    }

    fn attribute(&self, el: ElementId, name: &str) -> Option<String> {
        self.node(el).attrs.get(name).cloned()
    }

    fn offset_top(&self, el: ElementId) -> f64 {
        self.node(el).top
    }

    fn offset_height(&self, el: ElementId) -> f64 {
        self.node(el).height
    }

    fn bounding_rect(&self, el: ElementId) -> Rect {
        self.node(el).rect
    }

    fn has_class(&self, el: ElementId, class: &str) -> bool {
        Matchable::has_class(self.node(el), class)
    }

    fn add_class(&mut self, el: ElementId, class: &str) {
        let node = self.node_mut(el);
        if !node.classes.iter().any(|c| c == class) {
            node.classes.push(class.to_string());
        }
    }

    fn remove_class(&mut self, el: ElementId, class: &str) {
        self.node_mut(el).classes.retain(|c| c != class);
    }

    fn set_style(&mut self, el: ElementId, property: &str, value: &str) {
        let style = &mut self.node_mut(el).style;
        if value.is_empty() {
            style.remove(property);
        } else {
            style.insert(property.to_string(), value.to_string());
        }
    }

    fn set_text(&mut self, el: ElementId, text: &str) {
        self.node_mut(el).text = text.to_string();
    }

    fn create_child(&mut self, parent: ElementId, tag: &str, class: &str) -> ElementId {
        self.append(Some(parent), tag, class)
    }

    fn remove_element(&mut self, el: ElementId) -> bool {
        if !self.exists(el) || !self.node(el).attached {
            return false;
        }
        if let Some(parent) = self.node(el).parent {
            self.node_mut(parent).children.retain(|c| *c != el);
        } else {
            self.roots.retain(|r| *r != el);
        }
        self.detach(el);
        true
    }

    fn insert_stylesheet(&mut self, id: &str, css: &str) {
        let el = self.append(None, "style", "");
        self.set_attr(el, "id", id);
        self.set_text(el, css);
    }

    fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    fn document_height(&self) -> f64 {
        self.document_height
    }

    fn scroll_to(&mut self, y: f64) {
        let max = (self.document_height - self.viewport_height).max(0.0);
        self.scroll_y = y.clamp(0.0, max);
        self.scroll_history.push(y);
    }

    fn now_ms(&self) -> f64 {
        self.now
    }

    fn entropy(&self) -> u64 {
        self.entropy
    }

    fn set_timeout(&mut self, delay_ms: u32) -> TimerId {
        self.schedule(delay_ms, false)
    }

    fn set_interval(&mut self, period_ms: u32) -> TimerId {
        self.schedule(period_ms, true)
    }

    fn clear_timer(&mut self, id: TimerId) {
        self.timers.retain(|t| t.id != id);
    }

    fn listen(&mut self, target: EventTarget, kind: EventKind, prevent_default: bool) {
        self.listeners.push(Listener {
            target,
            kind,
            prevent_default,
        });
    }

    fn observe_intersection(&mut self, el: ElementId, options: &IntersectionOptions) {
        self.observed.insert(el, options.clone());
    }

    fn unobserve(&mut self, el: ElementId) {
        self.observed.remove(&el);
    }
}

impl Page<MemoryHost> {
    /// Advance the virtual clock by `ms`, dispatching every timer that falls
    /// due on the way.
    pub fn advance(&mut self, ms: f64) {
        let until = self.host().now() + ms;
        while let Some(id) = self.host_mut().pop_due(until) {
            self.dispatch(PageEvent::TimerFired(id));
        }
        self.host_mut().set_now(until);
    }

    /// Set the scroll offset and deliver a scroll event.
    pub fn scroll_window(&mut self, y: f64) {
        self.host_mut().set_scroll_y(y);
        self.dispatch(PageEvent::Scrolled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_document_order() {
        let mut host = MemoryHost::new();
        let nav = host.append(None, "nav", "nav");
        let a = host.append(Some(nav), "a", "nav__link");
        let main = host.append(None, "main", "");
        let b = host.append(Some(main), "a", "nav__link");
        let c = host.append(Some(nav), "a", "nav__link");

        assert_eq!(host.query_all(".nav__link"), vec![a, c, b]);
        assert_eq!(host.query(".nav"), Some(nav));
        assert_eq!(host.query_within(nav, ".nav__link"), vec![a, c]);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut host = MemoryHost::new();
        let container = host.append(None, "div", "background-animation");
        let particle = host.create_child(container, "div", "particle");

        assert!(host.remove_element(particle));
        assert!(!host.remove_element(particle));
        assert!(!host.is_attached(particle));
        assert!(host.children(container).is_empty());
        assert!(host.query(".particle").is_none());
    }

    #[test]
    fn test_empty_style_value_removes_property() {
        let mut host = MemoryHost::new();
        let el = host.append(None, "div", "");
        host.set_style(el, "opacity", "0");
        assert_eq!(host.style(el, "opacity"), Some("0"));
        host.set_style(el, "opacity", "");
        assert_eq!(host.style(el, "opacity"), None);
    }

    #[test]
    fn test_timers_fire_in_due_order() {
        let mut host = MemoryHost::new();
        let late = host.set_timeout(300);
        let early = host.set_timeout(100);
        let tick = host.set_interval(150);

        let mut fired = Vec::new();
        while let Some(id) = host.pop_due(320.0) {
            fired.push((id, host.now()));
        }
        assert_eq!(
            fired,
            vec![(early, 100.0), (tick, 150.0), (late, 300.0), (tick, 300.0)]
        );
        assert_eq!(host.pending_timers(), 1);
    }

    #[test]
    fn test_cleared_timer_never_fires() {
        let mut host = MemoryHost::new();
        let id = host.set_timeout(10);
        host.clear_timer(id);
        host.clear_timer(id);
        assert_eq!(host.pop_due(100.0), None);
    }

    #[test]
    fn test_scroll_to_clamps_and_records() {
        let mut host = MemoryHost::new();
        host.set_viewport(1000.0, 3000.0);
        host.scroll_to(2500.0);
        assert_eq!(host.scroll_y(), 2000.0);
        host.scroll_to(-40.0);
        assert_eq!(host.scroll_y(), 0.0);
        assert_eq!(host.scroll_history(), &[2500.0, -40.0]);
    }
}
