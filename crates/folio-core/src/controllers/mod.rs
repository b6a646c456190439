//! Visual-state controllers.
//!
//! Each controller owns a disjoint slice of page state and reacts to the
//! events the [`crate::page::Page`] routes to it. Controllers never call one
//! another; the only shared piece is the [`TransformLedger`] for card
//! transforms.

pub mod hero;
pub mod hover;
pub mod menu;
pub mod particles;
pub mod reveal;
pub mod scroll;
pub mod smooth_scroll;
pub mod typing;

use std::collections::HashMap;

use crate::host::{ElementId, EventKind, EventTarget, Host};
use crate::ledger::TransformLedger;
use crate::timers::TimerBook;

pub use hero::HeroIntro;
pub use hover::{HoverEffects, Tilt};
pub use menu::MobileMenu;
pub use particles::{Particle, ParticleEmitter, ParticleParams};
pub use reveal::RevealController;
pub use scroll::{active_section, progress_ratio, NavAppearance, ScrollTracker, SectionSpan};
pub use smooth_scroll::{ease_in_out_cubic, scroll_target, LinkTarget, ScrollAnimation, SmoothScroll};
pub use typing::{TypingAnimation, TypingMachine, TypingState};

/// Mutable page resources handed to a controller for one event.
pub struct Ctx<'a, H: Host> {
    pub host: &'a mut H,
    pub timers: &'a mut TimerBook,
    pub transforms: &'a mut TransformLedger,
}

impl<'a, H: Host> Ctx<'a, H> {
    pub fn new(
        host: &'a mut H,
        timers: &'a mut TimerBook,
        transforms: &'a mut TransformLedger,
    ) -> Self {
        Self {
            host,
            timers,
            transforms,
        }
    }
}

/// Event subscriptions requested during initialization.
///
/// Requests for the same target and kind are merged, so the platform
/// attaches one listener and the page fans the event out. A merged click
/// prevents the default action if any requester asked for it.
#[derive(Debug, Default)]
pub struct Subscriptions {
    order: Vec<(EventTarget, EventKind)>,
    prevent_default: HashMap<(EventTarget, EventKind), bool>,
}

impl Subscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, target: EventTarget, kind: EventKind, prevent_default: bool) {
        let key = (target, kind);
        match self.prevent_default.get_mut(&key) {
            Some(existing) => *existing |= prevent_default,
            None => {
                self.order.push(key);
                self.prevent_default.insert(key, prevent_default);
            }
        }
    }

    pub fn element(&mut self, el: ElementId, kind: EventKind, prevent_default: bool) {
        self.add(EventTarget::Element(el), kind, prevent_default);
    }

    pub fn window(&mut self, kind: EventKind) {
        self.add(EventTarget::Window, kind, false);
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Register every merged subscription with the host.
    pub fn install<H: Host>(self, host: &mut H) {
        for key in self.order {
            let prevent = self.prevent_default.get(&key).copied().unwrap_or(false);
            host.listen(key.0, key.1, prevent);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryHost;

    #[test]
    fn test_subscriptions_merge_prevent_default() {
        let mut subs = Subscriptions::new();
        let link = ElementId(3);
        subs.element(link, EventKind::Click, false);
        subs.element(link, EventKind::Click, true);
        subs.window(EventKind::Scroll);
        subs.window(EventKind::Scroll);
        assert_eq!(subs.len(), 2);

        let mut host = MemoryHost::new();
        subs.install(&mut host);
        assert_eq!(host.listeners().len(), 2);
        let click = host
            .listener(EventTarget::Element(link), EventKind::Click)
            .unwrap();
        assert!(click.prevent_default);
    }
}
