//! Transform ownership ledger.
//!
//! Card `transform` is the one property two controllers write: the reveal
//! controller slides cards in, and the hover controller lifts and tilts them
//! under the pointer. The ledger makes ownership explicit instead of relying
//! on which handler happened to run last.
//!
//! Rules:
//! - While the pointer holds an element, only [`TransformOwner::Pointer`]
//!   writes reach the host.
//! - A reveal write made while held is remembered, not applied.
//! - Releasing the pointer restores the remembered reveal value, or clears
//!   the inline transform when reveal never wrote one.

use std::collections::HashMap;

use tracing::trace;

use crate::host::{ElementId, Host};

/// Who last wrote an element's inline transform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransformOwner {
    /// No inline transform; the stylesheet decides
    #[default]
    Stylesheet,
    /// Reveal controller
    Reveal,
    /// Hover/parallax controller
    Pointer,
}

#[derive(Debug, Default)]
struct Slot {
    held: bool,
    owner: TransformOwner,
    /// Last value the reveal controller asked for
    reveal: Option<String>,
    /// Value currently on the element
    rendered: Option<String>,
}

#[derive(Debug, Default)]
pub struct TransformLedger {
    slots: HashMap<ElementId, Slot>,
}

impl TransformLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Give the pointer exclusive ownership of `el`.
    pub fn hold(&mut self, el: ElementId) {
        self.slots.entry(el).or_default().held = true;
    }

    pub fn is_held(&self, el: ElementId) -> bool {
        self.slots.get(&el).is_some_and(|slot| slot.held)
    }

    /// Write a transform on behalf of `owner`.
    ///
    /// Returns `false` when the write was deferred because the pointer holds
    /// the element.
    pub fn write<H: Host>(
        &mut self,
        host: &mut H,
        el: ElementId,
        owner: TransformOwner,
        value: &str,
    ) -> bool {
        let slot = self.slots.entry(el).or_default();

        match owner {
            TransformOwner::Reveal => {
                slot.reveal = Some(value.to_string());
                if slot.held {
                    trace!(%el, value, "reveal transform deferred while hovered");
                    return false;
                }
            }
            TransformOwner::Pointer => slot.held = true,
            TransformOwner::Stylesheet => {}
        }

        host.set_style(el, "transform", value);
        slot.owner = owner;
        slot.rendered = (!value.is_empty()).then(|| value.to_string());
        true
    }

    /// Return ownership from the pointer.
    pub fn release<H: Host>(&mut self, host: &mut H, el: ElementId) {
        let Some(slot) = self.slots.get_mut(&el) else {
            return;
        };
        if !slot.held {
            return;
        }
        slot.held = false;

        match slot.reveal.clone() {
            Some(value) => {
                host.set_style(el, "transform", &value);
                slot.owner = TransformOwner::Reveal;
                slot.rendered = Some(value);
            }
            None => {
                host.set_style(el, "transform", "");
                slot.owner = TransformOwner::Stylesheet;
                slot.rendered = None;
            }
        }
    }

    pub fn owner(&self, el: ElementId) -> TransformOwner {
        self.slots.get(&el).map(|slot| slot.owner).unwrap_or_default()
    }

    /// Inline transform the ledger last put on `el`.
    pub fn rendered(&self, el: ElementId) -> Option<&str> {
        self.slots.get(&el).and_then(|slot| slot.rendered.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryHost;

    fn card(host: &mut MemoryHost) -> ElementId {
        host.append(None, "article", "project-card")
    }

    #[test]
    fn test_reveal_writes_when_free() {
        let mut host = MemoryHost::new();
        let el = card(&mut host);
        let mut ledger = TransformLedger::new();

        assert!(ledger.write(&mut host, el, TransformOwner::Reveal, "translateY(30px)"));
        assert_eq!(host.style(el, "transform"), Some("translateY(30px)"));
        assert_eq!(ledger.owner(el), TransformOwner::Reveal);
    }

    #[test]
    fn test_reveal_deferred_while_held() {
        let mut host = MemoryHost::new();
        let el = card(&mut host);
        let mut ledger = TransformLedger::new();

        ledger.write(&mut host, el, TransformOwner::Pointer, "translateY(-15px) scale(1.02)");
        assert!(!ledger.write(&mut host, el, TransformOwner::Reveal, "translateY(0)"));
        assert_eq!(host.style(el, "transform"), Some("translateY(-15px) scale(1.02)"));
        assert_eq!(ledger.owner(el), TransformOwner::Pointer);

        ledger.release(&mut host, el);
        assert_eq!(host.style(el, "transform"), Some("translateY(0)"));
        assert_eq!(ledger.owner(el), TransformOwner::Reveal);
    }

    #[test]
    fn test_release_without_reveal_clears() {
        let mut host = MemoryHost::new();
        let el = card(&mut host);
        let mut ledger = TransformLedger::new();

        ledger.hold(el);
        ledger.write(&mut host, el, TransformOwner::Pointer, "scale(1.02)");
        ledger.release(&mut host, el);

        assert_eq!(host.style(el, "transform"), None);
        assert_eq!(ledger.owner(el), TransformOwner::Stylesheet);
        assert!(!ledger.is_held(el));
    }

    #[test]
    fn test_release_unheld_is_noop() {
        let mut host = MemoryHost::new();
        let el = card(&mut host);
        let mut ledger = TransformLedger::new();

        ledger.write(&mut host, el, TransformOwner::Reveal, "translateY(30px)");
        ledger.release(&mut host, el);
        assert_eq!(host.style(el, "transform"), Some("translateY(30px)"));
    }
}
