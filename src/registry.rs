//! Id ↔ element mapping for the browser host.
//!
//! Each registered element carries its id as a tag, so lookups from a live
//! handle are a single map probe. Ids are never reused: once an element is
//! released its id resolves to nothing, so stale ids held by pending timers
//! cannot reach a newer element.

use std::collections::HashMap;

use folio_core::host::ElementId;

/// A handle that can carry a registry id.
pub trait Tagged: Clone + PartialEq {
    fn tag(&self) -> Option<u32>;
    fn set_tag(&self, id: u32);
}

pub struct Registry<E> {
    live: HashMap<ElementId, E>,
    next: u32,
}

impl<E> Default for Registry<E> {
    fn default() -> Self {
        Self {
            live: HashMap::new(),
            next: 0,
        }
    }
}

impl<E: Tagged> Registry<E> {
    /// Id of `element`, registering it on first sight.
    pub fn id_for(&mut self, element: E) -> ElementId {
        if let Some(id) = self.find(&element) {
            return id;
        }
        let id = self.reserve();
        element.set_tag(id.0);
        self.live.insert(id, element);
        id
    }

    /// Allocate an id with no element behind it.
    pub fn reserve(&mut self) -> ElementId {
        let id = ElementId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }

    pub fn find(&self, element: &E) -> Option<ElementId> {
        let id = ElementId(element.tag()?);
        // Cloned nodes copy the tag; only the registered handle matches
        (self.live.get(&id)? == element).then_some(id)
    }

    pub fn get(&self, id: ElementId) -> Option<&E> {
        self.live.get(&id)
    }

    /// Forget `id`, handing back its element.
    pub fn release(&mut self, id: ElementId) -> Option<E> {
        self.live.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}
