//! Mobile menu toggle.

use std::collections::HashSet;

use tracing::{debug, trace};

use super::{Ctx, Subscriptions};
use crate::config::Selectors;
use crate::error::{FolioError, FolioResult};
use crate::host::{ElementId, EventKind, Host};

pub const TOGGLE_ACTIVE_CLASS: &str = "nav__toggle--active";
pub const MENU_ACTIVE_CLASS: &str = "nav__menu--active";

/// Hamburger bar styles when the menu is open, by bar index.
const OPEN_BARS: [(&str, &str); 3] = [
    ("transform", "rotate(45deg) translate(5px, 5px)"),
    ("opacity", "0"),
    ("transform", "rotate(-45deg) translate(7px, -6px)"),
];

#[derive(Debug)]
pub struct MobileMenu {
    toggle: ElementId,
    panel: ElementId,
    bars: Vec<ElementId>,
    nav_links: HashSet<ElementId>,
    open: bool,
}

impl MobileMenu {
    pub fn new<H: Host>(
        ctx: &mut Ctx<'_, H>,
        selectors: &Selectors,
        subs: &mut Subscriptions,
    ) -> FolioResult<Self> {
        let host = &mut *ctx.host;
        let toggle = host
            .query(&selectors.menu_toggle)
            .ok_or_else(|| FolioError::missing(&selectors.menu_toggle))?;
        let panel = host
            .query(&selectors.menu_panel)
            .ok_or_else(|| FolioError::missing(&selectors.menu_panel))?;
        let bars = host.query_within(toggle, &selectors.menu_bars);
        let nav_links: HashSet<ElementId> =
            host.query_all(&selectors.nav_link).into_iter().collect();

        subs.element(toggle, EventKind::Click, true);
        for link in &nav_links {
            subs.element(*link, EventKind::Click, false);
        }
        debug!(bars = bars.len(), links = nav_links.len(), "mobile menu ready");

        Ok(Self {
            toggle,
            panel,
            bars,
            nav_links,
            open: false,
        })
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn on_click<H: Host>(&mut self, ctx: &mut Ctx<'_, H>, el: ElementId) {
        if el == self.toggle {
            self.set_open(ctx.host, !self.open);
        } else if self.nav_links.contains(&el) {
            self.set_open(ctx.host, false);
        }
    }

    fn set_open<H: Host>(&mut self, host: &mut H, open: bool) {
        self.open = open;
        trace!(open, "mobile menu");

        if open {
            host.add_class(self.toggle, TOGGLE_ACTIVE_CLASS);
            host.add_class(self.panel, MENU_ACTIVE_CLASS);
            for (bar, (property, value)) in self.bars.iter().zip(OPEN_BARS) {
                host.set_style(*bar, property, value);
            }
        } else {
            host.remove_class(self.toggle, TOGGLE_ACTIVE_CLASS);
            host.remove_class(self.panel, MENU_ACTIVE_CLASS);
            for bar in &self.bars {
                host.set_style(*bar, "transform", "");
                host.set_style(*bar, "opacity", "1");
            }
        }
    }
}
