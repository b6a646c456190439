//! Project card hover lift, pointer tilt and tag highlights.
//!
//! While the pointer is over a card this controller holds the card (and its
//! tags) in the [`crate::ledger::TransformLedger`], so reveal writes cannot
//! clobber the tilt.

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use super::{Ctx, Subscriptions};
use crate::config::{HoverConfig, Selectors};
use crate::error::{FolioError, FolioResult};
use crate::host::{ElementId, EventKind, Host, Rect};
use crate::ledger::TransformOwner;
use crate::timers::TimerTask;

const CARD_TRANSITION: &str = "all 0.4s cubic-bezier(0.175, 0.885, 0.32, 1.275)";
const CARD_LIFT: &str = "translateY(-15px) scale(1.02)";
const CARD_SHADOW: &str = "0 25px 80px rgba(0, 0, 0, 0.4)";
const CARD_BORDER: &str = "rgba(59, 130, 246, 0.5)";
const TAG_LIFT: &str = "translateY(-2px)";
const TAG_SHADOW: &str = "0 5px 15px rgba(139, 92, 246, 0.3)";
const LINK_NUDGE: &str = "translateX(5px)";
const LINK_BACKGROUND: &str = "rgba(59, 130, 246, 0.2)";

/// Card rotation derived from the pointer position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tilt {
    pub rotate_x: f64,
    pub rotate_y: f64,
}

impl Tilt {
    /// Tilt toward the pointer. `client_x`/`client_y` are viewport
    /// coordinates; `rect` is the card's bounding box.
    pub fn from_pointer(rect: Rect, client_x: f64, client_y: f64, divisor: f64) -> Self {
        let divisor = if divisor == 0.0 { 1.0 } else { divisor };
        let x = client_x - rect.left;
        let y = client_y - rect.top;
        let center_x = rect.width / 2.0;
        let center_y = rect.height / 2.0;

        Self {
            rotate_x: (y - center_y) / divisor,
            rotate_y: (center_x - x) / divisor,
        }
    }

    pub fn transform(&self, perspective_px: f64) -> String {
        format!(
            "perspective({perspective_px}px) rotateX({}deg) rotateY({}deg) {CARD_LIFT}",
            self.rotate_x, self.rotate_y
        )
    }
}

#[derive(Debug)]
pub struct HoverEffects {
    /// Card → tags in child order
    cards: HashMap<ElementId, Vec<ElementId>>,
    links: HashSet<ElementId>,
    config: HoverConfig,
}

impl HoverEffects {
    pub fn new<H: Host>(
        ctx: &mut Ctx<'_, H>,
        selectors: &Selectors,
        config: &HoverConfig,
        subs: &mut Subscriptions,
    ) -> FolioResult<Self> {
        let host = &mut *ctx.host;
        let mut cards = HashMap::new();
        for card in host.query_all(&selectors.project_card) {
            let tags = host.query_within(card, &selectors.tech_tag);
            subs.element(card, EventKind::PointerEnter, false);
            subs.element(card, EventKind::PointerMove, false);
            subs.element(card, EventKind::PointerLeave, false);
            cards.insert(card, tags);
        }

        let links: HashSet<ElementId> = host.query_all(&selectors.project_link).into_iter().collect();
        for link in &links {
            subs.element(*link, EventKind::PointerEnter, false);
            subs.element(*link, EventKind::PointerLeave, false);
        }

        if cards.is_empty() && links.is_empty() {
            return Err(FolioError::missing(&selectors.project_card));
        }
        debug!(cards = cards.len(), links = links.len(), "hover effects ready");

        Ok(Self {
            cards,
            links,
            config: config.clone(),
        })
    }

    pub fn is_card(&self, el: ElementId) -> bool {
        self.cards.contains_key(&el)
    }

    pub fn on_enter<H: Host>(&mut self, ctx: &mut Ctx<'_, H>, el: ElementId) {
        if self.cards.contains_key(&el) {
            self.enter_card(ctx, el);
        } else if self.links.contains(&el) {
            ctx.host.set_style(el, "transform", LINK_NUDGE);
            ctx.host.set_style(el, "background-color", LINK_BACKGROUND);
        }
    }

    pub fn on_move<H: Host>(&mut self, ctx: &mut Ctx<'_, H>, el: ElementId, x: f64, y: f64) {
        if !self.cards.contains_key(&el) {
            return;
        }
        if !ctx.transforms.is_held(el) {
            self.enter_card(ctx, el);
        }

        let rect = ctx.host.bounding_rect(el);
        let tilt = Tilt::from_pointer(rect, x, y, self.config.tilt_divisor);
        ctx.transforms.write(
            ctx.host,
            el,
            TransformOwner::Pointer,
            &tilt.transform(self.config.perspective_px),
        );
    }

    pub fn on_leave<H: Host>(&mut self, ctx: &mut Ctx<'_, H>, el: ElementId) {
        if let Some(tags) = self.cards.get(&el) {
            let cancelled = ctx.timers.cancel_where(ctx.host, |task| {
                matches!(task, TimerTask::LiftTag { card, .. } if *card == el)
            });
            trace!(%el, pending_lifts = cancelled.len(), "card left");

            for tag in tags {
                ctx.host.set_style(*tag, "box-shadow", "");
                ctx.transforms.release(ctx.host, *tag);
            }
            ctx.host.set_style(el, "box-shadow", "");
            ctx.host.set_style(el, "border-color", "");
            ctx.transforms.release(ctx.host, el);
        } else if self.links.contains(&el) {
            ctx.host.set_style(el, "transform", "");
            ctx.host.set_style(el, "background-color", "");
        }
    }

    /// Staggered tag highlight, dropped if the pointer already left.
    pub fn on_lift_tag<H: Host>(&mut self, ctx: &mut Ctx<'_, H>, card: ElementId, tag: ElementId) {
        if !ctx.transforms.is_held(card) {
            return;
        }
        Self::lift(ctx, tag);
    }

    fn enter_card<H: Host>(&mut self, ctx: &mut Ctx<'_, H>, card: ElementId) {
        ctx.transforms.hold(card);
        ctx.host.set_style(card, "transition", CARD_TRANSITION);
        ctx.transforms
            .write(ctx.host, card, TransformOwner::Pointer, CARD_LIFT);
        ctx.host.set_style(card, "box-shadow", CARD_SHADOW);
        ctx.host.set_style(card, "border-color", CARD_BORDER);

        let Some(tags) = self.cards.get(&card) else {
            return;
        };
        for (index, tag) in tags.iter().enumerate() {
            ctx.transforms.hold(*tag);
            if index == 0 {
                Self::lift(ctx, *tag);
            } else {
                let delay = self.config.tag_stagger_ms.saturating_mul(index as u32);
                ctx.timers
                    .after(ctx.host, delay, TimerTask::LiftTag { card, tag: *tag });
            }
        }
    }

    fn lift<H: Host>(ctx: &mut Ctx<'_, H>, tag: ElementId) {
        ctx.transforms
            .write(ctx.host, tag, TransformOwner::Pointer, TAG_LIFT);
        ctx.host.set_style(tag, "box-shadow", TAG_SHADOW);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tilt_at_center_is_flat() {
        let rect = Rect::new(100.0, 200.0, 400.0, 300.0);
        let tilt = Tilt::from_pointer(rect, 300.0, 350.0, 20.0);
        assert_eq!(tilt.rotate_x, 0.0);
        assert_eq!(tilt.rotate_y, 0.0);
    }

    #[test]
    fn test_tilt_toward_corner() {
        let rect = Rect::new(0.0, 0.0, 400.0, 200.0);
        // Bottom-right corner: tips down and to the right
        let tilt = Tilt::from_pointer(rect, 400.0, 200.0, 20.0);
        assert_eq!(tilt.rotate_x, 5.0);
        assert_eq!(tilt.rotate_y, -10.0);
    }

    #[test]
    fn test_tilt_transform_string() {
        let tilt = Tilt {
            rotate_x: 2.5,
            rotate_y: -1.0,
        };
        assert_eq!(
            tilt.transform(1000.0),
            "perspective(1000px) rotateX(2.5deg) rotateY(-1deg) translateY(-15px) scale(1.02)"
        );
    }

    #[test]
    fn test_zero_divisor_does_not_blow_up() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        let tilt = Tilt::from_pointer(rect, 0.0, 0.0, 0.0);
        assert!(tilt.rotate_x.is_finite());
        assert!(tilt.rotate_y.is_finite());
    }
}
