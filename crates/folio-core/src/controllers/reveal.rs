//! One-shot reveal of elements entering the viewport.

use std::collections::HashSet;

use tracing::{debug, trace};

use super::Ctx;
use crate::config::{RevealConfig, Selectors};
use crate::error::{FolioError, FolioResult};
use crate::host::{ElementId, Host};
use crate::ledger::TransformOwner;
use crate::timers::TimerTask;

const SHOWN_TRANSFORM: &str = "translateY(0)";

#[derive(Debug)]
pub struct RevealController {
    observed: HashSet<ElementId>,
    revealed: HashSet<ElementId>,
    children_selector: String,
    config: RevealConfig,
}

impl RevealController {
    /// Hide every target and start observing it.
    pub fn new<H: Host>(
        ctx: &mut Ctx<'_, H>,
        selectors: &Selectors,
        config: &RevealConfig,
    ) -> FolioResult<Self> {
        let targets = ctx.host.query_all(&selectors.reveal_targets);
        if targets.is_empty() {
            return Err(FolioError::missing(&selectors.reveal_targets));
        }

        let hidden = format!("translateY({}px)", config.offset_px);
        let transition = format!("all {}s ease-out", f64::from(config.transition_ms) / 1000.0);
        let options = config.intersection_options();

        for el in &targets {
            ctx.host.set_style(*el, "opacity", "0");
            ctx.transforms
                .write(ctx.host, *el, TransformOwner::Reveal, &hidden);
            ctx.host.set_style(*el, "transition", &transition);
            ctx.host.observe_intersection(*el, &options);
        }
        debug!(targets = targets.len(), "reveal observing");

        Ok(Self {
            observed: targets.into_iter().collect(),
            revealed: HashSet::new(),
            children_selector: selectors.reveal_children.clone(),
            config: config.clone(),
        })
    }

    pub fn is_revealed(&self, el: ElementId) -> bool {
        self.revealed.contains(&el)
    }

    pub fn observed_count(&self) -> usize {
        self.observed.len()
    }

    /// Handle an intersection notification. Only the first intersecting
    /// notification per element has any effect.
    pub fn on_intersection<H: Host>(
        &mut self,
        ctx: &mut Ctx<'_, H>,
        el: ElementId,
        is_intersecting: bool,
    ) {
        if !is_intersecting || !self.observed.remove(&el) {
            return;
        }
        self.revealed.insert(el);
        ctx.host.unobserve(el);
        Self::show(ctx, el);

        let children = ctx.host.query_within(el, &self.children_selector);
        trace!(%el, children = children.len(), "revealing");
        for (index, child) in children.into_iter().enumerate() {
            if index == 0 {
                Self::show(ctx, child);
            } else {
                let delay = self.config.stagger_ms.saturating_mul(index as u32);
                ctx.timers
                    .after(ctx.host, delay, TimerTask::RevealChild(child));
            }
        }
    }

    pub fn on_child<H: Host>(&mut self, ctx: &mut Ctx<'_, H>, child: ElementId) {
        Self::show(ctx, child);
    }

    fn show<H: Host>(ctx: &mut Ctx<'_, H>, el: ElementId) {
        ctx.host.set_style(el, "opacity", "1");
        ctx.transforms
            .write(ctx.host, el, TransformOwner::Reveal, SHOWN_TRANSFORM);
    }
}
