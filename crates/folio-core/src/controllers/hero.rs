//! Hero intro played once the page has fully loaded.

use tracing::debug;

use super::Ctx;
use crate::config::{HeroConfig, Selectors};
use crate::host::{ElementId, Host};
use crate::timers::TimerTask;

#[derive(Debug)]
pub struct HeroIntro {
    content: Option<ElementId>,
    items: Vec<ElementId>,
    started: bool,
    config: HeroConfig,
}

impl HeroIntro {
    pub fn new<H: Host>(ctx: &mut Ctx<'_, H>, selectors: &Selectors, config: &HeroConfig) -> Self {
        Self {
            content: ctx.host.query(&selectors.hero_content),
            items: ctx.host.query_all(&selectors.hero_items),
            started: false,
            config: config.clone(),
        }
    }

    pub fn has_started(&self) -> bool {
        self.started
    }

    pub fn on_loaded<H: Host>(&mut self, ctx: &mut Ctx<'_, H>) {
        if self.started {
            return;
        }
        self.started = true;
        if self.content.is_none() && self.items.is_empty() {
            return;
        }
        ctx.timers
            .after(ctx.host, self.config.start_delay_ms, TimerTask::HeroStart);
    }

    pub fn on_start<H: Host>(&mut self, ctx: &mut Ctx<'_, H>) {
        debug!(items = self.items.len(), "hero intro");
        if let Some(content) = self.content {
            Self::show(ctx.host, content);
        }
        for (index, item) in self.items.iter().enumerate() {
            if index == 0 {
                Self::show(ctx.host, *item);
            } else {
                let delay = self.config.stagger_ms.saturating_mul(index as u32);
                ctx.timers
                    .after(ctx.host, delay, TimerTask::HeroItem(*item));
            }
        }
    }

    pub fn on_item<H: Host>(&mut self, ctx: &mut Ctx<'_, H>, item: ElementId) {
        Self::show(ctx.host, item);
    }

    fn show<H: Host>(host: &mut H, el: ElementId) {
        host.set_style(el, "opacity", "1");
        host.set_style(el, "transform", "translateY(0)");
    }
}
