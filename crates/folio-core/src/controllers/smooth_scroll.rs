//! Smooth scrolling for in-page navigation.
//!
//! Clicks on internal anchors are intercepted and the window is scrolled to
//! the section with an eased, time-bounded animation driven by frame timers.
//! External links are never subscribed, so the browser handles them.

use std::collections::HashMap;

use tracing::{debug, trace};

use super::{Ctx, Subscriptions};
use crate::config::{ScrollConfig, Selectors};
use crate::error::{FolioError, FolioResult};
use crate::host::{ElementId, EventKind, Host, TimerId};
use crate::timers::TimerTask;

/// What an `href` points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    /// `#id` on this page
    Section(String),
    /// Another host or scheme
    External(String),
    /// Relative paths, bare `#`, empty
    Other,
}

impl LinkTarget {
    pub fn parse(href: &str) -> Self {
        let href = href.trim();
        if let Some(id) = href.strip_prefix('#') {
            return if id.is_empty() {
                LinkTarget::Other
            } else {
                LinkTarget::Section(id.to_string())
            };
        }

        let lower = href.to_ascii_lowercase();
        let external = ["http://", "https://", "//", "mailto:", "tel:"]
            .iter()
            .any(|scheme| lower.starts_with(scheme));
        if external {
            LinkTarget::External(href.to_string())
        } else {
            LinkTarget::Other
        }
    }
}

/// Scroll offset that puts a section just below the fixed nav bar.
pub fn scroll_target(section_top: f64, nav_height: f64, gap: f64) -> f64 {
    section_top - nav_height - gap
}

pub fn ease_in_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// One eased scroll from `from` to `to`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollAnimation {
    pub from: f64,
    pub to: f64,
    pub started_at: f64,
    pub duration_ms: f64,
}

impl ScrollAnimation {
    pub fn new(from: f64, to: f64, started_at: f64, duration_ms: u32) -> Self {
        Self {
            from,
            to,
            started_at,
            duration_ms: f64::from(duration_ms),
        }
    }

    fn progress(&self, now: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now - self.started_at) / self.duration_ms).clamp(0.0, 1.0)
    }

    /// Position at `now`. Exactly `to` once the duration has elapsed.
    pub fn position_at(&self, now: f64) -> f64 {
        let t = self.progress(now);
        if t >= 1.0 {
            return self.to;
        }
        self.from + (self.to - self.from) * ease_in_out_cubic(t)
    }

    pub fn is_finished(&self, now: f64) -> bool {
        self.progress(now) >= 1.0
    }
}

#[derive(Debug)]
pub struct SmoothScroll {
    nav: Option<ElementId>,
    /// Intercepted trigger → target section id
    triggers: HashMap<ElementId, String>,
    animation: Option<ScrollAnimation>,
    frame: Option<TimerId>,
    config: ScrollConfig,
}

impl SmoothScroll {
    pub fn new<H: Host>(
        ctx: &mut Ctx<'_, H>,
        selectors: &Selectors,
        config: &ScrollConfig,
        subs: &mut Subscriptions,
    ) -> FolioResult<Self> {
        let host = &mut *ctx.host;
        let mut candidates = host.query_all(&selectors.nav_link);
        candidates.extend(host.query(&selectors.explore_button));

        let mut triggers = HashMap::new();
        let mut passthrough = 0usize;
        for el in candidates {
            let href = host.attribute(el, "href").unwrap_or_default();
            match LinkTarget::parse(&href) {
                LinkTarget::Section(id) => {
                    subs.element(el, EventKind::Click, true);
                    triggers.insert(el, id);
                }
                LinkTarget::External(_) => passthrough += 1,
                LinkTarget::Other => {}
            }
        }

        if triggers.is_empty() {
            return Err(FolioError::missing(&selectors.nav_link));
        }
        debug!(
            intercepted = triggers.len(),
            passthrough, "smooth scroll ready"
        );

        Ok(Self {
            nav: host.query(&selectors.nav),
            triggers,
            animation: None,
            frame: None,
            config: config.clone(),
        })
    }

    pub fn is_trigger(&self, el: ElementId) -> bool {
        self.triggers.contains_key(&el)
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub fn on_click<H: Host>(&mut self, ctx: &mut Ctx<'_, H>, el: ElementId) {
        let Some(section_id) = self.triggers.get(&el) else {
            return;
        };
        let Some(section) = ctx.host.element_by_id(section_id) else {
            trace!(%section_id, "link target missing, ignoring click");
            return;
        };

        let nav_height = self.nav.map_or(0.0, |nav| ctx.host.offset_height(nav));
        let target = scroll_target(
            ctx.host.offset_top(section),
            nav_height,
            self.config.target_gap_px,
        );
        debug!(%section_id, target, "scrolling to section");
        self.start(ctx, target);
    }

    /// Start (or retarget) an animation toward `target`.
    pub fn start<H: Host>(&mut self, ctx: &mut Ctx<'_, H>, target: f64) {
        if let Some(frame) = self.frame.take() {
            ctx.timers.cancel(ctx.host, frame);
        }

        let from = ctx.host.scroll_y();
        let animation =
            ScrollAnimation::new(from, target, ctx.host.now_ms(), self.config.animation_ms);

        if animation.duration_ms <= 0.0 || from == target {
            self.animation = None;
            ctx.host.scroll_to(target);
            return;
        }

        self.animation = Some(animation);
        self.frame = Some(
            ctx.timers
                .after(ctx.host, self.config.frame_ms, TimerTask::ScrollFrame),
        );
    }

    /// Advance the running animation by one frame.
    pub fn on_frame<H: Host>(&mut self, ctx: &mut Ctx<'_, H>) {
        self.frame = None;
        let Some(animation) = self.animation else {
            return;
        };

        let now = ctx.host.now_ms();
        ctx.host.scroll_to(animation.position_at(now));

        if animation.is_finished(now) {
            self.animation = None;
        } else {
            self.frame = Some(
                ctx.timers
                    .after(ctx.host, self.config.frame_ms, TimerTask::ScrollFrame),
            );
        }
    }

    pub fn teardown<H: Host>(&mut self, ctx: &mut Ctx<'_, H>) {
        if let Some(frame) = self.frame.take() {
            ctx.timers.cancel(ctx.host, frame);
        }
        self.animation = None;
    }
}
