//! Page: owns the controllers and routes platform events to them.
//!
//! ## Overview
//!
//! ```text
//! browser events ──▶ PageEvent ──▶ Page::dispatch ──┬──▶ ScrollTracker
//!                                                   ├──▶ SmoothScroll
//!    timers fire ──▶ TimerFired ──▶ TimerBook ──────┼──▶ TypingAnimation
//!                                                   ├──▶ MobileMenu
//!                                                   ├──▶ HoverEffects ◀─┐
//!                                                   ├──▶ ParticleEmitter │ TransformLedger
//!                                                   ├──▶ RevealController◀┘
//!                                                   └──▶ HeroIntro
//! ```
//!
//! Every event runs to completion before the next is dispatched. A
//! controller whose elements are missing is skipped at construction; the
//! rest of the page keeps working.

use tracing::{debug, info, trace};

use crate::config::FolioConfig;
use crate::controllers::{
    Ctx, HeroIntro, HoverEffects, MobileMenu, ParticleEmitter, RevealController, ScrollTracker,
    SmoothScroll, Subscriptions, TypingAnimation,
};
use crate::error::FolioResult;
use crate::host::{ElementId, EventKind, Host, TimerId};
use crate::ledger::TransformLedger;
use crate::styles::{self, BASE_STYLES};
use crate::timers::{TimerBook, TimerTask};

/// Events delivered by the platform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageEvent {
    /// Window scrolled
    Scrolled,
    /// Document and all assets finished loading
    Loaded,
    Clicked(ElementId),
    PointerEntered(ElementId),
    PointerMoved {
        target: ElementId,
        client_x: f64,
        client_y: f64,
    },
    PointerLeft(ElementId),
    /// Visibility of an observed element crossed the threshold
    Intersected {
        target: ElementId,
        is_intersecting: bool,
        ratio: f64,
    },
    TimerFired(TimerId),
    /// Page is being discarded; tears everything down
    Unloaded,
}

/// Which controllers came up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Features {
    pub scroll_tracking: bool,
    pub smooth_scroll: bool,
    pub typing: bool,
    pub mobile_menu: bool,
    pub hover: bool,
    pub particles: bool,
    pub reveal: bool,
}

pub struct Page<H: Host> {
    host: H,
    timers: TimerBook,
    transforms: TransformLedger,
    scroll: Option<ScrollTracker>,
    smooth: Option<SmoothScroll>,
    typing: Option<TypingAnimation>,
    menu: Option<MobileMenu>,
    hover: Option<HoverEffects>,
    particles: Option<ParticleEmitter>,
    reveal: Option<RevealController>,
    hero: HeroIntro,
    torn_down: bool,
}

/// Log and drop a controller that could not start.
fn optional<T>(feature: &str, result: FolioResult<T>) -> Option<T> {
    match result {
        Ok(controller) => Some(controller),
        Err(e) => {
            debug!(feature, error = %e, "feature skipped");
            None
        }
    }
}

impl<H: Host> Page<H> {
    /// Inject base styles, start every controller whose elements exist and
    /// register their event subscriptions.
    pub fn new(mut host: H, config: FolioConfig) -> Self {
        let mut timers = TimerBook::new();
        let mut transforms = TransformLedger::new();
        let mut subs = Subscriptions::new();

        styles::inject(&mut host, &BASE_STYLES);

        let selectors = &config.selectors;
        let mut ctx = Ctx::new(&mut host, &mut timers, &mut transforms);

        let scroll = optional(
            "scroll tracking",
            ScrollTracker::new(&mut ctx, selectors, &config.scroll, &mut subs),
        );
        let smooth = optional(
            "smooth scroll",
            SmoothScroll::new(&mut ctx, selectors, &config.scroll, &mut subs),
        );
        let typing = optional(
            "typing",
            TypingAnimation::new(&mut ctx, selectors, &config.typing),
        );
        let menu = optional("mobile menu", MobileMenu::new(&mut ctx, selectors, &mut subs));
        let hover = optional(
            "hover",
            HoverEffects::new(&mut ctx, selectors, &config.hover, &mut subs),
        );
        let particles = optional(
            "particles",
            ParticleEmitter::new(&mut ctx, selectors, &config.particles),
        );
        let reveal = optional(
            "reveal",
            RevealController::new(&mut ctx, selectors, &config.reveal),
        );
        let hero = HeroIntro::new(&mut ctx, selectors, &config.hero);

        subs.window(EventKind::Load);
        subs.window(EventKind::PageHide);
        let nav_links = ctx.host.query_all(&selectors.nav_link).len();
        let external_links = ctx.host.query_all(&selectors.external_links).len();
        let cards = ctx.host.query_all(&selectors.project_card).len();
        subs.install(&mut host);

        let page = Self {
            host,
            timers,
            transforms,
            scroll,
            smooth,
            typing,
            menu,
            hover,
            particles,
            reveal,
            hero,
            torn_down: false,
        };
        info!(
            nav_links,
            external_links,
            cards,
            features = ?page.features(),
            "page behaviors initialized"
        );
        page
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn features(&self) -> Features {
        Features {
            scroll_tracking: self.scroll.is_some(),
            smooth_scroll: self.smooth.is_some(),
            typing: self.typing.is_some(),
            mobile_menu: self.menu.is_some(),
            hover: self.hover.is_some(),
            particles: self.particles.is_some(),
            reveal: self.reveal.is_some(),
        }
    }

    pub fn transforms(&self) -> &TransformLedger {
        &self.transforms
    }

    pub fn timers(&self) -> &TimerBook {
        &self.timers
    }

    pub fn typing(&self) -> Option<&TypingAnimation> {
        self.typing.as_ref()
    }

    pub fn menu(&self) -> Option<&MobileMenu> {
        self.menu.as_ref()
    }

    pub fn particles(&self) -> Option<&ParticleEmitter> {
        self.particles.as_ref()
    }

    pub fn reveal(&self) -> Option<&RevealController> {
        self.reveal.as_ref()
    }

    pub fn smooth_scroll(&self) -> Option<&SmoothScroll> {
        self.smooth.as_ref()
    }

    pub fn hero(&self) -> &HeroIntro {
        &self.hero
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Route one event to the controllers interested in it.
    pub fn dispatch(&mut self, event: PageEvent) {
        if self.torn_down {
            return;
        }
        trace!(?event, "dispatch");
        if event == PageEvent::Unloaded {
            self.teardown();
            return;
        }

        let Self {
            host,
            timers,
            transforms,
            scroll,
            smooth,
            typing,
            menu,
            hover,
            particles,
            reveal,
            hero,
            ..
        } = self;
        let mut ctx = Ctx::new(host, timers, transforms);

        match event {
            PageEvent::Scrolled => {
                if let Some(scroll) = scroll {
                    scroll.update(&mut ctx);
                }
            }
            PageEvent::Loaded => hero.on_loaded(&mut ctx),
            PageEvent::Clicked(el) => {
                if let Some(smooth) = smooth {
                    smooth.on_click(&mut ctx, el);
                }
                if let Some(menu) = menu {
                    menu.on_click(&mut ctx, el);
                }
            }
            PageEvent::PointerEntered(el) => {
                if let Some(hover) = hover {
                    hover.on_enter(&mut ctx, el);
                }
            }
            PageEvent::PointerMoved {
                target,
                client_x,
                client_y,
            } => {
                if let Some(hover) = hover {
                    hover.on_move(&mut ctx, target, client_x, client_y);
                }
            }
            PageEvent::PointerLeft(el) => {
                if let Some(hover) = hover {
                    hover.on_leave(&mut ctx, el);
                }
            }
            PageEvent::Intersected {
                target,
                is_intersecting,
                ..
            } => {
                if let Some(reveal) = reveal {
                    reveal.on_intersection(&mut ctx, target, is_intersecting);
                }
            }
            PageEvent::TimerFired(id) => {
                let Some(task) = ctx.timers.fire(ctx.host, id) else {
                    trace!(%id, "stale timer");
                    return;
                };
                match task {
                    TimerTask::TypingStep => {
                        if let Some(typing) = typing {
                            typing.on_step(&mut ctx);
                        }
                    }
                    TimerTask::ScrollFrame => {
                        if let Some(smooth) = smooth {
                            smooth.on_frame(&mut ctx);
                        }
                    }
                    TimerTask::SpawnParticle => {
                        if let Some(particles) = particles {
                            particles.spawn(&mut ctx);
                        }
                    }
                    TimerTask::ExpireParticle(el) => {
                        if let Some(particles) = particles {
                            particles.expire(&mut ctx, el);
                        }
                    }
                    TimerTask::LiftTag { card, tag } => {
                        if let Some(hover) = hover {
                            hover.on_lift_tag(&mut ctx, card, tag);
                        }
                    }
                    TimerTask::RevealChild(el) => {
                        if let Some(reveal) = reveal {
                            reveal.on_child(&mut ctx, el);
                        }
                    }
                    TimerTask::HeroStart => hero.on_start(&mut ctx),
                    TimerTask::HeroItem(el) => hero.on_item(&mut ctx, el),
                }
            }
            PageEvent::Unloaded => {}
        }
    }

    /// Cancel every pending timer and remove live particles. Further events
    /// are ignored.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        let mut ctx = Ctx::new(&mut self.host, &mut self.timers, &mut self.transforms);

        if let Some(typing) = self.typing.as_mut() {
            typing.teardown(&mut ctx);
        }
        if let Some(smooth) = self.smooth.as_mut() {
            smooth.teardown(&mut ctx);
        }
        if let Some(particles) = self.particles.as_mut() {
            particles.teardown(&mut ctx);
        }
        let remaining = ctx.timers.cancel_all(ctx.host);
        self.torn_down = true;
        debug!(remaining, "page torn down");
    }
}
