//! Background particle emitter.
//!
//! Particles are a bounded-lifetime pool: every tick spawns one element with
//! random parameters, and each particle schedules its own removal for when
//! its float animation ends. Removal tolerates elements that were already
//! detached by someone else.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use super::Ctx;
use crate::config::{ParticleConfig, Selectors};
use crate::error::{FolioError, FolioResult};
use crate::host::{ElementId, Host, TimerId};
use crate::styles::{self, PARTICLE_KEYFRAMES};
use crate::timers::TimerTask;

pub const PARTICLE_CLASS: &str = "particle";

const FALLBACK_COLOR: &str = "#3b82f6";

/// Randomized look of one particle.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleParams {
    pub size_px: f64,
    pub left_pct: f64,
    pub duration_s: f64,
    pub delay_s: f64,
    pub color: String,
}

impl ParticleParams {
    pub fn random<R: Rng + ?Sized>(rng: &mut R, config: &ParticleConfig) -> Self {
        let color = if config.palette.is_empty() {
            FALLBACK_COLOR.to_string()
        } else {
            config.palette[rng.random_range(0..config.palette.len())].clone()
        };

        Self {
            size_px: config.size_px.sample(rng),
            left_pct: config.left_pct.sample(rng),
            duration_s: config.duration_s.sample(rng),
            delay_s: config.delay_s.sample(rng),
            color,
        }
    }

    /// Milliseconds until the particle's animation has run once, truncated so
    /// removal never lands after the animation ends.
    pub fn lifetime_ms(&self) -> u32 {
        let ms = ((self.duration_s + self.delay_s) * 1000.0).floor();
        if ms.is_finite() && ms > 0.0 {
            ms.min(f64::from(u32::MAX)) as u32
        } else {
            0
        }
    }

    /// Inline style declarations for the particle element.
    pub fn inline_styles(&self) -> Vec<(&'static str, String)> {
        vec![
            ("position", "absolute".into()),
            ("width", format!("{}px", self.size_px)),
            ("height", format!("{}px", self.size_px)),
            ("left", format!("{}%", self.left_pct)),
            ("bottom", "-10px".into()),
            ("border-radius", "50%".into()),
            (
                "animation",
                format!(
                    "floatUp {}s linear {}s infinite",
                    self.duration_s, self.delay_s
                ),
            ),
            ("opacity", "0.6".into()),
            ("pointer-events", "none".into()),
            (
                "background",
                format!("radial-gradient(circle, {}, transparent)", self.color),
            ),
            ("box-shadow", format!("0 0 10px {}", self.color)),
        ]
    }
}

/// A live particle.
#[derive(Debug, Clone)]
pub struct Particle {
    pub element: ElementId,
    pub params: ParticleParams,
    pub created_at: f64,
}

impl Particle {
    /// Time by which the particle is gone.
    pub fn expires_at(&self) -> f64 {
        self.created_at + f64::from(self.params.lifetime_ms())
    }
}

#[derive(Debug)]
pub struct ParticleEmitter {
    container: ElementId,
    rng: StdRng,
    live: HashMap<ElementId, Particle>,
    interval: Option<TimerId>,
    config: ParticleConfig,
}

impl ParticleEmitter {
    pub fn new<H: Host>(
        ctx: &mut Ctx<'_, H>,
        selectors: &Selectors,
        config: &ParticleConfig,
    ) -> FolioResult<Self> {
        let container = ctx
            .host
            .query(&selectors.particle_container)
            .ok_or_else(|| FolioError::missing(&selectors.particle_container))?;

        styles::inject(ctx.host, &PARTICLE_KEYFRAMES);

        let seed = config.seed.unwrap_or_else(|| ctx.host.entropy());
        let interval = ctx
            .timers
            .every(ctx.host, config.interval_ms, TimerTask::SpawnParticle);
        debug!(interval_ms = config.interval_ms, max_live = ?config.max_live, "particle emitter started");

        Ok(Self {
            container,
            rng: StdRng::seed_from_u64(seed),
            live: HashMap::new(),
            interval: Some(interval),
            config: config.clone(),
        })
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn live(&self) -> impl Iterator<Item = &Particle> {
        self.live.values()
    }

    /// Spawn one particle. Returns `None` while the live cap is reached.
    pub fn spawn<H: Host>(&mut self, ctx: &mut Ctx<'_, H>) -> Option<ElementId> {
        if let Some(max) = self.config.max_live {
            if self.live.len() >= max {
                trace!(live = self.live.len(), "particle cap reached, skipping spawn");
                return None;
            }
        }

        let params = ParticleParams::random(&mut self.rng, &self.config);
        let element = ctx.host.create_child(self.container, "div", PARTICLE_CLASS);
        for (property, value) in params.inline_styles() {
            ctx.host.set_style(element, property, &value);
        }

        ctx.timers.after(
            ctx.host,
            params.lifetime_ms(),
            TimerTask::ExpireParticle(element),
        );
        trace!(%element, lifetime_ms = params.lifetime_ms(), "particle spawned");

        self.live.insert(
            element,
            Particle {
                element,
                params,
                created_at: ctx.host.now_ms(),
            },
        );
        Some(element)
    }

    /// Remove a particle. Safe to call for particles already gone.
    pub fn expire<H: Host>(&mut self, ctx: &mut Ctx<'_, H>, element: ElementId) -> bool {
        self.live.remove(&element);
        let removed = ctx.host.remove_element(element);
        trace!(%element, removed, "particle expired");
        removed
    }

    /// Stop spawning and remove every live particle.
    pub fn teardown<H: Host>(&mut self, ctx: &mut Ctx<'_, H>) {
        if let Some(id) = self.interval.take() {
            ctx.timers.cancel(ctx.host, id);
        }
        ctx.timers
            .cancel_where(ctx.host, |task| matches!(task, TimerTask::ExpireParticle(_)));

        let elements: Vec<ElementId> = self.live.keys().copied().collect();
        for element in elements {
            self.expire(ctx, element);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Span;

    #[test]
    fn test_random_params_within_ranges() {
        let config = ParticleConfig::default();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let params = ParticleParams::random(&mut rng, &config);
            assert!(config.size_px.contains(params.size_px));
            assert!(config.left_pct.contains(params.left_pct));
            assert!(config.duration_s.contains(params.duration_s));
            assert!(config.delay_s.contains(params.delay_s));
            assert!(config.palette.contains(&params.color));
        }
    }

    #[test]
    fn test_lifetime_truncates() {
        let params = ParticleParams {
            size_px: 3.0,
            left_pct: 50.0,
            duration_s: 20.0001,
            delay_s: 1.5,
            color: "#fff".into(),
        };
        assert_eq!(params.lifetime_ms(), 21500);
    }

    #[test]
    fn test_empty_palette_falls_back() {
        let config = ParticleConfig {
            palette: Vec::new(),
            size_px: Span::new(2.0, 2.0),
            ..ParticleConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        let params = ParticleParams::random(&mut rng, &config);
        assert_eq!(params.color, FALLBACK_COLOR);
        assert_eq!(params.size_px, 2.0);
    }

    #[test]
    fn test_inline_styles_use_params() {
        let params = ParticleParams {
            size_px: 4.0,
            left_pct: 12.5,
            duration_s: 25.0,
            delay_s: 2.0,
            color: "#8b5cf6".into(),
        };
        let styles: HashMap<_, _> = params.inline_styles().into_iter().collect();
        assert_eq!(styles["width"], "4px");
        assert_eq!(styles["left"], "12.5%");
        assert_eq!(styles["animation"], "floatUp 25s linear 2s infinite");
        assert_eq!(styles["box-shadow"], "0 0 10px #8b5cf6");
    }
}
