//! Page behavior configuration.
//!
//! Every field has a default matching the portfolio page markup, so an empty
//! JSON object (or no config at all) yields a working setup. Pages can
//! override any subset:
//!
//! ```json
//! { "typing": { "text": "Ada Lovelace" }, "particles": { "max_live": 24 } }
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::FolioResult;
use crate::host::IntersectionOptions;

/// Root configuration, grouped per controller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FolioConfig {
    pub selectors: Selectors,
    pub scroll: ScrollConfig,
    pub typing: TypingConfig,
    pub hover: HoverConfig,
    pub particles: ParticleConfig,
    pub reveal: RevealConfig,
    pub hero: HeroConfig,
}

impl FolioConfig {
    /// Parse a (possibly partial) JSON configuration.
    pub fn from_json(json: &str) -> FolioResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// CSS selectors for every element the controllers attach to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub nav: String,
    pub nav_link: String,
    pub progress: String,
    pub sections: String,
    pub explore_button: String,
    pub external_links: String,
    pub typing_text: String,
    pub menu_toggle: String,
    pub menu_panel: String,
    /// Icon bars, queried inside the menu toggle
    pub menu_bars: String,
    pub project_card: String,
    /// Tags, queried inside each project card
    pub tech_tag: String,
    pub project_link: String,
    pub particle_container: String,
    pub reveal_targets: String,
    /// Descendants cascaded when a reveal target appears
    pub reveal_children: String,
    pub hero_content: String,
    pub hero_items: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            nav: ".nav".into(),
            nav_link: ".nav__link".into(),
            progress: ".nav__progress".into(),
            sections: "section[id]".into(),
            explore_button: ".hero__btn[href=\"#projects\"]".into(),
            external_links: "a[href*=\"github.com\"]".into(),
            typing_text: ".typing-text".into(),
            menu_toggle: ".nav__toggle".into(),
            menu_panel: ".nav__menu".into(),
            menu_bars: "span".into(),
            project_card: ".project-card".into(),
            tech_tag: ".tech-tag".into(),
            project_link: ".project-card__link".into(),
            particle_container: ".background-animation".into(),
            reveal_targets: ".section-header, .project-card, .coming-soon-card".into(),
            reveal_children: ".project-card, .tech-tag".into(),
            hero_content: ".hero__content".into(),
            hero_items: ".hero__avatar, .hero__name, .hero__location, .hero__tagline, \
                         .hero__description, .hero__cta"
                .into(),
        }
    }
}

/// Scroll tracking and smooth scrolling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Added to the scroll offset before testing section spans
    pub probe_offset_px: f64,
    /// Offset past which the nav bar switches to its scrolled look
    pub scrolled_threshold_px: f64,
    /// Extra space left between the nav bar and a scrolled-to section
    pub target_gap_px: f64,
    pub animation_ms: u32,
    pub frame_ms: u32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            probe_offset_px: 100.0,
            scrolled_threshold_px: 100.0,
            target_gap_px: 20.0,
            animation_ms: 600,
            frame_ms: 16,
        }
    }
}

/// Typing effect text and cadence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypingConfig {
    pub text: String,
    pub start_delay_ms: u32,
    pub type_ms: u32,
    pub delete_ms: u32,
    /// Pause with the full text shown
    pub hold_full_ms: u32,
    /// Pause with nothing shown
    pub hold_empty_ms: u32,
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            text: "Mayur Nayak".into(),
            start_delay_ms: 1500,
            type_ms: 150,
            delete_ms: 100,
            hold_full_ms: 2000,
            hold_empty_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoverConfig {
    /// Pointer offset (px) per degree of tilt
    pub tilt_divisor: f64,
    pub perspective_px: f64,
    pub tag_stagger_ms: u32,
}

impl Default for HoverConfig {
    fn default() -> Self {
        Self {
            tilt_divisor: 20.0,
            perspective_px: 1000.0,
            tag_stagger_ms: 50,
        }
    }
}

/// Half-open numeric range `[min, max)` sampled uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f64,
    pub max: f64,
}

impl Span {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Sample a value. A degenerate span always yields `min`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.max > self.min {
            rng.random_range(self.min..self.max)
        } else {
            self.min
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        if self.max > self.min {
            value >= self.min && value < self.max
        } else {
            value == self.min
        }
    }
}

/// Background particle emitter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    pub interval_ms: u32,
    pub size_px: Span,
    pub left_pct: Span,
    pub duration_s: Span,
    pub delay_s: Span,
    pub palette: Vec<String>,
    /// Skip spawning while this many particles are alive
    pub max_live: Option<usize>,
    /// Fixed RNG seed; host entropy is used when absent
    pub seed: Option<u64>,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            interval_ms: 2000,
            size_px: Span::new(2.0, 6.0),
            left_pct: Span::new(0.0, 100.0),
            duration_s: Span::new(20.0, 35.0),
            delay_s: Span::new(0.0, 5.0),
            palette: ["#3b82f6", "#8b5cf6", "#06d6a0", "#f59e0b"]
                .into_iter()
                .map(String::from)
                .collect(),
            max_live: None,
            seed: None,
        }
    }
}

/// Viewport-triggered reveal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    pub threshold: f64,
    pub root_margin: String,
    /// Initial downward offset of hidden elements
    pub offset_px: f64,
    pub transition_ms: u32,
    pub stagger_ms: u32,
}

impl RevealConfig {
    pub fn intersection_options(&self) -> IntersectionOptions {
        IntersectionOptions {
            threshold: self.threshold,
            root_margin: self.root_margin.clone(),
        }
    }
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            root_margin: "0px 0px -50px 0px".into(),
            offset_px: 30.0,
            transition_ms: 600,
            stagger_ms: 100,
        }
    }
}

/// Hero intro sequence played on full page load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroConfig {
    pub start_delay_ms: u32,
    pub stagger_ms: u32,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            start_delay_ms: 300,
            stagger_ms: 200,
        }
    }
}
