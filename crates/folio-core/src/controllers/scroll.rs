//! Scroll tracker: active-section highlight, nav bar look and progress bar.
//!
//! All three outputs are pure functions of the scroll offset and the current
//! geometry, recomputed on every scroll event and once at startup.

use tracing::{debug, trace};

use super::{Ctx, Subscriptions};
use crate::config::{ScrollConfig, Selectors};
use crate::error::{FolioError, FolioResult};
use crate::host::{ElementId, EventKind, Host};

/// Class marking the link of the section in view.
pub const ACTIVE_LINK_CLASS: &str = "nav__link--active";

/// Vertical extent of a section in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionSpan {
    pub top: f64,
    pub height: f64,
}

impl SectionSpan {
    pub fn contains(&self, y: f64) -> bool {
        y >= self.top && y < self.top + self.height
    }
}

/// Index of the section containing `scroll_y + probe_offset`.
///
/// When spans overlap the last one in document order wins.
pub fn active_section(spans: &[SectionSpan], scroll_y: f64, probe_offset: f64) -> Option<usize> {
    let probe = scroll_y + probe_offset;
    spans.iter().rposition(|span| span.contains(probe))
}

/// Fraction of the scrollable range already scrolled, in `[0, 1]`.
///
/// A page that cannot scroll reports 0.
pub fn progress_ratio(scroll_y: f64, document_height: f64, viewport_height: f64) -> f64 {
    let scrollable = document_height - viewport_height;
    if scrollable <= 0.0 || !scrollable.is_finite() {
        return 0.0;
    }
    let ratio = scroll_y / scrollable;
    if ratio.is_nan() {
        return 0.0;
    }
    ratio.clamp(0.0, 1.0)
}

/// Nav bar look for a given offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAppearance {
    Top,
    Scrolled,
}

impl NavAppearance {
    pub fn for_offset(scroll_y: f64, threshold: f64) -> Self {
        if scroll_y > threshold {
            NavAppearance::Scrolled
        } else {
            NavAppearance::Top
        }
    }

    pub fn background(&self) -> &'static str {
        match self {
            NavAppearance::Top => "rgba(15, 23, 42, 0.8)",
            NavAppearance::Scrolled => "rgba(15, 23, 42, 0.95)",
        }
    }

    pub fn box_shadow(&self) -> &'static str {
        match self {
            NavAppearance::Top => "none",
            NavAppearance::Scrolled => "0 10px 30px rgba(0, 0, 0, 0.3)",
        }
    }
}

#[derive(Debug)]
struct TrackedSection {
    element: ElementId,
    link: Option<ElementId>,
}

#[derive(Debug)]
pub struct ScrollTracker {
    nav: Option<ElementId>,
    progress: Option<ElementId>,
    sections: Vec<TrackedSection>,
    links: Vec<ElementId>,
    config: ScrollConfig,
}

impl ScrollTracker {
    pub fn new<H: Host>(
        ctx: &mut Ctx<'_, H>,
        selectors: &Selectors,
        config: &ScrollConfig,
        subs: &mut Subscriptions,
    ) -> FolioResult<Self> {
        let host = &mut *ctx.host;
        let nav = host.query(&selectors.nav);
        let progress = host.query(&selectors.progress);
        let links = host.query_all(&selectors.nav_link);

        let sections: Vec<TrackedSection> = host
            .query_all(&selectors.sections)
            .into_iter()
            .filter_map(|element| {
                let href = format!("#{}", host.attribute(element, "id")?);
                let link = links
                    .iter()
                    .copied()
                    .find(|l| host.attribute(*l, "href").as_deref() == Some(href.as_str()));
                Some(TrackedSection { element, link })
            })
            .collect();

        if nav.is_none() && progress.is_none() && sections.is_empty() {
            return Err(FolioError::missing(&selectors.nav));
        }

        debug!(
            sections = sections.len(),
            links = links.len(),
            has_progress = progress.is_some(),
            "scroll tracker ready"
        );
        subs.window(EventKind::Scroll);

        let tracker = Self {
            nav,
            progress,
            sections,
            links,
            config: config.clone(),
        };
        tracker.update(ctx);
        Ok(tracker)
    }

    /// Recompute highlight, nav look and progress from the current offset.
    pub fn update<H: Host>(&self, ctx: &mut Ctx<'_, H>) {
        let host = &mut *ctx.host;
        let scroll_y = host.scroll_y();

        if let Some(nav) = self.nav {
            let look = NavAppearance::for_offset(scroll_y, self.config.scrolled_threshold_px);
            host.set_style(nav, "background", look.background());
            host.set_style(nav, "box-shadow", look.box_shadow());
        }

        self.highlight(host, scroll_y);

        if let Some(bar) = self.progress {
            let ratio = progress_ratio(scroll_y, host.document_height(), host.viewport_height());
            host.set_style(bar, "transform", &format!("scaleX({ratio})"));
        }
    }

    fn highlight<H: Host>(&self, host: &mut H, scroll_y: f64) {
        let spans: Vec<SectionSpan> = self
            .sections
            .iter()
            .map(|s| SectionSpan {
                top: host.offset_top(s.element),
                height: host.offset_height(s.element),
            })
            .collect();

        let active_link = active_section(&spans, scroll_y, self.config.probe_offset_px)
            .and_then(|index| self.sections[index].link);
        trace!(scroll_y, ?active_link, "nav highlight");

        for link in &self.links {
            if Some(*link) == active_link {
                host.add_class(*link, ACTIVE_LINK_CLASS);
            } else {
                host.remove_class(*link, ACTIVE_LINK_CLASS);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans() -> Vec<SectionSpan> {
        vec![
            SectionSpan { top: 0.0, height: 800.0 },
            SectionSpan { top: 800.0, height: 400.0 },
            SectionSpan { top: 1200.0, height: 900.0 },
        ]
    }

    #[test]
    fn test_probe_offset_shifts_active_section() {
        assert_eq!(active_section(&spans(), 0.0, 100.0), Some(0));
        assert_eq!(active_section(&spans(), 699.0, 100.0), Some(0));
        assert_eq!(active_section(&spans(), 700.0, 100.0), Some(1));
        assert_eq!(active_section(&spans(), 1100.0, 100.0), Some(2));
    }

    #[test]
    fn test_no_section_matches_past_the_end() {
        assert_eq!(active_section(&spans(), 2000.0, 100.0), None);
        assert_eq!(active_section(&[], 0.0, 100.0), None);
    }

    #[test]
    fn test_overlap_prefers_last() {
        let overlapping = vec![
            SectionSpan { top: 0.0, height: 1000.0 },
            SectionSpan { top: 500.0, height: 1000.0 },
        ];
        assert_eq!(active_section(&overlapping, 500.0, 100.0), Some(1));
    }

    #[test]
    fn test_progress_ratio_midpoint() {
        assert_eq!(progress_ratio(1000.0, 3000.0, 1000.0), 0.5);
    }

    #[test]
    fn test_progress_ratio_unscrollable_page() {
        assert_eq!(progress_ratio(0.0, 1000.0, 1000.0), 0.0);
        assert_eq!(progress_ratio(50.0, 800.0, 1000.0), 0.0);
    }

    #[test]
    fn test_progress_ratio_clamps() {
        assert_eq!(progress_ratio(-20.0, 3000.0, 1000.0), 0.0);
        assert_eq!(progress_ratio(2500.0, 3000.0, 1000.0), 1.0);
    }

    #[test]
    fn test_nav_appearance_threshold() {
        assert_eq!(NavAppearance::for_offset(100.0, 100.0), NavAppearance::Top);
        assert_eq!(NavAppearance::for_offset(100.5, 100.0), NavAppearance::Scrolled);
        assert_eq!(NavAppearance::Top.box_shadow(), "none");
    }
}
