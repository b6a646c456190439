//! Edge case and boundary condition tests
//!
//! These tests verify that partial documents, odd links and bad
//! configuration degrade one feature at a time instead of failing the page.

use folio_core::host::Host;
use folio_core::logging::{ConsoleLayer, MemorySink};
use folio_core::{
    ElementId, EventKind, EventTarget, Features, FolioConfig, FolioError, MemoryHost, Page,
    PageEvent,
};
use tracing_subscriber::prelude::*;

// ============================================================================
// Missing Elements
// ============================================================================

/// An empty document starts with every feature skipped
#[test]
fn test_empty_document() {
    let page = Page::new(MemoryHost::new(), FolioConfig::default());
    assert_eq!(page.features(), Features::default());
    assert!(!page.hero().has_started());

    // Only the window lifecycle listeners are registered
    let listeners = page.host().listeners();
    assert_eq!(listeners.len(), 2);
    assert!(listeners.iter().all(|l| l.target == EventTarget::Window));
    assert!(listeners.iter().any(|l| l.kind == EventKind::Load));
    assert!(listeners.iter().any(|l| l.kind == EventKind::PageHide));
}

/// Events for an empty document are harmless
#[test]
fn test_events_without_controllers() {
    let mut page = Page::new(MemoryHost::new(), FolioConfig::default());
    page.dispatch(PageEvent::Scrolled);
    page.dispatch(PageEvent::Loaded);
    page.dispatch(PageEvent::Clicked(ElementId(0)));
    page.dispatch(PageEvent::PointerEntered(ElementId(0)));
    page.dispatch(PageEvent::TimerFired(folio_core::TimerId(99)));
    page.advance(5_000.0);
    assert_eq!(page.host().pending_timers(), 0);
}

/// A page with only the typing element still types
#[test]
fn test_typing_alone() {
    let mut host = MemoryHost::new();
    let typing = host.append(None, "span", "typing-text");

    let mut page = Page::new(host, FolioConfig::default());
    assert!(page.features().typing);
    assert!(!page.features().scroll_tracking);

    page.advance(1500.0);
    assert_eq!(page.host().text(typing), "M");
}

/// Menu needs both the toggle and the panel
#[test]
fn test_menu_without_panel() {
    let mut host = MemoryHost::new();
    let toggle = host.append(None, "button", "nav__toggle");

    let mut page = Page::new(host, FolioConfig::default());
    assert!(!page.features().mobile_menu);

    page.dispatch(PageEvent::Clicked(toggle));
    assert!(!page.host().has_class(toggle, "nav__toggle--active"));
}

/// The progress bar alone is enough for scroll tracking
#[test]
fn test_progress_without_sections() {
    let mut host = MemoryHost::new();
    let bar = host.append(None, "div", "nav__progress");
    host.set_viewport(500.0, 1500.0);

    let mut page = Page::new(host, FolioConfig::default());
    page.scroll_window(250.0);
    assert_eq!(page.host().style(bar, "transform"), Some("scaleX(0.25)"));
}

/// A page that cannot scroll reports no progress
#[test]
fn test_progress_short_page() {
    let mut host = MemoryHost::new();
    let bar = host.append(None, "div", "nav__progress");
    host.set_viewport(1000.0, 800.0);

    let mut page = Page::new(host, FolioConfig::default());
    page.scroll_window(0.0);
    assert_eq!(page.host().style(bar, "transform"), Some("scaleX(0)"));
}

/// Sections without a matching link clear every highlight
#[test]
fn test_highlight_gap_clears_links() {
    let mut host = MemoryHost::new();
    let link = host.append(None, "a", "nav__link");
    host.set_attr(link, "href", "#about");
    let about = host.append(None, "section", "");
    host.set_attr(about, "id", "about").set_geometry(about, 0.0, 500.0);
    let gap = host.append(None, "section", "");
    host.set_attr(gap, "id", "gap").set_geometry(gap, 500.0, 500.0);
    host.set_viewport(500.0, 2000.0);

    let mut page = Page::new(host, FolioConfig::default());
    assert!(page.host().has_class(link, "nav__link--active"));

    page.scroll_window(600.0);
    assert!(!page.host().has_class(link, "nav__link--active"));

    // Past every section
    page.scroll_window(1400.0);
    assert!(!page.host().has_class(link, "nav__link--active"));
}

// ============================================================================
// Links
// ============================================================================

/// Links to other hosts and bare fragments are not intercepted
#[test]
fn test_external_and_bare_links_pass_through() {
    let mut host = MemoryHost::new();
    let section = host.append(None, "a", "nav__link");
    host.set_attr(section, "href", "#work");
    let external = host.append(None, "a", "nav__link");
    host.set_attr(external, "href", "https://github.com/mayur");
    let bare = host.append(None, "a", "nav__link");
    host.set_attr(bare, "href", "#");

    let mut page = Page::new(host, FolioConfig::default());
    let smooth = page.smooth_scroll().expect("smooth scroll");
    assert!(smooth.is_trigger(section));
    assert!(!smooth.is_trigger(external));
    assert!(!smooth.is_trigger(bare));

    // Without a mobile menu nothing listens for the external link
    assert!(page
        .host()
        .listener(EventTarget::Element(external), EventKind::Click)
        .is_none());

    page.dispatch(PageEvent::Clicked(external));
    assert!(page.host().scroll_history().is_empty());
}

/// A link to a section that does not exist is ignored
#[test]
fn test_click_missing_section() {
    let mut host = MemoryHost::new();
    let link = host.append(None, "a", "nav__link");
    host.set_attr(link, "href", "#nowhere");

    let mut page = Page::new(host, FolioConfig::default());
    page.dispatch(PageEvent::Clicked(link));
    page.advance(1000.0);
    assert!(page.host().scroll_history().is_empty());
}

/// Without a nav bar the section top is offset by the gap alone
#[test]
fn test_scroll_target_without_nav() {
    let mut host = MemoryHost::new();
    let link = host.append(None, "a", "nav__link");
    host.set_attr(link, "href", "#about");
    let about = host.append(None, "section", "");
    host.set_attr(about, "id", "about").set_geometry(about, 900.0, 400.0);
    host.set_viewport(1000.0, 3000.0);

    let mut page = Page::new(host, FolioConfig::default());
    page.dispatch(PageEvent::Clicked(link));
    page.advance(1000.0);
    assert_eq!(page.host().scroll_y(), 880.0);
}

/// Zero duration scrolls in one jump
#[test]
fn test_zero_duration_scroll() {
    let mut host = MemoryHost::new();
    let link = host.append(None, "a", "nav__link");
    host.set_attr(link, "href", "#about");
    let about = host.append(None, "section", "");
    host.set_attr(about, "id", "about").set_geometry(about, 520.0, 400.0);
    host.set_viewport(1000.0, 3000.0);

    let mut config = FolioConfig::default();
    config.scroll.animation_ms = 0;
    let mut page = Page::new(host, config);
    page.dispatch(PageEvent::Clicked(link));
    assert_eq!(page.host().scroll_history(), &[500.0]);
}

// ============================================================================
// Particles
// ============================================================================

/// Particles stop spawning once the cap is reached and resume after expiry
#[test]
fn test_particle_cap() {
    let mut host = MemoryHost::new();
    let container = host.append(None, "div", "background-animation");

    let mut config = FolioConfig::default();
    config.particles.max_live = Some(2);
    config.particles.seed = Some(11);
    let mut page = Page::new(host, config);

    page.advance(10_000.0);
    assert_eq!(page.host().children(container).len(), 2);
    assert_eq!(page.particles().expect("particles").live_count(), 2);

    // Longest possible life is 40s; by then the first two are gone and
    // new ones have been spawned in their place
    page.advance(45_000.0);
    let live = page.particles().expect("particles").live_count();
    assert!(live <= 2);
    assert_eq!(page.host().children(container).len(), live);
    assert!(page
        .particles()
        .expect("particles")
        .live()
        .all(|p| p.created_at > 10_000.0));
}

/// A degenerate range always yields its minimum
#[test]
fn test_particle_fixed_ranges() {
    let mut host = MemoryHost::new();
    let container = host.append(None, "div", "background-animation");

    let json = r##"{
        "particles": {
            "interval_ms": 500,
            "size_px": { "min": 4.0, "max": 4.0 },
            "duration_s": { "min": 1.0, "max": 1.0 },
            "delay_s": { "min": 0.0, "max": 0.0 },
            "palette": ["#ffffff"],
            "seed": 3
        }
    }"##;
    let config = FolioConfig::from_json(json).expect("valid config");
    let mut page = Page::new(host, config);

    page.advance(500.0);
    let particle = page.host().children(container)[0];
    assert_eq!(page.host().style(particle, "width"), Some("4px"));
    assert_eq!(
        page.host().style(particle, "animation"),
        Some("floatUp 1s linear 0s infinite")
    );
    assert_eq!(page.host().style(particle, "box-shadow"), Some("0 0 10px #ffffff"));

    page.advance(1000.0);
    assert!(!page.host().is_attached(particle));
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_partial_config_keeps_defaults() {
    let config = FolioConfig::from_json(r#"{ "typing": { "text": "Hi" } }"#).expect("valid");
    assert_eq!(config.typing.text, "Hi");
    assert_eq!(config.typing.type_ms, 150);
    assert_eq!(config.selectors, FolioConfig::default().selectors);
}

#[test]
fn test_invalid_config_is_an_error() {
    let err = FolioConfig::from_json("{ not json").unwrap_err();
    assert!(matches!(err, FolioError::InvalidConfig(_)));
}

/// Custom selectors redirect a controller
#[test]
fn test_custom_typing_selector() {
    let mut host = MemoryHost::new();
    let custom = host.append(None, "span", "headline");

    let mut config = FolioConfig::default();
    config.selectors.typing_text = ".headline".into();
    config.typing.text = "Yo".into();
    config.typing.start_delay_ms = 0;
    let mut page = Page::new(host, config);

    page.advance(150.0);
    assert_eq!(page.host().text(custom), "Yo");
}

/// Selectors the host cannot evaluate disable the feature
#[test]
fn test_unsupported_selector_skips_feature() {
    let mut host = MemoryHost::new();
    host.append(None, "span", "typing-text");

    let mut config = FolioConfig::default();
    config.selectors.typing_text = "div > .typing-text".into();
    let page = Page::new(host, config);
    assert!(!page.features().typing);
}

// ============================================================================
// Logging
// ============================================================================

/// Skipped features are logged at debug level; boot is summarized at info
#[test]
fn test_boot_logging() {
    let sink = MemorySink::new();
    let subscriber = tracing_subscriber::registry().with(ConsoleLayer::new(sink.clone()));

    tracing::subscriber::with_default(subscriber, || {
        let mut host = MemoryHost::new();
        host.append(None, "a", "nav__link");
        let _page = Page::new(host, FolioConfig::default());
    });

    let skipped = sink.find("feature skipped");
    assert!(skipped.iter().all(|r| r.level == "debug"));
    assert!(skipped
        .iter()
        .any(|r| r.fields["feature"] == "mobile menu"));

    let boot = sink.find("page behaviors initialized");
    assert_eq!(boot.len(), 1);
    assert_eq!(boot[0].level, "info");
    assert_eq!(boot[0].target, "folio_core::page");
    assert_eq!(boot[0].fields["nav_links"], 1);
    assert_eq!(boot[0].fields["cards"], 0);
}
