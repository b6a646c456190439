//! Folio Core Library
//!
//! Visual-state controllers for a single-page portfolio, independent of any
//! browser binding.
//!
//! ## Overview
//!
//! A static portfolio page gets its interactive behavior from a handful of
//! small controllers: scroll-position tracking, eased anchor scrolling, a
//! looping typewriter, a mobile menu, hover tilt on project cards, a
//! background particle emitter, one-shot reveal-on-scroll and a hero intro.
//! They talk to the document only through the [`Host`] trait, so the same
//! logic runs in the browser and against the in-memory [`MemoryHost`] in
//! tests.
//!
//! ## Core Principles
//!
//! - **Single-threaded**: the [`Page`] owns every controller and handles one
//!   event at a time
//! - **Best effort**: a missing element disables one feature, never the page
//! - **Hover wins**: while the pointer is over a card, its transform belongs
//!   to the hover controller
//!
//! ## Quick Start
//!
//! ```ignore
//! use folio_core::{FolioConfig, MemoryHost, Page, PageEvent};
//!
//! let mut host = MemoryHost::new();
//! let nav = host.append(None, "nav", "nav");
//! let progress = host.append(Some(nav), "div", "nav__progress");
//! host.set_viewport(1000.0, 3000.0);
//!
//! let mut page = Page::new(host, FolioConfig::default());
//! page.scroll_window(1000.0);
//! assert_eq!(page.host().style(progress, "transform"), Some("scaleX(0.5)"));
//! ```

pub mod config;
pub mod controllers;
pub mod error;
pub mod host;
pub mod ledger;
pub mod logging;
pub mod memory;
pub mod page;
pub mod styles;
pub mod timers;

// Re-exports
pub use config::FolioConfig;
pub use error::{FolioError, FolioResult};
pub use host::{ElementId, EventKind, EventTarget, Host, IntersectionOptions, Rect, TimerId};
pub use ledger::{TransformLedger, TransformOwner};
pub use memory::MemoryHost;
pub use page::{Features, Page, PageEvent};
pub use timers::{TimerBook, TimerTask};
