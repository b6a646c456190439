//! Page startup and the event loop.
//!
//! Startup waits for the document to be parsed, builds the [`Page`] on a
//! [`WebHost`] and hands it to a local task that drains the event channel.
//! The page lives as long as that task, which is the lifetime of the
//! document.

use futures::channel::mpsc::{self, UnboundedReceiver};
use futures::StreamExt;
use gloo::events::EventListener;
use tracing::{debug, info, warn};
use web_sys::Document;

use folio_core::{FolioConfig, FolioError, FolioResult, Page, PageEvent};

use crate::dom::WebHost;

/// Id of the optional `<script type="application/json">` holding overrides.
pub const CONFIG_ELEMENT_ID: &str = "folio-config";

/// Start the page once the document is parsed.
pub fn boot() -> FolioResult<()> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| FolioError::Host("no document".into()))?;

    if document.ready_state() == "loading" {
        debug!("waiting for DOMContentLoaded");
        EventListener::once(&document, "DOMContentLoaded", |_| {
            if let Err(e) = start() {
                warn!(error = %e, "page behaviors not started");
            }
        })
        .forget();
        Ok(())
    } else {
        start()
    }
}

fn start() -> FolioResult<()> {
    let (events, receiver) = mpsc::unbounded();
    let host = WebHost::new(events.clone())?;
    let config = read_config(host.document());
    let already_loaded = host.document().ready_state() == "complete";

    let page = Page::new(host, config);

    // The window load listener only fires if loading is still in progress
    if already_loaded {
        let _ = events.unbounded_send(PageEvent::Loaded);
    }

    wasm_bindgen_futures::spawn_local(run(page, receiver));
    Ok(())
}

/// Dispatch events in arrival order until the page is discarded.
async fn run(mut page: Page<WebHost>, mut events: UnboundedReceiver<PageEvent>) {
    while let Some(event) = events.next().await {
        page.dispatch(event);
        if page.is_torn_down() {
            break;
        }
    }
    info!("page event loop finished");
}

/// Read configuration overrides from the page, falling back to defaults.
fn read_config(document: &Document) -> FolioConfig {
    let Some(json) = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|element| element.text_content())
    else {
        return FolioConfig::default();
    };

    match FolioConfig::from_json(&json) {
        Ok(config) => {
            debug!("using page configuration");
            config
        }
        Err(e) => {
            warn!(error = %e, "invalid page configuration, using defaults");
            FolioConfig::default()
        }
    }
}
