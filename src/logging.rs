//! Developer console logging.

use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use wasm_bindgen::JsValue;
use web_sys::console;

use folio_core::logging::{ConsoleLayer, LogRecord, LogSink};

/// Writes records to the browser console at the matching severity.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserConsole;

impl LogSink for BrowserConsole {
    fn write(&self, record: LogRecord) {
        let line = JsValue::from_str(&record.render());
        match record.level.as_str() {
            "error" => console::error_1(&line),
            "warn" => console::warn_1(&line),
            "info" => console::info_1(&line),
            "debug" => console::debug_1(&line),
            _ => console::log_1(&line),
        }
    }
}

/// Install the console subscriber. Debug builds log at debug level,
/// release builds at info.
pub fn init() {
    let level = if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = tracing_subscriber::registry()
        .with(LevelFilter::from_level(level))
        .with(ConsoleLayer::new(BrowserConsole));

    // A second boot on the same page keeps the first subscriber
    let _ = tracing::subscriber::set_global_default(subscriber);
}
