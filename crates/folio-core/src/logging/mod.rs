//! Structured logging for the page runtime.
//!
//! Every `tracing` event is turned into a [`LogRecord`] and handed to a
//! [`LogSink`]. The browser binding plugs in a sink that writes to the
//! developer console; tests use [`MemorySink`] to assert on what was logged.
//!
//! ## Usage
//!
//! ```ignore
//! use folio_core::logging::{ConsoleLayer, MemorySink};
//! use tracing_subscriber::prelude::*;
//!
//! let sink = MemorySink::new();
//! let subscriber = tracing_subscriber::registry().with(ConsoleLayer::new(sink.clone()));
//!
//! tracing::subscriber::with_default(subscriber, || {
//!     tracing::info!(cards = 3, "page behaviors initialized");
//! });
//!
//! assert_eq!(sink.records()[0].fields["cards"], 3);
//! ```

pub mod layer;
pub mod record;
pub mod sink;

pub use layer::ConsoleLayer;
pub use record::LogRecord;
pub use sink::{LogSink, MemorySink};
