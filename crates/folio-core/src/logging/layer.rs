//! `tracing_subscriber` layer that forwards events to a [`LogSink`].

use std::fmt::Write as FmtWrite;

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

use super::record::LogRecord;
use super::sink::LogSink;

pub struct ConsoleLayer<S> {
    sink: S,
}

impl<S: LogSink> ConsoleLayer<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

impl<S, Sub> Layer<Sub> for ConsoleLayer<S>
where
    S: LogSink,
    Sub: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, Sub>) {
        let metadata = event.metadata();

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let mut record = LogRecord::new(
            metadata.level().as_str().to_lowercase(),
            metadata.target(),
            visitor.message.unwrap_or_default(),
        );
        record.fields = visitor.fields;

        if let Some(scope) = ctx.event_scope(event) {
            let spans: Vec<&str> = scope.from_root().map(|span| span.name()).collect();
            if !spans.is_empty() {
                record = record.with_span(spans.join(" > "));
            }
        }

        self.sink.write(record);
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    fields: serde_json::Map<String, serde_json::Value>,
}

impl FieldVisitor {
    fn insert(&mut self, field: &Field, value: serde_json::Value) {
        self.fields.insert(field.name().to_string(), value);
    }
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let mut buf = String::new();
        let _ = write!(&mut buf, "{:?}", value);

        if field.name() == "message" {
            self.message = Some(buf);
        } else {
            self.insert(field, serde_json::Value::String(buf));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.insert(field, serde_json::Value::String(value.to_string()));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, value.into());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, value.into());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, value.into());
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        // NaN and infinities have no JSON number form
        match serde_json::Number::from_f64(value) {
            Some(n) => self.insert(field, serde_json::Value::Number(n)),
            None => self.insert(field, serde_json::Value::String(value.to_string())),
        }
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.insert(field, serde_json::Value::String(value.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::MemorySink;
    use tracing_subscriber::prelude::*;

    #[test]
    fn test_layer_captures_events() {
        let sink = MemorySink::new();
        let subscriber = tracing_subscriber::registry().with(ConsoleLayer::new(sink.clone()));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("Test message");
            tracing::warn!(count = 42, ratio = 0.5, section = "nav", "Warning with fields");
        });

        let records = sink.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].level, "info");
        assert_eq!(records[0].message, "Test message");
        assert!(records[0].fields.is_empty());

        assert_eq!(records[1].level, "warn");
        assert_eq!(records[1].fields["count"], 42);
        assert_eq!(records[1].fields["ratio"], 0.5);
        assert_eq!(records[1].fields["section"], "nav");
    }

    #[test]
    fn test_layer_records_span_path() {
        let sink = MemorySink::new();
        let subscriber = tracing_subscriber::registry().with(ConsoleLayer::new(sink.clone()));

        tracing::subscriber::with_default(subscriber, || {
            let outer = tracing::info_span!("boot");
            let _outer = outer.enter();
            let inner = tracing::info_span!("controllers");
            let _inner = inner.enter();
            tracing::debug!("inside");
        });

        let records = sink.records();
        assert_eq!(records[0].span.as_deref(), Some("boot > controllers"));
    }

    #[test]
    fn test_display_and_debug_fields() {
        let sink = MemorySink::new();
        let subscriber = tracing_subscriber::registry().with(ConsoleLayer::new(sink.clone()));

        tracing::subscriber::with_default(subscriber, || {
            let selector = ".nav__toggle";
            tracing::debug!(%selector, state = ?Some(3), "shown");
        });

        let record = &sink.records()[0];
        assert_eq!(record.fields["selector"], ".nav__toggle");
        assert_eq!(record.fields["state"], "Some(3)");
    }
}
