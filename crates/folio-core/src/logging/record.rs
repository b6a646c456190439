//! A single captured log event.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    /// trace, debug, info, warn or error
    pub level: String,

    /// Module path of the call site (e.g. "folio_core::page")
    pub target: String,

    pub message: String,

    /// Structured fields attached to the event
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub fields: Map<String, Value>,

    /// Enclosing spans, outermost first, joined with " > "
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<String>,
}

impl LogRecord {
    pub fn new(
        level: impl Into<String>,
        target: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            level: level.into(),
            target: target.into(),
            message: message.into(),
            fields: Map::new(),
            span: None,
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn with_span(mut self, span: impl Into<String>) -> Self {
        self.span = Some(span.into());
        self
    }

    /// One-line human readable form, as printed to the console.
    ///
    /// `[folio_core::page] page behaviors initialized cards=3 nav_links=5`
    pub fn render(&self) -> String {
        let mut line = format!("[{}] ", self.target);
        if let Some(span) = &self.span {
            line.push_str(span);
            line.push_str(": ");
        }
        line.push_str(&self.message);
        for (name, value) in &self.fields {
            line.push(' ');
            line.push_str(name);
            line.push('=');
            match value {
                Value::String(s) => line.push_str(s),
                other => line.push_str(&other.to_string()),
            }
        }
        line
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
