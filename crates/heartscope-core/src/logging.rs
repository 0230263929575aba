#![forbid(unsafe_code)]

//! Tracing layer that formats events as single lines for a console sink.
//!
//! The core never writes to stdout. Hosts provide a [`ConsoleSink`] (the
//! browser developer console in `heartscope-web`) and install the layer with
//! [`install`].
//!
//! Line format: `LEVEL target: message k=v k=v`.

use std::fmt::{self, Write as _};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::Context;
use tracing_subscriber::prelude::*;

/// Destination for formatted log lines.
pub trait ConsoleSink: Send + Sync + 'static {
    fn write_line(&self, level: Level, line: &str);
}

// ============================================================================
// Configuration
// ============================================================================

/// What each line carries besides the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Show the log level. Default: true.
    pub show_level: bool,
    /// Show the tracing target (module path). Default: true.
    pub show_target: bool,
    /// Show structured fields beyond `message`. Default: true.
    pub show_fields: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            show_level: true,
            show_target: true,
            show_fields: true,
        }
    }
}

/// Fixed-width level name.
fn level_str(level: Level) -> &'static str {
    match level {
        Level::ERROR => "ERROR",
        Level::WARN => "WARN ",
        Level::INFO => "INFO ",
        Level::DEBUG => "DEBUG",
        Level::TRACE => "TRACE",
    }
}

// ============================================================================
// Event Visitor
// ============================================================================

#[derive(Default)]
struct EventVisitor {
    message: Option<String>,
    fields: Vec<(String, String)>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let rendered = format!("{value:?}");
        if field.name() == "message" {
            self.message = Some(rendered);
        } else {
            self.fields.push((field.name().to_string(), rendered));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.fields
                .push((field.name().to_string(), value.to_string()));
        }
    }
}

// ============================================================================
// ConsoleLayer
// ============================================================================

/// A `tracing_subscriber::Layer` writing one line per event to a sink.
pub struct ConsoleLayer<K: ConsoleSink> {
    sink: K,
    config: ConsoleConfig,
}

impl<K: ConsoleSink> ConsoleLayer<K> {
    pub fn new(sink: K) -> Self {
        Self {
            sink,
            config: ConsoleConfig::default(),
        }
    }

    pub fn with_config(sink: K, config: ConsoleConfig) -> Self {
        Self { sink, config }
    }

    #[must_use]
    pub fn show_target(mut self, show: bool) -> Self {
        self.config.show_target = show;
        self
    }

    #[must_use]
    pub fn show_fields(mut self, show: bool) -> Self {
        self.config.show_fields = show;
        self
    }

    fn format_event(&self, event: &Event<'_>) -> String {
        let metadata = event.metadata();
        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let mut line = String::new();
        if self.config.show_level {
            line.push_str(level_str(*metadata.level()));
            line.push(' ');
        }
        if self.config.show_target {
            let _ = write!(line, "{}: ", metadata.target());
        }
        line.push_str(visitor.message.as_deref().unwrap_or_default());
        if self.config.show_fields {
            for (k, v) in &visitor.fields {
                let _ = write!(line, " {k}={v}");
            }
        }
        line
    }

    /// Consume the layer and return its sink (for test inspection).
    pub fn into_sink(self) -> K {
        self.sink
    }
}

impl<S, K> Layer<S> for ConsoleLayer<K>
where
    S: Subscriber,
    K: ConsoleSink,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let line = self.format_event(event);
        self.sink.write_line(*event.metadata().level(), &line);
    }
}

/// Install a global subscriber writing to `sink` at `level` and above.
///
/// Returns `false` if a global subscriber was already set.
pub fn install<K: ConsoleSink>(sink: K, level: LevelFilter) -> bool {
    tracing_subscriber::registry()
        .with(level)
        .with(ConsoleLayer::new(sink))
        .try_init()
        .is_ok()
}
