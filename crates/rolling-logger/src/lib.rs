//! Rolling Logger
//!
//! A `tracing` subscriber that keeps the most recent records in a circular
//! buffer and mirrors every record to the browser console (wasm32) or stderr.
//! The buffer lets the UI show what happened just before an error.

use std::collections::VecDeque;
use std::fmt::Write as _;
use std::sync::{Arc, Mutex, OnceLock};

use chrono::{DateTime, Utc};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

/// Records kept when the caller does not say otherwise
pub const DEFAULT_CAPACITY: usize = 500;

static BUFFER: OnceLock<Arc<LogBuffer>> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("logger already initialized")]
    AlreadyInitialized,
    #[error("failed to install subscriber: {0}")]
    Install(String),
}

/// One captured log line
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub level: Level,
    pub target: String,
    pub message: String,
}

impl LogRecord {
    pub fn format_line(&self, app_name: &str) -> String {
        format!(
            "[{}] {} {:>5} {}: {}",
            app_name,
            self.timestamp.format("%H:%M:%S%.3f"),
            self.level,
            self.target,
            self.message
        )
    }
}

/// Fixed-size record buffer; the oldest record is dropped when full
#[derive(Debug)]
pub struct LogBuffer {
    records: Mutex<VecDeque<LogRecord>>,
    capacity: usize,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn push(&self, record: LogRecord) {
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        if records.len() == self.capacity {
            records.pop_front();
        }
        records.push_back(record);
    }

    /// Oldest first
    pub fn snapshot(&self) -> Vec<LogRecord> {
        let records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        records.iter().cloned().collect()
    }

    pub fn clear(&self) {
        self.records.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

/// Collects the `message` field plus `key=value` pairs for everything else
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

fn record_from_event(event: &Event<'_>) -> LogRecord {
    let mut visitor = MessageVisitor::default();
    event.record(&mut visitor);
    let metadata = event.metadata();
    LogRecord {
        timestamp: Utc::now(),
        level: *metadata.level(),
        target: metadata.target().to_string(),
        message: format!("{}{}", visitor.message, visitor.fields),
    }
}

/// Layer that copies every event into a `LogBuffer`
pub struct RingBufferLayer {
    buffer: Arc<LogBuffer>,
}

impl RingBufferLayer {
    pub fn new(buffer: Arc<LogBuffer>) -> Self {
        Self { buffer }
    }
}

impl<S: Subscriber> Layer<S> for RingBufferLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        self.buffer.push(record_from_event(event));
    }
}

/// Layer that prints to the devtools console at the matching level
#[cfg(target_arch = "wasm32")]
struct ConsoleLayer {
    app_name: String,
}

#[cfg(target_arch = "wasm32")]
impl<S: Subscriber> Layer<S> for ConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        use web_sys::console;

        let record = record_from_event(event);
        let line = wasm_bindgen::JsValue::from_str(&record.format_line(&self.app_name));
        match record.level {
            Level::ERROR => console::error_1(&line),
            Level::WARN => console::warn_1(&line),
            Level::INFO => console::info_1(&line),
            _ => console::debug_1(&line),
        }
    }
}

fn default_level() -> LevelFilter {
    if cfg!(debug_assertions) {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    }
}

/// Install the global subscriber. Call once at start-up.
pub fn init_logger(app_name: &str, capacity: usize) -> Result<(), LoggerError> {
    let buffer = Arc::new(LogBuffer::new(capacity));
    BUFFER
        .set(buffer.clone())
        .map_err(|_| LoggerError::AlreadyInitialized)?;

    let registry = tracing_subscriber::registry()
        .with(default_level())
        .with(RingBufferLayer::new(buffer));

    #[cfg(target_arch = "wasm32")]
    let registry = registry.with(ConsoleLayer {
        app_name: app_name.to_string(),
    });

    #[cfg(not(target_arch = "wasm32"))]
    let registry = registry.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    registry.try_init().map_err(|e| LoggerError::Install(e.to_string()))?;
    tracing::info!(app = app_name, capacity, "logger initialized");
    Ok(())
}

/// Buffered records, oldest first. Empty before `init_logger`.
pub fn recent() -> Vec<LogRecord> {
    BUFFER.get().map(|b| b.snapshot()).unwrap_or_default()
}
