//! The sink capability trait and an in-memory implementation
//!
//! A [`Sink`] is whatever ultimately consumes a finished record: a
//! formatter/writer backend, or another decorator in front of one. This
//! crate only defines the capability set and ships [`MemorySink`], a small
//! terminal sink that collects records into a shared buffer. Real backends
//! (text, JSON lines, syslog, ...) live outside this crate and implement the
//! same trait.

use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;

use crate::attr::{Attr, Value};
use crate::context::Context;
use crate::record::{Level, Record};

/// Error returned by a sink's handling entry point
///
/// The decorators in this crate never construct, interpret, or wrap these;
/// whatever the terminal sink returns travels back to the caller unmodified.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Sink rejected record: {0}")]
    Rejected(String),
}

/// Consumer of finished log records
///
/// The augmentation constructors return a new sink rather than mutating the
/// receiver, so sinks hold no mutable state of their own and can be shared
/// across threads without locks.
pub trait Sink: Send + Sync {
    /// Whether a record at `level` would be processed at all
    fn enabled(&self, cx: &Context, level: Level) -> bool;

    /// Consume one finished record
    fn handle(&self, cx: &Context, record: &Record) -> Result<(), SinkError>;

    /// A new sink that adds `attrs` to every record before the record's own
    fn with_attrs(&self, attrs: Vec<Attr>) -> Arc<dyn Sink>;

    /// A new sink that namespaces all subsequently added attributes under
    /// `name`
    fn with_group(&self, name: &str) -> Arc<dyn Sink>;
}

/// Terminal sink that collects finished records in memory
///
/// Intended for tests and examples. Clones share the same buffer, so keep a
/// clone around to inspect what was emitted after wrapping the sink:
///
/// ```
/// use std::sync::Arc;
/// use ctxlog::{Level, MemorySink, Record, Sink, Context};
///
/// let sink = MemorySink::new(Level::Info);
/// let shared: Arc<dyn Sink> = Arc::new(sink.clone());
///
/// shared.handle(&Context::new(), &Record::new(Level::Info, "started")).unwrap();
/// assert_eq!(sink.records().len(), 1);
/// ```
///
/// Group semantics follow the common key=value convention: open groups
/// qualify attribute keys with a dotted prefix, nested [`Value::Group`]
/// values are flattened recursively, and empty groups are elided.
#[derive(Debug, Clone)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<Record>>>,
    min_level: Level,
    base: Vec<Attr>,
    groups: Vec<String>,
}

impl MemorySink {
    /// Create a sink whose enabled-check reports `false` below `min_level`
    pub fn new(min_level: Level) -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
            min_level,
            base: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// Snapshot of every record handled so far
    pub fn records(&self) -> Vec<Record> {
        self.records.lock().clone()
    }
}

impl Sink for MemorySink {
    fn enabled(&self, _cx: &Context, level: Level) -> bool {
        level >= self.min_level
    }

    /// Store the record unconditionally
    ///
    /// Level filtering belongs to the caller via [`Sink::enabled`]; a
    /// decorator with an active severity override must be able to push
    /// records past this sink's own threshold.
    fn handle(&self, _cx: &Context, record: &Record) -> Result<(), SinkError> {
        let mut finished = self.base.clone();
        finished.extend(qualify(&self.groups, record.attrs()));

        let mut stored = record.clone();
        stored.replace_attrs(finished);
        self.records.lock().push(stored);
        Ok(())
    }

    fn with_attrs(&self, attrs: Vec<Attr>) -> Arc<dyn Sink> {
        let mut sink = self.clone();
        sink.base.extend(qualify(&self.groups, &attrs));
        Arc::new(sink)
    }

    fn with_group(&self, name: &str) -> Arc<dyn Sink> {
        let mut sink = self.clone();
        sink.groups.push(name.to_string());
        Arc::new(sink)
    }
}

/// Flatten `attrs` under the open `groups`, dotting keys and eliding empty
/// groups
fn qualify(groups: &[String], attrs: &[Attr]) -> Vec<Attr> {
    let mut out = Vec::new();
    for attr in attrs {
        match &attr.value {
            Value::Group(children) => {
                if children.is_empty() {
                    continue;
                }
                let mut nested = groups.to_vec();
                nested.push(attr.key.clone());
                out.extend(qualify(&nested, children));
            }
            value => {
                let key = if groups.is_empty() {
                    attr.key.clone()
                } else {
                    format!("{}.{}", groups.join("."), attr.key)
                };
                out.push(Attr {
                    key,
                    value: value.clone(),
                });
            }
        }
    }
    out
}
