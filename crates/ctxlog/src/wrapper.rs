//! The context-aware emitting decorator and the severity override
//!
//! [`ContextSink`] wraps any [`Sink`] and, on each emission, consults the
//! calling context twice: first for a severity override that gates the
//! record before any merge work happens, then for the attribute chain that
//! gets merged into a clone of the record on its way down. The decorator
//! holds no mutable state, so one instance can serve any number of threads.

use std::sync::Arc;

use crate::attr::Attr;
use crate::context::{Context, ContextKey};
use crate::record::{Level, Record};
use crate::scope;
use crate::sink::{Sink, SinkError};

/// Private context key for the severity override
struct MinLevelKey;

impl ContextKey for MinLevelKey {
    type Value = Level;
}

/// Derive a context whose records must reach `level` to be emitted
///
/// The override supersedes the wrapped sink's own enabled-check for every
/// record emitted through the derived context; it does not disturb any
/// attribute chain on the same context.
pub fn with_min_level(cx: &Context, level: Level) -> Context {
    cx.with_value::<MinLevelKey>(level)
}

/// The severity override on `cx`, if one was ever set
///
/// `None` means "defer to the sink"; it is distinct from an override that
/// happens to equal the sink's default threshold.
pub fn min_level(cx: &Context) -> Option<Level> {
    cx.value::<MinLevelKey>().copied()
}

/// Decorator that injects context attributes and applies severity overrides
///
/// ```
/// use std::sync::Arc;
/// use ctxlog::{Attr, Context, ContextSink, Level, MemorySink, Record, Sink, with_attrs};
///
/// let memory = MemorySink::new(Level::Info);
/// let sink = ContextSink::new(Arc::new(memory.clone()));
///
/// let cx = with_attrs(&Context::new(), vec![Attr::new("request_id", "abc")]);
/// sink.handle(&cx, &Record::new(Level::Info, "started")).unwrap();
///
/// assert_eq!(memory.records()[0].attrs(), &[Attr::new("request_id", "abc")]);
/// ```
pub struct ContextSink {
    inner: Arc<dyn Sink>,
}

impl ContextSink {
    /// Wrap `inner`, which may itself be another decorator
    pub fn new(inner: Arc<dyn Sink>) -> Self {
        Self { inner }
    }
}

impl Sink for ContextSink {
    fn enabled(&self, cx: &Context, level: Level) -> bool {
        match min_level(cx) {
            Some(min) => level >= min,
            None => self.inner.enabled(cx, level),
        }
    }

    fn handle(&self, cx: &Context, record: &Record) -> Result<(), SinkError> {
        if !self.enabled(cx, record.level()) {
            return Ok(());
        }
        match scope::resolve(cx) {
            Some(chain) => {
                // The caller may hold on to its record; mutate a clone only.
                let mut merged = record.clone();
                chain.append_to(&mut merged);
                self.inner.handle(cx, &merged)
            }
            None => self.inner.handle(cx, record),
        }
    }

    fn with_attrs(&self, attrs: Vec<Attr>) -> Arc<dyn Sink> {
        Arc::new(ContextSink {
            inner: self.inner.with_attrs(attrs),
        })
    }

    fn with_group(&self, name: &str) -> Arc<dyn Sink> {
        Arc::new(ContextSink {
            inner: self.inner.with_group(name),
        })
    }
}
