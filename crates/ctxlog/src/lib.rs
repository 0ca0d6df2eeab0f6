//! Context-scoped attributes and severity overrides for structured logging
//!
//! This crate lets application code attach key/value attributes and a
//! minimum-severity override to an opaque [`Context`] value, so that every
//! record later emitted through that context automatically carries the
//! accumulated attributes — without threading a logger through every
//! function in the call tree.
//!
//! # Features
//!
//! - **Persistent attribute chains**: each attach is one O(1) allocation;
//!   the O(depth) merge runs once per emitted record, after the severity
//!   check.
//! - **Fork safety without locks**: contexts, chain links, and decorators
//!   are frozen after construction, so concurrent branches of a call tree
//!   can derive from the same context freely.
//! - **Per-context severity overrides**: a context can carry a minimum
//!   level that supersedes the sink's own threshold for that call chain.
//! - **Deferred raw arguments**: the loose `key, value, ...` convention is
//!   stored verbatim and only paired into attributes for records that
//!   actually get emitted.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use ctxlog::{args, Attr, Context, ContextSink, Level, MemorySink, Record, Sink};
//! use ctxlog::{with_attrs, with_args, with_min_level};
//!
//! let memory = MemorySink::new(Level::Info);
//! let sink = ContextSink::new(Arc::new(memory.clone()));
//!
//! // Attach attributes as the request descends through the call tree
//! let cx = with_attrs(&Context::new(), vec![Attr::new("request_id", "abc")]);
//! let cx = with_args(&cx, args!["user", "bob"]);
//!
//! // Emission merges everything attached so far
//! let mut record = Record::new(Level::Info, "started");
//! record.add_attrs(vec![Attr::new("op", "create")]);
//! sink.handle(&cx, &record).unwrap();
//!
//! let emitted = memory.records();
//! assert_eq!(
//!     emitted[0].attrs(),
//!     &[
//!         Attr::new("op", "create"),
//!         Attr::new("request_id", "abc"),
//!         Attr::new("user", "bob"),
//!     ]
//! );
//!
//! // A severity override gates emission for one call chain only
//! let verbose = with_min_level(&cx, Level::Debug);
//! sink.handle(&verbose, &Record::new(Level::Debug, "details")).unwrap();
//! sink.handle(&cx, &Record::new(Level::Debug, "dropped")).unwrap();
//! assert_eq!(memory.records().len(), 2);
//! ```

pub mod attr;
pub mod context;
pub mod record;
pub mod scope;
pub mod sink;
pub mod wrapper;

pub use attr::{Attr, BAD_KEY, RawArg, Value};
pub use context::{Context, ContextKey};
pub use record::{Level, ParseLevelError, Record};
pub use scope::{with_args, with_attrs};
pub use sink::{MemorySink, Sink, SinkError};
pub use wrapper::{ContextSink, min_level, with_min_level};
