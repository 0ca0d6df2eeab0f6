//! The per-context attribute chain
//!
//! Each call to [`with_attrs`] or [`with_args`] freezes one [`AttrScope`]
//! link whose parent is whatever chain the context already carried. Attaching
//! is a single allocation no matter how deep the chain is; the O(depth) walk
//! happens once per emitted record, and only for records that survive the
//! severity check. Links are never mutated, so a context can fork into
//! independent branches that share the frozen common ancestry.
//!
//! The raw form ([`with_args`]) stores its tokens verbatim and defers the
//! pairing work to merge time, so contexts whose records are filtered out
//! never pay for the conversion.

use std::fmt;
use std::sync::Arc;

use crate::attr::{Attr, RawArg};
use crate::context::{Context, ContextKey};
use crate::record::{Level, Record};

/// Private context key for the chain head
struct ScopeKey;

impl ContextKey for ScopeKey {
    type Value = Arc<AttrScope>;
}

/// One frozen link of attached attributes
#[derive(Debug)]
pub(crate) struct AttrScope {
    parent: Option<Arc<AttrScope>>,
    payload: Payload,
}

/// Exactly one form is populated per link
#[derive(Debug)]
enum Payload {
    /// Pre-typed pairs, appended without further interpretation
    Attrs(Vec<Attr>),
    /// Raw tokens, paired into attributes only at merge time
    Args(Vec<RawArg>),
}

impl AttrScope {
    /// Append every attribute in the chain to `record`
    ///
    /// Oldest ancestor first: the parent's attributes land before this
    /// link's own payload, so attributes attached later in the call tree
    /// follow (and on key collision downstream, win over) earlier ones.
    pub(crate) fn append_to(&self, record: &mut Record) {
        if let Some(parent) = &self.parent {
            parent.append_to(record);
        }
        match &self.payload {
            Payload::Attrs(attrs) => record.add_attrs(attrs.iter().cloned()),
            Payload::Args(args) => record.add_args(args.iter().cloned()),
        }
    }
}

impl fmt::Display for AttrScope {
    /// Render the merged chain as space-separated `key=value` pairs
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut record = Record::new(Level::Info, "");
        self.append_to(&mut record);
        for (i, attr) in record.attrs().iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", attr)?;
        }
        Ok(())
    }
}

/// Derive a context carrying `attrs` in addition to anything already attached
///
/// An empty `attrs` is a no-op: the returned context carries the same chain
/// (if any) as the input and no link is allocated.
///
/// ```
/// use ctxlog::{Attr, Context, with_attrs};
///
/// let cx = Context::new();
/// let cx = with_attrs(&cx, vec![Attr::new("request_id", "abc")]);
/// let cx = with_attrs(&cx, vec![Attr::new("user", "bob")]);
/// ```
pub fn with_attrs(cx: &Context, attrs: impl IntoIterator<Item = Attr>) -> Context {
    let attrs: Vec<Attr> = attrs.into_iter().collect();
    if attrs.is_empty() {
        return cx.clone();
    }
    let scope = Arc::new(AttrScope {
        parent: resolve(cx),
        payload: Payload::Attrs(attrs),
    });
    cx.with_value::<ScopeKey>(scope)
}

/// Like [`with_attrs`], but stores raw `key, value, ...` tokens verbatim
///
/// The tokens are paired into attributes only when a record is actually
/// emitted through the derived context, with the same lenient rules as
/// [`Record::add_args`].
///
/// ```
/// use ctxlog::{args, Context, with_args};
///
/// let cx = with_args(&Context::new(), args!["user", "bob", "attempt", 3]);
/// ```
pub fn with_args(cx: &Context, raw_args: Vec<RawArg>) -> Context {
    if raw_args.is_empty() {
        return cx.clone();
    }
    let scope = Arc::new(AttrScope {
        parent: resolve(cx),
        payload: Payload::Args(raw_args),
    });
    cx.with_value::<ScopeKey>(scope)
}

/// The chain head attached to `cx`, if any attach ever happened on this path
pub(crate) fn resolve(cx: &Context) -> Option<Arc<AttrScope>> {
    cx.value::<ScopeKey>().cloned()
}
