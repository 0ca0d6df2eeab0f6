//! Opaque, forkable carrier of request-scoped values
//!
//! [`Context`] is a persistent typed-key store threaded explicitly through a
//! call tree. Deriving a context never mutates the original, so two branches
//! of a call tree can fork the same context and attach values independently
//! while sharing the frozen common ancestry. Cloning is an `Arc` bump and
//! reads take no locks, so contexts can be shared freely across threads.
//!
//! Values are addressed by zero-sized key types implementing [`ContextKey`].
//! A key type private to a module cannot collide with anyone else's, which is
//! how this crate keeps its own attribute-chain and level entries invisible
//! to callers.

use std::any::{Any, TypeId};
use std::sync::Arc;

/// Typed key for a [`Context`] entry
///
/// Implementors are usually zero-sized marker structs:
///
/// ```
/// use ctxlog::{Context, ContextKey};
///
/// struct RequestId;
/// impl ContextKey for RequestId {
///     type Value = String;
/// }
///
/// let cx = Context::new().with_value::<RequestId>("abc-123".to_string());
/// assert_eq!(cx.value::<RequestId>().map(String::as_str), Some("abc-123"));
/// ```
pub trait ContextKey: 'static {
    /// The value type stored under this key
    type Value: Any + Send + Sync;
}

/// One key/value entry plus a link to the entries it was derived from
#[derive(Debug)]
struct Entry {
    key: TypeId,
    value: Arc<dyn Any + Send + Sync>,
    parent: Option<Arc<Entry>>,
}

/// Immutable carrier of request-scoped values
///
/// See the [module docs](self) for the overall model. An empty context is
/// cheap (`None` head, no allocation) and every derivation adds exactly one
/// entry in front of the shared tail.
#[derive(Debug, Clone, Default)]
pub struct Context {
    head: Option<Arc<Entry>>,
}

impl Context {
    /// Create an empty root context
    pub fn new() -> Self {
        Self { head: None }
    }

    /// Derive a new context carrying `value` under key `K`
    ///
    /// The receiver is untouched; existing clones of it keep observing their
    /// old view. A later entry for the same key shadows earlier ones without
    /// removing them.
    pub fn with_value<K: ContextKey>(&self, value: K::Value) -> Self {
        Self {
            head: Some(Arc::new(Entry {
                key: TypeId::of::<K>(),
                value: Arc::new(value),
                parent: self.head.clone(),
            })),
        }
    }

    /// Look up the most recently attached value for key `K`
    pub fn value<K: ContextKey>(&self) -> Option<&K::Value> {
        let mut current = self.head.as_deref();
        while let Some(entry) = current {
            if entry.key == TypeId::of::<K>() {
                return entry.value.downcast_ref::<K::Value>();
            }
            current = entry.parent.as_deref();
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct UserKey;
    impl ContextKey for UserKey {
        type Value = String;
    }

    struct CountKey;
    impl ContextKey for CountKey {
        type Value = u64;
    }

    #[test]
    fn test_empty_context_has_no_values() {
        let cx = Context::new();
        assert!(cx.value::<UserKey>().is_none());
        assert!(cx.value::<CountKey>().is_none());
    }

    #[test]
    fn test_with_value_and_lookup() {
        let cx = Context::new().with_value::<UserKey>("alice".to_string());
        assert_eq!(cx.value::<UserKey>().map(String::as_str), Some("alice"));
        // Other keys stay unset
        assert!(cx.value::<CountKey>().is_none());
    }

    #[test]
    fn test_later_value_shadows_earlier() {
        let base = Context::new().with_value::<UserKey>("alice".to_string());
        let derived = base.with_value::<UserKey>("bob".to_string());

        assert_eq!(derived.value::<UserKey>().map(String::as_str), Some("bob"));
        // The base context still sees its own value
        assert_eq!(base.value::<UserKey>().map(String::as_str), Some("alice"));
    }

    #[test]
    fn test_forked_contexts_are_independent() {
        let base = Context::new().with_value::<CountKey>(1);
        let left = base.with_value::<UserKey>("left".to_string());
        let right = base.with_value::<UserKey>("right".to_string());

        assert_eq!(left.value::<UserKey>().map(String::as_str), Some("left"));
        assert_eq!(right.value::<UserKey>().map(String::as_str), Some("right"));
        // Both still share the common ancestor's entry
        assert_eq!(left.value::<CountKey>(), Some(&1));
        assert_eq!(right.value::<CountKey>(), Some(&1));
    }

    #[test]
    fn test_clone_shares_entries() {
        let cx = Context::new().with_value::<UserKey>("alice".to_string());
        let cloned = cx.clone();
        assert_eq!(cloned.value::<UserKey>().map(String::as_str), Some("alice"));
    }
}
