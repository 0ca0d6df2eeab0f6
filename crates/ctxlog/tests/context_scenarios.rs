//! End-to-end scenarios for context-scoped logging
//!
//! These tests exercise the public surface the way application code uses it:
//! attach attributes and overrides while a request descends a call tree,
//! then emit records through a decorated sink and inspect what arrives at
//! the terminal sink.

use std::sync::Arc;
use std::thread;

use ctxlog::{
    Attr, Context, ContextSink, Level, MemorySink, Record, Sink, args, with_args, with_attrs,
    with_min_level,
};

// Test helpers
fn decorated(min_level: Level) -> (MemorySink, ContextSink) {
    let memory = MemorySink::new(min_level);
    let sink = ContextSink::new(Arc::new(memory.clone()));
    (memory, sink)
}

fn keys(record: &Record) -> Vec<&str> {
    record.attrs().iter().map(|a| a.key.as_str()).collect()
}

#[test]
fn test_request_scoped_attributes_reach_the_sink() {
    let (memory, sink) = decorated(Level::Info);

    // Attach at two points of a call tree, emit with a base attribute
    let cx = with_attrs(&Context::new(), vec![Attr::new("request_id", "abc")]);
    let cx = with_attrs(&cx, vec![Attr::new("user", "bob")]);

    let mut record = Record::new(Level::Info, "started");
    record.add_attrs(vec![Attr::new("op", "create")]);
    sink.handle(&cx, &record).unwrap();

    let emitted = memory.records();
    assert_eq!(emitted.len(), 1, "INFO is at the default threshold");
    assert_eq!(emitted[0].message(), "started");
    assert_eq!(
        emitted[0].attrs(),
        &[
            Attr::new("op", "create"),
            Attr::new("request_id", "abc"),
            Attr::new("user", "bob"),
        ]
    );
}

#[test]
fn test_threshold_override_per_call_chain() {
    let (memory, sink) = decorated(Level::Info);

    let plain = Context::new();
    let verbose = with_min_level(&plain, Level::Debug);

    sink.handle(&verbose, &Record::new(Level::Debug, "detail")).unwrap();
    sink.handle(&plain, &Record::new(Level::Debug, "detail")).unwrap();

    let emitted = memory.records();
    assert_eq!(emitted.len(), 1, "only the overridden chain emits DEBUG");
    assert_eq!(emitted[0].level(), Level::Debug);
}

#[test]
fn test_reusing_a_context_does_not_duplicate_attributes() {
    let (memory, sink) = decorated(Level::Info);

    let cx = with_attrs(&Context::new(), vec![Attr::new("request_id", "abc")]);

    sink.handle(&cx, &Record::new(Level::Info, "first")).unwrap();
    sink.handle(&cx, &Record::new(Level::Info, "second")).unwrap();

    for record in memory.records() {
        assert_eq!(keys(&record), vec!["request_id"]);
    }
}

#[test]
fn test_forked_branches_stay_independent() {
    let (memory, sink) = decorated(Level::Info);

    let base = with_attrs(&Context::new(), vec![Attr::new("request_id", "abc")]);
    let left = with_attrs(&base, vec![Attr::new("branch", "left")]);
    let right = with_attrs(&base, vec![Attr::new("branch", "right")]);

    sink.handle(&left, &Record::new(Level::Info, "left")).unwrap();
    sink.handle(&right, &Record::new(Level::Info, "right")).unwrap();

    let emitted = memory.records();
    assert_eq!(
        emitted[0].attrs(),
        &[Attr::new("request_id", "abc"), Attr::new("branch", "left")]
    );
    assert_eq!(
        emitted[1].attrs(),
        &[Attr::new("request_id", "abc"), Attr::new("branch", "right")]
    );
}

#[test]
fn test_static_attrs_and_groups_compose_with_context() {
    let memory = MemorySink::new(Level::Info);
    let sink = ContextSink::new(Arc::new(memory.clone()))
        .with_attrs(vec![Attr::new("service", "api")])
        .with_group("request");

    let cx = with_args(&Context::new(), args!["user", "bob"]);
    sink.handle(&cx, &Record::new(Level::Info, "started")).unwrap();

    let emitted = memory.records();
    // Static attrs first, then the grouped context attrs
    assert_eq!(keys(&emitted[0]), vec!["service", "request.user"]);
}

#[test]
fn test_raw_args_survive_until_emission() {
    let (memory, sink) = decorated(Level::Info);

    // Malformed raw tokens are kept as-is and repaired at merge time
    let cx = with_args(&Context::new(), args!["user", "bob", "dangling"]);
    sink.handle(&cx, &Record::new(Level::Info, "started")).unwrap();

    let emitted = memory.records();
    assert_eq!(keys(&emitted[0]), vec!["user", ctxlog::BAD_KEY]);
}

#[test]
fn test_concurrent_forks_share_one_decorator() {
    let (memory, sink) = decorated(Level::Info);
    let sink = Arc::new(sink);
    let base = with_attrs(&Context::new(), vec![Attr::new("request_id", "abc")]);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let sink = Arc::clone(&sink);
            let base = base.clone();
            thread::spawn(move || {
                let cx = with_attrs(&base, vec![Attr::new("worker", i as i64)]);
                sink.handle(&cx, &Record::new(Level::Info, "tick")).unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let emitted = memory.records();
    assert_eq!(emitted.len(), 8);
    for record in &emitted {
        assert_eq!(keys(record), vec!["request_id", "worker"]);
    }
}
