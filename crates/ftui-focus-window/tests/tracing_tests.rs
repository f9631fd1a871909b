#![forbid(unsafe_code)]

//! Tracing instrumentation tests for the focus window.
//!
//! Spans enabled:
//!   cargo test -p ftui-focus-window --features tracing --test tracing_tests
//!
//! Zero-overhead verification (no feature):
//!   cargo test -p ftui-focus-window --test tracing_tests -- zero_overhead

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use ftui_focus_window::{FocusWindow, FocusWindowConfig};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

// ============================================================================
// Test Infrastructure
// ============================================================================

/// A captured span or event with its fields.
#[derive(Debug, Clone)]
#[allow(dead_code)]
struct Captured {
    name: String,
    fields: HashMap<String, String>,
}

/// A tracing Layer that records span creation and events.
struct Capture {
    spans: Arc<Mutex<Vec<Captured>>>,
    events: Arc<Mutex<Vec<Captured>>>,
}

struct CaptureHandle {
    spans: Arc<Mutex<Vec<Captured>>>,
    events: Arc<Mutex<Vec<Captured>>>,
}

impl CaptureHandle {
    fn span_names(&self) -> Vec<String> {
        self.spans
            .lock()
            .unwrap()
            .iter()
            .map(|s| s.name.clone())
            .collect()
    }

    #[allow(dead_code)]
    fn events(&self) -> Vec<Captured> {
        self.events.lock().unwrap().clone()
    }
}

/// Visitor that extracts fields as strings.
struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for Capture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        attrs.record(&mut visitor);
        self.spans.lock().unwrap().push(Captured {
            name: attrs.metadata().name().to_string(),
            fields: visitor.0.into_iter().collect(),
        });
    }

    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        let fields: HashMap<String, String> = visitor.0.into_iter().collect();
        let name = fields.get("message").cloned().unwrap_or_default();
        self.events.lock().unwrap().push(Captured { name, fields });
    }
}

fn with_captured<F>(f: F) -> CaptureHandle
where
    F: FnOnce(),
{
    let spans = Arc::new(Mutex::new(Vec::new()));
    let events = Arc::new(Mutex::new(Vec::new()));
    let layer = Capture {
        spans: Arc::clone(&spans),
        events: Arc::clone(&events),
    };
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    CaptureHandle { spans, events }
}

fn window() -> FocusWindow<i32> {
    let config = FocusWindowConfig::new()
        .with_reserved_size(10)
        .with_max_length(4)
        .with_initial_focus_index(5)
        .with_sorter(|a: &i32, b: &i32| a.cmp(b))
        .with_key_extractor(|item: &i32| item.to_string());
    FocusWindow::new(config).unwrap()
}

// ============================================================================
// Tests
// ============================================================================

#[test]
#[cfg(feature = "tracing")]
fn spans_created_for_each_mutation() {
    let handle = with_captured(|| {
        let mut window = window();
        window.append([6, 7, 8]);
        window.prepend([5]);
        window.append_with_focus([9], 6).unwrap();
    });

    let names = handle.span_names();
    assert_eq!(
        names.iter().filter(|n| *n == "focus_window.append").count(),
        2,
        "spans: {names:?}"
    );
    assert_eq!(
        names.iter().filter(|n| *n == "focus_window.prepend").count(),
        1,
        "spans: {names:?}"
    );
}

#[test]
#[cfg(feature = "tracing")]
fn recenter_is_logged() {
    let handle = with_captured(|| {
        let mut window = window();
        window.prepend([3, 4, 5]);
        window.prepend([1, 2]);
        window.prepend_with_focus([0], 1).unwrap();
    });

    let recenters: Vec<_> = handle
        .events()
        .into_iter()
        .filter(|e| e.name == "reposition: recenter")
        .collect();
    assert_eq!(recenters.len(), 1);
    assert_eq!(recenters[0].fields.get("center").map(String::as_str), Some("5"));
}

#[test]
#[cfg(feature = "tracing")]
fn rejected_focus_is_warned() {
    let handle = with_captured(|| {
        let mut window = window();
        window.append([6]);
        assert!(window.set_focused_index(0).is_err());
    });

    assert!(
        handle
            .events()
            .iter()
            .any(|e| e.name == "focus target rejected"
                && e.fields.get("index").map(String::as_str) == Some("0"))
    );
}

/// When compiled WITHOUT `--features tracing`, the instrumentation is
/// removed entirely and nothing reaches the subscriber.
#[test]
#[cfg(not(feature = "tracing"))]
fn zero_overhead_when_disabled() {
    let handle = with_captured(|| {
        let mut window = window();
        window.append([6, 7, 8]);
        window.append([9, 10]);
    });

    assert!(handle.span_names().is_empty());
    assert!(handle.events().is_empty());
}
