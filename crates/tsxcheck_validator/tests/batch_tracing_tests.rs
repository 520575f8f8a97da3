//! Tracing of parallel batches.
//!
//! Installs a global subscriber, so this binary holds a single test.

use std::sync::{Arc, Mutex};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;
use tsxcheck_validator::{MemoryProvider, ScanOptions, Validator};

/// Records, for each validator event, whether `validate_batch` was in scope.
#[derive(Clone, Default)]
struct BatchScopes(Arc<Mutex<Vec<bool>>>);

impl<S> Layer<S> for BatchScopes
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        if !event.metadata().target().starts_with("tsxcheck_validator") {
            return;
        }
        let in_batch = ctx
            .event_scope(event)
            .map(|mut scope| scope.any(|span| span.name() == "validate_batch"))
            .unwrap_or(false);
        self.0.lock().unwrap().push(in_batch);
    }
}

#[test]
fn test_worker_events_belong_to_batch_span() {
    let scopes = BatchScopes::default();
    tracing::subscriber::set_global_default(tracing_subscriber::registry().with(scopes.clone()))
        .unwrap();

    let paths: Vec<String> = (0..64).map(|i| format!("src/Card{:02}.tsx", i)).collect();
    let mut provider = MemoryProvider::new();
    for path in &paths {
        provider.insert(path.as_str(), "<section><p>ok</p></section>");
    }
    let report = Validator::new(provider, ScanOptions::default()).validate_batch(&paths);
    assert!(report.is_valid());

    // One "validated file" per path plus "batch finished".
    let recorded = scopes.0.lock().unwrap();
    assert_eq!(recorded.len(), paths.len() + 1);
    assert!(recorded.iter().all(|&in_batch| in_batch));
}
