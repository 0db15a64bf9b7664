//! Span capture for checking instrumentation

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{span, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

#[derive(Debug, Clone, Default)]
struct SpanNames(Arc<Mutex<Vec<&'static str>>>);

impl<S: Subscriber> Layer<S> for SpanNames {
    fn on_new_span(&self, attrs: &span::Attributes<'_>, _id: &span::Id, _ctx: Context<'_, S>) {
        self.0.lock().push(attrs.metadata().name());
    }
}

/// Run `body` under a thread-local subscriber and return its result along
/// with the names of the spans it opened, in order.
pub fn record_spans<T>(body: impl FnOnce() -> T) -> (T, Vec<&'static str>) {
    let names = SpanNames::default();
    let subscriber = tracing_subscriber::registry().with(names.clone());
    let value = tracing::subscriber::with_default(subscriber, body);
    let recorded = names.0.lock().clone();
    (value, recorded)
}
