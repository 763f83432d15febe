//! Shared test utilities used across the Paris crates.

pub mod tracing {
    //! A subscriber layer that records spans and events for assertions.
    //!
    //! Field values are stored as strings: strings verbatim, errors through
    //! `Display`, everything else through `Debug`.

    use std::collections::HashMap;
    use std::fmt;
    use std::sync::{Arc, Mutex, MutexGuard};

    use tracing::field::{Field, Visit};
    use tracing::span::{Attributes, Id, Record};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::Layer;
    use tracing_subscriber::layer::Context;
    use tracing_subscriber::registry::LookupSpan;

    /// Structured fields keyed by name.
    pub type Fields = HashMap<String, String>;

    /// A closed span with the fields recorded over its lifetime.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct SpanRecord {
        /// Span name from its metadata.
        pub name: String,
        /// Fields recorded at creation and through `Span::record`.
        pub fields: Fields,
    }

    /// An emitted event.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct EventRecord {
        /// Event level.
        pub level: Level,
        /// Event target.
        pub target: String,
        /// Name of the innermost span the event was emitted in, if any.
        pub span: Option<String>,
        /// Event fields, including `message`.
        pub fields: Fields,
    }

    impl EventRecord {
        /// The formatted `message` field, if present.
        #[must_use]
        pub fn message(&self) -> Option<&str> {
            self.fields.get("message").map(String::as_str)
        }
    }

    struct SpanFields(Fields);

    #[derive(Default)]
    struct Journal {
        spans: Vec<SpanRecord>,
        events: Vec<EventRecord>,
    }

    /// Layer that keeps every closed span and every event in memory.
    ///
    /// Clones share the same journal, so a clone can be installed in a
    /// subscriber while the original is kept for assertions.
    ///
    /// # Examples
    /// ```
    /// use paris_test_support::tracing::RecordingLayer;
    /// use tracing_subscriber::layer::SubscriberExt;
    ///
    /// let layer = RecordingLayer::default();
    /// let subscriber = tracing_subscriber::registry().with(layer.clone());
    /// tracing::subscriber::with_default(subscriber, || {
    ///     let _span = tracing::info_span!("work", items = 3).entered();
    ///     tracing::info!("done");
    /// });
    /// assert_eq!(layer.span_named("work").and_then(|s| s.fields.get("items").cloned()), Some("3".to_owned()));
    /// assert!(layer.has_event(tracing::Level::INFO, "done"));
    /// ```
    #[derive(Clone, Default)]
    pub struct RecordingLayer {
        journal: Arc<Mutex<Journal>>,
    }

    impl RecordingLayer {
        fn journal(&self) -> MutexGuard<'_, Journal> {
            self.journal.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
        }

        /// Closed spans in completion order.
        #[must_use]
        pub fn spans(&self) -> Vec<SpanRecord> {
            self.journal().spans.clone()
        }

        /// Events in emission order.
        #[must_use]
        pub fn events(&self) -> Vec<EventRecord> {
            self.journal().events.clone()
        }

        /// The first closed span called `name`.
        #[must_use]
        pub fn span_named(&self, name: &str) -> Option<SpanRecord> {
            self.journal()
                .spans
                .iter()
                .find(|span| span.name == name)
                .cloned()
        }

        /// Whether an event at `level` carried exactly `message`.
        #[must_use]
        pub fn has_event(&self, level: Level, message: &str) -> bool {
            self.journal()
                .events
                .iter()
                .any(|event| event.level == level && event.message() == Some(message))
        }
    }

    impl<S> Layer<S> for RecordingLayer
    where
        S: Subscriber + for<'span> LookupSpan<'span>,
    {
        fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
            let Some(span) = ctx.span(id) else {
                return;
            };
            let mut fields = Fields::new();
            attrs.record(&mut FieldCollector(&mut fields));
            span.extensions_mut().insert(SpanFields(fields));
        }

        fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
            let Some(span) = ctx.span(id) else {
                return;
            };
            let mut extensions = span.extensions_mut();
            if let Some(SpanFields(fields)) = extensions.get_mut::<SpanFields>() {
                values.record(&mut FieldCollector(fields));
            }
        }

        fn on_close(&self, id: Id, ctx: Context<'_, S>) {
            let Some(span) = ctx.span(&id) else {
                return;
            };
            let fields = span
                .extensions_mut()
                .remove::<SpanFields>()
                .map(|SpanFields(fields)| fields)
                .unwrap_or_default();
            self.journal().spans.push(SpanRecord {
                name: span.name().to_owned(),
                fields,
            });
        }

        fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
            let mut fields = Fields::new();
            event.record(&mut FieldCollector(&mut fields));
            let span = ctx.event_span(event).map(|span| span.name().to_owned());
            self.journal().events.push(EventRecord {
                level: *event.metadata().level(),
                target: event.metadata().target().to_owned(),
                span,
                fields,
            });
        }
    }

    struct FieldCollector<'a>(&'a mut Fields);

    impl Visit for FieldCollector<'_> {
        fn record_str(&mut self, field: &Field, value: &str) {
            self.0.insert(field.name().to_owned(), value.to_owned());
        }

        fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
            self.0.insert(field.name().to_owned(), value.to_string());
        }

        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            self.0.insert(field.name().to_owned(), format!("{value:?}"));
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        use tracing_subscriber::layer::SubscriberExt;

        #[test]
        fn records_late_fields_and_event_spans() {
            let layer = RecordingLayer::default();
            let subscriber = tracing_subscriber::registry().with(layer.clone());
            tracing::subscriber::with_default(subscriber, || {
                let span = tracing::info_span!("outer", total = tracing::field::Empty);
                let _guard = span.enter();
                tracing::warn!(count = 2_u64, "inside");
                span.record("total", 7_u64);
            });

            let outer = layer.span_named("outer").expect("span must close");
            assert_eq!(outer.fields.get("total"), Some(&"7".to_owned()));

            let events = layer.events();
            assert_eq!(events.len(), 1);
            assert_eq!(events[0].span.as_deref(), Some("outer"));
            assert_eq!(events[0].fields.get("count"), Some(&"2".to_owned()));
            assert!(layer.has_event(Level::WARN, "inside"));
            assert!(!layer.has_event(Level::INFO, "inside"));
        }

        #[test]
        fn clones_share_one_journal() {
            let layer = RecordingLayer::default();
            let clone = layer.clone();
            let subscriber = tracing_subscriber::registry().with(clone);
            tracing::subscriber::with_default(subscriber, || tracing::info!("shared"));
            assert_eq!(layer.events().len(), 1);
            assert!(layer.spans().is_empty());
        }
    }
}

pub mod ci;
