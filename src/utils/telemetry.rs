use opentelemetry::trace::Span;
use opentelemetry::KeyValue;

/// Anything that can receive span attributes on behalf of an active trace.
///
/// Every `opentelemetry::trace::Span` is a sink; orchestrators with their own
/// tracing plumbing can implement it directly.
pub trait SpanAttributeSink {
    /// Whether the underlying span handle can still accept attributes.
    fn is_valid(&self) -> bool;

    fn set_attribute(&mut self, attribute: KeyValue);
}

impl<S: Span> SpanAttributeSink for S {
    // an ended span keeps its context but stops recording
    fn is_valid(&self) -> bool {
        self.span_context().is_valid() && self.is_recording()
    }

    fn set_attribute(&mut self, attribute: KeyValue) {
        Span::set_attribute(self, attribute)
    }
}
