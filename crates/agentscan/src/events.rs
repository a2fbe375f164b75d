use crate::errors::ChatError;

/// Side-channel notifications for chat lifecycle transitions.
///
/// Analytics and UI instrumentation hang off these hooks; the session works
/// the same with no observer installed. All methods default to no-ops.
pub trait ChatObserver: Send {
    fn on_request_start(&self, _question: &str) {}

    /// A decoded content increment arrived. `delta` is the new fragment,
    /// `content` the full accumulated reply so far.
    fn on_chunk(&self, _delta: &str, _content: &str) {}

    fn on_complete(&self, _content: &str) {}

    fn on_error(&self, _error: &ChatError) {}
}

/// Forwards lifecycle events to `tracing` at debug level.
pub struct TracingObserver;

impl ChatObserver for TracingObserver {
    fn on_request_start(&self, question: &str) {
        tracing::debug!(len = question.len(), "conversation request started");
    }

    fn on_complete(&self, content: &str) {
        tracing::debug!(len = content.len(), "conversation reply complete");
    }

    fn on_error(&self, error: &ChatError) {
        tracing::debug!(%error, "conversation request failed");
    }
}
