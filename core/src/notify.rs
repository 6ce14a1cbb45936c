use parking_lot::Mutex;
use std::sync::Arc;

/// Sink for the transient user-facing notification that accompanies every
/// request failure. The client calls it exactly once per failure, then the
/// error still propagates to the caller for local handling.
pub trait Notifier: Send + Sync {
    fn error(&self, message: &str);
}

/// Default sink: route notifications through tracing.
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn error(&self, message: &str) {
        tracing::error!(target: "inkweave::notify", "{message}");
    }
}

/// Notifier that remembers everything it was told. Test helper, but also
/// useful for surfacing a message history in a console session.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn error(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }
}
