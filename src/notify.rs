//! Notification collaborator
//!
//! Alerts are pushed through a fire-and-forget sink: no delivery
//! confirmation, no retry. Device concerns (push permission registration,
//! haptics, sound configuration) live behind this seam.

use async_trait::async_trait;

/// Fire-and-forget notification sink
#[async_trait]
pub trait Notifier: Send + Sync {
    /// One-time registration step, invoked before monitoring begins
    /// (push-permission flows on device targets; no-op by default)
    async fn register(&self) {}

    /// Emits a user-facing notification
    async fn notify(&self, title: &str, body: &str);
}

/// Notifier that emits alerts through the tracing pipeline
///
/// The default sink for headless sessions; device frontends supply their
/// own implementation.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl LogNotifier {
    /// Creates a log-backed notifier
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, title: &str, body: &str) {
        tracing::info!(title, body, "Notification");
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    /// Notifier that records every notification for assertions
    #[derive(Default)]
    pub struct CountingNotifier {
        sent: Mutex<Vec<(String, String)>>,
    }

    impl CountingNotifier {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn sent(&self) -> Vec<(String, String)> {
            self.sent.lock().unwrap().clone()
        }

        pub fn count(&self) -> usize {
            self.sent.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Notifier for CountingNotifier {
        async fn notify(&self, title: &str, body: &str) {
            self.sent
                .lock()
                .unwrap()
                .push((title.to_string(), body.to_string()));
        }
    }
}
