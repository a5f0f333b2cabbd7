use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use tokio::sync::Notify;

/// Reason recorded by [`AbortSignal::interrupt`].
pub const INTERRUPTED: &str = "interrupted";

#[derive(Debug, Default)]
struct Inner {
    reason: OnceLock<String>,
    interrupted: AtomicBool,
    notify: Notify,
}

/// Pipeline-wide abort flag. Clones share the same flag.
///
/// The first reason set wins; later triggers are ignored. A plain trigger
/// lets in-flight transcodes finish, an interrupt cancels them.
#[derive(Debug, Clone, Default)]
pub struct AbortSignal {
    inner: Arc<Inner>,
}

impl AbortSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the flag. Returns `true` if this call was the one that set it.
    pub fn trigger(&self, reason: impl Into<String>) -> bool {
        self.inner.reason.set(reason.into()).is_ok()
    }

    /// Sets the flag for an external interrupt and wakes every task waiting
    /// in [`AbortSignal::interrupted`].
    ///
    /// An interrupt is recorded even when the flag was already set.
    pub fn interrupt(&self) -> bool {
        let first = self.trigger(INTERRUPTED);
        self.inner.interrupted.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
        first
    }

    pub fn is_set(&self) -> bool {
        self.inner.reason.get().is_some()
    }

    pub fn is_interrupted(&self) -> bool {
        self.inner.interrupted.load(Ordering::SeqCst)
    }

    pub fn reason(&self) -> Option<&str> {
        self.inner.reason.get().map(String::as_str)
    }

    /// Resolves once [`AbortSignal::interrupt`] has been called.
    pub async fn interrupted(&self) {
        loop {
            // Registered before the check, so a concurrent interrupt is not lost.
            let notified = self.inner.notify.notified();
            if self.is_interrupted() {
                return;
            }
            notified.await;
        }
    }
}
