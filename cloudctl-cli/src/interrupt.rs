//! Process-wide Ctrl-C handling
//!
//! A single listener lives for the whole process and turns every Ctrl-C into
//! one notification. The current waiter receives it: a running command stops
//! being waited on, a pending request is abandoned, an idle menu exits. A
//! notification that arrives while nobody waits is kept for the next waiter.

use anyhow::{Result, bail};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Notify;

/// Shared handle to the Ctrl-C notifications
#[derive(Debug, Clone, Default)]
pub struct Interrupts {
    notify: Arc<Notify>,
}

impl Interrupts {
    /// Notifications that only [`trigger`](Self::trigger) produces
    pub fn new() -> Self {
        Self::default()
    }

    /// Listen for Ctrl-C for the rest of the process
    ///
    /// Must be called once, from within the runtime.
    pub fn install() -> Self {
        let interrupts = Self::new();
        let listener = interrupts.clone();

        tokio::spawn(async move {
            loop {
                if let Err(err) = tokio::signal::ctrl_c().await {
                    tracing::warn!("Ctrl-C handling is unavailable: {}", err);
                    return;
                }
                tracing::debug!("Ctrl-C received");
                listener.trigger();
            }
        });

        interrupts
    }

    /// Deliver one interrupt to the current or next waiter
    pub fn trigger(&self) {
        self.notify.notify_one();
    }

    /// Wait for the next interrupt
    pub async fn wait(&self) {
        self.notify.notified().await;
    }

    /// Run `request` unless an interrupt arrives first
    pub async fn guard<T>(&self, request: impl Future<Output = Result<T>>) -> Result<T> {
        tokio::select! {
            outcome = request => outcome,
            _ = self.wait() => bail!("interrupted"),
        }
    }
}
