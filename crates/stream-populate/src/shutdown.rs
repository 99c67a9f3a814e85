//! Cooperative shutdown token.
//!
//! A [`ShutdownTrigger`] flips the token once; every [`Shutdown`] clone
//! observes it. The stream loop polls the token only between cycles, so an
//! interrupt never cuts a cycle short.

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Sending half: requests the stop.
#[derive(Debug)]
pub struct ShutdownTrigger {
    tx: watch::Sender<bool>,
}

/// Receiving half, passed into the loop.
#[derive(Debug, Clone)]
pub struct Shutdown {
    rx: watch::Receiver<bool>,
}

/// Create a connected trigger/token pair.
pub fn channel() -> (ShutdownTrigger, Shutdown) {
    let (tx, rx) = watch::channel(false);
    (ShutdownTrigger { tx }, Shutdown { rx })
}

impl ShutdownTrigger {
    /// Request a stop. Idempotent.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }
}

impl Shutdown {
    /// Whether a stop has been requested.
    pub fn is_requested(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once a stop is requested.
    ///
    /// Never resolves if the trigger is dropped without firing.
    pub async fn requested(&mut self) {
        if self.rx.wait_for(|stop| *stop).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Fire `trigger` on SIGINT or SIGTERM.
///
/// Keeps listening afterwards so repeated signals are logged instead of
/// silently swallowed.
pub fn listen_for_signals(trigger: ShutdownTrigger) -> JoinHandle<()> {
    tokio::spawn(async move {
        let (tx, rx) = mpsc::channel(4);
        tokio::join!(forward_signals(tx), relay_signals(rx, trigger));
    })
}

/// Turn each received signal into a stop request; returns the number of
/// signals seen once `signals` closes.
async fn relay_signals(mut signals: mpsc::Receiver<&'static str>, trigger: ShutdownTrigger) -> u32 {
    let mut seen = 0;
    while let Some(signal) = signals.recv().await {
        seen += 1;
        if seen == 1 {
            info!("Received {}, finishing the current cycle and shutting down", signal);
            trigger.trigger();
        } else {
            warn!("Received {} again; already stopping after the current cycle", signal);
        }
    }
    seen
}

#[cfg(unix)]
async fn forward_signals(tx: mpsc::Sender<&'static str>) {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = match signal(SignalKind::terminate()) {
        Ok(s) => Some(s),
        Err(e) => {
            error!("Failed to install SIGTERM handler: {}", e);
            None
        }
    };

    loop {
        let name = tokio::select! {
            name = wait_for_ctrl_c() => name,
            Some(()) = recv_terminate(&mut terminate) => "SIGTERM",
        };
        if tx.send(name).await.is_err() {
            break;
        }
    }
}

#[cfg(unix)]
async fn recv_terminate(terminate: &mut Option<tokio::signal::unix::Signal>) -> Option<()> {
    match terminate {
        Some(s) => s.recv().await,
        None => std::future::pending().await,
    }
}

#[cfg(not(unix))]
async fn forward_signals(tx: mpsc::Sender<&'static str>) {
    loop {
        let name = wait_for_ctrl_c().await;
        if tx.send(name).await.is_err() {
            break;
        }
    }
}

async fn wait_for_ctrl_c() -> &'static str {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
    "SIGINT"
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_trigger_is_observed_by_clones() {
        let (trigger, shutdown) = channel();
        let mut other = shutdown.clone();
        assert!(!shutdown.is_requested());

        trigger.trigger();

        assert!(shutdown.is_requested());
        tokio::time::timeout(Duration::from_secs(1), other.requested())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_dropped_trigger_never_resolves() {
        let (trigger, mut shutdown) = channel();
        drop(trigger);

        let waited = tokio::time::timeout(Duration::from_millis(20), shutdown.requested()).await;
        assert!(waited.is_err());
        assert!(!shutdown.is_requested());
    }

    #[tokio::test]
    async fn test_repeated_signals_trigger_once() {
        let (trigger, shutdown) = channel();
        let (tx, rx) = mpsc::channel(4);
        tx.send("SIGINT").await.unwrap();
        tx.send("SIGTERM").await.unwrap();
        tx.send("SIGINT").await.unwrap();
        drop(tx);

        let seen = relay_signals(rx, trigger).await;

        assert_eq!(seen, 3);
        assert!(shutdown.is_requested());
    }

    #[tokio::test]
    async fn test_no_signal_no_stop() {
        let (trigger, shutdown) = channel();
        let (tx, rx) = mpsc::channel::<&'static str>(1);
        drop(tx);

        assert_eq!(relay_signals(rx, trigger).await, 0);
        assert!(!shutdown.is_requested());
    }
}
