//! Cooperative cancellation
//!
//! A [`Cancellation`] is the receiving half of the same `watch::channel(false)`
//! the binary wires to SIGINT/SIGTERM. Sending `true` cancels every export that
//! holds a clone of the receiver.

use std::time::Duration;
use tokio::sync::watch;

/// Returned by [`Cancellation::sleep`] when the wait was cut short
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

/// Read-only cancellation token
#[derive(Debug, Clone)]
pub struct Cancellation {
    rx: watch::Receiver<bool>,
}

impl Cancellation {
    /// Wraps the receiving half of a shutdown channel
    pub fn new(rx: watch::Receiver<bool>) -> Self {
        Self { rx }
    }

    /// A token that is never signalled
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self { rx }
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once cancellation is requested
    ///
    /// Never resolves if the sender is dropped without cancelling.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }

    /// Sleeps for `duration` unless cancelled first
    pub async fn sleep(&self, duration: Duration) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            return Err(Cancelled);
        }
        tokio::select! {
            biased;
            _ = self.cancelled() => Err(Cancelled),
            _ = tokio::time::sleep(duration) => Ok(()),
        }
    }
}

impl From<watch::Receiver<bool>> for Cancellation {
    fn from(rx: watch::Receiver<bool>) -> Self {
        Self::new(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_never_is_not_cancelled() {
        let cancel = Cancellation::never();
        assert!(!cancel.is_cancelled());
        assert_eq!(cancel.sleep(Duration::from_millis(1)).await, Ok(()));
    }

    #[tokio::test]
    async fn test_signal_is_observed_by_clones() {
        let (tx, rx) = watch::channel(false);
        let cancel = Cancellation::new(rx);
        let clone = cancel.clone();

        tx.send(true).unwrap();

        assert!(cancel.is_cancelled());
        assert!(clone.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sleep_interrupted_by_cancellation() {
        let (tx, rx) = watch::channel(false);
        let cancel = Cancellation::new(rx);

        let sleeper = tokio::spawn({
            let cancel = cancel.clone();
            async move { cancel.sleep(Duration::from_secs(3600)).await }
        });

        tokio::time::sleep(Duration::from_millis(10)).await;
        tx.send(true).unwrap();

        assert_eq!(sleeper.await.unwrap(), Err(Cancelled));
    }

    #[tokio::test]
    async fn test_sleep_returns_immediately_when_already_cancelled() {
        let (tx, rx) = watch::channel(false);
        tx.send(true).unwrap();
        let cancel = Cancellation::new(rx);

        assert_eq!(cancel.sleep(Duration::from_secs(3600)).await, Err(Cancelled));
    }
}
