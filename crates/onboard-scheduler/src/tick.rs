//! Sleep-or-shutdown primitive shared by the notifier loops.

use tokio::sync::watch;

/// Outcome of one wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// The interval elapsed; take another lap.
    Elapsed,
    /// The stop signal fired (or its sender is gone); wind down.
    Shutdown,
}

/// Sleep for `secs`, waking early if the shutdown signal flips to `true`.
pub async fn sleep_or_shutdown(secs: u64, shutdown: &mut watch::Receiver<bool>) -> Tick {
    if *shutdown.borrow() {
        return Tick::Shutdown;
    }
    tokio::select! {
        _ = tokio::time::sleep(std::time::Duration::from_secs(secs)) => Tick::Elapsed,
        changed = shutdown.changed() => {
            if changed.is_err() || *shutdown.borrow() {
                Tick::Shutdown
            } else {
                Tick::Elapsed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_elapsed_when_no_signal() {
        let (_tx, mut rx) = watch::channel(false);
        assert_eq!(sleep_or_shutdown(0, &mut rx).await, Tick::Elapsed);
    }

    #[tokio::test]
    async fn test_shutdown_interrupts_sleep() {
        let (tx, mut rx) = watch::channel(false);
        let waiter = tokio::spawn(async move { sleep_or_shutdown(3600, &mut rx).await });
        tx.send(true).unwrap();
        assert_eq!(waiter.await.unwrap(), Tick::Shutdown);
    }

    #[tokio::test]
    async fn test_dropped_sender_counts_as_shutdown() {
        let (tx, mut rx) = watch::channel(false);
        drop(tx);
        assert_eq!(sleep_or_shutdown(3600, &mut rx).await, Tick::Shutdown);
    }

    #[tokio::test]
    async fn test_already_signalled() {
        let (tx, mut rx) = watch::channel(true);
        let _ = &tx;
        assert_eq!(sleep_or_shutdown(3600, &mut rx).await, Tick::Shutdown);
    }
}
