use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use tokio::{signal, sync::Notify};
use tracing::{info, warn};

/// Process-wide shutdown latch shared by the server tasks.
#[derive(Clone, Debug, Default)]
pub struct StopFlag {
    flag: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.flag.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    pub fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Resolves once `stop` has been called, including before the wait began.
    pub async fn wait(&self) {
        let notified = self.notify.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();

        if self.is_stopped() {
            return;
        }
        notified.await;
    }
}

pub fn register_signal_handler(stop_flag: &StopFlag) {
    {
        let stop_flag = stop_flag.clone();
        tokio::spawn(async move {
            if signal::ctrl_c().await.is_ok() {
                info!("Ctrl-C received, shutting down");
                stop_flag.stop();
            }
        });
    }

    #[cfg(unix)]
    {
        let stop_flag = stop_flag.clone();
        tokio::spawn(async move {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut terminate) => {
                    terminate.recv().await;
                    info!("Terminate signal received, shutting down");
                    stop_flag.stop();
                }
                Err(e) => warn!("Failed to install SIGTERM handler: {}", e),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_wait_returns_after_stop() {
        let flag = StopFlag::new();
        let waiter = {
            let flag = flag.clone();
            tokio::spawn(async move { flag.wait().await })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        flag.stop();

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
        assert!(flag.is_stopped());
    }

    #[tokio::test]
    async fn test_wait_after_stop_does_not_block() {
        let flag = StopFlag::new();
        flag.stop();

        tokio::time::timeout(Duration::from_secs(1), flag.wait())
            .await
            .unwrap();
    }
}
