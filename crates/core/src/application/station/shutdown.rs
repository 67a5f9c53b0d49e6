// Graceful shutdown signalling for the station loop

use tokio::sync::watch;

/// Owning side of the shutdown signal. Lives in the daemon; dropping it
/// does NOT stop the loop, only an explicit `trigger` does.
pub struct Shutdown {
    tx: watch::Sender<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    /// Hand out a token for a loop to watch
    pub fn token(&self) -> ShutdownToken {
        ShutdownToken {
            rx: self.tx.subscribe(),
        }
    }

    /// Ask every token holder to stop
    pub fn trigger(&self) {
        // send_replace updates the value even with no live receivers, so a
        // token subscribed after the trigger still sees the shutdown
        self.tx.send_replace(true);
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving side, polled and awaited by the station loop
#[derive(Clone)]
pub struct ShutdownToken {
    rx: watch::Receiver<bool>,
}

impl ShutdownToken {
    pub fn is_shutdown(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once shutdown has been requested
    pub async fn wait(&mut self) {
        while !*self.rx.borrow() {
            if self.rx.changed().await.is_err() {
                // Daemon side dropped the sender: treat as shutdown
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn trigger_reaches_every_token() {
        let shutdown = Shutdown::new();
        let token_a = shutdown.token();
        let mut token_b = shutdown.token();

        assert!(!token_a.is_shutdown());
        shutdown.trigger();
        assert!(token_a.is_shutdown());
        token_b.wait().await; // must not hang
    }
}
