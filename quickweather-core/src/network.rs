use std::fmt;

use reqwest::Client;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    Online,
    Offline,
}

impl fmt::Display for Connectivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Connectivity::Online => "online",
            Connectivity::Offline => "offline",
        })
    }
}

/// Current connectivity plus a feed of transitions.
///
/// Going back online only updates the status; nothing is refetched until the user asks.
#[derive(Debug)]
pub struct NetworkMonitor {
    tx: watch::Sender<Connectivity>,
}

impl NetworkMonitor {
    pub fn new(initial: Connectivity) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    pub fn status(&self) -> Connectivity {
        *self.tx.borrow()
    }

    pub fn is_online(&self) -> bool {
        self.status() == Connectivity::Online
    }

    /// Returns `true` when this was a transition.
    pub fn set_status(&self, status: Connectivity) -> bool {
        let changed = self.tx.send_if_modified(|current| {
            if *current == status {
                false
            } else {
                *current = status;
                true
            }
        });

        if changed {
            tracing::info!(%status, "Connectivity changed");
        }
        changed
    }

    /// Receivers wake on every transition.
    pub fn subscribe(&self) -> watch::Receiver<Connectivity> {
        self.tx.subscribe()
    }

    /// Any HTTP response counts as online, even an error status.
    pub async fn probe(&self, http: &Client, url: &str) -> Connectivity {
        let status = match http.head(url).send().await {
            Ok(_) => Connectivity::Online,
            Err(e) => {
                tracing::debug!(error = %e, url, "Connectivity probe failed");
                Connectivity::Offline
            }
        };

        self.set_status(status);
        status
    }
}

impl Default for NetworkMonitor {
    fn default() -> Self {
        Self::new(Connectivity::Online)
    }
}
