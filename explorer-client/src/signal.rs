//! Notifications the gateway publishes to whatever drives navigation.

use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use std::sync::{Arc, Mutex, PoisonError};

/// Authentication event observed by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthSignal {
    /// The server rejected the credential and the session has been cleared.
    Expired {
        /// Message the server gave for the rejection.
        message: String,
        /// Route the user should be sent to.
        redirect_to: String,
    },
}

impl AuthSignal {
    /// Route the front end should navigate to.
    #[must_use]
    pub fn redirect_to(&self) -> &str {
        match self {
            Self::Expired { redirect_to, .. } => redirect_to,
        }
    }

    /// Message attached to the event.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Expired { message, .. } => message,
        }
    }
}

/// Fan-out list of signal subscribers.
#[derive(Debug, Clone, Default)]
pub(crate) struct Subscribers {
    senders: Arc<Mutex<Vec<UnboundedSender<AuthSignal>>>>,
}

impl Subscribers {
    pub(crate) fn subscribe(&self) -> UnboundedReceiver<AuthSignal> {
        let (tx, rx) = mpsc::unbounded();
        self.senders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }

    /// Deliver `signal` to every live subscriber, dropping closed ones.
    pub(crate) fn publish(&self, signal: &AuthSignal) {
        let mut senders = self.senders.lock().unwrap_or_else(PoisonError::into_inner);
        senders.retain(|tx| tx.unbounded_send(signal.clone()).is_ok());
        tracing::debug!(subscribers = senders.len(), "published auth signal");
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.senders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
