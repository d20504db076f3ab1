//! Delivery of result envelopes to whatever sits outside the engine.

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::{debug, info};

use crate::envelope::ActionResult;

/// Receives every envelope a session produces, in order.
pub trait Notifier: Send + Sync {
    /// Deliver one envelope.
    fn notify(&self, result: &ActionResult);
}

/// Forwards envelopes over a tokio channel.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: UnboundedSender<ActionResult>,
}

impl ChannelNotifier {
    /// A notifier and the receiving end of its channel.
    pub fn new() -> (Self, UnboundedReceiver<ActionResult>) {
        let (sender, receiver) = unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, result: &ActionResult) {
        if self.sender.send(result.clone()).is_err() {
            debug!("notification receiver dropped");
        }
    }
}

/// Writes envelopes to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, result: &ActionResult) {
        match result {
            ActionResult::Success(data) => info!(
                action = %data.description.action,
                message = data.description.message.as_deref().unwrap_or(""),
                "action result"
            ),
            ActionResult::Failure { message } => info!(%message, "action failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn channel_delivers_in_order() {
        let (notifier, mut rx) = ChannelNotifier::new();
        notifier.notify(&ActionResult::Failure {
            message: "first".into(),
        });
        notifier.notify(&ActionResult::Failure {
            message: "second".into(),
        });
        assert_eq!(rx.recv().await.unwrap().message(), Some("first"));
        assert_eq!(rx.recv().await.unwrap().message(), Some("second"));
    }

    #[test]
    fn dropped_receiver_is_ignored() {
        let (notifier, rx) = ChannelNotifier::new();
        drop(rx);
        notifier.notify(&ActionResult::Failure {
            message: "lost".into(),
        });
    }
}
