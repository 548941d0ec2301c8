//! Ephemeral replies: send now, delete later.
//!
//! Every reply the bot sends outside the menu message itself is scheduled for
//! deletion after a TTL to keep the chat clean. Deletions ride a dedicated
//! worker task owning a `DelayQueue`, so the send call never waits on the
//! timer. A scheduled deletion is never cancelled by later navigation, and a
//! failed delete (message already gone, chat closed) is swallowed.

use std::{sync::Arc, time::Duration};

use tokio::sync::mpsc;
use tokio_util::time::DelayQueue;
use tracing::debug;

use crate::{
    domain::{ChatId, MessageRef},
    messaging::port::MessagingPort,
    Result,
};

pub struct ReplyManager {
    messenger: Arc<dyn MessagingPort>,
    tx: mpsc::UnboundedSender<(MessageRef, Duration)>,
}

impl ReplyManager {
    /// Spawn the deletion worker; it runs until the manager is dropped.
    pub fn new(messenger: Arc<dyn MessagingPort>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(deletion_worker(messenger.clone(), rx));
        Self { messenger, tx }
    }

    /// Send `html` to the chat and schedule a deletion of exactly that
    /// message at `now + ttl`. Returns as soon as the send completes.
    pub async fn send_ephemeral(
        &self,
        chat_id: ChatId,
        html: &str,
        ttl: Duration,
    ) -> Result<MessageRef> {
        let msg = self.messenger.send_html(chat_id, html).await?;
        // The worker outlives every sender; a closed channel only happens
        // during shutdown, where dropping the deletion is fine.
        let _ = self.tx.send((msg, ttl));
        Ok(msg)
    }
}

async fn deletion_worker(
    messenger: Arc<dyn MessagingPort>,
    mut rx: mpsc::UnboundedReceiver<(MessageRef, Duration)>,
) {
    let mut queue: DelayQueue<MessageRef> = DelayQueue::new();

    loop {
        tokio::select! {
            maybe = rx.recv() => match maybe {
                Some((msg, ttl)) => {
                    queue.insert(msg, ttl);
                }
                // Manager dropped: pending deletions die with the process.
                None => break,
            },
            Some(expired) = std::future::poll_fn(|cx| queue.poll_expired(cx)) => {
                let msg = expired.into_inner();
                if let Err(e) = messenger.delete_message(msg).await {
                    debug!(
                        "deleting ephemeral message {} failed (ignored): {e}",
                        msg.message_id.0
                    );
                }
            }
        }
    }
}
