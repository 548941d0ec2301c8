use async_trait::async_trait;

use crate::{
    domain::{ChatId, MessageRef},
    messaging::types::InlineKeyboard,
    Result,
};

/// Narrow transport interface consumed by the engine.
///
/// The Telegram adapter is the production implementation; tests provide
/// in-memory fakes. Delivery details (flood-limit retries, parse mode,
/// web-page previews) belong to the implementor, not the engine.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<MessageRef>;

    async fn send_menu(
        &self,
        chat_id: ChatId,
        html: &str,
        keyboard: InlineKeyboard,
    ) -> Result<MessageRef>;

    async fn edit_menu(&self, msg: MessageRef, html: &str, keyboard: InlineKeyboard)
        -> Result<()>;

    async fn delete_message(&self, msg: MessageRef) -> Result<()>;
}
