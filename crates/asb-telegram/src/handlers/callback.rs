use std::sync::Arc;

use teloxide::prelude::*;
use tracing::warn;

use asb_core::{
    domain::{ChatId, MessageId, MessageRef, UserId},
    messaging::types::InboundAction,
};

use crate::router::AppState;

pub async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    state: Arc<AppState>,
) -> ResponseResult<()> {
    let cb_id = q.id.clone();
    let data = q.data.clone().unwrap_or_default();
    let chat = q.message.as_ref().map(|m| m.chat.id);

    // Detached buttons (no originating message) and empty payloads have
    // nothing to act on; just release the button spinner.
    let Some(chat) = chat else {
        let _ = bot.answer_callback_query(cb_id).await;
        return Ok(());
    };
    if data.is_empty() {
        let _ = bot.answer_callback_query(cb_id).await;
        return Ok(());
    }

    let action = InboundAction {
        user_id: UserId(q.from.id.0 as i64),
        chat_id: ChatId(chat.0),
        username: q.from.username.clone(),
        data,
        menu_msg: q.message.as_ref().map(|m| MessageRef {
            chat_id: ChatId(m.chat.id.0),
            message_id: MessageId(m.id.0),
        }),
    };

    if let Err(e) = state.engine.handle(action).await {
        warn!("callback handling failed: {e}");
    }

    // Telegram keeps the button in a "loading" state until answered.
    let _ = bot.answer_callback_query(cb_id).await;
    Ok(())
}
