//! Telegram update handlers.
//!
//! Each handler is a thin adapter: it translates the teloxide update into the
//! core's types, calls the engine, and answers the callback query. Engine
//! failures are logged here and never bubble into the dispatcher.

use std::sync::Arc;

use teloxide::{
    prelude::*,
    types::{CallbackQuery, Message},
};

use crate::router::AppState;

mod callback;
mod commands;

pub async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    state: Arc<AppState>,
) -> ResponseResult<()> {
    callback::handle_callback(bot, q, state).await
}

pub async fn handle_message(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    if let Some(text) = msg.text() {
        if text.starts_with('/') {
            return commands::handle_command(msg, state).await;
        }
    }

    // Free-form messages are ignored; this bot is menu-driven.
    Ok(())
}
