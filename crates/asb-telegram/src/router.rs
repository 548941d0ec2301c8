use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};
use tracing::{error, info};

use asb_core::{
    config::Config, filters::FilterDef, menu::MenuTree, messaging::port::MessagingPort,
    navigator::MenuEngine, replies::ReplyManager, session::SessionStore,
};

use crate::{handlers, TelegramMessenger};

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<MenuEngine>,
}

/// Wire the engine to Telegram and run the long-polling dispatch loop.
pub async fn run_polling(cfg: Arc<Config>, filters: Vec<FilterDef>) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.telegram_bot_token.clone());

    match bot.get_me().await {
        Ok(me) => info!("bot started as @{}", me.username()),
        Err(e) => error!("get_me failed (starting anyway): {e}"),
    }

    let messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));
    let tree = Arc::new(MenuTree::build(&filters));
    let store = Arc::new(SessionStore::load(cfg.session_file.clone()));
    let replies = Arc::new(ReplyManager::new(messenger.clone()));
    let engine = Arc::new(MenuEngine::new(cfg, tree, store, replies, messenger));

    let state = Arc::new(AppState { engine });

    let handler = dptree::entry()
        .branch(Update::filter_callback_query().endpoint(handlers::handle_callback))
        .branch(Update::filter_message().endpoint(handlers::handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .build()
        .dispatch()
        .await;

    Ok(())
}
