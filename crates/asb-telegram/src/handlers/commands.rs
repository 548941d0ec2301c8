use std::sync::Arc;

use teloxide::prelude::*;
use tracing::warn;

use asb_core::domain::{ChatId, UserId};

use crate::router::AppState;

fn parse_command(text: &str) -> String {
    // Telegram may send `/cmd@botname arg1 ...`
    let first = text.trim().split_whitespace().next().unwrap_or("");
    first
        .trim_start_matches('/')
        .split('@')
        .next()
        .unwrap_or("")
        .to_lowercase()
}

pub async fn handle_command(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let Some(user) = msg.from() else {
        return Ok(());
    };

    match parse_command(text).as_str() {
        "start" => {
            if let Err(e) = state
                .engine
                .show_main(UserId(user.id.0 as i64), ChatId(msg.chat.id.0))
                .await
            {
                warn!("/start failed: {e}");
            }
        }
        // Unknown commands are ignored; everything else is menu-driven.
        _ => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_slash_and_bot_mention() {
        assert_eq!(parse_command("/start"), "start");
        assert_eq!(parse_command("/start@auction_bot now"), "start");
        assert_eq!(parse_command("  /START  "), "start");
        assert_eq!(parse_command("/filters@auction_bot"), "filters");
    }
}
