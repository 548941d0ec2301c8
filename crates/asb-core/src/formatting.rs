//! HTML helpers and canned reply texts.

use crate::{filters::FilterDef, session::UserSession};

/// Escape HTML special characters for Telegram HTML parse mode.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Stub reply for the search action.
pub const SEARCH_STUB: &str = "This feature is under development. Not results so far.";

/// Generic notice shown when an action effect fails.
pub const FAILURE_NOTICE: &str =
    "Something went wrong handling that action. Please try again.";

/// One line per declared filter, in declaration order, from the session.
pub fn filters_summary(session: &UserSession, defs: &[FilterDef]) -> String {
    let mut out = String::from("This is the current filters configuration:\n");
    for def in defs {
        let Some(sel) = session.filters.get(&def.name) else {
            continue; // not yet initialized; skip rather than fail
        };
        out.push_str(&format!(
            " - <b>{}</b>: {}\n",
            escape_html(&sel.title),
            escape_html(&sel.value)
        ));
    }
    out
}

/// Instructional text behind the help button. Sent with a doubled TTL.
pub fn help_text() -> String {
    let mut message = String::new();
    message.push_str(concat!(
        "This is a helper bot for the ",
        "<a href=\"https://t.me/hetznerauctionservers\">Hetzner Auction Servers channel</a>.",
        "\n\n<b>INSTRUCTIONS</b>:\n",
    ));
    message.push_str(" - Use /start to show the main menu at any moment.\n");
    message.push_str(
        " - Use the Filters menu to set your search preferences and you \
         will get notified for new servers matching your criteria.\n",
    );
    message.push_str(
        " - Messages from the bot will be deleted automatically after \
         some time (or when the server offer expires) in order to keep \
         the interface clean.\n\n",
    );
    message.push_str(
        "<b>IMPORTANT:</b> This bot is under heavy development. The \
         search and notification features won't probably work yet.",
    );
    message
}
