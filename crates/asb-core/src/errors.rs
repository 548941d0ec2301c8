/// Core error type for the bot.
///
/// The recovery policy lives in the navigator: `UnknownNode` falls back to
/// the main menu, `SessionCorrupt` reinitializes that user's filter map,
/// `ActionEffect` becomes a generic failure notice while staying on the
/// current node. None of these may escape the per-action handler.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("session state for user {user_id} is corrupt: {reason}")]
    SessionCorrupt { user_id: i64, reason: String },

    #[error("unknown menu reference: {0}")]
    UnknownNode(String),

    #[error("action effect failed: {0}")]
    ActionEffect(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
