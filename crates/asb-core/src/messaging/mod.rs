//! Transport abstractions (Telegram today; anything button-capable later).

pub mod port;
pub mod types;
