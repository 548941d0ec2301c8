use crate::domain::{ChatId, MessageRef, UserId};

/// One incoming button press, as delivered by the transport adapter.
#[derive(Clone, Debug)]
pub struct InboundAction {
    pub user_id: UserId,
    pub chat_id: ChatId,
    pub username: Option<String>,
    /// Raw callback payload; parsed by the navigator.
    pub data: String,
    /// The menu message the button lives on, when the transport knows it.
    /// Present means "edit that message in place", absent means "send fresh".
    pub menu_msg: Option<MessageRef>,
}

/// Inline keyboard rows rendered under a menu message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineKeyboard {
    pub rows: Vec<Vec<InlineButton>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineButton {
    pub label: String,
    pub callback_data: String,
}
