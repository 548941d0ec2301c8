/// Telegram user id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

/// Telegram chat id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

/// Telegram message id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageId(pub i32);

/// A stable reference to a sent message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

/// Callback payload attached to the "previous menu" button.
pub const BACK_DATA: &str = "back";

/// Callback payload attached to the "main menu" button.
pub const MAIN_DATA: &str = "main";

/// Parsed button payload.
///
/// Wire grammar (colon-separated, mirrors what the menu renderer emits):
/// `nav:{node}`, `back`, `main`, `act:{item}`, `set:{filter}:{index}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Enter the submenu with the given node key.
    Nav(String),
    /// Pop back to the most recently pushed node.
    Back,
    /// Jump to the root node and clear the navigation history.
    Main,
    /// Run the simple action with the given item key on the current node.
    Invoke(String),
    /// Store one option value for a filter.
    Select { filter: String, index: usize },
}

impl Action {
    /// Parse a raw callback payload. `None` means the payload does not match
    /// the grammar at all (e.g. a button from an older tree layout).
    pub fn parse(data: &str) -> Option<Self> {
        match data {
            BACK_DATA => return Some(Self::Back),
            MAIN_DATA => return Some(Self::Main),
            _ => {}
        }

        let (kind, rest) = data.split_once(':')?;
        match kind {
            "nav" if !rest.is_empty() => Some(Self::Nav(rest.to_string())),
            "act" if !rest.is_empty() => Some(Self::Invoke(rest.to_string())),
            "set" => {
                let (filter, index) = rest.split_once(':')?;
                if filter.is_empty() {
                    return None;
                }
                Some(Self::Select {
                    filter: filter.to_string(),
                    index: index.parse().ok()?,
                })
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_navigation_payloads() {
        assert_eq!(Action::parse("back"), Some(Action::Back));
        assert_eq!(Action::parse("main"), Some(Action::Main));
        assert_eq!(
            Action::parse("nav:filters"),
            Some(Action::Nav("filters".to_string()))
        );
    }

    #[test]
    fn parses_item_payloads() {
        assert_eq!(
            Action::parse("act:search-now"),
            Some(Action::Invoke("search-now".to_string()))
        );
        assert_eq!(
            Action::parse("set:maxprice:3"),
            Some(Action::Select {
                filter: "maxprice".to_string(),
                index: 3
            })
        );
    }

    #[test]
    fn rejects_malformed_payloads() {
        assert_eq!(Action::parse(""), None);
        assert_eq!(Action::parse("nav:"), None);
        assert_eq!(Action::parse("set:maxprice"), None);
        assert_eq!(Action::parse("set::0"), None);
        assert_eq!(Action::parse("set:maxprice:many"), None);
        assert_eq!(Action::parse("frobnicate:xyz"), None);
    }
}
