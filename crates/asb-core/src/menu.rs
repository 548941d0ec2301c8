//! Menu tree composition and rendering.
//!
//! The tree is built once at startup from the declarative filter table and is
//! immutable afterwards; the navigator only ever reads it. Construction is
//! total: missing session data shows up as "nothing selected", never as an
//! error.

use std::collections::HashMap;

use crate::{
    domain::{BACK_DATA, MAIN_DATA},
    filters::FilterDef,
    formatting::escape_html,
    messaging::types::{InlineButton, InlineKeyboard},
    session::UserSession,
};

/// Node key of the main menu.
pub const ROOT_KEY: &str = "main";

/// Node key of the filters branch.
pub const FILTERS_KEY: &str = "filters";

const BACK_LABEL: &str = "⏪ Previous menu";
const MAIN_LABEL: &str = "⏮️ Main menu";

/// Options per keyboard row in a value-selector submenu.
const SELECTOR_ROW_WIDTH: usize = 4;

/// What a `SimpleAction` button does when pressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    SearchNow,
    ShowHelp,
    ShowFilters,
}

/// One actionable element on a menu screen.
#[derive(Clone, Debug)]
pub enum Item {
    SimpleAction {
        key: String,
        label: String,
        effect: Effect,
        join_last_row: bool,
    },
    ValueSelector {
        key: String,
        filter: String,
        index: usize,
        value: String,
        join_last_row: bool,
    },
    SubmenuLink {
        key: String,
        label: String,
        child: String,
        join_last_row: bool,
    },
}

impl Item {
    fn join_last_row(&self) -> bool {
        match self {
            Item::SimpleAction { join_last_row, .. }
            | Item::ValueSelector { join_last_row, .. }
            | Item::SubmenuLink { join_last_row, .. } => *join_last_row,
        }
    }

    fn callback_data(&self) -> String {
        match self {
            Item::SimpleAction { key, .. } => format!("act:{key}"),
            Item::ValueSelector { filter, index, .. } => format!("set:{filter}:{index}"),
            Item::SubmenuLink { child, .. } => format!("nav:{child}"),
        }
    }
}

/// One navigable screen: a stable key, a body text and its buttons.
#[derive(Clone, Debug)]
pub struct MenuNode {
    pub key: String,
    pub title: String,
    pub items: Vec<Item>,
}

/// The immutable navigation topology.
pub struct MenuTree {
    nodes: HashMap<String, MenuNode>,
    filters: Vec<FilterDef>,
}

impl MenuTree {
    /// Compose the fixed topology from the filter table. Deterministic and
    /// total for any input.
    pub fn build(filters: &[FilterDef]) -> Self {
        let mut nodes = HashMap::new();

        let root_items = vec![
            Item::SubmenuLink {
                key: FILTERS_KEY.to_string(),
                label: "🔧 Filters".to_string(),
                child: FILTERS_KEY.to_string(),
                join_last_row: false,
            },
            Item::SimpleAction {
                key: "search-now".to_string(),
                label: "🔍 Search now".to_string(),
                effect: Effect::SearchNow,
                join_last_row: true,
            },
            Item::SimpleAction {
                key: "help".to_string(),
                label: "ℹ️ Help".to_string(),
                effect: Effect::ShowHelp,
                join_last_row: false,
            },
            Item::SimpleAction {
                key: "configure-filters".to_string(),
                label: "📄 View current filters".to_string(),
                effect: Effect::ShowFilters,
                join_last_row: true,
            },
        ];
        nodes.insert(
            ROOT_KEY.to_string(),
            MenuNode {
                key: ROOT_KEY.to_string(),
                title: "Choose an option:".to_string(),
                items: root_items,
            },
        );

        let mut filter_items = vec![Item::SimpleAction {
            key: "configure-filters".to_string(),
            label: "📄 View current filters".to_string(),
            effect: Effect::ShowFilters,
            join_last_row: false,
        }];

        for def in filters {
            filter_items.push(Item::SubmenuLink {
                key: def.name.clone(),
                label: def.title.clone(),
                child: def.name.clone(),
                join_last_row: def.join_last_row,
            });

            let items = def
                .values
                .iter()
                .enumerate()
                .map(|(index, value)| Item::ValueSelector {
                    key: format!("set-{}:{index}", def.name),
                    filter: def.name.clone(),
                    index,
                    value: value.clone(),
                    join_last_row: index % SELECTOR_ROW_WIDTH != 0,
                })
                .collect();

            nodes.insert(
                def.name.clone(),
                MenuNode {
                    key: def.name.clone(),
                    title: def.prompt.clone(),
                    items,
                },
            );
        }

        nodes.insert(
            FILTERS_KEY.to_string(),
            MenuNode {
                key: FILTERS_KEY.to_string(),
                title: "Choose an option to change your search preferences:".to_string(),
                items: filter_items,
            },
        );

        Self {
            nodes,
            filters: filters.to_vec(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&MenuNode> {
        self.nodes.get(key)
    }

    pub fn root(&self) -> &MenuNode {
        self.nodes.get(ROOT_KEY).expect("tree always has a root node")
    }

    pub fn filters(&self) -> &[FilterDef] {
        &self.filters
    }
}

/// Render a node against a session: HTML body text plus the keyboard.
///
/// Selector buttons get a marker when the session's stored value matches; a
/// missing or uninitialized session simply renders without markers.
pub fn render_node(node: &MenuNode, session: &UserSession) -> (String, InlineKeyboard) {
    let mut rows: Vec<Vec<InlineButton>> = Vec::new();

    for item in &node.items {
        let label = match item {
            Item::ValueSelector { filter, value, .. } => {
                let selected = session
                    .filters
                    .get(filter)
                    .map(|sel| sel.value == *value)
                    .unwrap_or(false);
                if selected {
                    format!("✅ {value}")
                } else {
                    value.clone()
                }
            }
            Item::SimpleAction { label, .. } | Item::SubmenuLink { label, .. } => label.clone(),
        };

        let button = InlineButton {
            label,
            callback_data: item.callback_data(),
        };

        match rows.last_mut() {
            Some(last) if item.join_last_row() => last.push(button),
            _ => rows.push(vec![button]),
        }
    }

    if node.key != ROOT_KEY {
        rows.push(vec![
            InlineButton {
                label: BACK_LABEL.to_string(),
                callback_data: BACK_DATA.to_string(),
            },
            InlineButton {
                label: MAIN_LABEL.to_string(),
                callback_data: MAIN_DATA.to_string(),
            },
        ]);
    }

    (escape_html(&node.title), InlineKeyboard { rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::default_filters;
    use crate::session::UserSession;

    fn tree() -> MenuTree {
        MenuTree::build(&default_filters())
    }

    #[test]
    fn builds_the_fixed_topology() {
        let tree = tree();

        let root = tree.root();
        assert_eq!(root.items.len(), 4);

        let filters = tree.get(FILTERS_KEY).expect("filters node");
        // view-current plus one submenu link per filter
        assert_eq!(filters.items.len(), 1 + default_filters().len());

        for def in default_filters() {
            let node = tree.get(&def.name).expect("one node per filter");
            assert_eq!(node.items.len(), def.values.len());
            assert_eq!(node.title, def.prompt);
        }
    }

    #[test]
    fn construction_is_total_for_empty_input() {
        let tree = MenuTree::build(&[]);
        assert_eq!(tree.root().items.len(), 4);
        assert_eq!(tree.get(FILTERS_KEY).expect("filters node").items.len(), 1);
    }

    #[test]
    fn root_keyboard_joins_search_onto_the_filters_row() {
        let (_, keyboard) = render_node(tree().root(), &UserSession::default());
        assert_eq!(keyboard.rows.len(), 2);
        assert_eq!(keyboard.rows[0].len(), 2);
        assert_eq!(keyboard.rows[0][0].label, "🔧 Filters");
        assert_eq!(keyboard.rows[0][1].label, "🔍 Search now");
        assert_eq!(keyboard.rows[1][0].label, "ℹ️ Help");
        assert_eq!(keyboard.rows[1][1].label, "📄 View current filters");
    }

    #[test]
    fn root_has_no_navigation_row_but_submenus_do() {
        let tree = tree();
        let session = UserSession::default();

        let (_, root_kb) = render_node(tree.root(), &session);
        assert!(root_kb
            .rows
            .iter()
            .flatten()
            .all(|b| b.callback_data != BACK_DATA));

        let (_, filters_kb) = render_node(tree.get(FILTERS_KEY).expect("filters node"), &session);
        let last = filters_kb.rows.last().expect("nav row");
        assert_eq!(last[0].callback_data, BACK_DATA);
        assert_eq!(last[1].callback_data, MAIN_DATA);
    }

    #[test]
    fn selected_value_carries_the_marker() {
        let defs = default_filters();
        let tree = MenuTree::build(&defs);
        let mut session = UserSession::default();
        session.ensure_defaults(&defs);

        let node = tree.get("cputype").expect("cputype node");
        let (_, keyboard) = render_node(node, &session);
        let labels: Vec<_> = keyboard
            .rows
            .iter()
            .flatten()
            .map(|b| b.label.as_str())
            .collect();

        assert!(labels.contains(&"✅ Any"));
        assert!(labels.contains(&"Intel"));
        assert!(!labels.contains(&"✅ Intel"));
    }

    #[test]
    fn selector_callbacks_encode_filter_and_index() {
        let tree = tree();
        let node = tree.get("maxprice").expect("maxprice node");
        let (_, keyboard) = render_node(node, &UserSession::default());
        let all: Vec<_> = keyboard.rows.iter().flatten().collect();
        assert_eq!(all[0].callback_data, "set:maxprice:0");
        assert_eq!(all[3].callback_data, "set:maxprice:3");
        assert_eq!(all[3].label, "50");
    }
}
