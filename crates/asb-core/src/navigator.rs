//! Action routing and navigation state.
//!
//! One `MenuEngine` per process; one `handle` call per incoming button
//! press. Actions from the same user are serialized through a per-user lock,
//! actions from distinct users run concurrently.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info, warn};

use crate::{
    config::Config,
    domain::{Action, ChatId, UserId},
    formatting::{filters_summary, help_text, FAILURE_NOTICE, SEARCH_STUB},
    menu::{render_node, Effect, Item, MenuTree, ROOT_KEY},
    messaging::{port::MessagingPort, types::InboundAction},
    replies::ReplyManager,
    session::{FilterSelection, SessionStore, UserSession},
    Error, Result,
};

/// Per-user navigation position: the ancestor stack plus the current node.
#[derive(Clone, Debug)]
pub struct NavState {
    stack: Vec<String>,
    current: String,
}

impl Default for NavState {
    fn default() -> Self {
        Self {
            stack: Vec::new(),
            current: ROOT_KEY.to_string(),
        }
    }
}

impl NavState {
    pub fn current(&self) -> &str {
        &self.current
    }

    /// Push the current node and make `child` current.
    pub fn enter(&mut self, child: &str) {
        let previous = std::mem::replace(&mut self.current, child.to_string());
        self.stack.push(previous);
    }

    /// Pop to the most recently pushed node, or the root when the stack is
    /// empty.
    pub fn back(&mut self) {
        self.current = self.stack.pop().unwrap_or_else(|| ROOT_KEY.to_string());
    }

    /// Jump to the root and forget the history.
    pub fn main(&mut self) {
        self.stack.clear();
        self.current = ROOT_KEY.to_string();
    }
}

#[derive(Default)]
struct UserLocks {
    inner: Mutex<HashMap<i64, Arc<Mutex<()>>>>,
}

impl UserLocks {
    async fn lock_user(&self, user_id: i64) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().await;
            map.entry(user_id)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}

/// The menu navigation engine.
pub struct MenuEngine {
    cfg: Arc<Config>,
    tree: Arc<MenuTree>,
    store: Arc<SessionStore>,
    replies: Arc<ReplyManager>,
    messenger: Arc<dyn MessagingPort>,
    nav: Mutex<HashMap<i64, NavState>>,
    user_locks: UserLocks,
}

impl MenuEngine {
    pub fn new(
        cfg: Arc<Config>,
        tree: Arc<MenuTree>,
        store: Arc<SessionStore>,
        replies: Arc<ReplyManager>,
        messenger: Arc<dyn MessagingPort>,
    ) -> Self {
        Self {
            cfg,
            tree,
            store,
            replies,
            messenger,
            nav: Mutex::new(HashMap::new()),
            user_locks: UserLocks::default(),
        }
    }

    /// Entry point for one incoming button press.
    ///
    /// Recoverable failures (stale node keys, failing effects) are logged and
    /// turned into user-visible fallbacks here; only a transport failure on
    /// the final re-render escapes to the caller, which logs it.
    pub async fn handle(&self, action: InboundAction) -> Result<()> {
        let _guard = self.user_locks.lock_user(action.user_id.0).await;

        info!(
            "callback from user {} ({}): {}",
            action.user_id.0,
            action.username.as_deref().unwrap_or("unknown"),
            action.data
        );

        let outcome = match Action::parse(&action.data) {
            None => Err(Error::UnknownNode(action.data.clone())),
            Some(parsed) => self.dispatch(&action, parsed).await,
        };

        if let Err(e) = outcome {
            self.recover(&action, e).await;
        }

        // Re-render the active node after every action so position and
        // selection markers stay fresh.
        self.render_current(&action).await
    }

    /// Render the root menu as a fresh message (the `/start` flow) and reset
    /// the user's navigation history.
    pub async fn show_main(&self, user_id: UserId, chat_id: ChatId) -> Result<()> {
        let _guard = self.user_locks.lock_user(user_id.0).await;

        self.reset_nav(user_id).await;
        let session = self.session_for(user_id).await;
        let (body, keyboard) = render_node(self.tree.root(), &session);
        self.messenger.send_menu(chat_id, &body, keyboard).await?;
        Ok(())
    }

    async fn dispatch(&self, action: &InboundAction, parsed: Action) -> Result<()> {
        match parsed {
            Action::Nav(key) => {
                if self.tree.get(&key).is_none() {
                    return Err(Error::UnknownNode(key));
                }
                let mut nav = self.nav.lock().await;
                nav.entry(action.user_id.0).or_default().enter(&key);
                Ok(())
            }
            Action::Back => {
                let mut nav = self.nav.lock().await;
                nav.entry(action.user_id.0).or_default().back();
                Ok(())
            }
            Action::Main => {
                self.reset_nav(action.user_id).await;
                Ok(())
            }
            Action::Invoke(key) => self.invoke(action, &key).await,
            Action::Select { filter, index } => self.select(action, &filter, index).await,
        }
    }

    async fn invoke(&self, action: &InboundAction, key: &str) -> Result<()> {
        let node_key = self.current_key(action.user_id).await;
        let node = self
            .tree
            .get(&node_key)
            .ok_or_else(|| Error::UnknownNode(node_key.clone()))?;

        let effect = node
            .items
            .iter()
            .find_map(|item| match item {
                Item::SimpleAction { key: k, effect, .. } if k == key => Some(*effect),
                _ => None,
            })
            .ok_or_else(|| Error::UnknownNode(format!("{node_key}/{key}")))?;

        let sent = match effect {
            Effect::SearchNow => {
                self.replies
                    .send_ephemeral(action.chat_id, SEARCH_STUB, self.cfg.reply_ttl)
                    .await
            }
            Effect::ShowHelp => {
                self.replies
                    .send_ephemeral(action.chat_id, &help_text(), self.cfg.help_ttl())
                    .await
            }
            Effect::ShowFilters => {
                let session = self.session_for(action.user_id).await;
                let summary = filters_summary(&session, self.tree.filters());
                self.replies
                    .send_ephemeral(action.chat_id, &summary, self.cfg.reply_ttl)
                    .await
            }
        };

        sent.map_err(|e| Error::ActionEffect(format!("reply for {key} failed: {e}")))?;
        Ok(())
    }

    async fn select(&self, action: &InboundAction, filter: &str, index: usize) -> Result<()> {
        let def = self
            .tree
            .filters()
            .iter()
            .find(|d| d.name == filter)
            .ok_or_else(|| Error::UnknownNode(format!("filter {filter}")))?;

        let Some(value) = def.values.get(index) else {
            warn!("selector index {index} out of range for filter {filter}, ignoring");
            return Ok(());
        };

        // Make sure the full default map exists before overwriting one entry.
        self.session_for(action.user_id).await;

        debug!(
            "{} sets {filter} => {value}",
            action.username.as_deref().unwrap_or("unknown")
        );

        let title = def.title.clone();
        let chosen = value.clone();
        let name = filter.to_string();
        self.store
            .update(action.user_id, move |session| {
                session.filters.insert(
                    name,
                    FilterSelection {
                        title,
                        value: chosen,
                    },
                );
            })
            .await?;
        Ok(())
    }

    async fn recover(&self, action: &InboundAction, err: Error) {
        match err {
            Error::UnknownNode(key) => {
                warn!(
                    "unknown menu reference '{key}' from user {}, falling back to the main menu",
                    action.user_id.0
                );
                self.reset_nav(action.user_id).await;
            }
            Error::ActionEffect(reason) => {
                warn!("action effect failed for user {}: {reason}", action.user_id.0);
                if let Err(e) = self
                    .replies
                    .send_ephemeral(action.chat_id, FAILURE_NOTICE, self.cfg.reply_ttl)
                    .await
                {
                    warn!("failure notice could not be sent: {e}");
                }
            }
            Error::Transport(reason) => {
                warn!("transport failure handling '{}': {reason}", action.data);
            }
            other => {
                warn!("unexpected failure handling '{}': {other}", action.data);
            }
        }
    }

    async fn render_current(&self, action: &InboundAction) -> Result<()> {
        let key = self.current_key(action.user_id).await;
        let node = match self.tree.get(&key) {
            Some(node) => node,
            None => {
                // The tree changed under a live menu message; start over.
                warn!("navigation points at missing node '{key}', resetting to root");
                self.reset_nav(action.user_id).await;
                self.tree.root()
            }
        };

        let session = self.session_for(action.user_id).await;
        let (body, keyboard) = render_node(node, &session);

        match action.menu_msg {
            Some(msg) => self.messenger.edit_menu(msg, &body, keyboard).await,
            None => self
                .messenger
                .send_menu(action.chat_id, &body, keyboard)
                .await
                .map(|_| ()),
        }
    }

    /// Load a user's session, lazily initializing the filter map on first
    /// contact and resetting it when the stored shape no longer matches the
    /// declared filters. Initialization persists at most once; later calls
    /// find the map already valid.
    async fn session_for(&self, user_id: UserId) -> UserSession {
        let stored = self.store.get(user_id).await;
        let mut checked = stored.clone();
        if !checked.ensure_defaults(self.tree.filters()) {
            return checked;
        }

        if stored.filters.is_empty() {
            debug!("initializing filter defaults for user {}", user_id.0);
        } else {
            let err = Error::SessionCorrupt {
                user_id: user_id.0,
                reason: "stored filters do not match the declared definitions".to_string(),
            };
            warn!("{err}; resetting to defaults");
        }

        let defs = self.tree.filters().to_vec();
        if let Err(e) = self
            .store
            .update(user_id, move |session| {
                session.ensure_defaults(&defs);
            })
            .await
        {
            warn!("session write-through failed for user {}: {e}", user_id.0);
        }
        checked
    }

    async fn current_key(&self, user_id: UserId) -> String {
        self.nav
            .lock()
            .await
            .get(&user_id.0)
            .map(|nav| nav.current().to_string())
            .unwrap_or_else(|| ROOT_KEY.to_string())
    }

    async fn reset_nav(&self, user_id: UserId) {
        self.nav.lock().await.entry(user_id.0).or_default().main();
    }
}
