//! Durable per-user preference state.
//!
//! The whole session table lives in one JSON file and is written through on
//! every mutation, so the most recent preference change survives a process
//! restart. The table lock is never held across file i/o; a separate write
//! mutex orders the snapshots so the last writer carries the latest state.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::warn;

use crate::{domain::UserId, filters::FilterDef, Result};

/// One chosen filter value, stored together with its display title.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub title: String,
    pub value: String,
}

/// Per-user preference state.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UserSession {
    #[serde(default)]
    pub filters: HashMap<String, FilterSelection>,
}

impl UserSession {
    /// Ensure `filters` holds exactly one entry per declared filter with a
    /// value drawn from the declared set, resetting everything to defaults
    /// when that is not the case. Returns whether a reset happened, so the
    /// caller can persist (and log the cause) exactly once.
    pub fn ensure_defaults(&mut self, defs: &[FilterDef]) -> bool {
        if self.matches(defs) {
            return false;
        }
        self.filters = defs
            .iter()
            .map(|def| {
                (
                    def.name.clone(),
                    FilterSelection {
                        title: def.title.clone(),
                        value: def.default_value().to_string(),
                    },
                )
            })
            .collect();
        true
    }

    fn matches(&self, defs: &[FilterDef]) -> bool {
        if self.filters.len() != defs.len() {
            return false;
        }
        defs.iter().all(|def| {
            self.filters
                .get(&def.name)
                .map(|sel| def.values.iter().any(|v| v == &sel.value))
                .unwrap_or(false)
        })
    }
}

#[derive(Serialize, Deserialize)]
struct SessionFileData {
    saved_at: String,
    sessions: HashMap<String, UserSession>,
}

/// Write-through session table backed by a JSON file.
pub struct SessionStore {
    path: PathBuf,
    table: Mutex<HashMap<i64, UserSession>>,
    write_lock: Mutex<()>,
}

impl SessionStore {
    /// Load the table from disk. A missing or empty file starts empty; an
    /// unreadable or malformed file is warn-logged and recovered as empty
    /// (per-user defaults are reapplied lazily on first contact).
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let table = match read_session_file(&path) {
            Ok(Some(table)) => table,
            Ok(None) => HashMap::new(),
            Err(e) => {
                warn!(
                    "session file {} is corrupt, starting empty: {e}",
                    path.display()
                );
                HashMap::new()
            }
        };
        Self {
            path,
            table: Mutex::new(table),
            write_lock: Mutex::new(()),
        }
    }

    /// Current session for a user; an empty shell when absent.
    pub async fn get(&self, user_id: UserId) -> UserSession {
        self.table
            .lock()
            .await
            .get(&user_id.0)
            .cloned()
            .unwrap_or_default()
    }

    /// Read-modify-write one user's session, then write the table through to
    /// disk before returning. The closure runs under the table lock, so the
    /// mutation is atomic per user key.
    pub async fn update<F, T>(&self, user_id: UserId, f: F) -> Result<T>
    where
        F: FnOnce(&mut UserSession) -> T,
    {
        let out = {
            let mut table = self.table.lock().await;
            let session = table.entry(user_id.0).or_default();
            f(session)
        };
        self.persist().await?;
        Ok(out)
    }

    async fn persist(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let snapshot = self.table.lock().await.clone();
        write_session_file(&self.path, &snapshot)
    }
}

fn read_session_file(path: &Path) -> Result<Option<HashMap<i64, UserSession>>> {
    if !path.exists() {
        return Ok(None);
    }
    let txt = std::fs::read_to_string(path)?;
    if txt.trim().is_empty() {
        return Ok(None);
    }

    let data: SessionFileData = serde_json::from_str(&txt)?;
    let mut table = HashMap::new();
    for (key, session) in data.sessions {
        let Ok(id) = key.parse::<i64>() else {
            warn!("dropping session entry with non-numeric user key: {key}");
            continue;
        };
        table.insert(id, session);
    }
    Ok(Some(table))
}

fn write_session_file(path: &Path, table: &HashMap<i64, UserSession>) -> Result<()> {
    let data = SessionFileData {
        saved_at: Utc::now().to_rfc3339(),
        sessions: table
            .iter()
            .map(|(id, session)| (id.to_string(), session.clone()))
            .collect(),
    };
    let txt = serde_json::to_string_pretty(&data)?;
    std::fs::write(path, txt)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::default_filters;

    fn tmp_file(prefix: &str) -> PathBuf {
        let ts = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let pid = std::process::id();
        PathBuf::from(format!("/tmp/{prefix}-{pid}-{ts}.json"))
    }

    #[tokio::test]
    async fn missing_file_starts_empty() {
        let store = SessionStore::load(tmp_file("asb-session-missing"));
        let session = store.get(UserId(1)).await;
        assert!(session.filters.is_empty());
    }

    #[tokio::test]
    async fn corrupt_file_is_recovered_as_empty() {
        let path = tmp_file("asb-session-corrupt");
        std::fs::write(&path, "{ not json").unwrap();

        let store = SessionStore::load(&path);
        let session = store.get(UserId(1)).await;
        assert!(session.filters.is_empty());

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn update_writes_through_to_disk() {
        let path = tmp_file("asb-session-roundtrip");
        let store = SessionStore::load(&path);

        store
            .update(UserId(7), |s| {
                s.filters.insert(
                    "maxprice".to_string(),
                    FilterSelection {
                        title: "Max. Price".to_string(),
                        value: "50".to_string(),
                    },
                );
            })
            .await
            .unwrap();

        // A second store reading the same file sees the mutation.
        let reloaded = SessionStore::load(&path);
        let session = reloaded.get(UserId(7)).await;
        assert_eq!(
            session.filters.get("maxprice").map(|s| s.value.as_str()),
            Some("50")
        );

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn ensure_defaults_initializes_once() {
        let defs = default_filters();
        let mut session = UserSession::default();

        assert!(session.ensure_defaults(&defs));
        let first = session.clone();

        assert!(!session.ensure_defaults(&defs));
        assert_eq!(session.filters, first.filters);
        assert_eq!(session.filters.len(), defs.len());
        for def in &defs {
            assert_eq!(
                session.filters.get(&def.name).map(|s| s.value.as_str()),
                Some("Any")
            );
        }
    }

    #[test]
    fn ensure_defaults_resets_out_of_set_values() {
        let defs = default_filters();
        let mut session = UserSession::default();
        session.ensure_defaults(&defs);

        session
            .filters
            .get_mut("cputype")
            .expect("cputype entry")
            .value = "SPARC".to_string();

        assert!(session.ensure_defaults(&defs));
        assert_eq!(
            session.filters.get("cputype").map(|s| s.value.as_str()),
            Some("Any")
        );
    }

    #[test]
    fn ensure_defaults_keeps_valid_selections() {
        let defs = default_filters();
        let mut session = UserSession::default();
        session.ensure_defaults(&defs);

        session
            .filters
            .get_mut("maxprice")
            .expect("maxprice entry")
            .value = "50".to_string();

        assert!(!session.ensure_defaults(&defs));
        assert_eq!(
            session.filters.get("maxprice").map(|s| s.value.as_str()),
            Some("50")
        );
    }
}
