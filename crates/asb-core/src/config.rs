use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{errors::Error, Result};

/// Typed configuration, loaded from the environment (with `.env` support).
#[derive(Clone, Debug)]
pub struct Config {
    pub telegram_bot_token: String,

    /// How long ephemeral replies stay in the chat before deletion.
    pub reply_ttl: Duration,
    /// Multiplier applied to `reply_ttl` for long informational replies.
    pub help_ttl_multiplier: u32,

    /// JSON file holding the per-user session table.
    pub session_file: PathBuf,

    /// Default tracing level when `RUST_LOG` is not set.
    pub log_level: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        let telegram_bot_token = env_str("TELEGRAM_BOT_TOKEN").unwrap_or_default();
        if telegram_bot_token.trim().is_empty() {
            return Err(Error::Config(
                "TELEGRAM_BOT_TOKEN environment variable is required".to_string(),
            ));
        }

        let reply_ttl = Duration::from_secs(env_u64("REPLY_TIMEOUT").unwrap_or(5));
        let help_ttl_multiplier = env_u32("HELP_TIMEOUT_MULTIPLIER").unwrap_or(2).max(1);

        let session_file = env_path("SESSION_FILE")
            .unwrap_or_else(|| PathBuf::from("data/session.json"));
        if let Some(dir) = session_file.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }

        let log_level = env_str("LOGLEVEL")
            .and_then(non_empty)
            .unwrap_or_else(|| "info".to_string());

        Ok(Self {
            telegram_bot_token,
            reply_ttl,
            help_ttl_multiplier,
            session_file,
            log_level,
        })
    }

    /// TTL for long informational replies (help text).
    pub fn help_ttl(&self) -> Duration {
        self.reply_ttl * self.help_ttl_multiplier
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn env_u64(key: &str) -> Option<u64> {
    env_str(key).and_then(|s| s.trim().parse::<u64>().ok())
}

fn env_u32(key: &str) -> Option<u32> {
    env_str(key).and_then(|s| s.trim().parse::<u32>().ok())
}

fn env_path(key: &str) -> Option<PathBuf> {
    env::var_os(key).map(PathBuf::from)
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
