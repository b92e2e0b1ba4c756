//! Environment helpers for tests that read server configuration.

use std::env;

use parking_lot::{const_mutex, Mutex};

/// Every variable `AppConfig::from_env` reads.
pub const CONFIG_ENV_KEYS: &[&str] = &[
    "HOST",
    "PORT",
    "APP_URL",
    "NOTION_API_BASE",
    "NOTION_VERSION",
    "NOTION_CLIENT_ID",
    "NOTION_CLIENT_SECRET",
    "NOTION_REDIRECT_URI",
    "RENDER_CACHE_TTL_SECS",
];

// Tests run in parallel and the environment is process-wide.
static CONFIG_ENV: Mutex<()> = const_mutex(());

/// Run `f` with every config variable unset except those in `vars`.
///
/// The previous values come back when `f` returns or panics. Keys outside
/// [`CONFIG_ENV_KEYS`] are rejected so nothing leaks past the restore.
pub fn with_config_env<R>(vars: &[(&str, &str)], f: impl FnOnce() -> R) -> R {
    for (key, _) in vars {
        assert!(
            CONFIG_ENV_KEYS.contains(key),
            "{key} is not a configuration variable"
        );
    }

    let _lock = CONFIG_ENV.lock();
    let _restore = SavedConfigEnv::capture();
    for key in CONFIG_ENV_KEYS {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }
    f()
}

struct SavedConfigEnv(Vec<(&'static str, Option<String>)>);

impl SavedConfigEnv {
    fn capture() -> Self {
        Self(
            CONFIG_ENV_KEYS
                .iter()
                .map(|key| (*key, env::var(key).ok()))
                .collect(),
        )
    }
}

impl Drop for SavedConfigEnv {
    fn drop(&mut self) {
        for (key, value) in &self.0 {
            match value {
                Some(value) => env::set_var(key, value),
                None => env::remove_var(key),
            }
        }
    }
}
