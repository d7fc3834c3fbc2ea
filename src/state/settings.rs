//! Display theme and wake-lock preferences

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::warn;

use crate::storage::{LocalStore, StorageError};

pub const THEME_KEY: &str = "monyfit_theme";
pub const WAKE_LOCK_KEY: &str = "monyfit_wake_lock_mode";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Theme {
    #[default]
    Dark,
    Neon,
    Ocean,
    Sepia,
    Soft,
    Light,
    NeonGreen,
}

/// When the screen should be kept awake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WakeLockMode {
    Disabled,
    #[default]
    Timer,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Menu,
    Settings,
    Timer,
}

impl WakeLockMode {
    pub fn keeps_awake(&self, screen: Screen) -> bool {
        match self {
            WakeLockMode::Disabled => false,
            WakeLockMode::Timer => screen == Screen::Timer,
            WakeLockMode::All => true,
        }
    }
}

/// Preferences shared by every screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Settings {
    pub theme: Theme,
    pub wake_lock: WakeLockMode,
}

impl Settings {
    /// Read settings, writing defaults back for anything absent or unknown
    pub fn load(store: &mut LocalStore) -> Self {
        let theme = read_or_default(store, THEME_KEY);
        let wake_lock = read_or_default(store, WAKE_LOCK_KEY);
        Self { theme, wake_lock }
    }

    pub fn save(&self, store: &mut LocalStore) -> Result<(), StorageError> {
        store.set(THEME_KEY, plain(&self.theme))?;
        store.set(WAKE_LOCK_KEY, plain(&self.wake_lock))?;
        Ok(())
    }
}

fn read_or_default<T>(store: &mut LocalStore, key: &str) -> T
where
    T: DeserializeOwned + Serialize + Default,
{
    let parsed = store
        .get(key)
        .and_then(|raw| serde_json::from_value(serde_json::Value::String(raw.to_string())).ok());
    match parsed {
        Some(value) => value,
        None => {
            let value = T::default();
            if let Err(e) = store.set(key, plain(&value)) {
                warn!("Failed to write default for {}: {}", key, e);
            }
            value
        }
    }
}

/// Unit enum variants are stored as bare strings, not JSON
fn plain<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(s)) => s,
        Ok(other) => other.to_string(),
        Err(_) => String::new(),
    }
}
