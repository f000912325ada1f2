use serde::{Deserialize, Serialize};

/// Top-level portal settings container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PortalSettings {
    pub storage: StorageSettings,
    pub sync: SyncSettings,
    pub filter: FilterSettings,
    pub reveal: RevealSettings,
    pub logging: LoggingSettings,
}

/// Where local state lives.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageSettings {
    /// File name of the SQLite database inside the platform data directory.
    pub database_file: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_file: "skillportal.db".to_string(),
        }
    }
}

/// Remote bookmark store settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SyncSettings {
    /// Base URL of the remote store. `None` keeps bookmarks in the in-process store.
    pub remote_url: Option<String>,
    /// Upper bound for a single push; `None` waits indefinitely.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

/// Card filter settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilterSettings {
    /// Delay between un-hiding a card and marking it visible.
    pub show_delay_ms: u64,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self { show_delay_ms: 50 }
    }
}

/// Viewport reveal settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RevealSettings {
    /// How far outside the viewport a card starts counting as visible.
    pub root_margin_px: f64,
    /// Fraction of the card that must intersect before it is revealed.
    pub threshold: f64,
}

impl Default for RevealSettings {
    fn default() -> Self {
        Self {
            root_margin_px: 40.0,
            threshold: 0.1,
        }
    }
}

/// Diagnostics output settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingSettings {
    /// `tracing-subscriber` filter directive; `RUST_LOG` takes precedence.
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}
