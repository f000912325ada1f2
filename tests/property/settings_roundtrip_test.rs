//! Property-based tests for PortalSettings serialization round-trip.
//!
//! Settings written by the engine must load back unchanged, for arbitrary
//! valid values of every section.

use proptest::prelude::*;

use skillportal::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use skillportal::types::settings::{
    FilterSettings, LoggingSettings, PortalSettings, RevealSettings, StorageSettings, SyncSettings,
};

fn arb_sync_settings() -> impl Strategy<Value = SyncSettings> {
    (
        prop::option::of("https://[a-z]{3,10}\\.example\\.com(/[a-z]{1,6})?"),
        prop::option::of(1u64..120_000),
    )
        .prop_map(|(remote_url, timeout_ms)| SyncSettings { remote_url, timeout_ms })
}

fn arb_reveal_settings() -> impl Strategy<Value = RevealSettings> {
    (0u32..400, 0u32..=16).prop_map(|(margin, sixteenths)| RevealSettings {
        root_margin_px: margin as f64,
        threshold: sixteenths as f64 / 16.0,
    })
}

fn arb_settings() -> impl Strategy<Value = PortalSettings> {
    (
        "[a-z]{1,12}\\.db",
        arb_sync_settings(),
        0u64..2_000,
        arb_reveal_settings(),
        prop_oneof![
            Just("info".to_string()),
            Just("debug".to_string()),
            Just("skillportal=trace,warn".to_string()),
        ],
    )
        .prop_map(|(database_file, sync, show_delay_ms, reveal, filter)| PortalSettings {
            storage: StorageSettings { database_file },
            sync,
            filter: FilterSettings { show_delay_ms },
            reveal,
            logging: LoggingSettings { filter },
        })
}

proptest! {
    #[test]
    fn settings_json_roundtrip(settings in arb_settings()) {
        let json = serde_json::to_string(&settings).unwrap();
        let back: PortalSettings = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, settings);
    }

    #[test]
    fn settings_survive_save_and_load(settings in arb_settings()) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json").to_string_lossy().to_string();

        let mut engine = SettingsEngine::new(Some(path.clone()));
        engine.load().unwrap();
        let document = serde_json::to_value(&settings).unwrap();
        for section in ["storage", "sync", "filter", "reveal", "logging"] {
            for (key, value) in document[section].as_object().unwrap() {
                engine.set_value(&format!("{}.{}", section, key), value.clone()).unwrap();
            }
        }
        prop_assert_eq!(engine.get_settings(), &settings);

        let mut reloaded = SettingsEngine::new(Some(path));
        prop_assert_eq!(reloaded.load().unwrap(), settings);
    }
}
