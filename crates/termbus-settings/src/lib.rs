//! # termbus-settings
//!
//! Layered configuration for the termbus update bus.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`TermbusSettings::default()`]
//! 2. **User file**: `~/.termbus/settings.json` or `$TERMBUS_SETTINGS_PATH`
//!    (deep-merged over defaults)
//! 3. **Environment variables**: `TERMBUS_*` overrides (highest priority)
//!
//! The cached snapshot is reloadable: [`reload_settings_from_path`] swaps it
//! so later [`get_settings`] calls see the new values while holders of an
//! older `Arc` keep a consistent view.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{
    SETTINGS_PATH_ENV, apply_env_overrides, deep_merge, load_settings, load_settings_from_path,
    settings_path,
};
pub use types::*;

use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;

static SETTINGS: RwLock<Option<Arc<TermbusSettings>>> = RwLock::new(None);

/// Get the cached settings, loading them on first use.
///
/// If loading fails, the compiled defaults are cached instead.
pub fn get_settings() -> Arc<TermbusSettings> {
    if let Some(ref s) = *SETTINGS.read() {
        return Arc::clone(s);
    }

    let mut guard = SETTINGS.write();
    // Another thread may have loaded while we waited for the write lock.
    if let Some(ref s) = *guard {
        return Arc::clone(s);
    }

    let settings = Arc::new(load_settings().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to load settings, using defaults");
        TermbusSettings::default()
    }));
    *guard = Some(Arc::clone(&settings));
    settings
}

/// Replace the cached settings with a specific value.
pub fn init_settings(settings: TermbusSettings) {
    *SETTINGS.write() = Some(Arc::new(settings));
}

/// Reload settings from `path` and swap the cached value.
///
/// Falls back to compiled defaults if the file cannot be loaded.
pub fn reload_settings_from_path(path: &Path) {
    let new = Arc::new(load_settings_from_path(path).unwrap_or_else(|e| {
        tracing::warn!(error = %e, ?path, "failed to reload settings, falling back to defaults");
        TermbusSettings::default()
    }));
    *SETTINGS.write() = Some(new);
    tracing::info!(?path, "settings reloaded from disk");
}

#[cfg(test)]
pub(crate) fn reset_settings() {
    *SETTINGS.write() = None;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Serializes tests that touch the process-wide cache.
    static SETTINGS_MUTEX: parking_lot::Mutex<()> = parking_lot::Mutex::new(());

    #[test]
    fn init_settings_sets_custom_value() {
        let _lock = SETTINGS_MUTEX.lock();
        reset_settings();
        let mut custom = TermbusSettings::default();
        custom.bus.channel_capacity = 7;
        init_settings(custom);
        assert_eq!(get_settings().bus.channel_capacity, 7);
        reset_settings();
    }

    #[test]
    fn reload_picks_up_file_changes() {
        let _lock = SETTINGS_MUTEX.lock();
        reset_settings();
        init_settings(TermbusSettings::default());
        assert_eq!(get_settings().bus.delivery, DeliveryMode::DropNewest);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"bus": {"delivery": "blocking"}}"#).unwrap();
        reload_settings_from_path(&path);

        let updated = get_settings();
        assert_eq!(updated.bus.delivery, DeliveryMode::Blocking);
        assert_eq!(updated.bus.channel_capacity, 256);
        reset_settings();
    }

    #[test]
    fn reload_from_malformed_file_falls_back_to_defaults() {
        let _lock = SETTINGS_MUTEX.lock();
        reset_settings();
        let mut custom = TermbusSettings::default();
        custom.bus.channel_capacity = 3;
        init_settings(custom);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "[1, 2").unwrap();
        reload_settings_from_path(&path);

        assert_eq!(get_settings().bus.channel_capacity, 256);
        reset_settings();
    }

    #[test]
    fn snapshot_survives_replacement() {
        let _lock = SETTINGS_MUTEX.lock();
        reset_settings();
        init_settings(TermbusSettings::default());
        let snapshot = get_settings();

        let mut new = TermbusSettings::default();
        new.logging.level = "debug".into();
        init_settings(new);

        assert_eq!(snapshot.logging.level, "info");
        assert_eq!(get_settings().logging.level, "debug");
        reset_settings();
    }
}
