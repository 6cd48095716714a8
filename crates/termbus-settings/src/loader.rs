//! Settings loading: compiled defaults, JSON file, environment overrides.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::errors::{Result, SettingsError};
use crate::types::TermbusSettings;

/// Environment variable naming an explicit settings file.
pub const SETTINGS_PATH_ENV: &str = "TERMBUS_SETTINGS_PATH";

/// Resolve the settings file location.
///
/// `TERMBUS_SETTINGS_PATH` if set, otherwise `~/.termbus/settings.json`.
pub fn settings_path() -> PathBuf {
    if let Ok(path) = std::env::var(SETTINGS_PATH_ENV) {
        return PathBuf::from(path);
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".termbus").join("settings.json")
}

/// Load settings from the default location with env overrides applied.
pub fn load_settings() -> Result<TermbusSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from `path`, deep-merged over the compiled defaults.
///
/// A missing file is not an error: the defaults (plus env overrides) are used.
pub fn load_settings_from_path(path: &Path) -> Result<TermbusSettings> {
    let defaults = serde_json::to_value(TermbusSettings::default())?;
    let merged = match std::fs::read_to_string(path) {
        Ok(raw) => {
            let user: Value = serde_json::from_str(&raw)?;
            deep_merge(defaults, user)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(?path, "no settings file, using defaults");
            defaults
        }
        Err(source) => {
            return Err(SettingsError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    let mut settings: TermbusSettings = serde_json::from_value(merged)?;
    apply_env_overrides(&mut settings, |key| std::env::var(key).ok())?;
    settings.validate();
    Ok(settings)
}

/// Recursively merge `overlay` into `base`.
///
/// Objects merge key by key; any other overlay value replaces the base value.
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                let merged = match base.remove(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => value,
                };
                let _ = base.insert(key, merged);
            }
            Value::Object(base)
        }
        (_, overlay) => overlay,
    }
}

/// Apply `TERMBUS_*` overrides read through `lookup`.
///
/// | Variable | Setting |
/// |----------|---------|
/// | `TERMBUS_DELIVERY` | `bus.delivery` |
/// | `TERMBUS_CHANNEL_CAPACITY` | `bus.channelCapacity` |
/// | `TERMBUS_MAX_TOTAL_DROPS` | `bus.maxTotalDrops` |
/// | `TERMBUS_LOG_LEVEL` | `logging.level` |
/// | `TERMBUS_LOG_JSON` | `logging.json` |
pub fn apply_env_overrides(
    settings: &mut TermbusSettings,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    if let Some(v) = lookup("TERMBUS_DELIVERY") {
        settings.bus.delivery = v.parse()?;
    }
    if let Some(v) = lookup("TERMBUS_CHANNEL_CAPACITY") {
        settings.bus.channel_capacity = parse_env("TERMBUS_CHANNEL_CAPACITY", &v)?;
    }
    if let Some(v) = lookup("TERMBUS_MAX_TOTAL_DROPS") {
        settings.bus.max_total_drops = parse_env("TERMBUS_MAX_TOTAL_DROPS", &v)?;
    }
    if let Some(v) = lookup("TERMBUS_LOG_LEVEL") {
        settings.logging.level = v;
    }
    if let Some(v) = lookup("TERMBUS_LOG_JSON") {
        settings.logging.json = match v.trim() {
            "1" | "true" | "yes" => true,
            "0" | "false" | "no" | "" => false,
            _ => {
                return Err(SettingsError::InvalidValue {
                    key: "TERMBUS_LOG_JSON".into(),
                    value: v,
                });
            }
        };
    }
    Ok(())
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| SettingsError::InvalidValue {
            key: key.into(),
            value: value.into(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DeliveryMode;
    use assert_matches::assert_matches;
    use serde_json::json;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn deep_merge_nested_objects() {
        let base = json!({"bus": {"channelCapacity": 256, "maxTotalDrops": 100}});
        let overlay = json!({"bus": {"channelCapacity": 8}});
        let merged = deep_merge(base, overlay);
        assert_eq!(merged["bus"]["channelCapacity"], 8);
        assert_eq!(merged["bus"]["maxTotalDrops"], 100);
    }

    #[test]
    fn deep_merge_scalar_replaces_object() {
        let merged = deep_merge(json!({"a": {"b": 1}}), json!({"a": 2}));
        assert_eq!(merged, json!({"a": 2}));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let s = load_settings_from_path(&dir.path().join("absent.json")).unwrap();
        assert_eq!(s.bus.channel_capacity, TermbusSettings::default().bus.channel_capacity);
    }

    #[test]
    fn file_values_merge_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"bus": {"delivery": "blocking", "channelCapacity": 4}}"#)
            .unwrap();
        let s = load_settings_from_path(&path).unwrap();
        assert_eq!(s.bus.delivery, DeliveryMode::Blocking);
        assert_eq!(s.bus.channel_capacity, 4);
        assert_eq!(s.bus.max_total_drops, 100);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_matches!(load_settings_from_path(&path), Err(SettingsError::Json(_)));
    }

    #[test]
    fn zero_capacity_in_file_is_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"bus": {"channelCapacity": 0}}"#).unwrap();
        let s = load_settings_from_path(&path).unwrap();
        assert_eq!(s.bus.channel_capacity, 1);
    }

    #[test]
    fn env_overrides_apply() {
        let mut s = TermbusSettings::default();
        apply_env_overrides(
            &mut s,
            env(&[
                ("TERMBUS_DELIVERY", "blocking"),
                ("TERMBUS_CHANNEL_CAPACITY", "16"),
                ("TERMBUS_MAX_TOTAL_DROPS", "5"),
                ("TERMBUS_LOG_LEVEL", "termbus_server=trace"),
                ("TERMBUS_LOG_JSON", "true"),
            ]),
        )
        .unwrap();
        assert_eq!(s.bus.delivery, DeliveryMode::Blocking);
        assert_eq!(s.bus.channel_capacity, 16);
        assert_eq!(s.bus.max_total_drops, 5);
        assert_eq!(s.logging.level, "termbus_server=trace");
        assert!(s.logging.json);
    }

    #[test]
    fn env_overrides_absent_leave_values() {
        let mut s = TermbusSettings::default();
        apply_env_overrides(&mut s, env(&[])).unwrap();
        assert_eq!(s, TermbusSettings::default());
    }

    #[test]
    fn env_override_bad_number() {
        let mut s = TermbusSettings::default();
        let err = apply_env_overrides(&mut s, env(&[("TERMBUS_CHANNEL_CAPACITY", "lots")]))
            .unwrap_err();
        assert_matches!(
            err,
            SettingsError::InvalidValue { ref key, ref value }
                if key == "TERMBUS_CHANNEL_CAPACITY" && value == "lots"
        );
    }

    #[test]
    fn env_override_bad_bool() {
        let mut s = TermbusSettings::default();
        let result = apply_env_overrides(&mut s, env(&[("TERMBUS_LOG_JSON", "maybe")]));
        assert_matches!(result, Err(SettingsError::InvalidValue { .. }));
    }
}
