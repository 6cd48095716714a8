//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase", default)]`, so a settings
//! file only needs the keys it changes. Each type implements [`Default`] with
//! production values.

mod bus;
mod logging;

pub use bus::*;
pub use logging::*;

use serde::{Deserialize, Serialize};

/// Root settings type.
///
/// ```json
/// {
///   "bus": { "delivery": "blocking", "channelCapacity": 64 },
///   "logging": { "level": "debug" }
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TermbusSettings {
    /// Settings schema version.
    pub version: String,
    /// Application name.
    pub name: String,
    /// Update bus delivery settings.
    pub bus: BusSettings,
    /// Logging configuration.
    pub logging: LoggingSettings,
}

impl Default for TermbusSettings {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_string(),
            name: "termbus".to_string(),
            bus: BusSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl TermbusSettings {
    /// Correct values that would make the bus unusable.
    ///
    /// Called automatically during loading. Out-of-range values are clamped
    /// with a warning rather than rejected.
    pub fn validate(&mut self) {
        if self.bus.channel_capacity == 0 {
            tracing::warn!("channel_capacity must be at least 1, clamped to 1");
            self.bus.channel_capacity = 1;
        }
        if self.bus.max_total_drops == 0 {
            tracing::warn!("max_total_drops must be at least 1, clamped to 1");
            self.bus.max_total_drops = 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults() {
        let s = TermbusSettings::default();
        assert_eq!(s.name, "termbus");
        assert_eq!(s.bus.delivery, DeliveryMode::DropNewest);
        assert_eq!(s.bus.channel_capacity, 256);
        assert_eq!(s.bus.max_total_drops, 100);
        assert_eq!(s.logging.level, "info");
        assert!(!s.logging.json);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let s: TermbusSettings =
            serde_json::from_value(json!({"bus": {"delivery": "blocking"}})).unwrap();
        assert_eq!(s.bus.delivery, DeliveryMode::Blocking);
        assert_eq!(s.bus.channel_capacity, 256);
        assert_eq!(s.logging.level, "info");
    }

    #[test]
    fn camel_case_keys() {
        let json = serde_json::to_value(TermbusSettings::default()).unwrap();
        assert_eq!(json["bus"]["channelCapacity"], 256);
        assert_eq!(json["bus"]["maxTotalDrops"], 100);
        assert_eq!(json["bus"]["delivery"], "dropNewest");
    }

    #[test]
    fn validate_clamps_zero_capacity_and_drops() {
        let mut s = TermbusSettings::default();
        s.bus.channel_capacity = 0;
        s.bus.max_total_drops = 0;
        s.validate();
        assert_eq!(s.bus.channel_capacity, 1);
        assert_eq!(s.bus.max_total_drops, 1);
    }

    #[test]
    fn validate_keeps_valid_values() {
        let mut s = TermbusSettings::default();
        s.bus.channel_capacity = 8;
        s.validate();
        assert_eq!(s.bus.channel_capacity, 8);
        assert_eq!(s.bus.max_total_drops, 100);
    }
}
