//! Update bus delivery settings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::SettingsError;

/// What the broadcaster does when a subscriber's channel is full.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeliveryMode {
    /// Drop the update for that subscriber and count the loss.
    #[default]
    DropNewest,
    /// Wait for the subscriber while holding the registry lock.
    Blocking,
}

impl fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::DropNewest => "dropNewest",
            Self::Blocking => "blocking",
        })
    }
}

impl FromStr for DeliveryMode {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dropnewest" | "drop-newest" | "drop_newest" | "drop" => Ok(Self::DropNewest),
            "blocking" | "block" => Ok(Self::Blocking),
            _ => Err(SettingsError::InvalidValue {
                key: "bus.delivery".into(),
                value: s.into(),
            }),
        }
    }
}

/// Update bus settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BusSettings {
    /// Full-channel behavior.
    pub delivery: DeliveryMode,
    /// Per-subscriber channel buffer, in updates.
    pub channel_capacity: usize,
    /// Lifetime drops after which a slow subscriber is evicted (drop mode only).
    pub max_total_drops: u64,
}

impl Default for BusSettings {
    fn default() -> Self {
        Self {
            delivery: DeliveryMode::DropNewest,
            channel_capacity: 256,
            max_total_drops: 100,
        }
    }
}
