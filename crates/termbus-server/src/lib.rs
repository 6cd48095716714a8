//! # termbus-server
//!
//! Server-side update bus: pushes typed state-change updates from the session
//! engine to every attached client whose session scope matches.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `bus` | Registry + broadcaster: register/unregister, scoped fan-out, delivery policy |
//! | `subscription` | Per-client record: scope, delivery channel, drop counter |
//! | `metrics` | Metric names and the Prometheus recorder |
//! | `telemetry` | Tracing subscriber installation |
//!
//! ## Data Flow
//!
//! connection layer → [`UpdateBus::register`] → drains the returned
//! [`UpdateReceiver`] → serializes outward.
//! producers → [`UpdateBus::broadcast`] → matching subscriber channels.
//! disconnect → [`UpdateBus::unregister`] closes the channel.

#![deny(unsafe_code)]

pub mod bus;
pub mod metrics;
pub mod subscription;
pub mod telemetry;

pub use bus::{DEFAULT_CHANNEL_CAPACITY, DEFAULT_MAX_TOTAL_DROPS, DeliveryPolicy, UpdateBus};
pub use subscription::{UpdateChannel, UpdateReceiver};
pub use telemetry::TelemetryError;
