//! Prometheus metrics recorder and bus metric names.

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::info;

/// Install the Prometheus metrics recorder (global).
///
/// Returns the handle used to render the text exposition. Call once at
/// startup, before the bus records anything.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    info!("prometheus metrics recorder installed");
    Ok(handle)
}

/// Render Prometheus text format from the installed recorder.
pub fn render(handle: &PrometheusHandle) -> String {
    handle.render()
}

// Metric name constants to avoid typos across crates.

/// Subscriptions created, including re-registrations (counter).
pub const BUS_REGISTRATIONS_TOTAL: &str = "termbus_registrations_total";
/// Re-registrations that closed an existing subscription (counter).
pub const BUS_SUPERSEDED_TOTAL: &str = "termbus_superseded_total";
/// Explicit unregistrations that removed a subscription (counter).
pub const BUS_UNREGISTRATIONS_TOTAL: &str = "termbus_unregistrations_total";
/// Live subscriptions (gauge).
pub const BUS_SUBSCRIPTIONS_ACTIVE: &str = "termbus_subscriptions_active";
/// Broadcast calls (counter, labels: `update_type`).
pub const BUS_BROADCASTS_TOTAL: &str = "termbus_broadcasts_total";
/// Updates placed on a subscriber channel (counter).
pub const BUS_DELIVERIES_TOTAL: &str = "termbus_deliveries_total";
/// Updates discarded because a subscriber channel was full (counter).
pub const BUS_BROADCAST_DROPS_TOTAL: &str = "termbus_broadcast_drops_total";
/// Subscribers removed by the broadcaster (counter, labels: reason).
pub const BUS_EVICTIONS_TOTAL: &str = "termbus_evictions_total";
/// Time spent holding the registry lock for one fan-out (histogram).
pub const BUS_BROADCAST_DURATION_SECONDS: &str = "termbus_broadcast_duration_seconds";
