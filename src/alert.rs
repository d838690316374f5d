//! Threshold checks over a decoded [`Snapshot`].

use std::fmt;

use crate::format::{UNIT_MB, UNIT_MBPS};
use crate::stats::Snapshot;

pub const LOAD_AVERAGE_LIMIT: i64 = 30;
pub const MEMORY_PERCENT_LIMIT: i64 = 80;
pub const DISK_PERCENT_LIMIT: i64 = 90;
pub const NETWORK_PERCENT_LIMIT: i64 = 90;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alert {
    LoadAverage { load_average: i64 },
    MemoryUsage { percent: i64 },
    DiskSpaceLow { free_mb: i64 },
    NetworkBandwidth { free_mbit: i64 },
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Alert::LoadAverage { load_average } => {
                write!(f, "Load Average is too high: {load_average}")
            }
            Alert::MemoryUsage { percent } => write!(f, "Memory usage is too high: {percent}%"),
            Alert::DiskSpaceLow { free_mb } => {
                write!(f, "Free disk space is too low: {free_mb} Mb left")
            }
            Alert::NetworkBandwidth { free_mbit } => {
                write!(f, "Network bandwidth usage high: {free_mbit} Mbit/s available")
            }
        }
    }
}

/// `used / available * 100`, rounded half away from zero.
///
/// Returns `None` when `available` is zero.
pub fn usage_percent(used: i64, available: i64) -> Option<i64> {
    if available == 0 {
        return None;
    }
    Some((used as f64 / available as f64 * 100.0).round() as i64)
}

/// Applies every rule independently; output order is load, memory, disk, network.
pub fn evaluate(snapshot: &Snapshot) -> Vec<Alert> {
    let mut alerts = Vec::with_capacity(4);

    if snapshot.load_average > LOAD_AVERAGE_LIMIT {
        alerts.push(Alert::LoadAverage {
            load_average: snapshot.load_average,
        });
    }

    if let Some(percent) = usage_percent(snapshot.mem_used, snapshot.mem_available)
        && percent > MEMORY_PERCENT_LIMIT
    {
        alerts.push(Alert::MemoryUsage { percent });
    }

    if let Some(percent) = usage_percent(snapshot.disk_used, snapshot.disk_available)
        && percent > DISK_PERCENT_LIMIT
    {
        let free = snapshot.disk_available.saturating_sub(snapshot.disk_used);
        alerts.push(Alert::DiskSpaceLow {
            free_mb: free / UNIT_MB,
        });
    }

    if let Some(percent) = usage_percent(snapshot.net_used, snapshot.net_available)
        && percent > NETWORK_PERCENT_LIMIT
    {
        let free = snapshot.net_available.saturating_sub(snapshot.net_used);
        alerts.push(Alert::NetworkBandwidth {
            free_mbit: free / UNIT_MBPS,
        });
    }

    alerts
}
