//! Unit constants and human-readable renderings of snapshot values.
//!
//! Storage sizes use binary multipliers, network rates use decimal ones.
//! The two are kept apart on purpose: alert text depends on which one is used.

pub const UNIT_B: i64 = 1;
pub const UNIT_KB: i64 = UNIT_B * 1024;
pub const UNIT_MB: i64 = UNIT_KB * 1024;
pub const UNIT_GB: i64 = UNIT_MB * 1024;

pub const UNIT_BPS: i64 = 1;
pub const UNIT_KBPS: i64 = UNIT_BPS * 1000;
pub const UNIT_MBPS: i64 = UNIT_KBPS * 1000;
pub const UNIT_GBPS: i64 = UNIT_MBPS * 1000;

pub fn format_bytes(bytes: i64) -> String {
    let abs = bytes.unsigned_abs();
    if abs >= UNIT_GB as u64 {
        format!("{:.1} GB", bytes as f64 / UNIT_GB as f64)
    } else if abs >= UNIT_MB as u64 {
        format!("{:.1} MB", bytes as f64 / UNIT_MB as f64)
    } else if abs >= UNIT_KB as u64 {
        format!("{:.0} KB", bytes as f64 / UNIT_KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Bandwidth in bytes per second, shown in decimal units.
pub fn format_rate(bytes_per_sec: i64) -> String {
    let abs = bytes_per_sec.unsigned_abs();
    if abs >= UNIT_GBPS as u64 {
        format!("{:.1} GB/s", bytes_per_sec as f64 / UNIT_GBPS as f64)
    } else if abs >= UNIT_MBPS as u64 {
        format!("{:.1} MB/s", bytes_per_sec as f64 / UNIT_MBPS as f64)
    } else if abs >= UNIT_KBPS as u64 {
        format!("{:.0} KB/s", bytes_per_sec as f64 / UNIT_KBPS as f64)
    } else {
        format!("{} B/s", bytes_per_sec)
    }
}
