//! Polls a host's `_stats` endpoint and reports load, memory, disk and
//! bandwidth threshold breaches.

pub mod alert;
pub mod config;
pub mod fetch;
pub mod format;
pub mod logging;
pub mod poll;
pub mod stats;
