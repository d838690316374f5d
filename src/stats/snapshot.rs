use std::fmt;

use crate::format::{format_bytes, format_rate};

/// One health reading from the remote host, in wire order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub load_average: i64,
    /// Bytes.
    pub mem_available: i64,
    /// Bytes.
    pub mem_used: i64,
    /// Bytes.
    pub disk_available: i64,
    /// Bytes.
    pub disk_used: i64,
    /// Bytes per second.
    pub net_available: i64,
    /// Bytes per second.
    pub net_used: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    LoadAverage,
    MemAvailable,
    MemUsed,
    DiskAvailable,
    DiskUsed,
    NetAvailable,
    NetUsed,
}

impl Field {
    /// Every field in the order it appears on the wire.
    pub const ALL: [Field; 7] = [
        Field::LoadAverage,
        Field::MemAvailable,
        Field::MemUsed,
        Field::DiskAvailable,
        Field::DiskUsed,
        Field::NetAvailable,
        Field::NetUsed,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::LoadAverage => "load_average",
            Field::MemAvailable => "mem_available",
            Field::MemUsed => "mem_used",
            Field::DiskAvailable => "disk_available",
            Field::DiskUsed => "disk_used",
            Field::NetAvailable => "net_available",
            Field::NetUsed => "net_used",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Snapshot {
    /// Builds a snapshot from values given in wire order.
    pub fn from_values(values: [i64; 7]) -> Self {
        let [
            load_average,
            mem_available,
            mem_used,
            disk_available,
            disk_used,
            net_available,
            net_used,
        ] = values;
        Snapshot {
            load_average,
            mem_available,
            mem_used,
            disk_available,
            disk_used,
            net_available,
            net_used,
        }
    }

    #[cfg(test)]
    fn get(&self, field: Field) -> i64 {
        match field {
            Field::LoadAverage => self.load_average,
            Field::MemAvailable => self.mem_available,
            Field::MemUsed => self.mem_used,
            Field::DiskAvailable => self.disk_available,
            Field::DiskUsed => self.disk_used,
            Field::NetAvailable => self.net_available,
            Field::NetUsed => self.net_used,
        }
    }

    /// Multi-line, human-readable rendering used by `--show-snapshot`.
    pub fn summary(&self) -> String {
        format!(
            "load average: {}\nmemory: {} used of {}\ndisk: {} used of {}\nnetwork: {} used of {}",
            self.load_average,
            format_bytes(self.mem_used),
            format_bytes(self.mem_available),
            format_bytes(self.disk_used),
            format_bytes(self.disk_available),
            format_rate(self.net_used),
            format_rate(self.net_available),
        )
    }
}
