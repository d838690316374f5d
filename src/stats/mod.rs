pub mod decode;
pub mod snapshot;

pub use decode::{DecodeError, decode};
pub use snapshot::{Field, Snapshot};
