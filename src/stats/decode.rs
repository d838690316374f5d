//! Decoder for the comma-separated stats payload.

use std::num::ParseIntError;
use std::str::Utf8Error;

use thiserror::Error;

use super::snapshot::{Field, Snapshot};

pub const FIELD_COUNT: usize = Field::ALL.len();

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("payload is not valid UTF-8: {0}")]
    Encoding(#[from] Utf8Error),
    #[error("expected {expected} values, got {actual}")]
    Schema { expected: usize, actual: usize },
    #[error("error parsing {field} from {value:?}: {source}")]
    FieldParse {
        field: Field,
        value: String,
        source: ParseIntError,
    },
}

/// Parses `load,mem_avail,mem_used,disk_avail,disk_used,net_avail,net_used`.
///
/// Fields are read in wire order and the first unparseable one is reported.
/// Surrounding whitespace is not tolerated.
pub fn decode(raw: &[u8]) -> Result<Snapshot, DecodeError> {
    let text = std::str::from_utf8(raw)?;
    let parts: Vec<&str> = text.split(',').collect();
    if parts.len() != FIELD_COUNT {
        return Err(DecodeError::Schema {
            expected: FIELD_COUNT,
            actual: parts.len(),
        });
    }

    let mut values = [0i64; FIELD_COUNT];
    for ((slot, field), part) in values.iter_mut().zip(Field::ALL).zip(parts) {
        *slot = part.parse().map_err(|source| DecodeError::FieldParse {
            field,
            value: part.to_string(),
            source,
        })?;
    }

    Ok(Snapshot::from_values(values))
}
