//! Table decoder trait definition.

use crate::error::Result;
use crate::model::Table;

/// Turns an uploaded payload into a decoded [`Table`].
///
/// Decoders never interpret column semantics; timestamp parsing and metric
/// classification happen downstream in the validator.
pub trait TableDecoder: Send + Sync {
    /// Short format name (e.g. `"csv"`).
    fn format(&self) -> &str;

    /// Decode raw bytes into a table.
    fn decode(&self, bytes: &[u8]) -> Result<Table>;
}
