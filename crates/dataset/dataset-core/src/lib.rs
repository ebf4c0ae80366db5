//! Dataset Core
//!
//! Core implementations for the dataset side of the model lifecycle:
//! time-of-day feature extraction, dataset validation and classification,
//! CSV / JSON decoding, and synthetic utilization data.

pub mod decode;
pub mod feature;
pub mod synth;
pub mod validator;

// Re-export SPI types for implementations
pub use dataset_spi::{
    Cell, Column, DatasetError, Metric, MetricGroup, Result, Table, TableDecoder, TimeOfDay,
    MINUTES_PER_DAY, TIMESTAMP_COLUMN,
};

// Re-export main types
pub use decode::{decoder_for_extension, decoder_for_filename, CsvDecoder, JsonDecoder};
pub use feature::{extract, extract_datetime, parse_timestamp, timestamp_from_millis};
pub use synth::{synthesize, write_csv, MetricProfile, SynthesisConfig};
pub use validator::{DatasetValidator, SeriesFrame, ValidatedDataset};
