//! Dataset Facade
//!
//! High-level API for utilization datasets. Re-exports all public types
//! from the dataset stack for convenient usage.

// Re-export core modules for direct access
pub use dataset_core::{decode, feature, synth, validator};

// Re-export main types at root
pub use dataset_core::{
    decoder_for_extension, decoder_for_filename, extract, extract_datetime, parse_timestamp,
    synthesize, timestamp_from_millis, write_csv, CsvDecoder, DatasetValidator, JsonDecoder,
    MetricProfile, SeriesFrame, SynthesisConfig, ValidatedDataset,
};

// Re-export SPI types
pub use dataset_spi::{
    Cell, Column, DatasetError, Metric, MetricGroup, Result, Table, TableDecoder, TimeOfDay,
    MINUTES_PER_DAY, TIMESTAMP_COLUMN,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use dataset_core::{DatasetValidator, SeriesFrame, ValidatedDataset};
    pub use dataset_spi::{
        Cell, Column, DatasetError, Metric, MetricGroup, Result, Table, TableDecoder, TimeOfDay,
    };
}
