//! Contract module containing trait definitions for dataset decoding

mod table_decoder;

pub use table_decoder::TableDecoder;
