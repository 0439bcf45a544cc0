//! Data ingestion and validation

pub mod ingest;
pub mod schema;

pub use ingest::{load_path, read_csv, read_json_records, validate_bars, validate_raw, LoadError, RawBar};
pub use schema::ColumnRole;
