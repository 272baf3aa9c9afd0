//! Pageseed Core Library
//!
//! Generates synthetic analytics page events and writes them to ClickHouse
//! in fixed-size batches.

pub mod clickhouse;
pub mod config;
pub mod error;
pub mod format;
pub mod generator;
pub mod types;
pub mod writer;

// Re-export commonly used items at crate root
pub use clickhouse::{ClickHouseClient, encode_rows, insert_query};
pub use config::{
    ClickHouseConfig, DEFAULT_BATCH_SIZE, DEFAULT_DATABASE, DEFAULT_TABLE, DEFAULT_TOTAL,
};
pub use error::{PageseedError, Result};
pub use format::{format_duration, format_progress, format_rate};
pub use generator::{EventGenerator, generate_events};
pub use types::{EventType, Metadata, PageEvent};
pub use writer::{BatchWriter, EventSink, Progress};
