pub mod csv;
pub mod encoding;

// Re-export commonly used functions
pub use self::csv::{
    read_csv, read_csv_bytes, read_csv_str, to_csv_bytes, write_csv, write_csv_to, CsvReadOptions,
    DEFAULT_NA_VALUES,
};
pub use self::encoding::TextEncoding;
