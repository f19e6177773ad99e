//! # pandrs-eda
//!
//! Exploratory data analysis essentials on top of a small column-oriented
//! DataFrame: load a CSV (any separator, with or without header, in utf-8,
//! latin1, iso-8859-1 or cp1252), then compute numeric and categorical column
//! summaries and the Pearson correlation matrix of the numeric columns.
//!
//! ```
//! use pandrs_eda::io::{read_csv_bytes, CsvReadOptions};
//! use pandrs_eda::stats::{correlate, summarize_categorical, summarize_numeric};
//!
//! let df = read_csv_bytes(b"a,b\n1,x\n2,y\n3,x\n", &CsvReadOptions::default()).unwrap();
//! assert_eq!(df.shape(), (3, 2));
//!
//! let numeric = summarize_numeric(&df).into_table().unwrap();
//! assert_eq!(numeric.get("a").unwrap().stats.mean, 2.0);
//!
//! let categorical = summarize_categorical(&df).into_table().unwrap();
//! assert_eq!(categorical.get("b").unwrap().most_common, "x");
//!
//! assert!(correlate(&df).is_empty());
//! ```

pub mod column;
pub mod config;
pub mod dataframe;
pub mod error;
pub mod io;
pub mod na;
pub mod report;
pub mod source;
pub mod stats;

// Re-export commonly used types
pub use column::{Column, ColumnKind};
pub use config::{ExplorerConfig, ReportOptions};
pub use dataframe::DataFrame;
pub use error::{Error, Result};
pub use io::{CsvReadOptions, TextEncoding};
pub use na::NA;
pub use report::{explore, DatasetReport, ExplorationSession};
pub use source::{DataSource, Fetch};
pub use stats::Summary;

// Export version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
