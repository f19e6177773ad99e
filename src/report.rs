//! End-to-end exploration: bytes in, report out.
//!
//! A [`DatasetReport`] is everything a front end shows for one loaded dataset.
//! It is a plain value built from a [`DataFrame`]; nothing is cached between
//! loads.

use log::{debug, info};
use serde::Serialize;
use std::fmt;

use crate::column::ColumnKind;
use crate::config::{ExplorerConfig, ReportOptions};
use crate::dataframe::DataFrame;
use crate::error::{Error, Result};
use crate::io::{read_csv_bytes, to_csv_bytes};
use crate::source::{DataSource, Fetch};
use crate::stats::{
    correlate, summarize_categorical, summarize_numeric, CategoricalSummary, CorrelationMatrix,
    NumericSummary, Summary,
};

/// Name and inferred kind of one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub kind: ColumnKind,
}

/// Leading rows of the dataset, rendered as text. Missing cells read `NA`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Preview {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Shape, preview, column summaries and correlation matrix of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetReport {
    pub rows: usize,
    pub columns: usize,
    pub column_kinds: Vec<ColumnInfo>,
    pub preview: Preview,
    pub numeric: Summary<NumericSummary>,
    pub categorical: Summary<CategoricalSummary>,
    pub correlation: Summary<CorrelationMatrix>,
    #[serde(skip)]
    decimals: usize,
}

impl DatasetReport {
    /// Builds the report of an already loaded frame.
    pub fn build(df: &DataFrame, options: &ReportOptions) -> Result<Self> {
        if options.preview_rows == 0 {
            return Err(Error::InvalidInput(
                "preview_rows must be at least 1".to_string(),
            ));
        }
        let (rows, columns) = df.shape();
        debug!("building report for {} rows x {} columns", rows, columns);

        let column_kinds = df
            .schema()
            .into_iter()
            .map(|(name, kind)| ColumnInfo { name, kind })
            .collect();
        let preview = Preview {
            header: df.column_names().to_vec(),
            rows: df.preview(options.preview_rows),
        };

        Ok(Self {
            rows,
            columns,
            column_kinds,
            preview,
            numeric: summarize_numeric(df),
            categorical: summarize_categorical(df),
            correlation: correlate(df),
            decimals: options.decimals,
        })
    }

    /// Compact JSON. Undefined statistics (NaN) become `null`.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn format_value(&self, value: f64) -> String {
        if value.is_nan() {
            "NaN".to_string()
        } else {
            format!("{:.*}", self.decimals, value)
        }
    }
}

/// Loads `bytes` with the configured CSV options and reports on the result.
pub fn explore(bytes: &[u8], config: &ExplorerConfig) -> Result<DatasetReport> {
    let df = read_csv_bytes(bytes, &config.csv)?;
    DatasetReport::build(&df, &config.report)
}

impl fmt::Display for DatasetReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dataset Overview")?;
        writeln!(
            f,
            "Shape of dataset: {} rows, {} columns",
            self.rows, self.columns
        )?;
        writeln!(f)?;
        write_table(f, &self.preview.header, &self.preview.rows)?;

        writeln!(f)?;
        writeln!(f, "Numeric Column Analysis")?;
        match &self.numeric {
            Summary::Table(table) => {
                let header = [
                    "", "Mean", "Median", "Std", "Min", "Max", "Skewness", "Kurtosis",
                ]
                .map(String::from);
                let rows: Vec<Vec<String>> = table
                    .rows
                    .iter()
                    .map(|row| {
                        let s = &row.stats;
                        let mut cells = vec![row.column.clone()];
                        cells.extend(
                            [s.mean, s.median, s.std, s.min, s.max, s.skewness, s.kurtosis]
                                .iter()
                                .map(|v| self.format_value(*v)),
                        );
                        cells
                    })
                    .collect();
                write_table(f, &header, &rows)?;
            }
            Summary::Empty => writeln!(f, "No numeric columns found in the dataset.")?,
        }

        writeln!(f)?;
        writeln!(f, "Categorical Column Analysis")?;
        match &self.categorical {
            Summary::Table(table) => {
                let header = [
                    "",
                    "Unique Values",
                    "Most Common",
                    "Most Common Count",
                    "Least Common",
                    "Least Common Count",
                ]
                .map(String::from);
                let rows: Vec<Vec<String>> = table
                    .rows
                    .iter()
                    .map(|row| {
                        vec![
                            row.column.clone(),
                            row.unique.to_string(),
                            row.most_common.clone(),
                            row.most_common_count.to_string(),
                            row.least_common.clone(),
                            row.least_common_count.to_string(),
                        ]
                    })
                    .collect();
                write_table(f, &header, &rows)?;
            }
            Summary::Empty => writeln!(f, "No categorical columns found in the dataset.")?,
        }

        writeln!(f)?;
        writeln!(f, "Correlation Matrix")?;
        match &self.correlation {
            Summary::Table(matrix) => {
                let mut header = vec![String::new()];
                header.extend(matrix.columns.iter().cloned());
                let rows: Vec<Vec<String>> = matrix
                    .columns
                    .iter()
                    .zip(&matrix.values)
                    .map(|(name, values)| {
                        let mut cells = vec![name.clone()];
                        cells.extend(values.iter().map(|v| self.format_value(*v)));
                        cells
                    })
                    .collect();
                write_table(f, &header, &rows)?;
            }
            Summary::Empty => writeln!(f, "No numeric columns found for correlation matrix.")?,
        }
        Ok(())
    }
}

/// Left-aligned text table, columns padded to their widest cell.
fn write_table(f: &mut fmt::Formatter<'_>, header: &[String], rows: &[Vec<String>]) -> fmt::Result {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let write_row = |f: &mut fmt::Formatter<'_>, cells: &[String]| -> fmt::Result {
        let line = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ");
        writeln!(f, "{}", line.trim_end())
    };

    write_row(f, header)?;
    for row in rows {
        write_row(f, row)?;
    }
    Ok(())
}

/// Current dataset and report of an interactive front end.
///
/// Each successful [`load`](Self::load) replaces both; a failed load clears
/// them, so a stale report is never shown for new input.
#[derive(Debug, Default)]
pub struct ExplorationSession {
    config: ExplorerConfig,
    current: Option<(DataFrame, DatasetReport)>,
}

impl ExplorationSession {
    pub fn new(config: ExplorerConfig) -> Self {
        Self {
            config,
            current: None,
        }
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    /// Replaces the configuration used by subsequent loads.
    pub fn set_config(&mut self, config: ExplorerConfig) {
        self.config = config;
    }

    /// Loads raw bytes and returns the new report.
    pub fn load(&mut self, bytes: &[u8]) -> Result<&DatasetReport> {
        self.current = None;
        let df = read_csv_bytes(bytes, &self.config.csv)?;
        let report = DatasetReport::build(&df, &self.config.report)?;
        info!(
            "session loaded {} rows x {} columns",
            report.rows, report.columns
        );
        let (_, report) = self.current.insert((df, report));
        Ok(report)
    }

    /// Reads the bytes of `source` and loads them.
    pub fn load_source(
        &mut self,
        source: &DataSource,
        fetcher: Option<&dyn Fetch>,
    ) -> Result<&DatasetReport> {
        debug!("loading {}", source);
        self.current = None;
        let bytes = source.read_bytes(fetcher)?;
        self.load(&bytes)
    }

    pub fn frame(&self) -> Option<&DataFrame> {
        self.current.as_ref().map(|(df, _)| df)
    }

    pub fn report(&self) -> Option<&DatasetReport> {
        self.current.as_ref().map(|(_, report)| report)
    }

    /// The current frame re-encoded as UTF-8 CSV with a header row.
    pub fn download_csv(&self) -> Result<Vec<u8>> {
        let df = self
            .frame()
            .ok_or_else(|| Error::InvalidInput("no dataset loaded".to_string()))?;
        to_csv_bytes(df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_report() {
        let report = explore(b"a,b\n1,x\n2,y\n3,x\n", &ExplorerConfig::default()).unwrap();
        assert_eq!((report.rows, report.columns), (3, 2));
        assert_eq!(report.preview.header, vec!["a", "b"]);
        assert_eq!(report.preview.rows.len(), 3);
        assert_eq!(
            report.column_kinds,
            vec![
                ColumnInfo {
                    name: "a".to_string(),
                    kind: ColumnKind::Numeric
                },
                ColumnInfo {
                    name: "b".to_string(),
                    kind: ColumnKind::Categorical
                },
            ]
        );
        assert!(!report.numeric.is_empty());
        assert!(!report.categorical.is_empty());
        assert!(report.correlation.is_empty());
    }

    #[test]
    fn test_preview_limit() {
        let mut config = ExplorerConfig::default();
        config.report.preview_rows = 2;
        let report = explore(b"a\n1\n2\n3\n4\n", &config).unwrap();
        assert_eq!(report.preview.rows, vec![vec!["1"], vec!["2"]]);

        config.report.preview_rows = 0;
        assert!(matches!(
            explore(b"a\n1\n", &config),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_display_messages() {
        let report = explore(b"name\nx\ny\n", &ExplorerConfig::default()).unwrap();
        let text = report.to_string();
        assert!(text.contains("Shape of dataset: 2 rows, 1 columns"));
        assert!(text.contains("No numeric columns found in the dataset."));
        assert!(text.contains("No numeric columns found for correlation matrix."));
        assert!(!text.contains("No categorical columns found"));
    }

    #[test]
    fn test_display_correlation_decimals() {
        let report = explore(b"x,y\n1,2\n2,4\n3,7\n", &ExplorerConfig::default()).unwrap();
        let text = report.to_string();
        assert!(text.contains("1.000"));
        assert!(text.contains("No categorical columns found in the dataset."));
    }

    #[test]
    fn test_json_nan_as_null() {
        let report = explore(b"v\n5\n", &ExplorerConfig::default()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        let stats = &json["numeric"]["rows"][0];
        assert_eq!(stats["column"], "v");
        assert_eq!(stats["mean"], 5.0);
        assert!(stats["std"].is_null());
        assert!(json["categorical"].is_null());
        assert!(json["correlation"].is_null());
        assert!(json.get("decimals").is_none());
    }

    #[test]
    fn test_session_config_applies_to_next_load() {
        let mut session = ExplorationSession::default();
        session.load(b"a;b\n1;2\n").unwrap();
        assert_eq!(session.report().unwrap().columns, 1);

        let mut config = ExplorerConfig::default();
        config.csv.separator = ";".to_string();
        session.set_config(config);
        assert_eq!(session.config().csv.separator, ";");
        // the current report stays until the next load
        assert_eq!(session.report().unwrap().columns, 1);

        session.load(b"a;b\n1;2\n").unwrap();
        assert_eq!(session.report().unwrap().columns, 2);
    }

    #[test]
    fn test_session_replaces_state() {
        let mut session = ExplorationSession::default();
        assert!(session.download_csv().is_err());

        session.load(b"a,b\n1,x\n").unwrap();
        assert_eq!(session.report().unwrap().columns, 2);
        assert_eq!(session.download_csv().unwrap(), b"a,b\n1,x\n".to_vec());

        session.load(b"c\n7\n8\n").unwrap();
        assert_eq!(session.frame().unwrap().column_names(), &["c".to_string()]);
        assert_eq!(session.report().unwrap().rows, 2);

        assert!(session.load(b"a,b\n\"open,1\n").is_err());
        assert!(session.frame().is_none());
        assert!(session.report().is_none());
    }
}
