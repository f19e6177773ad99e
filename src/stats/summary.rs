//! Column summaries for numeric and categorical columns.
//!
//! Missing cells never take part in a summary: they are neither a category
//! nor a zero. Empty columns (all cells missing) are left out of both tables.

use serde::Serialize;

use crate::dataframe::DataFrame;
use crate::stats::{describe, DescriptiveStats, Summary};

/// Summary statistics of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummaryRow {
    pub column: String,
    #[serde(flatten)]
    pub stats: DescriptiveStats,
}

/// One row per numeric column, in column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    pub rows: Vec<NumericSummaryRow>,
}

impl NumericSummary {
    /// Looks up the row of a column by name.
    pub fn get(&self, column: &str) -> Option<&NumericSummaryRow> {
        self.rows.iter().find(|row| row.column == column)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Frequency summary of one categorical column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoricalSummaryRow {
    pub column: String,
    /// Number of non-missing cells.
    pub count: usize,
    /// Number of distinct non-missing values.
    pub unique: usize,
    pub most_common: String,
    pub most_common_count: usize,
    pub least_common: String,
    pub least_common_count: usize,
}

/// One row per categorical column, in column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoricalSummary {
    pub rows: Vec<CategoricalSummaryRow>,
}

impl CategoricalSummary {
    /// Looks up the row of a column by name.
    pub fn get(&self, column: &str) -> Option<&CategoricalSummaryRow> {
        self.rows.iter().find(|row| row.column == column)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Summarizes every numeric column of `df`.
///
/// Returns [`Summary::Empty`] when the frame has no numeric column.
pub fn summarize_numeric(df: &DataFrame) -> Summary<NumericSummary> {
    let rows: Vec<NumericSummaryRow> = df
        .numeric_columns()
        .into_iter()
        .map(|(name, col)| NumericSummaryRow {
            column: name.to_string(),
            stats: describe(col.valid_values()),
        })
        .collect();

    if rows.is_empty() {
        Summary::Empty
    } else {
        Summary::Table(NumericSummary { rows })
    }
}

/// Summarizes every categorical column of `df`.
///
/// Frequency ties resolve to the value encountered first in the column, for
/// both the most and the least common value. Returns [`Summary::Empty`] when
/// the frame has no categorical column.
pub fn summarize_categorical(df: &DataFrame) -> Summary<CategoricalSummary> {
    let rows: Vec<CategoricalSummaryRow> = df
        .categorical_columns()
        .into_iter()
        .filter_map(|(name, col)| {
            let counts = col.value_counts();
            let (most_common, most_common_count) = pick_first(&counts, |c, best| c > best)?;
            let (least_common, least_common_count) = pick_first(&counts, |c, best| c < best)?;
            Some(CategoricalSummaryRow {
                column: name.to_string(),
                count: counts.iter().map(|(_, c)| c).sum(),
                unique: counts.len(),
                most_common: most_common.to_string(),
                most_common_count,
                least_common: least_common.to_string(),
                least_common_count,
            })
        })
        .collect();

    if rows.is_empty() {
        Summary::Empty
    } else {
        Summary::Table(CategoricalSummary { rows })
    }
}

/// Picks the first entry that beats every earlier one under `better`.
fn pick_first<'a>(
    counts: &[(&'a str, usize)],
    better: impl Fn(usize, usize) -> bool,
) -> Option<(&'a str, usize)> {
    let mut best: Option<(&'a str, usize)> = None;
    for &(value, count) in counts {
        match best {
            Some((_, best_count)) if !better(count, best_count) => {}
            _ => best = Some((value, count)),
        }
    }
    best
}
