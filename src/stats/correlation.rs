//! Pairwise Pearson correlation among numeric columns.

use serde::Serialize;

use crate::column::Float64Column;
use crate::dataframe::DataFrame;
use crate::stats::{descriptive, same_value, Summary};

/// Square, symmetric correlation matrix indexed by numeric column names.
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationMatrix {
    /// Numeric column names in encounter order.
    pub columns: Vec<String>,
    /// `values[i][j]` is the correlation of `columns[i]` with `columns[j]`.
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Correlation between two columns by name.
    pub fn get(&self, row: &str, col: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == row)?;
        let j = self.columns.iter().position(|c| c == col)?;
        Some(self.values[i][j])
    }

    /// Number of columns (and rows) of the matrix.
    pub fn size(&self) -> usize {
        self.columns.len()
    }
}

// undefined entries compare equal to each other
impl PartialEq for CorrelationMatrix {
    fn eq(&self, other: &Self) -> bool {
        self.columns == other.columns
            && self.values.len() == other.values.len()
            && self
                .values
                .iter()
                .zip(&other.values)
                .all(|(a, b)| a.len() == b.len() && a.iter().zip(b).all(|(&x, &y)| same_value(x, y)))
    }
}

/// Computes the correlation matrix of the numeric columns of `df`.
///
/// Each pair uses only the rows where both columns are present. A pair with
/// fewer than two such rows, or with zero variance on either side, is NaN.
/// Returns [`Summary::Empty`] when there are fewer than two numeric columns.
pub fn correlate(df: &DataFrame) -> Summary<CorrelationMatrix> {
    let numeric = df.numeric_columns();
    if numeric.len() < 2 {
        return Summary::Empty;
    }

    let n = numeric.len();
    let mut values = vec![vec![f64::NAN; n]; n];
    for i in 0..n {
        let (_, col_i) = numeric[i];
        values[i][i] = if col_i.null_count() < col_i.len() {
            1.0
        } else {
            f64::NAN
        };
        for j in (i + 1)..n {
            let (x, y) = pairwise_complete(col_i, numeric[j].1);
            let r = descriptive::correlation_impl(&x, &y);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Summary::Table(CorrelationMatrix {
        columns: numeric.iter().map(|(name, _)| name.to_string()).collect(),
        values,
    })
}

/// Values of the rows where both columns are non-missing.
fn pairwise_complete(a: &Float64Column, b: &Float64Column) -> (Vec<f64>, Vec<f64>) {
    a.iter()
        .zip(b.iter())
        .filter_map(|(x, y)| Some((x.into_option()?, y.into_option()?)))
        .unzip()
}
