use std::collections::HashMap;

use crate::column::{Column, ColumnKind, Float64Column, StringColumn};
use crate::error::{Error, Result};

/// 列指向のデータフレーム
///
/// 名前付きの列を順序付きで保持する。列名は一意で、
/// すべての列は同じ行数を持つ。読み込み後は変更されない。
#[derive(Debug, Clone, Default)]
pub struct DataFrame {
    columns: Vec<Column>,
    column_names: Vec<String>,
    column_map: HashMap<String, usize>,
    row_count: usize,
}

impl DataFrame {
    /// 空のDataFrameを作成する
    pub fn new() -> Self {
        Self::default()
    }

    /// 列を追加する
    pub fn add_column(&mut self, name: impl Into<String>, column: impl Into<Column>) -> Result<()> {
        let name = name.into();
        let column = column.into();

        if self.column_map.contains_key(&name) {
            return Err(Error::DuplicateColumnName(name));
        }

        // 最初の列で行数が決まる
        if self.columns.is_empty() {
            self.row_count = column.len();
        } else if column.len() != self.row_count {
            return Err(Error::InconsistentRowCount {
                expected: self.row_count,
                found: column.len(),
            });
        }

        self.column_map.insert(name.clone(), self.columns.len());
        self.column_names.push(name);
        self.columns.push(column);
        Ok(())
    }

    /// 行数を取得する
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// 列数を取得する
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// (行数, 列数)
    pub fn shape(&self) -> (usize, usize) {
        (self.row_count, self.columns.len())
    }

    /// 列が1つもないかどうか
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// 列名を順に取得する
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// 列が存在するか確認する
    pub fn contains_column(&self, name: &str) -> bool {
        self.column_map.contains_key(name)
    }

    /// 名前で列を取得する
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.column_map
            .get(name)
            .map(|&idx| &self.columns[idx])
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }

    /// (列名, 列) を列の順序で返す
    pub fn columns(&self) -> impl Iterator<Item = (&str, &Column)> + '_ {
        self.column_names
            .iter()
            .map(String::as_str)
            .zip(self.columns.iter())
    }

    /// 各列の種類
    pub fn schema(&self) -> Vec<(String, ColumnKind)> {
        self.columns()
            .map(|(name, col)| (name.to_string(), col.kind()))
            .collect()
    }

    /// 数値列を列の順序で返す
    pub fn numeric_columns(&self) -> Vec<(&str, &Float64Column)> {
        self.columns()
            .filter_map(|(name, col)| col.as_numeric().map(|c| (name, c)))
            .collect()
    }

    /// カテゴリ列を列の順序で返す
    pub fn categorical_columns(&self) -> Vec<(&str, &StringColumn)> {
        self.columns()
            .filter_map(|(name, col)| col.as_categorical().map(|c| (name, c)))
            .collect()
    }

    /// 先頭n行のDataFrameを作成する
    pub fn head(&self, n: usize) -> Self {
        // 列名と順序はそのまま、各列を同じ長さに切り詰める
        Self {
            columns: self.columns.iter().map(|col| col.head(n)).collect(),
            column_names: self.column_names.clone(),
            column_map: self.column_map.clone(),
            row_count: self.row_count.min(n),
        }
    }

    /// 先頭n行を行指向の文字列として取得する（欠損は "NA"）
    pub fn preview(&self, n: usize) -> Vec<Vec<String>> {
        let rows = n.min(self.row_count);
        (0..rows)
            .map(|row| {
                self.columns
                    .iter()
                    .map(|col| col.cell_string(row).to_string())
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataFrame {
        let mut df = DataFrame::new();
        df.add_column("a", Float64Column::new(vec![1.0, 2.0, 3.0]))
            .unwrap();
        df.add_column(
            "b",
            StringColumn::from_options(vec![Some("x".to_string()), None, Some("x".to_string())]),
        )
        .unwrap();
        df.add_column("c", Column::Empty(3)).unwrap();
        df
    }

    #[test]
    fn test_shape_and_schema() {
        let df = sample();
        assert_eq!(df.shape(), (3, 3));
        assert_eq!(df.column_names(), &["a", "b", "c"]);
        assert_eq!(
            df.schema(),
            vec![
                ("a".to_string(), ColumnKind::Numeric),
                ("b".to_string(), ColumnKind::Categorical),
                ("c".to_string(), ColumnKind::Empty),
            ]
        );
        assert_eq!(df.numeric_columns().len(), 1);
        assert_eq!(df.categorical_columns().len(), 1);
    }

    #[test]
    fn test_add_column_invariants() {
        let mut df = sample();
        let dup = df.add_column("a", Float64Column::new(vec![0.0, 0.0, 0.0]));
        assert!(matches!(dup, Err(Error::DuplicateColumnName(_))));

        let short = df.add_column("d", Float64Column::new(vec![0.0]));
        assert!(matches!(
            short,
            Err(Error::InconsistentRowCount { expected: 3, found: 1 })
        ));
        assert!(matches!(df.column("zzz"), Err(Error::ColumnNotFound(_))));
        assert!(df.contains_column("b"));
        assert!(!df.contains_column("d"));
    }

    #[test]
    fn test_head_and_preview() {
        let df = sample();
        let head = df.head(2);
        assert_eq!(head.shape(), (2, 3));
        assert_eq!(head.schema(), df.schema());
        assert_eq!(head.column("b").unwrap().len(), 2);
        assert_eq!(df.head(10).shape(), (3, 3));
        assert_eq!(df.head(0).shape(), (0, 3));

        let preview = df.preview(5);
        assert_eq!(preview.len(), 3);
        assert_eq!(preview[1], vec!["2", "NA", "NA"]);
    }
}
