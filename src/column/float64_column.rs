use std::sync::Arc;

use crate::column::common::BitMask;
use crate::na::NA;

/// Float64型の列を表す構造体
#[derive(Debug, Clone)]
pub struct Float64Column {
    pub(crate) data: Arc<[f64]>,
    pub(crate) null_mask: Option<BitMask>,
}

impl Float64Column {
    /// 新しいFloat64Columnを作成する
    pub fn new(data: Vec<f64>) -> Self {
        Self {
            data: data.into(),
            null_mask: None,
        }
    }

    /// NULL値を含むFloat64Columnを作成する
    pub fn with_nulls(data: Vec<f64>, nulls: Vec<bool>) -> Self {
        let null_mask = if nulls.iter().any(|&is_null| is_null) {
            Some(BitMask::from_bools(&nulls))
        } else {
            None
        };

        Self {
            data: data.into(),
            null_mask,
        }
    }

    /// Option値のベクトルから作成する（Noneが欠損）
    pub fn from_options(values: Vec<Option<f64>>) -> Self {
        let nulls: Vec<bool> = values.iter().map(Option::is_none).collect();
        let data: Vec<f64> = values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect();
        Self::with_nulls(data, nulls)
    }

    /// 列の長さ
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// 列が空かどうか
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// 位置が欠損かどうか
    pub fn is_null(&self, index: usize) -> bool {
        self.null_mask
            .as_ref()
            .map(|mask| mask.is_set(index))
            .unwrap_or(false)
    }

    /// 欠損セルの数
    pub fn null_count(&self) -> usize {
        self.null_mask.as_ref().map(BitMask::count_set).unwrap_or(0)
    }

    /// インデックスでデータを取得する（範囲外も欠損として扱う）
    pub fn get(&self, index: usize) -> NA<f64> {
        match self.data.get(index) {
            Some(&v) if !self.is_null(index) => NA::Value(v),
            _ => NA::NA,
        }
    }

    /// 全セルを順に返すイテレータ
    pub fn iter(&self) -> impl Iterator<Item = NA<f64>> + '_ {
        (0..self.len()).map(move |i| self.get(i))
    }

    /// 欠損を除いた値（行の順序のまま）
    pub fn valid_values(&self) -> Vec<f64> {
        self.iter().filter_map(NA::into_option).collect()
    }

    /// 先頭n行だけの列を作成する
    pub fn head(&self, n: usize) -> Self {
        let n = n.min(self.len());
        Self {
            data: self.data[..n].to_vec().into(),
            null_mask: self.null_mask.as_ref().map(|mask| mask.head(n)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float64_column_nulls() {
        let col = Float64Column::from_options(vec![Some(1.0), None, Some(3.5)]);
        assert_eq!(col.len(), 3);
        assert_eq!(col.null_count(), 1);
        assert_eq!(col.get(0), NA::Value(1.0));
        assert!(col.get(1).is_na());
        assert!(col.get(10).is_na());
        assert_eq!(col.valid_values(), vec![1.0, 3.5]);
    }

    #[test]
    fn test_float64_column_head() {
        let col = Float64Column::from_options(vec![None, Some(2.0), Some(3.0)]);
        let head = col.head(2);
        assert_eq!(head.len(), 2);
        assert!(head.get(0).is_na());
        assert_eq!(head.get(1), NA::Value(2.0));

        let all = Float64Column::new(vec![1.0]).head(5);
        assert_eq!(all.len(), 1);
        assert_eq!(all.null_count(), 0);
    }
}
