use std::collections::HashMap;
use std::sync::Arc;

use crate::column::common::BitMask;
use crate::na::NA;

/// 文字列型の列を表す構造体（辞書エンコーディング）
///
/// `categories` は欠損以外の値を初出順に保持し、各行は
/// そのインデックスを `codes` に持つ。欠損行のコードは使われない。
#[derive(Debug, Clone)]
pub struct StringColumn {
    pub(crate) categories: Arc<[String]>,
    pub(crate) codes: Arc<[u32]>,
    pub(crate) null_mask: Option<BitMask>,
}

impl StringColumn {
    /// 文字列ベクトルから新しいStringColumnを作成する
    pub fn new(data: Vec<String>) -> Self {
        Self::from_options(data.into_iter().map(Some).collect())
    }

    /// Option値のベクトルから1パスで作成する（Noneが欠損）
    pub fn from_options(values: Vec<Option<String>>) -> Self {
        let mut unique_strings: Vec<String> = Vec::new();
        let mut str_to_idx: HashMap<String, u32> = HashMap::new();
        let mut codes = Vec::with_capacity(values.len());
        let mut nulls = Vec::with_capacity(values.len());

        for value in values {
            match value {
                Some(s) => {
                    let idx = match str_to_idx.get(&s) {
                        Some(&idx) => idx,
                        None => {
                            let idx = unique_strings.len() as u32;
                            str_to_idx.insert(s.clone(), idx);
                            unique_strings.push(s);
                            idx
                        }
                    };
                    codes.push(idx);
                    nulls.push(false);
                }
                None => {
                    codes.push(0);
                    nulls.push(true);
                }
            }
        }

        let null_mask = if nulls.iter().any(|&is_null| is_null) {
            Some(BitMask::from_bools(&nulls))
        } else {
            None
        };

        Self {
            categories: unique_strings.into(),
            codes: codes.into(),
            null_mask,
        }
    }

    /// 列の長さ
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// 列が空かどうか
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
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

    /// インデックスで文字列を取得する（範囲外も欠損として扱う）
    pub fn get(&self, index: usize) -> NA<&str> {
        if self.is_null(index) {
            return NA::NA;
        }
        self.codes
            .get(index)
            .and_then(|&code| self.categories.get(code as usize))
            .map(String::as_str)
            .into()
    }

    /// 全セルを順に返すイテレータ
    pub fn iter(&self) -> impl Iterator<Item = NA<&str>> + '_ {
        (0..self.len()).map(move |i| self.get(i))
    }

    /// 欠損以外の異なる値（初出順）
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// 異なる値の数
    pub fn unique_count(&self) -> usize {
        self.categories.len()
    }

    /// 値ごとの出現回数（初出順）
    pub fn value_counts(&self) -> Vec<(&str, usize)> {
        let mut counts = vec![0usize; self.categories.len()];
        for (i, &code) in self.codes.iter().enumerate() {
            if !self.is_null(i) {
                counts[code as usize] += 1;
            }
        }
        self.categories
            .iter()
            .map(String::as_str)
            .zip(counts)
            .collect()
    }

    /// 先頭n行だけの列を作成する
    pub fn head(&self, n: usize) -> Self {
        let n = n.min(self.len());
        Self::from_options(
            (0..n)
                .map(|i| self.get(i).map(|s| s.to_string()).into_option())
                .collect(),
        )
    }
}
