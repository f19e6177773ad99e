use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::column::{Float64Column, StringColumn};
use crate::na::NA;

/// 列の種類（読み込み時に推論される）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// 欠損以外のすべてのセルが数値として解釈できる列
    Numeric,
    /// 数値として解釈できないセルを含む列
    Categorical,
    /// すべてのセルが欠損している列（どの集計にも含まれない）
    Empty,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Numeric => write!(f, "numeric"),
            ColumnKind::Categorical => write!(f, "categorical"),
            ColumnKind::Empty => write!(f, "empty"),
        }
    }
}

/// 欠損値を追跡するビットマスク（ビットが立っている位置が欠損）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitMask {
    pub(crate) data: Arc<[u8]>,
    pub(crate) len: usize,
}

impl BitMask {
    /// ブール値のベクトルからビットマスクを作成する
    pub fn from_bools(bools: &[bool]) -> Self {
        let length = bools.len();
        let bytes_needed = (length + 7) / 8;
        let mut data = vec![0u8; bytes_needed];

        for (i, &is_set) in bools.iter().enumerate() {
            if is_set {
                data[i / 8] |= 1 << (i % 8);
            }
        }

        Self {
            data: data.into(),
            len: length,
        }
    }

    /// ビットが設定されているかどうかを確認する（範囲外はfalse）
    pub fn is_set(&self, index: usize) -> bool {
        if index >= self.len {
            return false;
        }
        (self.data[index / 8] & (1 << (index % 8))) != 0
    }

    /// 設定されているビットの数
    pub fn count_set(&self) -> usize {
        (0..self.len).filter(|&i| self.is_set(i)).count()
    }

    /// 先頭n件だけのビットマスクを作成する
    pub fn head(&self, n: usize) -> Self {
        let n = n.min(self.len);
        let bools: Vec<bool> = (0..n).map(|i| self.is_set(i)).collect();
        Self::from_bools(&bools)
    }

    /// ビットマスクの長さを返す
    pub fn len(&self) -> usize {
        self.len
    }

    /// ビットマスクが空かどうかを返す
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// 列を表す列挙型
#[derive(Debug, Clone)]
pub enum Column {
    Numeric(Float64Column),
    Categorical(StringColumn),
    /// 全セル欠損の列。長さだけを保持する
    Empty(usize),
}

impl Column {
    /// 列の長さを返す
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(col) => col.len(),
            Column::Categorical(col) => col.len(),
            Column::Empty(len) => *len,
        }
    }

    /// 列が空かどうかを返す
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 列の種類を返す
    pub fn kind(&self) -> ColumnKind {
        match self {
            Column::Numeric(_) => ColumnKind::Numeric,
            Column::Categorical(_) => ColumnKind::Categorical,
            Column::Empty(_) => ColumnKind::Empty,
        }
    }

    /// 数値列として取得する
    pub fn as_numeric(&self) -> Option<&Float64Column> {
        match self {
            Column::Numeric(col) => Some(col),
            _ => None,
        }
    }

    /// カテゴリ列として取得する
    pub fn as_categorical(&self) -> Option<&StringColumn> {
        match self {
            Column::Categorical(col) => Some(col),
            _ => None,
        }
    }

    /// 欠損でないセルの数
    pub fn non_missing_count(&self) -> usize {
        match self {
            Column::Numeric(col) => col.len() - col.null_count(),
            Column::Categorical(col) => col.len() - col.null_count(),
            Column::Empty(_) => 0,
        }
    }

    /// 位置からセルを文字列として取得する（表示・CSV出力用）
    pub fn cell_string(&self, index: usize) -> NA<String> {
        match self {
            Column::Numeric(col) => col.get(index).map(|v| v.to_string()),
            Column::Categorical(col) => col.get(index).map(|s| s.to_string()),
            Column::Empty(_) => NA::NA,
        }
    }

    /// 先頭n行だけの列を作成する
    pub fn head(&self, n: usize) -> Self {
        match self {
            Column::Numeric(col) => Column::Numeric(col.head(n)),
            Column::Categorical(col) => Column::Categorical(col.head(n)),
            Column::Empty(len) => Column::Empty((*len).min(n)),
        }
    }
}

// 型変換のFrom実装
impl From<Float64Column> for Column {
    fn from(col: Float64Column) -> Self {
        Column::Numeric(col)
    }
}

impl From<StringColumn> for Column {
    fn from(col: StringColumn) -> Self {
        Column::Categorical(col)
    }
}
