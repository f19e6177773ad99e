// 統計モジュール
//
// 読み込んだDataFrameに対する記述統計（数値列・カテゴリ列の要約）と
// 数値列間の相関行列を提供します。どの計算も純粋関数で、
// 同じDataFrameに対しては常に同じ結果を返します。

pub mod correlation;
pub mod descriptive;
pub mod summary;

use serde::{Serialize, Serializer};

pub use correlation::{correlate, CorrelationMatrix};
pub use summary::{
    summarize_categorical, summarize_numeric, CategoricalSummary, CategoricalSummaryRow,
    NumericSummary, NumericSummaryRow,
};

/// データの基本統計量を計算
///
/// # 説明
/// 欠損を取り除いた数値スライスに対して、平均・中央値・標準偏差・
/// 最小値・最大値・歪度・尖度を計算します。定義できない値はNaNです。
///
/// # 例
/// ```rust
/// use pandrs_eda::stats;
///
/// let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
/// let stats = stats::describe(&data);
/// assert_eq!(stats.mean, 3.0);
/// assert_eq!(stats.median, 3.0);
/// ```
pub fn describe<T: AsRef<[f64]>>(data: T) -> DescriptiveStats {
    descriptive::describe_impl(data.as_ref())
}

/// 記述統計量の結果を保持する構造体
#[derive(Debug, Clone, Serialize)]
pub struct DescriptiveStats {
    /// データの件数
    pub count: usize,
    /// 平均値
    pub mean: f64,
    /// 中央値
    pub median: f64,
    /// 標準偏差（不偏推定量）
    pub std: f64,
    /// 最小値
    pub min: f64,
    /// 最大値
    pub max: f64,
    /// 歪度
    pub skewness: f64,
    /// 尖度（超過尖度）
    pub kurtosis: f64,
}

// NaN同士も等しいとみなす
impl PartialEq for DescriptiveStats {
    fn eq(&self, other: &Self) -> bool {
        self.count == other.count
            && same_value(self.mean, other.mean)
            && same_value(self.median, other.median)
            && same_value(self.std, other.std)
            && same_value(self.min, other.min)
            && same_value(self.max, other.max)
            && same_value(self.skewness, other.skewness)
            && same_value(self.kurtosis, other.kurtosis)
    }
}

/// 2つの統計量が同じかどうか（未定義のNaN同士は同じとみなす）
pub(crate) fn same_value(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

/// 相関係数を計算
///
/// # 説明
/// 2つの数値配列間のピアソン相関係数を計算します。
/// 長さが異なる場合、2件未満の場合、分散がゼロの場合はNaNです。
///
/// # 例
/// ```rust
/// use pandrs_eda::stats;
///
/// let x = vec![1.0, 2.0, 3.0, 4.0, 5.0];
/// let y = vec![2.0, 4.0, 6.0, 8.0, 10.0];
/// let corr = stats::correlation(&x, &y);
/// assert!((corr - 1.0).abs() < 1e-10);
/// ```
pub fn correlation<T: AsRef<[f64]>, U: AsRef<[f64]>>(x: T, y: U) -> f64 {
    descriptive::correlation_impl(x.as_ref(), y.as_ref())
}

/// 集計結果。対象となる列がない場合は `Empty` で、エラーではない
#[derive(Debug, Clone, PartialEq)]
pub enum Summary<T> {
    /// 対象の列がない
    Empty,
    /// 集計表
    Table(T),
}

impl<T> Summary<T> {
    /// 空かどうか
    pub fn is_empty(&self) -> bool {
        matches!(self, Summary::Empty)
    }

    /// 集計表を参照する
    pub fn as_table(&self) -> Option<&T> {
        match self {
            Summary::Table(table) => Some(table),
            Summary::Empty => None,
        }
    }

    /// 集計表を取り出す
    pub fn into_table(self) -> Option<T> {
        match self {
            Summary::Table(table) => Some(table),
            Summary::Empty => None,
        }
    }
}

// JSONでは空の集計をnullとして出力する
impl<T: Serialize> Serialize for Summary<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Summary::Table(table) => serializer.serialize_some(table),
            Summary::Empty => serializer.serialize_none(),
        }
    }
}
