// 記述統計モジュール
//
// 欠損を取り除いた値のスライスに対する統計量。
// 定義できない統計量はエラーではなくNaNを返す。

use crate::stats::DescriptiveStats;

/// 記述統計量を計算する内部実装
pub(crate) fn describe_impl(data: &[f64]) -> DescriptiveStats {
    let count = data.len();

    // データをソートして最小値・最大値・中央値を求める
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    DescriptiveStats {
        count,
        mean: mean_impl(data),
        median: median_sorted(&sorted),
        std: std_impl(data),
        min: sorted.first().copied().unwrap_or(f64::NAN),
        max: sorted.last().copied().unwrap_or(f64::NAN),
        skewness: skewness_impl(data),
        kurtosis: kurtosis_impl(data),
    }
}

/// 平均値
pub(crate) fn mean_impl(data: &[f64]) -> f64 {
    if data.is_empty() {
        return f64::NAN;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// ソート済みデータの中央値（偶数件なら中央2つの平均）
fn median_sorted(sorted: &[f64]) -> f64 {
    let count = sorted.len();
    if count == 0 {
        return f64::NAN;
    }
    if count % 2 == 0 {
        (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
    } else {
        sorted[count / 2]
    }
}

/// すべて同じ値かどうか
fn is_constant(data: &[f64]) -> bool {
    match data.first() {
        Some(&first) => data.iter().all(|&v| v == first),
        None => true,
    }
}

/// 平均からの偏差のk乗和
fn central_sum(data: &[f64], mean: f64, k: i32) -> f64 {
    data.iter().map(|&x| (x - mean).powi(k)).sum::<f64>()
}

/// 標準偏差（不偏推定量、n-1で割る）
///
/// 2件未満、または値が1種類しかない場合はNaN。
pub(crate) fn std_impl(data: &[f64]) -> f64 {
    let count = data.len();
    if count < 2 || is_constant(data) {
        return f64::NAN;
    }
    let mean = mean_impl(data);
    (central_sum(data, mean, 2) / (count - 1) as f64).sqrt()
}

/// 歪度（バイアス補正済みのFisher-Pearson係数）
///
/// 3件未満、または分散がゼロの場合はNaN。
pub(crate) fn skewness_impl(data: &[f64]) -> f64 {
    if data.len() < 3 || is_constant(data) {
        return f64::NAN;
    }

    let n = data.len() as f64;
    let mean = mean_impl(data);
    let m2 = central_sum(data, mean, 2) / n;
    let m3 = central_sum(data, mean, 3) / n;
    let g1 = m3 / m2.powf(1.5);

    g1 * (n * (n - 1.0)).sqrt() / (n - 2.0)
}

/// 尖度（バイアス補正済みの超過尖度、正規分布で0）
///
/// 4件未満、または分散がゼロの場合はNaN。
pub(crate) fn kurtosis_impl(data: &[f64]) -> f64 {
    if data.len() < 4 || is_constant(data) {
        return f64::NAN;
    }

    let n = data.len() as f64;
    let mean = mean_impl(data);
    let m2 = central_sum(data, mean, 2) / n;
    let m4 = central_sum(data, mean, 4) / n;
    let g2 = m4 / (m2 * m2) - 3.0;

    ((n - 1.0) / ((n - 2.0) * (n - 3.0))) * ((n + 1.0) * g2 + 6.0)
}

/// 相関係数を計算する内部実装
///
/// 長さの異なる入力、2件未満、分散ゼロの場合はNaN。
pub(crate) fn correlation_impl(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len();
    // 分散ゼロ（定数列）は浮動小数点誤差に関係なく未定義
    if n != y.len() || n < 2 || is_constant(x) || is_constant(y) {
        return f64::NAN;
    }

    let mean_x = mean_impl(x);
    let mean_y = mean_impl(y);

    // 分子: Σ(xi - x̄)(yi - ȳ)
    let numerator = x
        .iter()
        .zip(y.iter())
        .map(|(&xi, &yi)| (xi - mean_x) * (yi - mean_y))
        .sum::<f64>();

    // 分母: √[Σ(xi - x̄)² * Σ(yi - ȳ)²]
    let sum_squared_diff_x = central_sum(x, mean_x, 2);
    let sum_squared_diff_y = central_sum(y, mean_y, 2);

    if sum_squared_diff_x == 0.0 || sum_squared_diff_y == 0.0 {
        return f64::NAN;
    }

    let denominator = (sum_squared_diff_x * sum_squared_diff_y).sqrt();
    (numerator / denominator).clamp(-1.0, 1.0)
}
