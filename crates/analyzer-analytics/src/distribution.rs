//! 일간 수익률 분포 분석.
//!
//! 히스토그램(구간 경계 포함), 왜도, 첨도(초과 첨도)를 계산합니다.
//! 적률은 모두 모집단 기준이며 표준편차가 0이면 왜도/첨도는 0입니다.

use serde::{Deserialize, Serialize};

use analyzer_core::{BinningPolicy, Series};

use crate::performance::daily_returns;
use crate::statistics::{central_moment, finite_or_zero, mean, median, population_std_dev};

/// 히스토그램.
///
/// `edges.len() == counts.len() + 1`이며, 비어 있으면 둘 다 빈 벡터입니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    /// 구간별 관측 수
    pub counts: Vec<usize>,
    /// 구간 경계 (오름차순)
    pub edges: Vec<f64>,
}

impl Histogram {
    /// 값들을 주어진 방식으로 구간화합니다.
    ///
    /// - 값이 없으면 빈 히스토그램
    /// - 모든 값이 같으면 `[min, max]` 한 구간
    /// - 구간 번호는 `floor((v - start) / step)`을 `[0, 구간 수 - 1]`로 자른 값
    pub fn build(values: &[f64], target_bins: usize, policy: BinningPolicy) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let range = max - min;

        if !range.is_finite() || range <= 0.0 {
            return Self {
                counts: vec![values.len()],
                edges: vec![min, max],
            };
        }

        let bins = target_bins.max(1);
        let step = range / bins as f64;

        let (start, num_bins) = match policy {
            BinningPolicy::ZeroAnchored => {
                let start = (min / step).floor() * step;
                let end = (max / step).ceil() * step;
                let num_bins = (((end - start) / step).round() as usize).max(1);
                (start, num_bins)
            }
            BinningPolicy::EqualWidth => (min, bins),
        };

        let mut edges: Vec<f64> = (0..=num_bins).map(|i| start + i as f64 * step).collect();
        if policy == BinningPolicy::EqualWidth {
            // 누적 오차로 max가 마지막 경계를 넘지 않도록 고정
            edges[num_bins] = max;
        }

        let mut counts = vec![0usize; num_bins];
        for value in values {
            let raw = ((value - start) / step).floor();
            let index = if raw.is_nan() || raw < 0.0 {
                0
            } else {
                (raw as usize).min(num_bins - 1)
            };
            counts[index] += 1;
        }

        Self { counts, edges }
    }
}

/// 수익률 분포 분석 결과.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DistributionResult {
    /// 구간별 관측 수
    pub histogram: Vec<usize>,
    /// 구간 경계 (길이 = 히스토그램 길이 + 1)
    pub bin_edges: Vec<f64>,
    /// 왜도 (모집단 3차 표준화 적률)
    pub skewness: f64,
    /// 초과 첨도 (모집단 4차 표준화 적률 - 3)
    pub kurtosis: f64,
    /// 평균 일간 수익률
    pub mean: f64,
    /// 일간 수익률 중앙값
    pub median: f64,
}

impl DistributionResult {
    /// 시계열의 일간 수익률 분포를 계산합니다.
    pub fn from_series(series: &Series, target_bins: usize, policy: BinningPolicy) -> Self {
        let returns = daily_returns(&series.closes_f64());
        Self::from_returns(&returns, target_bins, policy)
    }

    /// 미리 계산한 일간 수익률로 분포를 계산합니다.
    pub fn from_returns(returns: &[f64], target_bins: usize, policy: BinningPolicy) -> Self {
        if returns.is_empty() {
            return Self::default();
        }

        let histogram = Histogram::build(returns, target_bins, policy);

        Self {
            histogram: histogram.counts,
            bin_edges: histogram.edges,
            skewness: skewness(returns),
            kurtosis: kurtosis(returns),
            mean: finite_or_zero(mean(returns)),
            median: finite_or_zero(median(returns)),
        }
    }
}

/// 왜도 `E[(r-μ)³] / σ³`. σ가 0이거나 비어 있으면 0.
pub fn skewness(values: &[f64]) -> f64 {
    let std_dev = population_std_dev(values);
    if values.is_empty() || std_dev == 0.0 {
        return 0.0;
    }
    finite_or_zero(central_moment(values, mean(values), 3) / std_dev.powi(3))
}

/// 초과 첨도 `E[(r-μ)⁴] / σ⁴ - 3`. σ가 0이거나 비어 있으면 0.
pub fn kurtosis(values: &[f64]) -> f64 {
    let std_dev = population_std_dev(values);
    if values.is_empty() || std_dev == 0.0 {
        return 0.0;
    }
    finite_or_zero(central_moment(values, mean(values), 4) / std_dev.powi(4) - 3.0)
}
