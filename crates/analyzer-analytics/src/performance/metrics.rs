//! 수익률/리스크 지표 계산 모듈
//!
//! 일봉 종가 시계열에서 대시보드 통계 카드의 지표를 계산합니다:
//! - 총 수익률, 연율화 수익률
//! - 연율화 변동성 (단순 수익률 / 로그 수익률)
//! - 샤프 비율 (Sharpe Ratio): 위험 대비 초과 수익
//! - 소르티노 비율 (Sortino Ratio): 하방 위험 대비 수익
//! - 최대/평균/현재 낙폭
//! - 95% VaR (Value at Risk)
//!
//! 종가가 2개 미만이면 모든 지표가 0입니다.
//!
//! # 사용 예시
//!
//! ```
//! use analyzer_analytics::performance::{daily_returns, MetricsResult, DEFAULT_RISK_FREE_RATE};
//!
//! let closes = [100.0, 110.0, 99.0];
//! let returns = daily_returns(&closes);
//!
//! let metrics = MetricsResult::from_parts(&closes, &returns, DEFAULT_RISK_FREE_RATE);
//! assert!((metrics.total_return_pct + 1.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

use analyzer_core::Series;

use super::drawdown::DrawdownStats;
use super::returns::{daily_returns, log_returns, total_return_pct};
use crate::statistics::{finite_or_zero, mean, population_std_dev};

/// 연간 거래일 수 (연율화 계산에 사용)
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// 기본 무위험 이자율 (연간, 0.04 = 4%)
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.04;

/// VaR 신뢰수준에 대응하는 하위 분위 (95% → 5%)
const VAR_95_QUANTILE: f64 = 0.05;

/// 수익률/리스크 지표 스냅샷.
///
/// 퍼센트 필드는 `_pct` 접미사가 붙으며 5.0 = 5%입니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsResult {
    /// 마지막 종가
    pub current_price: f64,
    /// 총 수익률 (%)
    pub total_return_pct: f64,
    /// 연율화 수익률 (평균 일간 수익률 × 252, %)
    pub annualized_return_pct: f64,
    /// 연율화 변동성 (단순 수익률, %)
    pub volatility_pct: f64,
    /// 연율화 변동성 (로그 수익률, %)
    pub log_volatility_pct: f64,
    /// 샤프 비율
    pub sharpe_ratio: f64,
    /// 소르티노 비율
    pub sortino_ratio: f64,
    /// 최대 낙폭 (%, ≤ 0)
    pub max_drawdown_pct: f64,
    /// 평균 낙폭 (%, ≤ 0)
    pub avg_drawdown_pct: f64,
    /// 현재 낙폭 (%, ≤ 0)
    pub current_drawdown_pct: f64,
    /// 95% VaR (일간 수익률의 5% 분위, %)
    pub var_95_pct: f64,
    /// 일간 수익률 개수
    pub observations: usize,
}

impl MetricsResult {
    /// 시계열에서 지표를 계산합니다.
    pub fn from_series(series: &Series, risk_free_rate: f64) -> Self {
        let closes = series.closes_f64();
        let returns = daily_returns(&closes);
        Self::from_parts(&closes, &returns, risk_free_rate)
    }

    /// 미리 계산한 일간 수익률로 지표를 계산합니다.
    ///
    /// `returns`는 `closes`에서 [`daily_returns`]로 만든 값이어야 합니다.
    pub fn from_parts(closes: &[f64], returns: &[f64], risk_free_rate: f64) -> Self {
        let current_price = closes.last().copied().unwrap_or(0.0);
        if closes.len() < 2 {
            return Self {
                current_price,
                ..Self::default()
            };
        }

        let drawdown = DrawdownStats::from_closes(closes);

        Self {
            current_price,
            total_return_pct: total_return_pct(closes),
            annualized_return_pct: finite_or_zero(annualized_return(returns) * 100.0),
            volatility_pct: finite_or_zero(annualized_volatility(returns) * 100.0),
            log_volatility_pct: finite_or_zero(annualized_volatility(&log_returns(closes)) * 100.0),
            sharpe_ratio: sharpe_ratio(returns, risk_free_rate),
            sortino_ratio: sortino_ratio(returns),
            max_drawdown_pct: drawdown.max_drawdown_pct,
            avg_drawdown_pct: drawdown.avg_drawdown_pct,
            current_drawdown_pct: drawdown.current_drawdown_pct,
            var_95_pct: value_at_risk_95(returns) * 100.0,
            observations: returns.len(),
        }
    }
}

/// 연율화 수익률 (비율) = 평균 일간 수익률 × 252.
pub fn annualized_return(returns: &[f64]) -> f64 {
    mean(returns) * TRADING_DAYS_PER_YEAR
}

/// 연율화 변동성 (비율) = 모집단 표준편차 × √252.
pub fn annualized_volatility(returns: &[f64]) -> f64 {
    population_std_dev(returns) * TRADING_DAYS_PER_YEAR.sqrt()
}

/// 샤프 비율을 계산합니다.
///
/// # 계산 공식
///
/// Sharpe = (연율화 수익률 - 무위험 이자율) / 연율화 변동성
///
/// 수익률이 없거나 변동성이 0이면 0입니다.
pub fn sharpe_ratio(returns: &[f64], risk_free_rate: f64) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }

    let volatility = annualized_volatility(returns);
    if volatility == 0.0 {
        return 0.0;
    }

    finite_or_zero((annualized_return(returns) - risk_free_rate) / volatility)
}

/// 소르티노 비율을 계산합니다.
///
/// # 계산 공식
///
/// Sortino = 연율화 수익률 / (하방 편차 × √252)
///
/// 하방 편차 = √(Σ 음수 수익률² / 전체 수익률 개수). 음수 일수가 아니라
/// 전체 개수로 나눕니다. 하방 편차가 0이면 0입니다.
pub fn sortino_ratio(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }

    let downside_squared: f64 = returns.iter().filter(|r| **r < 0.0).map(|r| r * r).sum();
    let downside_dev = (downside_squared / returns.len() as f64).sqrt();
    let annualized_downside = downside_dev * TRADING_DAYS_PER_YEAR.sqrt();

    if annualized_downside == 0.0 {
        return 0.0;
    }

    finite_or_zero(annualized_return(returns) / annualized_downside)
}

/// 95% VaR (비율).
///
/// 오름차순 정렬한 일간 수익률의 `floor(n × 0.05)`번째 값입니다.
pub fn value_at_risk_95(returns: &[f64]) -> f64 {
    let mut sorted = returns.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let index = (sorted.len() as f64 * VAR_95_QUANTILE).floor() as usize;
    sorted.get(index).copied().map(finite_or_zero).unwrap_or(0.0)
}
