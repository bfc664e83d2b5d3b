//! 모멘텀 지표 (Momentum Indicators).
//!
//! 과매수/과매도 상태를 측정하는 오실레이터를 제공합니다.
//! - RSI (Relative Strength Index, Wilder 평활)
//! - Stochastic Oscillator (%K, %D)
//! - Williams %R

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{
    check_period, checked_sum, highest_lowest, CheckedDecimal, IndicatorError, IndicatorResult,
};

/// RSI 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RsiParams {
    /// RSI 기간 (기본: 14).
    pub period: usize,
}

impl Default for RsiParams {
    fn default() -> Self {
        Self { period: 14 }
    }
}

/// 스토캐스틱 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StochasticParams {
    /// %K 기간 (기본: 14).
    pub k_period: usize,
    /// %D 기간 (smoothing, 기본: 3).
    pub d_period: usize,
}

impl Default for StochasticParams {
    fn default() -> Self {
        Self {
            k_period: 14,
            d_period: 3,
        }
    }
}

/// 스토캐스틱 결과.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StochasticResult {
    /// %K (Fast Stochastic).
    pub k: Option<Decimal>,
    /// %D (%K의 단순 이동평균).
    pub d: Option<Decimal>,
}

/// Williams %R 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WilliamsRParams {
    /// 조회 기간 (기본: 14).
    pub period: usize,
}

impl Default for WilliamsRParams {
    fn default() -> Self {
        Self { period: 14 }
    }
}

/// 모멘텀 지표 계산기.
#[derive(Debug, Default)]
pub struct MomentumCalculator;

impl MomentumCalculator {
    /// 새로운 모멘텀 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// RSI (Relative Strength Index) 계산.
    ///
    /// RSI = 100 - (100 / (1 + RS)), RS = 평균 상승폭 / 평균 하락폭
    ///
    /// 첫 평균은 처음 `period`개 변화량의 단순 평균이고, 이후에는
    /// `avg = (avg * (period - 1) + 현재값) / period`로 평활합니다.
    /// 평균 하락폭이 0이면 100입니다.
    ///
    /// # 인자
    /// * `prices` - 가격 데이터 (종가)
    /// * `params` - RSI 파라미터
    ///
    /// # 반환
    /// 0-100 사이의 RSI 값들 (처음 `period`개는 None)
    pub fn rsi(
        &self,
        prices: &[Decimal],
        params: RsiParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        let period = params.period;
        check_period(period)?;

        if prices.len() < period + 1 {
            return Err(IndicatorError::InsufficientData {
                required: period + 1,
                provided: prices.len(),
            });
        }

        let mut gains = Vec::with_capacity(prices.len() - 1);
        let mut losses = Vec::with_capacity(prices.len() - 1);
        for w in prices.windows(2) {
            let delta = w[1].try_sub(w[0])?;
            if delta > Decimal::ZERO {
                gains.push(delta);
                losses.push(Decimal::ZERO);
            } else {
                gains.push(Decimal::ZERO);
                losses.push(-delta);
            }
        }

        let period_dec = Decimal::from(period);
        let mut avg_gain = checked_sum(&gains[..period])? / period_dec;
        let mut avg_loss = checked_sum(&losses[..period])? / period_dec;

        let mut result = vec![None; period];
        result.push(Some(rsi_value(avg_gain, avg_loss)?));

        // gains[i]는 prices[i] -> prices[i + 1] 변화량
        for i in period..gains.len() {
            avg_gain = wilder_average(avg_gain, gains[i], period_dec)?;
            avg_loss = wilder_average(avg_loss, losses[i], period_dec)?;
            result.push(Some(rsi_value(avg_gain, avg_loss)?));
        }

        Ok(result)
    }

    /// 스토캐스틱 오실레이터 계산.
    ///
    /// %K = (현재가 - 최저가) / (최고가 - 최저가) × 100
    /// %D = 최근 `d_period`개 %K의 단순 평균
    ///
    /// 최고가와 최저가가 같으면 %K는 0입니다.
    ///
    /// # 인자
    /// * `high` - 고가 데이터
    /// * `low` - 저가 데이터
    /// * `close` - 종가 데이터
    /// * `params` - 스토캐스틱 파라미터
    ///
    /// # 반환
    /// %K, %D 값들
    pub fn stochastic(
        &self,
        high: &[Decimal],
        low: &[Decimal],
        close: &[Decimal],
        params: StochasticParams,
    ) -> IndicatorResult<Vec<StochasticResult>> {
        check_period(params.k_period)?;
        check_period(params.d_period)?;

        let len = high.len().min(low.len()).min(close.len());
        if len < params.k_period {
            return Err(IndicatorError::InsufficientData {
                required: params.k_period,
                provided: len,
            });
        }

        let mut k_values = vec![None; params.k_period - 1];
        for i in params.k_period - 1..len {
            let start = i + 1 - params.k_period;
            let (highest, lowest) = highest_lowest(&high[start..=i], &low[start..=i]);
            let range = highest.try_sub(lowest)?;
            let k = if range == Decimal::ZERO {
                Decimal::ZERO
            } else {
                close[i].try_sub(lowest)?.try_div(range)?.try_mul(dec!(100))?
            };
            k_values.push(Some(k));
        }

        let first_d = params.k_period + params.d_period - 2;
        let mut result = Vec::with_capacity(len);
        for i in 0..len {
            let d = if i < first_d {
                None
            } else {
                let window = &k_values[i + 1 - params.d_period..=i];
                Some(checked_sum(window.iter().flatten())? / Decimal::from(params.d_period))
            };
            result.push(StochasticResult { k: k_values[i], d });
        }

        Ok(result)
    }

    /// Williams %R 계산.
    ///
    /// %R = (최고가 - 현재가) / (최고가 - 최저가) × -100
    ///
    /// 범위는 -100 ~ 0이며, 최고가와 최저가가 같으면 0입니다.
    pub fn williams_r(
        &self,
        high: &[Decimal],
        low: &[Decimal],
        close: &[Decimal],
        params: WilliamsRParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        let period = params.period;
        check_period(period)?;

        let len = high.len().min(low.len()).min(close.len());
        if len < period {
            return Err(IndicatorError::InsufficientData {
                required: period,
                provided: len,
            });
        }

        let mut result = vec![None; period - 1];
        for i in period - 1..len {
            let start = i + 1 - period;
            let (highest, lowest) = highest_lowest(&high[start..=i], &low[start..=i]);
            let range = highest.try_sub(lowest)?;
            let value = if range == Decimal::ZERO {
                Decimal::ZERO
            } else {
                highest.try_sub(close[i])?.try_div(range)?.try_mul(dec!(-100))?
            };
            result.push(Some(value));
        }

        Ok(result)
    }
}

/// `(avg × (n-1) + 현재값) / n`
fn wilder_average(avg: Decimal, value: Decimal, period: Decimal) -> IndicatorResult<Decimal> {
    Ok(avg.try_mul(period - Decimal::ONE)?.try_add(value)? / period)
}

fn rsi_value(avg_gain: Decimal, avg_loss: Decimal) -> IndicatorResult<Decimal> {
    if avg_loss == Decimal::ZERO {
        return Ok(dec!(100));
    }
    let rs = avg_gain.try_div(avg_loss)?;
    Ok(dec!(100) - dec!(100).try_div(Decimal::ONE.try_add(rs)?)?)
}
