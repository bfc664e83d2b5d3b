//! 추세 지표 (Trend Indicators).
//!
//! 이동평균과 추세 강도 지표들을 제공합니다.
//! - SMA (Simple Moving Average)
//! - EMA (Exponential Moving Average)
//! - MACD (Moving Average Convergence Divergence)
//! - ADX (Average Directional Index, Wilder)
//! - CCI (Commodity Channel Index)

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{check_period, checked_sum, CheckedDecimal, IndicatorError, IndicatorResult};

/// SMA 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SmaParams {
    /// 이동평균 기간.
    pub period: usize,
}

impl Default for SmaParams {
    fn default() -> Self {
        Self { period: 20 }
    }
}

/// EMA 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EmaParams {
    /// 이동평균 기간.
    pub period: usize,
}

impl Default for EmaParams {
    fn default() -> Self {
        Self { period: 20 }
    }
}

/// MACD 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MacdParams {
    /// 단기 EMA 기간 (기본: 12).
    pub fast_period: usize,
    /// 장기 EMA 기간 (기본: 26).
    pub slow_period: usize,
    /// 시그널 라인 기간 (기본: 9).
    pub signal_period: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

/// MACD 결과.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdResult {
    /// MACD 라인 (단기 EMA - 장기 EMA).
    pub macd: Option<Decimal>,
    /// 시그널 라인 (MACD의 EMA).
    pub signal: Option<Decimal>,
    /// 히스토그램 (MACD - 시그널).
    pub histogram: Option<Decimal>,
}

/// ADX 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AdxParams {
    /// Wilder 평활 기간 (기본: 14).
    pub period: usize,
}

impl Default for AdxParams {
    fn default() -> Self {
        Self { period: 14 }
    }
}

/// ADX 결과.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdxResult {
    /// ADX (0-100, 추세 강도).
    pub adx: Option<Decimal>,
    /// +DI.
    pub plus_di: Option<Decimal>,
    /// -DI.
    pub minus_di: Option<Decimal>,
}

/// CCI 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CciParams {
    /// 조회 기간 (기본: 20).
    pub period: usize,
}

impl Default for CciParams {
    fn default() -> Self {
        Self { period: 20 }
    }
}

/// CCI 상수 (Lambert).
const CCI_CONSTANT: Decimal = dec!(0.015);

/// 추세 지표 계산기.
#[derive(Debug, Default)]
pub struct TrendIndicators;

impl TrendIndicators {
    /// 새로운 추세 지표 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// 단순 이동평균 (SMA) 계산.
    ///
    /// SMA = (P1 + P2 + ... + Pn) / n
    ///
    /// # 반환
    /// 각 시점의 SMA 값 (처음 period-1개는 None)
    pub fn sma(
        &self,
        prices: &[Decimal],
        params: SmaParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        let period = params.period;
        check_period(period)?;

        if prices.len() < period {
            return Err(IndicatorError::InsufficientData {
                required: period,
                provided: prices.len(),
            });
        }

        let period_decimal = Decimal::from(period);
        let mut result = vec![None; period - 1];
        let mut sum = checked_sum(&prices[..period - 1])?;

        for i in period - 1..prices.len() {
            sum = sum.try_add(prices[i])?;
            result.push(Some(sum / period_decimal));
            sum = sum.try_sub(prices[i + 1 - period])?;
        }

        Ok(result)
    }

    /// 지수 이동평균 (EMA) 계산.
    ///
    /// EMA = (현재가 × k) + (이전 EMA × (1 - k)), k = 2 / (period + 1)
    ///
    /// 첫 값은 처음 `period`개의 단순 평균입니다.
    ///
    /// # 반환
    /// 각 시점의 EMA 값 (처음 period-1개는 None)
    pub fn ema(
        &self,
        prices: &[Decimal],
        params: EmaParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        let period = params.period;
        check_period(period)?;

        if prices.len() < period {
            return Err(IndicatorError::InsufficientData {
                required: period,
                provided: prices.len(),
            });
        }

        let mut result = Vec::with_capacity(prices.len());
        let multiplier = dec!(2) / Decimal::from(period + 1);

        for _ in 0..period - 1 {
            result.push(None);
        }

        let initial_sma = checked_sum(&prices[..period])? / Decimal::from(period);
        result.push(Some(initial_sma));

        let mut prev_ema = initial_sma;
        for price in prices.iter().skip(period) {
            let ema = price
                .try_mul(multiplier)?
                .try_add(prev_ema.try_mul(Decimal::ONE - multiplier)?)?;
            result.push(Some(ema));
            prev_ema = ema;
        }

        Ok(result)
    }

    /// MACD 계산.
    ///
    /// MACD 라인 = 단기 EMA - 장기 EMA
    /// 시그널 라인 = MACD 라인(값이 있는 구간)의 EMA
    /// 히스토그램 = MACD 라인 - 시그널 라인
    ///
    /// `slow_period + signal_period`개 이상의 데이터가 필요합니다.
    pub fn macd(&self, prices: &[Decimal], params: MacdParams) -> IndicatorResult<Vec<MacdResult>> {
        check_period(params.fast_period)?;
        check_period(params.slow_period)?;
        check_period(params.signal_period)?;

        let min_required = params.slow_period + params.signal_period;
        if prices.len() < min_required {
            return Err(IndicatorError::InsufficientData {
                required: min_required,
                provided: prices.len(),
            });
        }

        let fast_ema = self.ema(prices, EmaParams { period: params.fast_period })?;
        let slow_ema = self.ema(prices, EmaParams { period: params.slow_period })?;

        let macd_line = fast_ema
            .iter()
            .zip(&slow_ema)
            .map(|(fast, slow)| match (fast, slow) {
                (Some(fast), Some(slow)) => fast.try_sub(*slow).map(Some),
                _ => Ok(None),
            })
            .collect::<IndicatorResult<Vec<Option<Decimal>>>>()?;

        // 시그널 라인은 값이 있는 MACD 구간만으로 계산
        let macd_values: Vec<Decimal> = macd_line.iter().flatten().copied().collect();
        let signal_ema = self.ema(&macd_values, EmaParams { period: params.signal_period })?;

        let mut result = Vec::with_capacity(prices.len());
        let mut signal_idx = 0;

        for macd_val in &macd_line {
            match macd_val {
                Some(m) => {
                    let signal = signal_ema.get(signal_idx).copied().flatten();
                    result.push(MacdResult {
                        macd: Some(*m),
                        signal,
                        histogram: signal.map(|s| m.try_sub(s)).transpose()?,
                    });
                    signal_idx += 1;
                }
                None => result.push(MacdResult {
                    macd: None,
                    signal: None,
                    histogram: None,
                }),
            }
        }

        Ok(result)
    }

    /// ADX (Average Directional Index) 계산.
    ///
    /// - TR, +DM, -DM을 구하고 Wilder 방식(`S = S - S/n + 현재값`)으로 평활
    /// - +DI = 100 × 평활 +DM / 평활 TR, -DI도 동일
    /// - DX = 100 × |+DI - -DI| / (+DI + -DI)
    /// - 첫 ADX는 DX `period`개의 평균, 이후 `(ADX × (n-1) + DX) / n`
    ///
    /// DI는 `period`번째 봉부터, ADX는 `2 × period - 1`번째 봉부터 값이 있으며
    /// `2 × period`개 이상의 데이터가 필요합니다.
    pub fn adx(
        &self,
        high: &[Decimal],
        low: &[Decimal],
        close: &[Decimal],
        params: AdxParams,
    ) -> IndicatorResult<Vec<AdxResult>> {
        let period = params.period;
        check_period(period)?;

        let len = high.len().min(low.len()).min(close.len());
        let required = period * 2;
        if len < required {
            return Err(IndicatorError::InsufficientData {
                required,
                provided: len,
            });
        }

        let mut tr = vec![Decimal::ZERO; len];
        let mut plus_dm = vec![Decimal::ZERO; len];
        let mut minus_dm = vec![Decimal::ZERO; len];

        for i in 1..len {
            tr[i] = true_range(high[i], low[i], close[i - 1])?;

            let up_move = high[i].try_sub(high[i - 1])?;
            let down_move = low[i - 1].try_sub(low[i])?;
            if up_move > down_move && up_move > Decimal::ZERO {
                plus_dm[i] = up_move;
            }
            if down_move > up_move && down_move > Decimal::ZERO {
                minus_dm[i] = down_move;
            }
        }

        let period_dec = Decimal::from(period);
        let mut smoothed_tr = checked_sum(&tr[1..=period])?;
        let mut smoothed_plus = checked_sum(&plus_dm[1..=period])?;
        let mut smoothed_minus = checked_sum(&minus_dm[1..=period])?;

        let mut result = vec![
            AdxResult {
                adx: None,
                plus_di: None,
                minus_di: None,
            };
            len
        ];

        let mut dx_sum = Decimal::ZERO;
        let mut adx: Option<Decimal> = None;

        for i in period..len {
            if i > period {
                smoothed_tr = wilder_step(smoothed_tr, tr[i], period_dec)?;
                smoothed_plus = wilder_step(smoothed_plus, plus_dm[i], period_dec)?;
                smoothed_minus = wilder_step(smoothed_minus, minus_dm[i], period_dec)?;
            }

            let (plus_di, minus_di) = if smoothed_tr == Decimal::ZERO {
                (Decimal::ZERO, Decimal::ZERO)
            } else {
                (
                    dec!(100).try_mul(smoothed_plus)?.try_div(smoothed_tr)?,
                    dec!(100).try_mul(smoothed_minus)?.try_div(smoothed_tr)?,
                )
            };

            let di_sum = plus_di.try_add(minus_di)?;
            let dx = if di_sum == Decimal::ZERO {
                Decimal::ZERO
            } else {
                dec!(100)
                    .try_mul(plus_di.try_sub(minus_di)?.abs())?
                    .try_div(di_sum)?
            };

            let first_adx = 2 * period - 1;
            if i <= first_adx {
                dx_sum = dx_sum.try_add(dx)?;
                if i == first_adx {
                    adx = Some(dx_sum / period_dec);
                }
            } else if let Some(prev) = adx {
                let smoothed = prev.try_mul(period_dec - Decimal::ONE)?.try_add(dx)?;
                adx = Some(smoothed / period_dec);
            }

            result[i] = AdxResult {
                adx,
                plus_di: Some(plus_di),
                minus_di: Some(minus_di),
            };
        }

        Ok(result)
    }

    /// CCI (Commodity Channel Index) 계산.
    ///
    /// TP = (고가 + 저가 + 종가) / 3
    /// CCI = (TP - SMA(TP)) / (0.015 × 평균편차)
    ///
    /// 평균편차가 0이면 0입니다.
    pub fn cci(
        &self,
        high: &[Decimal],
        low: &[Decimal],
        close: &[Decimal],
        params: CciParams,
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

        let typical = (0..len)
            .map(|i| Ok(high[i].try_add(low[i])?.try_add(close[i])? / dec!(3)))
            .collect::<IndicatorResult<Vec<Decimal>>>()?;
        let period_dec = Decimal::from(period);

        let mut result = vec![None; period - 1];
        for i in period - 1..len {
            let window = &typical[i + 1 - period..=i];
            let mean = checked_sum(window)? / period_dec;

            let mut abs_dev = Decimal::ZERO;
            for tp in window {
                abs_dev = abs_dev.try_add(tp.try_sub(mean)?.abs())?;
            }
            let mean_dev = abs_dev / period_dec;

            let value = if mean_dev == Decimal::ZERO {
                Decimal::ZERO
            } else {
                typical[i]
                    .try_sub(mean)?
                    .try_div(CCI_CONSTANT.try_mul(mean_dev)?)?
            };
            result.push(Some(value));
        }

        Ok(result)
    }
}

/// 실제 범위 (True Range).
///
/// max(고가 - 저가, |고가 - 전일 종가|, |저가 - 전일 종가|)
pub(crate) fn true_range(
    high: Decimal,
    low: Decimal,
    prev_close: Decimal,
) -> IndicatorResult<Decimal> {
    Ok(high
        .try_sub(low)?
        .max(high.try_sub(prev_close)?.abs())
        .max(low.try_sub(prev_close)?.abs()))
}

/// Wilder 누적 평활 한 단계: `S - S/n + 현재값`.
fn wilder_step(smoothed: Decimal, value: Decimal, period: Decimal) -> IndicatorResult<Decimal> {
    (smoothed - smoothed / period).try_add(value)
}
