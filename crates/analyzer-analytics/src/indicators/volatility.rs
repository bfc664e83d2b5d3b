//! 변동성 지표 (Volatility Indicators).
//!
//! 가격 변동성을 측정하는 지표들을 제공합니다.
//! - Bollinger Bands (볼린저 밴드)
//! - ATR (Average True Range, Wilder 평활)

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::trend::true_range;
use super::{
    check_period, checked_sum, sqrt_decimal, CheckedDecimal, IndicatorError, IndicatorResult,
};

/// 볼린저 밴드 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BollingerBandsParams {
    /// 이동평균 기간 (기본: 20).
    pub period: usize,
    /// 표준편차 배수 (기본: 2.0).
    pub std_dev_multiplier: Decimal,
}

impl Default for BollingerBandsParams {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev_multiplier: dec!(2.0),
        }
    }
}

/// 볼린저 밴드 결과.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerBandsResult {
    /// 상단 밴드 (MA + k × σ).
    pub upper: Option<Decimal>,
    /// 중간 밴드 (이동평균).
    pub middle: Option<Decimal>,
    /// 하단 밴드 (MA - k × σ).
    pub lower: Option<Decimal>,
    /// %B 지표 ((현재가 - 하단) / (상단 - 하단)). 밴드가 수렴하면 None.
    pub percent_b: Option<Decimal>,
    /// 밴드 폭 ((상단 - 하단) / 중간).
    pub bandwidth: Option<Decimal>,
}

impl BollingerBandsResult {
    const EMPTY: Self = Self {
        upper: None,
        middle: None,
        lower: None,
        percent_b: None,
        bandwidth: None,
    };
}

/// ATR 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AtrParams {
    /// ATR 기간 (기본: 14).
    pub period: usize,
}

impl Default for AtrParams {
    fn default() -> Self {
        Self { period: 14 }
    }
}

/// 변동성 지표 계산기.
#[derive(Debug, Default)]
pub struct VolatilityIndicators;

impl VolatilityIndicators {
    /// 새로운 변동성 지표 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// 볼린저 밴드 계산.
    ///
    /// 상단 밴드 = MA + (k × σ)
    /// 중간 밴드 = MA (이동평균)
    /// 하단 밴드 = MA - (k × σ)
    ///
    /// σ는 기간 내 모집단 표준편차입니다. 편차를 최대 절대 편차로 나눈
    /// 뒤 제곱하므로 큰 가격에서도 제곱이 `Decimal` 범위를 넘지 않습니다.
    ///
    /// # 인자
    /// * `prices` - 가격 데이터 (종가)
    /// * `params` - 볼린저 밴드 파라미터
    ///
    /// # 반환
    /// 상단, 중간, 하단 밴드 값들
    pub fn bollinger_bands(
        &self,
        prices: &[Decimal],
        params: BollingerBandsParams,
    ) -> IndicatorResult<Vec<BollingerBandsResult>> {
        let period = params.period;
        check_period(period)?;

        if prices.len() < period {
            return Err(IndicatorError::InsufficientData {
                required: period,
                provided: prices.len(),
            });
        }

        let period_decimal = Decimal::from(period);
        let mut result = Vec::with_capacity(prices.len());

        for i in 0..prices.len() {
            if i + 1 < period {
                result.push(BollingerBandsResult::EMPTY);
                continue;
            }

            let window = &prices[i + 1 - period..=i];
            let ma = checked_sum(window)? / period_decimal;

            let deviation = params
                .std_dev_multiplier
                .try_mul(population_std_dev(window, ma, period_decimal)?)?;
            let upper = ma.try_add(deviation)?;
            let lower = ma.try_sub(deviation)?;
            let width = upper.try_sub(lower)?;

            let percent_b = if width != Decimal::ZERO {
                Some(prices[i].try_sub(lower)?.try_div(width)?)
            } else {
                None
            };

            let bandwidth = if ma != Decimal::ZERO {
                Some(width.try_div(ma)?)
            } else {
                None
            };

            result.push(BollingerBandsResult {
                upper: Some(upper),
                middle: Some(ma),
                lower: Some(lower),
                percent_b,
                bandwidth,
            });
        }

        Ok(result)
    }

    /// ATR (Average True Range) 계산.
    ///
    /// True Range = max(고가 - 저가, |고가 - 전일종가|, |저가 - 전일종가|)
    ///
    /// True Range는 두 번째 봉부터 정의됩니다. 첫 ATR은 처음 `period`개
    /// True Range의 단순 평균이고, 이후에는 Wilder 방식
    /// `(이전 ATR × (n-1) + TR) / n`으로 전체 구간을 평활합니다.
    ///
    /// # 반환
    /// ATR 값들 (처음 `period`개는 None)
    pub fn atr(
        &self,
        high: &[Decimal],
        low: &[Decimal],
        close: &[Decimal],
        params: AtrParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        let period = params.period;
        check_period(period)?;

        let len = high.len().min(low.len()).min(close.len());
        if len < period + 1 {
            return Err(IndicatorError::InsufficientData {
                required: period + 1,
                provided: len,
            });
        }

        let true_ranges = (1..len)
            .map(|i| true_range(high[i], low[i], close[i - 1]))
            .collect::<IndicatorResult<Vec<Decimal>>>()?;

        let period_dec = Decimal::from(period);
        let mut atr = checked_sum(&true_ranges[..period])? / period_dec;

        let mut result = vec![None; period];
        result.push(Some(atr));

        // true_ranges[i]는 (i + 1)번째 봉
        for tr in &true_ranges[period..] {
            atr = atr.try_mul(period_dec - Decimal::ONE)?.try_add(*tr)? / period_dec;
            result.push(Some(atr));
        }

        Ok(result)
    }
}

/// 구간의 모집단 표준편차.
fn population_std_dev(window: &[Decimal], mean: Decimal, n: Decimal) -> IndicatorResult<Decimal> {
    let mut diffs = Vec::with_capacity(window.len());
    for price in window {
        diffs.push(price.try_sub(mean)?);
    }

    let scale = diffs.iter().map(|d| d.abs()).max().unwrap_or(Decimal::ZERO);
    if scale == Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }

    // |d / scale| <= 1 이므로 제곱 합은 n 이하
    let mut sum_sq = Decimal::ZERO;
    for diff in diffs {
        let unit = diff / scale;
        sum_sq += unit * unit;
    }

    scale.try_mul(sqrt_decimal(sum_sq / n))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_ohlc() -> (Vec<Decimal>, Vec<Decimal>, Vec<Decimal>) {
        let high = vec![
            dec!(102),
            dec!(104),
            dec!(103),
            dec!(106),
            dec!(108),
            dec!(107),
        ];
        let low = vec![dec!(98), dec!(100), dec!(99), dec!(101), dec!(104), dec!(103)];
        let close = vec![
            dec!(100),
            dec!(103),
            dec!(100),
            dec!(105),
            dec!(106),
            dec!(104),
        ];
        (high, low, close)
    }

    #[test]
    fn test_bollinger_bands_known_values() {
        let volatility = VolatilityIndicators::new();
        // 평균 5, 모집단 표준편차 2
        let prices = vec![
            dec!(2),
            dec!(4),
            dec!(4),
            dec!(4),
            dec!(5),
            dec!(5),
            dec!(7),
            dec!(9),
        ];

        let bands = volatility
            .bollinger_bands(
                &prices,
                BollingerBandsParams {
                    period: 8,
                    std_dev_multiplier: dec!(2),
                },
            )
            .unwrap();

        let last = bands.last().unwrap();
        assert_eq!(last.middle, Some(dec!(5)));
        assert_eq!(last.upper, Some(dec!(9)));
        assert_eq!(last.lower, Some(dec!(1)));
        // (9 - 1) / 8 = 1
        assert_eq!(last.percent_b, Some(dec!(1)));
        assert_eq!(last.bandwidth, Some(dec!(1.6)));
        assert!(bands[6].middle.is_none());
    }

    #[test]
    fn test_bollinger_flat_prices_collapse() {
        let volatility = VolatilityIndicators::new();
        let prices = vec![dec!(100); 20];

        let bands = volatility
            .bollinger_bands(&prices, BollingerBandsParams::default())
            .unwrap();

        let last = bands.last().unwrap();
        assert_eq!(last.upper, last.lower);
        assert!(last.percent_b.is_none());
        assert_eq!(last.bandwidth, Some(Decimal::ZERO));
    }

    #[test]
    fn test_bollinger_insufficient_data() {
        let volatility = VolatilityIndicators::new();
        let result = volatility.bollinger_bands(&[dec!(1); 5], BollingerBandsParams::default());
        assert!(matches!(
            result,
            Err(IndicatorError::InsufficientData { required: 20, provided: 5 })
        ));
    }

    #[test]
    fn test_bollinger_quadrillion_swings() {
        let volatility = VolatilityIndicators::new();
        let base = Decimal::from(1_000_000_000_000_000i64);
        let prices: Vec<Decimal> = (0..30)
            .map(|i| if i % 2 == 0 { base } else { base * dec!(2) })
            .collect();

        let bands = volatility
            .bollinger_bands(&prices, BollingerBandsParams::default())
            .unwrap();

        // 평균 1.5e15, 모집단 표준편차 0.5e15
        let last = bands.last().unwrap();
        assert_eq!(last.middle, Some(base * dec!(1.5)));
        let upper = last.upper.unwrap();
        assert!((upper - base * dec!(2.5)).abs() < dec!(1));
        let lower = last.lower.unwrap();
        assert!((lower - base * dec!(0.5)).abs() < dec!(1));
    }

    #[test]
    fn test_bollinger_overflow_is_an_error() {
        let volatility = VolatilityIndicators::new();
        let prices = vec![Decimal::MAX; 20];

        let result = volatility.bollinger_bands(&prices, BollingerBandsParams::default());
        assert!(matches!(result, Err(IndicatorError::Overflow(_))));
    }

    #[test]
    fn test_atr_wilder_smoothing() {
        let volatility = VolatilityIndicators::new();
        let (high, low, close) = sample_ohlc();

        let atr = volatility
            .atr(&high, &low, &close, AtrParams { period: 3 })
            .unwrap();

        // TR: [4, 4, 6, 4, 4] (두 번째 봉부터)
        // 첫 ATR = (4 + 4 + 6) / 3 = 14/3
        assert_eq!(atr.len(), 6);
        assert!(atr[2].is_none());
        let seed = atr[3].unwrap();
        assert!((seed - dec!(14) / dec!(3)).abs() < dec!(0.000001));

        // (14/3 × 2 + 4) / 3 = 40/9
        let next = atr[4].unwrap();
        assert!((next - dec!(40) / dec!(9)).abs() < dec!(0.000001));
        assert!(atr[5].is_some());
    }

    #[test]
    fn test_atr_insufficient_data() {
        let volatility = VolatilityIndicators::new();
        let (high, low, close) = sample_ohlc();

        let result = volatility.atr(&high, &low, &close, AtrParams { period: 6 });
        assert!(matches!(
            result,
            Err(IndicatorError::InsufficientData { required: 7, provided: 6 })
        ));
    }
}
