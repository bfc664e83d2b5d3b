//! 기술적 지표 모듈.
//!
//! 모든 지표는 `Decimal` 가격 슬라이스를 받아 시점별 값을 돌려줍니다.
//! 값이 아직 정의되지 않는 앞부분은 `None`이고, 데이터가 부족하면
//! [`IndicatorError::InsufficientData`]를 반환합니다. 중간 계산이 `Decimal`
//! 범위를 벗어나면 패닉 대신 [`IndicatorError::Overflow`]를 반환합니다.
//!
//! # 지원 지표
//!
//! ## 추세 지표 (Trend Indicators)
//! - **SMA**: 단순 이동평균 (Simple Moving Average)
//! - **EMA**: 지수 이동평균 (Exponential Moving Average)
//! - **MACD**: 이동평균 수렴/확산 (Moving Average Convergence Divergence)
//! - **ADX**: 평균 방향성 지수 (Average Directional Index)
//! - **CCI**: 상품 채널 지수 (Commodity Channel Index)
//!
//! ## 모멘텀 지표 (Momentum Indicators)
//! - **RSI**: 상대강도지수 (Relative Strength Index)
//! - **Stochastic**: 스토캐스틱 오실레이터
//! - **Williams %R**
//!
//! ## 변동성 지표 (Volatility Indicators)
//! - **Bollinger Bands**: 볼린저 밴드
//! - **ATR**: 평균 실제 범위 (Average True Range)
//!
//! ## 거래량 지표
//! - **OBV**: 누적 거래량 (On-Balance Volume)
//!
//! # 사용 예시
//!
//! ```
//! use analyzer_analytics::indicators::{IndicatorEngine, RsiParams};
//! use rust_decimal::Decimal;
//!
//! let engine = IndicatorEngine::new();
//! let prices: Vec<Decimal> = (0..20).map(|i| Decimal::from(100 + i)).collect();
//!
//! let rsi = engine.rsi(&prices, RsiParams { period: 14 }).unwrap();
//! assert_eq!(rsi.last().copied().flatten(), Some(Decimal::from(100)));
//! ```

pub mod momentum;
pub mod obv;
pub mod trend;
pub mod volatility;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use thiserror::Error;

use analyzer_core::Volume;

pub use momentum::{
    MomentumCalculator, RsiParams, StochasticParams, StochasticResult, WilliamsRParams,
};
pub use obv::{ObvIndicator, ObvResult};
pub use trend::{
    AdxParams, AdxResult, CciParams, EmaParams, MacdParams, MacdResult, SmaParams,
    TrendIndicators,
};
pub use volatility::{AtrParams, BollingerBandsParams, BollingerBandsResult, VolatilityIndicators};

/// 지표 계산 오류.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IndicatorError {
    /// 데이터 부족 오류
    #[error("데이터가 부족합니다: 필요 {required}개, 제공 {provided}개")]
    InsufficientData { required: usize, provided: usize },

    /// 잘못된 파라미터
    #[error("잘못된 파라미터: {0}")]
    InvalidParameter(String),

    /// 중간 계산이 Decimal 범위를 벗어남
    #[error("계산 범위 초과: {0}")]
    Overflow(&'static str),
}

/// 지표 계산 결과 타입.
pub type IndicatorResult<T> = Result<T, IndicatorError>;

/// 통합 지표 엔진.
///
/// 모든 기술적 지표 계산을 위한 통합 인터페이스를 제공합니다.
#[derive(Debug, Default)]
pub struct IndicatorEngine {
    trend: TrendIndicators,
    momentum: MomentumCalculator,
    volatility: VolatilityIndicators,
    obv: ObvIndicator,
}

impl IndicatorEngine {
    /// 새로운 지표 엔진 생성.
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== 추세 지표 ====================

    /// 단순 이동평균 (SMA) 계산.
    ///
    /// # 반환
    /// 계산된 SMA 값들의 벡터 (처음 period-1개는 None)
    pub fn sma(
        &self,
        prices: &[Decimal],
        params: SmaParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.trend.sma(prices, params)
    }

    /// 지수 이동평균 (EMA) 계산.
    pub fn ema(
        &self,
        prices: &[Decimal],
        params: EmaParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.trend.ema(prices, params)
    }

    /// MACD 계산.
    ///
    /// # 반환
    /// MACD 라인, 시그널 라인, 히스토그램
    pub fn macd(&self, prices: &[Decimal], params: MacdParams) -> IndicatorResult<Vec<MacdResult>> {
        self.trend.macd(prices, params)
    }

    /// ADX 계산.
    pub fn adx(
        &self,
        high: &[Decimal],
        low: &[Decimal],
        close: &[Decimal],
        params: AdxParams,
    ) -> IndicatorResult<Vec<AdxResult>> {
        self.trend.adx(high, low, close, params)
    }

    /// CCI 계산.
    pub fn cci(
        &self,
        high: &[Decimal],
        low: &[Decimal],
        close: &[Decimal],
        params: CciParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.trend.cci(high, low, close, params)
    }

    // ==================== 모멘텀 지표 ====================

    /// RSI (Relative Strength Index) 계산.
    ///
    /// # 반환
    /// 0-100 사이의 RSI 값들
    pub fn rsi(
        &self,
        prices: &[Decimal],
        params: RsiParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.momentum.rsi(prices, params)
    }

    /// 스토캐스틱 오실레이터 계산.
    ///
    /// # 인자
    /// * `high` - 고가 데이터
    /// * `low` - 저가 데이터
    /// * `close` - 종가 데이터
    /// * `params` - 스토캐스틱 파라미터 (%K, %D 기간)
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
        self.momentum.stochastic(high, low, close, params)
    }

    /// Williams %R 계산.
    pub fn williams_r(
        &self,
        high: &[Decimal],
        low: &[Decimal],
        close: &[Decimal],
        params: WilliamsRParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.momentum.williams_r(high, low, close, params)
    }

    // ==================== 변동성 지표 ====================

    /// 볼린저 밴드 계산.
    ///
    /// # 반환
    /// 상단, 중간, 하단 밴드 값들
    pub fn bollinger_bands(
        &self,
        prices: &[Decimal],
        params: BollingerBandsParams,
    ) -> IndicatorResult<Vec<BollingerBandsResult>> {
        self.volatility.bollinger_bands(prices, params)
    }

    /// ATR (Average True Range) 계산.
    pub fn atr(
        &self,
        high: &[Decimal],
        low: &[Decimal],
        close: &[Decimal],
        params: AtrParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.volatility.atr(high, low, close, params)
    }

    // ==================== 거래량 지표 ====================

    /// OBV 계산 (전체 구간 누적).
    pub fn obv(&self, close: &[Decimal], volume: &[Volume]) -> IndicatorResult<Vec<ObvResult>> {
        self.obv.calculate(close, volume)
    }
}

/// 기간이 0이면 오류.
pub(crate) fn check_period(period: usize) -> IndicatorResult<()> {
    if period == 0 {
        return Err(IndicatorError::InvalidParameter(
            "기간은 0보다 커야 합니다".to_string(),
        ));
    }
    Ok(())
}

/// 범위를 벗어나면 [`IndicatorError::Overflow`]를 돌려주는 Decimal 연산.
pub(crate) trait CheckedDecimal: Sized {
    fn try_add(self, rhs: Decimal) -> IndicatorResult<Decimal>;
    fn try_sub(self, rhs: Decimal) -> IndicatorResult<Decimal>;
    fn try_mul(self, rhs: Decimal) -> IndicatorResult<Decimal>;
    /// 0으로 나누는 경우도 오류.
    fn try_div(self, rhs: Decimal) -> IndicatorResult<Decimal>;
}

impl CheckedDecimal for Decimal {
    fn try_add(self, rhs: Decimal) -> IndicatorResult<Decimal> {
        self.checked_add(rhs).ok_or(IndicatorError::Overflow("덧셈"))
    }

    fn try_sub(self, rhs: Decimal) -> IndicatorResult<Decimal> {
        self.checked_sub(rhs).ok_or(IndicatorError::Overflow("뺄셈"))
    }

    fn try_mul(self, rhs: Decimal) -> IndicatorResult<Decimal> {
        self.checked_mul(rhs).ok_or(IndicatorError::Overflow("곱셈"))
    }

    fn try_div(self, rhs: Decimal) -> IndicatorResult<Decimal> {
        self.checked_div(rhs).ok_or(IndicatorError::Overflow("나눗셈"))
    }
}

/// 오버플로우를 검사하는 합계.
pub(crate) fn checked_sum<'a, I>(values: I) -> IndicatorResult<Decimal>
where
    I: IntoIterator<Item = &'a Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, value| acc.try_add(*value))
}

/// 구간 내 최고 고가와 최저 저가.
pub(crate) fn highest_lowest(high: &[Decimal], low: &[Decimal]) -> (Decimal, Decimal) {
    let highest = high.iter().max().copied().unwrap_or(Decimal::ZERO);
    let lowest = low.iter().min().copied().unwrap_or(Decimal::ZERO);
    (highest, lowest)
}

/// Decimal 제곱근.
///
/// `f64` 제곱근을 초기값으로 Newton-Raphson 반복을 몇 번 수행합니다.
/// 0 이하이면 0.
pub fn sqrt_decimal(value: Decimal) -> Decimal {
    if value <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let mut x = value
        .to_f64()
        .map(f64::sqrt)
        .and_then(Decimal::from_f64)
        .filter(|seed| *seed > Decimal::ZERO)
        .unwrap_or(value);

    for _ in 0..4 {
        let next = (x + value / x) / dec!(2);
        if next == x {
            break;
        }
        x = next;
    }

    x
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_prices() -> Vec<Decimal> {
        vec![
            dec!(100.0),
            dec!(102.0),
            dec!(101.0),
            dec!(103.0),
            dec!(105.0),
            dec!(104.0),
            dec!(106.0),
            dec!(108.0),
            dec!(107.0),
            dec!(109.0),
            dec!(111.0),
            dec!(110.0),
            dec!(112.0),
            dec!(114.0),
            dec!(113.0),
        ]
    }

    #[test]
    fn test_sma_calculation() {
        let engine = IndicatorEngine::new();
        let prices = sample_prices();

        let sma = engine.sma(&prices, SmaParams { period: 5 }).unwrap();

        assert!(sma[0].is_none());
        assert!(sma[3].is_none());
        assert!(sma[4].is_some());
    }

    #[test]
    fn test_rsi_calculation() {
        let engine = IndicatorEngine::new();
        let prices = sample_prices();

        let rsi = engine.rsi(&prices, RsiParams { period: 14 }).unwrap();

        for value in rsi.iter().flatten() {
            assert!(*value >= Decimal::ZERO);
            assert!(*value <= dec!(100));
        }
    }

    #[test]
    fn test_insufficient_data_error() {
        let engine = IndicatorEngine::new();
        let prices = vec![dec!(100.0), dec!(101.0)];

        let result = engine.sma(&prices, SmaParams { period: 20 });
        assert_eq!(
            result,
            Err(IndicatorError::InsufficientData {
                required: 20,
                provided: 2
            })
        );
    }

    #[test]
    fn test_sqrt_decimal() {
        assert_eq!(sqrt_decimal(dec!(4)), dec!(2));
        assert_eq!(sqrt_decimal(dec!(0)), Decimal::ZERO);
        assert_eq!(sqrt_decimal(dec!(-9)), Decimal::ZERO);

        let root = sqrt_decimal(dec!(2));
        assert!((root * root - dec!(2)).abs() < dec!(0.0000000001));
    }

    #[test]
    fn test_checked_arithmetic_reports_overflow() {
        assert_eq!(checked_sum(&[dec!(1), dec!(2), dec!(3)]), Ok(dec!(6)));
        assert_eq!(
            checked_sum(&[Decimal::MAX, Decimal::ONE]),
            Err(IndicatorError::Overflow("덧셈"))
        );
        assert_eq!(
            Decimal::MAX.try_mul(dec!(2)),
            Err(IndicatorError::Overflow("곱셈"))
        );
        assert!(dec!(1).try_div(Decimal::ZERO).is_err());
        assert_eq!(dec!(9).try_div(dec!(3)), Ok(dec!(3)));
    }

    #[test]
    fn test_engine_survives_extreme_prices() {
        let engine = IndicatorEngine::new();
        let prices = vec![Decimal::MAX; 30];

        assert!(matches!(
            engine.sma(&prices, SmaParams::default()),
            Err(IndicatorError::Overflow(_))
        ));
        assert!(matches!(
            engine.cci(&prices, &prices, &prices, CciParams::default()),
            Err(IndicatorError::Overflow(_))
        ));
        assert!(engine.bollinger_bands(&prices, BollingerBandsParams::default()).is_err());
        assert!(engine.macd(&prices, MacdParams::default()).is_err());
        assert!(engine.ema(&prices, EmaParams::default()).is_err());
    }
}
