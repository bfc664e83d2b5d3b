//! 마지막 봉 기준 기술적 지표 스냅샷.
//!
//! 각 지표의 롤링 계산 결과에서 마지막 값만 꺼냅니다. 계산할 수 없는
//! 지표 (데이터 부족, 잘못된 파라미터, `Decimal` 범위 초과)는 `None`이 되며
//! 호출자에게 오류를 던지지 않습니다.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use analyzer_core::{price_from_f64, IndicatorConfig, Series};

use crate::indicators::{
    AdxParams, AtrParams, BollingerBandsParams, CciParams, EmaParams, IndicatorEngine,
    IndicatorResult, MacdParams, RsiParams, SmaParams, StochasticParams, WilliamsRParams,
};

/// MACD 스냅샷.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdSnapshot {
    /// MACD 라인
    pub macd: Decimal,
    /// 시그널 라인
    pub signal: Decimal,
    /// 히스토그램
    pub histogram: Decimal,
}

/// 스토캐스틱 스냅샷.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StochasticSnapshot {
    /// %K
    pub k: Decimal,
    /// %D (%K가 `d_period`개 쌓이기 전에는 None)
    pub d: Option<Decimal>,
}

/// 볼린저 밴드 스냅샷.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerSnapshot {
    /// 마지막 종가
    pub price: Decimal,
    /// 상단 밴드
    pub upper: Decimal,
    /// 중간 밴드
    pub middle: Decimal,
    /// 하단 밴드
    pub lower: Decimal,
    /// %B (밴드가 수렴하면 None)
    pub percent_b: Option<Decimal>,
    /// 밴드 폭
    pub bandwidth: Option<Decimal>,
}

/// ADX 스냅샷.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdxSnapshot {
    /// ADX
    pub adx: Decimal,
    /// +DI
    pub plus_di: Decimal,
    /// -DI
    pub minus_di: Decimal,
}

/// 기술적 지표 스냅샷.
///
/// `None`은 "N/A"로 표시합니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TechnicalSnapshot {
    /// 기준일 (마지막 봉)
    pub as_of: Option<NaiveDate>,
    /// 마지막 종가
    pub last_close: Option<Decimal>,
    /// RSI
    pub rsi: Option<Decimal>,
    /// MACD
    pub macd: Option<MacdSnapshot>,
    /// 스토캐스틱
    pub stochastic: Option<StochasticSnapshot>,
    /// 볼린저 밴드
    pub bollinger: Option<BollingerSnapshot>,
    /// ATR
    pub atr: Option<Decimal>,
    /// Williams %R
    pub williams_r: Option<Decimal>,
    /// OBV (전체 구간 누적)
    pub obv: Option<i64>,
    /// ADX
    pub adx: Option<AdxSnapshot>,
    /// CCI
    pub cci: Option<Decimal>,
    /// 단순 이동평균
    pub sma: Option<Decimal>,
    /// 지수 이동평균
    pub ema: Option<Decimal>,
}

impl TechnicalSnapshot {
    /// 시계열의 마지막 봉 기준으로 모든 지표를 계산합니다.
    pub fn from_series(series: &Series, config: &IndicatorConfig) -> Self {
        let engine = IndicatorEngine::new();

        let closes = series.closes();
        let highs = series.highs();
        let lows = series.lows();
        let volumes = series.volumes();

        let rsi = last_value(
            "rsi",
            engine.rsi(&closes, RsiParams { period: config.rsi_period }),
        );

        let macd = last_row(
            "macd",
            engine.macd(
                &closes,
                MacdParams {
                    fast_period: config.macd_fast,
                    slow_period: config.macd_slow,
                    signal_period: config.macd_signal,
                },
            ),
        )
        .and_then(|row| {
            Some(MacdSnapshot {
                macd: row.macd?,
                signal: row.signal?,
                histogram: row.histogram?,
            })
        });

        let stochastic = last_row(
            "stochastic",
            engine.stochastic(
                &highs,
                &lows,
                &closes,
                StochasticParams {
                    k_period: config.stochastic_k,
                    d_period: config.stochastic_d,
                },
            ),
        )
        .and_then(|row| Some(StochasticSnapshot { k: row.k?, d: row.d }));

        let bollinger = price_from_f64(config.bollinger_multiplier).and_then(|multiplier| {
            let row = last_row(
                "bollinger",
                engine.bollinger_bands(
                    &closes,
                    BollingerBandsParams {
                        period: config.bollinger_period,
                        std_dev_multiplier: multiplier,
                    },
                ),
            )?;
            Some(BollingerSnapshot {
                price: *closes.last()?,
                upper: row.upper?,
                middle: row.middle?,
                lower: row.lower?,
                percent_b: row.percent_b,
                bandwidth: row.bandwidth,
            })
        });

        let atr = last_value(
            "atr",
            engine.atr(&highs, &lows, &closes, AtrParams { period: config.atr_period }),
        );

        let williams_r = last_value(
            "williams_r",
            engine.williams_r(
                &highs,
                &lows,
                &closes,
                WilliamsRParams { period: config.williams_period },
            ),
        );

        let obv = last_row("obv", engine.obv(&closes, &volumes)).map(|row| row.obv);

        let adx = last_row(
            "adx",
            engine.adx(&highs, &lows, &closes, AdxParams { period: config.adx_period }),
        )
        .and_then(|row| {
            Some(AdxSnapshot {
                adx: row.adx?,
                plus_di: row.plus_di?,
                minus_di: row.minus_di?,
            })
        });

        let cci = last_value(
            "cci",
            engine.cci(&highs, &lows, &closes, CciParams { period: config.cci_period }),
        );

        let sma = last_value("sma", engine.sma(&closes, SmaParams { period: config.sma_period }));
        let ema = last_value("ema", engine.ema(&closes, EmaParams { period: config.ema_period }));

        Self {
            as_of: series.end_date(),
            last_close: closes.last().copied(),
            rsi,
            macd,
            stochastic,
            bollinger,
            atr,
            williams_r,
            obv,
            adx,
            cci,
            sma,
            ema,
        }
    }
}

/// 롤링 결과의 마지막 행. 오류는 debug 로그를 남기고 None.
fn last_row<T: Copy>(name: &str, result: IndicatorResult<Vec<T>>) -> Option<T> {
    match result {
        Ok(rows) => rows.last().copied(),
        Err(e) => {
            debug!(indicator = name, error = %e, "지표를 계산할 수 없습니다");
            None
        }
    }
}

fn last_value(name: &str, result: IndicatorResult<Vec<Option<Decimal>>>) -> Option<Decimal> {
    last_row(name, result).flatten()
}
