//! 설정 관리.
//!
//! 분석 코어의 조정 가능한 값(무위험 이자율, 히스토그램 구간 수, 지표별
//! 조회 기간)과 로깅 설정을 정의합니다. 모든 항목에 기본값이 있으므로
//! 설정 파일 없이도 동작합니다.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// 로깅 설정
    pub logging: LoggingConfig,
    /// 분석 설정
    pub analytics: AnalyticsConfig,
}

/// 로깅 설정.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
    /// span 진입/종료 이벤트 기록 여부
    pub span_events: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            span_events: false,
        }
    }
}

/// 수익률 히스토그램 구간 구성 방식.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BinningPolicy {
    /// 0을 경계로 정렬된 등간격 구간 (구간 수는 입력에 따라 달라짐)
    #[default]
    ZeroAnchored,
    /// 관측 최소~최대 범위를 목표 구간 수로 등분
    EqualWidth,
}

/// 분석 설정.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// 연간 무위험 이자율 (0.04 = 4%)
    pub risk_free_rate: f64,
    /// 수익률 히스토그램 목표 구간 수
    pub histogram_bins: usize,
    /// 히스토그램 구간 구성 방식
    pub binning: BinningPolicy,
    /// 기본 조회 기간 토큰
    pub default_period: String,
    /// 기술적 지표 설정
    pub indicators: IndicatorConfig,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.04,
            histogram_bins: 20,
            binning: BinningPolicy::ZeroAnchored,
            default_period: "max".to_string(),
            indicators: IndicatorConfig::default(),
        }
    }
}

/// 기술적 지표 조회 기간 설정.
///
/// 각 지표의 기간은 독립적으로 덮어쓸 수 있습니다.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct IndicatorConfig {
    /// RSI 기간
    pub rsi_period: usize,
    /// MACD 단기 EMA 기간
    pub macd_fast: usize,
    /// MACD 장기 EMA 기간
    pub macd_slow: usize,
    /// MACD 시그널 기간
    pub macd_signal: usize,
    /// 스토캐스틱 %K 기간
    pub stochastic_k: usize,
    /// 스토캐스틱 %D 평활 기간
    pub stochastic_d: usize,
    /// 볼린저 밴드 기간
    pub bollinger_period: usize,
    /// 볼린저 밴드 표준편차 배수
    pub bollinger_multiplier: f64,
    /// ATR 기간
    pub atr_period: usize,
    /// Williams %R 기간
    pub williams_period: usize,
    /// ADX 기간
    pub adx_period: usize,
    /// CCI 기간
    pub cci_period: usize,
    /// 차트 오버레이용 SMA 기간
    pub sma_period: usize,
    /// 차트 오버레이용 EMA 기간
    pub ema_period: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            stochastic_k: 14,
            stochastic_d: 3,
            bollinger_period: 20,
            bollinger_multiplier: 2.0,
            atr_period: 14,
            williams_period: 14,
            adx_period: 14,
            cci_period: 20,
            sma_period: 20,
            ema_period: 20,
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값과 환경 변수(`ANALYZER__ANALYTICS__RISK_FREE_RATE` 등)만
    /// 사용합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix("ANALYZER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }
}
