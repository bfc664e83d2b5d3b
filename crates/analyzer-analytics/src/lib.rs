//! 금융 시계열 분석 엔진.
//!
//! 이 크레이트는 일봉 시계열에 대한 분석 기능을 제공합니다:
//! - 원시 레코드 정규화 ([`normalizer`])
//! - 조회 기간 필터 ([`period_filter`])
//! - 수익률/리스크 지표 ([`performance`])
//! - 수익률 분포 ([`distribution`])
//! - 계절성 ([`seasonality`])
//! - 기술적 지표 ([`indicators`], [`snapshot`])
//! - 위 기능을 묶은 파이프라인 ([`analyzer`])
//!
//! 모든 함수는 입력만으로 결과가 정해지는 순수 함수이며, 데이터가
//! 부족하면 0 또는 `None`을 반환합니다.

pub mod analyzer;
pub mod distribution;
pub mod indicators;
pub mod normalizer;
pub mod performance;
pub mod period_filter;
pub mod seasonality;
pub mod snapshot;
pub mod statistics;

pub use analyzer::{AnalysisReport, Analyzer};
pub use distribution::{DistributionResult, Histogram};
pub use indicators::{IndicatorEngine, IndicatorError, IndicatorResult};
pub use normalizer::{normalize, normalize_json, normalize_values};
pub use performance::{daily_returns, DrawdownStats, MetricsResult};
pub use seasonality::{MonthlyHeatmap, MonthlyReturnCell, SeasonalityResult};
pub use snapshot::{
    AdxSnapshot, BollingerSnapshot, MacdSnapshot, StochasticSnapshot, TechnicalSnapshot,
};
