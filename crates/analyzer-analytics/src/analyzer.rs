//! 분석 파이프라인.
//!
//! 기간 필터를 적용한 뒤 일간 수익률을 한 번만 계산해 리스크 지표,
//! 분포, 계절성 분석에 나눠 주고, 기술적 지표 스냅샷을 함께 묶어
//! 보고서를 만듭니다.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info_span};

use analyzer_core::{AnalyticsConfig, PeriodSpec, Series};

use crate::distribution::DistributionResult;
use crate::performance::{daily_returns, MetricsResult};
use crate::period_filter;
use crate::seasonality::SeasonalityResult;
use crate::snapshot::TechnicalSnapshot;

/// 한 기간에 대한 분석 보고서.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// 적용한 기간
    pub period: PeriodSpec,
    /// 기간 내 일봉 개수
    pub bars: usize,
    /// 기간 시작일
    pub start_date: Option<NaiveDate>,
    /// 기간 종료일
    pub end_date: Option<NaiveDate>,
    /// 수익률/리스크 지표
    pub metrics: MetricsResult,
    /// 수익률 분포
    pub distribution: DistributionResult,
    /// 계절성
    pub seasonality: SeasonalityResult,
    /// 기술적 지표
    pub technical: TechnicalSnapshot,
}

/// 분석기.
///
/// 상태를 갖지 않으므로 같은 입력에는 항상 같은 보고서를 돌려줍니다.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AnalyticsConfig,
}

impl Analyzer {
    /// 설정으로 분석기를 생성합니다.
    pub fn new(config: AnalyticsConfig) -> Self {
        Self { config }
    }

    /// 기간을 적용해 분석합니다.
    ///
    /// `today`는 상대 기간의 기준일입니다.
    pub fn analyze(
        &self,
        series: &Series,
        period: &PeriodSpec,
        today: NaiveDate,
    ) -> AnalysisReport {
        let _span = info_span!("analyze", period = %period.label()).entered();

        let window = period_filter::filter(series, period, today);
        self.analyze_window(&window, *period)
    }

    /// 기간 필터 없이 시계열 전체를 분석합니다.
    pub fn analyze_series(&self, series: &Series) -> AnalysisReport {
        self.analyze_window(series, PeriodSpec::default())
    }

    fn analyze_window(&self, window: &Series, period: PeriodSpec) -> AnalysisReport {
        let closes = window.closes_f64();
        let returns = daily_returns(&closes);

        debug!(bars = window.len(), returns = returns.len(), "분석 시작");

        AnalysisReport {
            period,
            bars: window.len(),
            start_date: window.start_date(),
            end_date: window.end_date(),
            metrics: MetricsResult::from_parts(&closes, &returns, self.config.risk_free_rate),
            distribution: DistributionResult::from_returns(
                &returns,
                self.config.histogram_bins,
                self.config.binning,
            ),
            seasonality: SeasonalityResult::from_parts(window, &returns),
            technical: TechnicalSnapshot::from_series(window, &self.config.indicators),
        }
    }
}
