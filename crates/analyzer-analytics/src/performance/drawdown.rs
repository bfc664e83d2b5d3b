//! 낙폭(drawdown) 분석.
//!
//! 낙폭은 첫 봉부터 누적한 최고 종가 대비 현재 종가의 하락률입니다.
//! 모든 값은 0 이하의 퍼센트입니다.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use analyzer_core::Series;

use crate::statistics::{finite_or_zero, mean};

/// 봉별 낙폭 비율 `(c[i] - peak[i]) / peak[i]`.
///
/// 고점은 첫 봉의 종가로 시작합니다. 결과 길이는 입력과 같습니다.
pub fn drawdowns(closes: &[f64]) -> Vec<f64> {
    let Some(&first) = closes.first() else {
        return Vec::new();
    };

    let mut peak = first;
    closes
        .iter()
        .map(|&close| {
            if close > peak {
                peak = close;
            }
            if peak > 0.0 {
                finite_or_zero((close - peak) / peak)
            } else {
                0.0
            }
        })
        .collect()
}

/// 낙폭 요약 통계 (퍼센트).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DrawdownStats {
    /// 최대 낙폭 (가장 작은 값, ≤ 0)
    pub max_drawdown_pct: f64,
    /// 평균 낙폭 (0 미만인 날만 평균, 없으면 0)
    pub avg_drawdown_pct: f64,
    /// 마지막 봉의 낙폭
    pub current_drawdown_pct: f64,
}

impl DrawdownStats {
    /// 종가 목록에서 낙폭 통계를 계산합니다. 종가가 2개 미만이면 모두 0.
    pub fn from_closes(closes: &[f64]) -> Self {
        if closes.len() < 2 {
            return Self::default();
        }

        let series = drawdowns(closes);
        let underwater: Vec<f64> = series.iter().copied().filter(|dd| *dd < 0.0).collect();

        Self {
            max_drawdown_pct: series.iter().copied().fold(0.0, f64::min) * 100.0,
            avg_drawdown_pct: mean(&underwater) * 100.0,
            current_drawdown_pct: series.last().copied().unwrap_or(0.0) * 100.0,
        }
    }
}

/// 날짜별 낙폭(%) 시계열. 낙폭 차트용입니다.
pub fn drawdown_series(series: &Series) -> Vec<(NaiveDate, f64)> {
    let closes = series.closes_f64();
    series
        .iter()
        .zip(drawdowns(&closes))
        .map(|(bar, dd)| (bar.date, dd * 100.0))
        .collect()
}
