//! 계절성 분석.
//!
//! - 연도 × 월 수익률 히트맵
//! - 달력 월별 평균 수익률
//! - 요일별(월~금) 평균 일간 수익률
//!
//! 날짜는 타임존이 없는 달력 날짜이므로 요일이 하루씩 밀리지 않습니다.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Weekday};
use serde::{Deserialize, Serialize};

use analyzer_core::Series;

use crate::performance::daily_returns;
use crate::statistics::{finite_or_zero, mean};

/// 히트맵 한 칸 (관측된 월만).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyReturnCell {
    /// 연도
    pub year: i32,

    /// 월 (1-12)
    pub month: u32,

    /// 수익률 (%)
    pub return_pct: f64,

    /// 색상 강도 (-1.0 ~ 1.0, 정규화됨)
    pub intensity: f64,
}

/// 연도 × 월 수익률 히트맵.
///
/// `data[y][m]`은 `years[y]`년 `m + 1`월의 (월말 종가 - 월초 종가) / 월초
/// 종가입니다. 데이터가 없는 달은 0이며, 실제 0% 수익률과 구분하려면
/// `observed`를 봅니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyHeatmap {
    /// 연도 (오름차순)
    pub years: Vec<i32>,
    /// 월별 수익률 (소수, 0.05 = 5%)
    pub data: Vec<[f64; 12]>,
    /// 해당 월에 관측 데이터가 있었는지 여부
    pub observed: Vec<[bool; 12]>,
}

impl MonthlyHeatmap {
    /// 시계열에서 히트맵을 만듭니다.
    pub fn from_series(series: &Series) -> Self {
        // (연, 월) → (월초 종가, 월말 종가)
        let mut months: BTreeMap<(i32, u32), (f64, f64)> = BTreeMap::new();
        for (bar, close) in series.iter().zip(series.closes_f64()) {
            months
                .entry((bar.date.year(), bar.date.month0()))
                .and_modify(|(_, last)| *last = close)
                .or_insert((close, close));
        }

        let years: Vec<i32> = months
            .keys()
            .map(|(year, _)| *year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut data = vec![[0.0; 12]; years.len()];
        let mut observed = vec![[false; 12]; years.len()];

        for ((year, month0), (first, last)) in months {
            // years는 months의 키에서 만들었으므로 항상 존재
            let Ok(row) = years.binary_search(&year) else {
                continue;
            };
            let month = month0 as usize;
            data[row][month] = if first != 0.0 {
                finite_or_zero((last - first) / first)
            } else {
                0.0
            };
            observed[row][month] = true;
        }

        Self {
            years,
            data,
            observed,
        }
    }

    /// 히트맵이 비어 있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// 관측된 월의 셀 목록 (퍼센트, 강도 정규화 포함).
    ///
    /// 강도는 절대값이 가장 큰 수익률을 ±1로 맞춘 값입니다.
    pub fn cells(&self) -> Vec<MonthlyReturnCell> {
        let mut cells: Vec<MonthlyReturnCell> = self
            .years
            .iter()
            .enumerate()
            .flat_map(|(row, year)| {
                (0..12)
                    .filter(move |m| self.observed[row][*m])
                    .map(move |m| MonthlyReturnCell {
                        year: *year,
                        month: m as u32 + 1,
                        return_pct: self.data[row][m] * 100.0,
                        intensity: 0.0,
                    })
            })
            .collect();

        let max_abs = cells
            .iter()
            .map(|c| c.return_pct.abs())
            .fold(0.0, f64::max);

        if max_abs > 0.0 {
            for cell in &mut cells {
                cell.intensity = (cell.return_pct / max_abs).clamp(-1.0, 1.0);
            }
        }

        cells
    }
}

/// 계절성 분석 결과.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonalityResult {
    /// 연도 × 월 히트맵
    pub heatmap: MonthlyHeatmap,
    /// 월(1-12) → 평균 월간 수익률 (소수)
    pub avg_monthly: BTreeMap<u32, f64>,
    /// 요일(0=월 .. 4=금) → 평균 일간 수익률 (%)
    pub avg_daily: BTreeMap<u32, f64>,
}

impl SeasonalityResult {
    /// 시계열에서 계절성 지표를 계산합니다.
    pub fn from_series(series: &Series) -> Self {
        let returns = daily_returns(&series.closes_f64());
        Self::from_parts(series, &returns)
    }

    /// 미리 계산한 일간 수익률로 계절성 지표를 계산합니다.
    pub fn from_parts(series: &Series, returns: &[f64]) -> Self {
        let heatmap = MonthlyHeatmap::from_series(series);
        let avg_monthly = avg_monthly(&heatmap);
        let avg_daily = avg_daily(series, returns);

        Self {
            heatmap,
            avg_monthly,
            avg_daily,
        }
    }
}

/// 달력 월별 평균 수익률.
///
/// 관측된 달만 평균하며, 한 번도 관측되지 않은 달은 0입니다.
/// 결과에는 항상 1~12월이 모두 들어 있습니다.
pub fn avg_monthly(heatmap: &MonthlyHeatmap) -> BTreeMap<u32, f64> {
    (0..12)
        .map(|m| {
            let values: Vec<f64> = heatmap
                .data
                .iter()
                .zip(&heatmap.observed)
                .filter(|(_, observed)| observed[m])
                .map(|(row, _)| row[m])
                .collect();
            (m as u32 + 1, finite_or_zero(mean(&values)))
        })
        .collect()
}

/// 요일별 평균 일간 수익률 (%).
///
/// `returns[i - 1]`은 `series`의 i번째 봉의 전일 대비 수익률입니다.
/// 주말 봉은 제외하며, 결과에는 항상 0(월)~4(금)만 들어 있습니다.
pub fn avg_daily(series: &Series, returns: &[f64]) -> BTreeMap<u32, f64> {
    let mut by_weekday: [Vec<f64>; 5] = Default::default();

    for (bar, ret) in series.iter().skip(1).zip(returns) {
        let weekday = bar.date.weekday();
        if matches!(weekday, Weekday::Sat | Weekday::Sun) {
            continue;
        }
        by_weekday[weekday.num_days_from_monday() as usize].push(*ret);
    }

    by_weekday
        .iter()
        .enumerate()
        .map(|(idx, rets)| (idx as u32, finite_or_zero(mean(rets) * 100.0)))
        .collect()
}
