//! 날짜 오름차순으로 정렬된 일봉 시계열.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::Bar;
use crate::types::{DecimalExt, Price, Volume};

/// 불변 일봉 시계열.
///
/// 생성 시점에 날짜 오름차순 정렬과 날짜 중복 제거가 보장됩니다.
/// 필터링은 항상 새 시계열을 만들며 원본을 변경하지 않습니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Bar>", into = "Vec<Bar>")]
pub struct Series {
    bars: Vec<Bar>,
}

impl Series {
    /// 일봉 목록으로 시계열을 생성합니다.
    ///
    /// 정렬되어 있지 않으면 안정 정렬하고, 같은 날짜가 여러 번 나오면
    /// 마지막 레코드를 남깁니다.
    pub fn new(mut bars: Vec<Bar>) -> Self {
        let sorted = bars.windows(2).all(|w| w[0].date <= w[1].date);
        if !sorted {
            bars.sort_by_key(|bar| bar.date);
        }

        let before = bars.len();
        let mut deduped: Vec<Bar> = Vec::with_capacity(before);
        for bar in bars {
            match deduped.last_mut() {
                Some(last) if last.date == bar.date => *last = bar,
                _ => deduped.push(bar),
            }
        }

        if deduped.len() != before {
            warn!(
                dropped = before - deduped.len(),
                "중복 날짜 레코드를 제거했습니다 (마지막 레코드 유지)"
            );
        }

        Self { bars: deduped }
    }

    /// 빈 시계열.
    pub fn empty() -> Self {
        Self::default()
    }

    /// 일봉 개수.
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// 비어 있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// 일봉 슬라이스.
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// 일봉 반복자.
    pub fn iter(&self) -> std::slice::Iter<'_, Bar> {
        self.bars.iter()
    }

    /// 첫 일봉.
    pub fn first(&self) -> Option<&Bar> {
        self.bars.first()
    }

    /// 마지막 일봉.
    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// 시작일.
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.first().map(|bar| bar.date)
    }

    /// 종료일.
    pub fn end_date(&self) -> Option<NaiveDate> {
        self.last().map(|bar| bar.date)
    }

    /// 종가 목록.
    pub fn closes(&self) -> Vec<Price> {
        self.bars.iter().map(|bar| bar.close).collect()
    }

    /// 고가 목록.
    pub fn highs(&self) -> Vec<Price> {
        self.bars.iter().map(|bar| bar.high).collect()
    }

    /// 저가 목록.
    pub fn lows(&self) -> Vec<Price> {
        self.bars.iter().map(|bar| bar.low).collect()
    }

    /// 거래량 목록.
    pub fn volumes(&self) -> Vec<Volume> {
        self.bars.iter().map(|bar| bar.volume).collect()
    }

    /// 통계 계산용 `f64` 종가 목록.
    pub fn closes_f64(&self) -> Vec<f64> {
        self.bars.iter().map(|bar| bar.close.to_f64_or_zero()).collect()
    }

    /// `[start, end]` 범위(양끝 포함)의 일봉으로 새 시계열을 만듭니다.
    ///
    /// `None`은 해당 방향으로 제한이 없음을 뜻합니다.
    pub fn between(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Series {
        let lo = match start {
            Some(start) => self.bars.partition_point(|bar| bar.date < start),
            None => 0,
        };
        let hi = match end {
            Some(end) => self.bars.partition_point(|bar| bar.date <= end),
            None => self.bars.len(),
        };

        if lo >= hi {
            return Series::empty();
        }

        Series {
            bars: self.bars[lo..hi].to_vec(),
        }
    }
}

impl From<Vec<Bar>> for Series {
    fn from(bars: Vec<Bar>) -> Self {
        Series::new(bars)
    }
}

impl From<Series> for Vec<Bar> {
    fn from(series: Series) -> Self {
        series.bars
    }
}

impl<'a> IntoIterator for &'a Series {
    type Item = &'a Bar;
    type IntoIter = std::slice::Iter<'a, Bar>;

    fn into_iter(self) -> Self::IntoIter {
        self.bars.iter()
    }
}
