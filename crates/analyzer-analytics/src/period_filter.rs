//! 조회 기간 필터.
//!
//! 상대 기간(`1mo` ~ `max`) 또는 명시적 날짜 범위로 시계열의 연속 구간을
//! 잘라냅니다. 항상 새 시계열을 반환하며 원본은 그대로입니다.

use chrono::NaiveDate;
use tracing::debug;

use analyzer_core::{PeriodSpec, Series};

/// 기준일 `today`로 기간을 적용합니다.
///
/// - 상대 기간: `date >= cutoff`인 봉 (`max`는 전체)
/// - 날짜 범위: `start <= date <= end`인 봉
///
/// 결과가 비어 있어도 정상입니다.
pub fn filter(series: &Series, spec: &PeriodSpec, today: NaiveDate) -> Series {
    let filtered = match spec {
        PeriodSpec::Relative(token) => match token.cutoff(today) {
            Some(cutoff) => series.between(Some(cutoff), None),
            None => series.clone(),
        },
        PeriodSpec::Range { start, end } => series.between(Some(*start), Some(*end)),
    };

    debug!(
        period = %spec.label(),
        before = series.len(),
        after = filtered.len(),
        "기간 필터 적용"
    );

    filtered
}

/// 토큰 문자열로 기간을 적용합니다. 알 수 없는 토큰은 전체 기간입니다.
pub fn filter_by_token(series: &Series, token: &str, today: NaiveDate) -> Series {
    filter(series, &PeriodSpec::from_token(token), today)
}
