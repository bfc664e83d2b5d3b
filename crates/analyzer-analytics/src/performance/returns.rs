//! 일간 수익률 계산.
//!
//! 리스크 지표, 분포, 요일별 평균이 모두 같은 일간 수익률을 쓰므로
//! 파이프라인에서 한 번만 계산해 넘겨줍니다.

use crate::statistics::finite_or_zero;

/// 일간 단순 수익률 `r[i] = (c[i] - c[i-1]) / c[i-1]`.
///
/// 결과 길이는 `closes.len() - 1`이며, 종가가 2개 미만이면 빈 벡터입니다.
/// 직전 종가가 0이면 해당 수익률은 0으로 둡니다.
pub fn daily_returns(closes: &[f64]) -> Vec<f64> {
    closes
        .windows(2)
        .map(|w| {
            if w[0] == 0.0 {
                0.0
            } else {
                finite_or_zero((w[1] - w[0]) / w[0])
            }
        })
        .collect()
}

/// 일간 로그 수익률 `ln(c[i] / c[i-1])`.
pub fn log_returns(closes: &[f64]) -> Vec<f64> {
    closes
        .windows(2)
        .map(|w| {
            if w[0] <= 0.0 || w[1] <= 0.0 {
                0.0
            } else {
                finite_or_zero((w[1] / w[0]).ln())
            }
        })
        .collect()
}

/// 총 수익률(%) `(마지막 - 처음) / 처음 × 100`. 종가가 2개 미만이면 0.
pub fn total_return_pct(closes: &[f64]) -> f64 {
    match (closes.first(), closes.last()) {
        (Some(&first), Some(&last)) if closes.len() >= 2 && first != 0.0 => {
            finite_or_zero((last - first) / first * 100.0)
        }
        _ => 0.0,
    }
}
