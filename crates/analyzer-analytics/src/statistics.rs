//! 기초 통계 함수.
//!
//! 모두 모집단(population) 기준입니다. 빈 입력이나 0으로 나누는 경우
//! NaN 대신 0을 반환합니다.

/// NaN/무한대를 0으로 치환합니다.
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// 산술 평균. 빈 입력이면 0.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// 모집단 분산. 빈 입력이거나 모든 값이 같으면 정확히 0.
pub fn population_variance(values: &[f64]) -> f64 {
    let Some(&first) = values.first() else {
        return 0.0;
    };
    // 부동소수점 평균 오차로 상수열의 분산이 0이 아니게 되는 것을 막음
    if values.iter().all(|v| *v == first) {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64
}

/// 모집단 표준편차.
pub fn population_std_dev(values: &[f64]) -> f64 {
    population_variance(values).sqrt()
}

/// 중앙값. 빈 입력이면 0.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// k차 중심 적률 Σ(x-μ)^k / n.
pub fn central_moment(values: &[f64], mean: f64, order: i32) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|v| (v - mean).powi(order)).sum::<f64>() / values.len() as f64
}
