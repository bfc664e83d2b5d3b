//! 분석 지표 불변식 속성 테스트
//!
//! - 총 수익률은 종가 배율에 무관
//! - 최대 낙폭은 항상 0 이하, 종가가 비감소일 때만 정확히 0
//! - 히스토그램 관측 수 합계 = 일봉 수 - 1
//! - 종가가 비감소이면 OBV도 비감소
//! - 짧은 시계열의 지표는 모두 0

use analyzer_analytics::distribution::DistributionResult;
use analyzer_analytics::indicators::ObvIndicator;
use analyzer_analytics::performance::{daily_returns, total_return_pct, MetricsResult};
use analyzer_core::{Bar, BinningPolicy, Series};
use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;

fn series_from_cents(cents: &[u32]) -> Series {
    let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    Series::new(
        cents
            .iter()
            .enumerate()
            .map(|(i, c)| {
                Bar::from_close(start + Duration::days(i as i64), Decimal::new(*c as i64, 2))
            })
            .collect(),
    )
}

fn closes_strategy() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(1u32..1_000_000, 0..80)
}

proptest! {
    #[test]
    fn total_return_is_scale_invariant(
        closes in prop::collection::vec(1.0f64..10_000.0, 2..60),
        k in 0.01f64..1_000.0,
    ) {
        let scaled: Vec<f64> = closes.iter().map(|c| c * k).collect();
        let base = total_return_pct(&closes);
        let rescaled = total_return_pct(&scaled);
        prop_assert!((base - rescaled).abs() <= 1e-6 * base.abs().max(1.0));
    }

    #[test]
    fn max_drawdown_is_never_positive(cents in closes_strategy()) {
        let metrics = MetricsResult::from_series(&series_from_cents(&cents), 0.04);
        prop_assert!(metrics.max_drawdown_pct <= 0.0);
        prop_assert!(metrics.avg_drawdown_pct <= 0.0);
        prop_assert!(metrics.current_drawdown_pct <= 0.0);
    }

    #[test]
    fn max_drawdown_zero_iff_non_decreasing(
        mut cents in prop::collection::vec(1u32..1_000_000, 2..80),
    ) {
        let non_decreasing = cents.windows(2).all(|w| w[0] <= w[1]);
        let metrics = MetricsResult::from_series(&series_from_cents(&cents), 0.04);
        prop_assert_eq!(metrics.max_drawdown_pct == 0.0, non_decreasing);

        cents.sort_unstable();
        let sorted = MetricsResult::from_series(&series_from_cents(&cents), 0.04);
        prop_assert_eq!(sorted.max_drawdown_pct, 0.0);
    }

    #[test]
    fn histogram_counts_sum_to_return_count(cents in closes_strategy(), bins in 1usize..40) {
        let series = series_from_cents(&cents);
        let expected = series.len().saturating_sub(1);

        for policy in [BinningPolicy::ZeroAnchored, BinningPolicy::EqualWidth] {
            let result = DistributionResult::from_series(&series, bins, policy);
            prop_assert_eq!(result.histogram.iter().sum::<usize>(), expected);
            if expected > 0 {
                prop_assert_eq!(result.bin_edges.len(), result.histogram.len() + 1);
            }
            prop_assert!(result.skewness.is_finite());
            prop_assert!(result.kurtosis.is_finite());
        }
    }

    #[test]
    fn obv_is_monotone_for_non_decreasing_closes(
        mut cents in prop::collection::vec(1u32..1_000_000, 1..60),
        volumes in prop::collection::vec(0u64..1_000_000, 60),
    ) {
        cents.sort_unstable();
        let closes: Vec<Decimal> = cents.iter().map(|c| Decimal::new(*c as i64, 2)).collect();
        let volumes = &volumes[..closes.len()];

        let obv = ObvIndicator::new().calculate(&closes, volumes).unwrap();

        prop_assert_eq!(obv[0].obv, 0);
        prop_assert!(obv.windows(2).all(|w| w[0].obv <= w[1].obv));
    }

    #[test]
    fn metrics_are_always_finite(cents in closes_strategy()) {
        let series = series_from_cents(&cents);
        let closes = series.closes_f64();
        let metrics = MetricsResult::from_parts(&closes, &daily_returns(&closes), 0.04);

        for value in [
            metrics.total_return_pct,
            metrics.volatility_pct,
            metrics.log_volatility_pct,
            metrics.sharpe_ratio,
            metrics.sortino_ratio,
            metrics.var_95_pct,
        ] {
            prop_assert!(value.is_finite());
        }
    }
}

#[test]
fn short_series_metrics_are_zero() {
    for cents in [vec![], vec![10_000]] {
        let metrics = MetricsResult::from_series(&series_from_cents(&cents), 0.04);
        assert_eq!(metrics.total_return_pct, 0.0);
        assert_eq!(metrics.sharpe_ratio, 0.0);
        assert_eq!(metrics.sortino_ratio, 0.0);
        assert_eq!(metrics.max_drawdown_pct, 0.0);
        assert_eq!(metrics.var_95_pct, 0.0);
    }
}

#[test]
fn constant_returns_have_zero_moments() {
    let series = series_from_cents(&[10_000; 30]);
    let result = DistributionResult::from_series(&series, 20, BinningPolicy::ZeroAnchored);

    assert_eq!(result.skewness, 0.0);
    assert_eq!(result.kurtosis, 0.0);
    assert_eq!(result.histogram, vec![29]);
}
