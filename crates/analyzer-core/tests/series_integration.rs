//! Series 불변식 통합 테스트
//!
//! 입력 순서와 무관하게 날짜 오름차순과 중복 없음이 보장되는지 확인

use analyzer_core::{Bar, PeriodSpec, PeriodToken, Series};
use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
}

proptest! {
    #[test]
    fn series_is_strictly_ascending(offsets in prop::collection::vec(0i64..400, 0..120)) {
        let bars: Vec<Bar> = offsets
            .iter()
            .map(|&o| Bar::from_close(base_date() + Duration::days(o), Decimal::from(100 + o)))
            .collect();

        let series = Series::new(bars);

        prop_assert!(series.bars().windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn between_is_a_contiguous_subsequence(
        len in 0usize..60,
        start in 0i64..80,
        span in 0i64..80,
    ) {
        let series = Series::new(
            (0..len as i64)
                .map(|o| Bar::from_close(base_date() + Duration::days(o), Decimal::from(10 + o)))
                .collect(),
        );
        let from = base_date() + Duration::days(start);
        let to = from + Duration::days(span);

        let window = series.between(Some(from), Some(to));

        prop_assert!(window.iter().all(|bar| bar.date >= from && bar.date <= to));
        let expected = series.iter().filter(|bar| bar.date >= from && bar.date <= to).count();
        prop_assert_eq!(window.len(), expected);
    }
}

#[test]
fn test_period_spec_json_shape() {
    let spec = PeriodSpec::Relative(PeriodToken::OneYear);
    let json = serde_json::to_value(spec).unwrap();
    assert_eq!(json, serde_json::json!({ "relative": "1y" }));
}
