//! 일봉 레코드 정규화.
//!
//! 백엔드 응답은 필드 표기가 섞여 있고(`Close`/`close`), 날짜에 시각이나
//! 오프셋이 붙어 오기도 합니다. 이 모듈은 원시 레코드를 표준 [`Bar`]로
//! 바꾸고 날짜 오름차순 [`Series`]를 만듭니다.
//!
//! # 정책
//!
//! - 종가가 없거나 0 이하/유한하지 않은 레코드는 버립니다.
//! - 종가가 `Decimal` 표현 범위(약 7.9e28)를 넘는 레코드는 버립니다.
//! - 날짜를 해석할 수 없는 레코드는 버립니다.
//! - 시가/고가/저가가 없으면 종가로 채웁니다.
//! - 거래량이 없거나 음수면 0, 소수점 이하는 버립니다.
//! - 같은 날짜가 여러 번 나오면 마지막 레코드를 유지합니다.

use analyzer_core::{price_from_f64, AnalyzerError, AnalyzerResult, Bar, RawBar, Series, Volume};
use chrono::{DateTime, NaiveDate};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// 레코드를 버린 이유.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// 종가 없음
    MissingClose,
    /// 종가가 0 이하이거나 유한하지 않음
    InvalidClose,
    /// 종가가 `Decimal` 표현 범위를 넘음
    CloseOutOfRange,
    /// 날짜 없음 또는 해석 불가
    InvalidDate,
}

/// 원시 레코드 하나를 표준 일봉으로 변환합니다.
pub fn normalize_record(raw: &RawBar) -> Result<Bar, RejectReason> {
    let close_raw = raw.close.ok_or(RejectReason::MissingClose)?;
    if !close_raw.is_finite() || close_raw <= 0.0 {
        return Err(RejectReason::InvalidClose);
    }
    let close = price_from_f64(close_raw).ok_or(RejectReason::CloseOutOfRange)?;

    let date = raw
        .date
        .as_deref()
        .and_then(parse_date)
        .ok_or(RejectReason::InvalidDate)?;

    let fallback = |value: Option<f64>| {
        value
            .filter(|v| *v > 0.0)
            .and_then(price_from_f64)
            .unwrap_or(close)
    };

    Ok(Bar::new(
        date,
        fallback(raw.open),
        fallback(raw.high),
        fallback(raw.low),
        close,
        to_volume(raw.volume),
    ))
}

/// 원시 레코드 목록을 정렬된 시계열로 정규화합니다.
///
/// 빈 입력은 빈 시계열이 됩니다.
pub fn normalize<'a, I>(records: I) -> Series
where
    I: IntoIterator<Item = &'a RawBar>,
{
    let mut bars = Vec::new();
    let mut rejected = 0usize;

    for (index, raw) in records.into_iter().enumerate() {
        match normalize_record(raw) {
            Ok(bar) => bars.push(bar),
            Err(reason) => {
                rejected += 1;
                debug!(index, ?reason, "레코드 제외");
            }
        }
    }

    if rejected > 0 {
        warn!(rejected, kept = bars.len(), "잘못된 레코드를 제외했습니다");
    }

    Series::new(bars)
}

/// JSON 객체 목록을 정규화합니다.
///
/// 키 대소문자를 가리지 않으며, 소문자 키가 있으면 우선합니다.
/// 객체가 아닌 원소는 버립니다.
pub fn normalize_values(values: &[Value]) -> Series {
    let raws: Vec<RawBar> = values
        .iter()
        .filter_map(Value::as_object)
        .map(raw_from_object)
        .collect();

    let skipped = values.len() - raws.len();
    if skipped > 0 {
        warn!(skipped, "객체가 아닌 원소를 제외했습니다");
    }

    normalize(&raws)
}

/// JSON 배열 문자열을 정규화합니다.
///
/// 최상위가 배열이 아니면 `chart_data` 필드(백엔드 응답 형태)를 찾습니다.
pub fn normalize_json(input: &str) -> AnalyzerResult<Series> {
    let value: Value = serde_json::from_str(input)?;

    match &value {
        Value::Array(items) => Ok(normalize_values(items)),
        Value::Object(map) => match map.get("chart_data") {
            Some(Value::Array(items)) => Ok(normalize_values(items)),
            _ => Err(AnalyzerError::Data(
                "일봉 배열 또는 chart_data 필드가 필요합니다".to_string(),
            )),
        },
        Value::Null => Ok(Series::empty()),
        _ => Err(AnalyzerError::Data("일봉 배열이 아닙니다".to_string())),
    }
}

fn raw_from_object(map: &Map<String, Value>) -> RawBar {
    RawBar {
        date: field(map, &["date", "datetime"]).and_then(date_string),
        open: field(map, &["open"]).and_then(number),
        high: field(map, &["high"]).and_then(number),
        low: field(map, &["low"]).and_then(number),
        close: field(map, &["close"]).and_then(number),
        volume: field(map, &["volume"]).and_then(number),
    }
}

/// 후보 키 중 처음 일치하는 값을 찾습니다. 정확히 일치하는 키 우선.
fn field<'a>(map: &'a Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    names.iter().find_map(|name| {
        map.get(*name).filter(|v| !v.is_null()).or_else(|| {
            map.iter()
                .find(|(key, v)| key.eq_ignore_ascii_case(name) && !v.is_null())
                .map(|(_, v)| v)
        })
    })
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// 날짜 값을 문자열로 변환합니다. 숫자는 epoch 밀리초(UTC)로 해석합니다.
fn date_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .map(|dt| dt.date_naive().to_string()),
        _ => None,
    }
}

/// 날짜 문자열의 앞 10자(`YYYY-MM-DD`)만 해석합니다.
///
/// 시각/오프셋을 무시하므로 `2024-01-02T00:00:00-05:00`도 1월 2일입니다.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    let head = trimmed.get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

fn to_volume(value: Option<f64>) -> Volume {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v.trunc() as Volume,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn raw(date: &str, close: f64) -> RawBar {
        RawBar {
            date: Some(date.to_string()),
            close: Some(close),
            ..Default::default()
        }
    }

    #[test]
    fn test_normalize_record_fallbacks() {
        let raw = raw("2024-01-02", 101.5);
        let bar = normalize_record(&raw).unwrap();

        assert_eq!(bar.date, date(2024, 1, 2));
        assert_eq!(bar.close, dec!(101.5));
        assert_eq!(bar.open, dec!(101.5));
        assert_eq!(bar.high, dec!(101.5));
        assert_eq!(bar.low, dec!(101.5));
        assert_eq!(bar.volume, 0);
    }

    #[test]
    fn test_normalize_record_rejections() {
        let missing = RawBar {
            date: Some("2024-01-02".to_string()),
            ..Default::default()
        };
        assert_eq!(normalize_record(&missing), Err(RejectReason::MissingClose));

        let negative = raw("2024-01-02", -1.0);
        assert_eq!(normalize_record(&negative), Err(RejectReason::InvalidClose));

        let infinite = raw("2024-01-02", f64::INFINITY);
        assert_eq!(normalize_record(&infinite), Err(RejectReason::InvalidClose));

        let bad_date = raw("02/01/2024", 10.0);
        assert_eq!(normalize_record(&bad_date), Err(RejectReason::InvalidDate));
    }

    #[test]
    fn test_close_beyond_decimal_range() {
        let huge = raw("2024-01-02", 1e29);
        assert_eq!(normalize_record(&huge), Err(RejectReason::CloseOutOfRange));

        // 범위 안의 큰 값은 유지
        let large = raw("2024-01-02", 1e27);
        assert!(normalize_record(&large).is_ok());

        // 고가만 범위를 넘으면 종가로 채움
        let wide = RawBar {
            high: Some(1e29),
            ..raw("2024-01-02", 10.0)
        };
        assert_eq!(normalize_record(&wide).unwrap().high, dec!(10));
    }

    #[test]
    fn test_parse_date_ignores_time_and_offset() {
        assert_eq!(parse_date("2024-01-02"), Some(date(2024, 1, 2)));
        assert_eq!(parse_date("2024-01-02T00:00:00"), Some(date(2024, 1, 2)));
        assert_eq!(
            parse_date("2024-01-02 00:00:00-05:00"),
            Some(date(2024, 1, 2))
        );
        assert_eq!(parse_date("2024"), None);
    }

    #[test]
    fn test_volume_conversion() {
        assert_eq!(to_volume(Some(1234.9)), 1234);
        assert_eq!(to_volume(Some(-5.0)), 0);
        assert_eq!(to_volume(Some(f64::NAN)), 0);
        assert_eq!(to_volume(None), 0);
    }

    #[test]
    fn test_normalize_values_mixed_casing() {
        let values = vec![
            json!({
                "Date": "2024-01-03",
                "Close": 103.0,
                "High": 104.0,
                "Low": 101.0,
                "Volume": 300
            }),
            json!({"date": "2024-01-02", "close": 102.0, "volume": 200}),
            json!({"date": "2024-01-04", "open": 1.0}),
            json!("not an object"),
        ];

        let series = normalize_values(&values);

        assert_eq!(series.len(), 2);
        assert_eq!(series.first().unwrap().date, date(2024, 1, 2));
        assert_eq!(series.last().unwrap().high, dec!(104));
        assert_eq!(series.last().unwrap().volume, 300);
    }

    #[test]
    fn test_lowercase_key_wins() {
        let values = vec![json!({"date": "2024-01-02", "close": 10.0, "Close": 99.0})];
        let series = normalize_values(&values);
        assert_eq!(series.first().unwrap().close, dec!(10));
    }

    #[test]
    fn test_epoch_millis_date() {
        // 2024-01-02T00:00:00Z
        let values = vec![json!({"Date": 1704153600000i64, "Close": 10.0})];
        let series = normalize_values(&values);
        assert_eq!(series.first().unwrap().date, date(2024, 1, 2));
    }

    #[test]
    fn test_normalize_json_shapes() {
        let array = r#"[{"date":"2024-01-02","close":1.5}]"#;
        assert_eq!(normalize_json(array).unwrap().len(), 1);

        let payload = r#"{"symbol":"AAPL","chart_data":[{"Date":"2024-01-02","Close":1.5}]}"#;
        assert_eq!(normalize_json(payload).unwrap().len(), 1);

        assert!(normalize_json("null").unwrap().is_empty());
        assert!(normalize_json("[]").unwrap().is_empty());
        assert!(normalize_json(r#"{"foo":1}"#).is_err());
        assert!(normalize_json("{").is_err());
    }
}
