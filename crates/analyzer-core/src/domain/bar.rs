//! 일봉(OHLCV) 데이터 구조체.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{Price, Volume};

/// 하루(또는 한 기간)의 OHLCV 스냅샷.
///
/// 날짜는 타임존이 없는 달력 날짜입니다. 요일 계산이 UTC 오프셋에 따라
/// 하루씩 밀리지 않도록 시각 정보를 보관하지 않습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bar {
    /// 거래일
    pub date: NaiveDate,
    /// 시가
    pub open: Price,
    /// 고가
    pub high: Price,
    /// 저가
    pub low: Price,
    /// 종가
    pub close: Price,
    /// 거래량
    pub volume: Volume,
}

impl Bar {
    /// 새 일봉을 생성합니다.
    pub fn new(
        date: NaiveDate,
        open: Price,
        high: Price,
        low: Price,
        close: Price,
        volume: Volume,
    ) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// 종가만으로 일봉을 생성합니다. 시가/고가/저가는 종가로 채움.
    pub fn from_close(date: NaiveDate, close: Price) -> Self {
        Self::new(date, close, close, close, close, 0)
    }
}

/// 백엔드에서 받은 원시 레코드.
///
/// 필드 표기(`Close`/`close` 등)가 섞여 들어오며 값이 빠져 있을 수 있습니다.
/// 정규화 전까지는 어떤 불변식도 보장하지 않습니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawBar {
    /// 날짜 문자열 (`YYYY-MM-DD`, 시각이 붙어 있을 수 있음)
    #[serde(default, alias = "Date", alias = "Datetime", alias = "datetime")]
    pub date: Option<String>,
    /// 시가
    #[serde(default, alias = "Open")]
    pub open: Option<f64>,
    /// 고가
    #[serde(default, alias = "High")]
    pub high: Option<f64>,
    /// 저가
    #[serde(default, alias = "Low")]
    pub low: Option<f64>,
    /// 종가
    #[serde(default, alias = "Close")]
    pub close: Option<f64>,
    /// 거래량
    #[serde(default, alias = "Volume")]
    pub volume: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_from_close_fills_ohl() {
        let bar = Bar::from_close(date(2024, 1, 2), dec!(100));

        assert_eq!(bar.open, dec!(100));
        assert_eq!(bar.high, dec!(100));
        assert_eq!(bar.low, dec!(100));
        assert_eq!(bar.volume, 0);
    }

    #[test]
    fn test_raw_bar_accepts_capitalized_keys() {
        let raw: RawBar =
            serde_json::from_str(r#"{"Date":"2024-01-02","Close":101.5,"Volume":1200}"#).unwrap();

        assert_eq!(raw.date.as_deref(), Some("2024-01-02"));
        assert_eq!(raw.close, Some(101.5));
        assert_eq!(raw.volume, Some(1200.0));
        assert!(raw.open.is_none());
    }

    #[test]
    fn test_raw_bar_missing_close() {
        let raw: RawBar = serde_json::from_str(r#"{"date":"2024-01-02","open":1.0}"#).unwrap();
        assert!(raw.close.is_none());
    }
}
