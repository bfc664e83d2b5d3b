//! 조회 기간 정의.
//!
//! 대시보드의 기간 버튼(`1mo`, `3mo`, ..., `max`)은 닫힌 열거형으로
//! 표현합니다. 명시적인 날짜 범위는 [`PeriodSpec::Range`]로 표현합니다.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::AnalyzerError;

/// 상대 조회 기간 토큰.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeriodToken {
    /// 최근 1개월
    #[serde(rename = "1mo")]
    OneMonth,
    /// 최근 3개월
    #[serde(rename = "3mo")]
    ThreeMonths,
    /// 최근 6개월
    #[serde(rename = "6mo")]
    SixMonths,
    /// 최근 1년
    #[serde(rename = "1y")]
    OneYear,
    /// 최근 2년
    #[serde(rename = "2y")]
    TwoYears,
    /// 최근 5년
    #[serde(rename = "5y")]
    FiveYears,
    /// 올해 1월 1일부터
    #[serde(rename = "ytd")]
    YearToDate,
    /// 전체
    #[serde(rename = "max")]
    Max,
}

impl PeriodToken {
    /// 모든 토큰 (표시 순서).
    pub const ALL: [PeriodToken; 8] = [
        PeriodToken::OneMonth,
        PeriodToken::ThreeMonths,
        PeriodToken::SixMonths,
        PeriodToken::OneYear,
        PeriodToken::TwoYears,
        PeriodToken::FiveYears,
        PeriodToken::YearToDate,
        PeriodToken::Max,
    ];

    /// 토큰 문자열.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneMonth => "1mo",
            Self::ThreeMonths => "3mo",
            Self::SixMonths => "6mo",
            Self::OneYear => "1y",
            Self::TwoYears => "2y",
            Self::FiveYears => "5y",
            Self::YearToDate => "ytd",
            Self::Max => "max",
        }
    }

    /// 거슬러 올라갈 달 수. `ytd`와 `max`는 `None`.
    fn lookback_months(&self) -> Option<u32> {
        match self {
            Self::OneMonth => Some(1),
            Self::ThreeMonths => Some(3),
            Self::SixMonths => Some(6),
            Self::OneYear => Some(12),
            Self::TwoYears => Some(24),
            Self::FiveYears => Some(60),
            Self::YearToDate | Self::Max => None,
        }
    }

    /// 기준일(`today`)로부터 계산한 시작일.
    ///
    /// 달력 기준으로 N개월을 뺍니다. 말일이 없는 달로 넘어가면 그 달의
    /// 말일로 맞춥니다 (예: 3월 31일 - 1개월 = 2월 말일). `max`는 `None`.
    pub fn cutoff(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::Max => None,
            Self::YearToDate => NaiveDate::from_ymd_opt(today.year(), 1, 1),
            _ => {
                let months = self.lookback_months()?;
                Some(
                    today
                        .checked_sub_months(Months::new(months))
                        .unwrap_or(NaiveDate::MIN),
                )
            }
        }
    }
}

impl fmt::Display for PeriodToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeriodToken {
    type Err = AnalyzerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        PeriodToken::ALL
            .into_iter()
            .find(|token| token.as_str() == normalized)
            .ok_or_else(|| {
                AnalyzerError::InvalidInput(format!("알 수 없는 기간 토큰: {}", s))
            })
    }
}

/// 기간 필터 조건.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodSpec {
    /// 상대 기간 토큰
    Relative(PeriodToken),
    /// 명시적 날짜 범위 (양끝 포함)
    Range {
        /// 시작일
        start: NaiveDate,
        /// 종료일
        end: NaiveDate,
    },
}

impl PeriodSpec {
    /// 토큰 문자열을 관대하게 해석합니다.
    ///
    /// 알 수 없는 토큰은 경고만 남기고 `max`(전체)로 취급합니다.
    /// 입력 검증이 필요하면 [`PeriodToken::from_str`]를 사용하세요.
    pub fn from_token(token: &str) -> Self {
        match token.parse::<PeriodToken>() {
            Ok(token) => Self::Relative(token),
            Err(_) => {
                warn!(
                    token = %token,
                    "알 수 없는 기간 토큰, 전체 기간을 사용합니다"
                );
                Self::Relative(PeriodToken::Max)
            }
        }
    }

    /// 날짜 범위 조건을 생성합니다.
    pub fn range(start: NaiveDate, end: NaiveDate) -> Self {
        Self::Range { start, end }
    }

    /// 표시용 레이블.
    pub fn label(&self) -> String {
        match self {
            Self::Relative(token) => token.as_str().to_uppercase(),
            Self::Range { start, end } => format!("{} ~ {}", start, end),
        }
    }
}

impl Default for PeriodSpec {
    fn default() -> Self {
        Self::Relative(PeriodToken::Max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_token_parse() {
        assert_eq!("1mo".parse::<PeriodToken>().unwrap(), PeriodToken::OneMonth);
        assert_eq!("YTD".parse::<PeriodToken>().unwrap(), PeriodToken::YearToDate);
        assert_eq!(" max ".parse::<PeriodToken>().unwrap(), PeriodToken::Max);
        assert!("10y".parse::<PeriodToken>().is_err());
    }

    #[test]
    fn test_token_round_trip_strings() {
        for token in PeriodToken::ALL {
            assert_eq!(token.as_str().parse::<PeriodToken>().unwrap(), token);
        }
    }

    #[test]
    fn test_cutoff_months_and_years() {
        let today = date(2024, 6, 15);

        assert_eq!(PeriodToken::OneMonth.cutoff(today), Some(date(2024, 5, 15)));
        assert_eq!(PeriodToken::ThreeMonths.cutoff(today), Some(date(2024, 3, 15)));
        assert_eq!(PeriodToken::SixMonths.cutoff(today), Some(date(2023, 12, 15)));
        assert_eq!(PeriodToken::OneYear.cutoff(today), Some(date(2023, 6, 15)));
        assert_eq!(PeriodToken::TwoYears.cutoff(today), Some(date(2022, 6, 15)));
        assert_eq!(PeriodToken::FiveYears.cutoff(today), Some(date(2019, 6, 15)));
        assert_eq!(PeriodToken::YearToDate.cutoff(today), Some(date(2024, 1, 1)));
        assert_eq!(PeriodToken::Max.cutoff(today), None);
    }

    #[test]
    fn test_cutoff_clamps_to_month_end() {
        assert_eq!(
            PeriodToken::OneMonth.cutoff(date(2024, 3, 31)),
            Some(date(2024, 2, 29))
        );
    }

    #[test]
    fn test_from_token_is_lenient() {
        assert_eq!(
            PeriodSpec::from_token("3mo"),
            PeriodSpec::Relative(PeriodToken::ThreeMonths)
        );
        assert_eq!(
            PeriodSpec::from_token("forever"),
            PeriodSpec::Relative(PeriodToken::Max)
        );
    }

    #[test]
    fn test_token_serde() {
        let json = serde_json::to_string(&PeriodToken::SixMonths).unwrap();
        assert_eq!(json, "\"6mo\"");
        let token: PeriodToken = serde_json::from_str("\"ytd\"").unwrap();
        assert_eq!(token, PeriodToken::YearToDate);
    }

    #[test]
    fn test_label() {
        assert_eq!(PeriodSpec::from_token("1y").label(), "1Y");
        assert_eq!(
            PeriodSpec::range(date(2024, 1, 1), date(2024, 3, 31)).label(),
            "2024-01-01 ~ 2024-03-31"
        );
    }
}
