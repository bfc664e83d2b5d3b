//! 조회 기간 토큰 목록.

use chrono::NaiveDate;

use analyzer_core::PeriodToken;

/// 토큰별 시작일 표를 만듭니다.
pub fn format_periods(today: NaiveDate) -> String {
    let mut output = String::new();

    output.push_str(&format!("{:<6} {:<12}\n", "TOKEN", "FROM"));
    output.push_str(&"-".repeat(19));
    output.push('\n');

    for token in PeriodToken::ALL {
        let from = token
            .cutoff(today)
            .map_or_else(|| "(all)".to_string(), |d| d.to_string());
        output.push_str(&format!("{:<6} {:<12}\n", token.as_str(), from));
    }

    output.push_str(&format!("\n기준일: {}", today));
    output
}
