//! 분석 명령어.
//!
//! 일봉 JSON 파일을 읽어 기간을 적용하고 분석 보고서를 출력합니다.
//!
//! # 사용 예시
//!
//! ```bash
//! # 전체 기간 분석 (텍스트)
//! analyzer analyze -i data/spy.json
//!
//! # 최근 1년, JSON 출력
//! analyzer analyze -i data/spy.json -p 1y --format json
//!
//! # 날짜 범위 지정
//! analyzer analyze -i data/spy.json -f 2024-01-01 -t 2024-06-30
//! ```

use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use chrono::{Local, NaiveDate};
use tracing::{debug, info};

use analyzer_analytics::{normalize_json, AnalysisReport, Analyzer};
use analyzer_core::{AnalyticsConfig, PeriodSpec, PeriodToken, Series};

const WEEKDAYS: [&str; 5] = ["월", "화", "수", "목", "금"];

/// 출력 형식.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// 사람이 읽는 요약
    #[default]
    Text,
    /// 보고서 전체 JSON
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(anyhow!("Invalid format: {}. Use: text, json", s)),
        }
    }
}

/// 분석 CLI 설정.
#[derive(Debug, Clone)]
pub struct AnalyzeConfig {
    /// 일봉 JSON 파일 경로
    pub input: PathBuf,
    /// 조회 기간
    pub period: PeriodSpec,
    /// 출력 형식
    pub format: OutputFormat,
    /// 상대 기간 기준일 (없으면 오늘)
    pub as_of: Option<NaiveDate>,
    /// 분석 설정
    pub analytics: AnalyticsConfig,
}

/// `YYYY-MM-DD` 날짜를 해석합니다.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date: {}. Use YYYY-MM-DD", s))
}

/// 명령행 인자로 조회 기간을 결정합니다.
///
/// `--from`/`--to`가 있으면 날짜 범위(둘 다 필요), 없으면 `--period` 토큰,
/// 그것도 없으면 설정의 기본 토큰을 씁니다. 명령행에서는 알 수 없는
/// 토큰을 오류로 처리합니다.
pub fn resolve_period(
    period: Option<&str>,
    from: Option<&str>,
    to: Option<&str>,
    default_period: &str,
) -> Result<PeriodSpec> {
    match (from, to) {
        (Some(from), Some(to)) => {
            if period.is_some() {
                bail!("--period cannot be combined with --from/--to");
            }
            let start = parse_date(from)?;
            let end = parse_date(to)?;
            if start > end {
                bail!("Start date must be before end date");
            }
            Ok(PeriodSpec::range(start, end))
        }
        (Some(_), None) | (None, Some(_)) => bail!("--from and --to must be given together"),
        (None, None) => {
            let token = period.unwrap_or(default_period);
            let token: PeriodToken = token
                .parse()
                .map_err(|e| anyhow!("{}. Run `analyzer periods` for the list", e))?;
            Ok(PeriodSpec::Relative(token))
        }
    }
}

/// 일봉 JSON 파일을 읽어 정규화합니다.
pub fn load_series(path: &Path) -> Result<Series> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;

    let series = normalize_json(&content)
        .with_context(|| format!("Failed to parse bars from {}", path.display()))?;

    debug!(bars = series.len(), "Loaded series");
    Ok(series)
}

/// 분석을 실행하고 출력할 문자열을 돌려줍니다.
pub fn run_analysis(config: &AnalyzeConfig) -> Result<String> {
    let _span =
        analyzer_core::analysis_span!("run_analysis", config.input.display(), config.period.label())
            .entered();

    let series = load_series(&config.input)?;
    let today = config.as_of.unwrap_or_else(|| Local::now().date_naive());

    let report = Analyzer::new(config.analytics.clone()).analyze(&series, &config.period, today);

    info!(
        period = %config.period.label(),
        bars = report.bars,
        "Analysis complete"
    );

    match config.format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(&report).context("Failed to serialize report")
        }
        OutputFormat::Text => Ok(format_text(&report)),
    }
}

/// 텍스트 요약.
pub fn format_text(report: &AnalysisReport) -> String {
    let mut out = String::new();
    let line = "═".repeat(48);
    let thin = "─".repeat(48);

    out.push_str(&format!("분석 결과 요약 ({})\n{}\n", report.period.label(), line));
    out.push_str(&format!(
        "기간: {} → {}\n데이터 포인트: {}\n",
        or_na(report.start_date),
        or_na(report.end_date),
        report.bars
    ));

    let m = &report.metrics;
    out.push_str(&format!("{}\n", thin));
    out.push_str(&format!("현재가: {:.2}\n", m.current_price));
    out.push_str(&format!("총 수익률: {:.2}%\n", m.total_return_pct));
    out.push_str(&format!("연율화 수익률: {:.2}%\n", m.annualized_return_pct));
    out.push_str(&format!("변동성: {:.2}%\n", m.volatility_pct));
    out.push_str(&format!("샤프 비율: {:.2}\n", m.sharpe_ratio));
    out.push_str(&format!("소르티노 비율: {:.2}\n", m.sortino_ratio));
    out.push_str(&format!("최대 낙폭: {:.2}%\n", m.max_drawdown_pct));
    out.push_str(&format!("평균 낙폭: {:.2}%\n", m.avg_drawdown_pct));
    out.push_str(&format!("현재 낙폭: {:.2}%\n", m.current_drawdown_pct));
    out.push_str(&format!("VaR (95%): {:.2}%\n", m.var_95_pct));

    let d = &report.distribution;
    out.push_str(&format!("{}\n", thin));
    out.push_str(&format!(
        "수익률 분포: {}개 구간, 왜도 {:.3}, 첨도 {:.3}\n",
        d.histogram.len(),
        d.skewness,
        d.kurtosis
    ));

    let cells = report.seasonality.heatmap.cells();
    if !cells.is_empty() {
        out.push_str(&format!("{}\n월별 수익률\n", thin));
        for cell in &cells {
            out.push_str(&format!(
                "  {}-{:02}: {:+.2}% {}\n",
                cell.year,
                cell.month,
                cell.return_pct,
                intensity_bar(cell.intensity)
            ));
        }
    }

    out.push_str(&format!("{}\n요일별 평균 수익률\n", thin));
    for (weekday, value) in &report.seasonality.avg_daily {
        let name = WEEKDAYS.get(*weekday as usize).copied().unwrap_or("?");
        out.push_str(&format!("  {}: {:.3}%\n", name, value));
    }

    let t = &report.technical;
    out.push_str(&format!("{}\n기술적 지표 ({})\n", thin, or_na(t.as_of)));
    out.push_str(&format!("  RSI: {}\n", dec_or_na(t.rsi)));
    out.push_str(&format!(
        "  MACD: {}\n",
        t.macd.map_or_else(na, |m| format!(
            "{:.2} / signal {:.2} / hist {:.2}",
            m.macd, m.signal, m.histogram
        ))
    ));
    out.push_str(&format!(
        "  Stochastic: {}\n",
        t.stochastic.map_or_else(na, |s| format!("%K {:.2} / %D {}", s.k, dec_or_na(s.d)))
    ));
    out.push_str(&format!(
        "  Bollinger: {}\n",
        t.bollinger.map_or_else(na, |b| format!(
            "{:.2} / {:.2} / {:.2} (%B {})",
            b.upper,
            b.middle,
            b.lower,
            dec_or_na(b.percent_b)
        ))
    ));
    out.push_str(&format!("  ATR: {}\n", dec_or_na(t.atr)));
    out.push_str(&format!("  Williams %R: {}\n", dec_or_na(t.williams_r)));
    out.push_str(&format!("  OBV: {}\n", or_na(t.obv)));
    out.push_str(&format!(
        "  ADX: {}\n",
        t.adx.map_or_else(na, |a| format!(
            "{:.2} (+DI {:.2} / -DI {:.2})",
            a.adx, a.plus_di, a.minus_di
        ))
    ));
    out.push_str(&format!("  CCI: {}\n", dec_or_na(t.cci)));
    out.push_str(&format!("  SMA: {}\n", dec_or_na(t.sma)));
    out.push_str(&format!("  EMA: {}\n", dec_or_na(t.ema)));
    out.push_str(&line);

    out
}

/// 강도(-1.0 ~ 1.0)를 최대 10칸 막대로 표시합니다. 음수는 `-`, 양수는 `+`.
fn intensity_bar(intensity: f64) -> String {
    let width = (intensity.abs() * 10.0).round() as usize;
    let mark = if intensity < 0.0 { "-" } else { "+" };
    mark.repeat(width.min(10))
}

fn na() -> String {
    "N/A".to_string()
}

fn or_na<T: Display>(value: Option<T>) -> String {
    value.map_or_else(na, |v| v.to_string())
}

fn dec_or_na(value: Option<rust_decimal::Decimal>) -> String {
    value.map_or_else(na, |v| format!("{:.2}", v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use analyzer_core::Bar;
    use rust_decimal::Decimal;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!(OutputFormat::parse("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::parse("text").unwrap(), OutputFormat::Text);
        assert!(OutputFormat::parse("xml").is_err());
    }

    #[test]
    fn test_resolve_token_and_default() {
        assert_eq!(
            resolve_period(Some("1y"), None, None, "max").unwrap(),
            PeriodSpec::Relative(PeriodToken::OneYear)
        );
        assert_eq!(
            resolve_period(None, None, None, "ytd").unwrap(),
            PeriodSpec::Relative(PeriodToken::YearToDate)
        );
        assert!(resolve_period(Some("10y"), None, None, "max").is_err());
    }

    #[test]
    fn test_resolve_range() {
        let spec = resolve_period(None, Some("2024-01-01"), Some("2024-03-31"), "max").unwrap();
        assert_eq!(spec, PeriodSpec::range(date(2024, 1, 1), date(2024, 3, 31)));

        assert!(resolve_period(None, Some("2024-03-31"), Some("2024-01-01"), "max").is_err());
        assert!(resolve_period(None, Some("2024-01-01"), None, "max").is_err());
        assert!(resolve_period(Some("1y"), Some("2024-01-01"), Some("2024-02-01"), "max").is_err());
    }

    #[test]
    fn test_text_report_marks_missing_indicators() {
        let report = Analyzer::default().analyze_series(&Series::empty());
        let text = format_text(&report);

        assert!(text.contains("RSI: N/A"));
        assert!(text.contains("MACD: N/A"));
        assert!(text.contains("총 수익률: 0.00%"));
        assert!(!text.contains("월별 수익률"));
    }

    #[test]
    fn test_text_report_lists_monthly_returns() {
        let series = Series::new(vec![
            Bar::from_close(date(2024, 1, 2), Decimal::from(100)),
            Bar::from_close(date(2024, 1, 31), Decimal::from(110)),
            Bar::from_close(date(2024, 2, 1), Decimal::from(110)),
            Bar::from_close(date(2024, 2, 29), Decimal::new(1045, 1)),
        ]);
        let report = Analyzer::default().analyze_series(&series);
        let text = format_text(&report);

        assert!(text.contains("월별 수익률"));
        assert!(text.contains("  2024-01: +10.00% ++++++++++\n"));
        assert!(text.contains("  2024-02: -5.00% -----\n"));
    }

    #[test]
    fn test_intensity_bar() {
        assert_eq!(intensity_bar(0.0), "");
        assert_eq!(intensity_bar(1.0), "++++++++++");
        assert_eq!(intensity_bar(-0.34), "---");
    }
}
