//! 금융 시계열 분석기 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 최근 1년 분석
//! analyzer analyze -i data/spy.json -p 1y
//!
//! # 날짜 범위 분석, JSON 출력
//! analyzer analyze -i data/spy.json -f 2024-01-01 -t 2024-06-30 --format json
//!
//! # 기간 토큰 목록
//! analyzer periods
//! ```

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::{error, info};

use analyzer_cli::commands::analyze::{
    parse_date, resolve_period, run_analysis, AnalyzeConfig, OutputFormat,
};
use analyzer_cli::commands::periods::format_periods;
use analyzer_core::{init_logging, AppConfig, LogConfig};

#[derive(Parser)]
#[command(name = "analyzer")]
#[command(
    about = "Financial analyzer - 일봉 시계열 수익률/리스크/기술적 지표 분석",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// 설정 파일
    #[arg(short, long, global = true, default_value = "config/default.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 일봉 JSON 파일 분석
    Analyze {
        /// 일봉 JSON 파일 (배열 또는 chart_data 필드를 가진 객체)
        #[arg(short, long)]
        input: PathBuf,

        /// 조회 기간 (1mo, 3mo, 6mo, 1y, 2y, 5y, ytd, max)
        #[arg(short, long)]
        period: Option<String>,

        /// 시작 날짜 (YYYY-MM-DD)
        #[arg(short = 'f', long)]
        from: Option<String>,

        /// 종료 날짜 (YYYY-MM-DD)
        #[arg(short, long)]
        to: Option<String>,

        /// 출력 형식 (text, json)
        #[arg(long, default_value = "text")]
        format: String,

        /// 상대 기간 기준일 (YYYY-MM-DD, 기본: 오늘)
        #[arg(long)]
        as_of: Option<String>,

        /// 결과 저장 경로 (지정하지 않으면 stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 조회 기간 토큰 목록
    Periods {
        /// 기준일 (YYYY-MM-DD, 기본: 오늘)
        #[arg(long)]
        as_of: Option<String>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let app_config = AppConfig::load(&cli.config)
        .with_context(|| format!("Failed to load config: {}", cli.config.display()))?;

    init_logging(LogConfig::from(&app_config.logging))
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

    match cli.command {
        Commands::Analyze {
            input,
            period,
            from,
            to,
            format,
            as_of,
            output,
        } => {
            let config = AnalyzeConfig {
                input,
                period: resolve_period(
                    period.as_deref(),
                    from.as_deref(),
                    to.as_deref(),
                    &app_config.analytics.default_period,
                )?,
                format: OutputFormat::parse(&format)?,
                as_of: as_of.as_deref().map(parse_date).transpose()?,
                analytics: app_config.analytics,
            };

            let content = match run_analysis(&config) {
                Ok(content) => content,
                Err(e) => {
                    error!("Analysis failed: {:#}", e);
                    return Err(e);
                }
            };

            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("Failed to write output: {}", path.display()))?;
                    info!("Output written to: {}", path.display());
                }
                None => println!("{}", content),
            }
        }

        Commands::Periods { as_of } => {
            let today = match as_of {
                Some(s) => parse_date(&s)?,
                None => Local::now().date_naive(),
            };
            println!("{}", format_periods(today));
        }
    }

    Ok(())
}
