//! # Analyzer Core
//!
//! 금융 분석 대시보드의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 분석 파이프라인 전반에서 사용되는 기본 타입을 제공합니다:
//! - 일봉(OHLCV) 및 정렬된 시계열
//! - 원시 레코드 표현 (백엔드 응답 그대로)
//! - 조회 기간 토큰 및 날짜 범위
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use self::config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;
