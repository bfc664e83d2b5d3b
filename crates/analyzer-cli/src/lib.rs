//! 분석기 CLI 도구 모음.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 일봉 JSON 파일 분석 (`analyze`)
//! - 조회 기간 토큰 목록 (`periods`)

pub mod commands;
