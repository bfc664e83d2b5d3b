//! 분석 시스템의 에러 타입.
//!
//! 계산 코어 자체는 에러를 던지지 않고 중립값으로 수렴합니다.
//! 이 타입은 입력 경계(JSON 파싱, 기간 토큰 해석)에서만 사용됩니다.

use thiserror::Error;

/// 분석기 에러.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// 데이터 에러
    #[error("데이터 에러: {0}")]
    Data(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),

    /// 잘못된 입력
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),
}

/// 분석 작업을 위한 Result 타입.
pub type AnalyzerResult<T> = Result<T, AnalyzerError>;

impl From<serde_json::Error> for AnalyzerError {
    fn from(err: serde_json::Error) -> Self {
        AnalyzerError::Serialization(err.to_string())
    }
}
