//! 성과 분석 모듈
//!
//! 일봉 종가로부터 수익률과 리스크 지표를 계산합니다.
//!
//! # 모듈 구성
//!
//! - [`returns`]: 일간 단순/로그 수익률, 총 수익률
//! - [`drawdown`]: 낙폭 시계열과 요약 통계
//! - [`metrics`]: 변동성, 샤프/소르티노 비율, VaR 등 통계 카드 지표

pub mod drawdown;
pub mod metrics;
pub mod returns;

pub use drawdown::*;
pub use metrics::*;
pub use returns::*;
