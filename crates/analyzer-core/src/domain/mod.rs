//! 분석 도메인 모델.

mod bar;
mod period;
mod series;

pub use bar::*;
pub use period::*;
pub use series::*;
