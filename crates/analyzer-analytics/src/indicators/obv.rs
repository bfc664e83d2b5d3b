//! OBV (On-Balance Volume) 지표.
//!
//! 가격 방향에 따라 거래량을 누적해 자금 흐름을 추적합니다.
//!
//! ## 계산 방식
//! - 종가 상승: OBV += 거래량
//! - 종가 하락: OBV -= 거래량
//! - 종가 동일: OBV 변화 없음
//!
//! 기간 창을 쓰지 않고 입력 시계열 전체를 0부터 누적합니다.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use analyzer_core::Volume;

use super::{IndicatorError, IndicatorResult};

/// OBV 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObvResult {
    /// OBV 값.
    pub obv: i64,
    /// OBV 변화량 (전일 대비).
    pub change: i64,
}

/// OBV 계산기.
#[derive(Debug, Default)]
pub struct ObvIndicator;

impl ObvIndicator {
    /// 새로운 OBV 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// OBV 계산.
    ///
    /// # 인자
    /// * `close` - 종가 데이터
    /// * `volume` - 거래량 데이터
    ///
    /// # 반환
    /// 각 시점의 OBV 값과 변화량 (첫 값은 항상 0)
    pub fn calculate(
        &self,
        close: &[Decimal],
        volume: &[Volume],
    ) -> IndicatorResult<Vec<ObvResult>> {
        if close.len() != volume.len() {
            return Err(IndicatorError::InvalidParameter(
                "종가와 거래량 데이터의 길이가 일치하지 않습니다".to_string(),
            ));
        }

        if close.is_empty() {
            return Err(IndicatorError::InsufficientData {
                required: 1,
                provided: 0,
            });
        }

        let mut result = Vec::with_capacity(close.len());
        let mut current_obv: i64 = 0;
        result.push(ObvResult { obv: 0, change: 0 });

        for i in 1..close.len() {
            let vol = i64::try_from(volume[i]).unwrap_or(i64::MAX);
            let change = match close[i].cmp(&close[i - 1]) {
                std::cmp::Ordering::Greater => vol,
                std::cmp::Ordering::Less => -vol,
                std::cmp::Ordering::Equal => 0,
            };

            current_obv = current_obv.saturating_add(change);
            result.push(ObvResult {
                obv: current_obv,
                change,
            });
        }

        Ok(result)
    }
}
