//! 가격 표현을 위한 Decimal 유틸리티.
//!
//! 가격은 정밀 소수점(`Decimal`)으로 보관하고, 통계 계산이 필요한
//! 지점에서만 `f64`로 한 번 변환합니다.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

/// 가격 타입.
pub type Price = Decimal;

/// 거래량 타입 (음수 불가).
pub type Volume = u64;

/// Decimal 변환을 위한 확장 트레이트.
pub trait DecimalExt {
    /// `f64`로 변환합니다. 표현할 수 없으면 0을 반환합니다.
    fn to_f64_or_zero(&self) -> f64;
}

impl DecimalExt for Decimal {
    fn to_f64_or_zero(&self) -> f64 {
        self.to_f64().filter(|v| v.is_finite()).unwrap_or(0.0)
    }
}

/// `f64` 가격을 Decimal로 변환합니다.
///
/// NaN, 무한대 또는 Decimal 범위를 벗어난 값이면 `None`.
pub fn price_from_f64(value: f64) -> Option<Price> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_f64(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_to_f64_or_zero() {
        assert_eq!(dec!(101.5).to_f64_or_zero(), 101.5);
        assert_eq!(Decimal::ZERO.to_f64_or_zero(), 0.0);
    }

    #[test]
    fn test_price_from_f64() {
        assert_eq!(price_from_f64(99.5), Some(dec!(99.5)));
        assert!(price_from_f64(f64::NAN).is_none());
        assert!(price_from_f64(f64::INFINITY).is_none());
        // Decimal 최대값(약 7.9e28)을 넘음
        assert!(price_from_f64(1e29).is_none());
        assert!(price_from_f64(1e28).is_some());
    }
}
