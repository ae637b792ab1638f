//! src/decimal/ops.rs
//!
//! Free functions wrapping `rust_decimal::Decimal`. Isolated here per
//! SPEC_FULL.md's "Global state" note: this is the one module that knows
//! about the concrete decimal backend, so swapping backends later only
//! touches this file.

use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;

use crate::decimal::MAX_SCALE;
use crate::errors::{CoreError, CoreResult};

/// Validates a requested scale against the backend's ceiling.
pub fn check_scale(scale: u32) -> CoreResult<()> {
    if scale > MAX_SCALE {
        return Err(CoreError::invalid_input(format!(
            "scale {scale} exceeds backend maximum of {MAX_SCALE}"
        )));
    }
    Ok(())
}

/// Rescales `value` to `scale` decimal places, rounding HALF_UP.
pub fn rescale(value: Decimal, scale: u32) -> CoreResult<Decimal> {
    check_scale(scale)?;
    let mut out = value;
    out.rescale(scale);
    Ok(out.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero))
}

/// `a + b`, rescaled to `max(a.scale, b.scale)` and rounded HALF_UP.
pub fn add(a: Decimal, b: Decimal) -> CoreResult<Decimal> {
    let scale = a.scale().max(b.scale());
    rescale(a + b, scale)
}

/// `a - b`, rescaled to `max(a.scale, b.scale)` and rounded HALF_UP.
pub fn sub(a: Decimal, b: Decimal) -> CoreResult<Decimal> {
    let scale = a.scale().max(b.scale());
    rescale(a - b, scale)
}

/// `a * b`, rounded HALF_UP to `scale`.
pub fn mul_rescale(a: Decimal, b: Decimal, scale: u32) -> CoreResult<Decimal> {
    rescale(a * b, scale)
}

/// `a / b`, rounded HALF_UP to `scale`. Fails with `PrecisionViolation` on
/// division by zero.
pub fn div_rescale(a: Decimal, b: Decimal, scale: u32) -> CoreResult<Decimal> {
    if b.is_zero() {
        return Err(CoreError::precision("division by zero"));
    }
    rescale(a / b, scale)
}

/// Compares `a` and `b` after rescaling both to `working_scale`.
pub fn compare_at(a: Decimal, b: Decimal, working_scale: u32) -> CoreResult<std::cmp::Ordering> {
    let a = rescale(a, working_scale)?;
    let b = rescale(b, working_scale)?;
    Ok(a.cmp(&b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rescale_rounds_half_up() {
        assert_eq!(rescale(dec!(1.005), 2).unwrap(), dec!(1.01));
        assert_eq!(rescale(dec!(-1.005), 2).unwrap(), dec!(-1.01));
    }

    #[test]
    fn scale_over_max_is_invalid_input() {
        assert!(matches!(
            check_scale(MAX_SCALE + 1),
            Err(CoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn div_by_zero_is_precision_violation() {
        assert!(matches!(
            div_rescale(dec!(1), dec!(0), 2),
            Err(CoreError::PrecisionViolation(_))
        ));
    }

    #[test]
    fn add_rescales_to_max_operand_scale() {
        let sum = add(dec!(1.5), dec!(2.25)).unwrap();
        assert_eq!(sum, dec!(3.75));
    }
}
