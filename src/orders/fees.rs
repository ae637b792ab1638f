//! src/orders/fees.rs
//!
//! Fee policy trait and concrete strategies, modeled on the teacher's
//! `FeeStrategy` trait family (profit-based / conservative / aggressive
//! tiers) but adapted to deterministic decimal fee computation instead of
//! priority-fee bidding.

use rust_decimal::Decimal;
use std::fmt::Debug;

use crate::decimal::ops;
use crate::errors::CoreResult;
use crate::orders::types::Side;

/// Output of a fee calculation: an optional base-denominated fee and an
/// optional quote-denominated fee. At least one should normally be set,
/// but neither is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeeBreakdown {
    pub base_fee: Option<Decimal>,
    pub quote_fee: Option<Decimal>,
}

impl FeeBreakdown {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn base_fee_or_zero(&self) -> Decimal {
        self.base_fee.unwrap_or(Decimal::ZERO)
    }

    pub fn quote_fee_or_zero(&self) -> Decimal {
        self.quote_fee.unwrap_or(Decimal::ZERO)
    }
}

/// A capability that computes the fee charged on one fill of an order.
/// Every implementation must expose a `fingerprint()`: a short, non-empty,
/// <=255-char string unique per distinct configuration, and identical for
/// equal configurations (determinism and caching/canonicalisation per
/// SPEC_FULL.md §9 "Polymorphism").
pub trait FeePolicy: Debug + Send + Sync {
    fn calculate(
        &self,
        side: Side,
        base_amount: Decimal,
        quote_amount: Decimal,
    ) -> CoreResult<FeeBreakdown>;

    fn fingerprint(&self) -> String;
}

/// A flat percentage fee taken on the quote side of the fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PercentageFee {
    /// Fee in basis points (100 = 1%).
    pub bps: u32,
    pub scale: u32,
}

impl PercentageFee {
    pub fn new(bps: u32, scale: u32) -> Self {
        Self { bps, scale }
    }
}

impl FeePolicy for PercentageFee {
    fn calculate(
        &self,
        _side: Side,
        _base_amount: Decimal,
        quote_amount: Decimal,
    ) -> CoreResult<FeeBreakdown> {
        let fee = ops::mul_rescale(
            quote_amount,
            Decimal::new(self.bps as i64, 4),
            self.scale,
        )?;
        Ok(FeeBreakdown {
            base_fee: None,
            quote_fee: Some(fee),
        })
    }

    fn fingerprint(&self) -> String {
        format!("percentage:bps={}:scale={}", self.bps, self.scale)
    }
}

/// A fixed fee charged in the base currency regardless of fill size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedBaseFee {
    pub amount: Decimal,
}

impl FixedBaseFee {
    pub fn new(amount: Decimal) -> Self {
        Self { amount }
    }
}

impl FeePolicy for FixedBaseFee {
    fn calculate(
        &self,
        _side: Side,
        _base_amount: Decimal,
        _quote_amount: Decimal,
    ) -> CoreResult<FeeBreakdown> {
        Ok(FeeBreakdown {
            base_fee: Some(self.amount),
            quote_fee: None,
        })
    }

    fn fingerprint(&self) -> String {
        format!("fixed_base:{}", self.amount)
    }
}

/// Tiered percentage fee: the bps rate steps down as the quote amount
/// grows, mirroring the teacher's `ProfitBasedStrategy::calculate_tiered_fee`
/// tier ladder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TieredFee {
    /// `(threshold, bps)` pairs sorted ascending by threshold; the highest
    /// threshold that `quote_amount` meets or exceeds wins. The first
    /// entry should have threshold 0 to cover all amounts.
    pub tiers: Vec<(Decimal, u32)>,
    pub scale: u32,
}

impl TieredFee {
    pub fn new(tiers: Vec<(Decimal, u32)>, scale: u32) -> Self {
        let mut tiers = tiers;
        tiers.sort_by(|a, b| a.0.cmp(&b.0));
        Self { tiers, scale }
    }

    fn bps_for(&self, quote_amount: Decimal) -> u32 {
        self.tiers
            .iter()
            .rev()
            .find(|(threshold, _)| quote_amount >= *threshold)
            .map(|(_, bps)| *bps)
            .unwrap_or(0)
    }
}

impl FeePolicy for TieredFee {
    fn calculate(
        &self,
        _side: Side,
        _base_amount: Decimal,
        quote_amount: Decimal,
    ) -> CoreResult<FeeBreakdown> {
        let bps = self.bps_for(quote_amount);
        let fee = ops::mul_rescale(quote_amount, Decimal::new(bps as i64, 4), self.scale)?;
        Ok(FeeBreakdown {
            base_fee: None,
            quote_fee: Some(fee),
        })
    }

    fn fingerprint(&self) -> String {
        let tiers: Vec<String> = self
            .tiers
            .iter()
            .map(|(t, b)| format!("{t}:{b}"))
            .collect();
        format!("tiered:scale={}:{}", self.scale, tiers.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn percentage_fee_fingerprint_is_deterministic() {
        let a = PercentageFee::new(30, 6);
        let b = PercentageFee::new(30, 6);
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert!(!a.fingerprint().is_empty());
        assert!(a.fingerprint().len() <= 255);
    }

    #[test]
    fn distinct_configs_have_distinct_fingerprints() {
        let a = PercentageFee::new(30, 6);
        let b = PercentageFee::new(31, 6);
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn percentage_fee_scales_with_amount() {
        let fee = PercentageFee::new(100, 2); // 1%
        let breakdown = fee.calculate(Side::Buy, dec!(0), dec!(200)).unwrap();
        assert_eq!(breakdown.quote_fee_or_zero(), dec!(2.00));
    }

    #[test]
    fn tiered_fee_picks_highest_qualifying_tier() {
        let fee = TieredFee::new(vec![(dec!(0), 25), (dec!(1000), 10)], 2);
        let small = fee.calculate(Side::Buy, dec!(0), dec!(500)).unwrap();
        let large = fee.calculate(Side::Buy, dec!(0), dec!(5000)).unwrap();
        assert_eq!(small.quote_fee_or_zero(), dec!(1.25));
        assert_eq!(large.quote_fee_or_zero(), dec!(5.00));
    }
}
