//! src/orders/types.rs

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::decimal::ops;
use crate::decimal::ExchangeRate;
use crate::errors::{CoreError, CoreResult};
use crate::orders::fees::FeePolicy;

/// Direction of an order. BUY: the taker spends `base`, receives `quote`.
/// SELL: the taker spends `quote`, receives `base`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum Side {
    #[strum(serialize = "BUY")]
    Buy,
    #[strum(serialize = "SELL")]
    Sell,
}

/// A pair of traded assets. Valid for conversion when `base != quote`;
/// otherwise it denotes a transfer pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetPair {
    pub base: String,
    pub quote: String,
}

impl AssetPair {
    pub fn new(base: impl Into<String>, quote: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            quote: quote.into(),
        }
    }

    pub fn is_transfer(&self) -> bool {
        self.base == self.quote
    }
}

/// Fill bounds for an order, in the base currency. `0 <= min <= max`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBounds {
    pub min: Decimal,
    pub max: Decimal,
}

impl OrderBounds {
    pub fn new(min: Decimal, max: Decimal) -> CoreResult<Self> {
        if min < Decimal::ZERO {
            return Err(CoreError::invalid_input("order bounds min must be >= 0"));
        }
        if min > max {
            return Err(CoreError::invalid_input("order bounds min must be <= max"));
        }
        Ok(Self { min, max })
    }

    pub fn contains(&self, amount: Decimal) -> bool {
        amount >= self.min && amount <= self.max
    }
}

/// A directed offer between two assets with bounded fill amounts, an
/// effective rate, and an optional fee policy.
#[derive(Clone)]
pub struct Order {
    pub id: u64,
    pub side: Side,
    pub asset_pair: AssetPair,
    pub bounds: OrderBounds,
    pub effective_rate: ExchangeRate,
    pub fee_policy: Option<Arc<dyn FeePolicy>>,
}

impl Order {
    pub fn new(
        id: u64,
        side: Side,
        asset_pair: AssetPair,
        bounds: OrderBounds,
        effective_rate: ExchangeRate,
        fee_policy: Option<Arc<dyn FeePolicy>>,
    ) -> CoreResult<Self> {
        if asset_pair.is_transfer() {
            return Err(CoreError::invalid_input(
                "orders require base != quote; use a transfer edge instead",
            ));
        }
        Ok(Self {
            id,
            side,
            asset_pair,
            bounds,
            effective_rate,
            fee_policy,
        })
    }

    /// The currency the taker spends when filling this order.
    pub fn from_currency(&self) -> &str {
        match self.side {
            Side::Buy => &self.asset_pair.base,
            Side::Sell => &self.asset_pair.quote,
        }
    }

    /// The currency the taker receives when filling this order.
    pub fn to_currency(&self) -> &str {
        match self.side {
            Side::Buy => &self.asset_pair.quote,
            Side::Sell => &self.asset_pair.base,
        }
    }

    /// Raw quote = baseAmount * rate, at max(baseAmount.scale, rate.scale),
    /// HALF_UP. Monotone non-decreasing in `base_amount` by construction
    /// (multiplying a non-negative rate).
    pub fn calculate_quote_amount(&self, base_amount: Decimal, base_scale: u32) -> CoreResult<Decimal> {
        let scale = base_scale.max(self.effective_rate.scale);
        self.effective_rate.convert(base_amount, scale)
    }

    /// Whether `amount` (in base currency) lies within `[min, max]`.
    pub fn validate_partial_fill(&self, amount: Decimal) -> bool {
        self.bounds.contains(amount)
    }
}

impl std::fmt::Debug for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Order")
            .field("id", &self.id)
            .field("side", &self.side)
            .field("asset_pair", &self.asset_pair)
            .field("bounds", &self.bounds)
            .field("effective_rate", &self.effective_rate)
            .field("has_fee_policy", &self.fee_policy.is_some())
            .finish()
    }
}

/// Rounds `amount` at `scale` using the crate-wide HALF_UP convention.
/// Thin re-export so callers building orders don't need to reach into
/// `decimal::ops` directly.
pub fn round_half_up(amount: Decimal, scale: u32) -> CoreResult<Decimal> {
    ops::rescale(amount, scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_order() -> Order {
        Order::new(
            1,
            Side::Buy,
            AssetPair::new("USD", "EUR"),
            OrderBounds::new(dec!(50), dec!(150)).unwrap(),
            ExchangeRate::new("USD", "EUR", dec!(0.92), 6).unwrap(),
            None,
        )
        .unwrap()
    }

    #[test]
    fn quote_amount_is_monotone_nondecreasing() {
        let order = sample_order();
        let mut prev = Decimal::ZERO;
        let mut amount = order.bounds.min;
        while amount <= order.bounds.max {
            let quote = order.calculate_quote_amount(amount, 2).unwrap();
            assert!(quote >= prev);
            prev = quote;
            amount += dec!(10);
        }
    }

    #[test]
    fn validate_partial_fill_respects_bounds() {
        let order = sample_order();
        assert!(!order.validate_partial_fill(dec!(49)));
        assert!(order.validate_partial_fill(dec!(50)));
        assert!(order.validate_partial_fill(dec!(150)));
        assert!(!order.validate_partial_fill(dec!(151)));
    }

    #[test]
    fn transfer_pair_is_rejected() {
        let result = Order::new(
            2,
            Side::Buy,
            AssetPair::new("USD", "USD"),
            OrderBounds::new(dec!(1), dec!(10)).unwrap(),
            ExchangeRate::transfer("USD", 2).unwrap(),
            None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn buy_side_spends_base_receives_quote() {
        let order = sample_order();
        assert_eq!(order.from_currency(), "USD");
        assert_eq!(order.to_currency(), "EUR");
    }
}
