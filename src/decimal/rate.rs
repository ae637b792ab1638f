//! src/decimal/rate.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::ops;
use crate::errors::{CoreError, CoreResult};

/// A directed conversion rate between two currencies: `rate` units of
/// `quote` per one unit of `base`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub base: String,
    pub quote: String,
    pub rate: Decimal,
    pub scale: u32,
}

impl ExchangeRate {
    pub fn new(
        base: impl Into<String>,
        quote: impl Into<String>,
        rate: Decimal,
        scale: u32,
    ) -> CoreResult<Self> {
        ops::check_scale(scale)?;
        if rate <= Decimal::ZERO {
            return Err(CoreError::invalid_input("rate must be > 0"));
        }
        Ok(Self {
            base: base.into(),
            quote: quote.into(),
            rate: ops::rescale(rate, scale)?,
            scale,
        })
    }

    /// A 1:1 transfer rate between identical currencies.
    pub fn transfer(currency: impl Into<String>, scale: u32) -> CoreResult<Self> {
        let currency = currency.into();
        Self::new(currency.clone(), currency, Decimal::ONE, scale)
    }

    pub fn is_transfer(&self) -> bool {
        self.base == self.quote
    }

    /// Swaps base/quote and sets `rate = 1/rate`, rounded HALF_UP at the
    /// same scale.
    pub fn invert(&self) -> CoreResult<ExchangeRate> {
        let inverted_rate = ops::div_rescale(Decimal::ONE, self.rate, self.scale)?;
        ExchangeRate::new(
            self.quote.clone(),
            self.base.clone(),
            inverted_rate,
            self.scale,
        )
    }

    pub fn convert(&self, base_amount: Decimal, scale: u32) -> CoreResult<Decimal> {
        ops::mul_rescale(base_amount, self.rate, scale)
    }
}
