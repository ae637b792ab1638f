//! src/decimal/money.rs

use std::cmp::Ordering;
use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::ops;
use crate::errors::{CoreError, CoreResult};

fn is_valid_currency(symbol: &str) -> bool {
    let len = symbol.len();
    (3..=12).contains(&len) && symbol.bytes().all(|b| b.is_ascii_uppercase())
}

/// A signed arbitrary-precision amount tagged with a currency symbol.
///
/// Invariants: `currency` matches `[A-Z]{3,12}`; `scale <= MAX_SCALE`; no
/// float ever touches `amount`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    pub currency: String,
    pub amount: Decimal,
    pub scale: u32,
}

impl Money {
    pub fn new(currency: impl Into<String>, amount: Decimal, scale: u32) -> CoreResult<Self> {
        let currency = currency.into();
        if !is_valid_currency(&currency) {
            return Err(CoreError::invalid_input(format!(
                "currency '{currency}' must match [A-Z]{{3,12}}"
            )));
        }
        ops::check_scale(scale)?;
        let amount = ops::rescale(amount, scale)?;
        Ok(Self {
            currency,
            amount,
            scale,
        })
    }

    pub fn zero(currency: impl Into<String>, scale: u32) -> CoreResult<Self> {
        Self::new(currency, Decimal::ZERO, scale)
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Rescales the lower-scale operand up to the other's scale, HALF_UP.
    fn align(a: &Money, b: &Money) -> CoreResult<(Money, Money)> {
        if a.currency != b.currency {
            return Err(CoreError::invalid_input(format!(
                "currency mismatch: {} vs {}",
                a.currency, b.currency
            )));
        }
        let scale = a.scale.max(b.scale);
        let a2 = Money::new(a.currency.clone(), ops::rescale(a.amount, scale)?, scale)?;
        let b2 = Money::new(b.currency.clone(), ops::rescale(b.amount, scale)?, scale)?;
        Ok((a2, b2))
    }

    pub fn add(&self, other: &Money) -> CoreResult<Money> {
        let (a, b) = Self::align(self, other)?;
        Money::new(a.currency, ops::add(a.amount, b.amount)?, a.scale)
    }

    pub fn sub(&self, other: &Money) -> CoreResult<Money> {
        let (a, b) = Self::align(self, other)?;
        Money::new(a.currency, ops::sub(a.amount, b.amount)?, a.scale)
    }

    pub fn compare(&self, other: &Money) -> CoreResult<Ordering> {
        let (a, b) = Self::align(self, other)?;
        Ok(a.amount.cmp(&b.amount))
    }

    pub fn min(&self, other: &Money) -> CoreResult<Money> {
        Ok(match self.compare(other)? {
            Ordering::Greater => other.clone(),
            _ => self.clone(),
        })
    }

    pub fn max(&self, other: &Money) -> CoreResult<Money> {
        Ok(match self.compare(other)? {
            Ordering::Less => other.clone(),
            _ => self.clone(),
        })
    }
}

/// A currency-keyed sum of `Money`, used for aggregated fee breakdowns.
/// Keys are sorted ascending on iteration, matching the serialised contract.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoneyMap(BTreeMap<String, Money>);

impl MoneyMap {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Adds `amount` into the bucket for its currency, summing at the
    /// higher of the two scales when a bucket already exists.
    pub fn add(&mut self, amount: Money) -> CoreResult<()> {
        match self.0.get(&amount.currency) {
            Some(existing) => {
                let merged = existing.add(&amount)?;
                self.0.insert(amount.currency.clone(), merged);
            }
            None => {
                self.0.insert(amount.currency.clone(), amount);
            }
        }
        Ok(())
    }

    /// Merges `other` into a fresh copy of `self`. Merging with an empty
    /// map is the identity operation (idempotence property from §8).
    pub fn merge(&self, other: &MoneyMap) -> CoreResult<MoneyMap> {
        let mut out = self.clone();
        for (_, v) in other.0.iter() {
            out.add(v.clone())?;
        }
        Ok(out)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Money)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, currency: &str) -> Option<&Money> {
        self.0.get(currency)
    }
}

impl Serialize for MoneyMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in self.0.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rejects_lowercase_currency() {
        assert!(Money::new("usd", dec!(1), 2).is_err());
    }

    #[test]
    fn add_requires_same_currency() {
        let usd = Money::new("USD", dec!(1), 2).unwrap();
        let eur = Money::new("EUR", dec!(1), 2).unwrap();
        assert!(usd.add(&eur).is_err());
    }

    #[test]
    fn add_rescales_lower_side_up() {
        let a = Money::new("USD", dec!(1), 0).unwrap();
        let b = Money::new("USD", dec!(0.50), 2).unwrap();
        let sum = a.add(&b).unwrap();
        assert_eq!(sum.amount, dec!(1.50));
        assert_eq!(sum.scale, 2);
    }

    #[test]
    fn money_map_merge_with_empty_is_identity() {
        let mut m = MoneyMap::new();
        m.add(Money::new("USD", dec!(5), 2).unwrap()).unwrap();
        let merged = m.merge(&MoneyMap::new()).unwrap();
        assert_eq!(merged, m);
    }

    #[test]
    fn money_map_sums_same_currency_entries() {
        let mut m = MoneyMap::new();
        m.add(Money::new("USD", dec!(5), 2).unwrap()).unwrap();
        m.add(Money::new("USD", dec!(2.5), 2).unwrap()).unwrap();
        assert_eq!(m.get("USD").unwrap().amount, dec!(7.50));
    }
}
