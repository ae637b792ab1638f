//! src/decimal/mod.rs
//!
//! Arbitrary-precision decimal arithmetic and the `Money`/`ExchangeRate`
//! value types built on top of it. Every producing operation is HALF_UP
//! rounded and deterministic; floating point never enters this pipeline.

pub mod money;
pub mod ops;
pub mod rate;

pub use money::{Money, MoneyMap};
pub use rate::ExchangeRate;

/// Backend ceiling: `rust_decimal::Decimal` carries 28-29 significant
/// digits. Anything above this is rejected as `InvalidInput` rather than
/// silently truncated. See SPEC_FULL.md open-question resolution.
pub const MAX_SCALE: u32 = 28;
