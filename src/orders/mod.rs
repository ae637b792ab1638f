pub mod fees;
pub mod types;

pub use fees::{FeeBreakdown, FeePolicy};
pub use types::{AssetPair, Order, OrderBounds, Side};
