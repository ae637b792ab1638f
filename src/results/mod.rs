pub mod collector;
pub mod ordering;

pub use collector::TopKCollector;
pub use ordering::{DefaultPathOrderStrategy, PathOrderKey, PathOrderStrategy};
