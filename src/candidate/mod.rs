pub mod materializer;
pub mod types;

pub use materializer::materialize;
pub use types::{CandidatePath, PathLeg, PathResult};
