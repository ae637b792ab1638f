//! flowpath-core: best-first path search over a directed multigraph of
//! peer-to-peer conversion orders. See `SPEC_FULL.md` for the full
//! component breakdown; each submodule here corresponds to one component
//! in that document's dependency-ordered component list.

pub mod candidate;
pub mod cli;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod graph;
pub mod orders;
pub mod results;
pub mod search;
pub mod telemetry;

pub use candidate::{CandidatePath, PathLeg, PathResult};
pub use errors::{CoreError, CoreResult};
pub use graph::{build_graph, Graph};
pub use orders::{AssetPair, Order, OrderBounds, Side};
pub use search::{path_search, EngineConfig, SearchOutcome, SearchRequest, SpendConstraints};
