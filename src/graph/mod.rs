pub mod builder;
pub mod edge;
pub mod segment;

pub use builder::{build_graph, evaluate_fill, fee_for, Graph, GraphNode};
pub use edge::{EdgeSegment, GraphEdge, Interval, Measure};
