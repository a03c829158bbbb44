pub mod error;
pub mod grid;
pub mod edge;
pub mod pbm;
pub mod pipeline;

pub use edge::marker::{mark_black_edges, EdgeMarker, MarkStats, MarkStrategy, MarkerConfig};
pub use error::{GridError, PbmError, UnblackError};
pub use grid::BitGrid;
