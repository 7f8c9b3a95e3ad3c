/// The compute context.
pub mod context;
pub use context::Context;

/// The compute graph of actors.
pub mod pipeline;
pub use pipeline::{CancelRequest, Pipeline};

// Actors and connections as a graph, for validation and printing.
mod topology;
