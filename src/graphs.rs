//! 2D function graphs: request model, sampling, rendering and the request pipeline
/// `GraphError`, the error of everything above the symbolic layer
pub mod errors;
/// `GraphTask`, `GraphRequest`, `GraphResponse` and per-type function resolution
pub mod graph_task;
/// sampling and clipping of curves into a `Figure`
pub mod curves;
/// `Figure` to PNG or SVG bytes with plotters
pub mod render;
/// JSON request to base64 images
pub mod pipeline;

pub use errors::GraphError;
