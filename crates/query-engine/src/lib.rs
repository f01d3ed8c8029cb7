//! Basin-aware spatiotemporal query engine for along-track altimetry.
//!
//! Given a query point (or batch of points) and a time, the engine
//! resolves the point's ocean basin from a raster mask, expands the search
//! to topologically-connected basins, issues one batched query against the
//! observation store, and decodes the raw rows into unit-correct parallel
//! arrays, optionally reprojected into a local tangent plane for
//! distance-based smoothing or gridding.

pub mod engine;
pub mod results;

mod eddy_ops;

pub use engine::SpatiotemporalQueryEngine;
pub use results::{SlaGeographic, SlaProjected};
