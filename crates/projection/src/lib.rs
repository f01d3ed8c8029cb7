//! Local tangent-plane geodesy for along-track search geometry.
//!
//! Implements the spherical transverse Mercator projection from scratch
//! without external dependencies.

pub mod transverse_mercator;

pub use transverse_mercator::{
    bounding_box, forward, forward_many, inverse, inverse_many, TangentBounds,
};
