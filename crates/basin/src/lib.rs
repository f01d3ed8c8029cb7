//! Ocean basin resolution for spatiotemporal search.
//!
//! Two read-only session caches built once at startup:
//!
//! - [`BasinMask`], a dense raster mapping (latitude, longitude) to an
//!   integer basin id;
//! - [`BasinConnectivityGraph`], the adjacency of basins treated as
//!   hydrologically joined for search purposes.
//!
//! Both are immutable after construction and safe to share across tasks
//! behind an `Arc`.

pub mod connectivity;
pub mod mask;
pub mod netcdf_loader;

pub use connectivity::BasinConnectivityGraph;
pub use mask::{BasinMask, BASIN_MASK_RESOLUTION_DEG, LAND_BASIN_ID};
pub use netcdf_loader::load_basin_mask;
