//! One-time load of the basin mask raster from its packaged NetCDF file.

use std::path::Path;

use ocean_common::{OceanError, OceanResult};

use crate::mask::BasinMask;

/// Name of the raster variable inside the mask file.
const MASK_VARIABLE: &str = "basinmask";

/// Load the basin mask from a NetCDF raster file.
///
/// The file must contain a 2-D integer variable named `basinmask` indexed
/// [lat_index, lon_index]. Values are read raw; the mask carries no
/// scale/offset encoding.
pub fn load_basin_mask(path: &Path) -> OceanResult<BasinMask> {
    let file = netcdf::open(path)
        .map_err(|e| OceanError::MaskLoad(format!("cannot open {}: {}", path.display(), e)))?;

    let var = file.variable(MASK_VARIABLE).ok_or_else(|| {
        OceanError::MaskLoad(format!(
            "variable '{}' not found in {}",
            MASK_VARIABLE,
            path.display()
        ))
    })?;

    let dims = var.dimensions();
    if dims.len() != 2 {
        return Err(OceanError::MaskLoad(format!(
            "variable '{}' has {} dimensions, expected 2",
            MASK_VARIABLE,
            dims.len()
        )));
    }
    let nlat = dims[0].len();
    let nlon = dims[1].len();

    let data = var
        .get_values::<i32, _>(..)
        .map_err(|e| OceanError::MaskLoad(format!("cannot read '{}': {}", MASK_VARIABLE, e)))?;

    tracing::info!(path = %path.display(), nlat, nlon, "basin mask raster read");
    BasinMask::from_raw(data, nlat, nlon)
}
