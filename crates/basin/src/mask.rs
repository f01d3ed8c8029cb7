//! Basin mask raster lookup.

use ocean_common::{OceanError, OceanResult};

/// Angular resolution of the basin mask raster, degrees per cell.
pub const BASIN_MASK_RESOLUTION_DEG: f64 = 1.0 / 6.0;

/// Basin id assigned to land / no-basin cells.
pub const LAND_BASIN_ID: i32 = 0;

/// Dense raster mapping (latitude, longitude) to a basin id.
///
/// Row-major over latitude rows: cell (i, j) covers latitudes
/// `[-90 + i·res, -90 + (i+1)·res)` and longitudes `[j·res, (j+1)·res)`
/// on the [0, 360) longitude convention. Callers may pass longitudes in
/// either [-180, 180) or [0, 360); they are normalized by positive modulo
/// before indexing.
#[derive(Debug, Clone)]
pub struct BasinMask {
    data: Vec<i32>,
    nlat: usize,
    nlon: usize,
    resolution: f64,
}

impl BasinMask {
    /// Build a mask from a row-major cell array.
    pub fn from_raw(data: Vec<i32>, nlat: usize, nlon: usize) -> OceanResult<Self> {
        Self::with_resolution(data, nlat, nlon, BASIN_MASK_RESOLUTION_DEG)
    }

    /// Build a mask with an explicit resolution (tests use coarse grids).
    pub fn with_resolution(
        data: Vec<i32>,
        nlat: usize,
        nlon: usize,
        resolution: f64,
    ) -> OceanResult<Self> {
        if nlat == 0 || nlon == 0 {
            return Err(OceanError::MaskLoad(format!(
                "empty raster: {} x {} grid",
                nlat, nlon
            )));
        }
        if data.len() != nlat * nlon {
            return Err(OceanError::MaskLoad(format!(
                "raster size mismatch: {} cells for {} x {} grid",
                data.len(),
                nlat,
                nlon
            )));
        }
        if resolution <= 0.0 {
            return Err(OceanError::MaskLoad(format!(
                "non-positive resolution: {}",
                resolution
            )));
        }
        tracing::info!(nlat, nlon, resolution, "basin mask loaded");
        Ok(Self {
            data,
            nlat,
            nlon,
            resolution,
        })
    }

    /// Grid dimensions as (nlat, nlon).
    pub fn dimensions(&self) -> (usize, usize) {
        (self.nlat, self.nlon)
    }

    /// Basin id of the cell containing (latitude, longitude), both in
    /// degrees. Latitude must lie in [-90, 90].
    pub fn basin_id_at(&self, latitude: f64, longitude: f64) -> OceanResult<i32> {
        if !(-90.0..=90.0).contains(&latitude) || latitude.is_nan() {
            return Err(OceanError::OutOfRange {
                what: "latitude",
                value: latitude,
            });
        }
        if !longitude.is_finite() {
            return Err(OceanError::OutOfRange {
                what: "longitude",
                value: longitude,
            });
        }

        let i = (((latitude + 90.0) / self.resolution) as usize).min(self.nlat - 1);
        let lon = longitude.rem_euclid(360.0);
        let j = ((lon / self.resolution) as usize).min(self.nlon - 1);

        Ok(self.data[i * self.nlon + j])
    }

    /// Vectorized lookup over equal-length latitude/longitude slices,
    /// returning ids in input order.
    pub fn basin_ids_at(&self, latitudes: &[f64], longitudes: &[f64]) -> OceanResult<Vec<i32>> {
        if latitudes.len() != longitudes.len() {
            return Err(OceanError::InvalidBatch(format!(
                "{} latitudes vs {} longitudes",
                latitudes.len(),
                longitudes.len()
            )));
        }
        latitudes
            .iter()
            .zip(longitudes.iter())
            .map(|(&lat, &lon)| self.basin_id_at(lat, lon))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 4 x 8 grid at 45° resolution: northern hemisphere cells get
    /// basin id = longitude cell index + 1, southern cells are land.
    fn test_mask() -> BasinMask {
        let nlat = 4;
        let nlon = 8;
        let mut data = vec![0i32; nlat * nlon];
        for i in 2..nlat {
            for j in 0..nlon {
                data[i * nlon + j] = j as i32 + 1;
            }
        }
        BasinMask::with_resolution(data, nlat, nlon, 45.0).unwrap()
    }

    #[test]
    fn test_lookup_by_cell() {
        let mask = test_mask();
        // Southern hemisphere is land.
        assert_eq!(mask.basin_id_at(-45.0, 10.0).unwrap(), LAND_BASIN_ID);
        // Northern hemisphere: id keyed by longitude cell.
        assert_eq!(mask.basin_id_at(10.0, 10.0).unwrap(), 1);
        assert_eq!(mask.basin_id_at(10.0, 100.0).unwrap(), 3);
    }

    #[test]
    fn test_negative_longitude_normalized() {
        let mask = test_mask();
        // -80° and 280° land in the same cell.
        assert_eq!(
            mask.basin_id_at(10.0, -80.0).unwrap(),
            mask.basin_id_at(10.0, 280.0).unwrap()
        );
        assert_eq!(mask.basin_id_at(10.0, -80.0).unwrap(), 7);
    }

    #[test]
    fn test_domain_edges_clamp() {
        let mask = test_mask();
        // lat = 90 and lon = 360 fall in the last row / wrap to the first
        // column rather than indexing out of bounds.
        assert_eq!(mask.basin_id_at(90.0, 0.0).unwrap(), 1);
        assert_eq!(mask.basin_id_at(10.0, 360.0).unwrap(), 1);
    }

    #[test]
    fn test_out_of_range_latitude_rejected() {
        let mask = test_mask();
        assert!(matches!(
            mask.basin_id_at(90.5, 0.0),
            Err(OceanError::OutOfRange { what: "latitude", .. })
        ));
        assert!(matches!(
            mask.basin_id_at(-120.0, 0.0),
            Err(OceanError::OutOfRange { .. })
        ));
        assert!(mask.basin_id_at(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_argument_order_is_latitude_longitude() {
        let mask = test_mask();
        // A Southern Ocean point and its transpose resolve differently;
        // swapping the arguments cannot go unnoticed.
        let correct = mask.basin_id_at(-69.0, 28.0).unwrap();
        let swapped = mask.basin_id_at(28.0, -69.0).unwrap();
        assert_eq!(correct, LAND_BASIN_ID);
        assert_ne!(correct, swapped);
    }

    #[test]
    fn test_lookup_is_pure() {
        let mask = test_mask();
        let first = mask.basin_id_at(10.0, 100.0).unwrap();
        for _ in 0..10 {
            // Interleave unrelated lookups; result must not change.
            let _ = mask.basin_id_at(-45.0, 200.0).unwrap();
            assert_eq!(mask.basin_id_at(10.0, 100.0).unwrap(), first);
        }
    }

    #[test]
    fn test_batch_matches_scalar_and_preserves_order() {
        let mask = test_mask();
        let lats = [10.0, -45.0, 80.0];
        let lons = [100.0, 10.0, -80.0];
        let ids = mask.basin_ids_at(&lats, &lons).unwrap();
        for k in 0..lats.len() {
            assert_eq!(ids[k], mask.basin_id_at(lats[k], lons[k]).unwrap());
        }
    }

    #[test]
    fn test_batch_length_mismatch() {
        let mask = test_mask();
        assert!(matches!(
            mask.basin_ids_at(&[0.0, 1.0], &[0.0]),
            Err(OceanError::InvalidBatch(_))
        ));
    }

    #[test]
    fn test_size_mismatch_rejected() {
        assert!(BasinMask::from_raw(vec![0; 10], 4, 8).is_err());
    }
}
