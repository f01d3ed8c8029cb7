//! Spherical transverse Mercator projection.
//!
//! Projects geographic coordinates onto a local tangent plane about a
//! reference meridian, giving planar (x, y) offsets in meters suitable for
//! distance-based filtering and kernel smoothing of along-track data.
//!
//! The sphere radius is the WGS84 equatorial radius scaled by the standard
//! UTM scale factor k0, so distances near the reference meridian are within
//! a few parts in 10^4 of geodesic distances.

use std::f64::consts::PI;

use ocean_common::{OceanError, OceanResult};

/// UTM central-meridian scale factor.
pub const K0: f64 = 0.9996;

/// WGS84 equatorial radius in meters.
pub const WGS84_A: f64 = 6_378_137.0;

/// Projection sphere radius (meters).
pub const R: f64 = K0 * WGS84_A;

/// Project geographic coordinates (degrees) to tangent-plane (x, y) meters
/// about the reference longitude `lon0`.
pub fn forward(lat: f64, lon: f64, lon0: f64) -> (f64, f64) {
    let to_rad = PI / 180.0;
    let phi = lat * to_rad;
    let delta_lambda = (lon - lon0) * to_rad;

    let sin_lambda_cos_phi = delta_lambda.sin() * phi.cos();
    let x = (R / 2.0) * ((1.0 + sin_lambda_cos_phi) / (1.0 - sin_lambda_cos_phi)).ln();
    let y = R * (phi.tan() / delta_lambda.cos()).atan();

    (x, y)
}

/// Inverse-project tangent-plane (x, y) meters back to geographic
/// coordinates (degrees) about the reference longitude `lon0`.
pub fn inverse(x: f64, y: f64, lon0: f64) -> (f64, f64) {
    let to_deg = 180.0 / PI;

    let lat = ((y / R).sin() / (x / R).cosh()).asin() * to_deg;
    let lon = ((x / R).sinh() / (y / R).cos()).atan() * to_deg + lon0;

    (lat, lon)
}

/// Project equal-length latitude/longitude slices. Returns (x, y) vectors
/// in input order.
pub fn forward_many(lats: &[f64], lons: &[f64], lon0: f64) -> (Vec<f64>, Vec<f64>) {
    debug_assert_eq!(lats.len(), lons.len());
    lats.iter()
        .zip(lons.iter())
        .map(|(&lat, &lon)| forward(lat, lon, lon0))
        .unzip()
}

/// Inverse-project equal-length x/y slices. Returns (lat, lon) vectors in
/// input order.
pub fn inverse_many(xs: &[f64], ys: &[f64], lon0: f64) -> (Vec<f64>, Vec<f64>) {
    debug_assert_eq!(xs.len(), ys.len());
    xs.iter()
        .zip(ys.iter())
        .map(|(&x, &y)| inverse(x, y, lon0))
        .unzip()
}

/// Conservative geographic envelope of a projected box, plus the projected
/// reference point.
///
/// `min/max` lat/lon are guaranteed to contain the inverse image of the
/// whole `x0 ± lx, y0 ± ly` rectangle; they are a coarse pre-filter only,
/// and exact box membership must be re-checked in the projected plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TangentBounds {
    /// Projected x of the reference point (meters).
    pub x0: f64,
    /// Projected y of the reference point (meters).
    pub y0: f64,
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

/// Compute the geographic envelope of the projected box of half-widths
/// `(lx, ly)` meters centered on `(lat0, lon0)`.
///
/// Samples the four corners plus the midpoints of the top and bottom edges
/// of the projected rectangle; the latitude extremes of a transverse
/// Mercator box occur on those edge midpoints, so the six-point envelope
/// contains the whole rectangle.
pub fn bounding_box(lat0: f64, lon0: f64, lx: f64, ly: f64) -> OceanResult<TangentBounds> {
    if lx <= 0.0 || ly <= 0.0 {
        return Err(OceanError::InvalidWindow(format!(
            "projected box half-widths must be positive, got Lx = {} m, Ly = {} m",
            lx, ly
        )));
    }

    let (x0, y0) = forward(lat0, lon0, lon0);

    let xs = [x0 + lx, x0 - lx, x0 - lx, x0, x0, x0 + lx];
    let ys = [y0 + ly, y0 - ly, y0 + ly, y0 + ly, y0 - ly, y0 - ly];
    let (lats, lons) = inverse_many(&xs, &ys, lon0);

    let mut bounds = TangentBounds {
        x0,
        y0,
        min_lat: f64::MAX,
        min_lon: f64::MAX,
        max_lat: f64::MIN,
        max_lon: f64::MIN,
    };
    for (&lat, &lon) in lats.iter().zip(lons.iter()) {
        bounds.min_lat = bounds.min_lat.min(lat);
        bounds.max_lat = bounds.max_lat.max(lat);
        bounds.min_lon = bounds.min_lon.min(lon);
        bounds.max_lon = bounds.max_lon.max(lon);
    }

    Ok(bounds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_point_projects_to_origin() {
        let (x, y) = forward(0.0, 0.0, 0.0);
        assert!(x.abs() < 1e-9, "x should be 0, got {}", x);
        assert!(y.abs() < 1e-9, "y should be 0, got {}", y);

        // On the reference meridian, y is the scaled meridian arc.
        let (x, y) = forward(45.0, 10.0, 10.0);
        assert!(x.abs() < 1e-9);
        assert!((y - R * 45.0 * PI / 180.0).abs() < 1e-6);
    }

    #[test]
    fn test_one_degree_of_longitude_at_equator() {
        let (x, y) = forward(0.0, 1.0, 0.0);
        // One degree of longitude at the equator is ~111.3 km on the k0
        // sphere.
        let expected = R * PI / 180.0;
        assert!((x - expected).abs() < 10.0, "x = {}", x);
        assert!(y.abs() < 1e-6);
    }

    #[test]
    fn test_roundtrip_over_grid() {
        // Poles are a known singularity; stay inside (-89, 89).
        let mut lat = -88.0;
        while lat <= 88.0 {
            let mut lon = -180.0_f64;
            while lon < 180.0 {
                for lon0 in [-120.0, 0.0, 28.0] {
                    // Keep away from the |Δλ| = 90° branch line of the
                    // projection.
                    let dl = (lon - lon0).rem_euclid(360.0);
                    if (85.0..275.0).contains(&dl) {
                        continue;
                    }
                    let (x, y) = forward(lat, lon, lon0);
                    let (lat2, lon2) = inverse(x, y, lon0);
                    assert!(
                        (lat2 - lat).abs() < 1e-6,
                        "lat roundtrip failed at ({}, {}, lon0={}): {}",
                        lat,
                        lon,
                        lon0,
                        lat2
                    );
                    let mut dlon = (lon2 - lon).rem_euclid(360.0);
                    if dlon > 180.0 {
                        dlon -= 360.0;
                    }
                    assert!(
                        dlon.abs() < 1e-6,
                        "lon roundtrip failed at ({}, {}, lon0={}): {}",
                        lat,
                        lon,
                        lon0,
                        lon2
                    );
                }
                lon += 7.0;
            }
            lat += 4.0;
        }
    }

    #[test]
    fn test_forward_many_matches_scalar() {
        let lats = [10.0, -42.5, 67.0];
        let lons = [5.0, -1.25, 30.0];
        let (xs, ys) = forward_many(&lats, &lons, 3.0);
        for i in 0..lats.len() {
            let (x, y) = forward(lats[i], lons[i], 3.0);
            assert_eq!(xs[i], x);
            assert_eq!(ys[i], y);
        }
    }

    #[test]
    fn test_bounding_box_contains_projected_rectangle() {
        let (lat0, lon0) = (-69.0, 28.0);
        let (lx, ly) = (500_000.0, 300_000.0);
        let b = bounding_box(lat0, lon0, lx, ly).unwrap();

        // Every point on the boundary of the projected rectangle must
        // inverse-project inside the envelope.
        for i in 0..=20 {
            let f = i as f64 / 20.0;
            let edge_points = [
                (b.x0 - lx + f * 2.0 * lx, b.y0 - ly),
                (b.x0 - lx + f * 2.0 * lx, b.y0 + ly),
                (b.x0 - lx, b.y0 - ly + f * 2.0 * ly),
                (b.x0 + lx, b.y0 - ly + f * 2.0 * ly),
            ];
            for (x, y) in edge_points {
                let (lat, lon) = inverse(x, y, lon0);
                assert!(
                    lat >= b.min_lat - 1e-9 && lat <= b.max_lat + 1e-9,
                    "lat {} outside [{}, {}]",
                    lat,
                    b.min_lat,
                    b.max_lat
                );
                assert!(
                    lon >= b.min_lon - 1e-9 && lon <= b.max_lon + 1e-9,
                    "lon {} outside [{}, {}]",
                    lon,
                    b.min_lon,
                    b.max_lon
                );
            }
        }
    }

    #[test]
    fn test_bounding_box_symmetric_about_reference() {
        let b = bounding_box(0.0, 10.0, 200_000.0, 200_000.0).unwrap();
        assert!((b.x0).abs() < 1e-9);
        assert!((b.y0).abs() < 1e-9);
        assert!(((b.max_lon - 10.0) - (10.0 - b.min_lon)).abs() < 1e-9);
        assert!((b.max_lat + b.min_lat).abs() < 1e-9);
    }

    #[test]
    fn test_bounding_box_rejects_non_positive_widths() {
        assert!(bounding_box(0.0, 0.0, 0.0, 100.0).is_err());
        assert!(bounding_box(0.0, 0.0, 100.0, -1.0).is_err());
    }
}
