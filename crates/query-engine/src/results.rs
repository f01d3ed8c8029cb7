//! Typed result sets returned by the query modes.
//!
//! Results are parallel arrays: element i of every field describes the
//! same observation. Sea level anomaly is decoded to meters on
//! construction; raw stored codes never leave this module's constructors.

use storage::SlaRow;

/// Observations answering a geographic query mode, in store order.
#[derive(Debug, Clone, PartialEq)]
pub struct SlaGeographic {
    pub latitude: Vec<f64>,
    pub longitude: Vec<f64>,
    /// Filtered sea level anomaly, meters.
    pub sla_filtered: Vec<f64>,
    /// Geodesic distance from the query point, meters; `None` for modes
    /// that carry no center distance.
    pub distance: Option<Vec<f64>>,
    /// Seconds from the query center instant to each observation
    /// (positive = after the center).
    pub delta_t: Vec<f64>,
}

impl SlaGeographic {
    /// Assemble from store rows, decoding sla codes with the registered
    /// scale factor.
    pub fn from_rows(rows: &[SlaRow], sla_scale: f64) -> Self {
        let distance = (!rows.is_empty() && rows.iter().all(|r| r.distance_m.is_some()))
            .then(|| rows.iter().filter_map(|r| r.distance_m).collect());
        Self {
            latitude: rows.iter().map(|r| r.latitude).collect(),
            longitude: rows.iter().map(|r| r.longitude).collect(),
            sla_filtered: rows
                .iter()
                .map(|r| r.sla_filtered as f64 * sla_scale)
                .collect(),
            distance,
            delta_t: rows.iter().map(|r| r.delta_t_secs).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.latitude.len()
    }

    pub fn is_empty(&self) -> bool {
        self.latitude.is_empty()
    }
}

/// Observations answering a projected-box query, as tangent-plane offsets
/// from the query point's projection.
#[derive(Debug, Clone, PartialEq)]
pub struct SlaProjected {
    /// x offset from the reference projection, meters.
    pub delta_x: Vec<f64>,
    /// y offset from the reference projection, meters.
    pub delta_y: Vec<f64>,
    /// Filtered sea level anomaly, meters.
    pub sla_filtered: Vec<f64>,
    /// Seconds from the query center instant to each observation.
    pub delta_t: Vec<f64>,
}

impl SlaProjected {
    /// Project geographic results about `lon0` and keep the points inside
    /// the `(lx, ly)` box around the reference projection `(x0, y0)`.
    ///
    /// This is the exact second-stage filter behind the store's coarse
    /// geographic envelope: candidates with `|x - x0| > lx` or
    /// `|y - y0| > ly` are discarded.
    pub fn from_geographic_in_box(
        geographic: &SlaGeographic,
        lon0: f64,
        x0: f64,
        y0: f64,
        lx: f64,
        ly: f64,
    ) -> Self {
        let (xs, ys) = projection::forward_many(&geographic.latitude, &geographic.longitude, lon0);

        let mut result = Self {
            delta_x: Vec::new(),
            delta_y: Vec::new(),
            sla_filtered: Vec::new(),
            delta_t: Vec::new(),
        };
        for i in 0..geographic.len() {
            let dx = xs[i] - x0;
            let dy = ys[i] - y0;
            if dx.abs() > lx || dy.abs() > ly {
                continue;
            }
            result.delta_x.push(dx);
            result.delta_y.push(dy);
            result.sla_filtered.push(geographic.sla_filtered[i]);
            result.delta_t.push(geographic.delta_t[i]);
        }
        result
    }

    pub fn len(&self) -> usize {
        self.delta_x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.delta_x.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<SlaRow> {
        vec![
            SlaRow {
                ordinal: 1,
                latitude: -69.1,
                longitude: 28.2,
                sla_filtered: 150,
                distance_m: Some(12_000.0),
                delta_t_secs: -3600.0,
            },
            SlaRow {
                ordinal: 1,
                latitude: -68.9,
                longitude: 27.8,
                sla_filtered: -250,
                distance_m: Some(18_500.0),
                delta_t_secs: 7200.0,
            },
        ]
    }

    #[test]
    fn test_from_rows_decodes_sla() {
        let result = SlaGeographic::from_rows(&rows(), 0.001);
        assert_eq!(result.len(), 2);
        assert_eq!(result.sla_filtered, vec![0.150, -0.250]);
        assert_eq!(result.distance, Some(vec![12_000.0, 18_500.0]));
        assert_eq!(result.delta_t, vec![-3600.0, 7200.0]);
    }

    #[test]
    fn test_from_rows_without_distance() {
        let mut no_distance = rows();
        for row in &mut no_distance {
            row.distance_m = None;
        }
        let result = SlaGeographic::from_rows(&no_distance, 0.001);
        assert_eq!(result.distance, None);
    }

    #[test]
    fn test_box_filter_keeps_offsets() {
        let geographic = SlaGeographic {
            latitude: vec![0.0, 0.0],
            longitude: vec![0.2, 3.0],
            sla_filtered: vec![0.1, 0.2],
            distance: None,
            delta_t: vec![0.0, 0.0],
        };
        // Reference at (0, 0): the point at lon 3.0 is ~333 km east and
        // must fall outside a 100 km box.
        let projected =
            SlaProjected::from_geographic_in_box(&geographic, 0.0, 0.0, 0.0, 100_000.0, 100_000.0);
        assert_eq!(projected.len(), 1);
        assert_eq!(projected.sla_filtered, vec![0.1]);
        assert!(projected.delta_x[0] > 0.0 && projected.delta_x[0] < 100_000.0);
    }
}
