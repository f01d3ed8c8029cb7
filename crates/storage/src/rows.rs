//! Row types shared between the store implementations and the engine.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use ocean_common::OceanResult;

use crate::variables::ScaleRegistry;

/// One observation row as returned by the batched search statements.
///
/// `ordinal` is the 1-based index of the batch input this row answers;
/// the demultiplexer threads rows back to their inputs by it. `sla_filtered`
/// is the raw stored code; decoding happens when result sets are assembled.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct SlaRow {
    pub ordinal: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub sla_filtered: i16,
    /// Geodesic distance from the query point, meters. Absent for
    /// envelope queries, which have no meaningful center distance.
    pub distance_m: Option<f64>,
    /// Seconds from the query center instant to the observation
    /// (positive = observation is after the center).
    pub delta_t_secs: f64,
}

/// A full along-track observation record.
///
/// Correction terms are the raw stored codes; use the accessors with a
/// [`ScaleRegistry`] to obtain meters.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct AlongTrackObservation {
    pub file_name: String,
    pub track: i16,
    pub cycle: i16,
    pub latitude: f64,
    pub longitude: f64,
    pub sla_unfiltered: i16,
    pub sla_filtered: i16,
    pub date_time: DateTime<Utc>,
    pub dac: i16,
    pub ocean_tide: i16,
    pub internal_tide: i16,
    pub lwe: i16,
    pub mdt: i16,
    pub tpa_correction: i16,
    pub mission: String,
    pub basin_id: i32,
}

impl AlongTrackObservation {
    /// Filtered sea level anomaly in meters.
    pub fn sla_filtered_meters(&self, registry: &ScaleRegistry) -> OceanResult<f64> {
        registry.decode("sla_filtered", self.sla_filtered as f64)
    }

    /// Unfiltered sea level anomaly in meters.
    pub fn sla_unfiltered_meters(&self, registry: &ScaleRegistry) -> OceanResult<f64> {
        registry.decode("sla_unfiltered", self.sla_unfiltered as f64)
    }
}

/// One eddy center observation.
///
/// A trajectory is the sequence of observations sharing
/// `(track, cyclonic_type)`, ordered by `observation_number`.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct EddyObservation {
    pub track: i32,
    /// +1 anticyclonic, -1 cyclonic.
    pub cyclonic_type: i16,
    pub observation_number: i32,
    pub latitude: f64,
    pub longitude: f64,
    /// Eddy amplitude, meters.
    pub amplitude: f64,
    /// Radius of the effective contour, meters.
    pub effective_radius: f64,
    /// Radius of the maximum-speed contour, meters.
    pub speed_radius: f64,
    pub effective_contour_shape_error: f64,
    pub speed_contour_shape_error: f64,
    /// Average speed along the speed contour, m/s.
    pub speed_average: f64,
    pub date_time: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_observation_decode() {
        let obs = AlongTrackObservation {
            file_name: "nrt_global_al_phy_l3_20130314.nc".to_string(),
            track: 17,
            cycle: 42,
            latitude: -69.0,
            longitude: 28.0,
            sla_unfiltered: 250,
            sla_filtered: 150,
            date_time: Utc.with_ymd_and_hms(2013, 3, 14, 5, 0, 0).unwrap(),
            dac: -3,
            ocean_tide: 12,
            internal_tide: 1,
            lwe: 0,
            mdt: -1431,
            tpa_correction: 0,
            mission: "al".to_string(),
            basin_id: 10,
        };
        let registry = ScaleRegistry::along_track();
        assert_eq!(obs.sla_filtered_meters(&registry).unwrap(), 0.150);
        assert_eq!(obs.sla_unfiltered_meters(&registry).unwrap(), 0.250);
    }
}
