//! Eddy trajectory store backed by PostgreSQL/PostGIS.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use ocean_common::{OceanError, OceanResult};

use crate::rows::{AlongTrackObservation, EddyObservation};
use crate::store::EddyStore;

// date_time is stored as timestamp without time zone (UTC); re-tag it so
// it decodes as DateTime<Utc>.
const EDDY_COLUMNS: &str = "track, cyclonic_type, observation_number, latitude, longitude, \
     amplitude, effective_radius, speed_radius, \
     effective_contour_shape_error, speed_contour_shape_error, \
     speed_average, date_time AT TIME ZONE 'UTC' AS date_time";

/// Eddy store over the `eddy` table.
#[derive(Debug, Clone)]
pub struct PgEddyStore {
    pool: PgPool,
}

impl PgEddyStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Along-track observations inside an eddy's maximum-speed contour,
    /// over the whole life of the `(track, cyclonic_type)` trajectory.
    /// An observation qualifies when it falls on the same day as an eddy
    /// observation and within that observation's speed radius of its
    /// center.
    pub async fn along_track_near_eddy(
        &self,
        track: i32,
        cyclonic_type: i16,
    ) -> OceanResult<Vec<AlongTrackObservation>> {
        let sql = "SELECT DISTINCT at.file_name, at.track, at.cycle, at.latitude, at.longitude, \
                   at.sla_unfiltered, at.sla_filtered, \
                   at.date_time AT TIME ZONE 'UTC' AS date_time, at.dac, at.ocean_tide, \
                   at.internal_tide, at.lwe, at.mdt, at.tpa_correction, at.mission, at.basin_id \
             FROM eddy AS e \
             JOIN along_track AS at \
               ON at.date_time::date = e.date_time::date \
              AND ST_DWithin(at.cat_point::geography, e.eddy_point::geography, e.speed_radius) \
             WHERE e.track = $1 AND e.cyclonic_type = $2 \
             ORDER BY date_time";

        sqlx::query_as::<_, AlongTrackObservation>(sql)
            .bind(track)
            .bind(cyclonic_type)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| OceanError::StoreUnavailable(format!("query failed: {}", e)))
    }
}

#[async_trait]
impl EddyStore for PgEddyStore {
    async fn trajectory(
        &self,
        track: i32,
        cyclonic_type: i16,
    ) -> OceanResult<Vec<EddyObservation>> {
        let sql = format!(
            "SELECT {EDDY_COLUMNS} FROM eddy \
             WHERE track = $1 AND cyclonic_type = $2 \
             ORDER BY observation_number"
        );

        let observations = sqlx::query_as::<_, EddyObservation>(&sql)
            .bind(track)
            .bind(cyclonic_type)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| OceanError::StoreUnavailable(format!("query failed: {}", e)))?;

        validate_trajectory(&observations)?;
        Ok(observations)
    }

    async fn eddies_in_window(
        &self,
        latitude: f64,
        longitude: f64,
        central_date_time: DateTime<Utc>,
        time_delta: chrono::Duration,
        distance: f64,
    ) -> OceanResult<Vec<EddyObservation>> {
        let sql = format!(
            "SELECT {EDDY_COLUMNS} FROM eddy \
             WHERE ST_DWithin(eddy_point::geography, \
                              ST_SetSRID(ST_MakePoint($2, $1), 4326)::geography, $5) \
               AND date_time BETWEEN $3 - make_interval(secs => $4) \
                                 AND $3 + make_interval(secs => $4) \
             ORDER BY date_time"
        );

        sqlx::query_as::<_, EddyObservation>(&sql)
            .bind(latitude)
            .bind(longitude)
            .bind(central_date_time.naive_utc())
            .bind(time_delta.num_seconds() as f64)
            .bind(distance)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| OceanError::StoreUnavailable(format!("query failed: {}", e)))
    }
}

/// Observation numbers must strictly increase along a trajectory.
fn validate_trajectory(observations: &[EddyObservation]) -> OceanResult<()> {
    for pair in observations.windows(2) {
        if pair[1].observation_number <= pair[0].observation_number {
            return Err(OceanError::CorruptTrajectory(format!(
                "track {} cyclonic_type {}: observation_number {} followed by {}",
                pair[0].track,
                pair[0].cyclonic_type,
                pair[0].observation_number,
                pair[1].observation_number
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn eddy(observation_number: i32) -> EddyObservation {
        EddyObservation {
            track: 41,
            cyclonic_type: -1,
            observation_number,
            latitude: -30.0,
            longitude: -10.0,
            amplitude: 0.12,
            effective_radius: 90_000.0,
            speed_radius: 65_000.0,
            effective_contour_shape_error: 32.0,
            speed_contour_shape_error: 21.0,
            speed_average: 0.25,
            date_time: Utc.with_ymd_and_hms(2011, 6, 1, 0, 0, 0).unwrap()
                + chrono::Duration::days(observation_number as i64),
        }
    }

    #[test]
    fn test_monotone_trajectory_accepted() {
        let trajectory = vec![eddy(0), eddy(1), eddy(2), eddy(5)];
        assert!(validate_trajectory(&trajectory).is_ok());
    }

    #[test]
    fn test_repeated_observation_number_rejected() {
        let trajectory = vec![eddy(0), eddy(1), eddy(1)];
        assert!(matches!(
            validate_trajectory(&trajectory),
            Err(OceanError::CorruptTrajectory(_))
        ));
    }

    #[test]
    fn test_decreasing_observation_number_rejected() {
        let trajectory = vec![eddy(3), eddy(2)];
        assert!(validate_trajectory(&trajectory).is_err());
    }

    #[test]
    fn test_empty_and_singleton_trajectories_valid() {
        assert!(validate_trajectory(&[]).is_ok());
        assert!(validate_trajectory(&[eddy(7)]).is_ok());
    }
}
