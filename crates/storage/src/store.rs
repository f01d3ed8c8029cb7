//! Store abstraction: batched, order-preserving search operations.
//!
//! Each operation accepts a batch of named parameter bundles and answers
//! with one result set per input, in input order, placing a single logical
//! database round trip regardless of batch size. Implementations must fail
//! the whole batch on error; partial results would silently misalign
//! inputs and outputs.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use ocean_common::{OceanError, OceanResult};

use crate::rows::{EddyObservation, SlaRow};

/// Rows answering one batch input.
pub type SlaResultSet = Vec<SlaRow>;

/// Parameters for one nearest-neighbor search.
#[derive(Debug, Clone)]
pub struct NearestNeighborQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub central_date_time: DateTime<Utc>,
    /// Half width of the temporal window on each side of the center.
    pub time_delta: chrono::Duration,
    /// Basin ids the result may come from; never empty.
    pub connected_basin_ids: Vec<i32>,
    pub missions: Vec<String>,
}

/// Parameters for one radius/time-window search.
#[derive(Debug, Clone)]
pub struct RadiusWindowQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub central_date_time: DateTime<Utc>,
    pub time_delta: chrono::Duration,
    /// Geodesic search radius, meters.
    pub distance: f64,
    /// `None` disables basin masking for this input.
    pub connected_basin_ids: Option<Vec<i32>>,
    pub missions: Vec<String>,
}

/// Parameters for one geographic-envelope/time-window search, the coarse
/// pre-filter of the projected-box mode.
#[derive(Debug, Clone)]
pub struct EnvelopeWindowQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub central_date_time: DateTime<Utc>,
    pub time_delta: chrono::Duration,
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
    /// `None` disables basin masking for this input.
    pub connected_basin_ids: Option<Vec<i32>>,
}

/// Batched search operations over the along-track observation store.
#[async_trait]
pub trait ObservationStore: Send + Sync {
    /// The k geographically nearest observations per input, within its
    /// time window, basin set and mission filter.
    async fn nearest_neighbors(
        &self,
        queries: &[NearestNeighborQuery],
        deadline: Option<Duration>,
    ) -> OceanResult<Vec<SlaResultSet>>;

    /// All observations within each input's geodesic radius and time
    /// window (and basin set, when masking is on).
    async fn radius_windows(
        &self,
        queries: &[RadiusWindowQuery],
        deadline: Option<Duration>,
    ) -> OceanResult<Vec<SlaResultSet>>;

    /// All observations within each input's geographic envelope and time
    /// window (and basin set, when masking is on). Exact projected-box
    /// membership is the caller's second-stage filter.
    async fn envelope_windows(
        &self,
        queries: &[EnvelopeWindowQuery],
        deadline: Option<Duration>,
    ) -> OceanResult<Vec<SlaResultSet>>;
}

/// Search operations over the eddy trajectory store.
#[async_trait]
pub trait EddyStore: Send + Sync {
    /// The full trajectory for `(track, cyclonic_type)`, ordered by
    /// observation number. Empty when the trajectory is unknown.
    async fn trajectory(
        &self,
        track: i32,
        cyclonic_type: i16,
    ) -> OceanResult<Vec<EddyObservation>>;

    /// Eddy observations with centers inside a geodesic radius and time
    /// window.
    async fn eddies_in_window(
        &self,
        latitude: f64,
        longitude: f64,
        central_date_time: DateTime<Utc>,
        time_delta: chrono::Duration,
        distance: f64,
    ) -> OceanResult<Vec<EddyObservation>>;
}

/// Thread ordinal-tagged rows back into one result set per batch input.
///
/// Rows carry the 1-based input ordinal assigned by the batched statement;
/// inputs that matched nothing get an empty set. A row with an ordinal
/// outside `1..=n` indicates a store bug and fails the whole batch.
pub fn demux_by_ordinal(rows: Vec<SlaRow>, n: usize) -> OceanResult<Vec<SlaResultSet>> {
    let mut sets: Vec<SlaResultSet> = vec![Vec::new(); n];
    for row in rows {
        let index = (row.ordinal - 1) as usize;
        if row.ordinal < 1 || index >= n {
            return Err(OceanError::StoreUnavailable(format!(
                "batch demux: ordinal {} outside 1..={}",
                row.ordinal, n
            )));
        }
        sets[index].push(row);
    }
    Ok(sets)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(ordinal: i64, sla: i16) -> SlaRow {
        SlaRow {
            ordinal,
            latitude: 0.0,
            longitude: 0.0,
            sla_filtered: sla,
            distance_m: None,
            delta_t_secs: 0.0,
        }
    }

    #[test]
    fn test_demux_interleaved_ordinals() {
        let rows = vec![row(2, 20), row(1, 10), row(3, 30), row(1, 11), row(3, 31)];
        let sets = demux_by_ordinal(rows, 4).unwrap();
        assert_eq!(sets.len(), 4);
        assert_eq!(
            sets[0].iter().map(|r| r.sla_filtered).collect::<Vec<_>>(),
            vec![10, 11]
        );
        assert_eq!(sets[1].len(), 1);
        assert_eq!(sets[2].len(), 2);
        // Input 4 matched nothing.
        assert!(sets[3].is_empty());
    }

    #[test]
    fn test_demux_empty_batch() {
        assert!(demux_by_ordinal(Vec::new(), 0).unwrap().is_empty());
    }

    #[test]
    fn test_demux_rejects_stray_ordinal() {
        assert!(demux_by_ordinal(vec![row(3, 0)], 2).is_err());
        assert!(demux_by_ordinal(vec![row(0, 0)], 2).is_err());
    }
}
