//! The basin-aware query orchestrator.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use basin::{BasinConnectivityGraph, BasinMask, LAND_BASIN_ID};
use ocean_common::{OceanError, OceanResult, TimeWindow, DEFAULT_MISSIONS};
use projection::TangentBounds;
use storage::{
    EnvelopeWindowQuery, NearestNeighborQuery, ObservationStore, RadiusWindowQuery, ScaleRegistry,
};

use crate::results::{SlaGeographic, SlaProjected};

/// Spatiotemporal query engine over an observation store.
///
/// Holds the session's read-only basin caches and an injected store; all
/// state is immutable after construction, so one engine can serve
/// concurrent callers. Each query mode places exactly one batched store
/// round trip and preserves input order: `result[i]` answers `input[i]`.
pub struct SpatiotemporalQueryEngine<S> {
    mask: Arc<BasinMask>,
    graph: Arc<BasinConnectivityGraph>,
    store: S,
    registry: ScaleRegistry,
    deadline: Option<Duration>,
}

impl<S: ObservationStore> SpatiotemporalQueryEngine<S> {
    pub fn new(mask: Arc<BasinMask>, graph: Arc<BasinConnectivityGraph>, store: S) -> Self {
        Self {
            mask,
            graph,
            store,
            registry: ScaleRegistry::along_track(),
            deadline: None,
        }
    }

    /// Set a deadline on every batched store round trip. Expiry surfaces
    /// as [`OceanError::Timeout`].
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    // ===== Mode 1: nearest neighbors in time =====

    /// The geographically nearest observations to a point, within the
    /// time window and mission filter, restricted to the point's basin
    /// and its connected basins. `None` when nothing matches.
    pub async fn nearest_neighbors(
        &self,
        latitude: f64,
        longitude: f64,
        central_date_time: DateTime<Utc>,
        window: TimeWindow,
        missions: Option<&[&str]>,
    ) -> OceanResult<Option<SlaGeographic>> {
        let mut results = self
            .nearest_neighbors_batch(
                &[latitude],
                &[longitude],
                &[central_date_time],
                window,
                missions,
            )
            .await?;
        Ok(results.pop().flatten())
    }

    /// Batched form of [`nearest_neighbors`]: one result per input point,
    /// in input order, from a single store round trip.
    ///
    /// [`nearest_neighbors`]: Self::nearest_neighbors
    pub async fn nearest_neighbors_batch(
        &self,
        latitudes: &[f64],
        longitudes: &[f64],
        central_date_times: &[DateTime<Utc>],
        window: TimeWindow,
        missions: Option<&[&str]>,
    ) -> OceanResult<Vec<Option<SlaGeographic>>> {
        check_lengths(&[latitudes.len(), longitudes.len(), central_date_times.len()])?;
        if latitudes.is_empty() {
            return Ok(Vec::new());
        }

        let basin_ids = self.mask.basin_ids_at(latitudes, longitudes)?;
        let connected = self.graph.connected_basins_batch(&basin_ids);
        let missions = missions_vec(missions);

        let queries: Vec<NearestNeighborQuery> = (0..latitudes.len())
            .map(|i| NearestNeighborQuery {
                latitude: latitudes[i],
                longitude: longitudes[i],
                central_date_time: central_date_times[i],
                time_delta: window.half(),
                connected_basin_ids: connected[i].clone(),
                missions: missions.clone(),
            })
            .collect();

        let sets = self.store.nearest_neighbors(&queries, self.deadline).await?;
        self.check_result_count(sets.len(), queries.len())?;

        let scale = self.registry.scale_for("sla_filtered")?;
        Ok(sets
            .iter()
            .map(|rows| (!rows.is_empty()).then(|| SlaGeographic::from_rows(rows, scale)))
            .collect())
    }

    // ===== Mode 2: radius / time window =====

    /// All observations within a geodesic radius and time window of a
    /// point. With `should_basin_mask` the search is restricted to the
    /// point's connected basin set, and a query point on land answers
    /// `None` without touching the store; without it, the search crosses
    /// basin boundaries freely.
    #[allow(clippy::too_many_arguments)]
    pub async fn points_in_radius(
        &self,
        latitude: f64,
        longitude: f64,
        central_date_time: DateTime<Utc>,
        distance: f64,
        window: TimeWindow,
        missions: Option<&[&str]>,
        should_basin_mask: bool,
    ) -> OceanResult<Option<SlaGeographic>> {
        let mut results = self
            .points_in_radius_batch(
                &[latitude],
                &[longitude],
                &[central_date_time],
                &[distance],
                window,
                missions,
                should_basin_mask,
            )
            .await?;
        Ok(results.pop().flatten())
    }

    /// Batched form of [`points_in_radius`] with a per-point radius; one
    /// result per input point, in input order, from a single store round
    /// trip.
    ///
    /// [`points_in_radius`]: Self::points_in_radius
    #[allow(clippy::too_many_arguments)]
    pub async fn points_in_radius_batch(
        &self,
        latitudes: &[f64],
        longitudes: &[f64],
        central_date_times: &[DateTime<Utc>],
        distances: &[f64],
        window: TimeWindow,
        missions: Option<&[&str]>,
        should_basin_mask: bool,
    ) -> OceanResult<Vec<Option<SlaGeographic>>> {
        check_lengths(&[
            latitudes.len(),
            longitudes.len(),
            central_date_times.len(),
            distances.len(),
        ])?;
        let n = latitudes.len();
        if n == 0 {
            return Ok(Vec::new());
        }
        for &distance in distances {
            if !distance.is_finite() || distance <= 0.0 {
                return Err(OceanError::InvalidWindow(format!(
                    "search radius must be positive, got {} m",
                    distance
                )));
            }
        }

        let basin_ids = self.mask.basin_ids_at(latitudes, longitudes)?;
        let missions = missions_vec(missions);

        // Land points answer empty under masking and are excluded from
        // the store batch; their slots stay None.
        let mut live_indices = Vec::with_capacity(n);
        let mut queries = Vec::with_capacity(n);
        for i in 0..n {
            if should_basin_mask && basin_ids[i] == LAND_BASIN_ID {
                tracing::debug!(
                    latitude = latitudes[i],
                    longitude = longitudes[i],
                    "query point on land, skipping"
                );
                continue;
            }
            queries.push(RadiusWindowQuery {
                latitude: latitudes[i],
                longitude: longitudes[i],
                central_date_time: central_date_times[i],
                time_delta: window.half(),
                distance: distances[i],
                connected_basin_ids: should_basin_mask
                    .then(|| self.graph.connected_basins(basin_ids[i])),
                missions: missions.clone(),
            });
            live_indices.push(i);
        }

        let mut results: Vec<Option<SlaGeographic>> = (0..n).map(|_| None).collect();
        if queries.is_empty() {
            return Ok(results);
        }

        let sets = self.store.radius_windows(&queries, self.deadline).await?;
        self.check_result_count(sets.len(), queries.len())?;

        let scale = self.registry.scale_for("sla_filtered")?;
        for (rows, &i) in sets.iter().zip(live_indices.iter()) {
            if !rows.is_empty() {
                results[i] = Some(SlaGeographic::from_rows(rows, scale));
            }
        }
        Ok(results)
    }

    // ===== Mode 3: projected box / time window =====

    /// All observations inside a tangent-plane box of half-widths
    /// `(lx, ly)` meters about a point, within the time window.
    ///
    /// Two-stage filter: the store answers a conservative geographic
    /// envelope of the box, then candidates are projected about the query
    /// longitude and kept only when their offsets fit the box exactly.
    /// Returned offsets are relative to the query point's projection.
    #[allow(clippy::too_many_arguments)]
    pub async fn points_in_projected_box(
        &self,
        latitude: f64,
        longitude: f64,
        central_date_time: DateTime<Utc>,
        lx: f64,
        ly: f64,
        window: TimeWindow,
        should_basin_mask: bool,
    ) -> OceanResult<Option<SlaProjected>> {
        let mut results = self
            .points_in_projected_box_batch(
                &[latitude],
                &[longitude],
                &[central_date_time],
                lx,
                ly,
                window,
                should_basin_mask,
            )
            .await?;
        Ok(results.pop().flatten())
    }

    /// Batched form of [`points_in_projected_box`]; one result per input
    /// point, in input order, from a single store round trip.
    ///
    /// [`points_in_projected_box`]: Self::points_in_projected_box
    #[allow(clippy::too_many_arguments)]
    pub async fn points_in_projected_box_batch(
        &self,
        latitudes: &[f64],
        longitudes: &[f64],
        central_date_times: &[DateTime<Utc>],
        lx: f64,
        ly: f64,
        window: TimeWindow,
        should_basin_mask: bool,
    ) -> OceanResult<Vec<Option<SlaProjected>>> {
        check_lengths(&[latitudes.len(), longitudes.len(), central_date_times.len()])?;
        let n = latitudes.len();
        if n == 0 {
            return Ok(Vec::new());
        }

        let basin_ids = self.mask.basin_ids_at(latitudes, longitudes)?;

        let mut bounds: Vec<TangentBounds> = Vec::with_capacity(n);
        let mut queries = Vec::with_capacity(n);
        for i in 0..n {
            let b = projection::bounding_box(latitudes[i], longitudes[i], lx, ly)?;
            queries.push(EnvelopeWindowQuery {
                latitude: latitudes[i],
                longitude: longitudes[i],
                central_date_time: central_date_times[i],
                time_delta: window.half(),
                min_lat: b.min_lat,
                min_lon: b.min_lon,
                max_lat: b.max_lat,
                max_lon: b.max_lon,
                connected_basin_ids: should_basin_mask
                    .then(|| self.graph.connected_basins(basin_ids[i])),
            });
            bounds.push(b);
        }

        let sets = self.store.envelope_windows(&queries, self.deadline).await?;
        self.check_result_count(sets.len(), queries.len())?;

        let scale = self.registry.scale_for("sla_filtered")?;
        Ok((0..n)
            .map(|i| {
                if sets[i].is_empty() {
                    return None;
                }
                let geographic = SlaGeographic::from_rows(&sets[i], scale);
                let projected = SlaProjected::from_geographic_in_box(
                    &geographic,
                    longitudes[i],
                    bounds[i].x0,
                    bounds[i].y0,
                    lx,
                    ly,
                );
                (!projected.is_empty()).then_some(projected)
            })
            .collect())
    }

    fn check_result_count(&self, got: usize, expected: usize) -> OceanResult<()> {
        if got != expected {
            return Err(OceanError::StoreUnavailable(format!(
                "store answered {} result sets for {} inputs",
                got, expected
            )));
        }
        Ok(())
    }
}

fn check_lengths(lengths: &[usize]) -> OceanResult<()> {
    if lengths.windows(2).any(|pair| pair[0] != pair[1]) {
        return Err(OceanError::InvalidBatch(format!(
            "input arrays have differing lengths: {:?}",
            lengths
        )));
    }
    Ok(())
}

fn missions_vec(missions: Option<&[&str]>) -> Vec<String> {
    missions
        .unwrap_or(DEFAULT_MISSIONS)
        .iter()
        .map(|m| m.to_string())
        .collect()
}
