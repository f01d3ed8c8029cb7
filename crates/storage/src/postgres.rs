//! PostgreSQL/PostGIS implementation of the observation store.
//!
//! Each batched operation is a single SQL statement: the input batch is
//! bound as one JSONB array, expanded server-side with
//! `jsonb_to_recordset ... WITH ORDINALITY`, and joined `LATERAL` against
//! the `along_track` table. Result rows come back tagged with the input
//! ordinal and are threaded into per-input result sets by
//! [`demux_by_ordinal`].
//!
//! `date_time` is `timestamp without time zone`; all stored instants are
//! UTC.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;

use ocean_common::{OceanError, OceanResult};

use crate::rows::SlaRow;
use crate::store::{
    demux_by_ordinal, EnvelopeWindowQuery, NearestNeighborQuery, ObservationStore,
    RadiusWindowQuery, SlaResultSet,
};

/// How many nearest observations the neighbor mode returns per input.
pub const NEAREST_NEIGHBOR_K: usize = 3;

const NEAREST_NEIGHBOR_SQL: &str = r#"
SELECT q.ord AS ordinal,
       a.latitude,
       a.longitude,
       a.sla_filtered,
       a.distance_m,
       a.delta_t_secs
FROM ROWS FROM (jsonb_to_recordset($1::jsonb)
         AS (latitude float8,
             longitude float8,
             central_date_time timestamp,
             time_delta_secs float8,
             connected_basin_ids int4[],
             missions text[]))
     WITH ORDINALITY
       AS q(latitude, longitude, central_date_time, time_delta_secs,
            connected_basin_ids, missions, ord)
JOIN LATERAL (
    SELECT at.latitude,
           at.longitude,
           at.sla_filtered,
           ST_Distance(at.cat_point::geography,
                       ST_SetSRID(ST_MakePoint(q.longitude, q.latitude), 4326)::geography
                      ) AS distance_m,
           EXTRACT(EPOCH FROM (at.date_time - q.central_date_time))::float8 AS delta_t_secs
    FROM along_track AS at
    WHERE at.date_time BETWEEN q.central_date_time - make_interval(secs => q.time_delta_secs)
                           AND q.central_date_time + make_interval(secs => q.time_delta_secs)
      AND at.basin_id = ANY(q.connected_basin_ids)
      AND at.mission = ANY(q.missions)
    ORDER BY at.cat_point::geography
             <-> ST_SetSRID(ST_MakePoint(q.longitude, q.latitude), 4326)::geography
    LIMIT 3
) AS a ON true
ORDER BY q.ord, a.distance_m
"#;

const RADIUS_WINDOW_SQL: &str = r#"
SELECT q.ord AS ordinal,
       a.latitude,
       a.longitude,
       a.sla_filtered,
       a.distance_m,
       a.delta_t_secs
FROM ROWS FROM (jsonb_to_recordset($1::jsonb)
         AS (latitude float8,
             longitude float8,
             central_date_time timestamp,
             time_delta_secs float8,
             distance float8,
             connected_basin_ids int4[],
             missions text[]))
     WITH ORDINALITY
       AS q(latitude, longitude, central_date_time, time_delta_secs,
            distance, connected_basin_ids, missions, ord)
JOIN LATERAL (
    SELECT at.latitude,
           at.longitude,
           at.sla_filtered,
           ST_Distance(at.cat_point::geography,
                       ST_SetSRID(ST_MakePoint(q.longitude, q.latitude), 4326)::geography
                      ) AS distance_m,
           EXTRACT(EPOCH FROM (at.date_time - q.central_date_time))::float8 AS delta_t_secs
    FROM along_track AS at
    WHERE ST_DWithin(at.cat_point::geography,
                     ST_SetSRID(ST_MakePoint(q.longitude, q.latitude), 4326)::geography,
                     q.distance)
      AND at.date_time BETWEEN q.central_date_time - make_interval(secs => q.time_delta_secs)
                           AND q.central_date_time + make_interval(secs => q.time_delta_secs)
      AND (q.connected_basin_ids IS NULL OR at.basin_id = ANY(q.connected_basin_ids))
      AND at.mission = ANY(q.missions)
) AS a ON true
ORDER BY q.ord, a.distance_m
"#;

const ENVELOPE_WINDOW_SQL: &str = r#"
SELECT q.ord AS ordinal,
       a.latitude,
       a.longitude,
       a.sla_filtered,
       a.distance_m,
       a.delta_t_secs
FROM ROWS FROM (jsonb_to_recordset($1::jsonb)
         AS (central_date_time timestamp,
             time_delta_secs float8,
             min_lat float8,
             min_lon float8,
             max_lat float8,
             max_lon float8,
             connected_basin_ids int4[]))
     WITH ORDINALITY
       AS q(central_date_time, time_delta_secs, min_lat, min_lon, max_lat,
            max_lon, connected_basin_ids, ord)
JOIN LATERAL (
    SELECT at.latitude,
           at.longitude,
           at.sla_filtered,
           NULL::float8 AS distance_m,
           EXTRACT(EPOCH FROM (at.date_time - q.central_date_time))::float8 AS delta_t_secs
    FROM along_track AS at
    WHERE at.latitude BETWEEN q.min_lat AND q.max_lat
      AND at.longitude BETWEEN q.min_lon AND q.max_lon
      AND at.date_time BETWEEN q.central_date_time - make_interval(secs => q.time_delta_secs)
                           AND q.central_date_time + make_interval(secs => q.time_delta_secs)
      AND (q.connected_basin_ids IS NULL OR at.basin_id = ANY(q.connected_basin_ids))
) AS a ON true
ORDER BY q.ord, a.delta_t_secs
"#;

/// Observation store backed by PostgreSQL/PostGIS.
#[derive(Debug, Clone)]
pub struct PgObservationStore {
    pool: PgPool,
}

impl PgObservationStore {
    /// Wrap an injected connection pool. The store never owns connection
    /// lifecycle; callers control pooling and retries.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_batch(
        &self,
        sql: &str,
        payload: serde_json::Value,
        deadline: Option<Duration>,
    ) -> OceanResult<Vec<SlaRow>> {
        let fut = sqlx::query_as::<_, SlaRow>(sql)
            .bind(payload)
            .fetch_all(&self.pool);

        let result = match deadline {
            Some(limit) => tokio::time::timeout(limit, fut)
                .await
                .map_err(|_| OceanError::Timeout)?,
            None => fut.await,
        };

        result.map_err(|e| OceanError::StoreUnavailable(format!("query failed: {}", e)))
    }
}

#[async_trait]
impl ObservationStore for PgObservationStore {
    async fn nearest_neighbors(
        &self,
        queries: &[NearestNeighborQuery],
        deadline: Option<Duration>,
    ) -> OceanResult<Vec<SlaResultSet>> {
        if queries.is_empty() {
            return Ok(Vec::new());
        }
        tracing::debug!(batch = queries.len(), "nearest-neighbor batch");

        let payload = serde_json::Value::Array(
            queries
                .iter()
                .map(|q| {
                    json!({
                        "latitude": q.latitude,
                        "longitude": q.longitude,
                        "central_date_time": q.central_date_time.naive_utc(),
                        "time_delta_secs": q.time_delta.num_seconds() as f64,
                        "connected_basin_ids": q.connected_basin_ids,
                        "missions": q.missions,
                    })
                })
                .collect(),
        );

        let rows = self
            .fetch_batch(NEAREST_NEIGHBOR_SQL, payload, deadline)
            .await?;
        demux_by_ordinal(rows, queries.len())
    }

    async fn radius_windows(
        &self,
        queries: &[RadiusWindowQuery],
        deadline: Option<Duration>,
    ) -> OceanResult<Vec<SlaResultSet>> {
        if queries.is_empty() {
            return Ok(Vec::new());
        }
        tracing::debug!(batch = queries.len(), "radius-window batch");

        let payload = serde_json::Value::Array(
            queries
                .iter()
                .map(|q| {
                    json!({
                        "latitude": q.latitude,
                        "longitude": q.longitude,
                        "central_date_time": q.central_date_time.naive_utc(),
                        "time_delta_secs": q.time_delta.num_seconds() as f64,
                        "distance": q.distance,
                        "connected_basin_ids": q.connected_basin_ids,
                        "missions": q.missions,
                    })
                })
                .collect(),
        );

        let rows = self
            .fetch_batch(RADIUS_WINDOW_SQL, payload, deadline)
            .await?;
        demux_by_ordinal(rows, queries.len())
    }

    async fn envelope_windows(
        &self,
        queries: &[EnvelopeWindowQuery],
        deadline: Option<Duration>,
    ) -> OceanResult<Vec<SlaResultSet>> {
        if queries.is_empty() {
            return Ok(Vec::new());
        }
        tracing::debug!(batch = queries.len(), "envelope-window batch");

        let payload = serde_json::Value::Array(
            queries
                .iter()
                .map(|q| {
                    json!({
                        "central_date_time": q.central_date_time.naive_utc(),
                        "time_delta_secs": q.time_delta.num_seconds() as f64,
                        "min_lat": q.min_lat,
                        "min_lon": q.min_lon,
                        "max_lat": q.max_lat,
                        "max_lon": q.max_lon,
                        "connected_basin_ids": q.connected_basin_ids,
                    })
                })
                .collect(),
        );

        let rows = self
            .fetch_batch(ENVELOPE_WINDOW_SQL, payload, deadline)
            .await?;
        demux_by_ordinal(rows, queries.len())
    }
}
