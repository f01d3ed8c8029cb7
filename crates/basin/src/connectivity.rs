//! Basin connectivity graph.

use std::collections::HashMap;

use sqlx::PgPool;

use ocean_common::{OceanError, OceanResult};

/// Adjacency from basin id to the basin ids treated as hydrologically
/// joined for search purposes.
///
/// Two contracts callers can rely on:
///
/// - the basin's own id is always present, and always first;
/// - a basin with no entry in the connectivity table is connected only to
///   itself. Absence is never an error and never an empty set.
#[derive(Debug, Clone, Default)]
pub struct BasinConnectivityGraph {
    connections: HashMap<i32, Vec<i32>>,
}

impl BasinConnectivityGraph {
    /// Build the graph from (basin_id, connected_id) edges.
    ///
    /// Edge order is preserved per basin; duplicate and self edges in the
    /// input are dropped, since self-membership is supplied by the graph.
    pub fn from_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (i32, i32)>,
    {
        let mut connections: HashMap<i32, Vec<i32>> = HashMap::new();
        for (basin_id, connected_id) in edges {
            let entry = connections
                .entry(basin_id)
                .or_insert_with(|| vec![basin_id]);
            if !entry.contains(&connected_id) {
                entry.push(connected_id);
            }
        }
        Self { connections }
    }

    /// Load the graph from the `basin_connection` table.
    ///
    /// One statement; aggregation happens here rather than per-basin in
    /// the database.
    pub async fn load(pool: &PgPool) -> OceanResult<Self> {
        let edges: Vec<(i32, i32)> = sqlx::query_as(
            "SELECT basin_id, connected_id FROM basin_connection \
             ORDER BY basin_id, connected_id",
        )
        .fetch_all(pool)
        .await
        .map_err(|e| OceanError::GraphLoad(format!("query failed: {}", e)))?;

        let graph = Self::from_edges(edges);
        tracing::info!(basins = graph.len(), "basin connectivity loaded");
        Ok(graph)
    }

    /// The basin ids searched for a query point in `basin_id`: itself
    /// first, then its connected basins.
    pub fn connected_basins(&self, basin_id: i32) -> Vec<i32> {
        match self.connections.get(&basin_id) {
            Some(ids) => ids.clone(),
            None => vec![basin_id],
        }
    }

    /// Batched form of [`connected_basins`], one set per input id in
    /// input order.
    ///
    /// [`connected_basins`]: Self::connected_basins
    pub fn connected_basins_batch(&self, basin_ids: &[i32]) -> Vec<Vec<i32>> {
        basin_ids
            .iter()
            .map(|&id| self.connected_basins(id))
            .collect()
    }

    /// Number of basins with explicit connectivity entries.
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}
