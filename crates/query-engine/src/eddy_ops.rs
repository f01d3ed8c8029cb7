//! Along-track retrieval around eddy trajectories.

use ocean_common::{OceanResult, TimeWindow};
use storage::{EddyObservation, ObservationStore};

use crate::engine::SpatiotemporalQueryEngine;
use crate::results::SlaGeographic;

impl<S: ObservationStore> SpatiotemporalQueryEngine<S> {
    /// Along-track observations around every step of an eddy trajectory:
    /// for each eddy observation, a radius/time-window search centered on
    /// the eddy center with radius equal to its maximum-speed contour
    /// radius. One result per trajectory step, in trajectory order, from a
    /// single store round trip.
    pub async fn along_track_near_trajectory(
        &self,
        trajectory: &[EddyObservation],
        window: TimeWindow,
        missions: Option<&[&str]>,
        should_basin_mask: bool,
    ) -> OceanResult<Vec<Option<SlaGeographic>>> {
        let latitudes: Vec<f64> = trajectory.iter().map(|e| e.latitude).collect();
        let longitudes: Vec<f64> = trajectory.iter().map(|e| e.longitude).collect();
        let dates: Vec<_> = trajectory.iter().map(|e| e.date_time).collect();
        let radii: Vec<f64> = trajectory.iter().map(|e| e.speed_radius).collect();

        self.points_in_radius_batch(
            &latitudes,
            &longitudes,
            &dates,
            &radii,
            window,
            missions,
            should_basin_mask,
        )
        .await
    }
}
