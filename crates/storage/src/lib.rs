//! Observation store access for along-track and eddy data.
//!
//! The query engine talks to the store only through the batched
//! [`ObservationStore`] and [`EddyStore`] traits; [`PgObservationStore`]
//! and [`PgEddyStore`] implement them over PostgreSQL/PostGIS via sqlx.

pub mod config;
pub mod eddy;
pub mod postgres;
pub mod rows;
pub mod store;
pub mod variables;

pub use config::DatabaseConfig;
pub use eddy::PgEddyStore;
pub use postgres::PgObservationStore;
pub use rows::{AlongTrackObservation, EddyObservation, SlaRow};
pub use store::{
    demux_by_ordinal, EddyStore, EnvelopeWindowQuery, NearestNeighborQuery, ObservationStore,
    RadiusWindowQuery, SlaResultSet,
};
pub use variables::{along_track_variable_metadata, ScaleRegistry, VariableMetadata};
