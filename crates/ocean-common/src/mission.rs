//! Altimetry mission codes.
//!
//! Short codes as they appear in the along-track product filenames and the
//! `mission` column of the observation store.

/// Every mission code present in the along-track archive. Queries that do
/// not name a mission filter search all of these.
pub const DEFAULT_MISSIONS: &[&str] = &[
    "al", "alg", "c2", "c2n", "e1g", "e1", "e2", "en", "enn", "g2", "h2a", "h2b", "j1g", "j1",
    "j1n", "j2g", "j2", "j2n", "j3", "j3n", "s3a", "s3b", "s6a", "tp", "tpn",
];

/// Whether a code names a known altimetry mission.
pub fn is_known_mission(code: &str) -> bool {
    DEFAULT_MISSIONS.contains(&code)
}
