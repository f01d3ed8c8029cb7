//! Fixed-point variable metadata and decoding.
//!
//! Physical quantities are stored as scaled integers (e.g. sea level
//! anomaly in millimeters as `int16`). Every decode goes through the
//! registry built here; raw codes never reach callers of the query engine.

use std::collections::HashMap;

use ocean_common::{OceanError, OceanResult};

/// Per-variable metadata as carried by the along-track product.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariableMetadata {
    pub var_name: &'static str,
    pub long_name: &'static str,
    pub units: &'static str,
    /// Multiplier from stored code to physical units; `None` for variables
    /// stored directly.
    pub scale_factor: Option<f64>,
    pub add_offset: Option<f64>,
}

/// Metadata for every variable of the along-track product.
pub fn along_track_variable_metadata() -> &'static [VariableMetadata] {
    &[
        VariableMetadata {
            var_name: "sla_unfiltered",
            long_name: "Sea level anomaly not-filtered not-subsampled with dac, ocean_tide and lwe correction applied",
            units: "m",
            scale_factor: Some(0.001),
            add_offset: None,
        },
        VariableMetadata {
            var_name: "sla_filtered",
            long_name: "Sea level anomaly filtered not-subsampled with dac, ocean_tide and lwe correction applied",
            units: "m",
            scale_factor: Some(0.001),
            add_offset: Some(0.0),
        },
        VariableMetadata {
            var_name: "dac",
            long_name: "Dynamic Atmospheric Correction",
            units: "m",
            scale_factor: Some(0.001),
            add_offset: None,
        },
        VariableMetadata {
            var_name: "time",
            long_name: "Time of measurement",
            units: "days since 1950-01-01 00:00:00",
            scale_factor: None,
            add_offset: None,
        },
        VariableMetadata {
            var_name: "track",
            long_name: "Track in cycle the measurement belongs to",
            units: "1",
            scale_factor: None,
            add_offset: None,
        },
        VariableMetadata {
            var_name: "cycle",
            long_name: "Cycle the measurement belongs to",
            units: "1",
            scale_factor: None,
            add_offset: None,
        },
        VariableMetadata {
            var_name: "ocean_tide",
            long_name: "Ocean tide model",
            units: "m",
            scale_factor: Some(0.001),
            add_offset: None,
        },
        VariableMetadata {
            var_name: "internal_tide",
            long_name: "Internal tide correction",
            units: "m",
            scale_factor: Some(0.001),
            add_offset: None,
        },
        VariableMetadata {
            var_name: "lwe",
            long_name: "Long wavelength error",
            units: "m",
            scale_factor: Some(0.001),
            add_offset: None,
        },
        VariableMetadata {
            var_name: "mdt",
            long_name: "Mean dynamic topography",
            units: "m",
            scale_factor: Some(0.001),
            add_offset: None,
        },
    ]
}

/// Immutable decode table from variable name to (scale, offset).
///
/// Constructed once and owned by its user; variables without a scale
/// factor are absent and decode as an error rather than silently passing
/// raw codes through.
#[derive(Debug, Clone)]
pub struct ScaleRegistry {
    scales: HashMap<&'static str, (f64, f64)>,
}

impl ScaleRegistry {
    /// Registry for the along-track product variables.
    pub fn along_track() -> Self {
        let scales = along_track_variable_metadata()
            .iter()
            .filter_map(|m| {
                m.scale_factor
                    .map(|scale| (m.var_name, (scale, m.add_offset.unwrap_or(0.0))))
            })
            .collect();
        Self { scales }
    }

    /// The scale factor registered for a variable.
    pub fn scale_for(&self, var_name: &str) -> OceanResult<f64> {
        self.scales
            .get(var_name)
            .map(|&(scale, _)| scale)
            .ok_or_else(|| OceanError::UnknownVariable(var_name.to_string()))
    }

    /// Decode a stored code into physical units.
    pub fn decode(&self, var_name: &str, raw: f64) -> OceanResult<f64> {
        let (scale, offset) = self
            .scales
            .get(var_name)
            .ok_or_else(|| OceanError::UnknownVariable(var_name.to_string()))?;
        Ok(raw * scale + offset)
    }
}
