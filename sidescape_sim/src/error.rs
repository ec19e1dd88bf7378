// Error types for configuration and world building.
//
// Nothing in the per-frame path can fail: energy arithmetic clamps, and a
// signal or timer aimed at an entity that no longer exists is a no-op. Errors
// only surface at build time, when a config is loaded or validated, or when a
// caller asks a builder for a malformed x-range.
//
// See also: `config.rs` for `WorldConfig::validate()`, `terrain.rs` and
// `flora.rs` for the range checks.

use thiserror::Error;

/// A rejected `WorldConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("`{field}` must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("`{field}` must be a probability in [0, 1], got {value}")]
    NotProbability { field: &'static str, value: f64 },

    #[error("`{field}` range is inverted: min {min} > max {max}")]
    InvertedBounds {
        field: &'static str,
        min: f64,
        max: f64,
    },

    #[error("`{field}` ({value}) must not exceed max_energy ({max_energy})")]
    ExceedsMaxEnergy {
        field: &'static str,
        value: f64,
        max_energy: f64,
    },
}

/// A rejected builder request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("inverted x-range: min_x {min_x} > max_x {max_x}")]
    InvertedRange { min_x: i32, max_x: i32 },

    #[error("x-range [{min_x}, {max_x}] snaps outside the i32 grid")]
    RangeOutOfBounds { min_x: i32, max_x: i32 },
}

/// Fail with `InvertedRange` unless `min_x <= max_x`.
pub(crate) fn check_range(min_x: i32, max_x: i32) -> Result<(), GenerationError> {
    if min_x > max_x {
        return Err(GenerationError::InvertedRange { min_x, max_x });
    }
    Ok(())
}
