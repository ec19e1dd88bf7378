// Terrain height field.
//
// `height_at(x)` is the screen-space y of the ground surface at horizontal
// position x: a fixed baseline plus amplitude-scaled Perlin noise sampled
// along a single row of the noise plane. Perlin noise is continuous, so
// adjacent block columns never see a jump in ground level beyond what the
// slope allows.
//
// The field holds no mutable state and is `Send + Sync`; the terrain builder
// samples it from rayon workers, and any caller needing ground alignment
// (camera clamping, the headless physics stand-in) may query it directly.
//
// **Critical constraint: determinism.** The noise permutation table is
// derived from the seed alone, so the same seed yields the same heights in
// every process.

use crate::config::WorldConfig;
use crate::error::ConfigError;
use noise::{NoiseFn, Perlin};

/// Deterministic ground-height function.
#[derive(Clone, Debug)]
pub struct HeightField {
    noise: Perlin,
    seed: u32,
    baseline: f32,
    amplitude: f32,
    wavelength: f32,
}

impl HeightField {
    /// Fails with `NotPositive` unless `wavelength` is a positive number.
    pub fn new(
        seed: u32,
        baseline: f32,
        amplitude: f32,
        wavelength: f32,
    ) -> Result<Self, ConfigError> {
        if wavelength > 0.0 {
            Ok(Self {
                noise: Perlin::new(seed),
                seed,
                baseline,
                amplitude,
                wavelength,
            })
        } else {
            Err(ConfigError::NotPositive {
                field: "terrain.noise_wavelength",
                value: f64::from(wavelength),
            })
        }
    }

    /// Build from a config: baseline from the window height, amplitude and
    /// wavelength from the terrain parameters.
    pub fn from_config(seed: u32, config: &WorldConfig) -> Result<Self, ConfigError> {
        Self::new(
            seed,
            config.ground_baseline(),
            config.terrain.noise_amplitude,
            config.terrain.noise_wavelength,
        )
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn baseline(&self) -> f32 {
        self.baseline
    }

    pub fn height_at(&self, x: f32) -> f32 {
        let nx = f64::from(x) / f64::from(self.wavelength);
        let n = self.noise.get([nx, 0.0]);
        self.baseline + (n * f64::from(self.amplitude)) as f32
    }
}
