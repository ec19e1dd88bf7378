// Data-driven world configuration.
//
// Every tunable constant of the side-scroller lives in `WorldConfig`, grouped
// into nested parameter structs: `TerrainParams` (grid and height field),
// `FloraParams` (scattering densities and sizes), `LeafMotionParams` (sway
// and flutter tweens), `AvatarParams` (energy economy and speeds) and
// `FruitParams`. `Default` reproduces the stock game tuning; a JSON
// file can override any of it.
//
// `validate()` is the fail-fast gate: non-positive strides or sizes,
// probabilities outside [0, 1], inverted min/max pairs and energy costs above
// the energy cap are rejected before any geometry is produced. `World::new()`
// always validates.
//
// See also: `error.rs` for `ConfigError`, `world.rs` which owns the config,
// `flora.rs` and `terrain.rs` which read their parameter groups.

use crate::error::ConfigError;
use crate::types::Rgb;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// Parameter groups
// ---------------------------------------------------------------------------

/// Grid and height-field parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TerrainParams {
    /// Side length of a ground block in pixels. All block coordinates are
    /// multiples of this.
    pub cell_size: i32,
    /// Number of stacked blocks per terrain column.
    pub depth: u32,
    /// Ground baseline as a fraction of the window height (screen y grows
    /// downward, so 2/3 puts the ground in the lower third).
    pub baseline_fraction: f32,
    /// Peak vertical deviation of the noise around the baseline, in pixels.
    pub noise_amplitude: f32,
    /// Horizontal distance in pixels covered by one noise lattice cell.
    /// Larger values give gentler hills.
    pub noise_wavelength: f32,
}

/// Scattering parameters for trunks, leaves and fruit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FloraParams {
    /// Horizontal distance between candidate trunk slots.
    pub stride: i32,
    /// Probability that a slot gets a trunk.
    pub tree_probability: f32,
    /// Trunk heights are drawn from `[min_trunk_height, max_trunk_height)`.
    pub min_trunk_height: i32,
    pub max_trunk_height: i32,
    pub trunk_width: i32,
    /// Untinted trunk colour.
    pub trunk_color: Rgb,
    /// Width of the per-channel jitter used for the flashed trunk tint.
    pub trunk_tint_range: u8,
    /// Side of the square window, centred on a trunk top, that holds its
    /// leaves and fruit.
    pub canopy_window: i32,
    pub leaf_step: i32,
    pub leaf_size: i32,
    pub leaf_probability: f32,
    pub fruit_step: i32,
    pub fruit_size: i32,
    pub fruit_probability: f32,
    /// Inset applied to both ends of the populated range before placing trunks.
    pub edge_margin: i32,
    /// Leaf animation delays are drawn from `[min_delay, max_delay)` seconds.
    pub min_delay: f32,
    pub max_delay: f32,
}

/// Leaf sway (idle, looping) and flutter (jump reaction, one-shot) tweens.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeafMotionParams {
    /// Sway peak angle in degrees.
    pub sway_angle: f32,
    pub sway_angle_secs: f32,
    pub sway_width_secs: f32,
    /// Flutter end angle in degrees.
    pub flutter_angle: f32,
    pub flutter_secs: f32,
    /// Width offset swept by both sway and flutter, in pixels.
    pub width_from: f32,
    pub width_to: f32,
}

/// Energy economy and movement of the player avatar.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AvatarParams {
    pub max_energy: f32,
    /// Energy regained per frame while standing still.
    pub regen_per_frame: f32,
    /// Energy spent per frame per held direction.
    pub walk_cost: f32,
    pub jump_cost: f32,
    /// Horizontal speed in pixels per second.
    pub run_speed: f32,
    /// Initial upward speed of a jump in pixels per second.
    pub jump_speed: f32,
    /// Downward acceleration applied by the physics host.
    pub gravity: f32,
    /// Side of the avatar's square bounding box.
    pub size: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FruitParams {
    /// Energy granted by eating an available fruit.
    pub energy_bonus: f32,
    /// Seconds a consumed fruit stays hidden.
    pub respawn_secs: f32,
}

impl TerrainParams {
    /// Reject a grid or height field that cannot produce geometry.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("terrain.cell_size", self.cell_size)?;
        positive("terrain.depth", self.depth)?;
        positive("terrain.noise_wavelength", self.noise_wavelength)?;
        non_negative("terrain.noise_amplitude", self.noise_amplitude)
    }
}

impl FloraParams {
    /// Reject steps, sizes and ranges the placement passes cannot walk.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("flora.stride", self.stride)?;
        positive("flora.min_trunk_height", self.min_trunk_height)?;
        positive("flora.trunk_width", self.trunk_width)?;
        positive("flora.canopy_window", self.canopy_window)?;
        positive("flora.leaf_step", self.leaf_step)?;
        positive("flora.leaf_size", self.leaf_size)?;
        positive("flora.fruit_step", self.fruit_step)?;
        positive("flora.fruit_size", self.fruit_size)?;
        non_negative("flora.edge_margin", self.edge_margin)?;
        non_negative("flora.min_delay", self.min_delay)?;
        probability("flora.tree_probability", self.tree_probability)?;
        probability("flora.leaf_probability", self.leaf_probability)?;
        probability("flora.fruit_probability", self.fruit_probability)?;
        // Heights are drawn from a half-open range, so it must be non-empty.
        if self.min_trunk_height >= self.max_trunk_height {
            return Err(ConfigError::InvertedBounds {
                field: "flora.trunk_height",
                min: f64::from(self.min_trunk_height),
                max: f64::from(self.max_trunk_height),
            });
        }
        ordered("flora.delay", self.min_delay, self.max_delay)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level world configuration. Loaded once, never mutated at runtime.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Window dimensions (width, height) in pixels.
    pub window_size: (f32, f32),
    /// Target frame rate requested from the host.
    pub frame_rate: u32,
    /// Explicit seed for flora placement. `None` derives it from the world
    /// seed, so one number reproduces the whole scene.
    #[serde(default)]
    pub flora_seed: Option<u64>,
    pub terrain: TerrainParams,
    pub flora: FloraParams,
    pub leaf_motion: LeafMotionParams,
    pub avatar: AvatarParams,
    pub fruit: FruitParams,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            window_size: (800.0, 600.0),
            frame_rate: 25,
            flora_seed: None,
            terrain: TerrainParams {
                cell_size: 30,
                depth: 20,
                baseline_fraction: 2.0 / 3.0,
                noise_amplitude: 210.0,
                noise_wavelength: 210.0,
            },
            flora: FloraParams {
                stride: 150,
                tree_probability: 0.6,
                min_trunk_height: 100,
                max_trunk_height: 150,
                trunk_width: 15,
                trunk_color: Rgb::new(100, 50, 20),
                trunk_tint_range: 30,
                canopy_window: 60,
                leaf_step: 12,
                leaf_size: 15,
                leaf_probability: 0.5,
                fruit_step: 20,
                fruit_size: 10,
                fruit_probability: 0.5,
                edge_margin: 30,
                min_delay: 0.1,
                max_delay: 0.8,
            },
            leaf_motion: LeafMotionParams {
                sway_angle: 10.0,
                sway_angle_secs: 2.0,
                sway_width_secs: 2.5,
                flutter_angle: 90.0,
                flutter_secs: 1.0,
                width_from: -1.0,
                width_to: 1.0,
            },
            avatar: AvatarParams {
                max_energy: 100.0,
                regen_per_frame: 1.0,
                walk_cost: 0.5,
                jump_cost: 10.0,
                run_speed: 200.0,
                jump_speed: 200.0,
                gravity: 150.0,
                size: 50.0,
            },
            fruit: FruitParams {
                energy_bonus: 10.0,
                respawn_secs: 30.0,
            },
        }
    }
}

impl WorldConfig {
    /// Parse and validate a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&text)?;
        log::info!("loaded world config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Screen-space y of the flat ground line the noise oscillates around.
    pub fn ground_baseline(&self) -> f32 {
        self.window_size.1 * self.terrain.baseline_fraction
    }

    /// Reject configs that would produce degenerate geometry or break the
    /// energy bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("window_size.0", self.window_size.0)?;
        positive("window_size.1", self.window_size.1)?;
        positive("frame_rate", self.frame_rate)?;

        self.terrain.validate()?;
        self.flora.validate()?;

        let m = &self.leaf_motion;
        positive("leaf_motion.sway_angle_secs", m.sway_angle_secs)?;
        positive("leaf_motion.sway_width_secs", m.sway_width_secs)?;
        positive("leaf_motion.flutter_secs", m.flutter_secs)?;

        let a = &self.avatar;
        positive("avatar.max_energy", a.max_energy)?;
        positive("avatar.size", a.size)?;
        non_negative("avatar.regen_per_frame", a.regen_per_frame)?;
        non_negative("avatar.walk_cost", a.walk_cost)?;
        non_negative("avatar.jump_cost", a.jump_cost)?;
        non_negative("avatar.run_speed", a.run_speed)?;
        non_negative("avatar.jump_speed", a.jump_speed)?;
        non_negative("avatar.gravity", a.gravity)?;
        within_energy("avatar.walk_cost", a.walk_cost, a.max_energy)?;
        within_energy("avatar.jump_cost", a.jump_cost, a.max_energy)?;

        non_negative("fruit.energy_bonus", self.fruit.energy_bonus)?;
        positive("fruit.respawn_secs", self.fruit.respawn_secs)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

fn positive(field: &'static str, value: impl Into<f64>) -> Result<(), ConfigError> {
    let value = value.into();
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: impl Into<f64>) -> Result<(), ConfigError> {
    let value = value.into();
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn probability(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::NotProbability {
            field,
            value: f64::from(value),
        })
    }
}

fn ordered(field: &'static str, min: f32, max: f32) -> Result<(), ConfigError> {
    if min <= max {
        Ok(())
    } else {
        Err(ConfigError::InvertedBounds {
            field,
            min: f64::from(min),
            max: f64::from(max),
        })
    }
}

fn within_energy(field: &'static str, value: f32, max_energy: f32) -> Result<(), ConfigError> {
    if value <= max_energy {
        Ok(())
    } else {
        Err(ConfigError::ExceedsMaxEnergy {
            field,
            value: f64::from(value),
            max_energy: f64::from(max_energy),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        WorldConfig::default().validate().unwrap();
    }

    #[test]
    fn default_config_roundtrips_through_json() {
        let config = WorldConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let restored = WorldConfig::from_json(&json).unwrap();
        assert_eq!(config, restored);
    }

    #[test]
    fn flora_seed_may_be_omitted() {
        let mut value = serde_json::to_value(WorldConfig::default()).unwrap();
        value.as_object_mut().unwrap().remove("flora_seed");
        let config = WorldConfig::from_json(&value.to_string()).unwrap();
        assert_eq!(config.flora_seed, None);
    }

    #[test]
    fn baseline_is_two_thirds_of_window_height() {
        let config = WorldConfig::default();
        assert!((config.ground_baseline() - 400.0).abs() < 1e-3);
    }

    #[test]
    fn rejects_zero_cell_size() {
        let mut config = WorldConfig::default();
        config.terrain.cell_size = 0;
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NotPositive {
                field: "terrain.cell_size",
                ..
            }
        ));
    }

    #[test]
    fn rejects_negative_stride() {
        let mut config = WorldConfig::default();
        config.flora.stride = -150;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive {
                field: "flora.stride",
                ..
            })
        ));
    }

    #[test]
    fn rejects_bad_probability() {
        let mut config = WorldConfig::default();
        config.flora.leaf_probability = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotProbability { .. })
        ));
    }

    #[test]
    fn rejects_empty_trunk_height_range() {
        let mut config = WorldConfig::default();
        config.flora.min_trunk_height = 150;
        config.flora.max_trunk_height = 150;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedBounds {
                field: "flora.trunk_height",
                ..
            })
        ));
    }

    #[test]
    fn rejects_inverted_delays() {
        let mut config = WorldConfig::default();
        config.flora.min_delay = 0.9;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedBounds {
                field: "flora.delay",
                ..
            })
        ));
    }

    #[test]
    fn parameter_groups_validate_on_their_own() {
        let config = WorldConfig::default();
        config.terrain.validate().unwrap();
        config.flora.validate().unwrap();

        let mut terrain = config.terrain.clone();
        terrain.noise_wavelength = 0.0;
        assert!(matches!(
            terrain.validate(),
            Err(ConfigError::NotPositive {
                field: "terrain.noise_wavelength",
                ..
            })
        ));

        let mut flora = config.flora;
        flora.fruit_step = 0;
        assert!(matches!(
            flora.validate(),
            Err(ConfigError::NotPositive {
                field: "flora.fruit_step",
                ..
            })
        ));
    }

    #[test]
    fn rejects_jump_cost_above_cap() {
        let mut config = WorldConfig::default();
        config.avatar.jump_cost = 150.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ExceedsMaxEnergy { .. })
        ));
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        assert!(matches!(
            WorldConfig::from_json("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            WorldConfig::load("/definitely/not/here.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
