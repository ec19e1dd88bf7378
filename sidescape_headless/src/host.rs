// Headless frame loop, scripted input and physics stand-in.
//
// Each frame:
//
// 1. `World::step()` with the scripted input for that frame. The avatar
//    decides its horizontal velocity and may launch a jump.
// 2. Physics: gravity accelerates the body, the body moves, and it is clamped
//    to the window horizontally and to the terrain surface vertically. Landing
//    zeroes the vertical velocity, which is what lets the avatar jump and
//    regenerate again.
// 3. Fruit contact: every available fruit whose box overlaps the avatar's box
//    is reported through `World::touch_fruit()`.
//
// The script walks in one direction for `WALK_FRAMES` frames, then turns
// around, and presses jump every `JUMP_EVERY` frames.

use log::{debug, info};
use serde::Serialize;
use sidescape_sim::avatar::ActionInput;
use sidescape_sim::config::WorldConfig;
use sidescape_sim::error::{ConfigError, GenerationError};
use sidescape_sim::types::FloraId;
use sidescape_sim::world::World;
use std::path::PathBuf;
use thiserror::Error;

const WALK_FRAMES: u32 = 100;
const JUMP_EVERY: u32 = 40;

#[derive(Debug, Error)]
pub enum HostError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Command-line overrides applied on top of the (default or loaded) config.
#[derive(Clone, Debug)]
pub struct HostOptions {
    pub seed: u64,
    pub frames: u32,
    pub fps: Option<u32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub config_path: Option<PathBuf>,
}

impl Default for HostOptions {
    fn default() -> Self {
        Self {
            seed: 0,
            frames: 250,
            fps: None,
            width: None,
            height: None,
            config_path: None,
        }
    }
}

impl HostOptions {
    /// The config file (or defaults) with the command-line overrides applied.
    /// Validation happens when the world is built.
    pub fn world_config(&self) -> Result<WorldConfig, ConfigError> {
        let mut config = match &self.config_path {
            Some(path) => WorldConfig::load(path)?,
            None => WorldConfig::default(),
        };
        if let Some(fps) = self.fps {
            config.frame_rate = fps;
        }
        if let Some(width) = self.width {
            config.window_size.0 = width;
        }
        if let Some(height) = self.height {
            config.window_size.1 = height;
        }
        Ok(config)
    }
}

/// What the run produced, printed as JSON by the binary.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub seed: u64,
    pub frames: u32,
    pub elapsed_secs: f64,
    pub blocks: usize,
    pub trunks: usize,
    pub leaves: usize,
    pub fruits: usize,
    pub final_energy: f32,
    pub final_x: f32,
    pub jumps: u64,
    pub fruit_eaten: u32,
    pub timers_fired: usize,
}

/// Input for frame `frame` of the script.
pub fn scripted_input(frame: u32) -> ActionInput {
    let rightward = (frame / WALK_FRAMES) % 2 == 0;
    ActionInput {
        left: !rightward,
        right: rightward,
        jump: frame % JUMP_EVERY == JUMP_EVERY - 1,
    }
}

pub fn run(options: &HostOptions) -> Result<RunSummary, HostError> {
    let config = options.world_config()?;
    let dt = 1.0 / config.frame_rate as f32;
    let width = config.window_size.0;

    let mut world = World::new(config, options.seed)?;
    let populated = world.populate(0, width as i32)?;
    info!(
        "running {} frames at {} fps",
        options.frames,
        world.config().frame_rate
    );

    let mut summary = RunSummary {
        seed: options.seed,
        frames: options.frames,
        blocks: populated.blocks,
        trunks: populated.trunks,
        leaves: populated.leaves,
        fruits: populated.fruits,
        ..Default::default()
    };

    for frame in 0..options.frames {
        let report = world.step(dt, &scripted_input(frame));
        summary.timers_fired += report.timers_fired;
        apply_physics(&mut world, dt);
        for fruit in overlapping_fruit(&world) {
            if world.touch_fruit(fruit) {
                summary.fruit_eaten += 1;
                debug!("frame {frame}: ate {fruit}");
            }
        }
    }

    summary.elapsed_secs = world.now();
    summary.final_energy = world.avatar().energy();
    summary.final_x = world.avatar().body.position.x;
    summary.jumps = world.avatar().jump_count();
    Ok(summary)
}

/// Integrate the avatar's body for one frame.
pub fn apply_physics(world: &mut World, dt: f32) {
    let gravity = world.config().avatar.gravity;
    let size = world.config().avatar.size;
    let max_x = (world.config().window_size.0 - size).max(0.0);

    let mut body = world.avatar().body;
    body.velocity.y += gravity * dt;
    body.position.x = (body.position.x + body.velocity.x * dt).clamp(0.0, max_x);
    body.position.y += body.velocity.y * dt;

    let feet_x = (body.position.x + size / 2.0) as i32;
    let ground = world.ground_top_at(feet_x) as f32 - size;
    if body.position.y >= ground {
        body.position.y = ground;
        body.velocity.y = 0.0;
    }
    world.avatar_mut().body = body;
}

/// Available fruit whose box overlaps the avatar's.
fn overlapping_fruit(world: &World) -> Vec<FloraId> {
    let size = world.config().avatar.size;
    let pos = world.avatar().body.position;
    world
        .flora()
        .fruits
        .values()
        .filter(|f| f.is_available())
        .filter(|f| {
            let (fx, fy, fs) = (f.position.x as f32, f.position.y as f32, f.size as f32);
            fx < pos.x + size && pos.x < fx + fs && fy < pos.y + size && pos.y < fy + fs
        })
        .map(|f| f.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_alternates_direction_and_jumps_periodically() {
        assert!(scripted_input(0).right);
        assert!(scripted_input(99).right);
        assert!(scripted_input(100).left);
        assert!(!scripted_input(100).right);
        assert!(scripted_input(200).right);
        let jumps = (0..400).filter(|f| scripted_input(*f).jump).count();
        assert_eq!(jumps, 10);
    }

    #[test]
    fn overrides_apply_on_top_of_defaults() {
        let options = HostOptions {
            fps: Some(60),
            width: Some(1200.0),
            ..Default::default()
        };
        let config = options.world_config().unwrap();
        assert_eq!(config.frame_rate, 60);
        assert_eq!(config.window_size, (1200.0, 600.0));
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let options = HostOptions {
            config_path: Some(PathBuf::from("/nonexistent/sidescape.json")),
            ..Default::default()
        };
        assert!(matches!(
            run(&options),
            Err(HostError::Config(ConfigError::Io(_)))
        ));
    }

    #[test]
    fn invalid_override_is_rejected() {
        let options = HostOptions {
            fps: Some(0),
            ..Default::default()
        };
        assert!(matches!(run(&options), Err(HostError::Config(_))));
    }

    #[test]
    fn avatar_lands_on_the_terrain_surface() {
        let mut world = World::new(WorldConfig::default(), 3).unwrap();
        world.populate(0, 800).unwrap();
        for _ in 0..200 {
            apply_physics(&mut world, 0.04);
        }
        let body = world.avatar().body;
        let feet_x = (body.position.x + 25.0) as i32;
        assert_eq!(body.velocity.y, 0.0);
        assert_eq!(body.position.y, world.ground_top_at(feet_x) as f32 - 50.0);
    }

    #[test]
    fn scripted_run_is_reproducible_and_jumps() {
        let options = HostOptions {
            seed: 4,
            frames: 300,
            ..Default::default()
        };
        let a = run(&options).unwrap();
        let b = run(&options).unwrap();
        assert_eq!(a, b);
        assert!(a.jumps > 0);
        assert!(a.trunks > 0);
        assert!((0.0..=100.0).contains(&a.final_energy));
        assert!((a.elapsed_secs - 12.0).abs() < 1e-6);
    }
}
