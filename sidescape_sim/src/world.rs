// The side-scrolling world: build-time population and the per-frame step.
//
// `World` is the host-facing orchestrator. It owns the validated config, the
// terrain and flora builders, the flora entity tables, the avatar, the timer
// queue and the runtime random stream. Hosts (a renderer, a physics engine,
// the headless CLI) talk to the world through two entry points:
//
// - `populate(min_x, max_x)`: generate ground blocks for the range, scatter
//   trunks inset by `edge_margin` on each side, then leaves and fruit around
//   every trunk top. Each new flora entity is registered with the avatar's
//   observer registry and each leaf's idle sway is scheduled after its
//   sampled delay. Overlapping calls produce duplicates.
// - `step(dt, input)`: advance the timer clock and fire everything due, run
//   the avatar (publishing a jump to the flora tables), then update every
//   trunk, leaf and fruit exactly once in id order.
//
// Collisions arrive from the physics host through `touch_fruit()`, which
// applies the avatar's energy bonus and the fruit's consumption together.
//
// ## Seeds
//
// One `u64` world seed reproduces the whole scene. A root `WorldRng` is
// seeded from it; the terrain noise seed is its first `u32`, the flora
// stream is forked next (unless `config.flora_seed` overrides it) and the
// runtime stream used for trunk tints and flutter delays is forked last.
//
// See also: `avatar.rs`, `signal.rs`, `timer.rs`, `flora.rs`, `terrain.rs`.
//
// **Critical constraint: determinism.** Entities live in `BTreeMap`s keyed
// by `FloraId` so update order, and with it the order of runtime random
// draws, is fixed.

use crate::avatar::{ActionInput, Avatar};
use crate::config::WorldConfig;
use crate::error::{ConfigError, GenerationError, check_range};
use crate::flora::FloraBuilder;
use crate::fruit::Fruit;
use crate::leaf::Leaf;
use crate::signal::{JumpEvent, JumpListener, JumpListeners};
use crate::terrain::{Block, TerrainBuilder};
use crate::timer::{TimerEffect, TimerQueue};
use crate::trunk::Trunk;
use crate::types::{CollisionKind, FloraId, FloraKind, FloraRef, Vec2};
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};
use sidescape_prng::WorldRng;
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Flora tables
// ---------------------------------------------------------------------------

/// Every live flora entity, one table per kind.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FloraTables {
    pub trunks: BTreeMap<FloraId, Trunk>,
    pub leaves: BTreeMap<FloraId, Leaf>,
    pub fruits: BTreeMap<FloraId, Fruit>,
}

impl FloraTables {
    pub fn len(&self) -> usize {
        self.trunks.len() + self.leaves.len() + self.fruits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, target: FloraRef) -> bool {
        match target.kind {
            FloraKind::Trunk => self.trunks.contains_key(&target.id),
            FloraKind::Leaf => self.leaves.contains_key(&target.id),
            FloraKind::Fruit => self.fruits.contains_key(&target.id),
        }
    }

    /// Drop an entity. Refs to it held elsewhere become stale, not invalid.
    pub fn remove(&mut self, target: FloraRef) -> bool {
        match target.kind {
            FloraKind::Trunk => self.trunks.remove(&target.id).is_some(),
            FloraKind::Leaf => self.leaves.remove(&target.id).is_some(),
            FloraKind::Fruit => self.fruits.remove(&target.id).is_some(),
        }
    }
}

impl JumpListeners for FloraTables {
    fn deliver(&mut self, target: FloraRef, event: &JumpEvent) -> bool {
        let listener: Option<&mut dyn JumpListener> = match target.kind {
            FloraKind::Trunk => self
                .trunks
                .get_mut(&target.id)
                .map(|t| t as &mut dyn JumpListener),
            FloraKind::Leaf => self
                .leaves
                .get_mut(&target.id)
                .map(|l| l as &mut dyn JumpListener),
            FloraKind::Fruit => self
                .fruits
                .get_mut(&target.id)
                .map(|f| f as &mut dyn JumpListener),
        };
        match listener {
            Some(listener) => {
                listener.on_jump(event);
                true
            }
            None => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// Counts of what one `populate()` call added.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulateSummary {
    pub blocks: usize,
    pub trunks: usize,
    pub leaves: usize,
    pub fruits: usize,
}

/// What happened during one `step()`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    /// Timer effects fired this frame, including those whose target was gone.
    pub timers_fired: usize,
    pub jump: Option<JumpEvent>,
    /// Live flora reached by this frame's jump.
    pub notified: usize,
    pub trunks_toggled: usize,
    pub flutters_scheduled: usize,
}

// ---------------------------------------------------------------------------
// World
// ---------------------------------------------------------------------------

pub struct World {
    config: WorldConfig,
    seed: u64,
    terrain: TerrainBuilder,
    flora_builder: FloraBuilder,
    rng: WorldRng,
    blocks: Vec<Block>,
    flora: FloraTables,
    avatar: Avatar,
    timers: TimerQueue,
}

impl World {
    /// Validate `config` and set up an empty world. The avatar starts at full
    /// energy standing on the ground at the window's horizontal centre.
    pub fn new(config: WorldConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut root = WorldRng::new(seed);
        let terrain_seed = root.next_u32();
        let derived_flora = root.fork();
        let flora_rng = match config.flora_seed {
            Some(flora_seed) => WorldRng::new(flora_seed),
            None => derived_flora,
        };
        let rng = root.fork();

        let terrain = TerrainBuilder::from_config(terrain_seed, &config)?;
        let flora_builder = FloraBuilder::new(config.flora.clone(), flora_rng)?;

        let centre_x = config.window_size.0 / 2.0;
        let spawn = Vec2::new(
            centre_x,
            terrain.height_at(centre_x) - config.avatar.size,
        );
        let avatar = Avatar::new(config.avatar.clone(), spawn);

        info!(
            "world created: seed {seed}, terrain seed {terrain_seed}, window {}x{}",
            config.window_size.0, config.window_size.1
        );

        Ok(Self {
            config,
            seed,
            terrain,
            flora_builder,
            rng,
            blocks: Vec::new(),
            flora: FloraTables::default(),
            avatar,
            timers: TimerQueue::new(),
        })
    }

    /// Build terrain and flora for `[min_x, max_x]` and register the flora.
    pub fn populate(&mut self, min_x: i32, max_x: i32) -> Result<PopulateSummary, GenerationError> {
        check_range(min_x, max_x)?;
        let blocks = self.terrain.generate_blocks(min_x, max_x)?;

        let margin = self.config.flora.edge_margin;
        let flora_min = min_x.saturating_add(margin);
        let flora_max = max_x.saturating_sub(margin);
        let trunks = if flora_min < flora_max {
            self.flora_builder
                .place_trunks(&self.terrain, flora_min, flora_max)?
        } else {
            Vec::new()
        };

        let mut summary = PopulateSummary {
            blocks: blocks.len(),
            trunks: trunks.len(),
            ..Default::default()
        };
        self.blocks.extend(blocks);

        for trunk in trunks {
            let top = trunk.top();
            let leaves = self.flora_builder.place_leaves(top.x, top.y);
            let fruits = self.flora_builder.place_fruits(top.x, top.y);
            summary.leaves += leaves.len();
            summary.fruits += fruits.len();

            self.add_trunk(trunk);
            for leaf in leaves {
                self.add_leaf(leaf);
            }
            for fruit in fruits {
                self.add_fruit(fruit);
            }
        }

        info!(
            "populated [{min_x}, {max_x}]: {} blocks, {} trunks, {} leaves, {} fruit",
            summary.blocks, summary.trunks, summary.leaves, summary.fruits
        );
        Ok(summary)
    }

    fn add_trunk(&mut self, trunk: Trunk) {
        self.avatar
            .register_observer(FloraRef::new(FloraKind::Trunk, trunk.id));
        self.flora.trunks.insert(trunk.id, trunk);
    }

    fn add_leaf(&mut self, leaf: Leaf) {
        self.avatar
            .register_observer(FloraRef::new(FloraKind::Leaf, leaf.id));
        self.timers
            .schedule_after(leaf.idle_delay, TimerEffect::LeafSway { leaf: leaf.id });
        self.flora.leaves.insert(leaf.id, leaf);
    }

    fn add_fruit(&mut self, fruit: Fruit) {
        self.avatar
            .register_observer(FloraRef::new(FloraKind::Fruit, fruit.id));
        self.flora.fruits.insert(fruit.id, fruit);
    }

    /// Advance the world by one frame.
    pub fn step(&mut self, dt: f32, input: &ActionInput) -> StepReport {
        let mut report = StepReport::default();

        self.timers.advance(dt);
        report.timers_fired = self.fire_due_timers();

        let avatar_step = self.avatar.update(dt, input, &mut self.flora);
        report.jump = avatar_step.jump;
        report.notified = avatar_step.notified;

        let flora_params = &self.config.flora;
        for trunk in self.flora.trunks.values_mut() {
            if trunk.update(dt, &mut self.rng, flora_params) {
                report.trunks_toggled += 1;
            }
        }
        for leaf in self.flora.leaves.values_mut() {
            if leaf.update(dt, &mut self.rng, &mut self.timers, flora_params) {
                report.flutters_scheduled += 1;
            }
        }
        for fruit in self.flora.fruits.values_mut() {
            fruit.update(dt);
        }

        if report.jump.is_some() {
            debug!(
                "frame at {:.3}s: {} trunks toggled, {} flutters scheduled",
                self.timers.now(),
                report.trunks_toggled,
                report.flutters_scheduled
            );
        }
        report
    }

    /// Fire every timer due at the current clock. Returns how many fired.
    fn fire_due_timers(&mut self) -> usize {
        let mut fired = 0;
        while let Some(scheduled) = self.timers.pop_due() {
            fired += 1;
            let hit = match scheduled.effect {
                TimerEffect::LeafSway { leaf } => self
                    .flora
                    .leaves
                    .get_mut(&leaf)
                    .map(|l| l.start_sway(&self.config.leaf_motion))
                    .is_some(),
                TimerEffect::LeafFlutter { leaf } => self
                    .flora
                    .leaves
                    .get_mut(&leaf)
                    .map(|l| l.start_flutter(&self.config.leaf_motion))
                    .is_some(),
                TimerEffect::FruitRespawn { fruit } => self
                    .flora
                    .fruits
                    .get_mut(&fruit)
                    .map(Fruit::respawn)
                    .is_some(),
            };
            trace!(
                "timer #{} {:?} at {:.3}s{}",
                scheduled.sequence,
                scheduled.effect,
                self.timers.now(),
                if hit { "" } else { " (target gone)" }
            );
        }
        fired
    }

    /// The avatar touched fruit `id`. Returns true if the fruit was eaten.
    pub fn touch_fruit(&mut self, id: FloraId) -> bool {
        let Some(fruit) = self.flora.fruits.get_mut(&id) else {
            return false;
        };
        let available = fruit.is_available();
        self.avatar.on_collision(
            CollisionKind::Fruit { available },
            self.config.fruit.energy_bonus,
        );
        fruit.on_collision(CollisionKind::Avatar, &mut self.timers, &self.config.fruit)
    }

    /// Remove a flora entity and its observer registration. Timers already
    /// aimed at it stay queued and fire against nothing.
    pub fn remove_flora(&mut self, target: FloraRef) -> bool {
        self.avatar.unregister_observer(target);
        self.flora.remove(target)
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn terrain(&self) -> &TerrainBuilder {
        &self.terrain
    }

    pub fn height_at(&self, x: f32) -> f32 {
        self.terrain.height_at(x)
    }

    pub fn ground_top_at(&self, x: i32) -> i32 {
        self.terrain.ground_top_at(x)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn flora(&self) -> &FloraTables {
        &self.flora
    }

    pub fn avatar(&self) -> &Avatar {
        &self.avatar
    }

    /// For the physics host, which owns the avatar's body.
    pub fn avatar_mut(&mut self) -> &mut Avatar {
        &mut self.avatar
    }

    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    /// Seconds of world time elapsed.
    pub fn now(&self) -> f64 {
        self.timers.now()
    }
}
