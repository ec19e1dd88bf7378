// End-to-end scenarios through the public API: terrain coverage for a fixed
// window, the avatar's jump economy against real flora, and the fruit
// lifecycle.

use sidescape_sim::avatar::{ActionInput, Avatar};
use sidescape_sim::config::WorldConfig;
use sidescape_sim::leaf::LeafState;
use sidescape_sim::signal::{JumpEvent, JumpListeners};
use sidescape_sim::terrain::TerrainBuilder;
use sidescape_sim::trunk::TrunkTint;
use sidescape_sim::types::{FloraId, FloraKind, FloraRef, Vec2};
use sidescape_sim::world::World;
use std::collections::BTreeMap;

const DT: f32 = 0.04;

const JUMP: ActionInput = ActionInput {
    left: false,
    right: false,
    jump: true,
};

#[derive(Default)]
struct Counting {
    hits: BTreeMap<FloraRef, u32>,
}

impl JumpListeners for Counting {
    fn deliver(&mut self, target: FloraRef, _event: &JumpEvent) -> bool {
        *self.hits.entry(target).or_default() += 1;
        true
    }
}

#[test]
fn window_terrain_covers_snapped_range() {
    let config = WorldConfig::default();
    assert_eq!(config.window_size, (800.0, 600.0));
    assert_eq!(config.terrain.cell_size, 30);
    let terrain = TerrainBuilder::from_config(0, &config).unwrap();

    let blocks = terrain.generate_blocks(0, 800).unwrap();
    let mut columns: BTreeMap<i32, Vec<i32>> = BTreeMap::new();
    for b in &blocks {
        assert_eq!(b.position.x % 30, 0);
        columns.entry(b.position.x).or_default().push(b.position.y);
    }

    let xs: Vec<i32> = columns.keys().copied().collect();
    let expected: Vec<i32> = (0..=810).step_by(30).collect();
    assert_eq!(xs, expected);

    for (x, ys) in &columns {
        let top = ((terrain.height_at(*x as f32) / 30.0).floor() * 30.0) as i32;
        assert_eq!(ys.len(), 20);
        assert_eq!(ys[0], top, "column {x}");
        for pair in ys.windows(2) {
            assert_eq!(pair[1] - pair[0], 30);
        }
    }
}

#[test]
fn underpowered_jump_changes_nothing() {
    let mut config = WorldConfig::default();
    config.avatar.jump_cost = 10.0;
    let mut avatar = Avatar::new(config.avatar, Vec2::new(0.0, 0.0)).with_energy(5.0);
    avatar.register_observer(FloraRef::new(FloraKind::Leaf, FloraId(0)));
    avatar.body.velocity.x = 200.0;

    let mut sink = Counting::default();
    let step = avatar.update(DT, &JUMP, &mut sink);

    assert!(step.jump.is_none());
    assert_eq!(avatar.body.velocity.y, 0.0);
    assert_eq!(avatar.energy(), 5.0);
    assert!(sink.hits.is_empty());
}

#[test]
fn jump_reaches_three_flora_once_each() {
    let config = WorldConfig::default();
    let mut avatar = Avatar::new(config.avatar, Vec2::new(0.0, 0.0)).with_energy(50.0);
    let refs = [
        FloraRef::new(FloraKind::Trunk, FloraId(0)),
        FloraRef::new(FloraKind::Leaf, FloraId(1)),
        FloraRef::new(FloraKind::Fruit, FloraId(2)),
    ];
    for r in refs {
        avatar.register_observer(r);
    }
    // Still moving horizontally from the previous frame, so no regeneration.
    avatar.body.velocity.x = -200.0;

    let mut sink = Counting::default();
    let step = avatar.update(DT, &JUMP, &mut sink);

    assert_eq!(avatar.energy(), 40.0);
    assert_eq!(step.notified, 3);
    for r in refs {
        assert_eq!(sink.hits[&r], 1);
    }
}

#[test]
fn world_jump_sets_off_every_reaction() {
    let mut config = WorldConfig::default();
    config.flora.tree_probability = 1.0;
    let mut world = World::new(config, 0).unwrap();
    let summary = world.populate(0, 800).unwrap();
    assert_eq!(summary.trunks, 5);

    let report = world.step(DT, &JUMP);
    assert!(report.jump.is_some());
    assert_eq!(report.notified, world.flora().len());
    assert!(
        world
            .flora()
            .trunks
            .values()
            .all(|t| matches!(t.tint, TrunkTint::Flashed(_)))
    );

    // Every leaf flutters within the delay window and then settles.
    let leaves = world.flora().leaves.len();
    let mut reacted = std::collections::BTreeSet::new();
    for _ in 0..20 {
        world.step(DT, &ActionInput::default());
        for leaf in world.flora().leaves.values() {
            if leaf.state == LeafState::Reacting {
                reacted.insert(leaf.id);
            }
        }
    }
    assert_eq!(reacted.len(), leaves);
}

#[test]
fn fruit_lifecycle_through_world() {
    let mut config = WorldConfig::default();
    config.flora.tree_probability = 1.0;
    config.flora.fruit_probability = 1.0;
    let mut world = World::new(config, 21).unwrap();
    world.populate(0, 800).unwrap();
    let fruit = *world.flora().fruits.keys().next().unwrap();

    // Already at the cap: the bonus clamps.
    assert!(world.touch_fruit(fruit));
    assert_eq!(world.avatar().energy(), 100.0);
    assert!(!world.flora().fruits[&fruit].is_available());

    // 30 s at 25 fps.
    for _ in 0..749 {
        world.step(DT, &ActionInput::default());
    }
    assert!(!world.flora().fruits[&fruit].is_available());
    world.step(DT, &ActionInput::default());
    assert!(world.flora().fruits[&fruit].is_available());
    assert_eq!(world.avatar().energy(), 100.0);
}

#[test]
fn config_file_round_trip_builds_same_world() {
    let dir = std::env::temp_dir().join(format!("sidescape-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("world.json");
    let config = WorldConfig::default();
    std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

    let loaded = WorldConfig::load(&path).unwrap();
    assert_eq!(loaded, config);

    let mut a = World::new(config, 5).unwrap();
    let mut b = World::new(loaded, 5).unwrap();
    assert_eq!(a.populate(-300, 900).unwrap(), b.populate(-300, 900).unwrap());
    assert_eq!(a.blocks(), b.blocks());

    std::fs::remove_dir_all(&dir).unwrap();
}
