// sidescape_sim: procedural side-scrolling world core.
//
// This crate builds and animates a 2D side-scrolling environment: a noise
// height field, grid-aligned ground blocks derived from it, flora scattered on
// top, and the avatar whose jumps ripple into that flora. It knows nothing
// about rendering, input polling, audio or windowing; hosts feed it frame
// deltas and input snapshots and read state back.
//
// Module overview:
// - `world.rs`:   World orchestrator: `populate()` for a range, `step()` per frame.
// - `height.rs`:  HeightField, the seeded Perlin `x -> ground y` function.
// - `terrain.rs`: TerrainBuilder, grid-aligned block columns for an x-range.
// - `flora.rs`:   FloraBuilder, trunk/leaf/fruit placement.
// - `trunk.rs`, `leaf.rs`, `fruit.rs`: reactive flora entities.
// - `avatar.rs`:  Energy economy, input gating, jump publication.
// - `signal.rs`:  JumpEvent, ObserverRegistry and the JumpListeners seam.
// - `timer.rs`:   TimerQueue of deferred one-shot effects.
// - `tween.rs`:   Cubic-eased value interpolation for leaf motion.
// - `config.rs`:  WorldConfig with nested parameter groups, JSON loading, validation.
// - `error.rs`:   ConfigError and GenerationError.
// - `prng`:       Re-exported from `sidescape_prng`, the xoshiro256++ PRNG with SplitMix64 seeding.
// - `types.rs`:   Vec2, CellCoord, Rgb, flora ids and refs, collision kinds.
//
// The companion crate `sidescape_headless` drives a World from the command
// line with a scripted input pattern and a minimal physics stand-in.
//
// **Critical constraint: determinism.** Given a seed and a config, the world
// and every reaction in it replay identically. All randomness comes from
// seeded `WorldRng` streams; entity tables are `BTreeMap`s; no system time or
// OS entropy.

pub mod avatar;
pub mod config;
pub mod error;
pub mod flora;
pub mod fruit;
pub mod height;
pub mod leaf;
pub use sidescape_prng as prng;
pub mod signal;
pub mod terrain;
pub mod timer;
pub mod trunk;
pub mod tween;
pub mod types;
pub mod world;
