// Leaves.
//
// Each leaf is a small square in the canopy window above a trunk. It carries
// two independent motions, each an (angle, width) pair of tweens:
//
// - Sway: looping back-and-forth idle motion. Its start is delayed by the
//   random `idle_delay` sampled at creation; the world schedules that delay
//   when the leaf is added, independent of anything the avatar does.
// - Flutter: one-shot reaction to a jump. On each update that finds a pending
//   trigger, the leaf schedules a flutter after a fresh random delay. While a
//   flutter plays the leaf is `Reacting` and the flutter overrides the sway;
//   when it completes the leaf returns to `Idle`.
//
// See also: `timer.rs` for the scheduling, `tween.rs` for the interpolation,
// `world.rs` which dispatches `LeafSway`/`LeafFlutter` to `start_sway()` and
// `start_flutter()`.

use crate::config::{FloraParams, LeafMotionParams};
use crate::signal::{JumpEvent, JumpListener};
use crate::timer::{TimerEffect, TimerQueue};
use crate::tween::{Playback, Tween};
use crate::types::{CellCoord, FloraId};
use serde::{Deserialize, Serialize};
use sidescape_prng::WorldRng;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeafState {
    Idle,
    Reacting,
}

/// Paired angle and width tweens.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeafMotion {
    pub angle: Tween,
    pub width: Tween,
}

impl LeafMotion {
    fn sway(m: &LeafMotionParams) -> Self {
        Self {
            angle: Tween::new(0.0, m.sway_angle, m.sway_angle_secs, Playback::BackAndForth),
            width: Tween::new(m.width_from, m.width_to, m.sway_width_secs, Playback::BackAndForth),
        }
    }

    fn flutter(m: &LeafMotionParams) -> Self {
        Self {
            angle: Tween::new(0.0, m.flutter_angle, m.flutter_secs, Playback::Once),
            width: Tween::new(m.width_from, m.width_to, m.flutter_secs, Playback::Once),
        }
    }

    fn advance(&mut self, dt: f32) {
        self.angle.advance(dt);
        self.width.advance(dt);
    }

    fn is_finished(&self) -> bool {
        self.angle.is_finished() && self.width.is_finished()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Leaf {
    pub id: FloraId,
    pub position: CellCoord,
    pub size: i32,
    pub state: LeafState,
    /// Seconds between entering the world and starting to sway.
    pub idle_delay: f32,
    pub sway: Option<LeafMotion>,
    pub flutter: Option<LeafMotion>,
    pub pending_trigger: bool,
}

impl Leaf {
    pub fn new(id: FloraId, position: CellCoord, size: i32, idle_delay: f32) -> Self {
        Self {
            id,
            position,
            size,
            state: LeafState::Idle,
            idle_delay,
            sway: None,
            flutter: None,
            pending_trigger: false,
        }
    }

    /// Begin the looping idle sway. Restarting an existing sway resets it.
    pub fn start_sway(&mut self, motion: &LeafMotionParams) {
        self.sway = Some(LeafMotion::sway(motion));
    }

    /// Begin a one-shot flutter, replacing any flutter already playing.
    pub fn start_flutter(&mut self, motion: &LeafMotionParams) {
        self.flutter = Some(LeafMotion::flutter(motion));
        self.state = LeafState::Reacting;
    }

    /// Rendered rotation in degrees.
    pub fn angle(&self) -> f32 {
        self.active_motion().map_or(0.0, |m| m.angle.value())
    }

    /// Rendered width in pixels: the fixed size plus the swept offset.
    pub fn width(&self) -> f32 {
        self.size as f32 + self.active_motion().map_or(0.0, |m| m.width.value())
    }

    fn active_motion(&self) -> Option<&LeafMotion> {
        self.flutter.as_ref().or(self.sway.as_ref())
    }

    /// Advance motions and consume a pending trigger. Returns true if a new
    /// flutter was scheduled.
    pub fn update(
        &mut self,
        dt: f32,
        rng: &mut WorldRng,
        timers: &mut TimerQueue,
        params: &FloraParams,
    ) -> bool {
        if let Some(sway) = &mut self.sway {
            sway.advance(dt);
        }
        let flutter_done = match &mut self.flutter {
            Some(flutter) => {
                flutter.advance(dt);
                flutter.is_finished()
            }
            None => false,
        };
        if flutter_done {
            self.flutter = None;
            self.state = LeafState::Idle;
        }

        if !std::mem::take(&mut self.pending_trigger) {
            return false;
        }
        let delay = rng.range_f32(params.min_delay, params.max_delay);
        timers.schedule_after(delay, TimerEffect::LeafFlutter { leaf: self.id });
        true
    }
}

impl JumpListener for Leaf {
    fn on_jump(&mut self, _event: &JumpEvent) {
        self.pending_trigger = true;
    }
}
