// Time-driven scalar interpolation for leaf motion.
//
// A `Tween` sweeps a value from `from` to `to` over `duration` seconds with a
// cubic ease (`3t² − 2t³`). `Once` holds at `to` when done; `BackAndForth`
// ping-pongs forever and never finishes. Tweens advance only when their owner
// is updated, so they follow the host's frame clock.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Playback {
    Once,
    BackAndForth,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tween {
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
    playback: Playback,
}

impl Tween {
    /// `duration` must be positive.
    pub fn new(from: f32, to: f32, duration: f32, playback: Playback) -> Self {
        debug_assert!(duration > 0.0, "tween duration must be positive");
        Self {
            from,
            to,
            duration,
            elapsed: 0.0,
            playback,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt.max(0.0);
        if self.playback == Playback::BackAndForth {
            // Keep the clock bounded; one full cycle is there and back.
            self.elapsed %= 2.0 * self.duration;
        }
    }

    pub fn is_finished(&self) -> bool {
        self.playback == Playback::Once && self.elapsed >= self.duration
    }

    pub fn value(&self) -> f32 {
        let phase = self.elapsed / self.duration;
        let t = match self.playback {
            Playback::Once => phase.min(1.0),
            Playback::BackAndForth => {
                if phase <= 1.0 {
                    phase
                } else {
                    2.0 - phase
                }
            }
        };
        self.from + (self.to - self.from) * ease_cubic(t)
    }
}

fn ease_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
