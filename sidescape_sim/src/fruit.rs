// Fruit.
//
// Fruit hangs in the canopy window and is passive until the avatar touches
// it. Contact while available consumes it (the host hides it) and schedules
// a respawn; when the respawn fires the fruit is simply available again.
// Contact while consumed does nothing.
//
// Fruit is registered for jumps like every other flora entity, but a jump
// is not one of its transitions: the trigger is cleared on update and
// otherwise ignored.

use crate::config::FruitParams;
use crate::signal::{JumpEvent, JumpListener};
use crate::timer::{TimerEffect, TimerQueue};
use crate::types::{CellCoord, CollisionKind, FloraId};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FruitState {
    Available,
    Consumed,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fruit {
    pub id: FloraId,
    pub position: CellCoord,
    pub size: i32,
    pub state: FruitState,
    pub pending_trigger: bool,
}

impl Fruit {
    pub fn new(id: FloraId, position: CellCoord, size: i32) -> Self {
        Self {
            id,
            position,
            size,
            state: FruitState::Available,
            pending_trigger: false,
        }
    }

    pub fn is_available(&self) -> bool {
        self.state == FruitState::Available
    }

    /// Clears any jump trigger; fruit has no jump reaction.
    pub fn update(&mut self, _dt: f32) {
        self.pending_trigger = false;
    }

    /// Returns true if this contact consumed the fruit.
    pub fn on_collision(
        &mut self,
        other: CollisionKind,
        timers: &mut TimerQueue,
        params: &FruitParams,
    ) -> bool {
        if other != CollisionKind::Avatar || !self.is_available() {
            return false;
        }
        self.state = FruitState::Consumed;
        timers.schedule_after(params.respawn_secs, TimerEffect::FruitRespawn { fruit: self.id });
        true
    }

    /// Respawn timer callback.
    pub fn respawn(&mut self) {
        self.state = FruitState::Available;
    }
}

impl JumpListener for Fruit {
    fn on_jump(&mut self, _event: &JumpEvent) {
        self.pending_trigger = true;
    }
}
