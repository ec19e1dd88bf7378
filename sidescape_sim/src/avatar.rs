// The player avatar: energy economy and jump publication.
//
// The avatar does not integrate its own motion. The physics host owns
// position integration, gravity and ground contact; the avatar only reads the
// body's velocity to decide what it is allowed to do and writes the
// velocity it wants. Each frame, in order:
//
// 1. Regeneration. Standing exactly still (both velocity axes zero) with
//    energy below the cap regains `regen_per_frame`, clamped to the cap.
// 2. Walking. Each held direction is gated separately: with energy above
//    `walk_cost` it contributes `run_speed` and costs `walk_cost`. Velocity x
//    becomes the sum of the directions that passed (zero if none did).
// 3. Jumping. Only when grounded (velocity y exactly zero) and energy is
//    above `jump_cost`. A jump sets the upward velocity, pays the cost and
//    publishes one `JumpEvent` to every registered observer.
//
// Energy never leaves [0, max_energy]; every mutation clamps.
//
// See also: `signal.rs` for the observer channel, `world.rs` which supplies
// the flora tables as `JumpListeners` and routes fruit contacts here.

use crate::config::AvatarParams;
use crate::signal::{JumpEvent, JumpListeners, ObserverRegistry};
use crate::types::{CollisionKind, FloraRef, Vec2};
use log::debug;
use serde::{Deserialize, Serialize};

/// Input snapshot for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

/// Position and velocity, integrated by the physics host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AvatarPose {
    Idle,
    Run,
    Jump,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

/// What happened during one `Avatar::update`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AvatarStep {
    /// The jump event published this frame, if any.
    pub jump: Option<JumpEvent>,
    /// Live observers the jump reached.
    pub notified: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Avatar {
    params: AvatarParams,
    pub body: Body,
    energy: f32,
    pose: AvatarPose,
    facing: Facing,
    observers: ObserverRegistry,
    jumps: u64,
}

impl Avatar {
    /// A full-energy avatar standing still at `position`.
    pub fn new(params: AvatarParams, position: Vec2) -> Self {
        let energy = params.max_energy;
        Self {
            params,
            body: Body {
                position,
                velocity: Vec2::ZERO,
            },
            energy,
            pose: AvatarPose::Idle,
            facing: Facing::Right,
            observers: ObserverRegistry::new(),
            jumps: 0,
        }
    }

    /// Same avatar with a different starting energy, clamped to the cap.
    pub fn with_energy(mut self, energy: f32) -> Self {
        self.energy = energy.clamp(0.0, self.params.max_energy);
        self
    }

    pub fn energy(&self) -> f32 {
        self.energy
    }

    pub fn pose(&self) -> AvatarPose {
        self.pose
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn params(&self) -> &AvatarParams {
        &self.params
    }

    /// Successful jumps so far.
    pub fn jump_count(&self) -> u64 {
        self.jumps
    }

    pub fn observers(&self) -> &ObserverRegistry {
        &self.observers
    }

    pub fn register_observer(&mut self, target: FloraRef) {
        self.observers.register(target);
    }

    /// Stop notifying `target`. Returns false if it was not registered.
    pub fn unregister_observer(&mut self, target: FloraRef) -> bool {
        self.observers.unregister(target)
    }

    fn add_energy(&mut self, delta: f32) {
        self.energy = (self.energy + delta).clamp(0.0, self.params.max_energy);
    }

    pub fn update(
        &mut self,
        _dt: f32,
        input: &ActionInput,
        listeners: &mut impl JumpListeners,
    ) -> AvatarStep {
        let velocity = self.body.velocity;
        if self.energy < self.params.max_energy && velocity.x == 0.0 && velocity.y == 0.0 {
            self.add_energy(self.params.regen_per_frame);
            self.pose = AvatarPose::Idle;
        }

        let mut vx = 0.0;
        if input.left && self.try_walk() {
            vx -= self.params.run_speed;
            self.facing = Facing::Left;
        }
        if input.right && self.try_walk() {
            vx += self.params.run_speed;
            self.facing = Facing::Right;
        }
        self.body.velocity.x = vx;

        let mut step = AvatarStep::default();
        if input.jump && self.body.velocity.y == 0.0 && self.energy > self.params.jump_cost {
            self.body.velocity.y = -self.params.jump_speed;
            self.add_energy(-self.params.jump_cost);
            self.pose = AvatarPose::Jump;
            self.jumps += 1;

            let event = JumpEvent {
                sequence: self.jumps,
                energy_after: self.energy,
            };
            step.notified = self.observers.publish(&event, listeners);
            step.jump = Some(event);
            debug!(
                "jump #{}: energy {:.1}, notified {}/{}",
                event.sequence,
                self.energy,
                step.notified,
                self.observers.len()
            );
        }
        step
    }

    /// Pay for one held direction if affordable.
    fn try_walk(&mut self) -> bool {
        if self.energy <= self.params.walk_cost {
            return false;
        }
        self.add_energy(-self.params.walk_cost);
        self.pose = AvatarPose::Run;
        true
    }

    /// Returns true if the contact granted energy.
    pub fn on_collision(&mut self, other: CollisionKind, bonus: f32) -> bool {
        match other {
            CollisionKind::Fruit { available: true } => {
                self.add_energy(bonus);
                true
            }
            _ => false,
        }
    }
}
