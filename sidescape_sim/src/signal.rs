// Jump propagation from the avatar to the environment.
//
// The avatar never owns the entities it notifies. It keeps an
// `ObserverRegistry` of `FloraRef`s, filled at build time, and when a jump
// succeeds it publishes one `JumpEvent` through a `JumpListeners`
// implementation that resolves each ref to a live entity. In the world that
// implementation is the flora tables; tests substitute a recording fake.
//
// Delivery only raises the entity's pending-trigger flag. Each entity reads
// and clears its own flag on its next update, so a second jump before that
// update coalesces into one reaction. `World::remove_flora` unregisters what
// it removes; any other ref whose entity no longer exists is skipped without
// error.
//
// See also: `avatar.rs` which publishes, `trunk.rs`/`leaf.rs`/`fruit.rs`
// which implement `JumpListener`, `world.rs` for the table-backed resolver.

use crate::types::FloraRef;
use serde::{Deserialize, Serialize};

/// A successful avatar jump.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct JumpEvent {
    /// Monotonic per-avatar jump count, starting at 1.
    pub sequence: u64,
    /// Energy left after paying for the jump.
    pub energy_after: f32,
}

/// Something that reacts to jumps on its own update.
pub trait JumpListener {
    /// Record the jump. Must not do more than mark pending state.
    fn on_jump(&mut self, event: &JumpEvent);
}

/// Resolves registered refs to live listeners.
pub trait JumpListeners {
    /// Deliver `event` to `target`. Returns false if the target no longer exists.
    fn deliver(&mut self, target: FloraRef, event: &JumpEvent) -> bool;
}

/// Subscribers to the avatar's jumps, in registration order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ObserverRegistry {
    observers: Vec<FloraRef>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, target: FloraRef) {
        self.observers.push(target);
    }

    /// Drop every registration of `target`. Returns false if there was none.
    pub fn unregister(&mut self, target: FloraRef) -> bool {
        let before = self.observers.len();
        self.observers.retain(|r| *r != target);
        self.observers.len() != before
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FloraRef> {
        self.observers.iter()
    }

    /// Send `event` to every registered observer. Returns how many were live.
    pub fn publish(&self, event: &JumpEvent, listeners: &mut impl JumpListeners) -> usize {
        self.observers
            .iter()
            .filter(|target| listeners.deliver(**target, event))
            .count()
    }
}
