// Tree trunks.
//
// A trunk is an immovable rectangle standing on the terrain. Its base sits on
// the grid-aligned ground top sampled when it was built, its height is fixed
// at creation, and it knows nothing about the leaves and fruit scattered
// around its top; those are independent siblings.
//
// Reaction: on each update, a pending jump trigger is consumed and the tint
// flips. An untinted trunk takes a freshly sampled brown; a tinted one returns
// to its base colour.

use crate::config::FloraParams;
use crate::signal::{JumpEvent, JumpListener};
use crate::types::{CellCoord, FloraId, Rgb};
use serde::{Deserialize, Serialize};
use sidescape_prng::WorldRng;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrunkTint {
    Base,
    Flashed(Rgb),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trunk {
    pub id: FloraId,
    /// Top-left corner: x of the trunk's left edge, y of its top.
    pub position: CellCoord,
    pub width: i32,
    pub height: i32,
    pub tint: TrunkTint,
    pub pending_trigger: bool,
}

impl Trunk {
    /// A trunk of `height` whose base rests on `ground_top`.
    pub fn new(id: FloraId, x: i32, ground_top: i32, width: i32, height: i32) -> Self {
        Self {
            id,
            position: CellCoord::new(x, ground_top - height),
            width,
            height,
            tint: TrunkTint::Base,
            pending_trigger: false,
        }
    }

    /// Point around which the canopy window is centred.
    pub fn top(&self) -> CellCoord {
        self.position
    }

    /// Ground y the trunk stands on.
    pub fn base_y(&self) -> i32 {
        self.position.y + self.height
    }

    pub fn color(&self, params: &FloraParams) -> Rgb {
        match self.tint {
            TrunkTint::Base => params.trunk_color,
            TrunkTint::Flashed(c) => c,
        }
    }

    /// Consume a pending trigger, if any. Returns true if the tint changed.
    pub fn update(&mut self, _dt: f32, rng: &mut WorldRng, params: &FloraParams) -> bool {
        if !std::mem::take(&mut self.pending_trigger) {
            return false;
        }
        self.tint = match self.tint {
            TrunkTint::Base => TrunkTint::Flashed(random_brown(rng, params)),
            TrunkTint::Flashed(_) => TrunkTint::Base,
        };
        true
    }
}

impl JumpListener for Trunk {
    fn on_jump(&mut self, _event: &JumpEvent) {
        self.pending_trigger = true;
    }
}

/// Jittered brown: red pushed up, green around the base, blue pulled down.
fn random_brown(rng: &mut WorldRng, params: &FloraParams) -> Rgb {
    let base = params.trunk_color;
    let range = i32::from(params.trunk_tint_range.max(1));
    let mut jitter = |channel: u8, shift: i32| {
        let v = i32::from(channel) + rng.range_i32(0, range) + shift;
        v.clamp(0, 255) as u8
    };
    let r = jitter(base.r, 0);
    let g = jitter(base.g, -15);
    let b = jitter(base.b, -30);
    Rgb::new(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;

    fn params() -> FloraParams {
        WorldConfig::default().flora
    }

    fn jump() -> JumpEvent {
        JumpEvent {
            sequence: 1,
            energy_after: 90.0,
        }
    }

    #[test]
    fn stands_on_the_ground() {
        let t = Trunk::new(FloraId(0), 30, 450, 15, 120);
        assert_eq!(t.top(), CellCoord::new(30, 330));
        assert_eq!(t.base_y(), 450);
    }

    #[test]
    fn no_trigger_no_change() {
        let params = params();
        let mut rng = WorldRng::new(1);
        let mut t = Trunk::new(FloraId(0), 0, 300, 15, 100);
        assert!(!t.update(0.04, &mut rng, &params));
        assert_eq!(t.tint, TrunkTint::Base);
    }

    #[test]
    fn toggles_between_base_and_brown() {
        let params = params();
        let mut rng = WorldRng::new(1);
        let mut t = Trunk::new(FloraId(0), 0, 300, 15, 100);

        t.on_jump(&jump());
        assert!(t.update(0.04, &mut rng, &params));
        assert!(matches!(t.tint, TrunkTint::Flashed(_)));
        assert!(!t.pending_trigger);

        t.on_jump(&jump());
        assert!(t.update(0.04, &mut rng, &params));
        assert_eq!(t.tint, TrunkTint::Base);
        assert_eq!(t.color(&params), params.trunk_color);
    }

    #[test]
    fn trigger_is_consumed_once() {
        let params = params();
        let mut rng = WorldRng::new(1);
        let mut t = Trunk::new(FloraId(0), 0, 300, 15, 100);
        t.on_jump(&jump());
        t.on_jump(&jump());
        assert!(t.update(0.04, &mut rng, &params));
        assert!(!t.update(0.04, &mut rng, &params));
        assert!(matches!(t.tint, TrunkTint::Flashed(_)));
    }

    #[test]
    fn random_brown_stays_in_band() {
        let params = params();
        let mut rng = WorldRng::new(8);
        for _ in 0..1000 {
            let c = random_brown(&mut rng, &params);
            assert!((100..130).contains(&c.r), "red {}", c.r);
            assert!((35..65).contains(&c.g), "green {}", c.g);
            assert!(c.b < 20, "blue {}", c.b);
        }
    }
}
