// Procedural flora placement.
//
// Three passes, each a pure constructor that registers nothing:
//
// - `place_trunks(terrain, min_x, max_x)`: walk x from `min_x` (exclusive of
//   `max_x`) in `stride` steps; each slot gets a trunk with probability
//   `tree_probability`, with a height drawn from
//   `[min_trunk_height, max_trunk_height)` and its base on the terrain's
//   grid-aligned ground top at that x.
// - `place_leaves(top_x, top_y)`: scan the square `canopy_window` centred at a
//   trunk top in `leaf_step` increments; each cell gets a leaf with
//   probability `leaf_probability`, and each leaf samples its idle-sway delay.
// - `place_fruits(top_x, top_y)`: the same window at the sparser `fruit_step`.
//
// Nothing resolves overlaps beyond the fixed stride, and repeated calls over
// the same range produce new, duplicate entities.
//
// See also: `terrain.rs` for the height query, `world.rs` which chains the
// passes and registers the results with the avatar.
//
// **Critical constraint: determinism.** Every draw comes from the builder's
// own `WorldRng`, injected at construction. The same seed and the same call
// sequence always produce the same flora.

use crate::config::FloraParams;
use crate::error::{ConfigError, GenerationError, check_range};
use crate::fruit::Fruit;
use crate::leaf::Leaf;
use crate::terrain::TerrainBuilder;
use crate::trunk::Trunk;
use crate::types::{CellCoord, FloraId};
use sidescape_prng::WorldRng;

/// Scatters trunks, leaves and fruit. Owns its random stream and the id counter.
#[derive(Clone, Debug)]
pub struct FloraBuilder {
    params: FloraParams,
    rng: WorldRng,
    next_id: u32,
}

impl FloraBuilder {
    /// Fails if `params` would leave a placement pass with nothing to walk.
    pub fn new(params: FloraParams, rng: WorldRng) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self {
            params,
            rng,
            next_id: 0,
        })
    }

    pub fn params(&self) -> &FloraParams {
        &self.params
    }

    fn allocate_id(&mut self) -> FloraId {
        let id = FloraId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn place_trunks(
        &mut self,
        terrain: &TerrainBuilder,
        min_x: i32,
        max_x: i32,
    ) -> Result<Vec<Trunk>, GenerationError> {
        check_range(min_x, max_x)?;
        let p = &self.params;
        let (stride, probability) = (p.stride, p.tree_probability);
        let (min_h, max_h, width) = (p.min_trunk_height, p.max_trunk_height, p.trunk_width);

        let mut trunks = Vec::new();
        for x in (min_x..max_x).step_by(stride as usize) {
            if !self.rng.chance(probability) {
                continue;
            }
            let height = self.rng.range_i32(min_h, max_h);
            let ground_top = terrain.ground_top_at(x);
            let id = self.allocate_id();
            trunks.push(Trunk::new(id, x, ground_top, width, height));
        }
        Ok(trunks)
    }

    pub fn place_leaves(&mut self, top_x: i32, top_y: i32) -> Vec<Leaf> {
        let p = &self.params;
        let (step, probability, size) = (p.leaf_step, p.leaf_probability, p.leaf_size);
        let (min_delay, max_delay) = (p.min_delay, p.max_delay);

        let mut leaves = Vec::new();
        for cell in self.window_cells(top_x, top_y, step) {
            if !self.rng.chance(probability) {
                continue;
            }
            let idle_delay = self.rng.range_f32(min_delay, max_delay);
            let id = self.allocate_id();
            leaves.push(Leaf::new(id, cell, size, idle_delay));
        }
        leaves
    }

    pub fn place_fruits(&mut self, top_x: i32, top_y: i32) -> Vec<Fruit> {
        let p = &self.params;
        let (step, probability, size) = (p.fruit_step, p.fruit_probability, p.fruit_size);

        let mut fruits = Vec::new();
        for cell in self.window_cells(top_x, top_y, step) {
            if !self.rng.chance(probability) {
                continue;
            }
            let id = self.allocate_id();
            fruits.push(Fruit::new(id, cell, size));
        }
        fruits
    }

    /// Cells of the canopy window around (top_x, top_y), row-major by x then y.
    fn window_cells(&self, top_x: i32, top_y: i32, step: i32) -> Vec<CellCoord> {
        let half = self.params.canopy_window / 2;
        let step = step as usize;
        let xs = (top_x.saturating_sub(half)..top_x.saturating_add(half)).step_by(step);
        xs.flat_map(|x| {
            (top_y.saturating_sub(half)..top_y.saturating_add(half))
                .step_by(step)
                .map(move |y| CellCoord::new(x, y))
        })
        .collect()
    }
}
