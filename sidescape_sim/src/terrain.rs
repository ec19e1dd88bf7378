// Grid-aligned ground geometry.
//
// `TerrainBuilder::generate_blocks(min_x, max_x)` snaps the requested range
// outward to the cell grid (floor for the minimum, ceiling for the maximum),
// so adjacent calls tile without gaps, then emits one column per grid x: the
// top block sits at `floor(height_at(x) / cell) * cell` and `depth` blocks
// stack downward from it in cell-size steps.
//
// Columns are independent, so they are computed on the rayon pool and
// collected in column order. Overlapping calls are not deduplicated; a
// scrolling host must only request ranges it has not built yet.
//
// See also: `height.rs` for the noise-driven surface, `flora.rs` which uses
// `ground_top_at()` to anchor trunks, `world.rs` which calls this on populate.

use crate::config::{TerrainParams, WorldConfig};
use crate::error::{ConfigError, GenerationError, check_range};
use crate::height::HeightField;
use crate::types::CellCoord;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// One immovable ground cell. `position` is its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub position: CellCoord,
    pub size: i32,
}

/// Produces ground blocks for x-ranges from a height field.
#[derive(Clone, Debug)]
pub struct TerrainBuilder {
    height: HeightField,
    cell_size: i32,
    depth: u32,
}

impl TerrainBuilder {
    pub fn new(height: HeightField, params: &TerrainParams) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self {
            height,
            cell_size: params.cell_size,
            depth: params.depth,
        })
    }

    pub fn from_config(seed: u32, config: &WorldConfig) -> Result<Self, ConfigError> {
        Self::new(HeightField::from_config(seed, config)?, &config.terrain)
    }

    pub fn height_field(&self) -> &HeightField {
        &self.height
    }

    pub fn cell_size(&self) -> i32 {
        self.cell_size
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Continuous ground height at `x`.
    pub fn height_at(&self, x: f32) -> f32 {
        self.height.height_at(x)
    }

    /// Grid-aligned y of the topmost ground block in the column containing `x`.
    pub fn ground_top_at(&self, x: i32) -> i32 {
        let cell = self.cell_size as f32;
        ((self.height.height_at(x as f32) / cell).floor() * cell) as i32
    }

    /// Blocks covering `[min_x, max_x]`, snapped outward to the grid. Fails
    /// with `RangeOutOfBounds` if a snapped end leaves the `i32` range.
    pub fn generate_blocks(&self, min_x: i32, max_x: i32) -> Result<Vec<Block>, GenerationError> {
        let (start, end) = self.snapped_range(min_x, max_x)?;
        let cell = self.cell_size;
        let columns = ((i64::from(end) - i64::from(start)) / i64::from(cell)) as usize + 1;

        // Column x lies in [start, end]; only the offset needs the wider type.
        let blocks: Vec<Block> = (0..columns)
            .into_par_iter()
            .flat_map_iter(|i| {
                let x = i64::from(start) + i as i64 * i64::from(cell);
                self.column(x as i32)
            })
            .collect();

        log::debug!(
            "generated {} blocks in {columns} columns for x {start}..={end}",
            blocks.len()
        );
        Ok(blocks)
    }

    /// `[min_x, max_x]` widened to the enclosing grid lines.
    pub fn snapped_range(&self, min_x: i32, max_x: i32) -> Result<(i32, i32), GenerationError> {
        check_range(min_x, max_x)?;
        let out_of_bounds = || GenerationError::RangeOutOfBounds { min_x, max_x };
        let cell = i64::from(self.cell_size);
        let start = floor_to(i64::from(min_x), cell);
        let end = ceil_to(i64::from(max_x), cell);
        Ok((
            i32::try_from(start).map_err(|_| out_of_bounds())?,
            i32::try_from(end).map_err(|_| out_of_bounds())?,
        ))
    }

    fn column(&self, x: i32) -> impl Iterator<Item = Block> + '_ {
        let top = self.ground_top_at(x);
        let cell = self.cell_size;
        (0..self.depth as i32).map(move |row| Block {
            position: CellCoord::new(x, top + row * cell),
            size: cell,
        })
    }
}

/// Largest multiple of `cell` that is `<= value`.
fn floor_to(value: i64, cell: i64) -> i64 {
    value.div_euclid(cell) * cell
}

/// Smallest multiple of `cell` that is `>= value`.
fn ceil_to(value: i64, cell: i64) -> i64 {
    let floor = floor_to(value, cell);
    if floor < value { floor + cell } else { floor }
}
