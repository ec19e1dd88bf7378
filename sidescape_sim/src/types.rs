// Core types shared across the world builder and runtime.
//
// Screen-space geometry (`Vec2`, `CellCoord`), colours (`Rgb`), flora
// identifiers (`FloraId`, `FloraKind`, `FloraRef`) and the collision kinds the
// physics host reports. Screen y grows downward: a larger y is lower on screen,
// so terrain "height" is a y coordinate and a jump has negative y velocity.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// Continuous screen-space position or velocity, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Integer pixel coordinate of a grid-aligned cell's top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    pub x: i32,
    pub y: i32,
}

impl CellCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// True if both components are multiples of `cell`.
    pub fn is_aligned(self, cell: i32) -> bool {
        self.x.rem_euclid(cell) == 0 && self.y.rem_euclid(cell) == 0
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// Colour
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

// ---------------------------------------------------------------------------
// Flora identity
// ---------------------------------------------------------------------------

/// Compact identifier for a flora entity. Assigned sequentially by one
/// `FloraBuilder` and unique across trunks, leaves and fruit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FloraId(pub u32);

impl fmt::Display for FloraId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "flora#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FloraKind {
    Trunk,
    Leaf,
    Fruit,
}

/// Non-owning handle to a flora entity: which table to look in, and the key.
/// Holding one says nothing about whether the entity still exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FloraRef {
    pub kind: FloraKind,
    pub id: FloraId,
}

impl FloraRef {
    pub const fn new(kind: FloraKind, id: FloraId) -> Self {
        Self { kind, id }
    }
}

// ---------------------------------------------------------------------------
// Collisions
// ---------------------------------------------------------------------------

/// What the physics host says an entity collided with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionKind {
    Avatar,
    Ground,
    Trunk,
    Leaf,
    /// A fruit, with its availability at the moment of contact.
    Fruit { available: bool },
}
