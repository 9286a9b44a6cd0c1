//! Building footprint catalog entries.
//!
//! The planner does not ship any game data. Callers describe every building
//! they want placed with a [`BuildingType`]: its tile footprint, the pixel
//! clearance from its center to each edge, and a few behavioral flags.

use bitflags::*;
use serde::{Deserialize, Serialize};

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct BuildingFlags: u8 {
        const NONE = 0;
        /// Provides power to nearby buildings (pylon-like).
        const POWER_PROVIDER = 1;
        /// Must be placed in a powered tile.
        const REQUIRES_POWER = 2;
        /// Must be placed on creep.
        const REQUIRES_CREEP = 4;
        const RESOURCE_DEPOT = 8;
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Race {
    Protoss,
    Terran,
    Zerg,
}

/// Layout size class of a building.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FootprintCategory {
    Small,
    Medium,
    Large,
}

impl FootprintCategory {
    /// Tile width and height reserved for a building of this class inside a block.
    pub fn tile_size(self) -> (i32, i32) {
        match self {
            FootprintCategory::Small => (2, 2),
            FootprintCategory::Medium => (3, 2),
            FootprintCategory::Large => (4, 3),
        }
    }

    pub fn for_tile_width(width: i32) -> FootprintCategory {
        if width >= 4 {
            FootprintCategory::Large
        } else if width >= 3 {
            FootprintCategory::Medium
        } else {
            FootprintCategory::Small
        }
    }
}

/// Pixel size of the smallest unit a wall must keep out.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct UnitSize {
    pub width: i32,
    pub height: i32,
}

impl UnitSize {
    pub fn new(width: i32, height: i32) -> Self {
        UnitSize { width, height }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub struct BuildingType {
    pub name: &'static str,
    pub tile_width: i32,
    pub tile_height: i32,
    /// Pixels from the footprint center to the left edge of the solid body.
    pub dimension_left: i32,
    pub dimension_up: i32,
    pub dimension_right: i32,
    pub dimension_down: i32,
    pub flags: BuildingFlags,
}

impl BuildingType {
    /// A building whose solid body fills its whole tile footprint.
    pub const fn new(name: &'static str, tile_width: i32, tile_height: i32) -> Self {
        BuildingType {
            name,
            tile_width,
            tile_height,
            dimension_left: tile_width * 16,
            dimension_up: tile_height * 16,
            dimension_right: tile_width * 16 - 1,
            dimension_down: tile_height * 16 - 1,
            flags: BuildingFlags::NONE,
        }
    }

    pub const fn with_dimensions(self, left: i32, up: i32, right: i32, down: i32) -> Self {
        BuildingType {
            dimension_left: left,
            dimension_up: up,
            dimension_right: right,
            dimension_down: down,
            ..self
        }
    }

    pub const fn with_flags(self, flags: BuildingFlags) -> Self {
        BuildingType { flags, ..self }
    }

    pub fn category(&self) -> FootprintCategory {
        FootprintCategory::for_tile_width(self.tile_width)
    }

    #[inline]
    pub fn is_power_provider(&self) -> bool {
        self.flags.contains(BuildingFlags::POWER_PROVIDER)
    }

    #[inline]
    pub fn requires_power(&self) -> bool {
        self.flags.contains(BuildingFlags::REQUIRES_POWER)
    }

    #[inline]
    pub fn requires_creep(&self) -> bool {
        self.flags.contains(BuildingFlags::REQUIRES_CREEP)
    }

    #[inline]
    pub fn is_resource_depot(&self) -> bool {
        self.flags.contains(BuildingFlags::RESOURCE_DEPOT)
    }

    /// Pixel gap between the solid body and the right tile edge.
    pub fn gap_right(&self) -> i32 {
        self.tile_width * 16 - self.dimension_right - 1
    }

    pub fn gap_left(&self) -> i32 {
        self.tile_width * 16 - self.dimension_left
    }

    pub fn gap_up(&self) -> i32 {
        self.tile_height * 16 - self.dimension_up
    }

    pub fn gap_down(&self) -> i32 {
        self.tile_height * 16 - self.dimension_down - 1
    }
}
