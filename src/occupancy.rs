//! Per-tile occupancy bookkeeping shared by every placement component.

use crate::location::*;
use crate::map_data::*;
use crate::terrain::*;
use serde::{Deserialize, Serialize};

/// Parallel grids over the tile space of one map.
///
/// `overlap` counts how many placed structures or neutral obstacles cover a
/// tile, so marking and clearing the same rectangle restores the prior value.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OccupancyGrid {
    overlap: Grid<u16>,
    used: Grid<bool>,
    reserved: Grid<u8>,
}

impl OccupancyGrid {
    pub fn new(width: i32, height: i32) -> Self {
        OccupancyGrid {
            overlap: Grid::new(width, height, 0),
            used: Grid::new(width, height, false),
            reserved: Grid::new(width, height, 0),
        }
    }

    pub fn width(&self) -> i32 {
        self.overlap.width()
    }

    pub fn height(&self) -> i32 {
        self.overlap.height()
    }

    pub fn mark_occupied(&mut self, origin: TilePosition, width: i32, height: i32) {
        for tile in origin.footprint(width, height) {
            if let Some(count) = self.overlap.get_mut(tile) {
                *count = count.saturating_add(1);
            }
        }
    }

    /// Undo one `mark_occupied` over the same rectangle.
    pub fn clear_occupied(&mut self, origin: TilePosition, width: i32, height: i32) {
        for tile in origin.footprint(width, height) {
            if let Some(count) = self.overlap.get_mut(tile) {
                *count = count.saturating_sub(1);
            }
        }
    }

    #[inline]
    pub fn overlap(&self, tile: TilePosition) -> u16 {
        self.overlap.get(tile).unwrap_or(0)
    }

    #[inline]
    pub fn is_overlapped(&self, tile: TilePosition) -> bool {
        self.overlap(tile) > 0
    }

    /// Any in-bounds tile of the rectangle is overlapped. Out-of-bounds tiles are skipped.
    pub fn overlaps_anything(&self, origin: TilePosition, width: i32, height: i32) -> bool {
        origin
            .footprint(width, height)
            .any(|tile| self.is_overlapped(tile))
    }

    pub fn set_used(&mut self, tile: TilePosition, used: bool) {
        self.used.set(tile, used);
    }

    #[inline]
    pub fn is_used(&self, tile: TilePosition) -> bool {
        self.used.get(tile).unwrap_or(false)
    }

    pub fn reserve(&mut self, tile: TilePosition) {
        self.reserved.set(tile, 1);
    }

    pub fn unreserve(&mut self, tile: TilePosition) {
        self.reserved.set(tile, 0);
    }

    #[inline]
    pub fn is_reserved(&self, tile: TilePosition) -> bool {
        self.reserved.get(tile).unwrap_or(0) > 0
    }
}

/// A tile is walkable when at most one of its 16 walk cells is blocked.
pub fn is_walkable(data: &dyn MapDataSource, tile: TilePosition) -> bool {
    let start = tile.to_walk();
    let mut blocked = 0;
    for x in start.x..start.x + WALKS_PER_TILE {
        for y in start.y..start.y + WALKS_PER_TILE {
            let walk = WalkPosition::new(x, y);
            if !data.is_valid_walk(walk) {
                return false;
            }
            if !data.is_walk_cell_walkable(walk) {
                blocked += 1;
            }
        }
    }
    blocked <= 1
}

/// Number of rectangle tiles that belong to `area` or to no area at all.
/// Any out-of-bounds tile makes the whole rectangle count as zero.
pub fn tiles_within_area(
    data: &dyn MapDataSource,
    area: AreaId,
    origin: TilePosition,
    width: i32,
    height: i32,
) -> i32 {
    let mut count = 0;
    for tile in origin.footprint(width, height) {
        if !data.is_valid_tile(tile) {
            return 0;
        }
        match data.area_at(tile) {
            Some(id) if id != area => {}
            _ => count += 1,
        }
    }
    count
}
