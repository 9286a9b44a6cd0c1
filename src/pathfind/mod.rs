//! Tile-grid path queries.
//!
//! Both algorithms take a collision predicate so the same code serves the
//! wall search (which needs to see its in-progress pieces) and external
//! callers (who only see committed state). Paths are returned source-first;
//! a query from a tile to itself yields that single tile, and an unreachable
//! target yields an empty path.

pub mod astar;
pub mod priority;

use crate::location::*;
use bitflags::*;
use serde::{Deserialize, Serialize};

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct PathFlags: u8 {
        const NONE = 0;
        /// Tiles under known buildings are passable.
        const IGNORE_USED = 1;
        /// Tiles covered by placed structures and neutrals are passable.
        const IGNORE_OVERLAP = 2;
        /// Wall segments are passable.
        const IGNORE_WALLS = 4;
        /// Allow the four diagonal moves.
        const DIAGONAL = 8;
        /// Only enter tiles in the source's area, the target's area, or no area.
        const SAME_AREA = 16;
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathAlgorithm {
    /// Priority-ordered flood from the source, used for wall hole finding.
    PriorityBfs,
    /// Informed search with 10/14 step costs and a Manhattan heuristic.
    AStar,
}

impl PathAlgorithm {
    pub fn find_path<F>(
        self,
        width: i32,
        height: i32,
        source: TilePosition,
        target: TilePosition,
        diagonal: bool,
        is_blocked: F,
    ) -> Vec<TilePosition>
    where
        F: Fn(TilePosition) -> bool,
    {
        match self {
            PathAlgorithm::PriorityBfs => {
                priority::find_path(width, height, source, target, diagonal, is_blocked)
            }
            PathAlgorithm::AStar => astar::find_path(width, height, source, target, diagonal, is_blocked),
        }
    }
}
