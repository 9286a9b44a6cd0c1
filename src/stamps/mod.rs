pub mod protoss;
pub mod terran;

use crate::building::*;
use crate::location::*;

/// A placement within a block stamp: a size class at an offset from the block's top-left tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StampPlacement {
    pub category: FootprintCategory,
    pub dx: i32,
    pub dy: i32,
}

/// A canned arrangement of building slots filling a `width` x `height` block.
#[derive(Clone, Debug)]
pub struct BlockStamp {
    pub name: &'static str,
    pub width: i32,
    pub height: i32,
    pub placements: Vec<StampPlacement>,
    /// How much this stamp adds to its area's large-building density counter.
    /// Zero means the stamp is not capped.
    pub large_cost: u32,
}

impl BlockStamp {
    /// All placements with absolute coordinates given the block's top-left tile.
    pub fn place_at(&self, anchor: TilePosition) -> Vec<(FootprintCategory, TilePosition)> {
        self.placements
            .iter()
            .map(|p| (p.category, anchor + (p.dx, p.dy)))
            .collect()
    }

    /// Flip the stamp left-right and/or top-bottom within its own rectangle.
    pub fn mirrored(&self, horizontal: bool, vertical: bool) -> BlockStamp {
        BlockStamp {
            placements: self
                .placements
                .iter()
                .map(|p| {
                    let (fw, fh) = p.category.tile_size();
                    StampPlacement {
                        category: p.category,
                        dx: if horizontal { self.width - p.dx - fw } else { p.dx },
                        dy: if vertical { self.height - p.dy - fh } else { p.dy },
                    }
                })
                .collect(),
            ..self.clone()
        }
    }

    /// Offset of the first small slot (the power provider slot for Protoss layouts).
    pub fn first_small(&self) -> Option<(i32, i32)> {
        self.placements
            .iter()
            .find(|p| p.category == FootprintCategory::Small)
            .map(|p| (p.dx, p.dy))
    }

    /// Every slot lies inside the block and no two slots share a tile.
    pub fn validate(&self) -> bool {
        let mut seen = std::collections::HashSet::new();
        for p in &self.placements {
            let (fw, fh) = p.category.tile_size();
            if p.dx < 0 || p.dy < 0 || p.dx + fw > self.width || p.dy + fh > self.height {
                return false;
            }
            for tile in TilePosition::new(p.dx, p.dy).footprint(fw, fh) {
                if !seen.insert(tile) {
                    return false;
                }
            }
        }
        !self.placements.is_empty()
    }
}

/// Helper to create a small slot.
pub fn small(dx: i32, dy: i32) -> StampPlacement {
    StampPlacement {
        category: FootprintCategory::Small,
        dx,
        dy,
    }
}

/// Helper to create a medium slot.
pub fn medium(dx: i32, dy: i32) -> StampPlacement {
    StampPlacement {
        category: FootprintCategory::Medium,
        dx,
        dy,
    }
}

/// Helper to create a large slot.
pub fn large(dx: i32, dy: i32) -> StampPlacement {
    StampPlacement {
        category: FootprintCategory::Large,
        dx,
        dy,
    }
}

/// Every block stamp available to `race`. Zerg does not use blocks.
pub fn block_stamps(race: Race) -> Vec<BlockStamp> {
    match race {
        Race::Protoss => protoss::protoss_stamps(),
        Race::Terran => terran::terran_stamps(),
        Race::Zerg => Vec::new(),
    }
}

pub fn block_stamp(race: Race, width: i32, height: i32) -> Option<BlockStamp> {
    block_stamps(race)
        .into_iter()
        .find(|stamp| stamp.width == width && stamp.height == height)
}

const PROTOSS_HEIGHTS: &[i32] = &[2, 4, 5, 6, 7, 8];
const PROTOSS_WIDTHS: &[i32] = &[2, 4, 5, 8, 9, 10, 13, 17, 18];
const TERRAN_HEIGHTS: &[i32] = &[2, 4, 5, 6];
const TERRAN_WIDTHS: &[i32] = &[3, 6, 10];
const NO_SIZES: &[i32] = &[];

/// Block sizes considered by the greedy packer, as (allowed heights, allowed widths).
pub fn block_dimensions(race: Race) -> (&'static [i32], &'static [i32]) {
    match race {
        Race::Protoss => (PROTOSS_HEIGHTS, PROTOSS_WIDTHS),
        Race::Terran => (TERRAN_HEIGHTS, TERRAN_WIDTHS),
        Race::Zerg => (NO_SIZES, NO_SIZES),
    }
}

/// Production block placed next to the main before greedy packing.
pub fn start_block_stamp(race: Race) -> Option<BlockStamp> {
    match race {
        Race::Protoss => Some(protoss::start_block()),
        Race::Terran => Some(terran::start_block()),
        Race::Zerg => None,
    }
}

/// Tech block tucked away from the main choke.
pub fn tech_block_stamp(race: Race) -> Option<BlockStamp> {
    match race {
        Race::Protoss => Some(protoss::tech_block()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_stamps_are_valid() {
        for race in [Race::Protoss, Race::Terran] {
            let (heights, widths) = block_dimensions(race);
            for stamp in block_stamps(race) {
                assert!(stamp.validate(), "{} is invalid", stamp.name);
                assert!(heights.contains(&stamp.height), "{} height not packed", stamp.name);
                assert!(widths.contains(&stamp.width), "{} width not packed", stamp.name);
                for (h, v) in [(true, false), (false, true), (true, true)] {
                    assert!(stamp.mirrored(h, v).validate(), "{} mirror is invalid", stamp.name);
                }
            }
        }
        assert!(block_stamps(Race::Zerg).is_empty());
    }

    #[test]
    fn test_mirror_start_block() {
        let stamp = start_block_stamp(Race::Protoss).unwrap();
        assert_eq!(stamp.first_small(), Some((0, 0)));
        assert_eq!(stamp.mirrored(true, false).first_small(), Some((6, 0)));
        assert_eq!(stamp.mirrored(false, true).first_small(), Some((0, 3)));
        assert_eq!(stamp.mirrored(true, true).first_small(), Some((6, 3)));

        let both = stamp.mirrored(true, true);
        assert!(both.placements.contains(&large(0, 0)));
        assert!(both.placements.contains(&large(4, 0)));
        assert!(both.placements.contains(&medium(0, 3)));
        assert!(both.placements.contains(&medium(3, 3)));
    }

    #[test]
    fn test_lookup() {
        let stamp = block_stamp(Race::Protoss, 2, 4).unwrap();
        assert_eq!(stamp.placements.len(), 2);
        assert!(block_stamp(Race::Protoss, 3, 3).is_none());
        assert_eq!(block_stamp(Race::Terran, 10, 6).unwrap().large_cost, 4);
        let placed = block_stamp(Race::Terran, 3, 2)
            .unwrap()
            .place_at(TilePosition::new(5, 5));
        assert_eq!(placed, vec![(FootprintCategory::Medium, TilePosition::new(5, 5))]);
    }
}
