use crate::building::FootprintCategory;
use crate::location::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A packed rectangle of building slots, grouped by size class.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Block {
    origin: TilePosition,
    width: i32,
    height: i32,
    small: BTreeSet<TilePosition>,
    medium: BTreeSet<TilePosition>,
    large: BTreeSet<TilePosition>,
}

impl Block {
    pub fn new(origin: TilePosition, width: i32, height: i32) -> Self {
        Block {
            origin,
            width,
            height,
            small: BTreeSet::new(),
            medium: BTreeSet::new(),
            large: BTreeSet::new(),
        }
    }

    pub fn origin(&self) -> TilePosition {
        self.origin
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn insert(&mut self, category: FootprintCategory, tile: TilePosition) {
        match category {
            FootprintCategory::Small => self.small.insert(tile),
            FootprintCategory::Medium => self.medium.insert(tile),
            FootprintCategory::Large => self.large.insert(tile),
        };
    }

    pub fn small_tiles(&self) -> &BTreeSet<TilePosition> {
        &self.small
    }

    pub fn medium_tiles(&self) -> &BTreeSet<TilePosition> {
        &self.medium
    }

    pub fn large_tiles(&self) -> &BTreeSet<TilePosition> {
        &self.large
    }

    pub fn tiles(&self, category: FootprintCategory) -> &BTreeSet<TilePosition> {
        match category {
            FootprintCategory::Small => &self.small,
            FootprintCategory::Medium => &self.medium,
            FootprintCategory::Large => &self.large,
        }
    }

    /// Every slot as (size class, top-left tile).
    pub fn placements(&self) -> impl Iterator<Item = (FootprintCategory, TilePosition)> + '_ {
        [
            FootprintCategory::Small,
            FootprintCategory::Medium,
            FootprintCategory::Large,
        ]
        .into_iter()
        .flat_map(move |category| self.tiles(category).iter().map(move |tile| (category, *tile)))
    }

    pub fn contains(&self, tile: TilePosition) -> bool {
        self.origin.footprint_contains(self.width, self.height, tile)
    }

    /// Tile at the middle of the block.
    pub fn center(&self) -> TilePosition {
        self.origin + (self.width / 2, self.height / 2)
    }
}
