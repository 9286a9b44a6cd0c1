//! Greedy packing of building blocks.
//!
//! Blocks are placed once, after the map is created: a start block beside the
//! main depot, an optional hidden tech block, and then as many stamps as fit,
//! largest first, on tiles ordered by walking distance from the natural choke.

use crate::block::Block;
use crate::building::Race;
use crate::location::*;
use crate::map::Map;
use crate::occupancy::is_walkable;
use crate::power::powers_cannon;
use crate::stamps::*;
use crate::terrain::*;
use log::*;

/// Search window around the main depot for the start block.
const START_BLOCK_X: (i32, i32) = (-9, 6);
const START_BLOCK_Y: (i32, i32) = (-6, 5);

/// Search radius around the main depot for the hidden tech block.
const TECH_BLOCK_RADIUS: i32 = 30;

const LARGEST_BLOCK_TILES: i32 = 108;
const SMALLEST_BLOCK_TILES: i32 = 4;
const TALLEST_BLOCK: i32 = 8;
const SHORTEST_BLOCK: i32 = 2;

impl<'a> Map<'a> {
    /// True if a `width` x `height` block fits at `origin` with a one-tile
    /// buildable border that is clear of other structures and mining space.
    pub fn can_add_block(&self, origin: TilePosition, width: i32, height: i32) -> bool {
        let corners = [
            origin,
            origin + (width - 1, 0),
            origin + (0, height - 1),
            origin + (width - 1, height - 1),
        ];
        for corner in corners.iter() {
            if !self.data.is_valid_tile(*corner)
                || !self.data.is_buildable(*corner)
                || self.grid.is_overlapped(*corner)
            {
                return false;
            }
        }

        for tile in (origin + (-1, -1)).footprint(width + 2, height + 2) {
            if !self.data.is_valid_tile(tile) || !self.data.is_buildable(tile) {
                return false;
            }
            if self.grid.is_overlapped(tile) || self.grid.is_used(tile) || self.grid.is_reserved(tile) {
                return false;
            }
            if self.overlaps_mining(tile) {
                return false;
            }
        }

        true
    }

    /// Place the race's stamp of the given size at `origin`. Returns false if
    /// there is no such stamp or the area already holds too many large slots.
    pub fn insert_block(&mut self, origin: TilePosition, width: i32, height: i32) -> bool {
        let stamp = match block_stamp(self.config.race, width, height) {
            Some(stamp) => stamp,
            None => return false,
        };

        if stamp.large_cost > 0 {
            if let Some(area) = self.data.area_at(origin) {
                let count = self.large_per_area.get(&area).copied().unwrap_or(0);
                if count + stamp.large_cost >= self.config.large_per_area_cap {
                    trace!("Area {:?} is full, skipping {} at {:?}", area, stamp.name, origin);
                    return false;
                }
                self.large_per_area.insert(area, count + stamp.large_cost);
            }
        }

        self.commit_block(&stamp, origin);
        true
    }

    fn commit_block(&mut self, stamp: &BlockStamp, origin: TilePosition) {
        let mut block = Block::new(origin, stamp.width, stamp.height);
        for (category, tile) in stamp.place_at(origin) {
            block.insert(category, tile);
        }

        self.grid.mark_occupied(origin, stamp.width, stamp.height);
        trace!("Placed block '{}' at {:?}", stamp.name, origin);
        self.blocks.push(block);
    }

    /// Remove the block containing `tile` and release its footprint.
    pub fn erase_block(&mut self, tile: TilePosition) -> bool {
        let index = match self.blocks.iter().position(|block| block.contains(tile)) {
            Some(index) => index,
            None => return false,
        };

        let block = self.blocks.remove(index);
        self.grid.clear_occupied(block.origin(), block.width(), block.height());

        if let Some(pylon) = self.start_block_pylon {
            if block.contains(pylon) {
                self.start_block_pylon = None;
            }
        }
        true
    }

    pub fn get_closest_block(&self, tile: TilePosition) -> Option<&Block> {
        let mut dist_best = f64::MAX;
        let mut best = None;
        for block in self.blocks.iter() {
            let dist = tile.distance_to(block.center());
            if dist < dist_best {
                dist_best = dist;
                best = Some(block);
            }
        }
        best
    }

    /// Place the start block, then greedily fill the map with stamps.
    pub fn find_blocks(&mut self) {
        self.find_start_block();

        let ordered = self.block_search_order();
        let (heights, widths) = block_dimensions(self.config.race);

        for tiles in (SMALLEST_BLOCK_TILES..=LARGEST_BLOCK_TILES).rev() {
            for height in (SHORTEST_BLOCK..=TALLEST_BLOCK).rev() {
                if tiles % height != 0 {
                    continue;
                }
                let width = tiles / height;
                if !heights.contains(&height) || !widths.contains(&width) {
                    continue;
                }
                if block_stamp(self.config.race, width, height).is_none() {
                    continue;
                }

                for tile in ordered.iter() {
                    if self.can_add_block(*tile, width, height) {
                        self.insert_block(*tile, width, height);
                    }
                }
            }
        }

        let small: usize = self.blocks.iter().map(|b| b.small_tiles().len()).sum();
        let medium: usize = self.blocks.iter().map(|b| b.medium_tiles().len()).sum();
        let large: usize = self.blocks.iter().map(|b| b.large_tiles().len()).sum();
        debug!(
            "Placed {} blocks: {} small, {} medium, {} large slots",
            self.blocks.len(),
            small,
            medium,
            large
        );
    }

    /// Buildable tiles ordered by walking distance from the natural choke (or
    /// the main when there is none). Tiles the walk cannot reach come last,
    /// by straight-line distance.
    fn block_search_order(&self) -> Vec<TilePosition> {
        let data = self.data;
        let seed = self
            .landmarks
            .natural_choke
            .and_then(|id| data.chokepoint(id))
            .map(|choke| choke.center_tile())
            .unwrap_or(self.landmarks.main_tile);

        let (walk_distance, _) = flood_fill_distance(data.width(), data.height(), &[seed], |tile| {
            is_walkable(data, tile)
        });

        let mut ordered: Vec<(u8, f64, TilePosition)> = walk_distance
            .iter()
            .map(|(tile, _)| tile)
            .filter(|tile| data.is_buildable(*tile))
            .map(|tile| match walk_distance.get(tile).flatten() {
                Some(dist) => (0, dist as f64, tile),
                None => (1, tile.distance_to(seed), tile),
            })
            .collect();

        ordered.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)).then(a.2.cmp(&b.2)));
        ordered.into_iter().map(|(_, _, tile)| tile).collect()
    }

    /// Place the race's production start block beside the main depot.
    ///
    /// Protoss prefers the spot whose power provider covers the most main
    /// station defenses; ties go to the spot closest to the main and its choke.
    pub fn find_start_block(&mut self) -> Option<TilePosition> {
        let race = self.config.race;
        let stamp = start_block_stamp(race)?;
        let main = self.landmarks.main_tile;
        let main_position = self.landmarks.main_position;
        let data = self.data;
        let choke_position = self
            .landmarks
            .main_choke
            .and_then(|id| data.chokepoint(id))
            .map(|choke| choke.center.to_position());

        let defenses: Vec<TilePosition> = self
            .get_closest_station(main)
            .map(|station| station.defenses().iter().copied().collect())
            .unwrap_or_default();

        // The depot's own footprint may sit inside the border of the block.
        let depot_marked = self.stations.iter().any(|station| station.location() == main);
        if depot_marked {
            self.grid.clear_occupied(main, 4, 3);
        }

        let mut best: Option<(TilePosition, BlockStamp)> = None;
        let mut powered_best = 0;
        let mut dist_best = f64::MAX;

        for x in main.x + START_BLOCK_X.0..=main.x + START_BLOCK_X.1 {
            for y in main.y + START_BLOCK_Y.0..=main.y + START_BLOCK_Y.1 {
                let tile = TilePosition::new(x, y);
                if !data.is_valid_tile(tile) {
                    continue;
                }
                if x + stamp.width >= main.x && x < main.x + 4 && y + stamp.height >= main.y && y < main.y + 3 {
                    continue;
                }
                if !self.can_add_block(tile, stamp.width, stamp.height) {
                    continue;
                }

                let block_center = tile.footprint_center(stamp.width, stamp.height);
                let dist = block_center.distance_to(main_position)
                    + choke_position.map_or(0.0, |choke| block_center.distance_to(choke));

                let candidate = if race == Race::Protoss {
                    stamp.mirrored(block_center.x < main_position.x, block_center.y < main_position.y)
                } else {
                    stamp.clone()
                };

                let powered = match (race, candidate.first_small()) {
                    (Race::Protoss, Some(offset)) => {
                        let pylon = tile + offset;
                        defenses.iter().filter(|defense| powers_cannon(pylon, **defense)).count()
                    }
                    _ => 0,
                };

                if powered > powered_best || (powered == powered_best && dist < dist_best) {
                    powered_best = powered;
                    dist_best = dist;
                    best = Some((tile, candidate));
                }
            }
        }

        if depot_marked {
            self.grid.mark_occupied(main, 4, 3);
        }

        let (tile, stamp) = match best {
            Some(best) => best,
            None => {
                debug!("No room for a start block near {:?}", main);
                return None;
            }
        };

        self.commit_block(&stamp, tile);
        if race == Race::Protoss {
            self.start_block_pylon = stamp.first_small().map(|offset| tile + offset);
        }

        debug!(
            "Start block at {:?}, {} station defenses powered",
            tile, powered_best
        );
        Some(tile)
    }

    /// Place the tech block inside the main as far from the main choke as possible.
    pub fn find_hidden_tech_block(&mut self) -> Option<TilePosition> {
        let stamp = tech_block_stamp(self.config.race)?;
        let data = self.data;
        let choke_position = self
            .landmarks
            .main_choke
            .and_then(|id| data.chokepoint(id))
            .map(|choke| choke.center.to_position())?;
        let main = self.landmarks.main_tile;

        let mut dist_best = 0.0;
        let mut best = None;
        for x in main.x - TECH_BLOCK_RADIUS..=main.x + TECH_BLOCK_RADIUS {
            for y in main.y - TECH_BLOCK_RADIUS..=main.y + TECH_BLOCK_RADIUS {
                let tile = TilePosition::new(x, y);
                if !data.is_valid_tile(tile) || data.area_at(tile) != self.landmarks.main_area {
                    continue;
                }

                let dist = tile
                    .footprint_center(stamp.width, stamp.height)
                    .distance_to(choke_position);
                if dist > dist_best && self.can_add_block(tile, stamp.width, stamp.height) {
                    dist_best = dist;
                    best = Some(tile);
                }
            }
        }

        let tile = best?;
        self.commit_block(&stamp, tile);
        debug!("Hidden tech block at {:?}", tile);
        Some(tile)
    }
}
