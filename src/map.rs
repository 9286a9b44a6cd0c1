//! The long-lived planning context.
//!
//! A [`Map`] is created once per game from a [`MapDataSource`] and owns every
//! placement result: stations, blocks, walls and the occupancy grid they all
//! write into. All queries and placement requests go through it.

use crate::block::Block;
use crate::building::*;
use crate::config::MapConfig;
use crate::location::*;
use crate::locator::*;
use crate::map_data::*;
use crate::occupancy::*;
use crate::pathfind::*;
use crate::station::*;
use crate::wall::{Wall, WallPiece};
use fnv::{FnvHashMap, FnvHashSet};
use log::*;

pub struct Map<'a> {
    pub(crate) data: &'a dyn MapDataSource,
    pub(crate) config: MapConfig,
    pub(crate) grid: OccupancyGrid,
    pub(crate) landmarks: Landmarks,
    pub(crate) stations: Vec<Station>,
    pub(crate) blocks: Vec<Block>,
    pub(crate) walls: Vec<Wall>,
    pub(crate) used_tiles: FnvHashSet<TilePosition>,
    /// Running large-building density per area, fed by capped block stamps.
    pub(crate) large_per_area: FnvHashMap<AreaId, u32>,
    pub(crate) start_block_pylon: Option<TilePosition>,
}

impl<'a> Map<'a> {
    /// Locate the main and natural, create every station and register neutral
    /// obstacles in the occupancy grid.
    pub fn new(data: &'a dyn MapDataSource, config: MapConfig) -> Self {
        let mut grid = OccupancyGrid::new(data.width(), data.height());
        let landmarks = locate(data);
        let stations = find_stations(data, config.race, &mut grid);

        for neutral in data.neutrals() {
            grid.mark_occupied(neutral.top_left, neutral.width, neutral.height);
        }

        debug!(
            "Map {}x{} ready: {} stations, {} neutrals",
            data.width(),
            data.height(),
            stations.len(),
            data.neutrals().len()
        );

        Map {
            data,
            config,
            grid,
            landmarks,
            stations,
            blocks: Vec::new(),
            walls: Vec::new(),
            used_tiles: FnvHashSet::default(),
            large_per_area: FnvHashMap::default(),
            start_block_pylon: None,
        }
    }

    pub fn data(&self) -> &'a dyn MapDataSource {
        self.data
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    pub fn landmarks(&self) -> &Landmarks {
        &self.landmarks
    }

    pub fn main_tile(&self) -> TilePosition {
        self.landmarks.main_tile
    }

    pub fn main_position(&self) -> Position {
        self.landmarks.main_position
    }

    pub fn main_area(&self) -> Option<AreaId> {
        self.landmarks.main_area
    }

    pub fn natural_tile(&self) -> Option<TilePosition> {
        self.landmarks.natural_tile
    }

    pub fn natural_position(&self) -> Option<Position> {
        self.landmarks.natural_position
    }

    pub fn natural_area(&self) -> Option<AreaId> {
        self.landmarks.natural_area
    }

    pub fn main_choke(&self) -> Option<ChokeId> {
        self.landmarks.main_choke
    }

    pub fn natural_choke(&self) -> Option<ChokeId> {
        self.landmarks.natural_choke
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    pub fn used_tiles(&self) -> &FnvHashSet<TilePosition> {
        &self.used_tiles
    }

    /// Power provider slot of the start block, if one was placed.
    pub fn start_block_pylon(&self) -> Option<TilePosition> {
        self.start_block_pylon
    }

    /// Mark and clear the same rectangle in the overlap grid.
    pub fn mark_occupied(&mut self, origin: TilePosition, width: i32, height: i32) {
        self.grid.mark_occupied(origin, width, height);
    }

    pub fn clear_occupied(&mut self, origin: TilePosition, width: i32, height: i32) {
        self.grid.clear_occupied(origin, width, height);
    }

    pub fn reserve_tile(&mut self, tile: TilePosition) {
        self.grid.reserve(tile);
    }

    pub fn unreserve_tile(&mut self, tile: TilePosition) {
        self.grid.unreserve(tile);
    }

    //
    // Building bookkeeping.
    //

    pub fn on_building_discovered(&mut self, tile: TilePosition, building: &BuildingType) {
        for t in tile.footprint(building.tile_width, building.tile_height) {
            if !self.data.is_valid_tile(t) {
                continue;
            }
            self.used_tiles.insert(t);
            self.grid.set_used(t, true);
        }
    }

    /// A morph replaces the footprint in place, which is recorded the same way as a discovery.
    pub fn on_building_morphed(&mut self, tile: TilePosition, building: &BuildingType) {
        self.on_building_discovered(tile, building);
    }

    pub fn on_building_destroyed(&mut self, tile: TilePosition, building: &BuildingType) {
        for t in tile.footprint(building.tile_width, building.tile_height) {
            if !self.data.is_valid_tile(t) {
                continue;
            }
            self.used_tiles.remove(&t);
            self.grid.set_used(t, false);
        }
    }

    //
    // Placement queries.
    //

    /// True if `building` can be placed with its top-left corner at `tile`.
    pub fn is_placeable(&self, building: &BuildingType, tile: TilePosition) -> bool {
        for x in tile.x..tile.x + building.tile_width {
            if building.requires_creep() && !self.data.is_buildable(TilePosition::new(x, tile.y + 2)) {
                return false;
            }

            for y in tile.y..tile.y + building.tile_height {
                let t = TilePosition::new(x, y);
                if !self.data.is_valid_tile(t) || !self.data.is_buildable(t) {
                    return false;
                }
                if self.grid.is_used(t) || self.grid.is_reserved(t) {
                    return false;
                }
                if building.is_resource_depot() && !self.data.can_build_here(t, building) {
                    return false;
                }
                if self.data.has_creep(t) {
                    return false;
                }
            }
        }
        true
    }

    pub fn overlaps_anything(&self, origin: TilePosition, width: i32, height: i32) -> bool {
        self.grid.overlaps_anything(origin, width, height)
    }

    pub fn overlaps_mining(&self, tile: TilePosition) -> bool {
        overlaps_mining(&self.stations, tile, self.config.mining_radius)
    }

    pub fn overlaps_walls(&self, tile: TilePosition) -> bool {
        self.walls.iter().any(|wall| wall.covers(tile))
    }

    /// Closest placeable block slot of the building's size class.
    pub fn get_build_position(
        &self,
        building: &BuildingType,
        search_center: TilePosition,
        skip_power_check: bool,
    ) -> Option<TilePosition> {
        let category = building.category();
        let mut dist_best = f64::MAX;
        let mut tile_best = None;

        for block in self.blocks.iter() {
            for tile in block.tiles(category).iter() {
                let dist = tile.distance_to(search_center);
                if dist < dist_best
                    && self.is_placeable(building, *tile)
                    && (skip_power_check
                        || !building.requires_power()
                        || self.data.has_power(*tile, building))
                {
                    dist_best = dist;
                    tile_best = Some(*tile);
                }
            }
        }

        tile_best
    }

    /// Closest placeable defense slot of any wall or station.
    pub fn get_def_build_position(
        &self,
        building: &BuildingType,
        search_center: TilePosition,
    ) -> Option<TilePosition> {
        let wall_defenses = self.walls.iter().flat_map(|wall| wall.defenses().iter());
        let station_defenses = self.stations.iter().flat_map(|station| station.defenses().iter());

        let mut dist_best = f64::MAX;
        let mut tile_best = None;
        for tile in wall_defenses.chain(station_defenses) {
            let dist = tile.distance_to(search_center);
            if dist < dist_best && self.is_placeable(building, *tile) {
                dist_best = dist;
                tile_best = Some(*tile);
            }
        }

        tile_best
    }

    pub fn get_closest_station(&self, tile: TilePosition) -> Option<&Station> {
        let mut dist_best = f64::MAX;
        let mut best = None;
        for station in self.stations.iter() {
            let dist = tile.distance_to(station.location());
            if dist < dist_best {
                dist_best = dist;
                best = Some(station);
            }
        }
        best
    }

    //
    // Paths.
    //

    /// Priority-ordered search between two tiles.
    pub fn find_path(&self, source: TilePosition, target: TilePosition, flags: PathFlags) -> Vec<TilePosition> {
        self.find_path_with(PathAlgorithm::PriorityBfs, source, target, flags, &[])
    }

    /// A* search between two tiles.
    pub fn find_path_astar(
        &self,
        source: TilePosition,
        target: TilePosition,
        flags: PathFlags,
    ) -> Vec<TilePosition> {
        self.find_path_with(PathAlgorithm::AStar, source, target, flags, &[])
    }

    /// Path query that also treats `pieces` (an in-progress wall) as walls.
    pub(crate) fn find_path_with(
        &self,
        algorithm: PathAlgorithm,
        source: TilePosition,
        target: TilePosition,
        flags: PathFlags,
        pieces: &[WallPiece],
    ) -> Vec<TilePosition> {
        let source_area = self.data.area_at(source);
        let target_area = self.data.area_at(target);

        algorithm.find_path(
            self.data.width(),
            self.data.height(),
            source,
            target,
            flags.contains(PathFlags::DIAGONAL),
            |tile| self.is_path_blocked(tile, flags, source_area, target_area, pieces),
        )
    }

    fn is_path_blocked(
        &self,
        tile: TilePosition,
        flags: PathFlags,
        source_area: Option<AreaId>,
        target_area: Option<AreaId>,
        pieces: &[WallPiece],
    ) -> bool {
        if !self.data.is_valid_tile(tile) || !is_walkable(self.data, tile) {
            return true;
        }
        if !flags.contains(PathFlags::IGNORE_OVERLAP) && self.grid.is_overlapped(tile) {
            return true;
        }
        if !flags.contains(PathFlags::IGNORE_USED) && self.grid.is_used(tile) {
            return true;
        }
        if !flags.contains(PathFlags::IGNORE_WALLS)
            && (pieces.iter().any(|piece| piece.covers(tile)) || self.overlaps_walls(tile))
        {
            return true;
        }
        if flags.contains(PathFlags::SAME_AREA) {
            if let Some(area) = self.data.area_at(tile) {
                if Some(area) != source_area && Some(area) != target_area {
                    return true;
                }
            }
        }
        false
    }
}
