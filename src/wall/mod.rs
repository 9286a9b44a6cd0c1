//! Walls: sets of buildings placed across a chokepoint.
//!
//! A wall request names an area, one of its chokes and the buildings to use.
//! [`Map::create_wall`] searches every unique ordering of those buildings for
//! the best arrangement, commits it to the occupancy grid, finds a door tile
//! and optionally adds static defenses behind it.

mod defense;
mod hole;
mod search;
mod tight;

pub use tight::{is_wall_tight, tightness_factor};

use crate::building::*;
use crate::location::*;
use crate::map::Map;
use crate::map_data::*;
use crate::pathfind::PathFlags;
use crate::terrain::NEIGHBORS_4;
use fnv::FnvHashSet;
use log::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use search::WallSearch;

/// A building of an in-progress wall.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WallPiece {
    pub tile: TilePosition,
    pub building: BuildingType,
}

impl WallPiece {
    pub fn new(tile: TilePosition, building: BuildingType) -> Self {
        WallPiece { tile, building }
    }

    #[inline]
    pub fn covers(&self, tile: TilePosition) -> bool {
        self.tile
            .footprint_contains(self.building.tile_width, self.building.tile_height, tile)
    }

    /// True if this piece shares a tile with a `width` x `height` rectangle at `origin`.
    pub fn intersects(&self, origin: TilePosition, width: i32, height: i32) -> bool {
        origin.x < self.tile.x + self.building.tile_width
            && self.tile.x < origin.x + width
            && origin.y < self.tile.y + self.building.tile_height
            && self.tile.y < origin.y + height
    }
}

pub(crate) fn covered_by(pieces: &[WallPiece], tile: TilePosition) -> bool {
    pieces.iter().any(|piece| piece.covers(tile))
}

/// A committed wall segment.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub tile: TilePosition,
    pub width: i32,
    pub height: i32,
    pub category: FootprintCategory,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Wall {
    area: AreaId,
    choke: ChokeId,
    segments: Vec<Segment>,
    defenses: BTreeSet<TilePosition>,
    door: Option<TilePosition>,
    centroid: Position,
}

impl Wall {
    pub fn area(&self) -> AreaId {
        self.area
    }

    pub fn choke(&self) -> ChokeId {
        self.choke
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Top-left tiles of the segments of one size class.
    pub fn tiles(&self, category: FootprintCategory) -> BTreeSet<TilePosition> {
        self.segments
            .iter()
            .filter(|segment| segment.category == category)
            .map(|segment| segment.tile)
            .collect()
    }

    pub fn small_tiles(&self) -> BTreeSet<TilePosition> {
        self.tiles(FootprintCategory::Small)
    }

    pub fn medium_tiles(&self) -> BTreeSet<TilePosition> {
        self.tiles(FootprintCategory::Medium)
    }

    pub fn large_tiles(&self) -> BTreeSet<TilePosition> {
        self.tiles(FootprintCategory::Large)
    }

    pub fn defenses(&self) -> &BTreeSet<TilePosition> {
        &self.defenses
    }

    /// Walkable tile next to the wall that units pass through.
    pub fn door(&self) -> Option<TilePosition> {
        self.door
    }

    /// Average pixel center of the non-power segments.
    pub fn centroid(&self) -> Position {
        self.centroid
    }

    /// True if a segment or defense of this wall covers `tile`.
    pub fn covers(&self, tile: TilePosition) -> bool {
        self.segments
            .iter()
            .any(|segment| segment.tile.footprint_contains(segment.width, segment.height, tile))
            || self
                .defenses
                .iter()
                .any(|defense| defense.footprint_contains(2, 2, tile))
    }
}

/// Parameters of one wall search.
#[derive(Clone, Debug)]
pub struct WallRequest {
    pub area: AreaId,
    pub choke: ChokeId,
    pub buildings: Vec<BuildingType>,
    pub defenses: Vec<BuildingType>,
    /// Smallest unit the wall must keep out. `None` means any gap below a tile counts.
    pub tight: Option<UnitSize>,
    /// Keep a walkable path through the wall and reserve it.
    pub reserve_path: bool,
    /// Reject walls that leave a gap.
    pub require_tight: bool,
}

impl WallRequest {
    pub fn new(area: AreaId, choke: ChokeId) -> Self {
        WallRequest {
            area,
            choke,
            buildings: Vec::new(),
            defenses: Vec::new(),
            tight: None,
            reserve_path: false,
            require_tight: false,
        }
    }

    pub fn building(mut self, building: BuildingType) -> Self {
        self.buildings.push(building);
        self
    }

    pub fn buildings<I: IntoIterator<Item = BuildingType>>(mut self, buildings: I) -> Self {
        self.buildings.extend(buildings);
        self
    }

    pub fn defense(mut self, building: BuildingType) -> Self {
        self.defenses.push(building);
        self
    }

    pub fn tight(mut self, size: UnitSize) -> Self {
        self.tight = Some(size);
        self
    }

    pub fn reserve_path(mut self, reserve: bool) -> Self {
        self.reserve_path = reserve;
        self
    }

    pub fn require_tight(mut self, require: bool) -> Self {
        self.require_tight = require;
        self
    }
}

/// Terrain facts shared by every probe of one wall search.
pub(crate) struct WallContext<'a> {
    pub area: &'a Area,
    pub choke: &'a ChokePoint,
    pub choke_center: TilePosition,
    /// Tiles under the choke's geometry; holes are only looked for here.
    pub geometry: FnvHashSet<TilePosition>,
    /// Depot location of the area's base nearest the choke.
    pub wall_base: Option<TilePosition>,
    pub start_tile: TilePosition,
    pub end_tile: TilePosition,
}

impl<'a> Map<'a> {
    pub(crate) fn wall_context(&self, area: AreaId, choke: ChokeId) -> Option<WallContext<'a>> {
        let data = self.data;
        let area = data.area(area)?;
        let choke = data.chokepoint(choke)?;
        let choke_position = choke.center.to_position();

        let wall_base = area
            .bases
            .iter()
            .filter_map(|id| data.base(*id))
            .min_by(|a, b| {
                a.center()
                    .distance_to(choke_position)
                    .total_cmp(&b.center().distance_to(choke_position))
            })
            .map(|base| base.location);

        let (start_tile, end_tile) = self.wall_endpoints(area, choke);

        Some(WallContext {
            area,
            choke,
            choke_center: choke.center_tile(),
            geometry: choke.geometry.iter().map(|walk| walk.to_tile()).collect(),
            wall_base,
            start_tile,
            end_tile,
        })
    }

    /// Search for and commit a wall. Returns the existing wall if one was
    /// already built for the same area and choke.
    pub fn create_wall(&mut self, request: &WallRequest) -> Option<&Wall> {
        if let Some(index) = self.wall_index(request.area, request.choke) {
            return self.walls.get(index);
        }
        if request.buildings.is_empty() {
            return None;
        }

        let ctx = match self.wall_context(request.area, request.choke) {
            Some(ctx) => ctx,
            None => {
                debug!("Unknown area {:?} or choke {:?} for wall", request.area, request.choke);
                return None;
            }
        };

        let pieces = WallSearch::new(self, &ctx, request).run()?;
        let index = self.commit_wall(&ctx, request, pieces)?;

        for defense in request.defenses.iter() {
            self.add_to_wall(defense, request.area, request.choke);
        }

        self.walls.get(index)
    }

    fn commit_wall(
        &mut self,
        ctx: &WallContext<'a>,
        request: &WallRequest,
        pieces: Vec<WallPiece>,
    ) -> Option<usize> {
        for piece in pieces.iter() {
            self.grid
                .mark_occupied(piece.tile, piece.building.tile_width, piece.building.tile_height);
        }

        let probe = self.find_hole(ctx, &pieces, PathFlags::IGNORE_USED);
        if request.require_tight && probe.hole.is_some() {
            for piece in pieces.iter() {
                self.grid
                    .clear_occupied(piece.tile, piece.building.tile_width, piece.building.tile_height);
            }
            debug!("Wall at choke {:?} leaves a hole at {:?}", ctx.choke.id, probe.hole);
            return None;
        }

        // A sealed wall has no path through it, so look for the door as if it were open.
        let door_path = if probe.path.is_empty() {
            let flags = PathFlags::IGNORE_USED | PathFlags::IGNORE_OVERLAP | PathFlags::IGNORE_WALLS;
            self.find_hole(ctx, &pieces, flags).path
        } else {
            probe.path.clone()
        };
        let door = door_path.iter().copied().find(|tile| {
            !covered_by(&pieces, *tile)
                && NEIGHBORS_4
                    .iter()
                    .any(|offset| covered_by(&pieces, *tile + *offset))
        });

        if request.reserve_path {
            for tile in probe.path.iter() {
                self.grid.reserve(*tile);
            }
        }

        let mut bodies: Vec<&WallPiece> = pieces
            .iter()
            .filter(|piece| !piece.building.is_power_provider())
            .collect();
        if bodies.is_empty() {
            bodies = pieces.iter().collect();
        }
        let mut total = Position::default();
        for piece in bodies.iter() {
            total = total + piece.tile.footprint_center(piece.building.tile_width, piece.building.tile_height);
        }
        let centroid = total / bodies.len().max(1) as i32;

        let wall = Wall {
            area: ctx.area.id,
            choke: ctx.choke.id,
            segments: pieces
                .iter()
                .map(|piece| Segment {
                    tile: piece.tile,
                    width: piece.building.tile_width,
                    height: piece.building.tile_height,
                    category: piece.building.category(),
                })
                .collect(),
            defenses: BTreeSet::new(),
            door,
            centroid,
        };

        debug!(
            "Wall at choke {:?}: {} segments, door {:?}",
            wall.choke,
            wall.segments.len(),
            wall.door
        );
        self.walls.push(wall);
        Some(self.walls.len() - 1)
    }

    fn wall_index(&self, area: AreaId, choke: ChokeId) -> Option<usize> {
        self.walls
            .iter()
            .position(|wall| wall.area == area && wall.choke == choke)
    }

    /// First wall matching the given area and/or choke. Both `None` matches nothing.
    pub fn get_wall(&self, area: Option<AreaId>, choke: Option<ChokeId>) -> Option<&Wall> {
        if area.is_none() && choke.is_none() {
            return None;
        }
        self.walls.iter().find(|wall| {
            area.map_or(true, |area| wall.area == area) && choke.map_or(true, |choke| wall.choke == choke)
        })
    }

    pub fn get_closest_wall(&self, tile: TilePosition) -> Option<&Wall> {
        let data = self.data;
        let mut dist_best = f64::MAX;
        let mut best = None;
        for wall in self.walls.iter() {
            let center = match data.chokepoint(wall.choke) {
                Some(choke) => choke.center_tile(),
                None => continue,
            };
            let dist = tile.distance_to(center);
            if dist < dist_best {
                dist_best = dist;
                best = Some(wall);
            }
        }
        best
    }
}

/// Two areas split by a row of rock at y = 10 with a gap of `gap_width`
/// tiles starting at `gap_x`. The choke spans the gap.
#[cfg(test)]
pub(crate) fn gap_map(gap_x: i32, gap_width: i32) -> StaticMapData {
    let mut data = StaticMapData::open(20, 20);
    data.set_blocked_rect(TilePosition::new(0, 10), gap_x, 1)
        .set_blocked_rect(TilePosition::new(gap_x + gap_width, 10), 20 - gap_x - gap_width, 1)
        .assign_area(TilePosition::new(0, 0), 20, 10, AreaId(1))
        .assign_area(TilePosition::new(0, 11), 20, 9, AreaId(2))
        .add_area(Area {
            id: AreaId(1),
            top: WalkPosition::new(40, 12),
            chokepoints: vec![],
            accessible_neighbours: vec![],
            bases: vec![],
        })
        .add_area(Area {
            id: AreaId(2),
            top: WalkPosition::new(40, 64),
            chokepoints: vec![],
            accessible_neighbours: vec![],
            bases: vec![],
        })
        .add_chokepoint(ChokePoint {
            id: ChokeId(0),
            areas: (AreaId(1), AreaId(2)),
            center: WalkPosition::new((2 * gap_x + gap_width) * 2, 41),
            geometry: (gap_x * 4..(gap_x + gap_width) * 4)
                .map(|x| WalkPosition::new(x, 41))
                .collect(),
            blocked: false,
        });
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapConfig;

    const GATEWAY: BuildingType = BuildingType::new("gateway", 4, 3);
    const DEPOT: BuildingType = BuildingType::new("depot", 2, 2);
    const CANNON: BuildingType = BuildingType::new("cannon", 2, 2);
    const FORGE: BuildingType = BuildingType::new("forge", 3, 2);
    const PYLON: BuildingType = BuildingType::new("pylon", 2, 2).with_flags(BuildingFlags::POWER_PROVIDER);

    fn overlap_snapshot(map: &Map) -> Vec<u16> {
        TilePosition::new(0, 0)
            .footprint(20, 20)
            .map(|tile| map.grid().overlap(tile))
            .collect()
    }

    #[test]
    fn test_tight_wall_seals_choke() {
        let data = gap_map(8, 4);
        let mut map = Map::new(&data, MapConfig::default());
        let request = WallRequest::new(AreaId(1), ChokeId(0))
            .buildings([GATEWAY, DEPOT])
            .require_tight(true);

        let wall = map.create_wall(&request).unwrap().clone();
        assert_eq!(wall.segments().len(), 2);
        assert_eq!(wall.large_tiles().len(), 1);
        assert_eq!(wall.small_tiles().len(), 1);

        let min_x = wall.segments().iter().map(|s| s.tile.x).min().unwrap();
        let max_x = wall.segments().iter().map(|s| s.tile.x + s.width).max().unwrap();
        assert!(min_x <= 8 && max_x >= 12);
        for x in 8..12 {
            let tile = TilePosition::new(x, 10);
            assert!(wall.covers(tile));
            assert!(map.grid().is_overlapped(tile));
        }

        let door = wall.door().unwrap();
        assert!((8..12).contains(&door.x));
        assert!(!wall.covers(door));

        let sealed = map.find_path(TilePosition::new(10, 3), TilePosition::new(10, 16), PathFlags::NONE);
        assert!(sealed.is_empty());
    }

    #[test]
    fn test_failed_wall_leaves_no_trace() {
        let data = gap_map(6, 8);
        let mut map = Map::new(&data, MapConfig::default());
        let before = overlap_snapshot(&map);
        let request = WallRequest::new(AreaId(1), ChokeId(0))
            .buildings([DEPOT, DEPOT])
            .require_tight(true)
            .defense(CANNON);

        assert!(map.create_wall(&request).is_none());
        assert!(map.walls().is_empty());
        assert_eq!(overlap_snapshot(&map), before);
        assert!(TilePosition::new(0, 0)
            .footprint(20, 20)
            .all(|tile| !map.grid().is_reserved(tile)));
    }

    #[test]
    fn test_reserved_path_stays_open() {
        let data = gap_map(8, 4);
        let mut map = Map::new(&data, MapConfig::default());
        let request = WallRequest::new(AreaId(1), ChokeId(0))
            .building(DEPOT)
            .reserve_path(true);

        let wall = map.create_wall(&request).unwrap().clone();
        let reserved: Vec<TilePosition> = TilePosition::new(0, 0)
            .footprint(20, 20)
            .filter(|tile| map.grid().is_reserved(*tile))
            .collect();

        assert!(reserved.iter().any(|tile| tile.y == 10 && (8..12).contains(&tile.x)));
        assert!(reserved.iter().all(|tile| !wall.covers(*tile)));
        assert!(!map.is_placeable(&DEPOT, reserved[0]));
    }

    #[test]
    fn test_defense_goes_behind_wall() {
        let data = gap_map(8, 4);
        let mut map = Map::new(&data, MapConfig::default());
        let request = WallRequest::new(AreaId(1), ChokeId(0))
            .buildings([GATEWAY, DEPOT])
            .require_tight(true)
            .defense(CANNON);

        let wall = map.create_wall(&request).unwrap().clone();
        assert_eq!(wall.defenses().len(), 1);
        let defense = *wall.defenses().iter().next().unwrap();
        assert!(defense.y < 10);
        assert!(map.grid().overlaps_anything(defense, 2, 2));
        assert_eq!(map.get_def_build_position(&CANNON, TilePosition::new(10, 0)), Some(defense));
        assert!(defense.footprint_center(2, 2).distance_to(TilePosition::new(10, 16).to_position())
            > wall.centroid().distance_to(TilePosition::new(10, 16).to_position()));
    }

    #[test]
    fn test_wall_lookups() {
        let data = gap_map(8, 4);
        let mut map = Map::new(&data, MapConfig::default());
        assert!(map.get_closest_wall(TilePosition::new(0, 0)).is_none());

        let request = WallRequest::new(AreaId(1), ChokeId(0))
            .buildings([GATEWAY, DEPOT])
            .require_tight(true);
        map.create_wall(&request).unwrap();

        assert!(map.get_wall(Some(AreaId(1)), None).is_some());
        assert!(map.get_wall(None, Some(ChokeId(0))).is_some());
        assert!(map.get_wall(Some(AreaId(2)), Some(ChokeId(0))).is_none());
        assert!(map.get_wall(None, None).is_none());
        assert_eq!(map.get_closest_wall(TilePosition::new(0, 0)).unwrap().choke(), ChokeId(0));

        // A second request for the same choke returns the existing wall.
        map.create_wall(&request).unwrap();
        assert_eq!(map.walls().len(), 1);
    }

    #[test]
    fn test_unknown_choke_or_empty_request() {
        let data = gap_map(8, 4);
        let mut map = Map::new(&data, MapConfig::default());
        assert!(map.create_wall(&WallRequest::new(AreaId(1), ChokeId(0))).is_none());
        assert!(map
            .create_wall(&WallRequest::new(AreaId(1), ChokeId(7)).building(DEPOT))
            .is_none());
    }

    #[test]
    fn test_power_provider_goes_last() {
        let data = gap_map(8, 4);
        let mut map = Map::new(&data, MapConfig::default());
        let request = WallRequest::new(AreaId(1), ChokeId(0)).buildings([PYLON, GATEWAY, FORGE]);

        let wall = map.create_wall(&request).unwrap().clone();
        let segments = wall.segments();
        assert_eq!(segments.len(), 3);

        let pylon = segments[2];
        assert_eq!((pylon.width, pylon.height), (2, 2));
        for segment in &segments[..2] {
            assert_ne!((segment.width, segment.height), (2, 2));
            assert!(crate::power::powers_piece(pylon.tile, segment.tile, segment.width));
        }

        let mut total = Position::default();
        for segment in &segments[..2] {
            total = total + segment.tile.footprint_center(segment.width, segment.height);
        }
        assert_eq!(wall.centroid(), total / 2);
    }

    #[test]
    fn test_wall_around_unbuildable_choke_center() {
        let mut data = gap_map(8, 4);
        data.set_unbuildable(TilePosition::new(10, 10));
        let mut map = Map::new(&data, MapConfig::default());
        let request = WallRequest::new(AreaId(1), ChokeId(0)).buildings([GATEWAY, DEPOT]);

        let wall = map.create_wall(&request).unwrap().clone();
        assert_eq!(wall.segments().len(), 2);
        assert!(!wall.covers(TilePosition::new(10, 10)));
        for segment in wall.segments() {
            assert!(segment
                .tile
                .footprint(segment.width, segment.height)
                .all(|tile| data.is_buildable(tile)));
        }
    }
}
