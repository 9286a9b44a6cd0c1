//! Read-only view of the terrain decomposition and the static game state.
//!
//! The planner never computes areas, chokepoints or bases itself; it queries
//! them through [`MapDataSource`]. [`StaticMapData`] is a self-contained
//! in-memory implementation used for offline planning and tests.

use crate::building::BuildingType;
use crate::location::*;
use crate::terrain::*;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AreaId(pub u16);

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChokeId(pub u16);

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BaseId(pub u16);

/// A maximal connected region of walkable terrain.
#[derive(Clone, Debug)]
pub struct Area {
    pub id: AreaId,
    /// Interior reference point (the highest-altitude walk cell).
    pub top: WalkPosition,
    pub chokepoints: Vec<ChokeId>,
    pub accessible_neighbours: Vec<AreaId>,
    pub bases: Vec<BaseId>,
}

/// A narrow connector between two areas.
#[derive(Clone, Debug)]
pub struct ChokePoint {
    pub id: ChokeId,
    pub areas: (AreaId, AreaId),
    pub center: WalkPosition,
    /// Walk cells spanning the choke from one side wall to the other.
    pub geometry: Vec<WalkPosition>,
    pub blocked: bool,
}

impl ChokePoint {
    /// The area on the other side of this choke from `area`.
    pub fn other_area(&self, area: AreaId) -> AreaId {
        if self.areas.0 == area {
            self.areas.1
        } else {
            self.areas.0
        }
    }

    pub fn center_tile(&self) -> TilePosition {
        self.center.to_tile()
    }

    /// Walkable width of the choke in whole tiles (at least 1).
    pub fn width_in_tiles(&self) -> i32 {
        let (first, last) = match (self.geometry.first(), self.geometry.last()) {
            (Some(a), Some(b)) => (*a, *b),
            _ => return 1,
        };
        let dist = first.to_position().distance_to(last.to_position());
        ((dist / TILE_SIZE as f64).round() as i32).max(1)
    }
}

/// A mineral field or geyser.
#[derive(Copy, Clone, Debug)]
pub struct Resource {
    pub top_left: TilePosition,
    pub width: i32,
    pub height: i32,
}

impl Resource {
    pub fn new(top_left: TilePosition, width: i32, height: i32) -> Self {
        Resource {
            top_left,
            width,
            height,
        }
    }

    pub fn center(&self) -> Position {
        self.top_left.footprint_center(self.width, self.height)
    }
}

/// A resource depot location.
#[derive(Clone, Debug)]
pub struct Base {
    pub id: BaseId,
    pub area: AreaId,
    /// Top-left tile of the 4x3 depot footprint.
    pub location: TilePosition,
    pub starting: bool,
    pub minerals: Vec<Resource>,
    pub geysers: Vec<Resource>,
}

impl Base {
    pub fn center(&self) -> Position {
        self.location.footprint_center(4, 3)
    }

    pub fn has_resources(&self) -> bool {
        !self.minerals.is_empty() || !self.geysers.is_empty()
    }
}

/// Footprint of a neutral object (resource, static building) present at start.
#[derive(Copy, Clone, Debug)]
pub struct NeutralFootprint {
    pub top_left: TilePosition,
    pub width: i32,
    pub height: i32,
}

/// Terrain decomposition and game state consumed by the planner.
pub trait MapDataSource {
    /// Map width in tiles.
    fn width(&self) -> i32;
    /// Map height in tiles.
    fn height(&self) -> i32;

    fn is_buildable(&self, tile: TilePosition) -> bool;
    fn is_walk_cell_walkable(&self, walk: WalkPosition) -> bool;

    fn area_at(&self, tile: TilePosition) -> Option<AreaId>;
    fn areas(&self) -> &[Area];
    fn chokepoints(&self) -> &[ChokePoint];
    fn bases(&self) -> &[Base];
    fn neutrals(&self) -> &[NeutralFootprint];

    /// Ground distance in pixels, `f64::MAX` when unreachable.
    fn ground_distance(&self, from: Position, to: Position) -> f64;

    /// Lowest altitude (distance to unwalkable terrain) found on the tile.
    fn min_altitude(&self, tile: TilePosition) -> i32;

    fn start_location(&self) -> TilePosition;

    fn center(&self) -> Position {
        Position::new(self.width() * TILE_SIZE / 2, self.height() * TILE_SIZE / 2)
    }

    fn is_valid_tile(&self, tile: TilePosition) -> bool {
        tile.x >= 0 && tile.y >= 0 && tile.x < self.width() && tile.y < self.height()
    }

    fn is_valid_walk(&self, walk: WalkPosition) -> bool {
        walk.x >= 0
            && walk.y >= 0
            && walk.x < self.width() * WALKS_PER_TILE
            && walk.y < self.height() * WALKS_PER_TILE
    }

    fn area(&self, id: AreaId) -> Option<&Area> {
        self.areas().iter().find(|a| a.id == id)
    }

    fn chokepoint(&self, id: ChokeId) -> Option<&ChokePoint> {
        self.chokepoints().iter().find(|c| c.id == id)
    }

    fn base(&self, id: BaseId) -> Option<&Base> {
        self.bases().iter().find(|b| b.id == id)
    }

    fn has_creep(&self, _tile: TilePosition) -> bool {
        false
    }

    /// Extra legality check for resource depots.
    fn can_build_here(&self, _tile: TilePosition, _building: &BuildingType) -> bool {
        true
    }

    fn has_power(&self, _tile: TilePosition, _building: &BuildingType) -> bool {
        true
    }
}

/// In-memory map description.
#[derive(Clone)]
pub struct StaticMapData {
    terrain: Grid<TerrainFlags>,
    walk_blocked: Grid<bool>,
    area_ids: Grid<Option<AreaId>>,
    altitude: Grid<u32>,
    areas: Vec<Area>,
    chokepoints: Vec<ChokePoint>,
    bases: Vec<Base>,
    neutrals: Vec<NeutralFootprint>,
    start_location: TilePosition,
}

impl StaticMapData {
    /// A fully walkable and buildable map with no areas.
    pub fn open(width: i32, height: i32) -> Self {
        let mut data = StaticMapData {
            terrain: Grid::new(width, height, TerrainFlags::WALKABLE | TerrainFlags::BUILDABLE),
            walk_blocked: Grid::new(width * WALKS_PER_TILE, height * WALKS_PER_TILE, false),
            area_ids: Grid::new(width, height, None),
            altitude: Grid::new(width, height, 0),
            areas: Vec::new(),
            chokepoints: Vec::new(),
            bases: Vec::new(),
            neutrals: Vec::new(),
            start_location: TilePosition::new(0, 0),
        };
        data.refresh_altitude();
        data
    }

    /// Make a tile unwalkable and unbuildable (all 16 walk cells).
    pub fn set_blocked(&mut self, tile: TilePosition) -> &mut Self {
        self.block_tile(tile);
        self.refresh_altitude();
        self
    }

    pub fn set_blocked_rect(&mut self, origin: TilePosition, width: i32, height: i32) -> &mut Self {
        for tile in origin.footprint(width, height) {
            self.block_tile(tile);
        }
        self.refresh_altitude();
        self
    }

    fn block_tile(&mut self, tile: TilePosition) {
        self.terrain.set(tile, TerrainFlags::NONE);
        let walk = tile.to_walk();
        for dx in 0..WALKS_PER_TILE {
            for dy in 0..WALKS_PER_TILE {
                self.walk_blocked.set_xy(walk.x + dx, walk.y + dy, true);
            }
        }
    }

    /// Walkable but not buildable.
    pub fn set_unbuildable(&mut self, tile: TilePosition) -> &mut Self {
        if let Some(flags) = self.terrain.get_mut(tile) {
            flags.remove(TerrainFlags::BUILDABLE);
        }
        self
    }

    pub fn set_unbuildable_rect(&mut self, origin: TilePosition, width: i32, height: i32) -> &mut Self {
        for tile in origin.footprint(width, height) {
            self.set_unbuildable(tile);
        }
        self
    }

    /// Block a single walk cell without touching tile-level flags.
    pub fn set_walk_blocked(&mut self, walk: WalkPosition) -> &mut Self {
        self.walk_blocked.set_xy(walk.x, walk.y, true);
        self.refresh_altitude();
        self
    }

    pub fn assign_area(&mut self, origin: TilePosition, width: i32, height: i32, area: AreaId) -> &mut Self {
        for tile in origin.footprint(width, height) {
            self.area_ids.set(tile, Some(area));
        }
        self
    }

    pub fn add_area(&mut self, area: Area) -> &mut Self {
        self.areas.push(area);
        self
    }

    /// Register a choke and link it to both of its areas.
    pub fn add_chokepoint(&mut self, choke: ChokePoint) -> &mut Self {
        let (a, b) = choke.areas;
        for area in self.areas.iter_mut() {
            if area.id == a || area.id == b {
                if !area.chokepoints.contains(&choke.id) {
                    area.chokepoints.push(choke.id);
                }
                let other = choke.other_area(area.id);
                if !choke.blocked && !area.accessible_neighbours.contains(&other) {
                    area.accessible_neighbours.push(other);
                }
            }
        }
        self.chokepoints.push(choke);
        self
    }

    /// Register a base and link it to its area. Its resources become neutrals.
    pub fn add_base(&mut self, base: Base) -> &mut Self {
        for area in self.areas.iter_mut() {
            if area.id == base.area && !area.bases.contains(&base.id) {
                area.bases.push(base.id);
            }
        }
        for resource in base.minerals.iter().chain(base.geysers.iter()) {
            self.neutrals.push(NeutralFootprint {
                top_left: resource.top_left,
                width: resource.width,
                height: resource.height,
            });
        }
        self.bases.push(base);
        self
    }

    pub fn add_neutral(&mut self, neutral: NeutralFootprint) -> &mut Self {
        self.neutrals.push(neutral);
        self
    }

    pub fn set_start_location(&mut self, tile: TilePosition) -> &mut Self {
        self.start_location = tile;
        self
    }

    fn tile_walkable(&self, tile: TilePosition) -> bool {
        self.terrain
            .get(tile)
            .map_or(false, |f| f.contains(TerrainFlags::WALKABLE))
    }

    fn refresh_altitude(&mut self) {
        let walk_blocked = &self.walk_blocked;
        let fine = distance_transform(walk_blocked.width(), walk_blocked.height(), |x, y| {
            walk_blocked.get_xy(x, y).unwrap_or(true)
        });
        let mut altitude = Grid::new(self.terrain.width(), self.terrain.height(), 0u32);
        for (tile, _) in self.terrain.iter() {
            let walk = tile.to_walk();
            let mut lowest = u32::MAX;
            for dx in 0..WALKS_PER_TILE {
                for dy in 0..WALKS_PER_TILE {
                    lowest = lowest.min(fine.get_xy(walk.x + dx, walk.y + dy).unwrap_or(0));
                }
            }
            altitude.set(tile, lowest * WALK_SIZE as u32);
        }
        self.altitude = altitude;
    }
}

impl MapDataSource for StaticMapData {
    fn width(&self) -> i32 {
        self.terrain.width()
    }

    fn height(&self) -> i32 {
        self.terrain.height()
    }

    fn is_buildable(&self, tile: TilePosition) -> bool {
        self.terrain
            .get(tile)
            .map_or(false, |f| f.contains(TerrainFlags::BUILDABLE))
    }

    fn is_walk_cell_walkable(&self, walk: WalkPosition) -> bool {
        self.walk_blocked.get_xy(walk.x, walk.y) == Some(false)
    }

    fn area_at(&self, tile: TilePosition) -> Option<AreaId> {
        self.area_ids.get(tile).flatten()
    }

    fn areas(&self) -> &[Area] {
        &self.areas
    }

    fn chokepoints(&self) -> &[ChokePoint] {
        &self.chokepoints
    }

    fn bases(&self) -> &[Base] {
        &self.bases
    }

    fn neutrals(&self) -> &[NeutralFootprint] {
        &self.neutrals
    }

    fn ground_distance(&self, from: Position, to: Position) -> f64 {
        let source = from.to_tile();
        let target = to.to_tile();
        if !self.tile_walkable(source) || !self.tile_walkable(target) {
            return f64::MAX;
        }
        let (dist, _) = flood_fill_distance(self.width(), self.height(), &[source], |t| {
            self.tile_walkable(t)
        });
        match dist.get(target).flatten() {
            Some(tiles) => (tiles as f64 * TILE_SIZE as f64).max(from.distance_to(to)),
            None => f64::MAX,
        }
    }

    fn min_altitude(&self, tile: TilePosition) -> i32 {
        self.altitude.get(tile).unwrap_or(0) as i32
    }

    fn start_location(&self) -> TilePosition {
        self.start_location
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocked_tiles() {
        let mut data = StaticMapData::open(8, 8);
        data.set_blocked(TilePosition::new(3, 3));
        assert!(!data.is_buildable(TilePosition::new(3, 3)));
        assert!(!data.is_walk_cell_walkable(WalkPosition::new(13, 14)));
        assert!(data.is_walk_cell_walkable(WalkPosition::new(16, 14)));
        assert!(!data.is_walk_cell_walkable(WalkPosition::new(-1, 0)));
        assert!(data.is_buildable(TilePosition::new(4, 3)));
    }

    #[test]
    fn test_ground_distance_detours() {
        let mut data = StaticMapData::open(10, 10);
        // Wall across x = 5 with a gap at the bottom.
        data.set_blocked_rect(TilePosition::new(5, 0), 1, 9);
        let from = TilePosition::new(3, 0).to_position();
        let to = TilePosition::new(7, 0).to_position();
        let ground = data.ground_distance(from, to);
        assert!(ground > from.distance_to(to));
        assert!(ground < f64::MAX);

        data.set_blocked(TilePosition::new(5, 9));
        assert_eq!(data.ground_distance(from, to), f64::MAX);
    }

    #[test]
    fn test_links_chokes_and_bases() {
        let mut data = StaticMapData::open(10, 10);
        data.add_area(Area {
            id: AreaId(1),
            top: WalkPosition::new(4, 4),
            chokepoints: vec![],
            accessible_neighbours: vec![],
            bases: vec![],
        })
        .add_area(Area {
            id: AreaId(2),
            top: WalkPosition::new(30, 30),
            chokepoints: vec![],
            accessible_neighbours: vec![],
            bases: vec![],
        })
        .add_chokepoint(ChokePoint {
            id: ChokeId(0),
            areas: (AreaId(1), AreaId(2)),
            center: WalkPosition::new(20, 20),
            geometry: vec![WalkPosition::new(16, 20), WalkPosition::new(24, 20)],
            blocked: false,
        })
        .add_base(Base {
            id: BaseId(0),
            area: AreaId(2),
            location: TilePosition::new(6, 6),
            starting: false,
            minerals: vec![Resource::new(TilePosition::new(8, 9), 2, 1)],
            geysers: vec![],
        });

        let first = data.area(AreaId(1)).unwrap();
        assert_eq!(first.chokepoints, vec![ChokeId(0)]);
        assert_eq!(first.accessible_neighbours, vec![AreaId(2)]);
        assert_eq!(data.area(AreaId(2)).unwrap().bases, vec![BaseId(0)]);
        assert_eq!(data.neutrals().len(), 1);
        assert_eq!(data.chokepoint(ChokeId(0)).unwrap().width_in_tiles(), 2);
    }

    #[test]
    fn test_altitude_grows_away_from_walls() {
        let mut data = StaticMapData::open(12, 12);
        data.set_blocked(TilePosition::new(0, 5));
        assert!(data.min_altitude(TilePosition::new(6, 6)) > data.min_altitude(TilePosition::new(1, 5)));
    }
}
