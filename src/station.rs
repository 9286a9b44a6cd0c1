//! Placement metadata for every resource depot location.

use crate::building::Race;
use crate::location::*;
use crate::map_data::*;
use crate::occupancy::OccupancyGrid;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Tiles within this distance of the resource centroid are kept clear for workers.
const MINING_OVERLAP_RADIUS: i32 = 4;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Station {
    base: BaseId,
    location: TilePosition,
    resource_centroid: Position,
    defenses: BTreeSet<TilePosition>,
}

impl Station {
    pub fn base(&self) -> BaseId {
        self.base
    }

    /// Top-left tile of the depot.
    pub fn location(&self) -> TilePosition {
        self.location
    }

    pub fn resource_centroid(&self) -> Position {
        self.resource_centroid
    }

    /// Top-left tiles of the 2x2 static defense slots.
    pub fn defenses(&self) -> &BTreeSet<TilePosition> {
        &self.defenses
    }
}

/// Build a station for `base` and register its footprint in the occupancy grid.
pub fn create_station(base: &Base, race: Race, grid: &mut OccupancyGrid) -> Station {
    let mut total = Position::default();
    let mut count = 0;
    for mineral in base.minerals.iter() {
        total = total + mineral.center();
        count += 1;
    }

    // The side the resources are on: minerals first, then each geyser pulls it halfway.
    let mut side = if count > 0 { total / count } else { Position::default() };
    for geyser in base.geysers.iter() {
        side = (side + geyser.center()) / 2;
        total = total + geyser.center();
        count += 1;
        grid.mark_occupied(geyser.top_left, geyser.width, geyser.height);
    }

    let depot_center = base.center();
    let resource_centroid = if count > 0 { total / count } else { depot_center };

    let mirror_horizontal = depot_center.x < side.x;
    let mirror_vertical = depot_center.y < side.y;
    let defenses = station_defenses(race, base.location, mirror_horizontal, mirror_vertical);
    for tile in defenses.iter() {
        grid.mark_occupied(*tile, 2, 2);
    }

    grid.mark_occupied(base.location, 4, 3);

    if count > 0 {
        let start = resource_centroid.to_tile();
        for x in start.x - MINING_OVERLAP_RADIUS..start.x + MINING_OVERLAP_RADIUS {
            for y in start.y - MINING_OVERLAP_RADIUS..start.y + MINING_OVERLAP_RADIUS {
                let tile = TilePosition::new(x, y);
                if tile.distance_to(start) < MINING_OVERLAP_RADIUS as f64 {
                    grid.mark_occupied(tile, 1, 1);
                }
            }
        }
    }

    Station {
        base: base.id,
        location: base.location,
        resource_centroid,
        defenses,
    }
}

/// Top-left tiles of the static defenses around a depot at `here`.
///
/// The mirror flags say whether the resources lie right of / below the depot,
/// so the defenses end up on the mining side.
pub fn station_defenses(
    race: Race,
    here: TilePosition,
    mirror_horizontal: bool,
    mirror_vertical: bool,
) -> BTreeSet<TilePosition> {
    let offsets: &[(i32, i32)] = match (mirror_horizontal, mirror_vertical, race) {
        (true, true, Race::Terran) => &[(0, 3), (4, 3)],
        (true, true, _) => &[(4, 0), (0, 3), (4, 3)],
        (false, true, _) => &[(-2, 3), (-2, 0), (2, 3)],
        (true, false, Race::Terran) => &[(4, -2), (0, -2)],
        (true, false, _) => &[(4, -2), (0, -2), (4, 1)],
        (false, false, _) => &[(-2, -2), (2, -2), (-2, 1)],
    };

    let mut defenses: BTreeSet<TilePosition> = offsets.iter().map(|offset| here + *offset).collect();

    // Add-on slot beside the depot.
    if race == Race::Terran {
        defenses.insert(here + (4, 1));
    }

    defenses
}

pub fn find_stations(data: &dyn MapDataSource, race: Race, grid: &mut OccupancyGrid) -> Vec<Station> {
    data.bases()
        .iter()
        .map(|base| create_station(base, race, grid))
        .collect()
}

/// True if `tile` lies within `radius` tiles of any station's resource centroid.
pub fn overlaps_mining(stations: &[Station], tile: TilePosition, radius: i32) -> bool {
    stations
        .iter()
        .any(|station| tile.distance_to(station.resource_centroid.to_tile()) < radius as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_with_resources() -> Base {
        Base {
            id: BaseId(3),
            area: AreaId(1),
            location: TilePosition::new(10, 10),
            starting: false,
            minerals: vec![
                Resource::new(TilePosition::new(17, 9), 2, 1),
                Resource::new(TilePosition::new(17, 11), 2, 1),
                Resource::new(TilePosition::new(17, 13), 2, 1),
            ],
            geysers: vec![Resource::new(TilePosition::new(10, 16), 4, 2)],
        }
    }

    #[test]
    fn test_station_centroid_and_defenses() {
        let mut grid = OccupancyGrid::new(32, 32);
        let station = create_station(&base_with_resources(), Race::Protoss, &mut grid);

        let centroid = station.resource_centroid();
        assert_eq!(centroid, Position::new((576 * 3 + 384) / 4, (304 + 368 + 432 + 544) / 4));

        // Resources lie right of and below the depot center.
        let expected: BTreeSet<_> = [(14, 10), (10, 13), (14, 13)]
            .iter()
            .map(|&(x, y)| TilePosition::new(x, y))
            .collect();
        assert_eq!(station.defenses(), &expected);

        assert!(grid.is_overlapped(TilePosition::new(13, 12)));
        assert!(grid.is_overlapped(TilePosition::new(15, 14)));
        assert!(grid.is_overlapped(TilePosition::new(11, 17)));
        assert!(grid.is_overlapped(centroid.to_tile()));
        assert!(!grid.is_overlapped(TilePosition::new(2, 2)));
    }

    #[test]
    fn test_terran_adds_addon_slot() {
        let defenses = station_defenses(Race::Terran, TilePosition::new(10, 10), false, false);
        assert!(defenses.contains(&TilePosition::new(14, 11)));
        assert_eq!(defenses.len(), 4);
    }

    #[test]
    fn test_overlaps_mining() {
        let mut grid = OccupancyGrid::new(32, 32);
        let stations = vec![create_station(&base_with_resources(), Race::Protoss, &mut grid)];
        let centroid = stations[0].resource_centroid().to_tile();
        assert!(overlaps_mining(&stations, centroid + (2, 0), 3));
        assert!(!overlaps_mining(&stations, centroid + (3, 0), 3));
    }
}
