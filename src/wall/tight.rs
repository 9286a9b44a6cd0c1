use crate::building::*;
use crate::location::*;
use crate::map_data::MapDataSource;
use crate::occupancy::is_walkable;

/// Pixel gap a piece must leave on a side for that side to count as tight.
pub fn tightness_factor(tight: Option<UnitSize>) -> i32 {
    tight.map_or(TILE_SIZE, |size| size.width.min(size.height))
}

/// True if a piece at `here` closes against terrain on some side.
///
/// A side counts only if the building's own pixel gap on that side is below
/// the tightness factor (every side counts when there is no reference unit).
/// The walk cells just beyond a counted side must then be off the map or
/// unwalkable. Without `require_tight`, any tile next to the piece that is not
/// walkable is enough.
pub fn is_wall_tight(
    data: &dyn MapDataSource,
    building: &BuildingType,
    here: TilePosition,
    tight: Option<UnitSize>,
    require_tight: bool,
) -> bool {
    let factor = tightness_factor(tight);
    let (bottom, top, left, right) = match tight {
        Some(_) => (
            building.gap_down() < factor,
            building.gap_up() < factor,
            building.gap_left() < factor,
            building.gap_right() < factor,
        ),
        None => (true, true, true, true),
    };

    let origin = here.to_walk();
    let walk_width = building.tile_width * WALKS_PER_TILE;
    let walk_height = building.tile_height * WALKS_PER_TILE;

    let closes = |walk: WalkPosition, counted: bool| {
        if counted && (!data.is_valid_walk(walk) || !data.is_walk_cell_walkable(walk)) {
            return true;
        }
        !require_tight && !is_walkable(data, walk.to_tile())
    };

    for y in origin.y..origin.y + walk_height {
        if closes(WalkPosition::new(origin.x + walk_width, y), right)
            || closes(WalkPosition::new(origin.x - 1, y), left)
        {
            return true;
        }
    }

    for x in origin.x..origin.x + walk_width {
        if closes(WalkPosition::new(x, origin.y - 1), top)
            || closes(WalkPosition::new(x, origin.y + walk_height), bottom)
        {
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map_data::StaticMapData;

    #[test]
    fn test_tight_against_terrain() {
        let mut data = StaticMapData::open(12, 12);
        data.set_blocked_rect(TilePosition::new(6, 0), 1, 12);
        let small = BuildingType::new("small", 2, 2);

        assert!(is_wall_tight(&data, &small, TilePosition::new(4, 4), None, true));
        assert!(!is_wall_tight(&data, &small, TilePosition::new(2, 4), None, true));
        assert!(is_wall_tight(&data, &small, TilePosition::new(7, 4), None, true));
        // The map edge closes a side too.
        assert!(is_wall_tight(&data, &small, TilePosition::new(0, 4), None, true));
    }

    #[test]
    fn test_gap_larger_than_unit_is_not_tight() {
        let mut data = StaticMapData::open(12, 12);
        data.set_blocked_rect(TilePosition::new(6, 0), 1, 12);
        // 20 px of clearance on the right, more than an 8 px unit needs.
        let narrow = BuildingType::new("narrow", 2, 2).with_dimensions(32, 32, 11, 31);
        let tiny = Some(UnitSize::new(8, 8));

        assert!(!is_wall_tight(&data, &narrow, TilePosition::new(4, 4), tiny, true));
        assert!(is_wall_tight(&data, &narrow, TilePosition::new(4, 4), Some(UnitSize::new(24, 24)), true));
    }

    #[test]
    fn test_tightness_factor() {
        assert_eq!(tightness_factor(None), 32);
        assert_eq!(tightness_factor(Some(UnitSize::new(17, 20))), 17);
    }
}
