use super::*;
use crate::occupancy::tiles_within_area;

/// Half-width of the window searched around the wall centroid.
const DEFENSE_SEARCH_RADIUS: i32 = 6;

impl<'a> Map<'a> {
    /// Add a static defense just behind an existing wall.
    ///
    /// The chosen tile is the one nearest the far side of the choke that is
    /// still farther from it than the wall's centroid.
    pub fn add_to_wall(&mut self, building: &BuildingType, area: AreaId, choke: ChokeId) -> Option<TilePosition> {
        let index = self.wall_index(area, choke)?;
        let ctx = self.wall_context(area, choke)?;
        let data = self.data;

        let end_position = ctx.end_tile.to_position();
        let centroid = self.walls[index].centroid;
        let centroid_dist = centroid.distance_to(end_position);
        let start = centroid.to_tile();
        let (width, height) = (building.tile_width, building.tile_height);

        let mut dist_best = f64::MAX;
        let mut best = None;
        for x in start.x - DEFENSE_SEARCH_RADIUS..=start.x + DEFENSE_SEARCH_RADIUS {
            for y in start.y - DEFENSE_SEARCH_RADIUS..=start.y + DEFENSE_SEARCH_RADIUS {
                let tile = TilePosition::new(x, y);
                if !data.is_valid_tile(tile)
                    || self.overlaps_anything(tile, width, height)
                    || !self.is_placeable(building, tile)
                    || tiles_within_area(data, area, tile, width, height) == 0
                {
                    continue;
                }

                let dist = tile.footprint_center(width, height).distance_to(end_position);
                if dist < dist_best && dist > centroid_dist {
                    dist_best = dist;
                    best = Some(tile);
                }
            }
        }

        let tile = best?;
        self.grid.mark_occupied(tile, width, height);
        self.walls[index].defenses.insert(tile);
        debug!("Added {} to wall at choke {:?}: {:?}", building.name, choke, tile);
        Some(tile)
    }
}
