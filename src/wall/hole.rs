use super::*;
use crate::occupancy::is_walkable;
use crate::pathfind::PathAlgorithm;

/// Outcome of one path probe across a wall.
pub(crate) struct HoleProbe {
    pub path: Vec<TilePosition>,
    /// Uncovered choke tile on the path closest to the start tile.
    pub hole: Option<TilePosition>,
    /// `hole distance * path length`, or `f64::MAX` when nothing gets through.
    pub size: f64,
}

impl<'a> Map<'a> {
    /// Reference tiles on either side of the choke that probes path between.
    pub(crate) fn wall_endpoints(&self, area: &Area, choke: &ChokePoint) -> (TilePosition, TilePosition) {
        let data = self.data;
        let landmarks = &self.landmarks;

        if Some(area.id) == landmarks.natural_area && Some(choke.id) == landmarks.natural_choke {
            let main_choke = landmarks.main_choke.and_then(|id| data.chokepoint(id));
            if let (Some(main_choke), Some(natural_tile), Some(natural_position)) =
                (main_choke, landmarks.natural_tile, landmarks.natural_position)
            {
                let main_choke_tile = main_choke.center_tile();
                let start = (main_choke_tile + main_choke_tile + main_choke_tile + natural_tile) / 4;
                // Project past the choke, away from the natural.
                let center = choke.center.to_position();
                let end = (center + (center - natural_position)).to_tile();
                return (start, end);
            }
        }

        if Some(area.id) == landmarks.main_area && Some(choke.id) == landmarks.main_choke {
            if let Some(natural_tile) = landmarks.natural_tile {
                let choke_tile = choke.center_tile();
                return (
                    (choke_tile + landmarks.main_tile) / 2,
                    (choke_tile + natural_tile) / 2,
                );
            }
        }

        let start = area.top.to_tile();
        let end = data
            .area(choke.other_area(area.id))
            .map_or(choke.center_tile(), |other| other.top.to_tile());
        (start, end)
    }

    /// Path from the start tile to the end tile with `pieces` in place, and the
    /// hole the path slips through.
    pub(crate) fn find_hole(&self, ctx: &WallContext, pieces: &[WallPiece], flags: PathFlags) -> HoleProbe {
        let (start, end) = self.probe_endpoints(ctx, pieces);
        let path = self.find_path_with(PathAlgorithm::PriorityBfs, start, end, flags, pieces);

        let hole = path
            .iter()
            .copied()
            .filter(|tile| ctx.geometry.contains(tile) && !covered_by(pieces, *tile))
            .min_by(|a, b| a.distance_to(start).total_cmp(&b.distance_to(start)));

        let size = match hole {
            Some(hole) if !path.is_empty() => hole.distance_to(start) * path.len() as f64,
            _ => f64::MAX,
        };

        HoleProbe { path, hole, size }
    }

    /// Move the reference tiles off the pieces and onto walkable ground.
    fn probe_endpoints(&self, ctx: &WallContext, pieces: &[WallPiece]) -> (TilePosition, TilePosition) {
        let data = self.data;
        let mut start = ctx.start_tile;
        let mut end = ctx.end_tile;

        if covered_by(pieces, start) || !is_walkable(data, start) || data.area_at(start).is_none() {
            let mut dist_best = f64::MAX;
            for x in ctx.start_tile.x - 2..ctx.start_tile.x + 2 {
                for y in ctx.start_tile.y - 2..ctx.start_tile.y + 2 {
                    let tile = TilePosition::new(x, y);
                    if !data.is_valid_tile(tile) || covered_by(pieces, tile) || !is_walkable(data, tile) {
                        continue;
                    }
                    let dist = tile.distance_to(ctx.end_tile);
                    if data.area_at(tile) == Some(ctx.area.id) && dist < dist_best {
                        dist_best = dist;
                        start = tile;
                    }
                }
            }
        }

        if covered_by(pieces, end) || !is_walkable(data, end) || data.area_at(end).is_none() {
            let mut dist_best = 0.0;
            for x in ctx.end_tile.x - 4..ctx.end_tile.x + 4 {
                for y in ctx.end_tile.y - 4..ctx.end_tile.y + 4 {
                    let tile = TilePosition::new(x, y);
                    if !data.is_valid_tile(tile) || covered_by(pieces, tile) || !is_walkable(data, tile) {
                        continue;
                    }
                    let dist = tile.distance_to(start);
                    if data.area_at(tile).is_some() && dist > dist_best {
                        dist_best = dist;
                        end = tile;
                    }
                }
            }
        }

        (start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapConfig;

    #[test]
    fn test_endpoints_use_area_tops() {
        let data = gap_map(8, 4);
        let map = Map::new(&data, MapConfig::default());
        let ctx = map.wall_context(AreaId(1), ChokeId(0)).unwrap();
        assert_eq!(ctx.start_tile, TilePosition::new(10, 3));
        assert_eq!(ctx.end_tile, TilePosition::new(10, 16));
        assert_eq!(ctx.choke_center, TilePosition::new(10, 10));
        assert_eq!(ctx.geometry.len(), 4);
    }

    #[test]
    fn test_hole_in_open_gap() {
        let data = gap_map(8, 4);
        let map = Map::new(&data, MapConfig::default());
        let ctx = map.wall_context(AreaId(1), ChokeId(0)).unwrap();

        let probe = map.find_hole(&ctx, &[], PathFlags::IGNORE_USED);
        assert_eq!(probe.hole, Some(TilePosition::new(10, 10)));
        assert_eq!(probe.path.len(), 14);
        assert!((probe.size - 7.0 * 14.0).abs() < 1e-9);
    }

    #[test]
    fn test_sealed_gap_has_no_hole() {
        let data = gap_map(8, 4);
        let map = Map::new(&data, MapConfig::default());
        let ctx = map.wall_context(AreaId(1), ChokeId(0)).unwrap();
        let plug = [WallPiece::new(TilePosition::new(8, 10), BuildingType::new("plug", 4, 1))];

        let probe = map.find_hole(&ctx, &plug, PathFlags::IGNORE_USED);
        assert!(probe.path.is_empty());
        assert_eq!(probe.hole, None);
        assert_eq!(probe.size, f64::MAX);

        let through = map.find_hole(&ctx, &plug, PathFlags::IGNORE_USED | PathFlags::IGNORE_WALLS);
        assert_eq!(through.path.len(), 14);
        assert_eq!(through.hole, None);
    }
}
