//! Exhaustive placement search for one wall.
//!
//! Every unique ordering of the requested buildings is searched depth first
//! with an explicit stack. The first piece is tried on a ring of tiles around
//! the choke; each later piece is tried on the tiles that put it flush against
//! the piece before it. Power providers always come last and only need to
//! power everything already placed.

use super::*;
use crate::occupancy::tiles_within_area;
use crate::power::powers_piece;
use crate::terrain::Grid;
use fnv::FnvHashMap;
use itertools::Itertools;

/// Steps allowed when walking the ring center off unbuildable ground.
const RING_START_STEPS: usize = 10;

/// Placement knowledge for one building type on one tile, kept for the
/// length of a single search.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Visit {
    Unknown,
    /// Passes the terrain and occupancy checks.
    Possible,
    /// Fails regardless of the other pieces.
    Impossible,
}

/// A single frame of the search stack: the candidate tiles for one piece.
struct SearchFrame {
    piece_index: usize,
    candidates: Vec<TilePosition>,
    next_candidate_index: usize,
    /// Candidates must close against terrain on their own.
    require_wall_tight: bool,
}

pub(crate) struct WallSearch<'m, 'a> {
    map: &'m Map<'a>,
    ctx: &'m WallContext<'a>,
    request: &'m WallRequest,
    ring_start: TilePosition,
    ring_radius: i32,
    tightness_factor: i32,
    visited: FnvHashMap<BuildingType, Grid<Visit>>,
    best: Option<Vec<WallPiece>>,
    best_score: f64,
    orderings_searched: u64,
    candidates_evaluated: u64,
    complete_walls_found: u64,
}

impl<'m, 'a> WallSearch<'m, 'a> {
    pub fn new(map: &'m Map<'a>, ctx: &'m WallContext<'a>, request: &'m WallRequest) -> Self {
        WallSearch {
            map,
            ctx,
            request,
            ring_start: ring_start(map, ctx),
            ring_radius: map.config.ring_radius(ctx.choke.width_in_tiles()),
            tightness_factor: tightness_factor(request.tight),
            visited: FnvHashMap::default(),
            best: None,
            best_score: f64::NEG_INFINITY,
            orderings_searched: 0,
            candidates_evaluated: 0,
            complete_walls_found: 0,
        }
    }

    /// Search every ordering and return the best complete wall, if any.
    pub fn run(mut self) -> Option<Vec<WallPiece>> {
        let (power, mut bodies): (Vec<BuildingType>, Vec<BuildingType>) = self
            .request
            .buildings
            .iter()
            .copied()
            .partition(|building| building.is_power_provider());
        bodies.sort();

        let count = bodies.len();
        for mut order in bodies.into_iter().permutations(count).unique() {
            order.extend(power.iter().copied());
            self.orderings_searched += 1;
            self.search_order(&order);
        }

        debug!(
            "Wall search at choke {:?} complete: orderings={}, evaluated={}, complete={}, best={}",
            self.ctx.choke.id,
            self.orderings_searched,
            self.candidates_evaluated,
            self.complete_walls_found,
            self.best_score
        );

        self.best
    }

    fn search_order(&mut self, order: &[BuildingType]) {
        let mut pieces: Vec<WallPiece> = Vec::with_capacity(order.len());
        let mut stack = vec![SearchFrame {
            piece_index: 0,
            candidates: ring_candidates(self.ring_start, self.ring_radius),
            next_candidate_index: 0,
            require_wall_tight: true,
        }];

        while let Some(frame) = stack.last_mut() {
            if frame.next_candidate_index >= frame.candidates.len() {
                stack.pop();
                pieces.pop();
                continue;
            }

            let tile = frame.candidates[frame.next_candidate_index];
            frame.next_candidate_index += 1;
            let index = frame.piece_index;
            let require_wall_tight = frame.require_wall_tight;
            let building = order[index];
            self.candidates_evaluated += 1;

            if !self.test_piece(&building, tile, &pieces) {
                continue;
            }
            if require_wall_tight && !building.is_power_provider() && !self.is_tight(&building, tile) {
                continue;
            }

            let last = index + 1 == order.len();
            if last && self.request.require_tight && !self.is_tight(&building, tile) {
                trace!("Last piece {} at {:?} is not tight", building.name, tile);
                continue;
            }

            pieces.push(WallPiece::new(tile, building));
            if last {
                self.score(&pieces);
                pieces.pop();
                continue;
            }

            let next = order[index + 1];
            let candidates = if next.is_power_provider() {
                ring_candidates(tile, self.ring_radius)
            } else {
                adjacent_candidates(&pieces[index], &next, self.tightness_factor)
            };
            stack.push(SearchFrame {
                piece_index: index + 1,
                candidates,
                next_candidate_index: 0,
                require_wall_tight: false,
            });
        }
    }

    fn is_tight(&self, building: &BuildingType, tile: TilePosition) -> bool {
        is_wall_tight(
            self.map.data,
            building,
            tile,
            self.request.tight,
            self.request.require_tight,
        )
    }

    fn visit(&self, building: &BuildingType, tile: TilePosition) -> Visit {
        self.visited
            .get(building)
            .and_then(|grid| grid.get(tile))
            .unwrap_or(Visit::Unknown)
    }

    fn set_visit(&mut self, building: &BuildingType, tile: TilePosition, visit: Visit) {
        let (width, height) = (self.map.data.width(), self.map.data.height());
        self.visited
            .entry(*building)
            .or_insert_with(|| Grid::new(width, height, Visit::Unknown))
            .set(tile, visit);
    }

    /// Whether `building` can go at `tile` next to the pieces placed so far.
    fn test_piece(&mut self, building: &BuildingType, tile: TilePosition, pieces: &[WallPiece]) -> bool {
        let map = self.map;
        if !map.data.is_valid_tile(tile) {
            return false;
        }
        let visit = self.visit(building, tile);
        if visit == Visit::Impossible {
            return false;
        }

        if building.is_power_provider()
            && !pieces
                .iter()
                .filter(|piece| !piece.building.is_power_provider())
                .all(|piece| powers_piece(tile, piece.tile, piece.building.tile_width))
        {
            return false;
        }

        if pieces
            .iter()
            .any(|piece| piece.intersects(tile, building.tile_width, building.tile_height))
        {
            return false;
        }

        if visit == Visit::Possible {
            return true;
        }

        if map.overlaps_anything(tile, building.tile_width, building.tile_height)
            || !map.is_placeable(building, tile)
            || tiles_within_area(
                map.data,
                self.ctx.area.id,
                tile,
                building.tile_width,
                building.tile_height,
            ) == 0
        {
            self.set_visit(building, tile, Visit::Impossible);
            return false;
        }

        self.set_visit(building, tile, Visit::Possible);
        true
    }

    fn score(&mut self, pieces: &[WallPiece]) {
        self.complete_walls_found += 1;

        // A reserved path has to get past committed structures too.
        let flags = if self.request.reserve_path {
            PathFlags::IGNORE_USED
        } else {
            PathFlags::IGNORE_USED | PathFlags::IGNORE_OVERLAP
        };
        let probe = self.map.find_hole(self.ctx, pieces, flags);

        let cost = 1.0 + pieces.iter().map(|piece| self.piece_cost(piece)).sum::<f64>();
        let score = probe.size / cost;

        if score > self.best_score && (!self.request.reserve_path || probe.hole.is_some()) {
            trace!("New best wall, score {} hole {:?}", score, probe.hole);
            self.best_score = score;
            self.best = Some(pieces.to_vec());
        }
    }

    /// Power providers are cheap when they sit on open ground; everything else
    /// costs its distance from the choke and from the area's base.
    fn piece_cost(&self, piece: &WallPiece) -> f64 {
        if piece.building.is_power_provider() {
            return 1.0 / (self.map.data.min_altitude(piece.tile) as f64).exp();
        }
        piece.tile.distance_to(self.ctx.choke_center)
            + self.ctx.wall_base.map_or(0.0, |base| piece.tile.distance_to(base))
    }
}

/// Choke center, walked toward the area's interior until it is buildable.
fn ring_start(map: &Map, ctx: &WallContext) -> TilePosition {
    let data = map.data;
    let top = ctx.area.top.to_position();
    let mut start = ctx.choke_center;

    for _ in 0..RING_START_STEPS {
        if data.is_buildable(start) {
            break;
        }
        let mut next = start;
        let mut dist_best = f64::MAX;
        for dx in -1..=1 {
            for dy in -1..=1 {
                let tile = start + (dx, dy);
                if !data.is_valid_tile(tile) {
                    continue;
                }
                let dist = tile.to_position().distance_to(top);
                if dist < dist_best {
                    dist_best = dist;
                    next = tile;
                }
            }
        }
        if next == start {
            break;
        }
        start = next;
    }

    start
}

fn ring_candidates(center: TilePosition, radius: i32) -> Vec<TilePosition> {
    (center.x - radius..center.x + radius)
        .flat_map(|x| (center.y - radius..center.y + radius).map(move |y| TilePosition::new(x, y)))
        .collect()
}

/// Tiles that put `current` flush against `parent` on a side where the two
/// pixel gaps together stay under the tightness factor.
fn adjacent_candidates(parent: &WallPiece, current: &BuildingType, factor: i32) -> Vec<TilePosition> {
    let start = parent.tile;
    let (parent_width, parent_height) = (parent.building.tile_width, parent.building.tile_height);
    let (current_width, current_height) = (current.tile_width, current.tile_height);
    let mut candidates = Vec::new();

    let left = parent.building.gap_left() + current.gap_right() < factor;
    let right = parent.building.gap_right() + current.gap_left() < factor;
    if left || right {
        for y in 1 + start.y - current_height..start.y + parent_height {
            if left {
                candidates.push(TilePosition::new(start.x - current_width, y));
            }
            if right {
                candidates.push(TilePosition::new(start.x + parent_width, y));
            }
        }
    }

    let top = parent.building.gap_up() + current.gap_down() < factor;
    let bottom = parent.building.gap_down() + current.gap_up() < factor;
    if top || bottom {
        for x in 1 + start.x - current_width..start.x + parent_width {
            if top {
                candidates.push(TilePosition::new(x, start.y - current_height));
            }
            if bottom {
                candidates.push(TilePosition::new(x, start.y + parent_height));
            }
        }
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapConfig;

    #[test]
    fn test_adjacent_candidates_touch_parent() {
        let parent = WallPiece::new(TilePosition::new(10, 10), BuildingType::new("large", 4, 3));
        let small = BuildingType::new("small", 2, 2);
        let candidates = adjacent_candidates(&parent, &small, 32);

        // Four sides: 4 rows on each vertical side, 5 columns on each horizontal side.
        assert_eq!(candidates.len(), 2 * 4 + 2 * 5);
        assert!(candidates.contains(&TilePosition::new(8, 9)));
        assert!(candidates.contains(&TilePosition::new(14, 12)));
        assert!(candidates.contains(&TilePosition::new(9, 8)));
        assert!(candidates.contains(&TilePosition::new(13, 13)));
        for tile in candidates {
            let piece = WallPiece::new(tile, small);
            assert!(!parent.intersects(piece.tile, 2, 2));
        }
    }

    #[test]
    fn test_loose_sides_are_skipped() {
        let parent = WallPiece::new(
            TilePosition::new(10, 10),
            BuildingType::new("gappy", 2, 2).with_dimensions(16, 32, 31, 31),
        );
        let small = BuildingType::new("small", 2, 2);

        // 16 px open on the left of the parent.
        let candidates = adjacent_candidates(&parent, &small, 16);
        assert!(!candidates.contains(&TilePosition::new(8, 10)));
        assert!(candidates.contains(&TilePosition::new(12, 10)));
        assert!(candidates.contains(&TilePosition::new(10, 8)));
    }

    #[test]
    fn test_ring_is_half_open() {
        let ring = ring_candidates(TilePosition::new(5, 5), 2);
        assert_eq!(ring.len(), 16);
        assert!(ring.contains(&TilePosition::new(3, 3)));
        assert!(!ring.contains(&TilePosition::new(7, 5)));
    }

    #[test]
    fn test_ring_start_walks_off_unbuildable_center() {
        let mut data = gap_map(8, 4);
        data.set_unbuildable(TilePosition::new(10, 10));
        let map = Map::new(&data, MapConfig::default());
        let ctx = map.wall_context(AreaId(1), ChokeId(0)).unwrap();

        assert_eq!(ctx.choke_center, TilePosition::new(10, 10));
        assert_eq!(ring_start(&map, &ctx), TilePosition::new(10, 9));
    }

    #[test]
    fn test_visits_are_remembered() {
        let data = gap_map(8, 4);
        let map = Map::new(&data, MapConfig::default());
        let ctx = map.wall_context(AreaId(1), ChokeId(0)).unwrap();
        let request = WallRequest::new(AreaId(1), ChokeId(0));
        let mut search = WallSearch::new(&map, &ctx, &request);
        let depot = BuildingType::new("depot", 2, 2);

        let open = TilePosition::new(4, 4);
        let blocked = TilePosition::new(2, 9);
        assert!(search.test_piece(&depot, open, &[]));
        assert_eq!(search.visit(&depot, open), Visit::Possible);
        assert!(!search.test_piece(&depot, blocked, &[]));
        assert_eq!(search.visit(&depot, blocked), Visit::Impossible);

        // Placed pieces still reject a remembered tile.
        let placed = [WallPiece::new(TilePosition::new(3, 3), depot)];
        assert!(!search.test_piece(&depot, open, &placed));
        assert_eq!(search.visit(&depot, open), Visit::Possible);
    }
}
