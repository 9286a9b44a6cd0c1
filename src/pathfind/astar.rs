use crate::location::*;
use crate::terrain::*;
use pathfinding::directed::astar::astar;

const ORTHOGONAL_COST: u32 = 10;
const DIAGONAL_COST: u32 = 14;

/// A* between two tiles. Orthogonal steps cost 10 and diagonal steps 14; the
/// heuristic is the plain Manhattan distance in tiles.
pub fn find_path<F>(
    width: i32,
    height: i32,
    source: TilePosition,
    target: TilePosition,
    diagonal: bool,
    is_blocked: F,
) -> Vec<TilePosition>
where
    F: Fn(TilePosition) -> bool,
{
    if source == target {
        return vec![source];
    }

    let in_bounds = |tile: TilePosition| tile.x >= 0 && tile.y >= 0 && tile.x < width && tile.y < height;
    if !in_bounds(source) || !in_bounds(target) {
        return Vec::new();
    }

    let directions: &[(i32, i32)] = if diagonal { &NEIGHBORS_8 } else { &NEIGHBORS_4 };

    let result = astar(
        &source,
        |&tile| {
            directions
                .iter()
                .filter_map(|&(dx, dy)| {
                    let next = tile + (dx, dy);
                    if !in_bounds(next) || is_blocked(next) {
                        return None;
                    }
                    let cost = if dx != 0 && dy != 0 {
                        DIAGONAL_COST
                    } else {
                        ORTHOGONAL_COST
                    };
                    Some((next, cost))
                })
                .collect::<Vec<_>>()
        },
        |&tile| tile.manhattan(target) as u32,
        |&tile| tile == target,
    );

    result.map(|(path, _)| path).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_grid_lengths() {
        let a = TilePosition::new(1, 1);
        let b = TilePosition::new(7, 4);
        let diagonal = find_path(10, 10, a, b, true, |_| false);
        assert_eq!(diagonal.len() as i32, a.chebyshev(b) + 1);
        assert_eq!(diagonal.first(), Some(&a));
        assert_eq!(diagonal.last(), Some(&b));

        let straight = find_path(10, 10, a, b, false, |_| false);
        assert_eq!(straight.len() as i32, a.manhattan(b) + 1);
    }

    #[test]
    fn test_same_tile_and_unreachable() {
        let a = TilePosition::new(2, 2);
        assert_eq!(find_path(5, 5, a, a, true, |_| true), vec![a]);

        // A full column of blocked tiles separates the two halves.
        let path = find_path(5, 5, a, TilePosition::new(4, 2), true, |t| t.x == 3);
        assert!(path.is_empty());
    }

    #[test]
    fn test_detours_around_obstacle() {
        let blocked = |t: TilePosition| t.x == 2 && t.y < 4;
        let path = find_path(5, 5, TilePosition::new(0, 0), TilePosition::new(4, 0), true, blocked);
        assert!(!path.is_empty());
        assert!(path.iter().all(|t| !blocked(*t)));
        assert!(path.contains(&TilePosition::new(2, 4)));
    }
}
