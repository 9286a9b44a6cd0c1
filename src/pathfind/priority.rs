use crate::location::*;
use crate::terrain::*;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Priority-ordered flood from `source` toward `target`.
///
/// Every neighbour of a popped tile is queued with priority
/// `accumulated + manhattan(current, target) + 1`. The first time a tile is
/// popped its parent is recorded and the tile is final; the first pop of the
/// target ends the search. Equal priorities pop in insertion order.
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

    let mut parents: Grid<Option<TilePosition>> = Grid::new(width, height, None);
    if !parents.contains(source) || !parents.contains(target) {
        return Vec::new();
    }

    let directions: &[(i32, i32)] = if diagonal { &NEIGHBORS_8 } else { &NEIGHBORS_4 };

    let mut open = BinaryHeap::new();
    let mut sequence = 0u64;
    open.push(Reverse((0u32, sequence, source, source)));

    while let Some(Reverse((accumulated, _, tile, parent))) = open.pop() {
        if parents.get(tile).flatten().is_some() {
            continue;
        }
        parents.set(tile, Some(parent));

        if tile == target {
            return rebuild_path(&parents, source, target);
        }

        let priority = accumulated + tile.manhattan(target) as u32 + 1;
        for &(dx, dy) in directions {
            let next = tile + (dx, dy);
            if !parents.contains(next) || parents.get(next).flatten().is_some() || is_blocked(next) {
                continue;
            }
            sequence += 1;
            open.push(Reverse((priority, sequence, next, tile)));
        }
    }

    Vec::new()
}

fn rebuild_path(parents: &Grid<Option<TilePosition>>, source: TilePosition, target: TilePosition) -> Vec<TilePosition> {
    let mut path = vec![target];
    let mut current = target;
    while current != source {
        match parents.get(current).flatten() {
            Some(parent) => {
                current = parent;
                path.push(parent);
            }
            None => return Vec::new(),
        }
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_grid_lengths() {
        let a = TilePosition::new(2, 3);
        for b in [TilePosition::new(9, 5), TilePosition::new(0, 0), TilePosition::new(2, 9)] {
            let diagonal = find_path(12, 12, a, b, true, |_| false);
            assert_eq!(diagonal.len() as i32, a.chebyshev(b) + 1);
            assert_eq!(diagonal.first(), Some(&a));
            assert_eq!(diagonal.last(), Some(&b));

            let straight = find_path(12, 12, a, b, false, |_| false);
            assert_eq!(straight.len() as i32, a.manhattan(b) + 1);
        }
    }

    #[test]
    fn test_steps_are_adjacent() {
        let path = find_path(8, 8, TilePosition::new(0, 7), TilePosition::new(7, 0), false, |t| {
            t.y == 4 && t.x < 6
        });
        assert!(!path.is_empty());
        for pair in path.windows(2) {
            assert_eq!(pair[0].manhattan(pair[1]), 1);
        }
    }

    #[test]
    fn test_same_tile_and_unreachable() {
        let a = TilePosition::new(1, 1);
        assert_eq!(find_path(4, 4, a, a, false, |_| false), vec![a]);
        assert!(find_path(4, 4, a, TilePosition::new(3, 3), true, |t| t.x == 2).is_empty());
        assert!(find_path(4, 4, a, TilePosition::new(4, 3), true, |_| false).is_empty());
    }
}
