use crate::location::*;
use bitflags::*;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

bitflags! {
    /// Static terrain properties of a build tile.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct TerrainFlags: u8 {
        const NONE = 0;
        const WALKABLE = 1;
        const BUILDABLE = 2;
    }
}

/// A dense row-major array sized to the map it describes.
///
/// Every accessor is bounds-checked: reads outside the grid return `None` and
/// writes outside the grid are ignored.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Grid<T: Copy> {
    width: i32,
    height: i32,
    data: Vec<T>,
}

impl<T: Copy> Grid<T> {
    pub fn new(width: i32, height: i32, initial: T) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Grid {
            width,
            height,
            data: vec![initial; (width as usize) * (height as usize)],
        }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn contains_xy(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    #[inline]
    pub fn contains(&self, tile: TilePosition) -> bool {
        self.contains_xy(tile.x, tile.y)
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if self.contains_xy(x, y) {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_xy(&self, x: i32, y: i32) -> Option<T> {
        self.index(x, y).map(|i| self.data[i])
    }

    #[inline]
    pub fn get(&self, tile: TilePosition) -> Option<T> {
        self.get_xy(tile.x, tile.y)
    }

    #[inline]
    pub fn get_mut(&mut self, tile: TilePosition) -> Option<&mut T> {
        match self.index(tile.x, tile.y) {
            Some(i) => Some(&mut self.data[i]),
            None => None,
        }
    }

    #[inline]
    pub fn set_xy(&mut self, x: i32, y: i32, value: T) {
        if let Some(i) = self.index(x, y) {
            self.data[i] = value;
        }
    }

    #[inline]
    pub fn set(&mut self, tile: TilePosition, value: T) {
        self.set_xy(tile.x, tile.y, value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (TilePosition, T)> + '_ {
        let width = self.width as usize;
        self.data.iter().enumerate().map(move |(i, v)| {
            let x = (i % width) as i32;
            let y = (i / width) as i32;
            (TilePosition::new(x, y), *v)
        })
    }
}

/// Neighbor offsets, orthogonal first, then diagonal.
pub const NEIGHBORS_8: [(i32, i32); 8] = [
    (0, 1),
    (1, 0),
    (0, -1),
    (-1, 0),
    (-1, -1),
    (1, 1),
    (-1, 1),
    (1, -1),
];

/// Neighbor offsets for 4-directional (cardinal) movement.
pub const NEIGHBORS_4: [(i32, i32); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

/// BFS flood-fill distance (8-directional, in tiles) from a set of seeds.
/// `is_passable` decides which tiles can be entered; seeds are always accepted.
/// Returns the distance map and the maximum distance reached.
pub fn flood_fill_distance<F>(
    width: i32,
    height: i32,
    seeds: &[TilePosition],
    is_passable: F,
) -> (Grid<Option<u32>>, u32)
where
    F: Fn(TilePosition) -> bool,
{
    let mut data: Grid<Option<u32>> = Grid::new(width, height, None);
    let mut queue = VecDeque::new();

    for seed in seeds {
        if data.contains(*seed) {
            data.set(*seed, Some(0));
            queue.push_back((*seed, 0u32));
        }
    }

    let mut max_distance = 0u32;

    while let Some((tile, dist)) = queue.pop_front() {
        let next_dist = dist + 1;
        for &(dx, dy) in &NEIGHBORS_8 {
            let next = tile + (dx, dy);
            if !data.contains(next) {
                continue;
            }
            if data.get(next).flatten().is_none() && is_passable(next) {
                data.set(next, Some(next_dist));
                max_distance = max_distance.max(next_dist);
                queue.push_back((next, next_dist));
            }
        }
    }

    (data, max_distance)
}

/// Chebyshev distance from every cell to the nearest blocked cell or grid edge.
/// Blocked cells and border cells get distance 0.
pub fn distance_transform<F>(width: i32, height: i32, is_blocked: F) -> Grid<u32>
where
    F: Fn(i32, i32) -> bool,
{
    let mut result = Grid::new(width, height, 0u32);
    let far = (width.max(height) as u32).saturating_add(1);

    for y in 0..height {
        for x in 0..width {
            let border = x == 0 || y == 0 || x == width - 1 || y == height - 1;
            result.set_xy(x, y, if border || is_blocked(x, y) { 0 } else { far });
        }
    }

    let at = |grid: &Grid<u32>, x: i32, y: i32| grid.get_xy(x, y).map_or(0, |v| v.saturating_add(1));

    // Forward pass
    for y in 1..height {
        for x in 1..width {
            let current = result.get_xy(x, y).unwrap_or(0);
            let min_val = current
                .min(at(&result, x, y - 1))
                .min(at(&result, x - 1, y))
                .min(at(&result, x - 1, y - 1))
                .min(if x + 1 < width { at(&result, x + 1, y - 1) } else { 1 });
            result.set_xy(x, y, min_val);
        }
    }

    // Backward pass
    for y in (0..height - 1).rev() {
        for x in (0..width - 1).rev() {
            let current = result.get_xy(x, y).unwrap_or(0);
            let min_val = current
                .min(at(&result, x, y + 1))
                .min(at(&result, x + 1, y))
                .min(at(&result, x + 1, y + 1))
                .min(if x > 0 { at(&result, x - 1, y + 1) } else { 1 });
            result.set_xy(x, y, min_val);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_bounds() {
        let mut grid = Grid::new(4, 3, 0u8);
        grid.set(TilePosition::new(3, 2), 7);
        grid.set(TilePosition::new(4, 2), 9);
        grid.set(TilePosition::new(-1, 0), 9);
        assert_eq!(grid.get(TilePosition::new(3, 2)), Some(7));
        assert_eq!(grid.get(TilePosition::new(4, 2)), None);
        assert_eq!(grid.get(TilePosition::new(0, -1)), None);
        assert_eq!(grid.iter().filter(|(_, v)| *v == 7).count(), 1);
    }

    #[test]
    fn test_flood_fill_respects_obstacles() {
        // Column x = 2 is blocked except at y = 4.
        let passable = |t: TilePosition| t.x != 2 || t.y == 4;
        let (dist, max) = flood_fill_distance(5, 5, &[TilePosition::new(0, 0)], passable);
        assert_eq!(dist.get(TilePosition::new(0, 0)), Some(Some(0)));
        assert_eq!(dist.get(TilePosition::new(2, 0)), Some(None));
        assert_eq!(dist.get(TilePosition::new(2, 4)), Some(Some(4)));
        assert_eq!(dist.get(TilePosition::new(4, 0)), Some(Some(8)));
        assert_eq!(max, 8);
    }

    #[test]
    fn test_distance_transform() {
        let result = distance_transform(7, 7, |_, _| false);
        assert_eq!(result.get_xy(0, 3), Some(0));
        assert_eq!(result.get_xy(1, 3), Some(1));
        assert_eq!(result.get_xy(3, 3), Some(3));

        let blocked = distance_transform(7, 7, |x, y| x == 3 && y == 3);
        assert_eq!(blocked.get_xy(3, 3), Some(0));
        assert_eq!(blocked.get_xy(2, 2), Some(1));
    }
}
