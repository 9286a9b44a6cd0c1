use serde::{Deserialize, Serialize};

/// Pixels per build tile.
pub const TILE_SIZE: i32 = 32;
/// Pixels per walk cell.
pub const WALK_SIZE: i32 = 8;
/// Walk cells along one edge of a build tile.
pub const WALKS_PER_TILE: i32 = TILE_SIZE / WALK_SIZE;

/// Coordinate of one cell of the coarse (building-resolution) grid.
#[derive(
    Copy, Clone, Eq, PartialEq, Hash, Debug, Default, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct TilePosition {
    pub x: i32,
    pub y: i32,
}

impl TilePosition {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        TilePosition { x, y }
    }

    /// Euclidean distance in tiles.
    pub fn distance_to(self, other: Self) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn chebyshev(self, other: Self) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    pub fn manhattan(self, other: Self) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Top-left pixel of this tile.
    #[inline]
    pub fn to_position(self) -> Position {
        Position::new(self.x * TILE_SIZE, self.y * TILE_SIZE)
    }

    /// Pixel center of a `width` x `height` footprint anchored at this tile.
    pub fn footprint_center(self, width: i32, height: i32) -> Position {
        Position::new(
            self.x * TILE_SIZE + width * TILE_SIZE / 2,
            self.y * TILE_SIZE + height * TILE_SIZE / 2,
        )
    }

    /// Top-left walk cell of this tile.
    #[inline]
    pub fn to_walk(self) -> WalkPosition {
        WalkPosition::new(self.x * WALKS_PER_TILE, self.y * WALKS_PER_TILE)
    }

    /// True if `other` lies inside the `width` x `height` rectangle anchored here.
    #[inline]
    pub fn footprint_contains(self, width: i32, height: i32, other: TilePosition) -> bool {
        other.x >= self.x
            && other.x < self.x + width
            && other.y >= self.y
            && other.y < self.y + height
    }

    /// Iterate every tile of the `width` x `height` rectangle anchored here, column-major.
    pub fn footprint(self, width: i32, height: i32) -> impl Iterator<Item = TilePosition> {
        let origin = self;
        (origin.x..origin.x + width)
            .flat_map(move |x| (origin.y..origin.y + height).map(move |y| TilePosition::new(x, y)))
    }
}

impl std::ops::Add<(i32, i32)> for TilePosition {
    type Output = Self;
    fn add(self, other: (i32, i32)) -> Self {
        TilePosition::new(self.x + other.0, self.y + other.1)
    }
}

impl std::ops::Add for TilePosition {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        TilePosition::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for TilePosition {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        TilePosition::new(self.x - other.x, self.y - other.y)
    }
}

impl std::ops::Div<i32> for TilePosition {
    type Output = Self;
    fn div(self, rhs: i32) -> Self {
        TilePosition::new(self.x / rhs, self.y / rhs)
    }
}

/// Coordinate of one cell of the fine (walkability) grid, 8 px on a side.
#[derive(
    Copy, Clone, Eq, PartialEq, Hash, Debug, Default, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct WalkPosition {
    pub x: i32,
    pub y: i32,
}

impl WalkPosition {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        WalkPosition { x, y }
    }

    #[inline]
    pub fn to_tile(self) -> TilePosition {
        TilePosition::new(
            self.x.div_euclid(WALKS_PER_TILE),
            self.y.div_euclid(WALKS_PER_TILE),
        )
    }

    #[inline]
    pub fn to_position(self) -> Position {
        Position::new(self.x * WALK_SIZE, self.y * WALK_SIZE)
    }
}

/// Pixel coordinate.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    pub fn distance_to(self, other: Self) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }

    #[inline]
    pub fn to_tile(self) -> TilePosition {
        TilePosition::new(self.x.div_euclid(TILE_SIZE), self.y.div_euclid(TILE_SIZE))
    }

    #[inline]
    pub fn to_walk(self) -> WalkPosition {
        WalkPosition::new(self.x.div_euclid(WALK_SIZE), self.y.div_euclid(WALK_SIZE))
    }
}

impl std::ops::Add for Position {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Position::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for Position {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Position::new(self.x - other.x, self.y - other.y)
    }
}

impl std::ops::Div<i32> for Position {
    type Output = Self;
    fn div(self, rhs: i32) -> Self {
        Position::new(self.x / rhs, self.y / rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distances() {
        let a = TilePosition::new(1, 1);
        let b = TilePosition::new(4, 5);
        assert_eq!(a.chebyshev(b), 4);
        assert_eq!(a.manhattan(b), 7);
        assert!((a.distance_to(b) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_conversions() {
        let tile = TilePosition::new(3, 7);
        assert_eq!(tile.to_walk(), WalkPosition::new(12, 28));
        assert_eq!(tile.to_walk().to_tile(), tile);
        assert_eq!(tile.to_position(), Position::new(96, 224));
        assert_eq!(Position::new(97, 255).to_tile(), tile);
        assert_eq!(WalkPosition::new(-1, 0).to_tile(), TilePosition::new(-1, 0));
    }

    #[test]
    fn test_footprint() {
        let origin = TilePosition::new(2, 3);
        let tiles: Vec<_> = origin.footprint(2, 2).collect();
        assert_eq!(tiles.len(), 4);
        assert!(tiles.contains(&TilePosition::new(3, 4)));
        assert!(origin.footprint_contains(2, 2, TilePosition::new(3, 4)));
        assert!(!origin.footprint_contains(2, 2, TilePosition::new(4, 4)));
        assert_eq!(origin.footprint_center(4, 3), Position::new(128, 144));
    }
}
