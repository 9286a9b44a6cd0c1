//! Power field coverage of a power provider (2x2 pylon-like building).
//!
//! The field is not a circle on the tile grid, so coverage is expressed as
//! per-row horizontal ranges of the covered building's top-left tile
//! relative to the provider's top-left tile.

use crate::location::*;

/// True if a provider at `provider` powers a building of `piece_width` tiles at `piece`.
pub fn powers_piece(provider: TilePosition, piece: TilePosition, piece_width: i32) -> bool {
    let dx = piece.x - provider.x;
    let dy = piece.y - provider.y;

    let range = if piece_width == 4 {
        match dy {
            -5 | 4 => Some((-4, 1)),
            -4 | 3 => Some((-7, 4)),
            -3 | 2 => Some((-8, 5)),
            -2..=1 => Some((-8, 6)),
            _ => None,
        }
    } else {
        match dy {
            4 => Some((-3, 2)),
            -4 | 3 => Some((-6, 5)),
            -3..=2 => Some((-7, 6)),
            _ => None,
        }
    };

    range.map_or(false, |(min, max)| dx >= min && dx <= max)
}

/// True if a provider at `provider` powers a 2x2 static defense at `cannon`.
pub fn powers_cannon(provider: TilePosition, cannon: TilePosition) -> bool {
    let dx = cannon.x - provider.x;
    let dy = cannon.y - provider.y;

    let (min, max) = match dy {
        4 => (-3, 2),
        -4 | 3 => (-6, 5),
        -3 | 2 => (-7, 6),
        -2..=1 => (-7, 7),
        _ => return false,
    };

    dx >= min && dx <= max
}
