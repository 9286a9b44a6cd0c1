use super::*;

/// Terran block layouts. Production-heavy layouts count against the per-area
/// large-building cap.
pub fn terran_stamps() -> Vec<BlockStamp> {
    vec![
        stamp("medium", 3, 2, vec![medium(0, 0)], 0),
        stamp("medium pair", 3, 4, vec![medium(0, 0), medium(0, 2)], 0),
        stamp(
            "medium square",
            6,
            4,
            vec![medium(0, 0), medium(0, 2), medium(3, 0), medium(3, 2)],
            0,
        ),
        start_block(),
        stamp(
            "barracks row",
            10,
            6,
            vec![
                large(0, 0),
                large(4, 0),
                large(0, 3),
                large(4, 3),
                small(8, 1),
                small(8, 4),
            ],
            4,
        ),
    ]
}

/// One large, one small and two medium slots.
pub fn start_block() -> BlockStamp {
    stamp(
        "production start",
        6,
        5,
        vec![large(0, 0), small(4, 1), medium(0, 3), medium(3, 3)],
        1,
    )
}

fn stamp(
    name: &'static str,
    width: i32,
    height: i32,
    placements: Vec<StampPlacement>,
    large_cost: u32,
) -> BlockStamp {
    BlockStamp {
        name,
        width,
        height,
        placements,
        large_cost,
    }
}
