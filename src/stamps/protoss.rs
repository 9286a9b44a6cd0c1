use super::*;

/// Protoss block layouts. Small slots double as power providers, so every
/// layout keeps its medium and large slots within reach of one.
pub fn protoss_stamps() -> Vec<BlockStamp> {
    vec![
        stamp("pylon", 2, 2, vec![small(0, 0)]),
        stamp("pylon pair", 4, 2, vec![small(0, 0), small(2, 0)]),
        stamp("pylon and medium", 5, 2, vec![small(0, 0), medium(2, 0)]),
        stamp("stacked pylons", 2, 4, vec![small(0, 0), small(0, 2)]),
        tech_block(),
        // Gate and 2 pylons
        stamp("gate and pylons", 4, 5, vec![large(0, 0), small(0, 3), small(2, 3)]),
        start_block(),
        stamp(
            "gates, mediums and pylons",
            9,
            6,
            vec![
                small(4, 0),
                small(4, 2),
                small(4, 4),
                large(0, 0),
                large(0, 3),
                medium(6, 0),
                medium(6, 2),
                medium(6, 4),
            ],
        ),
        // 4 gates and 3 pylons
        stamp(
            "four gates",
            10,
            6,
            vec![
                small(4, 0),
                small(4, 2),
                small(4, 4),
                large(0, 0),
                large(0, 3),
                large(6, 0),
                large(6, 3),
            ],
        ),
        stamp(
            "wide production",
            13,
            6,
            vec![
                small(3, 0),
                small(3, 2),
                small(3, 4),
                medium(0, 0),
                medium(0, 2),
                medium(0, 4),
                large(5, 0),
                large(5, 3),
                large(9, 0),
                large(9, 3),
            ],
        ),
        stamp(
            "six gates",
            17,
            6,
            vec![
                small(7, 0),
                small(7, 2),
                small(7, 4),
                medium(0, 0),
                medium(0, 2),
                medium(0, 4),
                large(3, 0),
                large(3, 3),
                large(9, 0),
                large(9, 3),
                large(13, 0),
                large(13, 3),
            ],
        ),
        stamp(
            "eight gates",
            18,
            6,
            vec![
                small(8, 0),
                small(8, 2),
                small(8, 4),
                large(0, 0),
                large(0, 3),
                large(4, 0),
                large(4, 3),
                large(10, 0),
                large(10, 3),
                large(14, 0),
                large(14, 3),
            ],
        ),
        // Narrow column for tight spaces.
        stamp(
            "narrow column",
            4,
            7,
            vec![medium(0, 0), small(0, 2), small(2, 2), large(0, 4)],
        ),
        stamp(
            "gate square",
            8,
            8,
            vec![
                small(0, 3),
                small(2, 3),
                small(4, 3),
                small(6, 3),
                large(0, 0),
                large(4, 0),
                large(0, 5),
                large(4, 5),
            ],
        ),
    ]
}

/// Pylon, 2 medium, 2 large. Unmirrored it has the pylon in the top-left corner.
pub fn start_block() -> BlockStamp {
    stamp(
        "production start",
        8,
        5,
        vec![
            small(0, 0),
            medium(2, 0),
            medium(5, 0),
            large(0, 2),
            large(4, 2),
        ],
    )
}

/// Two pylons and two medium slots.
pub fn tech_block() -> BlockStamp {
    stamp(
        "tech",
        5,
        4,
        vec![small(0, 0), small(0, 2), medium(2, 0), medium(2, 2)],
    )
}

fn stamp(name: &'static str, width: i32, height: i32, placements: Vec<StampPlacement>) -> BlockStamp {
    BlockStamp {
        name,
        width,
        height,
        placements,
        large_cost: 0,
    }
}
