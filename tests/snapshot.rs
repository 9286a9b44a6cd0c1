use bweb::*;

const GATEWAY: BuildingType = BuildingType::new("gateway", 4, 3);
const DEPOT: BuildingType = BuildingType::new("depot", 2, 2);

/// Two areas split by an unwalkable row with a four tile gap at x 8..12.
fn choke_map() -> StaticMapData {
    let mut data = StaticMapData::open(20, 20);
    data.set_blocked_rect(TilePosition::new(0, 10), 8, 1)
        .set_blocked_rect(TilePosition::new(12, 10), 8, 1)
        .assign_area(TilePosition::new(0, 0), 20, 10, AreaId(1))
        .assign_area(TilePosition::new(0, 11), 20, 9, AreaId(2))
        .add_area(Area {
            id: AreaId(1),
            top: WalkPosition::new(40, 12),
            chokepoints: vec![],
            accessible_neighbours: vec![],
            bases: vec![],
        })
        .add_area(Area {
            id: AreaId(2),
            top: WalkPosition::new(40, 64),
            chokepoints: vec![],
            accessible_neighbours: vec![],
            bases: vec![],
        })
        .add_chokepoint(ChokePoint {
            id: ChokeId(0),
            areas: (AreaId(1), AreaId(2)),
            center: WalkPosition::new(40, 41),
            geometry: (32..48).map(|x| WalkPosition::new(x, 41)).collect(),
            blocked: false,
        });
    data
}

#[test]
fn test_wall_snapshot_round_trip() {
    let data = choke_map();
    let mut map = Map::new(&data, MapConfig::default());
    let request = WallRequest::new(AreaId(1), ChokeId(0))
        .buildings([GATEWAY, DEPOT])
        .require_tight(true);
    let wall = map.create_wall(&request).unwrap().clone();

    let json = serde_json::to_string(&wall).unwrap();
    let back: Wall = serde_json::from_str(&json).unwrap();

    assert_eq!(back.area(), wall.area());
    assert_eq!(back.choke(), wall.choke());
    assert_eq!(back.segments(), wall.segments());
    assert_eq!(back.door(), wall.door());
    assert_eq!(back.defenses(), wall.defenses());
    for x in 8..12 {
        assert!(back.covers(TilePosition::new(x, 10)));
    }
}

#[test]
fn test_block_snapshot_round_trip() {
    let data = StaticMapData::open(30, 30);
    let mut map = Map::new(&data, MapConfig::default());
    assert!(map.insert_block(TilePosition::new(5, 5), 10, 6));

    let json = serde_json::to_string(map.blocks()).unwrap();
    let back: Vec<Block> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, map.blocks());
}

#[test]
fn test_public_path_queries() {
    let data = StaticMapData::open(20, 20);
    let map = Map::new(&data, MapConfig::default());
    let a = TilePosition::new(2, 3);
    let b = TilePosition::new(12, 7);

    let diagonal = map.find_path(a, b, PathFlags::DIAGONAL);
    assert_eq!(diagonal.len() as i32, a.chebyshev(b) + 1);
    let straight = map.find_path_astar(a, b, PathFlags::NONE);
    assert_eq!(straight.len() as i32, a.manhattan(b) + 1);
    assert_eq!(straight.first(), Some(&a));
    assert_eq!(straight.last(), Some(&b));
    assert_eq!(map.find_path(a, a, PathFlags::NONE), vec![a]);
}
