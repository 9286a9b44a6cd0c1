//! Finds the home base, its natural expansion and the chokes guarding them.
//!
//! Everything here is computed once when the [`Map`](crate::map::Map) is
//! created. Missing pieces (no natural, no chokes) are left as `None` and the
//! components that depend on them quietly skip their work.

use crate::location::*;
use crate::map_data::*;
use log::*;
use serde::{Deserialize, Serialize};

/// Pixel offset from a depot's top-left tile to its center.
const DEPOT_CENTER_OFFSET: Position = Position::new(64, 48);

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Landmarks {
    pub main_tile: TilePosition,
    pub main_position: Position,
    pub main_area: Option<AreaId>,
    pub natural_tile: Option<TilePosition>,
    pub natural_position: Option<Position>,
    pub natural_area: Option<AreaId>,
    pub main_choke: Option<ChokeId>,
    pub natural_choke: Option<ChokeId>,
}

pub fn locate(data: &dyn MapDataSource) -> Landmarks {
    let mut landmarks = Landmarks::default();

    find_main(data, &mut landmarks);
    find_natural(data, &mut landmarks);
    find_main_choke(data, &mut landmarks);
    find_natural_choke(data, &mut landmarks);

    debug!(
        "Located main {:?} (area {:?}), natural {:?} (area {:?}), main choke {:?}, natural choke {:?}",
        landmarks.main_tile,
        landmarks.main_area,
        landmarks.natural_tile,
        landmarks.natural_area,
        landmarks.main_choke,
        landmarks.natural_choke
    );

    landmarks
}

fn find_main(data: &dyn MapDataSource, landmarks: &mut Landmarks) {
    landmarks.main_tile = data.start_location();
    landmarks.main_position = landmarks.main_tile.to_position() + DEPOT_CENTER_OFFSET;
    landmarks.main_area = data.area_at(landmarks.main_tile);
}

fn find_natural(data: &dyn MapDataSource, landmarks: &mut Landmarks) {
    let mut dist_best = f64::MAX;

    for base in data.bases() {
        if base.starting || !base.has_resources() {
            continue;
        }

        let has_neighbours = data
            .area(base.area)
            .map_or(false, |area| !area.accessible_neighbours.is_empty());
        if !has_neighbours {
            continue;
        }

        let dist = data.ground_distance(base.center(), landmarks.main_position);
        if dist < dist_best {
            dist_best = dist;
            landmarks.natural_area = Some(base.area);
            landmarks.natural_tile = Some(base.location);
            landmarks.natural_position = Some(base.location.to_position() + DEPOT_CENTER_OFFSET);
        }
    }
}

fn find_main_choke(data: &dyn MapDataSource, landmarks: &mut Landmarks) {
    let area = match landmarks.natural_area.and_then(|id| data.area(id)) {
        Some(area) => area,
        None => return,
    };

    let mut dist_best = f64::MAX;
    for choke in area.chokepoints.iter().filter_map(|id| data.chokepoint(*id)) {
        let dist = data.ground_distance(choke.center.to_position(), landmarks.main_position);
        if dist < dist_best {
            dist_best = dist;
            landmarks.main_choke = Some(choke.id);
        }
    }
}

fn find_natural_choke(data: &dyn MapDataSource, landmarks: &mut Landmarks) {
    let (natural_area, natural_tile) = match (landmarks.natural_area, landmarks.natural_tile) {
        (Some(area), Some(tile)) => (area, tile),
        _ => return,
    };
    let area = match data.area(natural_area) {
        Some(area) => area,
        None => return,
    };

    // A natural that sits behind the main is guarded by the main choke.
    let center = data.center();
    if data.ground_distance(landmarks.main_position, center)
        < data.ground_distance(natural_tile.to_position(), center)
    {
        landmarks.natural_choke = landmarks.main_choke;
        return;
    }

    let main_choke_center = landmarks
        .main_choke
        .and_then(|id| data.chokepoint(id))
        .map(|choke| choke.center);
    let start = data.start_location().to_position();

    let mut area_dist_best = f64::MAX;
    let mut choke_dist_best = f64::MAX;

    for choke in area.chokepoints.iter().filter_map(|id| data.chokepoint(*id)) {
        if Some(choke.center) == main_choke_center {
            continue;
        }
        if choke.blocked || choke.geometry.len() <= 3 {
            continue;
        }

        let other = match data.area(choke.other_area(natural_area)) {
            Some(other) => other,
            None => continue,
        };
        if !data.is_valid_walk(other.top) {
            continue;
        }

        let area_dist = other.top.to_position().distance_to(center);
        if area_dist > area_dist_best {
            continue;
        }

        let choke_dist = choke.center.to_position().distance_to(start);
        if area_dist < area_dist_best || choke_dist < choke_dist_best {
            landmarks.natural_choke = Some(choke.id);
            area_dist_best = area_dist;
            choke_dist_best = choke_dist;
        }
    }
}
