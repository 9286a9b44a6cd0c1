//! Terrain-aware building placement for RTS agents.
//!
//! Given a terrain decomposition ([`MapDataSource`]) the planner locates the
//! main and natural bases, lays out resource stations, packs production blocks,
//! searches for walls across chokepoints and answers tile path queries.

pub mod block;
pub mod blocks;
pub mod building;
pub mod config;
pub mod location;
pub mod locator;
pub mod map;
pub mod map_data;
pub mod occupancy;
pub mod pathfind;
pub mod power;
pub mod stamps;
pub mod station;
pub mod terrain;
pub mod wall;

pub use block::Block;
pub use building::{BuildingFlags, BuildingType, FootprintCategory, Race, UnitSize};
pub use config::MapConfig;
pub use location::*;
pub use map::Map;
pub use map_data::*;
pub use pathfind::{PathAlgorithm, PathFlags};
pub use station::Station;
pub use wall::{Wall, WallRequest};
