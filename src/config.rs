//! Tunables of the planner. `MapConfig` follows a fluent, consuming builder style.

use crate::building::Race;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    /// Race whose block and defense layouts are used.
    pub race: Race,
    /// Blocks may not come within this many tiles of a resource centroid.
    pub mining_radius: i32,
    /// Per-area ceiling of the large-building density counter.
    pub large_per_area_cap: u32,
    /// Bounds of the ring searched around the start tile for the first wall piece.
    pub wall_ring_min: i32,
    pub wall_ring_max: i32,
}

impl MapConfig {
    pub fn new(race: Race) -> Self {
        MapConfig {
            race,
            ..MapConfig::default()
        }
    }

    pub fn race(mut self, race: Race) -> Self {
        self.race = race;
        self
    }

    pub fn mining_radius(mut self, radius: i32) -> Self {
        self.mining_radius = radius;
        self
    }

    pub fn large_per_area_cap(mut self, cap: u32) -> Self {
        self.large_per_area_cap = cap;
        self
    }

    pub fn wall_ring(mut self, min: i32, max: i32) -> Self {
        self.wall_ring_min = min.min(max);
        self.wall_ring_max = max.max(min);
        self
    }

    /// Ring radius for a choke `choke_width` tiles wide.
    pub fn ring_radius(&self, choke_width: i32) -> i32 {
        let low = self.wall_ring_min.min(self.wall_ring_max);
        let high = self.wall_ring_min.max(self.wall_ring_max);
        choke_width.clamp(low, high)
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        MapConfig {
            race: Race::Protoss,
            mining_radius: 3,
            large_per_area_cap: 16,
            wall_ring_min: 6,
            wall_ring_max: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = MapConfig::new(Race::Terran).large_per_area_cap(8).wall_ring(12, 4);
        assert_eq!(config.race, Race::Terran);
        assert_eq!(config.large_per_area_cap, 8);
        assert_eq!(config.mining_radius, 3);
        assert_eq!(config.ring_radius(2), 4);
        assert_eq!(config.ring_radius(20), 12);
    }

    #[test]
    fn test_serde_round_trip() {
        let config = MapConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: MapConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn test_inverted_ring_bounds_from_json() {
        let mut value = serde_json::to_value(MapConfig::default()).unwrap();
        value["wall_ring_min"] = serde_json::json!(10);
        value["wall_ring_max"] = serde_json::json!(6);
        let config: MapConfig = serde_json::from_value(value).unwrap();

        assert_eq!(config.ring_radius(4), 6);
        assert_eq!(config.ring_radius(8), 8);
        assert_eq!(config.ring_radius(14), 10);
    }
}
