//! Zone themes and the difficulty curve
//!
//! `LevelGenerator` is a pure mapping from (score, map id) to a theme
//! descriptor. The same inputs always give the same theme.

use serde::{Deserialize, Serialize};

use crate::hash_unit;

/// Points per zone
pub const ZONE_LENGTH: u64 = 25;
/// Score at which the speed curve stops rising
const SPEED_RAMP_CAP: u64 = 100;
const SPEED_RAMP_PER_POINT: f32 = 0.005;
const DECORATION_COUNT: u32 = 8;
const PATTERN_COUNT: u32 = 4;

/// Colors for one zone of a map
#[derive(Debug, Clone, Copy)]
pub struct ZonePalette {
    pub name: &'static str,
    pub sky_top: u32,
    pub sky_bottom: u32,
    pub pipe_color: u32,
}

/// A selectable map: a cycle of zone palettes
#[derive(Debug, Clone, Copy)]
pub struct MapDef {
    pub id: &'static str,
    pub zones: &'static [ZonePalette],
}

pub const MAPS: &[MapDef] = &[
    MapDef {
        id: "meadow",
        zones: &[
            ZonePalette {
                name: "Meadow",
                sky_top: 0x46b4c8,
                sky_bottom: 0xbee8f5,
                pipe_color: 0x64aa28,
            },
            ZonePalette {
                name: "Forest",
                sky_top: 0x3a8f7a,
                sky_bottom: 0xa8dcc0,
                pipe_color: 0x2f6e1e,
            },
            ZonePalette {
                name: "Dusk",
                sky_top: 0x5a3f7a,
                sky_bottom: 0xf0a878,
                pipe_color: 0x8a4a2a,
            },
            ZonePalette {
                name: "Night",
                sky_top: 0x0f1a3a,
                sky_bottom: 0x34407a,
                pipe_color: 0x3a5a8a,
            },
        ],
    },
    MapDef {
        id: "desert",
        zones: &[
            ZonePalette {
                name: "Dunes",
                sky_top: 0xf2c46a,
                sky_bottom: 0xfbe8b0,
                pipe_color: 0xc08a3a,
            },
            ZonePalette {
                name: "Canyon",
                sky_top: 0xd06a3a,
                sky_bottom: 0xf5c090,
                pipe_color: 0x8c3c1e,
            },
            ZonePalette {
                name: "Oasis",
                sky_top: 0x48b8b0,
                sky_bottom: 0xe8f0c0,
                pipe_color: 0x3c9a5a,
            },
        ],
    },
    MapDef {
        id: "city",
        zones: &[
            ZonePalette {
                name: "Downtown",
                sky_top: 0x7a9ab8,
                sky_bottom: 0xd0dce8,
                pipe_color: 0x6a6a72,
            },
            ZonePalette {
                name: "Neon",
                sky_top: 0x1a0a2a,
                sky_bottom: 0x5a1a6a,
                pipe_color: 0xe040a0,
            },
            ZonePalette {
                name: "Rooftops",
                sky_top: 0xe08a5a,
                sky_bottom: 0xf8d0a0,
                pipe_color: 0x4a4a5a,
            },
        ],
    },
];

/// Visual descriptor consumed by the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub zone: u32,
    pub map_id: String,
    pub name: String,
    pub sky_top: u32,
    pub sky_bottom: u32,
    pub pipe_color: u32,
    pub decoration_id: u32,
    pub pattern_id: u32,
}

/// Stateless theme and difficulty lookups
pub struct LevelGenerator;

impl LevelGenerator {
    /// Map definition by id; unknown ids fall back to the first map
    pub fn map(map_id: &str) -> &'static MapDef {
        MAPS.iter().find(|m| m.id == map_id).unwrap_or(&MAPS[0])
    }

    pub fn zone_for_score(score: u64) -> u32 {
        (score / ZONE_LENGTH).min(u32::MAX as u64) as u32
    }

    pub fn theme(score: u64, map_id: &str) -> Theme {
        let map = Self::map(map_id);
        let zone = Self::zone_for_score(score);
        let map_index = MAPS.iter().position(|m| m.id == map.id).unwrap_or(0) as u32;
        let palette = map.zones[zone as usize % map.zones.len()];

        let seed = zone.wrapping_mul(7919).wrapping_add(map_index.wrapping_mul(104729));
        let lap = zone as usize / map.zones.len();
        // Later laps through the palette list get a tinted pipe so zones stay distinct
        let pipe_color = if lap == 0 {
            palette.pipe_color
        } else {
            tint(palette.pipe_color, hash_unit(seed) * 0.3 - 0.15)
        };

        Theme {
            zone,
            map_id: map.id.to_string(),
            name: palette.name.to_string(),
            sky_top: palette.sky_top,
            sky_bottom: palette.sky_bottom,
            pipe_color,
            decoration_id: pick(seed ^ 0xdeca, DECORATION_COUNT),
            pattern_id: pick(seed ^ 0x5a77, PATTERN_COUNT),
        }
    }

    /// Forward speed multiplier for the current score
    pub fn speed_multiplier(score: u64) -> f32 {
        1.0 + score.min(SPEED_RAMP_CAP) as f32 * SPEED_RAMP_PER_POINT
    }
}

/// Deterministic index below `count`
fn pick(seed: u32, count: u32) -> u32 {
    (hash_unit(seed) * count as f32) as u32 % count
}

/// Lighten (positive) or darken (negative) an RGB color
fn tint(color: u32, amount: f32) -> u32 {
    let channel = |shift: u32| {
        let c = ((color >> shift) & 0xff) as f32;
        let c = if amount >= 0.0 {
            c + (255.0 - c) * amount
        } else {
            c * (1.0 + amount)
        };
        (c.round().clamp(0.0, 255.0) as u32) << shift
    };
    channel(16) | channel(8) | channel(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_is_deterministic() {
        assert_eq!(
            LevelGenerator::theme(130, "desert"),
            LevelGenerator::theme(130, "desert")
        );
    }

    #[test]
    fn test_zone_changes_every_zone_length() {
        assert_eq!(LevelGenerator::zone_for_score(0), 0);
        assert_eq!(LevelGenerator::zone_for_score(ZONE_LENGTH - 1), 0);
        assert_eq!(LevelGenerator::zone_for_score(ZONE_LENGTH), 1);
        assert_ne!(
            LevelGenerator::theme(0, "meadow").name,
            LevelGenerator::theme(ZONE_LENGTH, "meadow").name
        );
    }

    #[test]
    fn test_unknown_map_falls_back_to_first() {
        let theme = LevelGenerator::theme(0, "atlantis");
        assert_eq!(theme.map_id, MAPS[0].id);
        assert_eq!(theme.pipe_color, MAPS[0].zones[0].pipe_color);
    }

    #[test]
    fn test_ids_in_range() {
        for score in (0..2000).step_by(25) {
            let theme = LevelGenerator::theme(score, "city");
            assert!(theme.decoration_id < DECORATION_COUNT);
            assert!(theme.pattern_id < PATTERN_COUNT);
        }
    }

    #[test]
    fn test_speed_curve_caps() {
        assert_eq!(LevelGenerator::speed_multiplier(0), 1.0);
        assert!((LevelGenerator::speed_multiplier(100) - 1.5).abs() < 1e-6);
        assert_eq!(
            LevelGenerator::speed_multiplier(100),
            LevelGenerator::speed_multiplier(10_000)
        );
    }

    #[test]
    fn test_tint() {
        assert_eq!(tint(0x000000, 0.5), 0x808080);
        assert_eq!(tint(0xffffff, -1.0), 0x000000);
    }
}
