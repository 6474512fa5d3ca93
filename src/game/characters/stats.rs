// Character stats - size and the two movement scalars

use serde::{Deserialize, Serialize};

/// Physical properties of a character
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CharacterStats {
    /// Width in world units
    pub width: f32,
    /// Height in world units
    pub height: f32,
    /// Movement responsiveness ("dex"): caps horizontal speed, scales run
    /// acceleration and jump strength
    pub agility: f32,
    /// Drives gravity and terminal fall speed
    pub weight: f32,
}

/// Stats of the default player character
pub const BASE_STATS: CharacterStats = CharacterStats {
    width: 50.0,
    height: 50.0,
    agility: 0.5,
    weight: 1.0,
};

impl Default for CharacterStats {
    fn default() -> Self {
        BASE_STATS
    }
}

impl CharacterStats {
    /// Get the standard player stats
    pub fn standard() -> Self {
        BASE_STATS
    }
}
