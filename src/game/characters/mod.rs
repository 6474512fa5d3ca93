// Character system
//
// This module contains everything related to moving characters:
// - Character data structure and management
// - Character stats (size, agility, weight)
// - Animation state machine driven by input and landings

pub mod character;
pub mod state;
pub mod stats;

// Re-export commonly used types
pub use character::{Character, CharacterId, CharacterManager, RenderSnapshot};
pub use state::{AnimationState, AnimationStateMachine, Facing};
pub use stats::{CharacterStats, BASE_STATS};
