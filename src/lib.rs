// Rusted Platformer: a tile-based 2D platformer runtime
//
// - `core`: rectangle geometry and small math helpers
// - `engine`: contact classification, motion integration, input signals
// - `game`: characters, animation states, levels and the per-tick session

pub mod core;
pub mod engine;
pub mod game;
