// Input signals
//
// Keyboard and controller translation live outside this crate. What reaches the
// runtime is a stream of discrete `Direction` values, validated at this boundary
// when they come from text (level scripts, tooling).

pub mod direction;

pub use direction::{Direction, ParseDirectionError};
