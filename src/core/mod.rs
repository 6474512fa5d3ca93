// Core types shared by the engine and the game layer

pub mod geometry;
pub mod math;

pub use geometry::{Bounded, Rect};
