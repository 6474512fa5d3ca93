// Engine modules: physics and input signals

pub mod input;
pub mod physics;
