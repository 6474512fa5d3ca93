// Physics: tile contacts, motion integration and the per-tick driver
//
// One body steps against many static tiles. There is no rotation and no
// body-vs-body resolution.

pub mod body;
mod collider;
mod contact;
mod world;

pub use body::{BodyBuilder, MotionBody, MotionTuning};
pub use collider::{BodyShape, Collider};
pub use contact::{
    colliding_surface, contains_surface, touching_surface, Contact, ContactRefresh, Surface,
};
pub use world::{PhysicsWorld, Tile, TileHandle, TileSet};

/// Invalid geometry handed to the physics layer
///
/// These are caller errors. They are rejected up front so that NaN or
/// infinite values never reach the integrator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PhysicsError {
    #[error("Invalid {what} dimensions: {width} x {height} (must be finite and positive)")]
    InvalidDimensions {
        what: &'static str,
        width: f32,
        height: f32,
    },

    #[error("Invalid world bounds: {width} x {height} (must be finite and positive)")]
    InvalidWorldBounds { width: f32, height: f32 },

    #[error("Non-finite {0}")]
    NonFinite(&'static str),

    #[error("{0} must be finite and non-negative")]
    OutOfRange(&'static str),

    #[error("Body of {width} x {height} does not fit in a {world_width} x {world_height} world")]
    BodyLargerThanWorld {
        width: f32,
        height: f32,
        world_width: f32,
        world_height: f32,
    },
}
