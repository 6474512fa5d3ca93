// Collider variants for debug views and scene queries

use glam::Vec2;

use super::body::MotionBody;
use super::world::{Tile, TileHandle};
use crate::core::{Bounded, Rect};

/// Snapshot of a moving body's shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyShape {
    pub rect: Rect,
    pub velocity: Vec2,
    pub grounded: bool,
}

impl From<&MotionBody> for BodyShape {
    fn from(body: &MotionBody) -> Self {
        Self {
            rect: body.rect(),
            velocity: body.velocity(),
            grounded: body.is_grounded(),
        }
    }
}

/// Anything that takes up space in the world
///
/// Static tiles and moving bodies share rectangle geometry but nothing else:
/// only bodies move, and only tiles are resolved against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Collider {
    Static { handle: TileHandle, tile: Tile },
    Dynamic(BodyShape),
}

impl Collider {
    pub fn is_static(&self) -> bool {
        matches!(self, Self::Static { .. })
    }
}

impl Bounded for Collider {
    fn rect(&self) -> Rect {
        match self {
            Self::Static { tile, .. } => tile.rect(),
            Self::Dynamic(shape) => shape.rect,
        }
    }
}
