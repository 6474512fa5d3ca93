// Contact classification between a moving body and static tiles
//
// Two independent questions are asked for every (body, tile) pair:
// - touching: is the body resting exactly flush against one of the tile's sides?
// - colliding: does the body overlap the tile this tick, and if so, which side
//   did it most likely come through?

use glam::Vec2;

use super::world::TileHandle;
use crate::core::math::safe_ratio;
use crate::core::Rect;

/// Side of a static tile that a body meets
///
/// `Top` means the tile is below the body (the body stands on its top side).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    Top,
    Bottom,
    Left,
    Right,
}

/// A body meeting a tile on one of its surfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub tile: TileHandle,
    pub surface: Surface,
}

impl Contact {
    pub fn new(tile: TileHandle, surface: Surface) -> Self {
        Self { tile, surface }
    }
}

/// Both contact lists computed for one body in one tick
///
/// Lists are in tile order and hold at most one entry per tile.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactRefresh {
    pub touching: Vec<Contact>,
    pub colliding: Vec<Contact>,
}

impl ContactRefresh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if either list has a contact on the given surface
    pub fn has_surface(&self, surface: Surface) -> bool {
        contains_surface(&self.touching, surface) || contains_surface(&self.colliding, surface)
    }

    /// Check if the refresh puts ground under the body
    pub fn is_grounded(&self) -> bool {
        self.has_surface(Surface::Top)
    }

    pub fn is_empty(&self) -> bool {
        self.touching.is_empty() && self.colliding.is_empty()
    }
}

/// Check if a contact list has an entry on the given surface
pub fn contains_surface(contacts: &[Contact], surface: Surface) -> bool {
    contacts.iter().any(|contact| contact.surface == surface)
}

/// Which tile side `body` is flush against, if any.
///
/// Edges must coincide exactly. Any positive overlap or gap on the adjacency
/// axis means no contact. Vertical sides are checked before horizontal ones.
pub fn touching_surface(body: &Rect, tile: &Rect) -> Option<Surface> {
    if body.spans_horizontally(tile) {
        if body.top() == tile.bottom() {
            return Some(Surface::Bottom);
        }
        if body.bottom() == tile.top() {
            return Some(Surface::Top);
        }
    }

    if body.spans_vertically(tile) {
        if body.left() == tile.right() {
            return Some(Surface::Right);
        }
        if body.right() == tile.left() {
            return Some(Surface::Left);
        }
    }

    None
}

/// Which tile side `body` collided with this tick, if it overlaps `tile`.
///
/// The side is estimated from per-axis times to impact, measured from the
/// body's `previous` position along its current `velocity`. Candidates with a
/// negative or infinite time are dropped; the smallest remaining time wins and
/// the horizontal candidate wins an exact tie.
pub fn colliding_surface(
    body: &Rect,
    previous: Vec2,
    velocity: Vec2,
    tile: &Rect,
) -> Option<Surface> {
    if !body.overlaps(tile) {
        return None;
    }

    let before = Rect::from_position(previous, body.width, body.height);

    let horizontal = if velocity.x >= 0.0 {
        (
            Surface::Left,
            safe_ratio(tile.left() - before.right(), velocity.x),
        )
    } else {
        (
            Surface::Right,
            safe_ratio(before.left() - tile.right(), velocity.x),
        )
    };

    let vertical = if velocity.y >= 0.0 {
        (
            Surface::Top,
            safe_ratio(tile.top() - before.bottom(), velocity.y),
        )
    } else {
        (
            Surface::Bottom,
            safe_ratio(before.top() - tile.bottom(), velocity.y),
        )
    };

    [horizontal, vertical]
        .into_iter()
        .filter(|(_, time)| *time >= 0.0 && *time < f32::INFINITY)
        .fold(None, |best: Option<(Surface, f32)>, candidate| match best {
            Some((_, best_time)) if best_time <= candidate.1 => best,
            _ => Some(candidate),
        })
        .map(|(surface, _)| surface)
}
