use super::body::{BodyBuilder, MotionBody, MotionTuning};
use super::contact::{colliding_surface, touching_surface, Contact, ContactRefresh};
use super::PhysicsError;
use crate::core::{Bounded, Rect};

/// Non-owning reference to a tile in a `TileSet`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileHandle(usize);

impl TileHandle {
    pub fn from_index(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

/// A static, axis-aligned collider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tile {
    rect: Rect,
}

impl Tile {
    /// Create a tile, rejecting empty or non-finite geometry
    pub fn new(rect: Rect) -> Result<Self, PhysicsError> {
        if !rect.has_positive_size() {
            return Err(PhysicsError::InvalidDimensions {
                what: "tile",
                width: rect.width,
                height: rect.height,
            });
        }
        if !rect.position.is_finite() {
            return Err(PhysicsError::NonFinite("tile position"));
        }
        Ok(Self { rect })
    }
}

impl Bounded for Tile {
    fn rect(&self) -> Rect {
        self.rect
    }
}

/// Caller-owned collection of static tiles
///
/// Tiles are append-only so handles stay valid for the lifetime of the set.
#[derive(Debug, Clone, Default)]
pub struct TileSet {
    tiles: Vec<Tile>,
}

impl TileSet {
    pub fn new() -> Self {
        Self { tiles: Vec::new() }
    }

    /// Add a tile and return its handle
    pub fn insert(&mut self, rect: Rect) -> Result<TileHandle, PhysicsError> {
        let tile = Tile::new(rect)?;
        let handle = TileHandle(self.tiles.len());
        self.tiles.push(tile);
        Ok(handle)
    }

    pub fn get(&self, handle: TileHandle) -> Option<&Tile> {
        self.tiles.get(handle.0)
    }

    /// Iterate tiles in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (TileHandle, &Tile)> {
        self.tiles
            .iter()
            .enumerate()
            .map(|(index, tile)| (TileHandle(index), tile))
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

/// Static world: bounds, tiles and the motion coefficients shared by its bodies
#[derive(Debug, Clone)]
pub struct PhysicsWorld {
    width: f32,
    height: f32,
    tiles: TileSet,
    tuning: MotionTuning,
}

impl PhysicsWorld {
    /// Create an empty world of the given size
    pub fn new(width: f32, height: f32) -> Result<Self, PhysicsError> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(PhysicsError::InvalidWorldBounds { width, height });
        }

        Ok(Self {
            width,
            height,
            tiles: TileSet::new(),
            tuning: MotionTuning::default(),
        })
    }

    /// Replace the motion coefficients used for bodies created by this world
    pub fn with_tuning(mut self, tuning: MotionTuning) -> Self {
        self.tuning = tuning;
        self
    }

    /// Add a static tile
    pub fn add_tile(&mut self, rect: Rect) -> Result<TileHandle, PhysicsError> {
        let handle = self.tiles.insert(rect)?;
        log::debug!("Added tile {} at {:?}", handle.index(), rect);
        Ok(handle)
    }

    /// Body builder preconfigured with this world's bounds and tuning
    pub fn body_builder(&self, width: f32, height: f32) -> BodyBuilder {
        BodyBuilder::new(width, height)
            .world_bounds(self.width, self.height)
            .tuning(self.tuning)
    }

    /// Classify `body` against every tile, in tile order.
    ///
    /// Both lists are complete before anything is handed to the body, so a
    /// step always sees a consistent snapshot.
    pub fn classify(&self, body: &MotionBody) -> ContactRefresh {
        let shape = body.rect();
        let mut refresh = ContactRefresh::new();

        for (handle, tile) in self.tiles.iter() {
            let tile = tile.rect();
            if let Some(surface) = touching_surface(&shape, &tile) {
                refresh.touching.push(Contact::new(handle, surface));
            }
            if let Some(surface) =
                colliding_surface(&shape, body.previous_position(), body.velocity(), &tile)
            {
                refresh.colliding.push(Contact::new(handle, surface));
            }
        }

        log::trace!(
            "Contacts: touching {:?}, colliding {:?}",
            refresh.touching,
            refresh.colliding
        );
        refresh
    }

    /// Run one tick for a bare body: refresh its contacts, then step it
    pub fn step_body(&self, body: &mut MotionBody) {
        let refresh = self.classify(body);
        body.set_contacts(refresh);
        body.step(&self.tiles);
    }

    pub fn tiles(&self) -> &TileSet {
        &self.tiles
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn tuning(&self) -> &MotionTuning {
        &self.tuning
    }
}
