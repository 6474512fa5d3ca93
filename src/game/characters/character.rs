// Character entity and management

use glam::Vec2;

use crate::engine::input::Direction;
use crate::engine::physics::{ContactRefresh, MotionBody, PhysicsError, PhysicsWorld, TileSet};

use super::state::{AnimationState, AnimationStateMachine, Facing};
use super::stats::CharacterStats;

/// Unique identifier for a character
pub type CharacterId = u32;

/// Read-only view of a character for drawing
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSnapshot {
    pub id: CharacterId,
    pub position: Vec2,
    pub width: f32,
    pub height: f32,
    pub state: AnimationState,
    pub facing: Facing,
}

impl RenderSnapshot {
    /// Sprite set to draw for the current state
    pub fn animation_name(&self) -> &'static str {
        self.state.animation_name()
    }
}

/// A moving entity: motion body plus animation state
#[derive(Debug)]
pub struct Character {
    /// Unique identifier
    pub id: CharacterId,
    /// Character name (for scripts and logs)
    pub name: String,
    /// Spawn stats
    pub stats: CharacterStats,
    body: MotionBody,
    state_machine: AnimationStateMachine,
}

impl Character {
    /// Create a character at the given spawn point in `world`
    pub fn new(
        id: CharacterId,
        name: &str,
        stats: CharacterStats,
        world: &PhysicsWorld,
        spawn_x: f32,
        spawn_y: f32,
    ) -> Result<Self, PhysicsError> {
        let body = world
            .body_builder(stats.width, stats.height)
            .position(spawn_x, spawn_y)
            .agility(stats.agility)
            .weight(stats.weight)
            .build()?;

        Ok(Self {
            id,
            name: name.to_string(),
            stats,
            body,
            state_machine: AnimationStateMachine::new(),
        })
    }

    /// Handle an input signal: set the movement intent, then the animation state
    pub fn update(&mut self, direction: Direction) {
        self.body.apply_direction(direction);
        self.state_machine.on_direction(direction);
    }

    /// Hand this tick's contacts to the character.
    ///
    /// The landing rule runs once against the grounded flag of the last step,
    /// then both contact lists are replaced.
    pub fn refresh_contacts(&mut self, refresh: ContactRefresh) {
        self.state_machine.on_contacts(
            self.body.is_grounded(),
            refresh.is_grounded(),
            self.body.velocity().x,
            self.body.acceleration().x,
        );
        self.body.set_contacts(refresh);
    }

    /// Run the motion step against the world's tiles
    pub fn advance(&mut self, tiles: &TileSet) {
        self.body.step(tiles);
    }

    /// Full tick: classify against every tile, refresh contacts, then move
    pub fn tick(&mut self, world: &PhysicsWorld) {
        let refresh = world.classify(&self.body);
        self.refresh_contacts(refresh);
        self.advance(world.tiles());
    }

    /// Get a drawing snapshot
    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot {
            id: self.id,
            position: self.body.position(),
            width: self.body.width(),
            height: self.body.height(),
            state: self.state_machine.state(),
            facing: self.state_machine.facing(),
        }
    }

    pub fn body(&self) -> &MotionBody {
        &self.body
    }

    pub fn position(&self) -> Vec2 {
        self.body.position()
    }

    pub fn velocity(&self) -> Vec2 {
        self.body.velocity()
    }

    pub fn is_grounded(&self) -> bool {
        self.body.is_grounded()
    }

    /// Get the current animation state
    pub fn state(&self) -> AnimationState {
        self.state_machine.state()
    }

    pub fn previous_state(&self) -> AnimationState {
        self.state_machine.previous_state()
    }

    pub fn facing(&self) -> Facing {
        self.state_machine.facing()
    }
}

/// Manages all characters in the game
#[derive(Debug, Default)]
pub struct CharacterManager {
    characters: Vec<Character>,
    next_id: CharacterId,
}

impl CharacterManager {
    pub fn new() -> Self {
        Self {
            characters: Vec::new(),
            next_id: 0,
        }
    }

    /// Spawn a new character
    pub fn spawn(
        &mut self,
        name: &str,
        stats: CharacterStats,
        world: &PhysicsWorld,
        spawn_x: f32,
        spawn_y: f32,
    ) -> Result<CharacterId, PhysicsError> {
        let id = self.next_id;
        let character = Character::new(id, name, stats, world, spawn_x, spawn_y)?;
        self.next_id += 1;

        log::debug!("Spawned {} ({}) at ({}, {})", name, id, spawn_x, spawn_y);
        self.characters.push(character);

        Ok(id)
    }

    /// Get a character by ID
    pub fn get(&self, id: CharacterId) -> Option<&Character> {
        self.characters.iter().find(|c| c.id == id)
    }

    /// Get a mutable character by ID
    pub fn get_mut(&mut self, id: CharacterId) -> Option<&mut Character> {
        self.characters.iter_mut().find(|c| c.id == id)
    }

    /// Get the first character with the given name
    pub fn find_by_name(&self, name: &str) -> Option<&Character> {
        self.characters.iter().find(|c| c.name == name)
    }

    /// Get all characters
    pub fn all(&self) -> &[Character] {
        &self.characters
    }

    /// Get all characters mutably
    pub fn all_mut(&mut self) -> &mut [Character] {
        &mut self.characters
    }

    /// Tick every character against the world, in spawn order
    pub fn update(&mut self, world: &PhysicsWorld) {
        for character in &mut self.characters {
            character.tick(world);
        }
    }

    /// Remove a character by ID
    pub fn remove(&mut self, id: CharacterId) -> Option<Character> {
        let pos = self.characters.iter().position(|c| c.id == id)?;
        Some(self.characters.remove(pos))
    }

    /// Get the number of characters
    pub fn count(&self) -> usize {
        self.characters.len()
    }
}
