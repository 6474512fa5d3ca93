// Per-tick driver for a running level
//
// One tick is a plain sequence of calls: deliver the inputs scheduled for
// this tick, then for each character classify contacts against every tile,
// refresh its contacts and step it. Nothing here waits on a clock; callers
// decide how often to tick.

use crate::engine::input::Direction;
use crate::engine::physics::{BodyShape, Collider, PhysicsWorld};

use super::characters::{CharacterId, CharacterManager, RenderSnapshot};

/// An input signal to deliver at the start of a given tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledInput {
    pub tick: u64,
    pub character: CharacterId,
    pub direction: Direction,
}

/// A world, its characters and a timeline of scripted inputs
#[derive(Debug)]
pub struct GameSession {
    world: PhysicsWorld,
    characters: CharacterManager,
    /// Sorted by tick; entries for the same tick keep insertion order
    inputs: Vec<ScheduledInput>,
    next_input: usize,
    tick: u64,
}

impl GameSession {
    pub fn new(world: PhysicsWorld, characters: CharacterManager) -> Self {
        Self {
            world,
            characters,
            inputs: Vec::new(),
            next_input: 0,
            tick: 0,
        }
    }

    /// Queue an input for a future (or the current) tick
    pub fn schedule(&mut self, input: ScheduledInput) {
        let at = self.inputs[self.next_input..]
            .partition_point(|queued| queued.tick <= input.tick)
            + self.next_input;
        self.inputs.insert(at, input);
    }

    /// Deliver an input immediately. Returns false if the character doesn't exist.
    pub fn send(&mut self, id: CharacterId, direction: Direction) -> bool {
        match self.characters.get_mut(id) {
            Some(character) => {
                character.update(direction);
                true
            }
            None => {
                log::warn!("Dropping input {} for unknown character {}", direction, id);
                false
            }
        }
    }

    /// Advance the whole session by one tick
    pub fn tick(&mut self) {
        while let Some(&input) = self.inputs.get(self.next_input) {
            if input.tick > self.tick {
                break;
            }
            self.next_input += 1;
            log::trace!(
                "Tick {}: {} -> character {}",
                self.tick,
                input.direction,
                input.character
            );
            self.send(input.character, input.direction);
        }

        self.characters.update(&self.world);
        self.tick += 1;
    }

    /// Run `ticks` ticks back to back
    pub fn run(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    /// Number of completed ticks
    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Drawing snapshots of every character, in spawn order
    pub fn snapshots(&self) -> Vec<RenderSnapshot> {
        self.characters.all().iter().map(|c| c.snapshot()).collect()
    }

    /// Every collider in the scene: tiles first, then characters
    pub fn colliders(&self) -> Vec<Collider> {
        let tiles = self
            .world
            .tiles()
            .iter()
            .map(|(handle, tile)| Collider::Static {
                handle,
                tile: *tile,
            });
        let bodies = self
            .characters
            .all()
            .iter()
            .map(|c| Collider::Dynamic(BodyShape::from(c.body())));

        tiles.chain(bodies).collect()
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn characters(&self) -> &CharacterManager {
        &self.characters
    }

    pub fn characters_mut(&mut self) -> &mut CharacterManager {
        &mut self.characters
    }

    /// Number of inputs not yet delivered
    pub fn pending_inputs(&self) -> usize {
        self.inputs.len() - self.next_input
    }
}
