// Level description: world bounds, tiles, entities and a scripted input timeline
//
// Levels are TOML documents:
//
// ```toml
// [world]
// width = 800
// height = 600
// ticks = 300
//
// [tuning]            # optional, defaults apply per field
// friction = 0.8
//
// [[objects]]
// kind = "tile"
// x = 0
// y = 550
// width = 800
// height = 50
//
// [[objects]]
// kind = "entity"
// name = "player"
// x = 400
// y = 300
//
// [[inputs]]
// tick = 30
// entity = "player"
// direction = "right"
// ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::Rect;
use crate::engine::input::{Direction, ParseDirectionError};
use crate::engine::physics::{MotionTuning, PhysicsError, PhysicsWorld};

use super::characters::{CharacterManager, CharacterStats, BASE_STATS};
use super::session::{GameSession, ScheduledInput};

/// Level loading errors
#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse level: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid level geometry: {0}")]
    Physics(#[from] PhysicsError),

    #[error("Invalid input script: {0}")]
    Direction(#[from] ParseDirectionError),

    #[error("Input at tick {tick} targets unknown entity {name:?}")]
    UnknownEntity { tick: u64, name: String },
}

/// World bounds and run length
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
    /// Number of ticks the headless runner simulates
    #[serde(default = "default_ticks")]
    pub ticks: u64,
}

fn default_ticks() -> u64 {
    600
}

/// Something placed in the level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ObjectConfig {
    /// Static collider
    Tile {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    /// Moving character
    Entity {
        name: String,
        x: f32,
        y: f32,
        #[serde(default = "default_width")]
        width: f32,
        #[serde(default = "default_height")]
        height: f32,
        #[serde(default = "default_agility")]
        agility: f32,
        #[serde(default = "default_weight")]
        weight: f32,
    },
}

fn default_width() -> f32 {
    BASE_STATS.width
}

fn default_height() -> f32 {
    BASE_STATS.height
}

fn default_agility() -> f32 {
    BASE_STATS.agility
}

fn default_weight() -> f32 {
    BASE_STATS.weight
}

/// A scripted input signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    pub tick: u64,
    /// Name of the target entity
    pub entity: String,
    /// One of `up`, `down`, `left`, `right`, `stop`
    pub direction: String,
}

/// Complete level description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub world: WorldConfig,
    #[serde(default)]
    pub tuning: MotionTuning,
    #[serde(default)]
    pub objects: Vec<ObjectConfig>,
    #[serde(default)]
    pub inputs: Vec<InputConfig>,
}

impl Default for LevelConfig {
    /// A wide arena with a ground strip and a short run-and-jump script
    fn default() -> Self {
        let width = 800.0 * 12.0;
        let height = 600.0;

        let script = [
            (60, "right"),
            (90, "up"),
            (150, "stop"),
            (200, "left"),
            (230, "up"),
            (300, "stop"),
        ];

        Self {
            world: WorldConfig {
                width,
                height,
                ticks: default_ticks(),
            },
            tuning: MotionTuning::default(),
            objects: vec![
                ObjectConfig::Tile {
                    x: 0.0,
                    y: height - 50.0,
                    width,
                    height: 50.0,
                },
                ObjectConfig::Entity {
                    name: "player".to_string(),
                    x: 400.0,
                    y: height / 2.0,
                    width: BASE_STATS.width,
                    height: BASE_STATS.height,
                    agility: BASE_STATS.agility,
                    weight: BASE_STATS.weight,
                },
            ],
            inputs: script
                .iter()
                .map(|(tick, direction)| InputConfig {
                    tick: *tick,
                    entity: "player".to_string(),
                    direction: direction.to_string(),
                })
                .collect(),
        }
    }
}

impl LevelConfig {
    /// Parse a level from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, LevelError> {
        Ok(toml::from_str(content)?)
    }

    /// Load a level from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let level = Self::from_toml_str(&content)?;
        log::info!(
            "Loaded level {} ({} objects, {} inputs)",
            path.display(),
            level.objects.len(),
            level.inputs.len()
        );
        Ok(level)
    }

    /// Build a ready-to-run session.
    ///
    /// Tiles keep their order from the file; entities are spawned after all
    /// tiles. Every input must name an entity and a valid direction, and the
    /// tuning must be finite.
    pub fn build(&self) -> Result<GameSession, LevelError> {
        self.tuning.validate()?;

        let mut world =
            PhysicsWorld::new(self.world.width, self.world.height)?.with_tuning(self.tuning);

        for object in &self.objects {
            if let ObjectConfig::Tile {
                x,
                y,
                width,
                height,
            } = object
            {
                world.add_tile(Rect::new(*x, *y, *width, *height))?;
            }
        }

        let mut characters = CharacterManager::new();
        for object in &self.objects {
            if let ObjectConfig::Entity {
                name,
                x,
                y,
                width,
                height,
                agility,
                weight,
            } = object
            {
                let stats = CharacterStats {
                    width: *width,
                    height: *height,
                    agility: *agility,
                    weight: *weight,
                };
                characters.spawn(name, stats, &world, *x, *y)?;
            }
        }

        let mut scheduled = Vec::with_capacity(self.inputs.len());
        for input in &self.inputs {
            let direction: Direction = input.direction.parse()?;
            let character = characters
                .find_by_name(&input.entity)
                .ok_or_else(|| LevelError::UnknownEntity {
                    tick: input.tick,
                    name: input.entity.clone(),
                })?
                .id;
            scheduled.push(ScheduledInput {
                tick: input.tick,
                character,
                direction,
            });
        }

        log::info!(
            "Built level: {} x {} world, {} tiles, {} characters",
            self.world.width,
            self.world.height,
            world.tiles().len(),
            characters.count()
        );

        let mut session = GameSession::new(world, characters);
        for input in scheduled {
            session.schedule(input);
        }
        Ok(session)
    }
}
