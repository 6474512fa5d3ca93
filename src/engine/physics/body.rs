use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::contact::{contains_surface, Contact, ContactRefresh, Surface};
use super::world::TileSet;
use super::PhysicsError;
use crate::core::math::clamp;
use crate::core::{Bounded, Rect};
use crate::engine::input::Direction;

/// Coefficients of the per-tick motion step
///
/// All values are per tick; there is no delta time. Defaults reproduce the
/// classic feel: strong ground friction, light air drag, half-weight gravity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionTuning {
    /// Horizontal velocity multiplier applied while grounded
    pub friction: f32,
    /// Horizontal velocity multiplier applied every tick
    pub air_resistance: f32,
    /// Gravity acceleration per unit of weight
    pub gravity_scale: f32,
    /// Maximum horizontal speed per unit of agility
    pub max_speed_factor: f32,
    /// Maximum vertical speed per unit of weight
    pub terminal_velocity_factor: f32,
    /// Horizontal acceleration per unit of agility while running
    pub run_factor: f32,
    /// Upward jump acceleration per unit of agility
    pub jump_factor: f32,
}

pub const DEFAULT_TUNING: MotionTuning = MotionTuning {
    friction: 0.9,
    air_resistance: 0.99,
    gravity_scale: 0.5,
    max_speed_factor: 10.0,
    terminal_velocity_factor: 10.0,
    run_factor: 2.0,
    jump_factor: 20.0,
};

impl Default for MotionTuning {
    fn default() -> Self {
        DEFAULT_TUNING
    }
}

impl MotionTuning {
    /// Reject coefficients that would put NaN or infinity into a body
    pub fn validate(&self) -> Result<(), PhysicsError> {
        let finite = [
            (self.friction, "friction"),
            (self.air_resistance, "air_resistance"),
            (self.gravity_scale, "gravity_scale"),
            (self.max_speed_factor, "max_speed_factor"),
            (self.terminal_velocity_factor, "terminal_velocity_factor"),
            (self.run_factor, "run_factor"),
            (self.jump_factor, "jump_factor"),
        ];
        if let Some(&(_, name)) = finite.iter().find(|(value, _)| !value.is_finite()) {
            return Err(PhysicsError::NonFinite(name));
        }

        if self.friction < 0.0 {
            return Err(PhysicsError::OutOfRange("friction"));
        }
        if self.air_resistance < 0.0 {
            return Err(PhysicsError::OutOfRange("air_resistance"));
        }
        Ok(())
    }
}

/// Builder for motion bodies with validated geometry
#[derive(Debug, Clone)]
pub struct BodyBuilder {
    position: Vec2,
    velocity: Vec2,
    width: f32,
    height: f32,
    agility: f32,
    weight: f32,
    world_width: f32,
    world_height: f32,
    tuning: MotionTuning,
}

impl BodyBuilder {
    /// Start a body of the given size at the origin, in an 800 x 600 world
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            width,
            height,
            agility: 0.0,
            weight: 0.0,
            world_width: 800.0,
            world_height: 600.0,
            tuning: MotionTuning::default(),
        }
    }

    /// Set the spawn position (top-left corner)
    pub fn position(mut self, x: f32, y: f32) -> Self {
        self.position = Vec2::new(x, y);
        self
    }

    /// Set the initial velocity
    pub fn velocity(mut self, x: f32, y: f32) -> Self {
        self.velocity = Vec2::new(x, y);
        self
    }

    /// Set movement responsiveness (max speed, run and jump strength)
    pub fn agility(mut self, agility: f32) -> Self {
        self.agility = agility;
        self
    }

    /// Set weight (gravity and terminal velocity)
    pub fn weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    pub fn world_bounds(mut self, width: f32, height: f32) -> Self {
        self.world_width = width;
        self.world_height = height;
        self
    }

    pub fn tuning(mut self, tuning: MotionTuning) -> Self {
        self.tuning = tuning;
        self
    }

    /// Build the body, rejecting geometry that would poison the integrator
    pub fn build(self) -> Result<MotionBody, PhysicsError> {
        if !(self.world_width.is_finite()
            && self.world_height.is_finite()
            && self.world_width > 0.0
            && self.world_height > 0.0)
        {
            return Err(PhysicsError::InvalidWorldBounds {
                width: self.world_width,
                height: self.world_height,
            });
        }

        self.tuning.validate()?;

        let shape = Rect::from_position(self.position, self.width, self.height);
        if !shape.has_positive_size() {
            return Err(PhysicsError::InvalidDimensions {
                what: "body",
                width: self.width,
                height: self.height,
            });
        }
        if !self.position.is_finite() {
            return Err(PhysicsError::NonFinite("body position"));
        }
        if !self.velocity.is_finite() {
            return Err(PhysicsError::NonFinite("body velocity"));
        }
        if !(self.agility.is_finite() && self.agility >= 0.0) {
            return Err(PhysicsError::OutOfRange("agility"));
        }
        if !(self.weight.is_finite() && self.weight >= 0.0) {
            return Err(PhysicsError::OutOfRange("weight"));
        }
        if self.width > self.world_width || self.height > self.world_height {
            return Err(PhysicsError::BodyLargerThanWorld {
                width: self.width,
                height: self.height,
                world_width: self.world_width,
                world_height: self.world_height,
            });
        }

        Ok(MotionBody {
            position: self.position,
            previous_position: self.position,
            velocity: self.velocity,
            acceleration: Vec2::ZERO,
            width: self.width,
            height: self.height,
            agility: self.agility,
            weight: self.weight,
            world_width: self.world_width,
            world_height: self.world_height,
            touching: Vec::new(),
            colliding: Vec::new(),
            is_grounded: false,
            tuning: self.tuning,
        })
    }
}

/// Kinematic state of one moving entity
///
/// The body never owns tile geometry: contacts refer to tiles by handle and
/// are looked up in the caller's `TileSet` during resolution.
#[derive(Debug, Clone)]
pub struct MotionBody {
    position: Vec2,
    /// Position at the start of the current tick
    previous_position: Vec2,
    velocity: Vec2,
    acceleration: Vec2,
    width: f32,
    height: f32,
    agility: f32,
    weight: f32,
    world_width: f32,
    world_height: f32,
    touching: Vec<Contact>,
    colliding: Vec<Contact>,
    is_grounded: bool,
    tuning: MotionTuning,
}

impl MotionBody {
    /// Apply a movement intent.
    ///
    /// Jumping is gated on the grounded flag from the last step; nothing is
    /// re-checked when the impulse is integrated.
    pub fn apply_direction(&mut self, direction: Direction) {
        match direction {
            Direction::Up => {
                if self.is_grounded {
                    self.acceleration.y = -self.agility * self.tuning.jump_factor;
                }
            }
            Direction::Left => self.acceleration.x = -self.agility * self.tuning.run_factor,
            Direction::Right => self.acceleration.x = self.agility * self.tuning.run_factor,
            Direction::Stop => self.acceleration.x = 0.0,
            Direction::Down => {}
        }
    }

    /// Replace both contact lists. Previous contacts are discarded, not merged.
    pub fn set_contacts(&mut self, refresh: ContactRefresh) {
        self.touching = refresh.touching;
        self.colliding = refresh.colliding;
    }

    /// Advance one tick: integrate, move, damp, resolve collisions, clamp to the world
    pub fn step(&mut self, tiles: &TileSet) {
        self.previous_position = self.position;
        self.is_grounded = contains_surface(&self.touching, Surface::Top)
            || contains_surface(&self.colliding, Surface::Top);

        // Integrate and cap speeds
        self.velocity += self.acceleration;
        let max_speed = self.agility * self.tuning.max_speed_factor;
        self.velocity.x = clamp(self.velocity.x, -max_speed, max_speed);
        let terminal_velocity = self.weight * self.tuning.terminal_velocity_factor;
        self.velocity.y = clamp(self.velocity.y, -terminal_velocity, terminal_velocity);

        // Don't push into a surface we're already flush against
        if self.velocity.x > 0.0 && !self.is_touching(Surface::Left) {
            self.position.x += self.velocity.x;
        }
        if self.velocity.y > 0.0 && !self.is_touching(Surface::Top) {
            self.position.y += self.velocity.y;
        }
        if self.velocity.x < 0.0 && !self.is_touching(Surface::Right) {
            self.position.x += self.velocity.x;
        }
        if self.velocity.y < 0.0 && !self.is_touching(Surface::Bottom) {
            self.position.y += self.velocity.y;
        }

        if self.is_grounded {
            self.velocity.x *= self.tuning.friction;
        }
        self.velocity.x *= self.tuning.air_resistance;

        self.acceleration.y = if self.is_grounded {
            0.0
        } else {
            self.weight * self.tuning.gravity_scale
        };

        // Snap out of every tile hit this tick. Later entries win on a shared axis.
        for contact in &self.colliding {
            let Some(tile) = tiles.get(contact.tile) else {
                log::warn!("Contact refers to unknown tile {:?}", contact.tile);
                continue;
            };
            let tile = tile.rect();

            match contact.surface {
                Surface::Top => {
                    self.position.y = tile.top() - self.height;
                    self.previous_position.y = self.position.y;
                    self.velocity.y = 0.0;
                    self.acceleration.y = 0.0;
                }
                Surface::Bottom => {
                    self.position.y = tile.bottom();
                    self.velocity.y = 0.0;
                    self.acceleration.y = 0.0;
                }
                Surface::Left => {
                    self.position.x = tile.left() - self.width;
                    self.velocity.x = 0.0;
                    self.acceleration.x = 0.0;
                }
                Surface::Right => {
                    self.position.x = tile.right();
                    self.velocity.x = 0.0;
                    self.acceleration.x = 0.0;
                }
            }
        }

        self.clamp_to_world();

        debug_assert!(
            self.position.is_finite() && self.velocity.is_finite(),
            "motion step produced non-finite state: position {:?}, velocity {:?}",
            self.position,
            self.velocity
        );
    }

    fn clamp_to_world(&mut self) {
        if self.position.x <= 0.0 {
            self.position.x = 0.0;
            self.velocity.x = 0.0;
        }
        if self.position.x + self.width >= self.world_width {
            self.position.x = self.world_width - self.width;
            self.velocity.x = 0.0;
        }
        if self.position.y <= 0.0 {
            self.position.y = 0.0;
            self.velocity.y = 0.0;
        }
        if self.position.y + self.height >= self.world_height {
            self.position.y = self.world_height - self.height;
            self.velocity.y = 0.0;
        }
    }

    /// Check if the body is flush against a surface of some tile
    pub fn is_touching(&self, surface: Surface) -> bool {
        contains_surface(&self.touching, surface)
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn previous_position(&self) -> Vec2 {
        self.previous_position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn acceleration(&self) -> Vec2 {
        self.acceleration
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn agility(&self) -> f32 {
        self.agility
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }

    /// World width and height
    pub fn world_size(&self) -> Vec2 {
        Vec2::new(self.world_width, self.world_height)
    }

    pub fn touching(&self) -> &[Contact] {
        &self.touching
    }

    pub fn colliding(&self) -> &[Contact] {
        &self.colliding
    }

    /// Grounded flag computed at the start of the last step
    pub fn is_grounded(&self) -> bool {
        self.is_grounded
    }

    pub fn tuning(&self) -> &MotionTuning {
        &self.tuning
    }
}

impl Bounded for MotionBody {
    fn rect(&self) -> Rect {
        Rect::from_position(self.position, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::physics::TileHandle;
    use approx::assert_relative_eq;

    fn body_at(x: f32, y: f32) -> BodyBuilder {
        BodyBuilder::new(50.0, 50.0)
            .position(x, y)
            .agility(0.5)
            .weight(1.0)
            .world_bounds(800.0, 600.0)
    }

    fn ground_tiles() -> (TileSet, TileHandle) {
        let mut tiles = TileSet::new();
        let ground = tiles.insert(Rect::new(0.0, 550.0, 800.0, 50.0)).unwrap();
        (tiles, ground)
    }

    fn touching(contacts: Vec<Contact>) -> ContactRefresh {
        ContactRefresh {
            touching: contacts,
            colliding: Vec::new(),
        }
    }

    fn colliding(contacts: Vec<Contact>) -> ContactRefresh {
        ContactRefresh {
            touching: Vec::new(),
            colliding: contacts,
        }
    }

    #[test]
    fn test_builder_defaults() {
        let body = BodyBuilder::new(10.0, 20.0).build().unwrap();
        assert_eq!(body.position(), Vec2::ZERO);
        assert_eq!(body.previous_position(), Vec2::ZERO);
        assert_eq!(body.world_size(), Vec2::new(800.0, 600.0));
        assert_eq!(*body.tuning(), DEFAULT_TUNING);
        assert!(!body.is_grounded());
    }

    #[test]
    fn test_builder_rejects_degenerate_geometry() {
        assert!(matches!(
            BodyBuilder::new(0.0, 10.0).build(),
            Err(PhysicsError::InvalidDimensions { what: "body", .. })
        ));
        assert!(matches!(
            BodyBuilder::new(10.0, 10.0).world_bounds(0.0, 600.0).build(),
            Err(PhysicsError::InvalidWorldBounds { .. })
        ));
        assert!(matches!(
            BodyBuilder::new(10.0, 10.0).position(f32::NAN, 0.0).build(),
            Err(PhysicsError::NonFinite(_))
        ));
        assert!(matches!(
            BodyBuilder::new(10.0, 10.0).weight(-1.0).build(),
            Err(PhysicsError::OutOfRange("weight"))
        ));
        assert!(matches!(
            BodyBuilder::new(900.0, 10.0).build(),
            Err(PhysicsError::BodyLargerThanWorld { .. })
        ));
    }

    #[test]
    fn test_builder_rejects_broken_tuning() {
        let tuning = MotionTuning {
            air_resistance: f32::NAN,
            ..DEFAULT_TUNING
        };
        assert_eq!(
            body_at(100.0, 100.0).tuning(tuning).build().unwrap_err(),
            PhysicsError::NonFinite("air_resistance")
        );

        let tuning = MotionTuning {
            gravity_scale: f32::INFINITY,
            ..DEFAULT_TUNING
        };
        assert!(body_at(100.0, 100.0).tuning(tuning).build().is_err());

        let tuning = MotionTuning {
            friction: -0.5,
            ..DEFAULT_TUNING
        };
        assert_eq!(tuning.validate(), Err(PhysicsError::OutOfRange("friction")));
        assert_eq!(DEFAULT_TUNING.validate(), Ok(()));
    }

    #[test]
    fn test_horizontal_intents() {
        let mut body = body_at(100.0, 100.0).build().unwrap();

        body.apply_direction(Direction::Left);
        assert_eq!(body.acceleration().x, -1.0);

        body.apply_direction(Direction::Right);
        assert_eq!(body.acceleration().x, 1.0);

        body.apply_direction(Direction::Stop);
        assert_eq!(body.acceleration().x, 0.0);
    }

    #[test]
    fn test_down_is_a_no_op() {
        let mut body = body_at(100.0, 100.0).build().unwrap();
        body.apply_direction(Direction::Right);
        let before = body.acceleration();

        body.apply_direction(Direction::Down);
        assert_eq!(body.acceleration(), before);
    }

    #[test]
    fn test_jump_requires_ground() {
        let (tiles, ground) = ground_tiles();
        let mut body = body_at(400.0, 100.0).build().unwrap();

        // Airborne: intent ignored
        body.apply_direction(Direction::Up);
        assert_eq!(body.acceleration().y, 0.0);

        // Standing on the ground tile
        let mut body = body_at(400.0, 500.0).build().unwrap();
        body.set_contacts(touching(vec![Contact::new(ground, Surface::Top)]));
        body.step(&tiles);
        assert!(body.is_grounded());

        body.apply_direction(Direction::Up);
        assert_eq!(body.acceleration().y, -10.0);
    }

    #[test]
    fn test_gravity_builds_up_when_airborne() {
        let tiles = TileSet::new();
        let mut body = body_at(400.0, 100.0).build().unwrap();

        body.step(&tiles);
        assert_eq!(body.position().y, 100.0);
        assert_eq!(body.acceleration().y, 0.5);

        body.step(&tiles);
        assert_eq!(body.velocity().y, 0.5);
        assert_eq!(body.position().y, 100.5);
        assert_eq!(body.previous_position().y, 100.0);
    }

    #[test]
    fn test_speeds_are_capped() {
        let tiles = TileSet::new();
        let mut body = body_at(100.0, 100.0).velocity(50.0, 50.0).build().unwrap();

        body.step(&tiles);
        assert_eq!(body.position(), Vec2::new(105.0, 110.0));
        assert_relative_eq!(body.velocity().x, 5.0 * 0.99);
        assert_eq!(body.velocity().y, 10.0);
    }

    #[test]
    fn test_touching_blocks_motion_into_surface() {
        let mut tiles = TileSet::new();
        let wall = tiles.insert(Rect::new(150.0, 0.0, 20.0, 600.0)).unwrap();
        let mut body = body_at(100.0, 100.0).velocity(3.0, 0.0).build().unwrap();

        body.set_contacts(touching(vec![Contact::new(wall, Surface::Left)]));
        body.step(&tiles);
        assert_eq!(body.position().x, 100.0);

        // Moving away from the wall is allowed
        let mut body = body_at(100.0, 100.0).velocity(-3.0, 0.0).build().unwrap();
        body.set_contacts(touching(vec![Contact::new(wall, Surface::Left)]));
        body.step(&tiles);
        assert_eq!(body.position().x, 97.0);
    }

    #[test]
    fn test_friction_only_when_grounded() {
        let (tiles, ground) = ground_tiles();

        let mut airborne = body_at(100.0, 100.0).velocity(4.0, 0.0).build().unwrap();
        airborne.step(&tiles);
        assert_relative_eq!(airborne.velocity().x, 4.0 * 0.99);

        let mut grounded = body_at(100.0, 500.0).velocity(4.0, 0.0).build().unwrap();
        grounded.set_contacts(touching(vec![Contact::new(ground, Surface::Top)]));
        grounded.step(&tiles);
        assert_relative_eq!(grounded.velocity().x, 4.0 * 0.9 * 0.99);
        assert_eq!(grounded.acceleration().y, 0.0);
    }

    #[test]
    fn test_collision_snaps_flush_and_stops_axis() {
        let (tiles, ground) = ground_tiles();
        let mut body = body_at(400.0, 505.0).velocity(0.0, 10.0).build().unwrap();

        body.set_contacts(colliding(vec![Contact::new(ground, Surface::Top)]));
        body.step(&tiles);

        assert_eq!(body.position().y, 500.0);
        assert_eq!(body.previous_position().y, 500.0);
        assert_eq!(body.velocity().y, 0.0);
        assert_eq!(body.acceleration().y, 0.0);
        assert!(body.is_grounded());
    }

    #[test]
    fn test_side_collisions_snap_horizontally() {
        let mut tiles = TileSet::new();
        let wall = tiles.insert(Rect::new(300.0, 0.0, 20.0, 600.0)).unwrap();

        let mut from_left = body_at(255.0, 100.0).velocity(5.0, 0.0).build().unwrap();
        from_left.apply_direction(Direction::Right);
        from_left.set_contacts(colliding(vec![Contact::new(wall, Surface::Left)]));
        from_left.step(&tiles);
        assert_eq!(from_left.position().x, 250.0);
        assert_eq!(from_left.velocity().x, 0.0);
        assert_eq!(from_left.acceleration().x, 0.0);

        let mut from_right = body_at(315.0, 100.0).build().unwrap();
        from_right.set_contacts(colliding(vec![Contact::new(wall, Surface::Right)]));
        from_right.step(&tiles);
        assert_eq!(from_right.position().x, 320.0);
    }

    #[test]
    fn test_last_collision_on_an_axis_wins() {
        // Two tiles hit on the same axis in one tick: resolution follows list
        // order, so the second entry decides the final position.
        let mut tiles = TileSet::new();
        let high = tiles.insert(Rect::new(0.0, 300.0, 400.0, 20.0)).unwrap();
        let low = tiles.insert(Rect::new(400.0, 310.0, 400.0, 20.0)).unwrap();
        let mut body = body_at(380.0, 265.0).build().unwrap();

        body.set_contacts(colliding(vec![
            Contact::new(high, Surface::Top),
            Contact::new(low, Surface::Top),
        ]));
        body.step(&tiles);
        assert_eq!(body.position().y, 260.0);

        body.set_contacts(colliding(vec![
            Contact::new(low, Surface::Top),
            Contact::new(high, Surface::Top),
        ]));
        body.step(&tiles);
        assert_eq!(body.position().y, 250.0);
    }

    #[test]
    fn test_world_clamp() {
        let tiles = TileSet::new();

        let mut left = body_at(2.0, 100.0).velocity(-5.0, 0.0).build().unwrap();
        left.step(&tiles);
        assert_eq!(left.position().x, 0.0);
        assert_eq!(left.velocity().x, 0.0);

        let mut right = body_at(748.0, 100.0).velocity(5.0, 0.0).build().unwrap();
        right.step(&tiles);
        assert_eq!(right.position().x, 750.0);
        assert_eq!(right.velocity().x, 0.0);

        let mut floor = body_at(100.0, 545.0).velocity(0.0, 10.0).build().unwrap();
        floor.step(&tiles);
        assert_eq!(floor.position().y, 550.0);
        assert_eq!(floor.velocity().y, 0.0);

        let mut ceiling = body_at(100.0, 3.0).velocity(0.0, -10.0).build().unwrap();
        ceiling.step(&tiles);
        assert_eq!(ceiling.position().y, 0.0);
        assert_eq!(ceiling.velocity().y, 0.0);
    }

    #[test]
    fn test_flush_against_wall_is_a_fixed_point() {
        let mut tiles = TileSet::new();
        let ground = tiles.insert(Rect::new(0.0, 550.0, 800.0, 50.0)).unwrap();
        let wall = tiles.insert(Rect::new(450.0, 0.0, 20.0, 550.0)).unwrap();
        let mut body = body_at(400.0, 500.0).build().unwrap();

        for _ in 0..20 {
            body.set_contacts(touching(vec![
                Contact::new(ground, Surface::Top),
                Contact::new(wall, Surface::Left),
            ]));
            body.step(&tiles);
            assert_eq!(body.position(), Vec2::new(400.0, 500.0));
            assert_eq!(body.velocity(), Vec2::ZERO);
        }
    }

    #[test]
    fn test_contacts_are_replaced() {
        let (tiles, ground) = ground_tiles();
        let mut body = body_at(400.0, 500.0).build().unwrap();

        body.set_contacts(touching(vec![Contact::new(ground, Surface::Top)]));
        assert_eq!(body.touching().len(), 1);

        body.set_contacts(ContactRefresh::new());
        assert!(body.touching().is_empty());
        assert!(body.colliding().is_empty());

        body.step(&tiles);
        assert!(!body.is_grounded());
    }
}
