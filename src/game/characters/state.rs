// Character animation state machine

use crate::engine::input::Direction;

/// Visual/behavioural state of a character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AnimationState {
    /// Standing still
    #[default]
    Idle,
    /// Moving horizontally
    Run,
    /// Jump requested or in the air after a jump
    Jump,
}

impl AnimationState {
    /// Get the animation (sprite set) name for this state
    pub fn animation_name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Run => "run",
            Self::Jump => "jump",
        }
    }
}

/// Horizontal facing, used to mirror sprites
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// Check if the sprite should be drawn mirrored
    pub fn is_flipped(&self) -> bool {
        matches!(self, Self::Left)
    }
}

/// State machine that maps input and landings to animation states
///
/// Input transitions apply immediately, whether or not the character is on
/// the ground. Landing overrides whatever input last selected.
#[derive(Debug, Default)]
pub struct AnimationStateMachine {
    current_state: AnimationState,
    previous_state: AnimationState,
    facing: Facing,
}

impl AnimationStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current state
    pub fn state(&self) -> AnimationState {
        self.current_state
    }

    /// Get the state before the last transition attempt
    pub fn previous_state(&self) -> AnimationState {
        self.previous_state
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// Check if the last update changed the state
    pub fn state_just_changed(&self) -> bool {
        self.current_state != self.previous_state
    }

    /// React to an input signal
    pub fn on_direction(&mut self, direction: Direction) {
        self.previous_state = self.current_state;

        match direction {
            Direction::Left => {
                self.current_state = AnimationState::Run;
                self.facing = Facing::Left;
            }
            Direction::Right => {
                self.current_state = AnimationState::Run;
                self.facing = Facing::Right;
            }
            Direction::Up => self.current_state = AnimationState::Jump,
            Direction::Stop => self.current_state = AnimationState::Idle,
            Direction::Down => {}
        }
    }

    /// React to a contact refresh.
    ///
    /// Landing (not grounded before, grounded now) selects `Idle` when either
    /// the horizontal velocity or the horizontal acceleration is exactly zero,
    /// and `Run` otherwise. Any other refresh leaves the state alone.
    pub fn on_contacts(
        &mut self,
        was_grounded: bool,
        will_be_grounded: bool,
        velocity_x: f32,
        acceleration_x: f32,
    ) {
        self.previous_state = self.current_state;

        if !was_grounded && will_be_grounded {
            self.current_state = if velocity_x == 0.0 || acceleration_x == 0.0 {
                AnimationState::Idle
            } else {
                AnimationState::Run
            };

            if self.state_just_changed() {
                log::debug!(
                    "Landed: {:?} -> {:?}",
                    self.previous_state,
                    self.current_state
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let sm = AnimationStateMachine::new();
        assert_eq!(sm.state(), AnimationState::Idle);
        assert_eq!(sm.previous_state(), AnimationState::Idle);
        assert_eq!(sm.facing(), Facing::Right);
    }

    #[test]
    fn test_horizontal_input_runs_and_faces() {
        let mut sm = AnimationStateMachine::new();

        sm.on_direction(Direction::Left);
        assert_eq!(sm.state(), AnimationState::Run);
        assert_eq!(sm.facing(), Facing::Left);
        assert!(sm.facing().is_flipped());
        assert_eq!(sm.previous_state(), AnimationState::Idle);

        sm.on_direction(Direction::Right);
        assert_eq!(sm.facing(), Facing::Right);
        assert!(!sm.state_just_changed());
    }

    #[test]
    fn test_up_jumps_even_in_the_air() {
        let mut sm = AnimationStateMachine::new();
        sm.on_direction(Direction::Up);
        assert_eq!(sm.state(), AnimationState::Jump);
        assert!(sm.state_just_changed());
    }

    #[test]
    fn test_stop_idles_and_keeps_facing() {
        let mut sm = AnimationStateMachine::new();
        sm.on_direction(Direction::Left);
        sm.on_direction(Direction::Stop);
        assert_eq!(sm.state(), AnimationState::Idle);
        assert_eq!(sm.facing(), Facing::Left);
    }

    #[test]
    fn test_down_changes_nothing() {
        let mut sm = AnimationStateMachine::new();
        sm.on_direction(Direction::Up);
        sm.on_direction(Direction::Down);
        assert_eq!(sm.state(), AnimationState::Jump);
    }

    #[test]
    fn test_landing_still_is_idle() {
        let mut sm = AnimationStateMachine::new();
        sm.on_direction(Direction::Up);

        sm.on_contacts(false, true, 0.0, 0.0);
        assert_eq!(sm.state(), AnimationState::Idle);
        assert_eq!(sm.previous_state(), AnimationState::Jump);
    }

    #[test]
    fn test_landing_while_running_is_run() {
        let mut sm = AnimationStateMachine::new();
        sm.on_direction(Direction::Up);

        sm.on_contacts(false, true, 3.0, 1.0);
        assert_eq!(sm.state(), AnimationState::Run);
    }

    #[test]
    fn test_landing_with_momentum_but_no_input_is_idle() {
        let mut sm = AnimationStateMachine::new();
        sm.on_direction(Direction::Up);

        sm.on_contacts(false, true, 3.0, 0.0);
        assert_eq!(sm.state(), AnimationState::Idle);
    }

    #[test]
    fn test_no_landing_keeps_state() {
        let mut sm = AnimationStateMachine::new();
        sm.on_direction(Direction::Up);

        // Still airborne
        sm.on_contacts(false, false, 0.0, 0.0);
        assert_eq!(sm.state(), AnimationState::Jump);

        // Already grounded: not a landing
        sm.on_contacts(true, true, 0.0, 0.0);
        assert_eq!(sm.state(), AnimationState::Jump);
    }

    #[test]
    fn test_landing_rule_is_idempotent() {
        let mut sm = AnimationStateMachine::new();
        sm.on_direction(Direction::Right);

        sm.on_contacts(false, true, 2.0, 1.0);
        let once = sm.state();
        sm.on_contacts(false, true, 2.0, 1.0);
        assert_eq!(sm.state(), once);
    }

    #[test]
    fn test_animation_names() {
        assert_eq!(AnimationState::Idle.animation_name(), "idle");
        assert_eq!(AnimationState::Run.animation_name(), "run");
        assert_eq!(AnimationState::Jump.animation_name(), "jump");
    }
}
