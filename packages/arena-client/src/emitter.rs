//! Turns raw device events into outbound commands.
//!
//! Held-flag bookkeeping lives in [`LocalInputState::set_held`]; this module
//! only decides which command, if any, an edge produces under the active
//! [`ControlScheme`].

use tracing::trace;

use crate::commands::Command;
use crate::config::{AimMode, ControlScheme, DelayScheme, MovementScheme, WHEEL_DELTA_PER_SECOND};
use crate::input::{self, Control, DelayDirection, Edge, LocalInputState};

#[derive(Clone, Debug)]
pub struct CommandEmitter {
    scheme: ControlScheme,
    input: LocalInputState,
}

impl CommandEmitter {
    pub fn new(scheme: ControlScheme) -> Self {
        CommandEmitter {
            scheme,
            input: LocalInputState::new(),
        }
    }

    /// Key or mouse button went down. Auto-repeat presses yield `None`.
    pub fn press(&mut self, code: &str) -> Option<Command> {
        self.transition(code, true)
    }

    /// Key or mouse button went up.
    pub fn release(&mut self, code: &str) -> Option<Command> {
        self.transition(code, false)
    }

    pub fn cursor_moved(&mut self, x: f32, y: f32) {
        self.input.cursor = (x, y);
    }

    /// Wheel event in DOM convention (positive `delta_y` scrolls down).
    pub fn wheel(&mut self, delta_y: f64) -> Option<Command> {
        if self.scheme.delay != DelayScheme::Wheel || delta_y == 0.0 {
            return None;
        }
        Some(Command::DelayChange {
            amount: -delta_y / WHEEL_DELTA_PER_SECOND,
        })
    }

    /// Per-frame re-assertion of held movement (continuous scheme only).
    pub fn tick(&self) -> Option<Command> {
        if self.scheme.movement != MovementScheme::Continuous {
            return None;
        }
        match self.input.movement_axes() {
            (0, 0) => None,
            (dx, dy) => Some(Command::Move { dx, dy }),
        }
    }

    fn transition(&mut self, code: &str, held: bool) -> Option<Command> {
        let control = input::lookup(code)?;
        let edge = self.input.set_held(control, held)?;
        let command = self.command_for(control, edge);
        if let Some(command) = &command {
            trace!(code, event = command.event(), "edge command");
        }
        command
    }

    fn command_for(&self, control: Control, edge: Edge) -> Option<Command> {
        match (control, edge) {
            (Control::Move(dir), edge) => match self.scheme.movement {
                MovementScheme::Continuous => None,
                MovementScheme::Discrete => Some(match edge {
                    Edge::Rising => Command::MoveStart(dir),
                    Edge::Falling => Command::MoveStop(dir),
                }),
            },
            (Control::Delay(dir), edge) => match self.scheme.delay {
                DelayScheme::Wheel => None,
                DelayScheme::Discrete => Some(match (dir, edge) {
                    (DelayDirection::Increase, Edge::Rising) => Command::DelayIncStart,
                    (DelayDirection::Increase, Edge::Falling) => Command::DelayIncStop,
                    (DelayDirection::Decrease, Edge::Rising) => Command::DelayDecStart,
                    (DelayDirection::Decrease, Edge::Falling) => Command::DelayDecStop,
                }),
            },
            (Control::Fire, Edge::Rising) => Some(match self.scheme.aim {
                AimMode::Aimed => {
                    let (x, y) = self.input.cursor;
                    Command::Shoot { x, y }
                }
                AimMode::AimFree => Command::ShootAimFree,
            }),
            (Control::Fire, Edge::Falling) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Direction;

    fn scheme(movement: MovementScheme, delay: DelayScheme, aim: AimMode) -> ControlScheme {
        ControlScheme {
            movement,
            delay,
            aim,
        }
    }

    fn discrete() -> CommandEmitter {
        CommandEmitter::new(scheme(
            MovementScheme::Discrete,
            DelayScheme::Discrete,
            AimMode::Aimed,
        ))
    }

    #[test]
    fn held_key_emits_one_start_despite_repeats() {
        let mut emitter = discrete();
        let sent: Vec<_> = (0..5).filter_map(|_| emitter.press("KeyD")).collect();
        assert_eq!(sent, vec![Command::MoveStart(Direction::Right)]);
    }

    #[test]
    fn press_release_emits_start_then_stop_then_nothing() {
        let mut emitter = discrete();
        assert_eq!(emitter.press("KeyW"), Some(Command::MoveStart(Direction::Up)));
        assert_eq!(emitter.release("KeyW"), Some(Command::MoveStop(Direction::Up)));
        assert_eq!(emitter.release("KeyW"), None);
        assert_eq!(emitter.tick(), None);
    }

    #[test]
    fn aliases_share_one_held_flag() {
        let mut emitter = discrete();
        assert_eq!(emitter.press("KeyA"), Some(Command::MoveStart(Direction::Left)));
        assert_eq!(emitter.press("ArrowLeft"), None);
        assert_eq!(emitter.release("ArrowLeft"), Some(Command::MoveStop(Direction::Left)));
        assert_eq!(emitter.release("KeyA"), None);
    }

    #[test]
    fn unknown_codes_are_ignored() {
        let mut emitter = discrete();
        assert_eq!(emitter.press("F13"), None);
        assert_eq!(emitter.release("F13"), None);
        assert_eq!(emitter.input, LocalInputState::new());
    }

    #[test]
    fn discrete_delay_keys_and_mouse_button() {
        let mut emitter = discrete();
        assert_eq!(emitter.press("KeyE"), Some(Command::DelayIncStart));
        assert_eq!(emitter.press("KeyE"), None);
        assert_eq!(emitter.release("KeyE"), Some(Command::DelayIncStop));
        assert_eq!(emitter.press("Mouse2"), Some(Command::DelayDecStart));
        assert_eq!(emitter.release("Mouse2"), Some(Command::DelayDecStop));
        assert_eq!(emitter.wheel(120.0), None);
    }

    #[test]
    fn wheel_amount_is_negated_delta_over_hundred() {
        let mut emitter = CommandEmitter::new(scheme(
            MovementScheme::Discrete,
            DelayScheme::Wheel,
            AimMode::Aimed,
        ));
        assert_eq!(emitter.wheel(0.0), None);
        assert_eq!(emitter.wheel(150.0), Some(Command::DelayChange { amount: -1.5 }));
        assert_eq!(emitter.wheel(-50.0), Some(Command::DelayChange { amount: 0.5 }));
        assert_eq!(emitter.press("KeyE"), None);
    }

    #[test]
    fn aimed_shot_uses_last_cursor() {
        let mut emitter = discrete();
        emitter.cursor_moved(120.0, 44.0);
        assert_eq!(emitter.press("Mouse0"), Some(Command::Shoot { x: 120.0, y: 44.0 }));
        assert_eq!(emitter.press("Mouse0"), None);
        assert_eq!(emitter.release("Mouse0"), None);
        emitter.cursor_moved(1.0, 2.0);
        assert_eq!(emitter.press("Space"), Some(Command::Shoot { x: 1.0, y: 2.0 }));
    }

    #[test]
    fn aim_free_shot_has_no_payload() {
        let mut emitter = CommandEmitter::new(scheme(
            MovementScheme::Discrete,
            DelayScheme::Wheel,
            AimMode::AimFree,
        ));
        emitter.cursor_moved(10.0, 10.0);
        assert_eq!(emitter.press("Mouse0"), Some(Command::ShootAimFree));
    }

    #[test]
    fn continuous_scheme_reasserts_every_tick() {
        let mut emitter = CommandEmitter::new(scheme(
            MovementScheme::Continuous,
            DelayScheme::Wheel,
            AimMode::Aimed,
        ));
        assert_eq!(emitter.press("KeyA"), None);
        assert_eq!(emitter.tick(), Some(Command::Move { dx: -1, dy: 0 }));
        assert_eq!(emitter.tick(), Some(Command::Move { dx: -1, dy: 0 }));
        emitter.press("KeyS");
        assert_eq!(emitter.tick(), Some(Command::Move { dx: -1, dy: 1 }));
        emitter.press("KeyD");
        emitter.release("KeyS");
        assert_eq!(emitter.tick(), None);
        emitter.release("KeyA");
        emitter.release("KeyD");
        assert_eq!(emitter.release("KeyD"), None);
        assert_eq!(emitter.tick(), None);
    }
}
