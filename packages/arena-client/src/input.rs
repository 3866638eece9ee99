//! Local input state and the physical → logical binding table.
//!
//! Physical inputs are identified by DOM `KeyboardEvent.code` names
//! (`"KeyA"`, `"ArrowLeft"`, ...) and `"Mouse<button>"` for mouse buttons, so
//! the same table serves the macroquad window and a JS-hosted page.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub fn name(self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }

    fn index(self) -> usize {
        match self {
            Direction::Left => 0,
            Direction::Right => 1,
            Direction::Up => 2,
            Direction::Down => 3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DelayDirection {
    Increase,
    Decrease,
}

impl DelayDirection {
    fn index(self) -> usize {
        match self {
            DelayDirection::Increase => 0,
            DelayDirection::Decrease => 1,
        }
    }
}

/// A logical control a physical input can be bound to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Control {
    Move(Direction),
    Delay(DelayDirection),
    Fire,
}

/// Default bindings. Several codes may share one control; they then share
/// its held-flag.
pub const BINDINGS: &[(&str, Control)] = &[
    ("KeyA", Control::Move(Direction::Left)),
    ("ArrowLeft", Control::Move(Direction::Left)),
    ("KeyD", Control::Move(Direction::Right)),
    ("ArrowRight", Control::Move(Direction::Right)),
    ("KeyW", Control::Move(Direction::Up)),
    ("ArrowUp", Control::Move(Direction::Up)),
    ("KeyS", Control::Move(Direction::Down)),
    ("ArrowDown", Control::Move(Direction::Down)),
    ("KeyE", Control::Delay(DelayDirection::Increase)),
    ("KeyQ", Control::Delay(DelayDirection::Decrease)),
    ("Mouse2", Control::Delay(DelayDirection::Decrease)),
    ("Mouse0", Control::Fire),
    ("Space", Control::Fire),
];

pub fn lookup(code: &str) -> Option<Control> {
    BINDINGS
        .iter()
        .find(|(bound, _)| *bound == code)
        .map(|&(_, control)| control)
}

/// What a press or release did to a control's held-flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    Rising,
    Falling,
}

/// Held-flags for every logical control plus the last cursor position.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LocalInputState {
    movement: [bool; 4],
    delay: [bool; 2],
    fire: bool,
    pub cursor: (f32, f32),
}

impl LocalInputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signed movement axes: right minus left, down minus up.
    pub fn movement_axes(&self) -> (i8, i8) {
        let axis = |neg: Direction, pos: Direction| {
            self.movement[pos.index()] as i8 - self.movement[neg.index()] as i8
        };
        (
            axis(Direction::Left, Direction::Right),
            axis(Direction::Up, Direction::Down),
        )
    }

    /// Sets the held-flag; returns the edge only when the flag actually changed.
    pub fn set_held(&mut self, control: Control, held: bool) -> Option<Edge> {
        let flag = self.flag_mut(control);
        if *flag == held {
            return None;
        }
        *flag = held;
        Some(if held { Edge::Rising } else { Edge::Falling })
    }

    fn flag_mut(&mut self, control: Control) -> &mut bool {
        match control {
            Control::Move(d) => &mut self.movement[d.index()],
            Control::Delay(d) => &mut self.delay[d.index()],
            Control::Fire => &mut self.fire,
        }
    }
}
