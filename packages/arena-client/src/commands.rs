//! Outbound command catalog.
//!
//! Every command is fire-and-forget: it restates held input rather than a
//! delta, so a lost or duplicated send corrects itself on the next one.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::input::Direction;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    Move { dx: i8, dy: i8 },
    MoveStart(Direction),
    MoveStop(Direction),
    Shoot { x: f32, y: f32 },
    ShootAimFree,
    DelayChange { amount: f64 },
    DelayIncStart,
    DelayIncStop,
    DelayDecStart,
    DelayDecStop,
}

impl Command {
    /// Wire event name.
    pub fn event(&self) -> &'static str {
        match self {
            Command::Move { .. } => "move",
            Command::MoveStart(_) => "move_start",
            Command::MoveStop(_) => "move_stop",
            Command::Shoot { .. } | Command::ShootAimFree => "shoot",
            Command::DelayChange { .. } => "delay_change",
            Command::DelayIncStart => "delay_inc_start",
            Command::DelayIncStop => "delay_inc_stop",
            Command::DelayDecStart => "delay_dec_start",
            Command::DelayDecStop => "delay_dec_stop",
        }
    }

    /// Wire payload; `None` for events sent without one.
    pub fn payload(&self) -> Option<Value> {
        match *self {
            Command::Move { dx, dy } => Some(json!({ "dx": dx, "dy": dy })),
            Command::MoveStart(dir) | Command::MoveStop(dir) => {
                Some(json!({ "dir": dir.name() }))
            }
            Command::Shoot { x, y } => Some(json!({ "x": x, "y": y })),
            Command::DelayChange { amount } => Some(json!({ "amount": amount })),
            Command::ShootAimFree
            | Command::DelayIncStart
            | Command::DelayIncStop
            | Command::DelayDecStart
            | Command::DelayDecStop => None,
        }
    }

    pub fn to_frame(&self) -> Frame {
        Frame {
            event: self.event().to_string(),
            data: self.payload(),
        }
    }
}

/// `{"event": name, "data"?: payload}` envelope carried over the JS bridge
/// in both directions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub event: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Frame {
    pub fn new(event: impl Into<String>, data: Option<Value>) -> Self {
        Frame {
            event: event.into(),
            data,
        }
    }
}
