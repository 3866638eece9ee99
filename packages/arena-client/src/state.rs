//! Authoritative snapshot model as read from `state` messages.
//!
//! Parsing is lenient per field: a malformed ghost or score only loses that
//! element, never the player or the frame.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ClientError;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// `{x, y}` with both coordinates numeric, otherwise `None`.
    fn from_json(value: &Value) -> Option<Point> {
        let x = value.get("x")?.as_f64()?;
        let y = value.get("y")?.as_f64()?;
        Some(Point {
            x: x as f32,
            y: y as f32,
        })
    }
}

/// Score field as sent: absent defaults to zero, a non-numeric value is
/// kept as `Malformed` so only its label is skipped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Score {
    Value(i64),
    Malformed,
}

impl Default for Score {
    fn default() -> Self {
        Score::Value(0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlayerState {
    pub position: Option<Point>,
    pub ghost: Option<Point>,
    pub delay: Option<f64>,
    pub score: Score,
}

impl PlayerState {
    fn from_json(value: &Value) -> PlayerState {
        let score = match value.get("score") {
            None | Some(Value::Null) => Score::default(),
            Some(v) => v
                .as_i64()
                .or_else(|| v.as_f64().map(|f| f.round() as i64))
                .map(Score::Value)
                .unwrap_or(Score::Malformed),
        };
        PlayerState {
            position: Point::from_json(value),
            ghost: value.get("ghost").and_then(Point::from_json),
            delay: value.get("delay").and_then(Value::as_f64),
            score,
        }
    }
}

pub type ShotState = Point;

/// One complete authoritative state push.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WorldSnapshot {
    pub players: BTreeMap<String, PlayerState>,
    pub shots: Vec<ShotState>,
}

impl WorldSnapshot {
    /// Splits a `state` payload into shots and the player mapping. The
    /// `shots` key is removed before the remaining keys are read as players.
    pub fn from_state(data: Value) -> Result<WorldSnapshot, ClientError> {
        let mut object: Map<String, Value> = match data {
            Value::Object(object) => object,
            other => {
                return Err(ClientError::Protocol(format!(
                    "state payload is not an object: {other}"
                )))
            }
        };

        let shots = match object.remove("shots") {
            Some(Value::Array(items)) => items.iter().filter_map(Point::from_json).collect(),
            _ => Vec::new(),
        };

        let players = object
            .iter()
            .map(|(id, entry)| (id.clone(), PlayerState::from_json(entry)))
            .collect();

        Ok(WorldSnapshot { players, shots })
    }

    pub fn player(&self, id: &str) -> Option<&PlayerState> {
        self.players.get(id)
    }
}
