//! Build-time deployment constants.
//!
//! Nothing here is read at runtime: the endpoint, surface geometry and the
//! control/render variants are fixed per build. Variants are picked with cargo
//! features, each of which flips exactly one choice, so a build can never mix
//! two movement or two delay protocols.

/// Socket.IO endpoint of the authoritative server.
pub const ENDPOINT: &str = "http://localhost:5000";

/// Canvas element the page bootstrap hands to the renderer.
pub const CANVAS_ID: &str = "glcanvas";

pub const BOX_WIDTH: f32 = 500.0;
pub const BOX_HEIGHT: f32 = 500.0;

pub const PLAYER_RADIUS: f32 = 20.0;
/// Rectangle-body variant dimensions.
pub const BODY_WIDTH: f32 = 20.0;
pub const BODY_HEIGHT: f32 = 40.0;
pub const BODY_MARGIN: f32 = 10.0;

pub const SHOT_RADIUS: f32 = 5.0;
pub const GHOST_ALPHA: f32 = 0.4;

/// Shown by the delay readout until a snapshot names the local player.
pub const DEFAULT_DELAY_SECONDS: f64 = 0.5;

/// Wheel deltaY units per second of delay.
pub const WHEEL_DELTA_PER_SECOND: f64 = 100.0;

/// Height of the strip under the box that holds the delay readout.
pub const READOUT_STRIP: f32 = 40.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MovementScheme {
    /// move_start / move_stop per direction.
    Discrete,
    /// move{dx,dy} every frame while held.
    Continuous,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DelayScheme {
    /// delay_inc_* / delay_dec_* edge commands.
    Discrete,
    /// delay_change{amount} from the mouse wheel.
    Wheel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AimMode {
    Aimed,
    AimFree,
}

/// How device input becomes outbound commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControlScheme {
    pub movement: MovementScheme,
    pub delay: DelayScheme,
    pub aim: AimMode,
}

impl ControlScheme {
    pub const DEPLOYED: ControlScheme = ControlScheme {
        movement: if cfg!(feature = "continuous-move") {
            MovementScheme::Continuous
        } else {
            MovementScheme::Discrete
        },
        delay: if cfg!(feature = "discrete-delay") {
            DelayScheme::Discrete
        } else {
            DelayScheme::Wheel
        },
        aim: if cfg!(feature = "aim-free") {
            AimMode::AimFree
        } else {
            AimMode::Aimed
        },
    };
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyShape {
    Circle,
    /// Fixed-size rectangle anchored near the bottom of the box.
    Rect,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    pub body: BodyShape,
    pub scores: bool,
}

impl RenderOptions {
    pub const DEPLOYED: RenderOptions = RenderOptions {
        body: if cfg!(feature = "rect-body") {
            BodyShape::Rect
        } else {
            BodyShape::Circle
        },
        scores: cfg!(feature = "scores"),
    };
}

/// Websocket URL for the Socket.IO endpoint (Engine.IO v4, websocket transport only).
pub fn socket_url(endpoint: &str) -> String {
    let base = endpoint
        .strip_prefix("https://")
        .map(|rest| format!("wss://{rest}"))
        .or_else(|| endpoint.strip_prefix("http://").map(|rest| format!("ws://{rest}")))
        .unwrap_or_else(|| endpoint.to_string());
    format!(
        "{}/socket.io/?EIO=4&transport=websocket",
        base.trim_end_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn socket_url_rewrites_scheme() {
        assert_eq!(
            socket_url("http://localhost:5000"),
            "ws://localhost:5000/socket.io/?EIO=4&transport=websocket"
        );
        assert_eq!(
            socket_url("https://arena.example/"),
            "wss://arena.example/socket.io/?EIO=4&transport=websocket"
        );
    }

    #[cfg(not(any(feature = "continuous-move", feature = "discrete-delay", feature = "aim-free")))]
    #[test]
    fn default_pairing_is_discrete_move_with_wheel_delay() {
        let scheme = ControlScheme::DEPLOYED;
        assert_eq!(scheme.movement, MovementScheme::Discrete);
        assert_eq!(scheme.delay, DelayScheme::Wheel);
        assert_eq!(scheme.aim, AimMode::Aimed);
    }
}
