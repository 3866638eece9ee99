//! macroquad device input expressed in DOM terms, so the window feeds the
//! same binding table and wheel rule as a JS-hosted page.

use macroquad::prelude::{KeyCode, MouseButton};

/// DOM deltaY per unit of macroquad's `mouse_wheel().1`. Native backends
/// report one unit per notch; in the browser miniquad passes the negated
/// DOM delta through unchanged.
#[cfg(not(target_arch = "wasm32"))]
pub const WHEEL_SCALE: f64 = 100.0;
#[cfg(target_arch = "wasm32")]
pub const WHEEL_SCALE: f64 = 1.0;

pub const MOUSE_BUTTONS: [(MouseButton, u16); 3] = [
    (MouseButton::Left, 0),
    (MouseButton::Middle, 1),
    (MouseButton::Right, 2),
];

/// DOM `KeyboardEvent.code` for a macroquad key; keys without one are dropped.
pub fn dom_code(key: KeyCode) -> Option<&'static str> {
    let code = match key {
        KeyCode::A => "KeyA",
        KeyCode::B => "KeyB",
        KeyCode::C => "KeyC",
        KeyCode::D => "KeyD",
        KeyCode::E => "KeyE",
        KeyCode::F => "KeyF",
        KeyCode::G => "KeyG",
        KeyCode::H => "KeyH",
        KeyCode::I => "KeyI",
        KeyCode::J => "KeyJ",
        KeyCode::K => "KeyK",
        KeyCode::L => "KeyL",
        KeyCode::M => "KeyM",
        KeyCode::N => "KeyN",
        KeyCode::O => "KeyO",
        KeyCode::P => "KeyP",
        KeyCode::Q => "KeyQ",
        KeyCode::R => "KeyR",
        KeyCode::S => "KeyS",
        KeyCode::T => "KeyT",
        KeyCode::U => "KeyU",
        KeyCode::V => "KeyV",
        KeyCode::W => "KeyW",
        KeyCode::X => "KeyX",
        KeyCode::Y => "KeyY",
        KeyCode::Z => "KeyZ",
        KeyCode::Left => "ArrowLeft",
        KeyCode::Right => "ArrowRight",
        KeyCode::Up => "ArrowUp",
        KeyCode::Down => "ArrowDown",
        KeyCode::Space => "Space",
        KeyCode::Escape => "Escape",
        KeyCode::Enter => "Enter",
        KeyCode::Tab => "Tab",
        _ => return None,
    };
    Some(code)
}

/// DOM-style `deltaY` for a macroquad wheel reading taken with `scale`
/// units per reading. macroquad's sign is the opposite of DOM's.
pub fn dom_delta_y(wheel_y: f32, scale: f64) -> f64 {
    -(wheel_y as f64) * scale
}
