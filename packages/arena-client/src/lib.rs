//! Client for the ghost-delay arena.
//! Captures input as edge-triggered commands, caches the server's latest
//! snapshot and renders it. The macroquad binary drives a window; the
//! wasm-bindgen surface below lets a page that owns its own socket.io
//! client and canvas drive the same core.

pub mod cache;
pub mod commands;
pub mod config;
pub mod device;
pub mod emitter;
pub mod error;
pub mod hud;
pub mod input;
pub mod network;
pub mod render;
pub mod session;
pub mod socketio;
pub mod state;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use commands::{Command, Frame};
use network::MemoryTransport;
use session::ClientSession;

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(Into::into)
}

/// Headless session for a JS host. Input methods return the outbound
/// `{event, data?}` frame to emit, or `null` when the event produced none.
#[wasm_bindgen]
pub struct ArenaCore {
    session: ClientSession<MemoryTransport>,
}

#[wasm_bindgen]
impl ArenaCore {
    #[wasm_bindgen(constructor)]
    pub fn new() -> ArenaCore {
        ArenaCore {
            session: ClientSession::deployed(MemoryTransport::offline()),
        }
    }

    /// Fixed endpoint the host should open its socket.io client against.
    #[wasm_bindgen]
    pub fn endpoint() -> String {
        config::ENDPOINT.to_string()
    }

    #[wasm_bindgen]
    pub fn canvas_id() -> String {
        config::CANVAS_ID.to_string()
    }

    /// `socket.id` once the host's socket has connected.
    #[wasm_bindgen]
    pub fn set_session_id(&mut self, id: &str) {
        self.session.transport_mut().set_session_id(id);
    }

    #[wasm_bindgen]
    pub fn key_down(&mut self, code: &str) -> Result<JsValue, JsValue> {
        let command = self.session.key_down(code);
        self.outbound(command)
    }

    #[wasm_bindgen]
    pub fn key_up(&mut self, code: &str) -> Result<JsValue, JsValue> {
        let command = self.session.key_up(code);
        self.outbound(command)
    }

    #[wasm_bindgen]
    pub fn mouse_move(&mut self, x: f32, y: f32) {
        self.session.mouse_move(x, y);
    }

    #[wasm_bindgen]
    pub fn mouse_down(&mut self, button: u16) -> Result<JsValue, JsValue> {
        let command = self.session.mouse_down(button);
        self.outbound(command)
    }

    #[wasm_bindgen]
    pub fn mouse_up(&mut self, button: u16) -> Result<JsValue, JsValue> {
        let command = self.session.mouse_up(button);
        self.outbound(command)
    }

    #[wasm_bindgen]
    pub fn wheel(&mut self, delta_y: f64) -> Result<JsValue, JsValue> {
        let command = self.session.wheel(delta_y);
        self.outbound(command)
    }

    /// Call once per animation frame.
    #[wasm_bindgen]
    pub fn tick(&mut self) -> Result<JsValue, JsValue> {
        let command = self.session.tick();
        self.outbound(command)
    }

    /// Feeds one inbound `state` payload. Returns true if the view changed.
    #[wasm_bindgen]
    pub fn on_state(&mut self, data: JsValue) -> Result<bool, JsValue> {
        let data: serde_json::Value = serde_wasm_bindgen::from_value(data)?;
        Ok(self.session.receive(Frame::new(session::STATE_EVENT, Some(data))))
    }

    /// Draw operations for the current snapshot, in paint order.
    #[wasm_bindgen]
    pub fn scene(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.scene())
    }

    #[wasm_bindgen]
    pub fn delay_text(&self) -> String {
        self.session.readout().text().to_string()
    }

    fn outbound(&self, command: Option<Command>) -> Result<JsValue, JsValue> {
        match command {
            Some(command) => to_js(&command.to_frame()),
            None => Ok(JsValue::NULL),
        }
    }
}

impl Default for ArenaCore {
    fn default() -> Self {
        Self::new()
    }
}
