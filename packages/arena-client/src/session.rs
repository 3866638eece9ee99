//! One client session: input state, command emission, the world cache and
//! the delay readout, bound to a single transport for its whole lifetime.
//!
//! Everything runs on the caller's thread. Device callbacks, the frame tick
//! and the network pump are plain method calls that never block.

use tracing::{debug, warn};

use crate::cache::WorldCache;
use crate::commands::{Command, Frame};
use crate::config::{ControlScheme, RenderOptions};
use crate::emitter::CommandEmitter;
use crate::hud::DelayReadout;
use crate::network::Transport;
use crate::render::{self, DrawOp};

pub const STATE_EVENT: &str = "state";

pub struct ClientSession<T: Transport> {
    transport: T,
    emitter: CommandEmitter,
    cache: WorldCache,
    readout: DelayReadout,
    render: RenderOptions,
}

impl<T: Transport> ClientSession<T> {
    pub fn new(transport: T, scheme: ControlScheme, render: RenderOptions) -> Self {
        ClientSession {
            transport,
            emitter: CommandEmitter::new(scheme),
            cache: WorldCache::new(),
            readout: DelayReadout::new(),
            render,
        }
    }

    /// Session with the variants this build was compiled for.
    pub fn deployed(transport: T) -> Self {
        Self::new(transport, ControlScheme::DEPLOYED, RenderOptions::DEPLOYED)
    }

    pub fn key_down(&mut self, code: &str) -> Option<Command> {
        let command = self.emitter.press(code);
        self.send(command)
    }

    pub fn key_up(&mut self, code: &str) -> Option<Command> {
        let command = self.emitter.release(code);
        self.send(command)
    }

    pub fn mouse_move(&mut self, x: f32, y: f32) {
        self.emitter.cursor_moved(x, y);
    }

    pub fn mouse_down(&mut self, button: u16) -> Option<Command> {
        self.key_down(&mouse_code(button))
    }

    pub fn mouse_up(&mut self, button: u16) -> Option<Command> {
        self.key_up(&mouse_code(button))
    }

    /// Wheel delta in DOM convention (positive scrolls down).
    pub fn wheel(&mut self, delta_y: f64) -> Option<Command> {
        let command = self.emitter.wheel(delta_y);
        self.send(command)
    }

    /// Display refresh: re-asserts continuous movement when that scheme is active.
    pub fn tick(&mut self) -> Option<Command> {
        let command = self.emitter.tick();
        self.send(command)
    }

    /// Drains the transport. Returns true when at least one snapshot replaced
    /// the cache, i.e. the view needs a redraw.
    pub fn pump(&mut self) -> bool {
        let mut refreshed = false;
        for frame in self.transport.poll() {
            refreshed |= self.receive(frame);
        }
        refreshed
    }

    /// Handles one inbound event; true if it replaced the snapshot.
    pub fn receive(&mut self, frame: Frame) -> bool {
        if frame.event != STATE_EVENT {
            debug!(event = %frame.event, "ignoring inbound event");
            return false;
        }
        let data = frame.data.unwrap_or_default();
        let session_id = self.transport.session_id();
        match self.cache.apply_state(data, session_id) {
            Ok(()) => {
                self.readout.refresh(&self.cache);
                true
            }
            Err(err) => {
                warn!(%err, "state message dropped");
                false
            }
        }
    }

    pub fn scene(&self) -> Vec<DrawOp> {
        render::build_scene(&self.cache, self.render)
    }

    pub fn cache(&self) -> &WorldCache {
        &self.cache
    }

    pub fn readout(&self) -> &DelayReadout {
        &self.readout
    }

    pub fn emitter(&self) -> &CommandEmitter {
        &self.emitter
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Closes the transport and hands it back; input state and cache go
    /// with the session.
    pub fn close(mut self) -> T {
        self.transport.close();
        self.transport
    }

    fn send(&mut self, command: Option<Command>) -> Option<Command> {
        let command = command?;
        let frame = command.to_frame();
        debug!(event = %frame.event, data = ?frame.data, "emit");
        if let Err(err) = self.transport.emit(&frame) {
            warn!(%err, event = %frame.event, "send dropped");
        }
        Some(command)
    }
}

pub fn mouse_code(button: u16) -> String {
    format!("Mouse{button}")
}
