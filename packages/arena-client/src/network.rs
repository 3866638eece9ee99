use std::cell::RefCell;
use std::collections::VecDeque;

use tracing::warn;

use crate::commands::Frame;
use crate::error::ClientError;

thread_local! {
    static INCOMING: RefCell<Vec<String>> = RefCell::new(Vec::new());
    static SESSION_ID: RefCell<Option<String>> = RefCell::new(None);
}

/// The one persistent event channel to the server. Reconnects, buffering
/// and backoff belong to the implementation, never to the session.
pub trait Transport {
    /// Fire-and-forget send of one event.
    fn emit(&mut self, frame: &Frame) -> Result<(), ClientError>;

    /// Drains every inbound event that arrived since the last call. Never blocks.
    fn poll(&mut self) -> Vec<Frame>;

    /// Locally known session id, once the transport has one.
    fn session_id(&self) -> Option<&str>;

    fn close(&mut self);
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn emit(&mut self, frame: &Frame) -> Result<(), ClientError> {
        (**self).emit(frame)
    }

    fn poll(&mut self) -> Vec<Frame> {
        (**self).poll()
    }

    fn session_id(&self) -> Option<&str> {
        (**self).session_id()
    }

    fn close(&mut self) {
        (**self).close()
    }
}

/// Bridge-only envelope asking the page to disconnect its socket. It is
/// never emitted as a socket.io event: `disconnect` is reserved there.
pub const BRIDGE_CLOSE_EVENT: &str = "__close";

/// Transport owned by the hosting page: its socket.io client pushes events
/// in through [`on_ws_message`] / [`on_session_id`] and emits every envelope
/// we hand to `js_send_ws`, except [`BRIDGE_CLOSE_EVENT`], on which it calls
/// `socket.disconnect()`.
#[derive(Debug, Default)]
pub struct JsBridge {
    session_id: Option<String>,
}

impl JsBridge {
    pub fn new() -> Self {
        Self::default()
    }

    fn send_message(&self, msg: &str) {
        #[cfg(target_arch = "wasm32")]
        {
            let bytes = msg.as_bytes();
            unsafe {
                js_send_ws(bytes.as_ptr(), bytes.len() as u32);
            }
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = msg;
        }
    }
}

impl Transport for JsBridge {
    fn emit(&mut self, frame: &Frame) -> Result<(), ClientError> {
        let msg = serde_json::to_string(frame)?;
        self.send_message(&msg);
        Ok(())
    }

    fn poll(&mut self) -> Vec<Frame> {
        if let Some(sid) = SESSION_ID.with(|s| s.borrow().clone()) {
            self.session_id = Some(sid);
        }
        let raw = INCOMING.with(|q| std::mem::take(&mut *q.borrow_mut()));
        raw.iter()
            .filter_map(|msg| match serde_json::from_str::<Frame>(msg) {
                Ok(frame) => Some(frame),
                Err(err) => {
                    warn!(%err, "dropping malformed bridge message");
                    None
                }
            })
            .collect()
    }

    fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    fn close(&mut self) {
        match serde_json::to_string(&close_envelope()) {
            Ok(msg) => self.send_message(&msg),
            Err(err) => warn!(%err, "close envelope not sent"),
        }
        INCOMING.with(|q| q.borrow_mut().clear());
    }
}

fn close_envelope() -> Frame {
    Frame::new(BRIDGE_CLOSE_EVENT, None)
}

#[cfg(target_arch = "wasm32")]
extern "C" {
    fn js_send_ws(ptr: *const u8, len: u32);
}

#[no_mangle]
pub extern "C" fn alloc_buffer(len: u32) -> *mut u8 {
    let mut buf = Vec::with_capacity(len as usize);
    let ptr = buf.as_mut_ptr();
    std::mem::forget(buf);
    ptr
}

/// Page → Rust: one inbound `{"event":..,"data":..}` envelope.
#[no_mangle]
pub extern "C" fn on_ws_message(ptr: *const u8, len: u32) {
    let slice = unsafe { std::slice::from_raw_parts(ptr, len as usize) };
    if let Ok(s) = std::str::from_utf8(slice) {
        INCOMING.with(|q| q.borrow_mut().push(s.to_string()));
    }
}

/// Page → Rust: the socket.io client's `socket.id`.
#[no_mangle]
pub extern "C" fn on_session_id(ptr: *const u8, len: u32) {
    let slice = unsafe { std::slice::from_raw_parts(ptr, len as usize) };
    if let Ok(s) = std::str::from_utf8(slice) {
        SESSION_ID.with(|sid| *sid.borrow_mut() = Some(s.to_string()));
    }
}

/// In-process transport serving queued inbound events. Used when the server
/// is unreachable, behind the wasm surface, and in tests.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    session_id: Option<String>,
    inbox: VecDeque<Frame>,
    sent: Vec<Frame>,
    recording: bool,
    closed: bool,
}

impl MemoryTransport {
    /// Records every sent frame until taken with [`take_sent`](Self::take_sent).
    pub fn new(session_id: impl Into<String>) -> Self {
        MemoryTransport {
            session_id: Some(session_id.into()),
            recording: true,
            ..Self::default()
        }
    }

    /// No session id and nothing inbound; sends are accepted and discarded.
    pub fn offline() -> Self {
        Self::default()
    }

    pub fn set_session_id(&mut self, session_id: impl Into<String>) {
        self.session_id = Some(session_id.into());
    }

    pub fn push_inbound(&mut self, frame: Frame) {
        self.inbox.push_back(frame);
    }

    pub fn sent(&self) -> &[Frame] {
        &self.sent
    }

    pub fn take_sent(&mut self) -> Vec<Frame> {
        std::mem::take(&mut self.sent)
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Transport for MemoryTransport {
    fn emit(&mut self, frame: &Frame) -> Result<(), ClientError> {
        if self.closed {
            return Err(ClientError::Closed);
        }
        if self.recording {
            self.sent.push(frame.clone());
        }
        Ok(())
    }

    fn poll(&mut self) -> Vec<Frame> {
        self.inbox.drain(..).collect()
    }

    fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    fn close(&mut self) {
        self.closed = true;
        self.inbox.clear();
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::SocketIoTransport;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::io;
    use std::net::TcpStream;

    use tracing::{debug, info, warn};
    use tungstenite::stream::MaybeTlsStream;
    use tungstenite::{Message, WebSocket};

    use super::Transport;
    use crate::commands::Frame;
    use crate::config;
    use crate::error::ClientError;
    use crate::socketio;

    /// Socket.IO over a websocket, polled from the frame loop.
    ///
    /// Only the initial handshake blocks; afterwards the TCP stream is
    /// non-blocking and every read stops at `WouldBlock`.
    pub struct SocketIoTransport {
        socket: WebSocket<MaybeTlsStream<TcpStream>>,
        session_id: Option<String>,
        open: bool,
    }

    impl SocketIoTransport {
        pub fn connect(endpoint: &str) -> Result<Self, ClientError> {
            let url = config::socket_url(endpoint);
            let (socket, _response) = tungstenite::connect(url.as_str())?;
            if let MaybeTlsStream::Plain(stream) = socket.get_ref() {
                stream
                    .set_nonblocking(true)
                    .map_err(|e| ClientError::Transport(e.to_string()))?;
            }
            info!(%url, "websocket connected");
            Ok(SocketIoTransport {
                socket,
                session_id: None,
                open: true,
            })
        }

        fn write(&mut self, text: String) -> Result<(), ClientError> {
            match self.socket.send(Message::text(text)) {
                Ok(()) => Ok(()),
                // Queued; flushed on the next poll.
                Err(tungstenite::Error::Io(e)) if e.kind() == io::ErrorKind::WouldBlock => Ok(()),
                Err(e) => Err(e.into()),
            }
        }

        fn handle_packet(&mut self, text: &str, events: &mut Vec<Frame>) {
            let packet = match socketio::decode(text) {
                Ok(packet) => packet,
                Err(err) => {
                    warn!(%err, "ignoring undecodable packet");
                    return;
                }
            };
            let reaction = socketio::react(packet);
            if let Some(sid) = reaction.session_id {
                self.session_id = Some(sid);
            }
            if let Some(frame) = reaction.event {
                events.push(frame);
            }
            if reaction.closed {
                self.open = false;
            }
            if let Some(reply) = reaction.reply {
                if let Err(err) = self.write(reply.to_string()) {
                    warn!(%err, "control reply failed");
                }
            }
        }
    }

    impl Transport for SocketIoTransport {
        fn emit(&mut self, frame: &Frame) -> Result<(), ClientError> {
            if !self.open {
                return Err(ClientError::Closed);
            }
            let text = socketio::encode_event(frame)?;
            self.write(text)
        }

        fn poll(&mut self) -> Vec<Frame> {
            let mut events = Vec::new();
            if !self.open {
                return events;
            }
            loop {
                match self.socket.read() {
                    Ok(Message::Text(text)) => self.handle_packet(&text, &mut events),
                    Ok(Message::Close(_)) => {
                        info!("websocket closed by server");
                        self.open = false;
                        break;
                    }
                    Ok(_) => {}
                    Err(tungstenite::Error::Io(e)) if e.kind() == io::ErrorKind::WouldBlock => {
                        break
                    }
                    Err(err) => {
                        warn!(%err, "websocket read failed");
                        self.open = false;
                        break;
                    }
                }
            }
            match self.socket.flush() {
                Ok(()) => {}
                Err(tungstenite::Error::Io(e)) if e.kind() == io::ErrorKind::WouldBlock => {}
                Err(err) => debug!(%err, "flush failed"),
            }
            events
        }

        fn session_id(&self) -> Option<&str> {
            self.session_id.as_deref()
        }

        fn close(&mut self) {
            if self.open {
                let _ = self.write("41".to_string());
                let _ = self.socket.close(None);
                let _ = self.socket.flush();
                self.open = false;
            }
        }
    }
}
