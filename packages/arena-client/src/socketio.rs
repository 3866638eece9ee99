//! Engine.IO v4 / Socket.IO v5 text packet codec, default namespace only.
//!
//! An Engine.IO packet is one type digit followed by its body. Message
//! packets (`4`) wrap a Socket.IO packet, again a type digit plus body:
//!
//! ```text
//! 0{"sid":..,"pingInterval":..}   open
//! 2 / 3                           ping / pong
//! 40 / 40{"sid":..}               namespace connect / connect ack
//! 41                              namespace disconnect
//! 42["event",data]                event
//! 44{"message":..}                connect error
//! ```

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::commands::Frame;
use crate::error::ClientError;

/// Client → server: join the default namespace.
pub const CONNECT: &str = "40";
pub const PONG: &str = "3";

#[derive(Clone, Debug, PartialEq)]
pub enum Packet {
    Open { sid: String },
    Close,
    Ping,
    Pong,
    Connected { sid: String },
    Disconnected,
    Event(Frame),
    ConnectError(String),
    Noop,
}

#[derive(Deserialize)]
struct Handshake {
    sid: String,
}

pub fn decode(text: &str) -> Result<Packet, ClientError> {
    let mut chars = text.chars();
    let kind = chars
        .next()
        .ok_or_else(|| ClientError::Protocol("empty packet".into()))?;
    let body = chars.as_str();
    match kind {
        '0' => {
            let handshake: Handshake = serde_json::from_str(body)?;
            Ok(Packet::Open { sid: handshake.sid })
        }
        '1' => Ok(Packet::Close),
        '2' => Ok(Packet::Ping),
        '3' => Ok(Packet::Pong),
        '4' => decode_message(body),
        '6' => Ok(Packet::Noop),
        other => Err(ClientError::Protocol(format!(
            "unknown engine.io packet type {other:?}"
        ))),
    }
}

fn decode_message(body: &str) -> Result<Packet, ClientError> {
    let mut chars = body.chars();
    let kind = chars
        .next()
        .ok_or_else(|| ClientError::Protocol("empty socket.io packet".into()))?;
    let rest = chars.as_str();
    match kind {
        '0' => {
            let handshake: Handshake = serde_json::from_str(rest)?;
            Ok(Packet::Connected { sid: handshake.sid })
        }
        '1' => Ok(Packet::Disconnected),
        '2' => decode_event(rest),
        '4' => {
            let message = serde_json::from_str::<Value>(rest)
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
                .unwrap_or_else(|| rest.to_string());
            Ok(Packet::ConnectError(message))
        }
        other => Err(ClientError::Protocol(format!(
            "unsupported socket.io packet type {other:?}"
        ))),
    }
}

fn decode_event(body: &str) -> Result<Packet, ClientError> {
    // An ack id may sit between the type and the array; it is not used here.
    let array = body.trim_start_matches(|c: char| c.is_ascii_digit());
    let mut items = match serde_json::from_str::<Value>(array)? {
        Value::Array(items) => items.into_iter(),
        _ => return Err(ClientError::Protocol("event body is not an array".into())),
    };
    let event = match items.next() {
        Some(Value::String(name)) => name,
        _ => return Err(ClientError::Protocol("event without a name".into())),
    };
    Ok(Packet::Event(Frame::new(event, items.next())))
}

/// The client's side of one inbound packet.
#[derive(Debug, Default, PartialEq)]
pub struct Reaction {
    /// Control packet to write back.
    pub reply: Option<&'static str>,
    /// Session id assigned by the namespace connect ack.
    pub session_id: Option<String>,
    pub event: Option<Frame>,
    pub closed: bool,
}

/// Open is answered with a namespace connect, ping with pong; the connect
/// ack carries the session id and events are handed up.
pub fn react(packet: Packet) -> Reaction {
    match packet {
        Packet::Open { sid } => {
            debug!(engine_sid = %sid, "engine.io open");
            Reaction {
                reply: Some(CONNECT),
                ..Reaction::default()
            }
        }
        Packet::Ping => Reaction {
            reply: Some(PONG),
            ..Reaction::default()
        },
        Packet::Connected { sid } => {
            info!(session_id = %sid, "socket.io namespace joined");
            Reaction {
                session_id: Some(sid),
                ..Reaction::default()
            }
        }
        Packet::Event(frame) => Reaction {
            event: Some(frame),
            ..Reaction::default()
        },
        Packet::Disconnected | Packet::Close => {
            info!("server closed the session");
            Reaction {
                closed: true,
                ..Reaction::default()
            }
        }
        Packet::ConnectError(message) => {
            warn!(%message, "namespace connect refused");
            Reaction::default()
        }
        Packet::Pong | Packet::Noop => Reaction::default(),
    }
}

/// `42["event"]` or `42["event",data]`.
pub fn encode_event(frame: &Frame) -> Result<String, ClientError> {
    let mut args = vec![Value::String(frame.event.clone())];
    if let Some(data) = &frame.data {
        args.push(data.clone());
    }
    Ok(format!("42{}", serde_json::to_string(&args)?))
}
