use arena_client::commands::Frame;
use arena_client::config::{
    AimMode, BodyShape, ControlScheme, DelayScheme, MovementScheme, RenderOptions, GHOST_ALPHA,
};
use arena_client::network::MemoryTransport;
use arena_client::render::{DrawOp, OTHER_COLOR, OWN_COLOR};
use arena_client::session::ClientSession;
use serde_json::json;

const CIRCLES: RenderOptions = RenderOptions {
    body: BodyShape::Circle,
    scores: true,
};

fn session_with(movement: MovementScheme, delay: DelayScheme) -> ClientSession<MemoryTransport> {
    ClientSession::new(
        MemoryTransport::new("me"),
        ControlScheme {
            movement,
            delay,
            aim: AimMode::Aimed,
        },
        CIRCLES,
    )
}

fn state(data: serde_json::Value) -> Frame {
    Frame::new("state", Some(data))
}

fn events(session: &mut ClientSession<MemoryTransport>) -> Vec<String> {
    session
        .transport_mut()
        .take_sent()
        .into_iter()
        .map(|frame| frame.event)
        .collect()
}

#[test]
fn auto_repeat_then_release_sends_one_start_and_one_stop() {
    let mut session = session_with(MovementScheme::Discrete, DelayScheme::Wheel);
    for _ in 0..10 {
        session.key_down("ArrowDown");
    }
    assert_eq!(events(&mut session), vec!["move_start"]);

    session.key_up("ArrowDown");
    for _ in 0..3 {
        session.tick();
    }
    assert_eq!(events(&mut session), vec!["move_stop"]);
}

#[test]
fn continuous_movement_is_sent_every_tick_while_held() {
    let mut session = session_with(MovementScheme::Continuous, DelayScheme::Discrete);
    session.key_down("KeyD");
    session.tick();
    session.tick();
    session.key_up("KeyD");
    session.tick();
    let sent = session.transport_mut().take_sent();
    assert_eq!(
        sent,
        vec![
            Frame::new("move", Some(json!({ "dx": 1, "dy": 0 }))),
            Frame::new("move", Some(json!({ "dx": 1, "dy": 0 }))),
        ]
    );

    session.key_down("KeyQ");
    session.key_up("KeyQ");
    assert_eq!(events(&mut session), vec!["delay_dec_start", "delay_dec_stop"]);
}

#[test]
fn wheel_drives_delay_change() {
    let mut session = session_with(MovementScheme::Discrete, DelayScheme::Wheel);
    session.wheel(0.0);
    session.wheel(150.0);
    assert_eq!(
        session.transport_mut().take_sent(),
        vec![Frame::new("delay_change", Some(json!({ "amount": -1.5 })))]
    );
}

#[test]
fn readout_and_identity_follow_latest_snapshot() {
    let mut session = session_with(MovementScheme::Discrete, DelayScheme::Wheel);
    assert_eq!(session.readout().seconds(), 0.5);

    session.transport_mut().push_inbound(state(json!({
        "shots": [{ "x": 1, "y": 2 }],
        "me": { "x": 10, "y": 20, "delay": 1.1, "score": 3 },
        "them": { "x": 300, "y": 300, "ghost": { "x": 290, "y": 310 } }
    })));
    assert!(session.pump());
    assert_eq!(session.cache().own_id(), Some("me"));
    assert_eq!(session.readout().text(), "Ghost delay: 1.100s");
    assert!(!session.cache().snapshot().players.contains_key("shots"));

    session.transport_mut().set_session_id("reassigned");
    session
        .transport_mut()
        .push_inbound(state(json!({ "them": { "x": 1, "y": 1 } })));
    assert!(session.pump());
    assert_eq!(session.cache().own_id(), Some("me"));
    assert_eq!(session.cache().snapshot().players.len(), 1);
    assert!(session.cache().snapshot().shots.is_empty());
}

#[test]
fn scene_colors_players_by_identity_and_draws_valid_ghosts_only() {
    let mut session = session_with(MovementScheme::Discrete, DelayScheme::Wheel);
    session.receive(state(json!({
        "me": { "x": 10, "y": 20, "ghost": { "x": "late", "y": 0 } },
        "them": { "x": 300, "y": 300, "ghost": { "x": 290, "y": 310 } }
    })));

    let circles: Vec<_> = session
        .scene()
        .into_iter()
        .filter_map(|op| match op {
            DrawOp::FillCircle { x, y, color, .. } => Some((x, y, color)),
            _ => None,
        })
        .collect();
    assert_eq!(
        circles,
        vec![
            (10.0, 20.0, OWN_COLOR),
            (290.0, 310.0, OTHER_COLOR.with_alpha(GHOST_ALPHA)),
            (300.0, 300.0, OTHER_COLOR),
        ]
    );
}

#[test]
fn closed_session_releases_transport() {
    let mut session = session_with(MovementScheme::Discrete, DelayScheme::Wheel);
    session.key_down("KeyA");
    let transport = session.close();
    assert!(transport.is_closed());
    assert_eq!(transport.sent().len(), 1);
}

#[test]
fn offline_session_does_not_accumulate_sends() {
    let mut session = ClientSession::new(
        MemoryTransport::offline(),
        ControlScheme {
            movement: MovementScheme::Continuous,
            delay: DelayScheme::Wheel,
            aim: AimMode::Aimed,
        },
        CIRCLES,
    );
    session.key_down("KeyD");
    for _ in 0..10_000 {
        assert!(session.tick().is_some());
    }
    assert!(session.transport_mut().sent().is_empty());
}
