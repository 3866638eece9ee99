use arena_client::config::{BOX_HEIGHT, BOX_WIDTH, READOUT_STRIP};
use arena_client::device::{dom_code, dom_delta_y, MOUSE_BUTTONS, WHEEL_SCALE};
use arena_client::hud;
use arena_client::network::Transport;
use arena_client::session::ClientSession;
use macroquad::prelude::*;

#[cfg(not(target_arch = "wasm32"))]
fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("arena_client=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

#[cfg(not(target_arch = "wasm32"))]
fn open_transport() -> Box<dyn Transport> {
    use arena_client::config::ENDPOINT;

    match arena_client::network::SocketIoTransport::connect(ENDPOINT) {
        Ok(transport) => Box::new(transport),
        Err(err) => {
            tracing::warn!(%err, endpoint = ENDPOINT, "server unreachable, running offline");
            Box::new(arena_client::network::MemoryTransport::offline())
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn open_transport() -> Box<dyn Transport> {
    Box::new(arena_client::network::JsBridge::new())
}

fn forward_input<T: Transport>(session: &mut ClientSession<T>) {
    let (mx, my) = mouse_position();
    session.mouse_move(mx, my);

    for key in get_keys_pressed() {
        if let Some(code) = dom_code(key) {
            session.key_down(code);
        }
    }
    for key in get_keys_released() {
        if let Some(code) = dom_code(key) {
            session.key_up(code);
        }
    }

    for (button, index) in MOUSE_BUTTONS {
        if is_mouse_button_pressed(button) {
            session.mouse_down(index);
        }
        if is_mouse_button_released(button) {
            session.mouse_up(index);
        }
    }

    let (_, wheel_y) = mouse_wheel();
    if wheel_y != 0.0 {
        session.wheel(dom_delta_y(wheel_y, WHEEL_SCALE));
    }
}

fn window_conf() -> Conf {
    Conf {
        window_title: "Ghost Arena".to_string(),
        window_width: BOX_WIDTH as i32,
        window_height: (BOX_HEIGHT + READOUT_STRIP) as i32,
        window_resizable: false,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    init_logging();

    prevent_quit();
    let mut session = ClientSession::deployed(open_transport());
    let mut scene = session.scene();

    loop {
        if is_quit_requested() {
            break;
        }

        forward_input(&mut session);
        if session.pump() {
            scene = session.scene();
        }
        session.tick();

        hud::paint(&scene);
        hud::paint_readout(session.readout());
        next_frame().await;
    }

    session.close();
}
