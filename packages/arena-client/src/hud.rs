use macroquad::prelude::*;

use crate::cache::WorldCache;
use crate::config::{BOX_HEIGHT, DEFAULT_DELAY_SECONDS, READOUT_STRIP};
use crate::render::{DrawOp, Rgba};

/// Text output showing the local player's ghost delay as the server last
/// reported it. Created once with the session, refreshed on every snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct DelayReadout {
    seconds: f64,
    text: String,
}

impl DelayReadout {
    pub fn new() -> Self {
        DelayReadout {
            seconds: DEFAULT_DELAY_SECONDS,
            text: Self::format(DEFAULT_DELAY_SECONDS),
        }
    }

    /// Takes the own player's `delay` from the current snapshot. When the
    /// snapshot has none, the last shown value stays.
    pub fn refresh(&mut self, cache: &WorldCache) {
        if let Some(seconds) = cache.own_delay() {
            if seconds != self.seconds {
                self.seconds = seconds;
                self.text = Self::format(seconds);
            }
        }
    }

    pub fn seconds(&self) -> f64 {
        self.seconds
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    fn format(seconds: f64) -> String {
        format!("Ghost delay: {seconds:.3}s")
    }
}

impl Default for DelayReadout {
    fn default() -> Self {
        Self::new()
    }
}

fn to_color(c: Rgba) -> Color {
    Color::new(c.r, c.g, c.b, c.a)
}

/// Executes draw operations in order on the macroquad surface.
pub fn paint(ops: &[DrawOp]) {
    for op in ops {
        match op {
            DrawOp::Clear { color } => clear_background(to_color(*color)),
            DrawOp::StrokeRect {
                x,
                y,
                w,
                h,
                thickness,
                color,
            } => draw_rectangle_lines(*x, *y, *w, *h, *thickness, to_color(*color)),
            DrawOp::FillCircle { x, y, r, color } => draw_circle(*x, *y, *r, to_color(*color)),
            DrawOp::FillRect { x, y, w, h, color } => {
                draw_rectangle(*x, *y, *w, *h, to_color(*color))
            }
            DrawOp::Text {
                text,
                x,
                y,
                size,
                color,
            } => {
                let width = measure_text(text, None, *size as u16, 1.0).width;
                draw_text(text, x - width / 2.0, *y, *size, to_color(*color));
            }
        }
    }
}

pub fn paint_readout(readout: &DelayReadout) {
    draw_text(
        readout.text(),
        8.0,
        BOX_HEIGHT + READOUT_STRIP * 0.65,
        22.0,
        Color::new(0.13, 0.13, 0.13, 1.0),
    );
}
