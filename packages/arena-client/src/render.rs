//! Scene building: the current cache becomes an ordered list of draw
//! operations. Painting them is left to the backend (macroquad in `hud`, or
//! a JS canvas through the wasm surface), so the order here is the paint
//! order.

use serde::Serialize;

use crate::cache::WorldCache;
use crate::config::{
    BodyShape, RenderOptions, BODY_HEIGHT, BODY_MARGIN, BODY_WIDTH, BOX_HEIGHT, BOX_WIDTH,
    GHOST_ALPHA, PLAYER_RADIUS, SHOT_RADIUS,
};
use crate::state::{Point, Score};

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Rgba {
        Rgba { r, g, b, a: 1.0 }
    }

    pub const fn with_alpha(self, a: f32) -> Rgba {
        Rgba { a, ..self }
    }
}

/// #0074D9
pub const OWN_COLOR: Rgba = Rgba::rgb(0.0, 116.0 / 255.0, 217.0 / 255.0);
/// #FF4136
pub const OTHER_COLOR: Rgba = Rgba::rgb(1.0, 65.0 / 255.0, 54.0 / 255.0);
/// #222222
pub const BORDER_COLOR: Rgba = Rgba::rgb(34.0 / 255.0, 34.0 / 255.0, 34.0 / 255.0);
pub const SHOT_COLOR: Rgba = Rgba::rgb(17.0 / 255.0, 17.0 / 255.0, 17.0 / 255.0);
pub const SCORE_COLOR: Rgba = BORDER_COLOR;
pub const BACKGROUND: Rgba = Rgba::rgb(1.0, 1.0, 1.0);

const BORDER_WIDTH: f32 = 2.0;
const SCORE_FONT_SIZE: f32 = 16.0;
const SCORE_GAP: f32 = 6.0;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    Clear {
        color: Rgba,
    },
    StrokeRect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        thickness: f32,
        color: Rgba,
    },
    FillCircle {
        x: f32,
        y: f32,
        r: f32,
        color: Rgba,
    },
    FillRect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Rgba,
    },
    /// `x` is the horizontal center, `y` the baseline.
    Text {
        text: String,
        x: f32,
        y: f32,
        size: f32,
        color: Rgba,
    },
}

/// Color rule shared by the solid shape and its ghost.
pub fn player_color(is_own: bool) -> Rgba {
    if is_own {
        OWN_COLOR
    } else {
        OTHER_COLOR
    }
}

pub fn build_scene(cache: &WorldCache, options: RenderOptions) -> Vec<DrawOp> {
    let snapshot = cache.snapshot();
    let mut ops = Vec::with_capacity(2 + snapshot.shots.len() + snapshot.players.len() * 3);

    ops.push(DrawOp::Clear { color: BACKGROUND });
    ops.push(DrawOp::StrokeRect {
        x: 0.0,
        y: 0.0,
        w: BOX_WIDTH,
        h: BOX_HEIGHT,
        thickness: BORDER_WIDTH,
        color: BORDER_COLOR,
    });

    for shot in &snapshot.shots {
        ops.push(DrawOp::FillCircle {
            x: shot.x,
            y: shot.y,
            r: SHOT_RADIUS,
            color: SHOT_COLOR,
        });
    }

    for (id, player) in &snapshot.players {
        let color = player_color(cache.is_own(id));

        if let Some(ghost) = player.ghost {
            ops.push(DrawOp::FillCircle {
                x: ghost.x,
                y: ghost.y,
                r: PLAYER_RADIUS,
                color: color.with_alpha(GHOST_ALPHA),
            });
        }

        let Some(position) = player.position else {
            continue;
        };
        let (label_x, top) = push_body(&mut ops, position, options.body, color);

        if options.scores {
            if let Score::Value(score) = player.score {
                ops.push(DrawOp::Text {
                    text: score.to_string(),
                    x: label_x,
                    y: top - SCORE_GAP,
                    size: SCORE_FONT_SIZE,
                    color: SCORE_COLOR,
                });
            }
        }
    }

    ops
}

/// Pushes the solid shape and returns its horizontal center and the y of its
/// top edge. A rectangle body's `x` is its left edge.
fn push_body(ops: &mut Vec<DrawOp>, at: Point, body: BodyShape, color: Rgba) -> (f32, f32) {
    match body {
        BodyShape::Circle => {
            ops.push(DrawOp::FillCircle {
                x: at.x,
                y: at.y,
                r: PLAYER_RADIUS,
                color,
            });
            (at.x, at.y - PLAYER_RADIUS)
        }
        BodyShape::Rect => {
            let top = BOX_HEIGHT - BODY_HEIGHT - BODY_MARGIN;
            ops.push(DrawOp::FillRect {
                x: at.x,
                y: top,
                w: BODY_WIDTH,
                h: BODY_HEIGHT,
                color,
            });
            (at.x + BODY_WIDTH / 2.0, top)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const CIRCLES: RenderOptions = RenderOptions {
        body: BodyShape::Circle,
        scores: true,
    };

    fn cache_with(data: serde_json::Value, sid: &str) -> WorldCache {
        let mut cache = WorldCache::new();
        cache.apply_state(data, Some(sid)).unwrap();
        cache
    }

    fn circles(ops: &[DrawOp]) -> Vec<(f32, f32, f32, Rgba)> {
        ops.iter()
            .filter_map(|op| match *op {
                DrawOp::FillCircle { x, y, r, color } => Some((x, y, r, color)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn empty_cache_draws_background_and_border() {
        let ops = build_scene(&WorldCache::new(), CIRCLES);
        assert_eq!(ops.len(), 2);
        assert!(matches!(ops[0], DrawOp::Clear { .. }));
        assert!(matches!(ops[1], DrawOp::StrokeRect { w, h, .. } if w == BOX_WIDTH && h == BOX_HEIGHT));
    }

    #[test]
    fn shots_come_before_players_and_ghost_before_body() {
        let cache = cache_with(
            json!({
                "shots": [{ "x": 7, "y": 8 }],
                "me": { "x": 100, "y": 100, "ghost": { "x": 90, "y": 95 }, "score": 2 }
            }),
            "me",
        );
        let ops = build_scene(&cache, CIRCLES);
        let drawn = circles(&ops);
        assert_eq!(drawn[0], (7.0, 8.0, SHOT_RADIUS, SHOT_COLOR));
        assert_eq!(drawn[1], (90.0, 95.0, PLAYER_RADIUS, OWN_COLOR.with_alpha(GHOST_ALPHA)));
        assert_eq!(drawn[2], (100.0, 100.0, PLAYER_RADIUS, OWN_COLOR));
        assert_eq!(
            ops.last(),
            Some(&DrawOp::Text {
                text: "2".into(),
                x: 100.0,
                y: 100.0 - PLAYER_RADIUS - SCORE_GAP,
                size: SCORE_FONT_SIZE,
                color: SCORE_COLOR,
            })
        );
    }

    #[test]
    fn bad_or_missing_ghost_draws_body_only() {
        let cache = cache_with(
            json!({
                "a": { "x": 10, "y": 10 },
                "b": { "x": 50, "y": 50, "ghost": { "x": null, "y": 1 } }
            }),
            "a",
        );
        let drawn = circles(&build_scene(&cache, CIRCLES));
        assert_eq!(
            drawn,
            vec![
                (10.0, 10.0, PLAYER_RADIUS, OWN_COLOR),
                (50.0, 50.0, PLAYER_RADIUS, OTHER_COLOR),
            ]
        );
    }

    #[test]
    fn score_labels_follow_options_and_validity() {
        let cache = cache_with(
            json!({ "a": { "x": 10, "y": 10, "score": "x" }, "b": { "x": 20, "y": 20 } }),
            "a",
        );
        let texts = |ops: Vec<DrawOp>| {
            ops.into_iter()
                .filter_map(|op| match op {
                    DrawOp::Text { text, .. } => Some(text),
                    _ => None,
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(texts(build_scene(&cache, CIRCLES)), vec!["0".to_string()]);
        let hidden = RenderOptions {
            scores: false,
            ..CIRCLES
        };
        assert!(texts(build_scene(&cache, hidden)).is_empty());
    }

    #[test]
    fn rect_body_is_bottom_anchored_with_x_as_left_edge() {
        let cache = cache_with(
            json!({
                "a": { "x": 0, "y": 0, "score": 4 },
                "b": { "x": BOX_WIDTH - BODY_WIDTH, "y": 0 }
            }),
            "a",
        );
        let options = RenderOptions {
            body: BodyShape::Rect,
            scores: true,
        };
        let top = BOX_HEIGHT - BODY_HEIGHT - BODY_MARGIN;
        let ops = build_scene(&cache, options);
        assert_eq!(
            ops[2],
            DrawOp::FillRect {
                x: 0.0,
                y: top,
                w: BODY_WIDTH,
                h: BODY_HEIGHT,
                color: OWN_COLOR,
            }
        );
        assert_eq!(
            ops[3],
            DrawOp::Text {
                text: "4".into(),
                x: BODY_WIDTH / 2.0,
                y: top - SCORE_GAP,
                size: SCORE_FONT_SIZE,
                color: SCORE_COLOR,
            }
        );
        assert!(matches!(ops[4], DrawOp::FillRect { x, w, .. } if x + w == BOX_WIDTH));
    }
}
