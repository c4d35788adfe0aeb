//! Slip card geometry as a flat list of draw operations.
//!
//! Everything here is in logical units on an 800×500 canvas; the rasterizer
//! applies the supersampling factor.

use super::fields::SlipFields;
use super::theme::{Rgba, SlipTheme};

pub const CANVAS_WIDTH: f32 = 800.0;
pub const CANVAS_HEIGHT: f32 = 500.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    FillRect {
        rect: Rect,
        color: Rgba,
    },
    FillRoundedRect {
        rect: Rect,
        radius: f32,
        color: Rgba,
    },
    StrokeRoundedRect {
        rect: Rect,
        radius: f32,
        color: Rgba,
        width: f32,
    },
    FillCircle {
        cx: f32,
        cy: f32,
        r: f32,
        color: Rgba,
    },
    Polyline {
        points: Vec<(f32, f32)>,
        color: Rgba,
        width: f32,
        dash: Option<[f32; 2]>,
    },
    /// `y` is the baseline.
    Text {
        text: String,
        x: f32,
        y: f32,
        size: f32,
        color: Rgba,
        anchor: TextAnchor,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlipCanvas {
    pub width: f32,
    pub height: f32,
    pub ops: Vec<DrawOp>,
}

impl SlipCanvas {
    /// Drawn text runs with their font sizes.
    #[cfg(test)]
    pub fn texts(&self) -> impl Iterator<Item = (&str, f32)> + '_ {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, size, .. } => Some((text.as_str(), *size)),
            _ => None,
        })
    }
}

/// Split a centre name into at most two lines at `threshold` characters.
pub fn wrap_center_name(name: &str, threshold: usize) -> Vec<String> {
    if threshold == 0 || name.chars().count() <= threshold {
        return vec![name.to_string()];
    }
    let first: String = name.chars().take(threshold).collect();
    let rest: String = name.chars().skip(threshold).collect();
    vec![first, rest.trim_start().to_string()]
}

const LEFT_ROWS: [&str; 5] = ["full_name", "father_name", "mother_name", "date_of_birth", "ward"];
const LABEL_X: f32 = 44.0;
const VALUE_X: f32 = 200.0;
const FIRST_ROW_Y: f32 = 160.0;
const ROW_STEP: f32 = 52.0;
const CENTER_CARD: Rect = Rect::new(500.0, 128.0, 264.0, 150.0);
const NUMBER_CARD: Rect = Rect::new(500.0, 292.0, 264.0, 110.0);

pub fn layout_slip(slip: &SlipFields, theme: &SlipTheme) -> SlipCanvas {
    let mut ops = Vec::with_capacity(32);
    let text = |text: &str, x, y, size, color, anchor| DrawOp::Text {
        text: text.to_string(),
        x,
        y,
        size,
        color,
        anchor,
    };

    ops.push(DrawOp::FillRect {
        rect: Rect::new(0.0, 0.0, CANVAS_WIDTH, CANVAS_HEIGHT),
        color: theme.background,
    });
    if let Some(mark) = theme.watermark {
        ops.push(text(
            mark,
            CANVAS_WIDTH / 2.0,
            300.0,
            72.0,
            theme.value.with_alpha(16),
            TextAnchor::Middle,
        ));
    }

    // Header band: rounded on top, square where it meets the body.
    let header = Rect::new(12.0, 12.0, 776.0, 92.0);
    ops.push(DrawOp::FillRoundedRect {
        rect: header,
        radius: 24.0,
        color: theme.accent,
    });
    ops.push(DrawOp::FillRect {
        rect: Rect::new(header.x, 64.0, header.w, header.y + header.h - 64.0),
        color: theme.accent,
    });
    ops.push(text(theme.title, LABEL_X, 60.0, 32.0, theme.on_accent, TextAnchor::Start));
    ops.push(text(
        theme.subtitle,
        LABEL_X,
        90.0,
        16.0,
        theme.on_accent.with_alpha(220),
        TextAnchor::Start,
    ));

    // Check badge
    ops.push(DrawOp::FillCircle {
        cx: 740.0,
        cy: 58.0,
        r: 24.0,
        color: theme.on_accent,
    });
    ops.push(DrawOp::Polyline {
        points: vec![(729.0, 58.0), (737.0, 67.0), (752.0, 49.0)],
        color: theme.accent,
        width: 4.0,
        dash: None,
    });

    ops.push(DrawOp::StrokeRoundedRect {
        rect: Rect::new(12.0, 12.0, 776.0, 476.0),
        radius: 24.0,
        color: theme.accent,
        width: 3.0,
    });

    for (i, key) in LEFT_ROWS.iter().enumerate() {
        let Some(field) = slip.get(key) else {
            continue;
        };
        let y = FIRST_ROW_Y + ROW_STEP * i as f32;
        let value_size = if *key == "full_name" { 24.0 } else { 21.0 };
        ops.push(text(field.label, LABEL_X, y, 17.0, theme.label, TextAnchor::Start));
        ops.push(text(&field.value, VALUE_X, y, value_size, theme.value, TextAnchor::Start));
    }

    // Polling centre card
    ops.push(DrawOp::FillRoundedRect {
        rect: CENTER_CARD,
        radius: 16.0,
        color: theme.card_fill,
    });
    ops.push(DrawOp::StrokeRoundedRect {
        rect: CENTER_CARD,
        radius: 16.0,
        color: theme.card_border,
        width: 1.5,
    });
    if let Some(center) = slip.get("center_name") {
        ops.push(text(
            center.label,
            CENTER_CARD.x + 20.0,
            CENTER_CARD.y + 32.0,
            16.0,
            theme.label,
            TextAnchor::Start,
        ));
        for (i, line) in wrap_center_name(&center.value, theme.center_wrap_chars)
            .iter()
            .enumerate()
        {
            ops.push(text(
                line,
                CENTER_CARD.x + 20.0,
                CENTER_CARD.y + 74.0 + 34.0 * i as f32,
                21.0,
                theme.value,
                TextAnchor::Start,
            ));
        }
    }

    // Voter number card
    ops.push(DrawOp::FillRoundedRect {
        rect: NUMBER_CARD,
        radius: 16.0,
        color: theme.accent,
    });
    if let Some(number) = slip.get("voter_number") {
        ops.push(text(
            number.label,
            NUMBER_CARD.x + 20.0,
            NUMBER_CARD.y + 30.0,
            16.0,
            theme.on_accent,
            TextAnchor::Start,
        ));
        ops.push(text(
            &number.value,
            NUMBER_CARD.x + NUMBER_CARD.w / 2.0,
            NUMBER_CARD.y + 86.0,
            theme.number_sizes.size_for(&number.value),
            theme.on_accent,
            TextAnchor::Middle,
        ));
    }

    ops.push(DrawOp::Polyline {
        points: vec![(LABEL_X, 428.0), (CANVAS_WIDTH - LABEL_X, 428.0)],
        color: theme.muted,
        width: 1.0,
        dash: Some([6.0, 4.0]),
    });
    ops.push(text(
        &format!("স্লিপ আইডি: {}", slip.slip_id),
        CANVAS_WIDTH / 2.0,
        454.0,
        13.0,
        theme.muted,
        TextAnchor::Middle,
    ));
    ops.push(text(
        theme.footer_note,
        CANVAS_WIDTH / 2.0,
        474.0,
        12.0,
        theme.muted,
        TextAnchor::Middle,
    ));

    SlipCanvas {
        width: CANVAS_WIDTH,
        height: CANVAS_HEIGHT,
        ops,
    }
}
