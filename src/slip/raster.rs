//! Executes a [`SlipCanvas`] onto a tiny-skia pixmap and encodes PNG.

use ab_glyph::{point, Font, FontArc, PxScale, ScaleFont};
use tiny_skia::{FillRule, Paint, Path, PathBuilder, Pixmap, Stroke, StrokeDash, Transform};

use super::layout::{DrawOp, Rect, SlipCanvas, TextAnchor};
use super::theme::Rgba;
use super::RenderError;

/// Rasterize the canvas at `scale` pixels per logical unit.
pub fn rasterize(
    canvas: &SlipCanvas,
    font: &FontArc,
    scale: f32,
) -> Result<Vec<u8>, RenderError> {
    let width = (canvas.width * scale).round() as u32;
    let height = (canvas.height * scale).round() as u32;
    let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
        RenderError::Surface(format!("cannot allocate {width}x{height} surface"))
    })?;
    let transform = Transform::from_scale(scale, scale);

    for op in &canvas.ops {
        match op {
            DrawOp::FillRect { rect, color } => {
                if let Some(r) = tiny_skia::Rect::from_xywh(rect.x, rect.y, rect.w, rect.h) {
                    pixmap.fill_rect(r, &paint(*color), transform, None);
                }
            }
            DrawOp::FillRoundedRect {
                rect,
                radius,
                color,
            } => {
                let path = rounded_rect(*rect, *radius)?;
                pixmap.fill_path(&path, &paint(*color), FillRule::Winding, transform, None);
            }
            DrawOp::StrokeRoundedRect {
                rect,
                radius,
                color,
                width,
            } => {
                let path = rounded_rect(*rect, *radius)?;
                let stroke = Stroke {
                    width: *width,
                    ..Stroke::default()
                };
                pixmap.stroke_path(&path, &paint(*color), &stroke, transform, None);
            }
            DrawOp::FillCircle { cx, cy, r, color } => {
                let path = PathBuilder::from_circle(*cx, *cy, *r)
                    .ok_or_else(|| RenderError::Surface("degenerate circle".to_string()))?;
                pixmap.fill_path(&path, &paint(*color), FillRule::Winding, transform, None);
            }
            DrawOp::Polyline {
                points,
                color,
                width,
                dash,
            } => {
                let Some(path) = polyline(points) else {
                    continue;
                };
                let mut stroke = Stroke {
                    width: *width,
                    ..Stroke::default()
                };
                stroke.dash = (*dash).and_then(|[on, off]| StrokeDash::new(vec![on, off], 0.0));
                pixmap.stroke_path(&path, &paint(*color), &stroke, transform, None);
            }
            DrawOp::Text {
                text,
                x,
                y,
                size,
                color,
                anchor,
            } => draw_text(
                &mut pixmap,
                font,
                text,
                *x * scale,
                *y * scale,
                *size * scale,
                *color,
                *anchor,
            ),
        }
    }

    pixmap
        .encode_png()
        .map_err(|e| RenderError::Encode(e.to_string()))
}

fn paint(color: Rgba) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint
}

fn rounded_rect(rect: Rect, radius: f32) -> Result<Path, RenderError> {
    let r = radius.min(rect.w / 2.0).min(rect.h / 2.0).max(0.0);
    let (x0, y0) = (rect.x, rect.y);
    let (x1, y1) = (rect.x + rect.w, rect.y + rect.h);

    let mut pb = PathBuilder::new();
    pb.move_to(x0 + r, y0);
    pb.line_to(x1 - r, y0);
    pb.quad_to(x1, y0, x1, y0 + r);
    pb.line_to(x1, y1 - r);
    pb.quad_to(x1, y1, x1 - r, y1);
    pb.line_to(x0 + r, y1);
    pb.quad_to(x0, y1, x0, y1 - r);
    pb.line_to(x0, y0 + r);
    pb.quad_to(x0, y0, x0 + r, y0);
    pb.close();
    pb.finish()
        .ok_or_else(|| RenderError::Surface(format!("degenerate rectangle {rect:?}")))
}

fn polyline(points: &[(f32, f32)]) -> Option<Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.0, first.1);
    for (x, y) in rest {
        pb.line_to(*x, *y);
    }
    pb.finish()
}

/// Pixel width of `text` at `px`.
fn measure(font: &FontArc, px: PxScale, text: &str) -> f32 {
    let scaled = font.as_scaled(px);
    let mut width = 0.0;
    let mut previous = None;
    for c in text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(prev) = previous {
            width += scaled.kern(prev, id);
        }
        width += scaled.h_advance(id);
        previous = Some(id);
    }
    width
}

/// Draw one run in device pixels. Glyphs are laid out left to right without shaping.
#[allow(clippy::too_many_arguments)]
fn draw_text(
    pixmap: &mut Pixmap,
    font: &FontArc,
    text: &str,
    x: f32,
    baseline: f32,
    size: f32,
    color: Rgba,
    anchor: TextAnchor,
) {
    let px = PxScale::from(size);
    let scaled = font.as_scaled(px);
    let mut caret = match anchor {
        TextAnchor::Start => x,
        TextAnchor::Middle => x - measure(font, px, text) / 2.0,
    };

    let width = pixmap.width() as i32;
    let height = pixmap.height() as i32;
    let data = pixmap.data_mut();

    let mut previous = None;
    for c in text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(prev) = previous {
            caret += scaled.kern(prev, id);
        }
        let glyph = id.with_scale_and_position(px, point(caret, baseline));
        caret += scaled.h_advance(id);
        previous = Some(id);

        let Some(outlined) = font.outline_glyph(glyph) else {
            continue;
        };
        let bounds = outlined.px_bounds();
        outlined.draw(|gx, gy, coverage| {
            let dx = bounds.min.x as i32 + gx as i32;
            let dy = bounds.min.y as i32 + gy as i32;
            if dx < 0 || dy < 0 || dx >= width || dy >= height {
                return;
            }
            let idx = ((dy * width + dx) * 4) as usize;
            blend(&mut data[idx..idx + 4], color, coverage);
        });
    }
}

/// Source-over onto a premultiplied RGBA pixel.
fn blend(dst: &mut [u8], color: Rgba, coverage: f32) {
    let alpha = (color.a as f32 / 255.0) * coverage.clamp(0.0, 1.0);
    if alpha <= 0.0 {
        return;
    }
    let inv = 1.0 - alpha;
    let src = [color.r, color.g, color.b];
    for (channel, s) in dst.iter_mut().take(3).zip(src) {
        *channel = (s as f32 * alpha + *channel as f32 * inv).round().min(255.0) as u8;
    }
    dst[3] = (255.0 * alpha + dst[3] as f32 * inv).round().min(255.0) as u8;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_full_coverage_replaces_pixel() {
        let mut px = [255, 255, 255, 255];
        blend(&mut px, Rgba::rgb(10, 20, 30), 1.0);
        assert_eq!(px, [10, 20, 30, 255]);
    }

    #[test]
    fn test_blend_zero_coverage_is_noop() {
        let mut px = [1, 2, 3, 4];
        blend(&mut px, Rgba::rgb(10, 20, 30), 0.0);
        assert_eq!(px, [1, 2, 3, 4]);
    }

    #[test]
    fn test_rounded_rect_clamps_radius() {
        assert!(rounded_rect(Rect::new(0.0, 0.0, 10.0, 10.0), 50.0).is_ok());
    }

    #[test]
    fn test_polyline_needs_points() {
        assert!(polyline(&[]).is_none());
        assert!(polyline(&[(0.0, 0.0), (5.0, 5.0)]).is_some());
    }
}
