//! Pixel-level drawing on `RgbaImage` surfaces: rectangle outlines, round
//! brush segments and scaled layer compositing.

use image::imageops::{self, FilterType};
use image::{Pixel, Rgba, RgbaImage};

use crate::model::{CanvasSize, Rectangle};

pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

pub fn blank(size: CanvasSize) -> RgbaImage {
    RgbaImage::from_pixel(size.width, size.height, TRANSPARENT)
}

pub fn clear(img: &mut RgbaImage) {
    for px in img.pixels_mut() {
        *px = TRANSPARENT;
    }
}

/// Strokes the outline of `rect` in its own color, centered on the rectangle
/// path like a 2D canvas `strokeRect`. A pixel is covered when its center lies
/// inside the outer edge and outside the inner edge of the stroke band.
pub fn stroke_rect(img: &mut RgbaImage, rect: &Rectangle, line_width: f32) {
    if rect.width == 0.0 && rect.height == 0.0 {
        return;
    }
    let half = line_width / 2.0;
    let (x0, y0, x1, y1) = rect.normalized();
    let outer = (x0 - half, y0 - half, x1 + half, y1 + half);
    let inner = (x0 + half, y0 + half, x1 - half, y1 - half);
    let has_hole = inner.0 < inner.2 && inner.1 < inner.3;
    let color = Rgba(rect.color.rgba());

    let (w, h) = img.dimensions();
    let px_min = outer.0.floor().max(0.0) as u32;
    let py_min = outer.1.floor().max(0.0) as u32;
    let px_max = outer.2.ceil().min(w as f32).max(0.0) as u32;
    let py_max = outer.3.ceil().min(h as f32).max(0.0) as u32;

    for py in py_min..py_max {
        let cy = py as f32 + 0.5;
        if cy < outer.1 || cy >= outer.3 {
            continue;
        }
        for px in px_min..px_max {
            let cx = px as f32 + 0.5;
            if cx < outer.0 || cx >= outer.2 {
                continue;
            }
            let in_hole =
                has_hole && cx > inner.0 && cx < inner.2 && cy > inner.1 && cy < inner.3;
            if !in_hole {
                img.get_pixel_mut(px, py).blend(&color);
            }
        }
    }
}

/// Strokes every rectangle in order; later rectangles paint over earlier ones.
pub fn stroke_all<'a>(
    img: &mut RgbaImage,
    rects: impl IntoIterator<Item = &'a Rectangle>,
    line_width: f32,
) {
    for rect in rects {
        stroke_rect(img, rect, line_width);
    }
}

/// Stamps a round brush along the segment `from` → `to`.
pub fn stamp_segment(
    img: &mut RgbaImage,
    from: (f32, f32),
    to: (f32, f32),
    radius: f32,
    color: Rgba<u8>,
) {
    let dx = to.0 - from.0;
    let dy = to.1 - from.1;
    let len = (dx * dx + dy * dy).sqrt();
    let steps = ((len * 2.0) as i32).max(1);

    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        stamp_disc(img, from.0 + dx * t, from.1 + dy * t, radius, color);
    }
}

fn stamp_disc(img: &mut RgbaImage, cx: f32, cy: f32, radius: f32, color: Rgba<u8>) {
    let r = radius.max(0.5);
    let (w, h) = (img.width() as i32, img.height() as i32);
    let x_min = ((cx - r).floor() as i32).max(0);
    let y_min = ((cy - r).floor() as i32).max(0);
    let x_max = ((cx + r).ceil() as i32).min(w);
    let y_max = ((cy + r).ceil() as i32).min(h);

    for py in y_min..y_max {
        for px in x_min..x_max {
            let ox = px as f32 + 0.5 - cx;
            let oy = py as f32 + 0.5 - cy;
            if ox * ox + oy * oy <= r * r {
                img.put_pixel(px as u32, py as u32, color);
            }
        }
    }
}

/// Draws `src` over `dst`, stretched to cover all of `dst`.
pub fn draw_scaled(dst: &mut RgbaImage, src: &RgbaImage) {
    if dst.width() == 0 || dst.height() == 0 || src.width() == 0 || src.height() == 0 {
        return;
    }
    if src.dimensions() == dst.dimensions() {
        imageops::overlay(dst, src, 0, 0);
    } else {
        let scaled = imageops::resize(src, dst.width(), dst.height(), FilterType::Triangle);
        imageops::overlay(dst, &scaled, 0, 0);
    }
}

pub fn to_color_image(img: &RgbaImage) -> egui::ColorImage {
    let size = [img.width() as usize, img.height() as usize];
    egui::ColorImage::from_rgba_unmultiplied(size, img.as_raw())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LabelColor;

    fn blue_square() -> Rectangle {
        Rectangle {
            start_x: 0.0,
            start_y: 0.0,
            width: 50.0,
            height: 50.0,
            color: LabelColor::Question,
        }
    }

    #[test]
    fn two_pixel_outline_is_centered_on_path() {
        let mut img = blank(CanvasSize::new(100, 100));
        stroke_rect(&mut img, &blue_square(), 2.0);

        let blue = Rgba([0, 0, 255, 255]);
        assert_eq!(*img.get_pixel(0, 25), blue);
        assert_eq!(*img.get_pixel(25, 0), blue);
        assert_eq!(*img.get_pixel(49, 25), blue);
        assert_eq!(*img.get_pixel(50, 25), blue);
        assert_eq!(*img.get_pixel(25, 50), blue);

        assert_eq!(*img.get_pixel(1, 25), TRANSPARENT);
        assert_eq!(*img.get_pixel(25, 25), TRANSPARENT);
        assert_eq!(*img.get_pixel(51, 25), TRANSPARENT);
    }

    #[test]
    fn negative_extents_cover_same_pixels() {
        let mut forward = blank(CanvasSize::new(80, 80));
        let mut backward = blank(CanvasSize::new(80, 80));
        let rect = Rectangle::from_drag((10.0, 10.0), (60.0, 40.0), LabelColor::Image);
        let flipped = Rectangle::from_drag((60.0, 40.0), (10.0, 10.0), LabelColor::Image);
        stroke_rect(&mut forward, &rect, 2.0);
        stroke_rect(&mut backward, &flipped, 2.0);
        assert_eq!(forward, backward);
    }

    #[test]
    fn degenerate_rectangles() {
        let mut img = blank(CanvasSize::new(20, 20));
        let point = Rectangle::from_drag((5.0, 5.0), (5.0, 5.0), LabelColor::Black);
        stroke_rect(&mut img, &point, 2.0);
        assert!(img.pixels().all(|p| *p == TRANSPARENT));

        let line = Rectangle::from_drag((5.0, 2.0), (5.0, 12.0), LabelColor::Black);
        stroke_rect(&mut img, &line, 2.0);
        assert_eq!(*img.get_pixel(4, 8), Rgba([0, 0, 0, 255]));
        assert_eq!(*img.get_pixel(5, 8), Rgba([0, 0, 0, 255]));
        assert_eq!(*img.get_pixel(7, 8), TRANSPARENT);
    }

    #[test]
    fn out_of_bounds_strokes_are_clipped() {
        let mut img = blank(CanvasSize::new(10, 10));
        let rect = Rectangle::from_drag((-20.0, -20.0), (200.0, 5.0), LabelColor::Question);
        stroke_rect(&mut img, &rect, 2.0);
        assert_eq!(*img.get_pixel(3, 4), Rgba([0, 0, 255, 255]));
        assert_eq!(*img.get_pixel(3, 2), TRANSPARENT);
    }

    #[test]
    fn brush_segment_covers_endpoints() {
        let mut img = blank(CanvasSize::new(40, 40));
        let black = Rgba([0, 0, 0, 255]);
        stamp_segment(&mut img, (5.0, 5.0), (30.0, 5.0), 2.0, black);
        assert_eq!(*img.get_pixel(5, 5), black);
        assert_eq!(*img.get_pixel(18, 5), black);
        assert_eq!(*img.get_pixel(29, 5), black);
        assert_eq!(*img.get_pixel(18, 20), TRANSPARENT);
    }

    #[test]
    fn draw_scaled_stretches_to_destination() {
        let src = RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 255]));
        let mut dst = blank(CanvasSize::new(8, 6));
        draw_scaled(&mut dst, &src);
        assert!(dst.pixels().all(|p| *p == Rgba([10, 20, 30, 255])));
    }

    #[test]
    fn transparent_source_leaves_destination() {
        let mut dst = RgbaImage::from_pixel(4, 4, Rgba([200, 0, 0, 255]));
        draw_scaled(&mut dst, &blank(CanvasSize::new(4, 4)));
        assert!(dst.pixels().all(|p| *p == Rgba([200, 0, 0, 255])));
    }
}
