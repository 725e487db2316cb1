//! Annotated-frame rendering: bounding-box rectangles drawn onto an RGB
//! raster. Shared by every detector backend.

use image::{Rgb, RgbImage};

use crate::frame::BoundingBox;

const BOX_COLOR: Rgb<u8> = Rgb([255, 64, 32]);
const BOX_THICKNESS: u32 = 2;

pub fn draw_boxes(raster: &mut RgbImage, boxes: &[BoundingBox]) {
    for bbox in boxes {
        if let Some(rect) = clamp_rect(bbox, raster.dimensions()) {
            draw_rect(raster, rect, BOX_COLOR, BOX_THICKNESS);
        }
    }
}

/// Convert a pixel-space box into clamped inclusive corner coordinates.
fn clamp_rect(bbox: &BoundingBox, dims: (u32, u32)) -> Option<[u32; 4]> {
    let (w, h) = dims;
    if w == 0 || h == 0 || bbox.width <= 0.0 || bbox.height <= 0.0 {
        return None;
    }
    let clamp = |v: f32, max: u32| -> u32 { v.max(0.0).min((max - 1) as f32) as u32 };
    let x0 = clamp(bbox.x, w);
    let y0 = clamp(bbox.y, h);
    let x1 = clamp(bbox.x + bbox.width - 1.0, w);
    let y1 = clamp(bbox.y + bbox.height - 1.0, h);
    if x0 > x1 || y0 > y1 {
        return None;
    }
    Some([x0, y0, x1, y1])
}

/// Draw a rectangle border with the given stroke thickness, shrinking the
/// border inward so it never leaves the raster.
fn draw_rect(img: &mut RgbImage, rect: [u32; 4], color: Rgb<u8>, thickness: u32) {
    let [x0, y0, x1, y1] = rect;
    for t in 0..thickness {
        let xx0 = x0.saturating_add(t);
        let yy0 = y0.saturating_add(t);
        let xx1 = x1.saturating_sub(t);
        let yy1 = y1.saturating_sub(t);
        if xx0 > xx1 || yy0 > yy1 {
            break;
        }
        for x in xx0..=xx1 {
            img.put_pixel(x, yy0, color);
            img.put_pixel(x, yy1, color);
        }
        for y in yy0..=yy1 {
            img.put_pixel(xx0, y, color);
            img.put_pixel(xx1, y, color);
        }
    }
}
