//! Shape generation for 2D primitives
//!
//! All coordinates are canvas pixels (origin top-left, y down).

use std::f32::consts::PI;

use super::vertex::Vertex;
use crate::assets::{Layer, Shape, SpriteDef};
use crate::sim::Rect;

/// Segments used to approximate an ellipse
const ELLIPSE_SEGMENTS: u32 = 24;

/// Generate vertices for a filled rectangle (two triangles)
pub fn quad(rect: Rect, color: [f32; 4]) -> Vec<Vertex> {
    let Rect {
        left,
        top,
        right,
        bottom,
    } = rect;
    vec![
        Vertex::new(left, top, color),
        Vertex::new(right, top, color),
        Vertex::new(left, bottom, color),
        Vertex::new(left, bottom, color),
        Vertex::new(right, top, color),
        Vertex::new(right, bottom, color),
    ]
}

/// Generate vertices for a filled ellipse inscribed in `rect`
pub fn ellipse(rect: Rect, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let cx = (rect.left + rect.right) / 2.0;
    let cy = (rect.top + rect.bottom) / 2.0;
    let rx = rect.width() / 2.0;
    let ry = rect.height() / 2.0;

    let mut vertices = Vec::with_capacity((segments * 3) as usize);
    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(cx, cy, color));
        vertices.push(Vertex::new(cx + rx * theta1.cos(), cy + ry * theta1.sin(), color));
        vertices.push(Vertex::new(cx + rx * theta2.cos(), cy + ry * theta2.sin(), color));
    }
    vertices
}

/// Map a layer's unit-space box into `rect`
fn layer_rect(layer: &Layer, rect: Rect) -> Rect {
    let w = rect.width();
    let h = rect.height();
    let left = rect.left + layer.x * w;
    let top = rect.top + layer.y * h;
    Rect {
        left,
        top,
        right: left + layer.w * w,
        bottom: top + layer.h * h,
    }
}

/// Generate vertices for every layer of a sprite stretched over `rect`
pub fn sprite(def: &SpriteDef, rect: Rect) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    for layer in &def.layers {
        let area = layer_rect(layer, rect);
        match layer.shape {
            Shape::Rect => vertices.extend(quad(area, layer.color)),
            Shape::Ellipse => vertices.extend(ellipse(area, layer.color, ELLIPSE_SEGMENTS)),
        }
    }
    vertices
}
