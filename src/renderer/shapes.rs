//! Shape generation for 2D primitives
//!
//! Everything is emitted as triangle lists in screen pixels. Flat shapes use
//! the atlas white texel so they go through the same textured pipeline.

use glam::Vec2;
use std::f32::consts::{FRAC_PI_2, PI, TAU};

use super::atlas::UvRect;
use super::vertex::Vertex;

/// Segments used for each rounded corner
pub const CORNER_SEGMENTS: usize = 6;

fn push_triangle(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, c: Vec2, uv: [f32; 2], color: [f32; 4]) {
    out.push(Vertex::new(a.x, a.y, uv, color));
    out.push(Vertex::new(b.x, b.y, uv, color));
    out.push(Vertex::new(c.x, c.y, uv, color));
}

/// Axis-aligned rectangle
pub fn rect(out: &mut Vec<Vertex>, min: Vec2, size: Vec2, uv: [f32; 2], color: [f32; 4]) {
    if size.x <= 0.0 || size.y <= 0.0 {
        return;
    }
    let max = min + size;
    let tr = Vec2::new(max.x, min.y);
    let bl = Vec2::new(min.x, max.y);
    push_triangle(out, min, tr, max, uv, color);
    push_triangle(out, min, max, bl, uv, color);
}

/// Filled circle as a triangle fan
pub fn circle(
    out: &mut Vec<Vertex>,
    center: Vec2,
    radius: f32,
    segments: usize,
    uv: [f32; 2],
    color: [f32; 4],
) {
    if radius <= 0.0 || segments < 3 {
        return;
    }
    let step = TAU / segments as f32;
    for i in 0..segments {
        let a0 = i as f32 * step;
        let a1 = (i + 1) as f32 * step;
        let p0 = center + Vec2::new(a0.cos(), a0.sin()) * radius;
        let p1 = center + Vec2::new(a1.cos(), a1.sin()) * radius;
        push_triangle(out, center, p0, p1, uv, color);
    }
}

/// Outline points of a rounded rectangle, clockwise from the top-left arc
pub fn rounded_rect_outline(min: Vec2, size: Vec2, radius: f32) -> Vec<Vec2> {
    let r = radius.min(size.x / 2.0).min(size.y / 2.0).max(0.0);
    let max = min + size;
    // (corner center, start angle) in screen space (y down)
    let corners = [
        (Vec2::new(min.x + r, min.y + r), PI),
        (Vec2::new(max.x - r, min.y + r), PI + FRAC_PI_2),
        (Vec2::new(max.x - r, max.y - r), 0.0),
        (Vec2::new(min.x + r, max.y - r), FRAC_PI_2),
    ];
    let mut points = Vec::with_capacity(4 * (CORNER_SEGMENTS + 1));
    for (center, start) in corners {
        for i in 0..=CORNER_SEGMENTS {
            let a = start + FRAC_PI_2 * i as f32 / CORNER_SEGMENTS as f32;
            points.push(center + Vec2::new(a.cos(), a.sin()) * r);
        }
    }
    points
}

/// Filled rounded rectangle (convex fan around its center)
pub fn rounded_rect(
    out: &mut Vec<Vertex>,
    min: Vec2,
    size: Vec2,
    radius: f32,
    uv: [f32; 2],
    color: [f32; 4],
) {
    if size.x <= 0.0 || size.y <= 0.0 {
        return;
    }
    let center = min + size / 2.0;
    let outline = rounded_rect_outline(min, size, radius);
    for (i, &p0) in outline.iter().enumerate() {
        let p1 = outline[(i + 1) % outline.len()];
        push_triangle(out, center, p0, p1, uv, color);
    }
}

/// Rounded rectangle scaled about its center
pub fn scaled_rounded_rect(
    out: &mut Vec<Vertex>,
    center: Vec2,
    size: Vec2,
    radius: f32,
    scale: f32,
    uv: [f32; 2],
    color: [f32; 4],
) {
    let size = size * scale;
    rounded_rect(out, center - size / 2.0, size, radius * scale, uv, color);
}

/// Textured quad clipped to `[clip_min, clip_max]`, cropping UVs to match
pub fn clipped_sprite(
    out: &mut Vec<Vertex>,
    min: Vec2,
    size: Vec2,
    uv: UvRect,
    clip_min: Vec2,
    clip_max: Vec2,
    color: [f32; 4],
) -> bool {
    let max = min + size;
    let lo = min.max(clip_min);
    let hi = max.min(clip_max);
    if size.x <= 0.0 || size.y <= 0.0 || lo.x >= hi.x || lo.y >= hi.y {
        return false;
    }

    let map = |p: Vec2| -> [f32; 2] {
        let t = (p - min) / size;
        [
            uv.min[0] + (uv.max[0] - uv.min[0]) * t.x,
            uv.min[1] + (uv.max[1] - uv.min[1]) * t.y,
        ]
    };

    let tr = Vec2::new(hi.x, lo.y);
    let bl = Vec2::new(lo.x, hi.y);
    for p in [lo, tr, hi, lo, hi, bl] {
        out.push(Vertex::new(p.x, p.y, map(p), color));
    }
    true
}
