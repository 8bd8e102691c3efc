//! Shape generation for 2D primitives
//!
//! Everything is built in field coordinates (origin top-left, y down); the
//! pipeline maps to NDC.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{Vertex, colors, srgb};
use crate::sim::{GameState, Item, ItemKind, Rect};
use crate::tuning::Tuning;

/// Segments used for small round details
const DETAIL_SEGMENTS: u32 = 12;

/// Generate vertices for a filled axis-aligned rectangle
pub fn rect(x: f32, y: f32, w: f32, h: f32, color: [f32; 4]) -> Vec<Vertex> {
    let (x2, y2) = (x + w, y + h);
    vec![
        Vertex::new(x, y, color),
        Vertex::new(x2, y, color),
        Vertex::new(x, y2, color),
        Vertex::new(x, y2, color),
        Vertex::new(x2, y, color),
        Vertex::new(x2, y2, color),
    ]
}

/// Rectangle border of the given thickness, drawn inside the bounds
pub fn outline(x: f32, y: f32, w: f32, h: f32, thickness: f32, color: [f32; 4]) -> Vec<Vertex> {
    let t = thickness.min(w / 2.0).min(h / 2.0);
    let mut vertices = Vec::with_capacity(24);
    vertices.extend(rect(x, y, w, t, color));
    vertices.extend(rect(x, y + h - t, w, t, color));
    vertices.extend(rect(x, y + t, t, h - 2.0 * t, color));
    vertices.extend(rect(x + w - t, y + t, t, h - 2.0 * t, color));
    vertices
}

pub fn triangle(a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    vec![
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
    ]
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Parcel: taped box with a barcode
fn order_glyph(r: &Rect) -> Vec<Vertex> {
    let (x, y, w, h) = (r.left(), r.top(), r.size.x, r.size.y);
    let mut v = rect(x, y, w, h, srgb(colors::ORDER_BOX, 1.0));
    v.extend(outline(x + 2.0, y + 2.0, w - 4.0, h - 4.0, 1.0, srgb(colors::ORDER_EDGE, 1.0)));
    v.extend(rect(x + w * 0.45, y - 2.0, w * 0.1, h + 4.0, srgb(colors::ORDER_TAPE, 1.0)));
    let bar = srgb(colors::BARCODE, 1.0);
    for i in 0..6 {
        v.extend(rect(x + 6.0 + i as f32 * 3.0, y + h - 10.0, 2.0, 8.0, bar));
    }
    v
}

/// Envelope with an exclamation mark
fn phish_glyph(r: &Rect) -> Vec<Vertex> {
    let (x, y, w, h) = (r.left(), r.top(), r.size.x, r.size.y);
    let white = srgb(colors::WHITE, 1.0);
    let mut v = rect(x, y, w, h, srgb(colors::PHISH, 1.0));
    v.extend(triangle(
        Vec2::new(x, y),
        Vec2::new(x + w / 2.0, y + h / 2.0),
        Vec2::new(x + w, y),
        white,
    ));
    v.extend(rect(x + w / 2.0 - 3.0, y + h / 4.0, 6.0, h / 2.0, white));
    v.extend(circle(Vec2::new(x + w / 2.0, y + h * 0.8), 4.0, white, DETAIL_SEGMENTS));
    v
}

/// Stick with a skull
fn usb_glyph(r: &Rect) -> Vec<Vertex> {
    let (x, y, w, h) = (r.left(), r.top(), r.size.x, r.size.y);
    let body = srgb(colors::USB_BODY, 1.0);
    let skull = srgb(colors::SKULL, 1.0);
    let mut v = rect(x, y, w, h, body);
    v.extend(rect(x + w * 0.75, y + h * 0.2, w * 0.2, h * 0.6, srgb(colors::USB_PLUG, 1.0)));
    v.extend(circle(Vec2::new(x + w * 0.35, y + h * 0.4), 7.0, skull, DETAIL_SEGMENTS));
    v.extend(rect(x + w * 0.28, y + h * 0.45, 14.0, 10.0, skull));
    // Eyes and teeth
    v.extend(circle(Vec2::new(x + w * 0.31, y + h * 0.38), 2.0, body, 8));
    v.extend(circle(Vec2::new(x + w * 0.39, y + h * 0.38), 2.0, body, 8));
    v.extend(rect(x + w * 0.33, y + h * 0.52, 8.0, 2.0, body));
    v
}

/// Wide block with wave bars
fn flood_glyph(r: &Rect) -> Vec<Vertex> {
    let (x, y, w, h) = (r.left(), r.top(), r.size.x, r.size.y);
    let wave = srgb(colors::FLOOD_WAVE, 1.0);
    let mut v = rect(x, y, w, h, srgb(colors::FLOOD, 1.0));
    for i in 0..4 {
        let dy = if i % 2 == 0 { 0.0 } else { 4.0 };
        v.extend(rect(x + 6.0 + i as f32 * 10.0, y + 4.0 + dy, 8.0, h - 8.0, wave));
    }
    v
}

/// Glyph for one falling item
pub fn item_glyph(item: &Item) -> Vec<Vertex> {
    match item.kind {
        ItemKind::GoodOrder => order_glyph(&item.rect),
        ItemKind::PhishAttack => phish_glyph(&item.rect),
        ItemKind::UsbAttack => usb_glyph(&item.rect),
        ItemKind::FloodAttack => flood_glyph(&item.rect),
    }
}

/// The goose, fitted to the player rectangle, facing right
pub fn goose(r: &Rect) -> Vec<Vertex> {
    let (x, y, w, h) = (r.left(), r.top(), r.size.x, r.size.y);
    let body = srgb(colors::GOOSE_BODY, 1.0);
    let edge = srgb(colors::GOOSE_OUTLINE, 1.0);
    let beak = srgb(colors::GOOSE_BEAK, 1.0);

    let body_center = Vec2::new(x + w * 0.45, y + h * 0.64);
    let body_r = w * 0.38;
    let head = Vec2::new(x + w * 0.66, y + h * 0.2);
    let head_r = w * 0.15;

    let mut v = Vec::with_capacity(256);
    // Feet under the body
    v.extend(rect(x + w * 0.3, y + h - 6.0, w * 0.12, 6.0, beak));
    v.extend(rect(x + w * 0.52, y + h - 6.0, w * 0.12, 6.0, beak));
    // Outlines first so the fill sits on top
    v.extend(circle(body_center, body_r + 1.5, edge, 24));
    v.extend(circle(head, head_r + 1.5, edge, 16));
    v.extend(rect(x + w * 0.56, y + h * 0.22, w * 0.16, h * 0.4, body));
    v.extend(circle(body_center, body_r, body, 24));
    v.extend(circle(head, head_r, body, 16));
    v.extend(triangle(
        Vec2::new(head.x + head_r * 0.7, head.y - head_r * 0.4),
        Vec2::new(x + w, head.y + head_r * 0.15),
        Vec2::new(head.x + head_r * 0.7, head.y + head_r * 0.6),
        beak,
    ));
    v.extend(circle(
        Vec2::new(head.x + head_r * 0.25, head.y - head_r * 0.3),
        2.5,
        srgb(colors::GOOSE_EYE, 1.0),
        8,
    ));
    v
}

/// Sky and the two conveyor lanes
pub fn background(tuning: &Tuning) -> Vec<Vertex> {
    let (w, h) = (tuning.field_width, tuning.field_height);
    let lane = srgb(colors::LANE, 1.0);
    let mut v = rect(0.0, 0.0, w, h, srgb(colors::BACKGROUND, 1.0));
    v.extend(rect(0.0, h - 120.0, w, 6.0, lane));
    v.extend(rect(0.0, h - 60.0, w, 6.0, lane));
    v
}

/// Darkening layer behind the game-over text
pub fn scrim(tuning: &Tuning) -> Vec<Vertex> {
    rect(
        0.0,
        0.0,
        tuning.field_width,
        tuning.field_height,
        srgb(colors::SCRIM, 0.6),
    )
}

/// Build the full frame: background, items, player, then the scrim once ended
pub fn build_scene(state: &GameState) -> Vec<Vertex> {
    let mut vertices = background(&state.tuning);
    for item in &state.items {
        vertices.extend(item_glyph(item));
    }
    vertices.extend(goose(&state.player.rect));
    if state.is_over() {
        vertices.extend(scrim(&state.tuning));
    }
    vertices
}
