use image::{Rgba, RgbaImage};

use crate::types::{LandmarkSet, landmark};

/// Side length of the square canvas the letter classifier was trained on.
pub const CANVAS_SIZE: u32 = 400;

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BONE: Rgba<u8> = Rgba([64, 64, 64, 255]);
const JOINT: Rgba<u8> = Rgba([16, 16, 16, 255]);
const JOINT_RADIUS: i32 = 4;
const BONE_RADIUS: i32 = 1;

/// Bone topology of the 21-point hand: wrist-to-finger chains plus the
/// knuckle bridges between neighboring fingers.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (landmark::WRIST, landmark::THUMB_CMC),
    (landmark::THUMB_CMC, landmark::THUMB_MCP),
    (landmark::THUMB_MCP, landmark::THUMB_IP),
    (landmark::THUMB_IP, landmark::THUMB_TIP),
    (landmark::WRIST, landmark::INDEX_FINGER_MCP),
    (landmark::INDEX_FINGER_MCP, landmark::INDEX_FINGER_PIP),
    (landmark::INDEX_FINGER_PIP, landmark::INDEX_FINGER_DIP),
    (landmark::INDEX_FINGER_DIP, landmark::INDEX_FINGER_TIP),
    (landmark::INDEX_FINGER_MCP, landmark::MIDDLE_FINGER_MCP),
    (landmark::MIDDLE_FINGER_MCP, landmark::MIDDLE_FINGER_PIP),
    (landmark::MIDDLE_FINGER_PIP, landmark::MIDDLE_FINGER_DIP),
    (landmark::MIDDLE_FINGER_DIP, landmark::MIDDLE_FINGER_TIP),
    (landmark::MIDDLE_FINGER_MCP, landmark::RING_FINGER_MCP),
    (landmark::RING_FINGER_MCP, landmark::RING_FINGER_PIP),
    (landmark::RING_FINGER_PIP, landmark::RING_FINGER_DIP),
    (landmark::RING_FINGER_DIP, landmark::RING_FINGER_TIP),
    (landmark::RING_FINGER_MCP, landmark::PINKY_MCP),
    (landmark::WRIST, landmark::PINKY_MCP),
    (landmark::PINKY_MCP, landmark::PINKY_PIP),
    (landmark::PINKY_PIP, landmark::PINKY_DIP),
    (landmark::PINKY_DIP, landmark::PINKY_TIP),
];

/// Rasterizes the hand skeleton onto a fresh white canvas, the input the
/// letter classifier consumes. Landmarks are in normalized coordinates;
/// anything falling outside the canvas is clipped.
pub fn letter_canvas(hand: &LandmarkSet) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(CANVAS_SIZE, CANVAS_SIZE, BACKGROUND);
    draw_skeleton(&mut canvas, hand);
    canvas
}

pub fn draw_skeleton(canvas: &mut RgbaImage, hand: &LandmarkSet) {
    for &(from, to) in HAND_CONNECTIONS.iter() {
        let (x0, y0) = canvas_position(hand, from);
        let (x1, y1) = canvas_position(hand, to);
        draw_segment(canvas, x0, y0, x1, y1);
    }
    for index in 0..hand.points.len() {
        let (x, y) = canvas_position(hand, index);
        fill_disc(canvas, x, y, JOINT_RADIUS, JOINT);
    }
}

fn canvas_position(hand: &LandmarkSet, index: usize) -> (i32, i32) {
    let point = hand.points[index];
    let scale = (CANVAS_SIZE - 1) as f32;
    ((point.x * scale).round() as i32, (point.y * scale).round() as i32)
}

fn draw_segment(canvas: &mut RgbaImage, x0: i32, y0: i32, x1: i32, y1: i32) {
    let steps = (x1 - x0).abs().max((y1 - y0).abs()).max(1);
    for step in 0..=steps {
        let t = step as f32 / steps as f32;
        let x = x0 as f32 + (x1 - x0) as f32 * t;
        let y = y0 as f32 + (y1 - y0) as f32 * t;
        fill_disc(canvas, x.round() as i32, y.round() as i32, BONE_RADIUS, BONE);
    }
}

fn fill_disc(canvas: &mut RgbaImage, cx: i32, cy: i32, radius: i32, color: Rgba<u8>) {
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy > radius * radius {
                continue;
            }
            let x = cx + dx;
            let y = cy + dy;
            if x >= 0 && y >= 0 && (x as u32) < canvas.width() && (y as u32) < canvas.height() {
                canvas.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}
