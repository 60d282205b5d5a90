use std::path::Path;

use anyhow::{Context, Result, anyhow};
use fast_image_resize::images::{Image, ImageRef};
use fast_image_resize::{PixelType, Resizer};
use ndarray::Array4;
use ort::session::{Session, builder::GraphOptimizationLevel};
use ort::value::Tensor;

use crate::types::{Frame, HandObservation, Handedness, LANDMARK_COUNT, Landmark, LandmarkSet};

pub const INPUT_SIZE: u32 = 224;

/// Single-hand landmark model. Takes a full camera frame letterboxed to
/// 224x224 and emits 21 keypoints in normalized frame coordinates plus a
/// presence confidence and a handedness score.
pub struct HandDetector {
    session: Session,
    resizer: Resizer,
}

impl HandDetector {
    pub fn new(model_path: &Path) -> Result<Self> {
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(2)?
            .commit_from_file(model_path)
            .with_context(|| {
                format!(
                    "failed to load hand landmark model from {}",
                    model_path.display()
                )
            })?;

        Ok(Self {
            session,
            resizer: Resizer::new(),
        })
    }

    pub fn detect(&mut self, frame: &Frame) -> Result<HandObservation> {
        let (input, letterbox) = self.prepare_input(frame)?;
        let tensor = Tensor::from_array(input)?;
        let outputs = self
            .session
            .run(ort::inputs![tensor])
            .context("failed to run hand landmark session")?;

        if outputs.len() == 0 {
            return Err(anyhow!("hand landmark model returned no outputs"));
        }

        let coords = outputs[0].try_extract_array::<f32>()?;
        let flattened: Vec<f32> = coords.iter().copied().collect();
        let landmarks = decode_landmarks(&flattened, &letterbox)?;

        let confidence = if outputs.len() > 1 {
            outputs[1]
                .try_extract_array::<f32>()
                .ok()
                .and_then(|arr| arr.iter().next().copied())
                .unwrap_or(0.0)
                .clamp(0.0, 1.0)
        } else {
            0.0
        };
        let handedness = if outputs.len() > 2 {
            outputs[2]
                .try_extract_array::<f32>()
                .ok()
                .and_then(|arr| arr.iter().next().copied())
                .map(Handedness::from_score)
                .unwrap_or(Handedness::Unknown)
        } else {
            Handedness::Unknown
        };

        Ok(HandObservation {
            landmarks,
            confidence,
            handedness,
        })
    }

    fn prepare_input(&mut self, frame: &Frame) -> Result<(Array4<f32>, Letterbox)> {
        let letterbox = Letterbox::fit(frame.width, frame.height);
        let src = ImageRef::new(frame.width, frame.height, &frame.rgba, PixelType::U8x4)
            .context("camera frame buffer does not match its dimensions")?;
        let mut resized = Image::new(letterbox.new_w, letterbox.new_h, PixelType::U8x4);
        self.resizer
            .resize(&src, &mut resized, None)
            .context("failed to resize camera frame for the hand model")?;

        // Black letterbox bars around the resized frame, pixels scaled to 0..1.
        let size = INPUT_SIZE as usize;
        let mut input = Array4::<f32>::zeros((1, size, size, 3));
        let stride = letterbox.new_w as usize * 4;
        for (y, row) in resized.buffer().chunks_exact(stride).enumerate() {
            let out_y = y + letterbox.pad_y as usize;
            for (x, pixel) in row.chunks_exact(4).enumerate() {
                let out_x = x + letterbox.pad_x as usize;
                input[[0, out_y, out_x, 0]] = pixel[0] as f32 / 255.0;
                input[[0, out_y, out_x, 1]] = pixel[1] as f32 / 255.0;
                input[[0, out_y, out_x, 2]] = pixel[2] as f32 / 255.0;
            }
        }

        Ok((input, letterbox))
    }
}

/// Mapping between full-frame pixels and the letterboxed model input, kept
/// around to project landmarks back into frame coordinates.
#[derive(Clone, Copy, Debug)]
struct Letterbox {
    scale: f32,
    pad_x: u32,
    pad_y: u32,
    new_w: u32,
    new_h: u32,
    frame_w: u32,
    frame_h: u32,
}

impl Letterbox {
    fn fit(frame_w: u32, frame_h: u32) -> Self {
        let scale = INPUT_SIZE as f32 / frame_w.max(frame_h).max(1) as f32;
        let new_w = ((frame_w as f32 * scale).round() as u32).clamp(1, INPUT_SIZE);
        let new_h = ((frame_h as f32 * scale).round() as u32).clamp(1, INPUT_SIZE);
        let pad_x = (INPUT_SIZE - new_w) / 2;
        let pad_y = (INPUT_SIZE - new_h) / 2;
        Self {
            scale,
            pad_x,
            pad_y,
            new_w,
            new_h,
            frame_w,
            frame_h,
        }
    }

    /// Maps a point in model-input pixels back to normalized frame
    /// coordinates in 0..1.
    fn to_frame(&self, x: f32, y: f32) -> (f32, f32) {
        let frame_x = (x - self.pad_x as f32) / self.scale;
        let frame_y = (y - self.pad_y as f32) / self.scale;
        (
            frame_x / self.frame_w as f32,
            frame_y / self.frame_h as f32,
        )
    }
}

fn decode_landmarks(values: &[f32], letterbox: &Letterbox) -> Result<LandmarkSet> {
    if values.len() < LANDMARK_COUNT * 3 {
        return Err(anyhow!(
            "hand landmark model returned {} values, expected at least {}",
            values.len(),
            LANDMARK_COUNT * 3
        ));
    }

    let mut points = [Landmark::default(); LANDMARK_COUNT];
    for (point, chunk) in points.iter_mut().zip(values.chunks_exact(3)) {
        let (x, y) = letterbox.to_frame(chunk[0], chunk[1]);
        point.x = x;
        point.y = y;
        point.z = chunk[2] / (letterbox.scale * letterbox.frame_w as f32);
    }

    Ok(LandmarkSet { points })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn letterbox_centers_landscape_frames() {
        let letterbox = Letterbox::fit(640, 480);
        assert_eq!(letterbox.new_w, INPUT_SIZE);
        assert_eq!(letterbox.new_h, 168);
        assert_eq!(letterbox.pad_x, 0);
        assert_eq!(letterbox.pad_y, 28);
    }

    #[test]
    fn square_frames_fill_the_input() {
        let letterbox = Letterbox::fit(400, 400);
        assert_eq!((letterbox.new_w, letterbox.new_h), (INPUT_SIZE, INPUT_SIZE));
        assert_eq!((letterbox.pad_x, letterbox.pad_y), (0, 0));
    }

    #[test]
    fn projection_round_trips_the_frame_extremes() {
        let letterbox = Letterbox::fit(640, 480);
        let (x0, y0) = letterbox.to_frame(0.0, 28.0);
        assert!(close(x0, 0.0) && close(y0, 0.0));
        let (x1, y1) = letterbox.to_frame(224.0, 196.0);
        assert!(close(x1, 1.0) && close(y1, 1.0));
    }

    #[test]
    fn projection_recovers_the_frame_center() {
        let letterbox = Letterbox::fit(640, 480);
        let (x, y) = letterbox.to_frame(112.0, 112.0);
        assert!(close(x, 0.5), "center x came back as {x}");
        assert!(close(y, 0.5), "center y came back as {y}");
    }

    #[test]
    fn decode_rejects_truncated_model_output() {
        let letterbox = Letterbox::fit(640, 480);
        let err = decode_landmarks(&[0.0; 10], &letterbox);
        assert!(err.is_err());
    }

    #[test]
    fn decode_normalizes_pixel_coordinates() {
        let letterbox = Letterbox::fit(640, 480);
        let mut values = vec![0.0f32; LANDMARK_COUNT * 3];
        values[0] = 112.0;
        values[1] = 112.0;
        values[2] = letterbox.scale * 64.0;

        let landmarks = decode_landmarks(&values, &letterbox).unwrap();
        let wrist = landmarks.points[0];
        assert!(close(wrist.x, 0.5));
        assert!(close(wrist.y, 0.5));
        assert!(close(wrist.z, 64.0 / 640.0));
    }
}
