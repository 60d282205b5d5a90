use std::path::Path;

use anyhow::{Context, Result, anyhow};
use fast_image_resize::images::{Image, ImageRef};
use fast_image_resize::{PixelType, Resizer};
use image::RgbaImage;
use ndarray::Array4;
use ort::session::{Session, builder::GraphOptimizationLevel};
use ort::value::Tensor;

use crate::engine::LETTER_CLASSES;

pub const INPUT_SIZE: u32 = 64;

/// Scores a rendered skeleton canvas against the letter classes A..Z.
/// The model is trained on downscaled 64x64 copies of the white canvas.
pub struct LetterClassifier {
    session: Session,
    resizer: Resizer,
}

impl LetterClassifier {
    pub fn new(model_path: &Path) -> Result<Self> {
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(2)?
            .commit_from_file(model_path)
            .with_context(|| {
                format!("failed to load letter model from {}", model_path.display())
            })?;

        Ok(Self {
            session,
            resizer: Resizer::new(),
        })
    }

    pub fn classify(&mut self, canvas: &RgbaImage) -> Result<[f32; LETTER_CLASSES]> {
        let input = prepare_input(&mut self.resizer, canvas)?;
        let tensor = Tensor::from_array(input)?;
        let outputs = self
            .session
            .run(ort::inputs![tensor])
            .context("failed to run letter session")?;

        if outputs.len() == 0 {
            return Err(anyhow!("letter model returned no outputs"));
        }

        let scores = outputs[0].try_extract_array::<f32>()?;
        let values: Vec<f32> = scores.iter().copied().collect();
        values.as_slice().try_into().map_err(|_| {
            anyhow!(
                "letter model returned {} classes, expected {}",
                values.len(),
                LETTER_CLASSES
            )
        })
    }
}

fn prepare_input(resizer: &mut Resizer, canvas: &RgbaImage) -> Result<Array4<f32>> {
    let (width, height) = canvas.dimensions();
    let src = ImageRef::new(width, height, canvas.as_raw(), PixelType::U8x4)
        .context("canvas buffer does not match its dimensions")?;
    let mut resized = Image::new(INPUT_SIZE, INPUT_SIZE, PixelType::U8x4);
    resizer
        .resize(&src, &mut resized, None)
        .context("failed to resize canvas for the letter model")?;

    let size = INPUT_SIZE as usize;
    let mut input = Array4::<f32>::zeros((1, size, size, 3));
    for (y, row) in resized.buffer().chunks_exact(size * 4).enumerate() {
        for (x, pixel) in row.chunks_exact(4).enumerate() {
            input[[0, y, x, 0]] = pixel[0] as f32 / 255.0;
            input[[0, y, x, 1]] = pixel[1] as f32 / 255.0;
            input[[0, y, x, 2]] = pixel[2] as f32 / 255.0;
        }
    }

    Ok(input)
}
