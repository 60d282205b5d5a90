#[allow(dead_code)]
#[path = "../src/engine/mod.rs"]
mod engine;
#[path = "../src/pipeline/hand.rs"]
mod hand;
#[allow(dead_code)]
#[path = "../src/pipeline/letters.rs"]
mod letters;
#[path = "../src/model_download.rs"]
mod model_download;
#[path = "../src/pipeline/skeleton.rs"]
mod skeleton;
#[allow(dead_code)]
#[path = "../src/types.rs"]
mod types;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use engine::{Engine, EngineConfig, command, fingers, suggest::WordList};
use hand::HandDetector;
use letters::LetterClassifier;
use types::Frame;

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let mut image_paths: Vec<PathBuf> = args.by_ref().map(PathBuf::from).collect();
    if image_paths.is_empty() {
        image_paths = demo_images()?;
    }

    if image_paths.is_empty() {
        anyhow::bail!("no images found; pass image paths as arguments or fill the demo directory");
    }

    let hand_model = model_download::default_hand_model_path();
    let letter_model = model_download::default_letter_model_path();
    model_download::ensure_hand_model(&hand_model)?;
    model_download::ensure_letter_model(&letter_model)?;

    let mut detector = HandDetector::new(&hand_model)?;
    let mut classifier = LetterClassifier::new(&letter_model)?;
    let mut engine = Engine::new(
        WordList::load(Path::new("words.txt")),
        EngineConfig::default(),
    );

    println!("transcribing {} images", image_paths.len());

    for path in image_paths {
        let frame = load_frame(&path)?;
        let observation = detector
            .detect(&frame)
            .with_context(|| format!("failed to run the hand model on {}", path.display()))?;

        if observation.confidence < 0.2 {
            println!(
                "{} -> no hand ({:.0}%)",
                path.display(),
                observation.confidence * 100.0
            );
            continue;
        }

        let signature = fingers::extract(&observation.landmarks);
        let gesture = command::classify(signature);

        if gesture.is_control() {
            println!(
                "{} -> {} {:?} | {} | {:.0}%",
                path.display(),
                gesture.label(),
                signature.bits(),
                observation.handedness.label(),
                observation.confidence * 100.0
            );
            continue;
        }

        let canvas = skeleton::letter_canvas(&observation.landmarks);
        let scores = classifier.classify(&canvas)?;
        match engine.apply_letter_scores(&scores) {
            Some(letter) => println!(
                "{} -> letter {letter} | {} | {:.0}%",
                path.display(),
                observation.handedness.label(),
                observation.confidence * 100.0
            ),
            None => println!(
                "{} -> hand detected, but no letter above threshold ({:.0}%)",
                path.display(),
                observation.confidence * 100.0
            ),
        }
    }

    Ok(())
}

fn load_frame(path: &PathBuf) -> Result<Frame> {
    let image = image::open(path)
        .with_context(|| format!("failed to open image {}", path.display()))?
        .to_rgba8();
    let (width, height) = image.dimensions();

    let mut frame = Frame {
        rgba: image.into_raw(),
        width,
        height,
        timestamp: std::time::Instant::now(),
    };
    // The live pipeline sees mirrored selfie frames; photos are not mirrored.
    frame.mirror_horizontal();
    Ok(frame)
}

fn demo_images() -> Result<Vec<PathBuf>> {
    let mut images = Vec::new();
    for entry in std::fs::read_dir("demo").context("failed to read the demo directory")? {
        let entry = entry?;
        let path = entry.path();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            if ["png", "jpg", "jpeg"]
                .iter()
                .any(|v| ext.eq_ignore_ascii_case(v))
            {
                images.push(path);
            }
        }
    }
    images.sort();
    Ok(images)
}
