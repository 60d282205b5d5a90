use std::{
    fs, io,
    path::{Path, PathBuf},
};

use indicatif::{ProgressBar, ProgressStyle};
use thiserror::Error;

pub const HAND_MODEL_FILE: &str = "hand_landmark.onnx";
pub const LETTER_MODEL_FILE: &str = "sign_letters.onnx";

const HAND_MODEL_URL: &str =
    "https://github.com/sign-scribe/sign-scribe/releases/download/models-v1/hand_landmark.onnx";

#[derive(Debug, Error)]
pub enum ModelError {
    #[error(
        "letter model not found at {path}; train the letter classifier and export it as ONNX to that location"
    )]
    MissingLetterModel { path: PathBuf },
    #[error("failed to download {url}")]
    Download {
        url: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub fn default_model_dir() -> PathBuf {
    std::env::var_os("SIGN_SCRIBE_MODEL_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("models"))
}

pub fn default_hand_model_path() -> PathBuf {
    default_model_dir().join(HAND_MODEL_FILE)
}

pub fn default_letter_model_path() -> PathBuf {
    default_model_dir().join(LETTER_MODEL_FILE)
}

/// Fetches the hand landmark model on first run.
pub fn ensure_hand_model(path: &Path) -> Result<(), ModelError> {
    if path.exists() {
        return Ok(());
    }
    download_model(HAND_MODEL_URL, path)
}

/// The letter model is trained per deployment, so a missing file is an
/// error with instructions rather than a download.
pub fn ensure_letter_model(path: &Path) -> Result<(), ModelError> {
    if path.exists() {
        return Ok(());
    }
    Err(ModelError::MissingLetterModel {
        path: path.to_path_buf(),
    })
}

fn download_model(url: &'static str, dest: &Path) -> Result<(), ModelError> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    log::info!("downloading {} to {}", url, dest.display());
    let response = reqwest::blocking::get(url)
        .and_then(|response| response.error_for_status())
        .map_err(|source| ModelError::Download { url, source })?;

    let progress = match response.content_length() {
        Some(total) => ProgressBar::new(total).with_style(
            ProgressStyle::with_template("{bar:30} {bytes}/{total_bytes} {bytes_per_sec}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        ),
        None => ProgressBar::new_spinner(),
    };

    // Download into a partial file and rename, so an interrupted run never
    // leaves a truncated model where the loader would find it.
    let tmp = dest.with_extension("onnx.partial");
    let mut reader = progress.wrap_read(response);
    let mut file = fs::File::create(&tmp)?;
    io::copy(&mut reader, &mut file)?;
    fs::rename(&tmp, dest)?;
    progress.finish_and_clear();

    log::info!("saved model to {}", dest.display());
    Ok(())
}
