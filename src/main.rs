#[cfg(not(feature = "camera-nokhwa"))]
compile_error!("Enable the camera-nokhwa feature: sign-scribe has no other capture backend.");

mod engine;
mod model_download;
mod pipeline;
mod types;

use std::{io::BufRead, path::PathBuf, process, thread};

use anyhow::{Context, Result, anyhow};
use crossbeam_channel::{bounded, unbounded};

use engine::{Engine, EngineConfig, suggest::WordList};
use model_download::{
    default_hand_model_path, default_letter_model_path, ensure_hand_model, ensure_letter_model,
};
use pipeline::camera::{CameraIndex, available_cameras, start_camera_stream};
use pipeline::hand::HandDetector;
use pipeline::letters::LetterClassifier;
use pipeline::{SessionCommand, SessionEvent, start_session};
use types::TranscriptSnapshot;

const USAGE: &str = "\
sign-scribe: spell text with one hand in front of a webcam

USAGE:
    sign-scribe [OPTIONS]

OPTIONS:
    --camera <INDEX>        camera to open (default 0)
    --words <PATH>          word list for suggestions (default words.txt)
    --hand-model <PATH>     hand landmark model, downloaded if missing
    --letter-model <PATH>   letter classifier model
    --list-cameras          print the available cameras and exit
    -h, --help              print this help

While a session is running, type `clear`, `speak` or `quit` and press enter.";

struct Args {
    camera_index: u32,
    words_path: PathBuf,
    hand_model: PathBuf,
    letter_model: PathBuf,
    list_cameras: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        camera_index: 0,
        words_path: PathBuf::from("words.txt"),
        hand_model: default_hand_model_path(),
        letter_model: default_letter_model_path(),
        list_cameras: false,
    };

    let mut argv = std::env::args().skip(1);
    while let Some(arg) = argv.next() {
        match arg.as_str() {
            "--camera" => {
                let value = next_value(&mut argv, "--camera")?;
                args.camera_index = value
                    .parse()
                    .with_context(|| format!("--camera expects a number, got {value:?}"))?;
            }
            "--words" => args.words_path = PathBuf::from(next_value(&mut argv, "--words")?),
            "--hand-model" => {
                args.hand_model = PathBuf::from(next_value(&mut argv, "--hand-model")?);
            }
            "--letter-model" => {
                args.letter_model = PathBuf::from(next_value(&mut argv, "--letter-model")?);
            }
            "--list-cameras" => args.list_cameras = true,
            "-h" | "--help" => {
                println!("{USAGE}");
                process::exit(0);
            }
            other => return Err(anyhow!("unknown argument {other:?}\n\n{USAGE}")),
        }
    }

    Ok(args)
}

fn next_value(argv: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    argv.next().ok_or_else(|| anyhow!("{flag} expects a value"))
}

fn main() -> Result<()> {
    env_logger::init();

    let args = parse_args()?;
    if args.list_cameras {
        return list_cameras();
    }

    let words = WordList::load(&args.words_path);

    ensure_hand_model(&args.hand_model)?;
    ensure_letter_model(&args.letter_model)?;
    let detector = HandDetector::new(&args.hand_model)?;
    let classifier = LetterClassifier::new(&args.letter_model)?;
    let engine = Engine::new(words, EngineConfig::default());

    // The frame channel stays at capacity 1: the camera drops frames the
    // worker has no time for. Command and event channels must not drop.
    let (frame_tx, frame_rx) = bounded(1);
    let (command_tx, command_rx) = unbounded();
    let (event_tx, event_rx) = unbounded();

    let camera = start_camera_stream(CameraIndex::Index(args.camera_index), frame_tx)?;
    let worker = start_session(detector, classifier, engine, frame_rx, command_rx, event_tx);

    println!("session started; type `clear`, `speak` or `quit` and press enter");

    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match line.trim() {
                "" => continue,
                "clear" => {
                    let _ = command_tx.send(SessionCommand::Clear);
                }
                "speak" => {
                    let _ = command_tx.send(SessionCommand::Speak);
                }
                "quit" | "exit" => break,
                other => println!("unknown command {other:?}; try `clear`, `speak` or `quit`"),
            }
        }
        let _ = command_tx.send(SessionCommand::Shutdown);
    });

    for event in event_rx {
        match event {
            SessionEvent::Transcript(snapshot) => print_transcript(&snapshot),
            SessionEvent::Speak(sentence) => println!("[speak] {sentence}"),
        }
    }

    camera.stop();
    let _ = worker.join();
    Ok(())
}

fn list_cameras() -> Result<()> {
    let cameras = available_cameras()?;
    if cameras.is_empty() {
        println!("no cameras found");
        return Ok(());
    }
    for device in cameras {
        println!("{}", device.label);
    }
    Ok(())
}

fn print_transcript(snapshot: &TranscriptSnapshot) {
    let letter = snapshot.letter.unwrap_or('-');
    if snapshot.suggestions.is_empty() {
        println!(
            "letter {letter} | word {:?} | sentence {:?}",
            snapshot.word, snapshot.sentence
        );
    } else {
        println!(
            "letter {letter} | word {:?} | sentence {:?} | try: {}",
            snapshot.word,
            snapshot.sentence,
            snapshot.suggestions.join(", ")
        );
    }
}
