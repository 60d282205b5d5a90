#[cfg(feature = "camera-nokhwa")]
pub mod camera;
pub mod hand;
pub mod letters;
pub mod skeleton;

use std::thread;

use crossbeam_channel::{Receiver, Sender, select};

use crate::engine::{Engine, FrameStep, TextEvent};
use crate::types::{Frame, Handedness, TranscriptSnapshot};

use self::hand::HandDetector;
use self::letters::LetterClassifier;

/// Observations below this confidence are treated as "no hand in frame".
pub const HAND_PRESENCE_THRESHOLD: f32 = 0.2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionCommand {
    Clear,
    Speak,
    Shutdown,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    Transcript(TranscriptSnapshot),
    Speak(String),
}

/// Spawns the transcription worker. It owns both models and the engine,
/// consumes camera frames, and publishes a transcript snapshot whenever the
/// visible state changes.
pub fn start_session(
    detector: HandDetector,
    classifier: LetterClassifier,
    engine: Engine,
    frame_rx: Receiver<Frame>,
    command_rx: Receiver<SessionCommand>,
    event_tx: Sender<SessionEvent>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        run_session_loop(detector, classifier, engine, frame_rx, command_rx, event_tx);
    })
}

fn run_session_loop(
    mut detector: HandDetector,
    mut classifier: LetterClassifier,
    mut engine: Engine,
    frame_rx: Receiver<Frame>,
    command_rx: Receiver<SessionCommand>,
    event_tx: Sender<SessionEvent>,
) {
    let mut last_snapshot = engine.snapshot();
    // Let the presentation layer render the empty transcript right away.
    let _ = event_tx.send(SessionEvent::Transcript(last_snapshot.clone()));

    loop {
        select! {
            recv(frame_rx) -> msg => {
                let Ok(frame) = msg else { break };
                let frame = drain_to_latest(&frame_rx, frame);
                if let Err(err) = step_frame(&mut detector, &mut classifier, &mut engine, &frame) {
                    log::warn!("frame processing failed: {err:?}");
                }
                publish_if_changed(&engine, &mut last_snapshot, &event_tx);
            },
            recv(command_rx) -> msg => {
                match msg {
                    Ok(SessionCommand::Clear) => {
                        engine.clear();
                        log::info!("transcript cleared");
                        publish_if_changed(&engine, &mut last_snapshot, &event_tx);
                    }
                    Ok(SessionCommand::Speak) => {
                        let _ = event_tx.send(SessionEvent::Speak(engine.sentence().to_string()));
                    }
                    Ok(SessionCommand::Shutdown) | Err(_) => break,
                }
            },
        }
    }
}

fn step_frame(
    detector: &mut HandDetector,
    classifier: &mut LetterClassifier,
    engine: &mut Engine,
    frame: &Frame,
) -> anyhow::Result<()> {
    let observation = detector.detect(frame)?;
    if observation.confidence < HAND_PRESENCE_THRESHOLD {
        return Ok(());
    }

    match engine.process_frame(&observation.landmarks, frame.timestamp) {
        FrameStep::Applied(event) => log_transcript_event(event, observation.handedness, engine),
        FrameStep::Suppressed(command) => {
            log::debug!("{} ignored during cooldown", command.label());
        }
        FrameStep::Neutral => {
            let canvas = skeleton::letter_canvas(&observation.landmarks);
            let scores = classifier.classify(&canvas)?;
            engine.apply_letter_scores(&scores);
        }
    }

    Ok(())
}

fn log_transcript_event(event: TextEvent, hand: Handedness, engine: &Engine) {
    match event {
        TextEvent::LetterCommitted(letter) => {
            log::info!(
                "committed '{letter}' ({}), sentence: {:?}",
                hand.label(),
                engine.sentence()
            );
        }
        TextEvent::CommitWithoutLetter => log::info!("commit gesture with no letter on offer"),
        TextEvent::CharacterDeleted(Some(removed)) => log::info!("deleted '{removed}'"),
        TextEvent::CharacterDeleted(None) => log::info!("delete on an empty transcript"),
        TextEvent::SpaceInserted => log::info!("inserted a space"),
    }
}

fn drain_to_latest(frame_rx: &Receiver<Frame>, first: Frame) -> Frame {
    let mut frame = first;
    while let Ok(newer) = frame_rx.try_recv() {
        frame = newer;
    }
    frame
}

fn publish_if_changed(
    engine: &Engine,
    last: &mut TranscriptSnapshot,
    event_tx: &Sender<SessionEvent>,
) {
    let snapshot = engine.snapshot();
    if snapshot != *last {
        *last = snapshot.clone();
        let _ = event_tx.send(SessionEvent::Transcript(snapshot));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::time::Instant;

    use crossbeam_channel::unbounded;

    use crate::engine::{EngineConfig, LETTER_CLASSES, suggest::WordList};

    fn test_engine() -> Engine {
        let words = WordList::load(Path::new("missing-word-list.txt"));
        Engine::new(words, EngineConfig::default())
    }

    fn test_frame(tag: u8) -> Frame {
        Frame {
            rgba: vec![tag, 0, 0, 255],
            width: 1,
            height: 1,
            timestamp: Instant::now(),
        }
    }

    #[test]
    fn drains_the_queue_to_the_newest_frame() {
        let (tx, rx) = unbounded();
        for serial in 0..3u8 {
            tx.send(test_frame(serial)).unwrap();
        }

        let first = rx.recv().unwrap();
        let latest = drain_to_latest(&rx, first);
        assert_eq!(latest.rgba[0], 2);
        assert!(rx.try_recv().is_err(), "queue should be empty afterwards");
    }

    #[test]
    fn publishes_only_when_the_snapshot_changes() {
        let mut engine = test_engine();
        let (event_tx, event_rx) = unbounded();
        let mut last = engine.snapshot();

        publish_if_changed(&engine, &mut last, &event_tx);
        assert!(event_rx.try_recv().is_err(), "unchanged state should stay quiet");

        let mut scores = [0.0f32; LETTER_CLASSES];
        scores[0] = 0.9;
        engine.apply_letter_scores(&scores);

        publish_if_changed(&engine, &mut last, &event_tx);
        match event_rx.try_recv() {
            Ok(SessionEvent::Transcript(snapshot)) => assert_eq!(snapshot.letter, Some('A')),
            other => panic!("expected a transcript event, got {other:?}"),
        }

        publish_if_changed(&engine, &mut last, &event_tx);
        assert!(event_rx.try_recv().is_err(), "identical snapshot should not republish");
    }
}
