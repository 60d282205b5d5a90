pub mod command;
pub mod debounce;
pub mod fingers;
pub mod suggest;
pub mod text;

use std::time::{Duration, Instant};

use crate::types::{GestureCommand, LandmarkSet, TranscriptSnapshot};

use self::{debounce::DebounceGate, suggest::WordList, text::TextBuffer};

/// Size of the fixed A-Z alphabet the letter classifier scores against.
pub const LETTER_CLASSES: usize = 26;

#[derive(Clone, Copy, Debug)]
pub struct EngineConfig {
    /// Minimum gap between two accepted control gestures.
    pub cooldown: Duration,
    /// A letter prediction must strictly exceed this to replace the offer.
    pub letter_threshold: f32,
    pub suggestion_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cooldown: Duration::from_millis(2_500),
            letter_threshold: 0.6,
            suggestion_limit: 5,
        }
    }
}

/// Text mutation applied by an accepted control gesture.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextEvent {
    LetterCommitted(char),
    /// An accepted commit with no pending letter; mutates nothing but still
    /// consumes the debounce window.
    CommitWithoutLetter,
    CharacterDeleted(Option<char>),
    SpaceInserted,
}

/// Outcome of feeding one landmark frame to the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FrameStep {
    Applied(TextEvent),
    Suppressed(GestureCommand),
    /// No control gesture; the host should run letter prediction on this
    /// frame and feed the scores back through [`Engine::apply_letter_scores`].
    Neutral,
}

/// The gesture-to-text session context. Owns the transcript, the debounce
/// gate, and the word list; there is no state outside this struct, so
/// several sessions can coexist and tests stay deterministic.
pub struct Engine {
    config: EngineConfig,
    gate: DebounceGate,
    text: TextBuffer,
    words: WordList,
    suggestions: Vec<String>,
}

impl Engine {
    pub fn new(words: WordList, config: EngineConfig) -> Self {
        Self {
            config,
            gate: DebounceGate::new(config.cooldown),
            text: TextBuffer::default(),
            words,
            suggestions: Vec::new(),
        }
    }

    /// Processes one landmark frame: signature, command, gate, mutation.
    /// `now` is passed in rather than sampled so hosts and tests control
    /// time themselves.
    pub fn process_frame(&mut self, hand: &LandmarkSet, now: Instant) -> FrameStep {
        let signature = fingers::extract(hand);
        let command = command::classify(signature);
        if command == GestureCommand::Neutral {
            return FrameStep::Neutral;
        }
        if !self.gate.try_accept(now) {
            return FrameStep::Suppressed(command);
        }
        let event = match command {
            GestureCommand::CommitLetter => self.apply_commit(),
            GestureCommand::Delete => self.apply_delete(),
            GestureCommand::Space => self.apply_space(),
            GestureCommand::Neutral => return FrameStep::Neutral,
        };
        FrameStep::Applied(event)
    }

    /// Relays classifier scores for a neutral frame. The arg-max class (the
    /// first one on ties) replaces the offered letter when its probability
    /// strictly exceeds the threshold; otherwise the previous offer sticks.
    /// Returns the newly offered letter, if any.
    pub fn apply_letter_scores(&mut self, scores: &[f32; LETTER_CLASSES]) -> Option<char> {
        let mut best = 0;
        for (class, probability) in scores.iter().enumerate() {
            if *probability > scores[best] {
                best = class;
            }
        }
        if scores[best] > self.config.letter_threshold {
            let letter = (b'A' + best as u8) as char;
            self.text.set_letter(letter);
            Some(letter)
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.suggestions.clear();
    }

    pub fn sentence(&self) -> &str {
        self.text.sentence()
    }

    pub fn current_word(&self) -> &str {
        self.text.word()
    }

    pub fn current_letter(&self) -> Option<char> {
        self.text.letter()
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn snapshot(&self) -> TranscriptSnapshot {
        TranscriptSnapshot {
            letter: self.text.letter(),
            word: self.text.word().to_string(),
            sentence: self.text.sentence().to_string(),
            suggestions: self.suggestions.clone(),
        }
    }

    fn apply_commit(&mut self) -> TextEvent {
        match self.text.commit_letter() {
            Some(letter) => {
                self.refresh_suggestions();
                TextEvent::LetterCommitted(letter)
            }
            None => TextEvent::CommitWithoutLetter,
        }
    }

    fn apply_delete(&mut self) -> TextEvent {
        let removed = self.text.delete_last();
        self.refresh_suggestions();
        TextEvent::CharacterDeleted(removed)
    }

    fn apply_space(&mut self) -> TextEvent {
        self.text.insert_space();
        self.suggestions.clear();
        TextEvent::SpaceInserted
    }

    fn refresh_suggestions(&mut self) {
        self.suggestions = self
            .words
            .suggest(self.text.word(), self.config.suggestion_limit);
    }
}
