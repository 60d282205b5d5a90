use std::time::Instant;

pub const LANDMARK_COUNT: usize = 21;

/// Landmark indices of the 21-point hand topology used by the detector.
pub mod landmark {
    pub const WRIST: usize = 0;
    pub const THUMB_CMC: usize = 1;
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_FINGER_MCP: usize = 5;
    pub const INDEX_FINGER_PIP: usize = 6;
    pub const INDEX_FINGER_DIP: usize = 7;
    pub const INDEX_FINGER_TIP: usize = 8;
    pub const MIDDLE_FINGER_MCP: usize = 9;
    pub const MIDDLE_FINGER_PIP: usize = 10;
    pub const MIDDLE_FINGER_DIP: usize = 11;
    pub const MIDDLE_FINGER_TIP: usize = 12;
    pub const RING_FINGER_MCP: usize = 13;
    pub const RING_FINGER_PIP: usize = 14;
    pub const RING_FINGER_DIP: usize = 15;
    pub const RING_FINGER_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_DIP: usize = 19;
    pub const PINKY_TIP: usize = 20;
}

#[derive(Clone, Debug)]
pub struct Frame {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub timestamp: Instant,
}

impl Frame {
    /// Flip the frame in place around its vertical axis (selfie view). The
    /// finger heuristics downstream assume this orientation.
    pub fn mirror_horizontal(&mut self) {
        let width = self.width as usize;
        let stride = width * 4;
        for row in self.rgba.chunks_exact_mut(stride) {
            for x in 0..width / 2 {
                let left = x * 4;
                let right = (width - 1 - x) * 4;
                for channel in 0..4 {
                    row.swap(left + channel, right + channel);
                }
            }
        }
    }
}

/// One 3-D hand keypoint. `x`/`y` are normalized image coordinates in 0..1
/// (y grows downward); `z` is relative depth on the same scale.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// The 21 keypoints of one detected hand, indexed per [`landmark`].
#[derive(Clone, Debug)]
pub struct LandmarkSet {
    pub points: [Landmark; LANDMARK_COUNT],
}

#[derive(Clone, Debug)]
pub struct HandObservation {
    pub landmarks: LandmarkSet,
    pub confidence: f32,
    pub handedness: Handedness,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Handedness {
    Left,
    Right,
    Unknown,
}

impl Handedness {
    pub fn from_score(score: f32) -> Handedness {
        if score >= 0.5 {
            Handedness::Right
        } else if score > 0.0 {
            Handedness::Left
        } else {
            Handedness::Unknown
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Handedness::Left => "left hand",
            Handedness::Right => "right hand",
            Handedness::Unknown => "unknown hand",
        }
    }
}

/// Extended/folded flags for each finger, derived from one landmark set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FingerSignature {
    pub thumb: bool,
    pub index: bool,
    pub middle: bool,
    pub ring: bool,
    pub pinky: bool,
}

impl FingerSignature {
    pub fn bits(&self) -> [u8; 5] {
        [
            self.thumb as u8,
            self.index as u8,
            self.middle as u8,
            self.ring as u8,
            self.pinky as u8,
        ]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureCommand {
    CommitLetter,
    Delete,
    Space,
    Neutral,
}

impl GestureCommand {
    pub fn label(&self) -> &'static str {
        match self {
            GestureCommand::CommitLetter => "commit letter",
            GestureCommand::Delete => "delete",
            GestureCommand::Space => "space",
            GestureCommand::Neutral => "neutral",
        }
    }

    pub fn is_control(&self) -> bool {
        !matches!(self, GestureCommand::Neutral)
    }
}

/// Owned copy of the visible transcript state, published to the
/// presentation layer whenever it changes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TranscriptSnapshot {
    pub letter: Option<char>,
    pub word: String,
    pub sentence: String,
    pub suggestions: Vec<String>,
}
