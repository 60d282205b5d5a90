use crate::types::{FingerSignature, GestureCommand};

/// Maps a finger signature to a command via an exact-match table. Arm order
/// is the priority order; no listed pattern overlaps another, but the first
/// match wins if that ever changes.
pub fn classify(signature: FingerSignature) -> GestureCommand {
    match signature.bits() {
        [1, 1, 1, 1, 1] => GestureCommand::CommitLetter,
        [1, 0, 0, 0, 0] => GestureCommand::Delete,
        [0, 1, 1, 0, 0] => GestureCommand::Space,
        _ => GestureCommand::Neutral,
    }
}
