use crate::types::{FingerSignature, LandmarkSet, landmark};

/// Derives the extended/folded signature from one landmark set.
///
/// The four fingers count as extended when the tip sits above the PIP joint
/// in image space (y grows downward). The thumb uses an x comparison against
/// its IP joint instead, which assumes mirrored selfie-view frames; the
/// capture pipeline flips every frame to keep that assumption valid.
pub fn extract(hand: &LandmarkSet) -> FingerSignature {
    let points = &hand.points;
    FingerSignature {
        thumb: points[landmark::THUMB_TIP].x < points[landmark::THUMB_IP].x,
        index: points[landmark::INDEX_FINGER_TIP].y < points[landmark::INDEX_FINGER_PIP].y,
        middle: points[landmark::MIDDLE_FINGER_TIP].y < points[landmark::MIDDLE_FINGER_PIP].y,
        ring: points[landmark::RING_FINGER_TIP].y < points[landmark::RING_FINGER_PIP].y,
        pinky: points[landmark::PINKY_TIP].y < points[landmark::PINKY_PIP].y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LANDMARK_COUNT, Landmark};

    // (tip, pip) index pairs for the non-thumb fingers.
    const FINGER_JOINTS: [(usize, usize); 4] = [
        (landmark::INDEX_FINGER_TIP, landmark::INDEX_FINGER_PIP),
        (landmark::MIDDLE_FINGER_TIP, landmark::MIDDLE_FINGER_PIP),
        (landmark::RING_FINGER_TIP, landmark::RING_FINGER_PIP),
        (landmark::PINKY_TIP, landmark::PINKY_PIP),
    ];

    /// A hand with every finger folded: tips below their PIP joints and the
    /// thumb tip to the right of its IP joint.
    fn folded_hand() -> LandmarkSet {
        let mut points = [Landmark::default(); LANDMARK_COUNT];
        for (i, point) in points.iter_mut().enumerate() {
            point.x = 0.4 + 0.01 * i as f32;
            point.y = 0.5;
        }
        points[landmark::THUMB_IP] = Landmark { x: 0.30, y: 0.55, z: 0.0 };
        points[landmark::THUMB_TIP] = Landmark { x: 0.35, y: 0.55, z: 0.0 };
        for (tip, pip) in FINGER_JOINTS {
            points[pip].y = 0.45;
            points[tip].y = 0.55;
        }
        LandmarkSet { points }
    }

    fn extend_finger(hand: &mut LandmarkSet, tip: usize, pip: usize) {
        hand.points[tip].y = hand.points[pip].y - 0.15;
    }

    fn extend_thumb(hand: &mut LandmarkSet) {
        hand.points[landmark::THUMB_TIP].x = hand.points[landmark::THUMB_IP].x - 0.1;
    }

    fn open_hand() -> LandmarkSet {
        let mut hand = folded_hand();
        extend_thumb(&mut hand);
        for (tip, pip) in FINGER_JOINTS {
            extend_finger(&mut hand, tip, pip);
        }
        hand
    }

    #[test]
    fn folded_hand_yields_all_zero() {
        assert_eq!(extract(&folded_hand()).bits(), [0, 0, 0, 0, 0]);
    }

    #[test]
    fn open_hand_yields_all_one() {
        assert_eq!(extract(&open_hand()).bits(), [1, 1, 1, 1, 1]);
    }

    #[test]
    fn thumb_rule_compares_x_against_ip_joint() {
        let mut hand = folded_hand();
        assert!(!extract(&hand).thumb, "tip right of IP joint is folded");
        extend_thumb(&mut hand);
        assert!(extract(&hand).thumb, "tip left of IP joint is extended");
    }

    #[test]
    fn each_finger_follows_its_own_joints() {
        for (position, (tip, pip)) in FINGER_JOINTS.into_iter().enumerate() {
            let mut hand = folded_hand();
            extend_finger(&mut hand, tip, pip);
            let bits = extract(&hand).bits();
            let mut expected = [0u8; 5];
            expected[position + 1] = 1;
            assert_eq!(bits, expected, "only finger {} should be extended", position + 1);
        }
    }

    #[test]
    fn tip_level_with_joint_counts_as_folded() {
        let mut hand = folded_hand();
        hand.points[landmark::INDEX_FINGER_TIP].y = hand.points[landmark::INDEX_FINGER_PIP].y;
        assert!(!extract(&hand).index);
    }
}
