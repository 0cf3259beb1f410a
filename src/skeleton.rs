// skeleton.rs — fixed 33-landmark topology; shared by ui_canvas and the stats readout.
use crate::pose::PoseKeypoint;

/// Keypoints below this score are treated as undetected.
pub const CONFIDENCE_THRESHOLD: f32 = 0.5;

/// Landmark index pairs connected by a bone line (MediaPipe pose layout:
/// face, shoulders-arms, torso, legs down to the feet). The pairing is
/// load-bearing: renumbering the input keypoints invalidates the table.
pub const SKELETON_EDGES: &[(usize, usize)] = &[
    (0, 1), (1, 2), (2, 3), (3, 7),
    (0, 4), (4, 5), (5, 6), (6, 8),
    (9, 10),
    (11, 12), (11, 13), (13, 15), (12, 14), (14, 16),
    (11, 23), (12, 24), (23, 24),
    (23, 25), (25, 27), (27, 29), (29, 31),
    (24, 26), (26, 28), (28, 30), (30, 32),
];

/// What one overlay frame draws: a dot per confident keypoint and a line per
/// edge whose both endpoints are confident.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OverlayShapes {
    pub markers: Vec<(f32, f32)>,
    pub bones: Vec<((f32, f32), (f32, f32))>,
}

impl OverlayShapes {
    pub fn is_empty(&self) -> bool { self.markers.is_empty() && self.bones.is_empty() }
}

/// Pure shape pass for the pose overlay. `None` (camera off or no detection)
/// yields an empty set, so the caller just clears the surface.
pub fn overlay_shapes(keypoints: Option<&[PoseKeypoint]>) -> OverlayShapes {
    let Some(points) = keypoints else { return OverlayShapes::default() };

    let markers = points.iter()
        .filter(|p| p.confidence > CONFIDENCE_THRESHOLD)
        .map(|p| (p.x, p.y))
        .collect();

    let bones = SKELETON_EDGES.iter()
        .filter_map(|&(a, b)| {
            let (pa, pb) = (points.get(a)?, points.get(b)?);
            (pa.confidence > CONFIDENCE_THRESHOLD && pb.confidence > CONFIDENCE_THRESHOLD)
                .then_some(((pa.x, pa.y), (pb.x, pb.y)))
        })
        .collect();

    OverlayShapes { markers, bones }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::{PoseKeypoint, KEYPOINT_COUNT};

    fn full_set(confidence: f32) -> Vec<PoseKeypoint> {
        (0..KEYPOINT_COUNT)
            .map(|i| PoseKeypoint::new(i as f32, i as f32 * 2.0, confidence))
            .collect()
    }

    #[test]
    fn none_and_empty_draw_nothing() {
        assert!(overlay_shapes(None).is_empty());
        assert!(overlay_shapes(Some(&[])).is_empty());
    }

    #[test]
    fn one_marker_per_confident_keypoint() {
        let mut points = full_set(0.9);
        points[3].confidence = 0.2;
        points[10].confidence = 0.5; // at the threshold counts as undetected
        let shapes = overlay_shapes(Some(&points));
        assert_eq!(shapes.markers.len(), KEYPOINT_COUNT - 2);
    }

    #[test]
    fn full_confidence_draws_every_edge() {
        let shapes = overlay_shapes(Some(&full_set(0.9)));
        assert_eq!(shapes.bones.len(), SKELETON_EDGES.len());
    }

    #[test]
    fn a_bone_needs_both_endpoints() {
        let mut points = full_set(0.9);
        points[0].confidence = 0.1; // nose: drops edges (0,1) and (0,4)
        let shapes = overlay_shapes(Some(&points));
        assert_eq!(shapes.bones.len(), SKELETON_EDGES.len() - 2);
        assert!(!shapes.bones.iter().any(|&((x, _), _)| x == 0.0));
    }

    #[test]
    fn short_keypoint_sets_never_panic() {
        let points = full_set(0.9);
        let shapes = overlay_shapes(Some(&points[..5]));
        assert_eq!(shapes.markers.len(), 5);
        // Only edges fully inside the truncated range survive.
        assert!(shapes.bones.len() < SKELETON_EDGES.len());
    }

    #[test]
    fn repeated_calls_are_identical() {
        let points = full_set(0.8);
        assert_eq!(overlay_shapes(Some(&points)), overlay_shapes(Some(&points)));
    }
}
