// pose.rs
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Landmarks per detection, MediaPipe pose layout.
pub const KEYPOINT_COUNT: usize = 33;

/// One estimated body-joint location in canvas pixels. Produced fresh every
/// render tick and never kept across frames.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PoseKeypoint {
    pub x: f32,
    pub y: f32,
    pub confidence: f32,
}

impl PoseKeypoint {
    pub fn new(x: f32, y: f32, confidence: f32) -> Self { Self { x, y, confidence } }
}

/// Per-tick keypoint source. A real estimator plugs in here; the shipped
/// source fabricates detections so the practice flow runs without a model.
pub trait PoseSource {
    fn estimate(&mut self, width: f32, height: f32) -> Option<Vec<PoseKeypoint>>;
}

pub struct SimulatedPoseSource {
    rng: rand::rngs::ThreadRng,
}

impl SimulatedPoseSource {
    pub fn new() -> Self { Self { rng: rand::thread_rng() } }
}

impl Default for SimulatedPoseSource {
    fn default() -> Self { Self::new() }
}

impl PoseSource for SimulatedPoseSource {
    fn estimate(&mut self, width: f32, height: f32) -> Option<Vec<PoseKeypoint>> {
        let mut points = Vec::with_capacity(KEYPOINT_COUNT);
        for _ in 0..KEYPOINT_COUNT {
            points.push(PoseKeypoint::new(
                self.rng.gen::<f32>() * width,
                self.rng.gen::<f32>() * height,
                0.3 + self.rng.gen::<f32>() * 0.7,
            ));
        }
        Some(points)
    }
}

/// Keypoints clearing the draw threshold, for the `n/33` readout.
pub fn detected_count(points: &[PoseKeypoint]) -> usize {
    points.iter().filter(|p| p.confidence > crate::skeleton::CONFIDENCE_THRESHOLD).count()
}

/// Mean confidence over all keypoints, as a 0-100 percentage.
pub fn confidence_percent(points: &[PoseKeypoint]) -> u32 {
    if points.is_empty() { return 0; }
    let mean: f32 = points.iter().map(|p| p.confidence).sum::<f32>() / points.len() as f32;
    (mean * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulated_source_yields_full_landmark_sets_in_bounds() {
        let mut source = SimulatedPoseSource::new();
        let points = source.estimate(640.0, 480.0).unwrap();
        assert_eq!(points.len(), KEYPOINT_COUNT);
        for p in &points {
            assert!((0.0..=640.0).contains(&p.x));
            assert!((0.0..=480.0).contains(&p.y));
            assert!((0.0..=1.0).contains(&p.confidence));
        }
    }

    #[test]
    fn stats_over_known_points() {
        let points = vec![
            PoseKeypoint::new(0.0, 0.0, 0.9),
            PoseKeypoint::new(0.0, 0.0, 0.4),
            PoseKeypoint::new(0.0, 0.0, 0.7),
        ];
        assert_eq!(detected_count(&points), 2);
        assert_eq!(confidence_percent(&points), 67);
    }

    #[test]
    fn stats_on_empty_input() {
        assert_eq!(detected_count(&[]), 0);
        assert_eq!(confidence_percent(&[]), 0);
    }
}
