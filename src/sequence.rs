// sequence.rs
use std::sync::mpsc::{self, Receiver};
use std::thread;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::DanceTrack;
use crate::remote::ApiClient;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f32, y: f32, z: f32) -> Self { Self { x, y, z } }

    pub fn scaled(self, factor: f32) -> Self {
        Vec3::new(self.x * factor, self.y * factor, self.z * factor)
    }

    pub fn to_radians(self) -> Self {
        Vec3::new(self.x.to_radians(), self.y.to_radians(), self.z.to_radians())
    }
}

/// One timestep of avatar motion. Field names follow the wire format of the
/// generation endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationFrame {
    #[serde(rename = "frame")]
    pub index: u32,
    pub position: Vec3,
    /// Euler angles in degrees; converted at the rig.
    pub rotation: Vec3,
    #[serde(rename = "timestamp")]
    pub timestamp_seconds: f32,
}

pub const SYNTHETIC_FRAME_COUNT: u32 = 200;

/// Deterministic fallback motion: slow sway plus a full turn. The cosine terms
/// are anchored so frame 0 is the rest transform.
pub fn synthetic_sequence(frame_count: u32) -> Vec<AnimationFrame> {
    (0..frame_count)
        .map(|i| {
            let t = i as f32;
            AnimationFrame {
                index: i,
                position: Vec3::new(
                    (t * 0.1).sin() * 20.0,
                    ((t * 0.1).cos() - 1.0) * 5.0,
                    (t * 0.05).sin() * 10.0,
                ),
                rotation: Vec3::new(
                    (t * 0.1).sin() * 10.0,
                    (t * 0.05).sin() * 360.0,
                    ((t * 0.1).cos() - 1.0) * 10.0,
                ),
                timestamp_seconds: t * 0.08,
            }
        })
        .collect()
}

/// Owns the frame sequence for the selected track. The cursor is only ever
/// advanced from the render loop: +1 per tick, wrapping, never terminating.
pub struct SequencePlayer {
    frames: Vec<AnimationFrame>,
    cursor: usize,
}

impl SequencePlayer {
    pub fn new(frames: Vec<AnimationFrame>) -> Self {
        let mut player = Self { frames: Vec::new(), cursor: 0 };
        player.replace(frames);
        player
    }

    pub fn len(&self) -> usize { self.frames.len() }

    pub fn cursor(&self) -> usize { self.cursor }

    /// Returns the current frame, then steps the cursor modulo length.
    pub fn advance(&mut self) -> AnimationFrame {
        let frame = self.frames[self.cursor].clone();
        self.cursor = (self.cursor + 1) % self.frames.len();
        frame
    }

    pub fn reset(&mut self) { self.cursor = 0; }

    /// Adopts a new sequence and rewinds. An empty sequence is replaced by the
    /// synthetic fallback so there is always a current frame.
    pub fn replace(&mut self, frames: Vec<AnimationFrame>) {
        self.frames = if frames.is_empty() {
            synthetic_sequence(SYNTHETIC_FRAME_COUNT)
        } else {
            frames
        };
        self.cursor = 0;
    }
}

impl Default for SequencePlayer {
    fn default() -> Self { Self::new(Vec::new()) }
}

/// Re-sources the sequence when the track changes: the generation endpoint
/// first, the synthetic generator on any failure or when no endpoint is
/// configured. The fetch runs off-thread; the result is adopted on poll.
pub struct SequenceLoader {
    client: Option<ApiClient>,
    pending: Option<Receiver<Vec<AnimationFrame>>>,
}

impl SequenceLoader {
    pub fn new(client: Option<ApiClient>) -> Self { Self { client, pending: None } }

    pub fn request(&mut self, track: &DanceTrack) {
        let (tx, rx) = mpsc::channel();
        self.pending = Some(rx);
        let Some(client) = self.client.clone() else {
            let _ = tx.send(synthetic_sequence(SYNTHETIC_FRAME_COUNT));
            return;
        };
        let track = track.clone();
        thread::spawn(move || {
            let frames = match client.fetch_sequence(&track) {
                Ok(frames) => {
                    debug!(track = track.id, frames = frames.len(), "adopted remote action sequence");
                    frames
                }
                Err(e) => {
                    warn!(track = track.id, "sequence generation failed, using synthetic fallback: {e}");
                    synthetic_sequence(SYNTHETIC_FRAME_COUNT)
                }
            };
            let _ = tx.send(frames);
        });
    }

    /// Non-blocking: the freshly sourced sequence, once ready.
    pub fn poll(&mut self) -> Option<Vec<AnimationFrame>> {
        let rx = self.pending.as_ref()?;
        match rx.try_recv() {
            Ok(frames) => {
                self.pending = None;
                Some(frames)
            }
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_is_cyclic_with_the_sequence_period() {
        let mut player = SequencePlayer::new(synthetic_sequence(7));
        let start = player.cursor();
        for n in 0..7 {
            let frame = player.advance();
            assert_eq!(frame.index as usize, (start + n) % 7);
        }
        assert_eq!(player.cursor(), start);
    }

    #[test]
    fn n_advances_land_on_start_plus_n_mod_len() {
        let mut player = SequencePlayer::new(synthetic_sequence(11));
        for _ in 0..25 {
            player.advance();
        }
        assert_eq!(player.cursor(), 25 % 11);
    }

    #[test]
    fn synthetic_fallback_has_exactly_200_frames_and_rests_at_frame_zero() {
        let frames = synthetic_sequence(SYNTHETIC_FRAME_COUNT);
        assert_eq!(frames.len(), 200);
        assert_eq!(frames[0].position, Vec3::ZERO);
        assert_eq!(frames[0].rotation, Vec3::ZERO);
        assert_eq!(frames[0].timestamp_seconds, 0.0);
        // Timestamps advance in 80 ms steps.
        assert!((frames[1].timestamp_seconds - 0.08).abs() < 1e-6);
        assert!((frames[199].timestamp_seconds - 199.0 * 0.08).abs() < 1e-4);
    }

    #[test]
    fn replace_discards_the_old_sequence_and_rewinds() {
        let mut player = SequencePlayer::new(synthetic_sequence(5));
        player.advance();
        player.advance();
        player.replace(synthetic_sequence(9));
        assert_eq!(player.cursor(), 0);
        assert_eq!(player.len(), 9);
    }

    #[test]
    fn reset_rewinds_without_touching_the_frames() {
        let mut player = SequencePlayer::new(synthetic_sequence(5));
        player.advance();
        player.reset();
        assert_eq!(player.cursor(), 0);
        assert_eq!(player.len(), 5);
    }

    #[test]
    fn empty_replacement_falls_back_to_synthetic_motion() {
        let mut player = SequencePlayer::new(Vec::new());
        assert_eq!(player.len(), 200);
        player.replace(Vec::new());
        assert_eq!(player.len(), 200);
    }

    #[test]
    fn frames_parse_the_wire_shape() {
        let json = r#"{
            "frame": 3,
            "action": "dance",
            "position": {"x": 1.0, "y": 2.0, "z": 3.0},
            "rotation": {"x": 0.0, "y": 180.0, "z": 0.0},
            "timestamp": 0.24
        }"#;
        let frame: AnimationFrame = serde_json::from_str(json).unwrap();
        assert_eq!(frame.index, 3);
        assert_eq!(frame.position, Vec3::new(1.0, 2.0, 3.0));
        assert!((frame.rotation.to_radians().y - std::f32::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn loader_without_endpoint_serves_synthetic_immediately() {
        let catalog = crate::catalog::Catalog::load();
        let mut loader = SequenceLoader::new(None);
        let track = catalog.get(1).unwrap();
        loader.request(track);
        let frames = loader.poll().expect("synthetic result should be ready");
        assert_eq!(frames.len(), 200);
        assert!(loader.poll().is_none());
    }
}
