// video.rs
use thiserror::Error;

use crate::catalog::DanceTrack;

/// Media element failure. Reported inline on the player panel; camera-based
/// features keep working.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    #[error("视频加载失败，请检查网络连接或稍后重试")]
    Load,
}

pub const SEEK_STEP_SECONDS: f32 = 10.0;
pub const SPEED_STEPS: &[f32] = &[0.5, 0.75, 1.0, 1.5, 2.0];

/// Stand-in for the reference-video element: real decode is out of scope, but
/// transport state (position, rate, seeking, end-of-media) behaves like the
/// original player so the practice flow is exercised end to end.
pub struct VideoPlayer {
    duration: f32,
    position: f32,
    speed: f32,
    playing: bool,
    loaded: bool,
    error: Option<PlaybackError>,
}

impl VideoPlayer {
    pub fn new() -> Self {
        Self { duration: 0.0, position: 0.0, speed: 1.0, playing: false, loaded: false, error: None }
    }

    /// Points the player at a track's media. A missing source degrades to the
    /// inline error state instead of failing the caller.
    pub fn load(&mut self, track: &DanceTrack) {
        self.position = 0.0;
        self.playing = false;
        if track.video_ref.is_empty() {
            self.loaded = false;
            self.duration = 0.0;
            self.error = Some(PlaybackError::Load);
            return;
        }
        self.loaded = true;
        self.duration = track.duration_seconds as f32;
        self.error = None;
    }

    pub fn play(&mut self) {
        if self.loaded { self.playing = true; }
    }

    pub fn pause(&mut self) { self.playing = false; }

    pub fn toggle(&mut self) {
        if self.playing { self.pause(); } else { self.play(); }
    }

    pub fn is_playing(&self) -> bool { self.playing }

    pub fn is_loaded(&self) -> bool { self.loaded }

    pub fn error(&self) -> Option<&PlaybackError> { self.error.as_ref() }

    pub fn position(&self) -> f32 { self.position }

    pub fn duration(&self) -> f32 { self.duration }

    pub fn speed(&self) -> f32 { self.speed }

    pub fn set_speed(&mut self, speed: f32) { self.speed = speed; }

    /// Seek relative to the current position, clamped to the media bounds.
    /// No-op until metadata is available, like the original transport.
    pub fn seek_by(&mut self, delta: f32) {
        if !self.loaded { return; }
        self.position = (self.position + delta).clamp(0.0, self.duration);
    }

    /// Advances playback by wall-clock `dt`, scaled by the playback rate.
    pub fn advance(&mut self, dt: f32) {
        if !self.playing { return; }
        self.position += dt * self.speed;
        if self.position >= self.duration {
            self.position = self.duration;
            self.playing = false;
        }
    }

    pub fn clock(&self) -> String {
        format!("{} / {}", mmss(self.position), mmss(self.duration))
    }
}

impl Default for VideoPlayer {
    fn default() -> Self { Self::new() }
}

fn mmss(seconds: f32) -> String {
    let s = seconds.max(0.0) as u32;
    format!("{:02}:{:02}", s / 60, s % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn loaded_player() -> VideoPlayer {
        let catalog = Catalog::load();
        let mut player = VideoPlayer::new();
        player.load(catalog.get(1).unwrap());
        player
    }

    #[test]
    fn load_reads_duration_from_the_track() {
        let player = loaded_player();
        assert!(player.is_loaded());
        assert_eq!(player.duration(), 180.0);
        assert_eq!(player.clock(), "00:00 / 03:00");
    }

    #[test]
    fn seek_clamps_to_media_bounds() {
        let mut player = loaded_player();
        player.seek_by(-SEEK_STEP_SECONDS);
        assert_eq!(player.position(), 0.0);
        player.seek_by(10_000.0);
        assert_eq!(player.position(), 180.0);
    }

    #[test]
    fn seek_before_load_is_a_no_op() {
        let mut player = VideoPlayer::new();
        player.seek_by(SEEK_STEP_SECONDS);
        assert_eq!(player.position(), 0.0);
    }

    #[test]
    fn advance_respects_playback_rate_and_stops_at_the_end() {
        let mut player = loaded_player();
        player.set_speed(2.0);
        player.play();
        player.advance(30.0);
        assert_eq!(player.position(), 60.0);
        player.advance(10_000.0);
        assert_eq!(player.position(), 180.0);
        assert!(!player.is_playing());
    }

    #[test]
    fn paused_player_does_not_advance() {
        let mut player = loaded_player();
        player.advance(5.0);
        assert_eq!(player.position(), 0.0);
    }

    #[test]
    fn missing_source_degrades_to_inline_error() {
        let catalog = Catalog::load();
        let mut broken = catalog.get(1).unwrap().clone();
        broken.video_ref.clear();
        let mut player = VideoPlayer::new();
        player.load(&broken);
        assert_eq!(player.error(), Some(&PlaybackError::Load));
        player.play();
        assert!(!player.is_playing());
    }
}
