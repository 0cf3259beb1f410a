// session.rs
use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Instant;

use rand::Rng;
use tracing::{debug, warn};

use crate::capture::CameraAdapter;
use crate::catalog::DanceTrack;
use crate::json_loader::AppConfig;
use crate::remote::{ApiClient, NetworkError};
use crate::score::{self, ScoreResult};
use crate::timer::PracticeTimer;

/// Most recent feedback lines kept on screen.
pub const FEEDBACK_KEEP: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    CameraStarting,
    Ready,
    Practicing,
    Ending,
}

impl SessionPhase {
    pub fn label(self) -> &'static str {
        match self {
            SessionPhase::Idle           => "未开始",
            SessionPhase::CameraStarting => "摄像头启动中",
            SessionPhase::Ready          => "准备就绪",
            SessionPhase::Practicing     => "练习中",
            SessionPhase::Ending         => "AI评分中",
        }
    }
}

/// Control actions. Each maps to exactly one transition in `handle`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    StartPractice,
    StopPractice,
    CancelCamera,
}

/// Coordinates capture, the timer, feedback generation and the terminal
/// scored state for one practice screen. Created on view mount, dropped on
/// navigation away.
pub struct PracticeSession {
    phase: SessionPhase,
    timer: PracticeTimer,
    track: Option<DanceTrack>,
    client: Option<ApiClient>,
    cap_seconds: u64,
    feedback_interval: f32,
    feedback: VecDeque<String>,
    next_feedback_in: f32,
    result: Option<ScoreResult>,
    pending_score: Option<Receiver<Result<ScoreResult, NetworkError>>>,
    inline_error: Option<String>,
    rng: rand::rngs::ThreadRng,
}

impl PracticeSession {
    pub fn new(config: &AppConfig, client: Option<ApiClient>) -> Self {
        Self {
            phase: SessionPhase::Idle,
            timer: PracticeTimer::new(),
            track: None,
            client,
            cap_seconds: config.practice_cap_seconds,
            feedback_interval: config.feedback_interval_seconds,
            feedback: VecDeque::new(),
            next_feedback_in: config.feedback_interval_seconds,
            result: None,
            pending_score: None,
            inline_error: None,
            rng: rand::thread_rng(),
        }
    }

    pub fn phase(&self) -> SessionPhase { self.phase }

    pub fn elapsed_seconds(&self) -> u64 { self.timer.elapsed_seconds() }

    pub fn cap_seconds(&self) -> u64 { self.cap_seconds }

    pub fn feedback(&self) -> impl Iterator<Item = &str> {
        self.feedback.iter().map(String::as_str)
    }

    pub fn result(&self) -> Option<&ScoreResult> { self.result.as_ref() }

    /// One-shot inline error message (capture failure and the like).
    pub fn take_error(&mut self) -> Option<String> { self.inline_error.take() }

    /// A new track resets the session to a clean pre-practice state; a run in
    /// progress is abandoned without scoring.
    pub fn select_track(&mut self, track: DanceTrack) {
        self.track = Some(track);
        self.timer.reset();
        self.feedback.clear();
        self.result = None;
        self.pending_score = None;
        self.phase = if self.phase == SessionPhase::Idle { SessionPhase::Idle } else { SessionPhase::Ready };
    }

    // ── Transition table ──────────────────────────────────────────────────────

    pub fn handle(&mut self, event: SessionEvent, camera: &mut CameraAdapter, now: Instant) {
        match (self.phase, event) {
            (SessionPhase::Idle | SessionPhase::Ready, SessionEvent::StartPractice) => {
                if camera.is_active() {
                    self.begin_practicing(now);
                } else {
                    debug!("session: requesting camera");
                    self.phase = SessionPhase::CameraStarting;
                }
            }
            (SessionPhase::CameraStarting, SessionEvent::CancelCamera) => {
                debug!("session: camera request cancelled");
                self.phase = SessionPhase::Idle;
            }
            (SessionPhase::Practicing, SessionEvent::StopPractice) => {
                self.finish_practicing();
            }
            // Repeated starts while practicing, stray stops, etc. are no-ops.
            _ => {}
        }
    }

    /// Frame-loop pump: resolves the pending camera request, advances the
    /// timer, emits feedback, enforces the duration cap and completes scoring.
    pub fn tick(&mut self, camera: &mut CameraAdapter, now: Instant, dt: f32) {
        match self.phase {
            SessionPhase::CameraStarting => match camera.start() {
                Ok(_) => self.begin_practicing(now),
                Err(e) => {
                    warn!("session: capture failed: {e}");
                    self.inline_error = Some(e.to_string());
                    self.phase = SessionPhase::Idle;
                }
            },
            SessionPhase::Practicing => {
                self.timer.tick(now);
                self.next_feedback_in -= dt;
                if self.next_feedback_in <= 0.0 {
                    let feedback = score::pick_feedback(&mut self.rng).to_string();
                    self.push_feedback(feedback);
                    self.next_feedback_in = self.feedback_interval + self.rng.gen::<f32>();
                }
                if self.timer.elapsed_seconds() >= self.cap_seconds {
                    debug!(cap = self.cap_seconds, "session: duration cap reached");
                    self.finish_practicing();
                }
            }
            SessionPhase::Ending => self.poll_score(),
            SessionPhase::Idle | SessionPhase::Ready => {}
        }
    }

    // ── Internals ─────────────────────────────────────────────────────────────

    fn begin_practicing(&mut self, now: Instant) {
        debug!("session: practicing");
        self.timer.reset();
        self.timer.start(now);
        self.feedback.clear();
        self.next_feedback_in = self.feedback_interval;
        self.result = None;
        self.phase = SessionPhase::Practicing;
    }

    fn finish_practicing(&mut self) {
        self.timer.stop();
        self.phase = SessionPhase::Ending;
        self.pending_score = match (&self.client, &self.track) {
            (Some(client), Some(track)) => {
                let (tx, rx) = mpsc::channel();
                let (client, track) = (client.clone(), track.clone());
                thread::spawn(move || {
                    let _ = tx.send(client.fetch_score(&track));
                });
                Some(rx)
            }
            _ => None,
        };
        debug!("session: ending, score requested");
    }

    fn poll_score(&mut self) {
        let outcome = match &self.pending_score {
            None => Some(score::simulated_result(&mut self.rng)),
            Some(rx) => match rx.try_recv() {
                Ok(Ok(result)) => Some(result),
                Ok(Err(e)) => {
                    warn!("session: scoring failed, generating local score: {e}");
                    Some(score::simulated_result(&mut self.rng))
                }
                Err(TryRecvError::Disconnected) => {
                    warn!("session: score worker vanished, generating local score");
                    Some(score::simulated_result(&mut self.rng))
                }
                Err(TryRecvError::Empty) => None,
            },
        };
        if let Some(result) = outcome {
            self.pending_score = None;
            self.result = Some(result.clamped());
            self.phase = SessionPhase::Ready;
            debug!("session: scored");
        }
    }

    fn push_feedback(&mut self, message: String) {
        self.feedback.push_back(message);
        while self.feedback.len() > FEEDBACK_KEEP {
            self.feedback.pop_front();
        }
    }
}
