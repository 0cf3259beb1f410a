// remote.rs
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::DanceTrack;
use crate::score::ScoreResult;
use crate::sequence::AnimationFrame;

/// Network failure at the sequence/score seam. Never surfaced as a blocking
/// error: callers log it and fall back to the local generators.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("sequence endpoint returned no frames")]
    EmptySequence,
}

const REQUEST_TIMEOUT: Duration = Duration::from_secs(8);

/// Blocking client for the generation and scoring endpoints. Calls run on a
/// worker thread (see `SequenceLoader` and the session scorer); the frame loop
/// never waits on the network.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::blocking::Client,
    base_url: String,
}

#[derive(Serialize)]
struct SequenceRequest<'a> {
    dance_type: &'a str,
    difficulty: &'a str,
    duration: u32,
}

#[derive(Deserialize)]
struct SequenceResponse {
    action_sequence: Vec<AnimationFrame>,
}

#[derive(Serialize)]
struct ScoreRequest<'a> {
    video_url: &'a str,
    dance_id: u32,
}

#[derive(Deserialize)]
struct ScoreResponse {
    score_result: ScoreResult,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, NetworkError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client, base_url: base_url.trim_end_matches('/').to_string() })
    }

    pub fn fetch_sequence(&self, track: &DanceTrack) -> Result<Vec<AnimationFrame>, NetworkError> {
        let body = SequenceRequest {
            dance_type: &track.ethnicity,
            difficulty: track.difficulty.label(),
            duration: track.duration_seconds,
        };
        let response: SequenceResponse = self
            .client
            .post(format!("{}/api/dance/generate_actions", self.base_url))
            .json(&body)
            .send()?
            .error_for_status()?
            .json()?;
        if response.action_sequence.is_empty() {
            return Err(NetworkError::EmptySequence);
        }
        Ok(response.action_sequence)
    }

    pub fn fetch_score(&self, track: &DanceTrack) -> Result<ScoreResult, NetworkError> {
        let body = ScoreRequest { video_url: &track.video_ref, dance_id: track.id };
        let response: ScoreResponse = self
            .client
            .post(format!("{}/api/dance/score", self.base_url))
            .json(&body)
            .send()?
            .error_for_status()?
            .json()?;
        Ok(response.score_result.clamped())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_bodies_match_the_wire_format() {
        let catalog = crate::catalog::Catalog::load();
        let track = catalog.get(1).unwrap();
        let seq = serde_json::to_value(SequenceRequest {
            dance_type: &track.ethnicity,
            difficulty: track.difficulty.label(),
            duration: track.duration_seconds,
        })
        .unwrap();
        assert_eq!(seq["dance_type"], "藏族");
        assert_eq!(seq["difficulty"], "初级");
        assert_eq!(seq["duration"], 180);

        let score = serde_json::to_value(ScoreRequest { video_url: &track.video_ref, dance_id: track.id }).unwrap();
        assert_eq!(score["dance_id"], 1);
    }

    #[test]
    fn responses_parse_the_wire_format() {
        let seq: SequenceResponse = serde_json::from_str(
            r#"{"action_sequence": [
                {"frame": 0, "action": "dance",
                 "position": {"x": 0.0, "y": 0.0, "z": 0.0},
                 "rotation": {"x": 0.0, "y": 0.0, "z": 0.0},
                 "timestamp": 0.0}
            ]}"#,
        )
        .unwrap();
        assert_eq!(seq.action_sequence.len(), 1);

        let score: ScoreResponse = serde_json::from_str(
            r#"{"score_result": {
                "overall": 88.5,
                "dimensions": {"accuracy": 90.2, "rhythm": 85.7, "expression": 87.3, "completeness": 86.8},
                "feedback": ["动作整体流畅"]
            }}"#,
        )
        .unwrap();
        assert!((score.score_result.overall - 88.5).abs() < 1e-3);
    }

    #[test]
    fn base_url_is_normalized() {
        let client = ApiClient::new("http://localhost:5000/").unwrap();
        assert_eq!(client.base_url, "http://localhost:5000");
    }
}
