// score.rs
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Coaching lines cycled into the live feedback list while practicing.
pub const FEEDBACK_POOL: &[&str] = &[
    "手臂抬高一点",
    "膝盖再弯曲一些",
    "注意保持平衡",
    "动作再流畅一点",
    "很好，继续保持",
    "脚步跟上节奏",
    "上身保持直立",
    "手腕动作很标准",
    "转身再慢一点",
    "表情更自然一些",
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreDimensions {
    pub accuracy: f32,
    pub rhythm: f32,
    pub expression: f32,
    pub completeness: f32,
}

impl ScoreDimensions {
    pub fn labeled(&self) -> [(&'static str, f32); 4] {
        [
            ("动作准确性", self.accuracy),
            ("节奏把握", self.rhythm),
            ("表现力", self.expression),
            ("完整性", self.completeness),
        ]
    }
}

/// One scoring outcome, real or simulated. Immutable once produced: displayed,
/// then discarded with the results view.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub overall: f32,
    pub dimensions: ScoreDimensions,
    pub feedback: Vec<String>,
}

impl ScoreResult {
    /// Remote scores are adopted verbatim except for range sanity.
    pub fn clamped(mut self) -> Self {
        self.overall = self.overall.clamp(0.0, 100.0);
        self
    }
}

fn mock_score(rng: &mut impl Rng) -> f32 {
    round1(80.0 + rng.gen::<f32>() * 20.0)
}

fn round1(v: f32) -> f32 { (v * 10.0).round() / 10.0 }

/// Locally generated pseudo-score, used when no scoring backend is configured
/// or the scoring request failed.
pub fn simulated_result(rng: &mut impl Rng) -> ScoreResult {
    ScoreResult {
        overall: mock_score(rng),
        dimensions: ScoreDimensions {
            accuracy: mock_score(rng),
            rhythm: mock_score(rng),
            expression: mock_score(rng),
            completeness: mock_score(rng),
        },
        feedback: vec![
            "动作整体流畅，但手臂动作可以更舒展".into(),
            "节奏感良好，建议在跳跃动作时加强爆发力".into(),
            "表情生动，继续保持".into(),
            "动作完成度高，细节处理到位".into(),
        ],
    }
}

pub fn pick_feedback(rng: &mut impl Rng) -> &'static str {
    FEEDBACK_POOL.choose(rng).copied().unwrap_or(FEEDBACK_POOL[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulated_scores_stay_in_range() {
        let mut rng = rand::thread_rng();
        for _ in 0..50 {
            let result = simulated_result(&mut rng);
            for v in [
                result.overall,
                result.dimensions.accuracy,
                result.dimensions.rhythm,
                result.dimensions.expression,
                result.dimensions.completeness,
            ] {
                assert!((80.0..=100.0).contains(&v), "score {v} out of range");
            }
            assert!(!result.feedback.is_empty());
        }
    }

    #[test]
    fn scores_are_rounded_to_one_decimal() {
        let mut rng = rand::thread_rng();
        let v = simulated_result(&mut rng).overall;
        assert!((v * 10.0 - (v * 10.0).round()).abs() < 1e-3);
    }

    #[test]
    fn picked_feedback_comes_from_the_pool() {
        let mut rng = rand::thread_rng();
        for _ in 0..20 {
            assert!(FEEDBACK_POOL.contains(&pick_feedback(&mut rng)));
        }
    }

    #[test]
    fn out_of_range_remote_scores_are_clamped() {
        let wild = ScoreResult {
            overall: 140.0,
            dimensions: ScoreDimensions::default(),
            feedback: vec![],
        };
        assert_eq!(wild.clamped().overall, 100.0);
    }

    #[test]
    fn score_result_parses_the_wire_shape() {
        let json = r#"{
            "overall": 88.5,
            "dimensions": {"accuracy": 90.2, "rhythm": 85.7, "expression": 87.3, "completeness": 86.8},
            "feedback": ["动作整体流畅，节奏感良好"]
        }"#;
        let result: ScoreResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.dimensions.labeled()[0], ("动作准确性", 90.2));
        assert_eq!(result.feedback.len(), 1);
    }
}
