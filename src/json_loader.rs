// json_loader.rs
use serde::Deserialize;

/// Runtime configuration. Shipped defaults are embedded; the API endpoint can
/// be overridden through `DANCE_MIRROR_API` so the same build runs against a
/// real backend or fully simulated.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)] pub api_base_url: Option<String>,
    #[serde(default = "default_share_base")] pub share_base_url: String,
    #[serde(default = "default_cap")] pub practice_cap_seconds: u64,
    #[serde(default = "default_feedback_interval")] pub feedback_interval_seconds: f32,
    #[serde(default)] pub deny_capture: bool,
}

fn default_share_base() -> String { "https://folkdance.example/community/dance-result".into() }
fn default_cap() -> u64 { 60 }
fn default_feedback_interval() -> f32 { 2.0 }

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: None,
            share_base_url: default_share_base(),
            practice_cap_seconds: default_cap(),
            feedback_interval_seconds: default_feedback_interval(),
            deny_capture: false,
        }
    }
}

impl AppConfig {
    pub fn load() -> Self {
        let mut cfg: AppConfig = load_or_warn("config.json").unwrap_or_default();
        if let Ok(url) = std::env::var("DANCE_MIRROR_API") {
            if url.is_empty() { cfg.api_base_url = None; } else { cfg.api_base_url = Some(url); }
        }
        if std::env::var("DANCE_MIRROR_DENY_CAMERA").is_ok() { cfg.deny_capture = true; }
        cfg
    }
}

// include_str! requires compile-time paths; all assets must be listed here.
fn asset(name: &str) -> Result<&'static str, String> {
    match name {
        "tracks.json" => Ok(include_str!("../assets/tracks.json")),
        "config.json" => Ok(include_str!("../assets/config.json")),
        _ => Err(format!("Asset '{name}' not embedded. Add it to json_loader.rs asset() to embed at compile time.")),
    }
}

pub fn load<T: for<'de> Deserialize<'de>>(name: &str) -> Result<T, String> {
    serde_json::from_str(asset(name)?).map_err(|e| format!("Parse error in {name}: {e}"))
}

pub fn load_or_warn<T: for<'de> Deserialize<'de>>(name: &str) -> Option<T> {
    load(name).map_err(|e| tracing::warn!("{e}")).ok()
}
