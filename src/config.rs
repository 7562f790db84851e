// --- CONFIG ---

/// Edge length of one grid cell in canvas pixels.
pub const TILE_SIZE: f64 = 32.0;

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_POLL_MS: u32 = 1000;

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub backend_url: String,
    pub resource_poll_ms: u32,
    pub state_poll_ms: u32,
    pub music_volume: f64,
    pub effect_volume: f64,
    pub audio_dir: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            resource_poll_ms: DEFAULT_POLL_MS,
            state_poll_ms: DEFAULT_POLL_MS,
            music_volume: 0.5,
            effect_volume: 0.7,
            audio_dir: "./audio".to_string(),
        }
    }
}

impl ClientConfig {
    /// Builds a config from `data-*` attributes, e.g. read off the canvas.
    /// Missing, blank or unparsable values keep their defaults.
    pub fn from_attributes<F>(attr: F) -> ClientConfig
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = ClientConfig::default();
        let text = |name: &str| attr(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(url) = text("data-backend-url") {
            cfg.backend_url = url;
        }
        if let Some(ms) = text("data-resource-poll-ms").and_then(|v| v.parse::<u32>().ok()) {
            if ms > 0 {
                cfg.resource_poll_ms = ms;
            }
        }
        if let Some(ms) = text("data-state-poll-ms").and_then(|v| v.parse::<u32>().ok()) {
            if ms > 0 {
                cfg.state_poll_ms = ms;
            }
        }
        if let Some(dir) = text("data-audio-dir") {
            cfg.audio_dir = dir;
        }
        cfg
    }

    /// Absolute URL of a backend route, joined with exactly one slash.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.backend_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn effect_src(&self, effect: &str) -> String {
        format!("{}/{}.mp3", self.audio_dir.trim_end_matches('/'), effect)
    }
}
