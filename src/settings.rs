//! User settings stored as settings.json in the app data directory

use crate::constants::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

/// How the résumé is sent to the review service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceMode {
    /// PDF as multipart form data under the `file` key
    Multipart,
    /// JSON body with the file name and a free-text prompt
    Prompt,
    /// No network; canned feedback after a fixed delay
    Mock,
}

impl ServiceMode {
    pub const ALL: [ServiceMode; 3] = [ServiceMode::Multipart, ServiceMode::Prompt, ServiceMode::Mock];

    pub fn label(self) -> &'static str {
        match self {
            ServiceMode::Multipart => "Upload",
            ServiceMode::Prompt => "Prompt",
            ServiceMode::Mock => "Mock",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Window geometry
    pub window_x: Option<f32>,
    pub window_y: Option<f32>,
    pub window_w: Option<f32>,
    pub window_h: Option<f32>,

    // Review service
    pub service_mode: ServiceMode,
    pub endpoint_url: String,
    pub recommendation_limit: u32,
    pub mock_delay_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_x: None,
            window_y: None,
            window_w: None,
            window_h: None,
            service_mode: ServiceMode::Multipart,
            endpoint_url: DEFAULT_REVIEW_URL.to_string(),
            recommendation_limit: DEFAULT_RECOMMENDATION_LIMIT,
            mock_delay_ms: DEFAULT_MOCK_DELAY_MS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join("settings.json");
        match std::fs::read_to_string(&path) {
            Ok(s) => match serde_json::from_str(&s) {
                Ok(settings) => {
                    debug!(path = %path.display(), "Settings loaded");
                    settings
                }
                Err(e) => {
                    warn!(error = %e, "Failed to parse settings, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                debug!("No settings file found, using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self, data_dir: &Path) {
        let path = data_dir.join("settings.json");
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    warn!(error = %e, "Failed to save settings");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize settings"),
        }
    }

    /// Apply `RESUME_REVIEW_URL` and `MOCK_REVIEW` from the environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(
            std::env::var("RESUME_REVIEW_URL").ok(),
            std::env::var("MOCK_REVIEW").is_ok(),
        );
    }

    fn apply_overrides(&mut self, url: Option<String>, mock: bool) {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            info!(url = %url, "Endpoint overridden from environment");
            self.endpoint_url = url.trim().to_string();
        }
        if mock {
            info!("Mock review mode forced from environment");
            self.service_mode = ServiceMode::Mock;
        }
    }

    /// Recommendation count within the range the backend accepts
    pub fn clamped_limit(&self) -> u32 {
        self.recommendation_limit.clamp(1, MAX_RECOMMENDATION_LIMIT)
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn mock_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.mock_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::load(dir.path());
        assert_eq!(settings.service_mode, ServiceMode::Multipart);
        assert_eq!(settings.endpoint_url, DEFAULT_REVIEW_URL);
        assert_eq!(settings.mock_delay_ms, 2000);
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{ "service_mode": "mock", "mock_delay_ms": 50 }"#,
        )
        .unwrap();

        let settings = Settings::load(dir.path());
        assert_eq!(settings.service_mode, ServiceMode::Mock);
        assert_eq!(settings.mock_delay_ms, 50);
        assert_eq!(settings.recommendation_limit, DEFAULT_RECOMMENDATION_LIMIT);
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("settings.json"), "{ not json").unwrap();
        let settings = Settings::load(dir.path());
        assert_eq!(settings.endpoint_url, DEFAULT_REVIEW_URL);
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let settings = Settings {
            service_mode: ServiceMode::Prompt,
            endpoint_url: "http://review.local/api".into(),
            window_w: Some(900.0),
            ..Settings::default()
        };
        settings.save(dir.path());

        let loaded = Settings::load(dir.path());
        assert_eq!(loaded.service_mode, ServiceMode::Prompt);
        assert_eq!(loaded.endpoint_url, "http://review.local/api");
        assert_eq!(loaded.window_w, Some(900.0));
    }

    #[test]
    fn env_overrides_apply() {
        let mut settings = Settings::default();
        settings.apply_overrides(Some(" http://other:9000/upload-cv ".into()), true);
        assert_eq!(settings.endpoint_url, "http://other:9000/upload-cv");
        assert_eq!(settings.service_mode, ServiceMode::Mock);

        let mut untouched = Settings::default();
        untouched.apply_overrides(Some("   ".into()), false);
        assert_eq!(untouched.endpoint_url, DEFAULT_REVIEW_URL);
        assert_eq!(untouched.service_mode, ServiceMode::Multipart);
    }

    #[test]
    fn limit_is_clamped() {
        let mut settings = Settings::default();
        settings.recommendation_limit = 0;
        assert_eq!(settings.clamped_limit(), 1);
        settings.recommendation_limit = 500;
        assert_eq!(settings.clamped_limit(), 50);
        settings.recommendation_limit = 7;
        assert_eq!(settings.clamped_limit(), 7);
    }
}
