//! Background probe of the review service's health endpoint

use super::App;
use crate::constants::HEALTH_TIMEOUT_SECS;
use crate::settings::ServiceMode;
use crate::types::ServiceStatus;
use crate::utils::health_url;
use eframe::egui;
use std::time::Duration;
use tracing::{debug, info, warn};

const STATUS_KEY: &str = "service_status";

/// Blocking `GET <origin>/health`; any 2xx counts as online.
fn probe(endpoint: &str) -> ServiceStatus {
    let url = match health_url(endpoint) {
        Ok(url) => url,
        Err(e) => return ServiceStatus::Offline(e.to_string()),
    };
    debug!(url = %url, "Probing review service");

    let client = match reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(HEALTH_TIMEOUT_SECS))
        .build()
    {
        Ok(client) => client,
        Err(e) => return ServiceStatus::Offline(e.to_string()),
    };

    match client.get(&url).send() {
        Ok(response) if response.status().is_success() => ServiceStatus::Online,
        Ok(response) => ServiceStatus::Offline(format!("HTTP {}", response.status())),
        Err(e) => ServiceStatus::Offline(e.to_string()),
    }
}

impl App {
    pub fn check_service_health(&mut self, ctx: &egui::Context) {
        if self.settings.service_mode == ServiceMode::Mock {
            self.service_status = ServiceStatus::Mock;
            return;
        }
        self.service_status = ServiceStatus::Checking;

        let ctx = ctx.clone();
        let endpoint = self.settings.endpoint_url.clone();
        std::thread::spawn(move || {
            let status = probe(&endpoint);
            match &status {
                ServiceStatus::Online => info!(endpoint = %endpoint, "Review service online"),
                ServiceStatus::Offline(reason) => {
                    warn!(endpoint = %endpoint, reason = %reason, "Review service unreachable")
                }
                _ => {}
            }
            ctx.memory_mut(|mem| mem.data.insert_temp(STATUS_KEY.into(), status));
            ctx.request_repaint();
        });
    }

    pub fn poll_service_health(&mut self, ctx: &egui::Context) {
        if let Some(status) = ctx.memory(|mem| mem.data.get_temp::<ServiceStatus>(STATUS_KEY.into())) {
            ctx.memory_mut(|mem| mem.data.remove::<ServiceStatus>(STATUS_KEY.into()));
            // a mode switch to mock may have happened while the probe ran
            if self.service_status == ServiceStatus::Checking {
                self.service_status = status;
            }
        }
    }
}
