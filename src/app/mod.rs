//! App module - contains the main application state and logic

mod health;
mod upload;
mod views;

use upload::UploadController;

use crate::markdown::{self, Block};
use crate::service::build_service;
use crate::settings::Settings;
use crate::theme;
use crate::types::*;
use eframe::egui;
use std::path::PathBuf;
use tracing::info;

// ============================================================================
// APP STATE
// ============================================================================

pub struct App {
    pub(crate) settings: Settings,
    pub(crate) data_dir: PathBuf,
    pub(crate) runtime: tokio::runtime::Runtime,
    pub(crate) controller: UploadController,
    pub(crate) service_status: ServiceStatus,
    pub(crate) health_check_started: bool,
    pub(crate) logo_texture: Option<egui::TextureHandle>,
    // Text field buffers
    pub(crate) prompt_draft: String,
    pub(crate) endpoint_draft: String,
    pub(crate) limit_draft: u32,
    pub(crate) show_settings: bool,
    // Parsed result, keyed by UploadState::revision
    pub(crate) rendered: Option<(u64, Vec<Block>)>,
    // Window
    pub(crate) window_pos: Option<egui::Pos2>,
    pub(crate) window_size: Option<egui::Vec2>,
    pub(crate) needs_center: bool,
}

// ============================================================================
// APP INITIALIZATION & HELPERS
// ============================================================================

impl App {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        settings: Settings,
        data_dir: PathBuf,
        runtime: tokio::runtime::Runtime,
    ) -> Self {
        // Force dark theme
        cc.egui_ctx.set_theme(egui::Theme::Dark);

        // Add Phosphor icons font
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        theme::apply_visuals(&cc.egui_ctx);

        let controller = UploadController::new(build_service(&settings));

        Self {
            endpoint_draft: settings.endpoint_url.clone(),
            limit_draft: settings.clamped_limit(),
            settings,
            data_dir,
            runtime,
            controller,
            service_status: ServiceStatus::Checking,
            health_check_started: false,
            logo_texture: None,
            prompt_draft: String::new(),
            show_settings: false,
            rendered: None,
            window_pos: None,
            window_size: None,
            needs_center: false,
        }
    }

    pub fn save_settings(&mut self) {
        self.settings.window_x = self.window_pos.map(|p| p.x);
        self.settings.window_y = self.window_pos.map(|p| p.y);
        self.settings.window_w = self.window_size.map(|s| s.x);
        self.settings.window_h = self.window_size.map(|s| s.y);
        self.settings.save(&self.data_dir);
    }

    /// Commit the service panel drafts, rebuild the review service and re-probe it
    pub fn apply_service_settings(&mut self, ctx: &egui::Context) {
        self.settings.endpoint_url = self.endpoint_draft.trim().to_string();
        self.settings.recommendation_limit = self.limit_draft;
        info!(
            mode = ?self.settings.service_mode,
            endpoint = %self.settings.endpoint_url,
            limit = self.settings.clamped_limit(),
            "Review service settings applied"
        );

        self.controller.set_service(build_service(&self.settings));
        self.save_settings();
        self.check_service_health(ctx);
    }

    /// Blocks for the current result, parsing only when the result changed
    pub(crate) fn rendered_blocks(&mut self, state: &UploadState) -> &[Block] {
        let stale = !matches!(&self.rendered, Some((rev, _)) if *rev == state.revision);
        if stale {
            let blocks = state.result.as_deref().map(markdown::parse).unwrap_or_default();
            self.rendered = Some((state.revision, blocks));
        }
        self.rendered.as_ref().map(|(_, blocks)| blocks.as_slice()).unwrap_or(&[])
    }
}
