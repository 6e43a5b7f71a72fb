//! View rendering: header, upload card, review output and the service panel

use super::App;
use crate::constants::*;
use crate::settings::ServiceMode;
use crate::theme;
use crate::types::*;
use crate::ui::components;
use crate::utils::{format_bytes, looks_like_pdf, rasterize_icon};
use eframe::egui;
use egui_phosphor::regular as icons;
use std::path::Path;
use tracing::{debug, warn};

impl App {
    pub(crate) fn render(&mut self, ctx: &egui::Context) {
        self.handle_dropped_files(ctx);
        self.render_header(ctx);
        // Side panel must be added BEFORE CentralPanel
        if self.show_settings {
            self.render_settings_panel(ctx);
        }
        self.render_main(ctx);
    }

    // ========================================================================
    // FILE INPUT
    // ========================================================================

    /// Take the first PDF dropped this frame; anything else is ignored
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if dropped.is_empty() {
            return;
        }
        if self.controller.is_loading() {
            debug!(count = dropped.len(), "Drop ignored while a review is running");
            return;
        }

        for file in dropped {
            let name = match (&file.path, file.name.is_empty()) {
                (Some(path), true) => path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default(),
                _ => file.name.clone(),
            };
            if !looks_like_pdf(&name, &file.mime) {
                warn!(name = %name, mime = %file.mime, "Ignoring dropped file that is not a PDF");
                continue;
            }

            // the prompt carries over, same as picking through the dialog
            if let Some(bytes) = file.bytes {
                self.controller.select_file(SelectedFile::from_bytes(name, bytes));
            } else if let Some(path) = file.path {
                self.load_path(&path);
            } else {
                continue;
            }
            break;
        }
    }

    fn pick_file(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .set_title("Choose your resume")
            .add_filter("PDF", &[PDF_EXTENSION])
            .pick_file()
        {
            self.load_path(&path);
        }
    }

    fn load_path(&self, path: &Path) {
        match SelectedFile::from_path(path) {
            Ok(file) => self.controller.select_file(file),
            Err(e) => warn!(error = %e, "Could not read resume, selection unchanged"),
        }
    }

    fn submit_review(&self, ctx: &egui::Context) {
        let repaint = ctx.clone();
        if self
            .controller
            .submit(self.runtime.handle(), move || repaint.request_repaint())
            .is_none()
        {
            debug!("Submit ignored");
        }
    }

    // ========================================================================
    // HEADER
    // ========================================================================

    fn render_header(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("header")
            .exact_height(52.0)
            .show_separator_line(false)
            .frame(
                egui::Frame::new()
                    .fill(theme::BG_BASE)
                    .inner_margin(egui::Margin::symmetric(16, 10)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    if self.logo_texture.is_none() {
                        if let Some((pixels, w, h)) = rasterize_icon((theme::LOGO_SIZE * 2.0) as u32) {
                            self.logo_texture = Some(ctx.load_texture(
                                "logo",
                                egui::ColorImage::from_rgba_unmultiplied([w as usize, h as usize], &pixels),
                                egui::TextureOptions::LINEAR,
                            ));
                        }
                    }
                    if let Some(texture) = &self.logo_texture {
                        ui.image(egui::load::SizedTexture::new(
                            texture.id(),
                            egui::vec2(theme::LOGO_SIZE, theme::LOGO_SIZE),
                        ));
                    }

                    ui.add(
                        egui::Label::new(
                            egui::RichText::new(APP_NAME)
                                .size(theme::FONT_TITLE)
                                .strong()
                                .color(theme::TEXT_PRIMARY),
                        )
                        .selectable(false),
                    );
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new(format!("v{APP_VERSION}"))
                                .size(theme::FONT_SMALL)
                                .color(theme::TEXT_DIM),
                        )
                        .selectable(false),
                    );

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let gear = egui::RichText::new(icons::GEAR_SIX).size(16.0).color(
                            if self.show_settings { theme::ACCENT } else { theme::TEXT_MUTED },
                        );
                        if ui
                            .add(egui::Button::new(gear).frame(false))
                            .on_hover_text("Review service")
                            .clicked()
                        {
                            self.show_settings = !self.show_settings;
                        }
                        ui.add_space(theme::SPACING_MD);
                        components::status_badge(ui, &self.service_status);
                    });
                });
            });
    }

    // ========================================================================
    // SERVICE SETTINGS PANEL
    // ========================================================================

    fn render_settings_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("service_panel")
            .exact_width(theme::SETTINGS_PANEL_WIDTH)
            .resizable(false)
            .show_separator_line(false)
            .frame(
                egui::Frame::new()
                    .fill(theme::BG_ELEVATED)
                    .inner_margin(egui::Margin::same(theme::SPACING_XL as i8)),
            )
            .show(ctx, |ui| {
                section_label(ui, "REVIEW SERVICE");
                ui.add_space(theme::SPACING_MD);

                let labels: Vec<&str> = ServiceMode::ALL.iter().map(|m| m.label()).collect();
                let active = ServiceMode::ALL
                    .iter()
                    .position(|m| *m == self.settings.service_mode)
                    .unwrap_or(0);
                if let Some(picked) = theme::segmented_picker(ui, &labels, active) {
                    self.settings.service_mode = ServiceMode::ALL[picked];
                    self.apply_service_settings(ctx);
                }
                ui.add_space(theme::SPACING_SM);
                let mode_hint = match self.settings.service_mode {
                    ServiceMode::Multipart => "Sends the PDF as form data.",
                    ServiceMode::Prompt => "Sends the file name with your question.",
                    ServiceMode::Mock => "Offline. Returns sample feedback.",
                };
                ui.label(egui::RichText::new(mode_hint).size(theme::FONT_SMALL).color(theme::TEXT_DIM));

                ui.add_space(theme::SPACING_XL);
                section_label(ui, "ENDPOINT");
                ui.add_space(theme::SPACING_SM);
                let mock = self.settings.service_mode == ServiceMode::Mock;
                let endpoint = ui.add_enabled(
                    !mock,
                    egui::TextEdit::singleline(&mut self.endpoint_draft)
                        .hint_text(DEFAULT_REVIEW_URL)
                        .desired_width(f32::INFINITY),
                );
                let submitted_by_enter =
                    endpoint.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

                if self.settings.service_mode == ServiceMode::Multipart {
                    ui.add_space(theme::SPACING_LG);
                    section_label(ui, "JOB RECOMMENDATIONS");
                    ui.add_space(theme::SPACING_SM);
                    ui.add(
                        egui::DragValue::new(&mut self.limit_draft)
                            .range(1..=MAX_RECOMMENDATION_LIMIT)
                            .speed(0.2),
                    );
                }

                let dirty = self.endpoint_draft.trim() != self.settings.endpoint_url
                    || self.limit_draft != self.settings.recommendation_limit;
                ui.add_space(theme::SPACING_LG);
                ui.horizontal(|ui| {
                    let apply = ui.add_enabled(dirty, theme::button_accent("Apply", dirty));
                    if apply.clicked() || (dirty && submitted_by_enter) {
                        self.apply_service_settings(ctx);
                    }
                    if ui
                        .add_enabled(!mock, theme::button(format!("{} Check", icons::ARROWS_CLOCKWISE)))
                        .clicked()
                    {
                        self.check_service_health(ctx);
                    }
                });

                if let ServiceStatus::Offline(reason) = &self.service_status {
                    ui.add_space(theme::SPACING_MD);
                    ui.label(egui::RichText::new(reason).size(theme::FONT_SMALL).color(theme::STATUS_ERROR));
                }

                ui.with_layout(egui::Layout::bottom_up(egui::Align::Min), |ui| {
                    if ui
                        .add(egui::Button::new(
                            egui::RichText::new(format!("{} Open logs folder", icons::FOLDER_OPEN))
                                .size(theme::FONT_SMALL)
                                .color(theme::TEXT_MUTED),
                        ).frame(false))
                        .clicked()
                    {
                        if let Err(e) = open::that(self.data_dir.join("logs")) {
                            warn!(error = %e, "Failed to open logs folder");
                        }
                    }
                });
            });
    }

    // ========================================================================
    // UPLOAD CARD + REVIEW OUTPUT
    // ========================================================================

    fn render_main(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(
                egui::Frame::new()
                    .fill(theme::BG_BASE)
                    .inner_margin(egui::Margin::symmetric(16, 12)),
            )
            .show(ctx, |ui| {
                let state = self.controller.snapshot();
                let hovering = ctx.input(|i| !i.raw.hovered_files.is_empty());

                theme::card_frame().show(ui, |ui| {
                    ui.set_min_width(ui.available_width());
                    match &state.file {
                        None => {
                            if components::drop_zone(ui, hovering, !state.loading).clicked() {
                                self.pick_file();
                            }
                        }
                        Some(file) => self.render_file_chip(ui, file, state.loading, hovering),
                    }

                    if self.controller.requires_prompt() {
                        ui.add_space(theme::SPACING_LG);
                        let prompt = ui.add_enabled(
                            !state.loading,
                            egui::TextEdit::multiline(&mut self.prompt_draft)
                                .hint_text("What should the reviewer focus on?")
                                .desired_rows(3)
                                .desired_width(f32::INFINITY),
                        );
                        if prompt.changed() {
                            self.controller.set_prompt(&self.prompt_draft);
                        }
                    }

                    ui.add_space(theme::SPACING_LG);
                    ui.horizontal(|ui| {
                        let can_submit = self.controller.can_submit();
                        let label = if state.loading {
                            "Reviewing…".to_string()
                        } else {
                            format!("{} Review resume", icons::PAPER_PLANE_TILT)
                        };
                        if ui
                            .add_enabled(can_submit, theme::button_accent(label, can_submit))
                            .clicked()
                        {
                            self.submit_review(ctx);
                        }
                        if state.loading {
                            ui.spinner();
                        }

                        let can_clear = state.file.is_some() && !state.loading;
                        if ui
                            .add_enabled(can_clear, theme::button(format!("{} Clear", icons::X)))
                            .clicked()
                        {
                            self.controller.clear_file();
                            self.prompt_draft.clear();
                        }
                    });
                });

                ui.add_space(theme::SPACING_LG);
                self.render_result(ui, ctx, &state);
            });
    }

    fn render_file_chip(&mut self, ui: &mut egui::Ui, file: &SelectedFile, loading: bool, hovering: bool) {
        let frame = if hovering && !loading {
            theme::section_frame().stroke(egui::Stroke::new(theme::STROKE_MEDIUM, theme::ACCENT))
        } else {
            theme::section_frame()
        };
        frame.show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.add(
                    egui::Label::new(egui::RichText::new(icons::FILE_PDF).size(22.0).color(theme::ACCENT))
                        .selectable(false),
                );
                ui.vertical(|ui| {
                    ui.label(egui::RichText::new(&file.name).strong().color(theme::TEXT_PRIMARY));
                    ui.label(
                        egui::RichText::new(format_bytes(file.size()))
                            .size(theme::FONT_SMALL)
                            .color(theme::TEXT_DIM),
                    );
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.add_enabled(!loading, theme::button("Change")).clicked() {
                        self.pick_file();
                    }
                    if let Some(path) = &file.path {
                        if ui
                            .add(theme::button(icons::ARROW_SQUARE_OUT))
                            .on_hover_text("Open in default viewer")
                            .clicked()
                        {
                            if let Err(e) = open::that(path) {
                                warn!(error = %e, path = %path.display(), "Failed to open resume");
                            }
                        }
                    }
                });
            });
        });
    }

    fn render_result(&mut self, ui: &mut egui::Ui, ctx: &egui::Context, state: &UploadState) {
        let Some(result) = state.result.as_deref() else {
            ui.add_space(theme::SPACING_XL);
            ui.vertical_centered(|ui| {
                if state.loading {
                    ui.spinner();
                    ui.add_space(theme::SPACING_MD);
                    ui.label(egui::RichText::new("Reviewing your resume…").color(theme::TEXT_MUTED));
                } else {
                    ui.label(egui::RichText::new("Your review will appear here.").color(theme::TEXT_DIM));
                }
            });
            return;
        };

        if state.phase == UploadPhase::Errored {
            theme::error_frame().show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(icons::WARNING_CIRCLE).color(theme::ERROR_TEXT));
                    ui.label(egui::RichText::new(result).color(theme::ERROR_TEXT));
                });
            });
            return;
        }

        ui.horizontal(|ui| {
            section_label(ui, "REVIEW");
            if let Some(at) = state.completed_at {
                ui.label(
                    egui::RichText::new(at.format("%H:%M:%S").to_string())
                        .size(theme::FONT_SMALL)
                        .color(theme::TEXT_DIM),
                );
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .add(theme::button(format!("{} Copy", icons::COPY)))
                    .on_hover_text("Copy the review as markdown")
                    .clicked()
                {
                    ctx.copy_text(result.to_string());
                }
            });
        });
        ui.add_space(theme::SPACING_SM);

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                theme::card_frame().show(ui, |ui| {
                    ui.set_min_width(ui.available_width());
                    let blocks = self.rendered_blocks(state);
                    components::markdown_view(ui, blocks);
                });
            });
    }
}

fn section_label(ui: &mut egui::Ui, text: &str) {
    ui.add(
        egui::Label::new(
            egui::RichText::new(text)
                .size(theme::FONT_SMALL)
                .strong()
                .color(theme::TEXT_DIM),
        )
        .selectable(false),
    );
}
