//! Reusable UI components
//!
//! Standalone widgets used by the upload and result panels.

use crate::markdown::{Block, ListMarker, Span};
use crate::theme;
use crate::types::ServiceStatus;
use eframe::egui;

/// Drop target that doubles as the "browse" button.
/// `hovering` is true while files are dragged over the window.
pub fn drop_zone(ui: &mut egui::Ui, hovering: bool, enabled: bool) -> egui::Response {
    let size = egui::vec2(ui.available_width(), theme::DROP_ZONE_HEIGHT);
    let sense = if enabled { egui::Sense::click() } else { egui::Sense::hover() };
    let (rect, response) = ui.allocate_exact_size(size, sense);

    if ui.is_rect_visible(rect) {
        let highlighted = enabled && (hovering || response.hovered());
        let (fill, draw_rect) = if enabled {
            theme::button_visual(&response, theme::BG_INPUT, rect)
        } else {
            (theme::BG_INPUT, rect)
        };
        let stroke_color = if highlighted { theme::ACCENT } else { theme::BORDER_DEFAULT };

        let painter = ui.painter();
        painter.rect_filled(draw_rect, theme::RADIUS_LARGE, fill);
        painter.rect_stroke(
            draw_rect,
            theme::RADIUS_LARGE,
            egui::Stroke::new(theme::STROKE_MEDIUM, stroke_color),
            egui::StrokeKind::Inside,
        );

        let icon_color = if highlighted { theme::ACCENT } else { theme::TEXT_DIM };
        painter.text(
            draw_rect.center() - egui::vec2(0.0, 18.0),
            egui::Align2::CENTER_CENTER,
            egui_phosphor::regular::FILE_PDF,
            egui::FontId::proportional(34.0),
            icon_color,
        );
        let caption = if hovering {
            "Release to select this resume"
        } else {
            "Drop your PDF resume here or click to browse"
        };
        painter.text(
            draw_rect.center() + egui::vec2(0.0, 20.0),
            egui::Align2::CENTER_CENTER,
            caption,
            egui::FontId::proportional(theme::FONT_LABEL),
            theme::TEXT_MUTED,
        );
        painter.text(
            draw_rect.center() + egui::vec2(0.0, 40.0),
            egui::Align2::CENTER_CENTER,
            "PDF only",
            egui::FontId::proportional(theme::FONT_SMALL),
            theme::TEXT_DIM,
        );
    }

    if enabled && response.hovered() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
    }
    response
}

/// Colored dot plus label for the health probe result
pub fn status_badge(ui: &mut egui::Ui, status: &ServiceStatus) {
    let (color, label) = match status {
        ServiceStatus::Checking => (theme::TEXT_DIM, "Checking service…".to_string()),
        ServiceStatus::Online => (theme::STATUS_SUCCESS, "Service online".to_string()),
        ServiceStatus::Offline(_) => (theme::STATUS_ERROR, "Service unreachable".to_string()),
        ServiceStatus::Mock => (theme::STATUS_WARNING, "Mock mode".to_string()),
    };
    let response = ui
        .horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = 6.0;
            let (dot, _) = ui.allocate_exact_size(egui::vec2(8.0, 8.0), egui::Sense::hover());
            ui.painter().circle_filled(dot.center(), 4.0, color);
            ui.add(
                egui::Label::new(egui::RichText::new(label).size(theme::FONT_SMALL).color(theme::TEXT_MUTED))
                    .selectable(false),
            );
        })
        .response;
    if let ServiceStatus::Offline(reason) = status {
        response.on_hover_text(reason);
    }
}

fn span_text(span: &Span, size: f32, color: egui::Color32, bold: bool) -> egui::RichText {
    let mut text = egui::RichText::new(&span.text).size(size).color(color);
    if bold || span.strong {
        text = text.strong();
    }
    if span.emphasis {
        text = text.italics();
    }
    if span.code {
        text = text.code();
    }
    text
}

fn spans_row(ui: &mut egui::Ui, spans: &[Span], size: f32, color: egui::Color32, bold: bool) {
    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing.x = 0.0;
        for span in spans {
            let text = span_text(span, size, color, bold);
            match &span.link {
                Some(url) => {
                    ui.hyperlink_to(text, url);
                }
                None => {
                    ui.label(text);
                }
            }
        }
    });
}

/// Render parsed review markdown
pub fn markdown_view(ui: &mut egui::Ui, blocks: &[Block]) {
    for (i, block) in blocks.iter().enumerate() {
        match block {
            Block::Heading { level, spans } => {
                if i > 0 {
                    ui.add_space(theme::SPACING_LG);
                }
                let size = theme::FONT_H[(*level as usize).clamp(1, 3) - 1];
                let color = if *level == 1 { theme::ACCENT_LIGHT } else { theme::TEXT_PRIMARY };
                spans_row(ui, spans, size, color, true);
                ui.add_space(theme::SPACING_XS);
            }
            Block::Paragraph(spans) => {
                spans_row(ui, spans, theme::FONT_BODY, theme::TEXT_SECONDARY, false);
                ui.add_space(theme::SPACING_SM);
            }
            Block::ListItem { depth, marker, spans } => {
                ui.horizontal_top(|ui| {
                    ui.add_space(theme::LIST_INDENT * *depth as f32);
                    let bullet = match marker {
                        ListMarker::Bullet => "•".to_string(),
                        ListMarker::Ordinal(n) => format!("{n}."),
                        ListMarker::Continuation => String::new(),
                    };
                    let (rect, _) = ui.allocate_exact_size(
                        egui::vec2(theme::LIST_INDENT, theme::FONT_BODY + 2.0),
                        egui::Sense::hover(),
                    );
                    ui.painter().text(
                        rect.left_center(),
                        egui::Align2::LEFT_CENTER,
                        bullet,
                        egui::FontId::proportional(theme::FONT_BODY),
                        theme::ACCENT,
                    );
                    ui.vertical(|ui| {
                        spans_row(ui, spans, theme::FONT_BODY, theme::TEXT_SECONDARY, false);
                    });
                });
            }
            Block::Quote(spans) => {
                egui::Frame::new()
                    .fill(theme::BG_ELEVATED)
                    .corner_radius(theme::RADIUS_DEFAULT)
                    .inner_margin(egui::Margin::symmetric(10, 6))
                    .show(ui, |ui| {
                        ui.set_min_width(ui.available_width());
                        let rect = ui.max_rect();
                        ui.painter().vline(
                            rect.left() - 6.0,
                            rect.y_range(),
                            egui::Stroke::new(2.0, theme::ACCENT),
                        );
                        spans_row(ui, spans, theme::FONT_BODY, theme::TEXT_MUTED, false);
                    });
                ui.add_space(theme::SPACING_SM);
            }
            Block::CodeBlock(code) => {
                egui::Frame::new()
                    .fill(theme::BG_CODE)
                    .stroke(egui::Stroke::new(theme::STROKE_DEFAULT, theme::BORDER_SUBTLE))
                    .corner_radius(theme::RADIUS_DEFAULT)
                    .inner_margin(egui::Margin::same(8))
                    .show(ui, |ui| {
                        ui.set_min_width(ui.available_width());
                        ui.label(egui::RichText::new(code).monospace().color(theme::TEXT_SECONDARY));
                    });
                ui.add_space(theme::SPACING_SM);
            }
            Block::Rule => {
                ui.add_space(theme::SPACING_SM);
                ui.separator();
                ui.add_space(theme::SPACING_SM);
            }
        }
    }
}
