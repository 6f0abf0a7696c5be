//! Visual layout of the dashboard.
//!
//! * a header bar with the application title and theme picker,
//! * the connection-status line,
//! * a control column on the right (when controls are enabled),
//! * a scrollable, wrapping grid of chart and image tiles with the
//!   histogram below them.

use eframe::egui;

use crate::color_scheme::ColorScheme;
use crate::panels::Panel;
use crate::plot::CHART_WIDTH;

use super::DashboardApp;

impl DashboardApp {
    pub(super) fn render(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("spriview_header")
            .frame(
                egui::Frame::default()
                    .fill(self.theme.header_fill())
                    .inner_margin(egui::Margin::symmetric(12, 8)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading(egui::RichText::new(&self.title).color(egui::Color32::WHITE));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let mut theme = self.theme;
                        egui::ComboBox::from_id_salt("spriview_theme")
                            .selected_text(theme.label())
                            .show_ui(ui, |ui| {
                                for s in ColorScheme::all() {
                                    ui.selectable_value(&mut theme, *s, s.label());
                                }
                            });
                        if theme != self.theme {
                            self.theme = theme;
                            theme.apply(ctx);
                        }
                    });
                });
            });

        egui::TopBottomPanel::top("spriview_status").show(ctx, |ui| {
            self.status.render_panel(ui);
        });

        if let Some(controls) = self.controls.as_mut().filter(|c| c.state.visible) {
            egui::SidePanel::right("spriview_controls")
                .resizable(true)
                .default_width(260.0)
                .show(ctx, |ui| {
                    ui.heading(controls.title_and_icon());
                    ui.separator();
                    egui::ScrollArea::vertical().show(ui, |ui| controls.render_panel(ui));
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    for chart in self.charts.iter_mut().filter(|c| c.state.visible) {
                        tile(ui, chart);
                    }
                    for image in self.images.iter_mut().filter(|i| i.state.visible) {
                        tile(ui, image);
                    }
                });
                if let Some(hist) = self.histogram.as_mut().filter(|h| h.state.visible) {
                    ui.add_space(8.0);
                    tile(ui, hist);
                }
            });
        });
    }
}

/// One framed tile: title row above the panel body.
fn tile(ui: &mut egui::Ui, panel: &mut dyn Panel) {
    ui.group(|ui| {
        ui.set_max_width(CHART_WIDTH + 16.0);
        ui.vertical(|ui| {
            ui.strong(panel.title_and_icon());
            panel.render_panel(ui);
        });
    });
}
