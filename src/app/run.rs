//! Top-level entry point for running the dashboard as a native window.

use std::rc::Rc;

use eframe::egui;

use crate::bus::{self, Publisher};
use crate::config::DashboardConfig;
use crate::error::DashboardError;

use super::DashboardApp;

/// Launch the dashboard in a native window.
///
/// 1. Prepares the broker client from `cfg.broker` (no network I/O yet).
/// 2. Builds a [`DashboardApp`] with every configured panel subscribed.
/// 3. Starts the transport thread once the window exists, so incoming
///    messages can wake the UI.
///
/// The call blocks until the window is closed.
pub fn run_dashboard(cfg: DashboardConfig) -> Result<(), DashboardError> {
    let (publisher, connection) = bus::connect(&cfg.broker)?;
    let publisher: Rc<dyn Publisher> = Rc::new(publisher);
    let mut app = DashboardApp::new(&cfg, publisher);
    let filters = app.subscription_filters();
    log::info!(
        "Starting dashboard '{}' against {} ({} subscriptions)",
        cfg.title,
        cfg.broker.url,
        filters.len()
    );

    let mut viewport = egui::ViewportBuilder::default()
        .with_title(cfg.title.clone())
        .with_inner_size(egui::vec2(1400.0, 900.0));
    if let Some(icon) = load_app_icon_svg() {
        viewport = viewport.with_icon(icon);
    }
    let opts = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        &cfg.title,
        opts,
        Box::new(move |cc| {
            let mut fonts = egui::FontDefinitions::default();
            egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
            cc.egui_ctx.set_fonts(fonts);

            let ctx = cc.egui_ctx.clone();
            let waker: Box<dyn Fn() + Send> = Box::new(move || ctx.request_repaint());
            let (rx, _handle) = connection.spawn(filters, Some(waker))?;
            app.set_bus(rx);
            Ok(Box::new(app))
        }),
    )?;
    Ok(())
}

/// Render `icon.svg` from the crate root into an [`egui::IconData`].
///
/// Returns `None` if the file does not exist or cannot be parsed/rendered.
fn load_app_icon_svg() -> Option<egui::IconData> {
    let svg_path = concat!(env!("CARGO_MANIFEST_DIR"), "/icon.svg");
    let data = std::fs::read(svg_path).ok()?;

    let opt = usvg::Options::default();
    let tree = usvg::Tree::from_data(&data, &opt).ok()?;
    let size = tree.size().to_int_size();
    if size.width() == 0 || size.height() == 0 {
        return None;
    }
    let mut pixmap = tiny_skia::Pixmap::new(size.width(), size.height())?;
    let mut canvas = pixmap.as_mut();
    resvg::render(&tree, tiny_skia::Transform::default(), &mut canvas);
    Some(egui::IconData {
        rgba: pixmap.take(),
        width: size.width(),
        height: size.height(),
    })
}
