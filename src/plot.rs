//! Chart adapters: column data, series styling and the per-chart plot handle.
//!
//! A chart is fed a [`ChartData`] table whose column 0 is the shared index
//! axis and whose remaining columns are one series each, all of equal
//! length. Each logical chart owns one [`ChartSlot`], which creates its
//! [`PlotHandle`] on the first feed and updates it in place afterwards.

use eframe::egui::{self, Color32};
use egui_plot::{Legend, Line, Plot};

use crate::color_scheme::channel_color;
use crate::data::frames::FrameWindow;
use crate::bus::Histograms;

/// Fixed chart dimensions in points.
pub const CHART_WIDTH: f32 = 400.0;
pub const CHART_HEIGHT: f32 = 250.0;

/// Column table fed to a plot: index axis plus equally long series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartData {
    columns: Vec<Vec<f64>>,
}

impl ChartData {
    pub fn new(index: Vec<f64>) -> Self {
        Self {
            columns: vec![index],
        }
    }

    /// Append a series, padding with NaN or truncating to the index length.
    pub fn push_series(&mut self, mut values: Vec<f64>) {
        values.resize(self.len(), f64::NAN);
        self.columns.push(values);
    }

    /// Number of rows (points per series).
    pub fn len(&self) -> usize {
        self.columns.first().map(Vec::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn index(&self) -> &[f64] {
        self.columns.first().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn series_count(&self) -> usize {
        self.columns.len().saturating_sub(1)
    }

    pub fn series(&self, k: usize) -> Option<&[f64]> {
        self.columns.get(k + 1).map(Vec::as_slice)
    }

    /// All columns, index first.
    pub fn columns(&self) -> &[Vec<f64>] {
        &self.columns
    }

    /// Finite `[x, y]` points of series `k`.
    pub fn points(&self, k: usize) -> Vec<[f64; 2]> {
        let Some(ys) = self.series(k) else {
            return Vec::new();
        };
        self.index()
            .iter()
            .zip(ys)
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .map(|(x, y)| [*x, *y])
            .collect()
    }
}

/// Stroke and label of one series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesStyle {
    pub label: String,
    pub color: Color32,
    pub width: f32,
    pub show: bool,
}

impl SeriesStyle {
    pub fn new(label: impl Into<String>, color: Color32) -> Self {
        Self {
            label: label.into(),
            color,
            width: 1.0,
            show: true,
        }
    }
}

/// Creation-time options of a plot.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    pub id: String,
    pub title: String,
    pub width: f32,
    pub height: f32,
    pub legend: bool,
    /// Show the hover cursor readout.
    pub cursor: bool,
    /// Label of the index axis.
    pub index_label: String,
    /// One style per data series (index axis excluded).
    pub series: Vec<SeriesStyle>,
}

impl ChartOptions {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            width: CHART_WIDTH,
            height: CHART_HEIGHT,
            legend: false,
            cursor: true,
            index_label: "Idx".to_string(),
            series: Vec::new(),
        }
    }

    fn style_for(&self, k: usize) -> SeriesStyle {
        self.series
            .get(k)
            .cloned()
            .unwrap_or_else(|| SeriesStyle::new(k.to_string(), crate::color_scheme::FALLBACK_COLOR))
    }
}

/// A live plot instance: fixed options plus the latest data.
#[derive(Debug, Clone)]
pub struct PlotHandle {
    options: ChartOptions,
    data: ChartData,
    updates: u64,
}

impl PlotHandle {
    pub fn new(options: ChartOptions, data: ChartData) -> Self {
        Self {
            options,
            data,
            updates: 1,
        }
    }

    /// Replace the data in place.
    pub fn set_data(&mut self, data: ChartData) {
        self.data = data;
        self.updates += 1;
    }

    /// Add styles for series beyond the styled ones, up to `n_series`.
    pub fn extend_series<F>(&mut self, n_series: usize, mut style: F)
    where
        F: FnMut(usize) -> SeriesStyle,
    {
        for k in self.options.series.len()..n_series {
            self.options.series.push(style(k));
        }
    }

    pub fn options(&self) -> &ChartOptions {
        &self.options
    }

    pub fn data(&self) -> &ChartData {
        &self.data
    }

    /// Number of data sets this handle has shown, including the first.
    pub fn updates(&self) -> u64 {
        self.updates
    }

    pub fn show(&self, ui: &mut egui::Ui) -> egui::Response {
        let opts = &self.options;
        ui.vertical(|ui| {
            ui.strong(&opts.title);
            let mut plot = Plot::new(opts.id.as_str())
                .width(opts.width)
                .height(opts.height)
                .allow_scroll(false)
                .x_axis_label(opts.index_label.clone())
                .show_x(opts.cursor)
                .show_y(opts.cursor);
            if opts.legend {
                plot = plot.legend(Legend::default());
            }
            plot.show(ui, |plot_ui| {
                for k in 0..self.data.series_count() {
                    let style = opts.style_for(k);
                    if !style.show {
                        continue;
                    }
                    let line = Line::new(style.label, self.data.points(k))
                        .color(style.color)
                        .width(style.width);
                    plot_ui.line(line);
                }
            });
        })
        .response
    }
}

/// Owner of at most one plot handle for one logical chart.
#[derive(Debug, Default)]
pub struct ChartSlot {
    handle: Option<PlotHandle>,
}

impl ChartSlot {
    /// Feed new data: update the existing plot in place or create it once.
    ///
    /// `options` is only evaluated when the plot is created.
    pub fn feed<F>(&mut self, data: ChartData, options: F)
    where
        F: FnOnce() -> ChartOptions,
    {
        match &mut self.handle {
            Some(handle) => handle.set_data(data),
            None => self.handle = Some(PlotHandle::new(options(), data)),
        }
    }

    pub fn handle(&self) -> Option<&PlotHandle> {
        self.handle.as_ref()
    }

    pub fn handle_mut(&mut self) -> Option<&mut PlotHandle> {
        self.handle.as_mut()
    }

    pub fn is_created(&self) -> bool {
        self.handle.is_some()
    }

    /// Render the plot, or reserve its space with a placeholder until data arrives.
    pub fn show(&self, ui: &mut egui::Ui, placeholder: &str) -> egui::Response {
        match &self.handle {
            Some(handle) => handle.show(ui),
            None => {
                let (rect, resp) = ui.allocate_exact_size(
                    egui::vec2(CHART_WIDTH, CHART_HEIGHT),
                    egui::Sense::hover(),
                );
                ui.painter().text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    placeholder,
                    egui::FontId::proportional(14.0),
                    ui.visuals().weak_text_color(),
                );
                resp
            }
        }
    }
}

// Frame charts

/// Identity (and title) of a frame chart.
pub fn chart_identity(field: &str, baseline: bool) -> String {
    format!("{field} (offset: {baseline})")
}

/// Channel id for channel index `i`: the configured id, else the index.
pub fn channel_id(channel_ids: &[u32], i: usize) -> u32 {
    channel_ids
        .get(i)
        .copied()
        .unwrap_or_else(|| u32::try_from(i).unwrap_or(u32::MAX))
}

/// Column table for a frame window; `None` when the window is empty.
///
/// Column 0 holds frame sequence indices, column `i + 1` the displayed
/// values of channel `i`.
pub fn frame_chart_data(window: &FrameWindow) -> Option<ChartData> {
    if window.is_empty() {
        return None;
    }
    let n_series = window.channel_count();
    let mut data = ChartData::new(window.frames().map(|f| f.index as f64).collect());
    for i in 0..n_series {
        let values = window
            .frames()
            .map(|f| window.displayed_value(f, i).unwrap_or(f64::NAN))
            .collect();
        data.push_series(values);
    }
    Some(data)
}

/// Creation options for a frame chart with `n_series` channels.
pub fn frame_chart_options(
    field: &str,
    baseline: bool,
    channel_ids: &[u32],
    n_series: usize,
) -> ChartOptions {
    let name = chart_identity(field, baseline);
    let mut opts = ChartOptions::new(name.clone(), name);
    opts.series = (0..n_series)
        .map(|i| frame_series_style(channel_ids, i))
        .collect();
    opts
}

/// Label and palette color of channel `i`.
pub fn frame_series_style(channel_ids: &[u32], i: usize) -> SeriesStyle {
    let id = channel_id(channel_ids, i);
    SeriesStyle::new(id.to_string(), channel_color(id))
}

// Histogram chart

pub const HISTOGRAM_ID: &str = "uplot-hist";

/// Column table for a histogram set: index, Flat, White, Normalized.
pub fn histogram_chart_data(hists: &Histograms) -> ChartData {
    let mut data = ChartData::new((0..hists.normalized.len()).map(|i| i as f64).collect());
    data.push_series(hists.flat.clone());
    data.push_series(hists.white.clone());
    data.push_series(hists.normalized.clone());
    data
}

pub fn histogram_chart_options() -> ChartOptions {
    let mut opts = ChartOptions::new(HISTOGRAM_ID, "Histogram");
    opts.legend = true;
    opts.index_label = String::new();
    opts.series = vec![
        SeriesStyle::new("Flat", Color32::RED),
        SeriesStyle::new("White", Color32::GREEN),
        SeriesStyle::new("Normalized", Color32::BLUE),
    ];
    opts
}
