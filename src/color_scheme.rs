//! Colors: the dashboard theme and the channel palette.
//!
//! The channel palette is a static table keyed by channel id. Ids of 100
//! and above are reduced by integer division by 10 before lookup, so that
//! sub-channels (e.g. 190..199) share the color of their parent id (19).
//! Ids without an entry get [`FALLBACK_COLOR`].

use std::collections::HashMap;

use eframe::egui::{Color32, Context, Visuals};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Color used for channels without a palette entry.
pub const FALLBACK_COLOR: Color32 = Color32::BLACK;

static CHANNEL_PALETTE: Lazy<HashMap<u32, [u8; 3]>> = Lazy::new(|| {
    HashMap::from([
        (19, [165, 235, 99]),
        (20, [224, 139, 76]),
        (22, [224, 83, 95]),
        (23, [250, 38, 85]),
        (24, [55, 209, 250]),
        (25, [49, 122, 222]),
        (26, [75, 250, 151]),
        (27, [98, 224, 81]),
        (28, [250, 182, 67]),
        (29, [245, 118, 86]),
        (30, [194, 50, 250]),
        (55, [106, 49, 222]),
        (62, [66, 75, 245]),
        (63, [250, 196, 75]),
        (66, [245, 227, 34]),
        // reference channels
        (0, [189, 189, 189]),
        (1, [150, 150, 150]),
        (10, [82, 82, 82]),
        (52, [255, 255, 0]),
    ])
});

/// Reduce a channel id to its palette key.
#[inline]
pub fn palette_key(channel_id: u32) -> u32 {
    if channel_id >= 100 {
        channel_id / 10
    } else {
        channel_id
    }
}

/// Raw RGB triplet for a channel id, if the palette has one.
pub fn channel_rgb(channel_id: u32) -> Option<[u8; 3]> {
    CHANNEL_PALETTE.get(&palette_key(channel_id)).copied()
}

/// Display color for a channel id; never fails.
pub fn channel_color(channel_id: u32) -> Color32 {
    channel_rgb(channel_id)
        .map(|[r, g, b]| Color32::from_rgb(r, g, b))
        .unwrap_or(FALLBACK_COLOR)
}

/// Brand colors.
pub mod brand {
    use eframe::egui::Color32;

    pub const PRIMARY: Color32 = Color32::from_rgb(38, 38, 60);
    pub const MAGENTA: Color32 = Color32::from_rgb(253, 66, 130);
    pub const PURPLE: Color32 = Color32::from_rgb(116, 81, 241);
    pub const TURQUOISE: Color32 = Color32::from_rgb(77, 229, 219);
    pub const BLUE: Color32 = Color32::from_rgb(17, 147, 245);
    pub const YELLOW: Color32 = Color32::from_rgb(255, 197, 0);
}

/// Visual theme for the dashboard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorScheme {
    /// Light background; the channel palette is tuned for it.
    #[default]
    Light,
    Dark,
    /// Light panels with the brand navy for window chrome.
    Brand,
}

impl ColorScheme {
    pub fn all() -> &'static [ColorScheme] {
        &[ColorScheme::Light, ColorScheme::Dark, ColorScheme::Brand]
    }

    pub fn label(&self) -> &'static str {
        match self {
            ColorScheme::Light => "Light",
            ColorScheme::Dark => "Dark",
            ColorScheme::Brand => "Brand",
        }
    }

    /// Apply this scheme's visuals to an egui context.
    pub fn apply(&self, ctx: &Context) {
        match self {
            ColorScheme::Light => ctx.set_visuals(Visuals::light()),
            ColorScheme::Dark => ctx.set_visuals(Visuals::dark()),
            ColorScheme::Brand => {
                let mut v = Visuals::light();
                v.window_fill = Color32::from_rgb(245, 245, 250);
                v.faint_bg_color = Color32::from_rgb(235, 235, 242);
                v.selection.bg_fill = brand::PURPLE;
                v.hyperlink_color = brand::BLUE;
                v.widgets.hovered.bg_fill = Color32::from_rgb(225, 220, 250);
                v.widgets.active.bg_fill = brand::PURPLE;
                ctx.set_visuals(v);
            }
        }
    }

    /// Fill for the header bar.
    pub fn header_fill(&self) -> Color32 {
        match self {
            ColorScheme::Dark => Color32::from_gray(20),
            ColorScheme::Light | ColorScheme::Brand => brand::PRIMARY,
        }
    }
}
