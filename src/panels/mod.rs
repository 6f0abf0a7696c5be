pub mod command_ui;
pub mod frames_ui;
pub mod histogram_ui;
pub mod image_ui;
pub mod panel_trait;
pub mod status_ui;

pub use command_ui::{CommandButton, CommandSlider, ControlsPanel, ResponseListener};
pub use frames_ui::{FramesPanel, FramesState};
pub use histogram_ui::{HistogramData, HistogramPanel};
pub use image_ui::ImagePanel;
pub use panel_trait::{Panel, PanelState};
pub use status_ui::StatusPanel;
