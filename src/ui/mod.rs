mod panels;
mod theme;

pub use panels::{render_panel, PanelSet, PanelState};
pub use theme::apply_theme;
