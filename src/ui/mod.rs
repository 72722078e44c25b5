//! UI components for Inkmark

mod settings;
mod toolbar;

pub use settings::{SettingsPanel, SettingsPanelOutput};
pub use toolbar::{Toolbar, ToolbarAction, ToolbarContext};
