pub mod binding;
mod store;
mod types;

pub use binding::{BindingOutcome, PresetBindingManager, Resolution};
pub use store::SettingsService;
pub use types::{CRATE_VERSION, DisplayMode, Preset, SETTINGS_KEY, Settings};
