//! diagramkit Settings Crate
//!
//! Canvas tuning knobs (pool size, preview threshold, zoom levels, scroll
//! steps, routing defaults) with validation and TOML/JSON persistence.

pub mod config;
pub mod error;
pub mod persistence;

pub use config::{CanvasSettings, RoutingStyle, DEFAULT_ZOOM_LEVELS};
pub use error::{SettingsError, SettingsResult};
pub use persistence::{config_dir, config_file_path, ensure_config_dir, load_or_default};
