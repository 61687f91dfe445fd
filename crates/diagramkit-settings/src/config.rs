//! Canvas configuration
//!
//! Every knob the canvas consults at runtime lives in [`CanvasSettings`].
//! Missing keys in a config file fall back to their defaults, so a file only
//! needs to list what it overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{SettingsError, SettingsResult};

/// Zoom steps (percent) used by zoom in/out commands and Ctrl+wheel.
pub const DEFAULT_ZOOM_LEVELS: [f64; 14] = [
    0.1, 1.0, 5.0, 12.5, 25.0, 50.0, 75.0, 100.0, 200.0, 400.0, 800.0, 1200.0, 1600.0, 2000.0,
];

/// How a connection is drawn between its two connectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutingStyle {
    /// A single segment from source to sink
    Straight,
    /// Axis-aligned segments with orthogonal turns
    #[default]
    Elbow,
}

impl std::fmt::Display for RoutingStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Straight => write!(f, "straight"),
            Self::Elbow => write!(f, "elbow"),
        }
    }
}

/// Canvas tuning settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasSettings {
    /// Maximum number of idle containers kept per item kind
    pub max_pooled_containers: usize,
    /// Drag previews every selected item live below this selection size
    pub instant_preview_threshold: usize,
    /// Items per Add notification in a bulk insert
    pub notification_batch_size: usize,
    /// Rotation snap step in degrees (with Shift held)
    pub rotation_snap_step: f64,
    /// Margin added around the union of item bounds to form the extent
    pub extent_margin: f64,
    /// Margin beyond the extent swept when hiding items on scroll
    pub safety_margin: f64,
    /// Distance of one line scroll in canvas units
    pub scroll_line_step: f64,
    /// Fraction of the viewport moved by one mouse wheel notch
    pub wheel_scroll_ratio: f64,
    /// Smallest zoom in percent
    pub min_zoom: f64,
    /// Largest zoom in percent
    pub max_zoom: f64,
    /// Zoom applied to a new canvas, in percent
    pub default_zoom: f64,
    /// Ascending zoom steps in percent
    pub standard_zoom_levels: Vec<f64>,
    /// Routing style for new connections
    pub default_routing: RoutingStyle,
    /// Minimum width and height for new entities
    pub default_min_size: f64,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            max_pooled_containers: 100,
            instant_preview_threshold: 200,
            notification_batch_size: 128,
            rotation_snap_step: 15.0,
            extent_margin: 10.0,
            safety_margin: 10.0,
            scroll_line_step: 10.0,
            wheel_scroll_ratio: 1.0 / 3.0,
            min_zoom: 0.1,
            max_zoom: 50000.0,
            default_zoom: 100.0,
            standard_zoom_levels: DEFAULT_ZOOM_LEVELS.to_vec(),
            default_routing: RoutingStyle::Elbow,
            default_min_size: 10.0,
        }
    }
}

fn positive(key: &str, value: f64) -> SettingsResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SettingsError::invalid(key, format!("must be > 0, got {}", value)))
    }
}

fn non_negative(key: &str, value: f64) -> SettingsResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SettingsError::invalid(key, format!("must be >= 0, got {}", value)))
    }
}

impl CanvasSettings {
    /// Create new settings with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> SettingsResult<()> {
        if self.notification_batch_size == 0 {
            return Err(SettingsError::invalid(
                "notification_batch_size",
                "must be > 0",
            ));
        }

        positive("rotation_snap_step", self.rotation_snap_step)?;
        if self.rotation_snap_step > 360.0 {
            return Err(SettingsError::invalid(
                "rotation_snap_step",
                "must not exceed 360 degrees",
            ));
        }

        non_negative("extent_margin", self.extent_margin)?;
        non_negative("safety_margin", self.safety_margin)?;
        positive("scroll_line_step", self.scroll_line_step)?;
        positive("wheel_scroll_ratio", self.wheel_scroll_ratio)?;
        if self.wheel_scroll_ratio > 1.0 {
            return Err(SettingsError::invalid(
                "wheel_scroll_ratio",
                "must not exceed 1",
            ));
        }

        positive("min_zoom", self.min_zoom)?;
        positive("max_zoom", self.max_zoom)?;
        if self.min_zoom > self.max_zoom {
            return Err(SettingsError::invalid(
                "min_zoom",
                format!("{} is greater than max_zoom {}", self.min_zoom, self.max_zoom),
            ));
        }
        if !(self.min_zoom..=self.max_zoom).contains(&self.default_zoom) {
            return Err(SettingsError::invalid(
                "default_zoom",
                format!(
                    "{} is outside [{}, {}]",
                    self.default_zoom, self.min_zoom, self.max_zoom
                ),
            ));
        }

        if self.standard_zoom_levels.is_empty() {
            return Err(SettingsError::invalid(
                "standard_zoom_levels",
                "must not be empty",
            ));
        }
        if self.standard_zoom_levels.windows(2).any(|w| w[0] >= w[1]) {
            return Err(SettingsError::invalid(
                "standard_zoom_levels",
                "must be strictly ascending",
            ));
        }
        if self
            .standard_zoom_levels
            .iter()
            .any(|z| !(self.min_zoom..=self.max_zoom).contains(z))
        {
            return Err(SettingsError::invalid(
                "standard_zoom_levels",
                "every level must lie within [min_zoom, max_zoom]",
            ));
        }

        non_negative("default_min_size", self.default_min_size)?;

        Ok(())
    }

    /// Clamp a zoom value (percent) into the configured range
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        if !zoom.is_finite() {
            return self.default_zoom;
        }
        zoom.clamp(self.min_zoom, self.max_zoom)
    }

    /// Load settings from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("{}: {}", path.display(), e))
        })?;

        let settings: Self = match extension(path).as_deref() {
            Some("json") => serde_json::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            other => {
                return Err(SettingsError::UnsupportedFormat(
                    other.unwrap_or_default().to_string(),
                ))
            }
        };

        settings.validate()?;
        tracing::debug!("Loaded canvas settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match extension(path).as_deref() {
            Some("json") => serde_json::to_string_pretty(self)?,
            Some("toml") => toml::to_string_pretty(self)?,
            other => {
                return Err(SettingsError::UnsupportedFormat(
                    other.unwrap_or_default().to_string(),
                ))
            }
        };

        std::fs::write(path, content).map_err(|e| {
            SettingsError::SaveError(format!("{}: {}", path.display(), e))
        })?;

        tracing::debug!("Saved canvas settings to {}", path.display());
        Ok(())
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}
