use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::DockOffset;

pub const DEFAULT_SIZE: u32 = 60;
pub const DEFAULT_MARGIN: f64 = 2.0;
pub const DEFAULT_TITLE: &str = "Gestures";
pub const DEFAULT_CATALOG_URL: &str =
    "http://api.gesturekit.com/v1.1/index.php/sdk/getgestures_help/";
pub const DEFAULT_BACKGROUND_IMAGE: &str = "https://i.cloudup.com/jAmu8s95gF-3000x3000.png";
pub const TRAIL_CLEAR_DELAY_MS: u32 = 10;
pub const SNAP_DURATION_MS: u32 = 200;

/// Options accepted by the widget constructor. Every field is optional on
/// the JS side.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct WidgetConfig {
    /// Side of the square dock in whole CSS pixels; canvas, trail and snap
    /// all use it.
    pub size: u32,
    /// Id of the mount element. `None` mounts into the page body.
    pub container: Option<String>,
    pub drag: bool,
    pub snap: bool,
    pub title: String,
    pub margin: f64,
    pub initial_offset: DockOffset,
    pub trail_clear_delay_ms: u32,
    pub snap_duration_ms: u32,
    pub catalog_url: String,
    pub gid: Option<String>,
    pub background_image: String,
    pub debug: bool,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            container: None,
            drag: true,
            snap: true,
            title: DEFAULT_TITLE.to_string(),
            margin: DEFAULT_MARGIN,
            initial_offset: DockOffset { x: 2.0, y: 60.0 },
            trail_clear_delay_ms: TRAIL_CLEAR_DELAY_MS,
            snap_duration_ms: SNAP_DURATION_MS,
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            gid: None,
            background_image: DEFAULT_BACKGROUND_IMAGE.to_string(),
            debug: false,
        }
    }
}

impl WidgetConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: WidgetConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.size == 0 {
            return Err(ConfigError::InvalidSize(self.size));
        }
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(ConfigError::InvalidMargin(self.margin));
        }
        Ok(())
    }

    /// Dock side as a layout length.
    pub fn side(&self) -> f64 {
        f64::from(self.size)
    }

    pub fn catalog_url_for(&self, gid: &str) -> String {
        format!("{}{}", self.catalog_url, gid)
    }
}
