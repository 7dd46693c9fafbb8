use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::Rect;

pub const PANEL_WIDTH: f64 = 360.0;
pub const DOCK_GUTTER: f64 = 58.0;
pub const ENTER_DURATION_MS: u32 = 250;

/// One catalog entry.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GestureDescriptor {
    /// Base64 PNG illustration.
    #[serde(rename = "img")]
    pub image: String,
    #[serde(rename = "img_description", default)]
    pub description: String,
}

impl GestureDescriptor {
    pub fn image_src(&self) -> String {
        format!("data:image/png;base64,{}", self.image)
    }
}

#[derive(Deserialize)]
struct CatalogResponse {
    gestureset: GestureSet,
}

#[derive(Deserialize)]
struct GestureSet {
    #[serde(default)]
    gestures: Vec<GestureDescriptor>,
}

/// HTTP 2xx, 304 and the status-less offline case all count as success.
pub fn is_success_status(status: u16) -> bool {
    (200..300).contains(&status) || status == 304 || status == 0
}

pub fn parse_catalog(text: &str) -> Result<Vec<GestureDescriptor>, CatalogError> {
    let response: CatalogResponse = serde_json::from_str(text)?;
    Ok(response.gestureset.gestures)
}

/// Checks the status and parses the body of a catalog response.
pub fn read_catalog_response(status: u16, body: &str) -> Result<Vec<GestureDescriptor>, CatalogError> {
    if !is_success_status(status) {
        return Err(CatalogError::Status(status));
    }
    parse_catalog(body)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PanelSide {
    /// Panel extends to the right of the dock.
    Right,
    /// Panel extends to the left of the dock.
    Left,
}

/// Keyframe endpoints for the panel's enter animation. `left` is `None` when
/// only the width animates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnterAnimation {
    pub from_left: Option<f64>,
    pub to_left: Option<f64>,
    pub from_width: f64,
    pub to_width: f64,
    pub duration_ms: u32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayPlacement {
    pub side: PanelSide,
    pub top: f64,
    pub left: f64,
    pub padding_left: f64,
    pub padding_right: f64,
    /// Width the panel keeps once the enter animation has finished.
    pub width: f64,
    pub animation: EnterAnimation,
}

/// Anchors the panel on the dock, opening away from the nearer edge of the
/// container.
pub fn overlay_placement(dock: Rect, container_width: f64) -> OverlayPlacement {
    if dock.left > container_width / 2.0 {
        let left = dock.left - PANEL_WIDTH;
        OverlayPlacement {
            side: PanelSide::Left,
            top: dock.top,
            left,
            padding_left: 0.0,
            padding_right: DOCK_GUTTER,
            width: PANEL_WIDTH,
            animation: EnterAnimation {
                from_left: Some(dock.left),
                to_left: Some(left),
                from_width: 0.0,
                to_width: PANEL_WIDTH,
                duration_ms: ENTER_DURATION_MS,
            },
        }
    } else {
        OverlayPlacement {
            side: PanelSide::Right,
            top: dock.top,
            left: dock.left + 2.0,
            padding_left: DOCK_GUTTER,
            padding_right: 0.0,
            width: PANEL_WIDTH,
            animation: EnterAnimation {
                from_left: None,
                to_left: None,
                from_width: 0.0,
                to_width: PANEL_WIDTH,
                duration_ms: ENTER_DURATION_MS,
            },
        }
    }
}

/// Catalog contents and visibility.
#[derive(Debug, Default)]
pub struct CatalogOverlay {
    descriptors: Vec<GestureDescriptor>,
    visible: bool,
}

impl CatalogOverlay {
    pub fn descriptors(&self) -> &[GestureDescriptor] {
        &self.descriptors
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Appends freshly loaded entries and returns the new slice for rendering.
    pub fn extend(&mut self, descriptors: Vec<GestureDescriptor>) -> &[GestureDescriptor] {
        let start = self.descriptors.len();
        self.descriptors.extend(descriptors);
        &self.descriptors[start..]
    }

    pub(crate) fn set_visible(&mut self, visible: bool) -> bool {
        std::mem::replace(&mut self.visible, visible) != visible
    }
}
