use crate::{CanvasPoint, DockOffset, Size, ViewportPoint};

/// Maps a page point onto a square surface of side `surface`, letterboxing
/// the shorter viewport dimension so the path keeps its aspect ratio.
///
/// The viewport must not be degenerate; callers check
/// [`Size::is_degenerate`] before mapping.
pub fn map_to_canvas(touch: ViewportPoint, viewport: Size, surface: f64) -> CanvasPoint {
    debug_assert!(!viewport.is_degenerate(), "viewport must have positive size");

    let mut local_width = surface;
    let mut local_height = surface;
    let (offset_x, offset_y) = if viewport.width > viewport.height {
        local_height = viewport.height * surface / viewport.width;
        (0.0, (surface - local_height) / 2.0)
    } else {
        local_width = viewport.width * surface / viewport.height;
        ((surface - local_width) / 2.0, 0.0)
    };

    let ratio_x = viewport.width / local_width;
    let ratio_y = viewport.height / local_height;
    CanvasPoint {
        x: touch.x / ratio_x + offset_x,
        y: touch.y / ratio_y + offset_y,
    }
}

/// Edge-docks `offset` for a dock of size `dock` inside `viewport`.
pub fn snap_offset(offset: DockOffset, dock: Size, viewport: Size, margin: f64) -> DockOffset {
    let left = margin;
    let right = viewport.width - dock.width - margin;
    let top = margin;
    let bottom = viewport.height - dock.height - margin;

    let mut x = offset.x;
    let mut y = offset.y;

    if offset.x < dock.width / 2.0 {
        x = left;
    } else if offset.x + dock.width > viewport.width - dock.width / 2.0 {
        x = right;
    }

    if offset.y < dock.height {
        y = top;
    } else if offset.y + dock.height > viewport.height - dock.height {
        y = bottom;
    } else {
        x = if offset.x + dock.width / 2.0 > viewport.width / 2.0 {
            right
        } else {
            left
        };
    }

    DockOffset {
        x: clamp_axis(x, left, right),
        y: clamp_axis(y, top, bottom),
    }
}

// Lower bound wins when the viewport cannot fit the dock plus margins.
fn clamp_axis(value: f64, min: f64, max: f64) -> f64 {
    value.min(max).max(min)
}
