use crate::geometry::snap_offset;
use crate::{DockOffset, Rect, Size, ViewportPoint};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragSession {
    /// Pointer position relative to the dock's top-left corner at contact start.
    pub start_delta: ViewportPoint,
    pub moved: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragMode {
    Idle,
    Dragging(DragSession),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragRelease {
    pub offset: DockOffset,
    /// Set when the offset went through edge snapping and should animate there.
    pub snapped: bool,
    /// No move happened between start and end.
    pub tapped: bool,
}

pub struct DockWidget {
    offset: DockOffset,
    size: Size,
    margin: f64,
    drag_enabled: bool,
    snap_enabled: bool,
    visible: bool,
    mode: DragMode,
}

impl DockWidget {
    pub fn new(
        offset: DockOffset,
        size: Size,
        margin: f64,
        drag_enabled: bool,
        snap_enabled: bool,
    ) -> Self {
        Self {
            offset,
            size,
            margin,
            drag_enabled,
            snap_enabled,
            visible: true,
            mode: DragMode::Idle,
        }
    }

    pub fn offset(&self) -> DockOffset {
        self.offset
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn rect(&self) -> Rect {
        Rect::from_offset(self.offset, self.size)
    }

    pub fn mode(&self) -> DragMode {
        self.mode
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.mode, DragMode::Dragging(_))
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_drag_enabled(&self) -> bool {
        self.drag_enabled
    }

    /// Starts a drag session. Returns `false` when a session is already open
    /// or dragging is disabled.
    pub fn begin_drag(&mut self, contact: ViewportPoint) -> bool {
        if !self.drag_enabled || self.is_dragging() {
            return false;
        }
        self.mode = DragMode::Dragging(DragSession {
            start_delta: ViewportPoint {
                x: contact.x - self.offset.x,
                y: contact.y - self.offset.y,
            },
            moved: false,
        });
        true
    }

    /// Follows the pointer. Returns the new offset, or `None` outside a
    /// session.
    pub fn drag_to(&mut self, contact: ViewportPoint) -> Option<DockOffset> {
        let DragMode::Dragging(session) = &mut self.mode else {
            return None;
        };
        self.offset = DockOffset {
            x: contact.x - session.start_delta.x,
            y: contact.y - session.start_delta.y,
        };
        session.moved = true;
        Some(self.offset)
    }

    /// Closes the session. Returns `None` when no session was open.
    pub fn end_drag(&mut self, viewport: Size) -> Option<DragRelease> {
        let DragMode::Dragging(session) = std::mem::replace(&mut self.mode, DragMode::Idle)
        else {
            return None;
        };
        let snapped = self.snap_enabled && !viewport.is_degenerate();
        if snapped {
            self.offset = snap_offset(self.offset, self.size, viewport, self.margin);
        }
        Some(DragRelease {
            offset: self.offset,
            snapped,
            tapped: !session.moved,
        })
    }

    /// Drops an open session without snapping, e.g. on pointer cancel.
    pub fn cancel_drag(&mut self) -> bool {
        std::mem::replace(&mut self.mode, DragMode::Idle) != DragMode::Idle
    }
}
