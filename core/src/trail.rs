use std::collections::HashMap;

use crate::geometry::map_to_canvas;
use crate::{CanvasPoint, Size, TouchId, TouchSample};

pub const TRAIL_COLOR: &str = "#FFF";
pub const SEGMENT_WIDTH: f64 = 3.0;
pub const DOT_RADIUS: f64 = 3.5;

/// Drawing target for the live trail.
pub trait TrailSurface {
    fn draw_dot(&mut self, at: CanvasPoint, radius: f64);
    fn draw_segment(&mut self, from: CanvasPoint, to: CanvasPoint, width: f64);
    fn clear(&mut self);
    fn set_background_visible(&mut self, visible: bool);
}

/// Identifies one armed trail clear. Only the most recent ticket clears.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClearTicket(u64);

pub struct TrailRenderer<S> {
    surface: S,
    surface_size: f64,
    last_points: HashMap<TouchId, CanvasPoint>,
    background_visible: bool,
    generation: u64,
    pending_clear: Option<ClearTicket>,
}

impl<S: TrailSurface> TrailRenderer<S> {
    pub fn new(surface: S, surface_size: f64) -> Self {
        Self {
            surface,
            surface_size,
            last_points: HashMap::new(),
            background_visible: true,
            generation: 0,
            pending_clear: None,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn last_point(&self, id: TouchId) -> Option<CanvasPoint> {
        self.last_points.get(&id).copied()
    }

    pub fn active_touches(&self) -> usize {
        self.last_points.len()
    }

    pub fn has_pending_clear(&self) -> bool {
        self.pending_clear.is_some()
    }

    /// Paints one batch of samples, in array order.
    pub fn on_samples(&mut self, samples: &[TouchSample], viewport: Size) {
        if samples.is_empty() {
            return;
        }
        if let Some(ticket) = self.pending_clear.take() {
            log::debug!("new gesture before trail clear fired, dropping {ticket:?}");
            self.reset();
        }
        if self.background_visible {
            self.surface.set_background_visible(false);
            self.background_visible = false;
        }
        for sample in samples {
            let point = map_to_canvas(sample.point, viewport, self.surface_size);
            match self.last_points.insert(sample.id, point) {
                Some(last) => self.surface.draw_segment(last, point, SEGMENT_WIDTH),
                None => self.surface.draw_dot(point, DOT_RADIUS),
            }
        }
    }

    /// Arms the delayed clear that follows a completed gesture. The host
    /// calls [`TrailRenderer::finish_clear`] with the ticket once the grace
    /// delay has elapsed.
    pub fn on_gesture_end(&mut self) -> ClearTicket {
        self.generation += 1;
        let ticket = ClearTicket(self.generation);
        self.pending_clear = Some(ticket);
        ticket
    }

    pub fn finish_clear(&mut self, ticket: ClearTicket) -> bool {
        if self.pending_clear != Some(ticket) {
            log::debug!("ignoring stale trail clear {ticket:?}");
            return false;
        }
        self.pending_clear = None;
        self.reset();
        true
    }

    fn reset(&mut self) {
        self.surface.clear();
        self.surface.set_background_visible(true);
        self.background_visible = true;
        self.last_points.clear();
    }
}
