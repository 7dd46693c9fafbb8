use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use gesturedock_core::trail::{TrailSurface, TRAIL_COLOR};
use gesturedock_core::CanvasPoint;

use crate::dom::set_style;

/// The dock canvas as a trail drawing target.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    background: String,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement, ctx: CanvasRenderingContext2d, image_url: &str) -> Self {
        ctx.set_line_cap("round");
        ctx.set_line_join("round");
        Self {
            canvas,
            ctx,
            background: format!("url(\"{image_url}\")"),
        }
    }
}

impl TrailSurface for CanvasSurface {
    fn draw_dot(&mut self, at: CanvasPoint, radius: f64) {
        self.ctx.set_fill_style_str(TRAIL_COLOR);
        self.ctx.begin_path();
        let _ = self
            .ctx
            .arc(at.x, at.y, radius, 0.0, std::f64::consts::PI * 2.0);
        self.ctx.fill();
    }

    fn draw_segment(&mut self, from: CanvasPoint, to: CanvasPoint, width: f64) {
        self.ctx.set_stroke_style_str(TRAIL_COLOR);
        self.ctx.set_line_width(width);
        self.ctx.begin_path();
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.ctx.stroke();
    }

    fn clear(&mut self) {
        self.ctx.clear_rect(
            0.0,
            0.0,
            self.canvas.width() as f64,
            self.canvas.height() as f64,
        );
    }

    fn set_background_visible(&mut self, visible: bool) {
        let value = if visible {
            self.background.as_str()
        } else {
            "none"
        };
        set_style(&self.canvas, "background-image", value);
    }
}
