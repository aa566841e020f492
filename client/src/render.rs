use web_sys::CanvasRenderingContext2d;

use crate::state::{Point, State, BACKGROUND_COLOR, STROKE_COLOR, STROKE_WIDTH};

pub fn configure_brush(ctx: &CanvasRenderingContext2d) {
    ctx.set_line_width(STROKE_WIDTH);
    ctx.set_line_cap("round");
    ctx.set_line_join("round");
    ctx.set_stroke_style_str(STROKE_COLOR);
}

/// Fills the whole bitmap white. The empty-canvas check in the predict path
/// needs the background to be actual white pixels, not a transparent bitmap
/// over a white page.
pub fn fill_background(state: &State) {
    let width = state.canvas.width() as f64;
    let height = state.canvas.height() as f64;
    state.ctx.set_fill_style_str(BACKGROUND_COLOR);
    state.ctx.fill_rect(0.0, 0.0, width, height);
}

/// Strokes one segment of the active stroke session. Round caps make the
/// chain of segments read as a single continuous line.
pub fn draw_segment(state: &State, from: Point, to: Point) {
    state.ctx.begin_path();
    state.ctx.move_to(from.x, from.y);
    state.ctx.line_to(to.x, to.y);
    state.ctx.stroke();
}
