use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlCanvasElement, PointerEvent};

use crate::state::Point;

pub fn get_element<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    let element = document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Missing element: {id}")))?;
    element
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("Invalid element type: {id}")))
}

/// Pointer position in canvas-local coordinates. Pointer events carry client
/// coordinates for both mouse and touch, so one adjustment covers both.
pub fn event_to_point(canvas: &HtmlCanvasElement, event: &PointerEvent) -> Option<Point> {
    let rect = canvas.get_bounding_client_rect();
    if rect.width() <= 0.0 || rect.height() <= 0.0 {
        return None;
    }
    Some(Point {
        x: event.client_x() as f64 - rect.left(),
        y: event.client_y() as f64 - rect.top(),
    })
}

pub fn set_prediction_text(output: &Element, text: &str) {
    output.set_text_content(Some(text));
}
