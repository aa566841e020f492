use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{Clamped, JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, ImageData, Window};

use digitpad_shared::{BatchRecord, ModelResult, PredictResponse};

use crate::dom::set_prediction_text;
use crate::net;
use crate::pixels::{has_ink, invert_rgba};
use crate::state::{State, PREDICT_ERROR_TEXT};

/// Copies the visible bitmap to an off-screen canvas, inverts it to the
/// white-on-black orientation the classifier expects, and encodes it as a
/// PNG data URI. Returns `None` when the canvas holds no ink, in which case
/// no request should be made.
pub fn snapshot_data_uri(
    document: &Document,
    canvas: &HtmlCanvasElement,
) -> Result<Option<String>, JsValue> {
    let width = canvas.width();
    let height = canvas.height();
    if width == 0 || height == 0 {
        return Ok(None);
    }

    let copy: HtmlCanvasElement = document
        .create_element("canvas")?
        .dyn_into()
        .map_err(|_| JsValue::from_str("created element is not a canvas"))?;
    copy.set_width(width);
    copy.set_height(height);
    let ctx = copy
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("Missing canvas context"))?
        .dyn_into::<CanvasRenderingContext2d>()?;
    ctx.draw_image_with_html_canvas_element(canvas, 0.0, 0.0)?;

    let image_data = ctx.get_image_data(0.0, 0.0, width as f64, height as f64)?;
    let mut pixels = image_data.data().0;
    if !has_ink(&pixels) {
        return Ok(None);
    }
    invert_rgba(&mut pixels);
    let inverted = ImageData::new_with_u8_clamped_array_and_sh(Clamped(&pixels[..]), width, height)?;
    ctx.put_image_data(&inverted, 0.0, 0.0)?;

    Ok(Some(copy.to_data_url_with_type("image/png")?))
}

pub fn summary_text(response: &PredictResponse) -> String {
    match response {
        PredictResponse::Failure { .. } => "Error en predicción".to_string(),
        PredictResponse::Single(combined) => combined_line(combined),
        PredictResponse::Ensemble { mlp, cnn, combined } => format!(
            "MLP: {} ({}%) | CNN: {} ({}%) | Combinada: {} ({}%)",
            mlp.pred,
            mlp.percent(),
            cnn.pred,
            cnn.percent(),
            combined.pred,
            combined.percent()
        ),
    }
}

fn combined_line(result: &ModelResult) -> String {
    format!(
        "Predicción combinada: {} (Confianza: {}%)",
        result.pred,
        result.percent()
    )
}

pub fn batch_line(record: &BatchRecord) -> String {
    match record {
        BatchRecord::Ok {
            filename,
            pred,
            confidence,
        } => {
            let result = ModelResult {
                pred: *pred,
                confidence: *confidence,
            };
            format!("{filename}: {} ({}%)", result.pred, result.percent())
        }
        BatchRecord::Failed { filename, error } => {
            let name = filename.as_deref().unwrap_or("(sin nombre)");
            format!("{name}: {error}")
        }
    }
}

pub fn render_batch_results(document: &Document, list: &Element, records: &[BatchRecord]) {
    list.set_inner_html("");
    for record in records {
        if let Ok(item) = document.create_element("li") {
            item.set_text_content(Some(&batch_line(record)));
            let _ = list.append_child(&item);
        }
    }
}

/// Snapshots the canvas and, if it holds ink, issues the prediction request.
/// The displayed text only ever moves forward: a response is dropped when a
/// newer request has already been applied.
pub fn request_prediction(
    window: &Window,
    document: &Document,
    state: &Rc<RefCell<State>>,
    output: &Element,
) {
    let image = {
        let state_ref = state.borrow();
        match snapshot_data_uri(document, &state_ref.canvas) {
            Ok(Some(uri)) => uri,
            Ok(None) => return,
            Err(error) => {
                web_sys::console::error_2(&"Canvas snapshot failed".into(), &error);
                set_prediction_text(output, PREDICT_ERROR_TEXT);
                return;
            }
        }
    };
    let seq = state.borrow_mut().seq.begin();

    let window = window.clone();
    let state = state.clone();
    let output = output.clone();
    spawn_local(async move {
        match net::fetch_prediction(&window, image).await {
            Ok(response) => {
                if state.borrow_mut().seq.try_apply(seq) {
                    set_prediction_text(&output, &summary_text(&response));
                }
            }
            Err(error) => {
                web_sys::console::error_2(&"Prediction request failed".into(), &error);
                if state.borrow_mut().seq.try_apply(seq) {
                    set_prediction_text(&output, PREDICT_ERROR_TEXT);
                }
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_model_summary_shows_label_and_percent() {
        let response = PredictResponse::Single(ModelResult {
            pred: 7,
            confidence: 0.92,
        });
        let text = summary_text(&response);
        assert_eq!(text, "Predicción combinada: 7 (Confianza: 92%)");
        assert!(text.contains('7'));
        assert!(text.contains("92%"));
    }

    #[test]
    fn ensemble_summary_names_every_model() {
        let response = PredictResponse::Ensemble {
            mlp: ModelResult {
                pred: 3,
                confidence: 0.81,
            },
            cnn: ModelResult {
                pred: 3,
                confidence: 0.95,
            },
            combined: ModelResult {
                pred: 3,
                confidence: 0.9,
            },
        };
        let text = summary_text(&response);
        assert!(text.contains("MLP: 3 (81%)"));
        assert!(text.contains("CNN: 3 (95%)"));
        assert!(text.contains("Combinada: 3 (90%)"));
    }

    #[test]
    fn failure_summary_is_the_fixed_error_string() {
        let response = PredictResponse::Failure {
            error: "Modelo no cargado".to_string(),
        };
        assert_eq!(summary_text(&response), "Error en predicción");
    }

    #[test]
    fn batch_lines_cover_success_and_per_file_errors() {
        let ok = BatchRecord::Ok {
            filename: "three.png".to_string(),
            pred: 3,
            confidence: 0.87,
        };
        assert_eq!(batch_line(&ok), "three.png: 3 (87%)");

        let failed = BatchRecord::Failed {
            filename: None,
            error: "cannot decode image".to_string(),
        };
        assert_eq!(batch_line(&failed), "(sin nombre): cannot decode image");
    }
}
