use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, Event, HtmlButtonElement, HtmlCanvasElement,
    HtmlElement, HtmlImageElement, HtmlInputElement, HtmlLinkElement, PointerEvent, Url, Window,
};

use crate::dom::{event_to_point, get_element, set_prediction_text};
use crate::net;
use crate::predict::{render_batch_results, request_prediction};
use crate::prefs;
use crate::render::{configure_brush, draw_segment, fill_background};
use crate::state::{State, StrokeMode, BATCH_ERROR_TEXT, PLACEHOLDER_TEXT};

fn debug_enabled(window: &Window) -> bool {
    let search = window.location().search().ok().unwrap_or_default();
    search.contains("debug=1") || search.contains("debug=true")
}

fn document_ready_state(document: &Document) -> Option<String> {
    js_sys::Reflect::get(document.as_ref(), &JsValue::from_str("readyState"))
        .ok()?
        .as_string()
}

#[wasm_bindgen(start)]
pub fn run() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;
    let started = Rc::new(Cell::new(false));

    if document_ready_state(&document).as_deref() == Some("complete") {
        started.set(true);
        return start_app();
    }

    let onload_started = started.clone();
    let onload = Closure::<dyn FnMut(Event)>::new(move |_| {
        if onload_started.replace(true) {
            return;
        }
        if let Err(err) = start_app() {
            web_sys::console::error_1(&err);
        }
    });
    window.add_event_listener_with_callback("load", onload.as_ref().unchecked_ref())?;
    onload.forget();

    Ok(())
}

fn start_app() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;

    if debug_enabled(&window) {
        let href = window.location().href().ok().unwrap_or_default();
        web_sys::console::log_1(&format!("digitpad debug enabled href={href}").into());
    }

    // Each feature fails open: a page without its elements just runs without
    // that feature.
    if let Err(error) = setup_widget(&window, &document) {
        web_sys::console::warn_2(&"Drawing widget disabled".into(), &error);
    }
    if let Err(error) = setup_batch(&window, &document) {
        web_sys::console::warn_2(&"Batch prediction disabled".into(), &error);
    }
    if let Err(error) = setup_qr(&window, &document) {
        web_sys::console::warn_2(&"QR generation disabled".into(), &error);
    }
    if let Err(error) = setup_darkmode(&window, &document) {
        web_sys::console::warn_2(&"Dark mode toggle disabled".into(), &error);
    }

    Ok(())
}

fn setup_widget(window: &Window, document: &Document) -> Result<(), JsValue> {
    let canvas: HtmlCanvasElement = get_element(document, "canvas-mnist")?;
    let output: Element = get_element(document, "prediction-realtime")?;
    let clear_button: HtmlButtonElement = get_element(document, "clear-canvas")?;
    let ctx = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("Missing canvas context"))?
        .dyn_into::<CanvasRenderingContext2d>()?;
    configure_brush(&ctx);

    let state = Rc::new(RefCell::new(State::new(canvas.clone(), ctx)));
    fill_background(&state.borrow());
    set_prediction_text(&output, PLACEHOLDER_TEXT);

    {
        let down_state = state.clone();
        let down_canvas = canvas.clone();
        let ondown = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            if event.button() != 0 {
                return;
            }
            event.prevent_default();
            let Some(point) = event_to_point(&down_canvas, &event) else {
                return;
            };
            let _ = down_canvas.set_pointer_capture(event.pointer_id());
            down_state.borrow_mut().mode = StrokeMode::Drawing { last: point };
        });
        canvas.add_event_listener_with_callback("pointerdown", ondown.as_ref().unchecked_ref())?;
        ondown.forget();
    }

    {
        let move_state = state.clone();
        let move_canvas = canvas.clone();
        let onmove = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            let mut state = move_state.borrow_mut();
            let StrokeMode::Drawing { last } = state.mode else {
                return;
            };
            event.prevent_default();
            let Some(point) = event_to_point(&move_canvas, &event) else {
                return;
            };
            draw_segment(&state, last, point);
            state.mode = StrokeMode::Drawing { last: point };
        });
        canvas.add_event_listener_with_callback("pointermove", onmove.as_ref().unchecked_ref())?;
        onmove.forget();
    }

    {
        // One stroke-end handler covers up, leave, and cancel; prediction is
        // triggered only when a stroke session was actually active.
        let up_state = state.clone();
        let up_window = window.clone();
        let up_document = document.clone();
        let up_output = output.clone();
        let onup = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            let was_drawing = {
                let mut state = up_state.borrow_mut();
                let drawing = matches!(state.mode, StrokeMode::Drawing { .. });
                state.mode = StrokeMode::Idle;
                drawing
            };
            if !was_drawing {
                return;
            }
            event.prevent_default();
            request_prediction(&up_window, &up_document, &up_state, &up_output);
        });
        for event_name in ["pointerup", "pointerleave", "pointercancel"] {
            canvas.add_event_listener_with_callback(event_name, onup.as_ref().unchecked_ref())?;
        }
        onup.forget();
    }

    {
        let clear_state = state.clone();
        let clear_output = output.clone();
        // Optional secondary display; pages without it clear fine.
        let qr_img = document.get_element_by_id("qr-img");
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            let mut state = clear_state.borrow_mut();
            state.mode = StrokeMode::Idle;
            state.seq.invalidate_pending();
            fill_background(&state);
            set_prediction_text(&clear_output, PLACEHOLDER_TEXT);
            if let Some(img) = &qr_img {
                let _ = img.class_list().remove_1("show");
            }
        });
        clear_button.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    Ok(())
}

fn setup_batch(window: &Window, document: &Document) -> Result<(), JsValue> {
    let upload_button: HtmlButtonElement = get_element(document, "batch-upload")?;
    let file_input: HtmlInputElement = get_element(document, "batch-files")?;
    let results: Element = get_element(document, "batch-results")?;

    let window = window.clone();
    let document = document.clone();
    let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
        let Some(files) = file_input.files() else {
            return;
        };
        if files.length() == 0 {
            return;
        }
        let window = window.clone();
        let document = document.clone();
        let results = results.clone();
        spawn_local(async move {
            match net::fetch_batch(&window, &files).await {
                Ok(records) => render_batch_results(&document, &results, &records),
                Err(error) => {
                    web_sys::console::error_2(&"Batch prediction failed".into(), &error);
                    results.set_inner_html("");
                    if let Ok(item) = document.create_element("li") {
                        item.set_text_content(Some(BATCH_ERROR_TEXT));
                        let _ = results.append_child(&item);
                    }
                }
            }
        });
    });
    upload_button.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
    onclick.forget();

    Ok(())
}

fn setup_qr(window: &Window, document: &Document) -> Result<(), JsValue> {
    let button: HtmlButtonElement = get_element(document, "generate-qr-btn")?;
    let input: HtmlInputElement = get_element(document, "qr-text")?;
    let image: HtmlImageElement = get_element(document, "qr-img")?;

    let object_url: Rc<RefCell<Option<String>>> = Rc::new(RefCell::new(None));
    let window = window.clone();
    let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
        let _ = image.class_list().remove_1("show");
        let value = input.value();
        let text = if value.is_empty() {
            net::DEFAULT_QR_TEXT.to_string()
        } else {
            value
        };
        let window = window.clone();
        let image = image.clone();
        let object_url = object_url.clone();
        spawn_local(async move {
            match net::fetch_qr_blob(&window, text).await {
                Ok(blob) => {
                    let Ok(url) = Url::create_object_url_with_blob(&blob) else {
                        return;
                    };
                    if let Some(previous) = object_url.borrow_mut().replace(url.clone()) {
                        let _ = Url::revoke_object_url(&previous);
                    }
                    image.set_src(&url);
                    let _ = image.class_list().add_1("show");
                }
                Err(error) => {
                    web_sys::console::error_2(&"QR request failed".into(), &error);
                }
            }
        });
    });
    button.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
    onclick.forget();

    Ok(())
}

fn setup_darkmode(window: &Window, document: &Document) -> Result<(), JsValue> {
    let button: HtmlElement = get_element(document, "toggle-darkmode-navbar")?;
    let link: HtmlLinkElement = get_element(document, "darkmode-css")?;

    let active = Rc::new(Cell::new(prefs::load_darkmode(window)));
    apply_darkmode(&button, &link, active.get());

    let window = window.clone();
    let onclick = Closure::<dyn FnMut(Event)>::new({
        let active = active.clone();
        let button = button.clone();
        let link = link.clone();
        move |_| {
            let next = !active.get();
            active.set(next);
            apply_darkmode(&button, &link, next);
            prefs::store_darkmode(&window, next);
        }
    });
    button.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
    onclick.forget();

    Ok(())
}

fn apply_darkmode(button: &HtmlElement, link: &HtmlLinkElement, active: bool) {
    link.set_disabled(!active);
    let label = if active {
        "🌞 Modo Claro"
    } else {
        "🌙 Modo Oscuro"
    };
    button.set_text_content(Some(label));
}
