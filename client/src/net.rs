use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, FileList, FormData, Request, RequestInit, Response, Window};

use digitpad_shared::{BatchRecord, PredictRequest, PredictResponse, QrRequest};

pub const PREDICT_URL: &str = "/predict";
pub const PREDICT_BATCH_URL: &str = "/predict_batch";
pub const GENERATE_QR_URL: &str = "/generate_qr";

pub const DEFAULT_QR_TEXT: &str = "https://tus-predicciones.com";

fn json_request(url: &str, body: &str) -> Result<Request, JsValue> {
    let init = RequestInit::new();
    init.set_method("POST");
    init.set_body(&JsValue::from_str(body));
    let request = Request::new_with_str_and_init(url, &init)?;
    request.headers().set("Content-Type", "application/json")?;
    Ok(request)
}

async fn fetch_response(window: &Window, request: &Request) -> Result<Response, JsValue> {
    JsFuture::from(window.fetch_with_request(request))
        .await?
        .dyn_into::<Response>()
        .map_err(|_| JsValue::from_str("fetch did not yield a Response"))
}

async fn response_text(response: &Response) -> Result<String, JsValue> {
    JsFuture::from(response.text()?)
        .await?
        .as_string()
        .ok_or_else(|| JsValue::from_str("response body is not text"))
}

pub async fn fetch_prediction(window: &Window, image: String) -> Result<PredictResponse, JsValue> {
    let body = serde_json::to_string(&PredictRequest { image })
        .map_err(|error| JsValue::from_str(&error.to_string()))?;
    let request = json_request(PREDICT_URL, &body)?;
    let response = fetch_response(window, &request).await?;
    // The server reports failures as `{error}` JSON bodies with a non-2xx
    // status, so the body is parsed regardless of the status code.
    let text = response_text(&response).await?;
    serde_json::from_str(&text)
        .map_err(|error| JsValue::from_str(&format!("bad {PREDICT_URL} response: {error}")))
}

pub async fn fetch_batch(window: &Window, files: &FileList) -> Result<Vec<BatchRecord>, JsValue> {
    let form = FormData::new()?;
    for index in 0..files.length() {
        if let Some(file) = files.get(index) {
            form.append_with_blob_and_filename("files", &file, &file.name())?;
        }
    }
    let init = RequestInit::new();
    init.set_method("POST");
    init.set_body(form.as_ref());
    let request = Request::new_with_str_and_init(PREDICT_BATCH_URL, &init)?;
    let response = fetch_response(window, &request).await?;
    let text = response_text(&response).await?;
    serde_json::from_str(&text)
        .map_err(|error| JsValue::from_str(&format!("bad {PREDICT_BATCH_URL} response: {error}")))
}

pub async fn fetch_qr_blob(window: &Window, text: String) -> Result<Blob, JsValue> {
    let body = serde_json::to_string(&QrRequest { text })
        .map_err(|error| JsValue::from_str(&error.to_string()))?;
    let request = json_request(GENERATE_QR_URL, &body)?;
    let response = fetch_response(window, &request).await?;
    if !response.ok() {
        return Err(JsValue::from_str(&format!(
            "{GENERATE_QR_URL} failed with status {}",
            response.status()
        )));
    }
    JsFuture::from(response.blob()?)
        .await?
        .dyn_into::<Blob>()
        .map_err(|_| JsValue::from_str("QR response is not a blob"))
}
