use serde::{Deserialize, Serialize};

/// Body of `POST /predict`: the sketch as a base64 PNG data URI.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PredictRequest {
    pub image: String,
}

/// Body of `POST /generate_qr`; the response is a PNG blob, not JSON.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct QrRequest {
    pub text: String,
}

/// One model's verdict: a class label and a confidence fraction in [0, 1].
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct ModelResult {
    pub pred: u32,
    pub confidence: f32,
}

impl ModelResult {
    /// Confidence rounded to a whole percent for display.
    pub fn percent(&self) -> u32 {
        (self.confidence.clamp(0.0, 1.0) * 100.0).round() as u32
    }
}

/// Response of `POST /predict`.
///
/// The canonical success shape is the ensemble object; single-model servers
/// answer with a bare `{pred, confidence}`, which decodes as `Single` and is
/// treated as a combined-only result. Failures carry an `error` string.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(untagged)]
pub enum PredictResponse {
    Failure {
        error: String,
    },
    Ensemble {
        mlp: ModelResult,
        cnn: ModelResult,
        combined: ModelResult,
    },
    Single(ModelResult),
}

/// One entry of the `POST /predict_batch` response array, in file order.
/// A failed file yields a per-entry error instead of failing the batch.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(untagged)]
pub enum BatchRecord {
    Ok {
        filename: String,
        pred: u32,
        confidence: f32,
    },
    Failed {
        filename: Option<String>,
        error: String,
    },
}

impl BatchRecord {
    pub fn filename(&self) -> Option<&str> {
        match self {
            BatchRecord::Ok { filename, .. } => Some(filename),
            BatchRecord::Failed { filename, .. } => filename.as_deref(),
        }
    }

    pub fn result(&self) -> Option<ModelResult> {
        match self {
            BatchRecord::Ok {
                pred, confidence, ..
            } => Some(ModelResult {
                pred: *pred,
                confidence: *confidence,
            }),
            BatchRecord::Failed { .. } => None,
        }
    }
}
