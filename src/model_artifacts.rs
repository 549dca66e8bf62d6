//! Startup loading of the serialized prediction artifacts.
//!
//! Three files with fixed names live under the configured model directory:
//! the min-max scaler, the standardization scaler, and the classifier
//! weights. They are loaded once per process and shared read-only by every
//! request. A missing or malformed artifact makes prediction unavailable but
//! does not stop the rest of the service.

use crate::crop_classifier::{CropClassifier, CropModel};
use crate::errors::{AdvisorError, AdvisorResult};
use crate::feature_pipeline::{
    FeaturePipeline, FeatureVector, MinMaxScaler, StandardScaler, FEATURE_COUNT,
};
use serde::de::DeserializeOwned;
use std::path::Path;

pub const MINMAX_FILE: &str = "minmaxscaler.json";
pub const STANDARD_FILE: &str = "standscaler.json";
pub const MODEL_FILE: &str = "model.json";

/// The loaded pipeline and classifier, ready to serve predictions.
#[derive(Debug, Clone)]
pub struct PredictArtifacts {
    pipeline: FeaturePipeline,
    classifier: CropClassifier,
}

impl PredictArtifacts {
    pub fn new(pipeline: FeaturePipeline, classifier: CropClassifier) -> Self {
        Self {
            pipeline,
            classifier,
        }
    }

    /// Normalize a raw vector and classify it. `None` is the no-result
    /// outcome: an unmapped or failed prediction, not a fault.
    pub fn predict_crop(&self, features: &FeatureVector) -> Option<&'static str> {
        let transformed = self.pipeline.normalize(features);
        self.classifier.classify(&transformed)
    }

    /// Normalized vector without classification, for diagnostics.
    pub fn normalize(&self, features: &FeatureVector) -> [f64; FEATURE_COUNT] {
        self.pipeline.normalize(features)
    }
}

/// Load and validate all three artifacts from `model_dir`.
pub fn load_artifacts(model_dir: &Path) -> AdvisorResult<PredictArtifacts> {
    let minmax: MinMaxScaler = read_artifact(model_dir, MINMAX_FILE)?;
    let standard: StandardScaler = read_artifact(model_dir, STANDARD_FILE)?;
    let model: CropModel = read_artifact(model_dir, MODEL_FILE)?;
    model.validate()?;

    tracing::info!(
        "Loaded prediction artifacts from {:?} ({} classes)",
        model_dir,
        model.classes.len()
    );

    Ok(PredictArtifacts::new(
        FeaturePipeline::new(minmax, standard),
        CropClassifier::new(model),
    ))
}

fn read_artifact<T: DeserializeOwned>(model_dir: &Path, file_name: &str) -> AdvisorResult<T> {
    let path = model_dir.join(file_name);
    let content = std::fs::read_to_string(&path)
        .map_err(|e| AdvisorError::artifact(file_name, format!("cannot read {path:?}: {e}")))?;

    serde_json::from_str(&content)
        .map_err(|e| AdvisorError::artifact(file_name, format!("cannot parse {path:?}: {e}")))
}
