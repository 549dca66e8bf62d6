//! Crop classification over normalized feature vectors.
//!
//! The trained model is consumed as an opaque function: a serialized set of
//! per-class weights loaded at startup, exposing a single `predict` over one
//! normalized vector. Its integer output is mapped to a crop name through a
//! fixed table; ids the table does not know yield an explicit no-result
//! rather than an error.

use crate::errors::{AdvisorError, AdvisorResult};
use crate::feature_pipeline::FEATURE_COUNT;
use serde::{Deserialize, Serialize};

/// The closed id -> name mapping for the 22 supported crops.
pub const CROP_TABLE: [(i64, &str); 22] = [
    (1, "Rice"),
    (2, "Maize"),
    (3, "Jute"),
    (4, "Cotton"),
    (5, "Coconut"),
    (6, "Papaya"),
    (7, "Orange"),
    (8, "Apple"),
    (9, "Muskmelon"),
    (10, "Watermelon"),
    (11, "Grapes"),
    (12, "Mango"),
    (13, "Banana"),
    (14, "Pomegranate"),
    (15, "Lentil"),
    (16, "Blackgram"),
    (17, "Mungbean"),
    (18, "Mothbeans"),
    (19, "Pigeonpeas"),
    (20, "Kidneybeans"),
    (21, "Chickpea"),
    (22, "Coffee"),
];

/// Look up a predicted id in the static table.
pub fn crop_name(id: i64) -> Option<&'static str> {
    CROP_TABLE
        .iter()
        .find(|(crop_id, _)| *crop_id == id)
        .map(|(_, name)| *name)
}

/// Serialized per-class linear scoring weights for the trained classifier.
///
/// Loaded once from `model.json`; the surrounding code only ever calls
/// [`CropModel::predict`] on a single normalized vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropModel {
    pub classes: Vec<i64>,
    pub coef: Vec<[f64; FEATURE_COUNT]>,
    pub intercept: Vec<f64>,
}

impl CropModel {
    /// Shape consistency check run at load time.
    pub fn validate(&self) -> AdvisorResult<()> {
        if self.classes.is_empty() {
            return Err(AdvisorError::artifact("model", "no classes defined"));
        }
        if self.coef.len() != self.classes.len() || self.intercept.len() != self.classes.len() {
            return Err(AdvisorError::artifact(
                "model",
                format!(
                    "inconsistent shapes: {} classes, {} weight rows, {} intercepts",
                    self.classes.len(),
                    self.coef.len(),
                    self.intercept.len()
                ),
            ));
        }
        Ok(())
    }

    /// Predict the class id for one normalized vector: argmax over the
    /// per-class linear scores.
    pub fn predict(&self, input: &[f64; FEATURE_COUNT]) -> AdvisorResult<i64> {
        self.validate()?;

        let mut best: Option<(i64, f64)> = None;
        for (idx, class) in self.classes.iter().enumerate() {
            let score: f64 = self.intercept[idx]
                + self.coef[idx]
                    .iter()
                    .zip(input.iter())
                    .map(|(w, x)| w * x)
                    .sum::<f64>();

            if !score.is_finite() {
                return Err(AdvisorError::artifact(
                    "model",
                    format!("non-finite score for class {class}"),
                ));
            }

            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((*class, score)),
            }
        }

        best.map(|(class, _)| class)
            .ok_or_else(|| AdvisorError::artifact("model", "no classes defined"))
    }
}

/// Adapter from a normalized vector to a crop name.
#[derive(Debug, Clone)]
pub struct CropClassifier {
    model: CropModel,
}

impl CropClassifier {
    pub fn new(model: CropModel) -> Self {
        Self { model }
    }

    /// Invoke the model and map its id through the table.
    ///
    /// Any inference failure is reported and surfaces as a no-result; so does
    /// an id outside the table, which models a corrupted or out-of-range
    /// model output.
    pub fn classify(&self, transformed: &[f64; FEATURE_COUNT]) -> Option<&'static str> {
        let label = match self.model.predict(transformed) {
            Ok(label) => label,
            Err(e) => {
                tracing::error!("Crop inference failed: {e}");
                return None;
            }
        };

        let name = crop_name(label);
        if name.is_none() {
            tracing::warn!("Model produced unmapped crop id {label}");
        }
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_class_model() -> CropModel {
        // Class 1 scores the first feature, class 22 the second.
        CropModel {
            classes: vec![1, 22],
            coef: vec![
                [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            ],
            intercept: vec![0.0, 0.0],
        }
    }

    #[test]
    fn table_maps_every_known_id() {
        for (id, name) in CROP_TABLE {
            assert_eq!(crop_name(id), Some(name));
        }
        assert_eq!(crop_name(1), Some("Rice"));
        assert_eq!(crop_name(22), Some("Coffee"));
    }

    #[test]
    fn table_rejects_unknown_ids() {
        assert_eq!(crop_name(0), None);
        assert_eq!(crop_name(23), None);
        assert_eq!(crop_name(-1), None);
    }

    #[test]
    fn predict_picks_highest_scoring_class() {
        let model = two_class_model();
        assert_eq!(model.predict(&[2.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0]).unwrap(), 1);
        assert_eq!(model.predict(&[1.0, 2.0, 0.0, 0.0, 0.0, 0.0, 0.0]).unwrap(), 22);
    }

    #[test]
    fn classify_returns_name_on_hit() {
        let classifier = CropClassifier::new(two_class_model());
        assert_eq!(
            classifier.classify(&[2.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
            Some("Rice")
        );
    }

    #[test]
    fn classify_degrades_to_no_result_on_unmapped_id() {
        let model = CropModel {
            classes: vec![99],
            coef: vec![[0.0; FEATURE_COUNT]],
            intercept: vec![0.0],
        };
        let classifier = CropClassifier::new(model);
        assert_eq!(classifier.classify(&[0.0; FEATURE_COUNT]), None);
    }

    #[test]
    fn classify_degrades_to_no_result_on_malformed_model() {
        let model = CropModel {
            classes: vec![1, 2],
            coef: vec![[0.0; FEATURE_COUNT]],
            intercept: vec![0.0, 0.0],
        };
        assert!(model.validate().is_err());

        let classifier = CropClassifier::new(model);
        assert_eq!(classifier.classify(&[0.0; FEATURE_COUNT]), None);
    }
}
