//! Feature normalization pipeline.
//!
//! Raw soil/climate measurements pass through two fitted rescaling transforms
//! before classification: a min-max rescaling first, then a standardization.
//! Both are loaded once at startup from serialized artifacts and are
//! stateless at call time; the pipeline never refits them. The order is
//! significant: swapping the two transforms changes the predicted label.

use crate::errors::{AdvisorError, AdvisorResult};
use serde::{Deserialize, Serialize};

/// Number of measurements in a feature vector.
pub const FEATURE_COUNT: usize = 7;

/// Semantic order of the measurements, used for prompt labeling.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "Nitrogen",
    "Phosphorus",
    "Potassium",
    "Temperature",
    "Humidity",
    "pH",
    "Rainfall",
];

/// Exactly seven ordered measurements: nitrogen, phosphorus, potassium,
/// temperature (°C), humidity (%), pH, rainfall (mm).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector(pub [f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Build a vector from user input, enforcing the length and finiteness
    /// invariants before anything downstream runs.
    pub fn from_slice(values: &[f64]) -> AdvisorResult<Self> {
        if values.len() != FEATURE_COUNT {
            return Err(AdvisorError::validation(
                "features",
                format!("expected {FEATURE_COUNT} values, got {}", values.len()),
            ));
        }

        if let Some(idx) = values.iter().position(|v| !v.is_finite()) {
            return Err(AdvisorError::validation(
                "features",
                format!("{} must be a finite number", FEATURE_NAMES[idx]),
            ));
        }

        let mut array = [0.0; FEATURE_COUNT];
        array.copy_from_slice(values);
        Ok(Self(array))
    }

    pub fn as_array(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }
}

/// A fitted, stateless-at-call-time rescaling over a feature vector.
pub trait FeatureTransform {
    fn transform(&self, input: &[f64; FEATURE_COUNT]) -> [f64; FEATURE_COUNT];
}

/// Min-max rescaling fit on training data: `(x - data_min) / (data_max - data_min)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinMaxScaler {
    pub data_min: [f64; FEATURE_COUNT],
    pub data_max: [f64; FEATURE_COUNT],
}

impl FeatureTransform for MinMaxScaler {
    fn transform(&self, input: &[f64; FEATURE_COUNT]) -> [f64; FEATURE_COUNT] {
        let mut out = [0.0; FEATURE_COUNT];
        for i in 0..FEATURE_COUNT {
            let range = self.data_max[i] - self.data_min[i];
            // A constant training column rescales to zero rather than NaN.
            let divisor = if range.abs() < f64::EPSILON { 1.0 } else { range };
            out[i] = (input[i] - self.data_min[i]) / divisor;
        }
        out
    }
}

/// Standardization fit on training data: `(x - mean) / scale`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: [f64; FEATURE_COUNT],
    pub scale: [f64; FEATURE_COUNT],
}

impl FeatureTransform for StandardScaler {
    fn transform(&self, input: &[f64; FEATURE_COUNT]) -> [f64; FEATURE_COUNT] {
        let mut out = [0.0; FEATURE_COUNT];
        for i in 0..FEATURE_COUNT {
            let divisor = if self.scale[i].abs() < f64::EPSILON {
                1.0
            } else {
                self.scale[i]
            };
            out[i] = (input[i] - self.mean[i]) / divisor;
        }
        out
    }
}

/// The two-stage pipeline: min-max strictly before standardization.
#[derive(Debug, Clone)]
pub struct FeaturePipeline {
    minmax: MinMaxScaler,
    standard: StandardScaler,
}

impl FeaturePipeline {
    pub fn new(minmax: MinMaxScaler, standard: StandardScaler) -> Self {
        Self { minmax, standard }
    }

    pub fn normalize(&self, features: &FeatureVector) -> [f64; FEATURE_COUNT] {
        let rescaled = self.minmax.transform(features.as_array());
        self.standard.transform(&rescaled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_minmax() -> MinMaxScaler {
        MinMaxScaler {
            data_min: [0.0, 5.0, 5.0, 8.8, 14.3, 3.5, 20.2],
            data_max: [140.0, 145.0, 205.0, 43.7, 99.9, 9.9, 298.6],
        }
    }

    fn sample_standard() -> StandardScaler {
        StandardScaler {
            mean: [0.36, 0.38, 0.21, 0.49, 0.64, 0.47, 0.28],
            scale: [0.26, 0.23, 0.25, 0.15, 0.26, 0.12, 0.19],
        }
    }

    fn sample_features() -> FeatureVector {
        FeatureVector::from_slice(&[90.0, 42.0, 43.0, 20.8, 82.0, 6.5, 202.9]).unwrap()
    }

    #[test]
    fn from_slice_enforces_length() {
        assert!(FeatureVector::from_slice(&[1.0, 2.0]).is_err());
        assert!(FeatureVector::from_slice(&[0.0; 8]).is_err());
        assert!(FeatureVector::from_slice(&[0.0; 7]).is_ok());
    }

    #[test]
    fn from_slice_rejects_non_finite_values() {
        let err = FeatureVector::from_slice(&[90.0, 42.0, f64::NAN, 20.8, 82.0, 6.5, 202.9])
            .unwrap_err();
        assert!(err.to_string().contains("Potassium"));
        assert!(FeatureVector::from_slice(&[f64::INFINITY; 7]).is_err());
    }

    #[test]
    fn normalize_is_deterministic() {
        let pipeline = FeaturePipeline::new(sample_minmax(), sample_standard());
        let features = sample_features();
        assert_eq!(pipeline.normalize(&features), pipeline.normalize(&features));
    }

    #[test]
    fn minmax_maps_training_extremes_to_unit_interval() {
        let scaler = sample_minmax();
        let low = scaler.transform(&scaler.data_min.clone());
        let high = scaler.transform(&scaler.data_max.clone());
        for i in 0..FEATURE_COUNT {
            assert!(low[i].abs() < 1e-12);
            assert!((high[i] - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn transform_order_changes_the_result() {
        let minmax = sample_minmax();
        let standard = sample_standard();
        let features = sample_features();

        let forward = FeaturePipeline::new(minmax.clone(), standard.clone()).normalize(&features);
        let reversed = minmax.transform(&standard.transform(features.as_array()));

        assert_ne!(forward, reversed);
    }

    #[test]
    fn constant_training_column_does_not_produce_nan() {
        let scaler = MinMaxScaler {
            data_min: [1.0; FEATURE_COUNT],
            data_max: [1.0; FEATURE_COUNT],
        };
        let out = scaler.transform(&[1.0; FEATURE_COUNT]);
        assert!(out.iter().all(|v| v.is_finite()));
    }
}
