use shared::upload::validate_upload;
use shared::AnalysisResponse;
use std::sync::Arc;

use crate::error::AnalysisError;
use crate::inference::{preprocess, skin, Classifier, ClassifierConfig};
use crate::recommendations;

/// Raw upload scoped to a single request.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Runs the whole pipeline for one image. Holds only read-only shared state.
#[derive(Clone)]
pub struct Analyzer {
    classifier: Arc<dyn Classifier>,
    config: Arc<ClassifierConfig>,
}

impl Analyzer {
    pub fn new(classifier: Arc<dyn Classifier>, config: ClassifierConfig) -> Self {
        Self {
            classifier,
            config: Arc::new(config),
        }
    }

    pub fn model_loaded(&self) -> bool {
        self.classifier.is_loaded()
    }

    /// validate -> decode -> skin check -> normalize -> classify -> recommend.
    /// Blocking; call it off the request worker.
    pub fn analyze(&self, upload: &UploadedImage) -> Result<AnalysisResponse, AnalysisError> {
        validate_upload(&upload.mime_type, upload.bytes.len())?;

        let rgb = preprocess::decode(&upload.bytes)?;

        let skin_check = self.config.skin_check;
        if skin_check.enabled && !skin::contains_skin(&rgb, skin_check.min_ratio) {
            return Err(AnalysisError::InvalidInput("No skin detected in the image".into()));
        }

        let tensor = preprocess::normalize(&rgb, &self.config.image)?;
        let distribution = self.classifier.classify(&tensor)?;

        let (top_condition, confidence) = distribution.top().ok_or_else(|| {
            AnalysisError::processing("An error occurred during analysis", "empty distribution")
        })?;
        let recommendation = recommendations::lookup(top_condition)?;

        Ok(AnalysisResponse {
            success: true,
            top_condition,
            confidence: round_one_decimal(confidence),
            all_conditions: distribution,
            recommendations: recommendation.to_body(),
        })
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::testing::{StubClassifier, encode_png, skin_png};
    use image::{Rgb, RgbImage};
    use shared::ConditionLabel;

    fn analyzer_with(stub: Arc<StubClassifier>) -> Analyzer {
        Analyzer::new(stub, ClassifierConfig::default())
    }

    fn png_upload(bytes: Vec<u8>) -> UploadedImage {
        UploadedImage {
            mime_type: "image/png".into(),
            bytes,
        }
    }

    #[test]
    fn picks_top_label_and_rounds_confidence_only() {
        let stub = Arc::new(StubClassifier::returning(&[
            (ConditionLabel::Acne, 72.3456),
            (ConditionLabel::Dry, 20.1234),
            (ConditionLabel::Normal, 7.531),
        ]));
        let result = analyzer_with(stub.clone()).analyze(&png_upload(skin_png())).unwrap();

        assert!(result.success);
        assert_eq!(result.top_condition, ConditionLabel::Acne);
        assert_eq!(result.confidence, 72.3);
        assert_eq!(result.all_conditions.get(ConditionLabel::Acne), Some(72.3456));
        assert_eq!(result.all_conditions.len(), 6);
        assert_eq!(
            result.recommendations,
            recommendations::lookup(ConditionLabel::Acne).unwrap().to_body()
        );
        assert_eq!(stub.calls(), 1);
    }

    #[test]
    fn ties_resolve_to_canonical_order() {
        let stub = Arc::new(StubClassifier::returning(&[
            (ConditionLabel::Normal, 45.0),
            (ConditionLabel::Pigmentation, 45.0),
            (ConditionLabel::Acne, 10.0),
        ]));
        let result = analyzer_with(stub).analyze(&png_upload(skin_png())).unwrap();
        assert_eq!(result.top_condition, ConditionLabel::Pigmentation);
    }

    #[test]
    fn non_image_never_reaches_classifier() {
        let stub = Arc::new(StubClassifier::returning(&[(ConditionLabel::Acne, 99.0)]));
        let upload = UploadedImage {
            mime_type: "text/plain".into(),
            bytes: b"hello".to_vec(),
        };
        let err = analyzer_with(stub.clone()).analyze(&upload).unwrap_err();

        assert!(matches!(err, AnalysisError::InvalidInput(_)));
        assert_eq!(stub.calls(), 0);
    }

    #[test]
    fn image_without_skin_is_rejected() {
        let stub = Arc::new(StubClassifier::returning(&[(ConditionLabel::Acne, 99.0)]));
        let blue = encode_png(&RgbImage::from_pixel(40, 40, Rgb([10, 30, 200])));
        let err = analyzer_with(stub.clone()).analyze(&png_upload(blue)).unwrap_err();

        assert_eq!(err.client_message(), "No skin detected in the image");
        assert_eq!(stub.calls(), 0);
    }

    #[test]
    fn skin_check_can_be_disabled() {
        let stub = Arc::new(StubClassifier::returning(&[(ConditionLabel::Normal, 80.0)]));
        let mut config = ClassifierConfig::default();
        config.skin_check.enabled = false;
        let analyzer = Analyzer::new(stub, config);

        let blue = encode_png(&RgbImage::from_pixel(40, 40, Rgb([10, 30, 200])));
        assert!(analyzer.analyze(&png_upload(blue)).is_ok());
    }

    #[test]
    fn undecodable_image_is_a_processing_error() {
        let stub = Arc::new(StubClassifier::returning(&[]));
        let err = analyzer_with(stub)
            .analyze(&png_upload(b"\x89PNG garbage".to_vec()))
            .unwrap_err();
        assert_eq!(err.client_message(), "Invalid image format");
    }

    #[test]
    fn classifier_failure_is_a_processing_error() {
        let err = analyzer_with(Arc::new(StubClassifier::failing()))
            .analyze(&png_upload(skin_png()))
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Processing { .. }));
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert_eq!(round_one_decimal(12.25), 12.3);
        assert_eq!(round_one_decimal(99.94), 99.9);
        assert_eq!(round_one_decimal(0.0), 0.0);
    }
}
