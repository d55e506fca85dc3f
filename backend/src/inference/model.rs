use shared::{ConditionLabel, Distribution};
use std::path::Path;
use std::sync::Arc;

use super::config::ClassifierConfig;
use super::preprocess::ImageTensor;

#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),
    #[error("Inference failed: {0}")]
    #[cfg_attr(not(feature = "torch"), allow(dead_code))]
    Inference(String),
}

/// Narrow seam around the trained model: normalized tensor in, distribution out.
pub trait Classifier: Send + Sync {
    fn classify(&self, input: &ImageTensor) -> Result<Distribution, ClassifierError>;

    fn is_loaded(&self) -> bool {
        true
    }
}

/// Turns the raw output vector into a label-keyed percentage distribution.
#[cfg_attr(not(feature = "torch"), allow(dead_code))]
#[derive(Debug, Clone)]
pub struct OutputMapping {
    order: Vec<ConditionLabel>,
    apply_softmax: bool,
}

#[cfg_attr(not(feature = "torch"), allow(dead_code))]
impl OutputMapping {
    pub fn from_config(config: &ClassifierConfig) -> Result<Self, ClassifierError> {
        let order = config
            .output_order()
            .map_err(|e| ClassifierError::ModelUnavailable(e.to_string()))?;
        Ok(Self {
            order,
            apply_softmax: config.output.apply_softmax,
        })
    }

    pub fn to_distribution(&self, raw: &[f32]) -> Result<Distribution, ClassifierError> {
        if raw.len() != self.order.len() {
            return Err(ClassifierError::Inference(format!(
                "expected {} model outputs, got {}",
                self.order.len(),
                raw.len()
            )));
        }
        if raw.iter().any(|v| !v.is_finite()) {
            return Err(ClassifierError::Inference("model produced non-finite output".into()));
        }

        let probabilities = if self.apply_softmax {
            softmax(raw)
        } else {
            raw.to_vec()
        };

        Ok(Distribution::from_fn(|label| {
            let index = self.order.iter().position(|l| *l == label).unwrap_or_default();
            (probabilities[index] as f64 * 100.0).clamp(0.0, 100.0)
        }))
    }
}

#[cfg_attr(not(feature = "torch"), allow(dead_code))]
fn softmax(values: &[f32]) -> Vec<f32> {
    let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = values.iter().map(|v| (v - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

#[cfg(feature = "torch")]
mod torch {
    use std::path::Path;
    use std::sync::Mutex;
    use tch::{CModule, Device, Kind, Tensor};

    use super::{Classifier, ClassifierError, OutputMapping};
    use crate::inference::config::{ClassifierConfig, TensorLayout};
    use crate::inference::preprocess::ImageTensor;
    use shared::Distribution;

    /// TorchScript module on the best available device. Calls are serialized.
    pub struct TorchClassifier {
        model: Mutex<CModule>,
        device: Device,
        layout: TensorLayout,
        mapping: OutputMapping,
    }

    impl TorchClassifier {
        pub fn load(model_path: &Path, config: &ClassifierConfig) -> Result<Self, ClassifierError> {
            if !model_path.is_file() {
                return Err(ClassifierError::ModelUnavailable(format!(
                    "model artifact not found at {}",
                    model_path.display()
                )));
            }

            let mapping = OutputMapping::from_config(config)?;
            let device = Device::cuda_if_available();
            let model = CModule::load_on_device(model_path, device)
                .map_err(|e| ClassifierError::ModelUnavailable(e.to_string()))?;
            log::info!("Loaded TorchScript model on {:?}", device);

            Ok(Self {
                model: Mutex::new(model),
                device,
                layout: config.image.layout,
                mapping,
            })
        }
    }

    impl Classifier for TorchClassifier {
        fn classify(&self, input: &ImageTensor) -> Result<Distribution, ClassifierError> {
            let data = input.to_layout(self.layout);
            let tensor = Tensor::from_slice(&data)
                .f_view(input.dims(self.layout))
                .map_err(|e| ClassifierError::Inference(e.to_string()))?
                .to_device(self.device);

            let output = {
                let model = self
                    .model
                    .lock()
                    .map_err(|_| ClassifierError::Inference("model lock poisoned".into()))?;
                tch::no_grad(|| model.forward_ts(&[tensor]))
                    .map_err(|e| ClassifierError::Inference(e.to_string()))?
            };

            let output_flat = output
                .to_kind(Kind::Float)
                .to_device(Device::Cpu)
                .f_view([-1i64])
                .map_err(|e| ClassifierError::Inference(e.to_string()))?;
            let num_elements = output_flat.size()[0] as usize;
            let mut output_vec = vec![0.0f32; num_elements];
            output_flat.copy_data(&mut output_vec, num_elements);

            self.mapping.to_distribution(&output_vec)
        }
    }
}

#[cfg(feature = "torch")]
pub use torch::TorchClassifier;

/// Loads the configured model once at startup. Any failure is fatal.
pub fn load_classifier(
    model_path: &Path,
    config: &ClassifierConfig,
) -> Result<Arc<dyn Classifier>, ClassifierError> {
    #[cfg(feature = "torch")]
    {
        let classifier = TorchClassifier::load(model_path, config)?;
        Ok(Arc::new(classifier))
    }

    #[cfg(not(feature = "torch"))]
    {
        OutputMapping::from_config(config)?;
        Err(ClassifierError::ModelUnavailable(format!(
            "cannot load {}: this build has no inference backend (rebuild with `--features torch`)",
            model_path.display()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::config::ClassifierConfig;

    fn mapping(apply_softmax: bool) -> OutputMapping {
        let mut config = ClassifierConfig::default();
        config.output.apply_softmax = apply_softmax;
        OutputMapping::from_config(&config).unwrap()
    }

    #[test]
    fn maps_model_indices_to_labels() {
        // Trained order: dry, acne, pigmentation, wrinkle, dark circles, normal.
        let dist = mapping(false)
            .to_distribution(&[0.05, 0.7, 0.1, 0.05, 0.04, 0.06])
            .unwrap();
        assert!((dist.get(ConditionLabel::Acne).unwrap() - 70.0).abs() < 1e-4);
        assert!((dist.get(ConditionLabel::Dry).unwrap() - 5.0).abs() < 1e-4);
        assert!((dist.get(ConditionLabel::Normal).unwrap() - 6.0).abs() < 1e-4);
        assert_eq!(dist.top().map(|(l, _)| l), Some(ConditionLabel::Acne));
    }

    #[test]
    fn softmax_turns_logits_into_percentages() {
        let dist = mapping(true)
            .to_distribution(&[1.0, 3.0, 0.5, -2.0, 0.0, 1.0])
            .unwrap();
        let total: f64 = dist.iter().map(|(_, v)| v).sum();
        assert!((total - 100.0).abs() < 1e-3);
        assert!(dist.iter().all(|(_, v)| (0.0..=100.0).contains(&v)));
        assert_eq!(dist.top().map(|(l, _)| l), Some(ConditionLabel::Acne));
    }

    #[test]
    fn wrong_output_length_is_an_inference_error() {
        let err = mapping(false).to_distribution(&[0.5, 0.5]).unwrap_err();
        assert!(matches!(err, ClassifierError::Inference(_)));
    }

    #[test]
    fn non_finite_output_is_an_inference_error() {
        let err = mapping(false)
            .to_distribution(&[f32::NAN, 0.2, 0.2, 0.2, 0.2, 0.2])
            .unwrap_err();
        assert!(matches!(err, ClassifierError::Inference(_)));
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let dist = mapping(false)
            .to_distribution(&[1.2, -0.1, 0.0, 0.0, 0.0, 0.0])
            .unwrap();
        assert_eq!(dist.get(ConditionLabel::Dry), Some(100.0));
        assert_eq!(dist.get(ConditionLabel::Acne), Some(0.0));
    }

    #[cfg(not(feature = "torch"))]
    #[test]
    fn build_without_backend_refuses_to_start() {
        let err = load_classifier(Path::new("model/skin_classifier.pt"), &ClassifierConfig::default())
            .err()
            .unwrap();
        assert!(matches!(err, ClassifierError::ModelUnavailable(_)));
    }
}
