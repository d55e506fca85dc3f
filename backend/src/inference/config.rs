use serde::{Deserialize, Serialize};
use shared::ConditionLabel;
use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;
use strum::EnumCount;

use crate::config::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub version: f32,
    pub image: ImageConfig,
    pub output: OutputConfig,
    pub skin_check: SkinCheckConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    pub size: [u32; 2],
    pub normalization: NormalizationConfig,
    pub layout: TensorLayout,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NormalizationConfig {
    pub scale: f32,
    pub offset: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TensorLayout {
    Nhwc,
    Nchw,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub labels: Vec<String>,
    pub apply_softmax: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct SkinCheckConfig {
    pub enabled: bool,
    pub min_ratio: f32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            version: 1.0,
            image: ImageConfig::default(),
            output: OutputConfig::default(),
            skin_check: SkinCheckConfig::default(),
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            size: [224, 224],
            normalization: NormalizationConfig {
                scale: 127.5,
                offset: -1.0,
            },
            layout: TensorLayout::Nhwc,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            labels: ["dry", "acne", "pigmentation", "wrinkle", "dark circles", "normal"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            apply_softmax: false,
        }
    }
}

impl Default for SkinCheckConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_ratio: 0.01,
        }
    }
}

impl ClassifierConfig {
    /// Loads the YAML file at `path`, falling back to defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::warn!(
                "Classifier config {} not found, using built-in defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let config_str = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&config_str).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.display().to_string(),
                source,
            },
            other => other,
        })
    }

    pub fn from_yaml(config_str: &str) -> Result<Self, ConfigError> {
        let config: ClassifierConfig =
            serde_yaml::from_str(config_str).map_err(|source| ConfigError::Parse {
                path: "<inline>".to_string(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let [width, height] = self.image.size;
        if width == 0 || height == 0 {
            return Err(ConfigError::Invalid("image.size must be non-zero".into()));
        }
        if self.image.normalization.scale == 0.0 {
            return Err(ConfigError::Invalid("image.normalization.scale must be non-zero".into()));
        }
        if !(0.0..=1.0).contains(&self.skin_check.min_ratio) {
            return Err(ConfigError::Invalid("skin_check.min_ratio must be within [0, 1]".into()));
        }
        self.output_order().map(|_| ())
    }

    /// Label for each model output index. Must name every condition exactly once.
    pub fn output_order(&self) -> Result<Vec<ConditionLabel>, ConfigError> {
        let labels = &self.output.labels;
        if labels.len() != ConditionLabel::COUNT {
            return Err(ConfigError::Invalid(format!(
                "output.labels must list {} labels, got {}",
                ConditionLabel::COUNT,
                labels.len()
            )));
        }

        let mut seen = HashSet::new();
        labels
            .iter()
            .map(|raw| {
                let label = ConditionLabel::from_str(raw.trim()).map_err(|_| {
                    ConfigError::Invalid(format!("unknown output label '{}'", raw))
                })?;
                if !seen.insert(label) {
                    return Err(ConfigError::Invalid(format!("duplicate output label '{}'", raw)));
                }
                Ok(label)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_config_parses() {
        let yaml = include_str!("../../../config/classifier.yaml");
        let config = ClassifierConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.image.size, [224, 224]);
        assert_eq!(config.image.layout, TensorLayout::Nhwc);
        assert_eq!(config.output_order().unwrap()[0], ConditionLabel::Dry);
        assert_eq!(config.output_order().unwrap()[1], ConditionLabel::Acne);
        assert!(config.skin_check.enabled);
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config = ClassifierConfig::from_yaml("skin_check:\n  enabled: false\n").unwrap();
        assert!(!config.skin_check.enabled);
        assert_eq!(config.skin_check.min_ratio, 0.01);
        assert_eq!(config.output.labels.len(), 6);
    }

    #[test]
    fn trailing_whitespace_in_labels_is_ignored() {
        let yaml = "output:\n  labels: ['dry ', 'acne', 'pigmentation', 'wrinkle', 'dark circles', 'normal']\n";
        assert!(ClassifierConfig::from_yaml(yaml).is_ok());
    }

    #[test]
    fn rejects_duplicate_labels() {
        let yaml = "output:\n  labels: [acne, acne, pigmentation, wrinkle, dark circles, normal]\n";
        let err = ClassifierConfig::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(msg) if msg.contains("duplicate")));
    }

    #[test]
    fn rejects_short_label_list() {
        let yaml = "output:\n  labels: [acne, dry]\n";
        assert!(matches!(ClassifierConfig::from_yaml(yaml), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = ClassifierConfig::load(Path::new("/nonexistent/classifier.yaml")).unwrap();
        assert_eq!(config.image.size, [224, 224]);
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        assert!(matches!(
            ClassifierConfig::from_yaml("image: [unterminated"),
            Err(ConfigError::Parse { .. })
        ));
    }
}
