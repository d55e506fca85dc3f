use std::env;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub model_path: PathBuf,
    pub classifier_config: PathBuf,
    pub frontend_dir: PathBuf,
}

impl AppConfig {
    /// Reads settings from the process environment (after `.env` is loaded).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid(format!("PORT must be a port number, got '{}'", raw)))?,
            None => 8081,
        };

        let frontend_dir = lookup("FRONTEND_DIR").map(PathBuf::from).unwrap_or_else(|| {
            match lookup("CARGO_MANIFEST_DIR") {
                Some(manifest_dir) => PathBuf::from(format!("{}/../frontend/dist", manifest_dir)),
                None => PathBuf::from("/usr/src/app/frontend/dist"),
            }
        });

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            model_path: lookup("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("model/skin_classifier.pt")),
            classifier_config: lookup("CLASSIFIER_CONFIG")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("config/classifier.yaml")),
            frontend_dir,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:8081");
        assert_eq!(config.model_path, PathBuf::from("model/skin_classifier.pt"));
        assert_eq!(config.frontend_dir, PathBuf::from("/usr/src/app/frontend/dist"));
    }

    #[test]
    fn environment_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("PORT", "5000"),
            ("HOST", "127.0.0.1"),
            ("MODEL_PATH", "/models/skin.pt"),
            ("CARGO_MANIFEST_DIR", "/src/backend"),
        ]))
        .unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:5000");
        assert_eq!(config.model_path, PathBuf::from("/models/skin.pt"));
        assert_eq!(config.frontend_dir, PathBuf::from("/src/backend/../frontend/dist"));
    }

    #[test]
    fn rejects_bad_port() {
        let err = AppConfig::from_lookup(lookup_from(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
