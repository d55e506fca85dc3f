pub mod camera;
pub mod data_url;
pub mod flow;
pub mod labels;
pub mod report;
pub mod upload;

pub use labels::{ConditionLabel, Distribution};

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RecommendationBody {
    pub description: String,
    pub tips: Vec<String>,
    pub ingredients_to_look_for: Vec<String>,
    pub ingredients_to_avoid: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AnalysisResponse {
    #[serde(default)]
    pub success: bool,
    pub top_condition: ConditionLabel,
    pub confidence: f64,
    pub all_conditions: Distribution,
    pub recommendations: RecommendationBody,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ErrorBody {
    pub error: String,
}

/// JSON alternative to a multipart upload: a data URL or bare base64 payload.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Base64ImageRequest {
    pub image: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ConditionInfo {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl From<ConditionLabel> for ConditionInfo {
    fn from(label: ConditionLabel) -> Self {
        Self {
            id: label.id().to_string(),
            name: label.display_name().to_string(),
            description: label.summary().to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ConditionsResponse {
    pub conditions: Vec<ConditionInfo>,
}
