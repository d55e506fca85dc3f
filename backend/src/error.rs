use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use shared::upload::UploadError;
use shared::{ConditionLabel, ErrorBody};

use crate::inference::ClassifierError;
use crate::inference::preprocess::NormalizeError;

pub const GENERIC_PROCESSING_ERROR: &str = "An error occurred during analysis";

/// Per-request failures. Each one becomes a `{ "error": ... }` body.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("{0}")]
    MissingInput(String),
    #[error("{0}")]
    InvalidInput(String),
    #[error("{message}: {detail}")]
    Processing { message: String, detail: String },
    #[error("No recommendation entry for condition '{0}'")]
    UnknownCondition(ConditionLabel),
}

impl AnalysisError {
    pub fn processing(message: &str, detail: impl ToString) -> Self {
        AnalysisError::Processing {
            message: message.to_string(),
            detail: detail.to_string(),
        }
    }

    /// Message shown to the client; internal details stay in the logs.
    pub fn client_message(&self) -> String {
        match self {
            AnalysisError::MissingInput(msg) | AnalysisError::InvalidInput(msg) => msg.clone(),
            AnalysisError::Processing { message, .. } => message.clone(),
            AnalysisError::UnknownCondition(_) => GENERIC_PROCESSING_ERROR.to_string(),
        }
    }
}

impl From<UploadError> for AnalysisError {
    fn from(err: UploadError) -> Self {
        AnalysisError::InvalidInput(err.to_string())
    }
}

impl From<NormalizeError> for AnalysisError {
    fn from(err: NormalizeError) -> Self {
        match err {
            NormalizeError::InvalidImage(e) => AnalysisError::processing("Invalid image format", e),
            NormalizeError::Shape(e) => AnalysisError::processing(GENERIC_PROCESSING_ERROR, e),
        }
    }
}

impl From<ClassifierError> for AnalysisError {
    fn from(err: ClassifierError) -> Self {
        AnalysisError::processing(GENERIC_PROCESSING_ERROR, err)
    }
}

impl From<actix_multipart::MultipartError> for AnalysisError {
    fn from(err: actix_multipart::MultipartError) -> Self {
        AnalysisError::InvalidInput(format!("Malformed upload: {}", err))
    }
}

impl From<actix_web::error::BlockingError> for AnalysisError {
    fn from(err: actix_web::error::BlockingError) -> Self {
        AnalysisError::processing(GENERIC_PROCESSING_ERROR, err)
    }
}

impl ResponseError for AnalysisError {
    fn status_code(&self) -> StatusCode {
        match self {
            AnalysisError::MissingInput(_) | AnalysisError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AnalysisError::Processing { .. } | AnalysisError::UnknownCondition(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.client_message(),
        })
    }
}
