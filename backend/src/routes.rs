use actix_files::{Files, NamedFile};
use actix_multipart::Multipart;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::{web, HttpRequest, HttpResponse};
use futures::{StreamExt, TryStreamExt};
use log::{error, info, warn};
use shared::data_url::decode_data_url;
use shared::upload::{MAX_UPLOAD_BYTES, UploadError};
use shared::{AnalysisResponse, ConditionInfo, ConditionLabel, ConditionsResponse, HealthResponse};
use std::path::PathBuf;
use uuid::Uuid;

use crate::analysis::{Analyzer, UploadedImage};
use crate::error::AnalysisError;

/// Base64 inflates by 4/3; leave headroom for the JSON envelope and a data URL prefix.
pub const JSON_BODY_LIMIT: usize = 14 * 1024 * 1024;

pub fn configure_routes(cfg: &mut web::ServiceConfig, frontend_dir: PathBuf) {
    let index_path = frontend_dir.join("index.html");

    cfg.service(web::resource("/api/analyze").route(web::post().to(analyze)))
        .service(web::resource("/api/health").route(web::get().to(health)))
        .service(web::resource("/api/conditions").route(web::get().to(conditions)))
        .service(web::resource("/").route(web::get().to(move || {
            let index_path = index_path.clone();
            async move { NamedFile::open_async(index_path).await }
        })))
        .service(Files::new("/static", frontend_dir));
}

async fn health(analyzer: web::Data<Analyzer>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        model_loaded: analyzer.model_loaded(),
    })
}

async fn conditions() -> HttpResponse {
    HttpResponse::Ok().json(ConditionsResponse {
        conditions: ConditionLabel::all().map(ConditionInfo::from).collect(),
    })
}

async fn analyze(
    req: HttpRequest,
    payload: web::Payload,
    analyzer: web::Data<Analyzer>,
) -> Result<HttpResponse, AnalysisError> {
    let request_id = Uuid::new_v4();

    match run_analysis(request_id, &req, payload, analyzer.get_ref().clone()).await {
        Ok(response) => {
            info!(
                "[{}] top condition {} at {:.1}%",
                request_id, response.top_condition, response.confidence
            );
            Ok(HttpResponse::Ok().json(response))
        }
        Err(err) => {
            match &err {
                AnalysisError::MissingInput(_) | AnalysisError::InvalidInput(_) => {
                    warn!("[{}] validation error: {}", request_id, err)
                }
                AnalysisError::UnknownCondition(_) => {
                    error!("[{}] invariant violated: {}", request_id, err)
                }
                AnalysisError::Processing { .. } => {
                    error!("[{}] analysis error: {}", request_id, err)
                }
            }
            Err(err)
        }
    }
}

async fn run_analysis(
    request_id: Uuid,
    req: &HttpRequest,
    payload: web::Payload,
    analyzer: Analyzer,
) -> Result<AnalysisResponse, AnalysisError> {
    let upload = read_upload(req, payload).await?;
    info!(
        "[{}] analyzing {} bytes ({})",
        request_id,
        upload.bytes.len(),
        upload.mime_type
    );

    web::block(move || analyzer.analyze(&upload)).await?
}

/// Accepts either a multipart `image` field or a JSON body `{ "image": "<base64>" }`.
async fn read_upload(req: &HttpRequest, payload: web::Payload) -> Result<UploadedImage, AnalysisError> {
    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if content_type.starts_with("multipart/form-data") {
        read_multipart(Multipart::new(req.headers(), payload)).await
    } else if content_type.starts_with("application/json") {
        read_json(payload).await
    } else {
        Err(no_image())
    }
}

fn no_image() -> AnalysisError {
    AnalysisError::MissingInput("No image provided".to_string())
}

async fn read_multipart(mut payload: Multipart) -> Result<UploadedImage, AnalysisError> {
    while let Some(mut field) = payload.try_next().await? {
        if field.name() != Some("image") {
            // Drain fields we do not use so the stream can advance.
            while field.try_next().await?.is_some() {}
            continue;
        }

        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);
        let Some(file_name) = file_name else {
            // A plain form value named `image` is not a file upload.
            while field.try_next().await?.is_some() {}
            continue;
        };
        if file_name.is_empty() {
            return Err(AnalysisError::MissingInput("No file selected".to_string()));
        }

        let mime_type = field
            .content_type()
            .map(|m| m.essence_str().to_string())
            .unwrap_or_default();

        let mut image_data = Vec::new();
        while let Some(chunk) = field.next().await {
            let data = chunk?;
            if image_data.len() + data.len() > MAX_UPLOAD_BYTES {
                return Err(UploadError::TooLarge.into());
            }
            image_data.extend_from_slice(&data);
        }

        return Ok(UploadedImage {
            mime_type,
            bytes: image_data,
        });
    }

    Err(no_image())
}

async fn read_json(mut payload: web::Payload) -> Result<UploadedImage, AnalysisError> {
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|e| AnalysisError::InvalidInput(format!("Malformed upload: {}", e)))?;
        if body.len() + chunk.len() > JSON_BODY_LIMIT {
            return Err(UploadError::TooLarge.into());
        }
        body.extend_from_slice(&chunk);
    }

    let value: serde_json::Value = serde_json::from_slice(&body)
        .map_err(|e| AnalysisError::InvalidInput(format!("Invalid JSON body: {}", e)))?;
    let encoded = value.get("image").and_then(|v| v.as_str()).ok_or_else(no_image)?;

    let decoded = decode_data_url(encoded).map_err(|e| AnalysisError::InvalidInput(e.to_string()))?;
    let mime_type = decoded
        .mime_type
        .or_else(|| {
            image::guess_format(&decoded.bytes)
                .ok()
                .map(|format| format.to_mime_type().to_string())
        })
        .unwrap_or_else(|| "application/octet-stream".to_string());

    Ok(UploadedImage {
        mime_type,
        bytes: decoded.bytes,
    })
}
