use gloo_file::Blob;
use gloo_net::http::Request;
use shared::flow::SelectedImage;
use shared::{AnalysisResponse, ErrorBody};

const ANALYZE_ENDPOINT: &str = "/api/analyze";

/// Posts the image as the multipart field `image`.
///
/// `Err(Some(message))` carries the server's error text; `Err(None)` means
/// the caller should fall back to a generic message.
pub async fn analyze_image(image: &SelectedImage) -> Result<AnalysisResponse, Option<String>> {
    let form_data = web_sys::FormData::new().map_err(|e| {
        log::error!("Failed to create form data: {:?}", e);
        None
    })?;
    let blob = Blob::new_with_options(image.bytes.as_slice(), Some(image.mime_type.as_str()));
    form_data
        .append_with_blob_and_filename("image", blob.as_ref(), &image.name)
        .map_err(|e| {
            log::error!("Failed to attach image: {:?}", e);
            None
        })?;

    let request = Request::post(ANALYZE_ENDPOINT).body(form_data).map_err(|e| {
        log::error!("Failed to build request: {}", e);
        None
    })?;

    let response = request.send().await.map_err(|e| {
        log::error!("Network error: {}", e);
        None
    })?;

    if response.ok() {
        return response.json::<AnalysisResponse>().await.map_err(|e| {
            log::error!("Failed to parse response: {}", e);
            None
        });
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    log::warn!("Server error: {} - {}", status, body);
    Err(serde_json::from_str::<ErrorBody>(&body).ok().map(|b| b.error))
}
