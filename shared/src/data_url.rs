use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use derive_more::{Display, From};

#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    /// MIME type declared by a `data:` prefix, if there was one.
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Display, From)]
pub enum DataUrlError {
    #[display(fmt = "Image payload is empty")]
    #[from(ignore)]
    Empty,
    #[display(fmt = "Invalid base64 image data: {}", _0)]
    Base64(base64::DecodeError),
}

impl std::error::Error for DataUrlError {}

/// Decodes `data:<mime>;base64,<payload>` or a bare base64 payload.
/// Everything after the first comma is treated as the payload.
pub fn decode_data_url(input: &str) -> Result<DecodedImage, DataUrlError> {
    let input = input.trim();
    let (header, payload) = match input.split_once(',') {
        Some((header, payload)) => (Some(header), payload),
        None => (None, input),
    };

    let mime_type = header
        .and_then(|h| h.strip_prefix("data:"))
        .map(|h| h.split(';').next().unwrap_or_default().trim().to_string())
        .filter(|m| !m.is_empty());

    let payload: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if payload.is_empty() {
        return Err(DataUrlError::Empty);
    }

    let bytes = STANDARD.decode(payload.as_bytes())?;
    Ok(DecodedImage { mime_type, bytes })
}

pub fn encode_data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}
