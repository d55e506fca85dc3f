use derive_more::Display;

pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
pub const ACCEPTED_MIME_PREFIX: &str = "image/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum UploadError {
    #[display(fmt = "Please select a valid image file.")]
    NotAnImage,
    #[display(fmt = "File size must be less than 10MB.")]
    TooLarge,
}

impl std::error::Error for UploadError {}

/// Type and size rules applied by the browser before upload and again by the server.
pub fn validate_upload(mime_type: &str, size: usize) -> Result<(), UploadError> {
    if !mime_type.trim().to_ascii_lowercase().starts_with(ACCEPTED_MIME_PREFIX) {
        return Err(UploadError::NotAnImage);
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(UploadError::TooLarge);
    }
    Ok(())
}
