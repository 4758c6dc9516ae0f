use framework::Error;
use kanau::processor::Processor;
use std::sync::Arc;
use tracing::instrument;

pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
pub const MAX_UPLOAD_FILES: usize = 10;

const ALLOWED_IMAGE_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

pub fn is_allowed_image_type(content_type: &str) -> bool {
    ALLOWED_IMAGE_TYPES.contains(&content_type)
}

#[derive(Debug, Clone)]
pub struct MediaConfig {
    /// Upload endpoint of the media host.
    pub upload_url: String,
    /// Unsigned upload preset configured on the host.
    pub upload_preset: String,
}

/// Proxy to the third-party media host. Images never touch local disk; the
/// hosted URL comes straight back to the admin UI.
#[derive(Clone)]
pub struct MediaClient {
    pub client: reqwest::Client,
    pub config: Arc<MediaConfig>,
}

#[derive(Debug, Clone)]
pub struct UploadImage {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct UploadedMedia {
    #[serde(rename = "secure_url")]
    pub url: String,
    pub public_id: String,
}

impl Processor<UploadImage> for MediaClient {
    type Output = UploadedMedia;
    type Error = Error;
    #[instrument(skip_all, err)]
    async fn process(&self, input: UploadImage) -> Result<UploadedMedia, Error> {
        if !is_allowed_image_type(&input.content_type) {
            return Err(Error::validation(
                "Only image files are allowed (jpg, jpeg, png, gif, webp)",
            ));
        }
        if input.bytes.len() > MAX_UPLOAD_BYTES {
            return Err(Error::validation("File too large. Maximum size is 10MB"));
        }

        let part = reqwest::multipart::Part::bytes(input.bytes)
            .file_name(input.filename)
            .mime_str(&input.content_type)
            .map_err(Error::Upstream)?;
        let form = reqwest::multipart::Form::new()
            .text("upload_preset", self.config.upload_preset.clone())
            .part("file", part);

        let uploaded = self
            .client
            .post(&self.config.upload_url)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?
            .json::<UploadedMedia>()
            .await?;
        Ok(uploaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_types_are_gated() {
        assert!(is_allowed_image_type("image/png"));
        assert!(is_allowed_image_type("image/webp"));
        assert!(!is_allowed_image_type("application/pdf"));
        assert!(!is_allowed_image_type("image/svg+xml"));
    }
}
