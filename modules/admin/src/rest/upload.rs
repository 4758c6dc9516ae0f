use crate::rest::AdminRest;
use crate::services::media::{MAX_UPLOAD_BYTES, MAX_UPLOAD_FILES, UploadImage, UploadedMedia};
use auth::entities::user_account::Role;
use auth::rest::middleware::CurrentUser;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::routing::post;
use axum::{Json, Router};
use framework::Error;
use kanau::processor::Processor;

async fn read_parts(multipart: &mut Multipart) -> Result<Vec<UploadImage>, Error> {
    let mut uploads = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::Validation(format!("Malformed upload: {e}")))?
    {
        let filename = field.file_name().unwrap_or("upload").to_owned();
        let content_type = field.content_type().unwrap_or_default().to_owned();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| Error::Validation(format!("Malformed upload: {e}")))?;
        uploads.push(UploadImage {
            filename,
            content_type,
            bytes: bytes.to_vec(),
        });
    }
    Ok(uploads)
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct SingleUploadResponse {
    message: &'static str,
    image_url: String,
    public_id: String,
}

async fn single(
    State(state): State<AdminRest>,
    user: CurrentUser,
    mut multipart: Multipart,
) -> Result<Json<SingleUploadResponse>, Error> {
    user.require(Role::SuperAdmin)?;
    let mut uploads = read_parts(&mut multipart).await?;
    let Some(upload) = uploads.pop() else {
        return Err(Error::validation("No file uploaded"));
    };
    let uploaded = state.media.process(upload).await?;
    Ok(Json(SingleUploadResponse {
        message: "File uploaded successfully",
        image_url: uploaded.url,
        public_id: uploaded.public_id,
    }))
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadedImage {
    image_url: String,
    public_id: String,
}

impl From<UploadedMedia> for UploadedImage {
    fn from(media: UploadedMedia) -> Self {
        Self {
            image_url: media.url,
            public_id: media.public_id,
        }
    }
}

#[derive(Debug, serde::Serialize)]
struct MultiUploadResponse {
    message: &'static str,
    images: Vec<UploadedImage>,
}

async fn multiple(
    State(state): State<AdminRest>,
    user: CurrentUser,
    mut multipart: Multipart,
) -> Result<Json<MultiUploadResponse>, Error> {
    user.require(Role::SuperAdmin)?;
    let uploads = read_parts(&mut multipart).await?;
    if uploads.is_empty() {
        return Err(Error::validation("No files uploaded"));
    }
    if uploads.len() > MAX_UPLOAD_FILES {
        return Err(Error::validation("Too many files. Maximum is 10 files"));
    }
    let mut images = Vec::with_capacity(uploads.len());
    for upload in uploads {
        images.push(state.media.process(upload).await?.into());
    }
    Ok(Json(MultiUploadResponse {
        message: "Files uploaded successfully",
        images,
    }))
}

pub fn router(state: AdminRest) -> Router {
    // leave headroom above the per-file cap for multipart framing
    let body_limit = (MAX_UPLOAD_BYTES * MAX_UPLOAD_FILES) + 1024 * 1024;
    Router::new()
        .route("/single", post(single))
        .route("/multiple", post(multiple))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
